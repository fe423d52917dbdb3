pub mod dates;
pub mod layout;
pub mod storage;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use storage::{KvStore, StorageError};

/// How long a freshly materialized ball renders dimmed (cosmetic fade-in).
const FADE_IN: Duration = Duration::from_millis(100);

/// One of the three fixed drop regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnId {
    Col1,
    Col2,
    Col3,
}

impl ColumnId {
    pub const ALL: [ColumnId; 3] = [Self::Col1, Self::Col2, Self::Col3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Col1 => "col-1",
            Self::Col2 => "col-2",
            Self::Col3 => "col-3",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Col1 => 0,
            Self::Col2 => 1,
            Self::Col3 => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Col1 => "Por hacer",
            Self::Col2 => "En progreso",
            Self::Col3 => "Hecho",
        }
    }
}

impl std::str::FromStr for ColumnId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "col-1" => Ok(Self::Col1),
            "col-2" => Ok(Self::Col2),
            "col-3" => Ok(Self::Col3),
            other => Err(format!("unknown column '{other}'")),
        }
    }
}

/// User-selected task color. Serialized in Spanish for compatibility with
/// the persisted task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum TaskColor {
    #[serde(rename = "Rojo")]
    #[value(name = "rojo", alias = "red")]
    Red,
    #[serde(rename = "Amarillo")]
    #[value(name = "amarillo", alias = "yellow")]
    Yellow,
    #[serde(rename = "Verde")]
    #[value(name = "verde", alias = "green")]
    Green,
}

impl TaskColor {
    pub const ALL: [TaskColor; 3] = [Self::Red, Self::Yellow, Self::Green];

    /// Marker class carried by the ball ("red", "yellow", "green").
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
        }
    }

    /// Spanish display name, as shown in the form.
    pub fn display(&self) -> &'static str {
        match self {
            Self::Red => "Rojo",
            Self::Yellow => "Amarillo",
            Self::Green => "Verde",
        }
    }
}

/// Resolved ball color after applying the custom-color and due-date rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallColor {
    Red,
    Yellow,
    Green,
    Default,
}

/// A single task record, as persisted in the `customTasks` list.
///
/// `id` is optional in the raw list; seeded entries get `ball-{index+1}`
/// assigned during `load_all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "dueDate", default = "default_due_date")]
    pub due_date: String,
    #[serde(rename = "customColor", default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<TaskColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(rename = "taskUrl", default, skip_serializing_if = "Option::is_none")]
    pub task_url: Option<String>,
}

fn default_due_date() -> String {
    dates::NO_DATE.to_string()
}

impl Task {
    /// Ball color for this task: custom color wins, then due-date urgency.
    pub fn ball_color(&self, today: NaiveDate) -> BallColor {
        if let Some(color) = self.custom_color {
            return match color {
                TaskColor::Red => BallColor::Red,
                TaskColor::Yellow => BallColor::Yellow,
                TaskColor::Green => BallColor::Green,
            };
        }
        match self.date {
            Some(date) => dates::color_for_date(date, today),
            None => BallColor::Default,
        }
    }
}

/// Validated input for task creation. Color is mandatory; everything else
/// is optional or defaulted at this point.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub subject: String,
    pub title: String,
    pub description: String,
    pub color: TaskColor,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

/// A draggable visual unit representing one task.
///
/// Placement is the persisted logical position; any in-flight drag offset is
/// a separate render-only layer owned by the drag controller.
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: String,
    pub column: ColumnId,
    pub left_pct: f64,
    pub top_pct: f64,
    spawned: Instant,
}

impl Ball {
    fn new(id: String, column: ColumnId, left_pct: f64, top_pct: f64) -> Self {
        Self { id, column, left_pct, top_pct, spawned: Instant::now() }
    }

    /// Still inside the cosmetic fade-in window.
    pub fn fading_in(&self) -> bool {
        self.spawned.elapsed() < FADE_IN
    }
}

/// In-memory task registry: task content keyed by id, plus the live ball
/// set in draw order (later elements draw on top).
#[derive(Debug, Default)]
pub struct Registry {
    tasks: HashMap<String, Task>,
    balls: Vec<Ball>,
    deleted: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn ball(&self, id: &str) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: &str) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    /// Live balls in draw order.
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    pub fn is_deleted(&self, id: &str) -> bool {
        self.deleted.iter().any(|d| d == id)
    }

    /// Tasks in persisted order, with resolved ids, excluding tombstoned ones.
    pub fn live_tasks(&self) -> Vec<&Task> {
        self.balls.iter().filter_map(|b| self.tasks.get(&b.id)).collect()
    }

    /// Populate the registry from the persisted task list, skipping
    /// tombstoned ids, then apply and re-save the layout snapshot.
    ///
    /// Balls without a snapshot entry keep the randomized col-1 placement
    /// they get here.
    pub fn load_all(&mut self, store: &KvStore, config: &BoardConfig) -> Result<(), StorageError> {
        let raw_tasks = storage::load_tasks(store);
        self.deleted = storage::load_deleted(store);

        for (index, mut task) in raw_tasks.into_iter().enumerate() {
            let id = task
                .id
                .clone()
                .unwrap_or_else(|| format!("ball-{}", index + 1));
            if self.is_deleted(&id) {
                continue;
            }
            task.id = Some(id.clone());
            self.tasks.insert(id.clone(), task);
            if self.ball(&id).is_none() {
                let (left, top) = random_spawn(config);
                self.balls.push(Ball::new(id, ColumnId::Col1, left, top));
            }
        }

        layout::load_state(store, self);
        layout::save_state(store, self)?;
        Ok(())
    }

    /// Create a task from a validated draft: assign a timestamp id, append
    /// to the persisted list, spawn a ball in col-1, persist the layout.
    pub fn create(
        &mut self,
        store: &KvStore,
        config: &BoardConfig,
        draft: TaskDraft,
    ) -> Result<String, StorageError> {
        // Timestamp-derived id, bumped if two creations land in the same
        // millisecond.
        let mut millis = Utc::now().timestamp_millis();
        while self.tasks.contains_key(&format!("ball-custom-{millis}")) {
            millis += 1;
        }
        let id = format!("ball-custom-{millis}");
        let due_date = match draft.date {
            Some(date) => dates::format_due(date, draft.time),
            None => dates::NO_DATE.to_string(),
        };
        let task = Task {
            id: Some(id.clone()),
            subject: draft.subject,
            title: draft.title,
            description: draft.description,
            due_date,
            custom_color: Some(draft.color),
            date: Some(draft.date.unwrap_or_else(|| chrono::Local::now().date_naive())),
            file_url: None,
            task_url: None,
        };

        let mut persisted = storage::load_tasks(store);
        persisted.push(task.clone());
        storage::save_tasks(store, &persisted)?;

        self.tasks.insert(id.clone(), task);
        let (left, top) = random_spawn(config);
        self.balls.push(Ball::new(id.clone(), ColumnId::Col1, left, top));

        layout::save_state(store, self)?;
        Ok(id)
    }

    /// Tombstone and remove every ball currently in col-3. The tombstone
    /// set is append-only; the task list itself is not compacted.
    pub fn delete_done(&mut self, store: &KvStore) -> Result<usize, StorageError> {
        let doomed: Vec<String> = self
            .balls
            .iter()
            .filter(|b| b.column == ColumnId::Col3)
            .map(|b| b.id.clone())
            .collect();
        if doomed.is_empty() {
            return Ok(0);
        }

        self.deleted.extend(doomed.iter().cloned());
        storage::save_deleted(store, &self.deleted)?;

        self.balls.retain(|b| b.column != ColumnId::Col3);
        layout::save_state(store, self)?;
        Ok(doomed.len())
    }

    /// Move a ball to the end of the draw order (drawn on top).
    pub fn raise(&mut self, id: &str) {
        if let Some(pos) = self.balls.iter().position(|b| b.id == id) {
            let ball = self.balls.remove(pos);
            self.balls.push(ball);
        }
    }
}

/// Randomized initial placement inside the col-1 default window.
fn random_spawn(config: &BoardConfig) -> (f64, f64) {
    let mut rng = rand::thread_rng();
    let left = rng.gen_range(config.spawn_left.min..=config.spawn_left.max);
    let top = rng.gen_range(config.spawn_top.min..=config.spawn_top.max);
    (left, top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::storage::{init_store, KvStore};

    fn test_store() -> (tempfile::TempDir, KvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = init_store(dir.path(), false).unwrap();
        (dir, KvStore::open(store_dir))
    }

    fn draft(color: TaskColor, date: Option<NaiveDate>) -> TaskDraft {
        TaskDraft {
            subject: "PRUEBA".into(),
            title: "Una tarea".into(),
            description: "Descripción".into(),
            color,
            date,
            time: None,
        }
    }

    #[test]
    fn test_seeded_ids_derive_from_source_order() {
        let (_dir, store) = test_store();
        let tasks = vec![
            Task { id: None, subject: "A".into(), ..blank_task() },
            Task { id: None, subject: "B".into(), ..blank_task() },
        ];
        storage::save_tasks(&store, &tasks).unwrap();

        let config = BoardConfig::default();
        let mut registry = Registry::new();
        registry.load_all(&store, &config).unwrap();

        assert!(registry.task("ball-1").is_some());
        assert!(registry.task("ball-2").is_some());
        assert_eq!(registry.ball_count(), 2);
    }

    #[test]
    fn test_load_all_spawns_within_default_window() {
        let (_dir, store) = test_store();
        storage::save_tasks(&store, &[Task { id: None, ..blank_task() }]).unwrap();

        let config = BoardConfig::default();
        let mut registry = Registry::new();
        registry.load_all(&store, &config).unwrap();

        let ball = registry.ball("ball-1").unwrap();
        assert_eq!(ball.column, ColumnId::Col1);
        assert!(ball.left_pct >= 28.5 && ball.left_pct <= 83.5);
        assert!(ball.top_pct >= 15.4 && ball.top_pct <= 82.8);
    }

    #[test]
    fn test_create_yellow_without_date_uses_sin_fecha() {
        let (_dir, store) = test_store();
        let config = BoardConfig::default();
        let mut registry = Registry::new();

        let id = registry
            .create(&store, &config, draft(TaskColor::Yellow, None))
            .unwrap();

        let task = registry.task(&id).unwrap();
        assert_eq!(task.due_date, "Sin fecha");
        assert_eq!(task.custom_color.unwrap().marker(), "yellow");
        // ISO date defaults to today even without a selected date
        assert_eq!(task.date, Some(chrono::Local::now().date_naive()));

        let ball = registry.ball(&id).unwrap();
        assert_eq!(ball.column, ColumnId::Col1);
        assert!(ball.left_pct >= 28.5 && ball.left_pct <= 83.5);
        assert!(ball.top_pct >= 15.4 && ball.top_pct <= 82.8);
    }

    #[test]
    fn test_created_ids_are_custom_tagged() {
        let (_dir, store) = test_store();
        let config = BoardConfig::default();
        let mut registry = Registry::new();
        let id = registry
            .create(&store, &config, draft(TaskColor::Red, None))
            .unwrap();
        assert!(id.starts_with("ball-custom-"));
    }

    #[test]
    fn test_delete_done_tombstones_col3_only() {
        let (_dir, store) = test_store();
        let config = BoardConfig::default();
        let mut registry = Registry::new();
        let keep = registry
            .create(&store, &config, draft(TaskColor::Green, None))
            .unwrap();
        let gone = registry
            .create(&store, &config, draft(TaskColor::Red, None))
            .unwrap();
        registry.ball_mut(&gone).unwrap().column = ColumnId::Col3;

        let removed = registry.delete_done(&store).unwrap();
        assert_eq!(removed, 1);
        assert!(registry.ball(&keep).is_some());
        assert!(registry.ball(&gone).is_none());
        assert!(registry.is_deleted(&gone));
    }

    #[test]
    fn test_tombstoned_id_never_rematerializes() {
        let (_dir, store) = test_store();
        let config = BoardConfig::default();

        let mut registry = Registry::new();
        let id = registry
            .create(&store, &config, draft(TaskColor::Red, None))
            .unwrap();
        registry.ball_mut(&id).unwrap().column = ColumnId::Col3;
        registry.delete_done(&store).unwrap();

        // Fresh reload: the task is still in the raw list, but tombstoned.
        let mut reloaded = Registry::new();
        reloaded.load_all(&store, &config).unwrap();
        assert!(storage::load_tasks(&store).iter().any(|t| t.id.as_deref() == Some(&id)));
        assert!(reloaded.ball(&id).is_none());
        assert!(reloaded.task(&id).is_none());
    }

    #[test]
    fn test_ball_color_precedence() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        let mut task = blank_task();
        assert_eq!(task.ball_color(today), BallColor::Default);

        task.date = Some(today + chrono::Duration::days(2));
        assert_eq!(task.ball_color(today), BallColor::Red);

        // Custom color wins over the date rule
        task.custom_color = Some(TaskColor::Green);
        assert_eq!(task.ball_color(today), BallColor::Green);
    }

    #[test]
    fn test_raise_moves_ball_to_top_of_draw_order() {
        let (_dir, store) = test_store();
        let config = BoardConfig::default();
        let mut registry = Registry::new();
        let first = registry
            .create(&store, &config, draft(TaskColor::Red, None))
            .unwrap();
        registry
            .create(&store, &config, draft(TaskColor::Green, None))
            .unwrap();

        registry.raise(&first);
        assert_eq!(registry.balls().last().unwrap().id, first);
    }

    pub(super) fn blank_task() -> Task {
        Task {
            id: None,
            subject: String::new(),
            title: String::new(),
            description: String::new(),
            due_date: dates::NO_DATE.to_string(),
            custom_color: None,
            date: None,
            file_url: None,
            task_url: None,
        }
    }
}
