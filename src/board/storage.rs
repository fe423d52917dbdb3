use std::fs;
use std::path::{Path, PathBuf};

use super::layout::LayoutSnapshot;
use super::Task;
use crate::config::BoardConfig;

/// Name of the store directory, found by walking up from the working
/// directory (like a VCS root).
pub const STORE_DIR: &str = ".tablero";

/// Persisted record keys. Each key maps to `<key>.json` inside the store.
pub const TASKS_KEY: &str = "customTasks";
pub const DELETED_KEY: &str = "deletedTasks";
pub const LAYOUT_KEY: &str = "kanbanState";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config.toml: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error(".tablero directory not found (walked up from {0}); run `tablero init`")]
    NotFound(PathBuf),
}

/// String-keyed JSON record store backed by one file per key.
///
/// Reads never fail: a missing or unreadable record is simply absent, and
/// callers fall back to an empty default.
#[derive(Debug, Clone)]
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.record_path(key)).ok()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.record_path(key), value)?;
        Ok(())
    }
}

/// Find the store directory by walking up from `start`.
pub fn find_store_dir(start: &Path) -> Result<PathBuf, StorageError> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(STORE_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !dir.pop() {
            return Err(StorageError::NotFound(start.to_path_buf()));
        }
    }
}

/// Initialize a new store under `root`, optionally seeding the task list.
pub fn init_store(root: &Path, seed: bool) -> Result<PathBuf, StorageError> {
    let store_dir = root.join(STORE_DIR);
    fs::create_dir_all(&store_dir)?;

    let store = KvStore::open(&store_dir);
    if store.get(TASKS_KEY).is_none() {
        let tasks = if seed { seed_tasks() } else { Vec::new() };
        save_tasks(&store, &tasks)?;
    }
    if store.get(DELETED_KEY).is_none() {
        save_deleted(&store, &[])?;
    }

    Ok(store_dir)
}

/// Load the board configuration from `config.toml` inside the store
/// directory, or the compiled defaults when the file is absent.
pub fn load_config(store_dir: &Path) -> Result<BoardConfig, StorageError> {
    let path = store_dir.join("config.toml");
    if !path.exists() {
        return Ok(BoardConfig::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Read the persisted task list. Missing or corrupt ⇒ empty.
pub fn load_tasks(store: &KvStore) -> Vec<Task> {
    store
        .get(TASKS_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn save_tasks(store: &KvStore, tasks: &[Task]) -> Result<(), StorageError> {
    store.set(TASKS_KEY, &serde_json::to_string(tasks)?)
}

/// Read the tombstone set. Missing or corrupt ⇒ empty.
pub fn load_deleted(store: &KvStore) -> Vec<String> {
    store
        .get(DELETED_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn save_deleted(store: &KvStore, deleted: &[String]) -> Result<(), StorageError> {
    store.set(DELETED_KEY, &serde_json::to_string(deleted)?)
}

/// Read the layout snapshot. Missing or corrupt ⇒ empty.
pub fn load_layout(store: &KvStore) -> LayoutSnapshot {
    store
        .get(LAYOUT_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn save_layout(store: &KvStore, snapshot: &LayoutSnapshot) -> Result<(), StorageError> {
    store.set(LAYOUT_KEY, &serde_json::to_string(snapshot)?)
}

/// Starter tasks for a fresh board. Ids are intentionally omitted so they
/// pick up seeded `ball-{n}` ids on first load.
fn seed_tasks() -> Vec<Task> {
    let task = |subject: &str, title: &str, description: &str| Task {
        id: None,
        subject: subject.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        due_date: super::dates::NO_DATE.to_string(),
        custom_color: None,
        date: None,
        file_url: None,
        task_url: None,
    };
    vec![
        task(
            "BIENVENIDA",
            "Arrastra esta bola",
            "Mantén pulsado y **arrastra** la bola a otra columna.\n\nUn clic corto abre esta ficha.",
        ),
        task(
            "TABLERO",
            "Crea una tarea nueva",
            "Pulsa `a` para abrir el formulario.\n\n- Elige un color\n- La fecha es opcional",
        ),
        task(
            "LIMPIEZA",
            "Borra lo terminado",
            "Las bolas en la columna *Hecho* se eliminan con `d`.",
        ),
    ]
}
