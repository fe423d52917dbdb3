use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveTime};
use crossterm::event::{self, Event, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Rect, Size};
use ratatui::DefaultTerminal;

use crate::board::layout::{self, Point, PxRect};
use crate::board::storage::{self, KvStore};
use crate::board::{Registry, TaskColor, TaskDraft};
use crate::config::BoardConfig;
use crate::input::action::Action;
use crate::input::drag::{DragController, Release};
use crate::input::keymap::map_key;
use crate::physics::Playground;

/// Reusable text editing buffer with cursor.
///
/// `cursor` is a **char index** (not byte index), always in `0..=char_count`.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    pub input: String,
    pub cursor: usize,
}

impl TextBuffer {
    pub fn new(input: String) -> Self {
        let cursor = input.chars().count();
        Self { input, cursor }
    }

    pub fn empty() -> Self {
        Self { input: String::new(), cursor: 0 }
    }

    /// Convert a char index to a byte index.
    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert(&mut self, c: char) {
        let byte_idx = self.byte_offset(self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_idx = self.byte_offset(self.cursor - 1);
            self.input.remove(byte_idx);
            self.cursor -= 1;
        }
    }

    pub fn delete_word(&mut self) {
        let byte_pos = self.byte_offset(self.cursor);
        let before = &self.input[..byte_pos];
        let trimmed = before.trim_end();
        let start_byte = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8()) // byte after the whitespace char
            .unwrap_or(0);
        // Convert start_byte back to char index
        let start_char = self.input[..start_byte].chars().count();
        self.input.drain(start_byte..byte_pos);
        self.cursor = start_char;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.input.chars().count();
    }
}

/// Field focus inside the new-task form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Subject,
    Title,
    Description,
    Date,
    Time,
    Color,
}

impl FormField {
    const ORDER: [FormField; 6] = [
        Self::Subject,
        Self::Title,
        Self::Description,
        Self::Date,
        Self::Time,
        Self::Color,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Subject => "Asunto",
            Self::Title => "Título",
            Self::Description => "Descripción",
            Self::Date => "Fecha (AAAA-MM-DD)",
            Self::Time => "Hora (HH:MM)",
            Self::Color => "Color",
        }
    }
}

/// State of the new-task form.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub subject: TextBuffer,
    pub title: TextBuffer,
    pub description: TextBuffer,
    pub date: TextBuffer,
    pub time: TextBuffer,
    pub color: Option<TaskColor>,
    pub focus: FormField,
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            subject: TextBuffer::new("NUEVA TAREA".into()),
            title: TextBuffer::new("Título de la Tarea".into()),
            description: TextBuffer::new("Descripción de la nueva tarea...".into()),
            date: TextBuffer::empty(),
            time: TextBuffer::empty(),
            color: None,
            focus: FormField::Subject,
        }
    }

    fn buffer_mut(&mut self) -> Option<&mut TextBuffer> {
        match self.focus {
            FormField::Subject => Some(&mut self.subject),
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Date => Some(&mut self.date),
            FormField::Time => Some(&mut self.time),
            FormField::Color => None,
        }
    }

    pub fn next_field(&mut self) {
        let idx = FormField::ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FormField::ORDER[(idx + 1) % FormField::ORDER.len()];
    }

    pub fn prev_field(&mut self) {
        let idx = FormField::ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FormField::ORDER[(idx + FormField::ORDER.len() - 1) % FormField::ORDER.len()];
    }

    pub fn handle_char(&mut self, c: char) {
        if self.focus == FormField::Color {
            match c {
                '1' => self.color = Some(TaskColor::Red),
                '2' => self.color = Some(TaskColor::Yellow),
                '3' => self.color = Some(TaskColor::Green),
                _ => {}
            }
            return;
        }
        if let Some(buf) = self.buffer_mut() {
            buf.insert(c);
        }
    }

    pub fn move_left(&mut self) {
        if self.focus == FormField::Color {
            self.cycle_color(false);
        } else if let Some(buf) = self.buffer_mut() {
            buf.move_left();
        }
    }

    pub fn move_right(&mut self) {
        if self.focus == FormField::Color {
            self.cycle_color(true);
        } else if let Some(buf) = self.buffer_mut() {
            buf.move_right();
        }
    }

    fn cycle_color(&mut self, forward: bool) {
        let all = TaskColor::ALL;
        let next = match self.color {
            None => {
                if forward {
                    0
                } else {
                    all.len() - 1
                }
            }
            Some(current) => {
                let idx = all.iter().position(|c| *c == current).unwrap_or(0);
                if forward {
                    (idx + 1) % all.len()
                } else {
                    (idx + all.len() - 1) % all.len()
                }
            }
        };
        self.color = Some(all[next]);
    }

    /// Validate the form into a creation draft. Color is the only required
    /// field; a malformed date is rejected rather than silently dropped.
    pub fn to_draft(&self) -> Result<TaskDraft, &'static str> {
        let Some(color) = self.color else {
            return Err("Por favor selecciona un color.");
        };
        let date = match self.date.input.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| "Fecha inválida, usa AAAA-MM-DD.")?,
            ),
        };
        let time = NaiveTime::parse_from_str(self.time.input.trim(), "%H:%M").ok();
        Ok(TaskDraft {
            subject: self.subject.input.clone(),
            title: self.title.input.clone(),
            description: self.description.input.clone(),
            color,
            date,
            time,
        })
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Current interaction mode.
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    TaskDetail { id: String, scroll: u16 },
    NewTask { form: Box<TaskForm> },
    Info,
}

/// Notification severity for statusbar coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Global application state.
pub struct AppState {
    pub mode: Mode,
    pub notification: Option<String>,
    pub notification_level: NotificationLevel,
    pub notification_expires: Option<Instant>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            notification: None,
            notification_level: NotificationLevel::Info,
            notification_expires: None,
            should_quit: false,
        }
    }

    /// Show a transient notification.
    pub fn notify(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Info;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Show a transient error notification (rendered in red).
    pub fn notify_error(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Error;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Clear expired notifications.
    pub fn tick_notification(&mut self) {
        if let Some(expires) = self.notification_expires {
            if Instant::now() >= expires {
                self.notification = None;
                self.notification_level = NotificationLevel::Info;
                self.notification_expires = None;
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Board portion of the viewport (everything above the status line).
fn board_area(size: Size) -> Rect {
    Rect::new(0, 0, size.width, size.height.saturating_sub(1))
}

/// Pixel-space center of the cell a mouse event landed in.
fn mouse_point(mouse: &MouseEvent, config: &BoardConfig) -> Point {
    Point::new(
        (mouse.column as f64 + 0.5) * config.cell_width_px,
        (mouse.row as f64 + 0.5) * config.cell_height_px,
    )
}

/// Pixel-space rects of the three columns for a given viewport.
fn column_px_areas(size: Size, config: &BoardConfig) -> [PxRect; 3] {
    let areas = crate::ui::board_view::column_areas(board_area(size));
    [
        PxRect::from_cells(areas[0], config),
        PxRect::from_cells(areas[1], config),
        PxRect::from_cells(areas[2], config),
    ]
}

/// Commit a drop: resolve the target column under the release point,
/// reparent and re-position the ball, persist the snapshot. A release over
/// no column changes nothing and persists nothing.
fn handle_drop(
    registry: &mut Registry,
    state: &mut AppState,
    store: &KvStore,
    config: &BoardConfig,
    size: Size,
    ball_id: &str,
    point: Point,
) {
    let areas = column_px_areas(size, config);
    let Some(column) = layout::column_at(&areas, point) else {
        return;
    };
    let placement = layout::map_to_column(point, column, areas[column.index()], config);
    let Some(ball) = registry.ball_mut(ball_id) else {
        return;
    };
    ball.column = placement.column;
    ball.left_pct = placement.left_pct;
    ball.top_pct = placement.top_pct;

    if let Err(e) = layout::save_state(store, registry) {
        state.notify_error(format!("No se pudo guardar el tablero: {e}"));
    }
}

fn handle_mouse(
    registry: &mut Registry,
    state: &mut AppState,
    drag: &mut DragController,
    playground: &mut Playground,
    store: &KvStore,
    config: &BoardConfig,
    size: Size,
    mouse: MouseEvent,
) {
    let point = mouse_point(&mouse, config);

    // The decorative canvas owns the pointer while it runs.
    if playground.running() {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                playground.pointer_down(point);
            }
            MouseEventKind::Drag(MouseButton::Left) => playground.pointer_move(point),
            MouseEventKind::Up(MouseButton::Left) => playground.pointer_up(),
            _ => {}
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !matches!(state.mode, Mode::Normal) {
                return;
            }
            let areas = column_px_areas(size, config);
            if let Some(id) = layout::ball_at(registry, &areas, config, point) {
                if drag.begin(id.clone(), point) {
                    registry.raise(&id);
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => drag.update(point),
        MouseEventKind::Up(MouseButton::Left) => match drag.release(point) {
            Release::Click { ball_id } => {
                if registry.task(&ball_id).is_some() {
                    state.mode = Mode::TaskDetail { id: ball_id, scroll: 0 };
                }
            }
            Release::Drop { ball_id, point } => {
                handle_drop(registry, state, store, config, size, &ball_id, point);
            }
            Release::Idle => {}
        },
        _ => {}
    }
}

fn process_action(
    registry: &mut Registry,
    state: &mut AppState,
    store: &KvStore,
    config: &BoardConfig,
    action: Action,
) {
    match action {
        Action::Quit => state.should_quit = true,
        Action::NewTask => state.mode = Mode::NewTask { form: Box::new(TaskForm::new()) },
        Action::ShowInfo => state.mode = Mode::Info,
        Action::CloseOverlay | Action::FormCancel => state.mode = Mode::Normal,
        Action::DeleteDone => match registry.delete_done(store) {
            Ok(0) => state.notify("Nada que borrar en Hecho"),
            Ok(n) => state.notify(format!(
                "{n} tarea{} eliminada{}",
                if n == 1 { "" } else { "s" },
                if n == 1 { "" } else { "s" }
            )),
            Err(e) => state.notify_error(format!("No se pudo borrar: {e}")),
        },
        Action::ScrollDown => {
            if let Mode::TaskDetail { scroll, .. } = &mut state.mode {
                *scroll = scroll.saturating_add(1);
            }
        }
        Action::ScrollUp => {
            if let Mode::TaskDetail { scroll, .. } = &mut state.mode {
                *scroll = scroll.saturating_sub(1);
            }
        }
        Action::FormConfirm => {
            let draft = match &state.mode {
                Mode::NewTask { form } => Some(form.to_draft()),
                _ => None,
            };
            match draft {
                Some(Ok(draft)) => match registry.create(store, config, draft) {
                    Ok(_) => {
                        state.mode = Mode::Normal;
                        state.notify("Tarea creada");
                    }
                    Err(e) => state.notify_error(format!("No se pudo guardar: {e}")),
                },
                Some(Err(msg)) => state.notify_error(msg),
                None => {}
            }
        }
        Action::FormNextField => form_edit(state, TaskForm::next_field),
        Action::FormPrevField => form_edit(state, TaskForm::prev_field),
        Action::FormChar(c) => form_edit(state, |form| form.handle_char(c)),
        Action::FormBackspace => form_buffer_edit(state, TextBuffer::backspace),
        Action::FormDeleteWord => form_buffer_edit(state, TextBuffer::delete_word),
        Action::FormLeft => form_edit(state, TaskForm::move_left),
        Action::FormRight => form_edit(state, TaskForm::move_right),
        Action::FormHome => form_buffer_edit(state, TextBuffer::home),
        Action::FormEnd => form_buffer_edit(state, TextBuffer::end),
        Action::None => {}
    }
}

fn form_edit(state: &mut AppState, f: impl FnOnce(&mut TaskForm)) {
    if let Mode::NewTask { form } = &mut state.mode {
        f(form);
    }
}

fn form_buffer_edit(state: &mut AppState, f: impl FnOnce(&mut TextBuffer)) {
    if let Mode::NewTask { form } = &mut state.mode {
        if let Some(buf) = form.buffer_mut() {
            f(buf);
        }
    }
}

/// Main TUI application loop.
pub fn run(terminal: &mut DefaultTerminal, store_dir: &Path) -> color_eyre::Result<()> {
    let config = storage::load_config(store_dir)?;
    let store = KvStore::open(store_dir);

    let mut registry = Registry::new();
    registry.load_all(&store, &config)?;

    let mut state = AppState::new();
    let mut drag = DragController::new();
    let mut playground = Playground::new(config.canvas_breakpoint);
    let mut rng = rand::thread_rng();

    let mut size = terminal.size()?;
    playground.resize(
        size.width as f64 * config.cell_width_px,
        size.height as f64 * config.cell_height_px,
        &mut rng,
    );

    loop {
        state.tick_notification();
        playground.update();
        // Apply the latest coalesced follow offset before this frame
        drag.take_frame_offset();

        let today = chrono::Local::now().date_naive();
        terminal.draw(|f| {
            crate::ui::render(f, &registry, &state, &drag, &playground, &config, today)
        })?;

        // Tighter poll while the canvas animates, relaxed otherwise
        let poll_timeout = if playground.running() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };
        if event::poll(poll_timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    let action = map_key(key, &state.mode);
                    process_action(&mut registry, &mut state, &store, &config, action);
                }
                Event::Mouse(mouse) => {
                    handle_mouse(
                        &mut registry,
                        &mut state,
                        &mut drag,
                        &mut playground,
                        &store,
                        &config,
                        size,
                        mouse,
                    );
                }
                Event::Resize(width, height) => {
                    size = Size { width, height };
                    playground.resize(
                        width as f64 * config.cell_width_px,
                        height as f64 * config.cell_height_px,
                        &mut rng,
                    );
                }
                _ => {}
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
