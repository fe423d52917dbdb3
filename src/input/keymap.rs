use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action::Action;
use crate::app::Mode;

/// Map a key event to a semantic action based on current mode.
pub fn map_key(key: KeyEvent, mode: &Mode) -> Action {
    match mode {
        Mode::Normal => map_normal(key),
        Mode::TaskDetail { .. } => map_detail(key),
        Mode::NewTask { .. } => map_form(key),
        Mode::Info => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::CloseOverlay,
            _ => Action::None,
        },
    }
}

fn map_normal(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('a') => Action::NewTask,
        KeyCode::Char('d') => Action::DeleteDone,
        KeyCode::Char('i') => Action::ShowInfo,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

fn map_detail(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Action::CloseOverlay,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        _ => Action::None,
    }
}

fn map_form(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::FormCancel,
        KeyCode::Enter => Action::FormConfirm,
        KeyCode::Tab => Action::FormNextField,
        KeyCode::BackTab => Action::FormPrevField,
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::FormDeleteWord
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::FormCancel,
        KeyCode::Char(c) => Action::FormChar(c),
        KeyCode::Backspace => Action::FormBackspace,
        KeyCode::Left => Action::FormLeft,
        KeyCode::Right => Action::FormRight,
        KeyCode::Home => Action::FormHome,
        KeyCode::End => Action::FormEnd,
        KeyCode::Down => Action::FormNextField,
        KeyCode::Up => Action::FormPrevField,
        _ => Action::None,
    }
}
