use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::app::{AppState, Mode, NotificationLevel};
use crate::board::Registry;

/// Single-row status line: ball count on the left, transient notifications
/// in the middle, today's date on the right.
pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    registry: &Registry,
    state: &AppState,
    today: NaiveDate,
) {
    let left = format!(" {} Tareas Pendientes", registry.ball_count());
    let right = format!("{} ", crate::board::dates::format_today(today));
    let hint = mode_hint(&state.mode);

    let mut spans = vec![Span::styled(
        left.clone(),
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
    )];

    let middle = match &state.notification {
        Some(msg) => Span::styled(
            format!("  {msg}"),
            Theme::status_style(state.notification_level),
        ),
        None => Span::styled(format!("  {hint}"), Theme::dim_style()),
    };
    spans.push(middle.clone());

    let used = left.width() + middle.content.width();
    let pad = (area.width as usize).saturating_sub(used + right.width());
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(right, Theme::dim_style()));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn mode_hint(mode: &Mode) -> &'static str {
    match mode {
        Mode::Normal => "a nueva · d borrar Hecho · i info · q salir",
        Mode::TaskDetail { .. } => "j/k desplazar · Esc cerrar",
        Mode::NewTask { .. } => "Tab campo · Enter crear · Esc cancelar",
        Mode::Info => "Esc cerrar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_hints_exist_for_every_mode() {
        assert!(!mode_hint(&Mode::Normal).is_empty());
        assert!(!mode_hint(&Mode::Info).is_empty());
        assert!(!mode_hint(&Mode::TaskDetail { id: "ball-1".into(), scroll: 0 }).is_empty());
    }
}
