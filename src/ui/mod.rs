pub mod board_view;
pub mod canvas_view;
pub mod markdown;
pub mod status_bar;
pub mod task_detail;
pub mod task_form;
pub mod theme;

use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::board::Registry;
use crate::config::BoardConfig;
use crate::input::drag::DragController;
use crate::physics::Playground;
use theme::Theme;

/// Overlay panel area: centered, most of the viewport.
pub fn overlay_rect(area: Rect) -> Rect {
    centered_rect(area, 80, 80)
}

/// Centered rect taking the given percentages of the parent.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// Draw one full frame: board (or the decorative canvas on small
/// viewports), status line, then whichever overlay the mode calls for.
pub fn render(
    f: &mut Frame,
    registry: &Registry,
    state: &AppState,
    drag: &DragController,
    playground: &Playground,
    config: &BoardConfig,
    today: NaiveDate,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    if playground.running() {
        canvas_view::render_canvas(f, chunks[0], playground);
    } else {
        board_view::render_board(f, chunks[0], registry, drag, config, today);
    }

    status_bar::render_status_bar(f, chunks[1], registry, state, today);

    match &state.mode {
        Mode::Normal => {}
        Mode::TaskDetail { id, scroll } => {
            if let Some(task) = registry.task(id) {
                task_detail::render_task_detail(f, chunks[0], task, *scroll);
            }
        }
        Mode::NewTask { form } => task_form::render_task_form(f, chunks[0], form),
        Mode::Info => render_info(f, chunks[0]),
    }
}

const INFO_TEXT: &str = "\
# Tablero

Tablero de tareas con bolas arrastrables.

- Pulsa una bola para ver su tarea.
- Arrastra una bola para moverla entre columnas.
- En ventanas pequeñas aparece un lienzo de bolas decorativo.

## Teclas

- `a` nueva tarea
- `d` borrar las tareas de Hecho
- `i` esta ayuda
- `q` salir";

fn render_info(f: &mut Frame, area: Rect) {
    let panel_area = centered_rect(area, 60, 70);
    f.render_widget(Clear, panel_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            " Información ",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(2, 2, 1, 1));
    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    f.render_widget(Paragraph::new(markdown::render(INFO_TEXT, false)), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_stays_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(parent, 80, 80);
        assert!(rect.x >= parent.x && rect.y >= parent.y);
        assert!(rect.right() <= parent.right() && rect.bottom() <= parent.bottom());
    }

    #[test]
    fn test_overlay_rect_is_centered() {
        let parent = Rect::new(0, 0, 100, 50);
        let rect = overlay_rect(parent);
        let left_gap = rect.x - parent.x;
        let right_gap = parent.right() - rect.right();
        assert!(left_gap.abs_diff(right_gap) <= 1);
    }
}
