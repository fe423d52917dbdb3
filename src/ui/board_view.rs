use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use super::theme::Theme;
use crate::board::{ColumnId, Registry};
use crate::config::BoardConfig;
use crate::input::drag::DragController;

/// Glyph drawn for each ball.
const BALL_GLYPH: &str = "●";

/// Split the board area into the three fixed columns.
///
/// Shared between rendering and pointer hit-testing so both always agree on
/// where a column is.
pub fn column_areas(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

pub fn render_board(
    f: &mut Frame,
    area: Rect,
    registry: &Registry,
    drag: &DragController,
    config: &BoardConfig,
    today: NaiveDate,
) {
    let areas = column_areas(area);

    for column in ColumnId::ALL {
        let col_area = areas[column.index()];
        let count = registry
            .balls()
            .iter()
            .filter(|b| b.column == column)
            .count();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Theme::COLUMN_BORDER))
            .title(Span::styled(
                format!(" {} ({count}) ", column.title()),
                Style::default()
                    .fg(Theme::COLUMN_TITLE)
                    .add_modifier(Modifier::BOLD),
            ));
        f.render_widget(block, col_area);
    }

    // Balls, in draw order; the grabbed ball is drawn last so it stays on
    // top of everything while it moves.
    let active = drag.active_ball().map(str::to_string);
    for ball in registry.balls() {
        if active.as_deref() == Some(ball.id.as_str()) {
            continue;
        }
        render_ball(f, registry, config, &areas, &ball.id, (0.0, 0.0), false, today);
    }
    if let Some((id, offset)) = drag.visual_offset() {
        let id = id.to_string();
        render_ball(
            f,
            registry,
            config,
            &areas,
            &id,
            (offset.dx, offset.dy),
            true,
            today,
        );
    }
}

/// Draw one ball at its percentage position, plus an ephemeral pixel offset
/// while it is being dragged. The offset is render-only; the committed
/// position is untouched until the drop lands.
#[allow(clippy::too_many_arguments)]
fn render_ball(
    f: &mut Frame,
    registry: &Registry,
    config: &BoardConfig,
    areas: &[Rect; 3],
    id: &str,
    offset_px: (f64, f64),
    lifted: bool,
    today: NaiveDate,
) {
    let Some(ball) = registry.ball(id) else { return };
    let col_area = areas[ball.column.index()];
    if col_area.width < 3 || col_area.height < 3 {
        return;
    }

    // Keep balls inside the column border
    let inner = Rect::new(
        col_area.x + 1,
        col_area.y + 1,
        col_area.width - 2,
        col_area.height - 2,
    );

    let mut x = inner.x as f64 + ball.left_pct / 100.0 * inner.width as f64
        + offset_px.0 / config.cell_width_px;
    let mut y = inner.y as f64 + ball.top_pct / 100.0 * inner.height as f64
        + offset_px.1 / config.cell_height_px;
    x = x.clamp(inner.x as f64, (inner.x + inner.width - 1) as f64);
    y = y.clamp(inner.y as f64, (inner.y + inner.height - 1) as f64);

    let color = registry
        .task(id)
        .map(|t| Theme::ball_color(t.ball_color(today)))
        .unwrap_or(Theme::BALL_DEFAULT);

    let mut style = Style::default().fg(color);
    if lifted {
        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    } else if ball.fading_in() {
        style = style.add_modifier(Modifier::DIM);
    }

    let cell = Rect::new(x as u16, y as u16, 1, 1);
    f.render_widget(Paragraph::new(Span::styled(BALL_GLYPH, style)), cell);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_areas_cover_the_board() {
        let area = Rect::new(0, 0, 120, 40);
        let areas = column_areas(area);
        assert_eq!(areas[0].x, 0);
        assert_eq!(areas.iter().map(|a| a.width).sum::<u16>(), 120);
        assert!(areas.windows(2).all(|w| w[0].x + w[0].width == w[1].x));
        assert!(areas.iter().all(|a| a.height == 40));
    }

    #[test]
    fn test_column_areas_are_stable_for_same_input() {
        let area = Rect::new(0, 0, 97, 31);
        assert_eq!(column_areas(area), column_areas(area));
    }
}
