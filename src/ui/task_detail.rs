use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Clear, Padding, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
};
use ratatui::layout::{Margin, Rect};
use ratatui::Frame;

use super::theme::Theme;
use super::{markdown, overlay_rect};
use crate::board::Task;

/// Render the read-only task detail overlay.
pub fn render_task_detail(f: &mut Frame, area: Rect, task: &Task, scroll: u16) {
    let panel_area = overlay_rect(area);

    f.render_widget(Clear, panel_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            format!(" {} ", task.subject),
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(2, 2, 1, 1));

    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    if inner.height == 0 {
        return;
    }

    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        task.title.clone(),
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Fecha:   ", Theme::dim_style()),
        Span::raw(task.due_date.clone()),
    ]));
    if let Some(url) = &task.file_url {
        lines.push(Line::from(vec![
            Span::styled("Archivo: ", Theme::dim_style()),
            Span::styled(url.clone(), Style::default().add_modifier(Modifier::UNDERLINED)),
        ]));
    }
    if let Some(url) = &task.task_url {
        lines.push(Line::from(vec![
            Span::styled("Tarea:   ", Theme::dim_style()),
            Span::styled(url.clone(), Style::default().add_modifier(Modifier::UNDERLINED)),
        ]));
    }
    lines.push(Line::from(""));

    // Description, rendered as markdown with single newlines as breaks
    lines.extend(markdown::render(&task.description, true));

    let total = lines.len();
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, inner);

    // Scrollbar only when the content can actually scroll
    if total > inner.height as usize {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(inner.height as usize))
                .position(scroll as usize);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            panel_area.inner(Margin { vertical: 1, horizontal: 0 }),
            &mut scrollbar_state,
        );
    }
}
