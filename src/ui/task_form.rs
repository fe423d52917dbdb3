use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use super::overlay_rect;
use crate::app::{FormField, TaskForm, TextBuffer};
use crate::board::TaskColor;

/// Render the new-task form overlay.
pub fn render_task_form(f: &mut Frame, area: Rect, form: &TaskForm) {
    let panel_area = overlay_rect(area);

    f.render_widget(Clear, panel_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            " Nueva tarea ",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(2, 2, 1, 1));

    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    if inner.height == 0 {
        return;
    }

    let mut lines = Vec::new();
    for (field, buf) in [
        (FormField::Subject, &form.subject),
        (FormField::Title, &form.title),
        (FormField::Description, &form.description),
        (FormField::Date, &form.date),
        (FormField::Time, &form.time),
    ] {
        lines.push(field_line(form, field, buf));
    }
    lines.push(color_line(form));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab siguiente · Enter crear · Esc cancelar",
        Theme::dim_style(),
    )));

    f.render_widget(Paragraph::new(lines), inner);

    // Place the terminal cursor inside the focused text field
    if let Some((row, buf)) = focused_row(form) {
        let label_width = label(form.focus).width() as u16 + 2;
        let cursor_x = inner.x + label_width + cursor_cell(buf);
        let cursor_y = inner.y + row;
        if cursor_x < inner.x + inner.width && cursor_y < inner.y + inner.height {
            f.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

fn label(field: FormField) -> String {
    format!("{:<20}", field.label())
}

fn field_line(form: &TaskForm, field: FormField, buf: &TextBuffer) -> Line<'static> {
    let focused = form.focus == field;
    let label_style = if focused {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    } else {
        Theme::dim_style()
    };
    Line::from(vec![
        Span::styled(label(field), label_style),
        Span::raw("  "),
        Span::styled(buf.input.clone(), Style::default().fg(Theme::FG)),
    ])
}

fn color_line(form: &TaskForm) -> Line<'static> {
    let focused = form.focus == FormField::Color;
    let label_style = if focused {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    } else {
        Theme::dim_style()
    };
    let mut spans = vec![Span::styled(label(FormField::Color), label_style), Span::raw("  ")];
    for (i, color) in TaskColor::ALL.iter().enumerate() {
        let selected = form.color == Some(*color);
        let ball = match color {
            TaskColor::Red => Theme::BALL_RED,
            TaskColor::Yellow => Theme::BALL_YELLOW,
            TaskColor::Green => Theme::BALL_GREEN,
        };
        let mut style = Style::default().fg(ball);
        if selected {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        spans.push(Span::styled(format!(" {} {} ", i + 1, color.display()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Row index (within the form body) and buffer of the focused text field.
fn focused_row(form: &TaskForm) -> Option<(u16, &TextBuffer)> {
    match form.focus {
        FormField::Subject => Some((0, &form.subject)),
        FormField::Title => Some((1, &form.title)),
        FormField::Description => Some((2, &form.description)),
        FormField::Date => Some((3, &form.date)),
        FormField::Time => Some((4, &form.time)),
        FormField::Color => None,
    }
}

/// Display column of the cursor, accounting for wide characters.
fn cursor_cell(buf: &TextBuffer) -> u16 {
    buf.input
        .chars()
        .take(buf.cursor)
        .collect::<String>()
        .width() as u16
}
