//! Task-description renderer: markdown in, styled lines out.
//!
//! Small event-stream walk over pulldown-cmark with a style stack. The
//! `breaks` option treats a single newline as a hard break, matching how
//! task descriptions are written in the form.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::theme::Theme;

/// Render a markdown string into styled lines.
pub fn render(markdown: &str, breaks: bool) -> Vec<Line<'static>> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
    let mut state = RenderState::new(breaks);
    for event in parser {
        state.handle(event);
    }
    state.finish()
}

struct RenderState {
    breaks: bool,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    stack: Vec<Modifier>,
    list_depth: usize,
}

impl RenderState {
    fn new(breaks: bool) -> Self {
        Self {
            breaks,
            lines: Vec::new(),
            current: Vec::new(),
            stack: Vec::new(),
            list_depth: 0,
        }
    }

    fn style(&self) -> Style {
        self.stack
            .iter()
            .fold(Style::default().fg(Theme::FG), |s, m| s.add_modifier(*m))
    }

    fn flush_line(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn blank_line(&mut self) {
        if !self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.push(Line::from(""));
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                if !self.lines.is_empty() {
                    self.blank_line();
                }
                self.stack.push(Modifier::BOLD);
                if level <= HeadingLevel::H2 {
                    self.stack.push(Modifier::UNDERLINED);
                }
            }
            Event::End(TagEnd::Heading(level)) => {
                self.stack.pop();
                if level <= HeadingLevel::H2 {
                    self.stack.pop();
                }
                self.flush_line();
            }
            Event::Start(Tag::Paragraph) => {
                if !self.lines.is_empty() {
                    self.blank_line();
                }
            }
            Event::End(TagEnd::Paragraph) => self.flush_line(),
            Event::Start(Tag::Emphasis) => self.stack.push(Modifier::ITALIC),
            Event::End(TagEnd::Emphasis) => {
                self.stack.pop();
            }
            Event::Start(Tag::Strong) => self.stack.push(Modifier::BOLD),
            Event::End(TagEnd::Strong) => {
                self.stack.pop();
            }
            Event::Start(Tag::Strikethrough) => self.stack.push(Modifier::CROSSED_OUT),
            Event::End(TagEnd::Strikethrough) => {
                self.stack.pop();
            }
            Event::Start(Tag::List(_)) => {
                if self.list_depth == 0 && !self.lines.is_empty() {
                    self.blank_line();
                }
                self.list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => {
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.current
                    .push(Span::styled(format!("{indent}• "), Theme::dim_style()));
            }
            Event::End(TagEnd::Item) => self.flush_line(),
            Event::Start(Tag::CodeBlock(_)) => {
                self.blank_line();
                self.stack.push(Modifier::DIM);
            }
            Event::End(TagEnd::CodeBlock) => {
                self.stack.pop();
                if !self.current.is_empty() {
                    self.flush_line();
                }
            }
            Event::Text(text) => {
                let style = self.style();
                let mut parts = text.split('\n').peekable();
                while let Some(part) = parts.next() {
                    if !part.is_empty() {
                        self.current.push(Span::styled(part.to_string(), style));
                    }
                    if parts.peek().is_some() {
                        self.flush_line();
                    }
                }
            }
            Event::Code(code) => {
                self.current.push(Span::styled(
                    code.to_string(),
                    self.style().add_modifier(Modifier::REVERSED),
                ));
            }
            Event::SoftBreak => {
                if self.breaks {
                    self.flush_line();
                } else {
                    self.current.push(Span::styled(" ".to_string(), self.style()));
                }
            }
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.blank_line();
                self.lines
                    .push(Line::from(Span::styled("───", Theme::dim_style())));
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.current.is_empty() {
            self.flush_line();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect()
    }

    #[test]
    fn test_breaks_option_splits_single_newlines() {
        let with_breaks = render("uno\ndos", true);
        assert_eq!(plain(&with_breaks), vec!["uno", "dos"]);

        let without = render("uno\ndos", false);
        assert_eq!(plain(&without), vec!["uno dos"]);
    }

    #[test]
    fn test_strong_text_is_bold() {
        let lines = render("una **bola** roja", true);
        let bold = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "bola")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_list_items_get_bullets() {
        let lines = render("- uno\n- dos", true);
        let text = plain(&lines);
        assert!(text.iter().any(|l| l.starts_with("• uno")));
        assert!(text.iter().any(|l| l.starts_with("• dos")));
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let lines = render("uno\n\ndos", true);
        assert_eq!(plain(&lines), vec!["uno", "", "dos"]);
    }

    #[test]
    fn test_plain_text_survives_unstyled() {
        let lines = render("sin adornos", true);
        assert_eq!(plain(&lines), vec!["sin adornos"]);
    }
}
