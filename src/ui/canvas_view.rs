use ratatui::layout::Rect;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle};
use ratatui::Frame;

use super::theme::Theme;
use crate::physics::Playground;

/// Render the decorative ball pit over the whole board area.
///
/// The canvas y axis grows upward while the simulation's grows downward,
/// so y is flipped at draw time.
pub fn render_canvas(f: &mut Frame, area: Rect, playground: &Playground) {
    let (width, height) = playground.size();
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for ball in playground.balls() {
                ctx.draw(&Circle {
                    x: ball.x,
                    y: height - ball.y,
                    radius: ball.radius,
                    color: Theme::canvas_color(ball.color),
                });
            }
        });
    f.render_widget(canvas, area);
}
