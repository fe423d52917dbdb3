//! Pointer-tracking state machine for the board.
//!
//! One session runs from pointer-down to pointer-up. A session that never
//! moves more than [`DRAG_THRESHOLD_PX`] on either axis resolves as a click;
//! once the threshold trips, the session is a drag for the rest of its life.
//! The visual follow offset is a render-only layer: it never feeds into the
//! committed placement, which is computed from the release point alone.

use crate::board::layout::Point;

/// Displacement (px on either axis) beyond which a session becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// A render-only translation, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug)]
struct DragSession {
    ball_id: String,
    origin: Point,
    dragging: bool,
    /// Latest not-yet-drawn follow offset; superseded by each later move.
    pending: Option<Offset>,
    /// Offset applied at the last drawn frame.
    applied: Offset,
}

/// How a pointer-up resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    /// Below the drag threshold for the whole session: open the detail
    /// view, leave the placement untouched.
    Click { ball_id: String },
    /// The session was a drag: hit-test `point` for a drop column.
    Drop { ball_id: String, point: Point },
    /// No session was active.
    Idle,
}

/// Owner of the single active drag session.
///
/// At most one session exists at a time; `begin` refuses a second grab, and
/// every `release` path clears the slot.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `ball_id` at the pointer-down position.
    /// Returns false if a session is already active.
    pub fn begin(&mut self, ball_id: impl Into<String>, origin: Point) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(DragSession {
            ball_id: ball_id.into(),
            origin,
            dragging: false,
            pending: None,
            applied: Offset::default(),
        });
        true
    }

    /// Feed a pointer move. The threshold check is one-way: once tripped it
    /// stays tripped for the session.
    pub fn update(&mut self, point: Point) {
        let Some(session) = self.session.as_mut() else { return };
        let dx = point.x - session.origin.x;
        let dy = point.y - session.origin.y;
        if dx.abs() > DRAG_THRESHOLD_PX || dy.abs() > DRAG_THRESHOLD_PX {
            session.dragging = true;
        }
        session.pending = Some(Offset { dx, dy });
    }

    /// Consume the coalesced follow offset for this frame, if a new one was
    /// scheduled since the last draw.
    pub fn take_frame_offset(&mut self) -> Option<Offset> {
        let session = self.session.as_mut()?;
        let offset = session.pending.take()?;
        session.applied = offset;
        Some(offset)
    }

    /// Resolve the session at pointer-up. The slot is cleared no matter how
    /// the session ends.
    pub fn release(&mut self, point: Point) -> Release {
        match self.session.take() {
            None => Release::Idle,
            Some(session) if session.dragging => Release::Drop {
                ball_id: session.ball_id,
                point,
            },
            Some(session) => Release::Click {
                ball_id: session.ball_id,
            },
        }
    }

    /// Id of the grabbed ball, while a session is active.
    pub fn active_ball(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.ball_id.as_str())
    }

    /// Applied follow offset for the grabbed ball, for rendering.
    pub fn visual_offset(&self) -> Option<(&str, Offset)> {
        self.session
            .as_ref()
            .map(|s| (s.ball_id.as_str(), s.applied))
    }

    /// Whether the active session has tripped the drag threshold.
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.dragging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_small_displacement_is_a_click() {
        let mut drag = DragController::new();
        assert!(drag.begin("ball-1", p(100.0, 100.0)));
        drag.update(p(105.0, 95.0));
        drag.update(p(100.0, 100.0));
        assert!(!drag.is_dragging());
        assert_eq!(
            drag.release(p(100.0, 100.0)),
            Release::Click { ball_id: "ball-1".into() }
        );
    }

    #[test]
    fn test_threshold_is_one_way() {
        let mut drag = DragController::new();
        drag.begin("ball-1", p(100.0, 100.0));
        drag.update(p(110.0, 100.0));
        assert!(drag.is_dragging());
        // Returning to the origin does not un-trip the threshold
        drag.update(p(100.0, 100.0));
        assert!(drag.is_dragging());
        assert_eq!(
            drag.release(p(100.0, 100.0)),
            Release::Drop { ball_id: "ball-1".into(), point: p(100.0, 100.0) }
        );
    }

    #[test]
    fn test_either_axis_trips_the_threshold() {
        let mut drag = DragController::new();
        drag.begin("ball-1", p(0.0, 0.0));
        drag.update(p(0.0, -6.0));
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_exactly_five_px_is_still_a_click() {
        let mut drag = DragController::new();
        drag.begin("ball-1", p(0.0, 0.0));
        drag.update(p(5.0, 5.0));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_single_session_slot() {
        let mut drag = DragController::new();
        assert!(drag.begin("ball-1", p(0.0, 0.0)));
        assert!(!drag.begin("ball-2", p(10.0, 10.0)));
        assert_eq!(drag.active_ball(), Some("ball-1"));
    }

    #[test]
    fn test_slot_clears_on_every_release_path() {
        let mut drag = DragController::new();
        drag.begin("ball-1", p(0.0, 0.0));
        drag.release(p(0.0, 0.0));
        assert_eq!(drag.active_ball(), None);

        drag.begin("ball-2", p(0.0, 0.0));
        drag.update(p(50.0, 0.0));
        drag.release(p(50.0, 0.0));
        assert_eq!(drag.active_ball(), None);

        assert_eq!(drag.release(p(0.0, 0.0)), Release::Idle);
    }

    #[test]
    fn test_follow_offset_is_coalesced() {
        let mut drag = DragController::new();
        drag.begin("ball-1", p(0.0, 0.0));
        drag.update(p(10.0, 0.0));
        drag.update(p(20.0, 5.0));
        // Only the latest scheduled offset survives to the frame
        assert_eq!(drag.take_frame_offset(), Some(Offset { dx: 20.0, dy: 5.0 }));
        // Nothing new scheduled since: no redundant redraw work
        assert_eq!(drag.take_frame_offset(), None);
        drag.update(p(30.0, 5.0));
        assert_eq!(drag.take_frame_offset(), Some(Offset { dx: 30.0, dy: 5.0 }));
    }

    #[test]
    fn test_visual_offset_tracks_applied_frame() {
        let mut drag = DragController::new();
        drag.begin("ball-1", p(0.0, 0.0));
        drag.update(p(8.0, 4.0));
        assert_eq!(drag.visual_offset(), Some(("ball-1", Offset::default())));
        drag.take_frame_offset();
        assert_eq!(drag.visual_offset(), Some(("ball-1", Offset { dx: 8.0, dy: 4.0 })));
    }

    #[test]
    fn test_moves_without_session_are_ignored() {
        let mut drag = DragController::new();
        drag.update(p(500.0, 500.0));
        assert_eq!(drag.take_frame_offset(), None);
        assert!(!drag.is_dragging());
    }
}
