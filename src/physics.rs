//! Decorative free-body ball simulation for small viewports.
//!
//! Fully independent of the board: it shares only the resize lifecycle.
//! Walls are perfectly elastic (restitution 1) and a grabbed ball carries
//! its last sampled displacement as throw velocity on release.

use rand::Rng;

use crate::board::layout::Point;

pub const BALL_COUNT: usize = 12;
pub const BALL_RADIUS: f64 = 50.0;
/// Palette indices map to colors in the UI theme
/// (#5DDB89, #FF5252, #FFE55C).
pub const PALETTE_SIZE: u8 = 3;

/// One free-floating ball.
#[derive(Debug, Clone)]
pub struct FloatingBall {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub color: u8,
    pub dragging: bool,
    last_x: f64,
    last_y: f64,
}

impl FloatingBall {
    pub fn new(x: f64, y: f64, radius: f64, color: u8, vx: f64, vy: f64) -> Self {
        Self { x, y, vx, vy, radius, color, dragging: false, last_x: x, last_y: y }
    }

    /// One integration step inside a `width` × `height` box. Skipped while
    /// the ball is held.
    fn update(&mut self, width: f64, height: f64) {
        if self.dragging {
            return;
        }
        self.x += self.vx;
        self.y += self.vy;

        if self.x + self.radius > width {
            self.x = width - self.radius;
            self.vx = -self.vx;
        } else if self.x - self.radius < 0.0 {
            self.x = self.radius;
            self.vx = -self.vx;
        }

        if self.y + self.radius > height {
            self.y = height - self.radius;
            self.vy = -self.vy;
        } else if self.y - self.radius < 0.0 {
            self.y = self.radius;
            self.vy = -self.vy;
        }
    }
}

/// The simulation box: ball set, viewport size, breakpoint gate, and the
/// pointer-drag override.
#[derive(Debug)]
pub struct Playground {
    width: f64,
    height: f64,
    breakpoint: f64,
    running: bool,
    balls: Vec<FloatingBall>,
    drag_held: bool,
}

impl Playground {
    pub fn new(breakpoint: f64) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            breakpoint,
            running: false,
            balls: Vec::new(),
            drag_held: false,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn balls(&self) -> &[FloatingBall] {
        &self.balls
    }

    /// Viewport resize: crossing the breakpoint starts or stops the
    /// animation; every (re)start regenerates the ball set from scratch.
    pub fn resize(&mut self, width: f64, height: f64, rng: &mut impl Rng) {
        self.width = width;
        self.height = height;

        if width <= self.breakpoint {
            if !self.running {
                self.spawn_balls(rng);
                self.running = true;
            }
        } else if self.running {
            self.running = false;
            self.drag_held = false;
        }
    }

    fn spawn_balls(&mut self, rng: &mut impl Rng) {
        self.balls.clear();
        self.drag_held = false;
        for _ in 0..BALL_COUNT {
            let radius = BALL_RADIUS;
            let x = if self.width > radius * 2.0 {
                rng.gen_range(radius..self.width - radius)
            } else {
                self.width / 2.0
            };
            let y = if self.height > radius * 2.0 {
                rng.gen_range(radius..self.height - radius)
            } else {
                self.height / 2.0
            };
            let color = rng.gen_range(0..PALETTE_SIZE);
            let vx = (rng.gen::<f64>() - 0.5) * 1.0;
            let vy = (rng.gen::<f64>() - 0.5) * 1.0;
            self.balls.push(FloatingBall::new(x, y, radius, color, vx, vy));
        }
    }

    /// One animation frame.
    pub fn update(&mut self) {
        if !self.running {
            return;
        }
        for ball in &mut self.balls {
            ball.update(self.width, self.height);
        }
    }

    /// Pointer-down: grab the topmost ball within its radius of the
    /// pointer and promote it to the top of the draw/update order.
    pub fn pointer_down(&mut self, p: Point) -> bool {
        if !self.running || self.drag_held {
            return false;
        }
        for i in (0..self.balls.len()).rev() {
            let ball = &self.balls[i];
            let dist = ((p.x - ball.x).powi(2) + (p.y - ball.y).powi(2)).sqrt();
            if dist < ball.radius {
                let mut held = self.balls.remove(i);
                held.dragging = true;
                held.last_x = p.x;
                held.last_y = p.y;
                self.balls.push(held);
                self.drag_held = true;
                return true;
            }
        }
        false
    }

    /// Pointer-move: velocity becomes the displacement since the last
    /// sample, so release imparts the last-known throw velocity.
    pub fn pointer_move(&mut self, p: Point) {
        if !self.drag_held {
            return;
        }
        if let Some(ball) = self.balls.last_mut() {
            ball.vx = p.x - ball.last_x;
            ball.vy = p.y - ball.last_y;
            ball.x = p.x;
            ball.y = p.y;
            ball.last_x = p.x;
            ball.last_y = p.y;
        }
    }

    /// Pointer-up: normal integration resumes with the throw velocity.
    pub fn pointer_up(&mut self) {
        if !self.drag_held {
            return;
        }
        if let Some(ball) = self.balls.last_mut() {
            ball.dragging = false;
        }
        self.drag_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn running_playground(width: f64, height: f64) -> Playground {
        let mut pg = Playground::new(768.0);
        pg.resize(width, height, &mut rng());
        assert!(pg.running());
        pg
    }

    #[test]
    fn test_left_wall_clamps_and_reflects() {
        let mut ball = FloatingBall::new(40.0, 300.0, 50.0, 0, -3.0, 0.0);
        ball.update(800.0, 600.0);
        assert_eq!(ball.x, 50.0);
        assert_eq!(ball.vx, 3.0);
    }

    #[test]
    fn test_right_wall_clamps_and_reflects() {
        let mut ball = FloatingBall::new(760.0, 300.0, 50.0, 0, 4.0, 0.0);
        ball.update(800.0, 600.0);
        assert_eq!(ball.x, 750.0);
        assert_eq!(ball.vx, -4.0);
    }

    #[test]
    fn test_vertical_walls_reflect_vy() {
        let mut ball = FloatingBall::new(400.0, 555.0, 50.0, 0, 0.0, 2.0);
        ball.update(800.0, 600.0);
        assert_eq!(ball.y, 550.0);
        assert_eq!(ball.vy, -2.0);

        let mut ball = FloatingBall::new(400.0, 45.0, 50.0, 0, 0.0, -2.0);
        ball.update(800.0, 600.0);
        assert_eq!(ball.y, 50.0);
        assert_eq!(ball.vy, 2.0);
    }

    #[test]
    fn test_speed_is_preserved_across_bounces() {
        let mut ball = FloatingBall::new(55.0, 300.0, 50.0, 0, -3.0, 1.0);
        for _ in 0..1000 {
            ball.update(800.0, 600.0);
        }
        assert_eq!(ball.vx.abs(), 3.0);
        assert_eq!(ball.vy.abs(), 1.0);
    }

    #[test]
    fn test_dragged_ball_skips_integration() {
        let mut ball = FloatingBall::new(100.0, 100.0, 50.0, 0, 5.0, 5.0);
        ball.dragging = true;
        ball.update(800.0, 600.0);
        assert_eq!((ball.x, ball.y), (100.0, 100.0));
    }

    #[test]
    fn test_breakpoint_gates_the_loop() {
        let mut pg = Playground::new(768.0);
        let mut r = rng();

        pg.resize(1024.0, 600.0, &mut r);
        assert!(!pg.running());
        assert!(pg.balls().is_empty());

        pg.resize(768.0, 600.0, &mut r);
        assert!(pg.running());
        assert_eq!(pg.balls().len(), BALL_COUNT);

        pg.resize(769.0, 600.0, &mut r);
        assert!(!pg.running());
    }

    #[test]
    fn test_restart_regenerates_balls() {
        let mut pg = Playground::new(768.0);
        let mut r = rng();
        pg.resize(700.0, 600.0, &mut r);
        let first: Vec<(f64, f64)> = pg.balls().iter().map(|b| (b.x, b.y)).collect();

        pg.resize(900.0, 600.0, &mut r);
        pg.resize(700.0, 600.0, &mut r);
        let second: Vec<(f64, f64)> = pg.balls().iter().map(|b| (b.x, b.y)).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn test_resize_within_breakpoint_keeps_balls() {
        let mut pg = running_playground(700.0, 600.0);
        let before: Vec<(f64, f64)> = pg.balls().iter().map(|b| (b.x, b.y)).collect();
        pg.resize(650.0, 500.0, &mut rng());
        let after: Vec<(f64, f64)> = pg.balls().iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_pick_up_promotes_and_throws() {
        let mut pg = running_playground(700.0, 600.0);
        // The topmost ball always wins the hit test at its own center
        let target = pg.balls().last().unwrap().clone();

        assert!(pg.pointer_down(Point::new(target.x, target.y)));
        assert!(pg.balls().last().unwrap().dragging);

        pg.pointer_move(Point::new(target.x + 10.0, target.y - 4.0));
        pg.pointer_move(Point::new(target.x + 25.0, target.y - 10.0));
        pg.pointer_up();

        let thrown = pg.balls().last().unwrap();
        assert!(!thrown.dragging);
        // Throw velocity = displacement between the last two samples
        assert_eq!(thrown.vx, 15.0);
        assert_eq!(thrown.vy, -6.0);
        assert_eq!((thrown.x, thrown.y), (target.x + 25.0, target.y - 10.0));
    }

    #[test]
    fn test_pointer_down_misses_outside_radius() {
        let mut pg = running_playground(700.0, 600.0);
        // No ball can be at a point outside the box
        assert!(!pg.pointer_down(Point::new(-200.0, -200.0)));
        assert!(pg.balls().iter().all(|b| !b.dragging));
    }

    #[test]
    fn test_moves_while_not_held_are_ignored() {
        let mut pg = running_playground(700.0, 600.0);
        let before: Vec<(f64, f64)> = pg.balls().iter().map(|b| (b.x, b.y)).collect();
        pg.pointer_move(Point::new(10.0, 10.0));
        pg.pointer_up();
        let after: Vec<(f64, f64)> = pg.balls().iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(before, after);
    }
}
