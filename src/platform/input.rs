//! Pointer tracking
//!
//! Coordinates are surface-local pixels. Velocity is exponentially smoothed
//! across move events so a throw reflects the last few samples rather than a
//! single jittery one.

use glam::Vec2;

use crate::consts::POINTER_SMOOTHING;

#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    /// Latest pointer position
    pub pos: Vec2,
    /// Position at the end of the previous frame
    frame_start: Vec2,
    /// Smoothed per-event velocity
    velocity: Vec2,
    pub down: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer pressed at `pos`; does not count as movement
    pub fn press(&mut self, pos: Vec2) {
        self.pos = pos;
        self.frame_start = pos;
        self.down = true;
    }

    pub fn move_to(&mut self, pos: Vec2) {
        let delta = pos - self.pos;
        self.pos = pos;
        self.velocity = self.velocity * POINTER_SMOOTHING + delta * (1.0 - POINTER_SMOOTHING);
    }

    /// Pointer released or left the surface; velocity history is dropped
    pub fn release(&mut self) {
        self.down = false;
        self.velocity = Vec2::ZERO;
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Movement since the last `end_frame`
    #[inline]
    pub fn frame_delta(&self) -> Vec2 {
        self.pos - self.frame_start
    }

    pub fn end_frame(&mut self) {
        self.frame_start = self.pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_is_smoothed() {
        let mut p = PointerTracker::new();
        p.press(Vec2::ZERO);
        p.move_to(Vec2::new(10.0, 0.0));
        // 0.6 * 0 + 0.4 * 10
        assert!((p.velocity().x - 4.0).abs() < 1e-5);
        p.move_to(Vec2::new(20.0, 0.0));
        // 0.6 * 4 + 0.4 * 10
        assert!((p.velocity().x - 6.4).abs() < 1e-5);
    }

    #[test]
    fn test_release_resets_velocity() {
        let mut p = PointerTracker::new();
        p.press(Vec2::ZERO);
        p.move_to(Vec2::new(5.0, 5.0));
        p.release();
        assert_eq!(p.velocity(), Vec2::ZERO);
        assert!(!p.down);
    }

    #[test]
    fn test_frame_delta() {
        let mut p = PointerTracker::new();
        p.press(Vec2::new(1.0, 1.0));
        assert_eq!(p.frame_delta(), Vec2::ZERO);
        p.move_to(Vec2::new(4.0, 5.0));
        p.move_to(Vec2::new(7.0, 9.0));
        assert_eq!(p.frame_delta(), Vec2::new(6.0, 8.0));
        p.end_frame();
        assert_eq!(p.frame_delta(), Vec2::ZERO);
    }
}
