//! Bubble Fidget - soft-body bubble physics for a 2D canvas
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bubbles, dots, collisions, gestures)
//! - `renderer`: Pure conversion of world state into draw primitives
//! - `platform`: Host abstraction (pointer tracking, timers, frame scheduling)
//! - `settings`: Host-provided configuration record
//! - `engine`: Ties everything together behind a start/stop interface

pub mod engine;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use engine::Engine;
pub use settings::BubbleSettings;

use glam::Vec2;

/// Tuned simulation constants.
///
/// All velocities are in pixels per frame; the engine steps once per host
/// frame with no variable timestep.
pub mod consts {
    /// Radius of every rendered dot
    pub const DOT_RADIUS: f32 = 5.0;
    /// Arc length between neighbouring dots on a ring
    pub const DOT_SPACING: f32 = DOT_RADIUS * 1.2;
    /// Minimum dots per bubble regardless of radius
    pub const MIN_DOTS: usize = 12;
    /// Per-dot mass jitter range [1.0, 1.0 + MASS_JITTER)
    pub const MASS_JITTER: f32 = 0.2;

    /// Initial population radius range
    pub const SPAWN_RADIUS_MIN: f32 = 15.0;
    pub const SPAWN_RADIUS_RANGE: f32 = 20.0;
    pub const SPAWN_VEL_JITTER: f32 = 4.0;
    /// Pointer-spawned bubble radius range
    pub const SPAWN_AT_RADIUS_MIN: f32 = 12.0;
    pub const SPAWN_AT_RADIUS_RANGE: f32 = 18.0;
    pub const SPAWN_AT_VEL_JITTER: f32 = 3.0;

    /// Free bubble: fraction of configured gravity applied to the center
    pub const CENTER_GRAVITY: f32 = 0.25;
    /// Free bubble: per-frame center velocity retention
    pub const CENTER_DAMPING: f32 = 0.985;
    /// Wall spring stiffness (velocity per pixel of penetration)
    pub const WALL_STIFFNESS: f32 = 0.3;
    /// Fraction of penetration corrected per frame
    pub const WALL_CORRECTION: f32 = 0.5;
    pub const WALL_DAMPING: f32 = 0.8;
    pub const WALL_BOUNCE_SIDE: f32 = 1.2;
    pub const WALL_BOUNCE_FLOOR: f32 = 1.3;
    /// Upper bound on center speed after wall response
    pub const MAX_CENTER_SPEED: f32 = 60.0;

    /// Dragged bubble: center still sags under this fraction of gravity
    pub const DRAG_GRAVITY: f32 = 0.15;
    /// Dragged bubble: pull toward pointer target
    pub const DRAG_PULL: f32 = 0.15;
    /// Dragged bubble: weight of previous velocity (lower = lighter)
    pub const DRAG_INERTIA: f32 = 0.75;

    /// Formation spring: base + bounce * scale
    pub const SPRING_BASE: f32 = 0.003;
    pub const SPRING_BOUNCE_SCALE: f32 = 0.015;
    /// Distance from a wall where dots start getting pushed back
    pub const DOT_WALL_MARGIN: f32 = 10.0;
    pub const DOT_WALL_PUSH: f32 = 0.1;
    pub const DOT_FLOOR_PUSH: f32 = 0.15;
    /// Scale from wall push to formation target offset
    pub const DOT_WALL_OFFSET: f32 = 20.0;
    pub const DOT_GRAVITY_FREE: f32 = 0.08;
    pub const DOT_DAMPING_FREE: f32 = 0.92;
    pub const DOT_GRAVITY_DRAGGED: f32 = 0.06;
    pub const DOT_SAG: f32 = 0.5;
    pub const DOT_SAG_GRAVITY: f32 = 0.1;
    pub const DOT_DAMPING_DRAGGED: f32 = 0.88;

    /// Bubble-bubble: distance beyond contact where pre-squish starts
    pub const PRE_CONTACT_MARGIN: f32 = 2.0;
    /// Bubble-bubble: falloff distance for pre-squish force
    pub const PRE_CONTACT_FALLOFF: f32 = 20.0;
    pub const PRE_CONTACT_FORCE: f32 = 0.12;
    /// Extra pre-squish reach for the earlier bubble of a pair
    pub const PRE_CONTACT_REACH: f32 = 5.0;
    pub const BUBBLE_RESTITUTION: f32 = 0.7;

    /// Exploding dots: gravity fraction while airborne
    pub const BURST_GRAVITY: f32 = 0.25;
    pub const BURST_WALL_BOUNCE: f32 = 0.8;
    /// Landing: horizontal friction and vertical rebound factors (times bounce)
    pub const LAND_FRICTION: f32 = 0.7;
    pub const LAND_REBOUND: f32 = 0.3;
    pub const GROUND_FRICTION: f32 = 0.95;
    pub const GROUND_WALL_BOUNCE: f32 = 0.5;
    /// Frames a grounded dot lingers before fading
    pub const GROUND_LINGER_FRAMES: u32 = 300;
    pub const FADE_RATE: f32 = 0.005;
    /// Exploding dot vs bubble: fraction of dot speed given to the bubble
    pub const DOT_PUSH_FACTOR: f32 = 0.1;
    /// Exploding dot vs dot restitution (times bounce)
    pub const DOT_RESTITUTION: f32 = 0.7;

    /// Blow gesture radius and gains
    pub const BLOW_RADIUS: f32 = 220.0;
    pub const BLOW_CENTER_GAIN: f32 = 1.2;
    pub const BLOW_DOT_GAIN: f32 = 0.3;
    pub const BLOW_JITTER: f32 = 0.2;
    pub const BLOW_PULSE_GAIN: f32 = 0.05;
    pub const BLOW_PULSE_MAX: f32 = 0.3;

    /// Pop blast on neighbouring bubbles
    pub const BLAST_RADIUS: f32 = 120.0;
    pub const BLAST_FORCE_GAIN: f32 = 1.5;
    pub const BLAST_CENTER_GAIN: f32 = 0.8;
    pub const BLAST_DOT_GAIN: f32 = 0.3;
    /// Explosion speed = blow * (BASE + rand * RANDOM), plus JITTER per axis
    pub const BURST_BASE: f32 = 0.15;
    pub const BURST_RANDOM: f32 = 0.1;
    pub const BURST_JITTER: f32 = 0.2;

    /// Drag deformation
    pub const DEFORM_MAX: f32 = 0.6;
    pub const DEFORM_SPEED_GAIN: f32 = 0.04;
    pub const DEFORM_ACCEL_GAIN: f32 = 0.03;
    pub const DEFORM_THRESHOLD: f32 = 0.1;
    pub const DEFORM_WOBBLE: f32 = 0.1;
    pub const DEFORM_WOBBLE_DISTANCE: f32 = 5.0;
    pub const DEFORM_DECAY: f32 = 0.9;

    /// Throw momentum
    pub const THROW_MULTIPLIER: f32 = 1.5;
    pub const POINTER_SMOOTHING: f32 = 0.6;

    /// Gesture timing (milliseconds)
    pub const DOUBLE_CLICK_MS: f64 = 300.0;
    pub const CLICK_DEFER_MS: f64 = 250.0;
    pub const SPAWN_INTERVAL_MS: f64 = 200.0;
    pub const SPAWN_SCATTER: f32 = 60.0;

    /// Glow pass for dragged bubbles
    pub const GLOW_BLUR: f32 = 6.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing at `theta`
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Direction and length of `delta`, with +X as the fallback direction when
/// the two points coincide
#[inline]
pub fn safe_normal(delta: Vec2) -> (Vec2, f32) {
    let dist = delta.length();
    if dist > f32::EPSILON {
        (delta / dist, dist)
    } else {
        (Vec2::X, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        // 3π lands on the ±π seam; either side is the same direction
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_safe_normal_coincident_points() {
        let (n, d) = safe_normal(Vec2::ZERO);
        assert_eq!(n, Vec2::X);
        assert_eq!(d, 0.0);

        let (n, d) = safe_normal(Vec2::new(0.0, -4.0));
        assert!((n - Vec2::NEG_Y).length() < 1e-6);
        assert!((d - 4.0).abs() < 1e-6);
    }
}
