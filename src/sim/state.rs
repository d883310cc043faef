//! World state and core simulation types
//!
//! The World is the entity store: an ordered list of Bubbles, each exclusively
//! owning its ring of Dots. Every step function takes it explicitly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::unit_from_angle;

/// Lifecycle of a single dot
///
/// Transitions only move forward: Formed -> Airborne -> Grounded -> Faded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DotState {
    /// Part of an intact bubble, spring-pulled toward its formation target
    Formed,
    /// Flying free after a pop
    Airborne,
    /// Resting on the floor; fades once `ground_ticks` passes the linger time
    Grounded { ground_ticks: u32 },
    /// Fully transparent and inert
    Faded,
}

/// A point mass on a bubble's ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub pos: Vec2,
    /// Formation velocity (used while Formed)
    pub vel: Vec2,
    /// Anchor angle on the ring, fixed at creation
    rest_angle: f32,
    pub state: DotState,
    /// Explosion velocity (used once the dot leaves Formed)
    pub burst_vel: Vec2,
    pub opacity: f32,
    /// Fixed mass jitter in [1.0, 1.2)
    pub mass: f32,
}

impl Dot {
    pub fn new(center: Vec2, radius: f32, rest_angle: f32, mass: f32) -> Self {
        Self {
            pos: center + unit_from_angle(rest_angle) * radius,
            vel: Vec2::ZERO,
            rest_angle,
            state: DotState::Formed,
            burst_vel: Vec2::ZERO,
            opacity: 1.0,
            mass,
        }
    }

    #[inline]
    pub fn rest_angle(&self) -> f32 {
        self.rest_angle
    }

    #[inline]
    pub fn is_formed(&self) -> bool {
        self.state == DotState::Formed
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        self.state == DotState::Airborne
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Where the formation spring pulls this dot for the given bubble shape
    #[inline]
    pub fn formation_target(&self, center: Vec2, radius: f32) -> Vec2 {
        center + unit_from_angle(self.rest_angle) * radius
    }

    /// Formed -> Airborne. Returns false (and changes nothing) for any other state.
    pub fn explode(&mut self, burst_vel: Vec2) -> bool {
        if !self.is_formed() {
            return false;
        }
        self.state = DotState::Airborne;
        self.burst_vel = burst_vel;
        true
    }

    /// Airborne -> Grounded, with a soft bounce and floor friction
    pub fn land(&mut self, bounce: f32) -> bool {
        if !self.is_airborne() {
            return false;
        }
        self.burst_vel.x *= bounce * LAND_FRICTION;
        self.burst_vel.y = -self.burst_vel.y.abs() * bounce * LAND_REBOUND;
        self.state = DotState::Grounded { ground_ticks: 0 };
        true
    }

    /// Advance the ground timer and fade once lingering is over.
    /// Grounded -> Faded when opacity reaches zero.
    pub fn linger(&mut self) {
        let DotState::Grounded { ground_ticks } = &mut self.state else {
            return;
        };
        *ground_ticks += 1;
        if *ground_ticks <= GROUND_LINGER_FRAMES {
            return;
        }
        self.opacity = (self.opacity - FADE_RATE).max(0.0);
        if self.opacity <= 0.0 {
            self.state = DotState::Faded;
        }
    }
}

/// A soft-body bubble: aggregate center plus a ring of dots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
    /// Pointer-to-center offset while dragged; `None` when free
    pub drag_offset: Option<Vec2>,
    /// Visual elongation along `rotation` and across it. Not drawn by
    /// `render`; exposed for hosts that draw a stretched body.
    pub deform_x: f32,
    pub deform_y: f32,
    pub rotation: f32,
    pub dots: Vec<Dot>,
}

impl Bubble {
    /// Build a bubble with `dot_count` evenly spaced dots on its ring
    pub fn new<R: Rng>(
        id: u32,
        pos: Vec2,
        radius: f32,
        color: u32,
        dot_count: usize,
        rng: &mut R,
    ) -> Self {
        let dot_count = dot_count.max(MIN_DOTS);
        let dots = (0..dot_count)
            .map(|i| {
                let angle = i as f32 / dot_count as f32 * std::f32::consts::TAU;
                let mass = 1.0 + rng.random::<f32>() * MASS_JITTER;
                Dot::new(pos, radius, angle, mass)
            })
            .collect();

        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            color,
            drag_offset: None,
            deform_x: 0.0,
            deform_y: 0.0,
            rotation: 0.0,
            dots,
        }
    }

    /// Dots needed to keep visual density constant around the circumference
    pub fn dot_count_for_radius(radius: f32) -> usize {
        let circumference = std::f32::consts::TAU * radius;
        ((circumference / DOT_SPACING).floor() as usize).max(MIN_DOTS)
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Still has its body (has not been popped)
    pub fn is_intact(&self) -> bool {
        self.dots.iter().any(Dot::is_formed)
    }

    /// At least one dot still visible
    pub fn is_alive(&self) -> bool {
        self.dots.iter().any(Dot::is_visible)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.pos).length() <= self.radius
    }

    /// Start dragging, remembering the offset from pointer to center
    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.drag_offset = Some(self.pos - pointer);
    }

    pub fn end_drag(&mut self) {
        self.drag_offset = None;
    }

    /// Pull center and dots back onto the surface after a resize
    pub fn clamp_into(&mut self, bounds: Bounds) {
        self.pos = bounds.clamp_circle(self.pos, self.radius);
        for dot in &mut self.dots {
            dot.pos = bounds.clamp_circle(dot.pos, DOT_RADIUS);
        }
    }
}

/// Drawing surface extent in local pixels, origin top-left, +Y down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Degenerate sizes are clamped to a 1x1 surface
    pub fn new(width: f32, height: f32) -> Self {
        let sane = |v: f32| if v.is_finite() { v.max(1.0) } else { 1.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    /// Clamp a circle's center so it lies inside the surface. Circles larger
    /// than the surface are centered on that axis.
    pub fn clamp_circle(&self, pos: Vec2, radius: f32) -> Vec2 {
        let axis = |v: f32, extent: f32| {
            if radius * 2.0 >= extent {
                extent / 2.0
            } else {
                v.clamp(radius, extent - radius)
            }
        };
        Vec2::new(axis(pos.x, self.width), axis(pos.y, self.height))
    }
}

/// RNG state wrapper so a run can be replayed from its seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// The live entity store
#[derive(Debug, Clone)]
pub struct World {
    pub rng_state: RngState,
    pub bounds: Bounds,
    /// Live bubbles in creation order (ids ascending)
    pub bubbles: Vec<Bubble>,
    /// Frames stepped since creation
    pub time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64, bounds: Bounds) -> Self {
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        Self {
            rng_state,
            bounds,
            bubbles: Vec::new(),
            time_ticks: 0,
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Bubbles and RNG borrowed together
    pub fn parts_mut(&mut self) -> (&mut [Bubble], &mut Pcg32) {
        (self.bubbles.as_mut_slice(), &mut self.rng)
    }

    pub fn bubble(&self, id: u32) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn bubble_mut(&mut self, id: u32) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|b| b.id == id)
    }

    /// First intact bubble under the pointer
    pub fn bubble_at(&self, point: Vec2) -> Option<u32> {
        self.bubbles
            .iter()
            .find(|b| b.is_intact() && b.contains(point))
            .map(|b| b.id)
    }

    /// Drop every bubble whose dots have all faded. Returns how many went.
    pub fn cull(&mut self) -> usize {
        let before = self.bubbles.len();
        self.bubbles.retain(Bubble::is_alive);
        before - self.bubbles.len()
    }

    /// Adopt new surface bounds, pulling every entity back on-surface
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        for bubble in &mut self.bubbles {
            bubble.clamp_into(bounds);
        }
    }

    /// Total dots still visible across all bubbles
    pub fn visible_dots(&self) -> usize {
        self.bubbles
            .iter()
            .map(|b| b.dots.iter().filter(|d| d.is_visible()).count())
            .sum()
    }
}
