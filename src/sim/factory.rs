//! Bubble construction
//!
//! Two spawn profiles: the initial population scattered over the surface, and
//! smaller bubbles blown at the pointer while the user holds a double-click.

use glam::Vec2;
use rand::Rng;

use super::state::{Bounds, Bubble, World};
use crate::consts::*;

/// Bubble colours (violet, cyan, emerald, amber, red, pink)
pub const PALETTE: [u32; 6] = [0x8b5cf6, 0x06b6d4, 0x10b981, 0xf59e0b, 0xef4444, 0xec4899];

fn random_color<R: Rng>(rng: &mut R) -> u32 {
    PALETTE[rng.random_range(0..PALETTE.len())]
}

/// Symmetric jitter in [-amount/2, amount/2) per axis
pub(crate) fn jitter<R: Rng>(rng: &mut R, amount: f32) -> Vec2 {
    Vec2::new(
        (rng.random::<f32>() - 0.5) * amount,
        (rng.random::<f32>() - 0.5) * amount,
    )
}

/// Spawn a bubble at a random position inside `bounds`
pub fn create_bubble(world: &mut World, bounds: Bounds) -> Bubble {
    let id = world.next_entity_id();
    let rng = world.rng();

    let radius = rng.random::<f32>() * SPAWN_RADIUS_RANGE + SPAWN_RADIUS_MIN;
    // Inset by radius; a surface narrower than the bubble pins it to the middle
    let span = |extent: f32| (extent - radius * 2.0).max(0.0);
    let pos = Vec2::new(
        rng.random::<f32>() * span(bounds.width) + radius,
        rng.random::<f32>() * span(bounds.height) + radius,
    );
    let pos = bounds.clamp_circle(pos, radius);

    let color = random_color(rng);
    let mut bubble = Bubble::new(id, pos, radius, color, Bubble::dot_count_for_radius(radius), rng);
    bubble.vel = jitter(rng, SPAWN_VEL_JITTER);
    bubble
}

/// Spawn a bubble centered at `pos`, clamped into `bounds`
pub fn create_bubble_at(world: &mut World, pos: Vec2, bounds: Bounds) -> Bubble {
    let id = world.next_entity_id();
    let rng = world.rng();

    let radius = rng.random::<f32>() * SPAWN_AT_RADIUS_RANGE + SPAWN_AT_RADIUS_MIN;
    let pos = bounds.clamp_circle(pos, radius);

    let color = random_color(rng);
    let mut bubble = Bubble::new(id, pos, radius, color, Bubble::dot_count_for_radius(radius), rng);
    bubble.vel = jitter(rng, SPAWN_AT_VEL_JITTER);
    bubble
}

/// Replace the population with `count` fresh bubbles
pub fn seed_population(world: &mut World, count: u32) {
    let bounds = world.bounds;
    world.bubbles.clear();
    for _ in 0..count {
        let bubble = create_bubble(world, bounds);
        world.bubbles.push(bubble);
    }
    log::debug!("Seeded {} bubbles in {}x{}", count, bounds.width, bounds.height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DotState;

    #[test]
    fn test_create_bubble_within_bounds() {
        let bounds = Bounds::new(400.0, 300.0);
        let mut world = World::new(42, bounds);

        for _ in 0..200 {
            let b = create_bubble(&mut world, bounds);
            assert!(b.radius >= SPAWN_RADIUS_MIN && b.radius < SPAWN_RADIUS_MIN + SPAWN_RADIUS_RANGE);
            assert!(b.pos.x >= b.radius && b.pos.x <= bounds.width - b.radius);
            assert!(b.pos.y >= b.radius && b.pos.y <= bounds.height - b.radius);
            assert!(b.dots.len() >= MIN_DOTS);
            assert!(PALETTE.contains(&b.color));
            assert!(b.vel.x.abs() <= SPAWN_VEL_JITTER / 2.0);
            for dot in &b.dots {
                assert_eq!(dot.state, DotState::Formed);
                assert_eq!(dot.vel, Vec2::ZERO);
                assert_eq!(dot.opacity, 1.0);
            }
        }
    }

    #[test]
    fn test_create_bubble_at_clamps() {
        let bounds = Bounds::new(400.0, 300.0);
        let mut world = World::new(42, bounds);

        let b = create_bubble_at(&mut world, Vec2::new(-50.0, 1000.0), bounds);
        assert!(b.radius >= SPAWN_AT_RADIUS_MIN && b.radius < SPAWN_AT_RADIUS_MIN + SPAWN_AT_RADIUS_RANGE);
        assert!((b.pos.x - b.radius).abs() < 1e-4);
        assert!((b.pos.y - (bounds.height - b.radius)).abs() < 1e-4);
        // Ring is built around the clamped center
        for dot in &b.dots {
            let target = dot.formation_target(b.pos, b.radius);
            assert!((dot.pos - target).length() < 1e-4);
        }
    }

    #[test]
    fn test_unique_ids() {
        let bounds = Bounds::new(400.0, 300.0);
        let mut world = World::new(42, bounds);
        seed_population(&mut world, 10);
        let mut ids: Vec<u32> = world.bubbles.iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_same_seed_same_population() {
        let bounds = Bounds::new(640.0, 480.0);
        let mut a = World::new(99, bounds);
        let mut b = World::new(99, bounds);
        seed_population(&mut a, 5);
        seed_population(&mut b, 5);
        assert_eq!(a.bubbles, b.bubbles);
    }

    #[test]
    fn test_tiny_surface_still_spawns() {
        let bounds = Bounds::new(10.0, 10.0);
        let mut world = World::new(1, bounds);
        let b = create_bubble(&mut world, bounds);
        assert_eq!(b.pos, Vec2::new(5.0, 5.0));
    }
}
