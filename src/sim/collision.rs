//! Collision detection and response
//!
//! Three passes per frame: bubble vs bubble (with pre-contact squish of the
//! near-side dots), airborne dot vs bubble, and airborne dot vs dot. Popped
//! bubbles take no part in any of them.

use glam::Vec2;

use super::state::{Bubble, Dot, World};
use crate::consts::*;
use crate::safe_normal;
use crate::settings::BubbleSettings;

/// Result of a circle overlap check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first circle toward the second
    pub normal: Vec2,
    /// Center distance
    pub distance: f32,
    /// How far the circles interpenetrate (positive when overlapping)
    pub penetration: f32,
}

/// Check two circles whose centers must stay `min_distance` apart.
/// Coincident centers report a +X normal.
pub fn circle_contact(a: Vec2, b: Vec2, min_distance: f32) -> Option<Contact> {
    let (normal, distance) = safe_normal(b - a);
    if distance >= min_distance {
        return None;
    }
    Some(Contact {
        normal,
        distance,
        penetration: min_distance - distance,
    })
}

/// Mutable access to two distinct elements
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Resolve every intact bubble pair
pub fn resolve_bubble_pairs(world: &mut World) {
    let bubbles = world.bubbles.as_mut_slice();
    for i in 0..bubbles.len() {
        let (head, tail) = bubbles.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_intact() {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.is_intact()) {
            resolve_bubble_pair(a, b);
        }
    }
}

fn resolve_bubble_pair(a: &mut Bubble, b: &mut Bubble) {
    let min_distance = a.radius + b.radius;
    let Some(contact) = circle_contact(a.pos, b.pos, min_distance + PRE_CONTACT_MARGIN) else {
        return;
    };

    // Squish near-side dots before the bodies actually touch
    let squish = ((min_distance + PRE_CONTACT_FALLOFF - contact.distance) / PRE_CONTACT_FALLOFF)
        .max(0.0)
        * PRE_CONTACT_FORCE;
    // The older bubble's dots feel the other one a little early
    squish_near_dots(a, b.pos, b.radius + PRE_CONTACT_REACH, squish);
    squish_near_dots(b, a.pos, a.radius, squish);

    let overlap = min_distance - contact.distance;
    if overlap <= 0.0 {
        return;
    }

    let separation = contact.normal * overlap * 0.5;
    if !a.is_dragging() {
        a.pos -= separation;
    }
    if !b.is_dragging() {
        b.pos += separation;
    }

    let closing = (b.vel - a.vel).dot(contact.normal);
    if closing < 0.0 {
        let impulse = contact.normal * closing * BUBBLE_RESTITUTION;
        if !a.is_dragging() {
            a.vel += impulse;
        }
        if !b.is_dragging() {
            b.vel -= impulse;
        }
    }
}

/// Push formed dots within `reach` of the other bubble's center away from it
fn squish_near_dots(bubble: &mut Bubble, other_center: Vec2, reach: f32, force: f32) {
    for dot in bubble.dots.iter_mut().filter(|d| d.is_formed()) {
        let (normal, distance) = safe_normal(dot.pos - other_center);
        if distance < reach {
            dot.vel += normal * force;
        }
    }
}

/// Deflect airborne dots off every other intact bubble
pub fn resolve_fragment_hits(world: &mut World, settings: &BubbleSettings) {
    let bubbles = world.bubbles.as_mut_slice();
    for i in 0..bubbles.len() {
        for j in 0..bubbles.len() {
            if i == j {
                continue;
            }
            let (owner, target) = pair_mut(bubbles, i, j);
            if !target.is_intact() {
                continue;
            }
            for dot in owner.dots.iter_mut().filter(|d| d.is_airborne()) {
                deflect_off_bubble(dot, target, settings.bounce);
            }
        }
    }
}

fn deflect_off_bubble(dot: &mut Dot, target: &mut Bubble, bounce: f32) {
    let Some(contact) = circle_contact(target.pos, dot.pos, DOT_RADIUS + target.radius) else {
        return;
    };

    dot.pos += contact.normal * contact.penetration;
    let speed = dot.burst_vel.length();
    dot.burst_vel = contact.normal * speed * bounce * BURST_WALL_BOUNCE;

    if !target.is_dragging() {
        target.vel -= contact.normal * speed * DOT_PUSH_FACTOR * dot.mass;
    }
}

/// Separate interpenetrating airborne dots and exchange momentum
pub fn resolve_fragment_pairs(world: &mut World, settings: &BubbleSettings) {
    let mut dots: Vec<&mut Dot> = world
        .bubbles
        .iter_mut()
        .flat_map(|b| b.dots.iter_mut())
        .filter(|d| d.is_airborne())
        .collect();

    let restitution = settings.bounce * DOT_RESTITUTION;
    for i in 0..dots.len() {
        let (head, tail) = dots.split_at_mut(i + 1);
        let a = &mut *head[i];
        for b in tail.iter_mut() {
            collide_fragments(a, b, restitution);
        }
    }
}

fn collide_fragments(a: &mut Dot, b: &mut Dot, restitution: f32) {
    let Some(contact) = circle_contact(a.pos, b.pos, DOT_RADIUS * 2.0) else {
        return;
    };

    let separation = contact.normal * contact.penetration * 0.5;
    a.pos -= separation;
    b.pos += separation;

    let closing = (b.burst_vel - a.burst_vel).dot(contact.normal);
    if closing < 0.0 {
        let impulse = contact.normal * closing * restitution;
        a.burst_vel += impulse;
        b.burst_vel -= impulse;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bounds;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world_with(bubbles: &[(Vec2, f32)]) -> World {
        let mut world = World::new(3, Bounds::new(800.0, 600.0));
        let mut rng = Pcg32::seed_from_u64(17);
        for &(pos, radius) in bubbles {
            let id = world.next_entity_id();
            world.bubbles.push(Bubble::new(id, pos, radius, 0, 12, &mut rng));
        }
        world
    }

    fn center_distance(world: &World) -> f32 {
        (world.bubbles[1].pos - world.bubbles[0].pos).length()
    }

    #[test]
    fn test_circle_contact() {
        assert!(circle_contact(Vec2::ZERO, Vec2::new(10.0, 0.0), 10.0).is_none());
        let c = circle_contact(Vec2::ZERO, Vec2::new(0.0, 6.0), 10.0).unwrap();
        assert_eq!(c.normal, Vec2::Y);
        assert!((c.penetration - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlapping_bubbles_separate() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(130.0, 100.0), 20.0)]);
        resolve_bubble_pairs(&mut world);
        assert!(center_distance(&world) >= 40.0 - 1e-3);
    }

    #[test]
    fn test_dragged_bubble_is_immovable() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(130.0, 100.0), 20.0)]);
        world.bubbles[0].begin_drag(Vec2::new(100.0, 100.0));
        world.bubbles[1].vel = Vec2::new(-3.0, 0.0);

        resolve_bubble_pairs(&mut world);
        assert_eq!(world.bubbles[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(world.bubbles[0].vel, Vec2::ZERO);
        assert!(world.bubbles[1].pos.x > 130.0);
        // Closing velocity was damped
        assert!(world.bubbles[1].vel.x > -3.0);
    }

    #[test]
    fn test_closing_bubbles_exchange_impulse() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(130.0, 100.0), 20.0)]);
        world.bubbles[0].vel = Vec2::new(2.0, 0.0);
        world.bubbles[1].vel = Vec2::new(-2.0, 0.0);
        resolve_bubble_pairs(&mut world);

        // closing = -4, impulse = -4 * 0.7 along +X
        assert!((world.bubbles[0].vel.x - (2.0 - 4.0 * BUBBLE_RESTITUTION)).abs() < 1e-5);
        assert!((world.bubbles[1].vel.x - (-2.0 + 4.0 * BUBBLE_RESTITUTION)).abs() < 1e-5);
    }

    #[test]
    fn test_separating_bubbles_get_no_impulse() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(130.0, 100.0), 20.0)]);
        world.bubbles[0].vel = Vec2::new(-1.0, 0.0);
        world.bubbles[1].vel = Vec2::new(1.0, 0.0);
        resolve_bubble_pairs(&mut world);
        assert_eq!(world.bubbles[0].vel, Vec2::new(-1.0, 0.0));
        assert_eq!(world.bubbles[1].vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_pre_contact_squish_without_overlap() {
        // 41 apart: inside the margin, not overlapping
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(141.0, 100.0), 20.0)]);
        resolve_bubble_pairs(&mut world);

        assert_eq!(world.bubbles[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(world.bubbles[1].pos, Vec2::new(141.0, 100.0));
        // Dot 0 of the first bubble is 21 from the second center, inside r + 5
        assert!(world.bubbles[0].dots[0].vel.x < 0.0);
        // Dot 6 of the second bubble (angle π) is 21 from the first, outside r
        assert_eq!(world.bubbles[1].dots[6].vel, Vec2::ZERO);
        // Far-side dots are untouched
        assert_eq!(world.bubbles[0].dots[6].vel, Vec2::ZERO);
    }

    #[test]
    fn test_pre_contact_squish_reaches_both_once_inside_radius() {
        // 38 apart: dot 6 of the second bubble is 18 from the first center
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(138.0, 100.0), 20.0)]);
        resolve_bubble_pairs(&mut world);

        assert!(world.bubbles[0].dots[0].vel.x < 0.0);
        assert!(world.bubbles[1].dots[6].vel.x > 0.0);
    }

    #[test]
    fn test_coincident_centers_use_fallback_normal() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(100.0, 100.0), 20.0)]);
        resolve_bubble_pairs(&mut world);
        let a = &world.bubbles[0];
        let b = &world.bubbles[1];
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!((b.pos.x - a.pos.x - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_popped_bubbles_do_not_collide() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(130.0, 100.0), 20.0)]);
        for dot in &mut world.bubbles[0].dots {
            dot.explode(Vec2::ZERO);
        }
        resolve_bubble_pairs(&mut world);
        assert_eq!(world.bubbles[1].pos, Vec2::new(130.0, 100.0));
    }

    #[test]
    fn test_airborne_dot_deflects_off_bubble() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(300.0, 100.0), 20.0)]);
        let dot = &mut world.bubbles[0].dots[0];
        dot.pos = Vec2::new(278.0, 100.0);
        dot.explode(Vec2::new(4.0, 0.0));
        let mass = dot.mass;

        let settings = BubbleSettings::default();
        resolve_fragment_hits(&mut world, &settings);

        let dot = &world.bubbles[0].dots[0];
        assert!((dot.pos.x - (300.0 - 20.0 - DOT_RADIUS)).abs() < 1e-3);
        let expected = 4.0 * settings.bounce * BURST_WALL_BOUNCE;
        assert!((dot.burst_vel.x + expected).abs() < 1e-4);
        // Target bubble is pushed away from the dot
        let push = 4.0 * DOT_PUSH_FACTOR * mass;
        assert!((world.bubbles[1].vel.x - push).abs() < 1e-4);
    }

    #[test]
    fn test_dragged_target_not_pushed_by_dot() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0), (Vec2::new(300.0, 100.0), 20.0)]);
        world.bubbles[1].begin_drag(Vec2::new(300.0, 100.0));
        let dot = &mut world.bubbles[0].dots[0];
        dot.pos = Vec2::new(290.0, 100.0);
        dot.explode(Vec2::new(4.0, 0.0));

        resolve_fragment_hits(&mut world, &BubbleSettings::default());
        assert_eq!(world.bubbles[1].vel, Vec2::ZERO);
    }

    #[test]
    fn test_airborne_dots_collide() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0)]);
        let bubble = &mut world.bubbles[0];
        bubble.dots[0].pos = Vec2::new(200.0, 200.0);
        bubble.dots[0].explode(Vec2::new(1.0, 0.0));
        bubble.dots[1].pos = Vec2::new(206.0, 200.0);
        bubble.dots[1].explode(Vec2::new(-1.0, 0.0));

        let settings = BubbleSettings::default();
        resolve_fragment_pairs(&mut world, &settings);

        let (a, b) = (&world.bubbles[0].dots[0], &world.bubbles[0].dots[1]);
        assert!((b.pos.x - a.pos.x - DOT_RADIUS * 2.0).abs() < 1e-4);
        let restitution = settings.bounce * DOT_RESTITUTION;
        assert!((a.burst_vel.x - (1.0 - 2.0 * restitution)).abs() < 1e-5);
        assert!((b.burst_vel.x - (-1.0 + 2.0 * restitution)).abs() < 1e-5);
    }

    #[test]
    fn test_grounded_dots_excluded_from_dot_pairs() {
        let mut world = world_with(&[(Vec2::new(100.0, 100.0), 20.0)]);
        let bubble = &mut world.bubbles[0];
        bubble.dots[0].pos = Vec2::new(200.0, 595.0);
        bubble.dots[0].explode(Vec2::ZERO);
        bubble.dots[0].land(1.0);
        bubble.dots[1].pos = Vec2::new(204.0, 595.0);
        bubble.dots[1].explode(Vec2::new(-1.0, 0.0));

        resolve_fragment_pairs(&mut world, &BubbleSettings::default());
        assert_eq!(world.bubbles[0].dots[0].pos, Vec2::new(200.0, 595.0));
        assert_eq!(world.bubbles[0].dots[1].pos, Vec2::new(204.0, 595.0));
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut v = [1, 2, 3];
        let (a, b) = pair_mut(&mut v, 0, 2);
        std::mem::swap(a, b);
        assert_eq!(v, [3, 2, 1]);
        let (a, b) = pair_mut(&mut v, 2, 1);
        assert_eq!((*a, *b), (1, 2));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn separated_pair_never_gains_overlap(
                angle in 0.0f32..std::f32::consts::TAU,
                gap in 0.0f32..30.0,
                r1 in 12.0f32..35.0,
                r2 in 12.0f32..35.0,
                passes in 1usize..8,
            ) {
                let a = Vec2::new(400.0, 300.0);
                let b = a + crate::unit_from_angle(angle) * (r1 + r2 + gap);
                let mut world = world_with(&[(a, r1), (b, r2)]);
                let before = center_distance(&world);
                for _ in 0..passes {
                    resolve_bubble_pairs(&mut world);
                }
                prop_assert!(center_distance(&world) >= before - 1e-3);
                prop_assert!(center_distance(&world) >= r1 + r2 - 1e-3);
            }

            #[test]
            fn overlapping_free_pair_is_fully_separated(
                angle in 0.0f32..std::f32::consts::TAU,
                depth in 0.0f32..1.0,
                r1 in 12.0f32..35.0,
                r2 in 12.0f32..35.0,
            ) {
                let a = Vec2::new(400.0, 300.0);
                let b = a + crate::unit_from_angle(angle) * (r1 + r2) * (1.0 - depth);
                let mut world = world_with(&[(a, r1), (b, r2)]);
                resolve_bubble_pairs(&mut world);
                prop_assert!(center_distance(&world) >= r1 + r2 - 1e-2);
            }
        }
    }
}
