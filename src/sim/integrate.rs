//! Per-frame integration
//!
//! Bubble centers move under gravity and damping (or chase the pointer while
//! dragged). Formed dots are spring-pulled toward their formation targets with
//! their own lighter gravity and heavier damping, which gives the sagging
//! water-balloon look. Exploded dots fly ballistically and slide once grounded.

use glam::Vec2;

use super::state::{Bounds, Bubble, Dot, DotState, World};
use crate::consts::*;
use crate::safe_normal;
use crate::settings::BubbleSettings;

/// Advance every bubble center and its formed dots by one frame
pub fn integrate_bubbles(world: &mut World, settings: &BubbleSettings, pointer: Vec2) {
    let bounds = world.bounds;
    for bubble in &mut world.bubbles {
        match bubble.drag_offset {
            None => step_free_center(bubble, settings, bounds),
            Some(offset) => step_dragged_center(bubble, settings, bounds, pointer + offset),
        }
        step_formation(bubble, settings, bounds);
    }
}

fn step_free_center(bubble: &mut Bubble, settings: &BubbleSettings, bounds: Bounds) {
    bubble.vel.y += settings.gravity * CENTER_GRAVITY;
    bubble.vel *= CENTER_DAMPING;
    bubble.pos += bubble.vel;
    resolve_center_walls(bubble, settings.bounce, bounds);
}

/// Soft wall response: push back proportionally to penetration and invert
/// velocity, rather than snapping the center onto the wall
fn resolve_center_walls(bubble: &mut Bubble, bounce: f32, bounds: Bounds) {
    let r = bubble.radius;
    let side = -WALL_DAMPING * bounce * WALL_BOUNCE_SIDE;
    let floor = -WALL_DAMPING * bounce * WALL_BOUNCE_FLOOR;

    let left = r - bubble.pos.x;
    if left > 0.0 {
        bubble.vel.x += WALL_STIFFNESS * left;
        bubble.pos.x += left * WALL_CORRECTION;
        bubble.vel.x *= side;
    }
    let right = bubble.pos.x + r - bounds.width;
    if right > 0.0 {
        bubble.vel.x -= WALL_STIFFNESS * right;
        bubble.pos.x -= right * WALL_CORRECTION;
        bubble.vel.x *= side;
    }
    let top = r - bubble.pos.y;
    if top > 0.0 {
        bubble.vel.y += WALL_STIFFNESS * top;
        bubble.pos.y += top * WALL_CORRECTION;
        bubble.vel.y *= side;
    }
    let bottom = bubble.pos.y + r - bounds.height;
    if bottom > 0.0 {
        bubble.vel.y -= WALL_STIFFNESS * bottom;
        bubble.pos.y -= bottom * WALL_CORRECTION;
        bubble.vel.y *= floor;
    }

    // Divergence guard for extreme settings
    bubble.vel = bubble.vel.clamp_length_max(MAX_CENTER_SPEED);
    bubble.pos = bubble.pos.clamp(Vec2::ZERO, Vec2::new(bounds.width, bounds.height));
}

fn step_dragged_center(bubble: &mut Bubble, settings: &BubbleSettings, bounds: Bounds, target: Vec2) {
    // Sags even while held
    bubble.vel.y += settings.gravity * DRAG_GRAVITY;

    let pull = (target - bubble.pos) * DRAG_PULL;
    bubble.vel = bubble.vel * DRAG_INERTIA + pull * (1.0 - DRAG_INERTIA);
    bubble.pos += bubble.vel;
    bubble.pos = bubble.pos.clamp(Vec2::ZERO, Vec2::new(bounds.width, bounds.height));
}

/// Push applied to a dot's formation target when the dot nears a wall
pub fn dot_wall_push(pos: Vec2, bounds: Bounds) -> Vec2 {
    let mut push = Vec2::ZERO;

    let left = pos.x - DOT_RADIUS;
    if left < DOT_WALL_MARGIN {
        push.x = (DOT_WALL_MARGIN - left) * DOT_WALL_PUSH;
    }
    let right = pos.x + DOT_RADIUS;
    if right > bounds.width - DOT_WALL_MARGIN {
        push.x = -(right - (bounds.width - DOT_WALL_MARGIN)) * DOT_WALL_PUSH;
    }
    let top = pos.y - DOT_RADIUS;
    if top < DOT_WALL_MARGIN {
        push.y = (DOT_WALL_MARGIN - top) * DOT_WALL_PUSH;
    }
    let bottom = pos.y + DOT_RADIUS;
    if bottom > bounds.height - DOT_WALL_MARGIN {
        // Stronger squash against the floor
        push.y = -(bottom - (bounds.height - DOT_WALL_MARGIN)) * DOT_FLOOR_PUSH;
    }
    push
}

fn step_formation(bubble: &mut Bubble, settings: &BubbleSettings, bounds: Bounds) {
    let spring = settings.spring_force();
    let dragged = bubble.is_dragging();
    let (center, radius) = (bubble.pos, bubble.radius);

    for dot in bubble.dots.iter_mut().filter(|d| d.is_formed()) {
        let target = dot.formation_target(center, radius) + dot_wall_push(dot.pos, bounds) * DOT_WALL_OFFSET;
        dot.vel += (target - dot.pos) * spring;

        if dragged {
            dot.vel.y += settings.gravity * DOT_GRAVITY_DRAGGED;
            // Lower half of the ring hangs heavier
            let sag = safe_normal(dot.pos - center).0.y * DOT_SAG;
            if sag > 0.0 {
                dot.vel.y += sag * settings.gravity * DOT_SAG_GRAVITY;
            }
            dot.vel *= DOT_DAMPING_DRAGGED;
        } else {
            dot.vel.y += settings.gravity * DOT_GRAVITY_FREE;
            dot.vel *= DOT_DAMPING_FREE;
        }

        dot.pos += dot.vel;
    }
}

/// Advance exploded dots: ballistic flight while airborne, sliding while grounded
pub fn integrate_fragments(world: &mut World, settings: &BubbleSettings) {
    let bounds = world.bounds;
    for dot in world.bubbles.iter_mut().flat_map(|b| b.dots.iter_mut()) {
        match dot.state {
            DotState::Airborne => step_airborne(dot, settings, bounds),
            DotState::Grounded { .. } => step_grounded(dot, settings, bounds),
            DotState::Formed | DotState::Faded => {}
        }
    }
}

fn step_airborne(dot: &mut Dot, settings: &BubbleSettings, bounds: Bounds) {
    dot.pos += dot.burst_vel;
    dot.burst_vel.y += settings.gravity * BURST_GRAVITY;
    dot.burst_vel.x *= settings.air_resistance;

    let wall = -settings.bounce * BURST_WALL_BOUNCE;
    let max = Vec2::new(bounds.width, bounds.height) - DOT_RADIUS;

    if dot.pos.x < DOT_RADIUS {
        dot.pos.x = DOT_RADIUS;
        dot.burst_vel.x *= wall;
    }
    if dot.pos.x > max.x {
        dot.pos.x = max.x;
        dot.burst_vel.x *= wall;
    }
    if dot.pos.y < DOT_RADIUS {
        dot.pos.y = DOT_RADIUS;
        dot.burst_vel.y *= wall;
    }
    if dot.pos.y > max.y {
        dot.pos.y = max.y;
        // With gravity the floor grounds the dot (see lifecycle); without it
        // the floor is just another wall
        if settings.gravity <= 0.0 {
            dot.burst_vel.y *= wall;
        }
    }
}

fn step_grounded(dot: &mut Dot, settings: &BubbleSettings, bounds: Bounds) {
    dot.burst_vel.x *= GROUND_FRICTION;
    dot.pos.x += dot.burst_vel.x;
    dot.pos.y = bounds.height - DOT_RADIUS;

    let wall = -settings.bounce * GROUND_WALL_BOUNCE;
    if dot.pos.x < DOT_RADIUS {
        dot.pos.x = DOT_RADIUS;
        dot.burst_vel.x *= wall;
    }
    if dot.pos.x > bounds.width - DOT_RADIUS {
        dot.pos.x = bounds.width - DOT_RADIUS;
        dot.burst_vel.x *= wall;
    }
}
