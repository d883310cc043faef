//! Pointer-driven forces: blow, pop, drag deformation and throw

use glam::Vec2;
use rand::Rng;

use super::factory::jitter;
use super::state::{Bubble, World};
use crate::consts::*;
use crate::settings::BubbleSettings;
use crate::{normalize_angle, safe_normal};

/// Linear falloff: `gain` at the origin, zero at `radius`
#[inline]
fn falloff(distance: f32, radius: f32, gain: f32) -> f32 {
    (radius - distance) / radius * gain
}

/// Radial outward impulse on every intact bubble within the blow radius of
/// `at`. Returns how many bubbles were affected.
pub fn blow(world: &mut World, at: Vec2, settings: &BubbleSettings) -> usize {
    let (bubbles, rng) = world.parts_mut();
    let mut affected = 0;

    for bubble in bubbles.iter_mut().filter(|b| b.is_intact()) {
        let (normal, distance) = safe_normal(bubble.pos - at);
        if distance >= BLOW_RADIUS {
            continue;
        }
        let force = falloff(distance, BLOW_RADIUS, settings.blow_force);
        bubble.vel += normal * force * BLOW_CENTER_GAIN;

        for dot in bubble.dots.iter_mut().filter(|d| d.is_formed()) {
            let (dot_normal, dot_distance) = safe_normal(dot.pos - at);
            if dot_distance < BLOW_RADIUS {
                dot.vel += dot_normal * falloff(dot_distance, BLOW_RADIUS, settings.blow_force * BLOW_DOT_GAIN);
            }
        }

        bubble.vel += jitter(rng, force * BLOW_JITTER);

        let pulse = (force * BLOW_PULSE_GAIN).min(BLOW_PULSE_MAX);
        bubble.deform_x = bubble.deform_x.max(pulse);
        bubble.deform_y = bubble.deform_y.max(pulse * 0.6);
        bubble.rotation = normal.y.atan2(normal.x);
        affected += 1;
    }

    log::debug!("Blow at ({:.0}, {:.0}) moved {} bubbles", at.x, at.y, affected);
    affected
}

/// Pop bubble `id`: blast neighbouring bubbles, then send every dot flying
/// outward from `trigger` (the bubble's center when `None`).
///
/// Any drag on the bubble ends. Returns false if the bubble is unknown or was
/// already popped.
pub fn pop(world: &mut World, id: u32, trigger: Option<Vec2>, settings: &BubbleSettings) -> bool {
    let Some(index) = world.bubbles.iter().position(|b| b.id == id) else {
        return false;
    };
    let (bubbles, rng) = world.parts_mut();
    bubbles[index].end_drag();
    if !bubbles[index].is_intact() {
        return false;
    }

    let origin = bubbles[index].pos;
    let blast = settings.blow_force * BLAST_FORCE_GAIN;
    for (i, other) in bubbles.iter_mut().enumerate() {
        if i == index || !other.is_intact() {
            continue;
        }
        let (normal, distance) = safe_normal(other.pos - origin);
        if distance >= BLAST_RADIUS {
            continue;
        }
        let force = falloff(distance, BLAST_RADIUS, blast);
        other.vel += normal * force * BLAST_CENTER_GAIN;

        // Near-side dots of the neighbour get shoved too, without changing state
        for dot in other.dots.iter_mut().filter(|d| d.is_formed()) {
            let (dot_normal, dot_distance) = safe_normal(dot.pos - origin);
            if dot_distance < BLAST_RADIUS {
                dot.vel += dot_normal * falloff(dot_distance, BLAST_RADIUS, force * BLAST_DOT_GAIN);
            }
        }
    }

    let bubble = &mut bubbles[index];
    let from = trigger.unwrap_or(bubble.pos);
    for dot in &mut bubble.dots {
        let (normal, _) = safe_normal(dot.pos - from);
        let speed = settings.blow_force * (BURST_BASE + rng.random::<f32>() * BURST_RANDOM);
        dot.explode(normal * speed + jitter(rng, speed * BURST_JITTER));
    }

    log::debug!("Popped bubble {} ({} dots)", id, bubble.dots.len());
    true
}

/// Elongate a dragged bubble along its motion. `pointer_delta` is the pointer
/// movement over the last frame.
pub fn deform_dragged(bubble: &mut Bubble, pointer: Vec2, pointer_delta: Vec2, time_ms: f64) {
    let Some(offset) = bubble.drag_offset else {
        return;
    };

    let speed_deform = (pointer_delta.length() * DEFORM_SPEED_GAIN).min(DEFORM_MAX);
    let accel_deform = (bubble.vel.length() * DEFORM_ACCEL_GAIN).min(DEFORM_MAX);
    let deform = speed_deform.max(accel_deform);
    if deform > DEFORM_THRESHOLD {
        bubble.deform_x = bubble.deform_x.max(deform);
        bubble.deform_y = bubble.deform_y.max(deform * 0.7);
        bubble.rotation = bubble.vel.y.atan2(bubble.vel.x);
    }

    // Idle wobble while the body still lags behind the pointer
    if (pointer + offset - bubble.pos).length() > DEFORM_WOBBLE_DISTANCE {
        let wobble = (time_ms * 0.01).sin() as f32 * DEFORM_WOBBLE;
        bubble.deform_x = bubble.deform_x.max(wobble);
        bubble.deform_y = bubble.deform_y.max(wobble * 0.5);
    }
}

/// Hand the smoothed pointer velocity to a released bubble. Dots on the
/// leading edge take more of it than the trailing ones.
pub fn throw<R: Rng>(bubble: &mut Bubble, pointer_velocity: Vec2, rng: &mut R) {
    use std::f32::consts::PI;

    let momentum = pointer_velocity * THROW_MULTIPLIER;
    bubble.vel = momentum;

    let throw_angle = pointer_velocity.y.atan2(pointer_velocity.x);
    let center = bubble.pos;
    for dot in bubble.dots.iter_mut().filter(|d| d.is_formed()) {
        let rel = dot.pos - center;
        let diff = normalize_angle(rel.y.atan2(rel.x) - throw_angle).abs();
        let alignment = 0.4 + (1.0 - diff.min(PI) / PI) * 0.4;
        let slosh = 0.7 + rng.random::<f32>() * 0.3;
        dot.vel += momentum * alignment * slosh;
    }
}
