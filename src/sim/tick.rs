//! One simulation frame
//!
//! Runs the full pipeline in a fixed order so a seeded world replays exactly.

use glam::Vec2;

use super::collision::{resolve_bubble_pairs, resolve_fragment_hits, resolve_fragment_pairs};
use super::integrate::{integrate_bubbles, integrate_fragments};
use super::interaction::deform_dragged;
use super::lifecycle::advance_lifecycles;
use super::state::World;
use crate::settings::BubbleSettings;

/// Pointer sample for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Current pointer position (surface-local)
    pub pointer: Vec2,
    /// Pointer movement since the previous frame
    pub pointer_delta: Vec2,
    /// Host timestamp, drives the drag wobble
    pub time_ms: f64,
}

/// Advance the world by one frame. Returns how many bubbles were culled.
pub fn tick(world: &mut World, settings: &BubbleSettings, input: &FrameInput) -> usize {
    world.time_ticks += 1;

    integrate_bubbles(world, settings, input.pointer);
    integrate_fragments(world, settings);

    resolve_bubble_pairs(world);
    resolve_fragment_hits(world, settings);
    resolve_fragment_pairs(world, settings);

    for bubble in world.bubbles.iter_mut().filter(|b| b.is_dragging()) {
        deform_dragged(bubble, input.pointer, input.pointer_delta, input.time_ms);
    }

    advance_lifecycles(world, settings);

    let culled = world.cull();
    if culled > 0 {
        log::debug!("Culled {} faded bubbles, {} remain", culled, world.bubbles.len());
    }
    culled
}
