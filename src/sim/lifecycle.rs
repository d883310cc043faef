//! Dot state machine advancement and visual decay
//!
//! Airborne dots touching the floor while gravity is on become Grounded;
//! grounded dots linger and then fade. Culling of fully faded bubbles lives on
//! `World::cull`.

use super::state::World;
use crate::consts::*;
use crate::settings::BubbleSettings;

/// Tolerance for "touching the floor"
const FLOOR_EPSILON: f32 = 1e-3;

pub fn advance_lifecycles(world: &mut World, settings: &BubbleSettings) {
    let floor = world.bounds.height - DOT_RADIUS - FLOOR_EPSILON;
    let gravity_on = settings.gravity > 0.0;

    for bubble in &mut world.bubbles {
        bubble.deform_x *= DEFORM_DECAY;
        bubble.deform_y *= DEFORM_DECAY;

        for dot in &mut bubble.dots {
            if dot.is_airborne() {
                if gravity_on && dot.pos.y >= floor {
                    dot.land(settings.bounce);
                }
            } else {
                dot.linger();
            }
        }
    }
}
