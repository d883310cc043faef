//! Rendering module
//!
//! Converts world state into a flat list of `DrawCircle`s. The conversion is a
//! pure read; painting the list onto a surface is the host's job.

pub mod primitive;

pub use primitive::{DrawCircle, css_color};

use crate::consts::{DOT_RADIUS, GLOW_BLUR};
use crate::sim::World;

/// Fill `out` with this frame's primitives, in paint order.
///
/// Faded dots draw nothing. Formed dots of a dragged bubble get a second,
/// glowing pass right after their base disc.
pub fn render(world: &World, out: &mut Vec<DrawCircle>) {
    out.clear();
    for bubble in &world.bubbles {
        let glowing = bubble.is_dragging();
        for dot in bubble.dots.iter().filter(|d| d.is_visible()) {
            let circle = DrawCircle::new(dot.pos.x, dot.pos.y, DOT_RADIUS, dot.opacity.min(1.0), bubble.color);
            out.push(circle);
            if glowing && dot.is_formed() {
                out.push(circle.with_glow(GLOW_BLUR));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BubbleSettings;
    use crate::sim::{Bounds, pop, seed_population};

    fn seeded() -> World {
        let mut world = World::new(77, Bounds::new(500.0, 400.0));
        seed_population(&mut world, 4);
        world
    }

    #[test]
    fn test_render_does_not_mutate_world() {
        let mut world = seeded();
        let id = world.bubbles[1].id;
        pop(&mut world, id, None, &BubbleSettings::default());
        let held = world.bubbles[0].pos;
        world.bubbles[0].begin_drag(held);

        let before = serde_json::to_string(&world.bubbles).unwrap();
        let ticks = world.time_ticks;
        let mut out = Vec::new();
        render(&world, &mut out);
        render(&world, &mut out);
        assert_eq!(serde_json::to_string(&world.bubbles).unwrap(), before);
        assert_eq!(world.time_ticks, ticks);
    }

    #[test]
    fn test_one_disc_per_visible_dot() {
        let world = seeded();
        let mut out = vec![DrawCircle::new(0.0, 0.0, 1.0, 1.0, 0)];
        render(&world, &mut out);

        let dots: usize = world.bubbles.iter().map(|b| b.dots.len()).sum();
        assert_eq!(out.len(), dots);
        assert!(out.iter().all(|c| c.radius == DOT_RADIUS && c.alpha == 1.0 && !c.is_glow()));
        assert_eq!(out[0].color, world.bubbles[0].color);
    }

    #[test]
    fn test_faded_dots_are_skipped() {
        let mut world = seeded();
        let dropped = world.bubbles[0].dots.len();
        for dot in &mut world.bubbles[0].dots {
            dot.opacity = 0.0;
        }
        world.bubbles[1].dots[0].opacity = 0.25;

        let mut out = Vec::new();
        render(&world, &mut out);
        assert_eq!(out.len(), world.visible_dots());
        let total: usize = world.bubbles.iter().map(|b| b.dots.len()).sum();
        assert_eq!(out.len(), total - dropped);
        assert_eq!(out[0].alpha, 0.25);
    }

    #[test]
    fn test_dragged_bubble_glows() {
        let mut world = seeded();
        let held = world.bubbles[2].pos;
        world.bubbles[2].begin_drag(held);
        let mut out = Vec::new();
        render(&world, &mut out);

        let glows: Vec<&DrawCircle> = out.iter().filter(|c| c.is_glow()).collect();
        assert_eq!(glows.len(), world.bubbles[2].dots.len());
        assert!(glows.iter().all(|c| c.color == world.bubbles[2].color && c.glow == GLOW_BLUR));
    }
}
