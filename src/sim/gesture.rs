//! Pointer gesture controller
//!
//! Turns raw pointer events into simulation actions:
//! - click on a bubble: grab it now, pop it a moment later unless still held
//! - double-click on a bubble: grab without popping
//! - click on empty space: blow (deferred so a double-click can cancel it)
//! - double-click on empty space and hold: keep spawning bubbles
//!
//! All timing uses host timestamps in milliseconds, so the controller is
//! fully deterministic under test.

use glam::Vec2;

use super::factory::{create_bubble_at, jitter};
use super::interaction::{blow, pop, throw};
use super::state::World;
use crate::consts::*;
use crate::platform::{PointerTracker, RepeatingTask};
use crate::settings::BubbleSettings;

/// An action waiting out the double-click window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    Pop { bubble_id: u32, at: Vec2 },
    Blow { at: Vec2 },
}

#[derive(Debug, Clone)]
struct PendingAction {
    due_ms: f64,
    /// Timestamp of the click that scheduled it
    click_ms: f64,
    action: DeferredAction,
}

#[derive(Debug, Clone)]
pub struct GestureController {
    last_click_ms: Option<f64>,
    pending: Vec<PendingAction>,
    spawn_task: RepeatingTask,
    spawn_origin: Vec2,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self {
            last_click_ms: None,
            pending: Vec::new(),
            spawn_task: RepeatingTask::new(SPAWN_INTERVAL_MS),
            spawn_origin: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn is_spawning(&self) -> bool {
        self.spawn_task.is_active()
    }

    /// Deferred actions not yet fired
    pub fn pending_actions(&self) -> impl Iterator<Item = &DeferredAction> {
        self.pending.iter().map(|p| &p.action)
    }

    pub fn pointer_down(&mut self, world: &mut World, pointer: &mut PointerTracker, at: Vec2, now_ms: f64) {
        pointer.press(at);

        let double_click = self
            .last_click_ms
            .is_some_and(|last| now_ms - last < DOUBLE_CLICK_MS);
        self.last_click_ms = Some(now_ms);

        match world.bubble_at(at) {
            Some(bubble_id) => {
                if let Some(bubble) = world.bubble_mut(bubble_id) {
                    bubble.begin_drag(at);
                }
                if !double_click {
                    self.defer(now_ms, DeferredAction::Pop { bubble_id, at });
                }
            }
            None if double_click => {
                let bounds = world.bounds;
                let bubble = create_bubble_at(world, at, bounds);
                log::debug!("Spawn hold started at ({:.0}, {:.0})", at.x, at.y);
                world.bubbles.push(bubble);
                self.spawn_origin = at;
                self.spawn_task.start(now_ms);
            }
            None => self.defer(now_ms, DeferredAction::Blow { at }),
        }
    }

    /// Release (or pointer left the surface): throw and let go of any held
    /// bubble, stop spawning
    pub fn pointer_up(&mut self, world: &mut World, pointer: &mut PointerTracker) {
        let velocity = pointer.velocity();
        let (bubbles, rng) = world.parts_mut();
        for bubble in bubbles.iter_mut().filter(|b| b.is_dragging()) {
            throw(bubble, velocity, rng);
            bubble.end_drag();
        }
        pointer.release();
        self.spawn_task.cancel();
    }

    fn defer(&mut self, now_ms: f64, action: DeferredAction) {
        self.pending.push(PendingAction {
            due_ms: now_ms + CLICK_DEFER_MS,
            click_ms: now_ms,
            action,
        });
    }

    /// Fire due deferred actions and spawn ticks
    pub fn poll(&mut self, world: &mut World, settings: &BubbleSettings, now_ms: f64) {
        let (due, waiting): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|p| p.due_ms <= now_ms);
        self.pending = waiting;

        for pending in due {
            // A later click supersedes it
            if self.last_click_ms != Some(pending.click_ms) {
                continue;
            }
            match pending.action {
                DeferredAction::Pop { bubble_id, at } => {
                    let released = world.bubble(bubble_id).is_some_and(|b| !b.is_dragging());
                    if released {
                        pop(world, bubble_id, Some(at), settings);
                    }
                }
                DeferredAction::Blow { at } => {
                    blow(world, at, settings);
                }
            }
        }

        let bounds = world.bounds;
        for _ in 0..self.spawn_task.poll(now_ms) {
            let at = self.spawn_origin + jitter(world.rng(), SPAWN_SCATTER);
            let bubble = create_bubble_at(world, at, bounds);
            world.bubbles.push(bubble);
        }
    }

    /// Drop deferred actions and stop spawning
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.spawn_task.cancel();
    }
}
