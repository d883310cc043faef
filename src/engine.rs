//! Engine facade
//!
//! Owns the world and everything that feeds it, and exposes the operations a
//! host needs: start/stop, per-frame callback, pointer events, resize and
//! configuration.

use glam::Vec2;

use crate::platform::{FrameHost, PointerTracker, Scheduler};
use crate::renderer::{DrawCircle, render};
use crate::settings::BubbleSettings;
use crate::sim::{Bounds, FrameInput, GestureController, World, seed_population, tick};

pub struct Engine {
    world: World,
    settings: BubbleSettings,
    pointer: PointerTracker,
    gestures: GestureController,
    scheduler: Scheduler,
    draw_list: Vec<DrawCircle>,
}

impl Engine {
    /// Create an engine with a freshly seeded population. Out-of-range
    /// settings are repaired.
    pub fn new(seed: u64, width: f32, height: f32, settings: BubbleSettings) -> Self {
        let settings = settings.sanitized();
        let mut world = World::new(seed, Bounds::new(width, height));
        seed_population(&mut world, settings.bubble_count);
        log::info!(
            "Engine created: seed {}, {}x{}, {} bubbles",
            seed,
            world.bounds.width,
            world.bounds.height,
            settings.bubble_count
        );

        Self {
            world,
            settings,
            pointer: PointerTracker::new(),
            gestures: GestureController::new(),
            scheduler: Scheduler::new(),
            draw_list: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &BubbleSettings {
        &self.settings
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn start<H: FrameHost>(&mut self, host: &mut H) {
        if !self.scheduler.is_running() {
            log::info!("Starting");
        }
        self.scheduler.start(host);
    }

    /// Stop frames and drop pending timers. Safe to call repeatedly.
    pub fn stop<H: FrameHost>(&mut self, host: &mut H) {
        if self.scheduler.is_running() {
            log::info!("Stopping after {} frames", self.world.time_ticks);
        }
        self.scheduler.stop(host);
        self.gestures.cancel_all();
    }

    /// Host frame callback. Returns the primitives to paint, or `None` if the
    /// engine was stopped and the frame should be ignored.
    pub fn on_frame<H: FrameHost>(&mut self, host: &mut H, time_ms: f64) -> Option<&[DrawCircle]> {
        if !self.scheduler.frame_fired(host) {
            return None;
        }
        Some(self.frame(time_ms))
    }

    /// Step once and render, regardless of the scheduler
    pub fn frame(&mut self, time_ms: f64) -> &[DrawCircle] {
        self.gestures.poll(&mut self.world, &self.settings, time_ms);

        let input = FrameInput {
            pointer: self.pointer.pos,
            pointer_delta: self.pointer.frame_delta(),
            time_ms,
        };
        tick(&mut self.world, &self.settings, &input);
        self.pointer.end_frame();

        render(&self.world, &mut self.draw_list);
        &self.draw_list
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, time_ms: f64) {
        self.gestures
            .pointer_down(&mut self.world, &mut self.pointer, Vec2::new(x, y), time_ms);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.move_to(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.gestures.pointer_up(&mut self.world, &mut self.pointer);
    }

    /// Leaving the surface releases like a pointer up
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Adopt new surface bounds and re-seed the population for them. A bubble
    /// being dragged survives, pulled back on-surface.
    pub fn resize(&mut self, width: f32, height: f32) {
        let bounds = Bounds::new(width, height);
        self.world.resize(bounds);
        self.reseed();
        log::info!(
            "Resized to {}x{}, {} bubbles",
            bounds.width,
            bounds.height,
            self.world.bubbles.len()
        );
    }

    /// Replace the configuration. A new bubble count re-seeds the population.
    pub fn set_settings(&mut self, settings: BubbleSettings) {
        let settings = settings.sanitized();
        let reseed = settings.bubble_count != self.settings.bubble_count;
        self.settings = settings;
        log::info!("Settings updated: {:?}", self.settings);
        if reseed {
            self.reseed();
        }
    }

    fn reseed(&mut self) {
        let held = self.world.bubbles.iter().find(|b| b.is_dragging()).cloned();
        seed_population(&mut self.world, self.settings.bubble_count);
        if let Some(bubble) = held {
            // Oldest id goes first
            self.world.bubbles.insert(0, bubble);
        }
    }

    /// Primitives from the last frame
    pub fn draw_list(&self) -> &[DrawCircle] {
        &self.draw_list
    }

    /// Primitives from the last frame as raw bytes
    pub fn draw_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.draw_list)
    }
}
