//! Frame scheduling
//!
//! The engine does not own a loop. The host supplies a per-frame callback
//! (requestAnimationFrame in the browser, a plain loop natively) through
//! `FrameHost`, and `Scheduler` tracks whether a callback is outstanding so
//! `stop()` can cancel it.

/// A host capable of calling back once on the next frame
pub trait FrameHost {
    /// Request one callback; returns a handle usable with `cancel_frame`
    fn request_frame(&mut self) -> i32;
    /// Cancel a previously requested callback
    fn cancel_frame(&mut self, handle: i32);
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    running: bool,
    pending: Option<i32>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start requesting frames. No-op if already running.
    pub fn start<H: FrameHost>(&mut self, host: &mut H) {
        if self.running {
            return;
        }
        self.running = true;
        self.pending = Some(host.request_frame());
    }

    /// Stop and cancel the outstanding frame callback, if any
    pub fn stop<H: FrameHost>(&mut self, host: &mut H) {
        self.running = false;
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
    }

    /// Called from the host's frame callback. Returns whether a frame should
    /// run; when it should, the next callback has already been requested.
    pub fn frame_fired<H: FrameHost>(&mut self, host: &mut H) -> bool {
        self.pending = None;
        if !self.running {
            return false;
        }
        self.pending = Some(host.request_frame());
        true
    }
}
