//! Platform abstraction layer
//!
//! Handles the seams between the simulation and its host:
//! - Pointer position and smoothed velocity
//! - Host-clocked repeating tasks
//! - Frame scheduling (start/stop over the host's per-frame callback)

pub mod input;
pub mod scheduler;
pub mod timer;

pub use input::PointerTracker;
pub use scheduler::{FrameHost, Scheduler};
pub use timer::RepeatingTask;
