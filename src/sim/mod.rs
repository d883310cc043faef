//! Deterministic simulation module
//!
//! All bubble physics lives here. This module must stay deterministic:
//! - One step per frame, no variable timestep
//! - Seeded RNG only (owned by the World)
//! - Stable iteration order (creation order, ids ascending)
//! - No rendering or platform dependencies beyond the pointer tracker and
//!   timer types the gesture controller is driven with

pub mod collision;
pub mod factory;
pub mod gesture;
pub mod integrate;
pub mod interaction;
pub mod lifecycle;
pub mod state;
pub mod tick;

pub use collision::{Contact, circle_contact};
pub use factory::{PALETTE, create_bubble, create_bubble_at, seed_population};
pub use gesture::{DeferredAction, GestureController};
pub use interaction::{blow, deform_dragged, pop, throw};
pub use state::{Bounds, Bubble, Dot, DotState, RngState, World};
pub use tick::{FrameInput, tick};
