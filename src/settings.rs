//! Bubble settings
//!
//! The configuration record the host hands to the engine. Field names follow
//! the host's camelCase JSON so a `data-settings` attribute or a JS object can
//! be passed straight through.

use serde::{Deserialize, Serialize};

/// Simulation tuning exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BubbleSettings {
    /// Number of bubbles seeded on start and on resize (>= 1)
    pub bubble_count: u32,
    /// Gravity strength (>= 0, 0 disables grounding)
    pub gravity: f32,
    /// Formation tightness and bounce-off damping, in (0, 1]
    pub bounce: f32,
    /// Per-frame velocity retention of exploding dots, in (0, 1]
    pub air_resistance: f32,
    /// Blow and pop impulse magnitude (> 0)
    pub blow_force: f32,
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            bubble_count: 8,
            gravity: 0.3,
            bounce: 0.8,
            air_resistance: 0.99,
            blow_force: 14.0,
        }
    }
}

impl BubbleSettings {
    const MIN_BOUNCE: f32 = 0.01;
    const MIN_AIR_RESISTANCE: f32 = 0.01;
    const MIN_BLOW_FORCE: f32 = 0.1;
    /// Upper bound on the seeded population
    const MAX_BUBBLES: u32 = 64;
    const MAX_GRAVITY: f32 = 10.0;
    const MAX_BLOW_FORCE: f32 = 100.0;

    /// Parse settings from JSON. Missing fields fall back to defaults; the
    /// result is sanitized.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Clamp every field into its valid domain. Non-finite values are
    /// replaced with the default for that field.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f32, d: f32| if v.is_finite() { v } else { d };

        Self {
            bubble_count: self.bubble_count.clamp(1, Self::MAX_BUBBLES),
            gravity: finite_or(self.gravity, defaults.gravity).clamp(0.0, Self::MAX_GRAVITY),
            bounce: finite_or(self.bounce, defaults.bounce).clamp(Self::MIN_BOUNCE, 1.0),
            air_resistance: finite_or(self.air_resistance, defaults.air_resistance)
                .clamp(Self::MIN_AIR_RESISTANCE, 1.0),
            blow_force: finite_or(self.blow_force, defaults.blow_force)
                .clamp(Self::MIN_BLOW_FORCE, Self::MAX_BLOW_FORCE),
        }
    }

    /// Formation spring constant derived from bounce (tighter when bouncier)
    pub fn spring_force(&self) -> f32 {
        use crate::consts::{SPRING_BASE, SPRING_BOUNCE_SCALE};
        SPRING_BASE + self.bounce * SPRING_BOUNCE_SCALE
    }
}
