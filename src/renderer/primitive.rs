//! Draw primitives handed to the host

use bytemuck::{Pod, Zeroable};

/// A filled disc. `glow > 0` asks the host to draw it with a shadow blur of
/// that many pixels in the same colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawCircle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Opacity in [0, 1]
    pub alpha: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
    pub glow: f32,
}

impl DrawCircle {
    pub const fn new(x: f32, y: f32, radius: f32, alpha: f32, color: u32) -> Self {
        Self {
            x,
            y,
            radius,
            alpha,
            color,
            glow: 0.0,
        }
    }

    pub const fn with_glow(mut self, blur: f32) -> Self {
        self.glow = blur;
        self
    }

    #[inline]
    pub fn is_glow(&self) -> bool {
        self.glow > 0.0
    }
}

/// `#rrggbb` for a packed colour
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0x00ff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(0x8b5cf6), "#8b5cf6");
        assert_eq!(css_color(0x06b6d4), "#06b6d4");
        assert_eq!(css_color(0xff00_0000), "#000000");
    }

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<DrawCircle>(), 24);
        let circles = [DrawCircle::new(1.0, 2.0, 5.0, 1.0, 0xabcdef)];
        let bytes: &[u8] = bytemuck::cast_slice(&circles);
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
    }
}
