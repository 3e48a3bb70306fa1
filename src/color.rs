use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Golden angle in degrees; successive hues stay maximally apart for any count.
pub const GOLDEN_ANGLE_DEGREES: f64 = 137.508;

/// sRGB color packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    pub const WHITE: Self = Self(0xffffff);

    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0xffffff)
    }

    pub const fn hex(self) -> u32 {
        self.0
    }

    /// Packs normalized channels, rounding each to the nearest byte.
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        Self((byte(r) << 16) | (byte(g) << 8) | byte(b))
    }

    /// Converts hue in degrees plus saturation and lightness in `[0, 1]`.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        if s == 0.0 {
            let v = l as f32;
            return Self::from_rgb(v, v, v);
        }
        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::from_rgb(
            hue_to_rgb(p, q, h + 1.0 / 3.0) as f32,
            hue_to_rgb(p, q, h) as f32,
            hue_to_rgb(p, q, h - 1.0 / 3.0) as f32,
        )
    }

    pub fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn b(self) -> u8 {
        self.0 as u8
    }

    /// Channels in `[0, 1]`, still sRGB encoded.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r() as f32, self.g() as f32, self.b() as f32) / 255.0
    }

    /// Channels decoded to linear light for shading and sRGB render targets.
    pub fn to_linear(self) -> Vec3 {
        let v = self.to_vec3();
        Vec3::new(srgb_to_linear(v.x), srgb_to_linear(v.y), srgb_to_linear(v.z))
    }

    /// CSS `rgb()` notation.
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.r(), self.g(), self.b())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Hue for the `index`-th item under golden-angle rotation.
pub fn golden_angle_hue(index: u32) -> f64 {
    (index as f64 * GOLDEN_ANGLE_DEGREES) % 360.0
}

/// Fully saturated, half lightness color for the `index`-th wedge.
pub fn sequential_color(index: u32) -> Color {
    Color::from_hsl(golden_angle_hue(index), 1.0, 0.5)
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
