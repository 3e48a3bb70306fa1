use serde::{Deserialize, Serialize};

/// Identifier for a mouse button (left button is zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MouseButton(u8);

impl MouseButton {
    pub const LEFT: Self = Self(0);
    pub const MIDDLE: Self = Self(1);
    pub const RIGHT: Self = Self(2);

    pub fn new(index: u8) -> Self {
        Self(index)
    }

    /// Maps a DOM `MouseEvent.button` value, which uses the same numbering.
    pub fn from_dom(button: i16) -> Self {
        Self(button.clamp(0, u8::MAX as i16) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

/// Step applied to the segment count by a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKey {
    Increase,
    Decrease,
}

impl SegmentKey {
    /// Parses key names as reported by browsers (`KeyboardEvent.key`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" | "ArrowRight" | "Up" | "Right" | "+" | "=" => Some(Self::Increase),
            "ArrowDown" | "ArrowLeft" | "Down" | "Left" | "-" | "_" => Some(Self::Decrease),
            _ => None,
        }
    }

    /// Like [`SegmentKey::from_name`], but ignores keys typed into a text
    /// field, which handles arrow keys on its own.
    pub fn from_document_key(name: &str, from_text_field: bool) -> Option<Self> {
        if from_text_field {
            return None;
        }
        Self::from_name(name)
    }

    pub fn delta(self) -> i64 {
        match self {
            Self::Increase => 1,
            Self::Decrease => -1,
        }
    }
}

/// Reduces a scroll delta to a single zoom notch. Zero and non-finite
/// deltas (horizontal swipes, for instance) map to `0.0`.
pub fn wheel_notch(delta: f64) -> f32 {
    if delta == 0.0 || !delta.is_finite() {
        0.0
    } else {
        delta.signum() as f32
    }
}

/// Ratio between surface pixels and CSS pixels on the web.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRatio(f64);

impl PixelRatio {
    pub fn new(ratio: f64) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            Self(ratio)
        } else {
            Self(1.0)
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Backing-store size for a CSS size, never below one pixel.
    pub fn to_physical_size(self, css_width: f64, css_height: f64) -> (u32, u32) {
        let scale = |value: f64| (value * self.0).round().max(1.0) as u32;
        (scale(css_width), scale(css_height))
    }

    pub fn to_physical_point(self, x: f64, y: f64) -> (f32, f32) {
        ((x * self.0) as f32, (y * self.0) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_buttons_keep_their_numbering() {
        assert_eq!(MouseButton::from_dom(0), MouseButton::LEFT);
        assert_eq!(MouseButton::from_dom(2), MouseButton::RIGHT);
        assert_eq!(MouseButton::from_dom(-1).index(), 0);
    }

    #[test]
    fn parses_segment_keys() {
        assert_eq!(SegmentKey::from_name("ArrowUp"), Some(SegmentKey::Increase));
        assert_eq!(SegmentKey::from_name("-"), Some(SegmentKey::Decrease));
        assert_eq!(SegmentKey::from_name("a"), None);
        assert_eq!(SegmentKey::Decrease.delta(), -1);
    }

    #[test]
    fn keys_typed_into_text_fields_are_left_alone() {
        assert_eq!(SegmentKey::from_document_key("ArrowUp", true), None);
        assert_eq!(
            SegmentKey::from_document_key("ArrowUp", false),
            Some(SegmentKey::Increase)
        );
    }

    #[test]
    fn zero_scroll_is_not_a_notch() {
        assert_eq!(wheel_notch(0.0), 0.0);
        assert_eq!(wheel_notch(-0.0), 0.0);
        assert_eq!(wheel_notch(f64::NAN), 0.0);
        assert_eq!(wheel_notch(120.0), 1.0);
        assert_eq!(wheel_notch(-3.0), -1.0);
    }

    #[test]
    fn pixel_ratio_scales_css_pixels() {
        let ratio = PixelRatio::new(2.0);
        assert_eq!(ratio.to_physical_size(640.0, 360.0), (1280, 720));
        assert_eq!(ratio.to_physical_point(10.5, 4.0), (21.0, 8.0));
        assert_eq!(ratio.to_physical_size(0.0, 0.2), (1, 1));
        assert_eq!(PixelRatio::new(0.0).get(), 1.0);
        assert_eq!(PixelRatio::new(f64::NAN).get(), 1.0);
    }
}
