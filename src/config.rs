use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_SEGMENTS: u32 = 1;
pub const MAX_SEGMENTS: u32 = 25;
pub const DEFAULT_SEGMENTS: u32 = 5;

/// Rejected segment count input.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SegmentCountError {
    #[error("segment count {0} is outside {MIN_SEGMENTS}..={MAX_SEGMENTS}")]
    OutOfRange(i64),
    #[error("segment count {0} is not a whole number")]
    NotAnInteger(f64),
}

/// Number of wedges in the ring, always within `MIN_SEGMENTS..=MAX_SEGMENTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct SegmentCount(u32);

impl SegmentCount {
    pub const DEFAULT: Self = Self(DEFAULT_SEGMENTS);

    pub fn new(value: i64) -> Result<Self, SegmentCountError> {
        if (MIN_SEGMENTS as i64..=MAX_SEGMENTS as i64).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(SegmentCountError::OutOfRange(value))
        }
    }

    /// Validates a raw numeric form value. NaN, infinities and fractions are rejected.
    pub fn from_input(value: f64) -> Result<Self, SegmentCountError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(SegmentCountError::NotAnInteger(value));
        }
        if value < i64::MIN as f64 || value > i64::MAX as f64 {
            return Err(SegmentCountError::OutOfRange(value as i64));
        }
        Self::new(value as i64)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Steps the count by `delta`, returning `None` when the result leaves the valid range.
    pub fn step(self, delta: i64) -> Option<Self> {
        Self::new(self.0 as i64 + delta).ok()
    }
}

impl Default for SegmentCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for SegmentCount {
    type Error = SegmentCountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SegmentCount> for u32 {
    fn from(count: SegmentCount) -> Self {
        count.0
    }
}

impl fmt::Display for SegmentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Initial parameters for a radar view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub segments: SegmentCount,
    pub width: u32,
    pub height: u32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: Vec3,
}

impl ViewConfig {
    pub fn aspect(&self) -> f32 {
        aspect_ratio(self.width, self.height)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            segments: SegmentCount::DEFAULT,
            width: 1280,
            height: 720,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_position: Vec3::new(0.0, 5.0, 10.0),
        }
    }
}

pub(crate) fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(SegmentCount::new(1).unwrap().get(), 1);
        assert_eq!(SegmentCount::new(25).unwrap().get(), 25);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            SegmentCount::new(0),
            Err(SegmentCountError::OutOfRange(0))
        );
        assert_eq!(
            SegmentCount::new(26),
            Err(SegmentCountError::OutOfRange(26))
        );
        assert!(SegmentCount::new(-3).is_err());
    }

    #[test]
    fn rejects_non_integer_input() {
        assert!(matches!(
            SegmentCount::from_input(2.5),
            Err(SegmentCountError::NotAnInteger(_))
        ));
        assert!(SegmentCount::from_input(f64::NAN).is_err());
        assert!(SegmentCount::from_input(f64::INFINITY).is_err());
        assert_eq!(SegmentCount::from_input(7.0).unwrap().get(), 7);
    }

    #[test]
    fn step_stays_in_range() {
        let max = SegmentCount::new(25).unwrap();
        assert_eq!(max.step(1), None);
        assert_eq!(max.step(-1).map(SegmentCount::get), Some(24));
        let min = SegmentCount::new(1).unwrap();
        assert_eq!(min.step(-1), None);
    }

    #[test]
    fn deserialize_validates() {
        let config: ViewConfig = serde_json::from_str(r#"{"segments": 9}"#).unwrap();
        assert_eq!(config.segments.get(), 9);
        assert_eq!(config.width, 1280);
        assert!(serde_json::from_str::<ViewConfig>(r#"{"segments": 40}"#).is_err());
    }

    #[test]
    fn default_aspect_matches_viewport() {
        let config = ViewConfig::default();
        assert!((config.aspect() - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(aspect_ratio(10, 0), 1.0);
    }
}
