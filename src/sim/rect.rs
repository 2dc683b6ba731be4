//! Axis-aligned rectangles for spatial partitioning
//!
//! Subdivision uses floored half extents, so an odd-sized region splits into
//! four equal integer-sized quadrants anchored at its top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

/// Rectangle given by its top-left corner and size (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from `[x, y, width, height]`
    pub fn from_slice(values: &[f32]) -> Result<Self, ConfigError> {
        match *values {
            [x, y, width, height] => Ok(Self::new(x, y, width, height)),
            _ => Err(ConfigError::Bounds { len: values.len() }),
        }
    }

    /// Half extents, floored
    #[inline]
    pub fn half_size(&self) -> Vec2 {
        Vec2::new((self.width / 2.0).floor(), (self.height / 2.0).floor())
    }

    /// Point where the vertical and horizontal split lines cross
    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        Vec2::new(self.x, self.y) + self.half_size()
    }

    /// Quadrants in NW, NE, SW, SE order
    pub fn split(&self) -> [Rect; 4] {
        let half = self.half_size();
        let (x, y) = (self.x, self.y);
        [
            Rect::new(x, y, half.x, half.y),
            Rect::new(x + half.x, y, half.x, half.y),
            Rect::new(x, y + half.y, half.x, half.y),
            Rect::new(x + half.x, y + half.y, half.x, half.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_requires_four_values() {
        let rect = Rect::from_slice(&[0.0, 0.0, 800.0, 600.0]).unwrap();
        assert_eq!(rect, Rect::new(0.0, 0.0, 800.0, 600.0));

        let err = Rect::from_slice(&[0.0, 0.0, 800.0]).unwrap_err();
        assert!(matches!(err, ConfigError::Bounds { len: 3 }));
        assert!(Rect::from_slice(&[0.0; 5]).is_err());
    }

    #[test]
    fn test_split_floors_odd_extents() {
        let rect = Rect::new(10.0, 20.0, 101.0, 51.0);
        assert_eq!(rect.midpoint(), Vec2::new(60.0, 45.0));
        let [nw, ne, sw, se] = rect.split();
        assert_eq!(nw, Rect::new(10.0, 20.0, 50.0, 25.0));
        assert_eq!(ne, Rect::new(60.0, 20.0, 50.0, 25.0));
        assert_eq!(sw, Rect::new(10.0, 45.0, 50.0, 25.0));
        assert_eq!(se, Rect::new(60.0, 45.0, 50.0, 25.0));
    }
}
