use serde::{Deserialize, Serialize};

/// Axis-aligned bounding area on a page, in PDF user space (origin bottom-left)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from two opposite corners in any order
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// A region with no area cannot carry a visible highlight
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Smallest region covering both
    pub fn union(&self, other: &Region) -> Region {
        Region::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.top().max(other.top()),
        )
    }

    /// QuadPoints order used by text markup annotations:
    /// top-left, top-right, bottom-left, bottom-right
    pub fn quad_points(&self) -> [f64; 8] {
        [
            self.x,
            self.top(),
            self.right(),
            self.top(),
            self.x,
            self.y,
            self.right(),
            self.y,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes_order() {
        let region = Region::from_corners(110.0, 40.0, 10.0, 20.0);
        assert_eq!(region, Region::new(10.0, 20.0, 100.0, 20.0));
    }

    #[test]
    fn test_union_covers_both() {
        let a = Region::new(10.0, 700.0, 50.0, 12.0);
        let b = Region::new(80.0, 698.0, 20.0, 16.0);
        let u = a.union(&b);
        assert_eq!(u.x, 10.0);
        assert_eq!(u.y, 698.0);
        assert_eq!(u.right(), 100.0);
        assert_eq!(u.top(), 714.0);
    }

    #[test]
    fn test_zero_area_is_empty() {
        assert!(Region::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(Region::new(0.0, 0.0, 10.0, 0.0).is_empty());
        assert!(!Region::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_quad_points_layout() {
        let quad = Region::new(10.0, 20.0, 30.0, 5.0).quad_points();
        assert_eq!(quad, [10.0, 25.0, 40.0, 25.0, 10.0, 20.0, 40.0, 20.0]);
    }
}
