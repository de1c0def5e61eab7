use crate::coord::{self, Coord, Point};
use thiserror::Error;

/// An inverted box is the only user-correctable error in the core; every
/// other failure mode is an internal invariant violation and panics.
#[derive(Error, Copy, Clone, Eq, PartialEq, Debug)]
#[error("invalid bounding box: left {left} > right {right} or top {top} > bottom {bottom}")]
pub struct InvalidAabb {
    pub left: Coord,
    pub right: Coord,
    pub top: Coord,
    pub bottom: Coord,
}

/// Axis-aligned bounding box with inclusive bounds on both axes. `top` is
/// the smaller y. The center is derived from the bounds with overflow-safe
/// midpoints and is the split point for subdivision.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Aabb {
    pub center: Point,
    pub left: Coord,
    pub right: Coord,
    pub top: Coord,
    pub bottom: Coord,
}

impl Aabb {
    pub fn new(left: Coord, right: Coord, top: Coord, bottom: Coord) -> Result<Self, InvalidAabb> {
        if left > right || top > bottom {
            return Err(InvalidAabb {
                left,
                right,
                top,
                bottom,
            });
        }
        Ok(Self::from_bounds(left, right, top, bottom))
    }

    /// The box spanning the entire representable plane.
    pub fn full() -> Self {
        Self::from_bounds(Coord::MIN, Coord::MAX, Coord::MIN, Coord::MAX)
    }

    fn from_bounds(left: Coord, right: Coord, top: Coord, bottom: Coord) -> Self {
        debug_assert!(left <= right && top <= bottom);
        Aabb {
            center: Point::new(coord::midpoint(left, right), coord::midpoint(top, bottom)),
            left,
            right,
            top,
            bottom,
        }
    }

    /// Closed-interval containment on both axes.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Closed-interval overlap on both axes, as the negated disjointness
    /// test.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.left > other.right
            || self.right < other.left
            || self.top > other.bottom
            || self.bottom < other.top)
    }

    /// Whether the box can still be halved in both dimensions. A box below 2
    /// units of width or height never subdivides; that is the base case that
    /// terminates subdivision.
    pub fn splittable(&self) -> bool {
        coord::distance(self.right, self.left) >= 2 && coord::distance(self.bottom, self.top) >= 2
    }

    /// The four quadrants in NW, NE, SW, SE order, split at the center with
    /// a +1 offset on the east and south sides so the children are disjoint
    /// and exactly cover the parent. Only valid for splittable boxes.
    pub fn quadrants(&self) -> [Aabb; 4] {
        debug_assert!(self.splittable());

        let Point { x: cx, y: cy } = self.center;
        let east = coord::add(cx, 1);
        let south = coord::add(cy, 1);

        let nw = Self::from_bounds(self.left, cx, self.top, cy);
        let ne = Self::from_bounds(east, self.right, self.top, cy);
        let sw = Self::from_bounds(self.left, cx, south, self.bottom);
        let se = Self::from_bounds(east, self.right, south, self.bottom);

        [nw, ne, sw, se]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_construction() {
        assert!(Aabb::new(10, -10, 0, 0).is_err());
        assert!(Aabb::new(0, 0, 10, -10).is_err());
        let err = Aabb::new(1, 0, 0, 0).unwrap_err();
        assert_eq!(err.left, 1);
        assert!(Aabb::new(0, 0, 0, 0).is_ok());
    }

    #[test]
    fn test_contains() {
        let bb = Aabb::new(-10, 10, -10, 10).unwrap();
        assert!(bb.contains(Point::new(0, 0)));
        assert!(bb.contains(Point::new(-10, -10)));
        assert!(bb.contains(Point::new(10, -10)));
        assert!(bb.contains(Point::new(10, 10)));
        assert!(bb.contains(Point::new(-10, 10)));
        assert!(bb.contains(Point::new(5, 5)));
        assert!(!bb.contains(Point::new(10, -11)));
        assert!(!bb.contains(Point::new(11, 0)));

        let bb = Aabb::new(-(1 << 16), 1 << 16, i64::MIN, 0).unwrap();
        assert!(bb.contains(Point::new(0, 0)));
        assert!(!bb.contains(Point::new(0, 1)));
        assert!(bb.contains(Point::new(10000, -100000000)));
    }

    #[test]
    fn test_intersects() {
        let aa = Aabb::new(-10, 10, -10, 10).unwrap();
        let bb = Aabb::new(10, 100, -100, 10).unwrap();
        assert!(bb.intersects(&aa));
        assert!(aa.intersects(&bb));

        let cc = Aabb::new(11, 100, -10, 10).unwrap();
        assert!(!aa.intersects(&cc));
        assert!(!cc.intersects(&aa));
    }

    #[test]
    fn test_full_range() {
        let bb = Aabb::full();
        assert!(bb.contains(Point::new(i64::MIN, i64::MAX)));
        assert!(bb.contains(Point::new(0, 0)));
        assert!(bb.splittable());
        assert_eq!(bb.center, Point::new(-1, -1));
    }

    #[test]
    fn test_quadrants_partition() {
        let bb = Aabb::new(-8, 7, -8, 7).unwrap();
        let [nw, ne, sw, se] = bb.quadrants();

        assert_eq!((nw.left, nw.right, nw.top, nw.bottom), (-8, -1, -8, -1));
        assert_eq!((ne.left, ne.right, ne.top, ne.bottom), (0, 7, -8, -1));
        assert_eq!((sw.left, sw.right, sw.top, sw.bottom), (-8, -1, 0, 7));
        assert_eq!((se.left, se.right, se.top, se.bottom), (0, 7, 0, 7));

        // Every point of the parent lands in exactly one child.
        for x in -8..=7 {
            for y in -8..=7 {
                let p = Point::new(x, y);
                let hits = [nw, ne, sw, se]
                    .iter()
                    .filter(|q| q.contains(p))
                    .count();
                assert_eq!(hits, 1, "point {:?} hit {} quadrants", p, hits);
            }
        }
    }

    #[test]
    fn test_quadrants_smallest_box() {
        // A 2x2 box is the base case and never subdivides.
        let unit2 = Aabb::new(0, 1, 0, 1).unwrap();
        assert!(!unit2.splittable());

        // The smallest splittable box spans distance 2 on both axes; all of
        // its quadrants are below that threshold.
        let bb = Aabb::new(0, 2, 0, 2).unwrap();
        assert!(bb.splittable());
        let [nw, ne, sw, se] = bb.quadrants();
        assert_eq!((nw.left, nw.right, nw.top, nw.bottom), (0, 1, 0, 1));
        assert_eq!((ne.left, ne.right, ne.top, ne.bottom), (2, 2, 0, 1));
        assert_eq!((sw.left, sw.right, sw.top, sw.bottom), (0, 1, 2, 2));
        assert_eq!((se.left, se.right, se.top, se.bottom), (2, 2, 2, 2));
        for q in [nw, ne, sw, se].iter() {
            assert!(!q.splittable());
        }

        let thin = Aabb::new(0, 100, 3, 4).unwrap();
        assert!(!thin.splittable());
    }
}
