use std::fmt::{Debug, Formatter, Result as DebugResult};

/// One axis of the simulated plane. The whole signed 64-bit range is
/// addressable, so every operation below must be defined at the extremes.
pub type Coord = i64;

/// Two's-complement wrapping addition. A neighbor of `i64::MAX` wraps to
/// `i64::MIN`; the root box contains every representable point, so wrapped
/// positions are ordinary positions.
pub fn add(a: Coord, b: Coord) -> Coord {
    a.wrapping_add(b)
}

pub fn sub(a: Coord, b: Coord) -> Coord {
    a.wrapping_sub(b)
}

/// Magnitude of `a - b`, computed in the unsigned domain so that
/// `distance(i64::MIN, i64::MAX)` does not overflow.
pub fn distance(a: Coord, b: Coord) -> u64 {
    if a > b {
        (a as u64).wrapping_sub(b as u64)
    } else {
        (b as u64).wrapping_sub(a as u64)
    }
}

/// Midpoint of `a` and `b` without ever forming `a + b`: each operand is
/// halved separately and the two dropped remainders are re-added as a carry.
pub fn midpoint(a: Coord, b: Coord) -> Coord {
    a / 2 + b / 2 + (a % 2 + b % 2) / 2
}

#[derive(Hash, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Point { x, y }
    }

    /// The 8 orthogonally and diagonally adjacent positions, wrapping at the
    /// ends of the coordinate range.
    pub fn neighbors(&self) -> [Point; 8] {
        let Point { x, y } = *self;
        [
            Point::new(add(x, 1), y),
            Point::new(x, add(y, 1)),
            Point::new(add(x, -1), y),
            Point::new(x, add(y, -1)),
            Point::new(add(x, 1), add(y, 1)),
            Point::new(add(x, 1), add(y, -1)),
            Point::new(add(x, -1), add(y, -1)),
            Point::new(add(x, -1), add(y, 1)),
        ]
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> DebugResult {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn distance_at_extremes() {
        assert_eq!(distance(i64::MAX, i64::MIN), u64::MAX);
        assert_eq!(distance(i64::MIN, i64::MAX), u64::MAX);
        assert_eq!(distance(i64::MIN, i64::MIN), 0);
        assert_eq!(distance(i64::MAX, i64::MAX), 0);
        assert_eq!(distance(-1, 1), 2);
        assert_eq!(distance(1, -1), 2);
    }

    #[test]
    fn midpoint_at_extremes() {
        assert_eq!(midpoint(i64::MIN, i64::MAX), -1);
        assert_eq!(midpoint(i64::MAX, i64::MAX), i64::MAX);
        assert_eq!(midpoint(i64::MIN, i64::MIN), i64::MIN);
        assert_eq!(midpoint(i64::MAX - 1, i64::MAX), i64::MAX - 1);
        assert_eq!(midpoint(0, 1), 0);
        assert_eq!(midpoint(-1, 0), 0);
        assert_eq!(midpoint(-3, -1), -2);
    }

    #[test]
    fn neighbors_wrap() {
        let p = Point::new(i64::MAX, i64::MIN);
        let ns = p.neighbors();
        assert!(ns.contains(&Point::new(i64::MIN, i64::MIN)));
        assert!(ns.contains(&Point::new(i64::MAX, i64::MAX)));
        assert!(ns.contains(&Point::new(i64::MAX - 1, i64::MIN + 1)));
        assert_eq!(ns.len(), 8);
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(distance(a, b), distance(b, a));
        }

        #[test]
        fn midpoint_lies_between(a in any::<i64>(), b in any::<i64>()) {
            let m = midpoint(a, b);
            prop_assert!(m >= a.min(b));
            prop_assert!(m <= a.max(b));
            prop_assert_eq!(midpoint(a, b), midpoint(b, a));
        }

        #[test]
        fn add_wraps_like_two_complement(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(add(a, b) as u64, (a as u64).wrapping_add(b as u64));
            prop_assert_eq!(sub(add(a, b), b), a);
        }
    }
}
