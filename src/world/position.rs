//! Toroidal grid coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coordinate on the toroidal grid.
///
/// Coordinates are signed so that offsets may step past an edge before
/// being wrapped back into `[0, size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Wrap this position onto a grid of side `size`.
    #[must_use]
    #[inline]
    pub const fn wrapped(self, size: u16) -> Self {
        let size = size as i32;
        Self {
            x: self.x.rem_euclid(size),
            y: self.y.rem_euclid(size),
        }
    }

    /// Offset this position and wrap the result.
    #[must_use]
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, size: u16) -> Self {
        Self::new(self.x + dx, self.y + dy).wrapped(size)
    }

    /// Shortest signed per-axis delta from `self` to `other` on the torus.
    ///
    /// When both directions are equally short (even grid, half-way across)
    /// the positive direction is chosen.
    #[must_use]
    pub const fn toroidal_delta(self, other: Self, size: u16) -> (i32, i32) {
        (
            axis_delta(self.x, other.x, size),
            axis_delta(self.y, other.y, size),
        )
    }

    /// Squared Euclidean distance along the shortest toroidal path.
    #[must_use]
    pub const fn distance_sq(self, other: Self, size: u16) -> i64 {
        let (dx, dy) = self.toroidal_delta(other, size);
        (dx as i64) * (dx as i64) + (dy as i64) * (dy as i64)
    }

    /// Chebyshev (king-move) distance along the shortest toroidal path.
    #[must_use]
    pub const fn chebyshev(self, other: Self, size: u16) -> i32 {
        let (dx, dy) = self.toroidal_delta(other, size);
        let (dx, dy) = (dx.abs(), dy.abs());
        if dx > dy { dx } else { dy }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

const fn axis_delta(from: i32, to: i32, size: u16) -> i32 {
    let size = size as i32;
    let forward = (to - from).rem_euclid(size);
    if forward > size / 2 {
        forward - size
    } else {
        forward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_negative_and_overflow() {
        assert_eq!(Position::new(-1, 5).wrapped(5), Position::new(4, 0));
        assert_eq!(Position::new(7, -6).wrapped(5), Position::new(2, 4));
        assert_eq!(Position::new(3, 3).wrapped(5), Position::new(3, 3));
    }

    #[test]
    fn test_offset_wraps_across_edge() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.offset(-1, -1, 10), Position::new(9, 9));
        assert_eq!(Position::new(9, 4).offset(1, 0, 10), Position::new(0, 4));
    }

    #[test]
    fn test_toroidal_delta_prefers_short_way() {
        let a = Position::new(0, 0);
        let b = Position::new(9, 1);
        assert_eq!(a.toroidal_delta(b, 10), (-1, 1));
        assert_eq!(b.toroidal_delta(a, 10), (1, -1));
    }

    #[test]
    fn test_toroidal_delta_half_way_is_positive() {
        let a = Position::new(0, 0);
        let b = Position::new(5, 0);
        assert_eq!(a.toroidal_delta(b, 10), (5, 0));
        assert_eq!(b.toroidal_delta(a, 10), (5, 0));
    }

    #[test]
    fn test_distances_across_edge() {
        let a = Position::new(0, 0);
        let b = Position::new(9, 9);
        assert_eq!(a.distance_sq(b, 10), 2);
        assert_eq!(a.chebyshev(b, 10), 1);
        assert_eq!(a.chebyshev(Position::new(3, 1), 10), 3);
    }
}
