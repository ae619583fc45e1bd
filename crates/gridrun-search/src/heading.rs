//! Compass headings on the grid.

use gridrun_core::Point;

/// A travel heading. X grows right, Y grows down (screen coordinates).
///
/// Reversal is never a legal move, so no opposite-heading operation exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// All four headings, the candidate set for the heading-less start.
    pub const ALL: [Heading; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The unit step taken by this heading.
    #[inline]
    pub const fn delta(self) -> Point {
        match self {
            Self::North => Point::new(0, -1),
            Self::East => Point::new(1, 0),
            Self::South => Point::new(0, 1),
            Self::West => Point::new(-1, 0),
        }
    }

    /// The heading after a 90° left turn.
    #[inline]
    pub const fn turn_left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// The heading after a 90° right turn.
    #[inline]
    pub const fn turn_right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }
}
