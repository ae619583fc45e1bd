use gridrun_core::Point;

/// Manhattan (L1) distance between two points.
///
/// Every cell cost is at least 1, so this is an admissible and consistent
/// lower bound on the remaining route cost.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
