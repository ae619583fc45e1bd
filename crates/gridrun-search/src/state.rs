//! Search states and the expansion rule.

use std::hash::{Hash, Hasher};

use gridrun_core::{CostGrid, Point};

use crate::heading::Heading;

/// Limits on consecutive same-heading steps.
///
/// `max_run` bounds how far the traveler may go without turning; `min_run`
/// is the number of steps that must be completed in the current heading
/// before a turn (or a stop at the destination) is permitted. The classic
/// parameterizations are `(0, 3)` and `(4, 10)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunLimits {
    pub min_run: i32,
    pub max_run: i32,
}

impl RunLimits {
    /// Create new limits. Requires `0 <= min_run <= max_run`.
    #[inline]
    pub const fn new(min_run: i32, max_run: i32) -> Self {
        Self { min_run, max_run }
    }
}

/// One traversal configuration plus its accumulated cost.
///
/// `run` counts consecutive steps taken in `heading`: it resets to 1 on a
/// turn and increments on a straight step. `heading` is `None` only for the
/// initial state, where `run` is 0.
///
/// Equality and hashing cover `(pos, heading, run)` only. `cost` is
/// excluded, so identity means *reachable configuration*, not a particular
/// route to it.
#[derive(Copy, Clone, Debug)]
pub struct SearchState {
    pub pos: Point,
    pub heading: Option<Heading>,
    pub run: i32,
    pub cost: i32,
}

impl PartialEq for SearchState {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos && self.heading == other.heading && self.run == other.run
    }
}

impl Eq for SearchState {}

impl Hash for SearchState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
        self.heading.hash(state);
        self.run.hash(state);
    }
}

impl SearchState {
    /// The unique start configuration: origin, no heading, zero cost.
    #[inline]
    pub const fn initial() -> Self {
        Self {
            pos: Point::ZERO,
            heading: None,
            run: 0,
            cost: 0,
        }
    }

    /// Append every valid successor of `self` to `buf`.
    ///
    /// Candidates are the left turn, straight continuation, and right turn
    /// of the current heading (all four headings from the start state);
    /// reversal is never a candidate. A straight step past `max_run`, a turn
    /// before `min_run`, or an off-grid target is discarded. The caller
    /// clears `buf` before calling.
    pub fn successors(&self, grid: &CostGrid, limits: RunLimits, buf: &mut Vec<SearchState>) {
        match self.heading {
            None => {
                for h in Heading::ALL {
                    self.step(h, grid, limits, buf);
                }
            }
            Some(h) => {
                self.step(h.turn_left(), grid, limits, buf);
                self.step(h, grid, limits, buf);
                self.step(h.turn_right(), grid, limits, buf);
            }
        }
    }

    /// Push the successor reached by one step along `h`, if legal.
    fn step(&self, h: Heading, grid: &CostGrid, limits: RunLimits, buf: &mut Vec<SearchState>) {
        let run = match self.heading {
            Some(last) if last == h => self.run + 1,
            // Turning is only allowed once the current straight run is done.
            Some(_) if self.run < limits.min_run => return,
            _ => 1,
        };
        if run > limits.max_run {
            return;
        }
        let pos = self.pos + h.delta();
        let Some(step_cost) = grid.at(pos) else {
            return;
        };
        buf.push(SearchState {
            pos,
            heading: Some(h),
            run,
            cost: self.cost + step_cost,
        });
    }
}
