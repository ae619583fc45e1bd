//! The best-first search engine.

use std::fmt;

use gridrun_core::{CostGrid, Point};

use crate::distance::manhattan;
use crate::frontier::Frontier;
use crate::heading::Heading;
use crate::state::{RunLimits, SearchState};

/// Returned when the frontier empties before any acceptable goal state is
/// popped: no route from the top-left to the bottom-right cell satisfies the
/// run constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoRouteError;

impl fmt::Display for NoRouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no route to the destination satisfies the run constraints")
    }
}

impl std::error::Error for NoRouteError {}

/// Run-constrained shortest-route engine.
///
/// `RouteSearch` owns the visited table, the frontier, and a successor
/// scratch buffer so that repeated searches reuse their allocations. Each
/// call is an independent search: the visited table is invalidated between
/// calls by bumping a generation counter rather than by clearing it.
///
/// The visited table is flat, indexed by the full configuration
/// `(cell, heading, run)`: grid position alone is not sufficient state, a
/// cell may be worth re-expanding under a different heading or run length.
#[derive(Default)]
pub struct RouteSearch {
    /// Generation stamp per configuration; `== generation` means expanded.
    visited: Vec<u32>,
    generation: u32,
    frontier: Frontier,
    sbuf: Vec<SearchState>,
}

impl RouteSearch {
    /// Create a new engine with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum total cost from the top-left to the bottom-right cell of
    /// `grid` under `limits`.
    ///
    /// The cost of the starting cell is not counted; every step adds the
    /// cost of the cell entered. A goal arrival is only accepted once the
    /// current straight run has reached `limits.min_run`, so on a 1×1 grid
    /// the result is 0 when `min_run` is 0 and [`NoRouteError`] otherwise.
    pub fn min_cost(&mut self, grid: &CostGrid, limits: RunLimits) -> Result<i32, NoRouteError> {
        let goal = Point::new(grid.width() - 1, grid.height() - 1);
        // One visited slot per (cell, heading, run) configuration, with an
        // extra heading slot for the heading-less start state. The run
        // dimension is at least 1 to hold the start state's run of 0.
        let runs = (limits.max_run + 1).max(1) as usize;
        let slots = Heading::ALL.len() + 1;
        self.ensure_capacity(grid.bounds().len() * slots * runs);

        self.generation = self.generation.wrapping_add(1);
        let cur_gen = self.generation;

        let width = grid.width();
        let config_idx = |s: &SearchState| -> usize {
            let cell = (s.pos.y * width + s.pos.x) as usize;
            let slot = match s.heading {
                Some(h) => h as usize,
                None => Heading::ALL.len(),
            };
            (cell * slots + slot) * runs + s.run as usize
        };

        self.frontier.clear();
        let start = SearchState::initial();
        self.frontier.push(start, manhattan(start.pos, goal));

        let mut sbuf = std::mem::take(&mut self.sbuf);
        let mut expanded: usize = 0;

        let result = loop {
            let Some(state) = self.frontier.pop() else {
                break Err(NoRouteError);
            };

            // First goal state popped is optimal: the heuristic never
            // overestimates and every edge cost is non-negative.
            if state.pos == goal && state.run >= limits.min_run {
                break Ok(state.cost);
            }

            let ci = config_idx(&state);
            if self.visited[ci] == cur_gen {
                continue;
            }
            self.visited[ci] = cur_gen;
            expanded += 1;

            sbuf.clear();
            state.successors(grid, limits, &mut sbuf);
            for &s in sbuf.iter() {
                self.frontier.push(s, s.cost + manhattan(s.pos, goal));
            }
        };

        self.sbuf = sbuf;

        match result {
            Ok(cost) => log::debug!("route found: cost {cost} after {expanded} expansions"),
            Err(_) => log::debug!("no route: frontier exhausted after {expanded} expansions"),
        }
        result
    }

    /// Grow the visited table if `needed` exceeds its current size.
    ///
    /// When the table already fits, stale entries stay in place; the
    /// caller's generation bump invalidates them lazily.
    fn ensure_capacity(&mut self, needed: usize) {
        if needed <= self.visited.len() {
            return;
        }
        self.visited.clear();
        self.visited.resize(needed, 0);
        self.generation = 0;
    }
}

/// One-shot search: compute the minimum route cost with a fresh engine.
pub fn min_route_cost(grid: &CostGrid, limits: RunLimits) -> Result<i32, NoRouteError> {
    RouteSearch::new().min_cost(grid, limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: RunLimits = RunLimits::new(0, 3);
    const EXTENDED: RunLimits = RunLimits::new(4, 10);

    /// 13×13 reference grid with known minimum costs for both modes.
    const GRID_13: &str = "\
2413432311323
3215453535623
3255245654254
3446585845452
4546657867536
1438598798454
4457876987766
3637877979653
4654967986887
4564679986453
1224686865563
2546548887735
4322674655533";

    /// Grid that tempts a long straight run the extended limits forbid.
    const GRID_FLAT: &str = "\
111111111111
999999999991
999999999991
999999999991
999999999991";

    fn grid(s: &str) -> CostGrid {
        CostGrid::from_digits(s).unwrap()
    }

    #[test]
    fn reference_grid_with_basic_limits() {
        assert_eq!(min_route_cost(&grid(GRID_13), BASIC), Ok(102));
    }

    #[test]
    fn reference_grid_with_extended_limits() {
        assert_eq!(min_route_cost(&grid(GRID_13), EXTENDED), Ok(94));
    }

    #[test]
    fn min_run_forces_detour_through_expensive_cells() {
        assert_eq!(min_route_cost(&grid(GRID_FLAT), EXTENDED), Ok(71));
    }

    #[test]
    fn single_cell_grid() {
        // Start equals goal; an empty run satisfies min_run 0.
        let g = grid("5");
        assert_eq!(min_route_cost(&g, BASIC), Ok(0));
        // Extended limits can never complete a 4-step run on one cell.
        assert_eq!(min_route_cost(&g, EXTENDED), Err(NoRouteError));
    }

    #[test]
    fn corridor_within_max_run() {
        // Three steps east, run 3 == max_run.
        assert_eq!(min_route_cost(&grid("1111"), BASIC), Ok(3));
    }

    #[test]
    fn corridor_beyond_max_run_has_no_route() {
        // Five consecutive east steps required, max_run is 3 and there is
        // no room to turn.
        assert_eq!(min_route_cost(&grid("111111"), BASIC), Err(NoRouteError));
    }

    #[test]
    fn corridor_exactly_min_run_is_acceptable() {
        // Four steps east satisfies min_run 4 at the goal.
        assert_eq!(min_route_cost(&grid("11111"), EXTENDED), Ok(4));
    }

    #[test]
    fn min_run_unreachable_on_tiny_grid() {
        assert_eq!(min_route_cost(&grid("11\n11"), EXTENDED), Err(NoRouteError));
    }

    #[test]
    fn zero_max_run_only_solves_the_trivial_grid() {
        let limits = RunLimits::new(0, 0);
        assert_eq!(min_route_cost(&grid("5"), limits), Ok(0));
        assert_eq!(min_route_cost(&grid("12\n34"), limits), Err(NoRouteError));
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let g = grid(GRID_13);
        let first = min_route_cost(&g, BASIC);
        for _ in 0..3 {
            assert_eq!(min_route_cost(&g, BASIC), first);
        }
    }

    #[test]
    fn engine_reuse_across_limit_changes() {
        // The same engine must give the same answers as fresh ones; the
        // extended call needs a larger visited table, the second basic call
        // a smaller one (generation bump, no reallocation).
        let g = grid(GRID_13);
        let mut search = RouteSearch::new();
        assert_eq!(search.min_cost(&g, BASIC), Ok(102));
        assert_eq!(search.min_cost(&g, EXTENDED), Ok(94));
        assert_eq!(search.min_cost(&g, BASIC), Ok(102));
    }

    #[test]
    fn raising_a_cell_cost_never_lowers_the_minimum() {
        let rows = |bump: i32| {
            vec![
                vec![1, 2, 3],
                vec![4, 5 + bump, 6],
                vec![7, 8, 1],
            ]
        };
        let base = min_route_cost(&CostGrid::from_rows(rows(0)).unwrap(), BASIC).unwrap();
        for bump in 1..4 {
            let raised = min_route_cost(&CostGrid::from_rows(rows(bump)).unwrap(), BASIC).unwrap();
            assert!(raised >= base);
        }
    }

    #[test]
    fn takes_the_cheap_middle_row() {
        // Both rim paths cost 20; south, east, east, south costs 4.
        let g = grid("\
199
111
991");
        assert_eq!(min_route_cost(&g, BASIC), Ok(4));
    }
}
