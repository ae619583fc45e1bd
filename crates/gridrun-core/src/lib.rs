//! **gridrun-core** — foundational types for run-constrained grid routing.
//!
//! This crate provides the geometry primitives ([`Point`], [`Range`]) and the
//! immutable per-cell cost table ([`CostGrid`]) consumed by the search crate.

pub mod geom;
pub mod grid;

pub use geom::{Point, Range};
pub use grid::{CostGrid, GridError};
