//! Conway's Game of Life over the full 64-bit signed plane.
//!
//! Only living (and update-relevant) cells are stored: a region quadtree
//! over `[i64::MIN, i64::MAX]²` subdivides and merges adaptively so memory
//! tracks the live population, while a root-level position index gives the
//! generational update O(1) neighbor lookups. All coordinate arithmetic is
//! overflow-safe across the entire range, so patterns can live at (and wrap
//! around) the extreme bounds.

#![allow(clippy::bool_assert_comparison)]

pub mod coord;

mod aabb;
mod cell;
mod io;
mod tree;
mod update;

pub use aabb::{Aabb, InvalidAabb};
pub use cell::{Cell, CellState};
pub use coord::{Coord, Point};
pub use io::{parse_points, ParsePointsError};
pub use tree::{CellTree, NODE_CAPACITY};
