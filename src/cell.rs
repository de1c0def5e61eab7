use crate::coord::Point;
use std::fmt::{Debug, Formatter, Result as DebugResult};

const ALIVE_MASK: u8 = 0b0_0001;
const NEIGHBOR_MASK: u8 = 0b1_1110;

/// Packed per-cell state: bit 0 is the alive flag, bits 1-4 hold the neighbor
/// count (0-8). One byte per cell keeps the update bookkeeping dense.
#[derive(Hash, Copy, Clone, Eq, PartialEq, Default)]
pub struct CellState(u8);

impl CellState {
    pub const DEAD: CellState = CellState(0);
    pub const ALIVE: CellState = CellState(ALIVE_MASK);

    pub fn alive(self) -> bool {
        self.0 & ALIVE_MASK != 0
    }

    pub fn neighbor_count(self) -> u8 {
        (self.0 & NEIGHBOR_MASK) >> 1
    }

    pub fn set_alive(&mut self, alive: bool) {
        self.0 = (self.0 & !ALIVE_MASK) | alive as u8;
    }

    /// Zero the neighbor count, keeping the alive bit.
    pub fn clear_neighbors(&mut self) {
        self.0 &= ALIVE_MASK;
    }

    /// Record one more live neighbor. The count saturates at 8 by
    /// construction (a cell has only 8 neighbors), so no masking is needed.
    pub fn add_neighbor(&mut self) {
        self.0 = ((self.0 >> 1) + 1) << 1 | (self.0 & ALIVE_MASK);
    }

    /// Recompute the alive bit from the accumulated count: exactly 3
    /// neighbors births or sustains, exactly 2 sustains only.
    pub fn apply_rule(&mut self) {
        let n = self.neighbor_count();
        self.set_alive(n == 3 || (n == 2 && self.alive()));
    }
}

impl Debug for CellState {
    fn fmt(&self, f: &mut Formatter<'_>) -> DebugResult {
        write!(
            f,
            "CellState(alive: {}, neighbors: {})",
            self.alive(),
            self.neighbor_count()
        )
    }
}

/// A live (or provisionally tracked) cell. The position is fixed for the
/// cell's lifetime; the state byte is mutated in place during an update.
#[derive(Hash, Copy, Clone, Eq, PartialEq, Debug)]
pub struct Cell {
    pub pos: Point,
    pub state: CellState,
}

impl Cell {
    pub const fn new(pos: Point, state: CellState) -> Self {
        Cell { pos, state }
    }

    pub const fn alive(pos: Point) -> Self {
        Cell::new(pos, CellState::ALIVE)
    }
}
