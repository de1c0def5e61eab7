use crate::cell::{Cell, CellState};
use crate::coord::Point;
use crate::tree::CellTree;
use rustc_hash::FxHashMap;
use tracing::debug;

impl CellTree {
    /// Advance the simulation by exactly one generation.
    ///
    /// Counts are fully accumulated before any aliveness decision, and
    /// removals are deferred until the scan of tracked cells completes, so
    /// the maps being iterated are never mutated mid-walk. The discovered
    /// map holds birth candidates that are not yet part of the tree; a
    /// tracked cell is always probed in the root index first, so a position
    /// can never take both paths.
    pub fn update(&mut self) {
        // 1. Clear the neighbor counts of every tracked cell, keeping the
        //    alive bits.
        {
            let (index, cells) = self.split_index_cells();
            for &id in index.values() {
                cells[id.idx()].state.clear_neighbors();
            }
        }

        // 2. Every tracked cell contributes +1 to each of its 8 neighbors:
        //    in place for tracked neighbors, in the discovered map otherwise.
        let mut discovered: FxHashMap<Point, CellState> = FxHashMap::default();
        {
            let (index, cells) = self.split_index_cells();
            for &pos in index.keys() {
                for neighbor in pos.neighbors().iter() {
                    match index.get(neighbor) {
                        Some(&id) => cells[id.idx()].state.add_neighbor(),
                        None => discovered
                            .entry(*neighbor)
                            .or_insert(CellState::DEAD)
                            .add_neighbor(),
                    }
                }
            }
        }

        // 3. Apply the rule to the tracked population, collecting the dying;
        //    only after the scan do they leave the tree, index, and arena.
        let mut dying = Vec::new();
        {
            let (index, cells) = self.split_index_cells();
            for (&pos, &id) in index.iter() {
                let state = &mut cells[id.idx()].state;
                state.apply_rule();
                if !state.alive() {
                    dying.push((pos, id));
                }
            }
        }
        let deaths = dying.len();
        for (pos, id) in dying {
            self.remove_tracked(pos, id);
        }

        // 4. Commit the births; all other discovered entries were
        //    bookkeeping only and are discarded with the map.
        let mut births = 0usize;
        for (pos, mut state) in discovered {
            state.apply_rule();
            if state.alive() {
                if !self.insert(Cell::new(pos, state)) {
                    panic!("newborn cell {:?} failed to insert", pos);
                }
                births += 1;
            }
        }

        self.bump_generation();
        debug!(
            generation = self.generation(),
            births,
            deaths,
            population = self.len(),
            "generation advanced"
        );
    }
}
