use crate::aabb::Aabb;
use crate::cell::Cell;
use crate::coord::Point;
use rustc_hash::{FxHashMap, FxHashSet};
use slab::Slab;
use std::ops::{Index, IndexMut};
use tracing::trace;

/// Cells a splittable leaf holds before subdividing, and the threshold under
/// which an internal node merges back into a leaf.
pub const NODE_CAPACITY: usize = 4;

#[derive(Hash, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub(crate) struct NodeId(u32);

#[derive(Hash, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub(crate) struct CellId(u32);

impl NodeId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

impl CellId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A node either holds cells directly or holds exactly four children
/// partitioning its box; there is no in-between state to null-check.
#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    Leaf(Vec<CellId>),
    Internal([NodeId; 4]),
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) bbox: Aabb,
    pub(crate) kind: NodeKind,
}

/// Sparse spatial index over the full `i64` plane: a region quadtree whose
/// memory is proportional to the live population, not the addressable space.
///
/// Nodes and cells live in arenas and refer to each other by id, so a cell
/// has a single owner even though both its leaf and the root position index
/// reference it. The index covers every cell anywhere in the tree and is what
/// makes neighbor lookups during [`update`](CellTree::update) O(1).
#[derive(Clone, Debug)]
pub struct CellTree {
    nodes: Slab<NodeData>,
    cells: Slab<Cell>,
    root: NodeId,
    index: FxHashMap<Point, CellId>,
    generation: u64,
}

impl Index<NodeId> for CellTree {
    type Output = NodeData;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.idx()]
    }
}

impl IndexMut<NodeId> for CellTree {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.idx()]
    }
}

impl Index<CellId> for CellTree {
    type Output = Cell;

    fn index(&self, id: CellId) -> &Self::Output {
        &self.cells[id.idx()]
    }
}

impl Default for CellTree {
    fn default() -> Self {
        CellTree::new()
    }
}

impl CellTree {
    /// A fresh root (a leaf) covering `[i64::MIN, i64::MAX]²`.
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let root = NodeId(nodes.insert(NodeData {
            bbox: Aabb::full(),
            kind: NodeKind::Leaf(Vec::new()),
        }) as u32);
        CellTree {
            nodes,
            cells: Slab::new(),
            root,
            index: FxHashMap::default(),
            generation: 0,
        }
    }

    /// Number of cells tracked by the root index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Generations advanced so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation += 1;
    }

    pub fn get(&self, pos: Point) -> Option<Cell> {
        self.index.get(&pos).map(|&id| self[id])
    }

    pub fn contains(&self, pos: Point) -> bool {
        self.index.contains_key(&pos)
    }

    /// The root index and the cell arena as disjoint borrows, for the
    /// update pass that walks one while mutating the other.
    pub(crate) fn split_index_cells(&mut self) -> (&FxHashMap<Point, CellId>, &mut Slab<Cell>) {
        (&self.index, &mut self.cells)
    }

    /// Insert a cell anywhere in the plane. Returns false only if the target
    /// box does not contain the position, which cannot happen at the root.
    /// Inserting a position that is already tracked is an invariant violation
    /// and panics.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let pos = cell.pos;
        let id = CellId(self.cells.insert(cell) as u32);
        if !self.insert_rec(self.root, id) {
            self.cells.remove(id.idx());
            return false;
        }
        if self.index.insert(pos, id).is_some() {
            panic!("cell {:?} inserted twice", pos);
        }
        true
    }

    fn insert_rec(&mut self, node: NodeId, cell: CellId) -> bool {
        let pos = self[cell].pos;
        let bbox = self[node].bbox;
        if !bbox.contains(pos) {
            return false;
        }

        match &mut self[node].kind {
            NodeKind::Leaf(cells) => {
                // Direct insertion while under capacity, or unconditionally
                // once the box is too small to halve.
                if cells.len() < NODE_CAPACITY || !bbox.splittable() {
                    cells.push(cell);
                    return true;
                }

                // Over capacity: subdivide, then push the existing cells and
                // the new one down into the quadrants.
                let existing = std::mem::take(cells);
                let children = self.subdivide(node);
                for old in existing {
                    if !self.insert_children(children, old) {
                        panic!(
                            "cell {:?} rejected by every quadrant during redistribution",
                            self[old].pos
                        );
                    }
                }
                if !self.insert_children(children, cell) {
                    panic!("cell {:?} rejected by every quadrant", pos);
                }
                true
            }
            NodeKind::Internal(children) => {
                let children = *children;
                if !self.insert_children(children, cell) {
                    panic!("cell {:?} rejected by every quadrant", pos);
                }
                true
            }
        }
    }

    fn insert_children(&mut self, children: [NodeId; 4], cell: CellId) -> bool {
        for &child in children.iter() {
            if self.insert_rec(child, cell) {
                return true;
            }
        }
        false
    }

    /// Split a leaf's box at its center into four child leaves. Idempotent:
    /// an already-internal node keeps its children.
    fn subdivide(&mut self, node: NodeId) -> [NodeId; 4] {
        if let NodeKind::Internal(children) = &self[node].kind {
            return *children;
        }
        let bbox = self[node].bbox;
        trace!(center = ?bbox.center, "subdividing");
        let mut children = [NodeId(0); 4];
        for (slot, quadrant) in children.iter_mut().zip(bbox.quadrants().iter()) {
            *slot = NodeId(self.nodes.insert(NodeData {
                bbox: *quadrant,
                kind: NodeKind::Leaf(Vec::new()),
            }) as u32);
        }
        self[node].kind = NodeKind::Internal(children);
        children
    }

    /// Remove the cell at `pos`. Returns false if no such cell is tracked.
    /// Once the index proves the cell exists, any failure to find it during
    /// the descent is an invariant violation and panics.
    pub fn remove(&mut self, pos: Point) -> bool {
        let id = match self.index.get(&pos) {
            Some(&id) => id,
            None => return false,
        };
        self.remove_tracked(pos, id);
        true
    }

    /// Removal path shared with the generational update, which already holds
    /// the cell id. Updates tree, index, and arena within the same call.
    pub(crate) fn remove_tracked(&mut self, pos: Point, id: CellId) {
        if !self.remove_rec(self.root, pos, id) {
            panic!("cell {:?} missing from the tree", pos);
        }
        if self.index.remove(&pos).is_none() {
            panic!("cell {:?} missing from the root index", pos);
        }
        self.cells.remove(id.idx());
    }

    fn remove_rec(&mut self, node: NodeId, pos: Point, cell: CellId) -> bool {
        let bbox = self[node].bbox;
        match &mut self[node].kind {
            NodeKind::Leaf(cells) => {
                if !bbox.contains(pos) {
                    return false;
                }
                match cells.iter().position(|&c| c == cell) {
                    Some(i) => {
                        cells.swap_remove(i);
                        true
                    }
                    None => panic!("cell {:?} missing from the leaf covering it", pos),
                }
            }
            NodeKind::Internal(children) => {
                let children = *children;
                let mut accepted = false;
                for &child in children.iter() {
                    if self.remove_rec(child, pos, cell) {
                        accepted = true;
                        break;
                    }
                }
                if !accepted {
                    return false;
                }
                if self.count_rec(node) <= NODE_CAPACITY {
                    self.merge(node);
                }
                true
            }
        }
    }

    /// Collapse an internal node back into a leaf holding everything its
    /// subtree held, freeing the children. Duplicate positions across
    /// children mean the quadrants were not disjoint; that is fatal.
    fn merge(&mut self, node: NodeId) {
        let children = match &self[node].kind {
            NodeKind::Internal(children) => *children,
            NodeKind::Leaf(_) => return,
        };
        trace!(node = ?node, "merging");
        let mut cells = Vec::new();
        for &child in children.iter() {
            self.drain_subtree(child, &mut cells);
        }

        let mut seen = FxHashSet::default();
        for &id in cells.iter() {
            if !seen.insert(self[id].pos) {
                panic!("duplicate cell {:?} while merging", self[id].pos);
            }
        }

        self[node].kind = NodeKind::Leaf(cells);
    }

    fn drain_subtree(&mut self, node: NodeId, out: &mut Vec<CellId>) {
        match self.nodes.remove(node.idx()).kind {
            NodeKind::Leaf(mut cells) => out.append(&mut cells),
            NodeKind::Internal(children) => {
                for &child in children.iter() {
                    self.drain_subtree(child, out);
                }
            }
        }
    }

    /// Recursive count of every cell reachable from the root. Always equals
    /// [`len`](CellTree::len); the recursion exists because subtree totals
    /// drive the merge threshold.
    pub fn cell_count(&self) -> usize {
        self.count_rec(self.root)
    }

    fn count_rec(&self, node: NodeId) -> usize {
        match &self[node].kind {
            NodeKind::Leaf(cells) => cells.len(),
            NodeKind::Internal(children) => {
                children.iter().map(|&child| self.count_rec(child)).sum()
            }
        }
    }

    /// Visit every cell whose position lies within `range`, pruning subtrees
    /// whose box does not intersect it.
    pub fn for_each_in<F>(&self, range: &Aabb, mut f: F)
    where
        F: FnMut(&Cell),
    {
        self.query_rec(self.root, range, &mut f);
    }

    /// Collect the cells within `range`.
    pub fn query(&self, range: &Aabb) -> Vec<Cell> {
        let mut out = Vec::new();
        self.for_each_in(range, |cell| out.push(*cell));
        out
    }

    fn query_rec<F>(&self, node: NodeId, range: &Aabb, f: &mut F)
    where
        F: FnMut(&Cell),
    {
        let data = &self[node];
        if !data.bbox.intersects(range) {
            return;
        }
        match &data.kind {
            NodeKind::Leaf(cells) => {
                for &id in cells.iter() {
                    let cell = &self[id];
                    if range.contains(cell.pos) {
                        f(cell);
                    }
                }
            }
            NodeKind::Internal(children) => {
                for &child in children.iter() {
                    self.query_rec(child, range, f);
                }
            }
        }
    }

    /// Visit every cell in the tree, quadrant by quadrant (NW, NE, SW, SE),
    /// order within a leaf unspecified. Used by the Life 1.06 dump.
    pub(crate) fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Cell),
    {
        self.visit_rec(self.root, &mut f);
    }

    fn visit_rec<F>(&self, node: NodeId, f: &mut F)
    where
        F: FnMut(&Cell),
    {
        match &self[node].kind {
            NodeKind::Leaf(cells) => {
                for &id in cells.iter() {
                    f(&self[id]);
                }
            }
            NodeKind::Internal(children) => {
                for &child in children.iter() {
                    self.visit_rec(child, f);
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn root_children(&self) -> Option<[NodeId; 4]> {
        match &self[self.root].kind {
            NodeKind::Internal(children) => Some(*children),
            NodeKind::Leaf(_) => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn child_count(&self, child: NodeId) -> usize {
        self.count_rec(child)
    }
}
