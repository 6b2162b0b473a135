use std::cmp::Ordering;
use std::fmt;

use crate::heap::HeapStore;
use crate::traits::Linkable;

/// Stable handle to a node stored in a [`NodeGraph`].
///
/// Handles are never reused: removing a node leaves its slot vacant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node's slot in its graph.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Search scores of one node, as left by the most recent search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    /// Cost of the best known path from the origin.
    pub g: f32,
    /// Heuristic estimate to the destination.
    pub h: f32,
    /// `g + h`.
    pub f: f32,
    /// Predecessor on the best known path.
    pub parent: Option<NodeId>,
    /// Slot in the open set while the node is in it.
    pub heap_index: usize,
}

impl Default for Scores {
    fn default() -> Self {
        Self {
            g: f32::INFINITY,
            h: 0.0,
            f: f32::INFINITY,
            parent: None,
            heap_index: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Score table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct ScoreEntry {
    scores: Scores,
    generation: u32,
    closed: bool,
}

/// Per-node search state, lazily invalidated by bumping `generation`.
///
/// Entries stamped with generation 0 were never visited; the table itself
/// never sits at 0.
#[derive(Debug, Clone)]
pub(crate) struct ScoreTable {
    entries: Vec<ScoreEntry>,
    generation: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl ScoreTable {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            generation: 1,
        }
    }

    fn push(&mut self) {
        self.entries.push(ScoreEntry::default());
    }

    /// Start a new search. Every entry becomes stale.
    pub(crate) fn begin_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: entries stamped long ago could look current again.
            for entry in &mut self.entries {
                entry.generation = 0;
            }
            self.generation = 1;
        }
    }

    /// Scores of `id` for the current search, reset first if stale.
    pub(crate) fn visit(&mut self, id: NodeId) -> &mut Scores {
        let generation = self.generation;
        let entry = &mut self.entries[id.0];
        if entry.generation != generation {
            *entry = ScoreEntry {
                generation,
                ..ScoreEntry::default()
            };
        }
        &mut entry.scores
    }

    pub(crate) fn current(&self, id: NodeId) -> Option<&Scores> {
        self.entries
            .get(id.0)
            .filter(|entry| entry.generation == self.generation)
            .map(|entry| &entry.scores)
    }

    pub(crate) fn close(&mut self, id: NodeId) {
        let entry = &mut self.entries[id.0];
        debug_assert_eq!(entry.generation, self.generation, "closing an unvisited node");
        entry.closed = true;
    }

    pub(crate) fn is_closed(&self, id: NodeId) -> bool {
        let entry = &self.entries[id.0];
        entry.generation == self.generation && entry.closed
    }
}

impl HeapStore<NodeId> for ScoreTable {
    #[inline]
    fn heap_index(&self, item: NodeId) -> usize {
        self.entries[item.0].scores.heap_index
    }

    #[inline]
    fn set_heap_index(&mut self, item: NodeId, index: usize) {
        self.entries[item.0].scores.heap_index = index;
    }

    /// Lower `f` wins; ties go to the lower `h`.
    fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        let a = &self.entries[a.0].scores;
        let b = &self.entries[b.0].scores;
        b.f.total_cmp(&a.f).then_with(|| b.h.total_cmp(&a.h))
    }
}

// ---------------------------------------------------------------------------
// NodeGraph
// ---------------------------------------------------------------------------

/// Arena of nodes addressed by [`NodeId`], plus the scratch state A* needs.
///
/// The graph owns its nodes; neighbor lists hold handles, so mutual links do
/// not form ownership cycles. Search scores are kept beside the nodes and
/// reused across searches.
#[derive(Debug, Clone)]
pub struct NodeGraph<N> {
    pub(crate) nodes: Vec<Option<N>>,
    pub(crate) scores: ScoreTable,
    live: usize,
}

impl<N> Default for NodeGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodeGraph<N> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            scores: ScoreTable::default(),
            live: 0,
        }
    }

    /// Create an empty graph with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            scores: ScoreTable::with_capacity(capacity),
            live: 0,
        }
    }

    /// Insert a node and return its handle.
    pub fn add(&mut self, node: N) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        self.scores.push();
        self.live += 1;
        id
    }

    /// Remove a node. Handles pointing at it from other nodes are left in
    /// place and skipped by searches.
    pub fn remove(&mut self, id: NodeId) -> Option<N> {
        let node = self.nodes.get_mut(id.0)?.take()?;
        self.live -= 1;
        Some(node)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterate over live nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i), node)))
    }

    /// Scores left on `id` by the most recent search, or `None` if that
    /// search never reached it.
    pub fn scores(&self, id: NodeId) -> Option<&Scores> {
        self.scores.current(id)
    }
}

impl<N: Linkable> NodeGraph<N> {
    /// Link `a` and `b` to each other.
    ///
    /// Returns `false` (and changes nothing) if either handle is vacant or
    /// both are the same node.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        if let Some(node) = self.get_mut(a) {
            node.link(b);
        }
        if let Some(node) = self.get_mut(b) {
            node.link(a);
        }
        true
    }
}
