use crate::graph::NodeId;

/// Minimal node interface: neighbor enumeration.
pub trait Connected {
    /// Handles of the nodes reachable from this one, in a stable order.
    fn neighbors(&self) -> &[NodeId];
}

/// A node that A* can search over.
pub trait GraphNode: Connected {
    /// Whether the search may enter this node.
    fn is_traversable(&self) -> bool;

    /// Estimated cost from this node to `other`.
    ///
    /// Also used as the edge cost between adjacent nodes. Admissibility is
    /// not checked.
    fn heuristic_to(&self, other: &Self) -> f32;
}

/// A node whose neighbor list can be extended by a graph builder.
pub trait Linkable: Connected {
    /// Add `other` as a neighbor unless it already is one.
    /// Returns `true` if the list changed.
    fn link(&mut self, other: NodeId) -> bool;
}
