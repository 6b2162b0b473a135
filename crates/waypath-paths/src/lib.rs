//! A* pathfinding over arena-backed node graphs.
//!
//! - [`PriorityQueue`]: an indexable binary heap whose keys track their own
//!   slot, so membership checks are O(1) and re-prioritising a key is
//!   O(log n).
//! - [`NodeGraph`]: owns the nodes, addressed by stable [`NodeId`] handles,
//!   and keeps the per-node search scores that are reused across searches.
//! - [`NodeGraph::astar`]: single-shot A* bounded by [`SearchOptions`].
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Connected`] | neighbor enumeration |
//! | [`GraphNode`] : [`Connected`] | A* |
//! | [`Linkable`] : [`Connected`] | [`NodeGraph::connect`] |
//!
//! A search mutates the scores stored in its graph, so it needs
//! `&mut NodeGraph`: two searches can never run over the same graph at once.

mod astar;
mod distance;
mod graph;
mod heap;
mod traits;
mod waypoint;

pub use astar::{PathResult, SearchOptions, SearchTimings, Termination};
pub use distance::{euclidean, manhattan};
pub use graph::{NodeGraph, NodeId, Scores};
pub use heap::{HeapError, HeapStore, PriorityQueue};
pub use traits::{Connected, GraphNode, Linkable};
pub use waypoint::Waypoint;
