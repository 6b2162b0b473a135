use std::time::{Duration, Instant};

use crate::graph::{NodeGraph, NodeId};
use crate::heap::PriorityQueue;
use crate::traits::GraphNode;

/// Limits and instrumentation for a single search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchOptions {
    /// Maximum number of nodes popped from the open set.
    pub max_depth: u32,
    /// Capacity of the open set.
    pub max_graph_size: usize,
    /// Time the search and log the durations.
    pub diagnostics: bool,
}

impl SearchOptions {
    pub const DEFAULT_MAX_DEPTH: u32 = i32::MAX as u32;
    pub const DEFAULT_MAX_GRAPH_SIZE: usize = 10_000;
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_graph_size: Self::DEFAULT_MAX_GRAPH_SIZE,
            diagnostics: false,
        }
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The destination was popped from the open set.
    Reached,
    /// The open set ran dry.
    Exhausted,
    /// `max_depth` pops were made without reaching the destination.
    DepthLimit,
    /// The open set outgrew `max_graph_size`.
    CapacityExceeded,
    /// The origin or the destination is not in the graph.
    InvalidEndpoint,
}

/// Durations recorded when [`SearchOptions::diagnostics`] is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTimings {
    /// Time spent expanding nodes.
    pub search: Duration,
    /// Time spent walking parents and reversing the path.
    pub reconstruction: Duration,
}

/// Outcome of [`NodeGraph::astar`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Nodes from the first step after the origin up to and including the
    /// destination. Empty when nothing was found, or when the origin is the
    /// destination.
    pub path: Vec<NodeId>,
    pub termination: Termination,
    pub timings: Option<SearchTimings>,
}

impl PathResult {
    /// Whether the destination was reached.
    ///
    /// An unreachable destination and an exhausted depth budget both report
    /// `false`; inspect [`termination`](Self::termination) to tell them apart.
    #[inline]
    pub fn found(&self) -> bool {
        self.termination == Termination::Reached
    }

    fn unresolved(termination: Termination) -> Self {
        Self {
            path: Vec::new(),
            termination,
            timings: None,
        }
    }
}

impl<N: GraphNode> NodeGraph<N> {
    /// Compute the cheapest path from `origin` to `destination` using A*.
    ///
    /// Edge costs are the heuristic between adjacent nodes. Non-traversable
    /// neighbors are never entered. The returned path excludes `origin`.
    pub fn astar(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        options: &SearchOptions,
    ) -> PathResult {
        let started = options.diagnostics.then(Instant::now);

        let nodes = &self.nodes;
        let scores = &mut self.scores;
        let lookup = |id: NodeId| nodes.get(id.index()).and_then(Option::as_ref);

        let (Some(origin_node), Some(goal)) = (lookup(origin), lookup(destination)) else {
            log::debug!("astar: endpoint {origin} or {destination} is not in the graph");
            return PathResult::unresolved(Termination::InvalidEndpoint);
        };

        scores.begin_search();

        {
            let start = scores.visit(origin);
            start.g = 0.0;
            start.h = origin_node.heuristic_to(goal);
            start.f = start.h;
            start.parent = None;
        }

        let mut open = PriorityQueue::with_capacity(options.max_graph_size);
        let mut depth = options.max_depth;
        let mut termination = None;

        if let Err(err) = open.add(scores, origin) {
            log::warn!("astar: {err}");
            return PathResult::unresolved(Termination::CapacityExceeded);
        }

        'search: while !open.is_empty() && depth != 0 {
            depth -= 1;

            let Ok(current) = open.remove_first(scores) else {
                break;
            };
            scores.close(current);

            if current == destination {
                termination = Some(Termination::Reached);
                break;
            }

            let Some(current_node) = lookup(current) else {
                continue;
            };
            let current_g = scores.visit(current).g;

            for &neighbor in current_node.neighbors() {
                let Some(neighbor_node) = lookup(neighbor) else {
                    continue;
                };
                if !neighbor_node.is_traversable() || scores.is_closed(neighbor) {
                    continue;
                }

                let tentative_g = current_g + current_node.heuristic_to(neighbor_node);
                let in_open = open.contains(&*scores, neighbor);

                let entry = scores.visit(neighbor);
                if tentative_g < entry.g || !in_open {
                    entry.g = tentative_g;
                    entry.h = neighbor_node.heuristic_to(goal);
                    entry.f = entry.g + entry.h;
                    entry.parent = Some(current);

                    if in_open {
                        open.update_item(scores, neighbor);
                    } else if let Err(err) = open.add(scores, neighbor) {
                        log::warn!("astar: {err} while searching {origin} -> {destination}");
                        termination = Some(Termination::CapacityExceeded);
                        break 'search;
                    }
                }
            }
        }

        let termination = termination.unwrap_or(if open.is_empty() {
            Termination::Exhausted
        } else {
            Termination::DepthLimit
        });

        if termination != Termination::Reached {
            log::debug!("astar: no path {origin} -> {destination} ({termination:?})");
            return PathResult::unresolved(termination);
        }

        let searched = started.map(|t| t.elapsed());
        let reconstruct_started = options.diagnostics.then(Instant::now);

        let mut path = Vec::new();
        let mut step = destination;
        while step != origin {
            path.push(step);
            let parent = scores.current(step).and_then(|s| s.parent);
            debug_assert!(parent.is_some(), "broken parent chain at {step}");
            let Some(parent) = parent else {
                break;
            };
            step = parent;
        }
        path.reverse();

        let timings = searched.zip(reconstruct_started).map(|(search, t)| SearchTimings {
            search,
            reconstruction: t.elapsed(),
        });
        if let Some(t) = &timings {
            log::info!(
                "path found in {:?}, reconstructed in {:?} ({} steps)",
                t.search,
                t.reconstruction,
                path.len()
            );
        }

        PathResult {
            path,
            termination,
            timings,
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn options_round_trip() {
        let opts = SearchOptions {
            max_depth: 64,
            max_graph_size: 512,
            diagnostics: true,
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: SearchOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(opts, back);
    }

    #[test]
    fn options_partial_uses_defaults() {
        let back: SearchOptions = serde_json::from_str(r#"{"max_depth": 10}"#).unwrap();
        assert_eq!(back.max_depth, 10);
        assert_eq!(back.max_graph_size, SearchOptions::DEFAULT_MAX_GRAPH_SIZE);
        assert!(!back.diagnostics);
    }
}
