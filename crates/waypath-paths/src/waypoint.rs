use crate::distance::euclidean;
use crate::graph::NodeId;
use crate::traits::{Connected, GraphNode, Linkable};

/// A ready-made node: a point in space with a walkable flag.
///
/// The heuristic and the edge cost are both the straight-line distance
/// between positions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub position: [f32; 3],
    pub traversable: bool,
    neighbors: Vec<NodeId>,
}

impl Waypoint {
    /// A traversable waypoint with no neighbors.
    pub fn new(position: [f32; 3]) -> Self {
        Self {
            position,
            traversable: true,
            neighbors: Vec::with_capacity(6),
        }
    }

    /// A waypoint the search must never enter.
    pub fn blocked(position: [f32; 3]) -> Self {
        Self {
            traversable: false,
            ..Self::new(position)
        }
    }

    /// Drop `other` from the neighbor list. Returns `true` if it was there.
    pub fn unlink(&mut self, other: NodeId) -> bool {
        let before = self.neighbors.len();
        self.neighbors.retain(|&n| n != other);
        self.neighbors.len() != before
    }
}

impl Connected for Waypoint {
    fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }
}

impl GraphNode for Waypoint {
    #[inline]
    fn is_traversable(&self) -> bool {
        self.traversable
    }

    #[inline]
    fn heuristic_to(&self, other: &Self) -> f32 {
        euclidean(self.position, other.position)
    }
}

impl Linkable for Waypoint {
    fn link(&mut self, other: NodeId) -> bool {
        if self.neighbors.contains(&other) {
            return false;
        }
        self.neighbors.push(other);
        true
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::NodeGraph;

    #[test]
    fn waypoint_round_trip() {
        let mut graph = NodeGraph::new();
        let a = graph.add(Waypoint::new([1.0, 2.0, 3.0]));
        let b = graph.add(Waypoint::blocked([4.0, 5.0, 6.0]));
        graph.connect(a, b);

        let json = serde_json::to_string(graph.get(a).unwrap()).unwrap();
        let back: Waypoint = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, graph.get(a).unwrap());
        assert_eq!(back.neighbors(), &[b]);
    }
}
