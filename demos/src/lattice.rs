//! A flat lattice of waypoints standing in for the host's world.

use rand::Rng;
use waypath_paths::{NodeGraph, NodeId, Waypoint};

/// `width x height` waypoints one unit apart, each linked to its eight
/// surrounding cells.
pub struct Lattice {
    pub graph: NodeGraph<Waypoint>,
    width: usize,
    height: usize,
    cells: Vec<NodeId>,
}

impl Lattice {
    /// Build a lattice where each cell is blocked with probability
    /// `obstacle_ratio`.
    pub fn generate<R: Rng>(width: usize, height: usize, obstacle_ratio: f64, rng: &mut R) -> Self {
        let ratio = obstacle_ratio.clamp(0.0, 1.0);
        let mut graph = NodeGraph::with_capacity(width * height);
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let pos = [x as f32, y as f32, 0.0];
                let wp = if rng.random_bool(ratio) {
                    Waypoint::blocked(pos)
                } else {
                    Waypoint::new(pos)
                };
                cells.push(graph.add(wp));
            }
        }

        let mut lattice = Self {
            graph,
            width,
            height,
            cells,
        };
        for y in 0..height {
            for x in 0..width {
                let here = lattice.cells[y * width + x];
                // Right, down-left, down, down-right: every pair exactly once.
                for (dx, dy) in [(1i64, 0i64), (-1, 1), (0, 1), (1, 1)] {
                    if let Some(there) = lattice.at(x as i64 + dx, y as i64 + dy) {
                        lattice.graph.connect(here, there);
                    }
                }
            }
        }
        lattice
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Handle of the cell at `(x, y)`, if inside the lattice.
    pub fn at(&self, x: i64, y: i64) -> Option<NodeId> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.graph.get(id).is_some_and(|wp| wp.traversable)
    }

    /// A uniformly chosen traversable cell, or `None` if every cell is
    /// blocked.
    pub fn random_open<R: Rng>(&self, rng: &mut R) -> Option<NodeId> {
        let open: Vec<NodeId> = self
            .cells
            .iter()
            .copied()
            .filter(|&id| self.is_open(id))
            .collect();
        if open.is_empty() {
            return None;
        }
        Some(open[rng.random_range(0..open.len())])
    }

    /// Flip the traversable flag of a random cell. Returns the cell.
    pub fn toggle_random<R: Rng>(&mut self, rng: &mut R) -> Option<NodeId> {
        if self.cells.is_empty() {
            return None;
        }
        let id = self.cells[rng.random_range(0..self.cells.len())];
        let wp = self.graph.get_mut(id)?;
        wp.traversable = !wp.traversable;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use waypath_paths::{Connected, SearchOptions};

    #[test]
    fn open_lattice_links_eight_ways() {
        let mut rng = StdRng::seed_from_u64(7);
        let lattice = Lattice::generate(4, 3, 0.0, &mut rng);
        assert_eq!(lattice.graph.len(), 12);

        let corner = lattice.at(0, 0).unwrap();
        let middle = lattice.at(1, 1).unwrap();
        assert_eq!(lattice.graph.get(corner).unwrap().neighbors().len(), 3);
        assert_eq!(lattice.graph.get(middle).unwrap().neighbors().len(), 8);
        assert!(lattice.at(4, 0).is_none());
        assert!(lattice.at(0, -1).is_none());
    }

    #[test]
    fn diagonal_path_across_open_lattice() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut lattice = Lattice::generate(5, 5, 0.0, &mut rng);
        let from = lattice.at(0, 0).unwrap();
        let to = lattice.at(4, 4).unwrap();
        let result = lattice.graph.astar(from, to, &SearchOptions::default());
        assert!(result.found());
        assert_eq!(result.path.len(), 4);
    }

    #[test]
    fn fully_blocked_lattice_has_no_open_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let lattice = Lattice::generate(3, 3, 1.0, &mut rng);
        assert!(lattice.random_open(&mut rng).is_none());
    }

    #[test]
    fn toggle_flips_traversability() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut lattice = Lattice::generate(2, 2, 0.0, &mut rng);
        let id = lattice.toggle_random(&mut rng).unwrap();
        assert!(!lattice.is_open(id));
        assert!(lattice.random_open(&mut rng).is_some());
    }
}
