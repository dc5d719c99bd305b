//! Connectivity checks over a finished (or partial) grid

use std::collections::VecDeque;

use hashbrown::HashSet;

use super::coord::{Coord, Direction};
use super::grid::Grid;

/// Undirected edge, stored with the smaller coordinate first
pub type Edge = (Coord, Coord);

impl Grid {
    /// Every open passage once, sorted
    ///
    /// Only East and South links are walked; with symmetric links that sees
    /// each passage exactly once.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .cells()
            .flat_map(|cell| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(move |&dir| cell.is_open(dir))
                    .filter_map(move |dir| cell.coord().step(dir).map(|to| (cell.coord(), to)))
            })
            .collect();
        edges.sort();
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Every link is answered by a link back to the same cell instance
    pub fn is_symmetric(&self) -> bool {
        self.cells().all(|cell| {
            Direction::ALL.into_iter().all(|dir| {
                let Some(other) = cell.coord().step(dir).filter(|&c| self.contains(c)) else {
                    return !cell.is_open(dir);
                };
                let Ok(neighbour) = self.at(other) else {
                    return !cell.is_open(dir);
                };
                let forward = cell.linked(dir) == Some(neighbour.id());
                let backward = neighbour.linked(dir.opposite()) == Some(cell.id());
                forward == backward && (cell.is_open(dir) == forward)
            })
        })
    }

    /// Number of cells reachable from `start` through open passages
    pub fn reachable_from(&self, start: Coord) -> usize {
        if self.at(start).is_err() {
            return 0;
        }
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(coord) = queue.pop_front() {
            for dir in Direction::ALL {
                if let Ok(Some(next)) = self.linked_cell(coord, dir)
                    && seen.insert(next.coord())
                {
                    queue.push_back(next.coord());
                }
            }
        }
        seen.len()
    }

    /// Fully populated, connected, and acyclic
    pub fn is_perfect(&self) -> bool {
        self.is_populated()
            && self.is_symmetric()
            && self.edge_count() == self.len() - 1
            && self.reachable_from(Coord::ORIGIN) == self.len()
    }
}
