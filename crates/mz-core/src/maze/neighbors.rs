//! Grid-adjacent cell lookup

use serde::{Deserialize, Serialize};

use crate::error::MazeError;

use super::cell::Cell;
use super::coord::{Coord, Direction};
use super::grid::Grid;

/// The up-to-four neighbours of a cell; `None` past the grid edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    pub north: Option<Coord>,
    pub east: Option<Coord>,
    pub south: Option<Coord>,
    pub west: Option<Coord>,
}

/// Neighbours of `coord` that lie inside `grid`
pub fn neighbors(grid: &Grid, coord: Coord) -> Result<Neighbors, MazeError> {
    if !grid.contains(coord) {
        return Err(MazeError::OutOfBounds {
            coord,
            width: grid.width(),
            length: grid.length(),
        });
    }
    let look = |dir| coord.step(dir).filter(|&c| grid.contains(c));
    Ok(Neighbors {
        north: look(Direction::North),
        east: look(Direction::East),
        south: look(Direction::South),
        west: look(Direction::West),
    })
}

impl Neighbors {
    pub fn get(&self, dir: Direction) -> Option<Coord> {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Present neighbours in North, East, South, West order
    pub fn present(&self) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.get(dir).map(|coord| (dir, coord)))
    }

    pub fn count(&self) -> usize {
        self.present().count()
    }

    /// Resolve the neighbour in `dir` to its cell
    pub fn cell<'g>(&self, grid: &'g Grid, dir: Direction) -> Result<Option<&'g Cell>, MazeError> {
        self.get(dir).map(|coord| grid.at(coord)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_has_two_neighbours() {
        let grid = Grid::new(3, 3).unwrap();
        let n = neighbors(&grid, Coord::new(0, 0)).unwrap();
        assert_eq!(n.north, None);
        assert_eq!(n.west, None);
        assert_eq!(n.east, Some(Coord::new(1, 0)));
        assert_eq!(n.south, Some(Coord::new(0, 1)));
        assert_eq!(n.count(), 2);
    }

    #[test]
    fn test_far_corner_and_centre() {
        let grid = Grid::new(3, 3).unwrap();
        let n = neighbors(&grid, Coord::new(2, 2)).unwrap();
        assert_eq!(
            n.present().collect::<Vec<_>>(),
            vec![
                (Direction::North, Coord::new(2, 1)),
                (Direction::West, Coord::new(1, 2))
            ]
        );
        assert_eq!(neighbors(&grid, Coord::new(1, 1)).unwrap().count(), 4);
    }

    #[test]
    fn test_out_of_bounds_centre() {
        let grid = Grid::new(2, 2).unwrap();
        assert!(matches!(
            neighbors(&grid, Coord::new(2, 0)),
            Err(MazeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_single_row_grid() {
        let grid = Grid::new(4, 1).unwrap();
        let n = neighbors(&grid, Coord::new(1, 0)).unwrap();
        assert_eq!(n.north, None);
        assert_eq!(n.south, None);
        assert_eq!(n.count(), 2);
    }

    #[test]
    fn test_cell_lookup_needs_population() {
        let grid = Grid::new(2, 2).unwrap();
        let n = neighbors(&grid, Coord::ORIGIN).unwrap();
        assert!(matches!(
            n.cell(&grid, Direction::East),
            Err(MazeError::Unpopulated { .. })
        ));
        assert_eq!(n.cell(&grid, Direction::North), Ok(None));
    }
}
