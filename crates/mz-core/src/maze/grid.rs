//! Fixed-size cell grid
//!
//! The grid owns every cell. All connection edits go through it so both
//! sides of a connection are written together.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::MazeError;

use super::cell::{Cell, CellId, CellKind};
use super::coord::{Coord, Direction};

/// Two-dimensional, fixed-size collection of cells
///
/// Slots are laid out x-major (`x * length + y`) and stay empty until the
/// [`CellFactory`](super::CellFactory) fills them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct Grid {
    width: u32,
    length: u32,
    slots: Vec<Option<Cell>>,
    next_id: u32,
}

/// Unchecked wire form of a [`Grid`]
#[derive(Deserialize)]
struct GridRepr {
    width: u32,
    length: u32,
    slots: Vec<Option<Cell>>,
    #[serde(default)]
    next_id: u32,
}

impl TryFrom<GridRepr> for Grid {
    type Error = MazeError;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        let mut grid = Grid::new(repr.width, repr.length)?;
        if repr.slots.len() != grid.len() {
            return Err(MazeError::CorruptGrid {
                reason: format!(
                    "{} slots for a {}x{} grid",
                    repr.slots.len(),
                    repr.width,
                    repr.length
                ),
            });
        }

        let mut ids = HashSet::new();
        for (index, slot) in repr.slots.iter().enumerate() {
            let Some(cell) = slot else { continue };
            let expected = grid.coord_of(index);
            if cell.coord() != expected {
                return Err(MazeError::CorruptGrid {
                    reason: format!("cell for {} stored in the slot of {}", cell.coord(), expected),
                });
            }
            if !ids.insert(cell.id()) {
                return Err(MazeError::CorruptGrid {
                    reason: format!("cell id {} used twice", cell.id().0),
                });
            }
        }

        let past_last = repr
            .slots
            .iter()
            .flatten()
            .map(|cell| cell.id().0.saturating_add(1))
            .max()
            .unwrap_or(0);
        grid.slots = repr.slots;
        grid.next_id = repr.next_id.max(past_last);
        Ok(grid)
    }
}

/// Allocate an empty `width` by `length` grid
pub fn create_grid(width: u32, length: u32) -> Result<Grid, MazeError> {
    Grid::new(width, length)
}

impl Grid {
    pub fn new(width: u32, length: u32) -> Result<Self, MazeError> {
        if width == 0 || length == 0 {
            return Err(MazeError::InvalidDimensions { width, length });
        }
        let size = width as usize * length as usize;
        Ok(Self {
            width,
            length,
            slots: vec![None; size],
            next_id: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.length
    }

    fn slot(&self, coord: Coord) -> Result<usize, MazeError> {
        if !self.contains(coord) {
            return Err(MazeError::OutOfBounds {
                coord,
                width: self.width,
                length: self.length,
            });
        }
        Ok(coord.x as usize * self.length as usize + coord.y as usize)
    }

    /// Coordinate of the slot at `index` in population order
    pub(crate) fn coord_of(&self, index: usize) -> Coord {
        let length = self.length as usize;
        Coord::new((index / length) as u32, (index % length) as u32)
    }

    pub fn populated_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_populated(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn at(&self, coord: Coord) -> Result<&Cell, MazeError> {
        let index = self.slot(coord)?;
        self.slots[index]
            .as_ref()
            .ok_or(MazeError::Unpopulated { coord })
    }

    fn at_mut(&mut self, coord: Coord) -> Result<&mut Cell, MazeError> {
        let index = self.slot(coord)?;
        self.slots[index]
            .as_mut()
            .ok_or(MazeError::Unpopulated { coord })
    }

    /// All populated cells, x-major
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.slots.iter().flatten()
    }

    /// Cell on the other side of an open connection
    pub fn linked_cell(&self, coord: Coord, dir: Direction) -> Result<Option<&Cell>, MazeError> {
        if !self.at(coord)?.is_open(dir) {
            return Ok(None);
        }
        match coord.step(dir) {
            Some(other) => self.at(other).map(Some),
            None => Ok(None),
        }
    }

    fn allocate_id(&mut self) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a fresh cell in an empty slot
    pub(crate) fn create_cell(&mut self, coord: Coord) -> Result<&Cell, MazeError> {
        let index = self.slot(coord)?;
        if self.slots[index].is_some() {
            return Err(MazeError::AlreadyPopulated);
        }
        let id = self.allocate_id();
        Ok(&*self.slots[index].insert(Cell::new(id, coord, CellKind::Passage)))
    }

    /// Install a new cell of `kind` at `coord` and return the one it displaced
    ///
    /// The displaced cell comes back with its links intact, but every
    /// neighbour's link to it has been cleared. The new cell starts closed.
    pub fn replace(&mut self, coord: Coord, kind: CellKind) -> Result<Cell, MazeError> {
        let index = self.slot(coord)?;
        let Some(previous) = self.slots[index].take() else {
            return Err(MazeError::Unpopulated { coord });
        };
        let id = self.allocate_id();
        self.slots[index] = Some(Cell::new(id, coord, kind));
        self.clear_back_links(&previous);
        Ok(previous)
    }

    fn clear_back_links(&mut self, cell: &Cell) {
        for dir in Direction::ALL {
            if !cell.is_open(dir) {
                continue;
            }
            let Some(other) = cell.coord().step(dir) else {
                continue;
            };
            if let Ok(neighbour) = self.at_mut(other)
                && neighbour.linked(dir.opposite()) == Some(cell.id())
            {
                neighbour.set_link(dir.opposite(), None);
            }
        }
    }

    /// Open the passage between two grid-adjacent cells
    pub fn connect(&mut self, a: Coord, b: Coord) -> Result<(), MazeError> {
        let a_id = self.at(a)?.id();
        let b_id = self.at(b)?.id();
        let dir = a
            .direction_to(b)
            .ok_or(MazeError::InvalidConnection { from: a, to: b })?;

        self.at_mut(a)?.set_link(dir, Some(b_id));
        self.at_mut(b)?.set_link(dir.opposite(), Some(a_id));
        Ok(())
    }

    /// Close the passage between two grid-adjacent cells
    ///
    /// Returns whether a passage was open.
    pub fn disconnect(&mut self, a: Coord, b: Coord) -> Result<bool, MazeError> {
        let dir = a
            .direction_to(b)
            .ok_or(MazeError::InvalidConnection { from: a, to: b })?;
        let was_open = self.at(a)?.is_open(dir) || self.at(b)?.is_open(dir.opposite());

        self.at_mut(a)?.set_link(dir, None);
        self.at_mut(b)?.set_link(dir.opposite(), None);
        Ok(was_open)
    }

    /// Close every passage of the cell at `coord`
    ///
    /// Each neighbour's record is cleared separately from the cell's own.
    pub fn disconnect_all(&mut self, coord: Coord) -> Result<(), MazeError> {
        let cell = self.at(coord)?.clone();
        self.clear_back_links(&cell);
        let cell = self.at_mut(coord)?;
        for dir in Direction::ALL {
            cell.set_link(dir, None);
        }
        Ok(())
    }

    /// Give the cell at `target` exactly the open sides `source` has
    ///
    /// Neighbours on those sides are relinked to the target cell's id.
    ///
    /// Every side is checked before anything is cut, so an error leaves the
    /// grid untouched.
    pub fn copy_connections(&mut self, target: Coord, source: &Cell) -> Result<(), MazeError> {
        self.at(target)?;
        let others = source
            .connections()
            .directions()
            .map(|dir| -> Result<Coord, MazeError> {
                let other = target
                    .step(dir)
                    .filter(|&other| self.contains(other))
                    .ok_or(MazeError::InvalidConnection {
                        from: target,
                        to: source.coord(),
                    })?;
                self.at(other)?;
                Ok(other)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.disconnect_all(target)?;
        for other in others {
            self.connect(target, other)?;
        }
        Ok(())
    }

    pub(crate) fn set_facing(&mut self, coord: Coord, facing: Option<Direction>) -> Result<(), MazeError> {
        self.at_mut(coord)?.set_facing(facing);
        Ok(())
    }
}
