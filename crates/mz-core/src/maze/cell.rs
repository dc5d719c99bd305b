//! Maze cells and their connection records

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::coord::{Coord, Direction};

/// Identity of a cell instance
///
/// Coordinates name slots; ids name the cell occupying a slot. A portal that
/// replaces a cell keeps the coordinate but gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u32);

/// Which of the two portal cells this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum PortalId {
    A,
    B,
}

/// Cell variety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Passage,
    /// Portal spliced in after generation. `facing` is the open side it is
    /// aligned with, when one was chosen.
    Portal {
        portal: PortalId,
        facing: Option<Direction>,
    },
}

bitflags! {
    /// Open sides of a cell
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Connections: u8 {
        const NORTH = 0x01;
        const EAST = 0x02;
        const SOUTH = 0x04;
        const WEST = 0x08;
    }
}

impl Connections {
    pub const fn from_direction(dir: Direction) -> Self {
        match dir {
            Direction::North => Connections::NORTH,
            Direction::East => Connections::EAST,
            Direction::South => Connections::SOUTH,
            Direction::West => Connections::WEST,
        }
    }

    /// Open directions in North, East, South, West order
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&dir| self.contains(Connections::from_direction(dir)))
    }
}

// Manual serde impl for Connections
impl Serialize for Connections {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Connections {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Connections::from_bits_truncate(bits))
    }
}

/// A single maze node
///
/// `links[dir]` holds the id of the neighbour this cell is open toward.
/// Links are only written through [`Grid`](super::Grid), which keeps both
/// sides in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    id: CellId,
    coord: Coord,
    kind: CellKind,
    links: [Option<CellId>; 4],
}

impl Cell {
    pub(crate) fn new(id: CellId, coord: Coord, kind: CellKind) -> Self {
        Self {
            id,
            coord,
            kind,
            links: [None; 4],
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn is_portal(&self) -> bool {
        matches!(self.kind, CellKind::Portal { .. })
    }

    /// Id of the neighbour this cell is open toward in `dir`
    pub fn linked(&self, dir: Direction) -> Option<CellId> {
        self.links[dir.index()]
    }

    pub fn is_open(&self, dir: Direction) -> bool {
        self.linked(dir).is_some()
    }

    pub fn connections(&self) -> Connections {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.is_open(dir))
            .fold(Connections::empty(), |acc, dir| {
                acc | Connections::from_direction(dir)
            })
    }

    pub fn connection_count(&self) -> usize {
        self.links.iter().filter(|link| link.is_some()).count()
    }

    pub(crate) fn set_link(&mut self, dir: Direction, link: Option<CellId>) {
        self.links[dir.index()] = link;
    }

    pub(crate) fn set_facing(&mut self, dir: Option<Direction>) {
        if let CellKind::Portal { facing, .. } = &mut self.kind {
            *facing = dir;
        }
    }
}
