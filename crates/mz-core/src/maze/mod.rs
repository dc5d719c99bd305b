//! Maze system
//!
//! Contains the cell grid, cell creation, neighbour lookup, the incremental
//! generator, and portal placement.

mod cell;
mod coord;
mod factory;
mod generator;
mod grid;
mod neighbors;
mod portal;
mod topology;

pub use cell::{Cell, CellId, CellKind, Connections, PortalId};
pub use coord::{Coord, Direction};
pub use factory::{CellFactory, CellHook};
pub use generator::{
    GenerationState, MazeGenerator, Phase, Progress, StepOutcome, run_generation_step,
};
pub use grid::{Grid, create_grid};
pub use neighbors::{Neighbors, neighbors};
pub use portal::{
    NullObserver, PlacementStrategy, PortalObserver, PortalPlacement, PortalRecord, PortalRegion,
    place_portal, place_portals,
};
pub use topology::Edge;
