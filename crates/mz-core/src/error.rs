//! Maze construction errors
//!
//! Every variant is a contract violation rather than a transient condition:
//! callers propagate them and stop, nothing here is worth retrying.

use thiserror::Error;

use crate::maze::Coord;

/// Errors raised while building, growing, or rewiring a maze
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("coordinate {coord} is outside the {width}x{length} grid")]
    OutOfBounds { coord: Coord, width: u32, length: u32 },

    #[error("cannot connect {from} to {to}: cells are not grid-adjacent")]
    InvalidConnection { from: Coord, to: Coord },

    #[error("grid is already populated")]
    AlreadyPopulated,

    #[error("no candidates to choose from while {context}")]
    EmptyChoiceSet { context: &'static str },

    #[error("no cell has been created at {coord} yet")]
    Unpopulated { coord: Coord },

    #[error("grid dimensions must be positive, got {width}x{length}")]
    InvalidDimensions { width: u32, length: u32 },

    #[error("stored grid is inconsistent: {reason}")]
    CorruptGrid { reason: String },
}

/// Failure reported by a cell hook; logged and otherwise ignored
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cell hook failed: {message}")]
pub struct HookError {
    pub message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
