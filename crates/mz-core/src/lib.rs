//! mz-core: incremental perfect-maze construction
//!
//! This crate builds mazes with no rendering or engine dependencies. A host
//! drives generation tick by tick through [`maze::run_generation_step`],
//! then reads the finished [`maze::Grid`] to build geometry, and may splice
//! in portals afterwards.
//!
//! ```
//! use mz_core::MazeOptions;
//! use mz_core::maze::MazeGenerator;
//!
//! let options = MazeOptions { width: 4, length: 3, seed: Some(7), ..Default::default() };
//! let grid = MazeGenerator::new(options).unwrap().finish().unwrap();
//! assert_eq!(grid.edge_count(), 11);
//! assert!(grid.is_perfect());
//! ```

pub mod maze;

mod config;
mod error;
mod rng;

pub use config::{MazeOptions, OptionsError, SpawnPoint};
pub use error::{HookError, MazeError};
pub use rng::MazeRng;
