//! Frontier-growth maze generation (randomized Prim's algorithm)
//!
//! Generation runs as a sequence of ticks so a frame-paced host can spread
//! the work out. Each call to [`MazeGenerator::step`] does one bounded batch
//! and returns; all state lives in the generator, so resuming after any
//! number of ticks continues exactly where the last one stopped.
//!
//! Phases:
//! 1. Populate: the [`CellFactory`] creates `populate_step` cells per tick.
//! 2. Seed: the origin cell joins the maze and its neighbours form the
//!    initial frontier.
//! 3. Grow: up to `growth_step` frontier cells per tick are each linked to
//!    one random in-maze neighbour and admitted. Every admission adds
//!    exactly one edge, so the result is always a spanning tree.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, trace};

use crate::config::MazeOptions;
use crate::error::MazeError;
use crate::rng::MazeRng;

use super::coord::Coord;
use super::factory::CellFactory;
use super::grid::Grid;
use super::neighbors::neighbors;

/// Where a generator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Phase {
    Populate,
    Seed,
    Grow,
    Done,
}

/// Snapshot of generation progress, for host progress displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub phase: Phase,
    pub populated: usize,
    pub in_maze: usize,
    pub frontier: usize,
    pub total: usize,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A batch ran and more work remains
    Yielded(Progress),
    /// The maze is complete
    Done,
}

impl StepOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, StepOutcome::Done)
    }
}

/// The in-maze and frontier sets
///
/// The two sets are disjoint. The frontier is also kept as a list so a
/// member can be drawn by index.
#[derive(Debug, Clone, Default)]
pub struct GenerationState {
    in_maze: HashSet<Coord>,
    frontier: Vec<Coord>,
    frontier_members: HashSet<Coord>,
}

impl GenerationState {
    pub fn in_maze_count(&self) -> usize {
        self.in_maze.len()
    }

    pub fn frontier(&self) -> &[Coord] {
        &self.frontier
    }

    pub fn is_in_maze(&self, coord: Coord) -> bool {
        self.in_maze.contains(&coord)
    }

    pub fn is_frontier(&self, coord: Coord) -> bool {
        self.frontier_members.contains(&coord)
    }

    fn admit(&mut self, coord: Coord) {
        self.in_maze.insert(coord);
    }

    fn push_frontier(&mut self, coord: Coord) {
        if !self.is_in_maze(coord) && self.frontier_members.insert(coord) {
            self.frontier.push(coord);
        }
    }

    fn take_frontier(&mut self, index: usize) -> Coord {
        let coord = self.frontier.swap_remove(index);
        self.frontier_members.remove(&coord);
        coord
    }
}

/// Incremental perfect-maze generator
#[derive(Debug)]
pub struct MazeGenerator {
    options: MazeOptions,
    grid: Grid,
    factory: CellFactory,
    rng: MazeRng,
    state: GenerationState,
    phase: Phase,
}

/// Advance `generator` by one tick
pub fn run_generation_step(generator: &mut MazeGenerator) -> Result<StepOutcome, MazeError> {
    generator.step()
}

impl MazeGenerator {
    /// Generator with a plain cell factory and an RNG from `options.seed`
    pub fn new(options: MazeOptions) -> Result<Self, MazeError> {
        let rng = options.seed.map(MazeRng::new).unwrap_or_default();
        Self::with_parts(options, CellFactory::new(), rng)
    }

    pub fn with_factory(options: MazeOptions, factory: CellFactory) -> Result<Self, MazeError> {
        let rng = options.seed.map(MazeRng::new).unwrap_or_default();
        Self::with_parts(options, factory, rng)
    }

    /// Generator with an injected factory and RNG; `options.seed` is ignored
    pub fn with_parts(
        options: MazeOptions,
        factory: CellFactory,
        rng: MazeRng,
    ) -> Result<Self, MazeError> {
        let grid = Grid::new(options.width, options.length)?;
        if !grid.contains(options.origin) {
            return Err(MazeError::OutOfBounds {
                coord: options.origin,
                width: options.width,
                length: options.length,
            });
        }
        debug!(
            width = options.width,
            length = options.length,
            seed = rng.seed(),
            "maze generator created"
        );
        Ok(Self {
            options,
            grid,
            factory,
            rng,
            state: GenerationState::default(),
            phase: Phase::Populate,
        })
    }

    pub fn options(&self) -> &MazeOptions {
        &self.options
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn factory(&self) -> &CellFactory {
        &self.factory
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn progress(&self) -> Progress {
        Progress {
            phase: self.phase,
            populated: self.grid.populated_count(),
            in_maze: self.state.in_maze_count(),
            frontier: self.state.frontier().len(),
            total: self.grid.len(),
        }
    }

    /// Run one bounded batch of the current phase
    pub fn step(&mut self) -> Result<StepOutcome, MazeError> {
        match self.phase {
            Phase::Populate => {
                let batch = self.options.populate_step.max(1);
                if self.factory.populate_batch(&mut self.grid, batch)? {
                    debug!(cells = self.grid.len(), "population complete");
                    self.phase = Phase::Seed;
                }
                Ok(StepOutcome::Yielded(self.progress()))
            }
            Phase::Seed => {
                self.seed_maze()?;
                self.phase = Phase::Grow;
                Ok(StepOutcome::Yielded(self.progress()))
            }
            Phase::Grow => {
                let batch = self.options.growth_step.max(1);
                for _ in 0..batch {
                    if self.state.frontier.is_empty() {
                        break;
                    }
                    self.grow_once()?;
                }
                if self.state.frontier.is_empty() {
                    debug!(
                        in_maze = self.state.in_maze_count(),
                        "frontier exhausted, maze complete"
                    );
                    self.phase = Phase::Done;
                    return Ok(StepOutcome::Done);
                }
                trace!(
                    in_maze = self.state.in_maze_count(),
                    frontier = self.state.frontier.len(),
                    "growth batch finished"
                );
                Ok(StepOutcome::Yielded(self.progress()))
            }
            Phase::Done => Ok(StepOutcome::Done),
        }
    }

    /// Step until done, returning the number of ticks taken
    pub fn run_to_completion(&mut self) -> Result<usize, MazeError> {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if self.step()?.is_done() {
                return Ok(ticks);
            }
        }
    }

    /// Finish any remaining work and hand over the grid
    pub fn finish(mut self) -> Result<Grid, MazeError> {
        self.run_to_completion()?;
        Ok(self.grid)
    }

    /// Hand over the grid and RNG as they stand
    pub fn into_parts(self) -> (Grid, MazeRng) {
        (self.grid, self.rng)
    }

    fn seed_maze(&mut self) -> Result<(), MazeError> {
        let origin = self.options.origin;
        self.state.admit(origin);
        self.extend_frontier(origin)?;
        debug!(%origin, frontier = self.state.frontier.len(), "maze seeded");
        Ok(())
    }

    fn extend_frontier(&mut self, coord: Coord) -> Result<(), MazeError> {
        for (_, next) in neighbors(&self.grid, coord)?.present() {
            self.state.push_frontier(next);
        }
        Ok(())
    }

    fn grow_once(&mut self) -> Result<(), MazeError> {
        let index = self
            .rng
            .index(self.state.frontier.len())
            .ok_or(MazeError::EmptyChoiceSet {
                context: "picking a frontier cell",
            })?;
        let cell = self.state.frontier[index];

        let anchors: Vec<Coord> = neighbors(&self.grid, cell)?
            .present()
            .map(|(_, coord)| coord)
            .filter(|&coord| self.state.is_in_maze(coord))
            .collect();
        let anchor = *self
            .rng
            .choose(&anchors)
            .ok_or(MazeError::EmptyChoiceSet {
                context: "linking a frontier cell to the maze",
            })?;

        self.grid.connect(cell, anchor)?;
        self.state.take_frontier(index);
        self.state.admit(cell);
        self.extend_frontier(cell)
    }
}
