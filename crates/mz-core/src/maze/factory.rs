//! Cell creation
//!
//! Fills grid slots with fresh cells and tells an optional hook about each
//! one, so a renderer can build matching geometry.

use tracing::warn;

use crate::error::{HookError, MazeError};

use super::cell::Cell;
use super::grid::Grid;

/// Callback run once per created cell
///
/// Errors are logged and counted; they never stop population.
pub trait CellHook {
    fn on_cell_created(&mut self, cell: &Cell) -> Result<(), HookError>;
}

impl<F> CellHook for F
where
    F: FnMut(&Cell) -> Result<(), HookError>,
{
    fn on_cell_created(&mut self, cell: &Cell) -> Result<(), HookError> {
        self(cell)
    }
}

/// Creates every cell of a grid, optionally in batches
#[derive(Default)]
pub struct CellFactory {
    hook: Option<Box<dyn CellHook>>,
    hook_failures: usize,
}

impl core::fmt::Debug for CellFactory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CellFactory")
            .field("hook", &self.hook.is_some())
            .field("hook_failures", &self.hook_failures)
            .finish()
    }
}

impl CellFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook(hook: impl CellHook + 'static) -> Self {
        Self {
            hook: Some(Box::new(hook)),
            hook_failures: 0,
        }
    }

    /// Number of hook calls that reported an error
    pub fn hook_failures(&self) -> usize {
        self.hook_failures
    }

    /// Fill every slot of `grid`
    pub fn populate(&mut self, grid: &mut Grid) -> Result<(), MazeError> {
        self.populate_batch(grid, usize::MAX).map(|_| ())
    }

    /// Fill up to `batch` more slots in x-major order
    ///
    /// Returns `true` once the grid is full. Fails with `AlreadyPopulated`
    /// when called on a grid that was already full.
    pub fn populate_batch(&mut self, grid: &mut Grid, batch: usize) -> Result<bool, MazeError> {
        let start = grid.populated_count();
        if start == grid.len() {
            return Err(MazeError::AlreadyPopulated);
        }
        let end = start.saturating_add(batch).min(grid.len());

        for index in start..end {
            let coord = grid.coord_of(index);
            let cell = grid.create_cell(coord)?;
            if let Some(hook) = self.hook.as_mut()
                && let Err(err) = hook.on_cell_created(cell)
            {
                self.hook_failures += 1;
                warn!(%coord, %err, "cell hook failed, continuing");
            }
        }

        Ok(end == grid.len())
    }
}
