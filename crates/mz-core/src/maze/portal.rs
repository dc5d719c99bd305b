//! Portal placement on finished mazes
//!
//! A placement swaps two cells for portal cells and rewires them with one of
//! three strategies:
//!
//! - `Direct`: the portal keeps exactly the passages the replaced cell had
//!   and faces one of them.
//! - `Random`: the old passages are closed; the portal opens North (when
//!   there is a North neighbour) plus one random side out of the present
//!   West, East and South neighbours.
//! - `Open`: the portal opens toward every present neighbour.
//!
//! `Random` and `Open` can add loops or cut the maze in pieces; that is the
//! point of portals and is left to the caller.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::error::MazeError;
use crate::rng::MazeRng;

use super::cell::{CellId, CellKind, Connections, PortalId};
use super::coord::{Coord, Direction};
use super::grid::Grid;
use super::neighbors::{Neighbors, neighbors};

/// How a portal is wired into the maze
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PlacementStrategy {
    Direct,
    #[default]
    Random,
    Open,
}

/// A cell together with its grid neighbours, computed on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortalRegion {
    pub owner: Coord,
    pub neighbors: Neighbors,
}

impl PortalRegion {
    pub fn around(grid: &Grid, owner: Coord) -> Result<Self, MazeError> {
        grid.at(owner)?;
        Ok(Self {
            owner,
            neighbors: neighbors(grid, owner)?,
        })
    }
}

/// What one portal placement did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalRecord {
    pub portal: PortalId,
    pub coord: Coord,
    pub strategy: PlacementStrategy,
    pub facing: Option<Direction>,
    /// Cell that used to occupy `coord`
    pub replaced: CellId,
    /// The portal cell now at `coord`
    pub cell: CellId,
    pub connections: Connections,
}

/// Told once whenever a placement has changed the set of portals
pub trait PortalObserver {
    fn portals_changed(&mut self, portals: &[PortalRecord]);
}

impl<F> PortalObserver for F
where
    F: FnMut(&[PortalRecord]),
{
    fn portals_changed(&mut self, portals: &[PortalRecord]) {
        self(portals)
    }
}

/// Observer that ignores notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PortalObserver for NullObserver {
    fn portals_changed(&mut self, _portals: &[PortalRecord]) {}
}

/// One-shot request to place portal A at `alpha` and portal B at `beta`
///
/// The regions are not required to be disjoint; when they name the same
/// cell, portal B replaces portal A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortalPlacement {
    pub alpha: PortalRegion,
    pub beta: PortalRegion,
    pub alpha_strategy: PlacementStrategy,
    pub beta_strategy: PlacementStrategy,
}

impl PortalPlacement {
    pub fn new(alpha: PortalRegion, beta: PortalRegion) -> Self {
        Self {
            alpha,
            beta,
            alpha_strategy: PlacementStrategy::default(),
            beta_strategy: PlacementStrategy::default(),
        }
    }

    pub fn with_strategies(mut self, alpha: PlacementStrategy, beta: PlacementStrategy) -> Self {
        self.alpha_strategy = alpha;
        self.beta_strategy = beta;
        self
    }

    /// Place both portals, notify `observer`, and consume the request
    ///
    /// Both placements run against a copy of the grid and RNG; they are
    /// written back only when both succeed, so on error nothing changes and
    /// the observer is not called.
    pub fn place(
        self,
        grid: &mut Grid,
        rng: &mut MazeRng,
        observer: &mut dyn PortalObserver,
    ) -> Result<[PortalRecord; 2], MazeError> {
        let mut staged = grid.clone();
        let mut staged_rng = rng.clone();
        let alpha = place_portal(
            &mut staged,
            PortalId::A,
            &self.alpha,
            self.alpha_strategy,
            &mut staged_rng,
        )?;
        let beta = place_portal(
            &mut staged,
            PortalId::B,
            &self.beta,
            self.beta_strategy,
            &mut staged_rng,
        )?;
        let records = [alpha, beta];

        *grid = staged;
        *rng = staged_rng;
        observer.portals_changed(&records);
        Ok(records)
    }
}

/// Place portal A at `alpha` and portal B at `beta`
pub fn place_portals(
    grid: &mut Grid,
    alpha: Coord,
    beta: Coord,
    alpha_strategy: PlacementStrategy,
    beta_strategy: PlacementStrategy,
    rng: &mut MazeRng,
    observer: &mut dyn PortalObserver,
) -> Result<[PortalRecord; 2], MazeError> {
    let alpha = PortalRegion::around(grid, alpha)?;
    let beta = PortalRegion::around(grid, beta)?;
    PortalPlacement::new(alpha, beta)
        .with_strategies(alpha_strategy, beta_strategy)
        .place(grid, rng, observer)
}

/// Replace the region's owner with `portal`, wired per `strategy`
///
/// Choices are validated before the grid is touched, so a failed placement
/// leaves the grid as it was. Use [`PortalPlacement::place`] to get the same
/// guarantee for a pair.
pub fn place_portal(
    grid: &mut Grid,
    portal: PortalId,
    region: &PortalRegion,
    strategy: PlacementStrategy,
    rng: &mut MazeRng,
) -> Result<PortalRecord, MazeError> {
    let owner = region.owner;
    let kind = CellKind::Portal {
        portal,
        facing: None,
    };

    let (replaced, facing) = match strategy {
        PlacementStrategy::Direct => {
            let facing = grid
                .at(owner)?
                .connections()
                .directions()
                .next()
                .ok_or(MazeError::EmptyChoiceSet {
                    context: "aligning a portal with an open side",
                })?;
            let replaced = grid.replace(owner, kind)?;
            grid.copy_connections(owner, &replaced)?;
            (replaced.id(), Some(facing))
        }
        PlacementStrategy::Random => {
            let sides: Vec<Coord> = [Direction::West, Direction::East, Direction::South]
                .into_iter()
                .filter_map(|dir| region.neighbors.get(dir))
                .collect();
            let side = *rng.choose(&sides).ok_or(MazeError::EmptyChoiceSet {
                context: "picking a random portal side",
            })?;

            grid.disconnect_all(owner)?;
            let replaced = grid.replace(owner, kind)?;
            if let Some(north) = region.neighbors.north {
                grid.connect(owner, north)?;
            }
            grid.connect(owner, side)?;
            (replaced.id(), None)
        }
        PlacementStrategy::Open => {
            let replaced = grid.replace(owner, kind)?;
            for (_, next) in region.neighbors.present() {
                grid.connect(owner, next)?;
            }
            (replaced.id(), None)
        }
    };
    grid.set_facing(owner, facing)?;

    let cell = grid.at(owner)?;
    debug!(%portal, %owner, %strategy, connections = cell.connection_count(), "portal placed");
    Ok(PortalRecord {
        portal,
        coord: owner,
        strategy,
        facing,
        replaced,
        cell: cell.id(),
        connections: cell.connections(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MazeOptions;
    use crate::maze::MazeGenerator;

    fn maze(width: u32, length: u32, seed: u64) -> Grid {
        let options = MazeOptions {
            width,
            length,
            seed: Some(seed),
            ..Default::default()
        };
        MazeGenerator::new(options).unwrap().finish().unwrap()
    }

    #[test]
    fn test_direct_keeps_topology() {
        let mut grid = maze(5, 5, 21);
        let owner = Coord::new(2, 2);
        let before = grid.at(owner).unwrap().clone();
        let edges = grid.edges();
        let region = PortalRegion::around(&grid, owner).unwrap();
        let mut rng = MazeRng::new(0);

        let record = place_portal(&mut grid, PortalId::A, &region, PlacementStrategy::Direct, &mut rng)
            .unwrap();

        assert_eq!(record.replaced, before.id());
        assert_eq!(record.connections, before.connections());
        assert!(before.connections().directions().any(|d| Some(d) == record.facing));
        assert_eq!(grid.edges(), edges);
        assert!(grid.is_perfect());

        let portal = grid.at(owner).unwrap();
        assert!(portal.is_portal());
        for dir in portal.connections().directions() {
            let neighbour = grid.linked_cell(owner, dir).unwrap().unwrap();
            assert_eq!(neighbour.linked(dir.opposite()), Some(portal.id()));
            assert_ne!(neighbour.linked(dir.opposite()), Some(before.id()));
        }
    }

    #[test]
    fn test_random_opens_north_and_one_side() {
        for seed in 0..20 {
            let mut grid = maze(4, 4, seed);
            let owner = Coord::new(1, 1);
            let region = PortalRegion::around(&grid, owner).unwrap();
            let mut rng = MazeRng::new(seed);

            place_portal(&mut grid, PortalId::B, &region, PlacementStrategy::Random, &mut rng)
                .unwrap();

            let portal = grid.at(owner).unwrap();
            assert!(portal.is_open(Direction::North));
            let sides = [Direction::West, Direction::East, Direction::South]
                .into_iter()
                .filter(|&d| portal.is_open(d))
                .count();
            assert_eq!(sides, 1);
            assert_eq!(portal.connection_count(), 2);
            assert!(grid.is_symmetric());
        }
    }

    #[test]
    fn test_random_skips_absent_neighbours() {
        // Top-right corner: no North, no East.
        for seed in 0..20 {
            let mut grid = maze(3, 3, seed);
            let owner = Coord::new(2, 0);
            let region = PortalRegion::around(&grid, owner).unwrap();
            let mut rng = MazeRng::new(seed);

            place_portal(&mut grid, PortalId::A, &region, PlacementStrategy::Random, &mut rng)
                .unwrap();

            let portal = grid.at(owner).unwrap();
            assert!(!portal.is_open(Direction::North));
            assert!(!portal.is_open(Direction::East));
            assert_eq!(portal.connection_count(), 1);
            assert!(grid.is_symmetric());
        }
    }

    #[test]
    fn test_random_without_candidates_leaves_grid_alone() {
        let mut grid = maze(1, 1, 4);
        let region = PortalRegion::around(&grid, Coord::ORIGIN).unwrap();
        let snapshot = grid.clone();
        let mut rng = MazeRng::new(4);

        let result =
            place_portal(&mut grid, PortalId::A, &region, PlacementStrategy::Random, &mut rng);
        assert!(matches!(result, Err(MazeError::EmptyChoiceSet { .. })));
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn test_open_connects_every_present_neighbour() {
        let mut grid = maze(3, 3, 8);
        let mut rng = MazeRng::new(8);
        for owner in [Coord::new(1, 1), Coord::new(0, 2)] {
            let region = PortalRegion::around(&grid, owner).unwrap();
            place_portal(&mut grid, PortalId::A, &region, PlacementStrategy::Open, &mut rng).unwrap();

            let portal = grid.at(owner).unwrap();
            for dir in Direction::ALL {
                assert_eq!(portal.is_open(dir), region.neighbors.get(dir).is_some());
            }
        }
        assert!(grid.is_symmetric());
    }

    #[test]
    fn test_direct_on_isolated_cell_fails() {
        let mut grid = maze(1, 1, 0);
        let region = PortalRegion::around(&grid, Coord::ORIGIN).unwrap();
        let mut rng = MazeRng::new(0);
        assert!(matches!(
            place_portal(&mut grid, PortalId::A, &region, PlacementStrategy::Direct, &mut rng),
            Err(MazeError::EmptyChoiceSet { .. })
        ));
    }

    #[test]
    fn test_placement_notifies_once() {
        let mut grid = maze(6, 6, 13);
        let mut rng = MazeRng::new(13);
        let mut notifications = Vec::new();
        let mut observer = |records: &[PortalRecord]| notifications.push(records.to_vec());

        let records = place_portals(
            &mut grid,
            Coord::new(1, 1),
            Coord::new(4, 4),
            PlacementStrategy::Direct,
            PlacementStrategy::Open,
            &mut rng,
            &mut observer,
        )
        .unwrap();

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0], records.to_vec());
        assert_eq!(records[0].portal, PortalId::A);
        assert_eq!(records[1].portal, PortalId::B);
        assert_eq!(records[1].strategy, PlacementStrategy::Open);
        assert_eq!(grid.cells().filter(|c| c.is_portal()).count(), 2);
    }

    #[test]
    fn test_same_region_twice_keeps_last_portal() {
        let mut grid = maze(4, 4, 2);
        let region = PortalRegion::around(&grid, Coord::new(2, 2)).unwrap();
        let mut rng = MazeRng::new(2);

        let records = PortalPlacement::new(region, region)
            .with_strategies(PlacementStrategy::Direct, PlacementStrategy::Direct)
            .place(&mut grid, &mut rng, &mut NullObserver)
            .unwrap();

        assert_eq!(records[1].replaced, records[0].cell);
        let cell = grid.at(Coord::new(2, 2)).unwrap();
        assert_eq!(
            cell.kind(),
            CellKind::Portal {
                portal: PortalId::B,
                facing: records[1].facing
            }
        );
        assert!(grid.is_perfect());
    }

    #[test]
    fn test_failed_second_portal_rolls_back_first() {
        let mut grid = maze(3, 3, 11);
        let snapshot = grid.clone();
        let mut rng = MazeRng::new(11);
        let mut untouched = rng.clone();
        let mut notified = 0;
        let mut observer = |_: &[PortalRecord]| notified += 1;

        let alpha = PortalRegion::around(&grid, Coord::new(1, 1)).unwrap();
        let cornered = PortalRegion {
            owner: Coord::ORIGIN,
            neighbors: Neighbors {
                north: None,
                east: None,
                south: None,
                west: None,
            },
        };
        let result = PortalPlacement::new(alpha, cornered)
            .with_strategies(PlacementStrategy::Open, PlacementStrategy::Random)
            .place(&mut grid, &mut rng, &mut observer);

        assert!(matches!(result, Err(MazeError::EmptyChoiceSet { .. })));
        assert_eq!(notified, 0);
        assert_eq!(grid, snapshot);
        assert_eq!(grid.cells().filter(|c| c.is_portal()).count(), 0);
        assert!(grid.is_perfect());
        for _ in 0..8 {
            assert_eq!(rng.index(1000), untouched.index(1000));
        }
    }

    #[test]
    fn test_strategy_parses_from_text() {
        assert_eq!("open".parse::<PlacementStrategy>().unwrap(), PlacementStrategy::Open);
        assert_eq!(PlacementStrategy::default(), PlacementStrategy::Random);
        assert_eq!(PlacementStrategy::Direct.to_string(), "Direct");
    }
}
