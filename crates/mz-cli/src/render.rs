//! Plain-text maze view

use mz_core::maze::{CellKind, Coord, Direction, Grid, PortalId};

/// Draw `grid` with `+--+` walls, one three-character column per cell
///
/// Unpopulated cells draw as closed boxes; portals show their letter.
pub fn render_ascii(grid: &Grid) -> String {
    let mut out = String::new();

    for y in 0..grid.length() {
        out.push('+');
        for x in 0..grid.width() {
            out.push_str(if is_open(grid, Coord::new(x, y), Direction::North) {
                "   "
            } else {
                "---"
            });
            out.push('+');
        }
        out.push('\n');

        for x in 0..grid.width() {
            let coord = Coord::new(x, y);
            out.push(if is_open(grid, coord, Direction::West) {
                ' '
            } else {
                '|'
            });
            out.push_str(match grid.at(coord).map(|cell| cell.kind()) {
                Ok(CellKind::Portal {
                    portal: PortalId::A,
                    ..
                }) => " A ",
                Ok(CellKind::Portal {
                    portal: PortalId::B,
                    ..
                }) => " B ",
                _ => "   ",
            });
        }
        out.push_str("|\n");
    }

    out.push('+');
    for _ in 0..grid.width() {
        out.push_str("---+");
    }
    out.push('\n');
    out
}

fn is_open(grid: &Grid, coord: Coord, dir: Direction) -> bool {
    grid.at(coord).is_ok_and(|cell| cell.is_open(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mz_core::MazeOptions;
    use mz_core::maze::MazeGenerator;

    #[test]
    fn test_single_cell() {
        let grid = MazeGenerator::new(MazeOptions {
            width: 1,
            length: 1,
            seed: Some(0),
            ..Default::default()
        })
        .unwrap()
        .finish()
        .unwrap();

        assert_eq!(render_ascii(&grid), "+---+\n|   |\n+---+\n");
    }

    #[test]
    fn test_corridor_has_no_inner_walls() {
        let grid = MazeGenerator::new(MazeOptions {
            width: 3,
            length: 1,
            seed: Some(0),
            ..Default::default()
        })
        .unwrap()
        .finish()
        .unwrap();

        assert_eq!(
            render_ascii(&grid),
            "+---+---+---+\n|           |\n+---+---+---+\n"
        );
    }

    #[test]
    fn test_dimensions_of_output() {
        let grid = Grid::new(4, 2).unwrap();
        let text = render_ascii(&grid);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.len() == 17));
    }
}
