pub mod environment;

use crate::state::{Cell, Move, Pos};
use color_eyre::eyre::{ensure, eyre};
use color_eyre::{Report, Result};
use itertools::Itertools;
use nanorand::{Rng, WyRand};
use pathfinding::prelude::bfs_reach;
use simple_grid::{Grid, GridIndex};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, trace};

/// chance, in percent, that an interior cell becomes a wall
const WALL_PERCENT: u32 = 20;

const ENTRANCE: Pos = Pos::new(1, 1);

/// A walled grid with an entrance at (1, 1) and a target in the opposite
/// inner corner.
///
/// Every `Maze` handed out by a constructor has at least one route from
/// the entrance to the target using steps and jumps.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid<Cell>,
}

impl Maze {
    /// generates a solvable maze using a freshly seeded generator
    pub fn new_randomized(width: usize, height: usize) -> Result<Maze> {
        Maze::generate(width, height, &mut WyRand::new())
    }

    /// Generates random layouts until one is solvable.
    ///
    /// There is no cap on the number of attempts. With a 20% wall density
    /// an unsolvable layout is rare, but nothing bounds the loop.
    pub fn generate(width: usize, height: usize, rng: &mut WyRand) -> Result<Maze> {
        ensure!(
            width >= 3 && height >= 3,
            "maze must be at least 3x3, got {width}x{height}"
        );

        let mut attempts = 0_u64;
        loop {
            attempts += 1;
            let maze = Maze::random_layout(width, height, rng);

            if maze.is_solvable() {
                debug!(attempts, width, height, "generated solvable maze");
                break Ok(maze);
            }

            trace!(attempts, "discarding unsolvable layout");
        }
    }

    fn random_layout(width: usize, height: usize, rng: &mut WyRand) -> Maze {
        let cells = (0..height)
            .cartesian_product(0..width)
            .map(|(y, x)| {
                let is_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                if is_border || rng.generate_range(0_u32..100) < WALL_PERCENT {
                    Cell::Wall
                } else {
                    Cell::Empty
                }
            })
            .collect_vec();

        let mut grid = Grid::new(width, height, cells);

        //on a 3x3 grid these are the same cell, and the target wins
        grid[GridIndex::new(1, 1)] = Cell::Empty;
        grid[GridIndex::new(width - 2, height - 2)] = Cell::Target;

        Maze { grid }
    }

    /// Builds a maze from a fixed layout, checking the same invariants a
    /// generated maze satisfies.
    pub fn from_grid(grid: Grid<Cell>) -> Result<Maze> {
        let (width, height) = grid.dimensions();
        ensure!(
            width >= 3 && height >= 3,
            "maze must be at least 3x3, got {width}x{height}"
        );

        let maze = Maze { grid };
        let target = maze.target();

        for (x, y) in (0..width).cartesian_product(0..height) {
            let pos = Pos::from((x, y));
            let cell = maze.cell(pos);
            let is_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;

            if is_border {
                ensure!(cell == Cell::Wall, "border cell {pos} is not a wall");
            } else if pos == target {
                ensure!(cell == Cell::Target, "expected the target at {pos}");
            } else if pos == ENTRANCE {
                ensure!(cell == Cell::Empty, "entrance {pos} is blocked");
            } else {
                ensure!(cell != Cell::Target, "unexpected target at {pos}");
            }
        }

        ensure!(
            maze.is_solvable(),
            "no route from {} to {target}",
            maze.entrance()
        );

        Ok(maze)
    }

    pub fn width(&self) -> usize {
        self.grid.dimensions().0
    }

    pub fn height(&self) -> usize {
        self.grid.dimensions().1
    }

    pub fn entrance(&self) -> Pos {
        ENTRANCE
    }

    pub fn target(&self) -> Pos {
        Pos::from((self.width() - 2, self.height() - 2))
    }

    /// anything outside the grid reads as a wall
    pub fn cell(&self, pos: Pos) -> Cell {
        pos.grid_index(self.width(), self.height())
            .map_or(Cell::Wall, |index| self.grid[index])
    }

    pub fn is_passable(&self, pos: Pos) -> bool {
        self.cell(pos).is_passable()
    }

    /// Where `mv` lands from `from`, or `None` if the move is blocked.
    ///
    /// A jump needs both the cell it passes over and the landing cell to be
    /// passable; a step only needs the landing cell.
    pub fn destination(&self, from: Pos, mv: Move) -> Option<Pos> {
        if let Some(midpoint) = mv.midpoint_from(from) {
            if !self.is_passable(midpoint) {
                return None;
            }
        }

        let to = from + mv;
        self.is_passable(to).then_some(to)
    }

    /// breadth-first reachability check from the entrance to the target
    pub fn is_solvable(&self) -> bool {
        let target = self.target();
        bfs_reach(self.entrance(), |&pos| {
            Move::all().filter_map(move |mv| self.destination(pos, mv))
        })
        .any(|pos| pos == target)
    }
}

/// Cost of a path under the maze's movement model.
///
/// A move costs the distance it covers, 1 for a step and 2 for a jump.
pub fn path_cost(path: &[Pos]) -> u32 {
    path.windows(2)
        .map(|pair| pair[0].manhattan_distance(pair[1]))
        .sum()
}

impl Display for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                write!(f, "{}", self.cell(Pos::from((x, y))))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Maze {
    type Err = Report;

    fn from_str(layout: &str) -> Result<Maze> {
        let rows = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect_vec();

        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            ensure!(
                row.chars().count() == width,
                "row {y} has {} cells, expected {width}",
                row.chars().count()
            );

            for c in row.chars() {
                let cell = Cell::from_symbol(c).ok_or_else(|| eyre!("unknown cell `{c}` in row {y}"))?;
                cells.push(cell);
            }
        }

        ensure!(!cells.is_empty(), "empty layout");
        Maze::from_grid(Grid::new(width, height, cells))
    }
}
