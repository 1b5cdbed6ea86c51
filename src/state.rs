use crate::environment::Action;
use simple_grid::GridIndex;
use std::fmt::Display;
use std::ops::Add;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    pub fn manhattan_distance(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// the grid index for this position, if both coordinates fit in `(cols, rows)`
    pub fn grid_index(self, cols: usize, rows: usize) -> Option<GridIndex> {
        let x = usize::try_from(self.x).ok()?;
        let y = usize::try_from(self.y).ok()?;
        (x < cols && y < rows).then(|| GridIndex::new(x, y))
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Pos { x, y } = self;
        write!(f, "({x}, {y})")
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Pos { x, y }
    }
}

impl From<(usize, usize)> for Pos {
    //grids are far smaller than i32::MAX on either axis
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn from((x, y): (usize, usize)) -> Self {
        Pos {
            x: x as i32,
            y: y as i32,
        }
    }
}

impl Add<Move> for Pos {
    type Output = Pos;

    fn add(self, mv: Move) -> Pos {
        let (dx, dy) = mv.offset();
        Pos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Cell {
    Wall,
    Empty,
    Target,
}

impl Cell {
    pub fn is_passable(self) -> bool {
        self != Cell::Wall
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Empty => '.',
            Cell::Target => '$',
        }
    }

    pub fn from_symbol(c: char) -> Option<Cell> {
        match c {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Empty),
            '$' => Some(Cell::Target),
            _ => None,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// clockwise from up, the order in which moves are enumerated
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn unit(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

/// A single step or a two-cell jump along one axis.
///
/// Only built through [`Move::step`] and [`Move::jump`], so a jump always
/// covers exactly two cells and a step exactly one.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Move {
    direction: Direction,
    is_jump: bool,
}

impl Move {
    pub fn step(direction: Direction) -> Move {
        Move {
            direction,
            is_jump: false,
        }
    }

    pub fn jump(direction: Direction) -> Move {
        Move {
            direction,
            is_jump: true,
        }
    }

    /// step and jump for every direction, in enumeration order
    pub fn all() -> impl Iterator<Item = Move> {
        Direction::ALL
            .into_iter()
            .flat_map(|direction| [Move::step(direction), Move::jump(direction)])
    }

    pub fn direction(self) -> Direction {
        self.direction
    }

    pub fn is_jump(self) -> bool {
        self.is_jump
    }

    /// displacement in cells along each axis
    pub fn offset(self) -> (i32, i32) {
        let (dx, dy) = self.direction.unit();
        let reach = if self.is_jump { 2 } else { 1 };
        (dx * reach, dy * reach)
    }

    /// the cell a jump passes over. `None` for steps.
    pub fn midpoint_from(self, from: Pos) -> Option<Pos> {
        let (dx, dy) = self.direction.unit();
        self.is_jump.then(|| Pos {
            x: from.x + dx,
            y: from.y + dy,
        })
    }
}

impl Action for Move {
    fn label(&self) -> String {
        let dir = self.direction.name();
        if self.is_jump {
            format!("Jump {dir}")
        } else {
            dir.to_string()
        }
    }

    fn cost(&self) -> f64 {
        if self.is_jump {
            2.0
        } else {
            1.0
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
