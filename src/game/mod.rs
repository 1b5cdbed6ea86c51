use crate::agent::RobotAgent;
use crate::environment::Environment;
use crate::maze::environment::MazeEnvironment;
use crate::maze::{path_cost, Maze};
use crate::solver::PathFindingManager;
use crate::state::{Cell, Move, Pos};
use color_eyre::{Report, Result};
use std::cell::Cell as Flag;
use std::fmt::Display;
use std::io::Write;
use std::rc::Rc;
use termion::{clear, color, cursor, terminal_size};
use tracing::info;

const ROBOT: char = '@';
const TRAIL: char = '*';

#[derive(Debug)]
pub struct Game {
    agent: RobotAgent<MazeEnvironment>,
    manager: PathFindingManager<MazeEnvironment>,
    mode: Mode,
    walkthrough: PathWalkthrough,
    status: String,
    agent_moved: Rc<Flag<bool>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Playable,
    Walkthrough,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Movement(Move),

    FindPath,
    NextAlgorithm,

    Restart,
    Exit,

    PrevWalkthroughStep,
    NextWalkthroughStep,
    ToggleMode,
}

impl Game {
    pub fn new(env: MazeEnvironment, manager: PathFindingManager<MazeEnvironment>) -> Self {
        let mut agent = RobotAgent::new(Rc::new(env));

        let agent_moved = Rc::new(Flag::new(false));
        let flag = Rc::clone(&agent_moved);
        agent.add_listener(move || flag.set(true));

        Game {
            agent,
            manager,
            mode: Mode::Playable,
            walkthrough: PathWalkthrough::default(),
            status: String::new(),
            agent_moved,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn robot(&self) -> Pos {
        *self.agent.current_state()
    }

    pub fn maze(&self) -> &Maze {
        self.agent.environment().maze()
    }

    pub fn algorithm(&self) -> &'static str {
        self.manager.current_algorithm_name().unwrap_or("none")
    }

    /// the last path found, in full
    pub fn path(&self) -> &[Pos] {
        &self.walkthrough.path
    }

    /// whether the robot moved since the last call
    pub fn take_agent_moved(&self) -> bool {
        self.agent_moved.replace(false)
    }

    /// Runs a command and reports whether the screen needs redrawing.
    /// `Exit` is left to the caller.
    pub fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Movement(mv) => self.move_robot(mv),
            Command::FindPath => self.find_path()?,
            Command::NextAlgorithm => self.next_algorithm(),
            Command::Restart => self.restart(),
            Command::PrevWalkthroughStep => self.walkthrough.decrement(),
            Command::NextWalkthroughStep => self.walkthrough.increment(),
            Command::ToggleMode => self.toggle_mode(),
            Command::Exit => return Ok(false),
        }

        //movement only redraws if the agent reported a change
        let agent_moved = self.take_agent_moved();
        Ok(agent_moved || !matches!(command, Command::Movement(_)))
    }

    fn move_robot(&mut self, mv: Move) {
        if self.mode != Mode::Playable || !self.agent.apply_action(&mv) {
            return;
        }

        self.walkthrough = PathWalkthrough::default();
        self.status.clear();

        if self.agent.is_at_goal() {
            info!(at = %self.robot(), "target reached");
            self.mode = Mode::GameOver;
            self.status = "Treasure found!".to_string();
        }
    }

    /// searches from wherever the robot stands now
    fn find_path(&mut self) -> Result<()> {
        if self.mode == Mode::GameOver {
            return Ok(());
        }

        let path = self.manager.solve(self.agent.environment(), &self.robot())?;

        if path.is_empty() {
            self.status = "Path not found!".to_string();
            return Ok(());
        }

        self.status = format!(
            "Path: {} steps, cost {}. Algorithm: {}",
            path.len() - 1,
            path_cost(&path),
            self.algorithm()
        );
        self.walkthrough = PathWalkthrough::new(path);
        self.mode = Mode::Walkthrough;
        Ok(())
    }

    fn next_algorithm(&mut self) {
        self.manager.select_next();
        self.status = format!("Algorithm: {}", self.algorithm());
    }

    pub fn restart(&mut self) {
        self.agent.reset();
        self.walkthrough = PathWalkthrough::default();
        self.mode = Mode::Playable;
        self.status.clear();
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Playable if !self.walkthrough.path.is_empty() => Mode::Walkthrough,
            Mode::Playable => Mode::Playable,
            Mode::Walkthrough => Mode::Playable,
            Mode::GameOver => Mode::GameOver,
        }
    }

    pub fn tile_at(&self, pos: Pos) -> char {
        let trail: &[Pos] = match self.mode {
            Mode::Walkthrough => self.walkthrough.revealed(),
            Mode::Playable | Mode::GameOver => &[],
        };
        symbol_at(self.maze(), trail, self.robot(), pos)
    }

    pub fn draw(&self, stdout: &mut impl Write) -> Result<()> {
        write!(stdout, "{}", clear::All)?;
        let terminal_size = terminal_size()?;

        let header = [
            format!("Algorithm: {}", self.algorithm()),
            self.help().to_string(),
            self.status.clone(),
        ];
        for (i, line) in header.iter().enumerate() {
            center_cursor(stdout, terminal_size, u16::try_from(i)?)?;
            write!(stdout, "{line}")?;
        }

        let offset_from_top = header.len() + 1;
        for y in 0..self.maze().height() {
            let adjusted_y = u16::try_from(y + offset_from_top)?;
            center_cursor(stdout, terminal_size, adjusted_y)?;

            for x in 0..self.maze().width() {
                let tile = self.tile_at(Pos::from((x, y)));

                match (tile, self.mode) {
                    (ROBOT, Mode::GameOver) => write_colored(stdout, tile, color::Green)?,
                    (ROBOT, _) => write_colored(stdout, tile, color::Red)?,
                    (TRAIL, _) => write_colored(stdout, tile, color::Yellow)?,
                    _ => write!(stdout, "{tile}")?,
                }
            }

            writeln!(stdout, "\r")?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn help(&self) -> &'static str {
        match self.mode {
            Mode::Playable => "arrows: step  wasd: jump  f: find path  tab: algorithm  r: restart",
            Mode::Walkthrough => "z/x: previous/next step  f: back to play  r: restart",
            Mode::GameOver => "r: restart  esc: quit",
        }
    }
}

/// the character for `pos`: the robot over the trail over the maze cell
pub fn symbol_at(maze: &Maze, trail: &[Pos], robot: Pos, pos: Pos) -> char {
    if pos == robot {
        ROBOT
    } else if trail.contains(&pos) && maze.cell(pos) != Cell::Target {
        TRAIL
    } else {
        maze.cell(pos).symbol()
    }
}

/// the maze as text with `path` marked and the robot at its start
pub fn render_path(env: &MazeEnvironment, path: &[Pos]) -> String {
    let maze = env.maze();
    let robot = path.first().copied().unwrap_or_else(|| env.initial_state());

    let mut out = String::new();
    for y in 0..maze.height() {
        for x in 0..maze.width() {
            out.push(symbol_at(maze, path, robot, Pos::from((x, y))));
        }
        out.push('\n');
    }
    out
}

/// A found path, revealed one state at a time.
#[derive(Debug, Clone, Default)]
struct PathWalkthrough {
    path: Vec<Pos>,
    current_step: usize,
}

impl PathWalkthrough {
    fn new(path: Vec<Pos>) -> Self {
        Self {
            path,
            current_step: 0,
        }
    }

    /// the states up to and including the current step
    fn revealed(&self) -> &[Pos] {
        let end = (self.current_step + 1).min(self.path.len());
        &self.path[..end]
    }

    fn decrement(&mut self) {
        if self.current_step > 0 {
            self.current_step -= 1;
        }
    }

    fn increment(&mut self) {
        if self.current_step + 1 < self.path.len() {
            self.current_step += 1;
        }
    }
}

fn center_cursor(stdout: &mut impl Write, term_dims: (u16, u16), row_offset: u16) -> Result<()> {
    let (term_cols, term_rows) = term_dims;
    let (mid_cols, top_rows) = (term_cols / 3, term_rows / 6);

    let goto = cursor::Goto(mid_cols.max(1), top_rows.max(1) + row_offset);
    write!(stdout, "{goto}").map_err(Report::from)
}

fn write_colored(stdout: &mut impl Write, d: impl Display, color: impl color::Color) -> Result<()> {
    let fg = color::Fg(color);
    let color_reset = color::Fg(color::Reset);
    write!(stdout, "{fg}{d}{color_reset}").map_err(Report::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Direction;

    const OPEN: &str = "
        ######
        #....#
        #....#
        #...$#
        ######
    ";

    fn game() -> Game {
        let env = MazeEnvironment::new(OPEN.parse().unwrap());
        Game::new(env, PathFindingManager::new())
    }

    #[test]
    fn blocked_move_needs_no_redraw() {
        let mut game = game();

        let redraw = game.handle(Command::Movement(Move::step(Direction::Up))).unwrap();

        assert!(!redraw);
        assert_eq!(game.robot(), Pos::new(1, 1));
    }

    #[test]
    fn successful_move_redraws_once() {
        let mut game = game();

        assert!(game.handle(Command::Movement(Move::step(Direction::Right))).unwrap());
        assert!(!game.take_agent_moved());
        assert_eq!(game.robot(), Pos::new(2, 1));
    }

    #[test]
    fn reaching_the_target_ends_the_game() {
        let mut game = game();
        for mv in [
            Move::jump(Direction::Right),
            Move::step(Direction::Right),
            Move::jump(Direction::Down),
        ] {
            game.handle(Command::Movement(mv)).unwrap();
        }

        assert_eq!(game.mode(), Mode::GameOver);
        assert_eq!(game.status(), "Treasure found!");

        game.handle(Command::Movement(Move::step(Direction::Left))).unwrap();
        assert_eq!(game.robot(), Pos::new(4, 3));
    }

    #[test]
    fn find_path_starts_a_walkthrough_from_the_robot() {
        let mut game = game();
        game.handle(Command::Movement(Move::step(Direction::Down))).unwrap();
        game.handle(Command::FindPath).unwrap();

        assert_eq!(game.mode(), Mode::Walkthrough);
        assert_eq!(game.path().first(), Some(&Pos::new(1, 2)));
        assert_eq!(game.path().last(), Some(&Pos::new(4, 3)));
        assert!(game.status().contains("Breadth-First Search"));
    }

    #[test]
    fn walkthrough_reveals_the_path_step_by_step() {
        let mut game = game();
        game.handle(Command::FindPath).unwrap();
        let second = game.path()[1];

        assert_eq!(game.tile_at(second), '.');
        game.handle(Command::NextWalkthroughStep).unwrap();
        assert_eq!(game.tile_at(second), TRAIL);
        game.handle(Command::PrevWalkthroughStep).unwrap();
        assert_eq!(game.tile_at(second), '.');

        game.handle(Command::ToggleMode).unwrap();
        assert_eq!(game.mode(), Mode::Playable);
    }

    #[test]
    fn cycling_algorithms_changes_the_search() {
        let mut game = game();
        game.handle(Command::NextAlgorithm).unwrap();
        game.handle(Command::NextAlgorithm).unwrap();

        assert_eq!(game.algorithm(), "A* Search");
        game.handle(Command::FindPath).unwrap();
        assert_eq!(path_cost(game.path()), 5);
    }

    #[test]
    fn restart_puts_the_robot_back() {
        let mut game = game();
        game.handle(Command::Movement(Move::step(Direction::Down))).unwrap();
        game.handle(Command::FindPath).unwrap();
        game.handle(Command::Restart).unwrap();

        assert_eq!(game.robot(), Pos::new(1, 1));
        assert_eq!(game.mode(), Mode::Playable);
        assert!(game.path().is_empty());
    }

    #[test]
    fn toggle_without_a_path_stays_in_play() {
        let mut game = game();
        game.handle(Command::ToggleMode).unwrap();
        assert_eq!(game.mode(), Mode::Playable);
    }

    #[test]
    fn render_marks_robot_and_path() {
        let env = MazeEnvironment::new(OPEN.parse().unwrap());
        let path = [Pos::new(1, 1), Pos::new(3, 1), Pos::new(3, 3), Pos::new(4, 3)];

        let expected = "\
######
#@.*.#
#....#
#..*$#
######
";
        assert_eq!(render_path(&env, &path), expected);
        assert_eq!(path_cost(&path), 5);
    }
}
