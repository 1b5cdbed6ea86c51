use super::Maze;
use crate::environment::{Environment, Heuristic};
use crate::state::{Move, Pos};

/// The robot-in-a-maze problem: walk or jump from the entrance to the target.
#[derive(Debug, Clone)]
pub struct MazeEnvironment {
    maze: Maze,
    start: Pos,
    goal: Pos,
}

impl MazeEnvironment {
    pub fn new(maze: Maze) -> Self {
        let start = maze.entrance();
        let goal = maze.target();
        MazeEnvironment { maze, start, goal }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }
}

impl Environment for MazeEnvironment {
    type State = Pos;
    type Action = Move;

    fn initial_state(&self) -> Pos {
        self.start
    }

    fn goal_state(&self) -> Pos {
        self.goal
    }

    fn is_valid(&self, state: &Pos) -> bool {
        self.maze.is_passable(*state)
    }

    fn is_goal(&self, state: &Pos) -> bool {
        *state == self.goal
    }

    /// all eight moves, whether or not they are feasible from `state`
    fn possible_actions(&self, _state: &Pos) -> Vec<Move> {
        Move::all().collect()
    }

    fn apply_action(&self, state: &Pos, action: &Move) -> Pos {
        self.maze.destination(*state, *action).unwrap_or(*state)
    }
}

impl Heuristic for MazeEnvironment {
    /// Manhattan distance. Every cell crossed costs at least 1, whether by
    /// step or by jump, so this never overestimates.
    fn estimate(&self, state: &Pos) -> f64 {
        f64::from(state.manhattan_distance(self.goal))
    }
}
