pub mod a_star;
pub mod breadth_first;
pub mod depth_first;
pub mod frontier;
pub mod greedy;
pub mod situation;

pub use a_star::AStarSolver;
pub use breadth_first::BreadthFirstSolver;
pub use depth_first::DepthFirstSolver;
pub use greedy::GreedySolver;

use crate::environment::{Environment, Heuristic};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use itertools::Itertools;
use std::fmt;
use tracing::debug;

/// A search strategy.
pub trait Solver<E: Environment> {
    /// Finds a sequence of states from `start` to a goal, both included.
    ///
    /// An empty result means no path was found.
    fn solve(&self, env: &E, start: &E::State) -> Vec<E::State>;

    fn name(&self) -> &'static str;
}

/// Holds the available strategies and which one is in use.
pub struct PathFindingManager<E: Environment> {
    solvers: Vec<Box<dyn Solver<E>>>,
    current: usize,
}

impl<E: Environment> PathFindingManager<E> {
    /// a manager with nothing registered. `solve` fails until a solver is added.
    pub fn empty() -> Self {
        PathFindingManager {
            solvers: Vec::new(),
            current: 0,
        }
    }

    /// Adds a solver, replacing any solver with the same name in place.
    /// The first solver registered becomes the active one.
    pub fn register(&mut self, solver: impl Solver<E> + 'static) {
        let name = solver.name();
        match self.position_of(name) {
            Some(index) => self.solvers[index] = Box::new(solver),
            None => self.solvers.push(Box::new(solver)),
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.solvers.iter().position(|solver| solver.name() == name)
    }

    /// runs the active solver from `start`
    pub fn solve(&self, env: &E, start: &E::State) -> Result<Vec<E::State>> {
        let solver = self
            .solvers
            .get(self.current)
            .ok_or_else(|| eyre!("no path finding algorithm registered"))?;

        let path = solver.solve(env, start);
        debug!(
            algorithm = solver.name(),
            length = path.len(),
            "search finished"
        );

        Ok(path)
    }

    /// Switches to the named solver. Unknown names leave the selection as is.
    pub fn set_algorithm(&mut self, name: &str) {
        match self.position_of(name) {
            Some(index) => {
                self.current = index;
                debug!(algorithm = name, "algorithm selected");
            }
            None => debug!(algorithm = name, "ignoring unknown algorithm"),
        }
    }

    /// cycles to the next registered solver, wrapping around
    pub fn select_next(&mut self) {
        if !self.solvers.is_empty() {
            self.current = (self.current + 1) % self.solvers.len();
            debug!(algorithm = self.solvers[self.current].name(), "algorithm selected");
        }
    }

    pub fn current_algorithm_name(&self) -> Option<&'static str> {
        self.solvers.get(self.current).map(|solver| solver.name())
    }

    /// names in registration order
    pub fn available(&self) -> Vec<&'static str> {
        self.solvers.iter().map(|solver| solver.name()).collect_vec()
    }
}

impl<E: Environment> fmt::Debug for PathFindingManager<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathFindingManager")
            .field("available", &self.available())
            .field("current", &self.current_algorithm_name())
            .finish()
    }
}

impl<E> PathFindingManager<E>
where
    E: Heuristic + 'static,
{
    /// BFS, DFS, A* and greedy best-first, with BFS active
    pub fn new() -> Self {
        let mut manager = PathFindingManager::empty();
        manager.register(BreadthFirstSolver);
        manager.register(DepthFirstSolver::default());
        manager.register(AStarSolver);
        manager.register(GreedySolver);
        manager
    }
}

impl<E> Default for PathFindingManager<E>
where
    E: Heuristic + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::environment::Action;
    use crate::maze::environment::MazeEnvironment;
    use crate::maze::{path_cost, Maze};
    use crate::state::{Direction, Move, Pos};
    use nanorand::WyRand;
    use pathfinding::prelude::dijkstra;
    use std::collections::HashSet;

    /// A directed graph over numbered nodes. Action `n` moves to node `n`
    /// when there is an edge, otherwise stays put.
    #[derive(Debug)]
    pub(crate) struct Graph {
        pub edges: Vec<(u32, u32)>,
        pub start: u32,
        pub goal: u32,
    }

    #[derive(Clone, Debug)]
    pub(crate) struct Edge(pub u32);

    impl Action for Edge {
        fn label(&self) -> String {
            format!("to {}", self.0)
        }
    }

    impl Environment for Graph {
        type State = u32;
        type Action = Edge;

        fn initial_state(&self) -> u32 {
            self.start
        }

        fn goal_state(&self) -> u32 {
            self.goal
        }

        fn is_valid(&self, _state: &u32) -> bool {
            true
        }

        fn is_goal(&self, state: &u32) -> bool {
            *state == self.goal
        }

        fn possible_actions(&self, state: &u32) -> Vec<Edge> {
            self.edges
                .iter()
                .filter(|(from, _)| from == state)
                .map(|&(_, to)| Edge(to))
                .collect()
        }

        fn apply_action(&self, state: &u32, action: &Edge) -> u32 {
            if self.edges.contains(&(*state, action.0)) {
                action.0
            } else {
                *state
            }
        }
    }

    pub(crate) fn maze_env(layout: &str) -> MazeEnvironment {
        MazeEnvironment::new(layout.parse().unwrap())
    }

    /// small enough that the depth-first tree search stays quick
    pub(crate) fn random_envs(count: u64) -> impl Iterator<Item = MazeEnvironment> {
        (0..count).map(|seed| {
            let mut rng = WyRand::new_seed(seed);
            let (width, height) = (5 + seed as usize % 5, 5 + seed as usize % 4);
            MazeEnvironment::new(Maze::generate(width, height, &mut rng).unwrap())
        })
    }

    /// consecutive states must be one legal move apart
    pub(crate) fn assert_legal_path(env: &MazeEnvironment, path: &[Pos]) {
        assert_eq!(path.first(), Some(&env.initial_state()));
        assert!(env.is_goal(path.last().unwrap()));

        for pair in path.windows(2) {
            let reachable = env
                .possible_actions(&pair[0])
                .iter()
                .any(|action| env.apply_action(&pair[0], action) == pair[1]);
            assert!(reachable, "illegal move {} -> {}", pair[0], pair[1]);
        }
    }

    pub(crate) fn optimal_cost(env: &MazeEnvironment) -> Option<u32> {
        dijkstra(
            &env.initial_state(),
            |&pos| {
                env.possible_actions(&pos)
                    .into_iter()
                    .map(move |action| env.apply_action(&pos, &action))
                    .filter(move |&next| next != pos)
                    .map(move |next| (next, pos.manhattan_distance(next)))
            },
            |pos| env.is_goal(pos),
        )
        .map(|(_, cost)| cost)
    }

    /// A walled floor whose jumps may optionally pass over walls,
    /// which the maze rules never allow.
    #[derive(Debug)]
    struct Hopper {
        walls: HashSet<Pos>,
        width: i32,
        height: i32,
        goal: Pos,
        hop_walls: bool,
    }

    impl Hopper {
        fn new(layout: &str, goal: Pos, hop_walls: bool) -> Self {
            let rows = layout
                .lines()
                .map(str::trim)
                .filter(|row| !row.is_empty())
                .collect_vec();
            let walls = rows
                .iter()
                .enumerate()
                .flat_map(|(y, row)| {
                    row.chars()
                        .enumerate()
                        .filter(|&(_, c)| c == '#')
                        .map(move |(x, _)| Pos::from((x, y)))
                })
                .collect();

            Hopper {
                walls,
                width: rows[0].len() as i32,
                height: rows.len() as i32,
                goal,
                hop_walls,
            }
        }
    }

    impl Environment for Hopper {
        type State = Pos;
        type Action = Move;

        fn initial_state(&self) -> Pos {
            Pos::new(1, 1)
        }

        fn goal_state(&self) -> Pos {
            self.goal
        }

        fn is_valid(&self, state: &Pos) -> bool {
            (0..self.width).contains(&state.x)
                && (0..self.height).contains(&state.y)
                && !self.walls.contains(state)
        }

        fn is_goal(&self, state: &Pos) -> bool {
            *state == self.goal
        }

        fn possible_actions(&self, _state: &Pos) -> Vec<Move> {
            Move::all().collect()
        }

        fn apply_action(&self, state: &Pos, action: &Move) -> Pos {
            let midpoint_blocked = action
                .midpoint_from(*state)
                .is_some_and(|midpoint| !self.is_valid(&midpoint));
            let to = *state + *action;

            if (midpoint_blocked && !self.hop_walls) || !self.is_valid(&to) {
                *state
            } else {
                to
            }
        }
    }

    impl Heuristic for Hopper {
        fn estimate(&self, state: &Pos) -> f64 {
            f64::from(state.manhattan_distance(self.goal))
        }
    }

    const WALL_BETWEEN: &str = "
        #####
        #.#.#
        #####
    ";

    #[test]
    fn only_route_is_a_jump_over_a_wall() {
        let goal = Pos::new(3, 1);
        let hopper = Hopper::new(WALL_BETWEEN, goal, true);
        let expected = [Pos::new(1, 1), goal];

        for path in [
            BreadthFirstSolver.solve(&hopper, &hopper.initial_state()),
            AStarSolver.solve(&hopper, &hopper.initial_state()),
        ] {
            assert_eq!(path, expected);
            let jump = Move::jump(Direction::Right);
            assert_eq!(hopper.apply_action(&path[0], &jump), path[1]);
        }
    }

    #[test]
    fn wall_jumps_forbidden_means_no_path() {
        let hopper = Hopper::new(WALL_BETWEEN, Pos::new(3, 1), false);
        let mut manager = PathFindingManager::new();

        for name in manager.available() {
            manager.set_algorithm(name);
            let path = manager.solve(&hopper, &hopper.initial_state()).unwrap();
            assert!(path.is_empty(), "{name}");
        }

        //the maze rules forbid it too, so no maze can have this layout
        assert!("#####\n#.#$#\n#####".parse::<Maze>().is_err());
    }

    #[test]
    fn registers_four_algorithms_with_bfs_first() {
        let manager = PathFindingManager::<MazeEnvironment>::new();

        assert_eq!(
            manager.available(),
            [
                "Breadth-First Search",
                "Depth-First Search",
                "A* Search",
                "Greedy Best-First Search"
            ]
        );
        assert_eq!(manager.current_algorithm_name(), Some("Breadth-First Search"));
    }

    #[test]
    fn unknown_algorithm_keeps_the_previous_selection() {
        let mut manager = PathFindingManager::<MazeEnvironment>::new();

        manager.set_algorithm("A* Search");
        manager.set_algorithm("Bogus Strategy");

        assert_eq!(manager.current_algorithm_name(), Some("A* Search"));
    }

    #[test]
    fn select_next_wraps_around() {
        let mut manager = PathFindingManager::<MazeEnvironment>::new();
        manager.set_algorithm("Greedy Best-First Search");

        manager.select_next();

        assert_eq!(manager.current_algorithm_name(), Some("Breadth-First Search"));
    }

    #[test]
    fn solving_without_algorithms_is_an_error() {
        let manager = PathFindingManager::<Graph>::empty();
        let graph = Graph {
            edges: vec![(0, 1)],
            start: 0,
            goal: 1,
        };

        assert!(manager.solve(&graph, &0).is_err());
        assert_eq!(manager.current_algorithm_name(), None);
    }

    #[test]
    fn registering_an_existing_name_replaces_it_in_place() {
        let mut manager = PathFindingManager::<Graph>::empty();
        manager.register(BreadthFirstSolver);
        manager.register(DepthFirstSolver::default());
        manager.register(BreadthFirstSolver);

        assert_eq!(manager.available(), ["Breadth-First Search", "Depth-First Search"]);
    }

    #[test]
    fn solve_delegates_to_the_selected_algorithm() {
        let env = maze_env(
            "
            ######
            #....#
            #....#
            #...$#
            ######
            ",
        );
        let mut manager = PathFindingManager::new();

        for name in manager.available() {
            manager.set_algorithm(name);
            let path = manager.solve(&env, &env.initial_state()).unwrap();
            assert_legal_path(&env, &path);
        }
    }

    #[test]
    fn tiny_maze_is_solved_in_place_by_every_algorithm() {
        let env = maze_env("###\n#$#\n###");
        let mut manager = PathFindingManager::new();

        for name in manager.available() {
            manager.set_algorithm(name);
            let path = manager.solve(&env, &env.initial_state()).unwrap();
            assert_eq!(path, [Pos::new(1, 1)], "{name}");
        }
    }

    #[test]
    fn bfs_uses_no_more_actions_than_dfs() {
        for env in random_envs(40) {
            let start = env.initial_state();
            let bfs = BreadthFirstSolver.solve(&env, &start);
            let dfs = DepthFirstSolver::default().solve(&env, &start);

            assert!(!bfs.is_empty());
            if !dfs.is_empty() {
                assert!(bfs.len() <= dfs.len());
            }
        }
    }

    #[test]
    fn a_star_is_never_costlier_than_the_others() {
        for env in random_envs(40) {
            let start = env.initial_state();
            let a_star = AStarSolver.solve(&env, &start);
            assert_legal_path(&env, &a_star);

            let best = path_cost(&a_star);
            assert_eq!(Some(best), optimal_cost(&env));

            let others = [
                BreadthFirstSolver.solve(&env, &start),
                DepthFirstSolver::default().solve(&env, &start),
                GreedySolver.solve(&env, &start),
            ];
            for path in others.iter().filter(|path| !path.is_empty()) {
                assert_legal_path(&env, path);
                assert!(best <= path_cost(path));
            }
        }
    }

    #[test]
    fn solvers_start_from_an_explicit_state() {
        let env = maze_env(
            "
            ######
            #....#
            #....#
            #...$#
            ######
            ",
        );
        let start = Pos::new(4, 1);
        let mut manager = PathFindingManager::new();

        for name in manager.available() {
            manager.set_algorithm(name);
            let path = manager.solve(&env, &start).unwrap();
            assert_eq!(path.first(), Some(&start), "{name}");
            assert_eq!(path.last(), Some(&env.goal_state()), "{name}");
        }
    }
}
