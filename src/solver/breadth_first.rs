use super::situation::SearchTree;
use super::Solver;
use crate::environment::Environment;
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// Level-order graph search. Finds the path with the fewest actions,
/// counting a jump the same as a step.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstSolver;

impl<E: Environment> Solver<E> for BreadthFirstSolver {
    #[tracing::instrument(level = "trace", skip_all, fields(start = ?start))]
    fn solve(&self, env: &E, start: &E::State) -> Vec<E::State> {
        let mut tree = SearchTree::new(start.clone());
        let mut queue = VecDeque::from([tree.root()]);
        let mut visited = HashSet::from([start.clone()]);

        while let Some(current) = queue.pop_front() {
            let state = tree.state(current).clone();

            if env.is_goal(&state) {
                trace!(expanded = tree.node_count(), "goal reached");
                return tree.extract_path(current);
            }

            for action in env.possible_actions(&state) {
                let next = env.apply_action(&state, &action);

                if env.is_valid(&next) && next != state && !visited.contains(&next) {
                    visited.insert(next.clone());
                    queue.push_back(tree.add_child(current, next, action, 1.0));
                }
            }
        }

        trace!(expanded = tree.node_count(), "no path");
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "Breadth-First Search"
    }
}
