use super::frontier::OpenSet;
use super::situation::SearchTree;
use super::Solver;
use crate::environment::Heuristic;
use std::collections::HashSet;
use tracing::trace;

/// Best-first search on the heuristic alone.
///
/// A state is closed as soon as it is queued and never reconsidered, so
/// this is quick but gives no guarantee about path cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl<E: Heuristic> Solver<E> for GreedySolver {
    #[tracing::instrument(level = "trace", skip_all, fields(start = ?start))]
    fn solve(&self, env: &E, start: &E::State) -> Vec<E::State> {
        let mut tree = SearchTree::new(start.clone());
        let mut open = OpenSet::new();
        let mut closed = HashSet::from([start.clone()]);

        let root = tree.root();
        tree.set_f_cost(root, env.estimate(start));
        open.push(root, tree.get(root).f_cost());

        while let Some(current) = open.pop() {
            let state = tree.state(current).clone();

            if env.is_goal(&state) {
                trace!(expanded = tree.node_count(), "goal reached");
                return tree.extract_path(current);
            }

            for action in env.possible_actions(&state) {
                let next = env.apply_action(&state, &action);
                if !env.is_valid(&next) || next == state || closed.contains(&next) {
                    continue;
                }

                let h = env.estimate(&next);
                closed.insert(next.clone());

                let child = tree.add_child(current, next, action, 0.0);
                tree.set_f_cost(child, h);
                open.push(child, h);
            }
        }

        trace!(expanded = tree.node_count(), "no path");
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "Greedy Best-First Search"
    }
}
