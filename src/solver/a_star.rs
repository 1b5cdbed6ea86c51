use super::frontier::OpenSet;
use super::situation::SearchTree;
use super::Solver;
use crate::environment::{Action, Heuristic};
use std::collections::HashMap;
use tracing::trace;

/// Best-first search on `g + h`, charging each action its own cost.
///
/// With an admissible, consistent heuristic the first goal popped is on a
/// cheapest path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarSolver;

impl<E: Heuristic> Solver<E> for AStarSolver {
    #[tracing::instrument(level = "trace", skip_all, fields(start = ?start))]
    fn solve(&self, env: &E, start: &E::State) -> Vec<E::State> {
        let mut tree = SearchTree::new(start.clone());
        let mut open = OpenSet::new();
        let mut best_g = HashMap::from([(start.clone(), 0.0)]);

        let root = tree.root();
        tree.set_f_cost(root, env.estimate(start));
        open.push(root, tree.get(root).f_cost());

        while let Some(current) = open.pop() {
            let situation = tree.get(current);
            let state = situation.state().clone();
            let g = situation.g_cost();

            //a cheaper route to this state was queued after this entry
            if best_g.get(&state).is_some_and(|&best| g > best) {
                continue;
            }

            if env.is_goal(&state) {
                trace!(cost = g, expanded = tree.node_count(), "goal reached");
                return tree.extract_path(current);
            }

            for action in env.possible_actions(&state) {
                let next = env.apply_action(&state, &action);
                if !env.is_valid(&next) || next == state {
                    continue;
                }

                let step_cost = action.cost();
                let next_g = g + step_cost;
                if best_g.get(&next).is_some_and(|&known| next_g >= known) {
                    continue;
                }

                let f = next_g + env.estimate(&next);
                best_g.insert(next.clone(), next_g);

                let child = tree.add_child(current, next, action, step_cost);
                tree.set_f_cost(child, f);
                open.push(child, f);
            }
        }

        trace!(expanded = tree.node_count(), "no path");
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "A* Search"
    }
}
