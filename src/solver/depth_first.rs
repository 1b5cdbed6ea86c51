use super::situation::{NodeId, SearchTree};
use super::Solver;
use crate::environment::Environment;
use tracing::trace;

/// Depth past which a branch is abandoned.
pub const MAX_DEPTH: usize = 500;

/// Recursive tree search with backtracking.
///
/// Keeps no global visited set: a successor is skipped only if it already
/// lies on the current branch. The first path found wins, so results
/// follow the environment's action order and are not optimal.
#[derive(Debug, Clone, Copy)]
pub struct DepthFirstSolver {
    max_depth: usize,
}

impl Default for DepthFirstSolver {
    fn default() -> Self {
        DepthFirstSolver {
            max_depth: MAX_DEPTH,
        }
    }
}

impl DepthFirstSolver {
    pub fn with_max_depth(max_depth: usize) -> Self {
        DepthFirstSolver { max_depth }
    }

    fn search<E: Environment>(
        &self,
        env: &E,
        tree: &mut SearchTree<E::State, E::Action>,
        current: NodeId,
    ) -> Option<NodeId> {
        let situation = tree.get(current);
        if env.is_goal(situation.state()) {
            return Some(current);
        }

        if situation.depth() >= self.max_depth {
            return None;
        }

        let state = situation.state().clone();
        for action in env.possible_actions(&state) {
            let next = env.apply_action(&state, &action);

            if !env.is_valid(&next) || next == state || tree.has_ancestor(current, &next) {
                continue;
            }

            let child = tree.add_child(current, next, action, 1.0);
            if let Some(found) = self.search(env, tree, child) {
                return Some(found);
            }
            tree.discard_from(child);
        }

        None
    }
}

impl<E: Environment> Solver<E> for DepthFirstSolver {
    #[tracing::instrument(level = "trace", skip_all, fields(start = ?start, max_depth = self.max_depth))]
    fn solve(&self, env: &E, start: &E::State) -> Vec<E::State> {
        let mut tree = SearchTree::new(start.clone());
        let root = tree.root();

        match self.search(env, &mut tree, root) {
            Some(found) => {
                trace!(depth = tree.get(found).depth(), "goal reached");
                tree.extract_path(found)
            }
            None => {
                trace!("no path");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "Depth-First Search"
    }
}
