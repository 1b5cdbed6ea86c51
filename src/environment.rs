use std::fmt::Debug;
use std::hash::Hash;

/// A point in a search space.
///
/// Compared and hashed by value; search structures clone states freely,
/// so implementors should be cheap to copy.
pub trait State: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> State for T {}

/// A transformation from one state to another.
pub trait Action: Clone + Debug {
    /// human-readable name, e.g. for a walkthrough listing
    fn label(&self) -> String;

    /// cost charged by cost-ordered strategies for taking this action
    fn cost(&self) -> f64 {
        1.0
    }
}

/// The rules of a search problem.
pub trait Environment {
    type State: State;
    type Action: Action;

    fn initial_state(&self) -> Self::State;

    fn goal_state(&self) -> Self::State;

    /// whether the state is inside the problem's bounds and not blocked.
    /// says nothing about reachability.
    fn is_valid(&self, state: &Self::State) -> bool;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// candidate actions in the order strategies should try them.
    /// may include actions that are infeasible from `state`.
    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Deterministic transition function.
    ///
    /// An infeasible action yields the input state unchanged, so callers
    /// detect failed moves by comparing before and after.
    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State;
}

/// An environment that can estimate the remaining cost to its goal.
///
/// Informed strategies (A*, greedy best-first) are only available for
/// environments implementing this.
pub trait Heuristic: Environment {
    /// must never exceed the true remaining cost for A* to stay optimal
    fn estimate(&self, state: &Self::State) -> f64;
}
