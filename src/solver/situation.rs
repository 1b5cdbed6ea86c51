//! Search nodes and the per-search arena that owns them.

use crate::environment::State;

/// Index of a [`Situation`] inside its [`SearchTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One node of a search tree: a state plus how it was reached.
#[derive(Debug, Clone)]
pub struct Situation<S, A> {
    state: S,
    parent: Option<NodeId>,
    action: Option<A>,
    depth: usize,
    g_cost: f64,
    f_cost: f64,
}

impl<S, A> Situation<S, A> {
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// the action taken from the parent. `None` for the root.
    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    /// number of actions from the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// accumulated path cost from the root
    pub fn g_cost(&self) -> f64 {
        self.g_cost
    }

    /// g plus the heuristic estimate, only meaningful for cost-ordered strategies
    pub fn f_cost(&self) -> f64 {
        self.f_cost
    }
}

/// Arena of search nodes for a single search.
///
/// Parents are stored as indices, and a parent is always allocated before
/// its children. The tree is dropped when the search returns; only the
/// states along the winning path are copied out.
#[derive(Debug)]
pub struct SearchTree<S, A> {
    nodes: Vec<Situation<S, A>>,
}

impl<S: State, A> SearchTree<S, A> {
    /// a tree holding only the root, at depth 0 with zero cost
    pub fn new(root: S) -> Self {
        let root = Situation {
            state: root,
            parent: None,
            action: None,
            depth: 0,
            g_cost: 0.0,
            f_cost: 0.0,
        };

        SearchTree { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// live nodes, the root included, so never zero
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> &Situation<S, A> {
        &self.nodes[id.0]
    }

    pub fn state(&self, id: NodeId) -> &S {
        &self.get(id).state
    }

    /// Allocates a child of `parent`, one level deeper, with `step_cost`
    /// added to the parent's accumulated cost.
    pub fn add_child(&mut self, parent: NodeId, state: S, action: A, step_cost: f64) -> NodeId {
        let (depth, g_cost) = {
            let parent = self.get(parent);
            (parent.depth + 1, parent.g_cost + step_cost)
        };

        self.nodes.push(Situation {
            state,
            parent: Some(parent),
            action: Some(action),
            depth,
            g_cost,
            f_cost: g_cost,
        });

        NodeId(self.nodes.len() - 1)
    }

    pub fn set_f_cost(&mut self, id: NodeId, f_cost: f64) {
        self.nodes[id.0].f_cost = f_cost;
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &Situation<S, A>> + '_ {
        std::iter::successors(Some(self.get(id)), |node| node.parent.map(|p| self.get(p)))
    }

    /// whether `target` appears on the path from the root to `id`, inclusive
    pub fn has_ancestor(&self, id: NodeId, target: &S) -> bool {
        self.ancestors(id).any(|node| node.state == *target)
    }

    /// states from the root down to `id`
    pub fn extract_path(&self, id: NodeId) -> Vec<S> {
        let mut path: Vec<S> = self.ancestors(id).map(|node| node.state.clone()).collect();
        path.reverse();
        path
    }

    /// Drops `id` and every node allocated after it.
    ///
    /// In a depth-first search those are exactly the nodes of the subtree
    /// rooted at `id`.
    pub fn discard_from(&mut self, id: NodeId) {
        self.nodes.truncate(id.0);
    }
}
