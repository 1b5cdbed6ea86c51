use super::situation::NodeId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry {
    priority: f64,
    order: u64,
    node: NodeId,
}

impl Ord for Entry {
    //reversed: BinaryHeap is a max-heap, we want the lowest priority first.
    //equal priorities come out in insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Min-priority open set of search nodes for the best-first strategies.
#[derive(Debug, Default)]
pub struct OpenSet {
    heap: BinaryHeap<Entry>,
    pushed: u64,
}

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: NodeId, priority: f64) {
        self.heap.push(Entry {
            priority,
            order: self.pushed,
            node,
        });
        self.pushed += 1;
    }

    /// the node with the lowest priority
    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
