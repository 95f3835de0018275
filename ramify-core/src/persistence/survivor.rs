//! Survivor chains recorded during the elder-rule reduction.
//!
//! Whenever a merge vertex adopts the value of its surviving child, the chain
//! records `merge -> survivor`. Following the chain from any vertex ends at
//! the tip whose branch is still alive there. Lookups compress the walked
//! path so repeated backtracking stays near constant time.

#[derive(Clone, Debug)]
pub(super) struct SurvivorChain {
    next: Vec<usize>,
}

impl SurvivorChain {
    pub(super) fn new(n: usize) -> Self {
        Self {
            next: (0..n).collect(),
        }
    }

    /// Records that `merge` continues the branch of `survivor`.
    pub(super) fn link(&mut self, merge: usize, survivor: usize) {
        debug_assert_ne!(merge, survivor, "a vertex cannot survive into itself");
        self.next[merge] = survivor;
    }

    /// The tip at the end of the chain starting at `node`.
    pub(super) fn tip(&mut self, mut node: usize) -> usize {
        let mut tip = node;
        while self.next[tip] != tip {
            tip = self.next[tip];
        }

        while self.next[node] != node {
            let next = self.next[node];
            self.next[node] = tip;
            node = next;
        }

        tip
    }
}
