//! Suffix compression: merge structurally identical subtries into a
//! DAG of canonical nodes.

use hashbrown::HashMap;

use crate::constants::INVALID_NODE;
use crate::types::{CharCode, Priority};

use super::{NodeId, TrieArena};

/// Hash-consing key of a node whose descendants are already canonical.
///
/// Equality of the link fields is identity equality, because the
/// linked nodes have been canonicalized first; the derived hash folds
/// the priority vector byte by byte, order-sensitively.
#[derive(Hash, PartialEq, Eq)]
struct NodeKey {
    ch: CharCode,
    priorities: Option<Box<[Priority]>>,
    first_child: NodeId,
    next_sibling: NodeId,
}

impl TrieArena {
    /// Rewrites the trie so that every distinct subtrie is represented
    /// by exactly one node. Idempotent; the result is a DAG, reachable
    /// nodes shared through their arena indices.
    pub fn compress(&mut self) {
        let mut table: HashMap<NodeKey, NodeId> = HashMap::with_capacity(self.nodes.len());
        let mut resolved: HashMap<NodeId, NodeId> = HashMap::with_capacity(self.nodes.len());
        let root = self.root();
        let canonical = self.compress_node(root, &mut table, &mut resolved);
        self.set_root(canonical);
    }

    fn compress_node(
        &mut self,
        id: NodeId,
        table: &mut HashMap<NodeKey, NodeId>,
        resolved: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        if let Some(&canonical) = resolved.get(&id) {
            return canonical;
        }

        let first_child = self.node(id).first_child;
        if first_child != INVALID_NODE {
            let canonical = self.compress_node(first_child, table, resolved);
            self.node_mut(id).first_child = canonical;
        }
        let next_sibling = self.node(id).next_sibling;
        if next_sibling != INVALID_NODE {
            let canonical = self.compress_node(next_sibling, table, resolved);
            self.node_mut(id).next_sibling = canonical;
        }

        let node = self.node(id);
        let key = NodeKey {
            ch: node.ch,
            priorities: node.priorities.clone(),
            first_child: node.first_child,
            next_sibling: node.next_sibling,
        };
        let canonical = *table.entry(key).or_insert(id);
        resolved.insert(id, canonical);
        canonical
    }
}

#[cfg(test)]
impl TrieArena {
    /// Nodes reachable from the root over both links.
    pub(crate) fn reachable_count(&self) -> usize {
        let mut visited = hashbrown::HashSet::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let node = self.node(id);
            if node.first_child != INVALID_NODE {
                stack.push(node.first_child);
            }
            if node.next_sibling != INVALID_NODE {
                stack.push(node.next_sibling);
            }
        }
        visited.len()
    }
}
