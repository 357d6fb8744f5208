//! Unbalanced binary search tree, the baseline the AVL tree is measured
//! against.
//!
//! No rebalancing at all: inserting keys in increasing order produces a chain
//! whose height equals the key count.

use crate::pool::{NodePool, NodeRef, Path, TreeNode};
use crate::tracing_helpers::trace_log;
use crate::{Engine, Key, Metrics, Result};

#[derive(Debug, Clone)]
struct BstNode {
    key: Key,
    left: NodeRef,
    right: NodeRef,
}

impl TreeNode for BstNode {
    #[inline]
    fn key(&self) -> Key {
        self.key
    }
    #[inline]
    fn left(&self) -> NodeRef {
        self.left
    }
    #[inline]
    fn right(&self) -> NodeRef {
        self.right
    }
    #[inline]
    fn left_mut(&mut self) -> &mut NodeRef {
        &mut self.left
    }
    #[inline]
    fn right_mut(&mut self) -> &mut NodeRef {
        &mut self.right
    }
}

/// Plain BST over integer keys.
#[derive(Debug, Clone, Default)]
pub struct Bst {
    pool: NodePool<BstNode>,
    root: NodeRef,
    len: usize,
}

impl Bst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `key`. Returns `false` (tree untouched) if it is already present.
    pub fn insert(&mut self, key: Key) -> bool {
        let mut path = Path::new();
        if !self.pool.descend(self.root, key, &mut path).is_null() {
            trace_log!(key, "bst insert: duplicate ignored");
            return false;
        }
        let new = self.pool.alloc(BstNode {
            key,
            left: NodeRef::NULL,
            right: NodeRef::NULL,
        });
        match path.last() {
            Some(step) => *self.pool.get_mut(step.node).child_mut(step.side) = new,
            None => self.root = new,
        }
        self.len += 1;
        trace_log!(key, depth = path.len() + 1, "bst insert");
        true
    }

    pub fn search(&self, key: Key) -> bool {
        self.pool.find(self.root, key).is_some()
    }

    /// Remove `key`. A node with two children takes its in-order successor's
    /// key and the successor node is unlinked instead.
    pub fn delete(&mut self, key: Key) -> bool {
        let mut path = Path::new();
        let found = self.pool.descend(self.root, key, &mut path);
        if found.is_null() {
            return false;
        }

        let mut target = found;
        {
            let n = self.pool.get(found);
            if !n.left.is_null() && !n.right.is_null() {
                target = self.pool.successor(found, &mut path);
                let succ_key = self.pool.get(target).key;
                self.pool.get_mut(found).key = succ_key;
            }
        }

        let t = self.pool.get(target);
        let replacement = if t.left.is_null() { t.right } else { t.left };
        match path.last() {
            Some(step) => *self.pool.get_mut(step.node).child_mut(step.side) = replacement,
            None => self.root = replacement,
        }
        self.pool.release(target);
        self.len -= 1;
        trace_log!(key, "bst delete");
        true
    }

    /// Longest root-to-leaf path in nodes. O(n): the tree does not cache it.
    pub fn height(&self) -> u32 {
        self.pool.measure_height(self.root)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.pool.iter(self.root)
    }

    pub fn is_search_tree(&self) -> bool {
        self.pool.is_search_tree(self.root)
    }

    /// Sideways text dump, right subtree on top.
    pub fn render(&self) -> String {
        self.pool.render(self.root)
    }
}

impl Engine for Bst {
    fn name(&self) -> &'static str {
        "BST"
    }

    fn insert(&mut self, key: Key) -> Result<bool> {
        Ok(Bst::insert(self, key))
    }

    fn search(&self, key: Key) -> bool {
        Bst::search(self, key)
    }

    fn delete(&mut self, key: Key) -> bool {
        Bst::delete(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            height: Some(self.height()),
            ..Metrics::with_len(self.len)
        }
    }
}
