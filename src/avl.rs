//! Height-balanced (AVL) binary search tree.
//!
//! Every node caches the height of its subtree. After an insert or delete the
//! recorded descent path is unwound bottom-up; at each node the height is
//! recomputed and, if the balance factor left `[-1, 1]`, one of the four
//! rotation cases restores it:
//!
//! | balance | insert selects on       | delete selects on  | rotation(s)        |
//! |---------|-------------------------|--------------------|--------------------|
//! | `> 1`   | `key < left.key`        | `bf(left) >= 0`    | right              |
//! | `> 1`   | `key > left.key`        | `bf(left) < 0`     | left(left), right  |
//! | `< -1`  | `key > right.key`       | `bf(right) <= 0`   | left               |
//! | `< -1`  | `key < right.key`       | `bf(right) > 0`    | right(right), left |
//!
//! Deletion has no insertion direction to look at, so it picks the case from
//! the balance of the heavy child instead.
//!
//! Each rotation adds one to the tree's rotation counter; a double rotation
//! adds two.

use crate::pool::{NodePool, NodeRef, Path, TreeNode};
use crate::tracing_helpers::trace_log;
use crate::{Engine, Key, Metrics, Result};

// =============================================================================
// Node
// =============================================================================

#[derive(Debug, Clone)]
struct AvlNode {
    key: Key,
    left: NodeRef,
    right: NodeRef,
    /// Nodes on the longest downward path, this one included.
    height: u32,
}

impl TreeNode for AvlNode {
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

// =============================================================================
// Tree
// =============================================================================

/// AVL tree over integer keys with a per-instance rotation counter.
#[derive(Debug, Clone, Default)]
pub struct AvlTree {
    pool: NodePool<AvlNode>,
    root: NodeRef,
    len: usize,
    rotations: u64,
}

impl AvlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cached height of the root; 0 for an empty tree. O(1).
    pub fn height(&self) -> u32 {
        self.node_height(self.root)
    }

    /// Rotations performed since construction or the last
    /// [`reset_rotations`](Self::reset_rotations).
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    pub fn reset_rotations(&mut self) {
        self.rotations = 0;
    }

    pub fn search(&self, key: Key) -> bool {
        self.pool.find(self.root, key).is_some()
    }

    /// Insert `key`. Returns `false` and leaves the tree untouched if the key
    /// is already present.
    pub fn insert(&mut self, key: Key) -> bool {
        let mut path = Path::new();
        if !self.pool.descend(self.root, key, &mut path).is_null() {
            trace_log!(key, "avl insert: duplicate ignored");
            return false;
        }

        let mut child = self.pool.alloc(AvlNode {
            key,
            left: NodeRef::NULL,
            right: NodeRef::NULL,
            height: 1,
        });
        self.len += 1;

        while let Some(step) = path.pop() {
            *self.pool.get_mut(step.node).child_mut(step.side) = child;
            child = self.rebalance_after_insert(step.node, key);
        }
        self.root = child;
        trace_log!(key, height = self.height(), rotations = self.rotations, "avl insert");
        true
    }

    /// Remove `key`. Returns `false` if it was not present.
    ///
    /// A node with two children takes the key of its in-order successor (the
    /// minimum of its right subtree), and the successor node is removed from
    /// the right subtree in its place.
    pub fn delete(&mut self, key: Key) -> bool {
        let mut path = Path::new();
        let found = self.pool.descend(self.root, key, &mut path);
        if found.is_null() {
            return false;
        }

        let mut target = found;
        let (left, right) = {
            let n = self.pool.get(found);
            (n.left, n.right)
        };
        if !left.is_null() && !right.is_null() {
            target = self.pool.successor(found, &mut path);
            let succ_key = self.pool.get(target).key;
            self.pool.get_mut(found).key = succ_key;
            trace_log!(key, successor = succ_key, "avl delete: successor copied up");
        }

        // `target` has at most one child now.
        let t = self.pool.get(target);
        let mut child = if t.left.is_null() { t.right } else { t.left };
        self.pool.release(target);
        self.len -= 1;

        while let Some(step) = path.pop() {
            *self.pool.get_mut(step.node).child_mut(step.side) = child;
            child = self.rebalance_after_delete(step.node);
        }
        self.root = child;
        trace_log!(key, height = self.height(), rotations = self.rotations, "avl delete");
        true
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.pool.iter(self.root)
    }

    pub fn is_search_tree(&self) -> bool {
        self.pool.is_search_tree(self.root)
    }

    /// Check every node: cached height matches its children and the balance
    /// factor is within `[-1, 1]`.
    pub fn is_balanced(&self) -> bool {
        let mut stack = Vec::new();
        if !self.root.is_null() {
            stack.push(self.root);
        }
        while let Some(r) = stack.pop() {
            let n = self.pool.get(r);
            let (hl, hr) = (self.node_height(n.left), self.node_height(n.right));
            if n.height != 1 + hl.max(hr) || hl.abs_diff(hr) > 1 {
                return false;
            }
            if !n.left.is_null() {
                stack.push(n.left);
            }
            if !n.right.is_null() {
                stack.push(n.right);
            }
        }
        true
    }

    /// Sideways text dump, right subtree on top.
    pub fn render(&self) -> String {
        self.pool.render(self.root)
    }

    // -------------------------------------------------------------------------
    // Heights and balance
    // -------------------------------------------------------------------------

    #[inline]
    fn node_height(&self, r: NodeRef) -> u32 {
        if r.is_null() {
            0
        } else {
            self.pool.get(r).height
        }
    }

    #[inline]
    fn update_height(&mut self, r: NodeRef) {
        let n = self.pool.get(r);
        let h = 1 + self.node_height(n.left).max(self.node_height(n.right));
        self.pool.get_mut(r).height = h;
    }

    /// `height(left) - height(right)`; 0 for an absent node.
    #[inline]
    fn balance(&self, r: NodeRef) -> i64 {
        if r.is_null() {
            return 0;
        }
        let n = self.pool.get(r);
        self.node_height(n.left) as i64 - self.node_height(n.right) as i64
    }

    // -------------------------------------------------------------------------
    // Rotations
    // -------------------------------------------------------------------------

    /// ```text
    ///       y            x
    ///      / \          / \
    ///     x   c  ==>   a   y
    ///    / \              / \
    ///   a   b            b   c
    /// ```
    fn rotate_right(&mut self, y: NodeRef) -> NodeRef {
        let x = self.pool.get(y).left;
        if x.is_null() {
            return y;
        }
        let b = self.pool.get(x).right;
        self.pool.get_mut(x).right = y;
        self.pool.get_mut(y).left = b;
        self.update_height(y);
        self.update_height(x);
        self.rotations += 1;
        trace_log!(pivot = self.pool.get(y).key, "avl rotate right");
        x
    }

    /// Mirror of [`rotate_right`](Self::rotate_right).
    fn rotate_left(&mut self, x: NodeRef) -> NodeRef {
        let y = self.pool.get(x).right;
        if y.is_null() {
            return x;
        }
        let b = self.pool.get(y).left;
        self.pool.get_mut(y).left = x;
        self.pool.get_mut(x).right = b;
        self.update_height(x);
        self.update_height(y);
        self.rotations += 1;
        trace_log!(pivot = self.pool.get(x).key, "avl rotate left");
        y
    }

    fn rotate_left_right(&mut self, r: NodeRef) -> NodeRef {
        let left = self.pool.get(r).left;
        let new_left = self.rotate_left(left);
        self.pool.get_mut(r).left = new_left;
        self.rotate_right(r)
    }

    fn rotate_right_left(&mut self, r: NodeRef) -> NodeRef {
        let right = self.pool.get(r).right;
        let new_right = self.rotate_right(right);
        self.pool.get_mut(r).right = new_right;
        self.rotate_left(r)
    }

    // -------------------------------------------------------------------------
    // Rebalancing
    // -------------------------------------------------------------------------

    /// Fix up `r` after `key` was inserted somewhere below it. Returns the new
    /// root of the subtree.
    fn rebalance_after_insert(&mut self, r: NodeRef, key: Key) -> NodeRef {
        self.update_height(r);
        let bf = self.balance(r);
        if bf > 1 {
            let left_key = self.pool.get(self.pool.get(r).left).key;
            if key < left_key {
                return self.rotate_right(r);
            }
            if key > left_key {
                return self.rotate_left_right(r);
            }
        } else if bf < -1 {
            let right_key = self.pool.get(self.pool.get(r).right).key;
            if key > right_key {
                return self.rotate_left(r);
            }
            if key < right_key {
                return self.rotate_right_left(r);
            }
        }
        r
    }

    /// Fix up `r` after a node was removed somewhere below it. Returns the new
    /// root of the subtree.
    fn rebalance_after_delete(&mut self, r: NodeRef) -> NodeRef {
        self.update_height(r);
        let bf = self.balance(r);
        if bf > 1 {
            if self.balance(self.pool.get(r).left) >= 0 {
                return self.rotate_right(r);
            }
            return self.rotate_left_right(r);
        }
        if bf < -1 {
            if self.balance(self.pool.get(r).right) <= 0 {
                return self.rotate_left(r);
            }
            return self.rotate_right_left(r);
        }
        r
    }
}

impl Engine for AvlTree {
    fn name(&self) -> &'static str {
        "AVL"
    }

    fn insert(&mut self, key: Key) -> Result<bool> {
        Ok(AvlTree::insert(self, key))
    }

    fn search(&self, key: Key) -> bool {
        AvlTree::search(self, key)
    }

    fn delete(&mut self, key: Key) -> bool {
        AvlTree::delete(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            height: Some(self.height()),
            rotations: Some(self.rotations),
            ..Metrics::with_len(self.len)
        }
    }
}
