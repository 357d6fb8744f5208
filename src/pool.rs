//! Index-addressed node storage shared by the two tree engines.
//!
//! Nodes live in a `Vec` owned by the tree and link to each other through
//! [`NodeRef`] indices, so every node has exactly one owner (the tree) and
//! exactly one parent slot pointing at it. Removed nodes go on a free list and
//! are handed out again by the next insert.
//!
//! All walks here are iterative: a degenerate BST of 100k keys is a 100k-deep
//! chain and must not be handled with recursion.

use std::fmt::Write as _;

use crate::Key;

// =============================================================================
// Node references
// =============================================================================

/// 32-bit index into a [`NodePool`]. `NodeRef::NULL` is the absent child.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct NodeRef(u32);

impl NodeRef {
    pub const NULL: NodeRef = NodeRef(u32::MAX);

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    #[inline]
    fn index(self) -> usize {
        debug_assert!(!self.is_null());
        self.0 as usize
    }
}

impl Default for NodeRef {
    fn default() -> Self {
        NodeRef::NULL
    }
}

/// Side of a parent a descent went to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
}

/// One step of a recorded descent: the node visited and the side taken.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PathStep {
    pub node: NodeRef,
    pub side: Side,
}

/// Descent paths stay inline for any AVL tree that fits a `u32` index (height
/// at most ~46); the degenerate BST spills to the heap.
pub(crate) type Path = smallvec::SmallVec<[PathStep; 64]>;

// =============================================================================
// Node trait
// =============================================================================

/// Minimal shape of a binary tree node stored in a pool.
pub trait TreeNode {
    fn key(&self) -> Key;
    fn left(&self) -> NodeRef;
    fn right(&self) -> NodeRef;
    fn left_mut(&mut self) -> &mut NodeRef;
    fn right_mut(&mut self) -> &mut NodeRef;

    #[inline]
    fn child(&self, side: Side) -> NodeRef {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    #[inline]
    fn child_mut(&mut self, side: Side) -> &mut NodeRef {
        match side {
            Side::Left => self.left_mut(),
            Side::Right => self.right_mut(),
        }
    }
}

// =============================================================================
// Pool
// =============================================================================

/// Owned node storage with slot reuse.
#[derive(Debug, Clone)]
pub struct NodePool<N> {
    nodes: Vec<N>,
    free: Vec<NodeRef>,
    /// Per-slot "on the free list" flag, for catching double releases.
    #[cfg(debug_assertions)]
    released: Vec<bool>,
}

impl<N: TreeNode> NodePool<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            #[cfg(debug_assertions)]
            released: Vec::new(),
        }
    }

    /// Store `node`, reusing a freed slot when one is available.
    pub fn alloc(&mut self, node: N) -> NodeRef {
        if let Some(r) = self.free.pop() {
            self.nodes[r.index()] = node;
            #[cfg(debug_assertions)]
            {
                self.released[r.index()] = false;
            }
            return r;
        }
        let idx = self.nodes.len();
        assert!(idx < u32::MAX as usize, "NodePool: too many nodes");
        self.nodes.push(node);
        #[cfg(debug_assertions)]
        self.released.push(false);
        NodeRef(idx as u32)
    }

    /// Return a slot to the free list. The node's contents are left stale.
    pub fn release(&mut self, r: NodeRef) {
        #[cfg(debug_assertions)]
        {
            let released = &mut self.released[r.index()];
            assert!(!*released, "double release of {r:?}");
            *released = true;
        }
        self.free.push(r);
    }

    #[inline]
    pub fn get(&self, r: NodeRef) -> &N {
        &self.nodes[r.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, r: NodeRef) -> &mut N {
        &mut self.nodes[r.index()]
    }

    /// Number of live nodes.
    pub fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Walk from `root` to the node holding `key`.
    pub fn find(&self, root: NodeRef, key: Key) -> Option<NodeRef> {
        let mut cur = root;
        while !cur.is_null() {
            let n = self.get(cur);
            cur = match key.cmp(&n.key()) {
                std::cmp::Ordering::Equal => return Some(cur),
                std::cmp::Ordering::Less => n.left(),
                std::cmp::Ordering::Greater => n.right(),
            };
        }
        None
    }

    /// Descend from `root` towards `key`, recording each step in `path`.
    ///
    /// Returns the node holding `key`, or `NULL` when the descent fell off the
    /// tree (in which case the last step of `path` names the empty slot).
    pub(crate) fn descend(&self, root: NodeRef, key: Key, path: &mut Path) -> NodeRef {
        let mut cur = root;
        while !cur.is_null() {
            let n = self.get(cur);
            let side = match key.cmp(&n.key()) {
                std::cmp::Ordering::Equal => return cur,
                std::cmp::Ordering::Less => Side::Left,
                std::cmp::Ordering::Greater => Side::Right,
            };
            path.push(PathStep { node: cur, side });
            cur = n.child(side);
        }
        NodeRef::NULL
    }

    /// Extend `path` from the right child of `node` down to the minimum of
    /// that subtree and return the minimum. `node` must have a right child.
    pub(crate) fn successor(&self, node: NodeRef, path: &mut Path) -> NodeRef {
        path.push(PathStep {
            node,
            side: Side::Right,
        });
        let mut cur = self.get(node).right();
        debug_assert!(!cur.is_null());
        loop {
            let left = self.get(cur).left();
            if left.is_null() {
                return cur;
            }
            path.push(PathStep {
                node: cur,
                side: Side::Left,
            });
            cur = left;
        }
    }

    /// In-order key iterator over the subtree at `root`.
    pub fn iter(&self, root: NodeRef) -> InOrder<'_, N> {
        let mut it = InOrder {
            pool: self,
            stack: Vec::new(),
        };
        it.push_left_spine(root);
        it
    }

    /// Every left subtree key is strictly smaller and every right subtree key
    /// strictly larger than its ancestor's key.
    pub fn is_search_tree(&self, root: NodeRef) -> bool {
        let mut prev: Option<Key> = None;
        for key in self.iter(root) {
            if prev.is_some_and(|p| p >= key) {
                return false;
            }
            prev = Some(key);
        }
        true
    }

    /// Height by level-order walk: number of nodes on the longest root-to-leaf
    /// path, 0 for an empty tree.
    pub fn measure_height(&self, root: NodeRef) -> u32 {
        let mut height = 0u32;
        let mut level = Vec::new();
        let mut next = Vec::new();
        if !root.is_null() {
            level.push(root);
        }
        while !level.is_empty() {
            height += 1;
            for &r in &level {
                let n = self.get(r);
                if !n.left().is_null() {
                    next.push(n.left());
                }
                if !n.right().is_null() {
                    next.push(n.right());
                }
            }
            level.clear();
            std::mem::swap(&mut level, &mut next);
        }
        height
    }

    /// Sideways rendering: right subtree above, left below, four spaces of
    /// indent per level.
    ///
    /// ```text
    ///     70
    /// 50
    ///     30
    /// ```
    pub fn render(&self, root: NodeRef) -> String {
        let mut out = String::new();
        // Reverse in-order (right, node, left) with explicit depth tracking.
        let mut stack: Vec<(NodeRef, usize)> = Vec::new();
        let mut cur = root;
        let mut depth = 0usize;
        loop {
            while !cur.is_null() {
                stack.push((cur, depth));
                cur = self.get(cur).right();
                depth += 1;
            }
            let Some((r, d)) = stack.pop() else {
                break;
            };
            let n = self.get(r);
            let _ = writeln!(out, "{:indent$}{}", "", n.key(), indent = d * 4);
            cur = n.left();
            depth = d + 1;
        }
        out
    }
}

impl<N: TreeNode> Default for NodePool<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-order traversal driven by an explicit stack.
pub struct InOrder<'a, N> {
    pool: &'a NodePool<N>,
    stack: Vec<NodeRef>,
}

impl<N: TreeNode> InOrder<'_, N> {
    fn push_left_spine(&mut self, mut r: NodeRef) {
        while !r.is_null() {
            self.stack.push(r);
            r = self.pool.get(r).left();
        }
    }
}

impl<N: TreeNode> Iterator for InOrder<'_, N> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        let r = self.stack.pop()?;
        let n = self.pool.get(r);
        let key = n.key();
        self.push_left_spine(n.right());
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain {
        key: Key,
        left: NodeRef,
        right: NodeRef,
    }

    impl TreeNode for Plain {
        fn key(&self) -> Key {
            self.key
        }
        fn left(&self) -> NodeRef {
            self.left
        }
        fn right(&self) -> NodeRef {
            self.right
        }
        fn left_mut(&mut self) -> &mut NodeRef {
            &mut self.left
        }
        fn right_mut(&mut self) -> &mut NodeRef {
            &mut self.right
        }
    }

    fn leaf(key: Key) -> Plain {
        Plain {
            key,
            left: NodeRef::NULL,
            right: NodeRef::NULL,
        }
    }

    /// 50 with children 30 and 70.
    fn small() -> (NodePool<Plain>, NodeRef) {
        let mut pool = NodePool::new();
        let l = pool.alloc(leaf(30));
        let r = pool.alloc(leaf(70));
        let root = pool.alloc(Plain {
            key: 50,
            left: l,
            right: r,
        });
        (pool, root)
    }

    #[test]
    fn test_release_reuses_slot() {
        let mut pool: NodePool<Plain> = NodePool::new();
        let a = pool.alloc(leaf(1));
        let _b = pool.alloc(leaf(2));
        pool.release(a);
        assert_eq!(pool.live(), 1);
        let c = pool.alloc(leaf(3));
        assert_eq!(c, a);
        assert_eq!(pool.get(c).key, 3);
        assert_eq!(pool.live(), 2);
    }

    #[test]
    fn test_iter_and_checks() {
        let (pool, root) = small();
        assert_eq!(pool.iter(root).collect::<Vec<_>>(), vec![30, 50, 70]);
        assert!(pool.is_search_tree(root));
        assert_eq!(pool.measure_height(root), 2);
        assert_eq!(pool.measure_height(NodeRef::NULL), 0);
        assert_eq!(pool.find(root, 70), Some(NodeRef(1)));
        assert_eq!(pool.find(root, 71), None);
    }

    #[test]
    fn test_not_search_tree() {
        let (mut pool, root) = small();
        pool.get_mut(root).key = 80;
        assert!(!pool.is_search_tree(root));
    }

    #[test]
    fn test_render() {
        let (pool, root) = small();
        assert_eq!(pool.render(root), "    70\n50\n    30\n");
        assert_eq!(pool.render(NodeRef::NULL), "");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "double release")]
    fn test_double_release_panics() {
        let mut pool: NodePool<Plain> = NodePool::new();
        let a = pool.alloc(leaf(1));
        pool.release(a);
        pool.release(a);
    }

    #[test]
    fn test_release_after_reuse() {
        let mut pool: NodePool<Plain> = NodePool::new();
        let a = pool.alloc(leaf(1));
        pool.release(a);
        let b = pool.alloc(leaf(2));
        assert_eq!(a, b);
        // The slot is live again, so releasing it once more is legal.
        pool.release(b);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn test_deep_path_spills_to_heap() {
        // Right-leaning chain 0 -> 1 -> ... -> 99, deeper than the inline
        // path capacity.
        let mut pool: NodePool<Plain> = NodePool::new();
        let mut below = NodeRef::NULL;
        for k in (0..100).rev() {
            below = pool.alloc(Plain {
                key: k,
                left: NodeRef::NULL,
                right: below,
            });
        }
        let root = below;
        let mut path = Path::new();
        assert!(pool.descend(root, 100, &mut path).is_null());
        assert_eq!(path.len(), 100);
        assert!(path.spilled());
        assert!(path.iter().all(|s| s.side == Side::Right));
        assert_eq!(pool.measure_height(root), 100);
    }

    #[test]
    fn test_descend_records_path() {
        let (pool, root) = small();
        let mut path = Path::new();
        assert!(pool.descend(root, 60, &mut path).is_null());
        let sides: Vec<_> = path.iter().map(|s| s.side).collect();
        assert_eq!(sides, vec![Side::Right, Side::Left]);

        path.clear();
        assert_eq!(pool.descend(root, 50, &mut path), root);
        assert!(path.is_empty());
    }
}
