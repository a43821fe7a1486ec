use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, warn};

use crate::domain::error::{InvalidOperation, Outcome, TreeError, TreeResult};

/// Handle to a node inside a [`CursorTree`].
///
/// Handles are generational: once the node is released, the handle goes stale
/// and every lookup with it returns `None`, even if the slot gets reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// One of the two child positions of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Left,
    Right,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Left => write!(f, "left"),
            Slot::Right => write!(f, "right"),
        }
    }
}

/// Tree node in the arena-based binary tree.
#[derive(Debug)]
pub struct TreeNode<T> {
    label: T,
    /// Back-reference only; the parent's slot is what owns this node
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<T> TreeNode<T> {
    fn new(label: T, parent: Option<NodeId>) -> Self {
        Self {
            label,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn label(&self) -> &T {
        &self.label
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn child(&self, slot: Slot) -> Option<NodeId> {
        match slot {
            Slot::Left => self.left,
            Slot::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<NodeId> {
        match slot {
            Slot::Left => &mut self.left,
            Slot::Right => &mut self.right,
        }
    }
}

/// Binary tree with a movable cursor.
///
/// All nodes live in a generational arena owned by the tree. Child slots hold
/// the owning links, parent links are plain back-references. The cursor
/// (`current`) is the focus of every edit: children are only ever attached to
/// or removed from the node under the cursor.
///
/// The cursor always points at a live node. Deletions only remove a child
/// subtree of `current`, so the cursor can never end up inside the removed
/// part and stays where it is.
#[derive(Debug)]
pub struct CursorTree<T = String> {
    arena: Arena<TreeNode<T>>,
    root: NodeId,
    current: NodeId,
    /// Upper bound on live nodes, None for unbounded
    max_nodes: Option<usize>,
}

impl<T> CursorTree<T> {
    /// Create a tree holding a single root node; the cursor starts on it.
    pub fn create(label: T) -> TreeResult<Self> {
        Self::with_max_nodes(label, None)
    }

    /// Like [`CursorTree::create`], but refuses to grow beyond `max_nodes`.
    #[instrument(level = "debug", skip(label))]
    pub fn with_max_nodes(label: T, max_nodes: Option<usize>) -> TreeResult<Self> {
        if max_nodes == Some(0) {
            return Err(TreeError::Allocation { limit: 0 });
        }
        let mut arena = Arena::with_capacity(max_nodes.unwrap_or(1).min(64));
        let root = NodeId(arena.insert(TreeNode::new(label, None)));
        debug!("created tree with root {:?}", root);
        Ok(Self {
            arena,
            root,
            current: root,
            max_nodes,
        })
    }

    /// Release every node, children before parents, and consume the tree.
    ///
    /// Returns the number of released nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(mut self) -> usize {
        self.release_all()
    }

    fn release_all(&mut self) -> usize {
        if !self.arena.contains(self.root.0) {
            return 0;
        }
        let released = self.release_subtree(self.root);
        debug!("released {} nodes", released);
        released
    }

    // Post-order removal; the caller is responsible for the slot pointing here.
    fn release_subtree(&mut self, top: NodeId) -> usize {
        let doomed: Vec<NodeId> = self.iter_post_order_from(top).map(|(id, _)| id).collect();
        for id in &doomed {
            self.arena.remove(id.0);
        }
        doomed.len()
    }

    pub fn insert_left(&mut self, label: T) -> TreeResult<Outcome<NodeId>> {
        self.insert(Slot::Left, label)
    }

    pub fn insert_right(&mut self, label: T) -> TreeResult<Outcome<NodeId>> {
        self.insert(Slot::Right, label)
    }

    /// Attach a new node in the given slot of the current node.
    ///
    /// An occupied slot is reported as [`InvalidOperation::SlotOccupied`];
    /// hitting the node limit fails with [`TreeError::Allocation`]. Either way
    /// the tree is unchanged.
    #[instrument(level = "debug", skip(self, label))]
    pub fn insert(&mut self, slot: Slot, label: T) -> TreeResult<Outcome<NodeId>> {
        let current = self.current;
        if self.current_node().child(slot).is_some() {
            return Ok(self.reject(InvalidOperation::SlotOccupied(slot)));
        }
        if let Some(limit) = self.max_nodes {
            if self.arena.len() >= limit {
                warn!("node limit {} reached, insert refused", limit);
                return Err(TreeError::Allocation { limit });
            }
        }

        let id = NodeId(self.arena.insert(TreeNode::new(label, Some(current))));
        if let Some(node) = self.arena.get_mut(current.0) {
            *node.slot_mut(slot) = Some(id);
        }
        debug!("inserted {:?} as {} child of {:?}", id, slot, current);
        Ok(Outcome::Done(id))
    }

    pub fn delete_left_subtree(&mut self) -> Outcome<usize> {
        self.delete_subtree(Slot::Left)
    }

    pub fn delete_right_subtree(&mut self) -> Outcome<usize> {
        self.delete_subtree(Slot::Right)
    }

    /// Release the whole subtree hanging in the given slot of the current
    /// node and clear the slot. Returns the number of released nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_subtree(&mut self, slot: Slot) -> Outcome<usize> {
        let Some(top) = self.current_node().child(slot) else {
            return self.reject(InvalidOperation::SlotEmpty(slot));
        };
        let released = self.release_subtree(top);
        let current = self.current;
        if let Some(node) = self.arena.get_mut(current.0) {
            *node.slot_mut(slot) = None;
        }
        debug!("deleted {} subtree of {:?}: {} nodes", slot, current, released);
        Outcome::Done(released)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn move_to_parent(&mut self) -> Outcome<NodeId> {
        match self.current_node().parent {
            Some(parent) => self.focus(parent),
            None => self.reject(InvalidOperation::AtRoot),
        }
    }

    pub fn move_to_left_child(&mut self) -> Outcome<NodeId> {
        self.move_to_child(Slot::Left)
    }

    pub fn move_to_right_child(&mut self) -> Outcome<NodeId> {
        self.move_to_child(Slot::Right)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn move_to_child(&mut self, slot: Slot) -> Outcome<NodeId> {
        match self.current_node().child(slot) {
            Some(child) => self.focus(child),
            None => self.reject(InvalidOperation::NoChild(slot)),
        }
    }

    /// Put the cursor back on the root. Always succeeds.
    pub fn move_to_root(&mut self) -> NodeId {
        self.current = self.root;
        self.root
    }

    fn focus(&mut self, id: NodeId) -> Outcome<NodeId> {
        self.current = id;
        debug!("cursor moved to {:?}", id);
        Outcome::Done(id)
    }

    fn reject<V>(&self, op: InvalidOperation) -> Outcome<V> {
        warn!("{}", op);
        Outcome::Rejected(op)
    }

    /// Replace the label of the current node, returning the old one.
    pub fn set_current_label(&mut self, label: T) -> T {
        std::mem::replace(&mut self.current_node_mut().label, label)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    // The cursor is always live, so indexing cannot miss.
    fn current_node(&self) -> &TreeNode<T> {
        &self.arena[self.current.0]
    }

    fn current_node_mut(&mut self) -> &mut TreeNode<T> {
        &mut self.arena[self.current.0]
    }

    pub fn current_label(&self) -> &T {
        &self.current_node().label
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.arena.get(id.0)
    }

    pub fn label(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(TreeNode::label)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(TreeNode::parent)
    }

    pub fn child(&self, id: NodeId, slot: Slot) -> Option<NodeId> {
        self.node(id).and_then(|node| node.child(slot))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Distance from the root, None for a stale handle.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut node = self.node(id)?;
        let mut depth = 0;
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            depth += 1;
        }
        Some(depth)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn max_nodes(&self) -> Option<usize> {
        self.max_nodes
    }

    /// Lazy left, self, right walk from the root, yielding each node with
    /// its depth. Every call starts a fresh walk.
    pub fn iter_in_order(&self) -> InOrderIterator<'_, T> {
        InOrderIterator::new(self, self.root)
    }

    /// Children before parents, left before right.
    pub fn iter_post_order(&self) -> PostOrderIterator<'_, T> {
        self.iter_post_order_from(self.root)
    }

    fn iter_post_order_from(&self, top: NodeId) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self, top)
    }

    /// Check the structural invariants: parent links mirror child slots,
    /// every live node is reachable from the root exactly once and the
    /// cursor is live.
    pub fn is_consistent(&self) -> bool {
        if !self.contains(self.current) || self.parent(self.root).is_some() {
            return false;
        }
        let mut reachable = 0;
        for (id, node) in self.iter_post_order() {
            reachable += 1;
            for slot in [Slot::Left, Slot::Right] {
                if let Some(child) = node.child(slot) {
                    if self.parent(child) != Some(id) {
                        return false;
                    }
                }
            }
        }
        reachable == self.arena.len()
    }
}

impl<T> Drop for CursorTree<T> {
    fn drop(&mut self) {
        self.release_all();
    }
}

pub struct InOrderIterator<'a, T> {
    tree: &'a CursorTree<T>,
    stack: Vec<(NodeId, usize)>,
    /// Next subtree whose left spine still has to be pushed
    pending: Option<(NodeId, usize)>,
}

impl<'a, T> InOrderIterator<'a, T> {
    fn new(tree: &'a CursorTree<T>, top: NodeId) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            pending: Some((top, 0)),
        }
    }
}

impl<'a, T> Iterator for InOrderIterator<'a, T> {
    type Item = (NodeId, usize, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, depth)) = self.pending.take() {
            if let Some(node) = self.tree.node(id) {
                self.stack.push((id, depth));
                self.pending = node.left.map(|left| (left, depth + 1));
            }
        }
        let (id, depth) = self.stack.pop()?;
        let node = self.tree.node(id)?;
        self.pending = node.right.map(|right| (right, depth + 1));
        Some((id, depth, node))
    }
}

pub struct PostOrderIterator<'a, T> {
    tree: &'a CursorTree<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(tree: &'a CursorTree<T>, top: NodeId) -> Self {
        Self {
            tree,
            stack: vec![(top, false)],
        }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.node(id) {
                if visited {
                    return Some((id, node));
                }
                self.stack.push((id, true));
                // Right first so the left subtree is popped first
                for child in [node.right, node.left].into_iter().flatten() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //        A
    //       / \
    //      B   C
    //     /
    //    D
    fn sample() -> CursorTree {
        let mut tree = CursorTree::create("A".to_string()).unwrap();
        assert!(tree.insert_left("B".into()).unwrap().is_done());
        assert!(tree.insert_right("C".into()).unwrap().is_done());
        assert!(tree.move_to_left_child().is_done());
        assert!(tree.insert_left("D".into()).unwrap().is_done());
        tree
    }

    fn labels_in_order(tree: &CursorTree) -> Vec<(String, usize)> {
        tree.iter_in_order()
            .map(|(_, depth, node)| (node.label().clone(), depth))
            .collect()
    }

    #[test]
    fn test_in_order_walk_yields_depths() {
        let tree = sample();
        assert_eq!(
            labels_in_order(&tree),
            vec![
                ("D".to_string(), 2),
                ("B".to_string(), 1),
                ("A".to_string(), 0),
                ("C".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_in_order_walk_is_restartable() {
        let tree = sample();
        let first: Vec<_> = tree.iter_in_order().map(|(id, _, _)| id).collect();
        let second: Vec<_> = tree.iter_in_order().map(|(id, _, _)| id).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_post_order_visits_children_first() {
        let tree = sample();
        let order: Vec<&str> = tree
            .iter_post_order()
            .map(|(_, node)| node.label().as_str())
            .collect();
        assert_eq!(order, vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn test_depth_follows_parent_links() {
        let tree = sample();
        let b = tree.child(tree.root(), Slot::Left).unwrap();
        let d = tree.child(b, Slot::Left).unwrap();
        assert_eq!(tree.depth(tree.root()), Some(0));
        assert_eq!(tree.depth(d), Some(2));
    }

    #[test]
    fn test_stale_handle_after_delete() {
        let mut tree = sample();
        let d = tree.child(tree.current(), Slot::Left).unwrap();
        assert_eq!(tree.delete_left_subtree(), Outcome::Done(1));
        assert!(!tree.contains(d));
        assert_eq!(tree.label(d), None);
        assert_eq!(tree.depth(d), None);
        assert!(tree.is_consistent());
    }

    #[test]
    fn test_zero_node_limit_cannot_hold_a_root() {
        let result = CursorTree::with_max_nodes("A".to_string(), Some(0));
        assert_eq!(result.unwrap_err(), TreeError::Allocation { limit: 0 });
    }
}
