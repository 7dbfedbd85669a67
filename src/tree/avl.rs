//! AVL search tree with lazy deletion
//!
//! Each node carries a [`BalanceRecord`]: the payload, a hidden flag and a
//! balance factor (left height minus right height). Insertion rebalances
//! with the four classic rotations. Removal only hides a node, so the shape
//! of the tree depends on the insertion history alone.

use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use super::node::{BinaryTree, Destructor, NodeId};
use super::TreeError;

/// Height difference between the left and right subtrees of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub enum BalanceFactor {
    /// Left subtree is one level taller (+1)
    LeftHeavy,

    /// Both subtrees have the same height (0)
    Balanced,

    /// Right subtree is one level taller (-1)
    RightHeavy,
}

impl BalanceFactor {
    /// Signed value of the factor.
    #[inline]
    pub fn as_i8(self) -> i8 {
        match self {
            BalanceFactor::LeftHeavy => 1,
            BalanceFactor::Balanced => 0,
            BalanceFactor::RightHeavy => -1,
        }
    }
}

/// Per-node bookkeeping wrapped around a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRecord<T> {
    payload: T,
    hidden: bool,
    factor: BalanceFactor,
}

impl<T> BalanceRecord<T> {
    fn new(payload: T) -> Self {
        Self {
            payload,
            hidden: false,
            factor: BalanceFactor::Balanced,
        }
    }

    /// Stored payload (returned even when hidden).
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Whether the node has been logically removed.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Current balance factor.
    pub fn factor(&self) -> BalanceFactor {
        self.factor
    }
}

/// Outcome of [`SearchTree::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// A new node was created
    Inserted,

    /// A hidden node with an equal payload became visible again; its payload
    /// was replaced and the shape is unchanged
    Revealed,

    /// An equal payload is already visible; nothing changed
    DuplicateVisible,
}

impl Insertion {
    /// `true` for [`Insertion::Inserted`] and [`Insertion::Revealed`].
    pub fn is_success(self) -> bool {
        !matches!(self, Insertion::DuplicateVisible)
    }
}

/// Outcome of [`SearchTree::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The node is now hidden
    Hidden,

    /// No visible node matched
    NotFound,
}

/// Ordering function injected into a [`SearchTree`].
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// Result of inserting below one node: the (possibly rotated) subtree root
/// and whether that subtree got taller.
struct Step {
    subtree: NodeId,
    outcome: Insertion,
    grew: bool,
}

/// Height-balanced binary search tree with hide/reveal removal
///
/// Ordering comes from the comparator supplied at construction, not from
/// `Ord`, so the same payload type can be arranged in different orders.
pub struct SearchTree<T> {
    pub(super) nodes: BinaryTree<BalanceRecord<T>>,
    compare: Comparator<T>,
    destroy: Option<Destructor<T>>,
}

impl<T> SearchTree<T> {
    /// Create an empty tree ordered by `compare`.
    pub fn new(compare: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Self {
            nodes: BinaryTree::new(),
            compare: Box::new(compare),
            destroy: None,
        }
    }

    /// Create an empty tree ordered by `compare` that hands every payload it
    /// finally lets go of to `destroy`.
    pub fn with_destroy(
        compare: impl Fn(&T, &T) -> Ordering + 'static,
        destroy: impl FnMut(T) + 'static,
    ) -> Self {
        Self {
            nodes: BinaryTree::new(),
            compare: Box::new(compare),
            destroy: Some(Box::new(destroy)),
        }
    }

    /// Number of nodes, hidden ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when no node has ever been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes that are not hidden.
    pub fn visible_len(&self) -> usize {
        self.nodes
            .root()
            .map(|root| {
                self.nodes
                    .preorder(root)
                    .into_iter()
                    .filter(|&id| self.is_hidden(id) == Some(false))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Height of the tree (0 when empty).
    pub fn height(&self) -> usize {
        self.height_of(self.nodes.root())
    }

    fn height_of(&self, node: Option<NodeId>) -> usize {
        match node {
            None => 0,
            Some(id) => {
                1 + self
                    .height_of(self.nodes.left(id))
                    .max(self.height_of(self.nodes.right(id)))
            }
        }
    }

    /// Root node.
    pub fn root(&self) -> Option<NodeId> {
        self.nodes.root()
    }

    /// Left child of `node`.
    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.left(node)
    }

    /// Right child of `node`.
    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.right(node)
    }

    /// Payload at `node`, hidden or not.
    pub fn payload(&self, node: NodeId) -> Option<&T> {
        self.nodes.data(node).map(BalanceRecord::payload)
    }

    /// Balance factor at `node`.
    pub fn factor(&self, node: NodeId) -> Option<BalanceFactor> {
        self.nodes.data(node).map(BalanceRecord::factor)
    }

    /// Hidden flag at `node`.
    pub fn is_hidden(&self, node: NodeId) -> Option<bool> {
        self.nodes.data(node).map(BalanceRecord::is_hidden)
    }

    /// Full record at `node`.
    pub fn record(&self, node: NodeId) -> Option<&BalanceRecord<T>> {
        self.nodes.data(node)
    }

    pub(super) fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }

    /// Insert `payload`, rebalancing on the way back up.
    ///
    /// An equal hidden payload is replaced and revealed in place; an equal
    /// visible payload leaves the tree untouched.
    pub fn insert(&mut self, payload: T) -> Result<Insertion, TreeError> {
        let Some(root) = self.nodes.root() else {
            self.nodes.insert_left(None, BalanceRecord::new(payload))?;
            return Ok(Insertion::Inserted);
        };

        let step = self.insert_below(root, payload)?;
        self.nodes.set_root(Some(step.subtree));
        Ok(step.outcome)
    }

    fn insert_below(&mut self, node: NodeId, payload: T) -> Result<Step, TreeError> {
        let current = self.nodes.data(node).ok_or(TreeError::UnknownNode(node))?;

        match (self.compare)(&payload, &current.payload) {
            Ordering::Less => {
                let (outcome, grew) = match self.nodes.left(node) {
                    None => {
                        self.nodes
                            .insert_left(Some(node), BalanceRecord::new(payload))?;
                        (Insertion::Inserted, true)
                    }
                    Some(child) => {
                        let step = self.insert_below(child, payload)?;
                        self.nodes.set_left(node, Some(step.subtree));
                        (step.outcome, step.grew)
                    }
                };
                if !grew {
                    return Ok(Step { subtree: node, outcome, grew });
                }

                let (subtree, grew) = match self.factor_of(node) {
                    BalanceFactor::LeftHeavy => (self.rotate_left_heavy(node), false),
                    BalanceFactor::Balanced => {
                        self.set_factor(node, BalanceFactor::LeftHeavy);
                        (node, true)
                    }
                    BalanceFactor::RightHeavy => {
                        self.set_factor(node, BalanceFactor::Balanced);
                        (node, false)
                    }
                };
                Ok(Step { subtree, outcome, grew })
            }
            Ordering::Greater => {
                let (outcome, grew) = match self.nodes.right(node) {
                    None => {
                        self.nodes
                            .insert_right(Some(node), BalanceRecord::new(payload))?;
                        (Insertion::Inserted, true)
                    }
                    Some(child) => {
                        let step = self.insert_below(child, payload)?;
                        self.nodes.set_right(node, Some(step.subtree));
                        (step.outcome, step.grew)
                    }
                };
                if !grew {
                    return Ok(Step { subtree: node, outcome, grew });
                }

                let (subtree, grew) = match self.factor_of(node) {
                    BalanceFactor::LeftHeavy => {
                        self.set_factor(node, BalanceFactor::Balanced);
                        (node, false)
                    }
                    BalanceFactor::Balanced => {
                        self.set_factor(node, BalanceFactor::RightHeavy);
                        (node, true)
                    }
                    BalanceFactor::RightHeavy => (self.rotate_right_heavy(node), false),
                };
                Ok(Step { subtree, outcome, grew })
            }
            Ordering::Equal => {
                let outcome = self.reveal(node, payload)?;
                Ok(Step {
                    subtree: node,
                    outcome,
                    grew: false,
                })
            }
        }
    }

    fn reveal(&mut self, node: NodeId, payload: T) -> Result<Insertion, TreeError> {
        let record = self
            .nodes
            .data_mut(node)
            .ok_or(TreeError::UnknownNode(node))?;
        if !record.hidden {
            return Ok(Insertion::DuplicateVisible);
        }

        let previous = std::mem::replace(&mut record.payload, payload);
        record.hidden = false;
        if let Some(destroy) = self.destroy.as_mut() {
            destroy(previous);
        }
        Ok(Insertion::Revealed)
    }

    /// Rebalance a node whose left subtree became two levels taller
    /// (LL or LR). Returns the new subtree root.
    fn rotate_left_heavy(&mut self, node: NodeId) -> NodeId {
        let Some(left) = self.nodes.left(node) else {
            return node;
        };

        if self.factor_of(left) == BalanceFactor::LeftHeavy {
            trace!(%node, %left, "LL rotation");
            let inner = self.nodes.right(left);
            self.nodes.set_left(node, inner);
            self.nodes.set_right(left, Some(node));
            self.set_factor(node, BalanceFactor::Balanced);
            self.set_factor(left, BalanceFactor::Balanced);
            return left;
        }

        let Some(grandchild) = self.nodes.right(left) else {
            return node;
        };
        trace!(%node, %left, %grandchild, "LR rotation");
        let inner_left = self.nodes.left(grandchild);
        let inner_right = self.nodes.right(grandchild);
        self.nodes.set_right(left, inner_left);
        self.nodes.set_left(grandchild, Some(left));
        self.nodes.set_left(node, inner_right);
        self.nodes.set_right(grandchild, Some(node));

        let (node_factor, left_factor) = match self.factor_of(grandchild) {
            BalanceFactor::LeftHeavy => (BalanceFactor::RightHeavy, BalanceFactor::Balanced),
            BalanceFactor::Balanced => (BalanceFactor::Balanced, BalanceFactor::Balanced),
            BalanceFactor::RightHeavy => (BalanceFactor::Balanced, BalanceFactor::LeftHeavy),
        };
        self.set_factor(node, node_factor);
        self.set_factor(left, left_factor);
        self.set_factor(grandchild, BalanceFactor::Balanced);
        grandchild
    }

    /// Rebalance a node whose right subtree became two levels taller
    /// (RR or RL). Returns the new subtree root.
    fn rotate_right_heavy(&mut self, node: NodeId) -> NodeId {
        let Some(right) = self.nodes.right(node) else {
            return node;
        };

        if self.factor_of(right) == BalanceFactor::RightHeavy {
            trace!(%node, %right, "RR rotation");
            let inner = self.nodes.left(right);
            self.nodes.set_right(node, inner);
            self.nodes.set_left(right, Some(node));
            self.set_factor(node, BalanceFactor::Balanced);
            self.set_factor(right, BalanceFactor::Balanced);
            return right;
        }

        let Some(grandchild) = self.nodes.left(right) else {
            return node;
        };
        trace!(%node, %right, %grandchild, "RL rotation");
        let inner_left = self.nodes.left(grandchild);
        let inner_right = self.nodes.right(grandchild);
        self.nodes.set_left(right, inner_right);
        self.nodes.set_right(grandchild, Some(right));
        self.nodes.set_right(node, inner_left);
        self.nodes.set_left(grandchild, Some(node));

        let (node_factor, right_factor) = match self.factor_of(grandchild) {
            BalanceFactor::LeftHeavy => (BalanceFactor::Balanced, BalanceFactor::RightHeavy),
            BalanceFactor::Balanced => (BalanceFactor::Balanced, BalanceFactor::Balanced),
            BalanceFactor::RightHeavy => (BalanceFactor::LeftHeavy, BalanceFactor::Balanced),
        };
        self.set_factor(node, node_factor);
        self.set_factor(right, right_factor);
        self.set_factor(grandchild, BalanceFactor::Balanced);
        grandchild
    }

    fn factor_of(&self, node: NodeId) -> BalanceFactor {
        self.factor(node).unwrap_or(BalanceFactor::Balanced)
    }

    fn set_factor(&mut self, node: NodeId, factor: BalanceFactor) {
        if let Some(record) = self.nodes.data_mut(node) {
            record.factor = factor;
        }
    }

    /// Node whose payload compares equal to `payload`, hidden or not.
    pub(super) fn find(&self, payload: &T) -> Option<NodeId> {
        let mut cursor = self.nodes.root();
        while let Some(node) = cursor {
            let record = self.nodes.data(node)?;
            cursor = match (self.compare)(payload, &record.payload) {
                Ordering::Less => self.nodes.left(node),
                Ordering::Greater => self.nodes.right(node),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Hide the node matching `payload`.
    ///
    /// The node keeps its place, its payload and its balance factor. A node
    /// that is already hidden counts as absent.
    pub fn remove(&mut self, payload: &T) -> Removal {
        let Some(node) = self.find(payload) else {
            return Removal::NotFound;
        };
        match self.nodes.data_mut(node) {
            Some(record) if !record.hidden => {
                record.hidden = true;
                Removal::Hidden
            }
            _ => Removal::NotFound,
        }
    }

    /// Stored payload equal to `payload`, unless it is hidden.
    pub fn lookup(&self, payload: &T) -> Option<&T> {
        let node = self.find(payload)?;
        self.nodes
            .data(node)
            .filter(|record| !record.hidden)
            .map(BalanceRecord::payload)
    }

    /// Free every node, hidden ones included, running the destructor on
    /// each payload.
    pub fn destroy(self) {
        drop(self);
    }
}

impl<T: Ord + 'static> SearchTree<T> {
    /// Create an empty tree using the natural ordering of `T`.
    pub fn ordered() -> Self {
        Self::new(T::cmp)
    }
}

impl<T> Drop for SearchTree<T> {
    fn drop(&mut self) {
        if let Some(destroy) = self.destroy.as_mut() {
            for record in self.nodes.drain() {
                destroy(record.payload);
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SearchTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchTree")
            .field("len", &self.len())
            .field("height", &self.height())
            .field("root", &self.root().and_then(|root| self.payload(root)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn build(values: &[i32]) -> SearchTree<i32> {
        let mut tree = SearchTree::ordered();
        for &value in values {
            assert_eq!(tree.insert(value), Ok(Insertion::Inserted));
        }
        tree
    }

    fn value_at(tree: &SearchTree<i32>, node: Option<NodeId>) -> Option<i32> {
        node.and_then(|id| tree.payload(id).copied())
    }

    /// (payload, factor) in preorder.
    fn shape(tree: &SearchTree<i32>) -> Vec<(i32, i8)> {
        tree.root()
            .map(|root| tree.nodes.preorder(root))
            .unwrap_or_default()
            .into_iter()
            .map(|id| (*tree.payload(id).unwrap(), tree.factor(id).unwrap().as_i8()))
            .collect()
    }

    #[test]
    fn test_ll_rotation() {
        let tree = build(&[3, 2, 1]);
        assert_eq!(shape(&tree), vec![(2, 0), (1, 0), (3, 0)]);
    }

    #[test]
    fn test_rr_rotation() {
        let tree = build(&[1, 2, 3]);
        assert_eq!(shape(&tree), vec![(2, 0), (1, 0), (3, 0)]);
    }

    #[test]
    fn test_lr_rotation_balanced_grandchild() {
        let tree = build(&[3, 1, 2]);
        assert_eq!(shape(&tree), vec![(2, 0), (1, 0), (3, 0)]);
    }

    #[test]
    fn test_rl_rotation_balanced_grandchild() {
        let tree = build(&[1, 3, 2]);
        assert_eq!(shape(&tree), vec![(2, 0), (1, 0), (3, 0)]);
    }

    #[test]
    fn test_lr_rotation_left_heavy_grandchild() {
        // 4 becomes left-heavy before the rotation at 8.
        let tree = build(&[8, 4, 10, 2, 6, 5]);
        assert_eq!(
            shape(&tree),
            vec![(6, 0), (4, 0), (2, 0), (5, 0), (8, -1), (10, 0)]
        );
    }

    #[test]
    fn test_lr_rotation_right_heavy_grandchild() {
        let tree = build(&[8, 4, 10, 2, 6, 7]);
        assert_eq!(
            shape(&tree),
            vec![(6, 0), (4, 1), (2, 0), (8, 0), (7, 0), (10, 0)]
        );
    }

    #[test]
    fn test_rl_rotation_left_heavy_grandchild() {
        let tree = build(&[4, 2, 8, 6, 10, 5]);
        assert_eq!(
            shape(&tree),
            vec![(6, 0), (4, 0), (2, 0), (5, 0), (8, -1), (10, 0)]
        );
    }

    #[test]
    fn test_rl_rotation_right_heavy_grandchild() {
        let tree = build(&[4, 2, 8, 6, 10, 7]);
        assert_eq!(
            shape(&tree),
            vec![(6, 0), (4, 1), (2, 0), (8, 0), (7, 0), (10, 0)]
        );
    }

    #[test]
    fn test_rotation_stops_propagation() {
        let tree = build(&[5, 3, 8, 2, 4, 7, 9, 1, 0]);
        // Rotation at 2 absorbs the growth; 5 keeps its factor from before.
        let root = tree.root();
        assert_eq!(value_at(&tree, root), Some(5));
        assert_eq!(tree.factor(root.unwrap()), Some(BalanceFactor::LeftHeavy));
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn test_duplicate_visible_is_reported() {
        let mut tree = build(&[2, 1, 3]);
        let before = shape(&tree);
        assert_eq!(tree.insert(1), Ok(Insertion::DuplicateVisible));
        assert_eq!(shape(&tree), before);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_hide_and_reveal_keep_shape() {
        let mut tree = build(&[4, 2, 6, 1, 3]);
        let before = shape(&tree);

        assert_eq!(tree.remove(&2), Removal::Hidden);
        assert_eq!(tree.lookup(&2), None);
        assert_eq!(tree.remove(&2), Removal::NotFound);
        assert_eq!(shape(&tree), before);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.visible_len(), 4);

        assert_eq!(tree.insert(2), Ok(Insertion::Revealed));
        assert_eq!(tree.lookup(&2), Some(&2));
        assert_eq!(shape(&tree), before);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_remove_missing_payload() {
        let mut tree = build(&[1]);
        assert_eq!(tree.remove(&7), Removal::NotFound);
        let mut empty: SearchTree<i32> = SearchTree::ordered();
        assert_eq!(empty.remove(&7), Removal::NotFound);
        assert_eq!(empty.lookup(&7), None);
    }

    #[test]
    fn test_reveal_replaces_payload_through_destructor() {
        let freed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&freed);
        let mut tree = SearchTree::with_destroy(
            |a: &(u8, &'static str), b: &(u8, &'static str)| a.0.cmp(&b.0),
            move |(_, tag)| sink.borrow_mut().push(tag),
        );
        tree.insert((1, "first")).unwrap();
        tree.insert((2, "other")).unwrap();

        assert_eq!(tree.remove(&(1, "")), Removal::Hidden);
        assert!(freed.borrow().is_empty());

        assert_eq!(tree.insert((1, "second")), Ok(Insertion::Revealed));
        assert_eq!(*freed.borrow(), vec!["first"]);
        assert_eq!(tree.lookup(&(1, "")), Some(&(1, "second")));

        tree.destroy();
        let mut released = freed.borrow().clone();
        released.sort_unstable();
        assert_eq!(released, vec!["first", "other", "second"]);
    }

    #[test]
    fn test_custom_comparator_orders_tree() {
        let mut tree = SearchTree::new(|a: &i32, b: &i32| b.cmp(a));
        for value in [1, 2, 3] {
            tree.insert(value).unwrap();
        }
        let root = tree.root().unwrap();
        assert_eq!(value_at(&tree, Some(root)), Some(2));
        assert_eq!(value_at(&tree, tree.left(root)), Some(3));
        assert_eq!(value_at(&tree, tree.right(root)), Some(1));
    }
}
