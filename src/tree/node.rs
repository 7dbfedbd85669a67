//! Arena-backed binary tree primitives
//!
//! Nodes live in a `Vec` of slots and are addressed by [`NodeId`].
//! Every node is reachable through exactly one link (a parent's child slot
//! or the root), so a subtree is owned by whichever link points at it.
//! There are no ordering semantics at this layer.

use std::fmt;

use super::TreeError;

/// Handle to a node stored in a [`BinaryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node's slot in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left child slot
    Left,

    /// Right child slot
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Callback receiving each payload when its node is permanently freed.
pub type Destructor<T> = Box<dyn FnMut(T)>;

#[derive(Debug)]
struct Slot<T> {
    data: T,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<T> Slot<T> {
    fn leaf(data: T) -> Self {
        Self {
            data,
            left: None,
            right: None,
        }
    }

    fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Plain binary tree with explicit left/right placement
///
/// Insertion only happens at empty child slots (or at the root of an empty
/// tree) and removal always takes a whole subtree with it. Freed slots are
/// recycled by later insertions.
pub struct BinaryTree<T> {
    slots: Vec<Option<Slot<T>>>,
    free: Vec<usize>,
    root: Option<NodeId>,
    size: usize,
    destroy: Option<Destructor<T>>,
}

impl<T> BinaryTree<T> {
    /// Create an empty tree; payloads are dropped when their nodes are freed.
    pub fn new() -> Self {
        Self::with_parts(None)
    }

    /// Create an empty tree that hands every freed payload to `destroy`.
    pub fn with_destroy(destroy: impl FnMut(T) + 'static) -> Self {
        Self::with_parts(Some(Box::new(destroy)))
    }

    fn with_parts(destroy: Option<Destructor<T>>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            size: 0,
            destroy,
        }
    }

    /// Number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` when the tree has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Root node, if any.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Left child of `node`.
    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).and_then(|slot| slot.left)
    }

    /// Right child of `node`.
    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).and_then(|slot| slot.right)
    }

    /// Payload stored at `node`.
    pub fn data(&self, node: NodeId) -> Option<&T> {
        self.slot(node).map(|slot| &slot.data)
    }

    /// Mutable payload stored at `node`.
    pub fn data_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.slot_mut(node).map(|slot| &mut slot.data)
    }

    /// Check whether `node` refers to a live node of this tree.
    pub fn contains(&self, node: NodeId) -> bool {
        self.slot(node).is_some()
    }

    /// A live node with no children.
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.slot(node)
            .map(|slot| slot.left.is_none() && slot.right.is_none())
            .unwrap_or(false)
    }

    /// Insert `data` as the left child of `anchor`, or as the root when
    /// `anchor` is `None`.
    pub fn insert_left(&mut self, anchor: Option<NodeId>, data: T) -> Result<NodeId, TreeError> {
        self.insert_child(anchor, Side::Left, data)
    }

    /// Insert `data` as the right child of `anchor`, or as the root when
    /// `anchor` is `None`.
    pub fn insert_right(&mut self, anchor: Option<NodeId>, data: T) -> Result<NodeId, TreeError> {
        self.insert_child(anchor, Side::Right, data)
    }

    fn insert_child(
        &mut self,
        anchor: Option<NodeId>,
        side: Side,
        data: T,
    ) -> Result<NodeId, TreeError> {
        match anchor {
            None if self.root.is_some() => return Err(TreeError::RootOccupied),
            None => {}
            Some(parent) => {
                let slot = self.slot(parent).ok_or(TreeError::UnknownNode(parent))?;
                if slot.child(side).is_some() {
                    return Err(TreeError::SlotOccupied { node: parent, side });
                }
            }
        }

        let id = self.allocate(data)?;
        match anchor {
            None => self.root = Some(id),
            Some(parent) => self.link(parent, side, Some(id)),
        }
        self.size += 1;
        Ok(id)
    }

    /// Free the subtree hanging from the left of `anchor` (the whole tree
    /// when `anchor` is `None`). No-op when the slot is already empty.
    pub fn remove_left(&mut self, anchor: Option<NodeId>) {
        self.remove_child(anchor, Side::Left);
    }

    /// Free the subtree hanging from the right of `anchor` (the whole tree
    /// when `anchor` is `None`). No-op when the slot is already empty.
    pub fn remove_right(&mut self, anchor: Option<NodeId>) {
        self.remove_child(anchor, Side::Right);
    }

    fn remove_child(&mut self, anchor: Option<NodeId>, side: Side) {
        let target = match anchor {
            None => self.root.take(),
            Some(parent) => match self.slot_mut(parent) {
                Some(slot) => slot.child_mut(side).take(),
                None => return,
            },
        };

        if let Some(top) = target {
            for id in self.postorder(top) {
                if let Some(slot) = self.vacate(id) {
                    self.release(slot.data);
                }
            }
        }
    }

    /// Join two trees under a new root holding `data`.
    ///
    /// The prior roots of `left` and `right` become the left and right
    /// children of the new root, and both inputs are left empty. The merged
    /// tree takes over the destructor of `left`.
    pub fn merge(
        left: &mut BinaryTree<T>,
        right: &mut BinaryTree<T>,
        data: T,
    ) -> Result<BinaryTree<T>, TreeError> {
        let mut slots = Vec::new();
        slots
            .try_reserve(1 + left.size + right.size)
            .map_err(|_| TreeError::AllocationFailed)?;

        let mut merged = Self::with_parts(left.destroy.take());
        merged.slots = slots;
        let root = merged.allocate(data)?;
        merged.root = Some(root);
        merged.size = 1;

        let left_top = left.root;
        let right_top = right.root;
        let left_child = left_top.and_then(|top| merged.adopt(left, top));
        let right_child = right_top.and_then(|top| merged.adopt(right, top));
        merged.link(root, Side::Left, left_child);
        merged.link(root, Side::Right, right_child);

        left.reset();
        right.reset();
        Ok(merged)
    }

    /// Take every payload out of the tree without running the destructor.
    ///
    /// Payloads come out children first. The tree is empty afterwards.
    pub fn drain(&mut self) -> Vec<T> {
        let Some(top) = self.root.take() else {
            return Vec::new();
        };
        let order = self.postorder(top);
        let mut payloads = Vec::with_capacity(order.len());
        for id in order {
            if let Some(slot) = self.vacate(id) {
                payloads.push(slot.data);
            }
        }
        payloads
    }

    /// Node ids of the subtree rooted at `top`, parents before children and
    /// left before right.
    pub fn preorder(&self, top: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![top];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slot(id) else {
                continue;
            };
            order.push(id);
            stack.extend(slot.right);
            stack.extend(slot.left);
        }
        order
    }

    /// Node ids of the subtree rooted at `top`, children before parents.
    pub fn postorder(&self, top: NodeId) -> Vec<NodeId> {
        // Root-right-left preorder, reversed, is left-right-root.
        let mut order = Vec::new();
        let mut stack = vec![top];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slot(id) else {
                continue;
            };
            order.push(id);
            stack.extend(slot.left);
            stack.extend(slot.right);
        }
        order.reverse();
        order
    }

    pub(crate) fn set_root(&mut self, node: Option<NodeId>) {
        self.root = node;
    }

    pub(crate) fn set_left(&mut self, node: NodeId, child: Option<NodeId>) {
        self.link(node, Side::Left, child);
    }

    pub(crate) fn set_right(&mut self, node: NodeId, child: Option<NodeId>) {
        self.link(node, Side::Right, child);
    }

    fn link(&mut self, node: NodeId, side: Side, child: Option<NodeId>) {
        if let Some(slot) = self.slot_mut(node) {
            *slot.child_mut(side) = child;
        }
    }

    fn slot(&self, node: NodeId) -> Option<&Slot<T>> {
        self.slots.get(node.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, node: NodeId) -> Option<&mut Slot<T>> {
        self.slots.get_mut(node.0).and_then(Option::as_mut)
    }

    fn allocate(&mut self, data: T) -> Result<NodeId, TreeError> {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(Slot::leaf(data));
            return Ok(NodeId(index));
        }
        self.slots
            .try_reserve(1)
            .map_err(|_| TreeError::AllocationFailed)?;
        self.slots.push(Some(Slot::leaf(data)));
        Ok(NodeId(self.slots.len() - 1))
    }

    fn vacate(&mut self, node: NodeId) -> Option<Slot<T>> {
        let slot = self.slots.get_mut(node.0)?.take()?;
        self.free.push(node.0);
        self.size -= 1;
        Some(slot)
    }

    fn release(&mut self, data: T) {
        if let Some(destroy) = self.destroy.as_mut() {
            destroy(data);
        }
    }

    /// Move the subtree rooted at `top` out of `source` into this arena.
    fn adopt(&mut self, source: &mut BinaryTree<T>, top: NodeId) -> Option<NodeId> {
        let order = source.preorder(top);
        let mut remap: Vec<Option<NodeId>> = vec![None; source.slots.len()];
        let mut moved = Vec::with_capacity(order.len());

        for old in order {
            if let Some(slot) = source.slots[old.0].take() {
                let new = NodeId(self.slots.len());
                self.slots.push(Some(Slot::leaf(slot.data)));
                remap[old.0] = Some(new);
                moved.push((new, slot.left, slot.right));
            }
        }

        let lookup = |old: Option<NodeId>| old.and_then(|id| remap[id.0]);
        for &(new, left, right) in &moved {
            self.link(new, Side::Left, lookup(left));
            self.link(new, Side::Right, lookup(right));
        }
        self.size += moved.len();

        lookup(Some(top))
    }

    fn reset(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.size = 0;
    }
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for BinaryTree<T> {
    fn drop(&mut self) {
        if self.destroy.is_some() {
            self.remove_left(None);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BinaryTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryTree")
            .field("size", &self.size)
            .field("root", &self.root)
            .field("destroy", &self.destroy.is_some())
            .finish()
    }
}
