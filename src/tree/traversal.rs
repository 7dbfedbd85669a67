//! Root-to-node descents
//!
//! A path is a sequence of left/right turns taken from the root. Tracing
//! records the turns the comparator makes while searching for a payload;
//! following replays a recorded path without consulting the comparator.

use std::cmp::Ordering;

use super::avl::SearchTree;
use super::node::NodeId;

/// One step of a descent from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Step into the left child
    Left,

    /// Step into the right child
    Right,
}

impl<T> SearchTree<T> {
    /// Turns taken from the root to reach the visible node equal to
    /// `payload`.
    ///
    /// Returns `None` when the search falls off a branch or stops at a
    /// hidden node.
    pub fn trace(&self, payload: &T) -> Option<Vec<Direction>> {
        let mut path = Vec::new();
        let mut cursor = self.root();

        while let Some(node) = cursor {
            let stored = self.payload(node)?;
            cursor = match self.compare(payload, stored) {
                Ordering::Less => {
                    path.push(Direction::Left);
                    self.left(node)
                }
                Ordering::Greater => {
                    path.push(Direction::Right);
                    self.right(node)
                }
                Ordering::Equal => {
                    return match self.is_hidden(node) {
                        Some(false) => Some(path),
                        _ => None,
                    };
                }
            };
        }

        None
    }

    /// Node reached by replaying `directions` from the root.
    ///
    /// Returns `None` when a step leaves the tree. The landing node may be
    /// hidden; callers decide what that means.
    pub fn follow<I>(&self, directions: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = Direction>,
    {
        let mut node = self.root()?;
        for direction in directions {
            node = match direction {
                Direction::Left => self.left(node)?,
                Direction::Right => self.right(node)?,
            };
        }
        Some(node)
    }

    /// Visible payloads in comparator order.
    pub fn iter(&self) -> InOrder<'_, T> {
        InOrder {
            tree: self,
            stack: Vec::new(),
            cursor: self.root(),
        }
    }
}

/// In-order iterator over the visible payloads of a [`SearchTree`].
#[derive(Debug)]
pub struct InOrder<'a, T> {
    tree: &'a SearchTree<T>,
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(node) = self.cursor {
                self.stack.push(node);
                self.cursor = self.tree.left(node);
            }

            let node = self.stack.pop()?;
            self.cursor = self.tree.right(node);

            let record = self.tree.record(node)?;
            if !record.is_hidden() {
                return Some(record.payload());
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a SearchTree<T> {
    type Item = &'a T;
    type IntoIter = InOrder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
