//! An ordered map over `i32` keys implemented with an AVL tree.

use std::cmp::{self, Ordering};
use std::mem;

use log::warn;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::ToJson;
use crate::Key;

/// An ordered map implemented with an AVL tree.
///
/// Every node caches the height of its subtree. After each completed
/// operation the heights of the two subtrees of any node differ by at most one.
///
/// ```
/// use tree_and_map::AvlTree;
/// let mut tree = AvlTree::new();
/// tree.insert(0, "zero");
/// tree.insert(1, "one");
/// tree.insert(2, "two");
/// assert_eq!(tree.find(&1), Some(&"one"));
/// tree.remove(&1);
/// assert!(tree.find(&1).is_none());
/// ```
#[derive(Serialize)]
pub struct AvlTree<V> {
    root: Link<V>,
    #[serde(skip)]
    num_nodes: usize,
}

#[derive(Serialize)]
struct Node<V> {
    key: Key,
    value: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    left: Link<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Link<V>,
    height: u8,
}

type Link<V> = Option<Box<Node<V>>>;

/// An in-order iterator over the entries of a tree.
pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
    remaining: usize,
}

impl<V> AvlTree<V> {
    /// Creates an empty tree.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, 0 for an empty tree.
    pub fn height(&self) -> usize {
        usize::from(height(&self.root))
    }

    /// Clears the tree, deallocating all nodes.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn find(&self, key: &Key) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Some(&node.value),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn find_mut(&mut self, key: &Key) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }

    /// Returns true if the tree contains a value for the key.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair into the tree.
    /// If the key was already present its value is overwritten and the old value returned.
    pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
        let (root, replaced) = Node::insert(self.root.take(), key, value);
        self.root = Some(root);
        if replaced.is_none() {
            self.num_nodes += 1;
        }
        replaced
    }

    /// Removes a key from the tree.
    /// Returns the value at the key if the key was previously in the tree.
    pub fn remove(&mut self, key: &Key) -> Option<V> {
        if self.root.is_none() {
            return None;
        }
        let (root, removed) = Node::remove(self.root.take(), *key);
        self.root = root;
        if removed.is_some() {
            debug_assert!(self.num_nodes >= 1);
            self.num_nodes -= 1;
        }
        removed
    }

    /// Gets an in-order iterator over the entries of the tree, sorted by key.
    pub fn iter(&self) -> Iter<'_, V> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.num_nodes,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Asserts the cached heights, the AVL balance condition, the key order
    /// and the node count of the whole tree.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        fn check<V>(link: &Link<V>, lower: Option<Key>, upper: Option<Key>) -> (u8, usize) {
            let node = match link {
                None => return (0, 0),
                Some(node) => node,
            };

            // Check key order against the bounds inherited from ancestors
            if let Some(lower) = lower {
                assert!(node.key > lower);
            }
            if let Some(upper) = upper {
                assert!(node.key < upper);
            }

            let (left_height, left_nodes) = check(&node.left, lower, Some(node.key));
            let (right_height, right_nodes) = check(&node.right, Some(node.key), upper);

            // Check height
            assert_eq!(node.height, cmp::max(left_height, right_height) + 1);

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            (node.height, left_nodes + right_nodes + 1)
        }

        let (_, num_nodes) = check(&self.root, None, None);
        assert_eq!(num_nodes, self.num_nodes);
    }
}

impl<V: Serialize> AvlTree<V> {
    /// Serializes the whole tree structure to pretty-printed JSON.
    ///
    /// Absent children are omitted; an empty tree serializes as `{"root": null}`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| Error::Serialize {
            container: "AVL tree",
            source,
        })
    }
}

impl<V: Serialize> ToJson for AvlTree<V> {
    fn to_json(&self) -> Result<String> {
        AvlTree::to_json(self)
    }
}

impl<V> Default for AvlTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V> IntoIterator for &'a AvlTree<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> Iter<'a, V> {
    fn push_left_spine(&mut self, mut current: Option<&'a Node<V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

fn height<V>(link: &Link<V>) -> u8 {
    match link {
        None => 0,
        Some(node) => node.height,
    }
}

impl<V> Node<V> {
    fn create(key: Key, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    fn adjust_height(&mut self) {
        self.height = cmp::max(height(&self.left), height(&self.right)) + 1;
    }

    fn balance(&self) -> i16 {
        i16::from(height(&self.right)) - i16::from(height(&self.left))
    }

    fn rotate_left(mut node: Box<Self>) -> Box<Self> {
        let mut right = match node.right.take() {
            Some(right) => right,
            None => {
                warn!("rotate_left on node {} without right child", node.key);
                return node;
            }
        };
        node.right = right.left.take();
        node.adjust_height();
        right.left = Some(node);
        right.adjust_height();
        right
    }

    fn rotate_right(mut node: Box<Self>) -> Box<Self> {
        let mut left = match node.left.take() {
            Some(left) => left,
            None => {
                warn!("rotate_right on node {} without left child", node.key);
                return node;
            }
        };
        node.left = left.right.take();
        node.adjust_height();
        left.right = Some(node);
        left.adjust_height();
        left
    }

    /// Restores the AVL condition at the given node if necessary and adjusts its height.
    /// Child subtrees must already be balanced and differ in height by at most two.
    /// Returns the root of the (possibly rotated) subtree.
    fn rebalance(mut node: Box<Self>) -> Box<Self> {
        node.adjust_height();
        let balance = node.balance();
        if balance > 1 {
            // Right heavy, right-left case needs the right child rotated first
            if let Some(right) = node.right.take() {
                node.right = Some(if right.balance() < 0 {
                    Self::rotate_right(right)
                } else {
                    right
                });
            }
            Self::rotate_left(node)
        } else if balance < -1 {
            // Left heavy, left-right case needs the left child rotated first
            if let Some(left) = node.left.take() {
                node.left = Some(if left.balance() > 0 {
                    Self::rotate_left(left)
                } else {
                    left
                });
            }
            Self::rotate_right(node)
        } else {
            node
        }
    }

    fn insert(link: Link<V>, key: Key, value: V) -> (Box<Self>, Option<V>) {
        let mut node = match link {
            None => return (Self::create(key, value), None),
            Some(node) => node,
        };
        let replaced = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, replaced) = Self::insert(node.left.take(), key, value);
                node.left = Some(left);
                replaced
            }
            Ordering::Greater => {
                let (right, replaced) = Self::insert(node.right.take(), key, value);
                node.right = Some(right);
                replaced
            }
            Ordering::Equal => {
                // Value update only, shape is unchanged
                let replaced = mem::replace(&mut node.value, value);
                return (node, Some(replaced));
            }
        };
        (Self::rebalance(node), replaced)
    }

    /// Detaches the leftmost node of the given subtree.
    /// Returns the rebalanced remainder and the detached node.
    fn remove_min(mut node: Box<Self>) -> (Link<V>, Box<Self>) {
        match node.left.take() {
            None => {
                let right = node.right.take();
                (right, node)
            }
            Some(left) => {
                let (left, min) = Self::remove_min(left);
                node.left = left;
                (Some(Self::rebalance(node)), min)
            }
        }
    }

    fn remove(link: Link<V>, key: Key) -> (Link<V>, Option<V>) {
        let mut node = match link {
            None => return (None, None),
            Some(node) => node,
        };
        let removed = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, removed) = Self::remove(node.left.take(), key);
                node.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = Self::remove(node.right.take(), key);
                node.right = right;
                removed
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => return (None, Some(node.value)),
                (Some(child), None) | (None, Some(child)) => return (Some(child), Some(node.value)),
                (Some(left), Some(right)) => {
                    // Replace by in-order successor, the smallest key of the right subtree
                    let (right, successor) = Self::remove_min(right);
                    let Node {
                        key: successor_key,
                        value: successor_value,
                        ..
                    } = *successor;
                    node.key = successor_key;
                    node.left = Some(left);
                    node.right = right;
                    Some(mem::replace(&mut node.value, successor_value))
                }
            },
        };
        (Some(Self::rebalance(node)), removed)
    }
}
