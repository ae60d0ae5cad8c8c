use crate::node::Node;
use std::sync::Arc;

/// Depth-first iterator over bindings borrowed from a trie.
#[derive(Debug)]
pub struct Iter<'a, K: 'a, V: 'a> {
    stack: Vec<(&'a Node<K, V>, usize)>,
    size: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(node: &'a Node<K, V>) -> Self {
        Self {
            stack: vec![(node, 0)],
            size: node.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            size: self.size,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, index)) = self.stack.pop() {
            match node {
                Node::Empty { .. } => {}
                Node::Leaf { key, value, .. } => {
                    self.size -= 1;
                    return Some((key, value));
                }
                Node::Collision { bucket, .. } => {
                    if let Some((key, value)) = bucket.entries().get(index) {
                        self.stack.push((node, index + 1));
                        self.size -= 1;
                        return Some((key, value));
                    }
                }
                Node::Index { children, .. } => {
                    if let Some(child) = children.get(index) {
                        self.stack.push((node, index + 1));
                        self.stack.push((child.as_ref(), 0));
                    }
                }
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.size, Some(self.size))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Depth-first iterator over bindings cloned out of shared nodes.
#[derive(Debug)]
pub struct IntoIter<K, V> {
    stack: Vec<(Arc<Node<K, V>>, usize)>,
    size: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(node: Arc<Node<K, V>>) -> Self {
        Self {
            size: node.len(),
            stack: vec![(node, 0)],
        }
    }
}

impl<K: Clone, V: Clone> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, index)) = self.stack.pop() {
            match &*node {
                Node::Empty { .. } => {}
                Node::Leaf { key, value, .. } => {
                    self.size -= 1;
                    return Some((key.clone(), value.clone()));
                }
                Node::Collision { bucket, .. } => {
                    if let Some((key, value)) = bucket.entries().get(index).cloned() {
                        self.stack.push((node, index + 1));
                        self.size -= 1;
                        return Some((key, value));
                    }
                }
                Node::Index { children, .. } => {
                    if let Some(child) = children.get(index).cloned() {
                        self.stack.push((node, index + 1));
                        self.stack.push((child, 0));
                    }
                }
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.size, Some(self.size))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for IntoIter<K, V> {}
