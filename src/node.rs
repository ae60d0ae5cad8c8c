use crate::{
    bitmap::Bitmap,
    bucket::Bucket,
    utilities::{chunk, MAX_DEPTH},
};
use std::{borrow::Borrow, sync::Arc};

/// Node of a trie.
///
/// A node at depth `d` only looks at the `d`-th 5-bit chunk of a hash.
/// Nodes are never modified once built. Updates build new nodes along a
/// path and share every other sub-tree with the old version.
///
/// Every binding of a collision node has the same full hash. A key with
/// another hash splits the node into an index node above the maximum depth.
#[derive(Debug)]
pub enum Node<K, V> {
    Empty {
        depth: u8,
    },
    Leaf {
        hash: u32,
        key: K,
        value: V,
        depth: u8,
    },
    Collision {
        hash: u32,
        bucket: Bucket<K, V>,
        depth: u8,
    },
    Index {
        bitmap: Bitmap,
        children: Vec<Arc<Node<K, V>>>,
        count: usize,
        depth: u8,
    },
}

impl<K, V> Node<K, V> {
    pub fn new() -> Self {
        Self::Empty { depth: 0 }
    }

    fn leaf(hash: u32, key: K, value: V, depth: u8) -> Self {
        Self::Leaf {
            hash,
            key,
            value,
            depth,
        }
    }

    /// Returns a number of bindings under a node.
    pub fn len(&self) -> usize {
        match self {
            Self::Empty { .. } => 0,
            Self::Leaf { .. } => 1,
            Self::Collision { bucket, .. } => bucket.size(),
            Self::Index { count, .. } => *count,
        }
    }

    #[cfg(test)]
    pub fn depth(&self) -> u8 {
        match self {
            Self::Empty { depth }
            | Self::Leaf { depth, .. }
            | Self::Collision { depth, .. }
            | Self::Index { depth, .. } => *depth,
        }
    }

    fn with_depth(self, depth: u8) -> Self {
        match self {
            Self::Empty { .. } => Self::Empty { depth },
            Self::Leaf {
                hash, key, value, ..
            } => Self::leaf(hash, key, value, depth),
            Self::Collision { hash, bucket, .. } => Self::Collision {
                hash,
                bucket,
                depth,
            },
            Self::Index {
                bitmap,
                children,
                count,
                ..
            } => Self::Index {
                bitmap,
                children,
                count,
                depth,
            },
        }
    }

    /// Returns a hash shared by every binding of a leaf or collision node.
    fn single_hash(&self) -> Option<u32> {
        match self {
            Self::Leaf { hash, .. } | Self::Collision { hash, .. } => Some(*hash),
            Self::Empty { .. } | Self::Index { .. } => None,
        }
    }

    /// Builds an index node out of two leaf or collision nodes whose hashes
    /// differ.
    fn combine(first: Self, second: Self, depth: u8) -> Self {
        let first_hash = first.single_hash().unwrap_or_default();
        let second_hash = second.single_hash().unwrap_or_default();

        assert_ne!(
            first_hash, second_hash,
            "bindings of the same hash cannot be combined"
        );

        let first_chunk = chunk(first_hash, depth);
        let second_chunk = chunk(second_hash, depth);
        let count = first.len() + second.len();

        if first_chunk == second_chunk {
            return Self::Index {
                bitmap: Bitmap::new().set(first_chunk),
                children: vec![Self::combine(first, second, depth + 1).into()],
                count,
                depth,
            };
        }

        let bitmap = Bitmap::new().set(first_chunk).set(second_chunk);
        let first = Arc::new(first.with_depth(depth + 1));
        let second = Arc::new(second.with_depth(depth + 1));

        Self::Index {
            bitmap,
            children: if bitmap.index(first_chunk) < bitmap.index(second_chunk) {
                vec![first, second]
            } else {
                vec![second, first]
            },
            count,
            depth,
        }
    }
}

impl<K: Eq, V> Node<K, V> {
    pub fn get<Q: Eq + ?Sized>(&self, hash: u32, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        match self {
            Self::Empty { .. } => None,
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                value,
                ..
            } => (hash == *leaf_hash && key == leaf_key.borrow()).then_some(value),
            Self::Collision { bucket, .. } => bucket.find(key),
            Self::Index {
                bitmap,
                children,
                depth,
                ..
            } => {
                let chunk = chunk(hash, *depth);

                if bitmap.get(chunk) {
                    children[bitmap.index(chunk)].get(hash, key)
                } else {
                    None
                }
            }
        }
    }

    pub fn contains_key<Q: Eq + ?Sized>(&self, hash: u32, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get(hash, key).is_some()
    }
}

impl<K: Clone + Eq, V: Clone + PartialEq> Node<K, V> {
    /// Inserts a binding.
    ///
    /// It returns `None` if the node already holds the same binding.
    #[must_use]
    pub fn insert(&self, hash: u32, key: K, value: V) -> Option<Self> {
        match self {
            Self::Empty { depth } => Some(Self::leaf(hash, key, value, *depth)),
            Self::Leaf {
                hash: leaf_hash,
                key: leaf_key,
                value: leaf_value,
                depth,
            } => {
                if hash == *leaf_hash && key == *leaf_key {
                    (value != *leaf_value)
                        .then(|| Self::leaf(hash, leaf_key.clone(), value, *depth))
                } else if hash == *leaf_hash || *depth >= MAX_DEPTH {
                    Some(Self::Collision {
                        hash: *leaf_hash,
                        bucket: Bucket::new((leaf_key.clone(), leaf_value.clone()), (key, value)),
                        depth: *depth,
                    })
                } else {
                    Some(Self::combine(
                        Self::leaf(*leaf_hash, leaf_key.clone(), leaf_value.clone(), *depth),
                        Self::leaf(hash, key, value, *depth),
                        *depth,
                    ))
                }
            }
            Self::Collision {
                hash: collision_hash,
                bucket,
                depth,
            } => {
                // Hashes are exhausted at the maximum depth.
                if hash == *collision_hash || *depth >= MAX_DEPTH {
                    bucket.insert(key, value).map(|bucket| Self::Collision {
                        hash: *collision_hash,
                        bucket,
                        depth: *depth,
                    })
                } else {
                    Some(Self::combine(
                        Self::Collision {
                            hash: *collision_hash,
                            bucket: bucket.clone(),
                            depth: *depth,
                        },
                        Self::leaf(hash, key, value, *depth),
                        *depth,
                    ))
                }
            }
            Self::Index {
                bitmap,
                children,
                count,
                depth,
            } => {
                let chunk = chunk(hash, *depth);
                let index = bitmap.index(chunk);

                if !bitmap.get(chunk) {
                    let mut children = children.clone();
                    children.insert(index, Self::leaf(hash, key, value, depth + 1).into());

                    return Some(Self::Index {
                        bitmap: bitmap.set(chunk),
                        children,
                        count: count + 1,
                        depth: *depth,
                    });
                }

                let child = &children[index];
                let node = child.insert(hash, key, value)?;
                let count = count - child.len() + node.len();
                let mut children = children.clone();
                children[index] = node.into();

                Some(Self::Index {
                    bitmap: *bitmap,
                    children,
                    count,
                    depth: *depth,
                })
            }
        }
    }
}

impl<K: Clone + Eq, V: Clone> Node<K, V> {
    /// Removes a binding.
    ///
    /// It returns `None` if no binding matches the key.
    #[must_use]
    pub fn remove<Q: Eq + ?Sized>(&self, hash: u32, key: &Q) -> Option<Self>
    where
        K: Borrow<Q>,
    {
        match self {
            Self::Empty { .. } => None,
            Self::Leaf {
                key: leaf_key,
                depth,
                ..
            } => (key == leaf_key.borrow()).then_some(Self::Empty { depth: *depth }),
            Self::Collision {
                hash: collision_hash,
                bucket,
                depth,
            } => {
                let bucket = bucket.remove(key)?;

                Some(if bucket.size() == 0 {
                    Self::Empty { depth: *depth }
                } else {
                    // A single remaining entry stays in a collision node.
                    Self::Collision {
                        hash: *collision_hash,
                        bucket,
                        depth: *depth,
                    }
                })
            }
            Self::Index {
                bitmap,
                children,
                count,
                depth,
            } => {
                let chunk = chunk(hash, *depth);

                if !bitmap.get(chunk) {
                    return None;
                }

                let index = bitmap.index(chunk);
                let node = children[index].remove(hash, key)?;
                let mut children = children.clone();

                let bitmap = if node.len() == 0 {
                    if bitmap.size() == 1 {
                        return Some(Self::Empty { depth: *depth });
                    }

                    children.remove(index);
                    bitmap.unset(chunk)
                } else {
                    children[index] = node.into();
                    *bitmap
                };

                Some(Self::Index {
                    bitmap,
                    children,
                    count: count - 1,
                    depth: *depth,
                })
            }
        }
    }
}

#[cfg(test)]
impl<K, V> Node<K, V> {
    /// Checks structural invariants of a sub-tree.
    pub fn is_normal(&self) -> bool {
        match self {
            Self::Empty { .. } | Self::Leaf { .. } => true,
            Self::Collision { bucket, .. } => bucket.size() > 0,
            Self::Index {
                bitmap,
                children,
                count,
                depth,
            } => {
                !children.is_empty()
                    && bitmap.size() == children.len()
                    && *count == children.iter().map(|child| child.len()).sum::<usize>()
                    && children.iter().all(|child| {
                        child.depth() == depth + 1 && child.len() > 0 && child.is_normal()
                    })
            }
        }
    }
}
