use std::{
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    ops::Deref,
    sync::Arc,
};

/// Key compared by the identity of its allocation rather than its value.
///
/// Two identities are equal only if they are clones of each other. This lets
/// values without meaningful equality, or distinct values that happen to be
/// equal, act as separate keys.
///
/// ```
/// use trie_map::{Identity, TrieMap};
///
/// let first = Identity::new(String::from("foo"));
/// let second = Identity::new(String::from("foo"));
/// let map = TrieMap::new().insert(first.clone(), 1).insert(second.clone(), 2);
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&first), Some(&1));
/// assert_eq!(map.get(&second), Some(&2));
/// ```
pub struct Identity<T: ?Sized>(Arc<T>);

impl<T> Identity<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl<T: ?Sized> Identity<T> {
    fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T: ?Sized> From<Arc<T>> for Identity<T> {
    fn from(value: Arc<T>) -> Self {
        Self(value)
    }
}

impl<T: ?Sized> Clone for Identity<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ?Sized> Deref for Identity<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> Eq for Identity<T> {}

impl<T: ?Sized> PartialEq for Identity<T> {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl<T: ?Sized> Hash for Identity<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl<T: ?Sized + Debug> Debug for Identity<T> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "Identity({:?})", &*self.0)
    }
}
