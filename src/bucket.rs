use std::borrow::Borrow;

/// Entries of a collision node in insertion order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bucket<K, V>(Vec<(K, V)>);

impl<K, V> Bucket<K, V> {
    pub fn new(first: (K, V), second: (K, V)) -> Self {
        Bucket(vec![first, second])
    }

    pub fn entries(&self) -> &[(K, V)] {
        &self.0
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }
}

impl<K: Eq, V> Bucket<K, V> {
    fn find_index<Q: Eq + ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        self.0.iter().position(|(k, _)| k.borrow() == key)
    }

    pub fn find<Q: Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.find_index(key).map(|i| &self.0[i].1)
    }
}

impl<K: Clone + Eq, V: Clone + PartialEq> Bucket<K, V> {
    /// Inserts an entry, returning `None` if the bucket already holds it.
    pub fn insert(&self, key: K, value: V) -> Option<Self> {
        let index = self.find_index(&key);

        if index.is_some_and(|i| self.0[i].1 == value) {
            return None;
        }

        let mut entries = self.0.clone();

        match index {
            Some(i) => entries[i].1 = value,
            None => entries.push((key, value)),
        }

        Some(Bucket(entries))
    }
}

impl<K: Clone + Eq, V: Clone> Bucket<K, V> {
    /// Removes an entry, returning `None` if no entry matches the key.
    pub fn remove<Q: Eq + ?Sized>(&self, key: &Q) -> Option<Self>
    where
        K: Borrow<Q>,
    {
        self.find_index(key).map(|i| {
            let mut entries = self.0.clone();
            entries.remove(i);
            Bucket(entries)
        })
    }
}
