use crate::{
    iterator::{IntoIter, Iter},
    map::{DefaultHashBuilder, TrieMap},
};
use std::{
    borrow::Borrow,
    fmt::{self, Debug, Formatter},
    hash::{BuildHasher, Hash},
};

/// Set data structure of HAMT.
///
/// Elements are stored as keys of a map. Note that every method does not
/// modify the original set but creates a new one if necessary.
pub struct TrieSet<T, S = DefaultHashBuilder> {
    map: TrieMap<T, (), S>,
}

impl<T> TrieSet<T> {
    /// Creates a new set.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<T, S> TrieSet<T, S> {
    /// Creates a new set which hashes elements with a hasher builder.
    pub fn with_hasher(hasher_builder: S) -> Self {
        Self {
            map: TrieMap::with_hasher(hasher_builder),
        }
    }

    /// Returns a size of a set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if a set is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns values in a set.
    pub fn iter(&self) -> SetIterator<'_, T> {
        SetIterator(self.map.iter())
    }

    /// Checks if two sets share the same root.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.map.ptr_eq(&other.map)
    }
}

impl<T: Hash + Eq, S: BuildHasher> TrieSet<T, S> {
    /// Checks if a value is contained in a set.
    pub fn contains<Q: Hash + Eq + ?Sized>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
    {
        self.map.contains_key(value)
    }

    /// Checks if every value of a set is contained in another set.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T: Clone + Hash + Eq, S: BuildHasher + Clone> TrieSet<T, S> {
    /// Inserts a value into a set.
    #[must_use]
    pub fn insert(&self, value: T) -> Self {
        Self {
            map: self.map.insert(value, ()),
        }
    }

    /// Removes a value from a set if any.
    #[must_use]
    pub fn remove<Q: Hash + Eq + ?Sized>(&self, value: &Q) -> Self
    where
        T: Borrow<Q>,
    {
        Self {
            map: self.map.remove(value),
        }
    }

    /// Extends a set with an iterator of values.
    #[must_use]
    pub fn extend(&self, iterator: impl IntoIterator<Item = T>) -> Self {
        Self {
            map: self
                .map
                .extend(iterator.into_iter().map(|value| (value, ()))),
        }
    }

    /// Calculates union of two sets.
    pub fn union(&self, other: &Self) -> Self {
        if self.len() < other.len() {
            other.extend(self.iter().cloned())
        } else {
            self.extend(other.iter().cloned())
        }
    }

    /// Calculates intersection of two sets.
    pub fn intersection(&self, other: &Self) -> Self {
        self.filter(|value| other.contains(value))
    }

    /// Calculates difference of two sets.
    pub fn difference(&self, other: &Self) -> Self {
        self.filter(|value| !other.contains(value))
    }

    fn filter(&self, predicate: impl Fn(&T) -> bool) -> Self {
        Self::with_hasher(self.map.hasher().clone())
            .extend(self.iter().filter(|value| predicate(value)).cloned())
    }
}

impl<T, S: Clone> Clone for TrieSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<T, S: Default> Default for TrieSet<T, S> {
    fn default() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<T: Hash + Eq, S: BuildHasher> PartialEq for TrieSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Hash + Eq, S: BuildHasher> Eq for TrieSet<T, S> {}

impl<T: Debug, S> Debug for TrieSet<T, S> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> FromIterator<T> for TrieSet<T, S>
where
    T: Clone + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
        Self::default().extend(iterator)
    }
}

pub struct SetIterator<'a, T: 'a>(Iter<'a, T, ()>);

impl<'a, T> Iterator for SetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(value, _)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> ExactSizeIterator for SetIterator<'_, T> {}

impl<'a, T, S> IntoIterator for &'a TrieSet<T, S> {
    type IntoIter = SetIterator<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ClonedSetIterator<T: Clone>(IntoIter<T, ()>);

impl<T: Clone> Iterator for ClonedSetIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(value, _)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T: Clone> ExactSizeIterator for ClonedSetIterator<T> {}

impl<T: Clone, S> IntoIterator for TrieSet<T, S> {
    type IntoIter = ClonedSetIterator<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        ClonedSetIterator(self.map.into_iter())
    }
}

#[cfg(feature = "serde")]
mod serde {
    use super::*;
    use ::serde::{
        de::{Deserialize, Deserializer, SeqAccess, Visitor},
        ser::{Serialize, Serializer},
    };
    use std::marker::PhantomData;

    impl<T: Serialize, S> Serialize for TrieSet<T, S> {
        fn serialize<R: Serializer>(&self, serializer: R) -> Result<R::Ok, R::Error> {
            serializer.collect_seq(self)
        }
    }

    impl<'de, T, S> Deserialize<'de> for TrieSet<T, S>
    where
        T: Clone + Hash + Eq + Deserialize<'de>,
        S: BuildHasher + Clone + Default,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_seq(TrieSetVisitor(PhantomData))
        }
    }

    struct TrieSetVisitor<T, S>(PhantomData<TrieSet<T, S>>);

    impl<'de, T, S> Visitor<'de> for TrieSetVisitor<T, S>
    where
        T: Clone + Hash + Eq + Deserialize<'de>,
        S: BuildHasher + Clone + Default,
    {
        type Value = TrieSet<T, S>;

        fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
            formatter.write_str("a sequence")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut set = TrieSet::default();

            while let Some(value) = access.next_element()? {
                set = set.insert(value);
            }

            Ok(set)
        }
    }
}
