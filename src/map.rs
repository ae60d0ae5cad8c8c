use crate::{
    iterator::{IntoIter, Iter},
    node::Node,
    utilities::hash_key,
};
use std::{
    borrow::Borrow,
    collections::hash_map::DefaultHasher,
    fmt::{self, Debug, Formatter},
    hash::{BuildHasher, BuildHasherDefault, Hash},
    ops::Index,
    sync::Arc,
};

/// Hasher builder used by maps and sets unless another one is given.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// Map data structure of HAMT.
///
/// Note that every method does not modify the original map but creates a new
/// one if necessary. A new map shares every sub-tree the update did not touch
/// with the original one. If an update changes nothing, the returned map
/// shares its root with the original one, which [`TrieMap::ptr_eq`] detects.
pub struct TrieMap<K, V, S = DefaultHashBuilder> {
    root: Arc<Node<K, V>>,
    hasher_builder: S,
}

impl<K, V> TrieMap<K, V> {
    /// Creates a new map.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V, S> TrieMap<K, V, S> {
    /// Creates a new map which hashes keys with a hasher builder.
    pub fn with_hasher(hasher_builder: S) -> Self {
        Self {
            root: Node::new().into(),
            hasher_builder,
        }
    }

    /// Returns a size of a map.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Returns true if a map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a hasher builder of a map.
    pub fn hasher(&self) -> &S {
        &self.hasher_builder
    }

    /// Returns key-value pairs in a map.
    ///
    /// The order follows the structure of a trie. It is neither insertion
    /// order nor sorted order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }

    /// Returns keys in a map.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns values in a map.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Checks if two maps share the same root.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> TrieMap<K, V, S> {
    /// Finds a value corresponding to a key.
    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.root.get(hash_key(&self.hasher_builder, key), key)
    }

    /// Finds a value corresponding to a key or returns a default one.
    pub fn get_or<'a, Q: Hash + Eq + ?Sized>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
    {
        self.get(key).unwrap_or(default)
    }

    /// Checks if a key is contained in a map.
    pub fn contains_key<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.root
            .contains_key(hash_key(&self.hasher_builder, key), key)
    }
}

impl<K, V: PartialEq, S> TrieMap<K, V, S> {
    /// Checks if a value is contained in a map.
    pub fn contains_value(&self, value: &V) -> bool {
        self.values().any(|other| other == value)
    }
}

impl<K: Clone + Hash + Eq, V: Clone + PartialEq, S: BuildHasher + Clone> TrieMap<K, V, S> {
    /// Inserts a key-value pair into a map.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let hash = hash_key(&self.hasher_builder, &key);

        match self.root.insert(hash, key, value) {
            Some(root) => self.with_root(root),
            None => self.clone(),
        }
    }

    /// Removes a key from a map if any.
    #[must_use]
    pub fn remove<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
    {
        match self.root.remove(hash_key(&self.hasher_builder, key), key) {
            Some(root) => self.with_root(root),
            None => self.clone(),
        }
    }

    /// Extends a map with an iterator of key-value pairs.
    ///
    /// Later pairs win over earlier ones with the same key.
    #[must_use]
    pub fn extend(&self, iterator: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut map = self.clone();

        for (key, value) in iterator {
            map = map.insert(key, value);
        }

        map
    }

    fn with_root(&self, root: Node<K, V>) -> Self {
        Self {
            root: root.into(),
            hasher_builder: self.hasher_builder.clone(),
        }
    }
}

impl<K, V, S: Clone> Clone for TrieMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            hasher_builder: self.hasher_builder.clone(),
        }
    }
}

impl<K, V, S: Default> Default for TrieMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K: Hash + Eq, V: PartialEq, S: BuildHasher> PartialEq for TrieMap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }

        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq, S: BuildHasher> Eq for TrieMap<K, V, S> {}

impl<K: Debug, V: Debug, S> Debug for TrieMap<K, V, S> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K, Q, V, S> Index<&Q> for TrieMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, S> FromIterator<(K, V)> for TrieMap<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        Self::default().extend(iterator)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for TrieMap<K, V>
where
    K: Clone + Hash + Eq,
    V: Clone + PartialEq,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a, K, V, S> IntoIterator for &'a TrieMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Clone, V: Clone, S> IntoIterator for TrieMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root)
    }
}

#[cfg(feature = "serde")]
mod serde {
    use super::*;
    use ::serde::{
        de::{Deserialize, Deserializer, MapAccess, Visitor},
        ser::{Serialize, Serializer},
    };
    use std::marker::PhantomData;

    impl<K: Serialize, V: Serialize, S> Serialize for TrieMap<K, V, S> {
        fn serialize<T: Serializer>(&self, serializer: T) -> Result<T::Ok, T::Error> {
            serializer.collect_map(self)
        }
    }

    impl<'de, K, V, S> Deserialize<'de> for TrieMap<K, V, S>
    where
        K: Clone + Hash + Eq + Deserialize<'de>,
        V: Clone + PartialEq + Deserialize<'de>,
        S: BuildHasher + Clone + Default,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(TrieMapVisitor(PhantomData))
        }
    }

    struct TrieMapVisitor<K, V, S>(PhantomData<TrieMap<K, V, S>>);

    impl<'de, K, V, S> Visitor<'de> for TrieMapVisitor<K, V, S>
    where
        K: Clone + Hash + Eq + Deserialize<'de>,
        V: Clone + PartialEq + Deserialize<'de>,
        S: BuildHasher + Clone + Default,
    {
        type Value = TrieMap<K, V, S>;

        fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
            formatter.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = TrieMap::default();

            while let Some((key, value)) = access.next_entry()? {
                map = map.insert(key, value);
            }

            Ok(map)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{random, rng, seq::SliceRandom};
    use std::{
        collections::HashMap,
        hash::Hasher,
        thread::{scope, spawn},
    };

    const ITERATION_COUNT: usize = 1 << 12;

    #[derive(Clone, Copy, Default)]
    struct ConstantHasher;

    impl Hasher for ConstantHasher {
        fn finish(&self) -> u64 {
            7
        }

        fn write(&mut self, _: &[u8]) {}
    }

    type CollidingHashBuilder = BuildHasherDefault<ConstantHasher>;

    #[test]
    fn new() {
        TrieMap::<usize, usize>::new();
    }

    #[test]
    fn insert() {
        let map = TrieMap::new();

        assert_eq!(map.len(), 0);
        assert_eq!(map.insert(0, 0).len(), 1);
        assert_eq!(map.insert(0, 0).insert(0, 0).len(), 1);
        assert_eq!(map.insert(0, 0).insert(0, 1).len(), 1);
        assert_eq!(map.insert(0, 0).insert(1, 0).len(), 2);
    }

    #[test]
    fn insert_many_in_order() {
        let mut map = TrieMap::new();

        for index in 0..ITERATION_COUNT {
            map = map.insert(index, index);
            assert_eq!(map.len(), index + 1);
        }
    }

    #[test]
    fn insert_many_at_random() {
        let mut map: TrieMap<u64, u64> = TrieMap::new();
        let mut expected = HashMap::new();

        for _ in 0..ITERATION_COUNT {
            let key = random();
            map = map.insert(key, key);
            expected.insert(key, key);
            assert_eq!(map.len(), expected.len());
        }
    }

    #[test]
    fn insert_same_binding() {
        let map = TrieMap::new().insert("foo", 1);

        assert!(map.insert("foo", 1).ptr_eq(&map));
        assert!(!map.insert("foo", 2).ptr_eq(&map));
        assert!(!map.insert("bar", 1).ptr_eq(&map));
    }

    #[test]
    fn remove() {
        let map = TrieMap::new();

        assert_eq!(map.insert(0, 0).remove(&0), map);
        assert_eq!(map.insert(0, 0).remove(&1), map.insert(0, 0));
        assert_eq!(map.insert(0, 0).insert(1, 0).remove(&0), map.insert(1, 0));
        assert_eq!(map.insert(0, 0).insert(1, 0).remove(&1), map.insert(0, 0));
        assert_eq!(
            map.insert(0, 0).insert(1, 0).remove(&2),
            map.insert(0, 0).insert(1, 0)
        );
    }

    #[test]
    fn remove_absent_key() {
        let map = TrieMap::new().insert(0, 0).insert(1, 1);

        assert!(map.remove(&2).ptr_eq(&map));
        assert!(TrieMap::<u8, u8>::new().remove(&0).is_empty());
    }

    #[test]
    fn insert_remove_many() {
        let mut map = TrieMap::<i16, i16>::new();

        for _ in 0..ITERATION_COUNT {
            let key = random();
            let size = map.len();
            let found = map.contains_key(&key);

            if random() {
                map = map.insert(key, key);

                assert_eq!(map.len(), if found { size } else { size + 1 });
                assert_eq!(map.get(&key), Some(&key));
            } else {
                map = map.remove(&key);

                assert_eq!(map.len(), if found { size - 1 } else { size });
                assert_eq!(map.get(&key), None);
            }

            assert!(map.root.is_normal());
        }
    }

    #[test]
    fn get() {
        let map = TrieMap::new();

        assert_eq!(map.insert(0, 0).get(&0), Some(&0));
        assert_eq!(map.insert(0, 0).get(&1), None);
        assert_eq!(map.insert(1, 0).get(&0), None);
        assert_eq!(map.insert(1, 0).get(&1), Some(&0));
        assert_eq!(map.insert(0, 0).insert(1, 0).get(&0), Some(&0));
        assert_eq!(map.insert(0, 0).insert(1, 0).get(&1), Some(&0));
        assert_eq!(map.insert(0, 0).insert(1, 0).get(&2), None);
    }

    #[test]
    fn get_borrowed() {
        let map = TrieMap::new().insert("foo".to_string(), 42);

        assert_eq!(map.get("foo"), Some(&42));
        assert!(map.contains_key("foo"));
        assert_eq!(map["foo"], 42);
    }

    #[test]
    fn get_or() {
        let map = TrieMap::new().insert(0, 1);

        assert_eq!(map.get_or(&0, &42), &1);
        assert_eq!(map.get_or(&1, &42), &42);
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_absent_key() {
        let _value = TrieMap::<u8, u8>::new()[&0];
    }

    #[test]
    fn contains_value() {
        let map = TrieMap::new().insert(0, "foo").insert(1, "bar");

        assert!(map.contains_value(&"foo"));
        assert!(map.contains_value(&"bar"));
        assert!(!map.contains_value(&"baz"));
    }

    #[test]
    fn versions() {
        let m0 = TrieMap::new();
        let m1 = m0.insert("a", 1);
        let m2 = m1.insert("b", 2);
        let m3 = m2.insert("a", 99);

        assert_eq!(m3.get("a"), Some(&99));
        assert_eq!(m2.get("a"), Some(&1));
        assert_eq!(m1.get("b"), None);
        assert_eq!(m0.len(), 0);
        assert_eq!(m3.len(), 2);

        let m4 = m3.remove("b");

        assert_eq!(m4.len(), 1);
        assert!(m4.contains_key("a"));
        assert!(!m4.contains_key("b"));
        assert!(m3.contains_key("b"));
    }

    #[test]
    fn colliding_keys() {
        let map = TrieMap::with_hasher(CollidingHashBuilder::default())
            .insert("x", 1)
            .insert("y", 2);

        assert_eq!(map.get("x"), Some(&1));
        assert_eq!(map.get("y"), Some(&2));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn insert_remove_colliding_keys() {
        let mut map = TrieMap::with_hasher(CollidingHashBuilder::default());

        for index in 0..100 {
            map = map.insert(index, index);
        }

        assert_eq!(map.len(), 100);
        assert!((0..100).all(|index| map.get(&index) == Some(&index)));
        assert!(map.insert(42, 42).ptr_eq(&map));

        for index in 0..100 {
            map = map.remove(&index);

            assert!(!map.contains_key(&index));
            assert_eq!(map.len(), 99 - index);
        }

        assert!(map.is_empty());
    }

    #[test]
    fn equality() {
        for _ in 0..8 {
            let mut maps: [TrieMap<i16, i16>; 2] = [TrieMap::new(), TrieMap::new()];
            let mut inserted_keys: Vec<i16> = (0..ITERATION_COUNT).map(|_| random()).collect();
            let mut deleted_keys: Vec<i16> = (0..ITERATION_COUNT).map(|_| random()).collect();

            for map in maps.iter_mut() {
                inserted_keys.shuffle(&mut rng());
                deleted_keys.shuffle(&mut rng());

                for key in &inserted_keys {
                    *map = map.insert(*key, *key);
                }

                for key in &deleted_keys {
                    *map = map.remove(key);
                }
            }

            assert_eq!(maps[0], maps[1]);
        }
    }

    #[test]
    fn inequality() {
        assert_ne!(TrieMap::new().insert(0, 0), TrieMap::new());
        assert_ne!(TrieMap::new().insert(0, 0), TrieMap::new().insert(0, 1));
        assert_ne!(TrieMap::new().insert(0, 0), TrieMap::new().insert(1, 0));
    }

    #[test]
    fn iterate() {
        let mut map = TrieMap::new();
        let mut expected = HashMap::new();

        for _ in 0..ITERATION_COUNT {
            let key = random::<u16>();
            let value = random::<u8>();

            map = map.insert(key, value);
            expected.insert(key, value);
        }

        let mut size = 0;

        for (key, value) in &map {
            size += 1;

            assert_eq!(expected[key], *value);
        }

        assert_eq!(size, expected.len());
        assert_eq!(map.keys().len(), expected.len());
        assert_eq!(
            map.values().map(|&value| value as usize).sum::<usize>(),
            expected
                .values()
                .map(|&value| value as usize)
                .sum::<usize>()
        );
    }

    #[test]
    fn iterate_owned() {
        let map = TrieMap::from([(1, "one"), (2, "two"), (3, "three")]);
        let mut pairs = map.into_iter().collect::<Vec<_>>();

        pairs.sort();

        assert_eq!(pairs, vec![(1, "one"), (2, "two"), (3, "three")]);
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", TrieMap::<u8, u8>::new()), "{}");
        assert_eq!(format!("{:?}", TrieMap::new().insert(1, 2)), "{1: 2}");
    }

    #[test]
    fn send_and_sync() {
        let map: TrieMap<usize, usize> = TrieMap::new();
        spawn(move || map);

        let map: TrieMap<String, String> = TrieMap::new();
        spawn(move || map);
    }

    #[test]
    fn share_between_threads() {
        let map = (0..1000)
            .map(|index| (index, index))
            .collect::<TrieMap<_, _>>();

        scope(|scope| {
            for thread in 0..4 {
                let map = &map;

                scope.spawn(move || {
                    let other = map.insert(thread, 0).remove(&(thread + 1));

                    assert_eq!(other.get(&thread), Some(&0));
                    assert_eq!(other.len(), 999);
                });
            }
        });

        assert!((0..1000).all(|index| map.get(&index) == Some(&index)));
    }

    mod from_iterator {
        use super::*;

        #[test]
        fn collect_empty() {
            assert_eq!(TrieMap::<usize, usize>::new(), [].into_iter().collect());
        }

        #[test]
        fn collect_duplicate_keys() {
            let map = [(0, 0), (1, 1), (0, 2)]
                .into_iter()
                .collect::<TrieMap<_, _>>();

            assert_eq!(map.len(), 2);
            assert_eq!(map.get(&0), Some(&2));
        }

        #[test]
        fn collect_many_pairs() {
            let pairs = (0..100).map(|index| (index, index)).collect::<Vec<_>>();
            let mut map = TrieMap::<usize, usize>::new();

            for &(key, value) in &pairs {
                map = map.insert(key, value);
            }

            assert_eq!(map, pairs.into_iter().collect());
        }

        #[test]
        fn extend() {
            assert_eq!(
                TrieMap::new().insert(0, 0).insert(1, 1),
                TrieMap::new().insert(0, 0).extend([(1, 1)])
            );
        }
    }

    #[cfg(feature = "serde")]
    mod serde {
        use super::*;

        #[test]
        fn round_trip() {
            let map = TrieMap::from([("foo".to_string(), 1), ("bar".to_string(), 2)]);
            let json = serde_json::to_string(&map).unwrap();

            assert_eq!(
                serde_json::from_str::<TrieMap<String, i32>>(&json).unwrap(),
                map
            );
        }
    }
}
