//! Persistent hash map and set of HAMT whose versions share sub-trees over
//! threads.
//!
//! Hash-Array Mapped Trie (HAMT) is a data structure popular as a map (a.k.a.
//! associative array or dictionary) or set. Its immutable variant is adopted
//! widely by functional programming languages like Scala and Clojure to
//! implement immutable and memory-efficient associative arrays and sets.
//!
//! Every update returns a new version of a map and leaves older versions
//! intact. Only nodes on a path from a root to an updated binding are
//! rebuilt, and the rest are shared between versions.
//!
//! ```
//! use trie_map::TrieMap;
//!
//! let first = TrieMap::new().insert("a", 1).insert("b", 2);
//! let second = first.insert("a", 99);
//!
//! assert_eq!(first.get("a"), Some(&1));
//! assert_eq!(second.get("a"), Some(&99));
//! assert_eq!(second.len(), 2);
//!
//! let third = second.remove("b");
//!
//! assert!(third.contains_key("a"));
//! assert!(!third.contains_key("b"));
//! ```

mod bitmap;
mod bucket;
mod identity;
mod iterator;
mod map;
mod node;
mod set;
mod utilities;

pub use identity::Identity;
pub use iterator::{IntoIter, Iter};
pub use map::{DefaultHashBuilder, TrieMap};
pub use set::{ClonedSetIterator, SetIterator, TrieSet};
