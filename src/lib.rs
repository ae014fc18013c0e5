//! Set, multiset and map adaptors over one unbalanced binary search tree. Elements
//! are addressed through detached [`Position`]s that go stale once their tree
//! frees or moves a node.
//!
//! ```
//! use bst_collections::{Map, Multiset, Set};
//!
//! let mut set = Set::from([3, 1, 2]);
//! assert!(!set.insert(2).1);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
//!
//! let bag = Multiset::from([1, 2, 2, 2, 3]);
//! assert_eq!(bag.count(&2), 3);
//!
//! let mut map = Map::from([('a', 1), ('b', 2), ('a', 3)]);
//! assert_eq!(map.at(&'a'), Ok(&1));
//! *map.get_or_insert_default('z') += 26;
//! assert_eq!(map.at(&'z'), Ok(&26));
//! ```

pub mod batch;
pub mod error;
pub mod map;
pub mod multiset;
mod node;
mod node_ref;
pub mod set;
pub mod tree;

pub use batch::Emplace;
pub use error::{Error, Result};
pub use map::Map;
pub use multiset::Multiset;
pub use set::Set;
pub use tree::{Cursor, Position, Tree};
