use crate::node::Link;
use core::{
	fmt::{self, Debug},
	hash::{Hash, Hasher},
	sync::atomic::{AtomicU64, Ordering},
};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TreeId(u64);

impl TreeId {
	pub(crate) fn fresh() -> Self { TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)) }
}

/// A detached handle to an element of a tree, or to its end.
///
/// Positions do not borrow the tree they came from. Instead each one records the
/// tree's identity and generation; any operation that may detach or free a node
/// (erase, clear, relocation, swap, move) starts a new generation, after which older
/// positions are rejected by [`Tree::get`](super::Tree::get),
/// [`Tree::erase`](super::Tree::erase) and friends rather than dereferenced.
///
/// Two positions are equal when they refer to the same node; all end positions are
/// equal to each other.
pub struct Position<T> {
	pub(super) tree: TreeId,
	pub(super) generation: u64,
	pub(super) node: Link<T>,
}

impl<T> Position<T> {
	pub(super) fn new(tree: TreeId, generation: u64, node: Link<T>) -> Self {
		Self {
			tree,
			generation,
			node,
		}
	}

	pub fn is_end(&self) -> bool { self.node.is_none() }

	pub fn tree_id(&self) -> TreeId { self.tree }
}

impl<T> Copy for Position<T> {}
impl<T> Clone for Position<T> {
	fn clone(&self) -> Self { *self }
}

impl<T> PartialEq for Position<T> {
	fn eq(&self, other: &Self) -> bool { self.node == other.node }
}

impl<T> Eq for Position<T> {}

impl<T> Hash for Position<T> {
	fn hash<H: Hasher>(&self, state: &mut H) { self.node.hash(state) }
}

impl<T> Debug for Position<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Position")
			.field("tree", &self.tree)
			.field("generation", &self.generation)
			.field("node", &self.node)
			.finish()
	}
}
