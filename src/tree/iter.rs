use super::{Position, Tree};
use crate::{
	node::{self, Link},
	node_ref::{marker, NodeRef},
};
use core::{
	fmt::{self, Debug},
	iter::FusedIterator,
	marker::PhantomData,
};

pub struct Iter<'a, T> {
	front: Link<T>,
	back: Link<T>,
	remaining: usize,
	_marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
	pub(super) fn new(tree: &'a Tree<T>) -> Self {
		Self {
			// SAFETY: root is a live node owned by the borrowed tree
			front: tree.root.map(|root| unsafe { node::minimum(root) }),
			back: tree.root.map(|root| unsafe { node::maximum(root) }),
			remaining: tree.len,
			_marker: PhantomData,
		}
	}
}

impl<'a, T> Iterator for Iter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		// SAFETY: front stays inside the borrowed tree while elements remain
		let node = unsafe { NodeRef::<T, marker::Immut<'a>>::from_link(self.front)? };
		self.front = unsafe { node::successor(node.as_ptr()) };
		self.remaining -= 1;
		Some(&node.into_ref().value)
	}

	fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		// SAFETY: back stays inside the borrowed tree while elements remain
		let node = unsafe { NodeRef::<T, marker::Immut<'a>>::from_link(self.back)? };
		self.back = unsafe { node::predecessor(node.as_ptr()) };
		self.remaining -= 1;
		Some(&node.into_ref().value)
	}
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
	fn clone(&self) -> Self {
		Self {
			front: self.front,
			back: self.back,
			remaining: self.remaining,
			_marker: PhantomData,
		}
	}
}

/// Owning iterator; takes elements off either end of the tree it consumes.
pub struct IntoIter<T: Ord> {
	tree: Tree<T>,
}

impl<T: Ord> IntoIter<T> {
	pub(super) fn new(tree: Tree<T>) -> Self { Self { tree } }
}

impl<T: Ord> Iterator for IntoIter<T> {
	type Item = T;

	fn next(&mut self) -> Option<T> { self.tree.pop_first() }

	fn size_hint(&self) -> (usize, Option<usize>) { (self.tree.len(), Some(self.tree.len())) }
}

impl<T: Ord> DoubleEndedIterator for IntoIter<T> {
	fn next_back(&mut self) -> Option<T> { self.tree.pop_last() }
}

impl<T: Ord> ExactSizeIterator for IntoIter<T> {}
impl<T: Ord> FusedIterator for IntoIter<T> {}

/// A bidirectional cursor over a borrowed tree.
///
/// The cursor sits either on an element or on the end position. Moving forward
/// from the end wraps to the first element, moving backward from the end wraps to
/// the last one. Cursors compare equal when they sit on the same node.
pub struct Cursor<'a, T> {
	tree: &'a Tree<T>,
	node: Link<T>,
}

impl<'a, T> Cursor<'a, T> {
	pub(super) fn new(tree: &'a Tree<T>, node: Link<T>) -> Self { Self { tree, node } }

	pub fn current(&self) -> Option<&'a T> {
		// SAFETY: the cursor only ever holds nodes of the tree it borrows
		let node = unsafe { NodeRef::<T, marker::Immut<'a>>::from_link(self.node)? };
		Some(&node.into_ref().value)
	}

	pub fn is_end(&self) -> bool { self.node.is_none() }

	pub fn move_next(&mut self) {
		self.node = match self.node {
			// SAFETY: the cursor only ever holds nodes of the tree it borrows
			Some(node) => unsafe { node::successor(node) },
			None => self.tree.root.map(|root| unsafe { node::minimum(root) }),
		}
	}

	pub fn move_prev(&mut self) {
		self.node = match self.node {
			// SAFETY: the cursor only ever holds nodes of the tree it borrows
			Some(node) => unsafe { node::predecessor(node) },
			None => self.tree.root.map(|root| unsafe { node::maximum(root) }),
		}
	}

	pub fn position(&self) -> Position<T> { self.tree.position(self.node) }
}

impl<T> Copy for Cursor<'_, T> {}
impl<T> Clone for Cursor<'_, T> {
	fn clone(&self) -> Self { *self }
}

impl<T> PartialEq for Cursor<'_, T> {
	fn eq(&self, other: &Self) -> bool { self.node == other.node }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: Debug> Debug for Cursor<'_, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_tuple("Cursor").field(&self.current()).finish() }
}
