mod iter;
mod position;

pub use iter::{Cursor, IntoIter, Iter};
pub use position::{Position, TreeId};

use crate::{
	node::{self, Link, Node},
	node_ref::{marker, NodeRef},
};
use core::{
	borrow::Borrow,
	cmp::Ordering,
	fmt::{self, Debug},
	iter::FromIterator,
	marker::PhantomData,
	mem,
	ptr::NonNull,
};
use log::{debug, trace};

pub struct Tree<T> {
	root: Link<T>,
	len: usize,
	id: TreeId,
	generation: u64,
	_marker: PhantomData<Box<Node<T>>>,
}

// SAFETY: the tree uniquely owns its nodes, exactly like a Box<Node<T>> would
unsafe impl<T: Send> Send for Tree<T> {}
// SAFETY: shared access never mutates nodes
unsafe impl<T: Sync> Sync for Tree<T> {}

impl<T> Tree<T> {
	pub fn new() -> Self {
		Self {
			root: None,
			len: 0,
			id: TreeId::fresh(),
			generation: 0,
			_marker: PhantomData,
		}
	}

	pub fn len(&self) -> usize { self.len }

	pub fn is_empty(&self) -> bool { self.len == 0 }

	pub fn max_size(&self) -> usize { usize::MAX }

	pub fn id(&self) -> TreeId { self.id }

	pub fn begin(&self) -> Position<T> {
		// SAFETY: root is a live node owned by self
		let first = self.root.map(|root| unsafe { node::minimum(root) });
		self.position(first)
	}

	pub fn end(&self) -> Position<T> { self.position(None) }

	/// Position following `pos` in sorted order. Stepping forward from `end()` wraps
	/// around to `begin()`. Stale positions yield `end()`.
	pub fn next(&self, pos: Position<T>) -> Position<T> {
		if !self.is_current(&pos) {
			return self.end();
		}
		let next = match pos.node {
			None => return self.begin(),
			// SAFETY: the position is current so its node is still owned by self
			Some(node) => unsafe { node::successor(node) },
		};
		self.position(next)
	}

	/// Position preceding `pos` in sorted order. Stepping back from `end()` gives the
	/// largest element. Stale positions yield `end()`.
	pub fn prev(&self, pos: Position<T>) -> Position<T> {
		if !self.is_current(&pos) {
			return self.end();
		}
		let prev = match pos.node {
			// SAFETY: root is a live node owned by self
			None => self.root.map(|root| unsafe { node::maximum(root) }),
			// SAFETY: the position is current so its node is still owned by self
			Some(node) => unsafe { node::predecessor(node) },
		};
		self.position(prev)
	}

	pub fn get(&self, pos: Position<T>) -> Option<&T> {
		let node = self.resolve(&pos)?;
		// SAFETY: resolved nodes are owned by self, which we borrow for the result
		Some(&unsafe { NodeRef::<T, marker::Immut>::new(node) }.into_ref().value)
	}

	// Mutable access is only handed out inside the crate: changing the ordered part of
	// a value in place would break the search invariant
	pub(crate) fn get_mut(&mut self, pos: Position<T>) -> Option<&mut T> {
		let node = self.resolve(&pos)?;
		// SAFETY: resolved nodes are owned by self, which we borrow mutably for the result
		Some(&mut unsafe { NodeRef::<T, marker::Mut>::new(node) }.into_mut().value)
	}

	pub fn first(&self) -> Option<&T> { self.get(self.begin()) }

	pub fn last(&self) -> Option<&T> { self.get(self.prev(self.end())) }

	pub fn iter(&self) -> Iter<'_, T> { Iter::new(self) }

	pub fn cursor_front(&self) -> Cursor<'_, T> { Cursor::new(self, self.begin().node) }

	pub fn cursor_back(&self) -> Cursor<'_, T> { Cursor::new(self, self.prev(self.end()).node) }

	pub fn cursor_at(&self, pos: Position<T>) -> Cursor<'_, T> {
		Cursor::new(self, self.resolve(&pos))
	}

	/// Walks down from the root, steering with `f`, which compares the sought key
	/// against a stored value. Returns the first node on the path that compares
	/// equal, or `end()`.
	pub fn search_by<F>(&self, mut f: F) -> Position<T>
	where
		F: FnMut(&T) -> Ordering,
	{
		let mut current = self.root;
		while let Some(pointer) = current {
			// SAFETY: every node reachable from root is owned by self
			let node = unsafe { NodeRef::<T, marker::Immut>::new(pointer) }.into_ref();
			current = match f(&node.value) {
				Ordering::Equal => break,
				Ordering::Less => node.left,
				Ordering::Greater => node.right,
			};
		}
		self.position(current)
	}

	pub fn find<Q>(&self, key: &Q) -> Position<T>
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.search_by(|value| key.cmp(value.borrow()))
	}

	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		!self.find(key).is_end()
	}

	pub fn height(&self) -> usize {
		let mut deepest = 0;
		let mut stack = Vec::new();
		stack.extend(self.root.map(|root| (root, 1)));
		while let Some((pointer, depth)) = stack.pop() {
			// SAFETY: every node reachable from root is owned by self
			let node = unsafe { NodeRef::<T, marker::Immut>::new(pointer) }.into_ref();
			if node.is_leaf() {
				deepest = deepest.max(depth);
			}
			stack.extend(node.left.map(|left| (left, depth + 1)));
			stack.extend(node.right.map(|right| (right, depth + 1)));
		}
		deepest
	}

	// Frees children before their parent, without recursion
	pub fn clear(&mut self) {
		let mut current = self.root.take();
		while let Some(mut pointer) = current {
			// SAFETY: pointer is owned by self and no other reference to it is live
			let node = unsafe { pointer.as_mut() };
			if let Some(left) = node.left.take() {
				current = Some(left);
				continue;
			}
			if let Some(right) = node.right.take() {
				current = Some(right);
				continue;
			}
			current = node.parent;
			// SAFETY: both children are already gone and the parent's link to this node
			// is never followed again, so this is the last handle to the allocation
			drop(unsafe { NodeRef::from_detached(pointer) }.into_boxed());
		}
		self.len = 0;
		self.bump_generation();
	}

	pub fn swap(&mut self, other: &mut Self) {
		mem::swap(&mut self.root, &mut other.root);
		mem::swap(&mut self.len, &mut other.len);
		self.bump_generation();
		other.bump_generation();
	}

	pub fn move_from(&mut self, other: &mut Self) {
		self.clear();
		self.swap(other);
	}

	fn position(&self, node: Link<T>) -> Position<T> { Position::new(self.id, self.generation, node) }

	fn is_current(&self, pos: &Position<T>) -> bool {
		pos.tree == self.id && pos.generation == self.generation
	}

	fn resolve(&self, pos: &Position<T>) -> Option<NonNull<Node<T>>> {
		if self.is_current(pos) {
			pos.node
		}
		else {
			None
		}
	}

	// Like resolve, but records why a mutating call was turned into a no-op
	fn resolve_for_removal(&self, pos: &Position<T>, operation: &str) -> Option<NonNull<Node<T>>> {
		if !self.is_current(pos) {
			debug!(
				"{}: ignoring position from tree {:?} generation {}, tree {:?} is at generation {}",
				operation, pos.tree, pos.generation, self.id, self.generation
			);
		}
		self.resolve(pos)
	}

	fn bump_generation(&mut self) { self.generation = self.generation.wrapping_add(1) }

	// Replaces the subtree rooted at target with the one rooted at replacement in
	// target's parent. target keeps its own (now stale) links.
	// SAFETY: target must be reachable from self.root, replacement must be live or None
	unsafe fn transplant(&mut self, target: NonNull<Node<T>>, replacement: Link<T>) {
		let parent = target.as_ref().parent;
		match parent {
			None => self.root = replacement,
			Some(mut parent) => {
				if parent.as_ref().left == Some(target) {
					parent.as_mut().left = replacement;
				}
				else {
					parent.as_mut().right = replacement;
				}
			}
		}
		if let Some(mut replacement) = replacement {
			replacement.as_mut().parent = parent;
		}
	}

	// Unlinks target from the tree without freeing it and hands back ownership. When
	// target has two children its in-order successor is moved into its place, so only
	// target's allocation leaves.
	// SAFETY: target must be reachable from self.root
	unsafe fn detach(&mut self, target: NonNull<Node<T>>) -> NodeRef<T, marker::Owned> {
		let (left, right) = {
			let node = target.as_ref();
			(node.left, node.right)
		};

		match (left, right) {
			(None, _) => self.transplant(target, right),
			(_, None) => self.transplant(target, left),
			(Some(mut left), Some(mut right)) => {
				let mut successor = node::minimum(right);
				if successor.as_ref().parent != Some(target) {
					let successor_right = successor.as_ref().right;
					self.transplant(successor, successor_right);
					successor.as_mut().right = Some(right);
					right.as_mut().parent = Some(successor);
				}
				self.transplant(target, Some(successor));
				successor.as_mut().left = Some(left);
				left.as_mut().parent = Some(successor);
			}
		}

		self.len -= 1;
		self.bump_generation();
		NodeRef::from_detached(target)
	}

	// SAFETY: target must be reachable from self.root
	unsafe fn remove_node(&mut self, target: NonNull<Node<T>>) -> T {
		let node = *self.detach(target).into_boxed();
		node.value
	}
}

impl<T: Ord> Tree<T> {
	/// Equal values are placed after the ones already present.
	pub fn insert(&mut self, value: T) -> Position<T> {
		let node = self.attach(Node::allocate(value));
		self.check();
		self.position(Some(node))
	}

	/// Removes the element at `pos` and returns it. `end()`, stale positions and
	/// positions from other trees leave the tree untouched and return `None`.
	pub fn erase(&mut self, pos: Position<T>) -> Option<T> {
		let node = self.resolve_for_removal(&pos, "erase")?;
		// SAFETY: resolved nodes are reachable from self.root
		let value = unsafe { self.remove_node(node) };
		self.check();
		Some(value)
	}

	pub fn pop_first(&mut self) -> Option<T> {
		// SAFETY: root is a live node owned by self
		let first = unsafe { node::minimum(self.root?) };
		// SAFETY: the minimum is reachable from root
		let value = unsafe { self.remove_node(first) };
		self.check();
		Some(value)
	}

	pub fn pop_last(&mut self) -> Option<T> {
		// SAFETY: root is a live node owned by self
		let last = unsafe { node::maximum(self.root?) };
		// SAFETY: the maximum is reachable from root
		let value = unsafe { self.remove_node(last) };
		self.check();
		Some(value)
	}

	/// Moves the node at `pos` out of `source` and into this tree without
	/// reallocating it. Follows the same no-op rules as [`Tree::erase`].
	///
	/// Returns the position in `source` of the element that followed the moved one,
	/// which stays usable even though `source` has started a new generation.
	pub fn relocate(&mut self, pos: Position<T>, source: &mut Tree<T>) -> Position<T> {
		let node = match source.resolve_for_removal(&pos, "relocate") {
			Some(node) => node,
			None => return source.end(),
		};

		// The successor survives detaching: it is either untouched or moved into the
		// detached node's place, which keeps it next in order
		// SAFETY: node is reachable from source.root
		let following = unsafe { node::successor(node) };

		// SAFETY: node is reachable from source.root
		let node = unsafe { source.detach(node) };
		self.attach(node);
		trace!("relocated node from tree {:?} into tree {:?}", source.id, self.id);

		source.check();
		self.check();
		source.position(following)
	}

	// Returns the value at pos, inserting make() first when pos is end() or invalid
	pub(crate) fn value_or_insert<F>(&mut self, pos: Position<T>, make: F) -> &mut T
	where
		F: FnOnce() -> T,
	{
		let pointer = match self.resolve(&pos) {
			Some(pointer) => pointer,
			None => {
				let pointer = self.attach(Node::allocate(make()));
				self.check();
				pointer
			}
		};
		// SAFETY: pointer is owned by self, which we borrow mutably for the result
		&mut unsafe { NodeRef::<T, marker::Mut>::new(pointer) }.into_mut().value
	}

	// Links a free-standing node in below the last node on its search path and
	// returns the pointer the tree now owns
	fn attach(&mut self, mut node: NodeRef<T, marker::Owned>) -> NonNull<Node<T>> {
		node.unlink();

		let mut parent = None;
		let mut goes_left = false;
		let mut current = self.root;
		while let Some(pointer) = current {
			parent = Some(pointer);
			// SAFETY: every node reachable from root is owned by self
			let candidate = unsafe { pointer.as_ref() };
			goes_left = node.value < candidate.value;
			current = if goes_left {
				candidate.left
			}
			else {
				candidate.right
			};
		}

		node.parent = parent;
		let node = node.into_linked();
		match parent {
			None => self.root = Some(node),
			// SAFETY: parent is owned by self and nothing else borrows it
			Some(mut parent) if goes_left => unsafe { parent.as_mut() }.left = Some(node),
			// SAFETY: as above
			Some(mut parent) => unsafe { parent.as_mut() }.right = Some(node),
		}
		self.len += 1;
		node
	}

	#[inline]
	fn check(&self) {
		#[cfg(feature = "check_invariants")]
		self.check_consistency();
	}

	#[cfg(any(test, feature = "check_invariants"))]
	pub fn check_consistency(&self) {
		let mut count = 0;
		let mut stack = Vec::new();
		if let Some(root) = self.root {
			// SAFETY: root is owned by self
			assert!(unsafe { root.as_ref() }.parent.is_none(), "root has a parent");
			stack.push(root);
		}
		while let Some(pointer) = stack.pop() {
			count += 1;
			// SAFETY: every node reachable from root is owned by self
			let node = unsafe { NodeRef::<T, marker::Immut>::new(pointer) }.into_ref();
			if let Some(left) = node.left {
				// SAFETY: as above
				unsafe {
					assert_eq!(left.as_ref().parent, Some(pointer), "broken parent link");
					assert!(node::maximum(left).as_ref().value < node.value, "left subtree out of order");
				}
				stack.push(left);
			}
			if let Some(right) = node.right {
				// SAFETY: as above
				unsafe {
					assert_eq!(right.as_ref().parent, Some(pointer), "broken parent link");
					assert!(node::minimum(right).as_ref().value >= node.value, "right subtree out of order");
				}
				stack.push(right);
			}
		}
		assert_eq!(count, self.len, "element count out of sync");
		assert!(self.iter().zip(self.iter().skip(1)).all(|(a, b)| a <= b));
	}
}

impl<T> Drop for Tree<T> {
	fn drop(&mut self) { self.clear() }
}

impl<T> Default for Tree<T> {
	fn default() -> Self { Self::new() }
}

impl<T: Debug> Debug for Tree<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_list().entries(self.iter()).finish() }
}

impl<T: Ord + Clone> Clone for Tree<T> {
	fn clone(&self) -> Self { self.iter().cloned().collect() }

	fn clone_from(&mut self, source: &Self) {
		self.clear();
		self.extend(source.iter().cloned());
	}
}

impl<T: PartialEq> PartialEq for Tree<T> {
	fn eq(&self, other: &Self) -> bool { self.len == other.len && self.iter().eq(other.iter()) }
}

impl<T: Eq> Eq for Tree<T> {}

impl<T: Ord> FromIterator<T> for Tree<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut tree = Tree::new();
		tree.extend(iter);
		tree
	}
}

impl<T: Ord> Extend<T> for Tree<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for value in iter {
			self.insert(value);
		}
	}
}

impl<T: Ord, const N: usize> From<[T; N]> for Tree<T> {
	fn from(values: [T; N]) -> Self { Self::from_iter(values) }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<T: Ord> IntoIterator for Tree<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter { IntoIter::new(self) }
}

#[cfg(test)]
mod tests {
	use super::Tree;

	fn collect<T: Clone>(tree: &Tree<T>) -> Vec<T> { tree.iter().cloned().collect() }

	#[test]
	fn test_insert_keeps_duplicates() {
		let tree = Tree::from([3, 4, 5, 1, 2, 6, 5, 7, 6]);
		tree.check_consistency();
		assert_eq!(tree.len(), 9);
		assert_eq!(collect(&tree), vec![1, 2, 3, 4, 5, 5, 6, 6, 7]);
	}

	#[test]
	fn test_find() {
		let tree = Tree::from([1, 2, 3, -1000]);
		assert_eq!(tree.get(tree.find(&3)), Some(&3));
		assert_eq!(tree.find(&-1000), tree.begin());
		assert_eq!(tree.find(&999), tree.end());
		assert!(tree.contains(&2));
		assert!(!tree.contains(&0));
	}

	#[test]
	fn test_positions_walk_both_ways() {
		let tree = Tree::from([5, 4, 3, 2, 1, 0]);
		let mut pos = tree.begin();
		for expected in 0..6 {
			assert_eq!(tree.get(pos), Some(&expected));
			pos = tree.next(pos);
		}
		assert!(pos.is_end());
		// Stepping past the end wraps around to the front
		assert_eq!(tree.get(tree.next(pos)), Some(&0));

		for expected in (0..6).rev() {
			pos = tree.prev(pos);
			assert_eq!(tree.get(pos), Some(&expected));
		}
		assert!(tree.prev(pos).is_end());
	}

	#[test]
	fn test_erase_max_then_min() {
		let mut tree = Tree::from([1, 2, 3, 4, 5]);
		let last = tree.prev(tree.end());
		assert_eq!(tree.erase(last), Some(5));
		assert_eq!(collect(&tree), vec![1, 2, 3, 4]);

		assert_eq!(tree.erase(tree.begin()), Some(1));
		assert_eq!(collect(&tree), vec![2, 3, 4]);
		tree.check_consistency();
	}

	#[test]
	fn test_erase_all_three_shapes() {
		// 50 has two children and its successor 60 is not its direct right child
		let mut tree = Tree::from([50, 30, 70, 20, 40, 60, 80, 65]);
		assert_eq!(tree.erase(tree.find(&50)), Some(50));
		tree.check_consistency();
		// 70 now has two children and its successor 80 is its direct right child
		assert_eq!(tree.erase(tree.find(&70)), Some(70));
		tree.check_consistency();
		// 20 is a leaf, 30 then has only a right child
		assert_eq!(tree.erase(tree.find(&20)), Some(20));
		assert_eq!(tree.erase(tree.find(&30)), Some(30));
		tree.check_consistency();
		assert_eq!(collect(&tree), vec![40, 60, 65, 80]);
	}

	#[test]
	fn test_erase_with_duplicates() {
		let mut tree = Tree::from([3, 4, 5, 1, 2, 6, 5, 7, 6]);
		tree.erase(tree.find(&6));
		tree.erase(tree.find(&6));
		tree.erase(tree.find(&2));
		tree.erase(tree.find(&3));
		tree.insert(6);
		tree.erase(tree.find(&7));
		tree.check_consistency();
		assert_eq!(tree.len(), 5);
		assert_eq!(collect(&tree), vec![1, 4, 5, 5, 6]);
	}

	#[test]
	fn test_erase_invalid_positions_is_noop() {
		let mut empty: Tree<i32> = Tree::new();
		assert_eq!(empty.erase(empty.begin()), None);
		assert_eq!(empty.len(), 0);

		let mut tree = Tree::from([1, 2, 3]);
		assert_eq!(tree.erase(tree.end()), None);

		let other = Tree::from([1, 2, 3]);
		assert_eq!(tree.erase(other.begin()), None);
		assert_eq!(tree.len(), 3);
	}

	#[test]
	fn test_stale_position_is_rejected() {
		let mut tree = Tree::from([1, 2, 3]);
		let two = tree.find(&2);
		let three = tree.find(&3);
		tree.erase(two);
		assert_eq!(tree.get(three), None);
		assert_eq!(tree.erase(three), None);
		assert_eq!(tree.erase(two), None);
		assert_eq!(tree.len(), 2);
		assert_eq!(tree.get(tree.find(&3)), Some(&3));
	}

	#[test]
	fn test_clear_is_idempotent() {
		let mut tree = Tree::from([4, 2, 6, 1, 3, 5, 7]);
		tree.clear();
		assert!(tree.is_empty());
		assert_eq!(tree.begin(), tree.end());
		tree.clear();
		assert_eq!(tree.len(), 0);
	}

	#[test]
	fn test_clear_deep_chain() {
		let mut tree: Tree<u32> = (0..10_000).collect();
		assert_eq!(tree.height(), 10_000);
		tree.clear();
		assert!(tree.is_empty());
	}

	#[test]
	fn test_swap_and_move() {
		let mut a = Tree::from([4, 5]);
		let mut b = Tree::from([1, 2, 3]);
		a.swap(&mut b);
		assert_eq!(collect(&a), vec![1, 2, 3]);
		assert_eq!(collect(&b), vec![4, 5]);

		let mut target = Tree::from([9]);
		target.move_from(&mut a);
		assert_eq!(a.len(), 0);
		assert_eq!(collect(&target), vec![1, 2, 3]);
	}

	#[test]
	fn test_clone_from_replaces_contents() {
		let source = Tree::from([2, 1, 3]);
		let mut target = Tree::from([7, 8]);
		target.clone_from(&source);
		target.check_consistency();
		assert_eq!(target, source);
		// Sorted reinsertion produces a right-leaning chain
		assert_eq!(target.height(), 3);
		assert_eq!(source.height(), 2);
	}

	#[test]
	fn test_relocate_moves_the_allocation() {
		let mut source = Tree::from([2, 1, 3]);
		let mut target = Tree::from([10]);
		let pos = source.find(&2);
		let address = source.get(pos).map(|value| value as *const i32);

		let following = target.relocate(pos, &mut source);
		assert_eq!(source.get(following), Some(&3));
		assert_eq!(source.len(), 2);
		assert_eq!(target.len(), 2);
		assert_eq!(target.get(target.find(&2)).map(|value| value as *const i32), address);
		source.check_consistency();
		target.check_consistency();

		// The old position no longer resolves anywhere
		assert_eq!(source.get(pos), None);
		assert!(target.relocate(pos, &mut source).is_end());
		assert_eq!(target.len(), 2);
	}

	#[test]
	fn test_pop_both_ends() {
		let mut tree = Tree::from([3, 1, 2]);
		assert_eq!(tree.pop_first(), Some(1));
		assert_eq!(tree.pop_last(), Some(3));
		assert_eq!(tree.pop_last(), Some(2));
		assert_eq!(tree.pop_first(), None);
	}
}
