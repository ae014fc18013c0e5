//! An ordered collection that keeps every inserted value, duplicates included.

use crate::{
	batch::Emplace,
	tree::{Cursor, IntoIter, Iter, Position, Tree},
};
use core::{
	borrow::Borrow,
	fmt::{self, Debug},
	iter::FromIterator,
};
use log::trace;

/// Equal values are kept in insertion order and iterate as one contiguous run.
pub struct Multiset<T> {
	tree: Tree<T>,
}

impl<T> Multiset<T> {
	pub fn new() -> Self { Self { tree: Tree::new() } }

	pub fn len(&self) -> usize { self.tree.len() }

	pub fn is_empty(&self) -> bool { self.tree.is_empty() }

	pub fn max_size(&self) -> usize { self.tree.max_size() }

	pub fn begin(&self) -> Position<T> { self.tree.begin() }

	pub fn end(&self) -> Position<T> { self.tree.end() }

	pub fn next(&self, pos: Position<T>) -> Position<T> { self.tree.next(pos) }

	pub fn prev(&self, pos: Position<T>) -> Position<T> { self.tree.prev(pos) }

	pub fn get(&self, pos: Position<T>) -> Option<&T> { self.tree.get(pos) }

	pub fn first(&self) -> Option<&T> { self.tree.first() }

	pub fn last(&self) -> Option<&T> { self.tree.last() }

	pub fn iter(&self) -> Iter<'_, T> { self.tree.iter() }

	pub fn cursor_front(&self) -> Cursor<'_, T> { self.tree.cursor_front() }

	pub fn cursor_at(&self, pos: Position<T>) -> Cursor<'_, T> { self.tree.cursor_at(pos) }

	pub fn find<Q>(&self, value: &Q) -> Position<T>
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.tree.find(value)
	}

	pub fn contains<Q>(&self, value: &Q) -> bool
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.tree.contains(value)
	}

	/// The run of values equal to `value` as a half-open `(first, past_last)` pair.
	///
	/// `first` is whatever [`find`](Self::find) returns; the run is then extended
	/// one successor at a time, so this costs the search depth plus the run length.
	/// Both positions are `end()` when nothing matches.
	pub fn equal_range<Q>(&self, value: &Q) -> (Position<T>, Position<T>)
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let (first, past_last, _) = self.equal_run(value);
		(first, past_last)
	}

	pub fn count<Q>(&self, value: &Q) -> usize
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.equal_run(value).2
	}

	pub fn lower_bound<Q>(&self, value: &Q) -> Position<T>
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.equal_range(value).0
	}

	pub fn upper_bound<Q>(&self, value: &Q) -> Position<T>
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.equal_range(value).1
	}

	pub fn clear(&mut self) { self.tree.clear() }

	pub fn swap(&mut self, other: &mut Self) { self.tree.swap(&mut other.tree) }

	pub fn move_from(&mut self, other: &mut Self) { self.tree.move_from(&mut other.tree) }

	fn equal_run<Q>(&self, value: &Q) -> (Position<T>, Position<T>, usize)
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let first = self.tree.find(value);
		let mut past_last = first;
		let mut count = 0;
		while let Some(candidate) = self.tree.get(past_last) {
			let candidate: &Q = candidate.borrow();
			if candidate != value {
				break;
			}
			count += 1;
			past_last = self.tree.next(past_last);
		}
		(first, past_last, count)
	}
}

impl<T: Ord> Multiset<T> {
	/// Always inserts; equal values end up after the ones already present.
	pub fn insert(&mut self, value: T) -> Position<T> { self.tree.insert(value) }

	pub fn erase(&mut self, pos: Position<T>) -> Option<T> { self.tree.erase(pos) }

	/// Removes a single value equal to `value`, if any.
	pub fn remove<Q>(&mut self, value: &Q) -> bool
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let pos = self.tree.find(value);
		self.tree.erase(pos).is_some()
	}

	pub fn pop_first(&mut self) -> Option<T> { self.tree.pop_first() }

	pub fn pop_last(&mut self) -> Option<T> { self.tree.pop_last() }

	pub fn merge(&mut self, other: &mut Self) {
		let moved = other.len();
		let mut pos = other.tree.begin();
		while !pos.is_end() {
			pos = self.tree.relocate(pos, &mut other.tree);
		}
		trace!("multiset merge moved {} values", moved);
	}
}

impl<T: Ord> Emplace for Multiset<T> {
	type Item = T;
	type Outcome = Position<T>;

	fn emplace_one(&mut self, item: T) -> Self::Outcome { self.insert(item) }
}

impl<T> Default for Multiset<T> {
	fn default() -> Self { Self::new() }
}

impl<T: Debug> Debug for Multiset<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_list().entries(self.iter()).finish() }
}

impl<T: Ord + Clone> Clone for Multiset<T> {
	fn clone(&self) -> Self {
		Self {
			tree: self.tree.clone(),
		}
	}

	fn clone_from(&mut self, source: &Self) { self.tree.clone_from(&source.tree) }
}

impl<T: PartialEq> PartialEq for Multiset<T> {
	fn eq(&self, other: &Self) -> bool { self.tree == other.tree }
}

impl<T: Eq> Eq for Multiset<T> {}

impl<T: Ord> FromIterator<T> for Multiset<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self {
			tree: Tree::from_iter(iter),
		}
	}
}

impl<T: Ord> Extend<T> for Multiset<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) { self.tree.extend(iter) }
}

impl<T: Ord, const N: usize> From<[T; N]> for Multiset<T> {
	fn from(values: [T; N]) -> Self { Self::from_iter(values) }
}

impl<'a, T> IntoIterator for &'a Multiset<T> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<T: Ord> IntoIterator for Multiset<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter { self.tree.into_iter() }
}

#[cfg(test)]
mod tests {
	use super::Multiset;
	use crate::emplace;

	fn collect(set: &Multiset<i32>) -> Vec<i32> { set.iter().copied().collect() }

	#[test]
	fn test_keeps_duplicates() {
		let set = Multiset::from([1, 2, 2, 2, 3, 4, 5, 6]);
		assert_eq!(set.len(), 8);
		assert_eq!(collect(&set), vec![1, 2, 2, 2, 3, 4, 5, 6]);
	}

	#[test]
	fn test_equal_range() {
		let set = Multiset::from([1, 2, 2, 2, 3, 4, 5, 6]);
		let (mut pos, past_last) = set.equal_range(&2);
		let mut run: Vec<&i32> = Vec::new();
		while pos != past_last {
			run.extend(set.get(pos));
			pos = set.next(pos);
		}
		assert_eq!(run, vec![&2, &2, &2]);
		assert_eq!(set.get(past_last), Some(&3));
		assert_eq!(set.count(&2), 3);
		assert_eq!(set.count(&999), 0);
		assert_eq!(set.equal_range(&999), (set.end(), set.end()));
	}

	#[test]
	fn test_equal_range_after_successor_promotion() {
		// Shape: 5 at the root, a second 5 as 8's left child, a third 5 as 7's left child
		let mut set = Multiset::from([5, 3, 8, 5, 7, 9, 5]);
		assert_eq!(set.count(&5), 3);

		// Each erase hits the root, which has two children, so its successor moves up
		assert_eq!(set.erase(set.find(&5)), Some(5));
		set.tree.check_consistency();
		assert_eq!(set.count(&5), 2);
		let (first, past_last) = set.equal_range(&5);
		assert_eq!(set.get(first), Some(&5));
		assert_eq!(set.get(set.next(first)), Some(&5));
		assert_eq!(set.get(past_last), Some(&7));

		assert_eq!(set.erase(set.find(&5)), Some(5));
		set.tree.check_consistency();
		assert_eq!(set.count(&5), 1);
		assert_eq!(set.get(set.upper_bound(&5)), Some(&7));

		assert_eq!(set.erase(set.find(&5)), Some(5));
		assert_eq!(set.count(&5), 0);
		assert_eq!(set.equal_range(&5), (set.end(), set.end()));
		assert_eq!(collect(&set), vec![3, 7, 8, 9]);
	}

	#[test]
	fn test_bounds() {
		let set = Multiset::from([1, 2, 2, 3]);
		assert_eq!(set.get(set.lower_bound(&2)), Some(&2));
		assert_eq!(set.get(set.upper_bound(&2)), Some(&3));
		assert!(set.upper_bound(&3).is_end());
		assert!(set.lower_bound(&7).is_end());
	}

	#[test]
	fn test_equal_values_keep_insertion_order() {
		let mut set = Multiset::new();
		set.insert((1, 'a'));
		let first = set.find(&(1, 'a'));
		let second = set.insert((1, 'a'));
		// The later copy sits after the earlier one and find stops at the earlier one
		assert_eq!(set.next(first), second);
		assert_eq!(set.find(&(1, 'a')), first);
		assert_eq!(set.count(&(1, 'a')), 2);
	}

	#[test]
	fn test_merge_empties_source() {
		let mut set = Multiset::from([1, 2, 3, 4, 5, 6, 7, 8]);
		let mut other = Multiset::from([1, 2, 3, 4, 5, 6]);
		set.merge(&mut other);
		assert!(other.is_empty());
		assert_eq!(set.len(), 14);
		assert_eq!(set.count(&4), 2);
		assert_eq!(set.count(&8), 1);
		set.tree.check_consistency();
	}

	#[test]
	fn test_remove_takes_one_copy() {
		let mut set = Multiset::from([5, 5, 5]);
		assert!(set.remove(&5));
		assert_eq!(set.count(&5), 2);
		assert!(!set.remove(&6));
	}

	#[test]
	fn test_emplace() {
		let mut set = Multiset::from([1]);
		let positions = emplace!(set, 1, 0, 1);
		assert_eq!(positions.len(), 3);
		assert_eq!(set.get(positions[1]), Some(&0));
		assert_eq!(collect(&set), vec![0, 1, 1, 1]);
	}
}
