//! An ordered set of unique values.

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

pub struct Set<T> {
	tree: Tree<T>,
}

impl<T> Set<T> {
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

	pub fn clear(&mut self) { self.tree.clear() }

	pub fn swap(&mut self, other: &mut Self) { self.tree.swap(&mut other.tree) }

	pub fn move_from(&mut self, other: &mut Self) { self.tree.move_from(&mut other.tree) }
}

impl<T: Ord> Set<T> {
	pub fn insert(&mut self, value: T) -> (Position<T>, bool) {
		let existing = self.tree.find(&value);
		if !existing.is_end() {
			return (existing, false);
		}
		(self.tree.insert(value), true)
	}

	pub fn erase(&mut self, pos: Position<T>) -> Option<T> { self.tree.erase(pos) }

	pub fn remove<Q>(&mut self, value: &Q) -> bool
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.take(value).is_some()
	}

	pub fn take<Q>(&mut self, value: &Q) -> Option<T>
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let pos = self.tree.find(value);
		self.tree.erase(pos)
	}

	pub fn pop_first(&mut self) -> Option<T> { self.tree.pop_first() }

	pub fn pop_last(&mut self) -> Option<T> { self.tree.pop_last() }

	/// Moves every value of `other` that is missing from `self` over, without
	/// reallocating it. Values already present in `self` stay in `other`.
	pub fn merge(&mut self, other: &mut Self) {
		let (mut moved, mut kept) = (0usize, 0usize);
		let mut pos = other.tree.begin();
		while let Some(value) = other.tree.get(pos) {
			if self.tree.contains(value) {
				pos = other.tree.next(pos);
				kept += 1;
			}
			else {
				pos = self.tree.relocate(pos, &mut other.tree);
				moved += 1;
			}
		}
		trace!("set merge moved {} values, kept {} duplicates in source", moved, kept);
	}
}

impl<T: Ord> Emplace for Set<T> {
	type Item = T;
	type Outcome = (Position<T>, bool);

	fn emplace_one(&mut self, item: T) -> Self::Outcome { self.insert(item) }
}

impl<T> Default for Set<T> {
	fn default() -> Self { Self::new() }
}

impl<T: Debug> Debug for Set<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_set().entries(self.iter()).finish() }
}

impl<T: Ord + Clone> Clone for Set<T> {
	fn clone(&self) -> Self {
		Self {
			tree: self.tree.clone(),
		}
	}

	fn clone_from(&mut self, source: &Self) { self.tree.clone_from(&source.tree) }
}

impl<T: PartialEq> PartialEq for Set<T> {
	fn eq(&self, other: &Self) -> bool { self.tree == other.tree }
}

impl<T: Eq> Eq for Set<T> {}

/// Later duplicates in the input are dropped.
impl<T: Ord> FromIterator<T> for Set<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut set = Set::new();
		set.extend(iter);
		set
	}
}

impl<T: Ord> Extend<T> for Set<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for value in iter {
			self.insert(value);
		}
	}
}

impl<T: Ord, const N: usize> From<[T; N]> for Set<T> {
	fn from(values: [T; N]) -> Self { Self::from_iter(values) }
}

impl<'a, T> IntoIterator for &'a Set<T> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<T: Ord> IntoIterator for Set<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter { self.tree.into_iter() }
}

#[cfg(test)]
mod tests {
	use super::Set;
	use crate::{emplace, Emplace};

	fn collect(set: &Set<i32>) -> Vec<i32> { set.iter().copied().collect() }

	#[test]
	fn test_construction_drops_duplicates() {
		let set = Set::from([3, 1, 3, 2, 1]);
		assert_eq!(set.len(), 3);
		assert_eq!(collect(&set), vec![1, 2, 3]);
	}

	#[test]
	fn test_insert_reports_existing() {
		let mut set = Set::new();
		let (first, inserted) = set.insert(5);
		assert!(inserted);
		let (again, inserted) = set.insert(5);
		assert!(!inserted);
		assert_eq!(first, again);
		assert_eq!(set.get(again), Some(&5));
		assert_eq!(set.len(), 1);
	}

	#[test]
	fn test_erase_max_then_min() {
		let mut set = Set::from([1, 2, 3, 4, 5]);
		set.erase(set.prev(set.end()));
		assert_eq!(collect(&set), vec![1, 2, 3, 4]);
		set.erase(set.begin());
		assert_eq!(collect(&set), vec![2, 3, 4]);
	}

	#[test]
	fn test_remove_and_take() {
		let mut set: Set<String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
		assert!(set.remove("a"));
		assert!(!set.remove("a"));
		assert_eq!(set.take("c"), Some(String::from("c")));
		assert_eq!(set.len(), 1);
	}

	#[test]
	fn test_merge_keeps_duplicates_in_source() {
		let mut set = Set::from([1, 2, 3, 4, 5, 6]);
		let mut other = Set::from([1, 2, 3]);
		set.merge(&mut other);
		assert_eq!(set.len(), 6);
		assert_eq!(collect(&other), vec![1, 2, 3]);
	}

	#[test]
	fn test_merge_moves_missing_values() {
		let mut set = Set::from([2, 4, 6]);
		let mut other = Set::from([1, 2, 3, 4, 5]);
		set.merge(&mut other);
		assert_eq!(collect(&set), vec![1, 2, 3, 4, 5, 6]);
		assert_eq!(collect(&other), vec![2, 4]);
		set.tree.check_consistency();
		other.tree.check_consistency();
	}

	#[test]
	fn test_emplace_reports_in_argument_order() {
		let mut set = Set::from([2]);
		let outcomes = emplace!(set, 3, 2, 1, 3);
		let inserted: Vec<bool> = outcomes.iter().map(|(_, inserted)| *inserted).collect();
		assert_eq!(inserted, vec![true, false, true, false]);
		assert_eq!(set.get(outcomes[1].0), Some(&2));
		assert_eq!(collect(&set), vec![1, 2, 3]);
	}

	#[test]
	fn test_emplace_nothing() {
		let mut set = Set::from([1]);
		let outcomes = emplace!(set);
		assert!(outcomes.is_empty());
		assert!(set.emplace(Vec::new()).is_empty());
		assert_eq!(set.len(), 1);
	}

	#[test]
	fn test_move_and_clone() {
		let mut source = Set::from([1, 2, 3]);
		let mut target = Set::new();
		target.move_from(&mut source);
		assert!(source.is_empty());
		assert_eq!(collect(&target), vec![1, 2, 3]);

		let copy = target.clone();
		assert_eq!(copy, target);
	}
}
