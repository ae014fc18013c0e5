//! An ordered map with unique keys.

use crate::{
	batch::Emplace,
	error::{Error, Result},
	tree::{self, Position, Tree},
};
use core::{
	borrow::Borrow,
	cmp::Ordering,
	fmt::{self, Debug},
	iter::{FromIterator, FusedIterator},
};
use log::trace;

/// A key with its mapped value, as stored in a [`Map`].
///
/// Entries compare by key alone, so the tree places them exactly where a key
/// lookup will search for them regardless of the mapped value.
#[derive(Clone)]
pub struct Entry<K, V> {
	key: K,
	value: V,
}

impl<K, V> Entry<K, V> {
	fn new(key: K, value: V) -> Self { Self { key, value } }

	pub fn key(&self) -> &K { &self.key }

	pub fn value(&self) -> &V { &self.value }

	pub fn into_pair(self) -> (K, V) { (self.key, self.value) }
}

impl<K: Ord, V> Ord for Entry<K, V> {
	fn cmp(&self, other: &Self) -> Ordering { self.key.cmp(&other.key) }
}

impl<K: Ord, V> PartialOrd for Entry<K, V> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl<K: Ord, V> PartialEq for Entry<K, V> {
	fn eq(&self, other: &Self) -> bool { self.key == other.key }
}

impl<K: Ord, V> Eq for Entry<K, V> {}

impl<K: Debug, V: Debug> Debug for Entry<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Entry").field(&self.key).field(&self.value).finish()
	}
}

pub type MapPosition<K, V> = Position<Entry<K, V>>;

pub struct Map<K, V> {
	tree: Tree<Entry<K, V>>,
}

impl<K, V> Map<K, V> {
	pub fn new() -> Self { Self { tree: Tree::new() } }

	pub fn len(&self) -> usize { self.tree.len() }

	pub fn is_empty(&self) -> bool { self.tree.is_empty() }

	pub fn max_size(&self) -> usize { self.tree.max_size() }

	pub fn begin(&self) -> MapPosition<K, V> { self.tree.begin() }

	pub fn end(&self) -> MapPosition<K, V> { self.tree.end() }

	pub fn next(&self, pos: MapPosition<K, V>) -> MapPosition<K, V> { self.tree.next(pos) }

	pub fn prev(&self, pos: MapPosition<K, V>) -> MapPosition<K, V> { self.tree.prev(pos) }

	pub fn get(&self, pos: MapPosition<K, V>) -> Option<(&K, &V)> {
		self.tree.get(pos).map(|entry| (&entry.key, &entry.value))
	}

	pub fn first(&self) -> Option<(&K, &V)> { self.get(self.begin()) }

	pub fn last(&self) -> Option<(&K, &V)> { self.get(self.prev(self.end())) }

	pub fn iter(&self) -> Iter<'_, K, V> { Iter { inner: self.tree.iter() } }

	pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
		self.iter().map(|(key, _)| key)
	}

	pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
		self.iter().map(|(_, value)| value)
	}

	pub fn cursor_front(&self) -> tree::Cursor<'_, Entry<K, V>> { self.tree.cursor_front() }

	pub fn find<Q>(&self, key: &Q) -> MapPosition<K, V>
	where
		K: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.tree.search_by(|entry| key.cmp(entry.key.borrow()))
	}

	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		!self.find(key).is_end()
	}

	pub fn at<Q>(&self, key: &Q) -> Result<&V>
	where
		K: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.tree
			.get(self.find(key))
			.map(|entry| &entry.value)
			.ok_or(Error::KeyNotFound)
	}

	pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
	where
		K: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let pos = self.find(key);
		self.tree
			.get_mut(pos)
			.map(|entry| &mut entry.value)
			.ok_or(Error::KeyNotFound)
	}

	pub fn clear(&mut self) { self.tree.clear() }

	pub fn swap(&mut self, other: &mut Self) { self.tree.swap(&mut other.tree) }

	pub fn move_from(&mut self, other: &mut Self) { self.tree.move_from(&mut other.tree) }
}

impl<K: Ord, V> Map<K, V> {
	/// Keeps the stored value when `key` is already present.
	pub fn insert(&mut self, key: K, value: V) -> (MapPosition<K, V>, bool) {
		let existing = self.find(&key);
		if !existing.is_end() {
			return (existing, false);
		}
		(self.tree.insert(Entry::new(key, value)), true)
	}

	/// Like [`insert`](Map::insert), but overwrites the mapped value in place when the
	/// key is already present.
	pub fn insert_or_assign(&mut self, key: K, value: V) -> (MapPosition<K, V>, bool) {
		let existing = self.find(&key);
		match self.tree.get_mut(existing) {
			Some(entry) => {
				entry.value = value;
				(existing, false)
			}
			None => (self.tree.insert(Entry::new(key, value)), true),
		}
	}

	/// The value under `key`, inserting `V::default()` first if the key is missing.
	pub fn get_or_insert_default(&mut self, key: K) -> &mut V
	where
		V: Default,
	{
		let pos = self.find(&key);
		&mut self.tree.value_or_insert(pos, || Entry::new(key, V::default())).value
	}

	pub fn erase(&mut self, pos: MapPosition<K, V>) -> Option<(K, V)> { self.tree.erase(pos).map(Entry::into_pair) }

	pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let pos = self.find(key);
		self.tree.erase(pos).map(|entry| entry.value)
	}

	/// Moves every entry of `other` whose key is missing from `self` over, without
	/// reallocating it. Entries with keys already present stay in `other`.
	pub fn merge(&mut self, other: &mut Self) {
		let (mut moved, mut kept) = (0usize, 0usize);
		let mut pos = other.tree.begin();
		while let Some(entry) = other.tree.get(pos) {
			if self.contains(&entry.key) {
				pos = other.tree.next(pos);
				kept += 1;
			}
			else {
				pos = self.tree.relocate(pos, &mut other.tree);
				moved += 1;
			}
		}
		trace!("map merge moved {} entries, kept {} duplicate keys in source", moved, kept);
	}
}

impl<K: Ord, V> Emplace for Map<K, V> {
	type Item = (K, V);
	type Outcome = (MapPosition<K, V>, bool);

	fn emplace_one(&mut self, (key, value): (K, V)) -> Self::Outcome { self.insert(key, value) }
}

impl<K, V> Default for Map<K, V> {
	fn default() -> Self { Self::new() }
}

impl<K: Debug, V: Debug> Debug for Map<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_map().entries(self.iter()).finish() }
}

impl<K: Ord + Clone, V: Clone> Clone for Map<K, V> {
	fn clone(&self) -> Self {
		Self {
			tree: self.tree.clone(),
		}
	}

	fn clone_from(&mut self, source: &Self) { self.tree.clone_from(&source.tree) }
}

// Compares mapped values too, unlike Entry's own equality
impl<K: PartialEq, V: PartialEq> PartialEq for Map<K, V> {
	fn eq(&self, other: &Self) -> bool { self.len() == other.len() && self.iter().eq(other.iter()) }
}

impl<K: Eq, V: Eq> Eq for Map<K, V> {}

/// For repeated keys the first value wins.
impl<K: Ord, V> FromIterator<(K, V)> for Map<K, V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut map = Map::new();
		map.extend(iter);
		map
	}
}

impl<K: Ord, V> Extend<(K, V)> for Map<K, V> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for Map<K, V> {
	fn from(pairs: [(K, V); N]) -> Self { Self::from_iter(pairs) }
}

impl<'a, K, V> IntoIterator for &'a Map<K, V> {
	type Item = (&'a K, &'a V);
	type IntoIter = Iter<'a, K, V>;

	fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<K: Ord, V> IntoIterator for Map<K, V> {
	type Item = (K, V);
	type IntoIter = IntoIter<K, V>;

	fn into_iter(self) -> Self::IntoIter {
		IntoIter {
			inner: self.tree.into_iter(),
		}
	}
}

pub struct Iter<'a, K, V> {
	inner: tree::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
	type Item = (&'a K, &'a V);

	fn next(&mut self) -> Option<Self::Item> { self.inner.next().map(|entry| (&entry.key, &entry.value)) }

	fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
	fn next_back(&mut self) -> Option<Self::Item> { self.inner.next_back().map(|entry| (&entry.key, &entry.value)) }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

pub struct IntoIter<K: Ord, V> {
	inner: tree::IntoIter<Entry<K, V>>,
}

impl<K: Ord, V> Iterator for IntoIter<K, V> {
	type Item = (K, V);

	fn next(&mut self) -> Option<(K, V)> { self.inner.next().map(Entry::into_pair) }

	fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl<K: Ord, V> DoubleEndedIterator for IntoIter<K, V> {
	fn next_back(&mut self) -> Option<(K, V)> { self.inner.next_back().map(Entry::into_pair) }
}

impl<K: Ord, V> ExactSizeIterator for IntoIter<K, V> {}
