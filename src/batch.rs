//! Inserting several values in one call.

/// Containers that accept a batch of values, inserting them one at a time in the
/// order given.
pub trait Emplace {
	type Item;
	/// What a single insertion reports back.
	type Outcome;

	fn emplace_one(&mut self, item: Self::Item) -> Self::Outcome;

	/// Inserts every item in order and returns the per-item outcomes in that same
	/// order. An empty batch leaves the container untouched.
	fn emplace<I>(&mut self, items: I) -> Vec<Self::Outcome>
	where
		I: IntoIterator<Item = Self::Item>,
	{
		let items = items.into_iter();
		let mut outcomes = Vec::with_capacity(items.size_hint().0);
		for item in items {
			outcomes.push(self.emplace_one(item));
		}
		outcomes
	}
}

/// Inserts each argument into the container, in argument order, and returns the
/// outcomes as a `Vec`.
///
/// ```
/// use bst_collections::{emplace, Set};
///
/// let mut set = Set::from([2]);
/// let outcomes = emplace!(set, 1, 2, 3);
/// assert_eq!(outcomes.iter().map(|(_, inserted)| *inserted).collect::<Vec<_>>(), [true, false, true]);
/// assert_eq!(set.len(), 3);
/// ```
#[macro_export]
macro_rules! emplace {
	($container:expr $(, $item:expr)* $(,)?) => {
		$crate::Emplace::emplace(&mut $container, [$($item),*])
	};
}
