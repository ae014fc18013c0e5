pub mod marker;

use crate::node::{Link, Node};
use core::{
	marker::PhantomData,
	ops::{Deref, DerefMut},
	ptr::NonNull,
};

// Typed pointer to a single tree node. The borrow marker decides what may be done
// through it: an Owned ref may be boxed and freed, Immut and Mut refs only borrow.
pub struct NodeRef<T, BorrowType> {
	pointer: NonNull<Node<T>>,
	_phantom: PhantomData<BorrowType>,
}

impl<'a, T> Copy for NodeRef<T, marker::Immut<'a>> {}
impl<'a, T> Clone for NodeRef<T, marker::Immut<'a>> {
	fn clone(&self) -> Self { *self }
}

impl<T, BorrowType: marker::BorrowType> NodeRef<T, BorrowType> {
	pub fn as_ptr(&self) -> NonNull<Node<T>> { self.pointer }
}

impl<T> NodeRef<T, marker::Owned> {
	pub fn from_boxed(node: Box<Node<T>>) -> Self {
		let pointer = NonNull::from(Box::leak(node));
		Self {
			pointer,
			_phantom: PhantomData,
		}
	}

	// SAFETY: pointer must come from from_boxed and must no longer be reachable from any tree
	pub unsafe fn from_detached(pointer: NonNull<Node<T>>) -> Self {
		Self {
			pointer,
			_phantom: PhantomData,
		}
	}

	pub fn into_boxed(self) -> Box<Node<T>> {
		// SAFETY: an Owned ref is the only handle to an allocation made by from_boxed
		unsafe { Box::from_raw(self.pointer.as_ptr()) }
	}

	// Hands ownership over to the tree that links the returned pointer
	pub fn into_linked(self) -> NonNull<Node<T>> { self.pointer }
}

impl<'a, T> NodeRef<T, marker::Immut<'a>> {
	// SAFETY: the node must stay alive and unmodified for 'a
	pub unsafe fn new(pointer: NonNull<Node<T>>) -> Self {
		Self {
			pointer,
			_phantom: PhantomData,
		}
	}

	// SAFETY: link targets share the lifetime of the tree that owns this node
	pub unsafe fn from_link(link: Link<T>) -> Option<Self> { link.map(|pointer| Self::new(pointer)) }

	pub fn into_ref(self) -> &'a Node<T> {
		// SAFETY: guaranteed by the contract of NodeRef::new
		unsafe { self.pointer.as_ref() }
	}
}

impl<'a, T> NodeRef<T, marker::Mut<'a>> {
	// SAFETY: the node must stay alive for 'a and nothing else may access it meanwhile
	pub unsafe fn new(pointer: NonNull<Node<T>>) -> Self {
		Self {
			pointer,
			_phantom: PhantomData,
		}
	}

	pub fn into_mut(mut self) -> &'a mut Node<T> {
		// SAFETY: guaranteed by the contract of NodeRef::new
		unsafe { self.pointer.as_mut() }
	}
}

impl<T> Deref for NodeRef<T, marker::Owned> {
	type Target = Node<T>;

	// SAFETY: an Owned ref is the only handle to a live node
	fn deref(&self) -> &Self::Target { unsafe { self.pointer.as_ref() } }
}

impl<T> DerefMut for NodeRef<T, marker::Owned> {
	// SAFETY: an Owned ref is the only handle to a live node
	fn deref_mut(&mut self) -> &mut Self::Target { unsafe { self.pointer.as_mut() } }
}
