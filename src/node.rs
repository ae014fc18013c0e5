use crate::node_ref::{marker, NodeRef};
use core::ptr::NonNull;

// Navigation link. Links never own: a node is owned by the tree whose root reaches it.
pub type Link<T> = Option<NonNull<Node<T>>>;

pub struct Node<T> {
	pub parent: Link<T>,
	pub left: Link<T>,
	pub right: Link<T>,
	pub value: T,
}

impl<T> Node<T> {
	pub fn allocate(value: T) -> NodeRef<T, marker::Owned> {
		NodeRef::from_boxed(Box::new(Self {
			parent: None,
			left: None,
			right: None,
			value,
		}))
	}

	pub fn unlink(&mut self) {
		self.parent = None;
		self.left = None;
		self.right = None;
	}

	pub fn is_leaf(&self) -> bool { self.left.is_none() && self.right.is_none() }
}

// SAFETY: for all functions below, node must be a live node whose links are consistent

pub unsafe fn minimum<T>(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
	while let Some(left) = node.as_ref().left {
		node = left;
	}
	node
}

pub unsafe fn maximum<T>(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
	while let Some(right) = node.as_ref().right {
		node = right;
	}
	node
}

pub unsafe fn successor<T>(node: NonNull<Node<T>>) -> Link<T> {
	if let Some(right) = node.as_ref().right {
		return Some(minimum(right));
	}

	// Climb while we are a right child - the first ancestor reached from its left is next
	let mut child = node;
	let mut ancestor = node.as_ref().parent;
	while let Some(parent) = ancestor {
		if parent.as_ref().right != Some(child) {
			break;
		}
		child = parent;
		ancestor = parent.as_ref().parent;
	}
	ancestor
}

pub unsafe fn predecessor<T>(node: NonNull<Node<T>>) -> Link<T> {
	if let Some(left) = node.as_ref().left {
		return Some(maximum(left));
	}

	let mut child = node;
	let mut ancestor = node.as_ref().parent;
	while let Some(parent) = ancestor {
		if parent.as_ref().left != Some(child) {
			break;
		}
		child = parent;
		ancestor = parent.as_ref().parent;
	}
	ancestor
}
