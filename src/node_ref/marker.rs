use std::marker::PhantomData;

pub trait BorrowType {}

// Sole owner of a node that no tree links to
pub enum Owned {}
pub struct Immut<'a>(PhantomData<&'a ()>);
pub struct Mut<'a>(PhantomData<&'a mut ()>);

impl BorrowType for Owned {}
impl BorrowType for Immut<'_> {}
impl BorrowType for Mut<'_> {}
