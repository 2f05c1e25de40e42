use std::marker::PhantomData;

/// Zero-sized marker for type parameters an operator only consumes, such as
/// the input item type of `map`. Unlike a derived `PhantomData` field it is
/// `Clone` and `Default` whatever `T` is.
pub struct TypeHint<T>(PhantomData<fn() -> T>);

impl<T> TypeHint<T> {
  #[inline]
  pub fn new() -> Self { Self::default() }
}

impl<T> Default for TypeHint<T> {
  #[inline]
  fn default() -> Self { TypeHint(PhantomData) }
}

impl<T> Clone for TypeHint<T> {
  #[inline]
  fn clone(&self) -> Self { Self::new() }
}

impl<T> Copy for TypeHint<T> {}
