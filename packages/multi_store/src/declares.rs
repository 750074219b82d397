use bucket_pool::Bucket;

/// The compile-time mapping between a store and one of its declared types.
///
/// A store composed with [`multi_store!`][crate::multi_store] implements
/// `Declares<T>` once for every type in its declaration list. The
/// implementation fixes, for the lifetime of the store type:
///
/// - [`TYPE_INDEX`][Self::TYPE_INDEX] - the type's position in declaration
///   order, a bijection onto `0..TYPE_COUNT`;
/// - which bucket field stores values of `T`.
///
/// Declaring the same type twice would generate two conflicting
/// implementations, so duplicates are rejected when the store is composed.
/// Asking a store for a type it does not declare fails to compile for the
/// same reason: the `Self: Declares<T>` bound on every typed operation is
/// unsatisfiable.
///
/// You normally do not use this trait directly - the typed methods on the
/// generated store are the intended surface - but it is the bound to write
/// when code must be generic over "any store that can hold a `T`":
///
/// ```rust
/// use multi_store::{Declares, Handle};
///
/// fn stash<S: Declares<String>>(store: &mut S, value: String) -> Handle<String> {
///     store.bucket_mut().insert(value)
/// }
/// ```
pub trait Declares<T> {
    /// The type's position in the store's declaration order.
    const TYPE_INDEX: usize;

    /// Borrows the bucket that stores values of `T`.
    fn bucket(&self) -> &Bucket<T>;

    /// Exclusively borrows the bucket that stores values of `T`.
    fn bucket_mut(&mut self) -> &mut Bucket<T>;
}
