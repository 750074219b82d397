use thiserror::Error;

/// A generic handle was narrowed to a type that does not match its active tag.
///
/// Narrowing is a routine probe - storage-agnostic code commonly tries a few
/// candidate types in turn - so the mismatch is reported as an ordinary error
/// value carrying both type names, never as a panic.
///
/// # Example
///
/// ```rust
/// use multi_store::multi_store;
///
/// multi_store! {
///     struct Store;
///     enum StoreHandle;
///     types {
///         Number(i64),
///         Label(String),
///     }
/// }
///
/// let mut store = Store::new();
/// let generic = StoreHandle::from(store.insert(5_i64));
///
/// let mismatch = generic.narrow::<String>().unwrap_err();
/// assert_eq!(mismatch.requested(), std::any::type_name::<String>());
/// assert_eq!(mismatch.actual(), std::any::type_name::<i64>());
/// ```
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("generic handle carries a {actual} handle, not a {requested} one")]
pub struct TypeMismatch {
    requested: &'static str,
    actual: &'static str,
}

impl TypeMismatch {
    /// Creates a mismatch report from the requested and actual type names.
    ///
    /// Called by the conversions that [`multi_store!`][crate::multi_store]
    /// generates; there is rarely a reason to construct one by hand.
    #[must_use]
    pub fn new(requested: &'static str, actual: &'static str) -> Self {
        Self { requested, actual }
    }

    /// The name of the type the caller asked for.
    #[must_use]
    pub fn requested(&self) -> &'static str {
        self.requested
    }

    /// The name of the type the handle actually carries.
    #[must_use]
    pub fn actual(&self) -> &'static str {
        self.actual
    }
}
