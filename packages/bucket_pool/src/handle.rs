use std::any::type_name;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::num::NonZero;

/// A non-owning reference to one slot in one [`Bucket<T>`][crate::Bucket].
///
/// A handle is a plain value: it can be copied, stored, hashed, and compared
/// without any bearing on the referenced object. It performs no arithmetic -
/// the only things you can do with it are ask the issuing bucket for the
/// object ([`get()`][1], [`get_mut()`][2]), erase the object
/// ([`erase()`][3]), or check validity ([`is_valid()`][4]).
///
/// A handle stays usable across any number of inserts into the same bucket,
/// including those that grow the bucket's storage; it stops being usable only
/// when its slot is erased. Using a handle on a bucket that did not issue it
/// is detected and reported, never silently honored.
///
/// The default-constructed handle is the invalid sentinel: it refers to no
/// slot and every bucket rejects it.
///
/// # Example
///
/// ```rust
/// use bucket_pool::{Bucket, Handle};
///
/// let mut bucket = Bucket::new();
///
/// let handle = bucket.insert("payload".to_string());
/// assert!(bucket.is_valid(handle));
///
/// let sentinel = Handle::<String>::default();
/// assert!(sentinel.is_sentinel());
/// assert!(!bucket.is_valid(sentinel));
/// ```
///
/// [1]: crate::Bucket::get
/// [2]: crate::Bucket::get_mut
/// [3]: crate::Bucket::erase
/// [4]: crate::Bucket::is_valid
pub struct Handle<T> {
    /// Identity of the issuing bucket; `None` marks the sentinel.
    bucket: Option<NonZero<u64>>,

    /// Linear index of the slot within the issuing bucket.
    index: usize,

    _item: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    #[must_use]
    pub(crate) fn new(bucket: NonZero<u64>, index: usize) -> Self {
        Self {
            bucket: Some(bucket),
            index,
            _item: PhantomData,
        }
    }

    /// The invalid sentinel handle.
    ///
    /// Equivalent to `Handle::default()`; provided as an explicit name for
    /// the one handle value that never refers to a slot.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            bucket: None,
            index: 0,
            _item: PhantomData,
        }
    }

    /// Whether this handle is the invalid sentinel.
    ///
    /// This is an intrinsic check on the handle value alone. A non-sentinel
    /// handle may still be unusable (its slot may have been erased); ask the
    /// issuing bucket via [`is_valid()`][crate::Bucket::is_valid] for the
    /// authoritative answer.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.bucket.is_none()
    }

    #[must_use]
    pub(crate) fn bucket(&self) -> Option<NonZero<u64>> {
        self.bucket
    }

    #[must_use]
    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

// The manual implementations below exist so that handles are freely copyable
// and comparable regardless of what `T` itself supports.

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bucket == other.bucket && self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bucket.hash(state);
        self.index.hash(state);
    }
}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.bucket, self.index).cmp(&(other.bucket, other.index))
    }
}

impl<T> Default for Handle<T> {
    /// Creates the invalid sentinel handle.
    fn default() -> Self {
        Self::sentinel()
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Handle");
        debug.field("item_type", &format_args!("{}", type_name::<T>()));

        match self.bucket {
            Some(bucket) => debug.field("bucket", &bucket).field("index", &self.index),
            None => debug.field("state", &"sentinel"),
        }
        .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::rc::Rc;

    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;

    // Handles never touch the item, so they are thread-mobile and shareable
    // even when the item type is not.
    assert_impl_all!(Handle<Rc<u8>>: Send, Sync, Copy);

    #[test]
    fn default_is_sentinel() {
        let handle = Handle::<String>::default();

        assert!(handle.is_sentinel());
        assert_eq!(handle, Handle::sentinel());
    }

    #[test]
    fn issued_handles_compare_by_bucket_and_slot() {
        let first = Handle::<u32>::new(nz!(1), 0);
        let second = Handle::<u32>::new(nz!(1), 1);
        let foreign = Handle::<u32>::new(nz!(2), 0);

        assert_ne!(first, second);
        assert_ne!(first, foreign);
        assert_eq!(first, Handle::new(nz!(1), 0));
        assert!(first < second);
    }

    #[test]
    fn handles_are_hashable() {
        let mut set = HashSet::new();
        assert!(set.insert(Handle::<u32>::new(nz!(1), 0)));
        assert!(set.insert(Handle::<u32>::new(nz!(1), 1)));
        assert!(!set.insert(Handle::<u32>::new(nz!(1), 0)));
    }

    #[test]
    fn debug_names_the_item_type() {
        let handle = Handle::<String>::new(nz!(1), 3);
        let rendered = format!("{handle:?}");

        assert!(rendered.contains("String"));
        assert!(rendered.contains('3'));
    }
}
