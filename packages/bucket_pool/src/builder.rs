use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZero;

use crate::Bucket;
use crate::bucket::DEFAULT_FIRST_BLOCK_CAPACITY;

/// Builder for creating an instance of [`Bucket`].
///
/// You only need the builder to customize the bucket configuration; the
/// default configuration used by [`Bucket::new()`][1] is sufficient for most
/// use cases.
///
/// # Examples
///
/// ```
/// use bucket_pool::Bucket;
/// use new_zealand::nz;
///
/// let bucket = Bucket::<u32>::builder()
///     .first_block_capacity(nz!(128))
///     .build();
/// ```
///
/// [1]: Bucket::new
#[must_use]
pub struct BucketBuilder<T> {
    first_block_capacity: NonZero<usize>,

    _item: PhantomData<T>,
}

impl<T> BucketBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            first_block_capacity: DEFAULT_FIRST_BLOCK_CAPACITY,
            _item: PhantomData,
        }
    }

    /// Sets the capacity, in slots, of the first allocation block.
    ///
    /// Every subsequent block doubles the capacity of the one before it, so
    /// this also determines the whole growth schedule. Small values waste
    /// little memory on small buckets at the cost of more allocations on the
    /// way up; large values do the opposite.
    pub fn first_block_capacity(mut self, capacity: NonZero<usize>) -> Self {
        self.first_block_capacity = capacity;
        self
    }

    /// Builds the bucket with the specified configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_pool::Bucket;
    ///
    /// let bucket = Bucket::<u32>::builder().build();
    /// ```
    #[must_use]
    pub fn build(self) -> Bucket<T> {
        Bucket::new_inner(self.first_block_capacity)
    }
}

impl<T> fmt::Debug for BucketBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketBuilder")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("first_block_capacity", &self.first_block_capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use new_zealand::nz;

    use super::*;

    #[test]
    fn configured_capacity_is_applied() {
        let bucket = Bucket::<u8>::builder()
            .first_block_capacity(nz!(3))
            .build();

        assert_eq!(bucket.first_block_capacity(), nz!(3));
    }

    #[test]
    fn default_capacity_matches_new() {
        let built = Bucket::<u8>::builder().build();
        let direct = Bucket::<u8>::new();

        assert_eq!(built.first_block_capacity(), direct.first_block_capacity());
    }
}
