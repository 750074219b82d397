use std::any::type_name;
use std::fmt;
use std::num::NonZero;
use std::sync::atomic::{AtomicU64, Ordering};

use new_zealand::nz;

use crate::block::{Block, Slot};
use crate::coordinates::SlotCoordinates;
use crate::error::{Error, Result};
use crate::{BucketBuilder, Handle, Iter, IterMut};

/// Default capacity of a bucket's first allocation block, in slots.
pub(crate) const DEFAULT_FIRST_BLOCK_CAPACITY: NonZero<usize> = nz!(16);

/// Source of process-unique bucket identities.
///
/// Identities are embedded in issued handles so that a handle presented to
/// the wrong bucket is rejected instead of silently reading another object.
static NEXT_BUCKET_ID: AtomicU64 = AtomicU64::new(1);

#[must_use]
fn next_bucket_id() -> NonZero<u64> {
    let id = NEXT_BUCKET_ID.fetch_add(1, Ordering::Relaxed);

    NonZero::new(id).expect(
        "the identity counter starts at 1 and cannot wrap within any realistic process lifetime",
    )
}

/// An object pool for values of one type, with handles that stay usable
/// across unbounded growth.
///
/// Inserting returns a [`Handle<T>`] for the new object. Handles are the only
/// way to reach an object again: dereference through [`get()`][1] /
/// [`get_mut()`][2], remove through [`erase()`][3]. Both insertion and
/// erasure are O(1) and neither ever moves another object.
///
/// # Growth without relocation
///
/// Storage is carved from a chain of allocation blocks. The first block holds
/// a fixed number of slots (16 by default, configurable via
/// [`builder()`][4]); when the active block is exhausted, a new block of
/// double the previous capacity is linked in. Occupied slots keep their
/// original block and address, so growth never invalidates an outstanding
/// handle - the property that distinguishes this pool from index-into-vector
/// designs, whose reallocation moves every element.
///
/// Erased slots are not reoccupied and their memory is returned to the
/// allocator only when the bucket itself is dropped or cleared. That is a
/// deliberate trade: it keeps erasure O(1), keeps iteration in insertion
/// order, and makes every stale handle detectable.
///
/// # Iteration
///
/// [`iter()`][5] and [`iter_mut()`][6] walk the live objects in insertion
/// order, from either end. Erasing an object never reorders the rest.
///
/// # Thread safety
///
/// The bucket has no internal synchronization. It is `Send`/`Sync` exactly
/// when `T` is, like any plain container; concurrent mutation must be
/// serialized by the caller (wrap it in a `Mutex` or keep it on one thread).
///
/// # Example
///
/// ```rust
/// use bucket_pool::Bucket;
///
/// let mut bucket = Bucket::new();
///
/// let first = bucket.insert("one".to_string());
/// let second = bucket.insert("two".to_string());
///
/// assert_eq!(bucket.len(), 2);
/// assert_eq!(bucket.get(first)?, "one");
///
/// let erased = bucket.erase(first)?;
/// assert_eq!(erased, "one");
/// assert_eq!(bucket.len(), 1);
///
/// // The erased handle is dead; the other survives untouched.
/// assert!(!bucket.is_valid(first));
/// assert_eq!(bucket.get(second)?, "two");
/// # Ok::<(), bucket_pool::Error>(())
/// ```
///
/// [1]: Self::get
/// [2]: Self::get_mut
/// [3]: Self::erase
/// [4]: Self::builder
/// [5]: Self::iter
/// [6]: Self::iter_mut
pub struct Bucket<T> {
    /// Allocation blocks in age order; block `i` holds `first << i` slots.
    blocks: Vec<Block<T>>,

    /// Capacity of the first (oldest) block.
    first_block_capacity: NonZero<usize>,

    /// Slots ever handed out; also the linear index of the next insert.
    allocated: usize,

    /// Currently occupied slots, maintained incrementally.
    len: usize,

    /// Identity embedded in issued handles.
    id: NonZero<u64>,
}

impl<T> Bucket<T> {
    /// Creates a bucket with the default configuration.
    ///
    /// The bucket starts with no allocation; the first block is acquired on
    /// the first insert.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_pool::Bucket;
    ///
    /// let mut bucket = Bucket::<u32>::new();
    ///
    /// assert!(bucket.is_empty());
    /// assert_eq!(bucket.capacity(), 0);
    ///
    /// _ = bucket.insert(42);
    /// assert!(bucket.capacity() > 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a bucket with a custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_pool::Bucket;
    /// use new_zealand::nz;
    ///
    /// let bucket = Bucket::<u32>::builder()
    ///     .first_block_capacity(nz!(64))
    ///     .build();
    ///
    /// assert!(bucket.is_empty());
    /// ```
    pub fn builder() -> BucketBuilder<T> {
        BucketBuilder::new()
    }

    #[must_use]
    pub(crate) fn new_inner(first_block_capacity: NonZero<usize>) -> Self {
        Self {
            blocks: Vec::new(),
            first_block_capacity,
            allocated: 0,
            len: 0,
            id: next_bucket_id(),
        }
    }

    /// The number of live objects in the bucket.
    ///
    /// Maintained incrementally; this never scans the storage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the bucket holds no live objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of slots the bucket has acquired from the allocator.
    ///
    /// This counts erased slots too: slot storage is only released when the
    /// bucket is dropped or [cleared][Self::clear].
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.blocks.iter().fold(0_usize, |total, block| {
            total
                .checked_add(block.capacity())
                .expect("total slot capacity is bounded by what the allocator already provided")
        })
    }

    /// The capacity of the first allocation block, in slots.
    ///
    /// Each subsequent block doubles the capacity of the one before it.
    #[must_use]
    pub fn first_block_capacity(&self) -> NonZero<usize> {
        self.first_block_capacity
    }

    /// Inserts a value at the logical end of the sequence and returns its
    /// handle.
    ///
    /// Amortized O(1). May acquire a new allocation block; never moves or
    /// invalidates any existing object or handle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_pool::Bucket;
    ///
    /// let mut bucket = Bucket::new();
    ///
    /// let handle = bucket.insert(7_u32);
    ///
    /// assert_eq!(bucket.get(handle)?, &7);
    /// # Ok::<(), bucket_pool::Error>(())
    /// ```
    #[must_use]
    pub fn insert(&mut self, value: T) -> Handle<T> {
        let coordinates = SlotCoordinates::from_linear(self.allocated, self.first_block_capacity);

        if coordinates.block_index() == self.blocks.len() {
            self.grow();
        }

        let block = self
            .blocks
            .get_mut(coordinates.block_index())
            .expect("the insertion cursor always lands in an existing block after growth");

        block.fill(coordinates.index_in_block(), value);

        let handle = Handle::new(self.id, self.allocated);

        self.allocated = self
            .allocated
            .checked_add(1)
            .expect("slot count is bounded by addressable memory");
        self.len = self
            .len
            .checked_add(1)
            .expect("live count is bounded by the slot count");

        handle
    }

    /// Links in a new block of double the newest block's capacity.
    fn grow(&mut self) {
        let capacity = 1_usize
            .checked_shl(
                u32::try_from(self.blocks.len())
                    .expect("the block count is bounded by the bit width of usize"),
            )
            .and_then(|doubling| doubling.checked_mul(self.first_block_capacity.get()))
            .expect("the previous blocks could not all have been exhausted without the new capacity fitting in usize");

        self.blocks.push(Block::new(capacity));
    }

    /// Removes the object the handle refers to, returning it.
    ///
    /// O(1); no other slot is shifted or relocated. The slot is never
    /// reoccupied, so the consumed handle (and any copy of it) reports
    /// [`Error::SlotErased`] from now on.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is the sentinel, was issued by a
    /// different bucket, or refers to an already-erased slot. The bucket is
    /// unchanged in every error case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_pool::{Bucket, Error};
    ///
    /// let mut bucket = Bucket::new();
    /// let handle = bucket.insert(5_i64);
    ///
    /// assert_eq!(bucket.erase(handle)?, 5);
    ///
    /// // Erasing twice is reported, not undefined.
    /// assert_eq!(bucket.erase(handle), Err(Error::SlotErased { index: 0 }));
    /// # Ok::<(), bucket_pool::Error>(())
    /// ```
    pub fn erase(&mut self, handle: Handle<T>) -> Result<T> {
        let coordinates = self.locate(handle)?;

        let block = self
            .blocks
            .get_mut(coordinates.block_index())
            .expect("a handle with this bucket's identity always refers to an existing block");

        let value = block
            .take(coordinates.index_in_block())
            .ok_or(Error::SlotErased {
                index: handle.index(),
            })?;

        self.len = self
            .len
            .checked_sub(1)
            .expect("an occupied slot implies a non-zero live count");

        Ok(value)
    }

    /// Dereferences a handle to a shared reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is the sentinel, was issued by a
    /// different bucket, or refers to an already-erased slot.
    pub fn get(&self, handle: Handle<T>) -> Result<&T> {
        let coordinates = self.locate(handle)?;

        match self.block(coordinates.block_index()).slot(coordinates.index_in_block()) {
            Slot::Occupied(value) => Ok(value),
            Slot::Free => Err(Error::SlotErased {
                index: handle.index(),
            }),
        }
    }

    /// Dereferences a handle to an exclusive reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is the sentinel, was issued by a
    /// different bucket, or refers to an already-erased slot.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Result<&mut T> {
        let coordinates = self.locate(handle)?;

        let block = self
            .blocks
            .get_mut(coordinates.block_index())
            .expect("a handle with this bucket's identity always refers to an existing block");

        match block.slot_mut(coordinates.index_in_block()) {
            Slot::Occupied(value) => Ok(value),
            Slot::Free => Err(Error::SlotErased {
                index: handle.index(),
            }),
        }
    }

    /// Whether the handle currently refers to a live object in this bucket.
    ///
    /// False for the sentinel, for handles issued by other buckets, and for
    /// handles whose slot has been erased.
    #[must_use]
    pub fn is_valid(&self, handle: Handle<T>) -> bool {
        match self.locate(handle) {
            Ok(coordinates) => matches!(
                self.block(coordinates.block_index()).slot(coordinates.index_in_block()),
                Slot::Occupied(_)
            ),
            Err(_) => false,
        }
    }

    /// Iterates the live objects in insertion order.
    ///
    /// The iterator is double-ended and exact-sized. Objects erased earlier
    /// are skipped; the remaining objects appear in their original relative
    /// order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_pool::Bucket;
    ///
    /// let mut bucket = Bucket::new();
    /// let a = bucket.insert('a');
    /// _ = bucket.insert('b');
    /// _ = bucket.insert('c');
    ///
    /// _ = bucket.erase(a)?;
    ///
    /// let forward: Vec<char> = bucket.iter().copied().collect();
    /// assert_eq!(forward, ['b', 'c']);
    ///
    /// let backward: Vec<char> = bucket.iter().rev().copied().collect();
    /// assert_eq!(backward, ['c', 'b']);
    /// # Ok::<(), bucket_pool::Error>(())
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.blocks, self.len)
    }

    /// Iterates the live objects in insertion order with exclusive access.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(&mut self.blocks, self.len)
    }

    /// Drops every live object and releases all allocation blocks.
    ///
    /// The bucket re-issues its identity when cleared, so every handle issued
    /// before the clear is rejected as foreign afterwards - a cleared slot
    /// address is never silently re-associated with a new object.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.allocated = 0;
        self.len = 0;
        self.id = next_bucket_id();
    }

    /// Validates the handle's provenance and resolves its block coordinates.
    fn locate(&self, handle: Handle<T>) -> Result<SlotCoordinates> {
        let issued_by = handle.bucket().ok_or(Error::SentinelHandle)?;

        if issued_by != self.id {
            return Err(Error::ForeignHandle {
                issued_by: issued_by.get(),
                used_on: self.id.get(),
            });
        }

        debug_assert!(
            handle.index() < self.allocated,
            "a handle carrying this bucket's identity refers to an unallocated slot"
        );

        Ok(SlotCoordinates::from_linear(
            handle.index(),
            self.first_block_capacity,
        ))
    }

    #[must_use]
    fn block(&self, index: usize) -> &Block<T> {
        self.blocks
            .get(index)
            .expect("a handle with this bucket's identity always refers to an existing block")
    }
}

impl<T> Default for Bucket<T> {
    /// Creates a bucket with the default configuration.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Bucket<T> {
    /// Clones the live objects into a fresh bucket.
    ///
    /// The clone has its own identity: handles into the original do not
    /// resolve against the clone (they are rejected as foreign), exactly as
    /// if the objects had been inserted into a brand-new bucket one by one.
    /// Erased slots are not reproduced.
    fn clone(&self) -> Self {
        let mut clone = Self::builder()
            .first_block_capacity(self.first_block_capacity)
            .build();

        for value in self {
            _ = clone.insert(value.clone());
        }

        clone
    }
}

impl<T> fmt::Debug for Bucket<T> {
    #[cfg_attr(test, mutants::skip)] // Display-only logic, mutation is meaningless.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<'b, T> IntoIterator for &'b Bucket<T> {
    type Item = &'b T;
    type IntoIter = Iter<'b, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'b, T> IntoIterator for &'b mut Bucket<T> {
    type Item = &'b mut T;
    type IntoIter = IterMut<'b, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
