//! An object pool whose handles stay valid across unbounded growth.
//!
//! This crate provides [`Bucket<T>`], a container for same-type objects with
//! O(1) amortized insertion and O(1) removal, and [`Handle<T>`], a copyable
//! reference to one stored object. Storage grows by linking in doubling
//! allocation blocks rather than reallocating, so objects never move and
//! handles issued before any amount of growth keep working.
//!
//! # Features
//!
//! - **Stable addresses**: an occupied slot never relocates; growth acquires
//!   new blocks instead of moving old ones.
//! - **O(1) insert and erase**: no scanning, no shifting of neighbors.
//! - **Checked handle use**: stale, foreign, and sentinel handles are
//!   reported as [`Error`] values, never silently honored.
//! - **Insertion-order iteration**: forward and backward, skipping erased
//!   slots, stable across interleaved erases.
//! - **Memory locality**: objects sit densely in large blocks, not in
//!   per-node allocations.
//!
//! # Example
//!
//! ```rust
//! use bucket_pool::Bucket;
//!
//! let mut bucket = Bucket::new();
//!
//! let a = bucket.insert(1_u32);
//! let b = bucket.insert(2);
//! let c = bucket.insert(3);
//!
//! // Erasure consumes one slot and leaves the others untouched.
//! assert_eq!(bucket.erase(b)?, 2);
//! assert_eq!(bucket.iter().copied().collect::<Vec<_>>(), [1, 3]);
//!
//! // Handles survive any number of further inserts.
//! for n in 0..10_000 {
//!     _ = bucket.insert(n);
//! }
//! assert_eq!(bucket.get(a)?, &1);
//! assert_eq!(bucket.get(c)?, &3);
//! # Ok::<(), bucket_pool::Error>(())
//! ```
//!
//! # What this pool does not do
//!
//! Erased slots are not reoccupied and their memory is only released when the
//! bucket is dropped or cleared - a deliberate trade of reclamation for
//! simplicity and detectable stale handles. There is no internal
//! synchronization; share a bucket across threads the same way you would
//! share a `Vec`.

mod block;
mod bucket;
mod builder;
mod coordinates;
mod error;
mod handle;
mod iter;

pub use bucket::Bucket;
pub use builder::BucketBuilder;
pub use error::Error;
pub use handle::Handle;
pub use iter::{Iter, IterMut};
