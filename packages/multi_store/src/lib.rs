//! A multi-type object store with one stable-handle bucket per declared type
//! and a type-erased handle that narrows back to its typed form.
//!
//! This crate layers on [`bucket_pool`]: the [`multi_store!`] macro composes
//! a store struct holding one [`Bucket<T>`] per type in a fixed declaration
//! list, resolves every typed operation to the right bucket at compile time,
//! and generates a closed tagged-union handle enum for code that must carry
//! handles without knowing their types.
//!
//! # Features
//!
//! - **Fixed type set**: the declared types and their indices are frozen when
//!   the store type is composed; duplicates and undeclared types are rejected
//!   at compile time.
//! - **Typed operations**: `insert`, `erase`, `get`, iteration and views are
//!   resolved per type through the [`Declares`] mapping, with no runtime type
//!   lookup.
//! - **Type-erased handles**: the generated enum wraps any typed handle
//!   implicitly and narrows back with a result, reporting [`TypeMismatch`]
//!   instead of panicking.
//! - **Per-type iteration only**: objects of different types share no layout
//!   and are not stored together, so there is deliberately no
//!   iterate-everything operation.
//!
//! # Example
//!
//! ```rust
//! use multi_store::multi_store;
//!
//! multi_store! {
//!     /// Everything one simulation tick operates on.
//!     pub struct World;
//!     /// A handle to any object in a [`World`].
//!     pub enum WorldHandle;
//!     types {
//!         Position((f32, f32)),
//!         Name(String),
//!     }
//! }
//!
//! let mut world = World::new();
//!
//! let position = world.insert((1.0_f32, 2.0_f32));
//! let name = world.insert("probe".to_string());
//!
//! assert_eq!(world.len(), 2);
//! assert_eq!(world.len_of::<String>(), 1);
//!
//! // Erased handles travel through storage-agnostic code...
//! let erased: Vec<WorldHandle> = vec![position.into(), name.into()];
//!
//! // ...and narrow back to typed handles where the type is known again.
//! for handle in &erased {
//!     if let Ok(position) = handle.narrow::<(f32, f32)>() {
//!         assert_eq!(world.get(position)?, &(1.0, 2.0));
//!     }
//! }
//!
//! // Per-type traversal with ordinary `for` syntax.
//! for name in world.view::<String>() {
//!     assert_eq!(name, "probe");
//! }
//! # Ok::<(), multi_store::BucketError>(())
//! ```
//!
//! # What belongs where
//!
//! The bucket crate owns everything about storing one type: growth, handle
//! validity, iteration order. This crate owns only the multiplexing: the
//! type-to-bucket mapping, the erased handle, and the per-type views. Bucket
//! errors pass through unchanged as [`BucketError`].

mod declares;
mod error;
mod macros;
mod view;

pub use bucket_pool::{Bucket, BucketBuilder, Error as BucketError, Handle, Iter, IterMut};
pub use declares::Declares;
pub use error::TypeMismatch;
pub use view::{TypedView, TypedViewMut};

#[doc(hidden)]
pub mod __private {
    pub use paste::paste;
}
