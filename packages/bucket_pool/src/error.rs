use thiserror::Error;

/// Errors reported when a handle is used in a way its bucket cannot honor.
///
/// All of these indicate a handle that is not currently usable. None of them
/// are ever silently ignored by the bucket; every operation that takes a
/// handle reports the failure to its immediate caller.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The handle is the invalid sentinel.
    ///
    /// A default-constructed handle starts in this state and never leaves it;
    /// it does not refer to any slot in any bucket.
    #[error("handle is the invalid sentinel and does not refer to any slot")]
    SentinelHandle,

    /// The handle was issued by a different bucket than the one it was used on.
    ///
    /// This also covers handles that outlived a [`clear()`][crate::Bucket::clear],
    /// because clearing re-issues the bucket identity.
    #[error("handle was issued by bucket {issued_by}, not by bucket {used_on}")]
    ForeignHandle {
        /// Identity of the bucket that issued the handle.
        issued_by: u64,

        /// Identity of the bucket the handle was used on.
        used_on: u64,
    },

    /// The slot the handle refers to was already erased.
    ///
    /// Slots are never reoccupied, so once a slot is erased every surviving
    /// copy of its handle reports this error forever.
    #[error("slot {index} was already erased")]
    SlotErased {
        /// Linear index of the erased slot within its bucket.
        index: usize,
    },
}

/// A specialized `Result` type for bucket handle operations, returning the
/// crate's [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
