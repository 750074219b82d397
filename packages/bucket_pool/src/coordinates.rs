use std::num::NonZero;

/// Splits a handle's linear slot index into block coordinates.
///
/// Block `i` has capacity `first << i`, so block `i` spans the linear indices
/// `[first * (2^i - 1), first * (2^(i+1) - 1))`. The split is pure arithmetic
/// on the linear index; it does not touch the bucket.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SlotCoordinates {
    /// The index of the block containing this slot.
    block_index: usize,

    /// The index within the block where this slot lives.
    index_in_block: usize,
}

impl SlotCoordinates {
    #[must_use]
    pub(crate) fn from_linear(index: usize, first_block_capacity: NonZero<usize>) -> Self {
        let first = first_block_capacity.get();

        // index / first + 1 lands in [2^i, 2^(i+1)) exactly when the slot
        // lies in block i, so the block index is the log2 of that quotient.
        let scaled = index
            .checked_div(first)
            .expect("first block capacity is non-zero")
            .checked_add(1)
            .expect("a bucket cannot have allocated usize::MAX slots, as each slot occupies at least one byte of memory");

        let block_index = usize::try_from(scaled.ilog2())
            .expect("log2 of a usize always fits in usize");

        let block_start = (1_usize
            .checked_shl(u32::try_from(block_index).expect("block index is a log2 of usize, so it fits in u32"))
            .expect("shifting by a log2 of usize cannot overflow")
            .checked_sub(1)
            .expect("a power of two is never zero"))
        .checked_mul(first)
        .expect("the block start precedes the slot's own linear index, which fits in usize");

        let index_in_block = index
            .checked_sub(block_start)
            .expect("a slot's linear index never precedes the start of its own block");

        Self {
            block_index,
            index_in_block,
        }
    }

    /// Returns the index of the block containing this slot.
    #[must_use]
    pub(crate) fn block_index(&self) -> usize {
        self.block_index
    }

    /// Returns the index within the block where this slot lives.
    #[must_use]
    pub(crate) fn index_in_block(&self) -> usize {
        self.index_in_block
    }
}
