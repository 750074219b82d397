//! Basic usage example for `Bucket`.
//!
//! Demonstrates insertion, handle-based access and erasure, growth that
//! leaves existing handles untouched, and insertion-order iteration.

use bucket_pool::{Bucket, Error};
use new_zealand::nz;

fn main() -> Result<(), Error> {
    // Start small so growth happens early.
    let mut bucket = Bucket::builder().first_block_capacity(nz!(4)).build();

    let first = bucket.insert("first".to_string());
    let second = bucket.insert("second".to_string());
    let third = bucket.insert("third".to_string());

    println!("Inserted 3 items, capacity {}", bucket.capacity());

    // Force several doublings; the old handles keep working.
    for n in 0..100 {
        _ = bucket.insert(format!("filler {n}"));
    }

    println!(
        "After growth to capacity {}: first = {:?}",
        bucket.capacity(),
        bucket.get(first)?
    );

    // Erase returns the removed value.
    let removed = bucket.erase(second)?;
    println!("Erased {removed:?}; the bucket now holds {} items", bucket.len());

    // Erased handles are reported, not honored.
    match bucket.get(second) {
        Ok(_) => unreachable!("the slot was just erased"),
        Err(error) => println!("Accessing the erased handle reports: {error}"),
    }

    // Iteration is in insertion order, skipping erased slots.
    let prefix: Vec<&str> = bucket.iter().take(3).map(String::as_str).collect();
    println!("First three live items: {prefix:?}");

    assert_eq!(prefix, ["first", "third", "filler 0"]);
    assert!(bucket.is_valid(third));

    Ok(())
}
