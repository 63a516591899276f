//! Example demonstrating basic usage of `DedupPool`.
//!
//! Two parties independently construct equal content and end up sharing one
//! canonical instance.

use std::sync::Arc;

use dedup_pool::DedupPool;

fn main() {
    println!("=== DedupPool: One Instance Per Distinct Content ===");

    let pool = DedupPool::new();

    // Two subsystems each construct the same configuration payload.
    let first = pool.acquire("max_connections=512".to_string());
    let second = pool.acquire("max_connections=512".to_string());

    println!("First:  {first}");
    println!("Second: {second}");
    println!("Shared instance: {}", Arc::ptr_eq(&first, &second));
    println!("Entries stored: {}", pool.len());

    // Different content gets its own instance.
    let other = pool.acquire("max_connections=1024".to_string());
    println!("Other shares with first: {}", Arc::ptr_eq(&first, &other));
    println!("Entries stored: {}", pool.len());

    // The pool never keeps objects alive. Once the last strong reference is
    // gone, the next sweep forgets the entry.
    drop(first);
    drop(second);
    drop(other);
    println!("Before cleanup: {} entries", pool.len());
    pool.cleanup();
    println!("After cleanup:  {} entries", pool.len());
}
