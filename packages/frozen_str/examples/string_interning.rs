//! Example demonstrating string interning with `FrozenStrPool`.
//!
//! A stream of log records repeats the same few message templates over and
//! over; interning stores each distinct template once.

use std::sync::Arc;

use frozen_str::{FrozenStr, FrozenStrPool, SharedStr, TrimPolicy};

fn main() {
    println!("=== FrozenStrPool: Log Template Interning ===");

    let pool = FrozenStrPool::new();

    // Incoming records, with the inconsistent padding real inputs have.
    let records = [
        "connection reset by peer",
        "  connection reset by peer",
        "request timed out",
        "connection reset by peer  ",
        "request timed out",
        "disk quota exceeded",
    ];

    let mut interned: Vec<SharedStr> = Vec::new();
    for record in records {
        interned.push(pool.acquire(FrozenStr::new(record, TrimPolicy::Trim)));
    }

    println!("Records processed: {}", interned.len());
    println!("Distinct templates stored: {}", pool.len());

    // Every "connection reset" record shares one canonical string.
    let resets = interned
        .iter()
        .filter(|text| text.as_str() == "connection reset by peer")
        .collect::<Vec<_>>();
    let first = resets.first().expect("sample contains reset records");
    let all_shared = resets.iter().all(|text| Arc::ptr_eq(first, text));
    println!("Reset records share one instance: {all_shared}");

    // Hashes are cached on the canonical instances, so repeated map lookups
    // by template are cheap.
    for text in &interned {
        let _hash = text.content_hash();
    }

    // Dropping the interned references releases the templates; the pool
    // never owned them.
    drop(interned);
    pool.cleanup();
    println!("Templates after release: {}", pool.len());
}
