//! Example demonstrating a custom identity strategy.
//!
//! HTTP header names are case-insensitive, so a pool of canonical header names
//! should treat "Content-Type" and "content-type" as the same content.

use std::hash::BuildHasher;
use std::sync::{Arc, Weak};

use dedup_pool::{DedupPool, EXPIRED_HASH, HandleIdentity};
use foldhash::fast::FixedState;

/// Treats header names that differ only in ASCII case as equal content.
#[derive(Debug)]
struct HeaderNameIdentity;

impl HandleIdentity<String> for HeaderNameIdentity {
    fn hash(handle: &Weak<String>) -> u64 {
        handle.upgrade().map_or(EXPIRED_HASH, |name| {
            FixedState::default().hash_one(name.to_ascii_lowercase())
        })
    }

    fn eq(left: &Weak<String>, right: &Weak<String>) -> bool {
        match (left.upgrade(), right.upgrade()) {
            (Some(left), Some(right)) => left.eq_ignore_ascii_case(&right),
            _ => false,
        }
    }
}

fn main() {
    println!("=== DedupPool: Custom Identity Strategy ===");

    let pool: DedupPool<String, HeaderNameIdentity> = DedupPool::builder().build();

    let canonical = pool.acquire("Content-Type".to_string());
    let variant = pool.acquire("content-type".to_string());
    let other = pool.acquire("Accept".to_string());

    // The first spelling to arrive becomes the canonical one.
    println!("Canonical: {canonical}");
    println!("Variant resolves to: {variant}");
    println!("Same instance: {}", Arc::ptr_eq(&canonical, &variant));
    println!("Other header is distinct: {}", !Arc::ptr_eq(&canonical, &other));
    println!("Entries stored: {}", pool.len());
}
