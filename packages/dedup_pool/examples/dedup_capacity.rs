//! Example demonstrating how `DedupPool` reserved capacity follows the live
//! population through the grow and shrink watermarks.

use dedup_pool::DedupPool;
use new_zealand::nz;

fn main() {
    println!("=== DedupPool: Adaptive Capacity ===");

    let pool: DedupPool<u64> = DedupPool::builder().min_capacity(nz!(4)).build();
    println!("Starting capacity: {}", pool.capacity());

    // Hold strong references so the population actually grows; capacity
    // doubles whenever an acquisition finds the pool nearly full.
    let mut held = Vec::new();
    for n in 0..10 {
        held.push(pool.acquire(n));
        println!("live = {:2}, capacity = {:2}", pool.len(), pool.capacity());
    }

    // Release most of the population. Each shrink pass halves capacity at
    // most once, so walking back down takes several passes.
    held.truncate(2);
    pool.cleanup_shrink();
    println!(
        "After one shrink pass:  live = {}, capacity = {}",
        pool.len(),
        pool.capacity()
    );
    pool.cleanup_shrink();
    println!(
        "After another:          live = {}, capacity = {}",
        pool.len(),
        pool.capacity()
    );
}
