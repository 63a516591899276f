//! Multi-threaded tests for `DedupPool`: racing acquisitions, cross-thread
//! visibility of canonical instances and maintenance running alongside use.

#![allow(clippy::indexing_slicing, reason = "panic is fine in tests")]

use std::iter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use dedup_pool::DedupPool;
use new_zealand::nz;

/// Test type whose identity is its payload; constructions are counted so tests can
/// observe how many candidates the racing threads actually built.
#[derive(Debug, Eq, Hash, PartialEq)]
struct Racer {
    payload: u64,
}

impl Racer {
    fn new(payload: u64, constructions: &AtomicUsize) -> Self {
        constructions.fetch_add(1, Ordering::Relaxed);
        Self { payload }
    }
}

#[test]
fn racing_acquisitions_converge_on_one_canonical_instance() {
    const THREADS: usize = 8;

    let pool = Arc::new(DedupPool::new());
    let constructions = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles = iter::repeat_with(|| {
        let pool = Arc::clone(&pool);
        let constructions = Arc::clone(&constructions);
        let barrier = Arc::clone(&barrier);

        thread::spawn(move || {
            barrier.wait();
            pool.acquire(Racer::new(42, &constructions))
        })
    })
    .take(THREADS)
    .collect::<Vec<_>>();

    let winners = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();

    // Every thread built its own candidate, but exactly one became canonical.
    assert_eq!(constructions.load(Ordering::Relaxed), THREADS);
    assert_eq!(pool.len(), 1);

    let canonical = &winners[0];
    assert!(winners.iter().all(|winner| Arc::ptr_eq(canonical, winner)));
}

#[test]
fn canonical_instance_is_visible_across_threads() {
    let pool = Arc::new(DedupPool::new());
    let canonical = pool.acquire("shared".to_string());

    let seen = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || pool.acquire("shared".to_string()))
            .join()
            .unwrap()
    };

    assert!(Arc::ptr_eq(&canonical, &seen));
}

#[test]
fn sustained_parallel_load_with_retention() {
    const THREADS: usize = 8;
    const ITERATIONS: usize = 200;
    const DISTINCT: usize = 50;

    let pool: Arc<DedupPool<usize>> = Arc::new(DedupPool::new());

    let handles = iter::repeat_with(|| {
        let pool = Arc::clone(&pool);

        thread::spawn(move || {
            (0..ITERATIONS)
                .map(|n| pool.acquire(n % DISTINCT))
                .collect::<Vec<_>>()
        })
    })
    .take(THREADS)
    .collect::<Vec<_>>();

    let retained = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();
    assert!(retained.iter().all(|acquired| acquired.len() == ITERATIONS));

    // Fifty distinct payloads, each stored once no matter how the threads interleaved.
    assert_eq!(pool.len(), DISTINCT);
    assert_eq!(pool.capacity(), 64);

    // Releasing everything lets repeated shrink passes walk capacity back down.
    drop(retained);
    pool.cleanup_shrink();
    pool.cleanup_shrink();
    pool.cleanup_shrink();
    assert_eq!(pool.len(), 0);
    assert_eq!(pool.capacity(), pool.min_capacity());
}

#[test]
fn churn_with_concurrent_maintenance() {
    const WORKERS: usize = 8;
    const ITERATIONS: u64 = 200;

    let pool: Arc<DedupPool<u64>> = Arc::new(DedupPool::builder().min_capacity(nz!(4)).build());

    let workers = iter::repeat_with(|| {
        let pool = Arc::clone(&pool);

        thread::spawn(move || {
            for n in 0..ITERATIONS {
                // Acquire and immediately release, leaving stale handles behind.
                drop(pool.acquire(n % 10));
            }
        })
    })
    .take(WORKERS)
    .collect::<Vec<_>>();

    let maintenance = {
        let pool = Arc::clone(&pool);

        thread::spawn(move || {
            for _ in 0..50 {
                pool.cleanup();
                pool.cleanup_shrink();
                thread::yield_now();
            }
        })
    };

    for worker in workers {
        worker.join().unwrap();
    }
    maintenance.join().unwrap();

    // Whatever interleaving occurred, invariants hold afterwards.
    pool.cleanup();
    assert_eq!(pool.len(), 0);
    assert!(pool.capacity() >= pool.min_capacity());

    // And the pool remains fully usable.
    let first = pool.acquire(7_u64);
    let second = pool.acquire(7_u64);
    assert!(Arc::ptr_eq(&first, &second));
}
