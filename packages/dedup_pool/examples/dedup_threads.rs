//! Example demonstrating `DedupPool` shared across threads.
//!
//! Eight workers race to acquire equal content; every one of them ends up
//! holding the same canonical instance.

use std::sync::Arc;
use std::thread;

use dedup_pool::DedupPool;

fn main() {
    println!("=== DedupPool: Racing Acquisitions ===");

    let pool = Arc::new(DedupPool::new());

    let workers = (0..8)
        .map(|worker| {
            let pool = Arc::clone(&pool);

            thread::spawn(move || {
                let payload = pool.acquire("shared configuration".to_string());
                println!("worker {worker}: acquired {payload:p}");
                payload
            })
        })
        .collect::<Vec<_>>();

    let results = workers
        .into_iter()
        .map(|worker| worker.join().unwrap())
        .collect::<Vec<_>>();

    let first = results.first().expect("worker set is not empty");
    let all_same = results.iter().all(|result| Arc::ptr_eq(first, result));

    println!("All workers share one instance: {all_same}");
    println!("Entries stored: {}", pool.len());
}
