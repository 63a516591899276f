//! This package provides [`DedupPool`], a thread-safe pool that hands out one canonical
//! shared instance per distinct content.
//!
//! Callers construct candidate objects and offer them to the pool; each acquisition
//! resolves to the canonical [`Arc`][std::sync::Arc] for that content, so equal content
//! is stored once no matter how many parties request it. The pool itself holds only
//! [`Weak`][std::sync::Weak] handles and never extends an object's lifetime.
//!
//! # Features
//!
//! - **Content-based identity**: equal content yields the same instance, regardless of
//!   which caller constructed it first.
//! - **Non-owning**: dropping the last external reference destroys the object; the pool
//!   merely forgets it at the next sweep.
//! - **Adaptive capacity**: reserved capacity doubles when the pool runs nearly full and
//!   halves when it runs nearly empty, down to a configurable floor.
//! - **Pluggable identity**: [`HandleIdentity`] strategies redefine what "equal content"
//!   means without touching the pooled type.
//! - **Stable Rust**: No unstable Rust features required.
//!
//! # Capacity management
//!
//! Reserved capacity follows the live population through a pair of watermarks. Sweeps
//! run opportunistically when an acquisition finds the pool nearly full, or on demand
//! via [`DedupPool::cleanup`] and [`DedupPool::cleanup_shrink`].
#![ doc=mermaid!( "../doc/capacity.mermaid") ]
//!
//! Plain [`cleanup`][DedupPool::cleanup] never changes capacity and
//! [`cleanup_shrink`][DedupPool::cleanup_shrink] never grows it; only the sweep embedded
//! in the acquisition path applies the full transition rule.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use dedup_pool::DedupPool;
//!
//! let pool = DedupPool::new();
//!
//! // Two callers construct equal content independently...
//! let first = pool.acquire("session token".to_string());
//! let second = pool.acquire("session token".to_string());
//!
//! // ...and end up sharing one canonical instance.
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(pool.len(), 1);
//!
//! // The pool never keeps objects alive on its own.
//! drop(first);
//! drop(second);
//! pool.cleanup();
//! assert!(pool.is_empty());
//! ```
//!
//! Capacity configuration goes through the builder:
//!
//! ```rust
//! use dedup_pool::DedupPool;
//! use new_zealand::nz;
//!
//! let pool: DedupPool<Vec<u8>> = DedupPool::builder()
//!     .min_capacity(nz!(4))
//!     .initial_capacity(nz!(1024))
//!     .build();
//!
//! assert_eq!(pool.capacity(), 1024);
//! ```
//!
//! To pool a type by something other than its own [`Hash`]/[`Eq`] content, implement
//! [`HandleIdentity`] and name it as the pool's second type parameter.

use simple_mermaid::mermaid;

mod builder;
mod constants;
mod handle;
mod identity;
mod pool;

pub use builder::*;
pub use identity::*;
pub use pool::*;
