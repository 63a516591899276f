//! This package provides [`FrozenStr`], an immutable string with a cached content
//! hash, and the type aliases for deduplicating such strings through a
//! [`DedupPool`][dedup_pool::DedupPool].
//!
//! Text that recurs heavily (log templates, header names, symbol names) can be
//! stored once and shared by everyone who needs it, without any party being
//! responsible for the string's lifetime.
//!
//! # Features
//!
//! - **Immutable by construction**: optional whitespace trimming happens once,
//!   up front, governed by an explicit [`TrimPolicy`].
//! - **Cached content hash**: computed on first use, then a single atomic load,
//!   which keeps deduplication probes cheap.
//! - **Non-owning pooling**: a [`FrozenStrPool`] forgets a string once the last
//!   [`SharedStr`] is dropped.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use frozen_str::{FrozenStr, FrozenStrPool, TrimPolicy};
//!
//! let pool = FrozenStrPool::new();
//!
//! // Both spellings canonicalize to the same trimmed text, so the pool
//! // stores it once.
//! let first = pool.acquire(FrozenStr::new("  timeout  ", TrimPolicy::Trim));
//! let second = pool.acquire(FrozenStr::new("timeout", TrimPolicy::Preserve));
//!
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(&**first, "timeout");
//! ```

use std::sync::{Arc, Weak};

use dedup_pool::DedupPool;

mod frozen_str;

pub use frozen_str::*;

/// A strong reference to a pooled [`FrozenStr`].
pub type SharedStr = Arc<FrozenStr>;

/// A weak reference to a pooled [`FrozenStr`]; upgrading fails once every
/// [`SharedStr`] to the text is gone.
pub type WeakStr = Weak<FrozenStr>;

/// A deduplication pool of [`FrozenStr`] keyed by text content.
pub type FrozenStrPool = DedupPool<FrozenStr>;
