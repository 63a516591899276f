use std::hash::{BuildHasher, Hash};
use std::sync::Weak;

use foldhash::fast::FixedState;

/// Content hash reported for a handle whose object no longer exists.
///
/// A handle that cannot be resolved has no content left to hash, so every identity
/// strategy reports this fixed value for it. A live object's content may legitimately
/// hash to the same value; that is harmless, because equality (which never matches a
/// dead handle) is what ultimately distinguishes entries.
pub const EXPIRED_HASH: u64 = 0;

/// How a [`DedupPool`][crate::DedupPool] establishes the identity of objects it does
/// not own.
///
/// The pool stores only [`Weak`] handles, so both operations receive handles rather
/// than objects and must themselves attempt the upgrade to a strong reference. The
/// strategy is wired in as a type parameter; it carries no state and is never
/// instantiated.
///
/// # Contract
///
/// * [`hash`][Self::hash] resolves the handle and hashes the object's *content*,
///   never its address. The value must be stable: hashing the same live object twice
///   must produce the same result, or entries become unfindable after an internal
///   rehash. For an unresolvable handle it must return [`EXPIRED_HASH`].
/// * [`eq`][Self::eq] resolves both handles and compares content. It must return
///   `false` whenever either handle is unresolvable, even if both refer to the same
///   former object. Stale entries rely on this to become distinguishable from every
///   live entry (and from each other), which is what allows an equal-content insert
///   to proceed and a sweep to discard them.
///
/// A strategy that violates the second rule does not cause memory unsafety; the
/// observable effect is stale entries that are never replaced or reclaimed, i.e.
/// unbounded growth.
///
/// # Example
///
/// A strategy that pools strings case-insensitively:
///
/// ```
/// use std::sync::Weak;
///
/// use dedup_pool::{DedupPool, EXPIRED_HASH, HandleIdentity};
/// use foldhash::fast::FixedState;
/// use std::hash::BuildHasher;
///
/// #[derive(Debug)]
/// #[non_exhaustive]
/// pub struct CaseFold;
///
/// impl HandleIdentity<String> for CaseFold {
///     fn hash(handle: &Weak<String>) -> u64 {
///         handle.upgrade().map_or(EXPIRED_HASH, |object| {
///             FixedState::default().hash_one(object.to_ascii_lowercase())
///         })
///     }
///
///     fn eq(left: &Weak<String>, right: &Weak<String>) -> bool {
///         match (left.upgrade(), right.upgrade()) {
///             (Some(left), Some(right)) => left.eq_ignore_ascii_case(&right),
///             _ => false,
///         }
///     }
/// }
///
/// let pool = DedupPool::<String, CaseFold>::builder().build();
/// let first = pool.acquire("Hello".to_string());
/// let second = pool.acquire("HELLO".to_string());
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// ```
pub trait HandleIdentity<T> {
    /// Hashes the content observed through `handle`, or returns [`EXPIRED_HASH`]
    /// if the object no longer exists.
    fn hash(handle: &Weak<T>) -> u64;

    /// Compares the content observed through two handles.
    ///
    /// Returns `false` if either handle can no longer be resolved.
    fn eq(left: &Weak<T>, right: &Weak<T>) -> bool;
}

/// The default identity strategy: content identity borrowed from the pooled type's
/// own [`Hash`] and [`Eq`] implementations.
///
/// Hashing goes through a fixed-seed [`foldhash`] state, so the 64-bit content hash
/// of a given value is the same on every call for the lifetime of the process. This
/// is a marker type; it holds no state and user code never constructs one.
#[derive(Debug)]
#[non_exhaustive]
pub struct ContentIdentity;

impl<T> HandleIdentity<T> for ContentIdentity
where
    T: Hash + Eq,
{
    fn hash(handle: &Weak<T>) -> u64 {
        handle
            .upgrade()
            .map_or(EXPIRED_HASH, |object| hash_content(&*object))
    }

    fn eq(left: &Weak<T>, right: &Weak<T>) -> bool {
        match (left.upgrade(), right.upgrade()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}

/// Hashes a value with the process-stable content hasher.
///
/// The seed is fixed because stored handles are re-hashed whenever the pool rebuilds
/// its backing set; a randomly seeded hasher would scatter existing entries.
pub(crate) fn hash_content<T>(value: &T) -> u64
where
    T: Hash,
{
    FixedState::default().hash_one(value)
}
