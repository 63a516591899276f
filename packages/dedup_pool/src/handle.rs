use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use crate::HandleIdentity;

/// The element type of the pool's backing set: a weak handle paired with the
/// identity strategy that interprets it.
///
/// `Hash` writes the strategy's finished 64-bit content hash, which the set's
/// build hasher passes through unchanged. `PartialEq` delegates to the strategy
/// as well, which means equality is deliberately not reflexive once a handle
/// goes stale: a stale handle equals nothing, itself included. The store relies
/// on that to treat stale entries as absent during lookups and inserts.
#[derive(Debug)]
pub(crate) struct PoolHandle<T, I> {
    weak: Weak<T>,
    _identity: PhantomData<I>,
}

impl<T, I> PoolHandle<T, I> {
    pub(crate) fn new(candidate: &Arc<T>) -> Self {
        Self {
            weak: Arc::downgrade(candidate),
            _identity: PhantomData,
        }
    }

    /// Attempts to resolve the handle back into a strong reference.
    pub(crate) fn upgrade(&self) -> Option<Arc<T>> {
        self.weak.upgrade()
    }

    /// Whether the observed object still has at least one strong reference.
    ///
    /// The answer is stale the moment it is produced; callers may only use it
    /// to discard entries, never to promise that an upgrade will succeed.
    pub(crate) fn is_live(&self) -> bool {
        self.weak.strong_count() > 0
    }
}

impl<T, I> Hash for PoolHandle<T, I>
where
    I: HandleIdentity<T>,
{
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        state.write_u64(I::hash(&self.weak));
    }
}

impl<T, I> PartialEq for PoolHandle<T, I>
where
    I: HandleIdentity<T>,
{
    fn eq(&self, other: &Self) -> bool {
        I::eq(&self.weak, &other.weak)
    }
}

impl<T, I> Eq for PoolHandle<T, I> where I: HandleIdentity<T> {}
