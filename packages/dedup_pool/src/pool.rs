use std::fmt;
use std::hash::Hash;
use std::num::NonZero;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use hash_hasher::{HashBuildHasher, HashedSet};
use new_zealand::nz;

use crate::constants::ERR_POISONED_LOCK;
use crate::handle::PoolHandle;
use crate::{ContentIdentity, DedupPoolBuilder, HandleIdentity};

/// Reserved capacity never drops below this unless a different floor is configured
/// via [`DedupPoolBuilder::min_capacity`].
pub(crate) const DEFAULT_MIN_CAPACITY: NonZero<usize> = nz!(16);

/// A thread-safe pool that hands out one canonical [`Arc`] per distinct content.
///
/// Callers construct a candidate object and offer it via [`acquire`][Self::acquire].
/// If an object with equal content is already pooled and still alive, the caller
/// receives a strong reference to that existing instance and the candidate is
/// discarded; otherwise the candidate itself becomes the canonical instance. Identity
/// is established purely by content, never by address.
///
/// The pool holds only [`Weak`][std::sync::Weak] handles, so it never keeps an object
/// alive: the moment the last external strong reference drops, the object is gone and
/// its handle merely occupies a slot until the next sweep. Conversely, dropping the
/// pool has no effect on objects callers still hold.
///
/// Reserved capacity adapts to the live population: it doubles when a sweep leaves
/// the pool at or above 7/8 of capacity and halves (down to the configured minimum)
/// when it leaves it at or below 1/4. See the crate documentation for the lifecycle
/// diagram.
///
/// # Choosing the identity strategy
///
/// By default the pooled type's own [`Hash`] and [`Eq`] implementations define
/// content identity. Types that need a different notion of identity, or that do not
/// implement those traits, can supply a custom [`HandleIdentity`] as the second type
/// parameter.
///
/// # Pooling expensive types
///
/// A full candidate must exist before the pool can decide whether it duplicates an
/// existing entry, because equality is defined over the object's own state. Types
/// that are expensive to initialize should therefore construct only their
/// identity-relevant fields eagerly and defer the heavy part until the caller knows
/// the instance is canonical (for example behind a [`OnceLock`][std::sync::OnceLock]).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use dedup_pool::DedupPool;
///
/// let pool = DedupPool::new();
///
/// let first = pool.acquire("configuration snapshot".to_string());
/// let second = pool.acquire("configuration snapshot".to_string());
///
/// // Equal content resolves to the same canonical instance.
/// assert!(Arc::ptr_eq(&first, &second));
///
/// // The pool observes without owning: dropping all strong references
/// // makes the entry stale, and the next sweep removes it.
/// drop(first);
/// drop(second);
/// assert_eq!(pool.len(), 1);
/// pool.cleanup();
/// assert_eq!(pool.len(), 0);
/// ```
///
/// # Thread safety
///
/// All operations take `&self`; the pool can be shared across threads directly or
/// inside an [`Arc`]. Once an acquisition completes, the canonical instance it
/// established is visible to every subsequent acquisition of equal content.
pub struct DedupPool<T, I = ContentIdentity> {
    /// Weak handles to every object the pool has ever been offered and has not yet
    /// swept, keyed by content hash. The build hasher passes the finished 64-bit
    /// content hash through unchanged; [`PoolHandle`] feeds it one.
    handles: RwLock<HashedSet<PoolHandle<T, I>>>,

    /// Reserved capacity, in entries. Adjusted only right after a sweep, while the
    /// exclusive lock is held; read without the lock by `capacity()` and by the
    /// acquisition fast-path pre-check.
    capacity: AtomicUsize,

    /// Mirror of the backing set's entry count (live and stale alike), refreshed
    /// under the exclusive lock. Reading it without the lock yields a heuristic
    /// answer, which is all the acquisition pre-check needs.
    stored: AtomicUsize,

    /// Capacity floor; also the capacity restored by [`clear`][Self::clear].
    min_capacity: NonZero<usize>,
}

impl<T> DedupPool<T, ContentIdentity>
where
    T: Hash + Eq,
{
    /// Creates a pool that derives identity from the pooled type's own [`Hash`] and
    /// [`Eq`], with the default capacity configuration.
    ///
    /// Defined only for the default strategy so that neither type parameter needs
    /// spelling out at the call site. Pools with a custom [`HandleIdentity`] are
    /// created through [`builder`][DedupPool::builder], with the strategy named in
    /// the pool's type.
    ///
    /// # Example
    ///
    /// ```
    /// use dedup_pool::DedupPool;
    ///
    /// let pool = DedupPool::new();
    /// let canonical = pool.acquire(42_u64);
    ///
    /// assert_eq!(*canonical, 42);
    /// assert_eq!(pool.capacity(), 16);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }
}

impl<T, I> DedupPool<T, I>
where
    I: HandleIdentity<T>,
{
    /// Starts building a pool with custom capacity configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use dedup_pool::DedupPool;
    /// use new_zealand::nz;
    ///
    /// let pool: DedupPool<String> = DedupPool::builder()
    ///     .min_capacity(nz!(4))
    ///     .initial_capacity(nz!(64))
    ///     .build();
    ///
    /// assert_eq!(pool.capacity(), 64);
    /// assert_eq!(pool.min_capacity(), 4);
    /// ```
    #[must_use]
    pub fn builder() -> DedupPoolBuilder<T, I> {
        DedupPoolBuilder::new()
    }

    pub(crate) fn new_inner(
        min_capacity: NonZero<usize>,
        initial_capacity: NonZero<usize>,
    ) -> Self {
        let initial = initial_capacity.max(min_capacity).get();

        Self {
            handles: RwLock::new(HashedSet::with_capacity_and_hasher(
                initial,
                HashBuildHasher::default(),
            )),
            capacity: AtomicUsize::new(initial),
            stored: AtomicUsize::new(0),
            min_capacity,
        }
    }

    /// Returns the canonical instance for the given content, pooling `value` as the
    /// new canonical instance if no live equal-content object is pooled yet.
    ///
    /// The candidate is constructed by the caller and wrapped in an [`Arc`] outside
    /// any lock; only the set probe and insert run under the exclusive lock. On a
    /// deduplication hit, the candidate is dropped after the lock is released.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use dedup_pool::DedupPool;
    ///
    /// let pool = DedupPool::new();
    ///
    /// let first = pool.acquire(vec![1_u8, 2, 3]);
    /// let second = pool.acquire(vec![1_u8, 2, 3]);
    /// let other = pool.acquire(vec![9_u8]);
    ///
    /// assert!(Arc::ptr_eq(&first, &second));
    /// assert!(!Arc::ptr_eq(&first, &other));
    /// ```
    #[must_use]
    pub fn acquire(&self, value: T) -> Arc<T> {
        self.acquire_arc(Arc::new(value))
    }

    /// Like [`acquire`][Self::acquire], for a candidate that is already behind an
    /// [`Arc`].
    ///
    /// Useful when the caller received the object from elsewhere and wants the
    /// canonical instance without an extra allocation. If the candidate itself is
    /// already the canonical instance, it is returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use dedup_pool::DedupPool;
    ///
    /// let pool = DedupPool::new();
    ///
    /// let canonical = pool.acquire("payload".to_string());
    /// let duplicate = Arc::new("payload".to_string());
    ///
    /// let resolved = pool.acquire_arc(duplicate);
    /// assert!(Arc::ptr_eq(&resolved, &canonical));
    /// ```
    #[must_use]
    pub fn acquire_arc(&self, candidate: Arc<T>) -> Arc<T> {
        // Heuristic pre-check from mirrors alone; the controller re-validates
        // everything under the exclusive lock before changing anything.
        if self.stored.load(Ordering::Relaxed)
            >= grow_threshold(self.capacity.load(Ordering::Relaxed))
        {
            self.rebalance();
        }

        let handle = PoolHandle::new(&candidate);

        let mut handles = self.handles.write().expect(ERR_POISONED_LOCK);

        if let Some(existing) = handles.get(&handle) {
            if let Some(canonical) = existing.upgrade() {
                return canonical;
            }
            // The matched entry lost its last strong reference between the probe
            // and the upgrade. From that instant it compares equal to nothing, so
            // the insert below records the candidate as a fresh entry and the
            // stale one waits for the next sweep.
        }

        let inserted = handles.insert(handle);
        debug_assert!(
            inserted,
            "an equal live entry cannot appear while the exclusive lock is held"
        );
        self.stored.store(handles.len(), Ordering::Relaxed);

        candidate
    }

    /// Discards every handle whose object no longer has a strong reference.
    ///
    /// Reserved capacity is left unchanged; use [`cleanup_shrink`][Self::cleanup_shrink]
    /// to also give memory back after a large release.
    ///
    /// # Example
    ///
    /// ```
    /// use dedup_pool::DedupPool;
    ///
    /// let pool = DedupPool::new();
    /// let value = pool.acquire(7_u64);
    /// drop(value);
    ///
    /// // The stale handle occupies a slot until a sweep runs.
    /// assert_eq!(pool.len(), 1);
    /// pool.cleanup();
    /// assert_eq!(pool.len(), 0);
    /// ```
    pub fn cleanup(&self) {
        let mut handles = self.handles.write().expect(ERR_POISONED_LOCK);

        Self::sweep(&mut handles);
        self.finish_maintenance(&mut handles);
    }

    /// Sweeps stale handles and halves the reserved capacity if the surviving
    /// population sits at or below the low watermark (1/4 of capacity).
    ///
    /// Capacity never drops below the configured minimum, and each pass halves at
    /// most once; call again to keep shrinking while the pool stays sparse. Unlike
    /// the opportunistic maintenance performed during acquisition, this never grows
    /// the capacity, making it safe to call after releasing a large batch of
    /// objects without risking an expansion.
    ///
    /// # Example
    ///
    /// ```
    /// use dedup_pool::DedupPool;
    /// use new_zealand::nz;
    ///
    /// let pool: DedupPool<u32> = DedupPool::builder().min_capacity(nz!(4)).build();
    ///
    /// let held = (0..8).map(|n| pool.acquire(n)).collect::<Vec<_>>();
    /// assert_eq!(pool.capacity(), 16);
    ///
    /// drop(held);
    /// pool.cleanup_shrink();
    /// assert_eq!(pool.capacity(), 8);
    /// pool.cleanup_shrink();
    /// assert_eq!(pool.capacity(), 4);
    /// ```
    pub fn cleanup_shrink(&self) {
        let mut handles = self.handles.write().expect(ERR_POISONED_LOCK);

        let live = Self::sweep(&mut handles);
        let capacity = self.capacity.load(Ordering::Relaxed);

        if live <= shrink_threshold(capacity) {
            self.capacity
                .store(halved(capacity, self.min_capacity), Ordering::Relaxed);
        }

        self.finish_maintenance(&mut handles);
    }

    /// Drops every handle, live or stale, and resets capacity to the configured
    /// minimum.
    ///
    /// Objects callers still hold strong references to are unaffected; they are
    /// simply no longer canonical, so an equal-content [`acquire`][Self::acquire]
    /// afterwards produces a fresh instance.
    ///
    /// # Example
    ///
    /// ```
    /// use dedup_pool::DedupPool;
    ///
    /// let pool = DedupPool::new();
    /// let held = pool.acquire("kept".to_string());
    ///
    /// pool.clear();
    /// assert_eq!(pool.len(), 0);
    /// assert_eq!(pool.capacity(), pool.min_capacity());
    ///
    /// // The object itself outlives its pool entry.
    /// assert_eq!(*held, "kept");
    /// ```
    pub fn clear(&self) {
        let mut handles = self.handles.write().expect(ERR_POISONED_LOCK);

        let min_capacity = self.min_capacity.get();
        *handles = HashedSet::with_capacity_and_hasher(min_capacity, HashBuildHasher::default());
        self.capacity.store(min_capacity, Ordering::Relaxed);
        self.stored.store(0, Ordering::Relaxed);
    }

    /// The number of stored handles, including stale ones not yet swept.
    ///
    /// Takes the shared lock; may briefly block behind an in-progress sweep.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.read().expect(ERR_POISONED_LOCK).len()
    }

    /// Whether the pool currently stores no handles at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The current reserved capacity, in entries.
    ///
    /// Lock-free; the value may already be outdated by the time it is observed.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Relaxed)
    }

    /// The configured capacity floor.
    #[must_use]
    #[inline]
    pub fn min_capacity(&self) -> usize {
        self.min_capacity.get()
    }

    /// Discards every stale handle, moving the survivors into a freshly allocated
    /// set so hash-bucket tombstones do not accumulate. Returns the survivor count.
    ///
    /// An object can lose its last strong reference at any moment, including
    /// between the liveness filter and reinsertion; such a handle lands in the
    /// expired-hash bucket of the new set and is discarded by the next sweep.
    fn sweep(handles: &mut HashedSet<PoolHandle<T, I>>) -> usize {
        let survivors = handles
            .drain()
            .filter(PoolHandle::is_live)
            .collect::<Vec<_>>();
        let live = survivors.len();

        *handles = HashedSet::with_capacity_and_hasher(live, HashBuildHasher::default());
        handles.extend(survivors);

        live
    }

    /// Sweeps and then applies the full capacity transition rule: grow at or above
    /// the high watermark, shrink at or below the low watermark.
    ///
    /// Invoked from the acquisition fast path when the stored count nears capacity.
    fn rebalance(&self) {
        let mut handles = self.handles.write().expect(ERR_POISONED_LOCK);

        let live = Self::sweep(&mut handles);
        let capacity = self.capacity.load(Ordering::Relaxed);

        if live >= grow_threshold(capacity) {
            let doubled = capacity
                .checked_mul(2)
                .expect("doubling the capacity overflowed usize");
            self.capacity.store(doubled, Ordering::Relaxed);
        } else if live <= shrink_threshold(capacity) {
            self.capacity
                .store(halved(capacity, self.min_capacity), Ordering::Relaxed);
        }

        self.finish_maintenance(&mut handles);
    }

    /// Completes a maintenance pass: restores the physical reservation of the
    /// backing set to the logical capacity and refreshes the stored-count mirror.
    fn finish_maintenance(&self, handles: &mut HashedSet<PoolHandle<T, I>>) {
        let capacity = self.capacity.load(Ordering::Relaxed);
        handles.reserve(capacity.saturating_sub(handles.len()));

        self.stored.store(handles.len(), Ordering::Relaxed);
    }
}

impl<T> Default for DedupPool<T, ContentIdentity>
where
    T: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, I> fmt::Debug for DedupPool<T, I> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DedupPool")
            .field("stored", &self.stored.load(Ordering::Relaxed))
            .field("capacity", &self.capacity.load(Ordering::Relaxed))
            .field("min_capacity", &self.min_capacity)
            .finish_non_exhaustive()
    }
}

/// Live count at or above which the reserved capacity doubles: 7/8 of capacity.
///
/// Kept below 100% so a pool that stays nearly full right after a sweep does not
/// schedule another sweep on almost every subsequent insertion.
#[expect(clippy::integer_division, reason = "thresholds round down")]
fn grow_threshold(capacity: usize) -> usize {
    capacity.saturating_mul(7) / 8
}

/// Live count at or below which the reserved capacity halves: 1/4 of capacity.
#[expect(clippy::integer_division, reason = "thresholds round down")]
fn shrink_threshold(capacity: usize) -> usize {
    capacity / 4
}

/// Half the capacity, floored at the configured minimum.
#[expect(clippy::integer_division, reason = "thresholds round down")]
fn halved(capacity: usize, floor: NonZero<usize>) -> usize {
    (capacity / 2).max(floor.get())
}
