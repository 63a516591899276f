use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZero;

use crate::pool::DEFAULT_MIN_CAPACITY;
use crate::{ContentIdentity, DedupPool, HandleIdentity};

/// Builder for creating a [`DedupPool`] with custom capacity configuration.
///
/// Created via [`DedupPool::builder()`].
///
/// # Example
///
/// ```
/// use dedup_pool::DedupPool;
/// use new_zealand::nz;
///
/// let pool: DedupPool<String> = DedupPool::builder()
///     .min_capacity(nz!(8))
///     .initial_capacity(nz!(128))
///     .build();
///
/// assert_eq!(pool.capacity(), 128);
/// ```
#[must_use]
pub struct DedupPoolBuilder<T, I = ContentIdentity> {
    min_capacity: NonZero<usize>,
    initial_capacity: Option<NonZero<usize>>,

    // Prevents Sync while allowing Send - builders are thread-mobile but not thread-safe.
    _not_sync: PhantomData<Cell<()>>,

    // Pins down the pooled type and identity strategy at the `builder()` call site
    // without claiming ownership of either.
    _pool: PhantomData<fn() -> (T, I)>,
}

impl<T, I> DedupPoolBuilder<T, I>
where
    I: HandleIdentity<T>,
{
    pub(crate) fn new() -> Self {
        Self {
            min_capacity: DEFAULT_MIN_CAPACITY,
            initial_capacity: None,
            _not_sync: PhantomData,
            _pool: PhantomData,
        }
    }

    /// Sets the capacity floor.
    ///
    /// Shrinking never takes the reserved capacity below this value, and
    /// [`DedupPool::clear`] resets capacity to it. Defaults to 16.
    #[inline]
    pub fn min_capacity(mut self, min_capacity: NonZero<usize>) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Sets the reserved capacity the pool starts out with.
    ///
    /// Useful when the expected population is known up front, sparing the pool the
    /// doubling steps it would otherwise go through. Values below the capacity
    /// floor are clamped up to it. Defaults to the floor.
    #[inline]
    pub fn initial_capacity(mut self, initial_capacity: NonZero<usize>) -> Self {
        self.initial_capacity = Some(initial_capacity);
        self
    }

    /// Creates the pool.
    #[must_use]
    pub fn build(self) -> DedupPool<T, I> {
        DedupPool::new_inner(
            self.min_capacity,
            self.initial_capacity.unwrap_or(self.min_capacity),
        )
    }
}

impl<T, I> fmt::Debug for DedupPoolBuilder<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DedupPoolBuilder")
            .field("min_capacity", &self.min_capacity)
            .field("initial_capacity", &self.initial_capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use new_zealand::nz;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(DedupPoolBuilder<String>: Send, fmt::Debug);
    assert_not_impl_any!(DedupPoolBuilder<String>: Sync);

    #[test]
    fn default_configuration_matches_new() {
        let built: DedupPool<String> = DedupPool::builder().build();
        let plain: DedupPool<String> = DedupPool::new();

        assert_eq!(built.capacity(), plain.capacity());
        assert_eq!(built.min_capacity(), plain.min_capacity());
    }

    #[test]
    fn custom_floor_is_applied() {
        let pool: DedupPool<String> = DedupPool::builder().min_capacity(nz!(4)).build();

        assert_eq!(pool.min_capacity(), 4);
        assert_eq!(pool.capacity(), 4);
    }

    #[test]
    fn initial_capacity_defaults_to_floor() {
        let pool: DedupPool<String> = DedupPool::builder().min_capacity(nz!(64)).build();

        assert_eq!(pool.capacity(), 64);
    }

    #[test]
    fn initial_capacity_above_floor_is_kept() {
        let pool: DedupPool<String> = DedupPool::builder()
            .min_capacity(nz!(8))
            .initial_capacity(nz!(256))
            .build();

        assert_eq!(pool.capacity(), 256);
        assert_eq!(pool.min_capacity(), 8);
    }

    #[test]
    fn initial_capacity_below_floor_is_clamped() {
        let pool: DedupPool<String> = DedupPool::builder()
            .min_capacity(nz!(32))
            .initial_capacity(nz!(2))
            .build();

        assert_eq!(pool.capacity(), 32);
    }

    #[test]
    fn builder_crosses_threads() {
        let builder: DedupPoolBuilder<String> = DedupPool::builder().min_capacity(nz!(4));

        let pool = thread::spawn(move || builder.build())
            .join()
            .expect("building a pool on another thread must not panic");

        assert_eq!(pool.min_capacity(), 4);
    }

    #[test]
    fn debug_output_reports_configuration() {
        let builder: DedupPoolBuilder<String> = DedupPool::builder().min_capacity(nz!(4));

        let output = format!("{builder:?}");
        assert!(output.contains("DedupPoolBuilder"));
        assert!(output.contains("min_capacity"));
    }
}
