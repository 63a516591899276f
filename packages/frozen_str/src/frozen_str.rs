use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops::Deref;
use std::sync::OnceLock;

use foldhash::fast::FixedState;

/// Whether [`FrozenStr::new`] strips surrounding whitespace.
///
/// Every construction site states its choice; there is no implicit default.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum TrimPolicy {
    /// Strip leading and trailing whitespace, including Unicode whitespace
    /// such as no-break spaces.
    Trim,

    /// Store the text exactly as given.
    Preserve,
}

/// An immutable string with a cached content hash, built for deduplication.
///
/// The text is fixed at construction: optionally trimmed per [`TrimPolicy`], then
/// boxed, never mutated afterwards. The 64-bit content hash is computed on first
/// use and cached, so the repeated hashing a deduplication pool performs while
/// probing for equal content costs a single atomic load.
///
/// Equality is by text content alone. [`Hash`] writes the cached content hash
/// rather than the character stream, so a `FrozenStr` key hashes differently from
/// an equal `str` key; do not mix the two in one map. For the same reason there is
/// no [`Borrow<str>`][std::borrow::Borrow] implementation.
///
/// # Example
///
/// ```
/// use frozen_str::{FrozenStr, TrimPolicy};
///
/// let padded = FrozenStr::new("  connection reset  ", TrimPolicy::Trim);
/// let exact = FrozenStr::new("connection reset", TrimPolicy::Preserve);
///
/// assert_eq!(padded, exact);
/// assert_eq!(padded.content_hash(), exact.content_hash());
/// assert_eq!(&*padded, "connection reset");
/// ```
pub struct FrozenStr {
    text: Box<str>,

    /// Content hash of `text`, computed on first request.
    content_hash: OnceLock<u64>,
}

impl FrozenStr {
    /// Creates an immutable string from the given text.
    ///
    /// # Example
    ///
    /// ```
    /// use frozen_str::{FrozenStr, TrimPolicy};
    ///
    /// let trimmed = FrozenStr::new(" padded \u{00A0}", TrimPolicy::Trim);
    /// assert_eq!(&*trimmed, "padded");
    ///
    /// let preserved = FrozenStr::new(" padded ", TrimPolicy::Preserve);
    /// assert_eq!(&*preserved, " padded ");
    /// ```
    #[must_use]
    pub fn new(text: &str, trim: TrimPolicy) -> Self {
        let text = match trim {
            TrimPolicy::Trim => text.trim(),
            TrimPolicy::Preserve => text,
        };

        Self {
            text: Box::from(text),
            content_hash: OnceLock::new(),
        }
    }

    /// The stored text.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The 64-bit content hash, computing and caching it on first call.
    ///
    /// Equal text always yields an equal hash; the seed is fixed, so the value is
    /// also stable across instances within one process.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        *self
            .content_hash
            .get_or_init(|| FixedState::default().hash_one(&*self.text))
    }
}

impl Hash for FrozenStr {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        state.write_u64(self.content_hash());
    }
}

impl PartialEq for FrozenStr {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for FrozenStr {}

impl PartialEq<str> for FrozenStr {
    fn eq(&self, other: &str) -> bool {
        &*self.text == other
    }
}

impl PartialEq<&str> for FrozenStr {
    fn eq(&self, other: &&str) -> bool {
        &*self.text == *other
    }
}

impl Deref for FrozenStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.text
    }
}

impl AsRef<str> for FrozenStr {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for FrozenStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for FrozenStr {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrozenStr")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl From<FrozenStr> for String {
    fn from(value: FrozenStr) -> Self {
        value.text.into_string()
    }
}

#[cfg(test)]
mod tests {
    use std::hash::DefaultHasher;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(FrozenStr: Send, Sync, fmt::Debug);

    fn std_hash_of(value: &FrozenStr) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn trim_strips_surrounding_whitespace() {
        let frozen = FrozenStr::new("  connection reset  ", TrimPolicy::Trim);

        assert_eq!(&*frozen, "connection reset");
    }

    #[test]
    fn trim_handles_unicode_whitespace() {
        // U+00A0 is a no-break space.
        let frozen = FrozenStr::new("\u{00A0}padded\u{00A0}", TrimPolicy::Trim);

        assert_eq!(&*frozen, "padded");
    }

    #[test]
    fn trim_keeps_interior_whitespace() {
        let frozen = FrozenStr::new("  a b  ", TrimPolicy::Trim);

        assert_eq!(&*frozen, "a b");
    }

    #[test]
    fn whitespace_only_text_trims_to_empty() {
        let frozen = FrozenStr::new("   ", TrimPolicy::Trim);

        assert!(frozen.is_empty());
    }

    #[test]
    fn preserve_keeps_text_exactly() {
        let frozen = FrozenStr::new("  a b  ", TrimPolicy::Preserve);

        assert_eq!(&*frozen, "  a b  ");
        assert_eq!(frozen.len(), 7);
    }

    #[test]
    fn equal_text_compares_equal_across_policies() {
        let trimmed = FrozenStr::new(" text ", TrimPolicy::Trim);
        let preserved = FrozenStr::new("text", TrimPolicy::Preserve);

        assert_eq!(trimmed, preserved);
    }

    #[test]
    fn compares_against_plain_str() {
        let frozen = FrozenStr::new("text", TrimPolicy::Preserve);

        assert_eq!(frozen, "text");
        assert_ne!(frozen, "other");
    }

    #[test]
    fn content_hash_is_stable_across_calls() {
        let frozen = FrozenStr::new("text", TrimPolicy::Preserve);

        assert_eq!(frozen.content_hash(), frozen.content_hash());
    }

    #[test]
    fn equal_text_yields_equal_hash_across_instances() {
        let first = FrozenStr::new("text", TrimPolicy::Preserve);
        let second = FrozenStr::new(" text ", TrimPolicy::Trim);

        assert_eq!(first.content_hash(), second.content_hash());
    }

    #[test]
    fn unequal_text_yields_unequal_hash() {
        let first = FrozenStr::new("alpha", TrimPolicy::Preserve);
        let second = FrozenStr::new("beta", TrimPolicy::Preserve);

        assert_ne!(first.content_hash(), second.content_hash());
    }

    #[test]
    fn std_hash_writes_the_cached_content_hash() {
        let frozen = FrozenStr::new("text", TrimPolicy::Preserve);

        let mut expected = DefaultHasher::new();
        expected.write_u64(frozen.content_hash());

        assert_eq!(std_hash_of(&frozen), expected.finish());
    }

    #[test]
    fn deref_exposes_str_methods() {
        let frozen = FrozenStr::new("error: timeout", TrimPolicy::Preserve);

        assert!(frozen.starts_with("error"));
        assert_eq!(frozen.len(), 14);
    }

    #[test]
    fn display_prints_the_text() {
        let frozen = FrozenStr::new("hello", TrimPolicy::Preserve);

        assert_eq!(format!("{frozen}"), "hello");
    }

    #[test]
    fn converts_into_string() {
        let frozen = FrozenStr::new(" hello ", TrimPolicy::Trim);

        assert_eq!(String::from(frozen), "hello");
    }
}
