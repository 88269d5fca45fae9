/// How a [`Transcoder`](crate::Transcoder) treats input that is not valid in
/// its claimed encoding.
///
/// The converters' `convert` methods always run in [`Validation::Strict`].
/// [`Validation::Replace`] is only reachable through the explicitly named
/// `convert_lossy` methods, so invalid input is never replaced silently.
///
/// # Default
///
/// [`Validation::Strict`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Validation {
    /// Reject the whole input at the first malformed sequence.
    ///
    /// For UTF-16 input this is an unpaired surrogate. For UTF-8 input it is
    /// any byte sequence outside the well-formed table: stray continuation
    /// bytes, overlong forms, encoded surrogates, code points above
    /// U+10FFFF, and sequences cut short by another lead byte or by the end
    /// of the input.
    #[default]
    Strict,

    /// Substitute U+FFFD REPLACEMENT CHARACTER for malformed input.
    ///
    /// Each unpaired surrogate becomes one replacement character. Each
    /// maximal invalid subpart of UTF-8 input becomes one replacement
    /// character, following the Unicode recommendation also used by
    /// [`String::from_utf8_lossy`](alloc::string::String::from_utf8_lossy).
    Replace,
}

impl Validation {
    /// Returns `true` for [`Validation::Strict`].
    #[must_use]
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}
