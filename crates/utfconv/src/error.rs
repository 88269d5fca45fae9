use thiserror::Error;

/// Diagnostic codes carried by [`ConversionError::PlatformFailure`] and
/// [`TranscodeError::code`].
///
/// The values match the corresponding Windows system error codes so that
/// reports read the same regardless of which primitive produced them.
pub mod codes {
    /// The primitive produced output inconsistent with its own measurement.
    pub const INVALID_DATA: u32 = 13;
    /// The destination buffer was smaller than the converted text.
    pub const INSUFFICIENT_BUFFER: u32 = 122;
    /// The input contained a sequence with no Unicode translation.
    pub const NO_UNICODE_TRANSLATION: u32 = 1113;
}

/// Error returned by [`Utf16ToUtf8Converter`](crate::Utf16ToUtf8Converter)
/// and [`Utf8ToUtf16Converter`](crate::Utf8ToUtf16Converter).
///
/// A conversion either succeeds completely or fails with one of these; no
/// partial output is ever returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    /// The input does not conform to its claimed encoding.
    #[error(transparent)]
    InvalidSequence(#[from] InvalidSequence),
    /// The underlying conversion primitive failed for a reason other than
    /// input validity.
    #[error("conversion primitive failed (code {0})")]
    PlatformFailure(u32),
}

impl ConversionError {
    /// Returns `true` if the input itself was malformed.
    #[must_use]
    pub fn is_invalid_sequence(&self) -> bool {
        matches!(self, Self::InvalidSequence(_))
    }

    /// The primitive's diagnostic code, if this is a platform failure.
    #[must_use]
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::InvalidSequence(_) => None,
            Self::PlatformFailure(code) => Some(*code),
        }
    }
}

/// Which encoding the rejected input claimed to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceEncoding {
    /// A sequence of UTF-16 code units.
    Utf16,
    /// A sequence of UTF-8 bytes.
    Utf8,
}

impl SourceEncoding {
    fn unit(self) -> &'static str {
        match self {
            Self::Utf16 => "code unit",
            Self::Utf8 => "byte",
        }
    }
}

impl core::fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Utf16 => "UTF-16",
            Self::Utf8 => "UTF-8",
        })
    }
}

/// The first malformed sequence found in an input, and where it starts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("invalid {encoding} sequence at {unit} {offset}: {malformation}", unit = .encoding.unit())]
pub struct InvalidSequence {
    pub(crate) encoding: SourceEncoding,
    pub(crate) offset: usize,
    pub(crate) malformation: Malformation,
}

impl InvalidSequence {
    pub(crate) fn utf16(offset: usize, malformation: Malformation) -> Self {
        Self {
            encoding: SourceEncoding::Utf16,
            offset,
            malformation,
        }
    }

    pub(crate) fn utf8(offset: usize, malformation: Malformation) -> Self {
        Self {
            encoding: SourceEncoding::Utf8,
            offset,
            malformation,
        }
    }

    /// The encoding the input was expected to be in.
    #[must_use]
    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    /// Index of the first element of the malformed sequence, in code units
    /// for UTF-16 input and bytes for UTF-8 input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What is wrong with the sequence at [`offset`](Self::offset).
    #[must_use]
    pub fn malformation(&self) -> Malformation {
        self.malformation
    }

    /// Length of the well-formed prefix of the input.
    #[must_use]
    pub fn valid_up_to(&self) -> usize {
        self.offset
    }
}

/// The way in which an input sequence is malformed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Malformation {
    /// A high surrogate not followed by a low surrogate, or a low surrogate
    /// not preceded by a high one.
    #[error("unpaired surrogate {0:#06X}")]
    UnpairedSurrogate(u16),
    /// A continuation byte where a lead byte was expected.
    #[error("unexpected continuation byte {0:#04X}")]
    UnexpectedContinuation(u8),
    /// A byte that never appears in UTF-8 (`0xF5..=0xFF`).
    #[error("invalid byte {0:#04X}")]
    InvalidByte(u8),
    /// A code point encoded with more bytes than its minimal form.
    #[error("overlong encoding")]
    Overlong,
    /// A UTF-16 surrogate value encoded as UTF-8.
    #[error("encoded surrogate")]
    EncodedSurrogate,
    /// A code point above U+10FFFF.
    #[error("code point out of range")]
    OutOfRange,
    /// A multi-byte sequence interrupted by a byte that is not a
    /// continuation byte.
    #[error("missing continuation byte")]
    MissingContinuation,
    /// A multi-byte sequence cut off by the end of the input.
    #[error("truncated sequence at end of input")]
    Truncated,
}

/// Failure reported by a [`Transcoder`](crate::Transcoder).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeError {
    /// The source is not valid in its encoding.
    #[error(transparent)]
    Invalid(#[from] InvalidSequence),
    /// The destination cannot hold the converted text.
    #[error("destination holds {capacity} units but {needed} are required")]
    InsufficientBuffer {
        /// Units required for the whole conversion.
        needed: usize,
        /// Units available in the destination.
        capacity: usize,
    },
    /// Any other primitive-specific failure.
    #[error("transcoder failure (code {0})")]
    Other(u32),
}

impl TranscodeError {
    /// The diagnostic code for this failure.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Self::Invalid(_) => codes::NO_UNICODE_TRANSLATION,
            Self::InsufficientBuffer { .. } => codes::INSUFFICIENT_BUFFER,
            Self::Other(code) => *code,
        }
    }
}
