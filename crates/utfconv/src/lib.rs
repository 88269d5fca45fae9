//! Strict, two-phase conversion between UTF-16 code units and UTF-8 bytes.
//!
//! Each conversion first measures the exact output length, then allocates
//! exactly that much and fills it. Malformed input is rejected with a precise
//! [`InvalidSequence`] rather than silently replaced; empty input converts to
//! empty output without any validation step.
//!
//! ```rust
//! let utf8 = utfconv::to_utf8(&[0x5B66]).unwrap();
//! assert_eq!(utf8, [0xE5, 0xAD, 0xA6]);
//!
//! let utf16 = utfconv::to_utf16(&utf8).unwrap();
//! assert_eq!(utf16, [0x5B66]);
//!
//! let err = utfconv::to_utf8(&[0xD800]).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "invalid UTF-16 sequence at code unit 0: unpaired surrogate 0xD800"
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod converter;
mod error;
mod options;
mod transcoder;

#[cfg(test)]
mod tests;

use alloc::vec::Vec;

pub use converter::{Utf8ToUtf16Converter, Utf16ToUtf8Converter};
pub use error::{
    ConversionError, InvalidSequence, Malformation, SourceEncoding, TranscodeError, codes,
};
pub use options::Validation;
pub use transcoder::{StdTranscoder, Transcoder};

/// Convert UTF-16 code units to UTF-8 bytes with [`StdTranscoder`].
///
/// # Errors
///
/// [`ConversionError::InvalidSequence`] if `utf16` contains an unpaired
/// surrogate.
pub fn to_utf8(utf16: &[u16]) -> Result<Vec<u8>, ConversionError> {
    Utf16ToUtf8Converter::new().convert(utf16)
}

/// Convert UTF-8 bytes to UTF-16 code units with [`StdTranscoder`].
///
/// # Errors
///
/// [`ConversionError::InvalidSequence`] if `utf8` is not well-formed UTF-8.
pub fn to_utf16(utf8: &[u8]) -> Result<Vec<u16>, ConversionError> {
    Utf8ToUtf16Converter::new().convert(utf8)
}
