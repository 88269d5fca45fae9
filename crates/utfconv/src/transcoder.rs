//! The text-encoding primitive both converters delegate to.
//!
//! A [`Transcoder`] answers two questions per direction: how many output
//! units a source needs (`measure_*`), and writing those units into a
//! caller-provided buffer (`encode_*`). The converters call the pair in that
//! order; a transcoder only has to be consistent with itself.

use core::char::REPLACEMENT_CHARACTER;

use crate::{
    error::{InvalidSequence, Malformation, TranscodeError},
    options::Validation,
};

/// A UTF-16 ⇄ UTF-8 conversion primitive.
///
/// Implementations must be deterministic: for the same source and
/// [`Validation`], `encode_*` writes exactly the number of units `measure_*`
/// reported. Implementations shared across threads must be `Sync`; every
/// method takes `&self` and the destination buffer is owned by the caller.
pub trait Transcoder {
    /// Number of UTF-8 bytes needed to represent `src`.
    ///
    /// # Errors
    ///
    /// [`TranscodeError::Invalid`] if `src` contains an unpaired surrogate and
    /// `validation` is strict.
    fn measure_utf16_to_utf8(
        &self,
        src: &[u16],
        validation: Validation,
    ) -> Result<usize, TranscodeError>;

    /// Writes `src` as UTF-8 into `dst` and returns the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// [`TranscodeError::Invalid`] as for
    /// [`measure_utf16_to_utf8`](Self::measure_utf16_to_utf8), and
    /// [`TranscodeError::InsufficientBuffer`] if `dst` is too short. The
    /// contents of `dst` are unspecified after an error.
    fn encode_utf16_to_utf8(
        &self,
        src: &[u16],
        dst: &mut [u8],
        validation: Validation,
    ) -> Result<usize, TranscodeError>;

    /// Number of UTF-16 code units needed to represent `src`.
    ///
    /// # Errors
    ///
    /// [`TranscodeError::Invalid`] if `src` is not well-formed UTF-8 and
    /// `validation` is strict.
    fn measure_utf8_to_utf16(
        &self,
        src: &[u8],
        validation: Validation,
    ) -> Result<usize, TranscodeError>;

    /// Writes `src` as UTF-16 into `dst` and returns the number of code units
    /// written.
    ///
    /// # Errors
    ///
    /// [`TranscodeError::Invalid`] as for
    /// [`measure_utf8_to_utf16`](Self::measure_utf8_to_utf16), and
    /// [`TranscodeError::InsufficientBuffer`] if `dst` is too short. The
    /// contents of `dst` are unspecified after an error.
    fn encode_utf8_to_utf16(
        &self,
        src: &[u8],
        dst: &mut [u16],
        validation: Validation,
    ) -> Result<usize, TranscodeError>;
}

impl<T: Transcoder + ?Sized> Transcoder for &T {
    fn measure_utf16_to_utf8(
        &self,
        src: &[u16],
        validation: Validation,
    ) -> Result<usize, TranscodeError> {
        (**self).measure_utf16_to_utf8(src, validation)
    }

    fn encode_utf16_to_utf8(
        &self,
        src: &[u16],
        dst: &mut [u8],
        validation: Validation,
    ) -> Result<usize, TranscodeError> {
        (**self).encode_utf16_to_utf8(src, dst, validation)
    }

    fn measure_utf8_to_utf16(
        &self,
        src: &[u8],
        validation: Validation,
    ) -> Result<usize, TranscodeError> {
        (**self).measure_utf8_to_utf16(src, validation)
    }

    fn encode_utf8_to_utf16(
        &self,
        src: &[u8],
        dst: &mut [u16],
        validation: Validation,
    ) -> Result<usize, TranscodeError> {
        (**self).encode_utf8_to_utf16(src, dst, validation)
    }
}

/// The default [`Transcoder`], built on `core`'s UTF-16 decoder and
/// [`bstr::decode_utf8`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StdTranscoder;

impl Transcoder for StdTranscoder {
    fn measure_utf16_to_utf8(
        &self,
        src: &[u16],
        validation: Validation,
    ) -> Result<usize, TranscodeError> {
        utf16_scalars(src).try_fold(0usize, |len, scalar| {
            Ok::<_, TranscodeError>(len + resolve_utf16(scalar, validation)?.len_utf8())
        })
    }

    fn encode_utf16_to_utf8(
        &self,
        src: &[u16],
        dst: &mut [u8],
        validation: Validation,
    ) -> Result<usize, TranscodeError> {
        let mut written = 0;
        for scalar in utf16_scalars(src) {
            let ch = resolve_utf16(scalar, validation)?;
            let end = written + ch.len_utf8();
            let Some(slot) = dst.get_mut(written..end) else {
                return Err(TranscodeError::InsufficientBuffer {
                    needed: self.measure_utf16_to_utf8(src, validation)?,
                    capacity: dst.len(),
                });
            };
            ch.encode_utf8(slot);
            written = end;
        }
        Ok(written)
    }

    fn measure_utf8_to_utf16(
        &self,
        src: &[u8],
        validation: Validation,
    ) -> Result<usize, TranscodeError> {
        utf8_scalars(src).try_fold(0usize, |len, scalar| {
            Ok::<_, TranscodeError>(len + resolve_utf8(src, scalar, validation)?.len_utf16())
        })
    }

    fn encode_utf8_to_utf16(
        &self,
        src: &[u8],
        dst: &mut [u16],
        validation: Validation,
    ) -> Result<usize, TranscodeError> {
        let mut written = 0;
        for scalar in utf8_scalars(src) {
            let ch = resolve_utf8(src, scalar, validation)?;
            let end = written + ch.len_utf16();
            let Some(slot) = dst.get_mut(written..end) else {
                return Err(TranscodeError::InsufficientBuffer {
                    needed: self.measure_utf8_to_utf16(src, validation)?,
                    capacity: dst.len(),
                });
            };
            ch.encode_utf16(slot);
            written = end;
        }
        Ok(written)
    }
}

/// A decoded scalar, or the rejected input, tagged with its source offset.
type Scalar<E> = (usize, Result<char, E>);

/// Decodes `src` into scalars; an error carries the unpaired surrogate.
fn utf16_scalars(src: &[u16]) -> impl Iterator<Item = Scalar<u16>> + '_ {
    let mut offset = 0;
    char::decode_utf16(src.iter().copied()).map(move |decoded| {
        let at = offset;
        match decoded {
            Ok(ch) => {
                offset += ch.len_utf16();
                (at, Ok(ch))
            }
            Err(err) => {
                offset += 1;
                (at, Err(err.unpaired_surrogate()))
            }
        }
    })
}

/// Decodes `src` into scalars; an error carries the length of the maximal
/// invalid subpart.
fn utf8_scalars(src: &[u8]) -> impl Iterator<Item = Scalar<usize>> + '_ {
    let mut offset = 0;
    core::iter::from_fn(move || {
        let rest = src.get(offset..).filter(|rest| !rest.is_empty())?;
        let at = offset;
        let (decoded, size) = bstr::decode_utf8(rest);
        // `decode_utf8` consumes at least one byte of non-empty input.
        offset += size.max(1);
        Some((at, decoded.ok_or(size)))
    })
}

fn resolve_utf16(
    (at, decoded): Scalar<u16>,
    validation: Validation,
) -> Result<char, TranscodeError> {
    match decoded {
        Ok(ch) => Ok(ch),
        Err(_) if !validation.is_strict() => Ok(REPLACEMENT_CHARACTER),
        Err(unit) => {
            Err(InvalidSequence::utf16(at, Malformation::UnpairedSurrogate(unit)).into())
        }
    }
}

fn resolve_utf8(
    src: &[u8],
    (at, decoded): Scalar<usize>,
    validation: Validation,
) -> Result<char, TranscodeError> {
    match decoded {
        Ok(ch) => Ok(ch),
        Err(_) if !validation.is_strict() => Ok(REPLACEMENT_CHARACTER),
        Err(_) => Err(InvalidSequence::utf8(at, classify_utf8(&src[at..])).into()),
    }
}

/// Explains why `bytes` does not start with a well-formed UTF-8 sequence.
///
/// `bytes` must begin at a position [`bstr::decode_utf8`] rejected.
fn classify_utf8(bytes: &[u8]) -> Malformation {
    let Some(&lead) = bytes.first() else {
        return Malformation::Truncated;
    };
    let needed = match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        0x80..=0xBF => return Malformation::UnexpectedContinuation(lead),
        0xC0 | 0xC1 => return Malformation::Overlong,
        _ => return Malformation::InvalidByte(lead),
    };

    // The second byte narrows the range for these leads (Unicode Table 3-7).
    match (lead, bytes.get(1).copied()) {
        (0xE0, Some(0x80..=0x9F)) | (0xF0, Some(0x80..=0x8F)) => return Malformation::Overlong,
        (0xED, Some(0xA0..=0xBF)) => return Malformation::EncodedSurrogate,
        (0xF4, Some(0x90..=0xBF)) => return Malformation::OutOfRange,
        _ => {}
    }

    let continuations = bytes[1..]
        .iter()
        .take(needed - 1)
        .take_while(|&&b| is_continuation(b))
        .count();
    if 1 + continuations == bytes.len() {
        Malformation::Truncated
    } else {
        Malformation::MissingContinuation
    }
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}
