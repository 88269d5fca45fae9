//! Strict UTF-16 ⇄ UTF-8 converters.
//!
//! Both converters run the same pipeline over a [`Transcoder`]:
//!
//! 1. Empty input returns an empty result without touching the transcoder.
//! 2. *Measure* the exact output length. A malformed source fails here with
//!    [`ConversionError::InvalidSequence`].
//! 3. *Materialize*: allocate exactly the measured length, let the transcoder
//!    fill it, and check that it wrote exactly that much. Any failure here is
//!    unexpected and surfaces as [`ConversionError::PlatformFailure`].
//!
//! The output buffer never leaves the converter unless every step succeeded.

use alloc::{vec, vec::Vec};

use crate::{
    error::{ConversionError, TranscodeError, codes},
    options::Validation,
    transcoder::{StdTranscoder, Transcoder},
};

/// Converts UTF-16 code units to UTF-8 bytes.
///
/// ```rust
/// use utfconv::Utf16ToUtf8Converter;
///
/// let converter = Utf16ToUtf8Converter::new();
/// assert_eq!(converter.convert(&[0x5B66]).unwrap(), [0xE5, 0xAD, 0xA6]);
/// assert!(converter.convert(&[0xD800]).is_err());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf16ToUtf8Converter<T = StdTranscoder> {
    transcoder: T,
}

impl Utf16ToUtf8Converter {
    /// Create a converter backed by [`StdTranscoder`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transcoder: StdTranscoder,
        }
    }
}

impl<T: Transcoder> Utf16ToUtf8Converter<T> {
    /// Create a converter backed by `transcoder`.
    #[must_use]
    pub const fn with_transcoder(transcoder: T) -> Self {
        Self { transcoder }
    }

    /// The transcoder this converter delegates to.
    #[must_use]
    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    /// Convert `utf16` to UTF-8, rejecting any unpaired surrogate.
    ///
    /// # Errors
    ///
    /// [`ConversionError::InvalidSequence`] if `utf16` is malformed, and
    /// [`ConversionError::PlatformFailure`] if the transcoder fails
    /// otherwise.
    pub fn convert(&self, utf16: &[u16]) -> Result<Vec<u8>, ConversionError> {
        self.run(utf16, Validation::Strict)
    }

    /// Convert `utf16` to UTF-8, replacing each unpaired surrogate with
    /// U+FFFD.
    ///
    /// # Errors
    ///
    /// [`ConversionError::PlatformFailure`] if the transcoder fails.
    pub fn convert_lossy(&self, utf16: &[u16]) -> Result<Vec<u8>, ConversionError> {
        self.run(utf16, Validation::Replace)
    }

    fn run(&self, utf16: &[u16], validation: Validation) -> Result<Vec<u8>, ConversionError> {
        if utf16.is_empty() {
            return Ok(Vec::new());
        }

        let len = self
            .transcoder
            .measure_utf16_to_utf8(utf16, validation)
            .map_err(measure_failed)?;
        materialize(len, |dst| {
            self.transcoder.encode_utf16_to_utf8(utf16, dst, validation)
        })
    }
}

/// Converts UTF-8 bytes to UTF-16 code units.
///
/// ```rust
/// use utfconv::Utf8ToUtf16Converter;
///
/// let converter = Utf8ToUtf16Converter::new();
/// assert_eq!(converter.convert("学".as_bytes()).unwrap(), [0x5B66]);
/// assert!(converter.convert(&[0xC0, 0x80]).is_err());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8ToUtf16Converter<T = StdTranscoder> {
    transcoder: T,
}

impl Utf8ToUtf16Converter {
    /// Create a converter backed by [`StdTranscoder`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transcoder: StdTranscoder,
        }
    }
}

impl<T: Transcoder> Utf8ToUtf16Converter<T> {
    /// Create a converter backed by `transcoder`.
    #[must_use]
    pub const fn with_transcoder(transcoder: T) -> Self {
        Self { transcoder }
    }

    /// The transcoder this converter delegates to.
    #[must_use]
    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    /// Convert `utf8` to UTF-16, rejecting overlong forms, encoded
    /// surrogates, out-of-range code points, and truncated or otherwise
    /// malformed sequences.
    ///
    /// # Errors
    ///
    /// [`ConversionError::InvalidSequence`] if `utf8` is malformed, and
    /// [`ConversionError::PlatformFailure`] if the transcoder fails
    /// otherwise.
    pub fn convert(&self, utf8: &[u8]) -> Result<Vec<u16>, ConversionError> {
        self.run(utf8, Validation::Strict)
    }

    /// Convert `utf8` to UTF-16, replacing each maximal invalid subpart with
    /// U+FFFD.
    ///
    /// # Errors
    ///
    /// [`ConversionError::PlatformFailure`] if the transcoder fails.
    pub fn convert_lossy(&self, utf8: &[u8]) -> Result<Vec<u16>, ConversionError> {
        self.run(utf8, Validation::Replace)
    }

    fn run(&self, utf8: &[u8], validation: Validation) -> Result<Vec<u16>, ConversionError> {
        if utf8.is_empty() {
            return Ok(Vec::new());
        }

        let len = self
            .transcoder
            .measure_utf8_to_utf16(utf8, validation)
            .map_err(measure_failed)?;
        materialize(len, |dst| {
            self.transcoder.encode_utf8_to_utf16(utf8, dst, validation)
        })
    }
}

fn measure_failed(err: TranscodeError) -> ConversionError {
    match err {
        TranscodeError::Invalid(invalid) => ConversionError::InvalidSequence(invalid),
        other => ConversionError::PlatformFailure(other.code()),
    }
}

/// Allocate `len` units, let `fill` write them, and hand the buffer out only
/// if exactly `len` units were written.
fn materialize<U, F>(len: usize, fill: F) -> Result<Vec<U>, ConversionError>
where
    U: Copy + Default,
    F: FnOnce(&mut [U]) -> Result<usize, TranscodeError>,
{
    // Non-empty input always needs at least one output unit.
    if len == 0 {
        return Err(ConversionError::PlatformFailure(codes::INVALID_DATA));
    }

    let mut out = vec![U::default(); len];
    let written = fill(&mut out).map_err(|err| ConversionError::PlatformFailure(err.code()))?;
    if written != len {
        return Err(ConversionError::PlatformFailure(codes::INVALID_DATA));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::error::{InvalidSequence, Malformation};

    /// Delegates to [`StdTranscoder`] but can be told to misbehave.
    #[derive(Debug, Default)]
    struct Faulty {
        measure: Option<Result<usize, TranscodeError>>,
        encode: Option<Result<usize, TranscodeError>>,
        calls: Cell<usize>,
    }

    impl Transcoder for Faulty {
        fn measure_utf16_to_utf8(
            &self,
            src: &[u16],
            validation: Validation,
        ) -> Result<usize, TranscodeError> {
            self.calls.set(self.calls.get() + 1);
            self.measure
                .unwrap_or_else(|| StdTranscoder.measure_utf16_to_utf8(src, validation))
        }

        fn encode_utf16_to_utf8(
            &self,
            src: &[u16],
            dst: &mut [u8],
            validation: Validation,
        ) -> Result<usize, TranscodeError> {
            self.calls.set(self.calls.get() + 1);
            self.encode
                .unwrap_or_else(|| StdTranscoder.encode_utf16_to_utf8(src, dst, validation))
        }

        fn measure_utf8_to_utf16(
            &self,
            src: &[u8],
            validation: Validation,
        ) -> Result<usize, TranscodeError> {
            self.calls.set(self.calls.get() + 1);
            self.measure
                .unwrap_or_else(|| StdTranscoder.measure_utf8_to_utf16(src, validation))
        }

        fn encode_utf8_to_utf16(
            &self,
            src: &[u8],
            dst: &mut [u16],
            validation: Validation,
        ) -> Result<usize, TranscodeError> {
            self.calls.set(self.calls.get() + 1);
            self.encode
                .unwrap_or_else(|| StdTranscoder.encode_utf8_to_utf16(src, dst, validation))
        }
    }

    #[test]
    fn empty_input_skips_the_transcoder() {
        let faulty = Faulty {
            measure: Some(Err(TranscodeError::Other(1))),
            ..Default::default()
        };
        assert_eq!(
            Utf16ToUtf8Converter::with_transcoder(&faulty).convert(&[]),
            Ok(Vec::new())
        );
        assert_eq!(
            Utf8ToUtf16Converter::with_transcoder(&faulty).convert(&[]),
            Ok(Vec::new())
        );
        assert_eq!(faulty.calls.get(), 0);
    }

    #[test]
    fn measure_invalid_is_invalid_sequence() {
        let invalid = InvalidSequence::utf16(0, Malformation::UnpairedSurrogate(0xD800));
        let faulty = Faulty {
            measure: Some(Err(invalid.into())),
            ..Default::default()
        };
        let err = Utf16ToUtf8Converter::with_transcoder(&faulty)
            .convert(&[0x41])
            .unwrap_err();
        assert_eq!(err, ConversionError::InvalidSequence(invalid));
        // Materialization never ran.
        assert_eq!(faulty.calls.get(), 1);
    }

    #[test]
    fn measure_other_failure_keeps_its_code() {
        let faulty = Faulty {
            measure: Some(Err(TranscodeError::Other(8))),
            ..Default::default()
        };
        let err = Utf8ToUtf16Converter::with_transcoder(&faulty)
            .convert(b"a")
            .unwrap_err();
        assert_eq!(err, ConversionError::PlatformFailure(8));
    }

    #[test]
    fn zero_measurement_is_a_platform_failure() {
        let faulty = Faulty {
            measure: Some(Ok(0)),
            ..Default::default()
        };
        let err = Utf16ToUtf8Converter::with_transcoder(&faulty)
            .convert(&[0x41])
            .unwrap_err();
        assert_eq!(err, ConversionError::PlatformFailure(codes::INVALID_DATA));
    }

    #[test]
    fn encode_failure_is_a_platform_failure() {
        let faulty = Faulty {
            encode: Some(Err(TranscodeError::Other(14))),
            ..Default::default()
        };
        let err = Utf16ToUtf8Converter::with_transcoder(&faulty)
            .convert(&[0x5B66])
            .unwrap_err();
        assert_eq!(err, ConversionError::PlatformFailure(14));
        assert_eq!(faulty.calls.get(), 2);

        // Even a validity complaint in the second phase is unexpected.
        let faulty = Faulty {
            encode: Some(Err(
                InvalidSequence::utf8(0, Malformation::Truncated).into()
            )),
            ..Default::default()
        };
        let err = Utf8ToUtf16Converter::with_transcoder(&faulty)
            .convert(b"abc")
            .unwrap_err();
        assert_eq!(
            err,
            ConversionError::PlatformFailure(codes::NO_UNICODE_TRANSLATION)
        );
    }

    #[test]
    fn short_write_is_a_platform_failure() {
        let faulty = Faulty {
            encode: Some(Ok(1)),
            ..Default::default()
        };
        let err = Utf8ToUtf16Converter::with_transcoder(&faulty)
            .convert(b"abc")
            .unwrap_err();
        assert_eq!(err, ConversionError::PlatformFailure(codes::INVALID_DATA));
    }

    #[test]
    fn undersized_measurement_is_insufficient_buffer() {
        // The transcoder under-reports, so the real encode runs out of room.
        let faulty = Faulty {
            measure: Some(Ok(2)),
            ..Default::default()
        };
        let err = Utf16ToUtf8Converter::with_transcoder(&faulty)
            .convert(&[0x5B66])
            .unwrap_err();
        assert_eq!(
            err,
            ConversionError::PlatformFailure(codes::INSUFFICIENT_BUFFER)
        );
    }

    #[test]
    fn oversized_measurement_is_detected() {
        // Source length would be 3; the result must equal the measurement.
        let faulty = Faulty {
            measure: Some(Ok(3)),
            ..Default::default()
        };
        let err = Utf8ToUtf16Converter::with_transcoder(&faulty)
            .convert("学".as_bytes())
            .unwrap_err();
        assert_eq!(err, ConversionError::PlatformFailure(codes::INVALID_DATA));
    }

    #[test]
    fn utf8_result_length_is_the_measured_length() {
        let utf16 = Utf8ToUtf16Converter::new()
            .convert("学び".as_bytes())
            .unwrap();
        assert_eq!(utf16, [0x5B66, 0x3073]);
        assert_eq!(utf16.len(), 2);
    }

    #[test]
    fn lossy_replaces_instead_of_failing() {
        assert_eq!(
            Utf16ToUtf8Converter::new().convert_lossy(&[0x41, 0xD800]),
            Ok(alloc::vec![0x41, 0xEF, 0xBF, 0xBD])
        );
        assert_eq!(
            Utf8ToUtf16Converter::new().convert_lossy(&[0xC0, 0x80]),
            Ok(alloc::vec![0xFFFD, 0xFFFD])
        );
    }

    #[test]
    fn transcoder_accessor_returns_the_backend() {
        let converter = Utf16ToUtf8Converter::new();
        assert_eq!(*converter.transcoder(), StdTranscoder);
    }
}
