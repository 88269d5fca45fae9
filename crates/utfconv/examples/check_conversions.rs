//! Exercises both converters on a handful of sample strings and prints one
//! `[description]: PASSED` or `[description]: FAILED` line per check.
//!
//! Run with
//!
//! ```bash
//! cargo run -p utfconv --example check_conversions
//! ```
//!
//! The process exits with a non-zero status if any check failed.

use std::process::ExitCode;

use utfconv::{Malformation, to_utf8, to_utf16};

struct Report {
    failed: usize,
}

impl Report {
    fn check(&mut self, condition: bool, description: &str) {
        if condition {
            println!("[{description}]: PASSED");
        } else {
            self.failed += 1;
            println!("[{description}]: FAILED");
        }
    }
}

fn main() -> ExitCode {
    println!("*** UTF-16/UTF-8 conversion checks ***\n");
    let mut report = Report { failed: 0 };

    // Empty strings
    report.check(to_utf8(&[]).is_ok_and(|s| s.is_empty()), "Empty UTF-16 string");
    report.check(to_utf16(&[]).is_ok_and(|s| s.is_empty()), "Empty UTF-8 string");

    // U+5B66, a Japanese kanji meaning "learn, study".
    // UTF-16: 0x5B66; UTF-8: 0xE5 0xAD 0xA6.
    let utf16: Vec<u16> = "Japanese kanji \u{5B66}".encode_utf16().collect();
    let again = to_utf8(&utf16).and_then(|utf8| to_utf16(&utf8));
    report.check(again.as_ref() == Ok(&utf16), "String with Japanese kanji");

    let utf8 = to_utf8(&[0x5B66]);
    report.check(utf8.as_ref().is_ok_and(|b| b.len() == 3), "UTF-8 length");
    report.check(
        utf8.as_deref() == Ok(&[0xE5, 0xAD, 0xA6][..]),
        "UTF-8 encoding",
    );

    // U+1F600 needs a surrogate pair and four UTF-8 bytes.
    let pair = [0xD83D, 0xDE00];
    let emoji = to_utf8(&pair);
    report.check(
        emoji.as_deref() == Ok(&[0xF0, 0x9F, 0x98, 0x80][..]),
        "Supplementary-plane character",
    );

    let lone = to_utf8(&[0xD800]);
    report.check(
        matches!(lone, Err(ref err) if err.is_invalid_sequence()),
        "Unpaired surrogate rejected",
    );

    let truncated = to_utf16(&[0xE5, 0xAD]);
    report.check(
        matches!(
            truncated,
            Err(utfconv::ConversionError::InvalidSequence(ref invalid))
                if invalid.malformation() == Malformation::Truncated
        ),
        "Truncated UTF-8 rejected",
    );

    let overlong = to_utf16(&[0xC0, 0xAF]);
    if let Err(err) = &overlong {
        println!("    overlong input: {err}");
    }
    report.check(overlong.is_err(), "Overlong UTF-8 rejected");

    if report.failed == 0 {
        ExitCode::SUCCESS
    } else {
        println!("\n{} check(s) failed", report.failed);
        ExitCode::FAILURE
    }
}
