#![no_main]
use std::cell::RefCell;

use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use utfconv::{ConversionError, to_utf8, to_utf16};

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Fragments that sit on or just past the edges of well-formed UTF-8, and
/// UTF-16LE surrogates, for splicing into inputs.
static EDGE_TABLE: &[&[u8]] = &[
    b"\xC0\x80",         // overlong NUL
    b"\xE0\x80\xAF",     // overlong '/'
    b"\xED\xA0\x80",     // encoded high surrogate
    b"\xED\xBF\xBF",     // encoded low surrogate
    b"\xF4\x90\x80\x80", // above U+10FFFF
    b"\xF4\x8F\xBF\xBF", // U+10FFFF
    b"\xE5\xAD",         // truncated U+5B66
    b"\xE5\xAD\xA6",     // U+5B66
    b"\xF0\x9F\x98\x80", // U+1F600
    b"\x80",
    b"\xFF",
    b"\x00\xD8", // lone high surrogate (LE)
    b"\x00\xDC", // lone low surrogate (LE)
    b"\x3D\xD8\x00\xDE", // U+1F600 as a surrogate pair (LE)
];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if seed % 4 != 0 {
        return fuzzer_mutate(data, size, max_size);
    }

    // Splice one edge fragment at a random position.
    with_rng(|rng| {
        let fragment = EDGE_TABLE[rng.random_range(0..EDGE_TABLE.len())];
        if size + fragment.len() > max_size {
            return fuzzer_mutate(data, size, max_size);
        }
        let at = if size == 0 { 0 } else { (rng.next_u32() as usize) % (size + 1) };
        data.copy_within(at..size, at + fragment.len());
        data[at..at + fragment.len()].copy_from_slice(fragment);
        size + fragment.len()
    })
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn conversions(data: &[u8]) {
    // UTF-8 input must agree with core's validator.
    match (to_utf16(data), std::str::from_utf8(data)) {
        (Ok(units), Ok(text)) => {
            assert_eq!(units, text.encode_utf16().collect::<Vec<_>>());
            assert_eq!(to_utf8(&units).as_deref(), Ok(data));
        }
        (Err(ConversionError::InvalidSequence(invalid)), Err(err)) => {
            assert_eq!(invalid.valid_up_to(), err.valid_up_to());
        }
        (ours, theirs) => panic!("utfconv {ours:?} but core {theirs:?} for {data:02X?}"),
    }

    // The same bytes read as UTF-16LE code units.
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    match (to_utf8(&units), String::from_utf16(&units)) {
        (Ok(bytes), Ok(text)) => {
            assert_eq!(bytes, text.as_bytes());
            assert_eq!(to_utf16(&bytes).as_deref(), Ok(units.as_slice()));
        }
        (Err(ConversionError::InvalidSequence(invalid)), Err(_)) => {
            assert!(String::from_utf16(&units[..invalid.offset()]).is_ok());
        }
        (ours, theirs) => panic!("utfconv {ours:?} but alloc {theirs:?} for {units:04X?}"),
    }
}

fuzz_target!(|data: &[u8]| conversions(data));
