//! Chunked modular reduction over a digest's hexadecimal digit groups.
//!
//! A SHA-256 digest does not fit a native integer, and the only thing the
//! oracle needs from it is a tiny remainder. Folding four hex digits (one
//! 16-bit word) at a time, carrying the running remainder forward, gives the
//! exact remainder of the full digest without big-integer arithmetic.

/// Reduce a digest modulo a small divisor.
///
/// Each two-byte chunk of the digest is one group of four hexadecimal
/// digits. Groups are folded from the most significant end; the carried
/// remainder stays below `divisor`, so the intermediate
/// `(remainder << 16) | word` always fits in 32 bits.
pub(in crate::ore) fn fold_digest_mod(digest: &[u8], divisor: u16) -> u16 {
    debug_assert!(divisor > 0, "modular reduction requires a non-zero divisor");

    let mut remainder: u32 = 0;
    for group in digest.chunks(2) {
        let mut word: u32 = 0;
        for byte in group {
            word = (word << 8) | u32::from(*byte);
        }
        let shift: u32 = if group.len() == 2 { 16 } else { 8 };
        remainder = ((remainder << shift) | word) % u32::from(divisor);
    }

    // The remainder is strictly below the 16-bit divisor.
    #[expect(clippy::cast_possible_truncation)]
    let remainder = remainder as u16;
    remainder
}

///
/// TESTS
///
