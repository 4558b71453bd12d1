//! Keyed ordering oracle.
//!
//! Turns one query ciphertext and one stored ciphertext into a three-way
//! verdict without touching plaintext. This is a difference-reveal scheme:
//! the stored tag at the query's domain position differs from a
//! hash-derived blinding pad by exactly the trit encoding the comparison,
//! so the pad is derived per comparison and subtracted mod 3.

mod ciphertext;
mod reduce;

pub use ciphertext::{MalformedCiphertext, QueryCiphertext, StoredCiphertext};

use crate::obs::sink::{MetricsEvent, record};
use sha2::{Digest, Sha256};

/// Trit modulus of the difference-reveal scheme.
const TRIT_MODULUS: i16 = 3;

///
/// Verdict
///
/// Three-way relation of the query's plaintext against the stored one.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Equal,
    Greater,
    Less,
}

/// Compare a query ciphertext against a stored ciphertext.
///
/// Malformed input is rejected before any derivation; there is no partial
/// or degraded result.
pub fn compare(
    query: &QueryCiphertext,
    stored: &StoredCiphertext,
) -> Result<Verdict, MalformedCiphertext> {
    query.validate()?;
    stored.validate()?;
    let tag = stored.tag_at(query.domain_index)?;

    let pad = blinding_pad(&query.material, &stored.nonce);
    let trit = (i16::from(tag) - i16::from(pad)).rem_euclid(TRIT_MODULUS);

    record(MetricsEvent::OracleCompare);

    Ok(match trit {
        0 => Verdict::Equal,
        1 => Verdict::Greater,
        _ => Verdict::Less,
    })
}

/// Derive the blinding pad for one (material, nonce) pair.
///
/// `reduce3(Sha256(material ‖ nonce))`, reduced over the digest's hex digit
/// groups so no big-integer arithmetic is needed.
pub(crate) fn blinding_pad(material: &[u8], nonce: &[u8]) -> u8 {
    let mut hasher = Sha256::new();
    hasher.update(material);
    hasher.update(nonce);
    let digest = hasher.finalize();

    // fold_digest_mod returns a value strictly below 3.
    #[expect(clippy::cast_possible_truncation)]
    let pad = reduce::fold_digest_mod(&digest, 3) as u8;
    pad
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestOreKey;

    #[test]
    fn pad_is_deterministic_and_a_trit() {
        let first = blinding_pad(b"material", b"nonce");
        let second = blinding_pad(b"material", b"nonce");
        assert_eq!(first, second);
        assert!(first <= 2);
    }

    #[test]
    fn pad_depends_on_both_inputs() {
        // Not a security claim; just catches a concatenation mix-up where
        // one input is ignored.
        let pads: Vec<u8> = (0u8..32)
            .map(|i| blinding_pad(&[i], b"fixed-nonce"))
            .collect();
        assert!(pads.iter().any(|p| *p != pads[0]));
    }

    #[test]
    fn equal_value_yields_equal_verdict() {
        let key = TestOreKey::new(b"k1", 16);
        let stored = key.encrypt(9, b"nonce-9");
        let verdict = compare(&key.query(9), &stored).expect("well-formed comparison");
        assert_eq!(verdict, Verdict::Equal);
    }

    #[test]
    fn verdicts_track_plaintext_order() {
        let key = TestOreKey::new(b"k2", 16);
        let stored = key.encrypt(7, b"nonce-7");

        assert_eq!(compare(&key.query(11), &stored), Ok(Verdict::Greater));
        assert_eq!(compare(&key.query(3), &stored), Ok(Verdict::Less));
    }

    #[test]
    fn swapped_comparison_yields_the_complementary_verdict() {
        let key = TestOreKey::new(b"k3", 16);
        let low = key.encrypt(4, b"nonce-4");
        let high = key.encrypt(12, b"nonce-12");

        assert_eq!(compare(&key.query(12), &low), Ok(Verdict::Greater));
        assert_eq!(compare(&key.query(4), &high), Ok(Verdict::Less));

        let same = key.encrypt(5, b"nonce-5");
        assert_eq!(compare(&key.query(5), &same), Ok(Verdict::Equal));
    }

    #[test]
    fn short_tag_array_fails_instead_of_returning_a_verdict() {
        let key = TestOreKey::new(b"k4", 4);
        let mut stored = key.encrypt(2, b"nonce-2");
        stored.tags.truncate(2);

        assert_eq!(
            compare(&key.query(3), &stored),
            Err(MalformedCiphertext::TagIndexOutOfRange {
                domain_index: 3,
                len: 2,
            })
        );
    }
}
