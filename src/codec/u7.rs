//! HCS-U7: `HCS-U7|V:7.0|ALG:QS|E:..|MOD:..|COG:..|INT:..|QSIG:<24hex>|B3:<32hex>`
//!
//! The inline signatures are prefixes of the full QSIG and B3 hex digests.

use super::{profile_from_captures, profile_segments, PROFILE_SEGMENTS_PATTERN};
use crate::canonical::CanonicalBytes;
use crate::crypto::{compute_signatures, Signatures};
use crate::error::HcsError;
use crate::types::NormalizedProfile;
use regex::Regex;
use once_cell::sync::Lazy;

pub const U7_PREFIX: &str = "HCS-U7|V:7.0|ALG:QS|";

/// Inline length of the QSIG segment
pub const QSIG_INLINE_LEN: usize = 24;

/// Inline length of the B3 segment
pub const B3_INLINE_LEN: usize = 32;

static U7_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^HCS-U7\|V:7\.0\|ALG:QS\|{PROFILE_SEGMENTS_PATTERN}\|QSIG:(?P<qsig>[0-9a-f]{{{QSIG_INLINE_LEN}}})\|B3:(?P<b3>[0-9a-f]{{{B3_INLINE_LEN}}})$"
    ))
    .expect("U7 pattern is valid")
});

/// Fields carried by a U7 code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct U7Fields {
    pub profile: NormalizedProfile,
    /// QSIG prefix as it appears in the code
    pub qsig: String,
    /// B3 prefix as it appears in the code
    pub b3: String,
}

/// Assemble a U7 code; fails if either signature is empty
pub fn format_u7(profile: &NormalizedProfile, signatures: &Signatures) -> Result<String, HcsError> {
    if signatures.qsig.is_empty() || signatures.b3.is_empty() {
        return Err(HcsError::Encoding("signatures must not be empty".into()));
    }

    Ok(format!(
        "{U7_PREFIX}{}|QSIG:{}|B3:{}",
        profile_segments(profile),
        truncated(&signatures.qsig, QSIG_INLINE_LEN),
        truncated(&signatures.b3, B3_INLINE_LEN),
    ))
}

fn truncated(hex: &str, len: usize) -> &str {
    hex.get(..len).unwrap_or(hex)
}

pub fn validate_u7(code: &str) -> bool {
    U7_PATTERN.is_match(code)
}

pub fn parse_u7(code: &str) -> Result<U7Fields, HcsError> {
    let caps = U7_PATTERN
        .captures(code)
        .ok_or_else(|| HcsError::InvalidCode("invalid HCS-U7 format".into()))?;

    Ok(U7Fields {
        profile: profile_from_captures(&caps)?,
        qsig: caps["qsig"].to_string(),
        b3: caps["b3"].to_string(),
    })
}

/// Check a U7 code against the canonical bytes it should sign.
///
/// Returns `Ok(false)` when the code is well formed but either inline
/// signature does not match.
pub fn verify_u7(
    code: &str,
    canonical: &CanonicalBytes,
    secret: &[u8],
    salt: &[u8],
) -> Result<bool, HcsError> {
    let fields = parse_u7(code)?;
    let expected = compute_signatures(canonical, secret, salt)?;

    Ok(truncated(&expected.qsig, QSIG_INLINE_LEN) == fields.qsig
        && truncated(&expected.b3, B3_INLINE_LEN) == fields.b3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NormalizedCognition, NormalizedInteraction, NormalizedModal};
    use pretty_assertions::assert_eq;

    const SECRET: [u8; 32] = [0x11; 32];

    fn make_test_salt() -> Vec<u8> {
        (0u8..32).collect()
    }

    fn make_test_normalized() -> NormalizedProfile {
        NormalizedProfile {
            element: "A".to_string(),
            modal: NormalizedModal { c: 31, f: 23, m: 46 },
            cog: NormalizedCognition {
                fluid: 52,
                crystallized: 13,
                verbal: 53,
                strategic: 15,
                creative: 33,
            },
            int: NormalizedInteraction {
                pace: "B".to_string(),
                structure: "M".to_string(),
                tone: "P".to_string(),
            },
        }
    }

    fn make_test_signatures() -> Signatures {
        Signatures {
            qsig: "0c01a3eb751712e46b737372fac9b6000e2d6d7bfb5ba78102f11c7986a60f28".to_string(),
            b3: "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff".to_string(),
        }
    }

    #[test]
    fn test_format_u7() {
        let code = format_u7(&make_test_normalized(), &make_test_signatures()).unwrap();

        assert_eq!(
            code,
            "HCS-U7|V:7.0|ALG:QS|E:A|MOD:c31f23m46|COG:F52C13V53S15Cr33|INT:PB=B,SM=M,TN=P\
             |QSIG:0c01a3eb751712e46b737372|B3:00112233445566778899aabbccddeeff"
        );
        assert!(validate_u7(&code));
    }

    #[test]
    fn test_empty_signature_rejected() {
        let mut sigs = make_test_signatures();
        sigs.b3.clear();
        assert!(matches!(
            format_u7(&make_test_normalized(), &sigs),
            Err(HcsError::Encoding(_))
        ));

        let mut sigs = make_test_signatures();
        sigs.qsig.clear();
        assert!(format_u7(&make_test_normalized(), &sigs).is_err());
    }

    #[test]
    fn test_parse_u7() {
        let code = format_u7(&make_test_normalized(), &make_test_signatures()).unwrap();
        let fields = parse_u7(&code).unwrap();

        assert_eq!(fields.profile, make_test_normalized());
        assert_eq!(fields.qsig, "0c01a3eb751712e46b737372");
        assert_eq!(fields.b3, "00112233445566778899aabbccddeeff");

        assert!(!validate_u7("HCS-U7|V:7.0|ALG:QS|E:A"));
        assert!(matches!(parse_u7("HCS-U3|x"), Err(HcsError::InvalidCode(_))));
    }

    #[test]
    fn test_verify_u7() {
        let canonical = CanonicalBytes::new(&make_test_normalized(), None).unwrap();
        let sigs = compute_signatures(&canonical, &SECRET, &make_test_salt()).unwrap();
        let code = format_u7(&make_test_normalized(), &sigs).unwrap();

        assert!(verify_u7(&code, &canonical, &SECRET, &make_test_salt()).unwrap());
        assert!(!verify_u7(&code, &canonical, &[0x22; 32], &make_test_salt()).unwrap());
        assert!(!verify_u7(&code, &canonical, &SECRET, &[0u8; 32]).unwrap());

        let mut other = make_test_normalized();
        other.modal.c = 32;
        let other_canonical = CanonicalBytes::new(&other, None).unwrap();
        assert!(!verify_u7(&code, &other_canonical, &SECRET, &make_test_salt()).unwrap());
    }
}
