//! HCS-U3: `HCS-U3|E:..|MOD:..|COG:..|INT:..|CHIP:<12hex>`

use super::{profile_from_captures, profile_segments, PROFILE_SEGMENTS_PATTERN};
use crate::error::HcsError;
use crate::normalizer::Normalizer;
use crate::types::{InputProfile, NormalizedProfile};
use regex::Regex;
use once_cell::sync::Lazy;

pub const U3_PREFIX: &str = "HCS-U3|";

static U3_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^HCS-U3\|{PROFILE_SEGMENTS_PATTERN}\|CHIP:(?P<chip>[0-9a-f]{{12}})$"
    ))
    .expect("U3 pattern is valid")
});

/// Fields carried by a U3 code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct U3Fields {
    pub profile: NormalizedProfile,
    pub chip: String,
}

/// Encode an input profile with its CHIP
pub fn encode_u3(input: &InputProfile, chip: &str) -> String {
    format_u3(&Normalizer::normalize(input), chip)
}

/// Encode an already normalized profile with its CHIP
pub fn format_u3(profile: &NormalizedProfile, chip: &str) -> String {
    format!("{U3_PREFIX}{}|CHIP:{chip}", profile_segments(profile))
}

pub fn validate_u3(code: &str) -> bool {
    U3_PATTERN.is_match(code)
}

pub fn parse_u3(code: &str) -> Result<U3Fields, HcsError> {
    let caps = U3_PATTERN
        .captures(code)
        .ok_or_else(|| HcsError::InvalidCode("invalid HCS-U3 format".into()))?;

    Ok(U3Fields {
        profile: profile_from_captures(&caps)?,
        chip: caps["chip"].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CognitionProfile, InteractionPreferences, ModalBalance};
    use pretty_assertions::assert_eq;

    const EXAMPLE: &str =
        "HCS-U3|E:A|MOD:c31f23m46|COG:F52C13V53S15Cr33|INT:PB=B,SM=M,TN=P|CHIP:b04edb83f10e";

    fn make_test_input() -> InputProfile {
        InputProfile {
            dominant_element: "Air".to_string(),
            modal: ModalBalance {
                cardinal: 0.31,
                fixed: 0.23,
                mutable: 0.46,
            },
            cognition: CognitionProfile {
                fluid: 0.52,
                crystallized: 0.13,
                verbal: 0.53,
                strategic: 0.15,
                creative: 0.33,
            },
            interaction: InteractionPreferences {
                pace: "balanced".to_string(),
                structure: "medium".to_string(),
                tone: "precise".to_string(),
            },
            birth_info: None,
        }
    }

    #[test]
    fn test_encode_u3() {
        assert_eq!(encode_u3(&make_test_input(), "b04edb83f10e"), EXAMPLE);
    }

    #[test]
    fn test_validate_u3() {
        assert!(validate_u3(EXAMPLE));

        let invalid = [
            "",
            "HCS-U3",
            // Wrong prefix
            "HCS-U4|E:A|MOD:c31f23m46|COG:F52C13V53S15Cr33|INT:PB=B,SM=M,TN=P|CHIP:b04edb83f10e",
            // Unknown element letter
            "HCS-U3|E:X|MOD:c31f23m46|COG:F52C13V53S15Cr33|INT:PB=B,SM=M,TN=P|CHIP:b04edb83f10e",
            // Single-digit percentage
            "HCS-U3|E:A|MOD:c3f23m46|COG:F52C13V53S15Cr33|INT:PB=B,SM=M,TN=P|CHIP:b04edb83f10e",
            // Uppercase CHIP
            "HCS-U3|E:A|MOD:c31f23m46|COG:F52C13V53S15Cr33|INT:PB=B,SM=M,TN=P|CHIP:B04EDB83F10E",
            // Short CHIP
            "HCS-U3|E:A|MOD:c31f23m46|COG:F52C13V53S15Cr33|INT:PB=B,SM=M,TN=P|CHIP:b04edb",
            // Trailing data
            "HCS-U3|E:A|MOD:c31f23m46|COG:F52C13V53S15Cr33|INT:PB=B,SM=M,TN=P|CHIP:b04edb83f10e|",
        ];
        for code in invalid {
            assert!(!validate_u3(code), "{code}");
        }
    }

    #[test]
    fn test_full_scale_values_validate() {
        let mut input = make_test_input();
        input.modal.cardinal = 1.0;
        input.cognition.creative = 1.0;

        let code = encode_u3(&input, "b04edb83f10e");
        assert!(code.contains("MOD:c100f23m46"));
        assert!(validate_u3(&code));
        assert_eq!(parse_u3(&code).unwrap().profile.cog.creative, 100);
    }

    #[test]
    fn test_parse_u3() {
        let fields = parse_u3(EXAMPLE).unwrap();

        assert_eq!(fields.chip, "b04edb83f10e");
        assert_eq!(fields.profile, Normalizer::normalize(&make_test_input()));
    }

    #[test]
    fn test_parse_invalid_u3() {
        let err = parse_u3("HCS-U3|E:A").unwrap_err();
        assert!(matches!(err, HcsError::InvalidCode(_)));
    }
}
