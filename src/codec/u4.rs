//! HCS-U4: `HCS-U4|` + base64url (no padding) of `{"chip":..,"profile":..}`

use crate::error::HcsError;
use crate::types::NormalizedProfile;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

pub const U4_PREFIX: &str = "HCS-U4|";

/// JSON body of a U4 code; keys serialize in sorted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct U4Payload {
    pub chip: String,
    pub profile: NormalizedProfile,
}

pub fn encode_u4(profile: &NormalizedProfile, chip: &str) -> Result<String, HcsError> {
    let payload = U4Payload {
        chip: chip.to_string(),
        profile: profile.clone(),
    };
    let json = serde_json::to_vec(&payload)
        .map_err(|e| HcsError::Encoding(format!("U4 payload: {e}")))?;

    Ok(format!("{U4_PREFIX}{}", URL_SAFE_NO_PAD.encode(json)))
}

pub fn decode_u4(code: &str) -> Result<U4Payload, HcsError> {
    let encoded = code
        .strip_prefix(U4_PREFIX)
        .ok_or_else(|| HcsError::InvalidCode("invalid HCS-U4 format".into()))?;

    let json = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| HcsError::InvalidCode(format!("failed to decode U4: {e}")))?;

    serde_json::from_slice(&json)
        .map_err(|e| HcsError::InvalidCode(format!("failed to unmarshal U4 data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NormalizedCognition, NormalizedInteraction, NormalizedModal};
    use pretty_assertions::assert_eq;

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

    #[test]
    fn test_encode_u4() {
        let code = encode_u4(&make_test_normalized(), "73d7186ba27e").unwrap();
        assert_eq!(
            code,
            "HCS-U4|eyJjaGlwIjoiNzNkNzE4NmJhMjdlIiwicHJvZmlsZSI6eyJlbGVtZW50IjoiQSIsIm1vZGFsIjp7ImMiOjMxLCJmIjoyMywibSI6NDZ9LCJjb2ciOnsiRiI6NTIsIkMiOjEzLCJWIjo1MywiUyI6MTUsIkNyIjozM30sImludCI6eyJQQiI6IkIiLCJTTSI6Ik0iLCJUTiI6IlAifX19"
        );
        assert!(!code.contains('='));
    }

    #[test]
    fn test_decode_u4() {
        let code = encode_u4(&make_test_normalized(), "73d7186ba27e").unwrap();
        let payload = decode_u4(&code).unwrap();

        assert_eq!(payload.chip, "73d7186ba27e");
        assert_eq!(payload.profile, make_test_normalized());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        for code in ["", "HCS-U3|abc", "HCS-U4|!!!", "HCS-U4|bm90IGpzb24"] {
            let err = decode_u4(code).unwrap_err();
            assert!(matches!(err, HcsError::InvalidCode(_)), "{code}");
        }
    }
}
