//! Canonical profile bytes
//!
//! `CanonicalBytes` is the only input the signature engine accepts. The
//! inner buffer is private and built by [`CanonicalBytes::new`], which fixes:
//! - Key order (struct declaration order, element names sorted)
//! - Float rendering (exactly four decimals, written as raw JSON numbers)
//! - Omission of the Chinese and fusion parts when there is no birth data

use crate::error::HcsError;
use crate::fusion::CombinedProfile;
use crate::types::NormalizedProfile;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

/// Compact, deterministic JSON bytes of a profile
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Build the canonical form of a normalized profile and, when present,
    /// the combined profile derived from birth data.
    ///
    /// Fails with [`HcsError::Encoding`] if a value cannot be rendered,
    /// e.g. a non-finite ratio.
    pub fn new(
        normalized: &NormalizedProfile,
        combined: Option<&CombinedProfile>,
    ) -> Result<Self, HcsError> {
        let payload = CanonicalProfile {
            normalized,
            chinese: combined.map(canonical_chinese),
            fusion: combined.map(|c| CanonicalFusion {
                fusion_id: &c.fusion.fusion_id,
                unified_balance: Fixed4(c.fusion.unified_balance),
                harmonic_resonance: Fixed4(c.fusion.harmonic_resonance),
            }),
        };

        let bytes = serde_json::to_vec(&payload)
            .map_err(|e| HcsError::Encoding(format!("canonical profile: {e}")))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Float always rendered with four decimal places
#[derive(Debug, Clone, Copy)]
struct Fixed4(f64);

impl Serialize for Fixed4 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(format!("{:.4}", self.0))
            .map_err(|_| S::Error::custom(format!("cannot render {} as JSON", self.0)))?;
        raw.serialize(serializer)
    }
}

#[derive(Serialize)]
struct CanonicalProfile<'a> {
    normalized: &'a NormalizedProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    chinese: Option<CanonicalChinese<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fusion: Option<CanonicalFusion<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalChinese<'a> {
    year_pillar: &'a str,
    month_pillar: &'a str,
    day_pillar: &'a str,
    hour_pillar: &'a str,
    yin_yang_balance: Fixed4,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    element_balance: Vec<CanonicalElement>,
    day_master: &'a str,
    day_master_strength: Fixed4,
}

#[derive(Serialize)]
struct CanonicalElement {
    name: &'static str,
    value: Fixed4,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalFusion<'a> {
    fusion_id: &'a str,
    unified_balance: Fixed4,
    harmonic_resonance: Fixed4,
}

fn canonical_chinese(combined: &CombinedProfile) -> CanonicalChinese<'_> {
    let chinese = &combined.chinese;

    let mut element_balance: Vec<CanonicalElement> = chinese
        .element_balance
        .iter()
        .map(|(element, &value)| CanonicalElement {
            name: element.as_str(),
            value: Fixed4(value),
        })
        .collect();
    element_balance.sort_by(|a, b| a.name.cmp(b.name));

    CanonicalChinese {
        year_pillar: &chinese.year_pillar,
        month_pillar: &chinese.month_pillar,
        day_pillar: &chinese.day_pillar,
        hour_pillar: &chinese.hour_pillar,
        yin_yang_balance: Fixed4(chinese.yin_yang_balance),
        element_balance,
        day_master: &chinese.day_master,
        day_master_strength: Fixed4(chinese.day_master_strength),
    }
}
