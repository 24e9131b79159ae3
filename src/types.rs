//! Core types for HCS code generation
//!
//! This module defines the data structures that flow through each stage of the
//! generator: the raw input profile, its categorical vocabularies, the
//! normalized integer form used for hashing, and the five-element model shared
//! by the calendar and fusion engines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Western dominant element (four-element system)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WesternElement {
    Earth,
    Air,
    Water,
    Fire,
}

impl WesternElement {
    /// All elements in enumeration order; the first one is the fallback
    pub const ALL: [WesternElement; 4] = [
        WesternElement::Earth,
        WesternElement::Air,
        WesternElement::Water,
        WesternElement::Fire,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Earth" => Some(WesternElement::Earth),
            "Air" => Some(WesternElement::Air),
            "Water" => Some(WesternElement::Water),
            "Fire" => Some(WesternElement::Fire),
            _ => None,
        }
    }

    /// Parse with the lenient fallback to the first enumerated element
    pub fn parse_or_default(name: &str) -> Self {
        Self::parse(name).unwrap_or(Self::ALL[0])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WesternElement::Earth => "Earth",
            WesternElement::Air => "Air",
            WesternElement::Water => "Water",
            WesternElement::Fire => "Fire",
        }
    }

    pub fn letter(&self) -> char {
        match self {
            WesternElement::Earth => 'E',
            WesternElement::Air => 'A',
            WesternElement::Water => 'W',
            WesternElement::Fire => 'F',
        }
    }
}

/// Interaction pace preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    #[default]
    Balanced,
    Fast,
    Slow,
}

impl Pace {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "balanced" => Some(Pace::Balanced),
            "fast" => Some(Pace::Fast),
            "slow" => Some(Pace::Slow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Balanced => "balanced",
            Pace::Fast => "fast",
            Pace::Slow => "slow",
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Pace::Balanced => 'B',
            Pace::Fast => 'F',
            Pace::Slow => 'S',
        }
    }
}

/// Interaction structure preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Structure {
    Low,
    #[default]
    Medium,
    High,
}

impl Structure {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "low" => Some(Structure::Low),
            "medium" => Some(Structure::Medium),
            "high" => Some(Structure::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Structure::Low => "low",
            Structure::Medium => "medium",
            Structure::High => "high",
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Structure::Low => 'L',
            Structure::Medium => 'M',
            Structure::High => 'H',
        }
    }
}

/// Interaction tone preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Warm,
    #[default]
    Neutral,
    Sharp,
    Precise,
}

impl Tone {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "warm" => Some(Tone::Warm),
            "neutral" => Some(Tone::Neutral),
            "sharp" => Some(Tone::Sharp),
            "precise" => Some(Tone::Precise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Warm => "warm",
            Tone::Neutral => "neutral",
            Tone::Sharp => "sharp",
            Tone::Precise => "precise",
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Tone::Warm => 'W',
            Tone::Neutral => 'N',
            Tone::Sharp => 'S',
            Tone::Precise => 'P',
        }
    }
}

/// Distribution of astrological modalities (each ratio independently 0-1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalBalance {
    pub cardinal: f64,
    pub fixed: f64,
    pub mutable: f64,
}

/// Cognitive processing ratios (each 0-1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CognitionProfile {
    pub fluid: f64,
    pub crystallized: f64,
    pub verbal: f64,
    pub strategic: f64,
    pub creative: f64,
}

/// Raw interaction preferences as supplied by the caller.
///
/// Empty or unknown values are tolerated here; the normalizer maps them to
/// defaults and strict validation rejects the unknown ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionPreferences {
    #[serde(default)]
    pub pace: String,
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub tone: String,
}

impl InteractionPreferences {
    pub fn pace_or_default(&self) -> Pace {
        Pace::parse(&self.pace).unwrap_or_default()
    }

    pub fn structure_or_default(&self) -> Structure {
        Structure::parse(&self.structure).unwrap_or_default()
    }

    pub fn tone_or_default(&self) -> Tone {
        Tone::parse(&self.tone).unwrap_or_default()
    }

    /// Typed preferences with defaults applied
    pub fn resolve(&self) -> InteractionStyle {
        InteractionStyle {
            pace: self.pace_or_default(),
            structure: self.structure_or_default(),
            tone: self.tone_or_default(),
        }
    }
}

/// Interaction preferences after defaulting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionStyle {
    pub pace: Pace,
    pub structure: Structure,
    pub tone: Tone,
}

/// Birth date and time used by the BaZi calendar engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthInfo {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    /// IANA timezone name; empty or unknown means UTC
    #[serde(default)]
    pub timezone: String,
}

/// Complete input for HCS code generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProfile {
    /// "Earth" | "Air" | "Water" | "Fire"
    pub dominant_element: String,
    pub modal: ModalBalance,
    pub cognition: CognitionProfile,
    #[serde(default)]
    pub interaction: InteractionPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_info: Option<BirthInfo>,
}

/// Modal balance as integer percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedModal {
    pub c: u8,
    pub f: u8,
    pub m: u8,
}

/// Cognition ratios as integer percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCognition {
    #[serde(rename = "F")]
    pub fluid: u8,
    #[serde(rename = "C")]
    pub crystallized: u8,
    #[serde(rename = "V")]
    pub verbal: u8,
    #[serde(rename = "S")]
    pub strategic: u8,
    #[serde(rename = "Cr")]
    pub creative: u8,
}

/// Interaction preferences as single-letter codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedInteraction {
    #[serde(rename = "PB")]
    pub pace: String,
    #[serde(rename = "SM")]
    pub structure: String,
    #[serde(rename = "TN")]
    pub tone: String,
}

/// Normalized profile used for CHIP hashing and the segmented codes.
///
/// Field order is part of the hashed byte layout and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    pub element: String,
    pub modal: NormalizedModal,
    pub cog: NormalizedCognition,
    pub int: NormalizedInteraction,
}

/// One of the five Chinese elements.
///
/// Declaration order follows the generation cycle and doubles as the
/// tie-break order wherever a dominant element is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Wood => "Wood",
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Metal => "Metal",
            Element::Water => "Water",
        }
    }

    /// Position in the generation cycle (Wood = 0 .. Water = 4)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The element this one generates: Wood→Fire→Earth→Metal→Water→Wood
    pub fn generates(&self) -> Element {
        Element::ALL[(self.index() + 1) % 5]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yin/Yang polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Yin,
    Yang,
}

/// Ratio per Chinese element, iterated in generation-cycle order
pub type ElementBalance = BTreeMap<Element, f64>;

/// Balance of the strongest element; ties go to the earliest in cycle order
pub fn dominant_element(balance: &ElementBalance) -> Option<Element> {
    let mut best: Option<(Element, f64)> = None;
    for (&element, &value) in balance {
        match best {
            Some((_, max)) if value <= max => {}
            _ if value > 0.0 => best = Some((element, value)),
            _ => {}
        }
    }
    best.map(|(element, _)| element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_defaults() {
        let prefs = InteractionPreferences::default();
        assert_eq!(prefs.pace_or_default(), Pace::Balanced);
        assert_eq!(prefs.structure_or_default(), Structure::Medium);
        assert_eq!(prefs.tone_or_default(), Tone::Neutral);
        assert_eq!(WesternElement::parse_or_default("Aether"), WesternElement::Earth);
    }

    #[test]
    fn test_generation_cycle() {
        assert_eq!(Element::Wood.generates(), Element::Fire);
        assert_eq!(Element::Metal.generates(), Element::Water);
        assert_eq!(Element::Water.generates(), Element::Wood);
    }

    #[test]
    fn test_dominant_element_tie_break() {
        let balance: ElementBalance = Element::ALL.iter().map(|&e| (e, 0.2)).collect();
        assert_eq!(dominant_element(&balance), Some(Element::Wood));

        let mut skewed = balance.clone();
        skewed.insert(Element::Metal, 0.4);
        assert_eq!(dominant_element(&skewed), Some(Element::Metal));

        let empty: ElementBalance = Element::ALL.iter().map(|&e| (e, 0.0)).collect();
        assert_eq!(dominant_element(&empty), None);
    }

    #[test]
    fn test_input_profile_json_shape() {
        let json = r#"{
            "dominantElement": "Air",
            "modal": {"cardinal": 0.31, "fixed": 0.23, "mutable": 0.46},
            "cognition": {"fluid": 0.52, "crystallized": 0.13, "verbal": 0.53, "strategic": 0.15, "creative": 0.33},
            "interaction": {"pace": "balanced", "structure": "medium", "tone": "precise"},
            "birthInfo": {"year": 1990, "month": 6, "day": 15, "hour": 14, "minute": 30, "timezone": "UTC"}
        }"#;
        let input: InputProfile = serde_json::from_str(json).unwrap();
        assert_eq!(input.dominant_element, "Air");
        assert_eq!(input.birth_info.as_ref().map(|b| b.year), Some(1990));

        let value = serde_json::to_value(&input).unwrap();
        assert!(value.get("birthInfo").is_some());
        assert_eq!(value["interaction"]["tone"], "precise");
    }
}
