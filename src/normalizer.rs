//! Profile normalization
//!
//! This module maps a raw input profile to its canonical integer/letter form.
//! - Ratios clamped to 0-1 and converted to integer percentages
//! - Categorical preferences mapped to single letters
//! - Unknown or missing categoricals fall back to fixed defaults

use crate::types::{
    InputProfile, NormalizedCognition, NormalizedInteraction, NormalizedModal, NormalizedProfile,
    WesternElement,
};

/// Normalizer for converting input profiles to normalized profiles
pub struct Normalizer;

impl Normalizer {
    /// Normalize an input profile.
    ///
    /// Never fails: out-of-range ratios are clamped and unknown categorical
    /// values take their defaults. Strict checking lives in
    /// [`crate::validation`].
    pub fn normalize(input: &InputProfile) -> NormalizedProfile {
        let interaction = &input.interaction;

        NormalizedProfile {
            element: WesternElement::parse_or_default(&input.dominant_element)
                .letter()
                .to_string(),
            modal: NormalizedModal {
                c: to_percent(input.modal.cardinal),
                f: to_percent(input.modal.fixed),
                m: to_percent(input.modal.mutable),
            },
            cog: NormalizedCognition {
                fluid: to_percent(input.cognition.fluid),
                crystallized: to_percent(input.cognition.crystallized),
                verbal: to_percent(input.cognition.verbal),
                strategic: to_percent(input.cognition.strategic),
                creative: to_percent(input.cognition.creative),
            },
            int: NormalizedInteraction {
                pace: interaction.pace_or_default().letter().to_string(),
                structure: interaction.structure_or_default().letter().to_string(),
                tone: interaction.tone_or_default().letter().to_string(),
            },
        }
    }
}

/// Clamp a ratio to 0-1 and convert to an integer percentage.
///
/// Rounds half away from zero, so 0.315 becomes 32 and 1.0 becomes 100.
/// NaN is treated as 0.
pub fn to_percent(ratio: f64) -> u8 {
    if ratio.is_nan() {
        return 0;
    }
    (ratio.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CognitionProfile, InteractionPreferences, ModalBalance};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

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
    fn test_normalize_profile() {
        let normalized = Normalizer::normalize(&make_test_input());

        assert_eq!(
            normalized,
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
        );
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(to_percent(0.314), 31);
        assert_eq!(to_percent(0.315), 32);
        assert_eq!(to_percent(0.5), 50);
        assert_eq!(to_percent(1.0), 100);
        assert_eq!(to_percent(-0.5), 0);
        assert_eq!(to_percent(0.0), 0);
        assert_eq!(to_percent(1.7), 100);
        assert_eq!(to_percent(f64::NAN), 0);
    }

    #[test]
    fn test_unknown_categoricals_fall_back() {
        let mut input = make_test_input();
        input.dominant_element = "Aether".to_string();
        input.interaction = InteractionPreferences {
            pace: "glacial".to_string(),
            structure: String::new(),
            tone: "LOUD".to_string(),
        };

        let normalized = Normalizer::normalize(&input);
        assert_eq!(normalized.element, "E");
        assert_eq!(normalized.int.pace, "B");
        assert_eq!(normalized.int.structure, "M");
        assert_eq!(normalized.int.tone, "N");
    }

    #[test]
    fn test_normalized_json_layout() {
        let normalized = Normalizer::normalize(&make_test_input());
        let json = serde_json::to_string(&normalized).unwrap();
        assert_eq!(
            json,
            r#"{"element":"A","modal":{"c":31,"f":23,"m":46},"cog":{"F":52,"C":13,"V":53,"S":15,"Cr":33},"int":{"PB":"B","SM":"M","TN":"P"}}"#
        );
    }

    proptest! {
        #[test]
        fn percent_always_in_range(ratio in -10.0f64..10.0) {
            let pct = to_percent(ratio);
            prop_assert!(pct <= 100);
        }

        #[test]
        fn percent_is_monotonic(a in 0.0f64..1.0, b in 0.0f64..1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(to_percent(lo) <= to_percent(hi));
        }
    }
}
