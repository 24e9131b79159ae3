//! Strict input validation
//!
//! The normalizer is lenient and maps anything unknown to a default. The
//! generator runs this check first so that unknown vocabulary and
//! out-of-range ratios are reported instead of silently coerced.

use crate::chinese::validate_birth_info;
use crate::error::HcsError;
use crate::types::{InputProfile, Pace, Structure, Tone, WesternElement};

/// Validate an input profile and return it with empty interaction fields
/// filled with their defaults.
pub fn validate_input(input: &InputProfile) -> Result<InputProfile, HcsError> {
    if WesternElement::parse(&input.dominant_element).is_none() {
        return Err(HcsError::Validation(format!(
            "invalid dominant element: {}",
            input.dominant_element
        )));
    }

    let modal = &input.modal;
    let cog = &input.cognition;
    let ratios = [
        ("modal.cardinal", modal.cardinal),
        ("modal.fixed", modal.fixed),
        ("modal.mutable", modal.mutable),
        ("cognition.fluid", cog.fluid),
        ("cognition.crystallized", cog.crystallized),
        ("cognition.verbal", cog.verbal),
        ("cognition.strategic", cog.strategic),
        ("cognition.creative", cog.creative),
    ];
    for (field, value) in ratios {
        check_ratio(field, value)?;
    }

    let mut validated = input.clone();
    let int = &mut validated.interaction;
    fill_default(&mut int.pace, Pace::default().as_str());
    fill_default(&mut int.structure, Structure::default().as_str());
    fill_default(&mut int.tone, Tone::default().as_str());

    if Pace::parse(&int.pace).is_none() {
        return Err(HcsError::Validation(format!("invalid pace: {}", int.pace)));
    }
    if Structure::parse(&int.structure).is_none() {
        return Err(HcsError::Validation(format!(
            "invalid structure: {}",
            int.structure
        )));
    }
    if Tone::parse(&int.tone).is_none() {
        return Err(HcsError::Validation(format!("invalid tone: {}", int.tone)));
    }

    if let Some(info) = &validated.birth_info {
        validate_birth_info(info)?;
    }

    Ok(validated)
}

/// NaN fails the range check as well
fn check_ratio(field: &str, value: f64) -> Result<(), HcsError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(HcsError::Validation(format!(
            "{field} must be between 0 and 1, got {value:.6}"
        )));
    }
    Ok(())
}

fn fill_default(value: &mut String, default: &str) {
    if value.is_empty() {
        *value = default.to_string();
    }
}
