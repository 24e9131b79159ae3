//! Generation pipeline
//!
//! This module provides the public entry point of the crate. It runs an
//! input profile through every stage and assembles the codes:
//!
//! 1. Validation - strict range and vocabulary checks
//! 2. Normalizer - integer percentages and letter codes
//! 3. CHIP - salted fingerprint of the normalized profile
//! 4. U3 / U4 - segmented and base64 codes (subject to options)
//! 5. Chinese profile, fusion and U5 - only when birth info is present
//! 6. Canonicalizer and signatures - QSIG and B3 for U7

use crate::canonical::CanonicalBytes;
use crate::chinese::ChineseProfile;
use crate::codec::{encode_u4, encode_u5, format_u3, format_u7};
use crate::config::{HcsConfig, Salt, SecretKey};
use crate::crypto::{compute_signatures, generate_chip};
use crate::error::HcsError;
use crate::fusion::{CombinedProfile, FusionEngine, WesternProfile};
use crate::normalizer::Normalizer;
use crate::types::{InputProfile, NormalizedProfile};
use crate::validation::validate_input;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Which of the U3/U4 codes to produce. U5 and U7 are unaffected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Skip U4
    pub u3_only: bool,
    /// Skip U3
    pub u4_only: bool,
}

/// Everything produced for one input profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HcsOutput {
    /// The validated input, with interaction defaults filled in
    pub input: InputProfile,
    /// Empty when `u4_only` was requested
    #[serde(rename = "codeU3")]
    pub code_u3: String,
    #[serde(rename = "codeU4", default, skip_serializing_if = "Option::is_none")]
    pub code_u4: Option<String>,
    #[serde(rename = "codeU5", default, skip_serializing_if = "Option::is_none")]
    pub code_u5: Option<String>,
    pub chip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_profile: Option<ChineseProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_profile: Option<CombinedProfile>,
    #[serde(rename = "codeU7")]
    pub code_u7: String,
    /// Full QSIG hex
    pub qsig: String,
    /// Full B3 hex
    pub b3sig: String,
}

/// HCS code generator bound to one salt and one secret.
///
/// Holds no mutable state; a single instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct HcsGenerator {
    salt: Salt,
    secret: SecretKey,
}

impl HcsGenerator {
    pub fn new(config: HcsConfig) -> Self {
        Self {
            salt: config.salt,
            secret: config.secret,
        }
    }

    /// Build a generator from `HCS_SECRET_KEY` and the salt file in
    /// `salt_dir` (see [`HcsConfig::from_env`])
    pub fn from_env(salt_dir: Option<&Path>) -> Result<Self, HcsError> {
        Ok(Self::new(HcsConfig::from_env(salt_dir)?))
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Generate all codes for a profile
    pub fn generate(&self, input: &InputProfile) -> Result<HcsOutput, HcsError> {
        self.generate_with_options(input, GenerateOptions::default())
    }

    pub fn generate_with_options(
        &self,
        input: &InputProfile,
        options: GenerateOptions,
    ) -> Result<HcsOutput, HcsError> {
        let input = validate_input(input)?;
        let salt = self.salt.as_bytes();

        let normalized = Normalizer::normalize(&input);
        let chip = generate_chip(salt, &normalized)?;
        debug!(element = %normalized.element, "profile normalized");

        let code_u3 = if options.u4_only {
            String::new()
        } else {
            format_u3(&normalized, &chip)
        };
        let code_u4 = if options.u3_only {
            None
        } else {
            Some(encode_u4(&normalized, &chip)?)
        };

        let (chinese_profile, combined_profile, code_u5) = match &input.birth_info {
            Some(info) => match ChineseProfile::compute(info) {
                Ok(chinese) => {
                    let western = WesternProfile::from_input(&input);
                    let combined = FusionEngine::combine(western, chinese.clone());
                    let code_u5 = encode_u5(
                        &combined.western,
                        &combined.chinese,
                        &combined.fusion,
                        salt,
                    );
                    debug!(fusion_id = %combined.fusion.fusion_id, "birth profile fused");
                    (Some(chinese), Some(combined), Some(code_u5))
                }
                Err(e) => {
                    warn!(error = %e, "failed to compute Chinese profile, skipping U5");
                    (None, None, None)
                }
            },
            None => (None, None, None),
        };

        let (code_u7, qsig, b3sig) = self.sign(&normalized, combined_profile.as_ref())?;
        debug!(
            u3 = !code_u3.is_empty(),
            u4 = code_u4.is_some(),
            u5 = code_u5.is_some(),
            "codes generated"
        );

        Ok(HcsOutput {
            input,
            code_u3,
            code_u4,
            code_u5,
            chip,
            chinese_profile,
            combined_profile,
            code_u7,
            qsig,
            b3sig,
        })
    }

    /// Canonicalize, sign and format U7; returns (U7, QSIG, B3)
    fn sign(
        &self,
        normalized: &NormalizedProfile,
        combined: Option<&CombinedProfile>,
    ) -> Result<(String, String, String), HcsError> {
        let canonical = CanonicalBytes::new(normalized, combined)?;
        let signatures =
            compute_signatures(&canonical, self.secret.as_bytes(), self.salt.as_bytes())?;
        let code_u7 = format_u7(normalized, &signatures)?;

        Ok((code_u7, signatures.qsig, signatures.b3))
    }
}
