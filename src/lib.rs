//! HCS Codes - Deterministic, signed personality profile codes
//!
//! Turns a Western personality profile, optionally with birth data, into a
//! family of versioned codes bound to a salted fingerprint and keyed
//! signatures: input validation → normalization → BaZi calendar → fusion →
//! canonicalization → signatures → codecs.
//!
//! ## Codes
//!
//! - **HCS-U3**: human-readable segmented profile with CHIP
//! - **HCS-U4**: base64url JSON of the normalized profile
//! - **HCS-U5**: packed Western/Chinese/fusion words (requires birth info)
//! - **HCS-U7**: segmented profile with QSIG and B3 signatures

pub mod bazi;
pub mod canonical;
pub mod chinese;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod fusion;
pub mod normalizer;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use canonical::CanonicalBytes;
pub use chinese::ChineseProfile;
pub use config::{HcsConfig, Salt, SecretKey};
pub use error::HcsError;
pub use fusion::{CombinedProfile, FusionEngine, FusionProfile, WesternProfile};
pub use pipeline::{GenerateOptions, HcsGenerator, HcsOutput};
pub use types::{BirthInfo, InputProfile, NormalizedProfile};
pub use validation::validate_input;

/// Crate version, reported by the `hcsgen` binary
pub const HCS_VERSION: &str = env!("CARGO_PKG_VERSION");
