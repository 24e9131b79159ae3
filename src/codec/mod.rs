//! Code formats
//!
//! - U3: human-readable segmented code with CHIP
//! - U4: base64url JSON of the normalized profile with CHIP
//! - U5: three packed 16-bit words for the Western, Chinese and fusion profiles
//! - U7: segmented code carrying truncated QSIG and B3 signatures
//!
//! U3 and U7 share the `E|MOD|COG|INT` profile segments.

pub mod u3;
pub mod u4;
pub mod u5;
pub mod u7;

pub use u3::{encode_u3, format_u3, parse_u3, validate_u3, U3Fields};
pub use u4::{decode_u4, encode_u4, U4Payload};
pub use u5::{
    decode_u5, encode_u5, validate_u5, ChineseWord, FusionWord, U5Fields, WesternWord,
};
pub use u7::{format_u7, parse_u7, validate_u7, verify_u7, U7Fields};

use crate::error::HcsError;
use crate::types::{NormalizedCognition, NormalizedInteraction, NormalizedModal, NormalizedProfile};
use regex::Captures;

/// Regex fragment matching the shared profile segments, with named groups
const PROFILE_SEGMENTS_PATTERN: &str = concat!(
    r"E:(?P<element>[AEWF])",
    r"\|MOD:c(?P<cardinal>100|\d{2})f(?P<fixed>100|\d{2})m(?P<mutable>100|\d{2})",
    r"\|COG:F(?P<fluid>100|\d{2})C(?P<crystallized>100|\d{2})V(?P<verbal>100|\d{2})",
    r"S(?P<strategic>100|\d{2})Cr(?P<creative>100|\d{2})",
    r"\|INT:PB=(?P<pace>[BFS]),SM=(?P<structure>[LMH]),TN=(?P<tone>[WNSP])",
);

/// `E:<l>|MOD:c..f..m..|COG:F..C..V..S..Cr..|INT:PB=.,SM=.,TN=.`
fn profile_segments(profile: &NormalizedProfile) -> String {
    let modal = &profile.modal;
    let cog = &profile.cog;
    let int = &profile.int;

    format!(
        "E:{}|MOD:c{:02}f{:02}m{:02}|COG:F{:02}C{:02}V{:02}S{:02}Cr{:02}|INT:PB={},SM={},TN={}",
        profile.element,
        modal.c,
        modal.f,
        modal.m,
        cog.fluid,
        cog.crystallized,
        cog.verbal,
        cog.strategic,
        cog.creative,
        int.pace,
        int.structure,
        int.tone,
    )
}

/// Rebuild a normalized profile from a match of [`PROFILE_SEGMENTS_PATTERN`]
fn profile_from_captures(caps: &Captures<'_>) -> Result<NormalizedProfile, HcsError> {
    let text = |name: &str| -> Result<String, HcsError> {
        caps.name(name)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| HcsError::InvalidCode(format!("missing {name} segment")))
    };
    let percent = |name: &str| -> Result<u8, HcsError> {
        let value = text(name)?;
        value
            .parse::<u8>()
            .map_err(|e| HcsError::InvalidCode(format!("bad {name} value {value:?}: {e}")))
    };

    Ok(NormalizedProfile {
        element: text("element")?,
        modal: NormalizedModal {
            c: percent("cardinal")?,
            f: percent("fixed")?,
            m: percent("mutable")?,
        },
        cog: NormalizedCognition {
            fluid: percent("fluid")?,
            crystallized: percent("crystallized")?,
            verbal: percent("verbal")?,
            strategic: percent("strategic")?,
            creative: percent("creative")?,
        },
        int: NormalizedInteraction {
            pace: text("pace")?,
            structure: text("structure")?,
            tone: text("tone")?,
        },
    })
}
