//! HCS-U5: `HCS-U5|<fid>|W:<4hex>|C:<4hex>|F:<4hex>|CHIP:<12hex>`
//!
//! Each profile is packed into one 16-bit word. Ratios are scaled to 0-7
//! and truncated toward zero.
//!
//! The U5 CHIP hashes a field-by-field text rendering of the three profiles
//! (`&{Field:value ...}`, maps as `map[key:value ...]` with sorted keys,
//! floats in shortest form). This differs from the JSON used for the
//! normalized CHIP and is kept so existing U5 codes stay reproducible.

use crate::bazi::HEAVENLY_STEMS;
use crate::chinese::ChineseProfile;
use crate::crypto::salted_chip;
use crate::error::HcsError;
use crate::fusion::{element_squared_deviation, CognitiveFusion, FusionProfile, WesternProfile};
use crate::types::{Element, ElementBalance, Pace, Structure, Tone, WesternElement};
use regex::Regex;
use once_cell::sync::Lazy;

pub const U5_PREFIX: &str = "HCS-U5|";

/// Fusion ID used when the computed one is not exactly two characters
const FALLBACK_FUSION_ID: &str = "XX";

static U5_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^HCS-U5\|(?P<fid>[A-Z0-9]{2})",
        r"\|W:(?P<western>[0-9a-f]{4})\|C:(?P<chinese>[0-9a-f]{4})\|F:(?P<fusion>[0-9a-f]{4})",
        r"\|CHIP:(?P<chip>[0-9a-f]{12})$",
    ))
    .expect("U5 pattern is valid")
});

/// Ratio to a 3-bit scale, truncating
fn scale7(ratio: f64) -> u8 {
    ((ratio * 7.0) as u8) & 0x7
}

/// Western word: element 15-14, modal ratios 12-10/9-7/6-4, pace 3-2,
/// high structure 1, sharp or precise tone 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WesternWord {
    pub element: WesternElement,
    pub cardinal: u8,
    pub fixed: u8,
    pub mutable: u8,
    pub pace: Pace,
    pub high_structure: bool,
    pub pointed_tone: bool,
}

impl WesternWord {
    pub fn from_profile(western: &WesternProfile) -> Self {
        let interaction = &western.interaction;
        Self {
            element: western.dominant_element,
            cardinal: scale7(western.modal.cardinal),
            fixed: scale7(western.modal.fixed),
            mutable: scale7(western.modal.mutable),
            pace: interaction.pace,
            high_structure: interaction.structure == Structure::High,
            pointed_tone: matches!(interaction.tone, Tone::Sharp | Tone::Precise),
        }
    }

    pub fn pack(&self) -> u16 {
        let element: u16 = match self.element {
            WesternElement::Fire => 0,
            WesternElement::Earth => 1,
            WesternElement::Air => 2,
            WesternElement::Water => 3,
        };
        let pace: u16 = match self.pace {
            Pace::Slow => 0,
            Pace::Balanced => 1,
            Pace::Fast => 2,
        };

        (element << 14)
            | (u16::from(self.cardinal & 0x7) << 10)
            | (u16::from(self.fixed & 0x7) << 7)
            | (u16::from(self.mutable & 0x7) << 4)
            | (pace << 2)
            | (u16::from(self.high_structure) << 1)
            | u16::from(self.pointed_tone)
    }

    pub fn unpack(word: u16) -> Result<Self, HcsError> {
        let element = match word >> 14 {
            0 => WesternElement::Fire,
            1 => WesternElement::Earth,
            2 => WesternElement::Air,
            _ => WesternElement::Water,
        };
        let pace = match (word >> 2) & 0x3 {
            0 => Pace::Slow,
            1 => Pace::Balanced,
            2 => Pace::Fast,
            other => {
                return Err(HcsError::InvalidCode(format!("unknown pace bits {other}")));
            }
        };

        Ok(Self {
            element,
            cardinal: ((word >> 10) & 0x7) as u8,
            fixed: ((word >> 7) & 0x7) as u8,
            mutable: ((word >> 4) & 0x7) as u8,
            pace,
            high_structure: word & 0x2 != 0,
            pointed_tone: word & 0x1 != 0,
        })
    }
}

/// Chinese word: dominant element 15-13, yin/yang 12-10, day master 9-6,
/// strength 5-3, distribution skew 2-0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChineseWord {
    pub dominant: Element,
    pub yin_yang: u8,
    /// Index into the Heavenly Stem table
    pub day_master: u8,
    pub strength: u8,
    pub skew: u8,
}

impl ChineseWord {
    pub fn from_profile(chinese: &ChineseProfile) -> Self {
        Self {
            dominant: chinese.dominant_element().unwrap_or(Element::Wood),
            yin_yang: scale7(chinese.yin_yang_balance),
            day_master: chinese.day_master_index().unwrap_or(0) as u8,
            strength: scale7(chinese.day_master_strength),
            skew: scale7(distribution_skew(&chinese.element_balance)),
        }
    }

    pub fn pack(&self) -> u16 {
        ((self.dominant.index() as u16) << 13)
            | (u16::from(self.yin_yang & 0x7) << 10)
            | (u16::from(self.day_master & 0xF) << 6)
            | (u16::from(self.strength & 0x7) << 3)
            | u16::from(self.skew & 0x7)
    }

    pub fn unpack(word: u16) -> Result<Self, HcsError> {
        let dominant = Element::ALL
            .get(usize::from(word >> 13))
            .copied()
            .ok_or_else(|| HcsError::InvalidCode(format!("unknown element bits {}", word >> 13)))?;

        let day_master = ((word >> 6) & 0xF) as u8;
        if usize::from(day_master) >= HEAVENLY_STEMS.len() {
            return Err(HcsError::InvalidCode(format!(
                "day master index {day_master} out of range"
            )));
        }

        Ok(Self {
            dominant,
            yin_yang: ((word >> 10) & 0x7) as u8,
            day_master,
            strength: ((word >> 3) & 0x7) as u8,
            skew: (word & 0x7) as u8,
        })
    }

    /// Name of the day-master stem
    pub fn day_master_name(&self) -> &'static str {
        HEAVENLY_STEMS[usize::from(self.day_master) % HEAVENLY_STEMS.len()].name
    }
}

/// Fusion word: cognitive pattern 15-12, pace 11-9, intensity 8-6,
/// unified balance 5-3, resonance 2-0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FusionWord {
    /// `(primary << 2 | secondary & 3) & 0xF`, see [`cognitive_pattern`]
    pub pattern: u8,
    pub pace: u8,
    pub intensity: u8,
    pub unified: u8,
    pub resonance: u8,
}

impl FusionWord {
    pub fn from_profile(fusion: &FusionProfile) -> Self {
        Self {
            pattern: cognitive_pattern(&fusion.cognitive_fusion),
            pace: scale7(fusion.tempo_signals.pace),
            intensity: scale7(fusion.tempo_signals.intensity),
            unified: scale7(fusion.unified_balance),
            resonance: scale7(fusion.harmonic_resonance),
        }
    }

    pub fn pack(&self) -> u16 {
        (u16::from(self.pattern & 0xF) << 12)
            | (u16::from(self.pace & 0x7) << 9)
            | (u16::from(self.intensity & 0x7) << 6)
            | (u16::from(self.unified & 0x7) << 3)
            | u16::from(self.resonance & 0x7)
    }

    pub fn unpack(word: u16) -> Self {
        Self {
            pattern: (word >> 12) as u8,
            pace: ((word >> 9) & 0x7) as u8,
            intensity: ((word >> 6) & 0x7) as u8,
            unified: ((word >> 3) & 0x7) as u8,
            resonance: (word & 0x7) as u8,
        }
    }
}

/// Dominant and runner-up cognitive traits as a 4-bit pattern.
///
/// Traits are indexed analytical 0, creative 1, grounded 2, adaptive 3,
/// expressive 4. Ties go to the lower index; a trait must be positive to
/// count. Only the low two bits of the runner-up survive, and an expressive
/// primary overflows out of the four bits.
pub fn cognitive_pattern(cog: &CognitiveFusion) -> u8 {
    let traits = cog.as_array();

    let mut primary = 0usize;
    let mut max = 0.0;
    for (i, &value) in traits.iter().enumerate() {
        if value > max {
            max = value;
            primary = i;
        }
    }

    let mut secondary = 0usize;
    let mut second_max = 0.0;
    for (i, &value) in traits.iter().enumerate() {
        if i != primary && value > second_max {
            second_max = value;
            secondary = i;
        }
    }

    (((primary << 2) | (secondary & 0x3)) & 0xF) as u8
}

/// Variance of the element balance around an even split, x10 and clamped
fn distribution_skew(balance: &ElementBalance) -> f64 {
    (element_squared_deviation(balance) / 5.0 * 10.0).clamp(0.0, 1.0)
}

/// Fields carried by a U5 code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct U5Fields {
    pub fusion_id: String,
    pub western: WesternWord,
    pub chinese: ChineseWord,
    pub fusion: FusionWord,
    pub chip: String,
}

pub fn encode_u5(
    western: &WesternProfile,
    chinese: &ChineseProfile,
    fusion: &FusionProfile,
    salt: &[u8],
) -> String {
    let fusion_id = if fusion.fusion_id.len() == 2 {
        fusion.fusion_id.as_str()
    } else {
        FALLBACK_FUSION_ID
    };

    format!(
        "{U5_PREFIX}{fusion_id}|W:{:04x}|C:{:04x}|F:{:04x}|CHIP:{}",
        WesternWord::from_profile(western).pack(),
        ChineseWord::from_profile(chinese).pack(),
        FusionWord::from_profile(fusion).pack(),
        u5_chip(western, chinese, fusion, salt),
    )
}

/// CHIP over the legacy text rendering of all three profiles
pub fn u5_chip(
    western: &WesternProfile,
    chinese: &ChineseProfile,
    fusion: &FusionProfile,
    salt: &[u8],
) -> String {
    let data = format!(
        "U5|W:{}|C:{}|F:{}",
        legacy::western(western),
        legacy::chinese(chinese),
        legacy::fusion(fusion)
    );
    salted_chip(salt, data.as_bytes())
}

pub fn validate_u5(code: &str) -> bool {
    U5_PATTERN.is_match(code)
}

pub fn decode_u5(code: &str) -> Result<U5Fields, HcsError> {
    let caps = U5_PATTERN
        .captures(code)
        .ok_or_else(|| HcsError::InvalidCode("invalid HCS-U5 format".into()))?;

    let word = |name: &str| -> Result<u16, HcsError> {
        u16::from_str_radix(&caps[name], 16)
            .map_err(|e| HcsError::InvalidCode(format!("bad {name} word: {e}")))
    };

    Ok(U5Fields {
        fusion_id: caps["fid"].to_string(),
        western: WesternWord::unpack(word("western")?)?,
        chinese: ChineseWord::unpack(word("chinese")?)?,
        fusion: FusionWord::unpack(word("fusion")?),
        chip: caps["chip"].to_string(),
    })
}

/// Field-by-field text rendering hashed by the U5 CHIP
mod legacy {
    use crate::chinese::ChineseProfile;
    use crate::fusion::{FusionProfile, WesternProfile};
    use crate::types::ElementBalance;

    /// Shortest round-trip form; exponent notation below 1e-4
    pub(super) fn float(v: f64) -> String {
        if v != 0.0 && v.abs() < 1e-4 {
            let sci = format!("{v:e}");
            if let Some((mantissa, exp)) = sci.split_once('e') {
                if let Ok(exp) = exp.parse::<i32>() {
                    let sign = if exp < 0 { '-' } else { '+' };
                    return format!("{mantissa}e{sign}{:02}", exp.abs());
                }
            }
            return sci;
        }
        format!("{v}")
    }

    pub(super) fn map(balance: &ElementBalance) -> String {
        let mut entries: Vec<(&str, f64)> =
            balance.iter().map(|(e, &v)| (e.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let body: Vec<String> = entries
            .into_iter()
            .map(|(name, v)| format!("{name}:{}", float(v)))
            .collect();
        format!("map[{}]", body.join(" "))
    }

    pub(super) fn western(w: &WesternProfile) -> String {
        let modal = &w.modal;
        let cog = &w.cognition;
        let int = &w.interaction;
        format!(
            "&{{DominantElement:{} Modal:{{Cardinal:{} Fixed:{} Mutable:{}}} \
             Cognition:{{Fluid:{} Crystallized:{} Verbal:{} Strategic:{} Creative:{}}} \
             Interaction:{{Pace:{} Structure:{} Tone:{}}}}}",
            w.dominant_element.as_str(),
            float(modal.cardinal),
            float(modal.fixed),
            float(modal.mutable),
            float(cog.fluid),
            float(cog.crystallized),
            float(cog.verbal),
            float(cog.strategic),
            float(cog.creative),
            int.pace.as_str(),
            int.structure.as_str(),
            int.tone.as_str(),
        )
    }

    pub(super) fn chinese(c: &ChineseProfile) -> String {
        format!(
            "&{{YearPillar:{} MonthPillar:{} DayPillar:{} HourPillar:{} YinYangBalance:{} \
             ElementBalance:{} DayMaster:{} DayMasterStrength:{}}}",
            c.year_pillar,
            c.month_pillar,
            c.day_pillar,
            c.hour_pillar,
            float(c.yin_yang_balance),
            map(&c.element_balance),
            c.day_master,
            float(c.day_master_strength),
        )
    }

    pub(super) fn fusion(f: &FusionProfile) -> String {
        let cog = &f.cognitive_fusion;
        let tempo = &f.tempo_signals;
        format!(
            "&{{ElementSignature:{} CognitiveFusion:{{Analytical:{} Creative:{} Grounded:{} \
             Adaptive:{} Expressive:{}}} TempoSignals:{{Pace:{} Variability:{} Intensity:{} \
             Rhythm:{}}} UnifiedBalance:{} HarmonicResonance:{} FusionID:{}}}",
            map(&f.element_signature),
            float(cog.analytical),
            float(cog.creative),
            float(cog.grounded),
            float(cog.adaptive),
            float(cog.expressive),
            float(tempo.pace),
            float(tempo.variability),
            float(tempo.intensity),
            tempo.rhythm.as_str(),
            float(f.unified_balance),
            float(f.harmonic_resonance),
            f.fusion_id,
        )
    }
}
