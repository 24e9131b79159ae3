//! Western/Chinese fusion
//!
//! This module blends the two trait systems into unified metrics:
//! - Element signature (Western 40%, Chinese 60%)
//! - Cognitive fusion ratios
//! - Tempo signals and rhythm
//! - Unified balance, harmonic resonance and the 2-char fusion ID

use crate::chinese::ChineseProfile;
use crate::types::{
    CognitionProfile, Element, ElementBalance, InputProfile, InteractionStyle, ModalBalance, Pace,
    Structure, WesternElement,
};
use serde::{Deserialize, Serialize};

const WESTERN_WEIGHT: f64 = 0.4;
const CHINESE_WEIGHT: f64 = 0.6;

/// Mean share of each element in a perfectly even five-element distribution
const EVEN_ELEMENT_SHARE: f64 = 0.2;

/// Western side of a combined profile, with categoricals resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WesternProfile {
    pub dominant_element: WesternElement,
    pub modal: ModalBalance,
    pub cognition: CognitionProfile,
    pub interaction: InteractionStyle,
}

impl WesternProfile {
    pub fn from_input(input: &InputProfile) -> Self {
        Self {
            dominant_element: WesternElement::parse_or_default(&input.dominant_element),
            modal: input.modal,
            cognition: input.cognition,
            interaction: input.interaction.resolve(),
        }
    }
}

/// Merged cognitive tendencies, each 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CognitiveFusion {
    /// Strategic thinking with Metal/Water clarity
    pub analytical: f64,
    /// Creativity with Fire/Wood growth
    pub creative: f64,
    /// Crystallized knowledge with Earth stability
    pub grounded: f64,
    /// Fluid intelligence with element variability
    pub adaptive: f64,
    /// Verbal ability with Yang energy
    pub expressive: f64,
}

impl CognitiveFusion {
    /// Traits in pattern order: analytical, creative, grounded, adaptive, expressive
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.analytical,
            self.creative,
            self.grounded,
            self.adaptive,
            self.expressive,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rhythm {
    Steady,
    Dynamic,
    Fluctuating,
}

impl Rhythm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rhythm::Steady => "steady",
            Rhythm::Dynamic => "dynamic",
            Rhythm::Fluctuating => "fluctuating",
        }
    }
}

/// Timing and rhythm preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoSignals {
    /// 0 = slow, 0.5 = balanced, 1 = fast
    pub pace: f64,
    /// 0 = consistent, 1 = highly variable
    pub variability: f64,
    /// 0 = gentle, 1 = intense
    pub intensity: f64,
    pub rhythm: Rhythm,
}

/// Synthesis of the Western and Chinese profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionProfile {
    pub element_signature: ElementBalance,
    pub cognitive_fusion: CognitiveFusion,
    pub tempo_signals: TempoSignals,
    pub unified_balance: f64,
    pub harmonic_resonance: f64,
    pub fusion_id: String,
}

/// Western, Chinese and fusion profiles side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedProfile {
    pub western: WesternProfile,
    pub chinese: ChineseProfile,
    pub fusion: FusionProfile,
}

/// Fusion engine for blending a Western and a Chinese profile
pub struct FusionEngine;

impl FusionEngine {
    pub fn fuse(western: &WesternProfile, chinese: &ChineseProfile) -> FusionProfile {
        FusionProfile {
            element_signature: compute_element_signature(western, chinese),
            cognitive_fusion: compute_cognitive_fusion(western, chinese),
            tempo_signals: compute_tempo_signals(western, chinese),
            unified_balance: compute_unified_balance(western, chinese),
            harmonic_resonance: compute_harmonic_resonance(western, chinese),
            fusion_id: fusion_id(western, chinese),
        }
    }

    /// Fuse and bundle all three profiles
    pub fn combine(western: WesternProfile, chinese: ChineseProfile) -> CombinedProfile {
        let fusion = Self::fuse(&western, &chinese);
        CombinedProfile {
            western,
            chinese,
            fusion,
        }
    }
}

/// Western element mapped onto the five elements, then blended with the
/// Chinese balance and renormalized
fn compute_element_signature(western: &WesternProfile, chinese: &ChineseProfile) -> ElementBalance {
    let mut signature: ElementBalance = Element::ALL.iter().map(|&e| (e, 0.0)).collect();

    let mut add = |element: Element, amount: f64| {
        *signature.entry(element).or_insert(0.0) += amount;
    };

    match western.dominant_element {
        WesternElement::Earth => add(Element::Earth, WESTERN_WEIGHT),
        // Air splits between Wood and Metal
        WesternElement::Air => {
            add(Element::Wood, WESTERN_WEIGHT * 0.5);
            add(Element::Metal, WESTERN_WEIGHT * 0.5);
        }
        WesternElement::Water => add(Element::Water, WESTERN_WEIGHT),
        WesternElement::Fire => add(Element::Fire, WESTERN_WEIGHT),
    }

    for (&element, &balance) in &chinese.element_balance {
        add(element, balance * CHINESE_WEIGHT);
    }

    let total: f64 = signature.values().sum();
    if total > 0.0 {
        for value in signature.values_mut() {
            *value /= total;
        }
    }

    signature
}

fn compute_cognitive_fusion(western: &WesternProfile, chinese: &ChineseProfile) -> CognitiveFusion {
    let cog = &western.cognition;
    let metal = chinese.element_strength(Element::Metal);
    let water = chinese.element_strength(Element::Water);
    let fire = chinese.element_strength(Element::Fire);
    let wood = chinese.element_strength(Element::Wood);
    let earth = chinese.element_strength(Element::Earth);
    let yang = chinese.yin_yang_balance;

    let analytical = cog.strategic * 0.5 + (metal * 0.3 + water * 0.2);
    let creative = cog.creative * 0.5 + (fire * 0.3 + wood * 0.2);
    let grounded = cog.crystallized * 0.5 + earth * 0.5;
    let adaptive = cog.fluid * 0.6 + element_variability(&chinese.element_balance) * 0.4;
    let expressive = cog.verbal * 0.5 + yang * 0.5;

    CognitiveFusion {
        analytical: clamp_unit(analytical),
        creative: clamp_unit(creative),
        grounded: clamp_unit(grounded),
        adaptive: clamp_unit(adaptive),
        expressive: clamp_unit(expressive),
    }
}

fn compute_tempo_signals(western: &WesternProfile, chinese: &ChineseProfile) -> TempoSignals {
    let base_pace = match western.interaction.pace {
        Pace::Slow => 0.2,
        Pace::Balanced => 0.5,
        Pace::Fast => 0.8,
    };
    // Yang energy speeds up, Yin slows down
    let pace = base_pace * 0.6 + chinese.yin_yang_balance * 0.4;

    let variability = (modal_variability(&western.modal)
        + element_variability(&chinese.element_balance))
        / 2.0;

    let fire_water = chinese.element_strength(Element::Fire) + chinese.element_strength(Element::Water);
    let intensity = fire_water * 0.5 + chinese.day_master_strength * 0.5;

    // Rhythm is decided on the unclamped values
    let rhythm = if variability > 0.6 {
        Rhythm::Fluctuating
    } else if intensity > 0.6 && pace > 0.6 {
        Rhythm::Dynamic
    } else {
        Rhythm::Steady
    };

    TempoSignals {
        pace: clamp_unit(pace),
        variability: clamp_unit(variability),
        intensity: clamp_unit(intensity),
        rhythm,
    }
}

fn compute_unified_balance(western: &WesternProfile, chinese: &ChineseProfile) -> f64 {
    let modal = &western.modal;
    let modal_balance = modal.cardinal * 0.5 + modal.mutable * 0.3 + (1.0 - modal.fixed) * 0.2;

    clamp_unit(modal_balance * 0.4 + chinese.yin_yang_balance * 0.6)
}

/// How well the two systems align, 0.5 baseline
fn compute_harmonic_resonance(western: &WesternProfile, chinese: &ChineseProfile) -> f64 {
    let mut resonance = 0.5;

    if let Some(dominant) = chinese.dominant_element() {
        if is_compatible(western.dominant_element, dominant) {
            resonance += 0.2;
        }
    }

    let yy = chinese.yin_yang_balance;
    let pace_aligned = match western.interaction.pace {
        Pace::Fast => yy > 0.6,
        Pace::Slow => yy < 0.4,
        Pace::Balanced => (0.4..=0.6).contains(&yy),
    };
    if pace_aligned {
        resonance += 0.15;
    }

    let earth_metal =
        chinese.element_strength(Element::Earth) + chinese.element_strength(Element::Metal);
    let structure_aligned = match western.interaction.structure {
        Structure::High => earth_metal > 0.4,
        Structure::Low => earth_metal < 0.3,
        Structure::Medium => false,
    };
    if structure_aligned {
        resonance += 0.15;
    }

    clamp_unit(resonance)
}

/// Whether a Western element sits well with a Chinese dominant element
pub fn is_compatible(western: WesternElement, chinese: Element) -> bool {
    let compatible: &[Element] = match western {
        WesternElement::Fire => &[Element::Fire, Element::Wood],
        WesternElement::Earth => &[Element::Earth, Element::Fire, Element::Metal],
        WesternElement::Air => &[Element::Wood, Element::Metal],
        WesternElement::Water => &[Element::Water, Element::Wood],
    };
    compatible.contains(&chinese)
}

/// Two-character fusion ID: element pairing letter, then a 1-9 balance zone
pub fn fusion_id(western: &WesternProfile, chinese: &ChineseProfile) -> String {
    let mut id = String::with_capacity(2);
    id.push(element_code(western.dominant_element, chinese.dominant_element()));
    id.push(balance_code(&western.modal, chinese.yin_yang_balance));
    id
}

/// 'A'..'T' over (Fire, Earth, Air, Water) x (Fire, Wood, Earth, Metal, Water); 'X' without a
/// Chinese dominant element
fn element_code(western: WesternElement, chinese: Option<Element>) -> char {
    let Some(chinese) = chinese else {
        return 'X';
    };

    let row = match western {
        WesternElement::Fire => 0,
        WesternElement::Earth => 1,
        WesternElement::Air => 2,
        WesternElement::Water => 3,
    };
    let col = match chinese {
        Element::Fire => 0,
        Element::Wood => 1,
        Element::Earth => 2,
        Element::Metal => 3,
        Element::Water => 4,
    };

    (b'A' + row * 5 + col) as char
}

/// 3x3 grid over modal emphasis and yin/yang, as '1'..'9'
fn balance_code(modal: &ModalBalance, yin_yang: f64) -> char {
    let modal_zone = if modal.cardinal > 0.4 {
        2
    } else if modal.fixed > 0.4 {
        1
    } else {
        0
    };

    let yin_yang_zone = if yin_yang > 0.66 {
        2
    } else if yin_yang > 0.33 {
        1
    } else {
        0
    };

    (b'1' + modal_zone * 3 + yin_yang_zone) as char
}

/// Scaled standard deviation of an element distribution around an even
/// split, capped at 1
pub fn element_variability(balance: &ElementBalance) -> f64 {
    let variance = element_squared_deviation(balance);
    ((variance / 5.0).sqrt() * 4.0).min(1.0)
}

/// Sum of squared deviations from an even five-way split
pub fn element_squared_deviation(balance: &ElementBalance) -> f64 {
    balance
        .values()
        .map(|v| {
            let diff = v - EVEN_ELEMENT_SHARE;
            diff * diff
        })
        .sum()
}

/// 1 for an even modal split, falling towards 0 as one modality dominates
pub fn modal_variability(modal: &ModalBalance) -> f64 {
    let mean = 1.0 / 3.0;
    let mut variance = 0.0;

    for v in [modal.cardinal, modal.fixed, modal.mutable] {
        let diff = v - mean;
        variance += diff * diff;
    }

    1.0 - ((variance / 3.0).sqrt() * 3.0).min(1.0)
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
