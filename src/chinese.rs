//! Chinese BaZi profile
//!
//! Builds a [`ChineseProfile`] from birth info: validates the components,
//! resolves the wall-clock time in the named timezone, computes the four
//! pillars and derives the element, polarity and day-master metrics.

use crate::bazi::{self, FourPillars};
use crate::error::HcsError;
use crate::types::{dominant_element, BirthInfo, Element, ElementBalance};
use chrono::{Duration, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The Chinese BaZi astrological profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChineseProfile {
    pub year_pillar: String,
    pub month_pillar: String,
    pub day_pillar: String,
    pub hour_pillar: String,
    /// 0 = pure Yin, 1 = pure Yang
    pub yin_yang_balance: f64,
    /// Wood, Fire, Earth, Metal, Water ratios summing to 1.0
    pub element_balance: ElementBalance,
    /// Day stem name
    pub day_master: String,
    /// 0 = weak, 1 = strong
    pub day_master_strength: f64,
}

/// Coarse Yin/Yang classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YinYangType {
    #[serde(rename = "Yang-dominant")]
    YangDominant,
    #[serde(rename = "Yin-dominant")]
    YinDominant,
    Balanced,
}

/// Coarse day-master strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayMasterType {
    Strong,
    Moderate,
    Weak,
}

/// 8-byte summary of a Chinese profile, each ratio scaled to 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedChinese {
    pub yin_yang: u8,
    pub wood: u8,
    pub fire: u8,
    pub earth: u8,
    pub metal: u8,
    pub water: u8,
    pub day_master: u8,
    pub strength: u8,
}

impl ChineseProfile {
    /// Compute the profile for a birth moment.
    ///
    /// Fails with [`HcsError::InvalidBirthInfo`] when a component is out of
    /// range. An unknown timezone falls back to UTC.
    pub fn compute(info: &BirthInfo) -> Result<Self, HcsError> {
        validate_birth_info(info)?;

        let local = resolve_local_time(info)?;
        let pillars = FourPillars::compute(local.date(), local.hour());
        Ok(Self::from_pillars(&pillars))
    }

    /// Derive the profile metrics from already computed pillars
    pub fn from_pillars(pillars: &FourPillars) -> Self {
        let all = pillars.as_array();

        Self {
            year_pillar: pillars.year.to_string(),
            month_pillar: pillars.month.to_string(),
            day_pillar: pillars.day.to_string(),
            hour_pillar: pillars.hour.to_string(),
            yin_yang_balance: bazi::yin_yang_balance(&all),
            element_balance: bazi::element_balance(&all),
            day_master: pillars.day_master().name.to_string(),
            day_master_strength: bazi::day_master_strength(pillars),
        }
    }

    /// The most prominent element, if any element carries weight
    pub fn dominant_element(&self) -> Option<Element> {
        dominant_element(&self.element_balance)
    }

    /// Balance ratio of one element (0 when absent)
    pub fn element_strength(&self, element: Element) -> f64 {
        self.element_balance.get(&element).copied().unwrap_or(0.0)
    }

    /// Index of the day master in the stem table
    pub fn day_master_index(&self) -> Option<usize> {
        bazi::stem_index(&self.day_master)
    }

    pub fn yin_yang_type(&self) -> YinYangType {
        if self.yin_yang_balance > 0.6 {
            YinYangType::YangDominant
        } else if self.yin_yang_balance < 0.4 {
            YinYangType::YinDominant
        } else {
            YinYangType::Balanced
        }
    }

    pub fn day_master_type(&self) -> DayMasterType {
        if self.day_master_strength > 0.7 {
            DayMasterType::Strong
        } else if self.day_master_strength < 0.3 {
            DayMasterType::Weak
        } else {
            DayMasterType::Moderate
        }
    }

    pub fn compress(&self) -> CompressedChinese {
        let scale = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;

        CompressedChinese {
            yin_yang: scale(self.yin_yang_balance),
            wood: scale(self.element_strength(Element::Wood)),
            fire: scale(self.element_strength(Element::Fire)),
            earth: scale(self.element_strength(Element::Earth)),
            metal: scale(self.element_strength(Element::Metal)),
            water: scale(self.element_strength(Element::Water)),
            day_master: self.day_master_index().unwrap_or(0) as u8,
            strength: scale(self.day_master_strength),
        }
    }
}

/// Check birth components against their ranges.
///
/// The day is checked against 1-31 regardless of the month; a day past the
/// end of its month rolls over into the next month.
pub fn validate_birth_info(info: &BirthInfo) -> Result<(), HcsError> {
    check_range("year", info.year, 1900, 2100)?;
    check_range("month", info.month, 1, 12)?;
    check_range("day", info.day, 1, 31)?;
    check_range("hour", info.hour, 0, 23)?;
    check_range("minute", info.minute, 0, 59)?;
    Ok(())
}

fn check_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), HcsError> {
    if value < min || value > max {
        return Err(HcsError::InvalidBirthInfo(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

/// Wall-clock birth time after timezone resolution
fn resolve_local_time(info: &BirthInfo) -> Result<NaiveDateTime, HcsError> {
    let naive = NaiveDate::from_ymd_opt(info.year, info.month as u32, 1)
        .map(|first| first + Duration::days(i64::from(info.day) - 1))
        .and_then(|date| date.and_hms_opt(info.hour as u32, info.minute as u32, 0))
        .ok_or_else(|| {
            HcsError::InvalidBirthInfo(format!(
                "{}-{:02}-{:02} {:02}:{:02} is not a valid date",
                info.year, info.month, info.day, info.hour, info.minute
            ))
        })?;

    if info.timezone.is_empty() || info.timezone == "UTC" {
        return Ok(naive);
    }

    let tz: Tz = match info.timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(timezone = %info.timezone, "unknown timezone, using UTC");
            return Ok(naive);
        }
    };

    Ok(resolve_in_zone(tz, naive))
}

/// Read a wall time in `tz` using the offset in force at the wall time taken
/// as UTC, unless the instant that yields falls under a different offset, in
/// which case that offset is used instead.
///
/// Existing and ambiguous wall times come back unchanged. A wall time inside
/// a DST gap is shifted by the gap's size: back for zones west of UTC,
/// forward for zones east of it.
fn resolve_in_zone(tz: Tz, naive: NaiveDateTime) -> NaiveDateTime {
    let offset_at = |instant: &NaiveDateTime| {
        Duration::seconds(i64::from(
            tz.offset_from_utc_datetime(instant).fix().local_minus_utc(),
        ))
    };

    let first = offset_at(&naive);
    let utc = naive - first;
    let second = offset_at(&utc);
    let instant = if second == first { utc } else { naive - second };

    tz.from_utc_datetime(&instant).naive_local()
}
