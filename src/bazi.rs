//! BaZi (Four Pillars) calendar engine
//!
//! Stateless functions over the 10 Heavenly Stems and 12 Earthly Branches.
//! The month table is a solar-month approximation, not a solar-term
//! computation; the day pillar is the only one keyed off absolute elapsed days.

use crate::types::{Element, ElementBalance, Polarity};
use chrono::NaiveDate;
use std::fmt;

/// Year 1924 starts a Jia-Zi (Wood Rat) cycle
const CYCLE_EPOCH_YEAR: i32 = 1924;

/// Stem weight in element and polarity balances
const STEM_WEIGHT: f64 = 1.0;

/// Branch weight in element and polarity balances
const BRANCH_WEIGHT: f64 = 0.5;

const DAY_MASTER_BASE: f64 = 0.3;
const SAME_STEM_BONUS: f64 = 0.15;
const SAME_BRANCH_BONUS: f64 = 0.1;
const GENERATING_STEM_BONUS: f64 = 0.1;
const GENERATING_BRANCH_BONUS: f64 = 0.05;

/// A Heavenly Stem table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeavenlyStem {
    pub name: &'static str,
    pub element: Element,
    pub polarity: Polarity,
}

/// An Earthly Branch table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarthlyBranch {
    pub name: &'static str,
    pub element: Element,
    pub polarity: Polarity,
    pub animal: &'static str,
}

pub const HEAVENLY_STEMS: [HeavenlyStem; 10] = [
    stem("Jia", Element::Wood, Polarity::Yang),
    stem("Yi", Element::Wood, Polarity::Yin),
    stem("Bing", Element::Fire, Polarity::Yang),
    stem("Ding", Element::Fire, Polarity::Yin),
    stem("Wu", Element::Earth, Polarity::Yang),
    stem("Ji", Element::Earth, Polarity::Yin),
    stem("Geng", Element::Metal, Polarity::Yang),
    stem("Xin", Element::Metal, Polarity::Yin),
    stem("Ren", Element::Water, Polarity::Yang),
    stem("Gui", Element::Water, Polarity::Yin),
];

pub const EARTHLY_BRANCHES: [EarthlyBranch; 12] = [
    branch("Zi", Element::Water, Polarity::Yang, "Rat"),
    branch("Chou", Element::Earth, Polarity::Yin, "Ox"),
    branch("Yin", Element::Wood, Polarity::Yang, "Tiger"),
    branch("Mao", Element::Wood, Polarity::Yin, "Rabbit"),
    branch("Chen", Element::Earth, Polarity::Yang, "Dragon"),
    branch("Si", Element::Fire, Polarity::Yin, "Snake"),
    branch("Wu", Element::Fire, Polarity::Yang, "Horse"),
    branch("Wei", Element::Earth, Polarity::Yin, "Goat"),
    branch("Shen", Element::Metal, Polarity::Yang, "Monkey"),
    branch("You", Element::Metal, Polarity::Yin, "Rooster"),
    branch("Xu", Element::Earth, Polarity::Yang, "Dog"),
    branch("Hai", Element::Water, Polarity::Yin, "Pig"),
];

/// Branch index for each calendar month (January first)
const MONTH_BRANCHES: [usize; 12] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 1];

const fn stem(name: &'static str, element: Element, polarity: Polarity) -> HeavenlyStem {
    HeavenlyStem {
        name,
        element,
        polarity,
    }
}

const fn branch(
    name: &'static str,
    element: Element,
    polarity: Polarity,
    animal: &'static str,
) -> EarthlyBranch {
    EarthlyBranch {
        name,
        element,
        polarity,
        animal,
    }
}

/// Index of a stem by name
pub fn stem_index(name: &str) -> Option<usize> {
    HEAVENLY_STEMS.iter().position(|s| s.name == name)
}

/// A (Heavenly Stem, Earthly Branch) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pillar {
    stem_index: usize,
    branch_index: usize,
}

impl Pillar {
    /// Build a pillar from table indices; indices wrap around their tables
    pub fn new(stem_index: usize, branch_index: usize) -> Self {
        Self {
            stem_index: stem_index % HEAVENLY_STEMS.len(),
            branch_index: branch_index % EARTHLY_BRANCHES.len(),
        }
    }

    /// Build a pillar from a signed cycle offset, normalized non-negative
    fn from_offset(offset: i64) -> Self {
        Self::new(offset.rem_euclid(10) as usize, offset.rem_euclid(12) as usize)
    }

    pub fn stem_index(&self) -> usize {
        self.stem_index
    }

    pub fn branch_index(&self) -> usize {
        self.branch_index
    }

    pub fn stem(&self) -> &'static HeavenlyStem {
        &HEAVENLY_STEMS[self.stem_index]
    }

    pub fn branch(&self) -> &'static EarthlyBranch {
        &EARTHLY_BRANCHES[self.branch_index]
    }

    /// Primary element of the pillar (from the stem)
    pub fn element(&self) -> Element {
        self.stem().element
    }

    /// Polarity of the pillar (from the stem)
    pub fn polarity(&self) -> Polarity {
        self.stem().polarity
    }

    pub fn animal(&self) -> &'static str {
        self.branch().animal
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.stem().name, self.branch().name)
    }
}

/// The four pillars of a birth moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl FourPillars {
    /// Compute all four pillars for a calendar date and hour
    pub fn compute(date: NaiveDate, hour: u32) -> Self {
        use chrono::Datelike;

        let day = day_pillar(date);
        Self {
            year: year_pillar(date.year()),
            month: month_pillar(date.year(), date.month()),
            day,
            hour: hour_pillar(&day, hour),
        }
    }

    pub fn as_array(&self) -> [Pillar; 4] {
        [self.year, self.month, self.day, self.hour]
    }

    /// The day stem, the anchor of the chart
    pub fn day_master(&self) -> &'static HeavenlyStem {
        self.day.stem()
    }
}

/// Year pillar from the 60-year cycle anchored at 1924
pub fn year_pillar(year: i32) -> Pillar {
    Pillar::from_offset(i64::from(year) - i64::from(CYCLE_EPOCH_YEAR))
}

/// Month pillar: branch from the solar-month table, stem from the year stem.
///
/// `month` is 1-based and must be in 1..=12.
pub fn month_pillar(year: i32, month: u32) -> Pillar {
    let year_stem = year_pillar(year).stem_index;
    let month_index = (month.clamp(1, 12) - 1) as usize;
    let branch_index = MONTH_BRANCHES[month_index];
    let stem_index = (year_stem * 2 + month_index + 1) % 10;
    Pillar::new(stem_index, branch_index)
}

/// Day pillar from the number of days elapsed since 1900-01-01
pub fn day_pillar(date: NaiveDate) -> Pillar {
    let reference = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
    let days = date.signed_duration_since(reference).num_days();
    Pillar::from_offset(days)
}

/// Hour pillar: two-hour branch windows, with 23:00-01:00 mapped to Zi
pub fn hour_pillar(day: &Pillar, hour: u32) -> Pillar {
    let branch_index = ((hour as usize + 1) / 2) % 12;
    let stem_base = (day.stem_index % 5) * 2;
    Pillar::new((stem_base + branch_index) % 10, branch_index)
}

/// Weighted five-element distribution across the pillars, summing to 1.0
pub fn element_balance(pillars: &[Pillar]) -> ElementBalance {
    let mut balance: ElementBalance = Element::ALL.iter().map(|&e| (e, 0.0)).collect();

    for pillar in pillars {
        *balance.entry(pillar.stem().element).or_insert(0.0) += STEM_WEIGHT;
        *balance.entry(pillar.branch().element).or_insert(0.0) += BRANCH_WEIGHT;
    }

    let total: f64 = balance.values().sum();
    if total > 0.0 {
        for value in balance.values_mut() {
            *value /= total;
        }
    }

    balance
}

/// Share of Yang weight across the pillars (0 = pure Yin, 1 = pure Yang)
pub fn yin_yang_balance(pillars: &[Pillar]) -> f64 {
    let mut yang = 0.0;
    let mut total = 0.0;

    for pillar in pillars {
        if pillar.stem().polarity == Polarity::Yang {
            yang += STEM_WEIGHT;
        }
        total += STEM_WEIGHT;

        if pillar.branch().polarity == Polarity::Yang {
            yang += BRANCH_WEIGHT;
        }
        total += BRANCH_WEIGHT;
    }

    if total > 0.0 {
        yang / total
    } else {
        0.5
    }
}

/// Support the day master receives from the year, month and hour pillars, 0-1
pub fn day_master_strength(pillars: &FourPillars) -> f64 {
    let day_element = pillars.day_master().element;
    let mut strength = DAY_MASTER_BASE;

    for pillar in [pillars.year, pillars.month, pillars.hour] {
        let stem_element = pillar.stem().element;
        let branch_element = pillar.branch().element;

        if stem_element == day_element {
            strength += SAME_STEM_BONUS;
        }
        if branch_element == day_element {
            strength += SAME_BRANCH_BONUS;
        }
        if stem_element.generates() == day_element {
            strength += GENERATING_STEM_BONUS;
        }
        if branch_element.generates() == day_element {
            strength += GENERATING_BRANCH_BONUS;
        }
    }

    strength.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_pillar() {
        assert_eq!(year_pillar(1984).to_string(), "Jia-Zi");
        assert_eq!(year_pillar(1990).to_string(), "Geng-Wu");
        assert_eq!(year_pillar(2000).to_string(), "Geng-Chen");
        assert_eq!(year_pillar(2024).to_string(), "Jia-Chen");
        assert_eq!(year_pillar(1924).to_string(), "Jia-Zi");
        // Before the epoch the offsets must still be non-negative
        assert_eq!(year_pillar(1900).to_string(), "Geng-Zi");
    }

    #[test]
    fn test_month_pillar() {
        // 1990 has year stem Geng (6): stem = (12 + 6) % 10 = 8 (Ren); June maps to Wei
        assert_eq!(month_pillar(1990, 6).to_string(), "Ren-Wei");
        // November maps to Zi, December to Chou
        assert_eq!(month_pillar(1984, 11).branch().name, "Zi");
        assert_eq!(month_pillar(1984, 12).branch().name, "Chou");
        assert_eq!(month_pillar(1984, 1).to_string(), "Yi-Yin");
    }

    #[test]
    fn test_day_pillar() {
        assert_eq!(day_pillar(date(1900, 1, 1)).to_string(), "Jia-Zi");
        // 60-day cycle repeats independent of month boundaries
        let base = date(1990, 5, 15);
        let later = base + chrono::Duration::days(60);
        assert_eq!(day_pillar(base), day_pillar(later));
        assert_ne!(day_pillar(base), day_pillar(date(1990, 5, 16)));
        // 1990-06-15 is 33037 days after the reference date
        assert_eq!(day_pillar(date(1990, 6, 15)).to_string(), "Xin-Chou");
    }

    #[test]
    fn test_hour_pillar() {
        let day = day_pillar(date(1990, 6, 15));
        let afternoon = hour_pillar(&day, 14);
        assert_eq!(afternoon.branch().name, "Wei");
        assert_eq!(afternoon.to_string(), "Yi-Wei");

        // The window crossing midnight maps to Zi
        assert_eq!(hour_pillar(&day, 23).branch().name, "Zi");
        assert_eq!(hour_pillar(&day, 0).branch().name, "Zi");
        assert_eq!(hour_pillar(&day, 1).branch().name, "Chou");
    }

    #[test]
    fn test_element_balance() {
        let pillars = [
            Pillar::new(0, 0), // Wood / Water
            Pillar::new(2, 6), // Fire / Fire
            Pillar::new(4, 4), // Earth / Earth
            Pillar::new(6, 8), // Metal / Metal
        ];
        let balance = element_balance(&pillars);

        assert_eq!(balance.len(), 5);
        let total: f64 = balance.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((balance[&Element::Wood] - 1.0 / 6.0).abs() < 1e-9);
        assert!((balance[&Element::Fire] - 1.5 / 6.0).abs() < 1e-9);
        assert!((balance[&Element::Water] - 0.5 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_yin_yang_balance() {
        let yang = [
            Pillar::new(0, 0),
            Pillar::new(2, 6),
            Pillar::new(4, 4),
            Pillar::new(6, 8),
        ];
        assert!((yin_yang_balance(&yang) - 1.0).abs() < 1e-9);

        let yin = [
            Pillar::new(1, 1),
            Pillar::new(3, 5),
            Pillar::new(5, 7),
            Pillar::new(7, 9),
        ];
        assert!(yin_yang_balance(&yin).abs() < 1e-9);
    }

    #[test]
    fn test_day_master_strength() {
        let pillars = FourPillars::compute(date(1990, 6, 15), 14);
        assert_eq!(pillars.year.to_string(), "Geng-Wu");
        assert_eq!(pillars.month.to_string(), "Ren-Wei");
        assert_eq!(pillars.day.to_string(), "Xin-Chou");
        assert_eq!(pillars.hour.to_string(), "Yi-Wei");
        assert_eq!(pillars.day_master().name, "Xin");

        // Metal day master: Geng year stem (+0.15), two Earth Wei branches (+0.05 each)
        let strength = day_master_strength(&pillars);
        assert!((strength - 0.55).abs() < 1e-9, "strength = {strength}");
    }

    #[test]
    fn test_pillar_helpers() {
        let pillar = year_pillar(1990);
        assert_eq!(pillar.element(), Element::Metal);
        assert_eq!(pillar.polarity(), Polarity::Yang);
        assert_eq!(pillar.animal(), "Horse");
        assert_eq!(stem_index("Ding"), Some(3));
        assert_eq!(stem_index("Nope"), None);
    }

    proptest! {
        #[test]
        fn balances_are_normalized(days in 0i64..73_000, hour in 0u32..24) {
            let d = date(1900, 1, 1) + chrono::Duration::days(days);
            let pillars = FourPillars::compute(d, hour);
            let all = pillars.as_array();

            let total: f64 = element_balance(&all).values().sum();
            prop_assert!((total - 1.0).abs() < 0.01);

            let yy = yin_yang_balance(&all);
            prop_assert!((0.0..=1.0).contains(&yy));

            let strength = day_master_strength(&pillars);
            prop_assert!((0.0..=1.0).contains(&strength));
        }
    }
}
