//! Zodiac primitives: signs, elements, modalities, planets and aspects.
//!
//! These are fixed global tables. Index order matters: sign indices drive
//! aspect distances, and the element/modality enumeration order decides
//! ties when a chart's dominant element or modality is computed.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::error::CosmicError;

// =============================================================================
// Element & Modality
// =============================================================================

/// Classical element of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    /// Fixed tally order.
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];

    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Air => "air",
            Element::Water => "water",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Element {
    type Err = CosmicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Element::ALL
            .iter()
            .copied()
            .find(|e| e.name() == lower)
            .ok_or_else(|| CosmicError::UnknownElement { name: s.to_string() })
    }
}

/// Modality (quality) of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Modality {
    /// Fixed tally order.
    pub const ALL: [Modality; 3] = [Modality::Cardinal, Modality::Fixed, Modality::Mutable];

    pub fn name(&self) -> &'static str {
        match self {
            Modality::Cardinal => "cardinal",
            Modality::Fixed => "fixed",
            Modality::Mutable => "mutable",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Sign
// =============================================================================

/// One of the twelve zodiac signs, in zodiacal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Sun sign cutovers: (month, day, sign beginning that day).
const SIGN_CUTOVERS: [(u32, u32, Sign); 12] = [
    (1, 20, Sign::Aquarius),
    (2, 19, Sign::Pisces),
    (3, 21, Sign::Aries),
    (4, 20, Sign::Taurus),
    (5, 21, Sign::Gemini),
    (6, 21, Sign::Cancer),
    (7, 23, Sign::Leo),
    (8, 23, Sign::Virgo),
    (9, 23, Sign::Libra),
    (10, 23, Sign::Scorpio),
    (11, 22, Sign::Sagittarius),
    (12, 22, Sign::Capricorn),
];

impl Sign {
    /// All signs in index order (0 = aries … 11 = pisces).
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Sign at `index mod 12`.
    pub fn from_index(index: usize) -> Sign {
        Sign::ALL[index % 12]
    }

    /// Lowercase name used as the canonical key everywhere.
    pub fn name(&self) -> &'static str {
        match self {
            Sign::Aries => "aries",
            Sign::Taurus => "taurus",
            Sign::Gemini => "gemini",
            Sign::Cancer => "cancer",
            Sign::Leo => "leo",
            Sign::Virgo => "virgo",
            Sign::Libra => "libra",
            Sign::Scorpio => "scorpio",
            Sign::Sagittarius => "sagittarius",
            Sign::Capricorn => "capricorn",
            Sign::Aquarius => "aquarius",
            Sign::Pisces => "pisces",
        }
    }

    /// Display form ("Gemini").
    pub fn title(&self) -> String {
        title_case(self.name())
    }

    pub fn element(&self) -> Element {
        match self {
            Sign::Aries | Sign::Leo | Sign::Sagittarius => Element::Fire,
            Sign::Taurus | Sign::Virgo | Sign::Capricorn => Element::Earth,
            Sign::Gemini | Sign::Libra | Sign::Aquarius => Element::Air,
            Sign::Cancer | Sign::Scorpio | Sign::Pisces => Element::Water,
        }
    }

    pub fn modality(&self) -> Modality {
        match self {
            Sign::Aries | Sign::Cancer | Sign::Libra | Sign::Capricorn => Modality::Cardinal,
            Sign::Taurus | Sign::Leo | Sign::Scorpio | Sign::Aquarius => Modality::Fixed,
            Sign::Gemini | Sign::Virgo | Sign::Sagittarius | Sign::Pisces => Modality::Mutable,
        }
    }

    /// Sun sign for a calendar date.
    ///
    /// The latest cutover on or before the date's (month, day) wins.
    /// Dates before January 20 have no match and fall to Capricorn.
    pub fn from_date(date: NaiveDate) -> Sign {
        let month_day = (date.month(), date.day());
        SIGN_CUTOVERS
            .iter()
            .rev()
            .find(|(m, d, _)| month_day >= (*m, *d))
            .map(|(_, _, sign)| *sign)
            .unwrap_or(Sign::Capricorn)
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sign {
    type Err = CosmicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Sign::ALL
            .iter()
            .copied()
            .find(|sign| sign.name() == lower)
            .ok_or_else(|| CosmicError::UnknownSign { name: s.to_string() })
    }
}

// =============================================================================
// Planet
// =============================================================================

/// The eleven chart points, in synthesis order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    Sun,
    Moon,
    Rising,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    pub const ALL: [Planet; 11] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Rising,
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    /// 0-based position in [`Planet::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Sun => "sun",
            Planet::Moon => "moon",
            Planet::Rising => "rising",
            Planet::Mercury => "mercury",
            Planet::Venus => "venus",
            Planet::Mars => "mars",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturn",
            Planet::Uranus => "uranus",
            Planet::Neptune => "neptune",
            Planet::Pluto => "pluto",
        }
    }

    pub fn title(&self) -> String {
        title_case(self.name())
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Aspect
// =============================================================================

/// Relationship between two signs, from their circular index distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Aspect {
    Conjunction,
    SemiSextile,
    Sextile,
    Square,
    Trine,
    Quincunx,
    Opposition,
}

impl Aspect {
    pub const ALL: [Aspect; 7] = [
        Aspect::Conjunction,
        Aspect::SemiSextile,
        Aspect::Sextile,
        Aspect::Square,
        Aspect::Trine,
        Aspect::Quincunx,
        Aspect::Opposition,
    ];

    /// Aspect between two signs. Distance wraps past 6 (`12 - d`).
    pub fn between(a: Sign, b: Sign) -> Aspect {
        let mut distance = a.index().abs_diff(b.index());
        if distance > 6 {
            distance = 12 - distance;
        }
        Aspect::ALL[distance]
    }

    /// Circular step distance this aspect represents (0..=6).
    pub fn steps(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aspect::Conjunction => "conjunction",
            Aspect::SemiSextile => "semi-sextile",
            Aspect::Sextile => "sextile",
            Aspect::Square => "square",
            Aspect::Trine => "trine",
            Aspect::Quincunx => "quincunx",
            Aspect::Opposition => "opposition",
        }
    }

    /// Conjunction, trine and sextile.
    pub fn is_harmonious(&self) -> bool {
        matches!(self, Aspect::Conjunction | Aspect::Trine | Aspect::Sextile)
    }

    /// Score adjustment applied to the base compatibility.
    pub fn score_modifier(&self) -> i32 {
        match self {
            Aspect::Conjunction => 10,
            Aspect::Trine => 12,
            Aspect::Sextile => 8,
            Aspect::Square => -5,
            Aspect::Opposition => -3,
            Aspect::SemiSextile => 3,
            Aspect::Quincunx => -2,
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Element compatibility
// =============================================================================

/// Default when a pair is missing from the matrix.
pub const DEFAULT_ELEMENT_COMPATIBILITY: i32 = 60;

/// Symmetric element compatibility matrix, indexed by [`Element::index`].
const ELEMENT_MATRIX: [[i32; 4]; 4] = [
    //  fire earth air water
    [85, 45, 80, 50], // fire
    [45, 80, 50, 85], // earth
    [80, 50, 75, 55], // air
    [50, 85, 55, 80], // water
];

/// Compatibility between two elements (45–85).
pub fn element_compatibility(a: Element, b: Element) -> i32 {
    ELEMENT_MATRIX
        .get(a.index())
        .and_then(|row| row.get(b.index()))
        .copied()
        .unwrap_or(DEFAULT_ELEMENT_COMPATIBILITY)
}

/// Uppercase the first character of each `_`/space separated word.
pub fn title_case(s: &str) -> String {
    s.split(|c| c == '_' || c == ' ')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sun_sign_gemini_cutover() {
        assert_eq!(Sign::from_date(date(1986, 5, 23)), Sign::Gemini);
        assert_eq!(Sign::from_date(date(1986, 5, 21)), Sign::Gemini);
        assert_eq!(Sign::from_date(date(1986, 5, 20)), Sign::Taurus);
    }

    #[test]
    fn test_sun_sign_capricorn_wraps_year() {
        assert_eq!(Sign::from_date(date(2000, 1, 1)), Sign::Capricorn);
        assert_eq!(Sign::from_date(date(2000, 1, 19)), Sign::Capricorn);
        assert_eq!(Sign::from_date(date(2000, 1, 20)), Sign::Aquarius);
        assert_eq!(Sign::from_date(date(2000, 12, 22)), Sign::Capricorn);
        assert_eq!(Sign::from_date(date(2000, 12, 21)), Sign::Sagittarius);
    }

    #[test]
    fn test_sun_sign_leap_day() {
        assert_eq!(Sign::from_date(date(2024, 2, 29)), Sign::Pisces);
    }

    #[test]
    fn test_elements_and_modalities() {
        assert_eq!(Sign::Aries.element(), Element::Fire);
        assert_eq!(Sign::Capricorn.element(), Element::Earth);
        assert_eq!(Sign::Aquarius.element(), Element::Air);
        assert_eq!(Sign::Pisces.element(), Element::Water);
        assert_eq!(Sign::Libra.modality(), Modality::Cardinal);
        assert_eq!(Sign::Scorpio.modality(), Modality::Fixed);
        assert_eq!(Sign::Virgo.modality(), Modality::Mutable);
    }

    #[test]
    fn test_each_element_has_three_signs() {
        for element in Element::ALL {
            let count = Sign::ALL.iter().filter(|s| s.element() == element).count();
            assert_eq!(count, 3, "{}", element);
        }
    }

    #[test]
    fn test_aspect_aries_leo_trine() {
        assert_eq!(Aspect::between(Sign::Aries, Sign::Leo), Aspect::Trine);
        assert_eq!(Aspect::between(Sign::Leo, Sign::Aries), Aspect::Trine);
    }

    #[test]
    fn test_aspect_wraps_past_six() {
        // aries(0) vs pisces(11): distance 11 -> 1
        assert_eq!(Aspect::between(Sign::Aries, Sign::Pisces), Aspect::SemiSextile);
        assert_eq!(Aspect::between(Sign::Aries, Sign::Libra), Aspect::Opposition);
        assert_eq!(Aspect::between(Sign::Taurus, Sign::Capricorn), Aspect::Trine);
        assert_eq!(Aspect::between(Sign::Cancer, Sign::Cancer), Aspect::Conjunction);
    }

    #[test]
    fn test_aspect_harmony() {
        assert!(Aspect::Conjunction.is_harmonious());
        assert!(Aspect::Trine.is_harmonious());
        assert!(Aspect::Sextile.is_harmonious());
        assert!(!Aspect::Square.is_harmonious());
        assert!(!Aspect::SemiSextile.is_harmonious());
    }

    #[test]
    fn test_element_matrix_symmetric() {
        for a in Element::ALL {
            for b in Element::ALL {
                assert_eq!(element_compatibility(a, b), element_compatibility(b, a));
                let v = element_compatibility(a, b);
                assert!((45..=85).contains(&v));
            }
        }
        assert_eq!(element_compatibility(Element::Earth, Element::Water), 85);
        assert_eq!(element_compatibility(Element::Fire, Element::Earth), 45);
    }

    #[test]
    fn test_sign_parse_and_serde() {
        assert_eq!("Gemini".parse::<Sign>().unwrap(), Sign::Gemini);
        assert!("ophiuchus".parse::<Sign>().is_err());
        assert_eq!(serde_json::to_string(&Sign::Sagittarius).unwrap(), "\"sagittarius\"");
        assert_eq!(serde_json::to_string(&Aspect::SemiSextile).unwrap(), "\"semi-sextile\"");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(Sign::Sagittarius.title(), "Sagittarius");
        assert_eq!(title_case("twin_flame"), "Twin Flame");
        assert_eq!(Planet::Venus.title(), "Venus");
    }
}
