//! Chart Synthesizer
//!
//! Builds a synthetic natal chart from a birthdate. Nothing here is
//! astronomy: the sun sign comes from the calendar, and every other
//! placement is drawn from [`chart_seed`] so the same date always yields
//! the same chart.
//!
//! # Seed layout
//!
//! ```text
//! "{date}-{i + 1}"    sign of the planet at index i (moon = 2 … pluto = 11)
//! "{date}-{i + 100}"  degree of the planet at index i (sun included)
//! ```
//!
//! Offset 0 is never drawn, so no placement shares the sun's own seed space.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::ContentLookup;
use crate::core::error::{CosmicError, Result};
use crate::core::seed::chart_seed;
use crate::core::zodiac::{Element, Modality, Planet, Sign};

/// Added to a planet's index to get its sign seed offset.
pub const SIGN_SEED_OFFSET: usize = 1;

/// Added to a planet's index to get its degree seed offset.
pub const DEGREE_SEED_OFFSET: usize = 100;

// =============================================================================
// Placement
// =============================================================================

/// One planet's synthetic position plus its descriptive text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub planet: Planet,
    pub sign: Sign,
    /// 1..=29
    pub degree: u8,
    /// 1..=12
    pub house: u8,
    /// What this planet governs ("Your core identity and life force")
    #[serde(default)]
    pub role: String,
    /// Planet-in-sign reading
    #[serde(default)]
    pub interpretation: String,
}

// =============================================================================
// Chart
// =============================================================================

/// A synthetic natal chart.
///
/// `placements` iterates in planet order. Charts that were stored and
/// reloaded may be missing placements; [`Chart::sign_or_sun`] covers that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub birthdate: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_location: Option<String>,
    pub sun_sign: Sign,
    pub placements: BTreeMap<Planet, Placement>,
    pub elements: BTreeMap<Element, u32>,
    pub modalities: BTreeMap<Modality, u32>,
    pub dominant_element: Element,
    pub dominant_modality: Modality,
}

impl Chart {
    pub fn placement(&self, planet: Planet) -> Option<&Placement> {
        self.placements.get(&planet)
    }

    /// Sign of `planet`, or the sun sign when the placement is missing.
    pub fn sign_or_sun(&self, planet: Planet) -> Sign {
        self.placement(planet)
            .map(|p| p.sign)
            .unwrap_or(self.sun_sign)
    }

    pub fn sun_element(&self) -> Element {
        self.sun_sign.element()
    }
}

/// Parse an ISO `YYYY-MM-DD` birthdate.
pub fn parse_birthdate(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| CosmicError::invalid_birthdate(input))
}

/// Synthesize the chart for a birthdate.
///
/// `birth_time` and `birth_location` are carried on the chart but do not
/// move any placement.
pub fn synthesize_chart<C: ContentLookup + ?Sized>(
    content: &C,
    birthdate: NaiveDate,
    birth_time: Option<&str>,
    birth_location: Option<&str>,
) -> Chart {
    if birth_time.is_some() || birth_location.is_some() {
        debug!(
            %birthdate,
            ?birth_time,
            ?birth_location,
            "birth time/location recorded but not used for placements"
        );
    }

    let sun_sign = Sign::from_date(birthdate);

    let mut placements = BTreeMap::new();
    for planet in Planet::ALL {
        let i = planet.index();
        let sign = if planet == Planet::Sun {
            sun_sign
        } else {
            Sign::from_index((chart_seed(birthdate, i + SIGN_SEED_OFFSET) % 12) as usize)
        };
        let degree = (chart_seed(birthdate, i + DEGREE_SEED_OFFSET) % 29) as u8 + 1;
        let house = (i % 12) as u8 + 1;
        let (role, interpretation) = content.planet_text(planet, sign);

        placements.insert(
            planet,
            Placement {
                planet,
                sign,
                degree,
                house,
                role,
                interpretation,
            },
        );
    }

    let (elements, modalities) = tally(&placements);
    let dominant_element = dominant(&Element::ALL, &elements);
    let dominant_modality = dominant(&Modality::ALL, &modalities);

    Chart {
        birthdate,
        birth_time: birth_time.map(str::to_string),
        birth_location: birth_location.map(str::to_string),
        sun_sign,
        placements,
        elements,
        modalities,
        dominant_element,
        dominant_modality,
    }
}

/// Parse the birthdate string and synthesize its chart.
pub fn synthesize_chart_from_str<C: ContentLookup + ?Sized>(
    content: &C,
    birthdate: &str,
    birth_time: Option<&str>,
    birth_location: Option<&str>,
) -> Result<Chart> {
    let date = parse_birthdate(birthdate)?;
    Ok(synthesize_chart(content, date, birth_time, birth_location))
}

fn tally(
    placements: &BTreeMap<Planet, Placement>,
) -> (BTreeMap<Element, u32>, BTreeMap<Modality, u32>) {
    let mut elements: BTreeMap<Element, u32> = Element::ALL.iter().map(|e| (*e, 0)).collect();
    let mut modalities: BTreeMap<Modality, u32> = Modality::ALL.iter().map(|m| (*m, 0)).collect();

    for placement in placements.values() {
        *elements.entry(placement.sign.element()).or_insert(0) += 1;
        *modalities.entry(placement.sign.modality()).or_insert(0) += 1;
    }

    (elements, modalities)
}

/// First key in `order` holding the maximum count.
fn dominant<K: Ord + Copy>(order: &[K], counts: &BTreeMap<K, u32>) -> K {
    let mut best = order[0];
    let mut best_count = counts.get(&best).copied().unwrap_or(0);
    for key in &order[1..] {
        let count = counts.get(key).copied().unwrap_or(0);
        if count > best_count {
            best = *key;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentPack, MockContentLookup};
    use crate::core::seed::seed;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sun_placement_uses_calendar_sign() {
        let chart = synthesize_chart(ContentPack::builtin(), date(1986, 5, 23), None, None);
        assert_eq!(chart.sun_sign, Sign::Gemini);
        assert_eq!(chart.placement(Planet::Sun).unwrap().sign, Sign::Gemini);
    }

    #[test]
    fn test_placement_sign_and_degree_follow_seed_layout() {
        let d = date(1990, 11, 2);
        let chart = synthesize_chart(ContentPack::builtin(), d, None, None);

        let moon = chart.placement(Planet::Moon).unwrap();
        let expected_sign = Sign::from_index((seed("1990-11-02-2") % 12) as usize);
        let expected_degree = (seed("1990-11-02-101") % 29) as u8 + 1;
        assert_eq!(moon.sign, expected_sign);
        assert_eq!(moon.degree, expected_degree);

        let sun = chart.placement(Planet::Sun).unwrap();
        assert_eq!(sun.degree, (seed("1990-11-02-100") % 29) as u8 + 1);
    }

    #[test]
    fn test_houses_follow_planet_order() {
        let chart = synthesize_chart(ContentPack::builtin(), date(2000, 3, 1), None, None);
        for (i, planet) in Planet::ALL.iter().enumerate() {
            assert_eq!(chart.placement(*planet).unwrap().house as usize, i + 1);
        }
    }

    #[test]
    fn test_ranges_hold() {
        let chart = synthesize_chart(ContentPack::builtin(), date(1975, 8, 30), None, None);
        assert_eq!(chart.placements.len(), 11);
        for placement in chart.placements.values() {
            assert!((1..=29).contains(&placement.degree));
            assert!((1..=12).contains(&placement.house));
        }
        assert_eq!(chart.elements.values().sum::<u32>(), 11);
        assert_eq!(chart.modalities.values().sum::<u32>(), 11);
    }

    #[test]
    fn test_dominant_breaks_ties_by_fixed_order() {
        let mut counts = BTreeMap::new();
        counts.insert(Element::Fire, 2);
        counts.insert(Element::Earth, 3);
        counts.insert(Element::Air, 3);
        counts.insert(Element::Water, 3);
        assert_eq!(dominant(&Element::ALL, &counts), Element::Earth);

        let mut mods = BTreeMap::new();
        mods.insert(Modality::Cardinal, 4);
        mods.insert(Modality::Fixed, 4);
        mods.insert(Modality::Mutable, 3);
        assert_eq!(dominant(&Modality::ALL, &mods), Modality::Cardinal);
    }

    #[test]
    fn test_dominant_matches_counts() {
        let chart = synthesize_chart(ContentPack::builtin(), date(1961, 4, 12), None, None);
        let max = chart.elements.values().copied().max().unwrap();
        assert_eq!(chart.elements[&chart.dominant_element], max);
    }

    #[test]
    fn test_missing_content_gives_empty_text() {
        let mut mock = MockContentLookup::new();
        mock.expect_planet_text()
            .times(11)
            .returning(|_, _| (String::new(), String::new()));

        let chart = synthesize_chart(&mock, date(1986, 5, 23), None, None);
        assert!(chart.placements.values().all(|p| p.interpretation.is_empty()));
    }

    #[test]
    fn test_birth_time_does_not_move_placements() {
        let d = date(1996, 7, 8);
        let bare = synthesize_chart(ContentPack::builtin(), d, None, None);
        let timed = synthesize_chart(ContentPack::builtin(), d, Some("22:15"), Some("Miami, FL"));
        assert_eq!(bare.placements, timed.placements);
        assert_eq!(timed.birth_time.as_deref(), Some("22:15"));
    }

    #[test]
    fn test_sign_or_sun_fallback() {
        let mut chart = synthesize_chart(ContentPack::builtin(), date(1994, 12, 3), None, None);
        chart.placements.remove(&Planet::Moon);
        assert_eq!(chart.sign_or_sun(Planet::Moon), Sign::Sagittarius);
    }

    #[test]
    fn test_parse_birthdate_rejects_garbage() {
        assert!(parse_birthdate("1986-05-23").is_ok());
        assert!(matches!(
            parse_birthdate("1986-02-30"),
            Err(CosmicError::InvalidBirthdate { .. })
        ));
        assert!(parse_birthdate("yesterday").is_err());
    }

    #[test]
    fn test_chart_serializes_planet_keys() {
        let chart = synthesize_chart(ContentPack::builtin(), date(1986, 5, 23), None, None);
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["placements"]["sun"]["sign"], "gemini");
        assert_eq!(json["sun_sign"], "gemini");
        let back: Chart = serde_json::from_value(json).unwrap();
        assert_eq!(back, chart);
    }
}
