//! Daily Forecast Rotation
//!
//! Everything here rotates on the day of the year. The same date, sign and
//! contact list always give the same insight, weather and spotlight order;
//! the date is an explicit input, never read from the clock.
//!
//! # Rotation
//!
//! ```text
//! insight    = insights(sign)[doy mod len]
//! weather    = weather[doy mod len]
//! prompt(i)  = prompts(sorted element pair)[(doy + 7i) mod len]
//! spotlights = stable sort by seed(contact_id + doy), first min(3, N)
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{ContentLookup, CosmicWeather};
use crate::core::error::CosmicError;
use crate::core::seed::seed;
use crate::core::zodiac::{Element, Sign};

/// Spotlights shown per day.
pub const DEFAULT_SPOTLIGHT_LIMIT: usize = 3;

/// Prompt stride between consecutive contacts on the same day.
const CONTACT_PROMPT_STRIDE: usize = 7;

/// How a contact relates to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipTag {
    #[default]
    Friend,
    Partner,
    Family,
    Coworker,
    Crush,
    Ex,
}

impl RelationshipTag {
    pub const ALL: [RelationshipTag; 6] = [
        RelationshipTag::Friend,
        RelationshipTag::Partner,
        RelationshipTag::Family,
        RelationshipTag::Coworker,
        RelationshipTag::Crush,
        RelationshipTag::Ex,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RelationshipTag::Friend => "friend",
            RelationshipTag::Partner => "partner",
            RelationshipTag::Family => "family",
            RelationshipTag::Coworker => "coworker",
            RelationshipTag::Crush => "crush",
            RelationshipTag::Ex => "ex",
        }
    }
}

impl fmt::Display for RelationshipTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RelationshipTag {
    type Err = CosmicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        RelationshipTag::ALL
            .iter()
            .copied()
            .find(|t| t.name() == lower)
            .ok_or_else(|| CosmicError::UnknownRelationship { name: s.to_string() })
    }
}

/// A contact as the forecast needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactProfile {
    pub id: String,
    pub name: String,
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub relationship_tag: RelationshipTag,
}

impl ContactProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, birthdate: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            birthdate,
            relationship_tag: RelationshipTag::default(),
        }
    }

    pub fn with_tag(mut self, tag: RelationshipTag) -> Self {
        self.relationship_tag = tag;
        self
    }

    pub fn sun_sign(&self) -> Sign {
        Sign::from_date(self.birthdate)
    }
}

/// A date-specific prompt about one contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spotlight {
    pub contact_id: String,
    pub contact_name: String,
    pub contact_sign: Sign,
    pub relationship_tag: RelationshipTag,
    pub message: String,
}

/// The full daily forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// "Friday, October 16"
    pub formatted_date: String,
    pub sign: Sign,
    pub personal_insight: String,
    pub cosmic_weather: CosmicWeather,
    pub connection_spotlights: Vec<Spotlight>,
}

/// 1..=366
pub fn day_of_year(date: NaiveDate) -> usize {
    date.ordinal() as usize
}

/// Today's insight for a sign, falling back to aries insights.
pub fn daily_insight<C: ContentLookup + ?Sized>(content: &C, date: NaiveDate, sign: Sign) -> String {
    let mut insights = content.daily_insights(sign);
    if insights.is_empty() {
        debug!(%sign, "no insights for sign, using aries");
        insights = content.daily_insights(Sign::Aries);
    }
    pick(&insights, day_of_year(date)).cloned().unwrap_or_default()
}

/// Build the forecast with the default spotlight limit.
pub fn daily_forecast<C: ContentLookup + ?Sized>(
    content: &C,
    date: NaiveDate,
    sun_sign: Sign,
    element: Element,
    contacts: &[ContactProfile],
) -> DailyForecast {
    daily_forecast_with_limit(content, date, sun_sign, element, contacts, DEFAULT_SPOTLIGHT_LIMIT)
}

/// Build the forecast, keeping at most `limit` spotlights.
pub fn daily_forecast_with_limit<C: ContentLookup + ?Sized>(
    content: &C,
    date: NaiveDate,
    sun_sign: Sign,
    element: Element,
    contacts: &[ContactProfile],
    limit: usize,
) -> DailyForecast {
    let doy = day_of_year(date);

    let cosmic_weather = pick(&content.cosmic_weather(), doy)
        .cloned()
        .unwrap_or_else(CosmicWeather::calm);

    let mut spotlights: Vec<(u128, Spotlight)> = contacts
        .iter()
        .enumerate()
        .map(|(i, contact)| {
            let rank = seed(&format!("{}{}", contact.id, doy));
            (rank, spotlight(content, doy, element, i, contact))
        })
        .collect();

    // Stable: equal ranks keep contact order.
    spotlights.sort_by_key(|(rank, _)| *rank);
    let connection_spotlights = spotlights
        .into_iter()
        .take(limit)
        .map(|(_, s)| s)
        .collect();

    DailyForecast {
        date,
        formatted_date: date.format("%A, %B %d").to_string(),
        sign: sun_sign,
        personal_insight: daily_insight(content, date, sun_sign),
        cosmic_weather,
        connection_spotlights,
    }
}

fn spotlight<C: ContentLookup + ?Sized>(
    content: &C,
    doy: usize,
    user_element: Element,
    position: usize,
    contact: &ContactProfile,
) -> Spotlight {
    let contact_sign = contact.sun_sign();
    let prompts = connection_prompts(content, user_element, contact_sign.element());
    let index = doy + position * CONTACT_PROMPT_STRIDE;
    let message = pick(&prompts, index)
        .map(|p| p.replace("{name}", &contact.name))
        .unwrap_or_default();

    Spotlight {
        contact_id: contact.id.clone(),
        contact_name: contact.name.clone(),
        contact_sign,
        relationship_tag: contact.relationship_tag,
        message,
    }
}

/// Alphabetically sorted pair first, then the pair as given, then fire/fire.
fn connection_prompts<C: ContentLookup + ?Sized>(
    content: &C,
    user: Element,
    contact: Element,
) -> Vec<String> {
    let (first, second) = if user.name() <= contact.name() {
        (user, contact)
    } else {
        (contact, user)
    };

    let prompts = content.connection_prompts(first, second);
    if !prompts.is_empty() {
        return prompts;
    }
    let prompts = content.connection_prompts(user, contact);
    if !prompts.is_empty() {
        return prompts;
    }
    content.connection_prompts(Element::Fire, Element::Fire)
}

fn pick<T>(items: &[T], index: usize) -> Option<&T> {
    if items.is_empty() {
        None
    } else {
        items.get(index % items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentPack, MockContentLookup};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contacts() -> Vec<ContactProfile> {
        vec![
            ContactProfile::new("c-luna", "Luna", date(1996, 7, 8)).with_tag(RelationshipTag::Partner),
            ContactProfile::new("c-marcus", "Marcus", date(1994, 12, 3)),
            ContactProfile::new("c-sofia", "Sofia", date(1997, 1, 10)).with_tag(RelationshipTag::Coworker),
            ContactProfile::new("c-kai", "Kai", date(1995, 8, 15)).with_tag(RelationshipTag::Crush),
            ContactProfile::new("c-alex", "Alex", date(1993, 3, 5)).with_tag(RelationshipTag::Family),
        ]
    }

    #[test]
    fn test_day_of_year_range() {
        assert_eq!(day_of_year(date(2026, 1, 1)), 1);
        assert_eq!(day_of_year(date(2024, 12, 31)), 366);
    }

    #[test]
    fn test_insight_and_weather_rotate_by_day() {
        let pack = ContentPack::builtin();
        let d = date(2026, 10, 16); // day 289
        let forecast = daily_forecast(pack, d, Sign::Gemini, Element::Air, &[]);

        let insights = pack.daily_insights(Sign::Gemini);
        assert_eq!(forecast.personal_insight, insights[289 % insights.len()]);
        let weather = pack.cosmic_weather();
        assert_eq!(forecast.cosmic_weather, weather[289 % weather.len()]);
        assert_eq!(forecast.formatted_date, "Friday, October 16");
        assert!(forecast.connection_spotlights.is_empty());
    }

    #[test]
    fn test_spotlights_are_ranked_by_seed() {
        let pack = ContentPack::builtin();
        let d = date(2026, 10, 16);
        let forecast = daily_forecast(pack, d, Sign::Gemini, Element::Air, &contacts());
        assert_eq!(forecast.connection_spotlights.len(), 3);

        let mut expected: Vec<(u128, String)> = contacts()
            .into_iter()
            .map(|c| (seed(&format!("{}289", c.id)), c.id))
            .collect();
        expected.sort_by_key(|(r, _)| *r);
        let expected_ids: Vec<String> = expected.into_iter().take(3).map(|(_, id)| id).collect();
        let ids: Vec<String> = forecast
            .connection_spotlights
            .iter()
            .map(|s| s.contact_id.clone())
            .collect();
        assert_eq!(ids, expected_ids);
    }

    #[test]
    fn test_spotlight_prompt_index_uses_position() {
        let pack = ContentPack::builtin();
        let d = date(2026, 10, 16);
        let all = contacts();
        let forecast = daily_forecast_with_limit(pack, d, Sign::Gemini, Element::Air, &all, 10);
        assert_eq!(forecast.connection_spotlights.len(), 5);

        // Marcus: position 1, sagittarius (fire); air/fire bucket stored as fire-air
        let marcus = forecast
            .connection_spotlights
            .iter()
            .find(|s| s.contact_id == "c-marcus")
            .unwrap();
        let prompts = pack.connection_prompts(Element::Air, Element::Fire);
        let expected = prompts[(289 + 7) % prompts.len()].replace("{name}", "Marcus");
        assert_eq!(marcus.message, expected);
        assert_eq!(marcus.contact_sign, Sign::Sagittarius);
        assert_eq!(marcus.relationship_tag, RelationshipTag::Friend);
    }

    #[test]
    fn test_forecast_is_repeatable() {
        let pack = ContentPack::builtin();
        let d = date(2025, 2, 28);
        let a = daily_forecast(pack, d, Sign::Pisces, Element::Water, &contacts());
        let b = daily_forecast(pack, d, Sign::Pisces, Element::Water, &contacts());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_content_uses_defaults() {
        let empty = ContentPack::empty("none");
        let forecast = daily_forecast(&empty, date(2026, 1, 5), Sign::Leo, Element::Fire, &contacts());
        assert_eq!(forecast.personal_insight, "");
        assert_eq!(forecast.cosmic_weather, CosmicWeather::calm());
        assert!(forecast.connection_spotlights.iter().all(|s| s.message.is_empty()));
    }

    #[test]
    fn test_insight_falls_back_to_aries() {
        let mut mock = MockContentLookup::new();
        mock.expect_daily_insights().returning(|sign| {
            if sign == Sign::Aries {
                vec!["aries-0".to_string(), "aries-1".to_string()]
            } else {
                vec![]
            }
        });
        // Jan 2 -> day 2 -> index 0
        assert_eq!(daily_insight(&mock, date(2026, 1, 2), Sign::Virgo), "aries-0");
        assert_eq!(daily_insight(&mock, date(2026, 1, 3), Sign::Virgo), "aries-1");
    }

    #[test]
    fn test_prompt_bucket_fallback_chain() {
        let mut mock = MockContentLookup::new();
        mock.expect_connection_prompts().returning(|a, b| match (a, b) {
            (Element::Water, Element::Earth) => vec!["as given".to_string()],
            (Element::Fire, Element::Fire) => vec!["fire".to_string()],
            _ => vec![],
        });
        assert_eq!(connection_prompts(&mock, Element::Water, Element::Earth), vec!["as given"]);
        assert_eq!(connection_prompts(&mock, Element::Air, Element::Water), vec!["fire"]);
    }

    #[test]
    fn test_relationship_tag_parse() {
        assert_eq!("Partner".parse::<RelationshipTag>().unwrap(), RelationshipTag::Partner);
        assert!("nemesis".parse::<RelationshipTag>().is_err());
    }
}
