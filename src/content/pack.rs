//! Serializable content sets.
//!
//! A [`ContentPack`] is the JSON form of every text table the generators
//! consult. Pair tables are keyed `"sign-sign"` / `"element-element"` and
//! are looked up in both orders, so a pack only needs one ordering of
//! each pair.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ContentLookup, CosmicWeather, StoryTemplate, TemplateKind};
use crate::core::compatibility::Category;
use crate::core::error::{CosmicError, Result};
use crate::core::zodiac::{Aspect, Element, Planet, Sign};

lazy_static! {
    /// Default content compiled into the crate.
    static ref BUILTIN: ContentPack = serde_json::from_str(include_str!("builtin.json"))
        .expect("built-in content pack is valid JSON");
}

/// Role text plus per-sign interpretations for one planet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetContent {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub signs: BTreeMap<String, String>,
}

/// A versioned, self-contained content set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPack {
    pub version: String,
    #[serde(default)]
    pub planets: BTreeMap<String, PlanetContent>,
    #[serde(default)]
    pub pair_strengths: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub pair_challenges: BTreeMap<String, Vec<String>>,
    /// `"planet-planet"` → aspect name → description
    #[serde(default)]
    pub aspects: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub generic_strengths: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub generic_challenges: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub daily_insights: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub cosmic_weather: Vec<CosmicWeather>,
    #[serde(default)]
    pub connection_prompts: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub story_templates: BTreeMap<String, StoryTemplate>,
    #[serde(default)]
    pub sign_qualities: BTreeMap<String, String>,
    #[serde(default)]
    pub sign_challenges: BTreeMap<String, String>,
    #[serde(default)]
    pub shared_qualities: BTreeMap<String, String>,
}

/// Look up `"a-b"`, then `"b-a"`.
fn pair_entry<'a, T>(map: &'a BTreeMap<String, T>, a: &str, b: &str) -> Option<&'a T> {
    map.get(&format!("{}-{}", a, b))
        .or_else(|| map.get(&format!("{}-{}", b, a)))
}

impl ContentPack {
    /// The default content set shipped with the crate.
    pub fn builtin() -> &'static ContentPack {
        &BUILTIN
    }

    /// An empty pack with only a version. Every lookup misses.
    pub fn empty(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Parse and validate a pack from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let pack: ContentPack = serde_json::from_str(json)?;
        pack.validate()?;
        Ok(pack)
    }

    /// Load a pack from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let pack: ContentPack = serde_json::from_str(&text)?;
        pack.validate().map_err(|e| CosmicError::ContentPack {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!(
            path = %path.display(),
            version = %pack.version,
            pairs = pack.pair_strengths.len(),
            "loaded content pack"
        );
        Ok(pack)
    }

    /// Pretty JSON for export.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every key names something the generators can ask for.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(CosmicError::invalid_config("content pack version is empty"));
        }

        for key in self.planets.keys() {
            if !Planet::ALL.iter().any(|p| p.name() == key) {
                return Err(CosmicError::invalid_config(format!("unknown planet '{}'", key)));
            }
        }

        for key in self
            .pair_strengths
            .keys()
            .chain(self.pair_challenges.keys())
        {
            parse_pair::<Sign>(key)?;
        }

        for key in self.connection_prompts.keys() {
            parse_pair::<Element>(key)?;
        }

        for key in self.daily_insights.keys() {
            key.parse::<Sign>()?;
        }

        for key in self
            .story_templates
            .keys()
            .chain(self.generic_strengths.keys())
            .chain(self.generic_challenges.keys())
        {
            if Category::parse(key).is_none() {
                return Err(CosmicError::invalid_config(format!("unknown category '{}'", key)));
            }
        }

        for (key, template) in &self.story_templates {
            if template.chapters.is_empty() {
                return Err(CosmicError::invalid_config(format!(
                    "story template '{}' has no chapters",
                    key
                )));
            }
        }

        Ok(())
    }
}

fn parse_pair<T>(key: &str) -> Result<(T, T)>
where
    T: std::str::FromStr<Err = CosmicError>,
{
    let (a, b) = key
        .split_once('-')
        .ok_or_else(|| CosmicError::invalid_config(format!("pair key '{}' is not 'a-b'", key)))?;
    Ok((a.parse()?, b.parse()?))
}

impl ContentLookup for ContentPack {
    fn planet_text(&self, planet: Planet, sign: Sign) -> (String, String) {
        match self.planets.get(planet.name()) {
            Some(content) => (
                content.role.clone(),
                content.signs.get(sign.name()).cloned().unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        }
    }

    fn pair_strengths(&self, a: Sign, b: Sign) -> Option<Vec<String>> {
        pair_entry(&self.pair_strengths, a.name(), b.name()).cloned()
    }

    fn pair_challenges(&self, a: Sign, b: Sign) -> Option<Vec<String>> {
        pair_entry(&self.pair_challenges, a.name(), b.name()).cloned()
    }

    fn aspect_text(&self, planet1: Planet, planet2: Planet, aspect: Aspect) -> Option<String> {
        // Planet pairs are directional (venus of one chart, mars of the other).
        self.aspects
            .get(&format!("{}-{}", planet1.name(), planet2.name()))
            .and_then(|by_aspect| by_aspect.get(aspect.name()))
            .filter(|text| !text.is_empty())
            .cloned()
    }

    fn generic_templates(&self, category: Category, kind: TemplateKind) -> Vec<String> {
        let table = match kind {
            TemplateKind::Strength => &self.generic_strengths,
            TemplateKind::Challenge => &self.generic_challenges,
        };
        table.get(category.name()).cloned().unwrap_or_default()
    }

    fn daily_insights(&self, sign: Sign) -> Vec<String> {
        self.daily_insights
            .get(sign.name())
            .cloned()
            .unwrap_or_default()
    }

    fn cosmic_weather(&self) -> Vec<CosmicWeather> {
        self.cosmic_weather.clone()
    }

    fn connection_prompts(&self, a: Element, b: Element) -> Vec<String> {
        let prompts = pair_entry(&self.connection_prompts, a.name(), b.name());
        if prompts.is_none() {
            debug!(a = %a, b = %b, "no connection prompts for element pair");
        }
        prompts.cloned().unwrap_or_default()
    }

    fn story_template(&self, category: Category) -> Option<StoryTemplate> {
        self.story_templates.get(category.name()).cloned()
    }

    fn sign_quality(&self, sign: Sign) -> Option<String> {
        self.sign_qualities.get(sign.name()).cloned()
    }

    fn sign_challenge(&self, sign: Sign) -> Option<String> {
        self.sign_challenges.get(sign.name()).cloned()
    }

    fn shared_quality(&self, element: Element) -> Option<String> {
        self.shared_qualities.get(element.name()).cloned()
    }
}
