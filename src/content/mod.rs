//! Content Lookup
//!
//! The generation pipeline never reaches for global text tables. Every
//! piece of prose (planet interpretations, pair strengths, aspect blurbs,
//! daily insights, story templates) is resolved through the
//! [`ContentLookup`] capability, which callers build once and pass in.
//!
//! # Contract
//!
//! All lookups are total: a missing entry is `None` or an empty
//! collection, never an error. Callers substitute defaults.
//!
//! # Implementations
//!
//! - [`ContentPack`]: serde-loadable content set, with the compiled-in
//!   default available from [`ContentPack::builtin`]

pub mod pack;

pub use pack::{ContentPack, PlanetContent};

use serde::{Deserialize, Serialize};

use crate::core::compatibility::Category;
use crate::core::zodiac::{Aspect, Element, Planet, Sign};

#[cfg(test)]
use mockall::automock;

/// Which generic template list to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Strength,
    Challenge,
}

/// One rotating "cosmic weather" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmicWeather {
    pub title: String,
    #[serde(default)]
    pub emoji: String,
    pub description: String,
    #[serde(default)]
    pub advice: String,
}

impl CosmicWeather {
    /// Neutral entry used when a content set carries no weather at all.
    pub fn calm() -> Self {
        Self {
            title: "Quiet Skies".to_string(),
            emoji: "✨".to_string(),
            description: "No single planet dominates today. The sky is quiet and the pace is yours to set.".to_string(),
            advice: "Follow your own rhythm.".to_string(),
        }
    }
}

/// A chapter template with `{placeholder}` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterTemplate {
    pub title: String,
    pub body: String,
}

/// Category-keyed story template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryTemplate {
    pub title: String,
    pub chapters: Vec<ChapterTemplate>,
}

/// Read-only text provider consumed by every generator.
///
/// Implementations must be cheap to share across threads; they are
/// passed by reference into pure functions.
#[cfg_attr(test, automock)]
pub trait ContentLookup: Send + Sync {
    /// (role, interpretation) for a planet in a sign. Empty strings if absent.
    fn planet_text(&self, planet: Planet, sign: Sign) -> (String, String);

    /// Strengths specific to a sign pair, in either order.
    fn pair_strengths(&self, a: Sign, b: Sign) -> Option<Vec<String>>;

    /// Challenges specific to a sign pair, in either order.
    fn pair_challenges(&self, a: Sign, b: Sign) -> Option<Vec<String>>;

    /// Description of `aspect` between `planet1` (first chart) and `planet2` (second chart).
    fn aspect_text(&self, planet1: Planet, planet2: Planet, aspect: Aspect) -> Option<String>;

    /// Generic per-category fallback list.
    fn generic_templates(&self, category: Category, kind: TemplateKind) -> Vec<String>;

    /// Rotating daily insights for a sign.
    fn daily_insights(&self, sign: Sign) -> Vec<String>;

    /// Rotating cosmic weather entries.
    fn cosmic_weather(&self) -> Vec<CosmicWeather>;

    /// Connection prompts for an element pair bucket. `{name}` marks the contact.
    fn connection_prompts(&self, a: Element, b: Element) -> Vec<String>;

    /// Story template for a category.
    fn story_template(&self, category: Category) -> Option<StoryTemplate>;

    /// What a sign brings to a relationship ("bold action and fearless leadership").
    fn sign_quality(&self, sign: Sign) -> Option<String>;

    /// A sign's characteristic friction point ("impatience").
    fn sign_challenge(&self, sign: Sign) -> Option<String>;

    /// Element-keyed shared quality ("steadfast loyalty").
    fn shared_quality(&self, element: Element) -> Option<String>;
}
