//! Compatibility Scorer
//!
//! Blends element harmony, the sun-sun aspect and (depending on depth)
//! moon and venus/mars factors into one overall score, then classifies it.
//!
//! # Pipeline
//!
//! ```text
//! sun elements ─► base ─► + aspect bonus ─► sub-scores (seeded variance)
//!                                  │
//!          depth ≥ sun_moon_rising ├─► blend moon element harmony
//!          depth = full_chart      └─► venus/mars harmony bonus
//!                                  ▼
//!                     clamp [25, 98] ─► Category
//! ```
//!
//! The variance for each sub-score comes from [`pair_seed`] of the two sun
//! signs, so swapping the charts never changes the sub-scores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{ContentLookup, TemplateKind};
use crate::core::chart::Chart;
use crate::core::error::CosmicError;
use crate::core::seed::pair_seed;
use crate::core::zodiac::{element_compatibility, Aspect, Planet, Sign};

/// Overall score bounds.
pub const MIN_OVERALL: i32 = 25;
pub const MAX_OVERALL: i32 = 98;

/// Sub-score bounds.
pub const MIN_SUB_SCORE: i32 = 20;
pub const MAX_SUB_SCORE: i32 = 100;

/// Bonus for a harmonious venus/mars aspect at full-chart depth.
pub const VENUS_MARS_BASE_BONUS: i32 = 5;
pub const VENUS_MARS_PHYSICAL_BONUS: i32 = 10;

const STRENGTH_COUNT: usize = 3;
const CHALLENGE_COUNT: usize = 2;

/// Planet pairs reported as key aspects, in depth order.
const KEY_ASPECT_PAIRS: [(Planet, Planet); 3] = [
    (Planet::Sun, Planet::Sun),
    (Planet::Moon, Planet::Moon),
    (Planet::Venus, Planet::Mars),
];

// =============================================================================
// Depth
// =============================================================================

/// How many chart factors feed the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    #[default]
    SunOnly,
    SunMoonRising,
    FullChart,
}

impl Depth {
    pub const ALL: [Depth; 3] = [Depth::SunOnly, Depth::SunMoonRising, Depth::FullChart];

    pub fn name(&self) -> &'static str {
        match self {
            Depth::SunOnly => "sun_only",
            Depth::SunMoonRising => "sun_moon_rising",
            Depth::FullChart => "full_chart",
        }
    }

    /// Parse a stored depth preference. Anything unrecognized behaves as sun_only.
    pub fn parse_lenient(s: &str) -> Depth {
        s.parse().unwrap_or_else(|_| {
            debug!(depth = s, "unrecognized depth, scoring sun only");
            Depth::SunOnly
        })
    }

    fn includes_moon(&self) -> bool {
        matches!(self, Depth::SunMoonRising | Depth::FullChart)
    }

    fn key_aspect_count(&self) -> usize {
        match self {
            Depth::SunOnly => 1,
            Depth::SunMoonRising => 2,
            Depth::FullChart => 3,
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Depth {
    type Err = CosmicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Depth::ALL
            .iter()
            .copied()
            .find(|d| d.name() == normalized)
            .ok_or_else(|| CosmicError::UnknownDepth { name: s.to_string() })
    }
}

// =============================================================================
// Category
// =============================================================================

/// Five-tier compatibility classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TwinFlame,
    RomanticSoulmate,
    PlatonicSoulmate,
    KarmicTeacher,
    CosmicChallenger,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::TwinFlame,
        Category::RomanticSoulmate,
        Category::PlatonicSoulmate,
        Category::KarmicTeacher,
        Category::CosmicChallenger,
    ];

    /// Thresholds, highest first. First match wins.
    const THRESHOLDS: [(i32, Category); 4] = [
        (85, Category::TwinFlame),
        (75, Category::RomanticSoulmate),
        (60, Category::PlatonicSoulmate),
        (45, Category::KarmicTeacher),
    ];

    pub fn from_score(overall: i32) -> Category {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| overall >= *min)
            .map(|(_, category)| *category)
            .unwrap_or(Category::CosmicChallenger)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::TwinFlame => "twin_flame",
            Category::RomanticSoulmate => "romantic_soulmate",
            Category::PlatonicSoulmate => "platonic_soulmate",
            Category::KarmicTeacher => "karmic_teacher",
            Category::CosmicChallenger => "cosmic_challenger",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.name() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Result types
// =============================================================================

/// The five named sub-scores, each in [20, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub emotional: i32,
    pub intellectual: i32,
    pub physical: i32,
    pub spiritual: i32,
    pub communication: i32,
}

impl SubScores {
    /// In the fixed category order used for variance windows.
    pub fn values(&self) -> [i32; 5] {
        [
            self.emotional,
            self.intellectual,
            self.physical,
            self.spiritual,
            self.communication,
        ]
    }
}

/// One reported planet-pair aspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAspect {
    pub planet1: Planet,
    pub planet2: Planet,
    pub sign1: Sign,
    pub sign2: Sign,
    pub aspect: Aspect,
    pub description: String,
}

/// Everything the scorer produces for one pair of charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub overall_score: i32,
    pub category: Category,
    pub sub_scores: SubScores,
    pub key_aspects: Vec<KeyAspect>,
    pub strengths: Vec<String>,
    pub challenges: Vec<String>,
    pub sun_aspect: Aspect,
    pub user_sun: Sign,
    pub contact_sun: Sign,
    pub depth: Depth,
}

// =============================================================================
// Scoring
// =============================================================================

/// Score two charts at the given depth.
pub fn score_compatibility<C: ContentLookup + ?Sized>(
    content: &C,
    user: &Chart,
    contact: &Chart,
    depth: Depth,
) -> CompatibilityResult {
    let user_sun = user.sun_sign;
    let contact_sun = contact.sun_sign;

    let mut base = element_compatibility(user_sun.element(), contact_sun.element());
    let sun_aspect = Aspect::between(user_sun, contact_sun);
    base += sun_aspect.score_modifier();

    let seed = pair_seed(user_sun.name(), contact_sun.name());
    let [emotional, intellectual, physical, spiritual, communication] =
        std::array::from_fn(|k| clamp_sub_score(base + variance(seed, k)));
    let mut sub_scores = SubScores {
        emotional,
        intellectual,
        physical,
        spiritual,
        communication,
    };

    if depth.includes_moon() {
        let moon_compat = element_compatibility(
            user.sign_or_sun(Planet::Moon).element(),
            contact.sign_or_sun(Planet::Moon).element(),
        );
        base = (base as f64 * 0.6 + moon_compat as f64 * 0.4) as i32;
        sub_scores.emotional = (sub_scores.emotional as f64 * 0.5 + moon_compat as f64 * 0.5) as i32;
    }

    if depth == Depth::FullChart {
        let venus_mars = Aspect::between(
            user.sign_or_sun(Planet::Venus),
            contact.sign_or_sun(Planet::Mars),
        );
        if venus_mars.is_harmonious() {
            base += VENUS_MARS_BASE_BONUS;
            sub_scores.physical = (sub_scores.physical + VENUS_MARS_PHYSICAL_BONUS).min(MAX_SUB_SCORE);
        }
    }

    let overall_score = base.clamp(MIN_OVERALL, MAX_OVERALL);
    let category = Category::from_score(overall_score);

    debug!(
        user_sun = %user_sun,
        contact_sun = %contact_sun,
        %depth,
        overall_score,
        %category,
        "scored compatibility"
    );

    CompatibilityResult {
        overall_score,
        category,
        sub_scores,
        key_aspects: key_aspects(content, user, contact, depth),
        strengths: strengths(content, user_sun, contact_sun, category),
        challenges: challenges(content, user_sun, contact_sun, category),
        sun_aspect,
        user_sun,
        contact_sun,
        depth,
    }
}

/// Variance in [-10, 10] for the k-th sub-score: `((seed >> 4k) mod 21) - 10`.
fn variance(seed: u128, k: usize) -> i32 {
    ((seed >> (k * 4)) % 21) as i32 - 10
}

fn clamp_sub_score(value: i32) -> i32 {
    value.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE)
}

fn key_aspects<C: ContentLookup + ?Sized>(
    content: &C,
    user: &Chart,
    contact: &Chart,
    depth: Depth,
) -> Vec<KeyAspect> {
    KEY_ASPECT_PAIRS[..depth.key_aspect_count()]
        .iter()
        .map(|&(planet1, planet2)| {
            let sign1 = user.sign_or_sun(planet1);
            let sign2 = contact.sign_or_sun(planet2);
            let aspect = Aspect::between(sign1, sign2);
            let description = content
                .aspect_text(planet1, planet2, aspect)
                .unwrap_or_else(|| {
                    format!(
                        "Your {} in {} forms a {} with their {} in {}",
                        planet1.title(),
                        sign1.title(),
                        aspect,
                        planet2.title(),
                        sign2.title()
                    )
                });
            KeyAspect {
                planet1,
                planet2,
                sign1,
                sign2,
                aspect,
                description,
            }
        })
        .collect()
}

fn strengths<C: ContentLookup + ?Sized>(
    content: &C,
    a: Sign,
    b: Sign,
    category: Category,
) -> Vec<String> {
    match content.pair_strengths(a, b) {
        Some(list) if !list.is_empty() => list,
        _ => generic_window(content, a, b, category, TemplateKind::Strength, STRENGTH_COUNT),
    }
}

fn challenges<C: ContentLookup + ?Sized>(
    content: &C,
    a: Sign,
    b: Sign,
    category: Category,
) -> Vec<String> {
    match content.pair_challenges(a, b) {
        Some(list) if !list.is_empty() => list,
        _ => generic_window(content, a, b, category, TemplateKind::Challenge, CHALLENGE_COUNT),
    }
}

/// Stable contiguous slice of a category's generic templates.
///
/// Start index is `pair_seed mod max(1, len - count + 1)`, so the same
/// sign pair always sees the same window.
fn generic_window<C: ContentLookup + ?Sized>(
    content: &C,
    a: Sign,
    b: Sign,
    category: Category,
    kind: TemplateKind,
    count: usize,
) -> Vec<String> {
    let mut templates = content.generic_templates(category, kind);
    if templates.is_empty() {
        debug!(%category, ?kind, "no generic templates, using platonic_soulmate");
        templates = content.generic_templates(Category::PlatonicSoulmate, kind);
    }

    let count = count.min(templates.len());
    let span = (templates.len() - count + 1) as u128;
    let start = (pair_seed(a.name(), b.name()) % span) as usize;
    templates[start..start + count].to_vec()
}
