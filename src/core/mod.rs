//! Core module for the cosmic_circle compatibility engine
//!
//! Pure, deterministic pipeline. No clock, no randomness, no I/O: every
//! function takes its date and its content explicitly.
//!
//! # Architecture
//!
//! - `error`: Error types using thiserror
//! - `seed`: md5-derived integers behind every "random" choice
//! - `zodiac`: Signs, elements, modalities, planets, aspects
//! - `chart`: Synthetic natal chart from a birthdate
//! - `compatibility`: Scores and reasons for a pair of charts
//! - `narrative`: Category story templates with placeholders filled
//! - `forecast`: Daily insight, weather and contact spotlights

pub mod error;
pub mod seed;
pub mod zodiac;
pub mod chart;
pub mod compatibility;
pub mod narrative;
pub mod forecast;

// Re-export commonly used types
pub use error::{CosmicError, Result, ResultExt};
pub use seed::{seed, pair_seed, chart_seed};
pub use zodiac::{Element, Modality, Sign, Planet, Aspect, element_compatibility};
pub use chart::{Chart, Placement, parse_birthdate, synthesize_chart, synthesize_chart_from_str};
pub use compatibility::{
    Depth, Category, SubScores, KeyAspect, CompatibilityResult, score_compatibility,
};
pub use narrative::{Story, Chapter, generate_story, fill_placeholders};
pub use forecast::{
    RelationshipTag, ContactProfile, Spotlight, DailyForecast,
    daily_forecast, daily_forecast_with_limit, daily_insight, day_of_year,
    DEFAULT_SPOTLIGHT_LIMIT,
};
