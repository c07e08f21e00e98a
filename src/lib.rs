//! cosmic_circle - Deterministic astrology compatibility engine
//!
//! Synthesizes natal charts from birthdates, scores pairs of charts,
//! writes relationship stories and rotates a daily forecast. Every output
//! is a pure function of its inputs: the same birthdates, date and content
//! pack always produce the same result.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **core**: The pipeline (seed → chart → compatibility → narrative / forecast)
//! - **content**: Interpretive text behind the [`content::ContentLookup`] trait
//! - **config**: Optional JSON settings for the CLI
//! - **bin/cosmic.rs**: Thin wrapper that calls the library
//!
//! # Example
//!
//! ```
//! use cosmic_circle::{score_compatibility, synthesize_chart_from_str, ContentPack, Depth};
//!
//! let pack = ContentPack::builtin();
//! let me = synthesize_chart_from_str(pack, "1986-05-23", None, None).unwrap();
//! let them = synthesize_chart_from_str(pack, "1995-08-15", None, None).unwrap();
//! let result = score_compatibility(pack, &me, &them, Depth::SunOnly);
//! assert!((25..=98).contains(&result.overall_score));
//! ```

pub mod config;
pub mod content;
pub mod core;

pub use crate::config::Config;
pub use crate::content::{ContentLookup, ContentPack};
pub use crate::core::{
    daily_forecast, generate_story, score_compatibility, synthesize_chart,
    synthesize_chart_from_str, Category, Chart, CompatibilityResult, ContactProfile,
    CosmicError, DailyForecast, Depth, Result, Sign, Story,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the version of the cosmic_circle library
pub fn version() -> &'static str {
    VERSION
}
