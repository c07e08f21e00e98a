//! cosmic CLI - Charts, compatibility and forecasts from the command line
//!
//! Thin wrapper over the `cosmic_circle` library. Every command prints
//! pretty JSON on stdout; logs go to stderr.
//!
//! # Logging
//!
//! `COSMIC_LOG` takes a tracing filter (`COSMIC_LOG=cosmic_circle=debug`).
//! Without it only warnings are shown.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cosmic_circle::core::{
    daily_forecast_with_limit, generate_story, parse_birthdate, score_compatibility,
    synthesize_chart, ContactProfile, CosmicError, Depth, RelationshipTag, Sign,
};
use cosmic_circle::{Config, ContentPack};

const LOG_ENV: &str = "COSMIC_LOG";
const DEFAULT_LOG_FILTER: &str = "cosmic_circle=warn,cosmic=warn";

/// 🌌 Cosmic Circle: deterministic charts, compatibility and daily forecasts
#[derive(Parser, Debug)]
#[command(name = "cosmic")]
#[command(version = cosmic_circle::VERSION)]
#[command(about = "🌌 Cosmic Circle: deterministic charts, compatibility and daily forecasts")]
#[command(after_help = "EXAMPLES:
  # Synthesize a chart
  cosmic chart 1986-05-23

  # Score two people, moon included
  cosmic match 1986-05-23 1995-08-15 --depth sun-moon-rising

  # Their story
  cosmic story 1986-05-23 1995-08-15 --name Kai

  # A forecast with two contacts
  cosmic forecast 1986-05-23 --date 2026-10-16 \\
      --contact c1:Luna:1996-07-08:partner --contact c2:Marcus:1994-12-03

  # Start a custom content pack from the built-in one
  cosmic content export > pack.json
")]
struct Cli {
    /// Config file path (default: .cosmic_config.json, then the user config dir)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Content pack JSON replacing the built-in text
    #[arg(long = "content", value_name = "FILE", global = true)]
    content: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize the chart for a birthdate
    Chart {
        /// Birthdate (YYYY-MM-DD)
        birthdate: String,

        /// Birth time, recorded on the chart only
        #[arg(long = "time", value_name = "HH:MM")]
        time: Option<String>,

        /// Birth location, recorded on the chart only
        #[arg(long = "location", value_name = "PLACE")]
        location: Option<String>,
    },

    /// Score the compatibility of two birthdates
    Match {
        /// Your birthdate (YYYY-MM-DD)
        user: String,

        /// Their birthdate (YYYY-MM-DD)
        contact: String,

        /// Scoring depth (default from config, else sun-only)
        #[arg(long = "depth", value_enum)]
        depth: Option<DepthArg>,
    },

    /// Write the relationship story for two birthdates
    Story {
        /// Your birthdate (YYYY-MM-DD)
        user: String,

        /// Their birthdate (YYYY-MM-DD)
        contact: String,

        /// Their name, used in the story text
        #[arg(long = "name", value_name = "NAME")]
        name: String,

        /// Scoring depth (default from config, else sun-only)
        #[arg(long = "depth", value_enum)]
        depth: Option<DepthArg>,
    },

    /// Daily insight, cosmic weather and contact spotlights
    Forecast {
        /// Your birthdate (YYYY-MM-DD)
        birthdate: String,

        /// Forecast date (default: today)
        #[arg(long = "date", value_name = "YYYY-MM-DD")]
        date: Option<String>,

        /// A contact, repeatable
        #[arg(long = "contact", value_name = "ID:NAME:BIRTHDATE[:TAG]")]
        contacts: Vec<String>,

        /// Maximum spotlights (default from config, else 3)
        #[arg(long = "limit", value_name = "N")]
        limit: Option<usize>,
    },

    /// Inspect the active content pack
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
}

#[derive(Subcommand, Debug)]
enum ContentAction {
    /// Print the active content pack as JSON
    Export,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DepthArg {
    #[value(alias = "sun_only")]
    SunOnly,
    #[value(alias = "sun_moon_rising")]
    SunMoonRising,
    #[value(alias = "full_chart")]
    FullChart,
}

impl From<DepthArg> for Depth {
    fn from(arg: DepthArg) -> Self {
        match arg {
            DepthArg::SunOnly => Depth::SunOnly,
            DepthArg::SunMoonRising => Depth::SunMoonRising,
            DepthArg::FullChart => Depth::FullChart,
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(),
    };
    let content = load_content(&cli, &config)?;
    debug!(version = %content.version, "content ready");

    match cli.command {
        Command::Chart {
            birthdate,
            time,
            location,
        } => {
            let date = parse_birthdate(&birthdate)?;
            let chart = synthesize_chart(&content, date, time.as_deref(), location.as_deref());
            print_json(&chart)
        }
        Command::Match {
            user,
            contact,
            depth,
        } => {
            let depth = depth.map(Depth::from).unwrap_or(config.depth);
            let user = synthesize_chart(&content, parse_birthdate(&user)?, None, None);
            let contact = synthesize_chart(&content, parse_birthdate(&contact)?, None, None);
            let result = score_compatibility(&content, &user, &contact, depth);
            info!(score = result.overall_score, category = %result.category, "scored");
            print_json(&result)
        }
        Command::Story {
            user,
            contact,
            name,
            depth,
        } => {
            let depth = depth.map(Depth::from).unwrap_or(config.depth);
            let user = synthesize_chart(&content, parse_birthdate(&user)?, None, None);
            let contact = synthesize_chart(&content, parse_birthdate(&contact)?, None, None);
            let result = score_compatibility(&content, &user, &contact, depth);
            let story = generate_story(&content, &user, &contact, &result, &name);
            print_json(&story)
        }
        Command::Forecast {
            birthdate,
            date,
            contacts,
            limit,
        } => {
            let sun_sign = Sign::from_date(parse_birthdate(&birthdate)?);
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => chrono::Local::now().date_naive(),
            };
            let contacts = contacts
                .iter()
                .map(String::as_str)
                .map(parse_contact)
                .collect::<Result<Vec<_>>>()?;
            let limit = limit.unwrap_or(config.spotlight_limit);

            let forecast = daily_forecast_with_limit(
                &content,
                date,
                sun_sign,
                sun_sign.element(),
                &contacts,
                limit,
            );
            print_json(&forecast)
        }
        Command::Content {
            action: ContentAction::Export,
        } => {
            println!("{}", content.to_json()?);
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--content` wins over the config's `content_pack`.
fn load_content(cli: &Cli, config: &Config) -> Result<ContentPack> {
    match &cli.content {
        Some(path) => ContentPack::from_file(path)
            .with_context(|| format!("loading content pack {}", path.display())),
        None => Ok(config.content()?),
    }
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CosmicError::InvalidDate {
            input: input.to_string(),
        }
        .into()
    })
}

/// `ID:NAME:BIRTHDATE[:TAG]`
fn parse_contact(arg: &str) -> Result<ContactProfile> {
    let parts: Vec<&str> = arg.split(':').collect();
    if !(3..=4).contains(&parts.len()) {
        bail!("invalid contact '{}': expected ID:NAME:BIRTHDATE[:TAG]", arg);
    }
    if parts[0].is_empty() || parts[1].is_empty() {
        bail!("invalid contact '{}': id and name must not be empty", arg);
    }

    let birthdate = parse_birthdate(parts[2])?;
    let tag = match parts.get(3) {
        Some(tag) => tag.parse::<RelationshipTag>()?,
        None => RelationshipTag::default(),
    };

    Ok(ContactProfile::new(parts[0], parts[1], birthdate).with_tag(tag))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
