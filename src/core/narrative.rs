//! Story generation
//!
//! Turns a compatibility result into a titled, four-chapter story by
//! filling a category template's `{placeholder}` fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{ChapterTemplate, ContentLookup, StoryTemplate};
use crate::core::chart::Chart;
use crate::core::compatibility::{Category, CompatibilityResult};
use crate::core::zodiac::{Planet, Sign};

const DEFAULT_QUALITY: &str = "inner strength";
const DEFAULT_CHALLENGE: &str = "overthinking";
const DEFAULT_SHARED_QUALITY: &str = "resilience";

/// One chapter of a generated story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub body: String,
}

/// A generated relationship story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub chapters: Vec<Chapter>,
    pub contact_name: String,
    pub user_sign: Sign,
    pub contact_sign: Sign,
}

/// Last resort when a content set has no story templates at all.
fn minimal_template() -> StoryTemplate {
    StoryTemplate {
        title: "Written in the Stars".to_string(),
        chapters: vec![ChapterTemplate {
            title: "Two Paths Meet".to_string(),
            body: "When {user_sign} meets {contact_sign}, {user_element} meets {contact_element}. \
                   Your {user_quality} and {contact_name}'s {contact_quality} meet in \
                   {shared_quality}."
                .to_string(),
        }],
    }
}

/// Generate the story for a scored pair.
///
/// Sun signs come from `result`; the charts supply the moon placeholders.
pub fn generate_story<C: ContentLookup + ?Sized>(
    content: &C,
    user: &Chart,
    contact: &Chart,
    result: &CompatibilityResult,
    counterpart_name: &str,
) -> Story {
    let template = content
        .story_template(result.category)
        .or_else(|| {
            debug!(category = %result.category, "no story template, using platonic_soulmate");
            content.story_template(Category::PlatonicSoulmate)
        })
        .unwrap_or_else(minimal_template);

    let values = placeholder_values(content, user, contact, result, counterpart_name);

    let chapters = template
        .chapters
        .iter()
        .map(|chapter| Chapter {
            title: chapter.title.clone(),
            body: fill_placeholders(&chapter.body, &values),
        })
        .collect();

    Story {
        title: template.title,
        chapters,
        contact_name: counterpart_name.to_string(),
        user_sign: result.user_sun,
        contact_sign: result.contact_sun,
    }
}

fn placeholder_values<C: ContentLookup + ?Sized>(
    content: &C,
    user: &Chart,
    contact: &Chart,
    result: &CompatibilityResult,
    counterpart_name: &str,
) -> BTreeMap<&'static str, String> {
    let user_sun = result.user_sun;
    let contact_sun = result.contact_sun;
    let user_element = user_sun.element();

    let quality = |sign: Sign| {
        content
            .sign_quality(sign)
            .unwrap_or_else(|| DEFAULT_QUALITY.to_string())
    };
    let challenge = |sign: Sign| {
        content
            .sign_challenge(sign)
            .unwrap_or_else(|| DEFAULT_CHALLENGE.to_string())
    };

    let mut values = BTreeMap::new();
    values.insert("user_sign", user_sun.title());
    values.insert("contact_sign", contact_sun.title());
    values.insert("user_element", user_element.name().to_string());
    values.insert("contact_element", contact_sun.element().name().to_string());
    values.insert("user_quality", quality(user_sun));
    values.insert("contact_quality", quality(contact_sun));
    values.insert("user_challenge", challenge(user_sun));
    values.insert("contact_challenge", challenge(contact_sun));
    values.insert(
        "shared_quality",
        content
            .shared_quality(user_element)
            .unwrap_or_else(|| DEFAULT_SHARED_QUALITY.to_string()),
    );
    values.insert("contact_name", counterpart_name.to_string());
    values.insert("user_moon", user.sign_or_sun(Planet::Moon).title());
    values.insert("contact_moon", contact.sign_or_sun(Planet::Moon).title());
    values
}

/// Replace `{key}` with its value. Unknown keys and stray braces stay as written.
pub fn fill_placeholders(template: &str, values: &BTreeMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match values.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
