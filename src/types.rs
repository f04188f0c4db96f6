//! Content records mirrored from the CMS.
//!
//! These types are deserialized from the CMS `data` envelope in the fetch
//! stage and serialized again into the site snapshot consumed by the
//! generate stage, so every type round-trips through JSON.
//!
//! The CMS schema evolves underneath us: every field except `id` is
//! defaulted, `null` is accepted wherever a value is optional, and unknown
//! fields are ignored.

use crate::image::ImageDescriptor;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit JSON `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The identifier used in generated URLs for a record.
///
/// Hyphenated slugs are used as-is; anything else (no slug, or a slug
/// without a hyphen) routes by `documentId`. This mirrors the detail
/// lookup rule in [`crate::loader::LookupKey::from_param`], so every link
/// we generate resolves back to the same record.
pub fn route_key<'a>(slug: &'a str, document_id: &'a str) -> &'a str {
    if slug.contains('-') { slug } else { document_id }
}

// ============================================================================
// Rich content
// ============================================================================

/// Body content of an article, project or page.
///
/// The CMS stores body text either as a plain string (paragraphs separated
/// by blank lines) or as a rich-text block list. The shape is decided once
/// here, at the deserialization boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Content {
    PlainText(String),
    Blocks(Vec<Block>),
    #[default]
    Missing,
}

impl From<Value> for Content {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Content::PlainText(text),
            Value::Array(items) => Content::Blocks(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            ),
            _ => Content::Missing,
        }
    }
}

impl From<Content> for Value {
    fn from(content: Content) -> Self {
        match content {
            Content::PlainText(text) => Value::String(text),
            Content::Blocks(blocks) => {
                serde_json::to_value(blocks).unwrap_or(Value::Array(Vec::new()))
            }
            Content::Missing => Value::Null,
        }
    }
}

/// One rich-text block (`paragraph`, `heading`, `list`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TextRun>>,
}

/// An inline run inside a block. Non-text runs (links, nested nodes) carry
/// no `text` and contribute nothing when concatenated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub read_time: Option<u32>,
    /// ISO timestamp as sent by the CMS; parsed only for display.
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default, alias = "coverImage")]
    pub image: Option<ImageDescriptor>,
}

impl Article {
    pub fn route_key(&self) -> &str {
        route_key(&self.slug, &self.document_id)
    }
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Planning,
    Active,
    Completed,
    /// Any status string the CMS adds later.
    #[serde(other)]
    Unknown,
}

impl ProjectStatus {
    /// Concrete statuses, in the order the listing shows them.
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::Planning,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Unknown => "unknown",
        }
    }

    /// Parse a concrete status name. `Unknown` is never produced.
    pub fn parse(name: &str) -> Option<ProjectStatus> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub project_status: Option<ProjectStatus>,
    /// Percentage shown as-is; the CMS does not guarantee 0..=100.
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub target_amount: Option<f64>,
    #[serde(default)]
    pub collected_amount: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub beneficiaries: Option<u64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub cover_image: Option<ImageDescriptor>,
}

impl Project {
    pub fn route_key(&self) -> &str {
        route_key(&self.slug, &self.document_id)
    }

    /// Collected / target as a percentage, clamped to 100.
    ///
    /// `None` when there is no (non-zero) target to measure against.
    pub fn funding_percent(&self) -> Option<f64> {
        let target = self.target_amount.filter(|t| *t != 0.0)?;
        let collected = self.collected_amount.unwrap_or(0.0);
        Some((collected / target * 100.0).min(100.0))
    }
}

/// A generic CMS page (e.g. "about").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}
