use crate::domain::blocks::ContentBlock;
use crate::utils::error::{ContentError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PER_PAGE: u32 = 25;
pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_SORT_BY: &str = "created_at:desc";

/// One story as delivered by the content service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub id: u64,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: String,
    pub slug: String,
    pub full_slug: String,
    pub content: StoryContent,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Root block of a story. Only the tag and uid are typed here; the rest stays
/// raw until [`ContentDocument::blocks`] is asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryContent {
    #[serde(rename = "_uid", default)]
    pub uid: String,
    pub component: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl ContentDocument {
    pub fn content_type(&self) -> &str {
        &self.content.component
    }

    pub fn path(&self) -> &str {
        &self.full_slug
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }

    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.content.fields.get(name)
    }

    /// Parses the `body` array into typed blocks. A story without a body has
    /// no blocks; the first unknown or malformed block aborts parsing.
    pub fn blocks(&self) -> Result<Vec<ContentBlock>> {
        match self.content.fields.get("body") {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(serde_json::Value::Array(items)) => {
                items.iter().map(ContentBlock::from_value).collect()
            }
            Some(_) => Err(ContentError::InvalidBlock {
                component: self.content.component.clone(),
                uid: self.content.uid.clone(),
                message: "body must be an array of blocks".to_string(),
            }),
        }
    }
}

/// One page of a story listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryPage {
    pub items: Vec<ContentDocument>,
    pub total: u64,
    pub per_page: u32,
    pub page: u32,
}

impl StoryPage {
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.page) * u64::from(self.per_page);
        self.per_page > 0
            && self.items.len() as u64 == u64::from(self.per_page)
            && seen < self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryVersion {
    Draft,
    Published,
}

impl StoryVersion {
    pub fn from_preview(preview: bool) -> Self {
        if preview {
            StoryVersion::Draft
        } else {
            StoryVersion::Published
        }
    }

    /// Query-string form of the preview toggle: only `"true"` and `"1"` select drafts.
    pub fn from_preview_flag(flag: &str) -> Self {
        Self::from_preview(matches!(flag, "true" | "1"))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryVersion::Draft => "draft",
            StoryVersion::Published => "published",
        }
    }
}

/// Parameters for a story listing request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryOptions {
    pub starts_with: Option<String>,
    pub content_types: Vec<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort_by: Option<String>,
    pub preview: bool,
    pub excluding_fields: Vec<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.starts_with = Some(prefix.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_types.push(content_type.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub fn excluding_field(mut self, field: impl Into<String>) -> Self {
        self.excluding_fields.push(field.into());
        self
    }

    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn effective_per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn effective_sort_by(&self) -> &str {
        match self.sort_by.as_deref() {
            Some(sort) if !sort.trim().is_empty() => sort,
            _ => DEFAULT_SORT_BY,
        }
    }

    pub fn version(&self) -> StoryVersion {
        StoryVersion::from_preview(self.preview)
    }
}

/// Hosting region of the content space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Eu,
    Us,
    Ap,
    Ca,
}

impl Region {
    pub fn base_url(&self) -> &'static str {
        match self {
            Region::Eu => "https://api.storyblok.com/v2/cdn",
            Region::Us => "https://api-us.storyblok.com/v2/cdn",
            Region::Ap => "https://api-ap.storyblok.com/v2/cdn",
            Region::Ca => "https://api-ca.storyblok.com/v2/cdn",
        }
    }
}

impl FromStr for Region {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "eu" => Ok(Region::Eu),
            "us" => Ok(Region::Us),
            // Australian spaces live in the ap region
            "ap" | "au" => Ok(Region::Ap),
            "ca" => Ok(Region::Ca),
            other => Err(ContentError::InvalidConfigValueError {
                field: "region".to_string(),
                value: other.to_string(),
                reason: "Supported regions: eu, us, ap, ca".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub path: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}
