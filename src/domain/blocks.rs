use crate::utils::error::{ContentError, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Component tags this crate knows how to ingest.
pub const KNOWN_COMPONENTS: &[&str] = &[
    "hero",
    "feature_grid",
    "stats",
    "testimonial",
    "logo_cloud",
    "cta",
    "faq",
    "steps",
    "callout",
    "section",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub linktype: String,
    #[serde(default)]
    pub cached_url: String,
}

impl Link {
    pub fn href(&self) -> Option<&str> {
        [self.url.as_str(), self.cached_url.as_str()]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub filename: String,
}

/// Icons an editor may reference by name from feature and step blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Award,
    BarChart,
    Brain,
    Briefcase,
    Building,
    CheckCircle,
    Clock,
    Database,
    Eye,
    FileText,
    Github,
    Globe,
    Handshake,
    Layers,
    Linkedin,
    Lock,
    Mail,
    Search,
    Settings,
    Shield,
    ShieldCheck,
    Sparkles,
    Star,
    Target,
    TrendingUp,
    Twitter,
    UserCheck,
    Users,
    Workflow,
    Zap,
}

impl Icon {
    pub const ALL: [Icon; 30] = [
        Icon::Award,
        Icon::BarChart,
        Icon::Brain,
        Icon::Briefcase,
        Icon::Building,
        Icon::CheckCircle,
        Icon::Clock,
        Icon::Database,
        Icon::Eye,
        Icon::FileText,
        Icon::Github,
        Icon::Globe,
        Icon::Handshake,
        Icon::Layers,
        Icon::Linkedin,
        Icon::Lock,
        Icon::Mail,
        Icon::Search,
        Icon::Settings,
        Icon::Shield,
        Icon::ShieldCheck,
        Icon::Sparkles,
        Icon::Star,
        Icon::Target,
        Icon::TrendingUp,
        Icon::Twitter,
        Icon::UserCheck,
        Icon::Users,
        Icon::Workflow,
        Icon::Zap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Award => "Award",
            Icon::BarChart => "BarChart",
            Icon::Brain => "Brain",
            Icon::Briefcase => "Briefcase",
            Icon::Building => "Building",
            Icon::CheckCircle => "CheckCircle",
            Icon::Clock => "Clock",
            Icon::Database => "Database",
            Icon::Eye => "Eye",
            Icon::FileText => "FileText",
            Icon::Github => "Github",
            Icon::Globe => "Globe",
            Icon::Handshake => "Handshake",
            Icon::Layers => "Layers",
            Icon::Linkedin => "Linkedin",
            Icon::Lock => "Lock",
            Icon::Mail => "Mail",
            Icon::Search => "Search",
            Icon::Settings => "Settings",
            Icon::Shield => "Shield",
            Icon::ShieldCheck => "ShieldCheck",
            Icon::Sparkles => "Sparkles",
            Icon::Star => "Star",
            Icon::Target => "Target",
            Icon::TrendingUp => "TrendingUp",
            Icon::Twitter => "Twitter",
            Icon::UserCheck => "UserCheck",
            Icon::Users => "Users",
            Icon::Workflow => "Workflow",
            Icon::Zap => "Zap",
        }
    }
}

impl FromStr for Icon {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Icon::ALL
            .iter()
            .copied()
            .find(|icon| icon.as_str() == s)
            .ok_or_else(|| format!("unknown icon '{}'", s))
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Icon {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// The CMS sends "" for an unset icon field.
fn optional_icon<'de, D>(deserializer: D) -> std::result::Result<Option<Icon>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(name) if !name.trim().is_empty() => {
            name.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroBackground {
    #[default]
    Default,
    Gradient,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    pub heading: String,
    #[serde(default)]
    pub subheading: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub primary_cta_text: Option<String>,
    #[serde(default)]
    pub primary_cta_link: Option<Link>,
    #[serde(default)]
    pub secondary_cta_text: Option<String>,
    #[serde(default)]
    pub secondary_cta_link: Option<Link>,
    #[serde(default)]
    pub image: Option<Asset>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub background_variant: HeroBackground,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureItem {
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(default, deserialize_with = "optional_icon")]
    pub icon: Option<Icon>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureGridBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<FeatureItem>,
    #[serde(default)]
    pub columns: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatItem {
    #[serde(rename = "_uid")]
    pub uid: String,
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub qualifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub stats: Vec<StatItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    pub quote: String,
    pub author_name: String,
    pub author_role: String,
    #[serde(default)]
    pub author_company: Option<String>,
    #[serde(default)]
    pub author_image: Option<Asset>,
    #[serde(default)]
    pub company_logo: Option<Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoItem {
    #[serde(rename = "_uid")]
    pub uid: String,
    pub name: String,
    pub logo: Asset,
    #[serde(default)]
    pub url: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoCloudBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub logos: Vec<LogoItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    pub headline: String,
    #[serde(default)]
    pub description: Option<String>,
    pub button_text: String,
    pub button_link: Link,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    #[serde(rename = "_uid")]
    pub uid: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub faqs: Vec<FaqItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepItem {
    #[serde(rename = "_uid")]
    pub uid: String,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "optional_icon")]
    pub icon: Option<Icon>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepsBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    Info,
    Warning,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(rename = "type")]
    pub kind: CalloutKind,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBlock {
    #[serde(rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Rich text document, passed through untouched.
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

/// A typed block from a story body, discriminated by its `component` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum ContentBlock {
    Hero(HeroBlock),
    FeatureGrid(FeatureGridBlock),
    Stats(StatsBlock),
    Testimonial(TestimonialBlock),
    LogoCloud(LogoCloudBlock),
    Cta(CtaBlock),
    Faq(FaqBlock),
    Steps(StepsBlock),
    Callout(CalloutBlock),
    Section(SectionBlock),
}

impl ContentBlock {
    /// Validates and converts one raw block. Unknown tags and malformed fields
    /// are reported against the block's uid so editors can find them.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let uid = value
            .get("_uid")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        let component = value
            .get("component")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ContentError::InvalidBlock {
                component: "<none>".to_string(),
                uid: uid.clone(),
                message: "block has no component tag".to_string(),
            })?;

        if !KNOWN_COMPONENTS.contains(&component) {
            return Err(ContentError::UnknownComponent {
                component: component.to_string(),
                uid,
            });
        }

        if uid.trim().is_empty() {
            return Err(ContentError::InvalidBlock {
                component: component.to_string(),
                uid,
                message: "block has no _uid".to_string(),
            });
        }

        ContentBlock::deserialize(value).map_err(|e| ContentError::InvalidBlock {
            component: component.to_string(),
            uid,
            message: e.to_string(),
        })
    }

    pub fn uid(&self) -> &str {
        match self {
            ContentBlock::Hero(b) => &b.uid,
            ContentBlock::FeatureGrid(b) => &b.uid,
            ContentBlock::Stats(b) => &b.uid,
            ContentBlock::Testimonial(b) => &b.uid,
            ContentBlock::LogoCloud(b) => &b.uid,
            ContentBlock::Cta(b) => &b.uid,
            ContentBlock::Faq(b) => &b.uid,
            ContentBlock::Steps(b) => &b.uid,
            ContentBlock::Callout(b) => &b.uid,
            ContentBlock::Section(b) => &b.uid,
        }
    }

    pub fn component(&self) -> &'static str {
        match self {
            ContentBlock::Hero(_) => "hero",
            ContentBlock::FeatureGrid(_) => "feature_grid",
            ContentBlock::Stats(_) => "stats",
            ContentBlock::Testimonial(_) => "testimonial",
            ContentBlock::LogoCloud(_) => "logo_cloud",
            ContentBlock::Cta(_) => "cta",
            ContentBlock::Faq(_) => "faq",
            ContentBlock::Steps(_) => "steps",
            ContentBlock::Callout(_) => "callout",
            ContentBlock::Section(_) => "section",
        }
    }
}
