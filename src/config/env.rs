use crate::domain::model::Region;
use crate::domain::ports::{ConfigProvider, DEFAULT_SITEMAP_MAX_PAGES, MAX_TIMEOUT_SECONDS};
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{validate_range, validate_url, Validate};

const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Settings read from the process environment, for hosted deployments.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub access_token: String,
    pub region: Region,
    pub base_url: Option<String>,
    pub site_url: String,
    pub preview_secret: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub sitemap_max_pages: usize,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let access_token =
            get("STORYBLOK_ACCESS_TOKEN").ok_or_else(|| ContentError::MissingConfigError {
                field: "STORYBLOK_ACCESS_TOKEN".to_string(),
            })?;

        let region = match get("STORYBLOK_REGION") {
            Some(raw) => raw.parse()?,
            None => Region::default(),
        };

        let timeout_seconds = match get("STORYBLOK_TIMEOUT_SECONDS") {
            Some(raw) => Some(parse_number("STORYBLOK_TIMEOUT_SECONDS", &raw)?),
            None => None,
        };

        let sitemap_max_pages = match get("SITEMAP_MAX_PAGES") {
            Some(raw) => parse_number("SITEMAP_MAX_PAGES", &raw)?,
            None => DEFAULT_SITEMAP_MAX_PAGES,
        };

        Ok(Self {
            access_token,
            region,
            base_url: get("STORYBLOK_BASE_URL"),
            site_url: get("SITE_URL")
                .or_else(|| get("NEXT_PUBLIC_SITE_URL"))
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            preview_secret: get("STORYBLOK_PREVIEW_TOKEN"),
            timeout_seconds,
            sitemap_max_pages,
        })
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ContentError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "Expected a whole number".to_string(),
        })
}

impl ConfigProvider for EnvConfig {
    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn region(&self) -> Region {
        self.region
    }

    fn base_url_override(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn site_url(&self) -> &str {
        &self.site_url
    }

    fn preview_secret(&self) -> Option<&str> {
        self.preview_secret.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn sitemap_max_pages(&self) -> usize {
        self.sitemap_max_pages
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            validate_url("STORYBLOK_BASE_URL", base_url)?;
        }
        if let Some(seconds) = self.timeout_seconds {
            validate_range("STORYBLOK_TIMEOUT_SECONDS", seconds, 1, MAX_TIMEOUT_SECONDS)?;
        }
        validate_url("SITE_URL", &self.site_url)
    }
}
