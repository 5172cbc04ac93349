use crate::domain::model::Region;
use crate::domain::ports::{ConfigProvider, DEFAULT_SITEMAP_MAX_PAGES, MAX_TIMEOUT_SECONDS};
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub content: ContentServiceConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub sitemap: Option<SitemapConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentServiceConfig {
    pub access_token: String,
    #[serde(default, deserialize_with = "region_from_str")]
    pub region: Region,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub url: String,
    pub preview_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    pub max_pages: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
    pub verbose: Option<bool>,
}

fn region_from_str<'de, D>(deserializer: D) -> std::result::Result<Region, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ContentError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ContentError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STORYBLOK_ACCESS_TOKEN})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ContentError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("content.access_token", &self.content.access_token)?;
        if self.content.access_token.contains("${") {
            return Err(ContentError::InvalidConfigValueError {
                field: "content.access_token".to_string(),
                value: self.content.access_token.clone(),
                reason: "Environment variable is not set".to_string(),
            });
        }

        if let Some(base_url) = &self.content.base_url {
            validate_url("content.base_url", base_url)?;
        }

        validate_url("site.url", &self.site.url)?;

        if let Some(seconds) = self.content.timeout_seconds {
            validate_range("content.timeout_seconds", seconds, 1, MAX_TIMEOUT_SECONDS)?;
        }

        if let Some(max_pages) = self.sitemap.as_ref().and_then(|s| s.max_pages) {
            validate_positive_number("sitemap.max_pages", max_pages, 1)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn access_token(&self) -> &str {
        &self.content.access_token
    }

    fn region(&self) -> Region {
        self.content.region
    }

    fn base_url_override(&self) -> Option<&str> {
        self.content.base_url.as_deref().filter(|url| !url.is_empty())
    }

    fn site_url(&self) -> &str {
        &self.site.url
    }

    fn preview_secret(&self) -> Option<&str> {
        self.site
            .preview_secret
            .as_deref()
            .filter(|secret| !secret.is_empty() && !secret.contains("${"))
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.content.timeout_seconds
    }

    fn sitemap_max_pages(&self) -> usize {
        self.sitemap
            .as_ref()
            .and_then(|s| s.max_pages)
            .unwrap_or(DEFAULT_SITEMAP_MAX_PAGES)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
