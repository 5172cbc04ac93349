use crate::domain::model::{QueryOptions, Region, MAX_PER_PAGE};
use crate::domain::ports::{ConfigProvider, DEFAULT_SITEMAP_MAX_PAGES, MAX_TIMEOUT_SECONDS};
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use clap::{Parser, Subcommand};

const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Parser)]
#[command(name = "site-content")]
#[command(about = "Fetch marketing site content from the headless CMS")]
pub struct CliConfig {
    #[arg(long, env = "STORYBLOK_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    #[arg(long, env = "STORYBLOK_REGION", default_value = "eu")]
    pub region: Region,

    #[arg(long, env = "STORYBLOK_BASE_URL", help = "Override the region's API root")]
    pub base_url: Option<String>,

    #[arg(long, env = "SITE_URL")]
    pub site_url: Option<String>,

    #[arg(long, env = "NEXT_PUBLIC_SITE_URL", hide = true)]
    pub public_site_url: Option<String>,

    #[arg(long, env = "STORYBLOK_PREVIEW_TOKEN", hide_env_values = true)]
    pub preview_secret: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_SITEMAP_MAX_PAGES)]
    pub sitemap_max_pages: usize,

    #[arg(short, long, help = "Read settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch a single story by slug
    Story {
        slug: String,
        #[arg(long)]
        preview: bool,
    },
    /// List stories
    Stories {
        #[arg(long)]
        starts_with: Option<String>,
        #[arg(long, value_delimiter = ',')]
        content_type: Vec<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(long)]
        preview: bool,
    },
    /// Fetch a singleton configuration story such as navigation
    Global {
        slug: String,
        #[arg(long)]
        preview: bool,
    },
    /// Print sitemap.xml for every published story
    Sitemap {
        #[arg(long, help = "Print entries as JSON instead of XML")]
        json: bool,
    },
    /// Print robots.txt
    Robots,
}

impl Command {
    pub fn needs_content_service(&self) -> bool {
        !matches!(self, Command::Robots)
    }

    /// Listing options for `stories`; `None` for every other command.
    pub fn query_options(&self) -> Option<QueryOptions> {
        match self {
            Command::Stories {
                starts_with,
                content_type,
                page,
                per_page,
                sort_by,
                preview,
            } => Some(QueryOptions {
                starts_with: starts_with.clone(),
                content_types: content_type.clone(),
                page: *page,
                per_page: *per_page,
                sort_by: sort_by.clone(),
                preview: *preview,
                excluding_fields: Vec::new(),
            }),
            _ => None,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn access_token(&self) -> &str {
        &self.token
    }

    fn region(&self) -> Region {
        self.region
    }

    fn base_url_override(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|url| !url.is_empty())
    }

    fn site_url(&self) -> &str {
        [self.site_url.as_deref(), self.public_site_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_SITE_URL)
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

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.command.needs_content_service() && self.token.trim().is_empty() {
            return Err(ContentError::MissingConfigError {
                field: "token".to_string(),
            });
        }
        if let Some(base_url) = self.base_url_override() {
            validate_url("base_url", base_url)?;
        }
        validate_url("site_url", self.site_url())?;
        validate_positive_number("sitemap_max_pages", self.sitemap_max_pages, 1)?;
        if let Some(seconds) = self.timeout_seconds {
            validate_range("timeout_seconds", seconds, 1, MAX_TIMEOUT_SECONDS)?;
        }
        if let Some(per_page) = self.command.query_options().and_then(|q| q.per_page) {
            validate_range("per_page", per_page, 1, MAX_PER_PAGE)?;
        }
        Ok(())
    }
}
