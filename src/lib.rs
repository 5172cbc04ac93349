pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};
pub use config::{env::EnvConfig, toml_config::TomlConfig};

pub use crate::core::{
    fallback::home_document,
    forms::{FormHandler, FormResponse, LogSink, SubmissionSink},
    gateway::ContentGateway,
    preview::{PreviewGate, PreviewResponse},
    robots::robots_txt,
    sitemap::{generate_sitemap_entries, render_sitemap_xml},
};
pub use domain::blocks::{ContentBlock, Icon};
pub use domain::model::{ContentDocument, QueryOptions, SitemapEntry, StoryPage, StoryVersion};
pub use domain::ports::{ConfigProvider, ContentSource};
pub use utils::error::{ContentError, Result};
