use crate::domain::model::{ContentDocument, QueryOptions, Region, StoryPage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub const MAX_TIMEOUT_SECONDS: u64 = 300;
pub const DEFAULT_SITEMAP_MAX_PAGES: usize = 50;

/// Settings shared by every content request, supplied once at startup.
pub trait ConfigProvider: Send + Sync {
    fn access_token(&self) -> &str;
    fn region(&self) -> Region;
    /// Explicit API root; overrides the region's default when set.
    fn base_url_override(&self) -> Option<&str>;
    fn site_url(&self) -> &str;
    fn preview_secret(&self) -> Option<&str>;

    fn timeout_seconds(&self) -> Option<u64> {
        None
    }

    fn sitemap_max_pages(&self) -> usize {
        DEFAULT_SITEMAP_MAX_PAGES
    }

    fn base_url(&self) -> String {
        self.base_url_override()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| self.region().base_url().to_string())
    }
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_document(&self, slug: &str, preview: bool) -> Result<ContentDocument>;
    async fn fetch_documents(&self, query: &QueryOptions) -> Result<StoryPage>;
}
