use crate::core::query::{build_params, story_params, to_query_string};
use crate::core::sitemap;
use crate::domain::model::{ContentDocument, QueryOptions, SitemapEntry, StoryPage};
use crate::domain::ports::{ConfigProvider, ContentSource};
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Deserialize)]
struct StoryEnvelope {
    story: ContentDocument,
}

#[derive(Deserialize)]
struct StoriesEnvelope {
    #[serde(default)]
    stories: Vec<ContentDocument>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default, alias = "perPage")]
    per_page: Option<u32>,
    #[serde(default)]
    page: Option<u32>,
}

/// Read-only client for the headless content service.
///
/// Every call issues exactly one GET request. Nothing is cached and nothing
/// is retried; timeouts are whatever the underlying client enforces.
#[derive(Debug, Clone)]
pub struct ContentGateway {
    client: Client,
    base_url: String,
    token: String,
    sitemap_max_pages: usize,
}

impl ContentGateway {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = config.base_url();
        validate_url("base_url", &base_url)?;

        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            token: config.access_token().to_string(),
            sitemap_max_pages: config.sitemap_max_pages(),
        })
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            sitemap_max_pages: crate::domain::ports::DEFAULT_SITEMAP_MAX_PAGES,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends each segment percent-encoded, so `?`, `#` and `%` inside a
    /// slug stay part of the path.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let invalid = |reason: String| ContentError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(String, String)],
    ) -> Result<(T, HeaderMap)> {
        tracing::debug!("GET {}?{}", url, redact(&to_query_string(params)));

        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        tracing::debug!("Content service response status: {}", status);

        if !status.is_success() {
            return Err(ContentError::RemoteRejection {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            });
        }

        let headers = response.headers().clone();
        let body = response.text().await?;
        let parsed = serde_json::from_str(&body)?;
        Ok((parsed, headers))
    }

    pub async fn fetch_document(&self, slug: &str, preview: bool) -> Result<ContentDocument> {
        let slug = slug.trim().trim_matches('/');
        if slug.is_empty() {
            return Err(ContentError::ValidationError {
                message: "slug cannot be empty".to_string(),
            });
        }

        let url = self.endpoint(
            std::iter::once("stories").chain(slug.split('/').filter(|s| !s.is_empty())),
        )?;
        let params = story_params(&self.token, preview);
        let (envelope, _): (StoryEnvelope, _) =
            self.get_json(url, &params).await.map_err(|e| {
                tracing::error!("Error fetching story {}: {}", slug, e);
                e
            })?;

        Ok(envelope.story)
    }

    pub async fn fetch_documents(&self, query: &QueryOptions) -> Result<StoryPage> {
        let url = self.endpoint(["stories"])?;
        let params = build_params(query, &self.token);
        let (envelope, headers): (StoriesEnvelope, _) =
            self.get_json(url, &params).await.map_err(|e| {
                tracing::error!("Error fetching stories: {}", e);
                e
            })?;

        let total = envelope
            .total
            .or_else(|| header_number(&headers, "total"))
            .unwrap_or(envelope.stories.len() as u64);
        let per_page = envelope
            .per_page
            .or_else(|| header_number(&headers, "per-page").and_then(|n| u32::try_from(n).ok()))
            .unwrap_or_else(|| query.effective_per_page());
        let page = envelope.page.unwrap_or_else(|| query.effective_page());

        tracing::debug!(
            "Fetched {} stories (page {}, {} per page, {} total)",
            envelope.stories.len(),
            page,
            per_page,
            total
        );

        Ok(StoryPage {
            items: envelope.stories,
            total,
            per_page,
            page,
        })
    }

    /// Singleton configuration documents such as site-wide navigation.
    pub async fn fetch_global(&self, slug: &str, preview: bool) -> Result<ContentDocument> {
        self.fetch_document(slug, preview).await
    }

    /// Soft-fallback variant: any failure is logged and replaced by `fallback()`.
    pub async fn fetch_document_or<F>(
        &self,
        slug: &str,
        preview: bool,
        fallback: F,
    ) -> ContentDocument
    where
        F: FnOnce() -> ContentDocument,
    {
        match self.fetch_document(slug, preview).await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Serving fallback content for '{}': {}", slug, e);
                fallback()
            }
        }
    }

    pub async fn generate_sitemap_entries(&self) -> Vec<SitemapEntry> {
        sitemap::generate_sitemap_entries(self, self.sitemap_max_pages).await
    }
}

#[async_trait]
impl ContentSource for ContentGateway {
    async fn fetch_document(&self, slug: &str, preview: bool) -> Result<ContentDocument> {
        ContentGateway::fetch_document(self, slug, preview).await
    }

    async fn fetch_documents(&self, query: &QueryOptions) -> Result<StoryPage> {
        ContentGateway::fetch_documents(self, query).await
    }
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

fn redact(query: &str) -> String {
    query
        .split('&')
        .map(|pair| {
            if pair.starts_with("token=") {
                "token=***"
            } else {
                pair
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn story(id: u64, full_slug: &str, component: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": full_slug,
            "slug": full_slug.rsplit('/').next().unwrap_or(full_slug),
            "full_slug": full_slug,
            "created_at": "2024-05-01T09:30:00.000Z",
            "published_at": "2024-05-02T09:30:00.000Z",
            "content": {"_uid": format!("root-{}", id), "component": component, "body": []}
        })
    }

    fn gateway(server: &MockServer) -> ContentGateway {
        ContentGateway::with_client(Client::new(), server.base_url(), "test-token")
    }

    #[tokio::test]
    async fn test_fetch_document_published() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/stories/product/talent-pool")
                .query_param("token", "test-token")
                .query_param("version", "published")
                .query_param("resolve_links", "url");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"story": story(7, "product/talent-pool", "module_page")}));
        });

        let doc = gateway(&server)
            .fetch_document("/product/talent-pool", false)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(doc.id, 7);
        assert_eq!(doc.content_type(), "module_page");
    }

    #[tokio::test]
    async fn test_fetch_document_preview_sends_nonce() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/stories/home")
                .query_param("version", "draft")
                .query_param_exists("cv");
            then.status(200).json_body(json!({"story": story(1, "home", "page")}));
        });

        let doc = gateway(&server).fetch_document("home", true).await.unwrap();

        mock.assert();
        assert_eq!(doc.path(), "home");
    }

    #[tokio::test]
    async fn test_not_found_is_remote_rejection() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/stories/missing");
            then.status(404).json_body(json!({"error": "Not found"}));
        });

        let err = gateway(&server).fetch_document("missing", false).await.unwrap_err();

        mock.assert_hits(1);
        match err {
            ContentError::RemoteRejection { status, status_text } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("expected RemoteRejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_slug_is_rejected_without_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });

        let err = gateway(&server).fetch_document("  / ", false).await.unwrap_err();

        mock.assert_hits(0);
        assert!(matches!(err, ContentError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/stories/home");
            then.status(200).body("<html>maintenance</html>");
        });

        let err = gateway(&server).fetch_document("home", false).await.unwrap_err();
        assert!(matches!(err, ContentError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_failure() {
        let gateway = ContentGateway::with_client(Client::new(), "http://127.0.0.1:1", "tok");

        let err = gateway.fetch_document("home", false).await.unwrap_err();
        assert!(matches!(err, ContentError::Transport(_)));
    }

    #[tokio::test]
    async fn test_fetch_documents_with_filter_and_defaults() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/stories")
                .query_param("starts_with", "resources/")
                .query_param("filter_query[component][in]", "resource_article,case_study")
                .query_param("per_page", "25")
                .query_param("page", "1")
                .query_param("sort_by", "created_at:desc");
            then.status(200).json_body(json!({
                "stories": [
                    story(10, "resources/hiring-guide", "resource_article"),
                    story(11, "resources/agency-win", "case_study")
                ],
                "total": 2,
                "perPage": 25,
                "page": 1
            }));
        });

        let query = QueryOptions::new()
            .starts_with("resources/")
            .content_type("resource_article")
            .content_type("case_study");
        let page = gateway(&server).fetch_documents(&query).await.unwrap();

        mock.assert();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
        assert_eq!(page.per_page, 25);
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_fetch_documents_reads_pagination_headers() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/stories");
            then.status(200)
                .header("Total", "57")
                .header("Per-Page", "10")
                .json_body(json!({"stories": [story(1, "about", "page")]}));
        });

        let page = gateway(&server)
            .fetch_documents(&QueryOptions::new().per_page(10).page(6))
            .await
            .unwrap();

        assert_eq!(page.total, 57);
        assert_eq!(page.per_page, 10);
        assert_eq!(page.page, 6);
    }

    #[tokio::test]
    async fn test_fetch_document_or_uses_fallback() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/stories/home");
            then.status(503);
        });

        let doc = gateway(&server)
            .fetch_document_or("home", false, crate::core::fallback::home_document)
            .await;

        assert_eq!(doc.uuid.as_deref(), Some("fallback"));
        assert_eq!(doc.blocks().unwrap()[0].component(), "hero");
    }

    #[tokio::test]
    async fn test_slug_query_characters_stay_in_path() {
        let server = MockServer::start();
        let injected = server.mock(|when, then| {
            when.method(GET)
                .path("/stories/about")
                .query_param("version", "draft");
            then.status(200).json_body(json!({"story": story(2, "about", "page")}));
        });
        let published = server.mock(|when, then| {
            when.method(GET).query_param("version", "published");
            then.status(404);
        });

        let result = gateway(&server)
            .fetch_document("about?version=draft", false)
            .await;

        injected.assert_hits(0);
        published.assert_hits(1);
        assert!(matches!(result, Err(ContentError::RemoteRejection { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_slug_fragment_does_not_truncate_path() {
        let server = MockServer::start();
        let truncated = server.mock(|when, then| {
            when.method(GET).path("/stories/faq");
            then.status(200).json_body(json!({"story": story(3, "faq", "page")}));
        });
        let other = server.mock(|when, then| {
            when.method(GET);
            then.status(404);
        });

        let result = gateway(&server).fetch_document("faq#pricing", false).await;

        truncated.assert_hits(0);
        other.assert_hits(1);
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let gateway = ContentGateway::with_client(
            Client::new(),
            "https://api.storyblok.com/v2/cdn/",
            "tok",
        );

        let url = gateway.endpoint(["stories", "about?version=draft#x"]).unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.storyblok.com/v2/cdn/stories/about%3Fversion=draft%23x"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn test_redact_hides_token() {
        assert_eq!(redact("token=abc&version=draft"), "token=***&version=draft");
    }
}
