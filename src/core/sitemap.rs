use crate::domain::model::{ChangeFrequency, ContentDocument, QueryOptions, SitemapEntry};
use crate::domain::ports::ContentSource;
use crate::utils::error::Result;
use chrono::SecondsFormat;

pub const SITEMAP_PAGE_SIZE: u32 = 100;

pub fn change_frequency(content_type: &str) -> ChangeFrequency {
    match content_type {
        "page" | "pricing_page" => ChangeFrequency::Weekly,
        _ => ChangeFrequency::Monthly,
    }
}

/// Rules are checked top to bottom; the first match wins.
pub fn priority(path: &str, content_type: &str) -> f32 {
    let path = path.trim_matches('/');
    if path.is_empty() || path == "home" {
        1.0
    } else if path.contains("product") || path.contains("pricing") {
        0.9
    } else if path.contains("solutions") || path.contains("resources") {
        0.8
    } else if content_type == "resource_article" || content_type == "case_study" {
        0.7
    } else {
        0.6
    }
}

pub fn entry_for(document: &ContentDocument) -> SitemapEntry {
    SitemapEntry {
        path: document.path().to_string(),
        last_modified: document.last_modified(),
        change_frequency: change_frequency(document.content_type()),
        priority: priority(document.path(), document.content_type()),
    }
}

async fn collect_entries<S>(source: &S, max_pages: usize) -> Result<Vec<SitemapEntry>>
where
    S: ContentSource + ?Sized,
{
    let max_pages = max_pages.max(1);
    let mut entries = Vec::new();
    let mut page_number: u32 = 1;

    loop {
        let query = QueryOptions::new()
            .preview(false)
            .per_page(SITEMAP_PAGE_SIZE)
            .page(page_number)
            .excluding_field("body");
        let page = source.fetch_documents(&query).await?;
        entries.extend(page.items.iter().map(entry_for));

        if !page.has_more() {
            break;
        }
        if page_number as usize >= max_pages {
            tracing::warn!(
                "Sitemap truncated at {} pages ({} of {} stories)",
                max_pages,
                entries.len(),
                page.total
            );
            break;
        }
        page_number += 1;
    }

    Ok(entries)
}

/// Collects every published story into sitemap entries. Any fetch error
/// yields an empty list.
pub async fn generate_sitemap_entries<S>(source: &S, max_pages: usize) -> Vec<SitemapEntry>
where
    S: ContentSource + ?Sized,
{
    match collect_entries(source, max_pages).await {
        Ok(entries) => {
            tracing::info!("Generated {} sitemap entries", entries.len());
            entries
        }
        Err(e) => {
            tracing::warn!("Error generating sitemap: {}", e);
            Vec::new()
        }
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn location(site_url: &str, path: &str) -> String {
    let base = site_url.trim_end_matches('/');
    match path.trim_matches('/') {
        "" | "home" => format!("{}/", base),
        path => format!("{}/{}", base, path),
    }
}

pub fn render_sitemap_xml(site_url: &str, entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&location(site_url, &entry.path))
        ));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.change_frequency));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{StoryContent, StoryPage};
    use crate::utils::error::ContentError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn doc(id: u64, full_slug: &str, component: &str) -> ContentDocument {
        ContentDocument {
            id,
            uuid: None,
            name: full_slug.to_string(),
            slug: full_slug.to_string(),
            full_slug: full_slug.to_string(),
            content: StoryContent {
                uid: format!("root-{}", id),
                component: component.to_string(),
                fields: serde_json::Map::new(),
            },
            published_at: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        }
    }

    #[derive(Clone)]
    struct MockSource {
        total: u64,
        fail: bool,
        queries: Arc<Mutex<Vec<QueryOptions>>>,
    }

    impl MockSource {
        fn new(total: u64) -> Self {
            Self {
                total,
                fail: false,
                queries: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(0)
            }
        }
    }

    #[async_trait]
    impl ContentSource for MockSource {
        async fn fetch_document(&self, slug: &str, _preview: bool) -> Result<ContentDocument> {
            Ok(doc(1, slug, "page"))
        }

        async fn fetch_documents(&self, query: &QueryOptions) -> Result<StoryPage> {
            self.queries.lock().await.push(query.clone());
            if self.fail {
                return Err(ContentError::RemoteRejection {
                    status: 500,
                    status_text: "Internal Server Error".to_string(),
                });
            }

            let per_page = u64::from(query.effective_per_page());
            let start = u64::from(query.effective_page() - 1) * per_page;
            let end = (start + per_page).min(self.total);
            let items = (start..end)
                .map(|i| doc(i, &format!("about/page-{}", i), "page"))
                .collect();

            Ok(StoryPage {
                items,
                total: self.total,
                per_page: query.effective_per_page(),
                page: query.effective_page(),
            })
        }
    }

    #[test]
    fn test_priority_rules() {
        assert_eq!(priority("", "page"), 1.0);
        assert_eq!(priority("home", "page"), 1.0);
        assert_eq!(priority("/product/x", "page"), 0.9);
        assert_eq!(priority("pricing", "pricing_page"), 0.9);
        assert_eq!(priority("/resources/y", "page"), 0.8);
        assert_eq!(priority("company/about", "case_study"), 0.7);
        assert_eq!(priority("company/about", "page"), 0.6);
    }

    #[test]
    fn test_path_rule_precedes_type_rule() {
        assert_eq!(priority("/solutions/government-procurement", "page"), 0.8);
        assert_eq!(priority("resources/agency-story", "case_study"), 0.8);
    }

    #[test]
    fn test_change_frequency() {
        assert_eq!(change_frequency("page"), ChangeFrequency::Weekly);
        assert_eq!(change_frequency("pricing_page"), ChangeFrequency::Weekly);
        assert_eq!(change_frequency("resource_article"), ChangeFrequency::Monthly);
        assert_eq!(change_frequency("case_study"), ChangeFrequency::Monthly);
        assert_eq!(change_frequency("unknown_type"), ChangeFrequency::Monthly);
    }

    #[tokio::test]
    async fn test_failure_yields_empty_list() {
        let source = MockSource::failing();

        let entries = generate_sitemap_entries(&source, 10).await;

        assert!(entries.is_empty());
        assert_eq!(source.queries.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sitemap_requests_published_without_body() {
        let source = MockSource::new(3);

        let entries = generate_sitemap_entries(&source, 10).await;

        assert_eq!(entries.len(), 3);
        let queries = source.queries.lock().await;
        assert_eq!(queries.len(), 1);
        assert!(!queries[0].preview);
        assert_eq!(queries[0].per_page, Some(SITEMAP_PAGE_SIZE));
        assert_eq!(queries[0].excluding_fields, vec!["body".to_string()]);
    }

    #[tokio::test]
    async fn test_sitemap_walks_all_pages() {
        let source = MockSource::new(250);

        let entries = generate_sitemap_entries(&source, 10).await;

        assert_eq!(entries.len(), 250);
        assert_eq!(source.queries.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn test_sitemap_respects_page_cap() {
        let source = MockSource::new(450);

        let entries = generate_sitemap_entries(&source, 2).await;

        assert_eq!(entries.len(), 200);
        assert_eq!(source.queries.lock().await.len(), 2);
    }

    #[test]
    fn test_render_sitemap_xml() {
        let entries = vec![
            entry_for(&doc(1, "home", "page")),
            entry_for(&doc(2, "resources/q&a", "resource_article")),
        ];

        let xml = render_sitemap_xml("https://example.com.au/", &entries);

        assert!(xml.contains("<loc>https://example.com.au/</loc>"));
        assert!(xml.contains("<loc>https://example.com.au/resources/q&amp;a</loc>"));
        assert!(xml.contains("<lastmod>2024-06-01T08:00:00Z</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert!(xml.ends_with("</urlset>\n"));
    }
}
