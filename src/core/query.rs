pub use crate::domain::model::{QueryOptions, StoryVersion};
use chrono::{DateTime, Utc};

/// Cache-busting parameter attached to draft requests.
pub const NONCE_PARAM: &str = "cv";
pub const FILTER_BY_TYPE_PARAM: &str = "filter_query[component][in]";
pub const RESOLVE_LINKS: &str = "url";
pub const RESOLVE_RELATIONS: &[&str] = &["page.author", "resource_article.author"];

type Params = Vec<(String, String)>;

fn push(params: &mut Params, key: &str, value: impl Into<String>) {
    let value = value.into();
    if !value.trim().is_empty() {
        params.push((key.to_string(), value));
    }
}

/// Parameters shared by single-story and listing requests.
pub fn story_params_at(token: &str, preview: bool, now: DateTime<Utc>) -> Params {
    let mut params = Vec::new();
    push(&mut params, "token", token);
    push(&mut params, "version", StoryVersion::from_preview(preview).as_str());
    push(&mut params, "resolve_links", RESOLVE_LINKS);
    push(&mut params, "resolve_relations", RESOLVE_RELATIONS.join(","));
    if preview {
        push(&mut params, NONCE_PARAM, now.timestamp_millis().to_string());
    }
    params
}

pub fn story_params(token: &str, preview: bool) -> Params {
    story_params_at(token, preview, Utc::now())
}

pub fn build_params_at(query: &QueryOptions, token: &str, now: DateTime<Utc>) -> Params {
    let mut params = story_params_at(token, query.preview, now);

    if let Some(prefix) = &query.starts_with {
        push(&mut params, "starts_with", prefix.as_str());
    }

    let content_types: Vec<&str> = query
        .content_types
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if !content_types.is_empty() {
        push(&mut params, FILTER_BY_TYPE_PARAM, content_types.join(","));
    }

    push(&mut params, "per_page", query.effective_per_page().to_string());
    push(&mut params, "page", query.effective_page().to_string());
    push(&mut params, "sort_by", query.effective_sort_by());

    if !query.excluding_fields.is_empty() {
        push(&mut params, "excluding_fields", query.excluding_fields.join(","));
    }

    params
}

pub fn build_params(query: &QueryOptions, token: &str) -> Params {
    build_params_at(query, token, Utc::now())
}

pub fn to_query_string(params: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;

    fn lookup<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_preview_adds_nonce_that_changes_over_time() {
        let query = QueryOptions::new().preview(true);
        let first = build_params_at(&query, "tok", at(1_700_000_000_000));
        let second = build_params_at(&query, "tok", at(1_700_000_000_000) + Duration::seconds(1));

        let a = lookup(&first, NONCE_PARAM).unwrap();
        let b = lookup(&second, NONCE_PARAM).unwrap();
        assert_eq!(a, "1700000000000");
        assert_ne!(a, b);
        assert_eq!(lookup(&first, "version"), Some("draft"));
    }

    #[test]
    fn test_preview_nonce_uses_clock() {
        let query = QueryOptions::new().preview(true);
        let first = build_params(&query, "tok");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = build_params(&query, "tok");

        assert_ne!(lookup(&first, NONCE_PARAM), lookup(&second, NONCE_PARAM));
    }

    #[test]
    fn test_published_has_no_nonce() {
        let params = build_params(&QueryOptions::new(), "tok");

        assert!(lookup(&params, NONCE_PARAM).is_none());
        assert_eq!(lookup(&params, "version"), Some("published"));
    }

    #[test]
    fn test_type_filter_only_when_non_empty() {
        let none = build_params(&QueryOptions::new(), "tok");
        assert!(lookup(&none, FILTER_BY_TYPE_PARAM).is_none());

        let blank = build_params(&QueryOptions::new().content_type("  "), "tok");
        assert!(lookup(&blank, FILTER_BY_TYPE_PARAM).is_none());

        let some = build_params(
            &QueryOptions::new()
                .content_type("resource_article")
                .content_type("case_study"),
            "tok",
        );
        assert_eq!(
            lookup(&some, FILTER_BY_TYPE_PARAM),
            Some("resource_article,case_study")
        );
    }

    #[test]
    fn test_defaults_and_omitted_keys() {
        let params = build_params(&QueryOptions::new().starts_with(""), "");

        assert_eq!(lookup(&params, "per_page"), Some("25"));
        assert_eq!(lookup(&params, "page"), Some("1"));
        assert_eq!(lookup(&params, "sort_by"), Some("created_at:desc"));
        assert!(lookup(&params, "token").is_none());
        assert!(lookup(&params, "starts_with").is_none());
        assert!(lookup(&params, "excluding_fields").is_none());
        assert_eq!(
            lookup(&params, "resolve_relations"),
            Some("page.author,resource_article.author")
        );
    }

    #[test]
    fn test_standard_fields_survive_url_encoding() {
        let query = QueryOptions::new()
            .page(3)
            .per_page(40)
            .sort_by("content.date:asc")
            .starts_with("resources/")
            .content_type("resource_article");
        let encoded = to_query_string(&build_params(&query, "tok"));

        let decoded: HashMap<String, String> = url::form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect();

        assert_eq!(decoded["page"], "3");
        assert_eq!(decoded["per_page"], "40");
        assert_eq!(decoded["sort_by"], "content.date:asc");
        assert_eq!(decoded["starts_with"], "resources/");
        assert_eq!(decoded[FILTER_BY_TYPE_PARAM], "resource_article");
    }
}
