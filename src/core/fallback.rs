use crate::domain::model::{ContentDocument, StoryContent};
use chrono::Utc;
use serde_json::json;

/// Minimal home page served when the content service cannot be reached.
pub fn home_document() -> ContentDocument {
    let now = Utc::now();
    let body = json!([
        {
            "_uid": "hero-fallback",
            "component": "hero",
            "heading": "Find, trust, and deploy specialist talent, fast",
            "subheading": "One place to run panels, suppliers, and contractors with real-time skills intelligence",
            "description": "Built for government and enterprise: security first, people-centred by design.",
            "primary_cta_text": "Request a Demo",
            "primary_cta_link": {"id": "demo", "url": "/demo", "linktype": "story", "cached_url": "/demo"},
            "secondary_cta_text": "Learn More",
            "secondary_cta_link": {"id": "product", "url": "/product", "linktype": "story", "cached_url": "/product"},
            "background_variant": "gradient"
        }
    ]);

    let mut fields = serde_json::Map::new();
    fields.insert("body".to_string(), body);

    ContentDocument {
        id: 0,
        uuid: Some("fallback".to_string()),
        name: "Home".to_string(),
        slug: "home".to_string(),
        full_slug: "home".to_string(),
        content: StoryContent {
            uid: "fallback".to_string(),
            component: "page".to_string(),
            fields,
        },
        published_at: Some(now),
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blocks::{ContentBlock, HeroBackground};

    #[test]
    fn test_fallback_home_is_a_valid_page() {
        let doc = home_document();
        let blocks = doc.blocks().unwrap();

        assert_eq!(doc.content_type(), "page");
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            ContentBlock::Hero(hero) => {
                assert_eq!(hero.background_variant, HeroBackground::Gradient);
                assert_eq!(
                    hero.primary_cta_link.as_ref().and_then(|l| l.href()),
                    Some("/demo")
                );
            }
            other => panic!("expected hero, got {:?}", other),
        }
    }
}
