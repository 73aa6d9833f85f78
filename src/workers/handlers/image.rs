//! Image URL optimization.
//!
//! Rewrites CDN image URLs with `w`/`q` resize parameters so the UI can
//! request appropriately sized variants. Pure string work: nothing is
//! fetched.

use serde_json::Value;
use url::Url;

use super::{HandlerTable, encode, parse};
use crate::workers::types::{ImageOptimizationPayload, OptimizedImages};

pub(crate) const TABLE: HandlerTable = &[("OPTIMIZE_IMAGE_URLS", optimize_image_urls)];

fn optimize_image_urls(payload: Value) -> Result<Value, String> {
    let ImageOptimizationPayload {
        urls,
        width,
        quality,
    } = parse(payload)?;

    let urls = urls
        .into_iter()
        .map(|raw| rewrite(&raw, width, quality))
        .collect();

    encode(&OptimizedImages { urls })
}

/// Replace any existing `w`/`q` parameters with the requested ones,
/// keeping every other query parameter. URLs that do not parse pass
/// through unchanged.
fn rewrite(raw: &str, width: Option<u32>, quality: Option<u32>) -> String {
    if width.is_none() && quality.is_none() {
        return raw.to_string();
    }
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "w" && key != "q")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        if let Some(w) = width {
            pairs.append_pair("w", &w.to_string());
        }
        if let Some(q) = quality {
            pairs.append_pair("q", &q.to_string());
        }
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(payload: Value) -> Vec<String> {
        let result: OptimizedImages =
            serde_json::from_value(optimize_image_urls(payload).unwrap()).unwrap();
        result.urls
    }

    #[test]
    fn appends_resize_parameters() {
        let urls = run(json!({
            "urls": ["https://cdn.example.com/avatars/u1.png"],
            "width": 128,
            "quality": 80,
        }));
        assert_eq!(urls, vec!["https://cdn.example.com/avatars/u1.png?w=128&q=80"]);
    }

    #[test]
    fn replaces_existing_resize_parameters() {
        let urls = run(json!({
            "urls": ["https://cdn.example.com/a.png?w=512&token=abc"],
            "width": 64,
        }));
        assert_eq!(urls, vec!["https://cdn.example.com/a.png?token=abc&w=64"]);
    }

    #[test]
    fn unparseable_urls_pass_through() {
        let urls = run(json!({
            "urls": ["not a url", "https://cdn.example.com/b.png"],
            "width": 64,
        }));
        assert_eq!(urls[0], "not a url");
        assert_eq!(urls[1], "https://cdn.example.com/b.png?w=64");
    }

    #[test]
    fn no_parameters_means_no_rewrite() {
        let urls = run(json!({"urls": ["https://cdn.example.com/c.png"]}));
        assert_eq!(urls, vec!["https://cdn.example.com/c.png"]);
    }
}
