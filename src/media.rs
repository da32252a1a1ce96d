use serde_json::Value;

use crate::locale::{Locale, resolve_field};
use crate::projection::{entity_id, filter_by_text, format_date, items, str_field};

pub const NEWS_SIZE_STEP: u32 = 10;
pub const NEWS_SIZE_MAX: u32 = 100;
pub const GALLERY_SIZE_STEP: u32 = 12;
pub const GALLERY_SIZE_MAX: u32 = 96;

/// Photos and videos searched by their localized description.
pub fn filter_gallery<'a>(payload: Option<&'a Value>, term: &str, locale: Locale) -> Vec<&'a Value> {
    filter_by_text(payload, "description", term, locale)
}

/// Sidebar list next to an opened article.
pub fn other_news<'a>(payload: Option<&'a Value>, exclude_id: Option<&str>, n: usize) -> Vec<&'a Value> {
    items(payload)
        .iter()
        .filter(|news| match exclude_id {
            Some(exclude) => entity_id(news).is_none_or(|id| id != exclude),
            None => true,
        })
        .take(n)
        .collect()
}

pub fn headline(news: &Value, locale: Locale) -> String {
    resolve_field(Some(news), "title", locale)
}

pub fn published_on(news: &Value) -> String {
    str_field(Some(news), "created_at")
        .map(format_date)
        .unwrap_or_default()
}

/// Media link: `video_url`/`url` for videos, `image`/`photo` for photos.
pub fn media_url(item: &Value) -> Option<&str> {
    ["video_url", "url", "image", "photo", "file"]
        .iter()
        .find_map(|key| str_field(Some(item), key))
}
