//! Shared result formatting for catalog tools

use std::collections::HashMap;

use chrono::DateTime;
use plex_core::plex::{Movie, Show};
use serde_json::{json, Value};

/// Default summary length in listings
pub const SUMMARY_LENGTH: usize = 150;

/// Summary length in title search results
pub const SEARCH_SUMMARY_LENGTH: usize = 200;

/// Truncate to `max_length` characters, appending `...` when cut
pub fn truncate_summary(summary: &str, max_length: usize) -> String {
    match summary.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}...", &summary[..cut]),
        None => summary.to_string(),
    }
}

/// Render a Plex `addedAt` timestamp as `YYYY-MM-DD HH:MM:SS` (UTC)
pub fn format_added_at(added_at: Option<i64>) -> Option<String> {
    added_at
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Decade bucket such as `1990s`
pub fn decade_label(year: i32) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

/// Title, year, rating, genres and directors
pub fn movie_brief(movie: &Movie) -> Value {
    json!({
        "title": movie.title,
        "year": movie.year,
        "rating": movie.rating,
        "genres": movie.genres,
        "directors": movie.directors,
    })
}

/// [`movie_brief`] plus a truncated summary
pub fn movie_with_summary(movie: &Movie, max_length: usize) -> Value {
    let mut value = movie_brief(movie);
    value["summary"] = json!(truncate_summary(&movie.summary, max_length));
    value
}

pub fn show_summary(show: &Show) -> Value {
    json!({
        "title": show.title,
        "year": show.year,
        "rating": show.rating,
        "seasons": show.season_count,
        "episodes": show.episode_count,
        "genres": show.genres,
        "summary": truncate_summary(&show.summary, SUMMARY_LENGTH),
    })
}

/// The `n` largest counts, ties broken by name
pub fn top_counts(counts: HashMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

/// Case-insensitive membership test for tag lists
pub fn has_tag(tags: &[String], value: &str) -> bool {
    has_name(tags.iter().map(String::as_str), value)
}

/// Whether any of `names` equals `value`, ignoring case (Unicode-aware)
pub fn has_name<'a>(mut names: impl Iterator<Item = &'a str>, value: &str) -> bool {
    let value = value.trim().to_lowercase();
    names.any(|n| n.to_lowercase() == value)
}
