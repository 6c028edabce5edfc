//! Plex API types
//!
//! Raw `MediaContainer` payloads as returned by the Plex HTTP API with
//! `Accept: application/json`, and the catalog types handed to tools.

use serde::{Deserialize, Serialize};

// ============================================================================
// Wire types
// ============================================================================

/// Top-level response body
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "MediaContainer")]
    pub media_container: MediaContainer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaContainer {
    pub size: Option<usize>,
    pub total_size: Option<usize>,
    pub offset: Option<usize>,
    pub friendly_name: Option<String>,
    pub machine_identifier: Option<String>,
    pub version: Option<String>,
    #[serde(rename = "Metadata")]
    pub metadata: Vec<Metadata>,
    #[serde(rename = "Directory")]
    pub directory: Vec<Directory>,
}

/// Library section or tag entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Directory {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: String,
}

/// Metadata item (movie, show, season or episode)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub rating_key: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub audience_rating: Option<f64>,
    pub content_rating: Option<String>,
    pub studio: Option<String>,
    pub summary: Option<String>,
    /// Milliseconds
    pub duration: Option<u64>,
    /// Unix seconds
    pub added_at: Option<i64>,
    pub child_count: Option<u32>,
    pub leaf_count: Option<u32>,
    pub index: Option<u32>,
    pub parent_index: Option<u32>,
    pub grandparent_title: Option<String>,
    #[serde(rename = "Genre")]
    pub genres: Vec<Tag>,
    #[serde(rename = "Director")]
    pub directors: Vec<Tag>,
    #[serde(rename = "Writer")]
    pub writers: Vec<Tag>,
    #[serde(rename = "Role")]
    pub roles: Vec<RoleTag>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub tag: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoleTag {
    pub tag: String,
    pub role: Option<String>,
}

fn tags(tags: Vec<Tag>) -> Vec<String> {
    tags.into_iter().map(|t| t.tag).collect()
}

// ============================================================================
// Catalog types
// ============================================================================

/// Library section kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Movie,
    Show,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "show",
        }
    }
}

/// A Plex library section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    pub key: String,
    pub kind: String,
    pub title: String,
}

impl From<Directory> for LibrarySection {
    fn from(d: Directory) -> Self {
        Self {
            key: d.key,
            kind: d.kind.unwrap_or_default(),
            title: d.title,
        }
    }
}

/// Tag kinds a movie search can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Genre,
    Director,
    Actor,
}

impl TagKind {
    /// Path segment and filter field used by Plex
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::Director => "director",
            Self::Actor => "actor",
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Role {
    pub name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Movie {
    pub rating_key: String,
    pub title: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub audience_rating: Option<f64>,
    pub content_rating: Option<String>,
    pub studio: Option<String>,
    pub summary: String,
    pub duration_ms: Option<u64>,
    pub added_at: Option<i64>,
    pub genres: Vec<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub actors: Vec<Role>,
}

impl From<Metadata> for Movie {
    fn from(m: Metadata) -> Self {
        Self {
            rating_key: m.rating_key,
            title: m.title,
            year: m.year,
            rating: m.rating,
            audience_rating: m.audience_rating,
            content_rating: m.content_rating,
            studio: m.studio,
            summary: m.summary.unwrap_or_default(),
            duration_ms: m.duration,
            added_at: m.added_at,
            genres: tags(m.genres),
            directors: tags(m.directors),
            writers: tags(m.writers),
            actors: m
                .roles
                .into_iter()
                .map(|r| Role {
                    name: r.tag,
                    role: r.role,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Show {
    pub rating_key: String,
    pub title: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub summary: String,
    pub season_count: Option<u32>,
    pub episode_count: Option<u32>,
    pub added_at: Option<i64>,
    pub genres: Vec<String>,
}

impl From<Metadata> for Show {
    fn from(m: Metadata) -> Self {
        Self {
            rating_key: m.rating_key,
            title: m.title,
            year: m.year,
            rating: m.rating,
            summary: m.summary.unwrap_or_default(),
            season_count: m.child_count,
            episode_count: m.leaf_count,
            added_at: m.added_at,
            genres: tags(m.genres),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Season {
    pub rating_key: String,
    pub index: Option<u32>,
    pub title: String,
    pub episode_count: Option<u32>,
}

impl From<Metadata> for Season {
    fn from(m: Metadata) -> Self {
        Self {
            rating_key: m.rating_key,
            index: m.index,
            title: m.title,
            episode_count: m.leaf_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Episode {
    pub rating_key: String,
    pub show_title: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub title: String,
    pub added_at: Option<i64>,
}

impl From<Metadata> for Episode {
    fn from(m: Metadata) -> Self {
        Self {
            rating_key: m.rating_key,
            show_title: m.grandparent_title,
            season: m.parent_index,
            episode: m.index,
            title: m.title,
            added_at: m.added_at,
        }
    }
}
