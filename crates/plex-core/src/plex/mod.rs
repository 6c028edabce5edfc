//! Upstream Plex access
//!
//! [`MediaLibrary`] is the read-only contract tools are written against;
//! [`PlexClient`] implements it over the Plex HTTP API.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::Result;

pub use client::PlexClient;
pub use types::{
    Episode, LibrarySection, Movie, Page, Role, Season, SectionKind, Show, TagKind,
};

/// Read-only queries against a media catalog
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Friendly name of the media server
    async fn server_name(&self) -> Result<String>;

    /// Movies in library order; `limit = None` returns everything from `offset`
    async fn movies(&self, offset: usize, limit: Option<usize>) -> Result<Page<Movie>>;

    /// Movies whose title matches `title`
    async fn search_movies(&self, title: &str, limit: usize) -> Result<Vec<Movie>>;

    /// Movies tagged with `value`; an unknown tag value yields no movies
    async fn movies_with_tag(&self, tag: TagKind, value: &str, limit: usize) -> Result<Vec<Movie>>;

    /// Most recently added movies, newest first
    async fn recent_movies(&self, limit: usize) -> Result<Vec<Movie>>;

    /// Full metadata for one movie
    async fn movie(&self, rating_key: &str) -> Result<Movie>;

    /// TV shows in library order
    async fn shows(&self, offset: usize, limit: Option<usize>) -> Result<Page<Show>>;

    /// TV shows whose title matches `title`
    async fn search_shows(&self, title: &str, limit: usize) -> Result<Vec<Show>>;

    /// Seasons of a show
    async fn seasons(&self, show_rating_key: &str) -> Result<Vec<Season>>;

    /// Most recently added episodes, newest first
    async fn recent_episodes(&self, limit: usize) -> Result<Vec<Episode>>;

    /// Every movie in the library
    async fn all_movies(&self) -> Result<Vec<Movie>> {
        Ok(self.movies(0, None).await?.items)
    }
}
