//! In-memory media library for tool tests

use std::collections::HashMap;

use async_trait::async_trait;
use plex_core::plex::{Episode, MediaLibrary, Movie, Page, Role, Season, Show, TagKind};
use plex_core::{Error, Result};

use crate::format::{has_name, has_tag};

#[derive(Default)]
pub struct FakeLibrary {
    pub movies: Vec<Movie>,
    pub shows: Vec<Show>,
    pub seasons: HashMap<String, Vec<Season>>,
    pub episodes: Vec<Episode>,
    pub unreachable: bool,
}

impl FakeLibrary {
    /// A library whose every call fails as if Plex were down
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.unreachable {
            return Err(Error::UpstreamUnreachable("connection refused".to_string()));
        }
        Ok(())
    }
}

pub fn movie(key: &str, title: &str, year: i32, genres: &[&str], directors: &[&str]) -> Movie {
    Movie {
        rating_key: key.to_string(),
        title: title.to_string(),
        year: Some(year),
        genres: genres.iter().map(|s| s.to_string()).collect(),
        directors: directors.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

/// A small movie catalog with overlapping genres, directors and actors
pub fn sample_library() -> FakeLibrary {
    let mut alien = movie("1", "Alien", 1979, &["Horror", "Science Fiction"], &["Ridley Scott"]);
    alien.rating = Some(8.5);
    alien.summary = "The crew of a commercial spacecraft encounters a deadly lifeform.".to_string();
    alien.added_at = Some(1_600_000_000);
    alien.duration_ms = Some(7_020_000);
    alien.actors = vec![Role {
        name: "Sigourney Weaver".to_string(),
        role: Some("Ripley".to_string()),
    }];

    let mut aliens = movie("2", "Aliens", 1986, &["Action", "Science Fiction"], &["James Cameron"]);
    aliens.rating = Some(8.4);
    aliens.added_at = Some(1_700_000_000);
    aliens.actors = vec![Role {
        name: "Sigourney Weaver".to_string(),
        role: Some("Ellen Ripley".to_string()),
    }];

    let mut blade_runner = movie(
        "3",
        "Blade Runner",
        1982,
        &["Science Fiction", "Thriller"],
        &["Ridley Scott"],
    );
    blade_runner.rating = Some(8.1);
    blade_runner.added_at = Some(1_650_000_000);

    let mut heat = movie("4", "Heat", 1995, &["Crime", "Thriller"], &["Michael Mann"]);
    heat.rating = Some(8.3);

    let mut amelie = movie("5", "Amélie", 2001, &["Comedy", "Romance"], &["Jean-Pierre Jeunet"]);
    amelie.rating = Some(8.3);

    FakeLibrary {
        movies: vec![alien, aliens, blade_runner, heat, amelie],
        ..Default::default()
    }
}

fn window<T: Clone>(items: &[T], offset: usize, limit: Option<usize>) -> Page<T> {
    let selected = items
        .iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Page {
        items: selected,
        total: items.len(),
        offset,
    }
}

fn title_matches(title: &str, query: &str) -> bool {
    title.to_lowercase().contains(&query.to_lowercase())
}

#[async_trait]
impl MediaLibrary for FakeLibrary {
    async fn server_name(&self) -> Result<String> {
        self.check()?;
        Ok("Test Server".to_string())
    }

    async fn movies(&self, offset: usize, limit: Option<usize>) -> Result<Page<Movie>> {
        self.check()?;
        Ok(window(&self.movies, offset, limit))
    }

    async fn search_movies(&self, title: &str, limit: usize) -> Result<Vec<Movie>> {
        self.check()?;
        Ok(self
            .movies
            .iter()
            .filter(|m| title_matches(&m.title, title))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn movies_with_tag(&self, tag: TagKind, value: &str, limit: usize) -> Result<Vec<Movie>> {
        self.check()?;
        Ok(self
            .movies
            .iter()
            .filter(|m| match tag {
                TagKind::Genre => has_tag(&m.genres, value),
                TagKind::Director => has_tag(&m.directors, value),
                TagKind::Actor => has_name(m.actors.iter().map(|a| a.name.as_str()), value),
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn recent_movies(&self, limit: usize) -> Result<Vec<Movie>> {
        self.check()?;
        let mut movies: Vec<Movie> = self.movies.iter().filter(|m| m.added_at.is_some()).cloned().collect();
        movies.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        movies.truncate(limit);
        Ok(movies)
    }

    async fn movie(&self, rating_key: &str) -> Result<Movie> {
        self.check()?;
        self.movies
            .iter()
            .find(|m| m.rating_key == rating_key)
            .cloned()
            .ok_or_else(|| Error::UpstreamStatus {
                status: 404,
                body: "Not Found".to_string(),
            })
    }

    async fn shows(&self, offset: usize, limit: Option<usize>) -> Result<Page<Show>> {
        self.check()?;
        Ok(window(&self.shows, offset, limit))
    }

    async fn search_shows(&self, title: &str, limit: usize) -> Result<Vec<Show>> {
        self.check()?;
        Ok(self
            .shows
            .iter()
            .filter(|s| title_matches(&s.title, title))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn seasons(&self, show_rating_key: &str) -> Result<Vec<Season>> {
        self.check()?;
        Ok(self.seasons.get(show_rating_key).cloned().unwrap_or_default())
    }

    async fn recent_episodes(&self, limit: usize) -> Result<Vec<Episode>> {
        self.check()?;
        let mut episodes = self.episodes.clone();
        episodes.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        episodes.truncate(limit);
        Ok(episodes)
    }
}
