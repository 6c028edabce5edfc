//! Single-movie tools: full details and metadata similarity

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use plex_core::plex::{MediaLibrary, Movie};
use plex_core::{Error, ParamSpec, ParamType, Result, Tool, ToolArgs};
use serde_json::{json, Value};
use tracing::debug;

use crate::format::{decade_label, format_added_at, movie_brief};

/// Search hits considered when resolving a title
const TITLE_CANDIDATES: usize = 20;

/// Cast members included in movie details
const MAX_ACTORS: usize = 15;

/// Resolve `title` to a single movie with full metadata
///
/// A case-insensitive exact title match wins; otherwise the first search
/// hit is used.
pub async fn resolve_movie(library: &dyn MediaLibrary, title: &str) -> Result<Movie> {
    let candidates = library.search_movies(title, TITLE_CANDIDATES).await?;
    let wanted = title.trim().to_lowercase();

    let chosen = candidates
        .iter()
        .find(|m| m.title.to_lowercase() == wanted)
        .or_else(|| candidates.first())
        .ok_or_else(|| Error::not_found("title", format!("No movie found matching '{}'", title)))?;

    debug!("Resolved '{}' to {} ({})", title, chosen.title, chosen.rating_key);
    library.movie(&chosen.rating_key).await
}

pub struct GetMovieDetailsTool {
    library: Arc<dyn MediaLibrary>,
}

impl GetMovieDetailsTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for GetMovieDetailsTool {
    fn name(&self) -> &str {
        "get_movie_details"
    }

    fn description(&self) -> &str {
        "Get full details for a movie: cast, crew, ratings, runtime and summary"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required("title", ParamType::String, "Movie title")]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let title = args.string("title")?;
        let movie = resolve_movie(self.library.as_ref(), title).await?;

        let actors: Vec<Value> = movie
            .actors
            .iter()
            .take(MAX_ACTORS)
            .map(|a| json!({ "name": a.name, "role": a.role }))
            .collect();

        Ok(json!({
            "title": movie.title,
            "year": movie.year,
            "rating": movie.rating,
            "audience_rating": movie.audience_rating,
            "content_rating": movie.content_rating,
            "studio": movie.studio,
            "duration_minutes": movie.duration_ms.map(|ms| ms / 60_000),
            "summary": movie.summary,
            "genres": movie.genres,
            "directors": movie.directors,
            "writers": movie.writers,
            "actors": actors,
            "added_at": format_added_at(movie.added_at),
            "rating_key": movie.rating_key,
        }))
    }
}

pub struct FindSimilarByMetadataTool {
    library: Arc<dyn MediaLibrary>,
}

impl FindSimilarByMetadataTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

fn lowercase_set<'a>(values: impl Iterator<Item = &'a String>) -> HashSet<String> {
    values.map(|v| v.to_lowercase()).collect()
}

fn shared<'a>(set: &HashSet<String>, values: impl Iterator<Item = &'a String>) -> usize {
    values.filter(|v| set.contains(&v.to_lowercase())).count()
}

/// Tag profile of the reference movie
struct Profile {
    directors: HashSet<String>,
    genres: HashSet<String>,
    actors: HashSet<String>,
    decade: Option<String>,
}

impl Profile {
    fn of(movie: &Movie) -> Self {
        Self {
            directors: lowercase_set(movie.directors.iter()),
            genres: lowercase_set(movie.genres.iter()),
            actors: lowercase_set(movie.actors.iter().map(|a| &a.name)),
            decade: movie.year.map(decade_label),
        }
    }

    /// 2 per shared director, 1 per shared genre or actor, 1 for the same
    /// decade. `None` when no tag is shared.
    fn score(&self, candidate: &Movie) -> Option<usize> {
        let tags = 2 * shared(&self.directors, candidate.directors.iter())
            + shared(&self.genres, candidate.genres.iter())
            + shared(&self.actors, candidate.actors.iter().map(|a| &a.name));
        if tags == 0 {
            return None;
        }

        let same_decade = self.decade.is_some() && self.decade == candidate.year.map(decade_label);
        Some(tags + usize::from(same_decade))
    }
}

#[async_trait]
impl Tool for FindSimilarByMetadataTool {
    fn name(&self) -> &str {
        "find_similar_by_metadata"
    }

    fn description(&self) -> &str {
        "Find movies similar to a given movie by shared directors, genres, actors and decade"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("title", ParamType::String, "Title of the reference movie"),
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of similar movies")
                .with_default(10),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let title = args.string("title")?;
        let limit = args.count("limit")?;

        let reference = resolve_movie(self.library.as_ref(), title).await?;
        let profile = Profile::of(&reference);

        let movies = self.library.all_movies().await?;
        let mut scored: Vec<(usize, &Movie)> = movies
            .iter()
            .filter(|m| m.rating_key != reference.rating_key)
            .filter_map(|m| profile.score(m).map(|score| (score, m)))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.title.cmp(&b.1.title)));

        let similar: Vec<Value> = scored
            .into_iter()
            .take(limit)
            .map(|(score, m)| {
                let mut value = movie_brief(m);
                value["score"] = json!(score);
                value
            })
            .collect();

        Ok(json!({
            "reference": movie_brief(&reference),
            "similar": similar,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{movie, sample_library, FakeLibrary};
    use plex_core::{ErrorKind, ToolManager};

    fn manager(library: FakeLibrary) -> ToolManager {
        let library: Arc<dyn MediaLibrary> = Arc::new(library);
        let mut manager = ToolManager::new();
        manager.register(Arc::new(GetMovieDetailsTool::new(library.clone())));
        manager.register(Arc::new(FindSimilarByMetadataTool::new(library)));
        manager
    }

    #[tokio::test]
    async fn test_resolve_prefers_exact_match() {
        let library = sample_library();
        // "alien" also matches "Aliens"; exact title wins regardless of case
        let movie = resolve_movie(&library, "ALIEN").await.unwrap();
        assert_eq!(movie.title, "Alien");

        let movie = resolve_movie(&library, "blade").await.unwrap();
        assert_eq!(movie.title, "Blade Runner");
    }

    #[tokio::test]
    async fn test_movie_details() {
        let manager = manager(sample_library());
        let result = manager
            .execute("get_movie_details", &json!({"title": "alien"}))
            .await
            .unwrap();

        assert_eq!(result["title"], "Alien");
        assert_eq!(result["duration_minutes"], 117);
        assert_eq!(result["rating_key"], "1");
        assert_eq!(result["actors"], json!([{"name": "Sigourney Weaver", "role": "Ripley"}]));
        assert_eq!(result["added_at"], "2020-09-13 12:26:40");
        assert_eq!(
            result["summary"],
            "The crew of a commercial spacecraft encounters a deadly lifeform."
        );
    }

    #[tokio::test]
    async fn test_movie_details_caps_actors() {
        let mut crowded = movie("9", "Crowd", 2010, &["Drama"], &[]);
        crowded.actors = (0..20)
            .map(|i| plex_core::plex::Role {
                name: format!("Actor {}", i),
                role: None,
            })
            .collect();
        let manager = manager(FakeLibrary {
            movies: vec![crowded],
            ..Default::default()
        });

        let result = manager
            .execute("get_movie_details", &json!({"title": "Crowd"}))
            .await
            .unwrap();
        assert_eq!(result["actors"].as_array().unwrap().len(), 15);
        assert_eq!(result["duration_minutes"], Value::Null);
    }

    #[tokio::test]
    async fn test_movie_details_not_found() {
        let manager = manager(sample_library());
        let err = manager
            .execute("get_movie_details", &json!({"title": "Nonexistent"}))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.argument(), Some("title"));
    }

    #[tokio::test]
    async fn test_find_similar_scores() {
        let manager = manager(sample_library());
        let result = manager
            .execute("find_similar_by_metadata", &json!({"title": "Alien"}))
            .await
            .unwrap();

        assert_eq!(result["reference"]["title"], "Alien");
        let similar = result["similar"].as_array().unwrap();
        // Blade Runner: director 2 + genre 1; Aliens: genre 1 + actor 1
        assert_eq!(similar[0]["title"], "Blade Runner");
        assert_eq!(similar[0]["score"], 3);
        assert_eq!(similar[1]["title"], "Aliens");
        assert_eq!(similar[1]["score"], 2);
        assert_eq!(similar.len(), 2);
    }

    #[tokio::test]
    async fn test_find_similar_excludes_decade_only_matches() {
        let library = FakeLibrary {
            movies: vec![
                movie("1", "Reference", 1995, &["Drama"], &["A"]),
                movie("2", "Same Decade", 1997, &["Comedy"], &["B"]),
                movie("3", "Shared Genre", 1970, &["Drama"], &["C"]),
            ],
            ..Default::default()
        };
        let manager = manager(library);

        let result = manager
            .execute("find_similar_by_metadata", &json!({"title": "Reference", "limit": 5}))
            .await
            .unwrap();

        assert_eq!(
            result["similar"],
            json!([{
                "title": "Shared Genre",
                "year": 1970,
                "rating": null,
                "genres": ["Drama"],
                "directors": ["C"],
                "score": 1
            }])
        );
    }

    #[tokio::test]
    async fn test_find_similar_unknown_title() {
        let manager = manager(sample_library());
        let err = manager
            .execute("find_similar_by_metadata", &json!({"title": "Nope"}))
            .await
            .unwrap_err();
        assert_eq!(err.argument(), Some("title"));
    }
}
