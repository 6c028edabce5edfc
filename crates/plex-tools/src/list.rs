//! Paged movie listing and recently added movies

use std::sync::Arc;

use async_trait::async_trait;
use plex_core::plex::MediaLibrary;
use plex_core::{ParamSpec, ParamType, Result, Tool, ToolArgs};
use serde_json::{json, Value};

use crate::format::{format_added_at, movie_with_summary, truncate_summary, SUMMARY_LENGTH};

/// Lists the movie library one page at a time
pub struct ListAllMoviesTool {
    library: Arc<dyn MediaLibrary>,
}

impl ListAllMoviesTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for ListAllMoviesTool {
    fn name(&self) -> &str {
        "list_all_movies"
    }

    fn description(&self) -> &str {
        "List all movies in the Plex library with pagination"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of movies to return")
                .with_default(100),
            ParamSpec::optional("offset", ParamType::Integer, "Number of movies to skip")
                .with_default(0),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let limit = args.count("limit")?;
        let offset = args.count("offset")?;

        let page = self.library.movies(offset, Some(limit)).await?;
        let movies: Vec<Value> = page
            .items
            .iter()
            .map(|m| movie_with_summary(m, SUMMARY_LENGTH))
            .collect();

        Ok(json!({
            "movies": movies,
            "total": page.total,
            "offset": offset,
            "limit": limit,
            "has_more": offset.saturating_add(limit) < page.total,
        }))
    }
}

pub struct GetRecentMoviesTool {
    library: Arc<dyn MediaLibrary>,
}

impl GetRecentMoviesTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for GetRecentMoviesTool {
    fn name(&self) -> &str {
        "get_recent_movies"
    }

    fn description(&self) -> &str {
        "Get recently added movies, newest first"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of movies to return")
                .with_default(10),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let limit = args.count("limit")?;
        let movies = self.library.recent_movies(limit).await?;

        let recent: Vec<Value> = movies
            .iter()
            .take(limit)
            .map(|m| {
                json!({
                    "title": m.title,
                    "year": m.year,
                    "added_at": format_added_at(m.added_at),
                    "genres": m.genres,
                    "directors": m.directors,
                    "summary": truncate_summary(&m.summary, SUMMARY_LENGTH),
                })
            })
            .collect();

        Ok(json!({ "recent_movies": recent }))
    }
}
