//! TV library tools

use std::sync::Arc;

use async_trait::async_trait;
use plex_core::plex::{MediaLibrary, Show};
use plex_core::{Error, ParamSpec, ParamType, Result, Tool, ToolArgs};
use serde_json::{json, Value};

use crate::format::{format_added_at, show_summary};

const TITLE_CANDIDATES: usize = 20;

pub struct ListAllShowsTool {
    library: Arc<dyn MediaLibrary>,
}

impl ListAllShowsTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for ListAllShowsTool {
    fn name(&self) -> &str {
        "list_all_shows"
    }

    fn description(&self) -> &str {
        "List all TV shows in the Plex library with pagination"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of shows to return")
                .with_default(100),
            ParamSpec::optional("offset", ParamType::Integer, "Number of shows to skip")
                .with_default(0),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let limit = args.count("limit")?;
        let offset = args.count("offset")?;

        let page = self.library.shows(offset, Some(limit)).await?;
        let shows: Vec<Value> = page.items.iter().map(show_summary).collect();

        Ok(json!({
            "shows": shows,
            "total": page.total,
            "offset": offset,
            "limit": limit,
            "has_more": offset.saturating_add(limit) < page.total,
        }))
    }
}

pub struct SearchShowsTool {
    library: Arc<dyn MediaLibrary>,
}

impl SearchShowsTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for SearchShowsTool {
    fn name(&self) -> &str {
        "search_shows"
    }

    fn description(&self) -> &str {
        "Search for TV shows by title"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("query", ParamType::String, "Title text to search for"),
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of results")
                .with_default(10),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let query = args.string("query")?;
        let limit = args.count("limit")?;

        let shows: Vec<Value> = self
            .library
            .search_shows(query, limit)
            .await?
            .iter()
            .take(limit)
            .map(show_summary)
            .collect();

        Ok(json!({ "total": shows.len(), "shows": shows }))
    }
}

pub struct GetShowSeasonsTool {
    library: Arc<dyn MediaLibrary>,
}

impl GetShowSeasonsTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }

    async fn resolve(&self, title: &str) -> Result<Show> {
        let candidates = self.library.search_shows(title, TITLE_CANDIDATES).await?;
        let wanted = title.trim().to_lowercase();
        let position = candidates
            .iter()
            .position(|s| s.title.to_lowercase() == wanted)
            .unwrap_or(0);

        candidates
            .into_iter()
            .nth(position)
            .ok_or_else(|| Error::not_found("title", format!("No show found matching '{}'", title)))
    }
}

#[async_trait]
impl Tool for GetShowSeasonsTool {
    fn name(&self) -> &str {
        "get_show_seasons"
    }

    fn description(&self) -> &str {
        "List the seasons of a TV show with their episode counts"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required("title", ParamType::String, "Show title")]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let title = args.string("title")?;
        let show = self.resolve(title).await?;

        let seasons: Vec<Value> = self
            .library
            .seasons(&show.rating_key)
            .await?
            .iter()
            .map(|s| {
                json!({
                    "season": s.index,
                    "title": s.title,
                    "episodes": s.episode_count,
                })
            })
            .collect();

        Ok(json!({ "show": show.title, "seasons": seasons }))
    }
}

pub struct GetRecentEpisodesTool {
    library: Arc<dyn MediaLibrary>,
}

impl GetRecentEpisodesTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for GetRecentEpisodesTool {
    fn name(&self) -> &str {
        "get_recent_episodes"
    }

    fn description(&self) -> &str {
        "Get recently added TV episodes, newest first"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of episodes to return")
                .with_default(10),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let limit = args.count("limit")?;

        let episodes: Vec<Value> = self
            .library
            .recent_episodes(limit)
            .await?
            .iter()
            .take(limit)
            .map(|e| {
                json!({
                    "show": e.show_title,
                    "season": e.season,
                    "episode": e.episode,
                    "title": e.title,
                    "added_at": format_added_at(e.added_at),
                })
            })
            .collect();

        Ok(json!({ "recent_episodes": episodes }))
    }
}
