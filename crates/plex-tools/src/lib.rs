//! plex-tools: Catalog tools for the Plex MCP server
//!
//! Every tool is read-only and works against a shared [`MediaLibrary`].

use std::sync::Arc;

use plex_core::plex::MediaLibrary;
use plex_core::ToolManager;

pub mod catalog;
pub mod details;
pub mod format;
pub mod list;
pub mod search;
pub mod tv;

#[cfg(test)]
mod testing;

pub use catalog::{AllTagsTool, GetGenreCombinationsTool, GetLibraryStatsTool};
pub use details::{FindSimilarByMetadataTool, GetMovieDetailsTool};
pub use list::{GetRecentMoviesTool, ListAllMoviesTool};
pub use search::{SearchByYearRangeTool, SearchMoviesTool, SearchMultiCriteriaTool, TagSearchTool};
pub use tv::{GetRecentEpisodesTool, GetShowSeasonsTool, ListAllShowsTool, SearchShowsTool};

/// Register the movie library tools
pub fn register_movie_tools(manager: &mut ToolManager, library: Arc<dyn MediaLibrary>) {
    manager.register(Arc::new(ListAllMoviesTool::new(library.clone())));
    manager.register(Arc::new(SearchMoviesTool::new(library.clone())));
    manager.register(Arc::new(TagSearchTool::genre(library.clone())));
    manager.register(Arc::new(TagSearchTool::director(library.clone())));
    manager.register(Arc::new(TagSearchTool::actor(library.clone())));
    manager.register(Arc::new(SearchByYearRangeTool::new(library.clone())));
    manager.register(Arc::new(SearchMultiCriteriaTool::new(library.clone())));
    manager.register(Arc::new(AllTagsTool::genres(library.clone())));
    manager.register(Arc::new(AllTagsTool::directors(library.clone())));
    manager.register(Arc::new(GetRecentMoviesTool::new(library.clone())));
    manager.register(Arc::new(GetLibraryStatsTool::new(library.clone())));
    manager.register(Arc::new(GetGenreCombinationsTool::new(library.clone())));
    manager.register(Arc::new(GetMovieDetailsTool::new(library.clone())));
    manager.register(Arc::new(FindSimilarByMetadataTool::new(library)));
}

/// Register the TV library tools
pub fn register_tv_tools(manager: &mut ToolManager, library: Arc<dyn MediaLibrary>) {
    manager.register(Arc::new(ListAllShowsTool::new(library.clone())));
    manager.register(Arc::new(SearchShowsTool::new(library.clone())));
    manager.register(Arc::new(GetShowSeasonsTool::new(library.clone())));
    manager.register(Arc::new(GetRecentEpisodesTool::new(library)));
}

/// Register every catalog tool with the tool manager
pub fn register_default_tools(manager: &mut ToolManager, library: Arc<dyn MediaLibrary>) {
    register_movie_tools(manager, library.clone());
    register_tv_tools(manager, library);
}
