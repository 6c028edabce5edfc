//! Whole-library aggregates: tag indexes, statistics and genre pairs

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use plex_core::plex::{MediaLibrary, Movie};
use plex_core::{ParamSpec, ParamType, Result, Tool, ToolArgs};
use serde_json::{json, Value};

use crate::format::{decade_label, top_counts};

/// Number of entries in each top-N list of the library statistics
const TOP_ENTRIES: usize = 10;

/// Sorted, de-duplicated index of one movie tag list
pub struct AllTagsTool {
    library: Arc<dyn MediaLibrary>,
    name: &'static str,
    description: &'static str,
    key: &'static str,
    tags: fn(&Movie) -> &[String],
}

fn genres_of(movie: &Movie) -> &[String] {
    &movie.genres
}

fn directors_of(movie: &Movie) -> &[String] {
    &movie.directors
}

impl AllTagsTool {
    pub fn genres(library: Arc<dyn MediaLibrary>) -> Self {
        Self {
            library,
            name: "get_all_genres",
            description: "List every genre present in the movie library",
            key: "genres",
            tags: genres_of,
        }
    }

    pub fn directors(library: Arc<dyn MediaLibrary>) -> Self {
        Self {
            library,
            name: "get_all_directors",
            description: "List every director present in the movie library",
            key: "directors",
            tags: directors_of,
        }
    }
}

#[async_trait]
impl Tool for AllTagsTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    async fn execute(&self, _args: ToolArgs) -> Result<Value> {
        let movies = self.library.all_movies().await?;
        let unique: BTreeSet<&str> = movies
            .iter()
            .flat_map(|m| (self.tags)(m).iter().map(String::as_str))
            .collect();

        Ok(json!({ self.key: unique }))
    }
}

pub struct GetLibraryStatsTool {
    library: Arc<dyn MediaLibrary>,
}

impl GetLibraryStatsTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for GetLibraryStatsTool {
    fn name(&self) -> &str {
        "get_library_stats"
    }

    fn description(&self) -> &str {
        "Summarize the movie library: counts per decade plus the most common genres and directors"
    }

    async fn execute(&self, _args: ToolArgs) -> Result<Value> {
        let movies = self.library.all_movies().await?;

        let mut decades: BTreeMap<String, usize> = BTreeMap::new();
        let mut genres: HashMap<String, usize> = HashMap::new();
        let mut directors: HashMap<String, usize> = HashMap::new();

        for movie in &movies {
            if let Some(year) = movie.year {
                *decades.entry(decade_label(year)).or_default() += 1;
            }
            for genre in &movie.genres {
                *genres.entry(genre.clone()).or_default() += 1;
            }
            for director in &movie.directors {
                *directors.entry(director.clone()).or_default() += 1;
            }
        }

        Ok(json!({
            "total_movies": movies.len(),
            "decades": decades,
            "top_genres": top_counts(genres, TOP_ENTRIES),
            "top_directors": top_counts(directors, TOP_ENTRIES),
        }))
    }
}

pub struct GetGenreCombinationsTool {
    library: Arc<dyn MediaLibrary>,
}

impl GetGenreCombinationsTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

/// Unordered genre pairs appearing together on a movie, with counts
fn genre_pairs(movies: &[Movie]) -> Vec<((String, String), usize)> {
    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for movie in movies {
        let genres: Vec<&String> = movie.genres.iter().collect::<BTreeSet<_>>().into_iter().collect();
        for (i, first) in genres.iter().enumerate() {
            for second in &genres[i + 1..] {
                *counts
                    .entry(((*first).clone(), (*second).clone()))
                    .or_default() += 1;
            }
        }
    }

    let mut pairs: Vec<_> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

#[async_trait]
impl Tool for GetGenreCombinationsTool {
    fn name(&self) -> &str {
        "get_genre_combinations"
    }

    fn description(&self) -> &str {
        "Find the genre pairs that most often appear together"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of pairs to return")
                .with_default(10),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let limit = args.count("limit")?;
        let movies = self.library.all_movies().await?;

        let combinations: Vec<Value> = genre_pairs(&movies)
            .into_iter()
            .take(limit)
            .map(|((a, b), count)| json!({ "genres": [a, b], "count": count }))
            .collect();

        Ok(json!({
            "combinations": combinations,
            "total_movies": movies.len(),
        }))
    }
}
