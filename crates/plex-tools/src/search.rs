//! Movie search tools: by title, by tag, by year and by combined criteria

use std::sync::Arc;

use async_trait::async_trait;
use plex_core::plex::{MediaLibrary, Movie, TagKind};
use plex_core::{Error, ParamSpec, ParamType, Result, Tool, ToolArgs};
use serde_json::{json, Map, Value};

use crate::format::{has_name, has_tag, movie_brief, movie_with_summary, SEARCH_SUMMARY_LENGTH};

pub struct SearchMoviesTool {
    library: Arc<dyn MediaLibrary>,
}

impl SearchMoviesTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for SearchMoviesTool {
    fn name(&self) -> &str {
        "search_movies"
    }

    fn description(&self) -> &str {
        "Search for movies by title"
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

        let movies: Vec<Value> = self
            .library
            .search_movies(query, limit)
            .await?
            .iter()
            .take(limit)
            .map(|m| movie_with_summary(m, SEARCH_SUMMARY_LENGTH))
            .collect();

        Ok(json!({ "total": movies.len(), "movies": movies }))
    }
}

/// Exact tag lookup; one instance each for genre, director and actor
pub struct TagSearchTool {
    library: Arc<dyn MediaLibrary>,
    tag: TagKind,
    name: &'static str,
    description: &'static str,
}

impl TagSearchTool {
    pub fn genre(library: Arc<dyn MediaLibrary>) -> Self {
        Self {
            library,
            tag: TagKind::Genre,
            name: "search_by_genre",
            description: "Find movies with a given genre",
        }
    }

    pub fn director(library: Arc<dyn MediaLibrary>) -> Self {
        Self {
            library,
            tag: TagKind::Director,
            name: "search_by_director",
            description: "Find movies by a given director",
        }
    }

    pub fn actor(library: Arc<dyn MediaLibrary>) -> Self {
        Self {
            library,
            tag: TagKind::Actor,
            name: "search_by_actor",
            description: "Find movies featuring a given actor",
        }
    }

    /// Argument name, also used as the echo key in the result
    fn argument(&self) -> &'static str {
        self.tag.as_str()
    }
}

#[async_trait]
impl Tool for TagSearchTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        let argument = self.argument();
        vec![
            ParamSpec::required(argument, ParamType::String, &format!("Exact {} name", argument)),
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of results")
                .with_default(20),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let value = args.string(self.argument())?;
        let limit = args.count("limit")?;

        let movies: Vec<Value> = self
            .library
            .movies_with_tag(self.tag, value, limit)
            .await?
            .iter()
            .take(limit)
            .map(movie_brief)
            .collect();

        let mut result = Map::new();
        result.insert("total".to_string(), json!(movies.len()));
        result.insert("movies".to_string(), Value::Array(movies));
        result.insert(self.argument().to_string(), json!(value));
        Ok(Value::Object(result))
    }
}

pub struct SearchByYearRangeTool {
    library: Arc<dyn MediaLibrary>,
}

impl SearchByYearRangeTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

fn in_year_range(movie: &Movie, start: Option<i64>, end: Option<i64>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(year) = movie.year.map(i64::from) else {
        return false;
    };
    start.is_none_or(|s| year >= s) && end.is_none_or(|e| year <= e)
}

fn check_year_order(start: Option<i64>, end: Option<i64>) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(Error::invalid_argument(
                "start_year",
                format!("start_year ({}) is after end_year ({})", start, end),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl Tool for SearchByYearRangeTool {
    fn name(&self) -> &str {
        "search_by_year_range"
    }

    fn description(&self) -> &str {
        "Find movies released within an inclusive range of years"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("start_year", ParamType::Integer, "First year of the range"),
            ParamSpec::required("end_year", ParamType::Integer, "Last year of the range"),
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of results")
                .with_default(30),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let start = args.integer("start_year")?;
        let end = args.integer("end_year")?;
        let limit = args.count("limit")?;
        check_year_order(Some(start), Some(end))?;

        let movies: Vec<Value> = self
            .library
            .all_movies()
            .await?
            .iter()
            .filter(|m| in_year_range(m, Some(start), Some(end)))
            .take(limit)
            .map(movie_brief)
            .collect();

        Ok(json!({
            "movies": movies,
            "year_range": format!("{}-{}", start, end),
            "total": movies.len(),
        }))
    }
}

pub struct SearchMultiCriteriaTool {
    library: Arc<dyn MediaLibrary>,
}

impl SearchMultiCriteriaTool {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }
}

/// Criteria for [`SearchMultiCriteriaTool`]; `None` fields match everything
#[derive(Debug, Default)]
struct Criteria<'a> {
    genre: Option<&'a str>,
    director: Option<&'a str>,
    actor: Option<&'a str>,
    start_year: Option<i64>,
    end_year: Option<i64>,
    min_rating: Option<f64>,
}

impl<'a> Criteria<'a> {
    fn from_args(args: &'a ToolArgs) -> Self {
        Self {
            genre: args.opt_string("genre"),
            director: args.opt_string("director"),
            actor: args.opt_string("actor"),
            start_year: args.opt_integer("start_year"),
            end_year: args.opt_integer("end_year"),
            min_rating: args.opt_number("min_rating"),
        }
    }

    fn matches(&self, movie: &Movie) -> bool {
        if let Some(genre) = self.genre {
            if !has_tag(&movie.genres, genre) {
                return false;
            }
        }
        if let Some(director) = self.director {
            if !has_tag(&movie.directors, director) {
                return false;
            }
        }
        if let Some(actor) = self.actor {
            if !has_name(movie.actors.iter().map(|a| a.name.as_str()), actor) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if movie.rating.is_none_or(|r| r < min) {
                return false;
            }
        }
        in_year_range(movie, self.start_year, self.end_year)
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        let mut put = |key: &str, value: Value| {
            if !value.is_null() {
                map.insert(key.to_string(), value);
            }
        };
        put("genre", json!(self.genre));
        put("director", json!(self.director));
        put("actor", json!(self.actor));
        put("start_year", json!(self.start_year));
        put("end_year", json!(self.end_year));
        put("min_rating", json!(self.min_rating));
        Value::Object(map)
    }
}

#[async_trait]
impl Tool for SearchMultiCriteriaTool {
    fn name(&self) -> &str {
        "search_multi_criteria"
    }

    fn description(&self) -> &str {
        "Find movies matching every given criterion: genre, director, actor, years and minimum rating"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::optional("genre", ParamType::String, "Genre the movie must have"),
            ParamSpec::optional("director", ParamType::String, "Director the movie must have"),
            ParamSpec::optional("actor", ParamType::String, "Actor the movie must feature"),
            ParamSpec::optional("start_year", ParamType::Integer, "Earliest release year"),
            ParamSpec::optional("end_year", ParamType::Integer, "Latest release year"),
            ParamSpec::optional("min_rating", ParamType::Number, "Minimum critic rating"),
            ParamSpec::optional("limit", ParamType::Integer, "Maximum number of results")
                .with_default(20),
        ]
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let limit = args.count("limit")?;
        let criteria = Criteria::from_args(&args);
        check_year_order(criteria.start_year, criteria.end_year)?;

        let movies: Vec<Value> = self
            .library
            .all_movies()
            .await?
            .iter()
            .filter(|m| criteria.matches(m))
            .take(limit)
            .map(movie_brief)
            .collect();

        Ok(json!({
            "movies": movies,
            "criteria": criteria.to_json(),
            "total": movies.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_library, FakeLibrary};
    use plex_core::plex::Role;
    use plex_core::{ErrorKind, ToolManager};

    fn manager(library: FakeLibrary) -> ToolManager {
        let library: Arc<dyn MediaLibrary> = Arc::new(library);
        let mut manager = ToolManager::new();
        manager.register(Arc::new(SearchMoviesTool::new(library.clone())));
        manager.register(Arc::new(TagSearchTool::genre(library.clone())));
        manager.register(Arc::new(TagSearchTool::director(library.clone())));
        manager.register(Arc::new(TagSearchTool::actor(library.clone())));
        manager.register(Arc::new(SearchByYearRangeTool::new(library.clone())));
        manager.register(Arc::new(SearchMultiCriteriaTool::new(library)));
        manager
    }

    fn titles(result: &Value) -> Vec<String> {
        result["movies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_search_movies() {
        let manager = manager(sample_library());
        let result = manager
            .execute("search_movies", &json!({"query": "alien"}))
            .await
            .unwrap();

        assert_eq!(titles(&result), vec!["Alien", "Aliens"]);
        assert_eq!(result["total"], 2);
        assert!(result["movies"][0]["summary"].as_str().unwrap().starts_with("The crew"));
    }

    #[tokio::test]
    async fn test_search_movies_requires_query() {
        let manager = manager(sample_library());
        let err = manager.execute("search_movies", &json!({})).await.unwrap_err();

        assert_eq!(err.to_string(), "Missing required argument: query");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_search_by_genre_echoes_argument() {
        let manager = manager(sample_library());
        let result = manager
            .execute("search_by_genre", &json!({"genre": "thriller"}))
            .await
            .unwrap();

        assert_eq!(titles(&result), vec!["Blade Runner", "Heat"]);
        assert_eq!(result["genre"], "thriller");
        assert_eq!(result["total"], 2);
        assert!(result["movies"][0].get("summary").is_none());
    }

    #[tokio::test]
    async fn test_search_by_director_and_actor() {
        let manager = manager(sample_library());

        let result = manager
            .execute("search_by_director", &json!({"director": "Ridley Scott", "limit": 1}))
            .await
            .unwrap();
        assert_eq!(titles(&result), vec!["Alien"]);
        assert_eq!(result["director"], "Ridley Scott");

        let result = manager
            .execute("search_by_actor", &json!({"actor": "Sigourney Weaver"}))
            .await
            .unwrap();
        assert_eq!(titles(&result), vec!["Alien", "Aliens"]);
        assert_eq!(result["actor"], "Sigourney Weaver");
    }

    #[tokio::test]
    async fn test_search_by_unknown_tag_is_empty() {
        let manager = manager(sample_library());
        let result = manager
            .execute("search_by_genre", &json!({"genre": "Western"}))
            .await
            .unwrap();

        assert_eq!(result["movies"], json!([]));
        assert_eq!(result["total"], 0);
    }

    #[tokio::test]
    async fn test_search_by_year_range_inclusive() {
        let manager = manager(sample_library());
        let result = manager
            .execute("search_by_year_range", &json!({"start_year": 1979, "end_year": 1986}))
            .await
            .unwrap();

        assert_eq!(titles(&result), vec!["Alien", "Aliens", "Blade Runner"]);
        assert_eq!(result["year_range"], "1979-1986");
        assert_eq!(result["total"], 3);
    }

    #[tokio::test]
    async fn test_search_by_year_range_rejects_reversed_range() {
        let manager = manager(sample_library());
        let err = manager
            .execute("search_by_year_range", &json!({"start_year": 2000, "end_year": 1990}))
            .await
            .unwrap_err();

        assert_eq!(err.argument(), Some("start_year"));
    }

    #[tokio::test]
    async fn test_search_by_year_range_wrong_type() {
        let manager = manager(sample_library());
        let err = manager
            .execute("search_by_year_range", &json!({"start_year": "1990", "end_year": 2000}))
            .await
            .unwrap_err();

        assert_eq!(err.argument(), Some("start_year"));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_multi_criteria_combines_filters() {
        let manager = manager(sample_library());
        let result = manager
            .execute(
                "search_multi_criteria",
                &json!({"genre": "Science Fiction", "director": "ridley scott", "min_rating": 8.2}),
            )
            .await
            .unwrap();

        assert_eq!(titles(&result), vec!["Alien"]);
        assert_eq!(
            result["criteria"],
            json!({"genre": "Science Fiction", "director": "ridley scott", "min_rating": 8.2})
        );
    }

    #[tokio::test]
    async fn test_multi_criteria_years_and_actor() {
        let manager = manager(sample_library());
        let result = manager
            .execute(
                "search_multi_criteria",
                &json!({"actor": "sigourney weaver", "start_year": 1980}),
            )
            .await
            .unwrap();

        assert_eq!(titles(&result), vec!["Aliens"]);
    }

    #[tokio::test]
    async fn test_multi_criteria_folds_non_ascii_case() {
        let mut library = sample_library();
        library.movies[4].actors = vec![Role {
            name: "Audrey Tautou".to_string(),
            role: Some("Amélie Poulain".to_string()),
        }];
        library.movies[4].genres.push("Comédie".to_string());
        let manager = manager(library);

        let by_tag = manager
            .execute("search_by_genre", &json!({"genre": "COMÉDIE"}))
            .await
            .unwrap();
        let by_criteria = manager
            .execute(
                "search_multi_criteria",
                &json!({"genre": "COMÉDIE", "actor": "AUDREY TAUTOU"}),
            )
            .await
            .unwrap();

        assert_eq!(titles(&by_tag), vec!["Amélie"]);
        assert_eq!(titles(&by_criteria), vec!["Amélie"]);
    }

    #[tokio::test]
    async fn test_multi_criteria_without_criteria_matches_all() {
        let manager = manager(sample_library());
        let result = manager
            .execute("search_multi_criteria", &json!({"limit": 3}))
            .await
            .unwrap();

        assert_eq!(result["total"], 3);
        assert_eq!(result["criteria"], json!({}));
    }
}
