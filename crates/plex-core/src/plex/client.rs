//! Plex Media Server HTTP client

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::PlexConfig;
use crate::error::{Error, Result};

use super::types::*;
use super::MediaLibrary;

/// Plex item type codes used by `/library/sections/{key}/all?type=`
const TYPE_MOVIE: u8 = 1;
const TYPE_SHOW: u8 = 2;
const TYPE_EPISODE: u8 = 4;

/// Longest upstream error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Plex HTTP API client
#[derive(Clone)]
pub struct PlexClient {
    client: Client,
    base_url: String,
}

impl PlexClient {
    /// Create a new client from configuration
    pub fn new(config: &PlexConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .ok_or_else(|| Error::Config("PLEX_TOKEN environment variable is required".to_string()))?;

        Self::build(&config.url, token, std::time::Duration::from_secs(config.timeout_secs))
    }

    /// Create with a custom base URL (for testing or custom endpoints)
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        Self::build(base_url, token, std::time::Duration::from_secs(30))
    }

    fn build(base_url: &str, token: &str, timeout: std::time::Duration) -> Result<Self> {
        let mut token_value = HeaderValue::from_str(token)
            .map_err(|_| Error::Config("PLEX_TOKEN contains invalid characters".to_string()))?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-plex-token", token_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-plex-product", HeaderValue::from_static("plex-mcp-server"));
        headers.insert(
            "x-plex-version",
            HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
        );
        headers.insert(
            "x-plex-client-identifier",
            HeaderValue::from_static("plex-mcp-server"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the Plex server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a Plex endpoint and unwrap its `MediaContainer`
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<MediaContainer> {
        let url = format!("{}{}", self.base_url, path);

        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Plex API error: {} - {}", status, body);
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
            Error::UpstreamResponse(format!("Failed to parse response from {}: {}", path, e))
        })?;

        Ok(envelope.media_container)
    }

    /// All library sections
    pub async fn sections(&self) -> Result<Vec<LibrarySection>> {
        let container = self.get("/library/sections", &[]).await?;
        Ok(container.directory.into_iter().map(LibrarySection::from).collect())
    }

    /// First section of the given kind
    pub async fn section(&self, kind: SectionKind) -> Result<LibrarySection> {
        self.sections()
            .await?
            .into_iter()
            .find(|s| s.kind == kind.as_str())
            .ok_or(Error::SectionNotFound(kind.as_str()))
    }

    /// List items of one type in a section, optionally windowed
    async fn items(
        &self,
        section_key: &str,
        item_type: u8,
        filters: &[(&str, String)],
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Page<Metadata>> {
        let mut query = vec![("type", item_type.to_string())];
        query.extend(filters.iter().cloned());
        if let Some(limit) = limit {
            query.push(("X-Plex-Container-Start", offset.to_string()));
            query.push(("X-Plex-Container-Size", limit.to_string()));
        }

        let path = format!("/library/sections/{}/all", section_key);
        let container = self.get(&path, &query).await?;

        let mut items = container.metadata;
        let total = match (container.total_size, limit) {
            (Some(total), _) => total,
            (None, Some(_)) => offset + items.len(),
            (None, None) => items.len(),
        };
        if limit.is_none() && offset > 0 {
            items = items.into_iter().skip(offset).collect();
        }

        Ok(Page {
            items,
            total,
            offset,
        })
    }

    /// Resolve a tag title (case-insensitive) to its filter id
    async fn tag_id(&self, section_key: &str, tag: TagKind, value: &str) -> Result<Option<String>> {
        let path = format!("/library/sections/{}/{}", section_key, tag.as_str());
        let container = self.get(&path, &[]).await?;

        let wanted = value.trim().to_lowercase();
        let id = container
            .directory
            .into_iter()
            .find(|d| d.title.to_lowercase() == wanted)
            .map(|d| d.key);

        if id.is_none() {
            debug!("No {} named '{}' in section {}", tag.as_str(), value, section_key);
        }
        Ok(id)
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    body
}

#[async_trait]
impl MediaLibrary for PlexClient {
    async fn server_name(&self) -> Result<String> {
        self.get("/", &[])
            .await?
            .friendly_name
            .ok_or_else(|| Error::UpstreamResponse("missing friendlyName".to_string()))
    }

    async fn movies(&self, offset: usize, limit: Option<usize>) -> Result<Page<Movie>> {
        let section = self.section(SectionKind::Movie).await?;
        let page = self.items(&section.key, TYPE_MOVIE, &[], offset, limit).await?;
        Ok(page.map(Movie::from))
    }

    async fn search_movies(&self, title: &str, limit: usize) -> Result<Vec<Movie>> {
        let section = self.section(SectionKind::Movie).await?;
        let filters = [("title", title.to_string())];
        let page = self.items(&section.key, TYPE_MOVIE, &filters, 0, Some(limit)).await?;
        Ok(page.items.into_iter().map(Movie::from).collect())
    }

    async fn movies_with_tag(&self, tag: TagKind, value: &str, limit: usize) -> Result<Vec<Movie>> {
        let section = self.section(SectionKind::Movie).await?;
        let Some(id) = self.tag_id(&section.key, tag, value).await? else {
            return Ok(Vec::new());
        };

        let filters = [(tag.as_str(), id)];
        let page = self.items(&section.key, TYPE_MOVIE, &filters, 0, Some(limit)).await?;
        Ok(page.items.into_iter().map(Movie::from).collect())
    }

    async fn recent_movies(&self, limit: usize) -> Result<Vec<Movie>> {
        let section = self.section(SectionKind::Movie).await?;
        let path = format!("/library/sections/{}/recentlyAdded", section.key);
        let query = [
            ("X-Plex-Container-Start", "0".to_string()),
            ("X-Plex-Container-Size", limit.to_string()),
        ];
        let container = self.get(&path, &query).await?;
        Ok(container
            .metadata
            .into_iter()
            .take(limit)
            .map(Movie::from)
            .collect())
    }

    async fn movie(&self, rating_key: &str) -> Result<Movie> {
        let path = format!("/library/metadata/{}", rating_key);
        self.get(&path, &[])
            .await?
            .metadata
            .into_iter()
            .next()
            .map(Movie::from)
            .ok_or_else(|| Error::UpstreamResponse(format!("no metadata for item {}", rating_key)))
    }

    async fn shows(&self, offset: usize, limit: Option<usize>) -> Result<Page<Show>> {
        let section = self.section(SectionKind::Show).await?;
        let page = self.items(&section.key, TYPE_SHOW, &[], offset, limit).await?;
        Ok(page.map(Show::from))
    }

    async fn search_shows(&self, title: &str, limit: usize) -> Result<Vec<Show>> {
        let section = self.section(SectionKind::Show).await?;
        let filters = [("title", title.to_string())];
        let page = self.items(&section.key, TYPE_SHOW, &filters, 0, Some(limit)).await?;
        Ok(page.items.into_iter().map(Show::from).collect())
    }

    async fn seasons(&self, show_rating_key: &str) -> Result<Vec<Season>> {
        let path = format!("/library/metadata/{}/children", show_rating_key);
        let container = self.get(&path, &[]).await?;
        Ok(container.metadata.into_iter().map(Season::from).collect())
    }

    async fn recent_episodes(&self, limit: usize) -> Result<Vec<Episode>> {
        let section = self.section(SectionKind::Show).await?;
        let filters = [("sort", "addedAt:desc".to_string())];
        let page = self.items(&section.key, TYPE_EPISODE, &filters, 0, Some(limit)).await?;
        Ok(page.items.into_iter().map(Episode::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "test-token";

    fn sections_body() -> serde_json::Value {
        json!({
            "MediaContainer": {
                "size": 2,
                "Directory": [
                    {"key": "2", "type": "show", "title": "TV Shows"},
                    {"key": "1", "type": "movie", "title": "Movies"}
                ]
            }
        })
    }

    async fn server_with_sections() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/library/sections"))
            .and(header("X-Plex-Token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(sections_body()))
            .mount(&server)
            .await;
        server
    }

    fn client(server: &MockServer) -> PlexClient {
        PlexClient::with_base_url(&server.uri(), TOKEN).unwrap()
    }

    #[test]
    fn test_new_requires_token() {
        let config = PlexConfig::default();
        assert!(matches!(PlexClient::new(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = PlexClient::with_base_url("http://plex.lan:32400/", TOKEN).unwrap();
        assert_eq!(client.base_url(), "http://plex.lan:32400");
    }

    #[tokio::test]
    async fn test_server_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {"friendlyName": "Living Room", "version": "1.40.0"}
            })))
            .mount(&server)
            .await;

        assert_eq!(client(&server).server_name().await.unwrap(), "Living Room");
    }

    #[tokio::test]
    async fn test_movies_page() {
        let server = server_with_sections().await;
        Mock::given(method("GET"))
            .and(path("/library/sections/1/all"))
            .and(query_param("type", "1"))
            .and(query_param("X-Plex-Container-Start", "10"))
            .and(query_param("X-Plex-Container-Size", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {
                    "size": 2,
                    "totalSize": 25,
                    "Metadata": [
                        {"ratingKey": "11", "title": "Alien", "year": 1979},
                        {"ratingKey": "12", "title": "Aliens", "year": 1986}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let page = client(&server).movies(10, Some(2)).await.unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.offset, 10);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].title, "Aliens");
    }

    #[tokio::test]
    async fn test_movies_with_tag_resolves_id() {
        let server = server_with_sections().await;
        Mock::given(method("GET"))
            .and(path("/library/sections/1/genre"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {
                    "Directory": [
                        {"key": "301", "title": "Comedy"},
                        {"key": "302", "title": "Science Fiction"}
                    ]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/library/sections/1/all"))
            .and(query_param("genre", "302"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {
                    "Metadata": [{"ratingKey": "11", "title": "Alien", "Genre": [{"tag": "Science Fiction"}]}]
                }
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let movies = client
            .movies_with_tag(TagKind::Genre, "science fiction", 20)
            .await
            .unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].genres, vec!["Science Fiction"]);

        let none = client.movies_with_tag(TagKind::Genre, "Western", 20).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_tag_match_folds_non_ascii_case() {
        let server = server_with_sections().await;
        Mock::given(method("GET"))
            .and(path("/library/sections/1/genre"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {"Directory": [{"key": "7", "title": "Ação"}]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/library/sections/1/all"))
            .and(query_param("genre", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {
                    "Metadata": [{"ratingKey": "40", "title": "Tropa de Elite", "Genre": [{"tag": "Ação"}]}]
                }
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        for value in ["ação", "AÇÃO", "Ação"] {
            let movies = client.movies_with_tag(TagKind::Genre, value, 20).await.unwrap();
            assert_eq!(movies.len(), 1, "{}", value);
        }
    }

    #[tokio::test]
    async fn test_missing_movie_section() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/library/sections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {"Directory": [{"key": "2", "type": "show", "title": "TV"}]}
            })))
            .mount(&server)
            .await;

        let err = client(&server).search_movies("Alien", 10).await.unwrap_err();
        assert!(matches!(err, Error::SectionNotFound("movie")));
        assert_eq!(err.kind(), ErrorKind::UpstreamError);
    }

    #[tokio::test]
    async fn test_unauthorized_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/library/sections"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = client(&server).sections().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamError);
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_invalid_body_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/library/sections"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<MediaContainer/>"))
            .mount(&server)
            .await;

        let err = client(&server).sections().await.unwrap_err();
        assert!(matches!(err, Error::UpstreamResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = PlexClient::with_base_url("http://127.0.0.1:9", TOKEN).unwrap();
        let err = client.server_name().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamUnreachable);
    }

    #[tokio::test]
    async fn test_seasons_and_recent_episodes() {
        let server = server_with_sections().await;
        Mock::given(method("GET"))
            .and(path("/library/metadata/500/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {
                    "Metadata": [
                        {"ratingKey": "501", "title": "Season 1", "index": 1, "leafCount": 10},
                        {"ratingKey": "502", "title": "Season 2", "index": 2, "leafCount": 8}
                    ]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/library/sections/2/all"))
            .and(query_param("type", "4"))
            .and(query_param("sort", "addedAt:desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {
                    "Metadata": [{
                        "ratingKey": "900",
                        "title": "The End",
                        "grandparentTitle": "Lost",
                        "parentIndex": 6,
                        "index": 17,
                        "addedAt": 1700000000
                    }]
                }
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let seasons = client.seasons("500").await.unwrap();
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[1].episode_count, Some(8));

        let episodes = client.recent_episodes(5).await.unwrap();
        assert_eq!(episodes[0].show_title.as_deref(), Some("Lost"));
        assert_eq!(episodes[0].episode, Some(17));
    }
}
