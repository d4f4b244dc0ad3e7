//! HTTP client for the Sonarr v3 API
//!
//! This module provides [`SonarrClient`], the [`MediaLibrary`] implementation
//! Dubarr uses in production. Every request carries the `X-Api-Key` header.
//! Requests are not retried and, unless configured, have no timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{DubarrError, Result};
use crate::library::MediaLibrary;
use crate::types::{EpisodeFile, EpisodeInfo, SeriesSummary};

/// Header Sonarr reads the API key from
const API_KEY_HEADER: &str = "x-api-key";

/// Path prefix of the v3 API
const API_PREFIX: &str = "/api/v3";

/// Default Sonarr address
const DEFAULT_BASE_URL: &str = "http://localhost:8989";

/// Configuration for the Sonarr HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL of the Sonarr instance, including port (default: `http://localhost:8989`)
    pub base_url: String,
    /// API key from Sonarr's general settings
    pub api_key: String,
    /// Request timeout in seconds (default: none)
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: None,
        }
    }
}

/// HTTP client for a Sonarr instance
///
/// Maps transport failures and error statuses to
/// `DubarrError::ServiceUnavailable`, 404 to `DubarrError::NotFound` and
/// undecodable bodies to `DubarrError::ParseError`.
#[derive(Debug, Clone)]
pub struct SonarrClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Root URL without trailing slash
    base_url: String,
}

impl SonarrClient {
    /// Create a new client with custom configuration
    ///
    /// # Arguments
    /// * `config` - Client configuration
    ///
    /// # Errors
    /// - `DubarrError::InvalidConfig` - base URL is not http(s) or the API
    ///   key cannot be sent as a header
    /// - `DubarrError::ServiceUnavailable` - the HTTP client cannot be built
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(DubarrError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got {:?}",
                config.base_url
            )));
        }

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            DubarrError::InvalidConfig("API key contains invalid characters".to_string())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// Root URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET an API path and decode the JSON body
    async fn get_json<T>(&self, path: &str, query: &[(&str, i64)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        debug!(%url, ?query, "sonarr request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(DubarrError::NotFound(url));
        }

        warn!(%url, %status, "sonarr request failed");
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DubarrError::ServiceUnavailable(format!(
                "API key rejected ({status})"
            )));
        }
        Err(DubarrError::ServiceUnavailable(format!(
            "{status} from {url}"
        )))
    }
}

#[async_trait]
impl MediaLibrary for SonarrClient {
    async fn list_series(&self) -> Result<Vec<SeriesSummary>> {
        self.get_json("/series", &[]).await
    }

    async fn list_episode_infos(&self, series_id: i64) -> Result<Vec<EpisodeInfo>> {
        if series_id <= 0 {
            return Err(DubarrError::InvalidId(series_id));
        }
        self.get_json("/episode", &[("seriesId", series_id)]).await
    }

    async fn list_episode_files(&self, series_id: i64) -> Result<Vec<EpisodeFile>> {
        if series_id <= 0 {
            return Err(DubarrError::InvalidId(series_id));
        }
        self.get_json("/episodefile", &[("seriesId", series_id)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SonarrClient {
        SonarrClient::with_config(ClientConfig {
            base_url: format!("{}/", server.uri()),
            api_key: "secret".to_string(),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8989");
        assert!(config.api_key.is_empty());
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = SonarrClient::with_config(ClientConfig {
            base_url: "https://sonarr.example.com/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "https://sonarr.example.com");
    }

    #[test]
    fn test_client_rejects_bad_scheme() {
        let result = SonarrClient::with_config(ClientConfig {
            base_url: "sonarr.local:8989".to_string(),
            ..ClientConfig::default()
        });
        assert!(matches!(result, Err(DubarrError::InvalidConfig(_))));
    }

    #[test]
    fn test_client_rejects_bad_api_key() {
        let result = SonarrClient::with_config(ClientConfig {
            api_key: "line\nbreak".to_string(),
            ..ClientConfig::default()
        });
        assert!(matches!(result, Err(DubarrError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_list_series_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/series"))
            .and(header("X-Api-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "One", "seriesType": "anime", "added": "2022-05-01T00:00:00Z"},
                {"id": 2, "title": "Two", "seriesType": "standard", "added": "2021-05-01T00:00:00Z"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let series = client_for(&server).list_series().await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].title, "One");
    }

    #[tokio::test]
    async fn test_list_episode_infos_uses_series_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/episode"))
            .and(query_param("seriesId", "39"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 5, "seriesId": 39, "seasonNumber": 1, "episodeNumber": 1,
                 "title": "Asteroid Blues", "hasFile": true, "episodeFileId": 100}
            ])))
            .mount(&server)
            .await;

        let infos = client_for(&server).list_episode_infos(39).await.unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].episode_file_id, 100);
    }

    #[tokio::test]
    async fn test_list_episode_files_reads_audio_languages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/episodefile"))
            .and(query_param("seriesId", "39"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 100, "seriesId": 39, "mediaInfo": {"audioLanguages": "eng/jpn"}}
            ])))
            .mount(&server)
            .await;

        let files = client_for(&server).list_episode_files(39).await.unwrap();
        assert_eq!(
            files[0].media_info.as_ref().map(|m| m.audio_languages.as_str()),
            Some("eng/jpn")
        );
    }

    #[tokio::test]
    async fn test_server_error_is_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/series"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).list_series().await;
        assert!(matches!(result, Err(DubarrError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unauthorized_is_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        match client_for(&server).list_series().await {
            Err(DubarrError::ServiceUnavailable(msg)) => assert!(msg.contains("API key")),
            other => panic!("Expected ServiceUnavailable error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).list_episode_infos(7).await;
        assert!(matches!(result, Err(DubarrError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).list_series().await;
        assert!(matches!(result, Err(DubarrError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_service_unavailable() {
        let client = SonarrClient::with_config(ClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: "secret".to_string(),
            timeout_secs: Some(2),
        })
        .unwrap();
        let result = client.list_series().await;
        assert!(matches!(result, Err(DubarrError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_invalid_series_id() {
        let client = SonarrClient::with_config(ClientConfig::default()).unwrap();
        let result = client.list_episode_files(0).await;
        match result {
            Err(DubarrError::InvalidId(id)) => assert_eq!(id, 0),
            _ => panic!("Expected InvalidId error"),
        }
    }
}
