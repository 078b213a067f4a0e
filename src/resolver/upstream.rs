//! Primary platform API integration
//!
//! Resolution is a two-step exchange: the metadata endpoint lists the parts
//! of a video with their content ids, then the playback endpoint turns one
//! content id into direct media URLs.

use crate::{
    Error, Result,
    config::settings::UpstreamSettings,
    types::{PartIndex, PlayUrlResponse, VideoId, ViewResponse},
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Path of the metadata-by-id endpoint
const VIEW_PATH: &str = "/x/web-interface/view";
/// Path of the playback-address endpoint
const PLAY_URL_PATH: &str = "/x/player/playurl";

/// Turns a video identifier and part into a direct media URL
#[async_trait]
pub trait PlaybackProvider: Send + Sync + std::fmt::Debug {
    /// Resolve the direct URL of one part of a video
    async fn resolve(&self, video: &VideoId, part: PartIndex) -> Result<String>;
}

/// Client for the primary platform's public web API
#[derive(Debug, Clone)]
pub struct BilibiliClient {
    /// HTTP client carrying the browser-like identity
    client: Client,
    /// Base URL for the API
    api_base: String,
    /// Requested quality (`qn`)
    quality: u32,
}

impl BilibiliClient {
    /// Create new API client
    pub fn new(client: Client, settings: &UpstreamSettings) -> Self {
        Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            quality: settings.quality,
        }
    }

    /// Content id of the selected part
    pub async fn fetch_cid(&self, video: &VideoId, part: PartIndex) -> Result<u64> {
        let url = format!("{}{}", self.api_base, VIEW_PATH);
        debug!("Fetching part list for {}", video);

        let response = self
            .client
            .get(&url)
            .query(&[("bvid", video.as_str())])
            .send()
            .await?;
        let view: ViewResponse = decode(response, "view").await?;

        let pages = view.pages();
        if pages.is_empty() {
            return Err(Error::not_found(format!(
                "failed to retrieve part info for {}",
                video
            )));
        }

        let page = pages.get(part.offset()).ok_or_else(|| {
            Error::invalid_argument(format!(
                "invalid part index: p={}, video has {} parts",
                part.get(),
                pages.len()
            ))
        })?;

        page.cid
            .filter(|cid| *cid != 0)
            .ok_or_else(|| Error::upstream(format!("failed to get cid for {} {}", video, part)))
    }

    /// First direct URL for a content id
    pub async fn fetch_play_url(&self, video: &VideoId, cid: u64) -> Result<String> {
        let url = format!("{}{}", self.api_base, PLAY_URL_PATH);
        debug!("Fetching playback address for {} cid={}", video, cid);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("bvid", video.as_str().to_string()),
                ("cid", cid.to_string()),
                ("qn", self.quality.to_string()),
                ("otype", "json".to_string()),
                ("platform", "html5".to_string()),
                ("high_quality", "1".to_string()),
            ])
            .send()
            .await?;
        let play: PlayUrlResponse = decode(response, "playurl").await?;

        play.first_url()
            .map(str::to_string)
            .ok_or_else(|| Error::upstream(format!("failed to get direct url for {}", video)))
    }
}

#[async_trait]
impl PlaybackProvider for BilibiliClient {
    async fn resolve(&self, video: &VideoId, part: PartIndex) -> Result<String> {
        let cid = self.fetch_cid(video, part).await?;
        self.fetch_play_url(video, cid).await
    }
}

/// Reject non-success statuses, then decode the JSON body
async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::upstream(format!(
            "{} endpoint returned status {}",
            endpoint, status
        )));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| Error::upstream(format!("{} endpoint returned invalid JSON: {}", endpoint, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BilibiliClient {
        let settings = UpstreamSettings {
            api_base: server.uri(),
            ..UpstreamSettings::default()
        };
        let http = Client::builder()
            .user_agent(settings.user_agent.clone())
            .build()
            .unwrap();
        BilibiliClient::new(http, &settings)
    }

    fn video() -> VideoId {
        VideoId::new("BV1xx411c7mD").unwrap()
    }

    async fn mount_view(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(VIEW_PATH))
            .and(query_param("bvid", "BV1xx411c7mD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_resolve_two_step() {
        let server = MockServer::start().await;
        mount_view(
            &server,
            json!({"code": 0, "data": {"pages": [{"cid": 555, "page": 1}, {"cid": 556, "page": 2}]}}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path(PLAY_URL_PATH))
            .and(query_param("cid", "556"))
            .and(query_param("qn", "116"))
            .and(query_param("platform", "html5"))
            .and(header(
                "user-agent",
                crate::config::settings::DEFAULT_USER_AGENT,
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"code": 0, "data": {"durl": [{"url": "https://x.example/p2.mp4"}]}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let url = client_for(&server)
            .resolve(&video(), PartIndex::new(2).unwrap())
            .await
            .unwrap();
        assert_eq!(url, "https://x.example/p2.mp4");
    }

    #[tokio::test]
    async fn test_empty_part_list() {
        let server = MockServer::start().await;
        mount_view(&server, json!({"code": 0, "data": {"pages": []}})).await;

        let err = client_for(&server)
            .resolve(&video(), PartIndex::FIRST)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("failed to retrieve part info"));
    }

    #[tokio::test]
    async fn test_part_out_of_range() {
        let server = MockServer::start().await;
        mount_view(&server, json!({"data": {"pages": [{"cid": 555}]}})).await;

        let err = client_for(&server)
            .resolve(&video(), PartIndex::new(3).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let message = err.to_string();
        assert!(message.contains("p=3"));
        assert!(message.contains("1 parts"));
    }

    #[tokio::test]
    async fn test_missing_cid() {
        let server = MockServer::start().await;
        mount_view(&server, json!({"data": {"pages": [{"page": 1}]}})).await;

        let err = client_for(&server)
            .resolve(&video(), PartIndex::FIRST)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_missing_direct_url() {
        let server = MockServer::start().await;
        mount_view(&server, json!({"data": {"pages": [{"cid": 555}]}})).await;
        Mock::given(method("GET"))
            .and(path(PLAY_URL_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"durl": [{}]}})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .resolve(&video(), PartIndex::FIRST)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VIEW_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .resolve(&video(), PartIndex::FIRST)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[tokio::test]
    async fn test_http_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VIEW_PATH))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .resolve(&video(), PartIndex::FIRST)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
        assert!(err.to_string().contains("503"));
    }
}
