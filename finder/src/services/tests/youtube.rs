//! Tests for the YouTube search service

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::FinderConfig;
use crate::error::FinderError;
use crate::services::youtube::YoutubeSearch;
use crate::traits::VideoSearch;

fn search_for(server: &MockServer) -> YoutubeSearch {
    let config = FinderConfig::default()
        .with_api_key("test-key")
        .with_base_url(server.uri());
    YoutubeSearch::new(config).unwrap()
}

fn search_body() -> serde_json::Value {
    json!({
        "items": [
            {
                "id": { "videoId": "vid-1" },
                "snippet": { "title": "Dancing Queen - Karaoke Version", "channelTitle": "Sing King" }
            },
            {
                "id": { "videoId": "vid-2" },
                "snippet": { "title": "Dancing Queen (Live)", "channelTitle": "Random Channel" }
            },
            {
                "id": { "channelId": "not-a-video" },
                "snippet": { "title": "Some channel", "channelTitle": "Some channel" }
            }
        ]
    })
}

#[tokio::test]
async fn test_missing_api_key_is_config_error() {
    let result = YoutubeSearch::new(FinderConfig::default());
    assert!(matches!(result, Err(FinderError::ConfigError { .. })));
}

#[tokio::test]
async fn test_search_merges_view_counts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "dancing queen karaoke version"))
        .and(query_param("videoEmbeddable", "true"))
        .and(query_param("maxResults", "10"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "vid-1,vid-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "vid-1", "statistics": { "viewCount": "5000000" } }
            ]
        })))
        .mount(&server)
        .await;

    let candidates = search_for(&server).search("dancing queen").await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].external_id, "vid-1");
    assert_eq!(candidates[0].channel_name, "Sing King");
    assert_eq!(candidates[0].view_count, Some(5_000_000));
    assert_eq!(candidates[1].view_count, None);
}

#[tokio::test]
async fn test_empty_search_skips_video_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let candidates = search_for(&server).search("unknown song").await.unwrap();
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn test_http_failure_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = search_for(&server).search("dancing queen").await;
    match result {
        Err(error) => assert!(error.is_transient()),
        Ok(_) => panic!("expected a transient failure"),
    }
}

#[tokio::test]
async fn test_view_count_failure_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = search_for(&server).search("dancing queen").await;
    assert!(matches!(result, Err(FinderError::Transient { .. })));
}

#[tokio::test]
async fn test_unreachable_host_is_transient() {
    let config = FinderConfig::default()
        .with_api_key("test-key")
        .with_base_url("http://127.0.0.1:9");
    let search = YoutubeSearch::new(config).unwrap();

    let result = search.search("dancing queen").await;
    assert!(matches!(result, Err(FinderError::Transient { .. })));
}
