//! Integration tests for the TMDb trailer client

use cinevault_core::MediaKind;
use cinevault_playback::trailers::{TmdbConfig, TrailerClient, TrailerKind};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TrailerClient {
    TrailerClient::new(TmdbConfig {
        api_key: "tmdb-test-key".to_string(),
        base_url: server.uri(),
        timeout_ms: 2_000,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_trailers_filters_host_and_kind() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "id": 550,
        "results": [
            { "key": "SUXWAEX2jlg", "name": "Official Trailer", "site": "YouTube", "type": "Trailer" },
            { "key": "vimeo123", "name": "Vimeo Cut", "site": "Vimeo", "type": "Trailer" },
            { "key": "bts456", "name": "Behind the Scenes", "site": "YouTube", "type": "Behind the Scenes" },
            { "key": "teaser789", "name": "Teaser", "site": "YouTube", "type": "Teaser" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/movie/550/videos"))
        .and(query_param("api_key", "tmdb-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let trailers = client_for(&mock_server)
        .fetch_trailers(550, MediaKind::Film)
        .await;

    assert_eq!(trailers.len(), 2);
    assert_eq!(trailers[0].key, "SUXWAEX2jlg");
    assert_eq!(trailers[0].kind, TrailerKind::Trailer);
    assert_eq!(
        trailers[0].embed_url,
        "https://www.youtube.com/embed/SUXWAEX2jlg"
    );
    assert_eq!(trailers[1].key, "teaser789");
    assert!(trailers.iter().all(|t| t.key != "vimeo123"));
}

#[tokio::test]
async fn test_series_uses_tv_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tv/1399/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                { "key": "got1", "name": "Season 1", "site": "YouTube", "type": "Trailer" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let trailers = client_for(&mock_server)
        .fetch_trailers(1399, MediaKind::Series)
        .await;

    assert_eq!(trailers.len(), 1);
    assert_eq!(trailers[0].key, "got1");
}

#[tokio::test]
async fn test_error_status_yields_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/1/videos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let trailers = client_for(&mock_server).fetch_trailers(1, MediaKind::Film).await;
    assert!(trailers.is_empty());
}

#[tokio::test]
async fn test_rate_limited_yields_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/2/videos"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let trailers = client_for(&mock_server).fetch_trailers(2, MediaKind::Film).await;
    assert!(trailers.is_empty());
}

#[tokio::test]
async fn test_malformed_body_yields_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/3/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let trailers = client_for(&mock_server).fetch_trailers(3, MediaKind::Film).await;
    assert!(trailers.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_yields_empty_list() {
    let client = TrailerClient::new(TmdbConfig {
        api_key: "k".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_ms: 500,
    })
    .unwrap();

    assert!(client.fetch_trailers(4, MediaKind::Film).await.is_empty());
}
