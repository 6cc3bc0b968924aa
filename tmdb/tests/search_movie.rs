//! HTTP-level tests for the TMDB catalog against a local mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use movie_search_core::{CatalogError, MovieCatalog};
use movie_search_tmdb::{Credentials, TmdbCatalog, TmdbConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn batman_page() -> serde_json::Value {
    json!({
        "page": 1,
        "results": [
            { "id": 268, "title": "Batman", "release_date": "1989-06-21", "vote_average": 7.2 },
            { "id": 272, "title": "Batman Begins", "release_date": "2005-06-10", "vote_average": 7.7 }
        ],
        "total_pages": 5,
        "total_results": 97
    })
}

fn catalog(server: &MockServer, credentials: Credentials) -> TmdbCatalog {
    TmdbCatalog::new(
        TmdbConfig::new(credentials)
            .with_base_url(server.uri())
            .with_timeout(Duration::from_secs(2)),
    )
}

#[tokio::test]
async fn test_search_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "batman"))
        .and(query_param("page", "1"))
        .and(query_param("api_key", "secret"))
        .and(query_param("include_adult", "false"))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(batman_page()))
        .expect(1)
        .mount(&server)
        .await;

    let page = catalog(&server, Credentials::ApiKey("secret".into()))
        .search_movies("batman", 1)
        .await
        .unwrap();

    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 5);
    assert_eq!(page.total_results, 97);
    let titles: Vec<_> = page.results.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Batman", "Batman Begins"]);
}

#[tokio::test]
async fn test_search_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(header("authorization", "Bearer tok"))
        .and(query_param_is_missing("api_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(batman_page()))
        .expect(1)
        .mount(&server)
        .await;

    let page = catalog(&server, Credentials::Bearer("tok".into()))
        .search("batman", 1)
        .await
        .unwrap();

    assert_eq!(page.results.len(), 2);
}

#[tokio::test]
async fn test_status_mapping() {
    let server = MockServer::start().await;
    Mock::given(path("/search/movie"))
        .and(query_param("query", "locked"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(path("/search/movie"))
        .and(query_param("query", "busy"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(path("/search/movie"))
        .and(query_param("query", "down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let catalog = catalog(&server, Credentials::ApiKey("k".into()));

    assert_eq!(catalog.search("locked", 1).await.unwrap_err(), CatalogError::Unauthorized);
    assert_eq!(catalog.search("busy", 1).await.unwrap_err(), CatalogError::RateLimited);
    assert_eq!(
        catalog.search("down", 1).await.unwrap_err(),
        CatalogError::Api {
            status: 503,
            message: "maintenance".into()
        }
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(path("/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "page": "one" })))
        .mount(&server)
        .await;

    let error = catalog(&server, Credentials::ApiKey("k".into()))
        .search("anything", 1)
        .await
        .unwrap_err();

    assert!(matches!(error, CatalogError::ResponseParseFailed(_)));
}

#[tokio::test]
async fn test_unreachable_server() {
    // Mock servers are pooled and keep listening after drop, so free a port directly
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let catalog = TmdbCatalog::new(
        TmdbConfig::new(Credentials::ApiKey("k".into()))
            .with_base_url(format!("http://127.0.0.1:{port}"))
            .with_timeout(Duration::from_millis(500)),
    );

    let error = catalog.search("anything", 1).await.unwrap_err();
    assert!(matches!(error, CatalogError::RequestFailed(_)));
}
