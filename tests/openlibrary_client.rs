use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::{Query, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use booksearch_app::books::{
    client::{ClientConfig, FetchError, OpenLibraryClient, SearchClient},
    models::{SearchForm, SearchType},
    query::{build_params, SearchParams},
};
use serde_json::json;

/// What the stub server saw on its last `/search.json` request.
#[derive(Default)]
struct Seen {
    query: HashMap<String, String>,
    user_agent: Option<String>,
}

type Shared = Arc<Mutex<Seen>>;

async fn search_json(
    State(seen): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let mut seen = seen.lock().unwrap();
    seen.query = query;
    seen.user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    Json(json!({
        "numFound": 2,
        "docs": [{ "title": "Tehanu" }, { "title": "Tales from Earthsea" }]
    }))
}

async fn stub_server() -> (SocketAddr, Shared) {
    let seen = Shared::default();
    let app = Router::new()
        .route("/search.json", get(search_json))
        .route(
            "/broken",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route("/garbage", get(|| async { "<html>not json</html>" }))
        .route("/null", get(|| async { "null" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        )
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, seen)
}

fn client(addr: SocketAddr, path: &str, timeout: Duration) -> OpenLibraryClient {
    OpenLibraryClient::new(ClientConfig {
        search_url: format!("http://{}{}", addr, path),
        user_agent: "BookSearchApp/1.0".to_string(),
        timeout,
    })
    .unwrap()
}

fn params() -> SearchParams {
    let request = SearchForm::new("Le Guin", SearchType::Author, 2)
        .into_request()
        .unwrap();
    build_params(&request)
}

#[tokio::test]
async fn sends_parameters_and_user_agent() {
    let (addr, seen) = stub_server().await;
    let client = client(addr, "/search.json", Duration::from_secs(5));

    let payload = client.fetch(&params()).await.unwrap();

    assert_eq!(payload.total_found(), 2);
    assert_eq!(payload.docs()[1].title(), "Tales from Earthsea");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.query.get("author").map(String::as_str), Some("Le Guin"));
    assert_eq!(seen.query.get("limit").map(String::as_str), Some("2"));
    assert!(seen.query["fields"].starts_with("key,title,author_name"));
    assert!(!seen.query.contains_key("title"));
    assert_eq!(seen.user_agent.as_deref(), Some("BookSearchApp/1.0"));
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let (addr, _) = stub_server().await;
    let client = client(addr, "/broken", Duration::from_secs(5));

    let err = client.fetch(&params()).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(ref detail) if detail.contains("503")));
    assert!(err.to_string().starts_with("Error fetching data from API: "));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, "/search.json", Duration::from_secs(5))
        .fetch(&params())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn non_json_body_is_a_parse_error() {
    let (addr, _) = stub_server().await;
    let client = client(addr, "/garbage", Duration::from_secs(5));

    let err = client.fetch(&params()).await.unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn null_body_is_an_empty_payload() {
    let (addr, _) = stub_server().await;
    let client = client(addr, "/null", Duration::from_secs(5));

    let payload = client.fetch(&params()).await.unwrap();

    assert!(payload.docs().is_empty());
    assert_eq!(payload.total_found(), 0);
}

#[tokio::test]
async fn slow_upstream_is_a_timeout() {
    let (addr, _) = stub_server().await;
    let client = client(addr, "/slow", Duration::from_millis(200));

    let err = client.fetch(&params()).await.unwrap_err();

    assert_eq!(err, FetchError::Timeout);
}
