//! Catalog client against a local stub of the bundle API.
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use gsim_common::error::GsimError;
use gsim_common::model::Release;
use gsim_net::api::{BundleCatalog, BundleRegistry, API_KEY_HEADER, SUBSCRIPTION_KEY_HEADER, TOKEN_HEADER};
use tokio::net::TcpListener;

async fn bundle_types(headers: HeaderMap) -> impl IntoResponse {
    // The real catalog rejects unauthenticated callers; mirror that so the
    // client's default headers are actually exercised.
    if headers.get(API_KEY_HEADER).is_none()
        || headers.get(SUBSCRIPTION_KEY_HEADER).is_none()
        || headers.get(TOKEN_HEADER).is_none()
    {
        return (StatusCode::UNAUTHORIZED, "missing credentials").into_response();
    }
    let body = serde_json::json!([
        {"id": "1", "name": "41.x_Main-App-P25-Win_master", "description": "newest"},
        {"id": "2", "name": "40.x_Main-App-P30-Win_master", "description": ""}
    ]);
    axum::Json(body).into_response()
}

async fn latest_release(Path(name): Path<String>) -> impl IntoResponse {
    if name == "Empty-Index" {
        return axum::Json(serde_json::json!([])).into_response();
    }
    if name == "Broken-Index" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "index offline").into_response();
    }
    axum::Json(serde_json::json!([{"id": "build-77", "blob": "abc123"}])).into_response()
}

async fn start_server() -> SocketAddr {
    let app = Router::new()
        .route("/bundles/types", get(bundle_types))
        .route("/bundles/indexes/{name}", get(latest_release));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn authed_headers() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(API_KEY_HEADER, "fruit-pie".parse().unwrap());
    headers.insert(SUBSCRIPTION_KEY_HEADER, "sub-key".parse().unwrap());
    headers.insert(TOKEN_HEADER, "tok".parse().unwrap());
    headers
}

fn registry(addr: SocketAddr, headers: reqwest::header::HeaderMap) -> BundleRegistry {
    BundleRegistry::with_base_url(
        &format!("http://{addr}"),
        Duration::from_secs(2),
        headers,
    )
    .unwrap()
}

#[tokio::test]
async fn bundle_types_are_listed_with_auth_headers() {
    let addr = start_server().await;
    let catalog = registry(addr, authed_headers());

    let types = catalog.bundle_types().await.unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(types[0].name, "41.x_Main-App-P25-Win_master");
    assert_eq!(types[0].description, "newest");
}

#[tokio::test]
async fn missing_credentials_surface_as_an_api_error() {
    let addr = start_server().await;
    // No client-side validation: the request goes out bare and the server's
    // 401 comes back as an API error.
    let catalog = registry(addr, reqwest::header::HeaderMap::new());

    let err = catalog.bundle_types().await.unwrap_err();
    assert!(matches!(err, GsimError::Api(msg) if msg.contains("401")));
}

#[tokio::test]
async fn latest_release_returns_the_single_entry() {
    let addr = start_server().await;
    let catalog = registry(addr, authed_headers());

    let release = catalog.latest_release("40.x_Main-App-P25-Win_master").await.unwrap();
    assert_eq!(release.id, "build-77");
    assert_eq!(release.blob, "abc123");
}

#[tokio::test]
async fn empty_index_is_not_found() {
    let addr = start_server().await;
    let catalog = registry(addr, authed_headers());

    let err = catalog.latest_release("Empty-Index").await.unwrap_err();
    assert!(matches!(err, GsimError::NotFound(_)));
}

#[tokio::test]
async fn server_error_is_an_api_error() {
    let addr = start_server().await;
    let catalog = registry(addr, authed_headers());

    let err = catalog.latest_release("Broken-Index").await.unwrap_err();
    assert!(matches!(err, GsimError::Api(_)));
}

#[tokio::test]
async fn blob_reference_is_joined_with_the_base_url() {
    let addr = start_server().await;
    let catalog = registry(addr, authed_headers());
    let release = Release {
        id: "build-77".to_string(),
        blob: "abc123".to_string(),
    };
    assert_eq!(
        catalog.blob_url(&release),
        format!("http://{addr}/bundles/blob/abc123")
    );
}
