pub mod cli;
pub mod entity;
pub mod equipment;
pub mod files;
pub mod logging;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod storage;
#[cfg(test)]
mod tests;

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{header, Response, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use equipment::{get_equipment, list_equipment, post_equipment};
use files::{
    delete_file, download_file, get_file, list_files, list_files_by_type, update_file_info,
    upload_file,
};
use sea_orm::DatabaseConnection;
use std::{borrow::Cow, path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tower::{BoxError, ServiceBuilder};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::error;

use crate::{
    cli::{db_path_default, CliOpts},
    logging::logging_layer,
    storage::DBError,
};

pub type SharedState = Arc<RwLock<AppState>>;

pub struct AppState {
    pub conn: DatabaseConnection,
}

impl AppState {
    pub async fn new(cli: &CliOpts) -> Result<Self, DBError> {
        let conn =
            storage::new(&cli.db_path.clone().unwrap_or(PathBuf::from(db_path_default()))).await?;
        Ok(Self { conn })
    }

    /// In-memory database, for tests and local experiments.
    pub async fn ephemeral() -> Result<Self, DBError> {
        let conn = storage::start_db(None).await?;
        Ok(Self { conn })
    }
}

pub fn build_app<T>(shared_state: &SharedState) -> Router<T> {
    // Build our application by composing routes
    let router = Router::new()
        .route("/api/v1/equipment", post(post_equipment).get(list_equipment))
        .route("/api/v1/equipment/{id}", get(get_equipment))
        .route(
            "/api/v1/equipment/{id}/files",
            get(list_files)
                .post(upload_file)
                .layer(DefaultBodyLimit::max(100 * 1024 * 1024)), // 100MB limit
        )
        .route(
            "/api/v1/equipment/{id}/files/{file_type}",
            get(list_files_by_type),
        )
        .route(
            "/api/v1/files/{id}",
            get(get_file).put(update_file_info).delete(delete_file),
        )
        .route("/api/v1/files/{id}/download", get(download_file))
        .merge(openapi::api_route());

    router
        // Add middleware to all routes
        .layer(
            ServiceBuilder::new()
                // Handle errors from middleware
                .layer(middleware::corslayer())
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    |response: &Response<Body>| {
                        if response.status() == StatusCode::OK {
                            "private, no-transform max-age=0".parse().ok()
                        } else {
                            None
                        }
                    },
                ))
                .layer(HandleErrorLayer::new(handle_error))
                .load_shed()
                .concurrency_limit(1024)
                .timeout(Duration::from_secs(10))
                .layer(logging_layer()),
        )
        .with_state(shared_state.clone())
}

async fn handle_error(error: BoxError) -> impl IntoResponse {
    if error.is::<tower::timeout::error::Elapsed>() {
        return (StatusCode::REQUEST_TIMEOUT, Cow::from("request timed out"));
    }

    if error.is::<tower::load_shed::error::Overloaded>() {
        let msg = "service is overloaded, try again later";
        error!("{}", msg);
        return (StatusCode::SERVICE_UNAVAILABLE, Cow::from(msg));
    }

    let msg = format!("Unhandled internal error: {error}");
    error!("{}", msg);
    (StatusCode::INTERNAL_SERVER_ERROR, Cow::from(msg))
}

#[tokio::test]
async fn test_handle_error() {
    let err = tower::timeout::error::Elapsed::new();
    let res = handle_error(Box::new(err)).await.into_response();
    let expected = (StatusCode::REQUEST_TIMEOUT, Cow::from("request timed out")).into_response();

    assert_eq!(res.status(), expected.status());

    let err = tower::load_shed::error::Overloaded::new();
    let res = handle_error(Box::new(err)).await.into_response();
    let expected = (
        StatusCode::SERVICE_UNAVAILABLE,
        Cow::from("service is overloaded, try again later"),
    )
        .into_response();

    assert_eq!(res.status(), expected.status());
}
