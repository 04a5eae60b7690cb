use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait};
use serde::Deserialize;
use tracing::{debug, error};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::equipment::{self, Model};
use crate::SharedState;

pub struct WebError {
    status: StatusCode,
    message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: String) -> Self {
        WebError { status, message }
    }

    pub fn not_found(message: String) -> Self {
        WebError {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        let mut response = axum::response::Response::new(body.to_string().into());
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

impl From<DbErr> for WebError {
    fn from(err: DbErr) -> Self {
        WebError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Database error: {:?}", err),
        }
    }
}

impl From<serde_json::Error> for WebError {
    fn from(err: serde_json::Error) -> Self {
        WebError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Serialization error: {:?}", err),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEquipment {
    pub name: String,
    pub manufacturer: Option<String>,
    pub notes: Option<String>,
}

/// Register an equipment item
/// POST /api/v1/equipment
#[utoipa::path(
    post,
    path = "/api/v1/equipment",
    request_body = CreateEquipment,
    responses((status = 200, body = Model))
)]
pub async fn post_equipment(
    State(state): State<SharedState>,
    Json(request): Json<CreateEquipment>,
) -> Result<Json<equipment::Model>, WebError> {
    let new_equipment = equipment::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(request.name),
        manufacturer: Set(request.manufacturer),
        notes: Set(request.notes),
        created_at: Set(Utc::now()),
    };

    let saved = new_equipment
        .insert(&state.read().await.conn)
        .await
        .inspect_err(|err| error!("Failed to save equipment: {:?}", err))?;

    debug!("Created equipment {}", saved.id);

    Ok(Json(saved))
}

/// Pulls one equipment item from storage.
/// GET /api/v1/equipment/{id}
#[utoipa::path(
    get,
    path = "/api/v1/equipment/{id}",
    params(("id" = Uuid, Path, description = "Equipment identifier")),
    responses(
        (status = 200, body = Model),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<equipment::Model>, WebError> {
    equipment::Entity::find_by_id(id)
        .one(&state.read().await.conn)
        .await?
        .map(Json)
        .ok_or_else(|| WebError::not_found(format!("Equipment {} not found", id)))
}

/// List all equipment items
/// GET /api/v1/equipment
#[utoipa::path(
    get,
    path = "/api/v1/equipment",
    responses((status = 200, body = Vec<Model>))
)]
pub async fn list_equipment(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Model>>, WebError> {
    let items = equipment::Entity::find()
        .all(&state.read().await.conn)
        .await
        .inspect_err(|err| error!("Failed to list equipment: {:?}", err))?;

    Ok(Json(items))
}
