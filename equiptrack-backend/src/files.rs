use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel, TryIntoModel,
};
use std::io::{Read, Write};
use tracing::{debug, error};
use uuid::Uuid;

use equiptrack_shared::file::{EquipmentFile, UpdateFileInfo};
use equiptrack_shared::file_type::FileType;

use crate::entity::{equipment, equipment_file};
use crate::{equipment::WebError, SharedState};

fn parse_file_type(tag: &str) -> Result<FileType, WebError> {
    FileType::parse(tag).ok_or_else(|| {
        WebError::new(
            StatusCode::BAD_REQUEST,
            format!("Unknown file type: {}", tag),
        )
    })
}

/// Upload a file for an equipment item
/// POST /api/v1/equipment/{id}/files
#[utoipa::path(
    post,
    path = "/api/v1/equipment/{id}/files",
    params(("id" = Uuid, Path, description = "Equipment identifier")),
    responses(
        (status = 200, body = EquipmentFile),
        (status = 400, description = "Malformed multipart body or unknown file type"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn upload_file(
    State(state): State<SharedState>,
    Path(equipment_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<EquipmentFile>, WebError> {
    let conn = &state.read().await.conn;

    debug!("Starting file upload for equipment {}", equipment_id);

    equipment::Entity::find_by_id(equipment_id)
        .one(conn)
        .await?
        .ok_or_else(|| WebError::not_found(format!("Equipment {} not found", equipment_id)))?;

    // Extract the parts from the multipart form data
    let mut file_name = None;
    let mut content_type = None;
    let mut data = None;
    let mut file_type = None;
    let mut description = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart field: {:?}", e);
        WebError::new(
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart field: {}", e),
        )
    })? {
        let field_name = field.name().unwrap_or("").to_string();
        debug!("Processing field: {}", field_name);

        match field_name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|s| s.to_string());
                debug!(
                    "File name: {:?}, content type: {:?}",
                    file_name, content_type
                );

                data = Some(field.bytes().await.map_err(|e| {
                    error!("Failed to read file data: {:?}", e);
                    WebError::new(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read file data: {}", e),
                    )
                })?);
            }
            "file_type" => {
                let tag = field.text().await.map_err(|e| {
                    WebError::new(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read file_type field: {}", e),
                    )
                })?;
                file_type = Some(parse_file_type(&tag)?);
            }
            "description" => {
                let text = field.text().await.map_err(|e| {
                    WebError::new(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read description field: {}", e),
                    )
                })?;
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            _ => {
                debug!("Ignoring unknown multipart field: {}", field_name);
            }
        }
    }

    let file_name = file_name.ok_or_else(|| {
        WebError::new(
            StatusCode::BAD_REQUEST,
            "Missing filename in upload".to_string(),
        )
    })?;

    let file_type = file_type.ok_or_else(|| {
        WebError::new(
            StatusCode::BAD_REQUEST,
            "Missing file_type in upload".to_string(),
        )
    })?;

    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let file_data = data
        .ok_or_else(|| {
            WebError::new(
                StatusCode::BAD_REQUEST,
                "Missing file data in upload".to_string(),
            )
        })?
        .to_vec();

    // Compress data with gzip
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&file_data).map_err(|e| {
        WebError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to compress file data: {}", e),
        )
    })?;
    let compressed_data = encoder.finish().map_err(|e| {
        WebError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to finish compression: {}", e),
        )
    })?;

    let file_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let new_file = equipment_file::ActiveModel {
        id: Set(file_id),
        equipment_id: Set(equipment_id),
        file_type: Set(file_type),
        file_name: Set(file_name.clone()),
        content_type: Set(content_type.clone()),
        size: Set(file_data.len() as i64),
        description: Set(description),
        data: Set(compressed_data),
        created_at: Set(now),
    };

    let saved = new_file.insert(conn).await.map_err(|e| {
        error!("Failed to save file: {:?}", e);
        WebError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to save file: {}", e),
        )
    })?;

    debug!(
        "Created file {} ({}) for equipment {}",
        file_id,
        file_type.as_tag(),
        equipment_id
    );

    Ok(Json(saved.into()))
}

/// List all files for an equipment item
/// GET /api/v1/equipment/{id}/files
#[utoipa::path(
    get,
    path = "/api/v1/equipment/{id}/files",
    params(("id" = Uuid, Path, description = "Equipment identifier")),
    responses((status = 200, body = Vec<EquipmentFile>))
)]
pub async fn list_files(
    State(state): State<SharedState>,
    Path(equipment_id): Path<Uuid>,
) -> Result<Json<Vec<EquipmentFile>>, WebError> {
    let conn = &state.read().await.conn;

    let files = equipment_file::file_list(equipment_id, None)
        .all(conn)
        .await
        .inspect_err(|err| error!("Failed to list files: {:?}", err))?;

    debug!(
        "Listed {} files for equipment {}",
        files.len(),
        equipment_id
    );

    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// List files of one category for an equipment item
/// GET /api/v1/equipment/{id}/files/{file_type}
#[utoipa::path(
    get,
    path = "/api/v1/equipment/{id}/files/{file_type}",
    params(
        ("id" = Uuid, Path, description = "Equipment identifier"),
        ("file_type" = String, Path, description = "File category tag")
    ),
    responses(
        (status = 200, body = Vec<EquipmentFile>),
        (status = 400, description = "Unknown file type")
    )
)]
pub async fn list_files_by_type(
    State(state): State<SharedState>,
    Path((equipment_id, file_type)): Path<(Uuid, String)>,
) -> Result<Json<Vec<EquipmentFile>>, WebError> {
    let conn = &state.read().await.conn;
    let file_type = parse_file_type(&file_type)?;

    let files = equipment_file::file_list(equipment_id, Some(file_type))
        .all(conn)
        .await
        .inspect_err(|err| error!("Failed to list files: {:?}", err))?;

    debug!(
        "Listed {} {} files for equipment {}",
        files.len(),
        file_type.as_tag(),
        equipment_id
    );

    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// Fetch one file record (metadata only)
/// GET /api/v1/files/{id}
#[utoipa::path(
    get,
    path = "/api/v1/files/{id}",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, body = EquipmentFile),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(state): State<SharedState>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<EquipmentFile>, WebError> {
    let conn = &state.read().await.conn;

    let file = equipment_file::Entity::find_by_id(file_id)
        .one(conn)
        .await
        .inspect_err(|err| error!("Failed to get file: {:?}", err))?
        .ok_or_else(|| WebError::not_found(format!("File {} not found", file_id)))?;

    Ok(Json(file.into()))
}

/// Update file metadata; the category is immutable through this surface
/// PUT /api/v1/files/{id}
#[utoipa::path(
    put,
    path = "/api/v1/files/{id}",
    params(("id" = Uuid, Path, description = "File identifier")),
    request_body = UpdateFileInfo,
    responses(
        (status = 200, body = EquipmentFile),
        (status = 404, description = "File not found")
    )
)]
pub async fn update_file_info(
    State(state): State<SharedState>,
    Path(file_id): Path<Uuid>,
    Json(changes): Json<UpdateFileInfo>,
) -> Result<Json<EquipmentFile>, WebError> {
    let conn = &state.read().await.conn;

    let file = equipment_file::Entity::find_by_id(file_id)
        .one(conn)
        .await?
        .ok_or_else(|| WebError::not_found(format!("File {} not found", file_id)))?;

    let mut file = file.into_active_model();
    if let Some(file_name) = changes.file_name {
        file.file_name = Set(file_name);
    }
    if let Some(description) = changes.description {
        // an empty string clears the description
        file.description = Set(if description.is_empty() {
            None
        } else {
            Some(description)
        });
    }

    let updated = file
        .update(conn)
        .await
        .inspect_err(|err| error!("Failed to update file: {:?}", err))?
        .try_into_model()?;

    Ok(Json(updated.into()))
}

/// Delete a file
/// DELETE /api/v1/files/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/files/{id}",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses((status = 200, description = "Ack payload"))
)]
pub async fn delete_file(
    State(state): State<SharedState>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, WebError> {
    let conn = &state.read().await.conn;

    // Just attempt deletion, don't validate if it exists
    equipment_file::Entity::delete_by_id(file_id)
        .exec(conn)
        .await
        .map_err(|e| {
            error!("Failed to delete file: {:?}", e);
            WebError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to delete file: {}", e),
            )
        })?;

    debug!("Deleted file {}", file_id);

    Ok(Json(serde_json::json!({
        "message": "File deleted",
        "id": file_id,
    })))
}

/// Download the file payload
/// GET /api/v1/files/{id}/download
#[utoipa::path(
    get,
    path = "/api/v1/files/{id}/download",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "Raw file bytes"),
        (status = 404, description = "File not found")
    )
)]
pub async fn download_file(
    State(state): State<SharedState>,
    Path(file_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let conn = &state.read().await.conn;

    let file = equipment_file::Entity::find_by_id(file_id)
        .one(conn)
        .await
        .inspect_err(|err| error!("Failed to get file: {:?}", err))?
        .ok_or_else(|| WebError::not_found(format!("File {} not found", file_id)))?;

    // Decompress data
    let mut decoder = GzDecoder::new(&file.data[..]);
    let mut decompressed_data = Vec::new();
    decoder.read_to_end(&mut decompressed_data).map_err(|e| {
        WebError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to decompress file data: {}", e),
        )
    })?;

    debug!("Downloading file {} ({})", file_id, file.file_name);

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", file.content_type.as_str()),
            (
                "Content-Disposition",
                &format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        decompressed_data,
    )
        .into_response())
}
