//! Typed client for the file endpoints.
//!
//! Every operation is stateless and propagates failures unchanged; the
//! flow components above decide how to present them.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::error;
use uuid::Uuid;

use equiptrack_shared::file::{EquipmentFile, UpdateFileInfo};
use equiptrack_shared::file_type::FileType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network-level failure; no response was produced
    Transport(String),
    /// Non-2xx response, message taken from the structured `error` field
    /// when the body carries one
    Server { status: u16, message: String },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(message) => write!(f, "{}", message),
            ApiError::Server { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Everything needed to submit one file.
#[derive(Debug, Clone)]
pub struct FileUploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub file_type: FileType,
    pub description: Option<String>,
}

/// The service operations the flow components depend on. Splitting this
/// from the concrete client keeps the state machines testable without a
/// server.
#[async_trait]
pub trait FileApi: Send + Sync {
    async fn list_files(&self, equipment_id: Uuid) -> Result<Vec<EquipmentFile>, ApiError>;

    async fn list_files_by_type(
        &self,
        equipment_id: Uuid,
        file_type: FileType,
    ) -> Result<Vec<EquipmentFile>, ApiError>;

    async fn upload_file(
        &self,
        equipment_id: Uuid,
        upload: FileUploadRequest,
    ) -> Result<EquipmentFile, ApiError>;

    async fn get_file(&self, file_id: Uuid) -> Result<EquipmentFile, ApiError>;

    async fn update_file_info(
        &self,
        file_id: Uuid,
        changes: UpdateFileInfo,
    ) -> Result<EquipmentFile, ApiError>;

    async fn delete_file(&self, file_id: Uuid) -> Result<serde_json::Value, ApiError>;
}

pub struct EquipmentFileService {
    base_url: String,
    client: reqwest::Client,
}

impl EquipmentFileService {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:8379/api/v1`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Link target for downloads and image previews. Pure; no request is
    /// made here. A missing id yields an empty string so the caller can
    /// bind it to a link unconditionally.
    pub fn download_url(&self, file_id: Option<Uuid>) -> String {
        match file_id {
            None => String::new(),
            Some(id) => format!("{}/files/{}/download", self.base_url, id),
        }
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: server_message(status.as_u16(), &body),
            });
        }
        response.json::<T>().await.map_err(transport)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        let response = self.client.get(&url).send().await.map_err(transport)?;
        Self::read(response).await
    }
}

/// Pick the most useful message out of an error response body.
fn server_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl FileApi for EquipmentFileService {
    async fn list_files(&self, equipment_id: Uuid) -> Result<Vec<EquipmentFile>, ApiError> {
        let url = format!("{}/equipment/{}/files", self.base_url, equipment_id);
        self.get_json(url)
            .await
            .inspect_err(|err| error!("Failed to list files for {}: {}", equipment_id, err))
    }

    async fn list_files_by_type(
        &self,
        equipment_id: Uuid,
        file_type: FileType,
    ) -> Result<Vec<EquipmentFile>, ApiError> {
        let url = format!(
            "{}/equipment/{}/files/{}",
            self.base_url,
            equipment_id,
            file_type.as_tag()
        );
        self.get_json(url).await.inspect_err(|err| {
            error!(
                "Failed to list {} files for {}: {}",
                file_type.as_tag(),
                equipment_id,
                err
            )
        })
    }

    async fn upload_file(
        &self,
        equipment_id: Uuid,
        upload: FileUploadRequest,
    ) -> Result<EquipmentFile, ApiError> {
        let url = format!("{}/equipment/{}/files", self.base_url, equipment_id);

        let part = reqwest::multipart::Part::bytes(upload.data)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(transport)?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("file_type", upload.file_type.as_tag());
        // never send an empty description field
        if let Some(description) = upload.description.filter(|d| !d.is_empty()) {
            form = form.text("description", description);
        }

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)
            .inspect_err(|err| error!("Failed to upload file to {}: {}", equipment_id, err))?;

        Self::read(response)
            .await
            .inspect_err(|err| error!("Failed to upload file to {}: {}", equipment_id, err))
    }

    async fn get_file(&self, file_id: Uuid) -> Result<EquipmentFile, ApiError> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        self.get_json(url)
            .await
            .inspect_err(|err| error!("Failed to get file {}: {}", file_id, err))
    }

    async fn update_file_info(
        &self,
        file_id: Uuid,
        changes: UpdateFileInfo,
    ) -> Result<EquipmentFile, ApiError> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        let response = self
            .client
            .put(&url)
            .json(&changes)
            .send()
            .await
            .map_err(transport)
            .inspect_err(|err| error!("Failed to update file {}: {}", file_id, err))?;
        Self::read(response)
            .await
            .inspect_err(|err| error!("Failed to update file {}: {}", file_id, err))
    }

    async fn delete_file(&self, file_id: Uuid) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(transport)
            .inspect_err(|err| error!("Failed to delete file {}: {}", file_id, err))?;
        Self::read(response)
            .await
            .inspect_err(|err| error!("Failed to delete file {}: {}", file_id, err))
    }
}
