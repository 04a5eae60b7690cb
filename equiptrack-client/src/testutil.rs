//! Mock transport for exercising the flow components without a server.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use equiptrack_shared::file::{EquipmentFile, UpdateFileInfo};
use equiptrack_shared::file_type::FileType;

use crate::service::{ApiError, FileApi, FileUploadRequest};

pub(crate) fn sample_file(file_type: FileType, file_name: &str) -> EquipmentFile {
    EquipmentFile {
        id: Uuid::new_v4(),
        equipment_id: Uuid::new_v4(),
        file_type,
        file_name: file_name.to_string(),
        content_type: "application/octet-stream".to_string(),
        size: 3,
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap(),
    }
}

/// Scripted [`FileApi`]: queued results are popped per call, and every
/// call is recorded for assertions. An empty queue answers with an empty
/// list / a generic ack so tests only script what they care about.
#[derive(Default)]
pub(crate) struct MockApi {
    calls: Mutex<Vec<String>>,
    list_results: Mutex<VecDeque<Result<Vec<EquipmentFile>, ApiError>>>,
    upload_results: Mutex<VecDeque<Result<EquipmentFile, ApiError>>>,
    delete_results: Mutex<VecDeque<Result<serde_json::Value, ApiError>>>,
    last_upload_description: Mutex<Option<String>>,
}

impl MockApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("list"))
            .collect()
    }

    pub fn queue_list(&self, result: Result<Vec<EquipmentFile>, ApiError>) {
        self.list_results.lock().unwrap().push_back(result);
    }

    pub fn queue_upload(&self, result: Result<EquipmentFile, ApiError>) {
        self.upload_results.lock().unwrap().push_back(result);
    }

    pub fn queue_delete(&self, result: Result<serde_json::Value, ApiError>) {
        self.delete_results.lock().unwrap().push_back(result);
    }

    pub fn last_upload_description(&self) -> Option<String> {
        self.last_upload_description.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl FileApi for MockApi {
    async fn list_files(&self, equipment_id: Uuid) -> Result<Vec<EquipmentFile>, ApiError> {
        self.record(format!("list_files {}", equipment_id));
        self.list_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_files_by_type(
        &self,
        equipment_id: Uuid,
        file_type: FileType,
    ) -> Result<Vec<EquipmentFile>, ApiError> {
        self.record(format!(
            "list_files_by_type {} {}",
            equipment_id,
            file_type.as_tag()
        ));
        self.list_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn upload_file(
        &self,
        equipment_id: Uuid,
        upload: FileUploadRequest,
    ) -> Result<EquipmentFile, ApiError> {
        self.record(format!("upload_file {} {}", equipment_id, upload.file_name));
        *self.last_upload_description.lock().unwrap() = upload.description.clone();
        self.upload_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(sample_file(upload.file_type, &upload.file_name)))
    }

    async fn get_file(&self, file_id: Uuid) -> Result<EquipmentFile, ApiError> {
        self.record(format!("get_file {}", file_id));
        Ok(sample_file(FileType::Manual, "mock.pdf"))
    }

    async fn update_file_info(
        &self,
        file_id: Uuid,
        _changes: UpdateFileInfo,
    ) -> Result<EquipmentFile, ApiError> {
        self.record(format!("update_file_info {}", file_id));
        Ok(sample_file(FileType::Manual, "mock.pdf"))
    }

    async fn delete_file(&self, file_id: Uuid) -> Result<serde_json::Value, ApiError> {
        self.record(format!("delete_file {}", file_id));
        self.delete_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({ "message": "File deleted" })))
    }
}
