//! Upload form state for one category.

use tracing::debug;
use uuid::Uuid;

use equiptrack_shared::file::EquipmentFile;
use equiptrack_shared::file_type::FileType;

use crate::service::{FileApi, FileUploadRequest};

/// Validation message shown when submit is pressed with no file chosen.
pub const MSG_CHOOSE_FILE: &str = "Vyberte prosím soubor.";

/// The locally chosen file plus its description, held until submission
/// or an explicit clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFileDraft {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploaderState {
    Idle,
    FileSelected,
    Uploading,
    Error,
}

pub struct FileUploader {
    file_type: FileType,
    selected: Option<SelectedFileDraft>,
    description: String,
    uploading: bool,
    error: Option<String>,
}

impl FileUploader {
    pub fn new(file_type: FileType) -> Self {
        Self {
            file_type,
            selected: None,
            description: String::new(),
            uploading: false,
            error: None,
        }
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Form heading, from the category registry.
    pub fn label(&self) -> &'static str {
        self.file_type.info().label
    }

    /// Whether the form offers a description input at all.
    pub fn accepts_description(&self) -> bool {
        self.file_type.info().accepts_description
    }

    pub fn state(&self) -> UploaderState {
        if self.uploading {
            UploaderState::Uploading
        } else if self.error.is_some() {
            UploaderState::Error
        } else if self.selected.is_some() {
            UploaderState::FileSelected
        } else {
            UploaderState::Idle
        }
    }

    pub fn selected(&self) -> Option<&SelectedFileDraft> {
        self.selected.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// While an upload is in flight the file picker, the clear button and
    /// the submit button are all disabled.
    pub fn is_busy(&self) -> bool {
        self.uploading
    }

    pub fn select_file(&mut self, file_name: String, content_type: String, data: Vec<u8>) {
        if self.uploading {
            return;
        }
        self.error = None;
        self.selected = Some(SelectedFileDraft {
            file_name,
            content_type,
            data,
        });
    }

    pub fn set_description(&mut self, text: String) {
        if self.uploading {
            return;
        }
        self.description = text;
    }

    /// Explicit cancel: discard the draft and any error.
    pub fn clear(&mut self) {
        if self.uploading {
            return;
        }
        self.selected = None;
        self.description.clear();
        self.error = None;
    }

    /// Submit the draft. Returns the stored record on success so the
    /// container can propagate the upload event; on failure the draft is
    /// kept so the user can retry without reselecting.
    pub async fn submit(&mut self, equipment_id: Uuid, api: &dyn FileApi) -> Option<EquipmentFile> {
        if self.uploading {
            return None;
        }
        let Some(draft) = self.selected.clone() else {
            self.error = Some(MSG_CHOOSE_FILE.to_string());
            return None;
        };

        self.error = None;
        self.uploading = true;

        let description = match self.description.trim() {
            "" => None,
            text => Some(text.to_string()),
        };
        let request = FileUploadRequest {
            file_name: draft.file_name,
            content_type: draft.content_type,
            data: draft.data,
            file_type: self.file_type,
            description,
        };

        let result = api.upload_file(equipment_id, request).await;
        self.uploading = false;

        match result {
            Ok(record) => {
                debug!("Uploaded {} for equipment {}", record.id, equipment_id);
                self.selected = None;
                self.description.clear();
                Some(record)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }
}
