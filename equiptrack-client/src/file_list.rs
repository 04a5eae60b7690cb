//! File listing for one (equipment, category) pair.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use equiptrack_shared::datefmt;
use equiptrack_shared::file::EquipmentFile;
use equiptrack_shared::file_type::FileType;

use crate::service::{ApiError, EquipmentFileService, FileApi};

/// Shown in place of a photo whose download failed.
pub const PLACEHOLDER_IMAGE: &str = "/assets/placeholder-image.svg";

#[derive(Debug, Clone, PartialEq)]
enum ListState {
    Loading,
    Loaded(Vec<EquipmentFile>),
    Error(String),
}

/// What the rendering layer shows; exactly one variant at a time.
#[derive(Debug, PartialEq)]
pub enum ListView<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Populated(&'a [EquipmentFile]),
}

#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Server confirmed; the record was removed locally
    Deleted(Uuid),
    /// Server refused; message for a blocking alert, collection unchanged
    Failed(String),
    /// The row was already busy; nothing happened
    Ignored,
}

/// Stamp tying an in-flight fetch to the state it was started from.
/// Completing with an outdated stamp is a no-op, so a slow response can
/// never overwrite the result of a newer fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    generation: u64,
    equipment_id: Option<Uuid>,
}

pub struct FileList {
    file_type: FileType,
    state: ListState,
    deleting: HashSet<Uuid>,
    generation: u64,
    // the (equipment, refresh signal) pair the latest fetch covers
    fetched_for: Option<(Option<Uuid>, u64)>,
}

impl FileList {
    pub fn new(file_type: FileType) -> Self {
        Self {
            file_type,
            state: ListState::Loading,
            deleting: HashSet::new(),
            generation: 0,
            fetched_for: None,
        }
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn view(&self) -> ListView<'_> {
        match &self.state {
            ListState::Loading => ListView::Loading,
            ListState::Error(message) => ListView::Error(message),
            ListState::Loaded(files) if files.is_empty() => ListView::Empty,
            ListState::Loaded(files) => ListView::Populated(files),
        }
    }

    pub fn files(&self) -> &[EquipmentFile] {
        match &self.state {
            ListState::Loaded(files) => files,
            _ => &[],
        }
    }

    /// Only the clicked row's delete control is disabled; other rows stay
    /// interactive.
    pub fn is_deleting(&self, file_id: Uuid) -> bool {
        self.deleting.contains(&file_id)
    }

    /// True when the equipment id or the refresh signal moved past what
    /// the latest fetch covered.
    pub fn needs_fetch(&self, equipment_id: Option<Uuid>, refresh: u64) -> bool {
        self.fetched_for != Some((equipment_id, refresh))
    }

    pub fn begin_fetch(&mut self, equipment_id: Option<Uuid>, refresh: u64) -> FetchTicket {
        self.generation += 1;
        self.fetched_for = Some((equipment_id, refresh));
        if equipment_id.is_some() {
            self.state = ListState::Loading;
        }
        FetchTicket {
            generation: self.generation,
            equipment_id,
        }
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<EquipmentFile>, ApiError>,
    ) {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale {} fetch (generation {} < {})",
                self.file_type.as_tag(),
                ticket.generation,
                self.generation
            );
            return;
        }
        self.state = match result {
            // the fetched collection replaces the old one wholesale
            Ok(files) => ListState::Loaded(files),
            Err(err) => ListState::Error(format!("Nepodařilo se načíst soubory: {}", err)),
        };
    }

    /// Fetch the current collection. Without an equipment id there is
    /// nothing to ask the server for; the list is immediately empty.
    pub async fn refresh(
        &mut self,
        api: &dyn FileApi,
        equipment_id: Option<Uuid>,
        refresh: u64,
    ) {
        let ticket = self.begin_fetch(equipment_id, refresh);
        let result = match ticket.equipment_id {
            None => Ok(Vec::new()),
            Some(id) => api.list_files_by_type(id, self.file_type).await,
        };
        self.complete_fetch(ticket, result);
    }

    /// Delete one file. The interactive confirmation happens in the
    /// rendering layer before this is called.
    pub async fn delete(&mut self, api: &dyn FileApi, file_id: Uuid) -> DeleteOutcome {
        if self.deleting.contains(&file_id) {
            return DeleteOutcome::Ignored;
        }
        self.deleting.insert(file_id);

        let result = api.delete_file(file_id).await;
        self.deleting.remove(&file_id);

        match result {
            Ok(_ack) => {
                if let ListState::Loaded(files) = &mut self.state {
                    files.retain(|f| f.id != file_id);
                }
                debug!("Deleted file {}", file_id);
                DeleteOutcome::Deleted(file_id)
            }
            Err(err) => DeleteOutcome::Failed(format!("Smazání souboru se nezdařilo: {}", err)),
        }
    }

    /// Row data for the non-photo categories.
    pub fn rows(&self, service: &EquipmentFileService) -> Vec<FileRow> {
        self.files()
            .iter()
            .map(|file| FileRow {
                id: file.id,
                file_name: file.file_name.clone(),
                description: file.description.clone(),
                uploaded_at: datefmt::format_timestamp(&file.created_at, false),
                download_url: service.download_url(Some(file.id)),
            })
            .collect()
    }
}

/// One line of the vertical listing: filename, optional description and
/// the localized upload date (date-only, no time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub id: Uuid,
    pub file_name: String,
    pub description: Option<String>,
    pub uploaded_at: String,
    pub download_url: String,
}

/// One cell of the photo grid. The broken-image fallback fires at most
/// once, then disarms itself, so a persistently unreachable download
/// endpoint cannot cause a reload loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTile {
    pub file_id: Uuid,
    src: String,
    fallback_applied: bool,
}

impl ImageTile {
    pub fn new(file: &EquipmentFile, service: &EquipmentFileService) -> Self {
        Self {
            file_id: file.id,
            src: service.download_url(Some(file.id)),
            fallback_applied: false,
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// Report a failed image load. Returns whether the source changed.
    pub fn on_load_error(&mut self) -> bool {
        if self.fallback_applied {
            return false;
        }
        self.fallback_applied = true;
        self.src = PLACEHOLDER_IMAGE.to_string();
        true
    }
}
