//! Container composing one uploader and one list per category.

use std::collections::HashMap;

use uuid::Uuid;

use equiptrack_shared::file::EquipmentFile;
use equiptrack_shared::file_type::FileType;

use crate::file_list::{DeleteOutcome, FileList};
use crate::service::FileApi;
use crate::uploader::FileUploader;

pub struct CategorySection {
    pub uploader: FileUploader,
    pub list: FileList,
}

impl CategorySection {
    fn new(file_type: FileType) -> Self {
        Self {
            uploader: FileUploader::new(file_type),
            list: FileList::new(file_type),
        }
    }
}

/// Accordion of the three fixed category sections. At most one section
/// is expanded; sections are created lazily on first expansion. A single
/// shared refresh counter invalidates every list, upload and delete
/// alike; the design does not track which category changed.
pub struct EquipmentFiles {
    equipment_id: Option<Uuid>,
    active: Option<FileType>,
    refresh: u64,
    sections: HashMap<FileType, CategorySection>,
}

impl EquipmentFiles {
    pub fn new(equipment_id: Option<Uuid>) -> Self {
        Self {
            equipment_id,
            active: Some(FileType::Photo),
            refresh: 0,
            sections: HashMap::new(),
        }
    }

    /// The fixed section order: photos, datasheets, manuals.
    pub fn categories() -> [FileType; 3] {
        FileType::ALL
    }

    pub fn equipment_id(&self) -> Option<Uuid> {
        self.equipment_id
    }

    pub fn active(&self) -> Option<FileType> {
        self.active
    }

    pub fn refresh_count(&self) -> u64 {
        self.refresh
    }

    pub fn section(&self, category: FileType) -> Option<&CategorySection> {
        self.sections.get(&category)
    }

    pub fn section_mut(&mut self, category: FileType) -> Option<&mut CategorySection> {
        self.sections.get_mut(&category)
    }

    /// Expand or collapse one section. Opening a section implicitly
    /// closes whichever other one was open.
    pub fn toggle(&mut self, category: FileType) {
        if self.active == Some(category) {
            self.active = None;
        } else {
            self.active = Some(category);
            self.sections
                .entry(category)
                .or_insert_with(|| CategorySection::new(category));
        }
    }

    /// Point the whole view at a different equipment item: back to the
    /// first category, and everything re-fetches.
    pub fn set_equipment(&mut self, equipment_id: Option<Uuid>) {
        if self.equipment_id == equipment_id {
            return;
        }
        self.equipment_id = equipment_id;
        self.active = Some(FileType::Photo);
        self.refresh += 1;
    }

    /// Bring the expanded section up to date. A no-op while everything is
    /// collapsed, or when the open list already covers the current
    /// (equipment, refresh) pair.
    pub async fn sync(&mut self, api: &dyn FileApi) {
        let Some(category) = self.active else {
            return;
        };
        let equipment_id = self.equipment_id;
        let refresh = self.refresh;
        let section = self
            .sections
            .entry(category)
            .or_insert_with(|| CategorySection::new(category));
        if section.list.needs_fetch(equipment_id, refresh) {
            section.list.refresh(api, equipment_id, refresh).await;
        }
    }

    /// Submit the active section's upload form. A successful upload bumps
    /// the shared refresh counter so the visible lists re-fetch.
    pub async fn submit_upload(&mut self, api: &dyn FileApi) -> Option<EquipmentFile> {
        let category = self.active?;
        let equipment_id = self.equipment_id?;
        let section = self
            .sections
            .entry(category)
            .or_insert_with(|| CategorySection::new(category));

        let uploaded = section.uploader.submit(equipment_id, api).await;
        if uploaded.is_some() {
            self.refresh += 1;
        }
        uploaded
    }

    /// Delete a file out of one section, after the rendering layer has
    /// confirmed with the user. A confirmed deletion bumps the shared
    /// refresh counter.
    pub async fn confirm_delete(
        &mut self,
        api: &dyn FileApi,
        category: FileType,
        file_id: Uuid,
    ) -> DeleteOutcome {
        let Some(section) = self.sections.get_mut(&category) else {
            return DeleteOutcome::Ignored;
        };
        let outcome = section.list.delete(api, file_id).await;
        if matches!(outcome, DeleteOutcome::Deleted(_)) {
            self.refresh += 1;
        }
        outcome
    }
}
