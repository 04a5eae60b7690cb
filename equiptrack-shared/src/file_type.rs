use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Document category of an equipment file.
///
/// The set is closed: the upload form and the category sections are built
/// from [`FileType::ALL`], in that order.
#[derive(
    Copy,
    Clone,
    Debug,
    Hash,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[sea_orm(string_value = "photo")]
    Photo,
    #[sea_orm(string_value = "datasheet")]
    Datasheet,
    #[sea_orm(string_value = "manual")]
    Manual,
}

/// Display metadata for one category.
pub struct FileTypeInfo {
    pub tag: &'static str,
    /// Czech singular label, shown on the upload form
    pub label: &'static str,
    /// Czech plural label, shown as the section heading
    pub label_plural: &'static str,
    pub icon: &'static str,
    /// whether the upload form offers a description field
    pub accepts_description: bool,
}

/// Fallback used for tags outside the closed set.
pub const GENERIC_FILE_INFO: FileTypeInfo = FileTypeInfo {
    tag: "file",
    label: "Soubor",
    label_plural: "Soubory",
    icon: "insert-drive-file",
    accepts_description: true,
};

const PHOTO_INFO: FileTypeInfo = FileTypeInfo {
    tag: "photo",
    label: "Fotografie",
    label_plural: "Fotografie",
    icon: "photo-camera",
    accepts_description: false,
};

const DATASHEET_INFO: FileTypeInfo = FileTypeInfo {
    tag: "datasheet",
    label: "Katalogový list",
    label_plural: "Katalogové listy",
    icon: "description",
    accepts_description: true,
};

const MANUAL_INFO: FileTypeInfo = FileTypeInfo {
    tag: "manual",
    label: "Návod",
    label_plural: "Návody",
    icon: "menu-book",
    accepts_description: true,
};

impl FileType {
    /// Fixed composition order: photos, datasheets, manuals.
    pub const ALL: [FileType; 3] = [FileType::Photo, FileType::Datasheet, FileType::Manual];

    pub fn as_tag(&self) -> &'static str {
        self.info().tag
    }

    pub fn parse(tag: &str) -> Option<FileType> {
        FileType::ALL.into_iter().find(|ft| ft.as_tag() == tag)
    }

    pub fn info(&self) -> &'static FileTypeInfo {
        match self {
            FileType::Photo => &PHOTO_INFO,
            FileType::Datasheet => &DATASHEET_INFO,
            FileType::Manual => &MANUAL_INFO,
        }
    }
}

/// Label for a raw tag, falling back to the generic noun for anything
/// outside the closed set.
pub fn display_label(tag: &str) -> &'static str {
    match FileType::parse(tag) {
        Some(ft) => ft.info().label,
        None => GENERIC_FILE_INFO.label,
    }
}

/// Icon name for a raw tag, with the same fallback rule as [`display_label`].
pub fn display_icon(tag: &str) -> &'static str {
    match FileType::parse(tag) {
        Some(ft) => ft.info().icon,
        None => GENERIC_FILE_INFO.icon,
    }
}
