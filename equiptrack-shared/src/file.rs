use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::file_type::FileType;

/// One file record as it travels over the wire.
///
/// The binary payload never rides along; it is only reachable through the
/// download endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct EquipmentFile {
    /// Unique identifier, stable for the record's lifetime
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// The equipment item this file belongs to
    pub equipment_id: Uuid,

    /// Category; immutable after creation
    pub file_type: FileType,

    /// Original uploaded filename, display-only
    pub file_name: String,

    /// MIME type as uploaded
    pub content_type: String,

    /// Uncompressed size in bytes
    pub size: i64,

    /// Optional free text, mutable via update-metadata
    #[serde(default)]
    pub description: Option<String>,

    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Partial metadata update; only provided fields change.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateFileInfo {
    pub file_name: Option<String>,
    pub description: Option<String>,
}
