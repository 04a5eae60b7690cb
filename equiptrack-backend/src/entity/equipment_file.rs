use chrono::Utc;
use equiptrack_shared::file_type::FileType;
use sea_orm::{entity::prelude::*, FromQueryResult, QuerySelect, SelectModel, Selector};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "equipment_file")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub file_type: FileType,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub description: Option<String>,
    #[sea_orm(column_type = "VarBinary(StringLen::Max)")]
    pub data: Vec<u8>,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::equipment::Entity",
        from = "Column::EquipmentId",
        to = "super::equipment::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Equipment,
}

impl Related<super::equipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Row shape for listings, which never carry the blob.
#[derive(FromQueryResult)]
pub struct ModelNoData {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub file_type: FileType,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
}

/// Files of one equipment item, payload column excluded, in insertion order.
pub fn file_list(
    equipment_id: Uuid,
    file_type: Option<FileType>,
) -> Selector<SelectModel<ModelNoData>> {
    let mut query = Entity::find()
        .select_only()
        .columns([
            Column::Id,
            Column::EquipmentId,
            Column::FileType,
            Column::FileName,
            Column::ContentType,
            Column::Size,
            Column::Description,
            Column::CreatedAt,
        ])
        .filter(Column::EquipmentId.eq(equipment_id));
    if let Some(file_type) = file_type {
        query = query.filter(Column::FileType.eq(file_type));
    }
    query.into_model::<ModelNoData>()
}

impl From<ModelNoData> for equiptrack_shared::file::EquipmentFile {
    fn from(row: ModelNoData) -> Self {
        Self {
            id: row.id,
            equipment_id: row.equipment_id,
            file_type: row.file_type,
            file_name: row.file_name,
            content_type: row.content_type,
            size: row.size,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

impl From<Model> for equiptrack_shared::file::EquipmentFile {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            equipment_id: model.equipment_id,
            file_type: model.file_type,
            file_name: model.file_name,
            content_type: model.content_type,
            size: model.size,
            description: model.description,
            created_at: model.created_at,
        }
    }
}
