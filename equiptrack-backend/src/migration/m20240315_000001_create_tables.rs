use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create equipment table
        manager
            .create_table(
                Table::create()
                    .table(Equipment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Equipment::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Equipment::Name).string().not_null())
                    .col(ColumnDef::new(Equipment::Manufacturer).string())
                    .col(ColumnDef::new(Equipment::Notes).string())
                    .col(ColumnDef::new(Equipment::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create equipment_file table
        manager
            .create_table(
                Table::create()
                    .table(EquipmentFile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EquipmentFile::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EquipmentFile::EquipmentId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EquipmentFile::FileType).string().not_null())
                    .col(ColumnDef::new(EquipmentFile::FileName).string().not_null())
                    .col(
                        ColumnDef::new(EquipmentFile::ContentType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EquipmentFile::Size)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EquipmentFile::Data).binary().not_null())
                    .col(ColumnDef::new(EquipmentFile::CreatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_equipment_file_equipment")
                            .from(EquipmentFile::Table, EquipmentFile::EquipmentId)
                            .to(Equipment::Table, Equipment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EquipmentFile::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Equipment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Equipment {
    Table,
    Id,
    Name,
    Manufacturer,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EquipmentFile {
    Table,
    Id,
    EquipmentId,
    FileType,
    FileName,
    ContentType,
    Size,
    Data,
    CreatedAt,
}
