use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(EquipmentFile::Table)
                    .add_column(ColumnDef::new(EquipmentFile::Description).string())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(EquipmentFile::Table)
                    .drop_column(EquipmentFile::Description)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum EquipmentFile {
    Table,
    Description,
}
