pub use sea_orm_migration::prelude::*;

mod m20240315_000001_create_tables;
mod m20240722_000002_add_file_description;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240315_000001_create_tables::Migration),
            Box::new(m20240722_000002_add_file_description::Migration),
        ]
    }
}
