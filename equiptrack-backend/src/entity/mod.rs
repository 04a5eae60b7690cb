pub mod equipment;
pub mod equipment_file;

pub use equipment::Entity as Equipment;
pub use equipment_file::Entity as EquipmentFile;
