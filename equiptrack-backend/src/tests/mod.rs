use crate::entity::equipment;
use crate::{build_app, AppState};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum_test::*;
use equiptrack_shared::file::EquipmentFile;
use std::sync::{Arc, Once};
use tokio::sync::RwLock;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

static INIT: Once = Once::new();

async fn setup_test_server() -> TestServer {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                "equiptrack_backend=debug,tower_http=debug,debug",
            ))
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
    let appstate = AppState::ephemeral()
        .await
        .expect("Failed to start test DB");
    let shared_state = Arc::new(RwLock::new(appstate));
    let app = build_app(&shared_state);

    let config = TestServerConfig {
        expect_success_by_default: true,
        restrict_requests_with_http_schema: false,
        default_content_type: None,
        default_scheme: Some("http".into()),
        ..Default::default()
    };

    TestServer::new_with_config(app, config).unwrap()
}

async fn create_equipment(server: &TestServer, name: &str) -> equipment::Model {
    let res = server
        .post("/api/v1/equipment")
        .json(&serde_json::json!({ "name": name }))
        .await;
    res.assert_status_ok();
    res.json()
}

fn upload_form(
    filename: &str,
    mime: &str,
    content: &[u8],
    file_type: &str,
    description: Option<&str>,
) -> multipart::MultipartForm {
    let mut form = multipart::MultipartForm::new()
        .add_text("file_type", file_type.to_string())
        .add_part(
            "file",
            multipart::Part::bytes(content.to_vec())
                .file_name(filename.to_string())
                .mime_type(mime.to_string()),
        );
    if let Some(description) = description {
        form = form.add_text("description", description.to_string());
    }
    form
}

#[tokio::test]
async fn test_api_equipment_crud() {
    let server = setup_test_server().await;

    let res = server.get("/api/v1/equipment").await;
    res.assert_status_ok();
    let initial: Vec<equipment::Model> = res.json();
    assert!(initial.is_empty());

    let saved = create_equipment(&server, "Soldering station").await;
    assert_eq!(saved.name, "Soldering station");

    let res = server.get(&format!("/api/v1/equipment/{}", saved.id)).await;
    res.assert_status_ok();
    let fetched: equipment::Model = res.json();
    assert_eq!(fetched.id, saved.id);

    let res = server.get("/api/v1/equipment").await;
    res.assert_status_ok();
    let all: Vec<equipment::Model> = res.json();
    assert_eq!(all.len(), 1);

    // looking for something that shouldn't exist
    let res = server
        .get(&format!("/api/v1/equipment/{}", Uuid::new_v4()))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn test_api_file_upload_download() {
    let server = setup_test_server().await;
    let equipment = create_equipment(&server, "Bench supply").await;

    let file_content = b"This is a test datasheet for upload testing.";
    let form = upload_form(
        "psu-datasheet.pdf",
        "application/pdf",
        file_content,
        "datasheet",
        Some("Main datasheet"),
    );

    debug!("uploading file to equipment {}", equipment.id);
    let res = server
        .post(&format!("/api/v1/equipment/{}/files", equipment.id))
        .multipart(form)
        .await;
    res.assert_status_ok();
    let file: EquipmentFile = res.json();
    assert_eq!(file.equipment_id, equipment.id);
    assert_eq!(file.file_name, "psu-datasheet.pdf");
    assert_eq!(file.content_type, "application/pdf");
    assert_eq!(file.size as usize, file_content.len());
    assert_eq!(file.description.as_deref(), Some("Main datasheet"));

    // Download the payload back
    let res = server
        .get(&format!("/api/v1/files/{}/download", file.id))
        .await;
    res.assert_status_ok();
    let downloaded = res.as_bytes();
    assert_eq!(downloaded.as_ref(), file_content);

    let content_type = res.header(CONTENT_TYPE);
    assert!(content_type.to_str().unwrap().starts_with("application/pdf"));

    let disposition = res.header(CONTENT_DISPOSITION);
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("psu-datasheet.pdf"));

    // Downloading something that doesn't exist
    let res = server
        .get(&format!("/api/v1/files/{}/download", Uuid::new_v4()))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn test_api_file_listing_by_type() {
    let server = setup_test_server().await;
    let equipment = create_equipment(&server, "Oscilloscope").await;

    let res = server
        .post(&format!("/api/v1/equipment/{}/files", equipment.id))
        .multipart(upload_form(
            "front.jpg",
            "image/jpeg",
            b"jpegbytes",
            "photo",
            None,
        ))
        .await;
    res.assert_status_ok();
    let photo: EquipmentFile = res.json();

    let res = server
        .post(&format!("/api/v1/equipment/{}/files", equipment.id))
        .multipart(upload_form(
            "scope-manual.pdf",
            "application/pdf",
            b"manualbytes",
            "manual",
            Some("User manual"),
        ))
        .await;
    res.assert_status_ok();
    let manual: EquipmentFile = res.json();

    // Full listing contains both, in insertion order, payload-free
    let res = server
        .get(&format!("/api/v1/equipment/{}/files", equipment.id))
        .await;
    res.assert_status_ok();
    let files: Vec<EquipmentFile> = res.json();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].id, photo.id);
    assert_eq!(files[1].id, manual.id);

    // Scoped listing only returns the matching category
    let res = server
        .get(&format!("/api/v1/equipment/{}/files/photo", equipment.id))
        .await;
    res.assert_status_ok();
    let photos: Vec<EquipmentFile> = res.json();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].id, photo.id);

    let res = server
        .get(&format!(
            "/api/v1/equipment/{}/files/datasheet",
            equipment.id
        ))
        .await;
    res.assert_status_ok();
    let datasheets: Vec<EquipmentFile> = res.json();
    assert!(datasheets.is_empty());

    // Unknown category tag is rejected with a structured error
    let res = server
        .get(&format!(
            "/api/v1/equipment/{}/files/spreadsheet",
            equipment.id
        ))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 400);
    assert!(res.text().contains("Unknown file type"));

    // Listing files of an unknown equipment item is empty, not an error
    let res = server
        .get(&format!("/api/v1/equipment/{}/files", Uuid::new_v4()))
        .await;
    res.assert_status_ok();
    let none: Vec<EquipmentFile> = res.json();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_api_upload_preconditions() {
    let server = setup_test_server().await;

    // Upload against a missing equipment item
    let res = server
        .post(&format!("/api/v1/equipment/{}/files", Uuid::new_v4()))
        .multipart(upload_form("a.txt", "text/plain", b"x", "manual", None))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);

    let equipment = create_equipment(&server, "Label printer").await;

    // Unknown file type tag
    let res = server
        .post(&format!("/api/v1/equipment/{}/files", equipment.id))
        .multipart(upload_form("a.txt", "text/plain", b"x", "firmware", None))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 400);
    assert!(res.text().contains("Unknown file type"));

    // Missing file_type field
    let form = multipart::MultipartForm::new().add_part(
        "file",
        multipart::Part::bytes(b"x".to_vec())
            .file_name("a.txt")
            .mime_type("text/plain"),
    );
    let res = server
        .post(&format!("/api/v1/equipment/{}/files", equipment.id))
        .multipart(form)
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 400);

    // An empty description field is treated as absent
    let res = server
        .post(&format!("/api/v1/equipment/{}/files", equipment.id))
        .multipart(upload_form("a.txt", "text/plain", b"x", "manual", Some("")))
        .await;
    res.assert_status_ok();
    let file: EquipmentFile = res.json();
    assert_eq!(file.description, None);
}

#[tokio::test]
async fn test_api_update_file_info() {
    let server = setup_test_server().await;
    let equipment = create_equipment(&server, "Spectrum analyzer").await;

    let res = server
        .post(&format!("/api/v1/equipment/{}/files", equipment.id))
        .multipart(upload_form(
            "sa-notes.pdf",
            "application/pdf",
            b"pdf",
            "datasheet",
            Some("First revision"),
        ))
        .await;
    res.assert_status_ok();
    let file: EquipmentFile = res.json();

    // Update only the description; the filename stays
    let res = server
        .put(&format!("/api/v1/files/{}", file.id))
        .json(&serde_json::json!({ "description": "Second revision" }))
        .await;
    res.assert_status_ok();
    let updated: EquipmentFile = res.json();
    assert_eq!(updated.file_name, "sa-notes.pdf");
    assert_eq!(updated.description.as_deref(), Some("Second revision"));
    assert_eq!(updated.file_type, file.file_type);

    // Update only the filename
    let res = server
        .put(&format!("/api/v1/files/{}", file.id))
        .json(&serde_json::json!({ "file_name": "sa-datasheet.pdf" }))
        .await;
    res.assert_status_ok();
    let updated: EquipmentFile = res.json();
    assert_eq!(updated.file_name, "sa-datasheet.pdf");
    assert_eq!(updated.description.as_deref(), Some("Second revision"));

    // An empty description clears the field
    let res = server
        .put(&format!("/api/v1/files/{}", file.id))
        .json(&serde_json::json!({ "description": "" }))
        .await;
    res.assert_status_ok();
    let updated: EquipmentFile = res.json();
    assert_eq!(updated.description, None);

    // Updating something that doesn't exist
    let res = server
        .put(&format!("/api/v1/files/{}", Uuid::new_v4()))
        .json(&serde_json::json!({ "description": "ghost" }))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn test_api_delete_file() {
    let server = setup_test_server().await;
    let equipment = create_equipment(&server, "Thermal camera").await;

    let res = server
        .post(&format!("/api/v1/equipment/{}/files", equipment.id))
        .multipart(upload_form(
            "thermal.jpg",
            "image/jpeg",
            b"jpeg",
            "photo",
            None,
        ))
        .await;
    res.assert_status_ok();
    let file: EquipmentFile = res.json();

    let res = server.delete(&format!("/api/v1/files/{}", file.id)).await;
    res.assert_status_ok();
    let ack: serde_json::Value = res.json();
    assert_eq!(ack["id"], serde_json::json!(file.id));

    let res = server
        .get(&format!("/api/v1/files/{}", file.id))
        .expect_failure()
        .await;
    assert_eq!(res.status_code(), 404);

    let res = server
        .get(&format!("/api/v1/equipment/{}/files/photo", equipment.id))
        .await;
    res.assert_status_ok();
    let photos: Vec<EquipmentFile> = res.json();
    assert!(photos.is_empty());

    // Deleting again is not an error
    let res = server.delete(&format!("/api/v1/files/{}", file.id)).await;
    res.assert_status_ok();
}

#[tokio::test]
async fn test_cascade_deletion() {
    use crate::entity::equipment_file;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};

    let conn = crate::storage::start_db(None).await.expect("fresh DB");

    let equipment_id = Uuid::new_v4();
    equipment::ActiveModel {
        id: Set(equipment_id),
        name: Set("Old drill press".to_string()),
        manufacturer: Set(None),
        notes: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(&conn)
    .await
    .expect("Failed to save equipment");

    let file_id = Uuid::new_v4();
    equipment_file::ActiveModel {
        id: Set(file_id),
        equipment_id: Set(equipment_id),
        file_type: Set(equiptrack_shared::file_type::FileType::Photo),
        file_name: Set("drill.jpg".to_string()),
        content_type: Set("image/jpeg".to_string()),
        size: Set(4),
        description: Set(None),
        data: Set(b"jpeg".to_vec()),
        created_at: Set(Utc::now()),
    }
    .insert(&conn)
    .await
    .expect("Failed to save file");

    // Deleting the equipment row takes its files with it
    equipment::Entity::delete_by_id(equipment_id)
        .exec(&conn)
        .await
        .expect("Failed to delete equipment");

    let gone = equipment_file::Entity::find_by_id(file_id)
        .one(&conn)
        .await
        .expect("Failed to query file");
    assert!(gone.is_none());
}
