//! End-to-end: the typed client against the real backend on a loopback
//! listener.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use tokio::sync::RwLock;
use uuid::Uuid;

use equiptrack_backend::entity::equipment;
use equiptrack_backend::{build_app, AppState};
use equiptrack_shared::file::UpdateFileInfo;
use equiptrack_shared::file_type::FileType;
use equiptrack_shared::AddrInfo;

use crate::file_list::ListView;
use crate::service::{ApiError, EquipmentFileService, FileApi, FileUploadRequest};

async fn serve_backend() -> (EquipmentFileService, sea_orm::DatabaseConnection) {
    let appstate = AppState::ephemeral().await.expect("Failed to start test DB");
    let conn = appstate.conn.clone();
    let shared_state = Arc::new(RwLock::new(appstate));
    let app = build_app(&shared_state);

    let addrinfo = AddrInfo::test();
    let listener = tokio::net::TcpListener::bind(addrinfo.as_addr())
        .await
        .expect("Failed to bind test listener");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server exited");
    });

    let service = EquipmentFileService::new(&format!("{}/api/v1", addrinfo.as_url()));
    (service, conn)
}

async fn seed_equipment(conn: &sea_orm::DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    equipment::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        manufacturer: Set(None),
        notes: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
    .expect("Failed to seed equipment");
    id
}

#[tokio::test]
async fn test_full_file_flow() {
    let (service, conn) = serve_backend().await;
    let equipment_id = seed_equipment(&conn, "CNC router").await;

    // nothing there yet
    let files = service.list_files(equipment_id).await.expect("list");
    assert!(files.is_empty());

    // upload a photo
    let uploaded = service
        .upload_file(
            equipment_id,
            FileUploadRequest {
                file_name: "front.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                data: b"jpegbytes".to_vec(),
                file_type: FileType::Photo,
                description: Some("Pohled zepředu".to_string()),
            },
        )
        .await
        .expect("upload");
    assert_eq!(uploaded.equipment_id, equipment_id);
    assert_eq!(uploaded.file_type, FileType::Photo);
    assert_eq!(uploaded.size, 9);
    assert_eq!(uploaded.description.as_deref(), Some("Pohled zepředu"));

    // it shows up in the scoped listing, and only there
    let photos = service
        .list_files_by_type(equipment_id, FileType::Photo)
        .await
        .expect("list photos");
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].id, uploaded.id);

    let manuals = service
        .list_files_by_type(equipment_id, FileType::Manual)
        .await
        .expect("list manuals");
    assert!(manuals.is_empty());

    // fetch one and update its metadata
    let fetched = service.get_file(uploaded.id).await.expect("get");
    assert_eq!(fetched.file_name, "front.jpg");

    let updated = service
        .update_file_info(
            uploaded.id,
            UpdateFileInfo {
                description: Some("Čelní pohled".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.description.as_deref(), Some("Čelní pohled"));
    assert_eq!(updated.file_name, "front.jpg");

    // the download URL serves the original bytes back
    let url = service.download_url(Some(uploaded.id));
    let response = reqwest::get(&url).await.expect("download");
    assert!(response.status().is_success());
    let bytes = response.bytes().await.expect("download body");
    assert_eq!(bytes.as_ref(), b"jpegbytes");

    // delete, and the listing is empty again
    service.delete_file(uploaded.id).await.expect("delete");
    let photos = service
        .list_files_by_type(equipment_id, FileType::Photo)
        .await
        .expect("list photos");
    assert!(photos.is_empty());
}

#[tokio::test]
async fn test_server_errors_carry_the_structured_message() {
    let (service, _conn) = serve_backend().await;

    let missing = Uuid::new_v4();
    let err = service.get_file(missing).await.expect_err("should 404");
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains(&missing.to_string()));
        }
        other => panic!("expected server error, got {:?}", other),
    }

    // uploading to an equipment item that does not exist
    let err = service
        .upload_file(
            missing,
            FileUploadRequest {
                file_name: "a.txt".to_string(),
                content_type: "text/plain".to_string(),
                data: b"x".to_vec(),
                file_type: FileType::Manual,
                description: None,
            },
        )
        .await
        .expect_err("should 404");
    match err {
        ApiError::Server { status, .. } => assert_eq!(status, 404),
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_uploader_flow_against_real_backend() {
    let (service, conn) = serve_backend().await;
    let equipment_id = seed_equipment(&conn, "Laser cutter").await;

    let mut view = crate::EquipmentFiles::new(Some(equipment_id));
    view.toggle(FileType::Photo); // collapse
    view.toggle(FileType::Manual);
    view.sync(&service).await;

    let section = view.section(FileType::Manual).expect("section");
    assert_eq!(section.list.view(), ListView::Empty);

    // submitting without a file never reaches the network
    let outcome = view.submit_upload(&service).await;
    assert!(outcome.is_none(), "no file selected yet");
    let section = view.section(FileType::Manual).expect("section");
    assert_eq!(
        section.uploader.error(),
        Some(crate::uploader::MSG_CHOOSE_FILE)
    );

    // now with a file
    let section = view.section_mut(FileType::Manual).expect("section");
    section.uploader.select_file(
        "laser-manual.pdf".to_string(),
        "application/pdf".to_string(),
        b"pdfbytes".to_vec(),
    );
    let uploaded = view.submit_upload(&service).await.expect("uploaded");
    assert_eq!(uploaded.file_name, "laser-manual.pdf");

    view.sync(&service).await;
    let section = view.section(FileType::Manual).expect("section");
    match section.list.view() {
        ListView::Populated(files) => assert_eq!(files.len(), 1),
        other => panic!("expected populated view, got {:?}", other),
    }
}
