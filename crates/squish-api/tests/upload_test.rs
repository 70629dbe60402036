//! Upload API integration tests.
//!
//! Run with: `cargo test -p squish-api --test upload_test`
//! Each test gets an isolated TempDir-backed storage tree.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use squish_api::setup::routes::setup_routes;
use squish_api::state::AppState;
use squish_core::Config;
use tempfile::TempDir;

async fn setup_test_app(await_compression: bool) -> (TempDir, TestServer) {
    let dir = TempDir::new().unwrap();
    let config = Config {
        storage_path: dir.path().to_string_lossy().into_owned(),
        public_dir: dir.path().join("public").to_string_lossy().into_owned(),
        await_compression,
        ..Config::default()
    };

    let state: Arc<AppState> = AppState::new(config).await.unwrap();
    let server = TestServer::new(setup_routes(state)).unwrap();
    (dir, server)
}

/// Noisy PNG so the JPEG encoder has real work to do.
fn test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 7 % 256) as u8,
            (y * 13 % 256) as u8,
            ((x * y) % 256) as u8,
        ])
    });
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

fn png_part(data: Vec<u8>, name: &str) -> Part {
    Part::bytes(data).file_name(name).mime_type("image/png")
}

fn dir_entries(path: &Path) -> Vec<String> {
    std::fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let (_dir, server) = setup_test_app(false).await;
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn upload_without_files_returns_400() {
    let (_dir, server) = setup_test_app(false).await;

    let form = MultipartForm::new().add_text("note", "no file parts here");
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No files uploaded");
}

#[tokio::test]
async fn batch_of_six_is_rejected_before_storage() {
    let (dir, server) = setup_test_app(false).await;

    let mut form = MultipartForm::new();
    for i in 0..6 {
        form = form.add_part("files", png_part(test_png(16, 16), &format!("f{}.png", i)));
    }
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    // Zero files may land in storage for a rejected batch.
    assert!(dir_entries(&dir.path().join("uploads")).is_empty());
    assert!(dir_entries(&dir.path().join("compress")).is_empty());
}

#[tokio::test]
async fn type_mismatch_is_rejected() {
    let (dir, server) = setup_test_app(false).await;

    // Extension matches the allowed set, declared type does not (AND
    // semantics).
    let part = Part::bytes(test_png(16, 16))
        .file_name("clip.png")
        .mime_type("video/mp4");
    let form = MultipartForm::new().add_part("files", part);
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(dir_entries(&dir.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn oversize_file_is_rejected_with_413() {
    let (dir, server) = setup_test_app(false).await;

    let oversize = vec![0u8; 2 * 1024 * 1024 + 1];
    let form = MultipartForm::new().add_part("files", png_part(oversize, "big.png"));
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(dir_entries(&dir.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn one_bad_file_rejects_the_batch_before_any_storage() {
    let (dir, server) = setup_test_app(false).await;

    let form = MultipartForm::new()
        .add_part("files", png_part(test_png(16, 16), "good.png"))
        .add_part(
            "files",
            Part::bytes(b"%PDF-1.4 not allowed".to_vec())
                .file_name("clip.mp4")
                .mime_type("video/mp4"),
        );
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(dir_entries(&dir.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn image_upload_produces_compressed_artifact() {
    let (dir, server) = setup_test_app(true).await;

    let form = MultipartForm::new().add_part("files", png_part(test_png(128, 128), "photo.png"));
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Files compressed successfully");

    let uploads = dir_entries(&dir.path().join("uploads"));
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].ends_with("-photo.png"));

    let compressed = dir_entries(&dir.path().join("compress"));
    assert_eq!(compressed.len(), 1);
    assert!(compressed[0].starts_with("compress-"));

    // The derivative is JPEG regardless of the PNG source.
    let artifact = std::fs::read(dir.path().join("compress").join(&compressed[0])).unwrap();
    assert_eq!(
        image::guess_format(&artifact).unwrap(),
        image::ImageFormat::Jpeg
    );
}

#[tokio::test]
async fn filename_with_interior_dot_run_is_accepted_and_stored() {
    let (dir, server) = setup_test_app(true).await;

    // Passes the gate (png extension + type); the stored key must not
    // carry the dot run, or the write would be refused as a traversal.
    let form = MultipartForm::new().add_part("files", png_part(test_png(32, 32), "a..b.png"));
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let uploads = dir_entries(&dir.path().join("uploads"));
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].ends_with("-a.b.png"));
    assert_eq!(dir_entries(&dir.path().join("compress")).len(), 1);
}

#[tokio::test]
async fn duplicate_filenames_do_not_overwrite() {
    let (dir, server) = setup_test_app(true).await;

    let form = MultipartForm::new()
        .add_part("files", png_part(test_png(32, 32), "photo.png"))
        .add_part("files", png_part(test_png(48, 48), "photo.png"));
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(dir_entries(&dir.path().join("uploads")).len(), 2);
    assert_eq!(dir_entries(&dir.path().join("compress")).len(), 2);
}

#[tokio::test]
async fn pdf_is_stored_but_never_compressed() {
    let (dir, server) = setup_test_app(true).await;

    let part = Part::bytes(b"%PDF-1.4 minimal".to_vec())
        .file_name("report.pdf")
        .mime_type("application/pdf");
    let form = MultipartForm::new().add_part("files", part);
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(dir_entries(&dir.path().join("uploads")).len(), 1);
    assert!(dir_entries(&dir.path().join("compress")).is_empty());
}

#[tokio::test]
async fn corrupt_image_does_not_abort_sibling_compression() {
    let (dir, server) = setup_test_app(true).await;

    // Both pass the validation gate (png extension + type), but one is not
    // decodable. Its run fails in isolation; the sibling still produces an
    // artifact and the response stays a success.
    let form = MultipartForm::new()
        .add_part("files", png_part(test_png(32, 32), "good.png"))
        .add_part("files", png_part(b"garbage bytes".to_vec(), "bad.png"));
    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(dir_entries(&dir.path().join("uploads")).len(), 2);
    assert_eq!(dir_entries(&dir.path().join("compress")).len(), 1);
}
