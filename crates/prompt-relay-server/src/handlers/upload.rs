use crate::config::UploadConfig;
use crate::utils::error::ApiError;
use axum::{
    extract::{Extension, Multipart},
    Json,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Audio/video extensions accepted for upload.
const ALLOWED_EXTENSIONS: [&str; 7] = [".mp3", ".mp4", ".mpeg", ".mpga", ".m4a", ".wav", ".webm"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub file_name: String,
}

fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// `POST /upload`
///
/// Stores a multipart `file` field under the configured directory with a
/// random name preserving the original extension. The body size ceiling is
/// enforced by the route's body limit layer.
pub async fn upload_handler(
    Extension(config): Extension<Arc<UploadConfig>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(|name| name.to_string())
            .ok_or_else(|| ApiError::BadRequest("filename required".to_string()))?;

        let extension = file_extension(&original_name)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or(ApiError::InvalidFileType)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        let stored_name = format!("{}{}", Uuid::new_v4(), extension);
        let path = Path::new(&config.dir).join(&stored_name);

        tokio::fs::create_dir_all(&config.dir).await.map_err(|e| {
            error!("Failed to create upload directory: {}", e);
            ApiError::Internal(format!("Failed to store upload: {}", e))
        })?;
        tokio::fs::write(&path, &data).await.map_err(|e| {
            error!("Failed to write {}: {}", path.display(), e);
            ApiError::Internal(format!("Failed to store upload: {}", e))
        })?;

        info!(
            file = %original_name,
            stored = %stored_name,
            size = data.len(),
            "Upload stored"
        );

        return Ok(Json(UploadResponse {
            success: true,
            file_name: stored_name,
        }));
    }

    Err(ApiError::BadRequest("file required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::extract::DefaultBodyLimit;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    fn router(config: Arc<UploadConfig>) -> Router {
        Router::new()
            .route("/upload", post(upload_handler))
            .layer(DefaultBodyLimit::max(config.max_size_bytes))
            .layer(Extension(config))
    }

    fn multipart_request(filename: &str, contents: &str) -> Request<Body> {
        let body = format!(
            "--BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {}\r\n\
             --BOUNDARY--\r\n",
            filename, contents
        );
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header("content-type", "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    fn test_config() -> Arc<UploadConfig> {
        let dir = std::env::temp_dir().join(format!("relay-uploads-{}", Uuid::new_v4()));
        Arc::new(UploadConfig {
            dir: dir.to_string_lossy().into_owned(),
            max_size_bytes: 10 * 1024 * 1024,
        })
    }

    #[test]
    fn test_file_extension_extraction() {
        assert_eq!(file_extension("voice.mp3").as_deref(), Some(".mp3"));
        assert_eq!(file_extension("CLIP.WEBM").as_deref(), Some(".webm"));
        assert_eq!(file_extension("archive.tar.mp4").as_deref(), Some(".mp4"));
        assert_eq!(file_extension("noextension"), None);
    }

    #[test]
    fn test_allowed_extensions_match_whitelist() {
        for ext in [".mp3", ".mp4", ".mpeg", ".mpga", ".m4a", ".wav", ".webm"] {
            assert!(ALLOWED_EXTENSIONS.contains(&ext));
        }
        assert!(!ALLOWED_EXTENSIONS.contains(&".txt"));
        assert!(!ALLOWED_EXTENSIONS.contains(&".exe"));
    }

    #[tokio::test]
    async fn test_rejects_disallowed_extension() {
        let config = test_config();
        let app = router(config.clone());

        let response = app
            .oneshot(multipart_request("notes.txt", "hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            r#"{"error":"Invalid file type."}"#
        );
        assert!(!Path::new(&config.dir).exists());
    }

    #[tokio::test]
    async fn test_stores_allowed_file_under_random_name() {
        let config = test_config();
        let app = router(config.clone());

        let response = app
            .oneshot(multipart_request("voice.mp3", "audio-bytes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["success"], true);

        let stored_name = parsed["file_name"].as_str().unwrap();
        assert!(stored_name.ends_with(".mp3"));
        assert_ne!(stored_name, "voice.mp3");

        let stored = tokio::fs::read(Path::new(&config.dir).join(stored_name))
            .await
            .unwrap();
        assert_eq!(stored, b"audio-bytes");

        tokio::fs::remove_dir_all(&config.dir).await.unwrap();
    }
}
