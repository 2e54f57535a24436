use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::compose::{compose, RenderRequest};
use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub title_markdown: String,
    pub description_markdown: String,
    /// Background path used as given.
    pub image_path: Option<String>,
    /// Background file name inside the images directory.
    pub image_name: Option<String>,
}

/// POST /generate-image
pub async fn handle_generate_image(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    generate(&state, None, req).await
}

/// POST /generate-image/:image_name
pub async fn handle_generate_named_image(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    generate(&state, Some(&image_name), req).await
}

async fn generate(
    state: &AppState,
    path_selector: Option<&str>,
    req: GenerateImageRequest,
) -> Result<Response, AppError> {
    let background = resolve_background(&state.config, path_selector, &req)?;
    let request_id = Uuid::new_v4();
    let span = info_span!("generate_image", %request_id, background = %background.display());

    async move {
        let render = RenderRequest {
            title_markdown: req.title_markdown,
            description_markdown: req.description_markdown,
            background,
        };
        let png = compose(render, state.fonts.clone(), state.tokenizer.clone()).await?;
        info!(bytes = png.len(), "Image generated");

        Ok::<_, AppError>(([(header::CONTENT_TYPE, "image/png")], Bytes::from(png)).into_response())
    }
    .instrument(span)
    .await
}

/// Picks the background: path selector > body `imageName` > body `imagePath` > default.
pub(crate) fn resolve_background(
    config: &Config,
    path_selector: Option<&str>,
    req: &GenerateImageRequest,
) -> Result<PathBuf, AppError> {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);

    if let Some(name) = path_selector.filter(|s| !s.is_empty()) {
        return Ok(config.images_dir.join(bare_file_name(name)?));
    }
    if let Some(name) = non_empty(&req.image_name) {
        return Ok(config.images_dir.join(bare_file_name(&name)?));
    }
    if let Some(path) = non_empty(&req.image_path) {
        return Ok(PathBuf::from(path));
    }
    Ok(config.default_background())
}

/// Accepts a single path component; anything that could leave the images dir is rejected.
fn bare_file_name(name: &str) -> Result<&str, AppError> {
    let path = FsPath::new(name);
    let is_bare = !name.contains('\\')
        && path.file_name().map(|f| f == path.as_os_str()).unwrap_or(false);
    if is_bare {
        Ok(name)
    } else {
        Err(AppError::InvalidRequest(format!(
            "Image name must be a plain file name: {name}"
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
