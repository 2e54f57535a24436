//! Card composition pipeline.
//!
//! # Steps
//! 1. Read the background file (async, on the request task).
//! 2. On the blocking pool: decode, stretch onto a 1080×1350 surface, lay out
//!    the title and description regions, draw them in white, encode as PNG.
//!
//! Every call owns its surface and layout cursors; only the `FontSet` and the
//! tokenizer are shared, both read-only.

pub mod canvas;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::fonts::FontSet;
use crate::layout::{
    render_document, DrawCommand, MarkdownTokenizer, CANVAS_HEIGHT, CANVAS_WIDTH,
    DESCRIPTION_REGION, TITLE_REGION,
};

pub use canvas::Canvas;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("failed to load background image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode canvas as PNG: {0}")]
    Encoding(#[source] image::ImageError),

    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Inputs of one render: two Markdown regions and the background to draw them on.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub title_markdown: String,
    pub description_markdown: String,
    pub background: PathBuf,
}

/// Draw commands for both regions, computed independently.
#[derive(Debug, Clone, Default)]
pub struct CardLayout {
    pub title: Vec<DrawCommand>,
    pub description: Vec<DrawCommand>,
}

/// Lays out both regions. Each region starts from its own fixed offset, so an
/// empty title never shifts the description.
pub fn layout_card(
    title_markdown: &str,
    description_markdown: &str,
    fonts: &FontSet,
    tokenizer: &dyn MarkdownTokenizer,
) -> CardLayout {
    let family = fonts.family();
    let title_tokens = tokenizer.tokenize(title_markdown);
    let description_tokens = tokenizer.tokenize(description_markdown);
    CardLayout {
        title: render_document(fonts, &title_tokens, TITLE_REGION, family),
        description: render_document(fonts, &description_tokens, DESCRIPTION_REGION, family),
    }
}

/// Renders a card from already-read background bytes. CPU-bound.
pub fn render_card(
    background: &[u8],
    background_path: &std::path::Path,
    title_markdown: &str,
    description_markdown: &str,
    fonts: &FontSet,
    tokenizer: &dyn MarkdownTokenizer,
) -> Result<Vec<u8>, ComposeError> {
    let image = image::load_from_memory(background).map_err(|source| ComposeError::ImageLoad {
        path: background_path.to_path_buf(),
        source,
    })?;

    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    canvas.draw_background(&image);
    canvas.set_fill(canvas::WHITE);

    let layout = layout_card(title_markdown, description_markdown, fonts, tokenizer);
    if !fonts.has_outlines() && !(layout.title.is_empty() && layout.description.is_empty()) {
        warn!("No glyph outlines registered; text regions left blank");
    }
    for cmd in layout.title.iter().chain(layout.description.iter()) {
        canvas.fill_text(fonts, cmd);
    }
    debug!(
        title_lines = layout.title.len(),
        description_lines = layout.description.len(),
        "Card text drawn"
    );

    canvas.encode_png()
}

/// Full pipeline for one request: read the background, then render off the async executor.
pub async fn compose(
    request: RenderRequest,
    fonts: Arc<FontSet>,
    tokenizer: Arc<dyn MarkdownTokenizer>,
) -> Result<Vec<u8>, ComposeError> {
    let bytes = tokio::fs::read(&request.background)
        .await
        .map_err(|e| ComposeError::ImageLoad {
            path: request.background.clone(),
            source: image::ImageError::IoError(e),
        })?;

    tokio::task::spawn_blocking(move || {
        render_card(
            &bytes,
            &request.background,
            &request.title_markdown,
            &request.description_markdown,
            &fonts,
            tokenizer.as_ref(),
        )
    })
    .await?
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
