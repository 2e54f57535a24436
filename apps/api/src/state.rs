use std::sync::Arc;

use crate::config::Config;
use crate::fonts::FontSet;
use crate::layout::MarkdownTokenizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is established at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Registered font family, discovered once at startup.
    pub fonts: Arc<FontSet>,
    /// Pluggable Markdown tokenizer. Default: CommonMarkTokenizer.
    pub tokenizer: Arc<dyn MarkdownTokenizer>,
}
