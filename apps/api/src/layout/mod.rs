// Text layout for the card: greedy word wrap and Markdown block stacking.
// Pure CPU work; the composition pipeline calls it from spawn_blocking.

pub mod document;
pub mod font_metrics;
pub mod markdown;
pub mod wrap;

use document::RegionStyle;

// Re-export the public API consumed by the compose pipeline and the router.
pub use document::render_document;
pub use font_metrics::{FontDescriptor, FontWeight, TextMeasurer};
pub use markdown::{BlockToken, CommonMarkTokenizer, MarkdownTokenizer};
pub use wrap::DrawCommand;

pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1350;
pub const PADDING_X: f32 = 80.0;
/// Usable line width between the horizontal paddings.
pub const CONTENT_WIDTH: f32 = CANVAS_WIDTH as f32 - PADDING_X * 2.0;

pub const TITLE_REGION: RegionStyle = RegionStyle {
    start_y: 160.0,
    base_font_size: 72,
    line_height: 80.0,
};

pub const DESCRIPTION_REGION: RegionStyle = RegionStyle {
    start_y: 420.0,
    base_font_size: 48,
    line_height: 46.0,
};
