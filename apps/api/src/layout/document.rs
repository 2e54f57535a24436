//! Block renderer: turns block tokens into positioned, wrapped draw commands.
//!
//! One call owns one layout cursor. The cursor starts at `style.start_y` and
//! only moves down; it is never shared between the title and description regions.

use tracing::debug;

use crate::layout::font_metrics::{FontDescriptor, FontWeight, TextMeasurer};
use crate::layout::markdown::BlockToken;
use crate::layout::wrap::{wrap_text, DrawCommand};
use crate::layout::{CONTENT_WIDTH, PADDING_X};

const BULLET: &str = "•";
/// Paragraphs and lists are set this many pixels smaller than headings.
const BODY_SIZE_REDUCTION: u32 = 20;

/// Starting cursor and type scale for one Markdown region of the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStyle {
    pub start_y: f32,
    pub base_font_size: u32,
    pub line_height: f32,
}

impl RegionStyle {
    fn heading_font(&self, family: &str) -> FontDescriptor {
        FontDescriptor::new(family, self.base_font_size, FontWeight::Bold)
    }

    fn body_font(&self, family: &str) -> FontDescriptor {
        let size = self
            .base_font_size
            .saturating_sub(BODY_SIZE_REDUCTION)
            .max(1);
        FontDescriptor::new(family, size, FontWeight::Normal)
    }
}

/// Lays out `tokens` top to bottom and returns draw commands in document order.
pub fn render_document(
    measurer: &dyn TextMeasurer,
    tokens: &[BlockToken],
    style: RegionStyle,
    family: &str,
) -> Vec<DrawCommand> {
    let line_height = style.line_height;
    let mut y = style.start_y;
    let mut commands = Vec::new();

    for token in tokens {
        match token {
            BlockToken::Heading { text } => {
                let font = style.heading_font(family);
                let wrapped = wrap(measurer, text, &font, y, line_height);
                y = wrapped.end_y + line_height * 2.0;
                commands.extend(wrapped.commands);
            }
            BlockToken::Paragraph { text } => {
                let font = style.body_font(family);
                let wrapped = wrap(measurer, text, &font, y, line_height);
                y = wrapped.end_y + line_height * 2.0;
                commands.extend(wrapped.commands);
            }
            BlockToken::List { items } => {
                let font = style.body_font(family);
                for item in items {
                    let bulleted = format!("{BULLET} {}", item.text);
                    let wrapped = wrap(measurer, &bulleted, &font, y, line_height);
                    y = wrapped.end_y + line_height;
                    commands.extend(wrapped.commands);
                }
                y += line_height;
            }
            BlockToken::Unsupported { kind } => {
                debug!(kind = %kind, "skipping unsupported markdown block");
            }
        }
    }

    commands
}

fn wrap(
    measurer: &dyn TextMeasurer,
    text: &str,
    font: &FontDescriptor,
    y: f32,
    line_height: f32,
) -> crate::layout::wrap::WrappedText {
    wrap_text(
        measurer,
        text,
        font,
        PADDING_X,
        y,
        CONTENT_WIDTH,
        line_height,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
