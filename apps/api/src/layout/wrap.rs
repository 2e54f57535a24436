//! Greedy word wrap.
//!
//! Words are appended to the current line while the measured candidate line
//! (including a trailing space) fits `max_width`. The word that overflows is
//! deferred to the next line; words are never split and never hyphenated.

use crate::layout::font_metrics::{FontDescriptor, TextMeasurer};

/// One line of text placed at a baseline coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub text: String,
    pub x: f32,
    /// Alphabetic baseline of the line.
    pub y: f32,
    pub font: FontDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedText {
    pub commands: Vec<DrawCommand>,
    /// Baseline of the last emitted line, or the start position if nothing was emitted.
    pub end_y: f32,
}

/// Wraps `text` into lines no wider than `max_width` where possible.
///
/// A text without words produces no commands and `end_y == start_y`. A single
/// word wider than `max_width` still gets its own line.
pub fn wrap_text(
    measurer: &dyn TextMeasurer,
    text: &str,
    font: &FontDescriptor,
    x: f32,
    start_y: f32,
    max_width: f32,
    line_height: f32,
) -> WrappedText {
    let mut words = text.split_whitespace().peekable();
    if words.peek().is_none() {
        return WrappedText {
            commands: Vec::new(),
            end_y: start_y,
        };
    }

    let mut commands = Vec::new();
    let mut y = start_y;
    let mut line = String::new();

    let emit = |line: &str, y: f32, commands: &mut Vec<DrawCommand>| {
        commands.push(DrawCommand {
            text: line.trim_end().to_string(),
            x,
            y,
            font: font.clone(),
        });
    };

    for word in words {
        let candidate = format!("{line}{word} ");
        if !line.is_empty() && measurer.measure(&candidate, font) > max_width {
            emit(&line, y, &mut commands);
            y += line_height;
            line = format!("{word} ");
        } else {
            line = candidate;
        }
    }
    // The final line is always emitted.
    emit(&line, y, &mut commands);

    WrappedText {
        commands,
        end_y: y,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
