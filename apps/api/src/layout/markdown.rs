//! Markdown → flat block tokens.
//!
//! Only top-level headings, paragraphs and lists are turned into renderable
//! tokens. Every other top-level block becomes `BlockToken::Unsupported` and is
//! skipped by the renderer. Inline markup inside a supported block is reduced
//! to its visible text: emphasis and strong markers, backticks and link
//! destinations are dropped, so `**bold**` is drawn as `bold`.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockToken {
    Heading { text: String },
    Paragraph { text: String },
    List { items: Vec<ListItem> },
    /// Any other top-level block (code block, quote, table, rule, HTML).
    Unsupported { kind: String },
}

/// Parses a Markdown string into top-level block tokens in document order.
pub trait MarkdownTokenizer: Send + Sync {
    fn tokenize(&self, markdown: &str) -> Vec<BlockToken>;
}

/// CommonMark tokenizer backed by comrak.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonMarkTokenizer;

impl MarkdownTokenizer for CommonMarkTokenizer {
    fn tokenize(&self, markdown: &str) -> Vec<BlockToken> {
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &Options::default());
        root.children().map(block_token).collect()
    }
}

fn block_token<'a>(node: &'a AstNode<'a>) -> BlockToken {
    let kind = match &node.data.borrow().value {
        NodeValue::Heading(_) => {
            return BlockToken::Heading {
                text: inline_text(node),
            }
        }
        NodeValue::Paragraph => {
            return BlockToken::Paragraph {
                text: inline_text(node),
            }
        }
        NodeValue::List(_) => {
            return BlockToken::List {
                items: node
                    .children()
                    .map(|item| ListItem {
                        text: item_text(item),
                    })
                    .collect(),
            }
        }
        NodeValue::CodeBlock(_) => "code",
        NodeValue::BlockQuote => "blockquote",
        NodeValue::ThematicBreak => "hr",
        NodeValue::HtmlBlock(_) => "html",
        NodeValue::Table(_) => "table",
        _ => "other",
    };
    BlockToken::Unsupported {
        kind: kind.to_string(),
    }
}

/// Text of a list item: its own paragraphs joined by spaces, nested lists dropped.
fn item_text<'a>(item: &'a AstNode<'a>) -> String {
    item.children()
        .filter(|child| matches!(child.data.borrow().value, NodeValue::Paragraph))
        .map(inline_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    collect_inline(node, &mut out);
    out.trim().to_string()
}

fn collect_inline<'a>(node: &'a AstNode<'a>, out: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => collect_inline(child, out),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(md: &str) -> Vec<BlockToken> {
        CommonMarkTokenizer.tokenize(md)
    }

    #[test]
    fn test_empty_document_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\n").is_empty());
    }

    #[test]
    fn test_heading_text() {
        assert_eq!(
            tokenize("# Hello World"),
            vec![BlockToken::Heading {
                text: "Hello World".to_string()
            }]
        );
    }

    #[test]
    fn test_paragraph_soft_breaks_become_spaces() {
        assert_eq!(
            tokenize("first line\nsecond line"),
            vec![BlockToken::Paragraph {
                text: "first line second line".to_string()
            }]
        );
    }

    #[test]
    fn test_inline_markers_are_dropped() {
        assert_eq!(
            tokenize("Use **bold** and `code` [here](https://example.com)"),
            vec![BlockToken::Paragraph {
                text: "Use bold and code here".to_string()
            }]
        );
    }

    #[test]
    fn test_list_items_in_order() {
        let tokens = tokenize("- one\n- two\n- three");
        assert_eq!(
            tokens,
            vec![BlockToken::List {
                items: vec![
                    ListItem { text: "one".into() },
                    ListItem { text: "two".into() },
                    ListItem { text: "three".into() },
                ]
            }]
        );
    }

    #[test]
    fn test_nested_list_content_is_dropped() {
        let tokens = tokenize("- outer\n  - inner");
        assert_eq!(
            tokens,
            vec![BlockToken::List {
                items: vec![ListItem {
                    text: "outer".into()
                }]
            }]
        );
    }

    #[test]
    fn test_unsupported_blocks_are_marked() {
        let tokens = tokenize("# Title\n\n```\nlet x = 1;\n```\n\n> quoted\n\n---\n\nbody");
        let kinds: Vec<&str> = tokens
            .iter()
            .map(|t| match t {
                BlockToken::Heading { .. } => "heading",
                BlockToken::Paragraph { .. } => "paragraph",
                BlockToken::List { .. } => "list",
                BlockToken::Unsupported { kind } => kind.as_str(),
            })
            .collect();
        assert_eq!(kinds, vec!["heading", "code", "blockquote", "hr", "paragraph"]);
    }

    #[test]
    fn test_document_order_is_preserved() {
        let tokens = tokenize("Intro\n\n## Section\n\n- a\n- b\n\nOutro");
        assert!(matches!(tokens[0], BlockToken::Paragraph { .. }));
        assert!(matches!(tokens[1], BlockToken::Heading { .. }));
        assert!(matches!(tokens[2], BlockToken::List { .. }));
        assert!(matches!(tokens[3], BlockToken::Paragraph { .. }));
    }
}
