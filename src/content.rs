//! Paragraph extraction from rich content.

use crate::types::{Block, Content};

/// Shown when a record has no usable body.
pub const PLACEHOLDER: &str = "İçerik bulunmuyor.";

/// Split record content into display paragraphs.
///
/// - Plain text is split on blank lines (`"\n\n"`). Empty segments are kept
///   so the output mirrors the author's spacing.
/// - Block lists yield one paragraph per `paragraph` block that has
///   children, concatenating the child text runs in order. Headings, lists,
///   images and other block kinds are dropped.
/// - Missing content yields the single [`PLACEHOLDER`] paragraph.
pub fn paragraphs(content: &Content) -> Vec<String> {
    match content {
        Content::PlainText(text) => text.split("\n\n").map(str::to_string).collect(),
        Content::Blocks(blocks) => blocks.iter().filter_map(paragraph_text).collect(),
        Content::Missing => vec![PLACEHOLDER.to_string()],
    }
}

/// Paragraphs for article and project detail pages, where an empty plain
/// text body counts as missing.
pub fn detail_paragraphs(content: &Content) -> Vec<String> {
    match content {
        Content::PlainText(text) if text.is_empty() => vec![PLACEHOLDER.to_string()],
        _ => paragraphs(content),
    }
}

fn paragraph_text(block: &Block) -> Option<String> {
    if block.kind != "paragraph" {
        return None;
    }
    let children = block.children.as_ref()?;
    Some(
        children
            .iter()
            .filter_map(|run| run.text.as_deref())
            .collect(),
    )
}
