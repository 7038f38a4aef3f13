//! Renderers for chunk content
//!
//! One pure renderer per representation; only the linker calls [`render`].

pub mod code;
pub mod markup;

use crate::chunk::ChunkContent;

/// Render chunk content to text
pub fn render(content: &ChunkContent) -> String {
    match content {
        ChunkContent::Text(text) => text.clone(),
        ChunkContent::CodeTree(node) => code::render(node),
        ChunkContent::MarkupTree(node) => markup::render(node),
    }
}
