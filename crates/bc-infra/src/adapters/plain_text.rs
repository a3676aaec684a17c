//! `text/plain` adapter.
//!
//! Copy: one line per block that carries readable text (linked docs by
//! title, attachments by name). Paste: one paragraph per non-empty line.

use anyhow::Result;
use async_trait::async_trait;

use bc_core::block::flavour::{self, props};
use bc_core::ports::{AdapterContext, ClipboardAdapterPort};
use bc_core::{BlockId, BlockSnapshot, ClipboardData, ClipboardItem, MimeType, SliceSnapshot};

#[derive(Debug, Default, Clone, Copy)]
pub struct MixTextAdapter;

impl MixTextAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn line_of(block: &BlockSnapshot) -> Option<&str> {
    match block.flavour.as_str() {
        flavour::EMBED_LINKED_DOC => block
            .prop_str(props::TITLE)
            .or_else(|| block.prop_str(props::PAGE_ID)),
        flavour::ATTACHMENT => block.prop_str(props::NAME),
        flavour::IMAGE => block.prop_str(props::CAPTION),
        _ => block.text(),
    }
}

#[async_trait]
impl ClipboardAdapterPort for MixTextAdapter {
    fn name(&self) -> &str {
        "mix-text"
    }

    async fn encode(&self, slice: &SliceSnapshot, _mime: &MimeType) -> Result<Option<ClipboardData>> {
        let mut lines = Vec::new();
        slice.visit(&mut |block: &BlockSnapshot| {
            if let Some(line) = line_of(block) {
                lines.push(line.to_string());
            }
        });
        if lines.is_empty() {
            return Ok(None);
        }
        Ok(Some(ClipboardData::text(lines.join("\n"))))
    }

    async fn decode(&self, item: &ClipboardItem, ctx: &AdapterContext) -> Result<Option<SliceSnapshot>> {
        let Some(text) = item.data.as_text() else {
            return Ok(None);
        };
        let content: Vec<BlockSnapshot> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| BlockSnapshot::paragraph(BlockId::new(), line))
            .collect();
        if content.is_empty() {
            return Ok(None);
        }
        Ok(Some(SliceSnapshot::new(
            content,
            ctx.doc_id.clone(),
            ctx.workspace_id.clone(),
        )))
    }
}
