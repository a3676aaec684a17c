//! Editor-native representation: the slice serialized as JSON.
//!
//! Lossless, so it wins over every other representation when the content
//! was copied from this editor.

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use bc_core::ports::{AdapterContext, ClipboardAdapterPort};
use bc_core::{BlockId, BlockSnapshot, ClipboardData, ClipboardItem, MimeType, SliceSnapshot};

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSnapshotAdapter;

impl NativeSnapshotAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardAdapterPort for NativeSnapshotAdapter {
    fn name(&self) -> &str {
        "native-snapshot"
    }

    async fn encode(&self, slice: &SliceSnapshot, _mime: &MimeType) -> Result<Option<ClipboardData>> {
        let json = serde_json::to_string(slice).context("failed to serialize slice snapshot")?;
        Ok(Some(ClipboardData::text(json)))
    }

    async fn decode(&self, item: &ClipboardItem, _ctx: &AdapterContext) -> Result<Option<SliceSnapshot>> {
        let text = item
            .data
            .as_text()
            .context("slice snapshot is not UTF-8 text")?;
        let slice: SliceSnapshot =
            serde_json::from_str(text).context("failed to parse slice snapshot")?;
        if let Some(id) = repeated_id(&slice) {
            bail!("slice snapshot repeats block id {id}");
        }
        Ok((!slice.is_empty()).then_some(slice))
    }
}

fn repeated_id(slice: &SliceSnapshot) -> Option<BlockId> {
    let mut seen = HashSet::new();
    let mut repeated = None;
    slice.visit(&mut |block: &BlockSnapshot| {
        if repeated.is_none() && !seen.insert(block.id.clone()) {
            repeated = Some(block.id.clone());
        }
    });
    repeated
}
