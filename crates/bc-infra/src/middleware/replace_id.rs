//! Gives every pasted block a fresh id from the destination document, so
//! pasting the same content twice never collides.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use bc_core::block::flavour::props;
use bc_core::ports::{ClipboardMiddlewarePort, IdGeneratorPort};
use bc_core::{BlockId, BlockSnapshot, SliceSnapshot};

pub struct ReplaceIdMiddleware {
    ids: Arc<dyn IdGeneratorPort>,
}

impl ReplaceIdMiddleware {
    pub fn new(ids: Arc<dyn IdGeneratorPort>) -> Self {
        Self { ids }
    }
}

impl ClipboardMiddlewarePort for ReplaceIdMiddleware {
    fn name(&self) -> &str {
        "replace-id"
    }

    fn on_paste(&self, slice: &mut SliceSnapshot) -> anyhow::Result<()> {
        let mut mapping: HashMap<BlockId, BlockId> = HashMap::new();
        slice.visit(&mut |block: &BlockSnapshot| {
            mapping
                .entry(block.id.clone())
                .or_insert_with(|| self.ids.next_block_id());
        });

        slice.visit_mut(&mut |block: &mut BlockSnapshot| {
            if let Some(fresh) = mapping.get(&block.id) {
                block.id = fresh.clone();
            }
            // References to blocks of the same slice follow the rename.
            let target = block
                .prop_str(props::BLOCK_ID)
                .and_then(|old| mapping.get(&BlockId::from(old)));
            if let Some(fresh) = target {
                block
                    .props
                    .insert(props::BLOCK_ID.to_string(), Value::String(fresh.to_string()));
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::block::flavour;
    use bc_core::{DocId, WorkspaceId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SequentialIds(AtomicUsize);

    impl IdGeneratorPort for SequentialIds {
        fn next_block_id(&self) -> BlockId {
            BlockId::from(format!("new-{}", self.0.fetch_add(1, Ordering::SeqCst)))
        }
    }

    #[test]
    fn test_ids_and_references_are_remapped() {
        let middleware = ReplaceIdMiddleware::new(Arc::new(SequentialIds(AtomicUsize::new(0))));
        let mut slice = SliceSnapshot::new(
            vec![
                BlockSnapshot::paragraph(BlockId::from("a"), "target"),
                BlockSnapshot::new(BlockId::from("b"), flavour::EMBED_LINKED_DOC)
                    .with_prop(props::BLOCK_ID, "a"),
                BlockSnapshot::new(BlockId::from("c"), flavour::EMBED_LINKED_DOC)
                    .with_prop(props::BLOCK_ID, "elsewhere"),
            ],
            DocId::from("doc"),
            WorkspaceId::from("ws"),
        );
        let shape = slice.shape();

        middleware.on_paste(&mut slice).unwrap();

        let ids: Vec<String> = slice.block_ids().into_iter().map(String::from).collect();
        assert_eq!(ids, vec!["new-0", "new-1", "new-2"]);
        assert_eq!(slice.content[1].prop_str(props::BLOCK_ID), Some("new-0"));
        assert_eq!(slice.content[2].prop_str(props::BLOCK_ID), Some("elsewhere"));
        assert_eq!(slice.shape(), shape);
    }
}
