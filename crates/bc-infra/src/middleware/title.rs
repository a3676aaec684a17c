//! Fills in the title of linked-doc blocks from the workspace doc metas.

use std::sync::Arc;

use bc_core::block::flavour::{self, props};
use bc_core::ports::{ClipboardMiddlewarePort, DocMetaPort};
use bc_core::{BlockSnapshot, DocId, SliceSnapshot};

pub struct TitleMiddleware {
    metas: Arc<dyn DocMetaPort>,
}

impl TitleMiddleware {
    pub fn new(metas: Arc<dyn DocMetaPort>) -> Self {
        Self { metas }
    }

    fn apply(&self, slice: &mut SliceSnapshot) {
        let metas = self.metas.doc_metas();
        slice.visit_mut(&mut |block: &mut BlockSnapshot| {
            if block.flavour != flavour::EMBED_LINKED_DOC {
                return;
            }
            let Some(page_id) = block.prop_str(props::PAGE_ID).map(DocId::from) else {
                return;
            };
            if let Some(meta) = metas.iter().find(|meta| meta.id == page_id) {
                block.props.insert(props::TITLE.to_string(), meta.title.clone().into());
            }
        });
    }
}

impl ClipboardMiddlewarePort for TitleMiddleware {
    fn name(&self) -> &str {
        "title"
    }

    fn on_copy(&self, slice: &mut SliceSnapshot) -> anyhow::Result<()> {
        self.apply(slice);
        Ok(())
    }

    fn on_paste(&self, slice: &mut SliceSnapshot) -> anyhow::Result<()> {
        self.apply(slice);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocMetas;
    use bc_core::{BlockId, DocMeta, WorkspaceId};

    #[test]
    fn test_known_docs_get_titles() {
        let metas = MemoryDocMetas::new(vec![DocMeta {
            id: DocId::from("d2"),
            title: "Roadmap".to_string(),
        }]);
        let middleware = TitleMiddleware::new(Arc::new(metas));
        let mut slice = SliceSnapshot::new(
            vec![
                BlockSnapshot::new(BlockId::from("known"), flavour::EMBED_LINKED_DOC)
                    .with_prop(props::PAGE_ID, "d2"),
                BlockSnapshot::new(BlockId::from("unknown"), flavour::EMBED_LINKED_DOC)
                    .with_prop(props::PAGE_ID, "d9")
                    .with_prop(props::TITLE, "Old"),
            ],
            DocId::from("doc"),
            WorkspaceId::from("ws"),
        );

        middleware.on_paste(&mut slice).unwrap();

        assert_eq!(slice.content[0].prop_str(props::TITLE), Some("Roadmap"));
        assert_eq!(slice.content[1].prop_str(props::TITLE), Some("Old"));
    }
}
