use crate::block::DocMeta;
use crate::ids::DocId;

/// Read access to the workspace's document metadata.
pub trait DocMetaPort: Send + Sync {
    fn doc_metas(&self) -> Vec<DocMeta>;

    fn title_of(&self, doc_id: &DocId) -> Option<String> {
        self.doc_metas()
            .into_iter()
            .find(|meta| &meta.id == doc_id)
            .map(|meta| meta.title)
    }
}
