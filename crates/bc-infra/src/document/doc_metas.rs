use std::sync::RwLock;

use bc_core::ports::DocMetaPort;
use bc_core::DocMeta;

/// Workspace doc metas held in memory.
#[derive(Debug, Default)]
pub struct MemoryDocMetas {
    metas: RwLock<Vec<DocMeta>>,
}

impl MemoryDocMetas {
    pub fn new(metas: Vec<DocMeta>) -> Self {
        Self {
            metas: RwLock::new(metas),
        }
    }

    /// Insert `meta`, replacing the entry with the same doc id.
    pub fn upsert(&self, meta: DocMeta) {
        let mut metas = self.metas.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        match metas.iter_mut().find(|existing| existing.id == meta.id) {
            Some(existing) => *existing = meta,
            None => metas.push(meta),
        }
    }
}

impl DocMetaPort for MemoryDocMetas {
    fn doc_metas(&self) -> Vec<DocMeta> {
        self.metas
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
