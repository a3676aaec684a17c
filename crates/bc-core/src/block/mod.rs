//! Block tree snapshots.
pub mod flavour;
mod snapshot;

use serde::{Deserialize, Serialize};

use crate::ids::DocId;

pub use snapshot::{BlockSnapshot, SliceSnapshot};

/// Workspace-level metadata of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    pub id: DocId,
    pub title: String,
}
