//! Document Port
//!
//! Mutation and lookup interface of the live block document the clipboard
//! reads from (copy / cut) and writes into (cut / paste).

use anyhow::Result;

use crate::block::SliceSnapshot;
use crate::ids::{BlockId, DocId, WorkspaceId};
use crate::selection::{SelectionSnapshot, TextPoint, TextSelection};

pub trait DocumentPort: Send + Sync {
    fn doc_id(&self) -> DocId;

    fn workspace_id(&self) -> WorkspaceId;

    /// Root block (`affine:page`), `None` for an empty document.
    fn root_id(&self) -> Option<BlockId>;

    fn contains(&self, id: &BlockId) -> bool;

    fn parent_of(&self, id: &BlockId) -> Option<BlockId>;

    /// Position of `id` among its parent's children.
    fn index_of(&self, id: &BlockId) -> Option<usize>;

    /// Detached copy of the selected content.
    ///
    /// Text selections are trimmed to the selected range; block and image
    /// selections copy whole subtrees.
    fn draft_slice(&self, selection: &SelectionSnapshot) -> Result<SliceSnapshot>;

    /// Delete the selected text and return the resulting caret.
    ///
    /// For a selection spanning blocks, the remainder of the end block is
    /// merged into the start block and every block from after the start
    /// block through the end block is removed.
    fn delete_text(&self, selection: &TextSelection) -> Result<TextPoint>;

    /// Delete blocks and their subtrees. Unknown ids are ignored.
    fn delete_blocks(&self, ids: &[BlockId]) -> Result<()>;

    /// Fail when [`insert_slice`](Self::insert_slice) would reject `slice`
    /// under `parent` in the current document. Never mutates.
    ///
    /// Ids are checked against the document as it is now, so a slice reusing
    /// the id of a block about to be deleted is rejected too.
    fn check_insert(&self, slice: &SliceSnapshot, parent: &BlockId) -> Result<()>;

    /// Insert the slice's top-level blocks under `parent` starting at
    /// `index` (clamped to the child count). Returns the inserted top-level ids.
    fn insert_slice(
        &self,
        slice: &SliceSnapshot,
        parent: &BlockId,
        index: usize,
    ) -> Result<Vec<BlockId>>;

    /// Close the current undo transaction: everything mutated until the next
    /// sync point is undone as one step.
    fn capture_sync(&self);
}
