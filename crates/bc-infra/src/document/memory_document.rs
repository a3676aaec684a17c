//! In-memory implementation of [`DocumentPort`].
//!
//! # Behavior / 行为
//! - Text lives in the `text` prop and is indexed by chars
//! - Every mutation joins the open undo transaction; `capture_sync` closes it
//! - Failed mutations validate before touching the tree, so they leave the
//!   document unchanged

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{bail, Context, Result};
use tracing::debug;

use bc_core::block::flavour;
use bc_core::config::DEFAULT_UNDO_MAX_LEVELS;
use bc_core::ports::{DocumentPort, IdGeneratorPort};
use bc_core::{
    BlockId, BlockSnapshot, DocId, SelectionSnapshot, SliceSnapshot, TextPoint, TextSelection,
    WorkspaceId,
};

use super::tree::{char_range, BlockTree};
use super::undo_stack::UndoStack;

struct DocInner {
    tree: BlockTree,
    history: UndoStack<BlockTree>,
}

impl DocInner {
    fn mutate(&mut self) -> &mut BlockTree {
        self.history.before_mutation(&self.tree);
        &mut self.tree
    }
}

pub struct MemoryDocument {
    doc_id: DocId,
    workspace_id: WorkspaceId,
    ids: Arc<dyn IdGeneratorPort>,
    inner: RwLock<DocInner>,
}

impl MemoryDocument {
    /// A blank document: an `affine:page` root holding one empty note.
    pub fn new(doc_id: DocId, workspace_id: WorkspaceId, ids: Arc<dyn IdGeneratorPort>) -> Self {
        let root = BlockSnapshot::new(ids.next_block_id(), flavour::PAGE)
            .with_children(vec![BlockSnapshot::new(ids.next_block_id(), flavour::NOTE)]);
        let tree = BlockTree::from_snapshot(&root).unwrap_or_default();
        Self::with_tree(doc_id, workspace_id, ids, tree, DEFAULT_UNDO_MAX_LEVELS)
    }

    /// Load a document from a root snapshot, keeping its block ids.
    pub fn from_snapshot(
        doc_id: DocId,
        workspace_id: WorkspaceId,
        ids: Arc<dyn IdGeneratorPort>,
        root: &BlockSnapshot,
    ) -> Result<Self> {
        let tree = BlockTree::from_snapshot(root).context("invalid document snapshot")?;
        Ok(Self::with_tree(doc_id, workspace_id, ids, tree, DEFAULT_UNDO_MAX_LEVELS))
    }

    fn with_tree(
        doc_id: DocId,
        workspace_id: WorkspaceId,
        ids: Arc<dyn IdGeneratorPort>,
        tree: BlockTree,
        max_levels: usize,
    ) -> Self {
        Self {
            doc_id,
            workspace_id,
            ids,
            inner: RwLock::new(DocInner {
                tree,
                history: UndoStack::with_max_levels(max_levels),
            }),
        }
    }

    /// Replace the undo depth (0 = unlimited). Clears the history.
    pub fn with_max_undo_levels(self, max_levels: usize) -> Self {
        {
            let mut inner = self.write();
            inner.history = UndoStack::with_max_levels(max_levels);
        }
        self
    }

    /// The whole document as a snapshot tree.
    pub fn to_snapshot(&self) -> Option<BlockSnapshot> {
        let inner = self.read();
        let root = inner.tree.root()?;
        inner.tree.snapshot(root)
    }

    pub fn block(&self, id: &BlockId) -> Option<BlockSnapshot> {
        self.read().tree.snapshot(id)
    }

    pub fn text_of(&self, id: &BlockId) -> Option<String> {
        self.read().tree.get(id).map(|node| node.text().to_string())
    }

    pub fn children_of(&self, id: &BlockId) -> Vec<BlockId> {
        self.read()
            .tree
            .get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub fn block_count(&self) -> usize {
        self.read().tree.len()
    }

    /// Revert the last undo step. Returns `false` when there is none.
    pub fn undo(&self) -> bool {
        let mut inner = self.write();
        let current = inner.tree.clone();
        match inner.history.undo(&current) {
            Some(previous) => {
                inner.tree = previous;
                debug!(doc_id = %self.doc_id, "Undo");
                true
            }
            None => false,
        }
    }

    /// Reapply the last undone step. Returns `false` when there is none.
    pub fn redo(&self) -> bool {
        let mut inner = self.write();
        let current = inner.tree.clone();
        match inner.history.redo(&current) {
            Some(next) => {
                inner.tree = next;
                debug!(doc_id = %self.doc_id, "Redo");
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.read().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.read().history.can_redo()
    }

    fn read(&self) -> RwLockReadGuard<'_, DocInner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, DocInner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn slice(&self, content: Vec<BlockSnapshot>) -> SliceSnapshot {
        SliceSnapshot::new(content, self.doc_id.clone(), self.workspace_id.clone())
    }
}

/// Start and end blocks of a multi-block text selection, which must be
/// siblings with the start block first. Returns their indices.
fn sibling_span(tree: &BlockTree, from: &BlockId, to: &BlockId) -> Result<(BlockId, usize, usize)> {
    tree.node(from)?;
    tree.node(to)?;
    let parent = match (tree.parent_of(from), tree.parent_of(to)) {
        (Some(a), Some(b)) if a == b => a.clone(),
        _ => bail!("text selection from {from} to {to} does not span sibling blocks"),
    };
    let (Some(start), Some(end)) = (tree.index_of(from), tree.index_of(to)) else {
        bail!("text selection from {from} to {to} is detached");
    };
    if start > end {
        bail!("text selection from {from} to {to} is reversed");
    }
    Ok((parent, start, end))
}

fn draft_text(tree: &BlockTree, selection: &TextSelection) -> Result<Vec<BlockSnapshot>> {
    let from = &selection.from;
    let to = match &selection.to {
        Some(to) if to.block_id != from.block_id => to,
        // Single block: the selected range only.
        _ => {
            let end = selection.end();
            let stop = end.index + end.length;
            let node = tree.node(&from.block_id)?;
            let mut block = tree
                .snapshot_shallow(&from.block_id)
                .context("selected block vanished")?;
            if node.has_text() {
                block.set_text(&node.text()[char_range(node.text(), from.index, stop)]);
            }
            return Ok(vec![block]);
        }
    };

    let (parent, start, end) = sibling_span(tree, &from.block_id, &to.block_id)?;
    let siblings = tree.node(&parent)?.children.clone();
    let mut content = Vec::with_capacity(end - start + 1);
    for (offset, id) in siblings[start..=end].iter().enumerate() {
        let node = tree.node(id)?;
        let block = if offset == 0 {
            let mut block = tree.snapshot_shallow(id).context("selected block vanished")?;
            if node.has_text() {
                block.set_text(&node.text()[char_range(node.text(), from.index, usize::MAX)]);
            }
            block
        } else if id == &to.block_id {
            let mut block = tree.snapshot_shallow(id).context("selected block vanished")?;
            if node.has_text() {
                block.set_text(&node.text()[char_range(node.text(), 0, to.index + to.length)]);
            }
            block
        } else {
            tree.snapshot(id).context("selected block vanished")?
        };
        content.push(block);
    }
    Ok(content)
}

fn draft_blocks(tree: &BlockTree, ids: &[BlockId]) -> Vec<BlockSnapshot> {
    let mut content: Vec<BlockSnapshot> = Vec::new();
    for id in ids {
        let nested = ids.iter().any(|other| tree.is_ancestor(other, id));
        let duplicate = content.iter().any(|block| &block.id == id);
        if nested || duplicate {
            continue;
        }
        if let Some(block) = tree.snapshot(id) {
            content.push(block);
        }
    }
    content
}

impl IdGeneratorPort for MemoryDocument {
    fn next_block_id(&self) -> BlockId {
        self.ids.next_block_id()
    }
}

impl DocumentPort for MemoryDocument {
    fn doc_id(&self) -> DocId {
        self.doc_id.clone()
    }

    fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id.clone()
    }

    fn root_id(&self) -> Option<BlockId> {
        self.read().tree.root().cloned()
    }

    fn contains(&self, id: &BlockId) -> bool {
        self.read().tree.contains(id)
    }

    fn parent_of(&self, id: &BlockId) -> Option<BlockId> {
        self.read().tree.parent_of(id).cloned()
    }

    fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.read().tree.index_of(id)
    }

    fn draft_slice(&self, selection: &SelectionSnapshot) -> Result<SliceSnapshot> {
        let inner = self.read();
        let content = match selection {
            SelectionSnapshot::Text(text) => draft_text(&inner.tree, text)?,
            SelectionSnapshot::Blocks(ids) | SelectionSnapshot::Images(ids) => {
                draft_blocks(&inner.tree, ids)
            }
        };
        if content.is_empty() {
            bail!("selection does not match any block of {}", self.doc_id);
        }
        Ok(self.slice(content))
    }

    fn delete_text(&self, selection: &TextSelection) -> Result<TextPoint> {
        let mut inner = self.write();
        let from = &selection.from;

        let to = match &selection.to {
            Some(to) if to.block_id != from.block_id => to,
            _ => {
                let end = selection.end();
                let stop = end.index + end.length;
                let node = inner.tree.node(&from.block_id)?;
                let mut text = node.text().to_string();
                let range = char_range(&text, from.index, stop);
                if !range.is_empty() {
                    text.replace_range(range, "");
                    if let Some(node) = inner.mutate().get_mut(&from.block_id) {
                        node.set_text(text);
                    }
                }
                return Ok(TextPoint::caret(from.block_id.clone(), from.index));
            }
        };

        let (parent, start, end) = sibling_span(&inner.tree, &from.block_id, &to.block_id)?;
        let head = {
            let text = inner.tree.node(&from.block_id)?.text();
            text[..char_range(text, from.index, from.index).start].to_string()
        };
        let tail = {
            let text = inner.tree.node(&to.block_id)?.text();
            let cut = to.index + to.length;
            text[char_range(text, cut, cut).start..].to_string()
        };
        let removed: Vec<BlockId> = inner.tree.node(&parent)?.children[start + 1..=end].to_vec();

        let tree = inner.mutate();
        tree.adopt_children(&to.block_id, &from.block_id);
        for id in &removed {
            tree.remove(id);
        }
        if let Some(node) = tree.get_mut(&from.block_id) {
            node.set_text(head + &tail);
        }
        debug!(removed = removed.len(), "Deleted text across blocks");
        Ok(TextPoint::caret(from.block_id.clone(), from.index))
    }

    fn delete_blocks(&self, ids: &[BlockId]) -> Result<()> {
        let mut inner = self.write();
        if let Some(root) = inner.tree.root() {
            if ids.contains(root) {
                bail!("cannot delete the root block {root}");
            }
        }
        let present: Vec<BlockId> = ids
            .iter()
            .filter(|id| inner.tree.contains(id))
            .cloned()
            .collect();
        if present.is_empty() {
            return Ok(());
        }

        let tree = inner.mutate();
        for id in &present {
            tree.remove(id);
        }
        debug!(deleted = present.len(), "Deleted blocks");
        Ok(())
    }

    fn check_insert(&self, slice: &SliceSnapshot, parent: &BlockId) -> Result<()> {
        let inner = self.read();
        inner.tree.node(parent)?;
        inner.tree.check_insertable(&slice.content)
    }

    fn insert_slice(&self, slice: &SliceSnapshot, parent: &BlockId, index: usize) -> Result<Vec<BlockId>> {
        let mut inner = self.write();
        inner.tree.node(parent)?;
        inner.tree.check_insertable(&slice.content)?;
        if slice.is_empty() {
            return Ok(Vec::new());
        }

        let tree = inner.mutate();
        let mut inserted = Vec::with_capacity(slice.content.len());
        for (offset, block) in slice.content.iter().enumerate() {
            tree.insert(block, parent, index.saturating_add(offset))?;
            inserted.push(block.id.clone());
        }
        debug!(parent = %parent, index, blocks = slice.block_count(), "Inserted slice");
        Ok(inserted)
    }

    fn capture_sync(&self) {
        let mut inner = self.write();
        let DocInner { tree, history } = &mut *inner;
        history.capture(tree);
    }
}
