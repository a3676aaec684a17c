//! Paste target resolution
//!
//! Turns the current UI selection into a [`PastePlan`]: what to delete and
//! where to insert. Selection kinds are tried in a fixed order and the first
//! present one wins:
//!
//! 1. text selection  → caret block, selected text deleted
//! 2. block selection → last selected block, every selected block deleted
//! 3. image selection → last selected image block, every selected image deleted
//!
//! Resolution only plans. Nothing is mutated here; the paste use case
//! commits the deletion once decoding and the middleware chain succeeded.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use bc_core::ports::{DocumentPort, SelectionStatePort};
use bc_core::{BlockId, SelectionState, TextSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Text,
    Block,
    Image,
}

/// What a paste removes before inserting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    None,
    Text(TextSelection),
    Blocks(Vec<BlockId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastePlan {
    pub kind: SelectionKind,
    /// Block the selection resolved to.
    pub target: BlockId,
    pub deletion: Deletion,
    /// Insertion point, valid once `deletion` has been applied.
    pub parent: BlockId,
    pub index: usize,
}

/// Tagged result of resolution: either a plan, or stop here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(PastePlan),
    NoTarget,
}

pub struct SelectionResolver {
    selection: Arc<dyn SelectionStatePort>,
    document: Arc<dyn DocumentPort>,
}

impl SelectionResolver {
    pub fn new(selection: Arc<dyn SelectionStatePort>, document: Arc<dyn DocumentPort>) -> Self {
        Self {
            selection,
            document,
        }
    }

    pub fn resolve(&self) -> ResolveOutcome {
        let state = self.selection.current();
        self.resolve_state(&state)
    }

    pub fn resolve_state(&self, state: &SelectionState) -> ResolveOutcome {
        let plan = self
            .from_text(state)
            .or_else(|| self.from_blocks(state))
            .or_else(|| self.from_images(state));

        match plan {
            Some(plan) => {
                debug!(kind = ?plan.kind, target = %plan.target, parent = %plan.parent, index = plan.index, "Resolved paste target");
                ResolveOutcome::Resolved(plan)
            }
            None => ResolveOutcome::NoTarget,
        }
    }

    fn from_text(&self, state: &SelectionState) -> Option<PastePlan> {
        let text = state.text.as_ref()?;
        // A selection spanning blocks collapses into its start block once
        // deleted, so the caret ends up there.
        let caret_block = if text.is_multi_block() {
            text.from.block_id.clone()
        } else {
            text.end().block_id.clone()
        };
        if !self.document.contains(&caret_block) {
            return None;
        }

        let deletion = if text.is_collapsed() {
            Deletion::None
        } else {
            Deletion::Text(text.clone())
        };
        let (parent, index) = self.insertion_after(&caret_block, 0)?;

        Some(PastePlan {
            kind: SelectionKind::Text,
            target: caret_block,
            deletion,
            parent,
            index,
        })
    }

    fn from_blocks(&self, state: &SelectionState) -> Option<PastePlan> {
        let ids: Vec<BlockId> = state.blocks.iter().map(|s| s.block_id.clone()).collect();
        self.plan_block_removal(SelectionKind::Block, ids)
    }

    fn from_images(&self, state: &SelectionState) -> Option<PastePlan> {
        let ids: Vec<BlockId> = state.images.iter().map(|s| s.block_id.clone()).collect();
        self.plan_block_removal(SelectionKind::Image, ids)
    }

    fn plan_block_removal(&self, kind: SelectionKind, ids: Vec<BlockId>) -> Option<PastePlan> {
        let root = self.document.root_id();
        let ids: Vec<BlockId> = ids
            .into_iter()
            .filter(|id| self.document.contains(id) && Some(id) != root.as_ref())
            .collect();
        let last = ids.last()?.clone();
        let removed: HashSet<BlockId> = ids.iter().cloned().collect();

        // Never insert under a block that is about to be deleted.
        let mut anchor = last.clone();
        while let Some(parent) = self.document.parent_of(&anchor) {
            if !removed.contains(&parent) {
                break;
            }
            anchor = parent;
        }

        let removed_before = match self.document.parent_of(&anchor) {
            Some(parent) => {
                let anchor_index = self.document.index_of(&anchor).unwrap_or(0);
                removed
                    .iter()
                    .filter(|id| self.document.parent_of(id).as_ref() == Some(&parent))
                    .filter(|id| self.document.index_of(id).is_some_and(|i| i <= anchor_index))
                    .count()
            }
            None => 0,
        };
        let (parent, index) = self.insertion_after(&anchor, removed_before)?;

        Some(PastePlan {
            kind,
            target: last,
            deletion: Deletion::Blocks(ids),
            parent,
            index,
        })
    }

    /// `(parent, index)` immediately after `block`, once `removed_before`
    /// siblings at or before it are gone. A block without a parent (the
    /// root) yields the start of the document.
    fn insertion_after(&self, block: &BlockId, removed_before: usize) -> Option<(BlockId, usize)> {
        match self.document.parent_of(block) {
            Some(parent) => {
                let index = self.document.index_of(block)?;
                Some((parent, (index + 1).saturating_sub(removed_before)))
            }
            None => Some((self.document.root_id()?, 0)),
        }
    }
}
