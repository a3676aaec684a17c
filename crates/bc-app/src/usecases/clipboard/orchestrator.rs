//! Clipboard orchestrator
//!
//! Single entry point for UI clipboard events. Every failure stops here:
//! it is logged and handed back as a value, never propagated as a panic.
//!
//! # Architecture / 架构
//!
//! ```text
//! copy / cut / paste event
//!   ↓
//! ClipboardOrchestrator::handle
//!   ↓
//! Copy / Cut / Paste use case
//!   ↓
//! tracing (error channel) + ClipboardOutcome
//! ```

use tracing::{debug, error};

use bc_core::{BlockId, BlockSnapshot, ClipboardError, ClipboardPayload};

use super::copy_selection::{CopyReport, CopySelectionUseCase};
use super::cut_selection::CutSelectionUseCase;
use super::paste_clipboard::{PasteClipboardUseCase, PasteReport};
use crate::deps::ClipboardDeps;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardEvent {
    Copy,
    Cut,
    /// Paste, optionally carrying the event's own clipboard data.
    Paste(Option<ClipboardPayload>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardOutcome {
    Copied(CopyReport),
    Cut(CopyReport),
    Pasted(PasteReport),
}

pub struct ClipboardOrchestrator {
    copy: CopySelectionUseCase,
    cut: CutSelectionUseCase,
    paste: PasteClipboardUseCase,
}

impl ClipboardOrchestrator {
    pub fn new(deps: ClipboardDeps) -> Self {
        Self {
            copy: CopySelectionUseCase::new(deps.clone()),
            cut: CutSelectionUseCase::new(deps.clone()),
            paste: PasteClipboardUseCase::new(deps),
        }
    }

    pub async fn copy(&self) -> Result<CopyReport, ClipboardError> {
        self.copy.execute().await
    }

    pub async fn cut(&self) -> Result<CopyReport, ClipboardError> {
        self.cut.execute().await
    }

    pub async fn paste(&self, payload: Option<ClipboardPayload>) -> Result<PasteReport, ClipboardError> {
        self.paste.execute(payload).await
    }

    pub async fn paste_block_snapshot(
        &self,
        snapshot: BlockSnapshot,
        parent: &BlockId,
        index: usize,
    ) -> Result<Option<BlockId>, ClipboardError> {
        self.paste.paste_block_snapshot(snapshot, parent, index).await
    }

    /// Run the operation for `event` and report through the log.
    ///
    /// Returns the outcome on success and the error otherwise; callers that
    /// only forward UI events can ignore the return value.
    pub async fn handle(&self, event: ClipboardEvent) -> Result<ClipboardOutcome, ClipboardError> {
        let result = match event {
            ClipboardEvent::Copy => self.copy().await.map(ClipboardOutcome::Copied),
            ClipboardEvent::Cut => self.cut().await.map(ClipboardOutcome::Cut),
            ClipboardEvent::Paste(payload) => self.paste(payload).await.map(ClipboardOutcome::Pasted),
        };

        if let Err(err) = &result {
            if err.is_fatal() {
                error!(error = %err, "Clipboard operation failed");
            } else {
                debug!(reason = %err, "Clipboard operation skipped");
            }
        }
        result
    }
}
