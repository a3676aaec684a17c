use tokio::sync::Mutex;
use tracing::{debug, info, info_span, Instrument};

use bc_core::ports::{AdapterContext, DocumentPort};
use bc_core::{BlockId, BlockSnapshot, ClipboardError, ClipboardPayload, MimeType, SliceSnapshot};

use super::resolve_paste_target::{Deletion, PastePlan, ResolveOutcome, SelectionResolver};
use crate::deps::ClipboardDeps;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteReport {
    pub adapter: String,
    pub mime: MimeType,
    pub parent: BlockId,
    pub index: usize,
    /// Top-level blocks inserted, in document order.
    pub inserted: Vec<BlockId>,
}

/// Paste clipboard content into the document.
///
/// # Behavior / 行为
/// - 1. Resolve the paste target from the selection (no selection → no-op)
/// - 2. Read the payload (system clipboard, or the one carried by the event)
/// - 3. Decode it with the highest-priority matching adapter
/// - 4. Run the middleware chain (paste direction)
/// - 5. Check the slice can be inserted at the target
/// - 6. Capture a sync point, delete the selection, insert the slice
///
/// Steps 1-5 never touch the document, so any failure before step 6 leaves
/// it unchanged. Pastes are serialized: one waits for the previous one to
/// finish before resolving its target.
pub struct PasteClipboardUseCase {
    deps: ClipboardDeps,
    resolver: SelectionResolver,
    gate: Mutex<()>,
}

impl PasteClipboardUseCase {
    pub fn new(deps: ClipboardDeps) -> Self {
        let resolver = SelectionResolver::new(deps.selection.clone(), deps.document.clone());
        Self {
            deps,
            resolver,
            gate: Mutex::new(()),
        }
    }

    /// `payload` is the content carried by the paste event; `None` reads the
    /// system clipboard.
    pub async fn execute(&self, payload: Option<ClipboardPayload>) -> Result<PasteReport, ClipboardError> {
        let _serialized = self.gate.lock().await;

        let plan = match self.resolver.resolve() {
            ResolveOutcome::Resolved(plan) => plan,
            ResolveOutcome::NoTarget => return Err(ClipboardError::NoTargetSelection),
        };

        let span = info_span!(
            "usecase.clipboard.paste.execute",
            target = %plan.target,
            kind = ?plan.kind,
        );
        self.paste_into(plan, payload).instrument(span).await
    }

    async fn paste_into(
        &self,
        plan: PastePlan,
        payload: Option<ClipboardPayload>,
    ) -> Result<PasteReport, ClipboardError> {
        let payload = match payload {
            Some(payload) => payload,
            None => self
                .deps
                .system_clipboard
                .read()
                .await
                .map_err(ClipboardError::system_clipboard)?,
        };
        debug!(types = ?payload.mime_types(), "Read clipboard payload");

        let ctx = AdapterContext {
            doc_id: self.deps.document.doc_id(),
            workspace_id: self.deps.document.workspace_id(),
        };
        let decoded = self.deps.adapters.decode_first(&payload, &ctx).await?;
        let slice = self.deps.middlewares.run_paste(decoded.slice)?;

        // Decoding may have awaited; the target must still be there.
        if !self.deps.document.contains(&plan.parent) {
            return Err(ClipboardError::Document(format!(
                "paste target {} no longer exists",
                plan.parent
            )));
        }
        // Nothing is deleted unless the insert is known to succeed.
        self.deps
            .document
            .check_insert(&slice, &plan.parent)
            .map_err(ClipboardError::document)?;

        let inserted = self.commit(&plan.deletion, &plan.parent, plan.index, &slice)?;
        info!(adapter = %decoded.adapter, mime = %decoded.mime, inserted = inserted.len(), "Paste completed");

        Ok(PasteReport {
            adapter: decoded.adapter,
            mime: decoded.mime,
            parent: plan.parent,
            index: plan.index,
            inserted,
        })
    }

    /// Paste one block snapshot under `parent` at `index`, bypassing the
    /// selection and the adapters.
    ///
    /// # Behavior / 行为
    /// - runs the paste middlewares on the snapshot (fresh ids, titles, ...)
    /// - inserts between two sync points: one undo step
    /// - returns the id of the inserted block, `None` when the middlewares
    ///   left nothing to insert
    pub async fn paste_block_snapshot(
        &self,
        snapshot: BlockSnapshot,
        parent: &BlockId,
        index: usize,
    ) -> Result<Option<BlockId>, ClipboardError> {
        let _serialized = self.gate.lock().await;
        let span = info_span!("usecase.clipboard.paste_block_snapshot", parent = %parent, index);
        let _enter = span.enter();

        let document = self.deps.document.as_ref();
        let slice = SliceSnapshot::new(vec![snapshot], document.doc_id(), document.workspace_id());
        let slice = self.deps.middlewares.run_paste(slice)?;
        if slice.is_empty() {
            debug!("Nothing left to paste after middlewares");
            return Ok(None);
        }
        document
            .check_insert(&slice, parent)
            .map_err(ClipboardError::document)?;

        let inserted = self.commit(&Deletion::None, parent, index, &slice)?;
        info!(blocks = slice.block_count(), "Block snapshot pasted");
        Ok(inserted.into_iter().next())
    }

    /// Deletion and insertion between two sync points: one undo step.
    fn commit(
        &self,
        deletion: &Deletion,
        parent: &BlockId,
        index: usize,
        slice: &SliceSnapshot,
    ) -> Result<Vec<BlockId>, ClipboardError> {
        let document = self.deps.document.as_ref();
        document.capture_sync();
        let result = apply(document, deletion, parent, index, slice);
        document.capture_sync();
        result.map_err(ClipboardError::document)
    }
}

fn apply(
    document: &dyn DocumentPort,
    deletion: &Deletion,
    parent: &BlockId,
    index: usize,
    slice: &SliceSnapshot,
) -> anyhow::Result<Vec<BlockId>> {
    match deletion {
        Deletion::None => {}
        Deletion::Text(text) => {
            document.delete_text(text)?;
        }
        Deletion::Blocks(ids) => document.delete_blocks(ids)?,
    }
    document.insert_slice(slice, parent, index)
}
