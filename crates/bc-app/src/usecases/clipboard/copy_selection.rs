use tracing::{debug, info, info_span, Instrument};

use bc_core::{ClipboardError, MimeType, SelectionSnapshot};

use crate::deps::ClipboardDeps;

/// What a copy (or the copy half of a cut) put on the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub mimes: Vec<MimeType>,
    pub blocks: usize,
}

/// Copy the current selection to the system clipboard.
///
/// # Behavior / 行为
/// - 1. Snapshot the current selection (text > block > image)
/// - 2. Draft a detached slice from the document
/// - 3. Run the middleware chain (copy direction)
/// - 4. Materialize one representation per capable adapter
/// - 5. Write the payload to the system clipboard
///
/// The document is never mutated.
pub struct CopySelectionUseCase {
    deps: ClipboardDeps,
}

impl CopySelectionUseCase {
    pub fn new(deps: ClipboardDeps) -> Self {
        Self { deps }
    }

    pub async fn execute(&self) -> Result<CopyReport, ClipboardError> {
        let selection = self
            .deps
            .selection
            .current()
            .snapshot()
            .ok_or(ClipboardError::NoSelection)?;

        self.copy_selection(&selection)
            .instrument(info_span!("usecase.clipboard.copy.execute"))
            .await
    }

    /// Steps 2-5 for an already captured selection. Shared with cut.
    pub(crate) async fn copy_selection(
        &self,
        selection: &SelectionSnapshot,
    ) -> Result<CopyReport, ClipboardError> {
        let slice = self
            .deps
            .document
            .draft_slice(selection)
            .map_err(ClipboardError::document)?;
        debug!(blocks = slice.block_count(), "Drafted slice from selection");

        let slice = self.deps.middlewares.run_copy(slice)?;

        let mut payload = self.deps.adapters.encode_all(&slice).await?;
        payload.ts_ms = chrono::Utc::now().timestamp_millis();
        let mimes = payload.mime_types();

        self.deps
            .system_clipboard
            .write(payload)
            .await
            .map_err(ClipboardError::system_clipboard)?;

        info!(representations = mimes.len(), "Selection copied to system clipboard");
        Ok(CopyReport {
            mimes,
            blocks: slice.block_count(),
        })
    }
}
