use tracing::{info, info_span, Instrument};

use bc_core::{ClipboardError, SelectionSnapshot};

use super::copy_selection::{CopyReport, CopySelectionUseCase};
use crate::deps::ClipboardDeps;

/// Copy the selection, then delete it from the document.
///
/// The deletion runs only after the clipboard write succeeded and is wrapped
/// in sync points, so a single undo restores the document.
pub struct CutSelectionUseCase {
    deps: ClipboardDeps,
    copy: CopySelectionUseCase,
}

impl CutSelectionUseCase {
    pub fn new(deps: ClipboardDeps) -> Self {
        let copy = CopySelectionUseCase::new(deps.clone());
        Self { deps, copy }
    }

    pub async fn execute(&self) -> Result<CopyReport, ClipboardError> {
        let selection = self
            .deps
            .selection
            .current()
            .snapshot()
            .ok_or(ClipboardError::NoSelection)?;

        async {
            let report = self.copy.copy_selection(&selection).await?;
            self.delete_selection(&selection)?;
            info!(blocks = report.blocks, "Selection cut");
            Ok::<_, ClipboardError>(report)
        }
        .instrument(info_span!("usecase.clipboard.cut.execute"))
        .await
    }

    fn delete_selection(&self, selection: &SelectionSnapshot) -> Result<(), ClipboardError> {
        let document = &self.deps.document;
        document.capture_sync();
        let result = match selection {
            SelectionSnapshot::Text(text) => document.delete_text(text).map(|_| ()),
            SelectionSnapshot::Blocks(ids) | SelectionSnapshot::Images(ids) => {
                document.delete_blocks(ids)
            }
        };
        document.capture_sync();
        result.map_err(ClipboardError::document)
    }
}
