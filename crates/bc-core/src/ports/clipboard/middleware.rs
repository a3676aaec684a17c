use crate::block::SliceSnapshot;

/// A transform applied to the in-flight slice.
///
/// Both hooks default to no-ops so a middleware only implements the
/// direction it cares about. An `Err` aborts the whole chain for the
/// current invocation.
pub trait ClipboardMiddlewarePort: Send + Sync {
    fn name(&self) -> &str;

    /// Runs on copy / cut, before the slice is materialized into representations.
    fn on_copy(&self, _slice: &mut SliceSnapshot) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs on paste, after decoding and before the slice reaches the document.
    fn on_paste(&self, _slice: &mut SliceSnapshot) -> anyhow::Result<()> {
        Ok(())
    }
}
