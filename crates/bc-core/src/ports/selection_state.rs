use crate::selection::SelectionState;

/// Read-only view of the UI's current selections.
pub trait SelectionStatePort: Send + Sync {
    fn current(&self) -> SelectionState;
}
