use std::sync::RwLock;

use bc_core::ports::SelectionStatePort;
use bc_core::SelectionState;

/// Selection state set directly by the host (or a test).
#[derive(Debug, Default)]
pub struct MemorySelectionState {
    state: RwLock<SelectionState>,
}

impl MemorySelectionState {
    pub fn new(state: SelectionState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn set(&self, state: SelectionState) {
        *self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    pub fn clear(&self) {
        self.set(SelectionState::default());
    }
}

impl SelectionStatePort for MemorySelectionState {
    fn current(&self) -> SelectionState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
