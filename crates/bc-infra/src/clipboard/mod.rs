mod in_memory;
mod selection_state;

pub use in_memory::InMemorySystemClipboard;
pub use selection_state::MemorySelectionState;
