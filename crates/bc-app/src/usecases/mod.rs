//! Business logic use cases
//!
//! [UI clipboard event]
//         ↓
// ClipboardOrchestrator
//         ↓
// ---------------------------------
// CopySelectionUseCase   → system clipboard
// CutSelectionUseCase    → system clipboard + document (one undo step)
// PasteClipboardUseCase  → document (one undo step)
// ---------------------------------

pub mod clipboard;
