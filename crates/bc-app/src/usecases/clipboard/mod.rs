pub mod copy_selection;
pub mod cut_selection;
pub mod orchestrator;
pub mod paste_clipboard;
pub mod resolve_paste_target;

pub use copy_selection::{CopyReport, CopySelectionUseCase};
pub use cut_selection::CutSelectionUseCase;
pub use orchestrator::{ClipboardEvent, ClipboardOrchestrator, ClipboardOutcome};
pub use paste_clipboard::{PasteClipboardUseCase, PasteReport};
pub use resolve_paste_target::{
    Deletion, PastePlan, ResolveOutcome, SelectionKind, SelectionResolver,
};
