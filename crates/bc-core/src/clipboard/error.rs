use crate::clipboard::MimeType;

/// Failures of a single copy / cut / paste invocation.
///
/// Every variant is caught at the orchestrator boundary; none of them is
/// allowed to crash the host, and none of them leaves a partial mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// Paste with no text, block or image selection. Silent no-op.
    #[error("no paste target: nothing is selected")]
    NoTargetSelection,

    /// Copy or cut with nothing selected. Silent no-op.
    #[error("nothing selected to copy")]
    NoSelection,

    #[error("no adapter for clipboard types [{}]", join_mimes(.mimes))]
    AdapterNotFound { mimes: Vec<MimeType> },

    #[error("middleware `{middleware}` failed: {reason}")]
    MiddlewareFailure { middleware: String, reason: String },

    #[error("cannot deserialize `{mime}` payload: {reason}")]
    DeserializationFailure { mime: MimeType, reason: String },

    #[error("document mutation failed: {0}")]
    Document(String),

    #[error("system clipboard unavailable: {0}")]
    SystemClipboard(String),
}

impl ClipboardError {
    /// `false` for the "nothing to do" outcomes the user should not hear about.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ClipboardError::NoTargetSelection | ClipboardError::NoSelection
        )
    }

    pub fn document(err: anyhow::Error) -> Self {
        ClipboardError::Document(format!("{err:#}"))
    }

    pub fn system_clipboard(err: anyhow::Error) -> Self {
        ClipboardError::SystemClipboard(format!("{err:#}"))
    }
}

fn join_mimes(mimes: &[MimeType]) -> String {
    mimes
        .iter()
        .map(|m| m.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
