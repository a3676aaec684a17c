//! Clipboard payload model
//!
//! A [`ClipboardPayload`] is what one copy writes to (or one paste reads from)
//! the system clipboard. It groups several [`ClipboardItem`]s, one per MIME
//! type, each holding the same logical content in a different representation
//! (editor-native snapshot, HTML, plain text, image bytes...).
//!
//! External applications pick whichever representation they understand, and
//! the paste side picks the highest-priority one it has an adapter for.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::clipboard::MimeType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipboardData {
    /// UTF-8 text
    Text { text: String },

    /// raw bytes (image, files, etc.)
    Bytes { bytes: Vec<u8> },
}

impl ClipboardData {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            bytes: bytes.into(),
        }
    }

    /// Text view of the data; bytes are interpreted as UTF-8 when valid.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ClipboardData::Text { text } => Some(text),
            ClipboardData::Bytes { bytes } => std::str::from_utf8(bytes).ok(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ClipboardData::Text { text } => text.as_bytes(),
            ClipboardData::Bytes { bytes } => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClipboardItem {
    /// MIME type, e.g. "text/plain", "image/png"
    pub mime: MimeType,

    /// payload
    pub data: ClipboardData,

    /// optional hints (file name for attachments, etc.)
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl ClipboardItem {
    pub fn new(mime: MimeType, data: ClipboardData) -> Self {
        Self {
            mime,
            data,
            meta: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClipboardPayload {
    /// unix epoch millis
    #[serde(default)]
    pub ts_ms: i64,

    /// one item per MIME type, in the order they were produced
    pub items: Vec<ClipboardItem>,
}

impl ClipboardPayload {
    pub fn new(items: Vec<ClipboardItem>) -> Self {
        Self { ts_ms: 0, items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn mime_types(&self) -> Vec<MimeType> {
        self.items.iter().map(|item| item.mime.clone()).collect()
    }

    /// First item whose type is accepted by `pattern` (which may be a wildcard).
    pub fn find(&self, pattern: &MimeType) -> Option<&ClipboardItem> {
        self.items.iter().find(|item| pattern.matches(&item.mime))
    }

    /// Adds an item, replacing an existing item of the same type.
    pub fn push(&mut self, item: ClipboardItem) {
        let essence = item.mime.essence();
        self.items.retain(|existing| existing.mime.essence() != essence);
        self.items.push(item);
    }
}
