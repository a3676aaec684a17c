//! Block flavours and prop keys understood by the clipboard pipeline.

pub const PAGE: &str = "affine:page";
pub const NOTE: &str = "affine:note";
pub const PARAGRAPH: &str = "affine:paragraph";
pub const LIST: &str = "affine:list";
pub const CODE: &str = "affine:code";
pub const IMAGE: &str = "affine:image";
pub const ATTACHMENT: &str = "affine:attachment";
pub const EMBED_LINKED_DOC: &str = "affine:embed-linked-doc";

pub mod props {
    /// Plain text content of a text block.
    pub const TEXT: &str = "text";
    /// Paragraph style (`text`, `h1`..`h6`, `quote`) or attachment MIME type.
    pub const TYPE: &str = "type";
    pub const URL: &str = "url";
    pub const SOURCE_ID: &str = "sourceId";
    pub const NAME: &str = "name";
    pub const SIZE: &str = "size";
    pub const CAPTION: &str = "caption";
    /// Linked document id on `affine:embed-linked-doc`.
    pub const PAGE_ID: &str = "pageId";
    pub const TITLE: &str = "title";
    /// Reference to another block of the same document.
    pub const BLOCK_ID: &str = "blockId";
}

/// Flavours whose `text` prop holds editable text.
pub fn is_text_flavour(flavour: &str) -> bool {
    matches!(flavour, PARAGRAPH | LIST | CODE)
}
