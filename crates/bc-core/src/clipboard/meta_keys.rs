//! Well-known [`ClipboardItem`](super::ClipboardItem) meta keys.

/// Original file name of a pasted file.
pub const FILE_NAME: &str = "file.name";

/// Name of the adapter that produced a copied representation.
pub const PRODUCED_BY: &str = "sys.produced_by";
