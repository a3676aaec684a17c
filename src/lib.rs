//! blockclip Library
//!
//! 块编辑器剪贴板管道: bootstrap (tracing, config) and the page clipboard
//! host that wires the default adapters and middlewares into the pipeline.

pub mod bootstrap;
pub mod page_clipboard;

// 重新导出常用类型
pub use page_clipboard::{PageClipboard, PageClipboardDeps};
