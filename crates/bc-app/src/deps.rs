//! # Clipboard Dependencies / 剪贴板依赖
//!
//! Parameter grouping for the clipboard use cases. Not a builder: every
//! field is required, nothing is defaulted.

use std::sync::Arc;

use bc_core::ports::{DocumentPort, SelectionStatePort, SystemClipboardPort};

use crate::adapter_registry::AdapterRegistry;
use crate::middleware_chain::MiddlewareChain;

#[derive(Clone)]
pub struct ClipboardDeps {
    // Pipeline / 管道
    pub adapters: Arc<AdapterRegistry>,
    pub middlewares: Arc<MiddlewareChain>,

    // Editor / 编辑器
    pub selection: Arc<dyn SelectionStatePort>,
    pub document: Arc<dyn DocumentPort>,

    // Platform / 平台
    pub system_clipboard: Arc<dyn SystemClipboardPort>,
}
