mod adapter;
mod middleware;
mod system_clipboard;

pub use adapter::{AdapterContext, ClipboardAdapterPort};
pub use middleware::ClipboardMiddlewarePort;
pub use system_clipboard::SystemClipboardPort;
