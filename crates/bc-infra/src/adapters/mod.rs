//! Clipboard format adapters.
//!
//! | MIME                  | adapter                  | priority |
//! |-----------------------|--------------------------|----------|
//! | `blocksuite/snapshot` | [`NativeSnapshotAdapter`] | 100     |
//! | `text/html`           | [`HtmlAdapter`]           | 90      |
//! | `image/*` (7 types)   | [`ImageAdapter`]          | 80      |
//! | `text/plain`          | [`MixTextAdapter`]        | 70      |
//! | `*/*`                 | [`AttachmentAdapter`]     | 60      |

use std::sync::Arc;

use bc_core::clipboard::IMAGE_MIME_TYPES;
use bc_core::ports::{BlobStorePort, ClipboardAdapterPort};
use bc_core::MimeType;

mod attachment;
mod html;
mod image;
mod native;
mod plain_text;

pub use attachment::AttachmentAdapter;
pub use html::HtmlAdapter;
pub use image::ImageAdapter;
pub use native::NativeSnapshotAdapter;
pub use plain_text::MixTextAdapter;

pub const NATIVE_PRIORITY: i32 = 100;
pub const HTML_PRIORITY: i32 = 90;
pub const IMAGE_PRIORITY: i32 = 80;
pub const PLAIN_TEXT_PRIORITY: i32 = 70;
pub const ATTACHMENT_PRIORITY: i32 = 60;

/// One entry of the default adapter table.
#[derive(Clone)]
pub struct AdapterSpec {
    pub mime: MimeType,
    pub adapter: Arc<dyn ClipboardAdapterPort>,
    pub priority: i32,
}

/// The adapters a page clipboard registers on connect.
pub fn default_adapters(blobs: Arc<dyn BlobStorePort>) -> Vec<AdapterSpec> {
    let image: Arc<dyn ClipboardAdapterPort> = Arc::new(ImageAdapter::new(blobs.clone()));

    let mut specs = vec![
        AdapterSpec {
            mime: MimeType::native_snapshot(),
            adapter: Arc::new(NativeSnapshotAdapter::new()),
            priority: NATIVE_PRIORITY,
        },
        AdapterSpec {
            mime: MimeType::text_html(),
            adapter: Arc::new(HtmlAdapter::new()),
            priority: HTML_PRIORITY,
        },
    ];
    specs.extend(IMAGE_MIME_TYPES.iter().map(|mime| AdapterSpec {
        mime: MimeType::from(*mime),
        adapter: image.clone(),
        priority: IMAGE_PRIORITY,
    }));
    specs.push(AdapterSpec {
        mime: MimeType::text_plain(),
        adapter: Arc::new(MixTextAdapter::new()),
        priority: PLAIN_TEXT_PRIORITY,
    });
    specs.push(AdapterSpec {
        mime: MimeType::any(),
        adapter: Arc::new(AttachmentAdapter::new(blobs)),
        priority: ATTACHMENT_PRIORITY,
    });
    specs
}
