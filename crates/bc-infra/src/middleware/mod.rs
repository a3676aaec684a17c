//! Clipboard middlewares, in the order a page clipboard installs them.

use std::sync::Arc;

use bc_core::ports::{ClipboardMiddlewarePort, DocMetaPort, IdGeneratorPort};
use bc_core::ClipboardConfig;

mod image_proxy;
mod replace_id;
mod title;

pub use image_proxy::ImageProxyMiddleware;
pub use replace_id::ReplaceIdMiddleware;
pub use title::TitleMiddleware;

pub fn default_middlewares(
    ids: Arc<dyn IdGeneratorPort>,
    metas: Arc<dyn DocMetaPort>,
    config: &ClipboardConfig,
) -> Vec<Arc<dyn ClipboardMiddlewarePort>> {
    vec![
        Arc::new(ReplaceIdMiddleware::new(ids)),
        Arc::new(TitleMiddleware::new(metas)),
        Arc::new(ImageProxyMiddleware::new(
            config.image_proxy.default_endpoint.clone(),
        )),
    ]
}
