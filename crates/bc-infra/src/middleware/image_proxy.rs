//! Routes pasted proxied image URLs through the configured default proxy.
//!
//! `https://other-proxy/image?url=<target>` becomes
//! `<default endpoint>?url=<target>`. Direct URLs are left alone.

use bc_core::block::flavour::{self, props};
use bc_core::ports::ClipboardMiddlewarePort;
use bc_core::{BlockSnapshot, SliceSnapshot};

const URL_QUERY: &str = "?url=";

pub struct ImageProxyMiddleware {
    default_endpoint: String,
}

impl ImageProxyMiddleware {
    pub fn new(default_endpoint: impl Into<String>) -> Self {
        Self {
            default_endpoint: default_endpoint.into(),
        }
    }

    fn rewrite(&self, url: &str) -> Option<String> {
        let (endpoint, target) = url.split_once(URL_QUERY)?;
        if endpoint.is_empty() || endpoint == self.default_endpoint {
            return None;
        }
        Some(format!("{}{URL_QUERY}{target}", self.default_endpoint))
    }
}

impl ClipboardMiddlewarePort for ImageProxyMiddleware {
    fn name(&self) -> &str {
        "image-proxy"
    }

    fn on_paste(&self, slice: &mut SliceSnapshot) -> anyhow::Result<()> {
        if self.default_endpoint.is_empty() {
            return Ok(());
        }
        slice.visit_mut(&mut |block: &mut BlockSnapshot| {
            if block.flavour != flavour::IMAGE {
                return;
            }
            if let Some(url) = block.prop_str(props::URL).and_then(|url| self.rewrite(url)) {
                block.props.insert(props::URL.to_string(), url.into());
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::{BlockId, DocId, WorkspaceId};

    fn image(url: &str) -> BlockSnapshot {
        BlockSnapshot::new(BlockId::new(), flavour::IMAGE).with_prop(props::URL, url)
    }

    #[test]
    fn test_rewrites_foreign_proxy_only() {
        let middleware = ImageProxyMiddleware::new("https://proxy.local/img");
        let mut slice = SliceSnapshot::new(
            vec![
                image("https://other.example/proxy?url=https://cdn.example/a.png"),
                image("https://proxy.local/img?url=https://cdn.example/b.png"),
                image("https://cdn.example/c.png"),
            ],
            DocId::from("doc"),
            WorkspaceId::from("ws"),
        );

        middleware.on_paste(&mut slice).unwrap();

        let urls: Vec<_> = slice.content.iter().filter_map(|b| b.prop_str(props::URL)).collect();
        assert_eq!(
            urls,
            vec![
                "https://proxy.local/img?url=https://cdn.example/a.png",
                "https://proxy.local/img?url=https://cdn.example/b.png",
                "https://cdn.example/c.png",
            ]
        );
    }
}
