//! # Clipboard configuration DTO / 剪贴板配置 DTO
//!
//! Pure data: built from a TOML value, no validation. Missing keys take the
//! defaults below.

/// Image proxy used by the editor when no other proxy is configured.
pub const DEFAULT_IMAGE_PROXY_ENDPOINT: &str =
    "https://affine-worker.toeverything.workers.dev/api/worker/image-proxy";

/// Default undo history depth of the in-memory document.
pub const DEFAULT_UNDO_MAX_LEVELS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardConfig {
    /// Attach the clipboard pipeline at all (still gated on platform support).
    pub enabled: bool,

    pub image_proxy: ImageProxyConfig,

    pub undo: UndoConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProxyConfig {
    /// Endpoint pasted image URLs are routed through, e.g. `https://host/image-proxy`
    pub default_endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoConfig {
    /// Maximum undo levels (0 = unlimited)
    pub max_levels: usize,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            image_proxy: ImageProxyConfig {
                default_endpoint: DEFAULT_IMAGE_PROXY_ENDPOINT.to_string(),
            },
            undo: UndoConfig {
                max_levels: DEFAULT_UNDO_MAX_LEVELS,
            },
        }
    }
}

impl ClipboardConfig {
    /// Create ClipboardConfig from TOML value
    /// 从 TOML 值创建 ClipboardConfig
    ///
    /// ```toml
    /// [clipboard]
    /// enabled = true
    ///
    /// [image_proxy]
    /// default_endpoint = "https://proxy.example.com/image-proxy"
    ///
    /// [undo]
    /// max_levels = 50
    /// ```
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let max_levels = match toml_value.get("undo").and_then(|u| u.get("max_levels")) {
            Some(value) => {
                let raw = value
                    .as_integer()
                    .ok_or_else(|| anyhow::anyhow!("undo.max_levels must be an integer"))?;
                usize::try_from(raw)
                    .map_err(|_| anyhow::anyhow!("undo.max_levels must not be negative"))?
            }
            None => defaults.undo.max_levels,
        };

        Ok(Self {
            enabled: toml_value
                .get("clipboard")
                .and_then(|c| c.get("enabled"))
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.enabled),
            image_proxy: ImageProxyConfig {
                default_endpoint: toml_value
                    .get("image_proxy")
                    .and_then(|p| p.get("default_endpoint"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or(defaults.image_proxy.default_endpoint),
            },
            undo: UndoConfig { max_levels },
        })
    }
}
