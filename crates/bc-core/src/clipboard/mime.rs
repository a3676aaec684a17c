use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Image MIME types the editor accepts as pasted pictures.
pub const IMAGE_MIME_TYPES: [&str; 7] = [
    "image/apng",
    "image/avif",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/svg+xml",
    "image/webp",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MimeType(pub String);

impl MimeType {
    pub fn text_plain() -> Self {
        Self("text/plain".into())
    }
    pub fn text_html() -> Self {
        Self("text/html".into())
    }
    /// Editor-native slice snapshot (JSON).
    pub fn native_snapshot() -> Self {
        Self("blocksuite/snapshot".into())
    }
    /// Catch-all pattern, matches any concrete type.
    pub fn any() -> Self {
        Self("*/*".into())
    }

    /// Lower-cased type/subtype without parameters (`text/plain;charset=utf-8` -> `text/plain`).
    pub fn essence(&self) -> String {
        self.0
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    pub fn is_wildcard(&self) -> bool {
        self.essence() == "*/*"
    }

    pub fn is_image(&self) -> bool {
        self.essence().starts_with("image/")
    }

    /// Whether this (possibly wildcard) pattern accepts the concrete `other` type.
    ///
    /// `*/*` matches everything, `image/*` matches every image subtype,
    /// otherwise the essences must be equal.
    pub fn matches(&self, other: &MimeType) -> bool {
        let pattern = self.essence();
        if pattern == "*/*" {
            return true;
        }
        let concrete = other.essence();
        match pattern.strip_suffix("/*") {
            Some(top) => concrete
                .split_once('/')
                .is_some_and(|(other_top, _)| other_top == top),
            None => pattern == concrete,
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MimeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(anyhow::anyhow!("empty mime type"));
        }
        Ok(MimeType(s.to_string()))
    }
}

impl From<&str> for MimeType {
    fn from(s: &str) -> Self {
        MimeType(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_essence_strips_parameters_and_case() {
        let mime = MimeType::from("Text/Plain; charset=utf-8");
        assert_eq!(mime.essence(), "text/plain");
    }

    #[test]
    fn test_wildcard_matches_anything() {
        assert!(MimeType::any().matches(&MimeType::from("application/pdf")));
        assert!(MimeType::any().matches(&MimeType::text_html()));
    }

    #[test]
    fn test_subtype_wildcard() {
        let images = MimeType::from("image/*");
        assert!(images.matches(&MimeType::from("image/png")));
        assert!(!images.matches(&MimeType::text_plain()));
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        assert!(MimeType::text_html().matches(&MimeType::from("TEXT/HTML")));
        assert!(!MimeType::text_html().matches(&MimeType::text_plain()));
    }

    #[test]
    fn test_from_str_rejects_empty() {
        assert!("  ".parse::<MimeType>().is_err());
        assert_eq!("image/png".parse::<MimeType>().unwrap(), MimeType::from("image/png"));
    }
}
