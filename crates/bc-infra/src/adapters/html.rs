//! `text/html` adapter.
//!
//! Encodes text blocks as the matching HTML elements. Decoding is a flat,
//! regex based scan of block level elements, enough for markup produced by
//! browsers and office suites; nesting beyond one level is flattened.

use std::sync::OnceLock;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;

use bc_core::block::flavour::{self, props};
use bc_core::ports::{AdapterContext, ClipboardAdapterPort};
use bc_core::{BlockId, BlockSnapshot, ClipboardData, ClipboardItem, MimeType, SliceSnapshot};

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlAdapter;

impl HtmlAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardAdapterPort for HtmlAdapter {
    fn name(&self) -> &str {
        "html"
    }

    async fn encode(&self, slice: &SliceSnapshot, _mime: &MimeType) -> Result<Option<ClipboardData>> {
        let mut html = String::new();
        for block in &slice.content {
            render_block(block, &mut html);
        }
        Ok((!html.is_empty()).then(|| ClipboardData::text(html)))
    }

    async fn decode(&self, item: &ClipboardItem, ctx: &AdapterContext) -> Result<Option<SliceSnapshot>> {
        let Some(markup) = item.data.as_text() else {
            return Ok(None);
        };
        let content = parse_blocks(markup);
        if content.is_empty() {
            return Ok(None);
        }
        Ok(Some(SliceSnapshot::new(
            content,
            ctx.doc_id.clone(),
            ctx.workspace_id.clone(),
        )))
    }
}

// ---------------------------------------------------------------------------
// encode
// ---------------------------------------------------------------------------

fn render_block(block: &BlockSnapshot, out: &mut String) {
    let text = escape(block.text().unwrap_or_default());
    match block.flavour.as_str() {
        flavour::PARAGRAPH => {
            let tag = match block.prop_str(props::TYPE) {
                Some(heading @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6")) => heading,
                Some("quote") => "blockquote",
                _ => "p",
            };
            out.push_str(&format!("<{tag}>{text}</{tag}>"));
        }
        flavour::LIST => out.push_str(&format!("<ul><li>{text}</li></ul>")),
        flavour::CODE => out.push_str(&format!("<pre><code>{text}</code></pre>")),
        flavour::IMAGE => {
            let src = match (block.prop_str(props::URL), block.prop_str(props::SOURCE_ID)) {
                (Some(url), _) => url.to_string(),
                (None, Some(source)) => format!("blob:{source}"),
                (None, None) => return,
            };
            match block.prop_str(props::CAPTION) {
                Some(caption) => out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\">",
                    escape(&src),
                    escape(caption)
                )),
                None => out.push_str(&format!("<img src=\"{}\">", escape(&src))),
            }
        }
        flavour::EMBED_LINKED_DOC => {
            if let Some(page_id) = block.prop_str(props::PAGE_ID) {
                let label = block.prop_str(props::TITLE).unwrap_or(page_id);
                out.push_str(&format!(
                    "<p><a href=\"doc://{}\">{}</a></p>",
                    escape(page_id),
                    escape(label)
                ));
            }
        }
        flavour::ATTACHMENT => {
            if let Some(name) = block.prop_str(props::NAME) {
                out.push_str(&format!("<p>{}</p>", escape(name)));
            }
        }
        _ => {}
    }

    for child in &block.children {
        render_block(child, out);
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

fn element_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?is)<img\b([^>]*)>|<(p|h[1-6]|li|pre|blockquote)\b[^>]*>(.*?)</(?:p|h[1-6]|li|pre|blockquote)\s*>",
        )
        .expect("element pattern is valid")
    })
}

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<img\b([^>]*)>").expect("image pattern is valid"))
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
}

fn break_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("break pattern is valid"))
}

fn attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?is)\b([a-z-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern is valid")
    })
}

fn parse_blocks(markup: &str) -> Vec<BlockSnapshot> {
    let mut blocks = Vec::new();
    for captures in element_pattern().captures_iter(markup) {
        if let Some(attrs) = captures.get(1) {
            blocks.extend(image_block(attrs.as_str()));
            continue;
        }
        let (Some(tag), Some(inner)) = (captures.get(2), captures.get(3)) else {
            continue;
        };
        let tag = tag.as_str().to_ascii_lowercase();
        let text = text_content(inner.as_str());
        let text = if tag == "pre" { text } else { text.trim().to_string() };

        if !text.is_empty() {
            blocks.push(text_block(&tag, text));
        }
        for image in image_pattern().captures_iter(inner.as_str()) {
            blocks.extend(image.get(1).and_then(|attrs| image_block(attrs.as_str())));
        }
    }

    if blocks.is_empty() {
        // No block level markup: treat the visible text as lines.
        blocks = text_content(markup)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| BlockSnapshot::paragraph(BlockId::new(), line))
            .collect();
    }
    blocks
}

fn text_block(tag: &str, text: String) -> BlockSnapshot {
    match tag {
        "li" => BlockSnapshot::new(BlockId::new(), flavour::LIST)
            .with_prop(props::TYPE, "bulleted")
            .with_prop(props::TEXT, text),
        "pre" => BlockSnapshot::new(BlockId::new(), flavour::CODE).with_prop(props::TEXT, text),
        "blockquote" => BlockSnapshot::paragraph(BlockId::new(), text).with_prop(props::TYPE, "quote"),
        heading if heading.starts_with('h') => {
            BlockSnapshot::paragraph(BlockId::new(), text).with_prop(props::TYPE, heading)
        }
        _ => BlockSnapshot::paragraph(BlockId::new(), text),
    }
}

fn image_block(attrs: &str) -> Option<BlockSnapshot> {
    let mut src = None;
    let mut alt = None;
    for captures in attr_pattern().captures_iter(attrs) {
        let value = captures
            .get(2)
            .or_else(|| captures.get(3))
            .map(|m| decode_entities(m.as_str()));
        match captures.get(1).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
            Some("src") => src = value,
            Some("alt") => alt = value,
            _ => {}
        }
    }

    let src = src.filter(|src| !src.is_empty())?;
    let mut block = BlockSnapshot::new(BlockId::new(), flavour::IMAGE).with_prop(props::URL, src);
    if let Some(alt) = alt.filter(|alt| !alt.is_empty()) {
        block = block.with_prop(props::CAPTION, alt);
    }
    Some(block)
}

fn text_content(fragment: &str) -> String {
    let with_breaks = break_pattern().replace_all(fragment, "\n");
    let stripped = tag_pattern().replace_all(&with_breaks, "");
    decode_entities(&stripped)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
