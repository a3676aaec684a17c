//! clipboard-probe: run the clipboard pipeline against documents on disk.
//!
//! Documents are JSON block snapshots (the page block at the root), clipboard
//! payloads are JSON `ClipboardPayload`s. Results go to stdout as JSON, logs
//! go to stderr.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;

use bc_app::ClipboardEvent;
use bc_core::ports::IdGeneratorPort;
use bc_core::{
    BlockId, BlockSnapshot, ClipboardConfig, ClipboardPayload, DocId, SelectionState,
    TextSelection, WorkspaceId,
};
use bc_infra::{
    InMemorySystemClipboard, MemoryBlobStore, MemoryDocMetas, MemoryDocument,
    MemorySelectionState, UuidIdGenerator,
};
use blockclip_lib::bootstrap::{init_tracing_subscriber, load_config_or_default};
use blockclip_lib::{PageClipboard, PageClipboardDeps};

/// Clipboard pipeline probe for blockclip documents
#[derive(Parser, Debug)]
#[command(name = "clipboard-probe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy a selection and print the clipboard payload
    Copy {
        /// Document snapshot (JSON)
        #[arg(long)]
        doc: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Write the payload here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Paste a payload into a document and print the result
    Paste {
        /// Document snapshot (JSON)
        #[arg(long)]
        doc: PathBuf,

        /// Clipboard payload (JSON)
        #[arg(long)]
        payload: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Write the resulting document here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List the representations held by a payload
    Inspect {
        /// Clipboard payload (JSON)
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// Text selection as `block:index[:length]`
    #[arg(long, conflicts_with_all = ["blocks", "images"])]
    text: Option<String>,

    /// Comma separated block ids
    #[arg(long, value_delimiter = ',', conflicts_with = "images")]
    blocks: Vec<String>,

    /// Comma separated image block ids
    #[arg(long, value_delimiter = ',')]
    images: Vec<String>,
}

impl SelectionArgs {
    fn to_state(&self) -> Result<SelectionState> {
        if let Some(text) = &self.text {
            return parse_text_selection(text).map(SelectionState::text);
        }
        if !self.blocks.is_empty() {
            return Ok(SelectionState::blocks(
                self.blocks.iter().map(|id| BlockId::from(id.as_str())),
            ));
        }
        if !self.images.is_empty() {
            return Ok(SelectionState::images(
                self.images.iter().map(|id| BlockId::from(id.as_str())),
            ));
        }
        Ok(SelectionState::default())
    }
}

fn parse_text_selection(raw: &str) -> Result<TextSelection> {
    let mut parts = raw.split(':');
    let block = parts
        .next()
        .filter(|block| !block.is_empty())
        .ok_or_else(|| anyhow!("Missing block id in text selection: {raw}"))?;
    let index = match parts.next() {
        Some(index) => index
            .parse()
            .with_context(|| format!("Invalid index in text selection: {raw}"))?,
        None => 0,
    };
    let length = match parts.next() {
        Some(length) => length
            .parse()
            .with_context(|| format!("Invalid length in text selection: {raw}"))?,
        None => 0,
    };
    if parts.next().is_some() {
        bail!("Text selection must be block:index[:length], got {raw}");
    }
    Ok(TextSelection::within(BlockId::from(block), index, length))
}

/// One document with its page clipboard, connected.
struct Session {
    page: PageClipboard,
    document: Arc<MemoryDocument>,
    clipboard: Arc<InMemorySystemClipboard>,
}

impl Session {
    fn open(
        doc_path: &Path,
        selection: SelectionState,
        clipboard: InMemorySystemClipboard,
        config: ClipboardConfig,
    ) -> Result<Self> {
        let root: BlockSnapshot = read_json(doc_path)?;
        let doc_id = doc_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("probe");

        let ids: Arc<dyn IdGeneratorPort> = Arc::new(UuidIdGenerator::new());
        let document = Arc::new(
            MemoryDocument::from_snapshot(
                DocId::from(doc_id),
                WorkspaceId::from("local"),
                ids.clone(),
                &root,
            )?
            .with_max_undo_levels(config.undo.max_levels),
        );
        let clipboard = Arc::new(clipboard);

        let page = PageClipboard::new(
            PageClipboardDeps {
                selection: Arc::new(MemorySelectionState::new(selection)),
                document: document.clone(),
                ids,
                metas: Arc::new(MemoryDocMetas::new(Vec::new())),
                system_clipboard: clipboard.clone(),
                blobs: Arc::new(MemoryBlobStore::new()),
            },
            config,
        );
        if !page.connect() {
            bail!("Clipboard pipeline is disabled");
        }

        Ok(Self {
            page,
            document,
            clipboard,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_json(value: &serde_json::Value, out: Option<&Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

async fn run_copy(
    doc: &Path,
    selection: &SelectionArgs,
    out: Option<&Path>,
    config: ClipboardConfig,
) -> Result<()> {
    let session = Session::open(doc, selection.to_state()?, InMemorySystemClipboard::new(), config)?;

    session.page.handle(ClipboardEvent::Copy).await?;

    let payload = session.clipboard.contents().await;
    write_json(&serde_json::to_value(&payload)?, out)
}

async fn run_paste(
    doc: &Path,
    payload: &Path,
    selection: &SelectionArgs,
    out: Option<&Path>,
    config: ClipboardConfig,
) -> Result<()> {
    let payload: ClipboardPayload = read_json(payload)?;
    let session = Session::open(
        doc,
        selection.to_state()?,
        InMemorySystemClipboard::with_payload(payload),
        config,
    )?;

    let report = session.page.orchestrator().paste(None).await?;
    info!(
        adapter = %report.adapter,
        mime = %report.mime,
        inserted = report.inserted.len(),
        "Pasted"
    );

    let document = session
        .document
        .to_snapshot()
        .ok_or_else(|| anyhow!("Document has no root block"))?;
    write_json(
        &json!({
            "adapter": report.adapter,
            "mime": report.mime,
            "parent": report.parent,
            "index": report.index,
            "inserted": report.inserted,
            "document": document,
        }),
        out,
    )
}

fn run_inspect(input: &Path) -> Result<()> {
    let payload: ClipboardPayload = read_json(input)?;
    let items: Vec<_> = payload
        .items
        .iter()
        .map(|item| {
            json!({
                "mime": item.mime,
                "size": item.data.len(),
                "text": item.data.as_text().is_some(),
                "meta": item.meta,
            })
        })
        .collect();
    write_json(
        &json!({ "copied_at": format_ms(payload.ts_ms), "items": items }),
        None,
    )
}

fn format_ms(ts_ms: i64) -> Option<String> {
    (ts_ms > 0)
        .then(|| chrono::DateTime::from_timestamp_millis(ts_ms))
        .flatten()
        .map(|at| at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing_subscriber(cli.log_dir.as_deref())?;
    let config = load_config_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Copy {
            doc,
            selection,
            out,
        } => run_copy(&doc, &selection, out.as_deref(), config).await,
        Command::Paste {
            doc,
            payload,
            selection,
            out,
        } => run_paste(&doc, &payload, &selection, out.as_deref(), config).await,
        Command::Inspect { input } => run_inspect(&input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_selection() {
        let selection = parse_text_selection("p1:2:3").unwrap();
        assert_eq!(selection, TextSelection::within(BlockId::from("p1"), 2, 3));

        let caret = parse_text_selection("p1:4").unwrap();
        assert_eq!(caret, TextSelection::within(BlockId::from("p1"), 4, 0));
    }

    #[test]
    fn test_parse_text_selection_rejects_garbage() {
        assert!(parse_text_selection(":1").is_err());
        assert!(parse_text_selection("p1:x").is_err());
        assert!(parse_text_selection("p1:1:2:3").is_err());
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(0), None);
        assert_eq!(
            format_ms(1_700_000_000_123).as_deref(),
            Some("2023-11-14T22:13:20.123Z")
        );
    }

    #[test]
    fn test_images_flag_selects_images() {
        let cli = Cli::parse_from([
            "clipboard-probe",
            "copy",
            "--doc",
            "doc.json",
            "--images",
            "img1,img2",
        ]);
        let Command::Copy { selection, .. } = cli.command else {
            panic!("expected copy");
        };
        assert_eq!(
            selection.to_state().unwrap(),
            SelectionState::images([BlockId::from("img1"), BlockId::from("img2")])
        );
    }

    #[test]
    fn test_selection_flags_conflict() {
        for (flag, value) in [("--blocks", "a"), ("--text", "a:0")] {
            let result = Cli::try_parse_from([
                "clipboard-probe",
                "copy",
                "--doc",
                "doc.json",
                "--images",
                "img1",
                flag,
                value,
            ]);
            assert!(result.is_err(), "{flag} must conflict with --images");
        }
    }

    #[test]
    fn test_cli_parses_paste() {
        let cli = Cli::parse_from([
            "clipboard-probe",
            "paste",
            "--doc",
            "doc.json",
            "--payload",
            "payload.json",
            "--blocks",
            "a,b",
        ]);
        match cli.command {
            Command::Paste { selection, .. } => assert_eq!(selection.blocks, vec!["a", "b"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
