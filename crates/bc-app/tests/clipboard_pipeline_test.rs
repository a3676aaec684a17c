//! Copy / cut / paste through the full pipeline: default adapters, default
//! middlewares, in-memory document and system clipboard.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::Notify;

use bc_app::{
    AdapterRegistry, ClipboardDeps, ClipboardEvent, ClipboardOrchestrator, ClipboardOutcome,
    DisposableGroup, MiddlewareChain,
};
use bc_core::block::flavour::{self, props};
use bc_core::clipboard::meta_keys;
use bc_core::ports::{AdapterContext, ClipboardAdapterPort, ClipboardMiddlewarePort, DocumentPort};
use bc_core::{
    BlockId, BlockSnapshot, ClipboardConfig, ClipboardData, ClipboardError, ClipboardItem,
    ClipboardPayload, DocId, DocMeta, MimeType, SelectionState, SliceSnapshot, TextSelection,
    WorkspaceId,
};
use bc_infra::adapters::default_adapters;
use bc_infra::middleware::default_middlewares;
use bc_infra::{
    InMemorySystemClipboard, MemoryBlobStore, MemoryDocMetas, MemoryDocument, MemorySelectionState,
    UuidIdGenerator,
};

static TRACE_INIT: Once = Once::new();

fn init_tracing() {
    TRACE_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn id(s: &str) -> BlockId {
    BlockId::from(s)
}

struct Harness {
    document: Arc<MemoryDocument>,
    selection: Arc<MemorySelectionState>,
    clipboard: Arc<InMemorySystemClipboard>,
    adapters: Arc<AdapterRegistry>,
    middlewares: Arc<MiddlewareChain>,
    orchestrator: ClipboardOrchestrator,
    handles: DisposableGroup,
}

/// page > note > [p1 "hello", p2 "world", p3 "third"], every default
/// adapter and middleware installed.
fn harness() -> Harness {
    init_tracing();

    let root = BlockSnapshot::new(id("page"), flavour::PAGE).with_children(vec![
        BlockSnapshot::new(id("note"), flavour::NOTE).with_children(vec![
            BlockSnapshot::paragraph(id("p1"), "hello"),
            BlockSnapshot::paragraph(id("p2"), "world"),
            BlockSnapshot::paragraph(id("p3"), "third"),
        ]),
    ]);
    let document = Arc::new(
        MemoryDocument::from_snapshot(
            DocId::from("doc"),
            WorkspaceId::from("ws"),
            Arc::new(UuidIdGenerator::new()),
            &root,
        )
        .unwrap(),
    );
    let selection = Arc::new(MemorySelectionState::default());
    let clipboard = Arc::new(InMemorySystemClipboard::new());
    let metas = Arc::new(MemoryDocMetas::new(vec![DocMeta {
        id: DocId::from("d2"),
        title: "Roadmap".to_string(),
    }]));

    let adapters = Arc::new(AdapterRegistry::new());
    let middlewares = Arc::new(MiddlewareChain::new());
    let mut handles = DisposableGroup::new();
    for spec in default_adapters(Arc::new(MemoryBlobStore::new())) {
        handles.add(adapters.register_adapter(spec.mime, spec.adapter, spec.priority));
    }
    for middleware in default_middlewares(document.clone(), metas, &ClipboardConfig::default()) {
        handles.add(middlewares.use_middleware(middleware));
    }

    let deps = ClipboardDeps {
        adapters: adapters.clone(),
        middlewares: middlewares.clone(),
        selection: selection.clone(),
        document: document.clone(),
        system_clipboard: clipboard.clone(),
    };

    Harness {
        document,
        selection,
        clipboard,
        adapters,
        middlewares,
        orchestrator: ClipboardOrchestrator::new(deps),
        handles,
    }
}

fn payload(items: Vec<(&str, ClipboardData)>) -> ClipboardPayload {
    ClipboardPayload::new(
        items
            .into_iter()
            .map(|(mime, data)| ClipboardItem::new(MimeType::from(mime), data))
            .collect(),
    )
}

fn caret(block: &str, index: usize) -> SelectionState {
    SelectionState::text(TextSelection::within(id(block), index, 0))
}

/// Counts decode calls, always declines.
#[derive(Default)]
struct SpyAdapter {
    decodes: AtomicUsize,
}

#[async_trait]
impl ClipboardAdapterPort for SpyAdapter {
    fn name(&self) -> &str {
        "spy"
    }

    async fn encode(&self, _slice: &SliceSnapshot, _mime: &MimeType) -> Result<Option<ClipboardData>> {
        Ok(None)
    }

    async fn decode(&self, _item: &ClipboardItem, _ctx: &AdapterContext) -> Result<Option<SliceSnapshot>> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

struct FailingMiddleware;

impl ClipboardMiddlewarePort for FailingMiddleware {
    fn name(&self) -> &str {
        "failing"
    }

    fn on_paste(&self, _slice: &mut SliceSnapshot) -> Result<()> {
        Err(anyhow!("refusing pasted content"))
    }
}

/// Rewrites every pasted block id to `pinned`, after the id replacement.
struct PinnedIdMiddleware {
    pinned: BlockId,
}

impl ClipboardMiddlewarePort for PinnedIdMiddleware {
    fn name(&self) -> &str {
        "pinned-id"
    }

    fn on_paste(&self, slice: &mut SliceSnapshot) -> Result<()> {
        slice.visit_mut(&mut |block: &mut BlockSnapshot| block.id = self.pinned.clone());
        Ok(())
    }
}

/// Parks inside `encode` / `decode` until released.
#[derive(Default)]
struct GatedAdapter {
    entered: Notify,
    release: Notify,
}

impl GatedAdapter {
    const MIME: &'static str = "text/x-gated";

    async fn wait(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[async_trait]
impl ClipboardAdapterPort for GatedAdapter {
    fn name(&self) -> &str {
        "gated"
    }

    async fn encode(&self, _slice: &SliceSnapshot, _mime: &MimeType) -> Result<Option<ClipboardData>> {
        self.wait().await;
        Ok(Some(ClipboardData::text("gated")))
    }

    async fn decode(&self, item: &ClipboardItem, ctx: &AdapterContext) -> Result<Option<SliceSnapshot>> {
        self.wait().await;
        let text = item.data.as_text().unwrap_or_default();
        Ok(Some(SliceSnapshot::new(
            vec![BlockSnapshot::paragraph(BlockId::new(), text)],
            ctx.doc_id.clone(),
            ctx.workspace_id.clone(),
        )))
    }
}

#[tokio::test]
async fn test_copy_writes_every_concrete_representation() {
    let h = harness();
    let before = h.document.to_snapshot();
    h.selection.set(SelectionState::blocks([id("p1"), id("p2")]));

    let report = h.orchestrator.copy().await.unwrap();

    assert_eq!(report.blocks, 2);
    assert_eq!(
        report.mimes,
        vec![MimeType::native_snapshot(), MimeType::text_html(), MimeType::text_plain()]
    );
    let written = h.clipboard.contents().await;
    assert!(written.ts_ms > 0);
    assert_eq!(
        written.find(&MimeType::text_plain()).and_then(|item| item.data.as_text()),
        Some("hello\nworld")
    );
    assert_eq!(
        written.items[0].meta.get(meta_keys::PRODUCED_BY).map(String::as_str),
        Some("native-snapshot")
    );
    // Copy never mutates.
    assert_eq!(h.document.to_snapshot(), before);
    assert!(!h.document.can_undo());
}

#[tokio::test]
async fn test_copy_then_paste_duplicates_content_with_fresh_ids() {
    let h = harness();
    h.selection.set(SelectionState::blocks([id("p1"), id("p2")]));
    h.orchestrator.copy().await.unwrap();

    h.selection.set(caret("p3", 5));
    let report = h.orchestrator.paste(None).await.unwrap();

    assert_eq!(report.adapter, "native-snapshot");
    assert_eq!(report.mime, MimeType::native_snapshot());
    assert_eq!((report.parent.clone(), report.index), (id("note"), 3));
    assert_eq!(report.inserted.len(), 2);
    assert!(!report.inserted.contains(&id("p1")));
    assert!(!report.inserted.contains(&id("p2")));

    let children = h.document.children_of(&id("note"));
    assert_eq!(&children[3..], report.inserted.as_slice());
    for (original, pasted) in [id("p1"), id("p2")].iter().zip(&report.inserted) {
        let original = h.document.block(original).unwrap();
        let pasted = h.document.block(pasted).unwrap();
        assert_eq!(original.shape(), pasted.shape());
    }
}

#[tokio::test]
async fn test_paste_twice_never_collides() {
    let h = harness();
    h.selection.set(SelectionState::blocks([id("p1")]));
    h.orchestrator.copy().await.unwrap();

    h.selection.set(caret("p3", 0));
    let first = h.orchestrator.paste(None).await.unwrap();
    let second = h.orchestrator.paste(None).await.unwrap();

    assert_ne!(first.inserted, second.inserted);
    assert_eq!(h.document.children_of(&id("note")).len(), 5);
}

#[tokio::test]
async fn test_cut_text_then_single_undo_restores_document() {
    let h = harness();
    let before = h.document.to_snapshot();
    h.selection.set(SelectionState::text(TextSelection::within(id("p1"), 0, 3)));

    h.orchestrator.cut().await.unwrap();

    assert_eq!(h.document.text_of(&id("p1")).as_deref(), Some("lo"));
    let written = h.clipboard.contents().await;
    assert_eq!(
        written.find(&MimeType::text_plain()).and_then(|item| item.data.as_text()),
        Some("hel")
    );

    assert!(h.document.undo());
    assert_eq!(h.document.to_snapshot(), before);
}

#[tokio::test]
async fn test_cut_blocks_then_single_undo_restores_document() {
    let h = harness();
    let before = h.document.to_snapshot();
    h.selection.set(SelectionState::blocks([id("p1"), id("p3")]));

    let report = h.orchestrator.cut().await.unwrap();

    assert_eq!(report.blocks, 2);
    assert_eq!(h.document.children_of(&id("note")), vec![id("p2")]);
    assert!(h.document.undo());
    assert_eq!(h.document.to_snapshot(), before);
    assert!(!h.document.can_undo());
}

#[tokio::test]
async fn test_paste_over_selected_blocks_replaces_them() {
    let h = harness();
    let before = h.document.to_snapshot();
    h.selection.set(SelectionState::blocks([id("p1"), id("p2")]));

    let report = h
        .orchestrator
        .paste(Some(payload(vec![("text/plain", ClipboardData::text("fresh"))])))
        .await
        .unwrap();

    let children = h.document.children_of(&id("note"));
    assert_eq!(children, vec![report.inserted[0].clone(), id("p3")]);
    assert_eq!(h.document.text_of(&children[0]).as_deref(), Some("fresh"));

    // Deletion and insertion are one undo step.
    assert!(h.document.undo());
    assert_eq!(h.document.to_snapshot(), before);
}

#[tokio::test]
async fn test_paste_replaces_selected_text() {
    let h = harness();
    h.selection.set(SelectionState::text(TextSelection::within(id("p2"), 0, 5)));

    h.orchestrator
        .paste(Some(payload(vec![("text/plain", ClipboardData::text("new"))])))
        .await
        .unwrap();

    assert_eq!(h.document.text_of(&id("p2")).as_deref(), Some(""));
    let children = h.document.children_of(&id("note"));
    assert_eq!(h.document.text_of(&children[2]).as_deref(), Some("new"));
}

#[tokio::test]
async fn test_html_wins_over_plain_text() {
    let h = harness();
    let spy = Arc::new(SpyAdapter::default());
    let _spy_handle = h
        .adapters
        .register_adapter(MimeType::text_plain(), spy.clone(), 70);
    h.selection.set(caret("p1", 5));

    let report = h
        .orchestrator
        .paste(Some(payload(vec![
            ("text/plain", ClipboardData::text("plain")),
            ("text/html", ClipboardData::text("<p>rich</p>")),
        ])))
        .await
        .unwrap();

    assert_eq!(report.adapter, "html");
    assert_eq!(report.mime, MimeType::text_html());
    assert_eq!(h.document.text_of(&report.inserted[0]).as_deref(), Some("rich"));
    assert_eq!(spy.decodes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_declining_html_falls_back_to_plain_text() {
    let h = harness();
    h.selection.set(caret("p1", 5));

    let report = h
        .orchestrator
        .paste(Some(payload(vec![
            ("text/html", ClipboardData::text("<div> </div>")),
            ("text/plain", ClipboardData::text("fallback")),
        ])))
        .await
        .unwrap();

    assert_eq!(report.adapter, "mix-text");
    assert_eq!(h.document.text_of(&report.inserted[0]).as_deref(), Some("fallback"));
}

#[tokio::test]
async fn test_image_and_binary_payloads() {
    let h = harness();
    h.selection.set(caret("p1", 5));

    let image = h
        .orchestrator
        .paste(Some(payload(vec![("image/png", ClipboardData::bytes(vec![1, 2, 3]))])))
        .await
        .unwrap();
    assert_eq!(image.adapter, "image");
    let block = h.document.block(&image.inserted[0]).unwrap();
    assert_eq!(block.flavour, flavour::IMAGE);
    assert_eq!(
        block.prop_str(props::SOURCE_ID),
        Some(MemoryBlobStore::blob_id_for(&[1, 2, 3]).as_str())
    );

    let attachment = h
        .orchestrator
        .paste(Some(payload(vec![(
            "application/pdf",
            ClipboardData::bytes(b"%PDF-1.7".to_vec()),
        )])))
        .await
        .unwrap();
    assert_eq!(attachment.adapter, "attachment");
    assert_eq!(
        h.document.block(&attachment.inserted[0]).unwrap().flavour,
        flavour::ATTACHMENT
    );
}

#[tokio::test]
async fn test_pasted_linked_doc_gets_destination_title() {
    let h = harness();
    h.selection.set(caret("p1", 5));
    let slice = SliceSnapshot::new(
        vec![BlockSnapshot::new(id("link"), flavour::EMBED_LINKED_DOC).with_prop(props::PAGE_ID, "d2")],
        DocId::from("elsewhere"),
        WorkspaceId::from("ws"),
    );

    let report = h
        .orchestrator
        .paste(Some(payload(vec![(
            "blocksuite/snapshot",
            ClipboardData::text(serde_json_string(&slice)),
        )])))
        .await
        .unwrap();

    let block = h.document.block(&report.inserted[0]).unwrap();
    assert_eq!(block.prop_str(props::TITLE), Some("Roadmap"));
}

fn serde_json_string(slice: &SliceSnapshot) -> String {
    serde_json::to_string(slice).unwrap()
}

#[tokio::test]
async fn test_failing_middleware_leaves_document_untouched() {
    let h = harness();
    let before = h.document.to_snapshot();
    let _failing = h.middlewares.use_middleware(Arc::new(FailingMiddleware));
    h.selection.set(SelectionState::text(TextSelection::within(id("p1"), 0, 3)));

    let err = h
        .orchestrator
        .paste(Some(payload(vec![("text/plain", ClipboardData::text("x"))])))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClipboardError::MiddlewareFailure { ref middleware, .. } if middleware == "failing"
    ));
    assert_eq!(h.document.to_snapshot(), before);
    assert!(!h.document.can_undo());
}

#[tokio::test]
async fn test_malformed_snapshot_is_a_deserialization_failure() {
    let h = harness();
    let before = h.document.to_snapshot();
    h.selection.set(caret("p1", 0));

    let err = h
        .orchestrator
        .paste(Some(payload(vec![
            ("blocksuite/snapshot", ClipboardData::text("{broken")),
            ("text/plain", ClipboardData::text("never reached")),
        ])))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipboardError::DeserializationFailure { .. }));
    assert_eq!(h.document.to_snapshot(), before);
}

#[tokio::test]
async fn test_snapshot_with_repeated_ids_keeps_selected_blocks() {
    let h = harness();
    let before = h.document.to_snapshot();
    h.selection.set(SelectionState::blocks([id("p1")]));
    let slice = SliceSnapshot::new(
        vec![
            BlockSnapshot::paragraph(id("x"), "first"),
            BlockSnapshot::paragraph(id("x"), "second"),
        ],
        DocId::from("other"),
        WorkspaceId::from("ws"),
    );

    let err = h
        .orchestrator
        .paste(Some(payload(vec![(
            "blocksuite/snapshot",
            ClipboardData::text(serde_json_string(&slice)),
        )])))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipboardError::DeserializationFailure { .. }));
    assert!(h.document.contains(&id("p1")));
    assert_eq!(h.document.to_snapshot(), before);
    assert!(!h.document.can_undo());
}

#[tokio::test]
async fn test_rejected_insert_keeps_selected_blocks() {
    let h = harness();
    let before = h.document.to_snapshot();
    let _pinned = h.middlewares.use_middleware(Arc::new(PinnedIdMiddleware { pinned: id("p2") }));
    h.selection.set(SelectionState::blocks([id("p1")]));

    let err = h
        .orchestrator
        .paste(Some(payload(vec![("text/plain", ClipboardData::text("clash"))])))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipboardError::Document(_)));
    assert_eq!(h.document.to_snapshot(), before);
    assert!(!h.document.can_undo());
}

#[tokio::test]
async fn test_unregistering_during_paste_keeps_resolved_adapter() {
    let h = harness();
    let gated = Arc::new(GatedAdapter::default());
    let _gated = h.adapters.register_adapter(MimeType::from(GatedAdapter::MIME), gated.clone(), 200);
    h.selection.set(caret("p1", 5));

    let paste = h.orchestrator.paste(Some(payload(vec![
        (GatedAdapter::MIME, ClipboardData::text("in flight")),
        ("text/plain", ClipboardData::text("fallback")),
    ])));
    let unregister = async {
        gated.entered.notified().await;
        h.adapters.unregister_adapter(&MimeType::from(GatedAdapter::MIME));
        assert!(!h.adapters.contains(&MimeType::from(GatedAdapter::MIME)));
        gated.release.notify_one();
    };
    let (report, ()) = tokio::join!(paste, unregister);
    let report = report.unwrap();

    assert_eq!(report.adapter, "gated");
    assert_eq!(report.mime, MimeType::from(GatedAdapter::MIME));
    assert_eq!(h.document.text_of(&report.inserted[0]).as_deref(), Some("in flight"));

    // Later pastes no longer see it.
    h.selection.set(caret("p1", 5));
    let next = h
        .orchestrator
        .paste(Some(payload(vec![
            (GatedAdapter::MIME, ClipboardData::text("again")),
            ("text/plain", ClipboardData::text("fallback")),
        ])))
        .await
        .unwrap();
    assert_eq!(next.adapter, "mix-text");
}

#[tokio::test]
async fn test_unregistering_during_copy_keeps_resolved_adapter() {
    let h = harness();
    let gated = Arc::new(GatedAdapter::default());
    let _gated = h.adapters.register_adapter(MimeType::from(GatedAdapter::MIME), gated.clone(), 200);
    h.selection.set(SelectionState::blocks([id("p1")]));

    let copy = h.orchestrator.copy();
    let unregister = async {
        gated.entered.notified().await;
        h.adapters.unregister_adapter(&MimeType::from(GatedAdapter::MIME));
        gated.release.notify_one();
    };
    let (report, ()) = tokio::join!(copy, unregister);
    report.unwrap();

    let written = h.clipboard.contents().await;
    let item = written.find(&MimeType::from(GatedAdapter::MIME)).unwrap();
    assert_eq!(item.data.as_text(), Some("gated"));
}

#[tokio::test]
async fn test_unregistered_adapters_are_not_consulted() {
    let h = harness();
    h.adapters.unregister_adapter(&MimeType::text_plain());
    h.selection.set(caret("p1", 5));

    let err = h
        .orchestrator
        .paste(Some(payload(vec![("text/plain", ClipboardData::text("x"))])))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClipboardError::AdapterNotFound {
            mimes: vec![MimeType::text_plain()]
        }
    );
}

#[tokio::test]
async fn test_disposing_handles_detaches_everything() {
    let mut h = harness();
    h.handles.dispose();
    h.handles.dispose();

    assert!(h.adapters.is_empty());
    assert!(h.middlewares.is_empty());

    h.selection.set(SelectionState::blocks([id("p1")]));
    let err = h.orchestrator.copy().await.unwrap_err();
    assert!(matches!(err, ClipboardError::AdapterNotFound { .. }));
}

#[tokio::test]
async fn test_handle_without_selection_is_silent_noop() {
    let h = harness();
    let before = h.document.to_snapshot();

    let paste = h
        .orchestrator
        .handle(ClipboardEvent::Paste(Some(payload(vec![(
            "text/plain",
            ClipboardData::text("x"),
        )]))))
        .await;
    let copy = h.orchestrator.handle(ClipboardEvent::Copy).await;

    assert_eq!(paste, Err(ClipboardError::NoTargetSelection));
    assert_eq!(copy, Err(ClipboardError::NoSelection));
    assert!(!paste.unwrap_err().is_fatal());
    assert_eq!(h.document.to_snapshot(), before);
}

#[tokio::test]
async fn test_handle_reports_outcomes() {
    let h = harness();
    h.selection.set(SelectionState::blocks([id("p2")]));

    let copied = h.orchestrator.handle(ClipboardEvent::Copy).await.unwrap();
    assert!(matches!(copied, ClipboardOutcome::Copied(ref report) if report.blocks == 1));

    h.selection.set(caret("p3", 0));
    let pasted = h.orchestrator.handle(ClipboardEvent::Paste(None)).await.unwrap();
    assert!(matches!(pasted, ClipboardOutcome::Pasted(ref report) if report.inserted.len() == 1));

    h.selection.set(SelectionState::blocks([id("p1")]));
    let cut = h.orchestrator.handle(ClipboardEvent::Cut).await.unwrap();
    assert!(matches!(cut, ClipboardOutcome::Cut(_)));
    assert!(!h.document.contains(&id("p1")));
}

#[tokio::test]
async fn test_concurrent_pastes_are_serialized() {
    let h = harness();
    h.selection.set(caret("p3", 5));
    let first = payload(vec![("text/plain", ClipboardData::text("one"))]);
    let second = payload(vec![("text/plain", ClipboardData::text("two"))]);

    let (a, b) = tokio::join!(
        h.orchestrator.paste(Some(first)),
        h.orchestrator.paste(Some(second))
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    let children = h.document.children_of(&id("note"));
    assert_eq!(children.len(), 5);
    assert!(children.contains(&a.inserted[0]));
    assert!(children.contains(&b.inserted[0]));
}
