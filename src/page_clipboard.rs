//! # Page clipboard host / 页面剪贴板宿主
//!
//! Owns the adapter registry and the middleware chain of one page and wires
//! the default formats into them for as long as the page is connected.
//!
//! ```text
//! connect()    → default adapters + middlewares → DisposableGroup
//! handle(evt)  → ClipboardOrchestrator
//! disconnect() → DisposableGroup::dispose
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, info_span};

use bc_app::{
    AdapterRegistry, ClipboardDeps, ClipboardEvent, ClipboardOrchestrator, ClipboardOutcome,
    DisposableGroup, MiddlewareChain,
};
use bc_core::ports::{
    BlobStorePort, DocMetaPort, DocumentPort, IdGeneratorPort, SelectionStatePort,
    SystemClipboardPort,
};
use bc_core::{BlockId, BlockSnapshot, ClipboardConfig, ClipboardError};
use bc_infra::adapters::default_adapters;
use bc_infra::middleware::default_middlewares;

/// Editor services a page clipboard is built on.
#[derive(Clone)]
pub struct PageClipboardDeps {
    pub selection: Arc<dyn SelectionStatePort>,
    pub document: Arc<dyn DocumentPort>,
    pub ids: Arc<dyn IdGeneratorPort>,
    pub metas: Arc<dyn DocMetaPort>,
    pub system_clipboard: Arc<dyn SystemClipboardPort>,
    pub blobs: Arc<dyn BlobStorePort>,
}

pub struct PageClipboard {
    config: ClipboardConfig,
    deps: PageClipboardDeps,
    adapters: Arc<AdapterRegistry>,
    middlewares: Arc<MiddlewareChain>,
    orchestrator: ClipboardOrchestrator,
    connection: Mutex<Option<DisposableGroup>>,
}

impl PageClipboard {
    pub fn new(deps: PageClipboardDeps, config: ClipboardConfig) -> Self {
        let adapters = Arc::new(AdapterRegistry::new());
        let middlewares = Arc::new(MiddlewareChain::new());
        let orchestrator = ClipboardOrchestrator::new(ClipboardDeps {
            adapters: adapters.clone(),
            middlewares: middlewares.clone(),
            selection: deps.selection.clone(),
            document: deps.document.clone(),
            system_clipboard: deps.system_clipboard.clone(),
        });

        Self {
            config,
            deps,
            adapters,
            middlewares,
            orchestrator,
            connection: Mutex::new(None),
        }
    }

    /// Register the default adapters and middlewares.
    ///
    /// # Behavior / 行为
    /// - disabled in config or no platform clipboard: nothing is registered
    /// - already connected: no-op
    ///
    /// Returns whether the page is connected afterwards.
    pub fn connect(&self) -> bool {
        let span = info_span!("page_clipboard.connect", doc_id = %self.deps.document.doc_id());
        let _enter = span.enter();

        let mut connection = self.connection();
        if connection.is_some() {
            debug!("Page clipboard already connected");
            return true;
        }
        if !self.config.enabled {
            info!("Clipboard disabled by configuration");
            return false;
        }
        if !self.deps.system_clipboard.is_available() {
            info!("System clipboard unavailable, skipping registration");
            return false;
        }

        let mut group = DisposableGroup::new();
        for spec in default_adapters(self.deps.blobs.clone()) {
            group.add(
                self.adapters
                    .register_adapter(spec.mime, spec.adapter, spec.priority),
            );
        }
        for middleware in default_middlewares(
            self.deps.ids.clone(),
            self.deps.metas.clone(),
            &self.config,
        ) {
            group.add(self.middlewares.use_middleware(middleware));
        }

        info!(
            adapters = self.adapters.len(),
            middlewares = self.middlewares.len(),
            "Page clipboard connected"
        );
        *connection = Some(group);
        true
    }

    /// Release every registration made by [`connect`](Self::connect).
    /// Calling it while disconnected does nothing.
    pub fn disconnect(&self) {
        if let Some(mut group) = self.connection().take() {
            group.dispose();
            info!(doc_id = %self.deps.document.doc_id(), "Page clipboard disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection().is_some()
    }

    pub async fn handle(&self, event: ClipboardEvent) -> Result<ClipboardOutcome, ClipboardError> {
        self.orchestrator.handle(event).await
    }

    /// Paste `snapshot` under `parent` at `index` through the paste
    /// middlewares. Returns the id of the inserted block.
    pub async fn paste_block_snapshot(
        &self,
        snapshot: BlockSnapshot,
        parent: &BlockId,
        index: usize,
    ) -> Result<Option<BlockId>, ClipboardError> {
        self.orchestrator
            .paste_block_snapshot(snapshot, parent, index)
            .await
    }

    pub fn orchestrator(&self) -> &ClipboardOrchestrator {
        &self.orchestrator
    }

    pub fn adapters(&self) -> &Arc<AdapterRegistry> {
        &self.adapters
    }

    pub fn middlewares(&self) -> &Arc<MiddlewareChain> {
        &self.middlewares
    }

    fn connection(&self) -> MutexGuard<'_, Option<DisposableGroup>> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for PageClipboard {
    fn drop(&mut self) {
        self.disconnect();
    }
}
