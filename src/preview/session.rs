// Preview session: aggregate root for one open preview surface. Wires the
// orchestrator, artifact store, renderer, pagination, and viewport together
// and owns the teardown path.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::artifact::ArtifactStore;
use super::orchestrator::{PreviewOrchestrator, PreviewStatus};
use super::pagination::PaginationController;
use super::stats::{GenerationStats, StatsSnapshot};
use super::viewport::{FullscreenHost, ViewportController};
use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::generator::traits::DocumentGenerator;
use crate::render::{PageRenderer, RenderedPage};

/// Everything the host UI needs to draw the preview surface, as one
/// consistent read.
#[derive(Debug, Clone)]
pub struct PreviewSnapshot {
    pub status: PreviewStatus,
    pub last_generated_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub page_count: Option<u32>,
    pub current_page: u32,
    pub can_navigate: bool,
    pub zoom_level: f64,
    pub is_fullscreen: bool,
    pub live_handles: usize,
    pub stats: StatsSnapshot,
}

pub struct PreviewSession {
    session_id: String,
    form: Mutex<Arc<Value>>,
    document_type_key: Mutex<String>,
    orchestrator: Arc<PreviewOrchestrator>,
    artifacts: Arc<ArtifactStore>,
    renderer: Arc<dyn PageRenderer>,
    pagination: Arc<Mutex<PaginationController>>,
    viewport: Mutex<ViewportController>,
    fullscreen_host: Arc<dyn FullscreenHost>,
    teardown: CancellationToken,
}

impl PreviewSession {
    /// Open a session and trigger the initial generation.
    pub fn new(
        session_id: String,
        config: &PreviewConfig,
        generator: Arc<dyn DocumentGenerator>,
        renderer: Arc<dyn PageRenderer>,
        fullscreen_host: Arc<dyn FullscreenHost>,
        form: Arc<Value>,
        document_type_key: String,
    ) -> Arc<Self> {
        let teardown = CancellationToken::new();
        let artifacts = Arc::new(ArtifactStore::new());
        let stats = Arc::new(GenerationStats::new());
        let (replaced_tx, mut replaced_rx) = mpsc::channel(8);

        let orchestrator = Arc::new(PreviewOrchestrator::new(
            session_id.clone(),
            generator,
            artifacts.clone(),
            stats,
            Duration::from_millis(config.debounce_ms),
            teardown.clone(),
            replaced_tx,
        ));

        let pagination = Arc::new(Mutex::new(PaginationController::new()));

        let session = Arc::new(Self {
            session_id: session_id.clone(),
            form: Mutex::new(form.clone()),
            document_type_key: Mutex::new(document_type_key.clone()),
            orchestrator: orchestrator.clone(),
            artifacts,
            renderer: renderer.clone(),
            pagination: pagination.clone(),
            viewport: Mutex::new(ViewportController::new()),
            fullscreen_host,
            teardown: teardown.clone(),
        });

        // Event loop: every replaced artifact is loaded into the renderer,
        // which reports the new page count; pagination resets to page 1 and
        // the zoom level is deliberately left untouched.
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = teardown.cancelled() => break,
                    handle = replaced_rx.recv() => {
                        let Some(handle) = handle else { break };
                        pagination.lock().begin_load();
                        match renderer.load(handle.bytes().clone()).await {
                            Ok(count) => {
                                if teardown.is_cancelled() {
                                    break;
                                }
                                debug!(
                                    "renderer loaded session={} artifact_id={} pages={}",
                                    session_id, handle.id(), count
                                );
                                pagination.lock().on_artifact_replaced(count);
                            }
                            Err(e) => {
                                warn!(
                                    "renderer load failed session={} artifact_id={}: {}",
                                    session_id, handle.id(), e
                                );
                            }
                        }
                    }
                }
            }
        });

        session
            .orchestrator
            .request_preview(form, document_type_key);
        session
    }

    /// Replace the form data. Identity-compared: passing the same `Arc` back
    /// is a no-op, a rebuilt value triggers a debounced regeneration.
    pub fn update_form_data(&self, form: Arc<Value>) {
        {
            let mut current = self.form.lock();
            if Arc::ptr_eq(&*current, &form) {
                return;
            }
            *current = form.clone();
        }
        let key = self.document_type_key.lock().clone();
        self.orchestrator.request_preview(form, key);
    }

    /// Switch the document template and regenerate.
    pub fn set_document_type(&self, document_type_key: String) {
        {
            let mut current = self.document_type_key.lock();
            if *current == document_type_key {
                return;
            }
            *current = document_type_key.clone();
        }
        let form = self.form.lock().clone();
        self.orchestrator.request_preview(form, document_type_key);
    }

    /// User-driven retry: regenerate immediately, bypassing the debounce.
    pub fn refresh(&self) {
        self.orchestrator.refresh();
    }

    pub fn next_page(&self) {
        self.pagination.lock().next();
    }

    pub fn previous_page(&self) {
        self.pagination.lock().previous();
    }

    pub fn zoom_in(&self) {
        self.viewport.lock().zoom_in();
    }

    pub fn zoom_out(&self) {
        self.viewport.lock().zoom_out();
    }

    pub fn set_zoom(&self, value: f64) {
        self.viewport.lock().set_zoom(value);
    }

    pub fn toggle_fullscreen(&self) -> Result<(), PreviewError> {
        self.viewport
            .lock()
            .toggle_fullscreen(self.fullscreen_host.as_ref())
    }

    /// Feed the platform's fullscreen-change notification in.
    pub fn on_fullscreen_change(&self, actual: bool) {
        self.viewport.lock().on_fullscreen_change(actual);
    }

    /// Render the current page at the current zoom level.
    pub async fn render_current_page(&self) -> Result<RenderedPage> {
        let page = {
            let pagination = self.pagination.lock();
            if !pagination.can_navigate() {
                return Err(anyhow!("no document loaded"));
            }
            pagination.current_page()
        };
        let zoom = self.viewport.lock().zoom();
        self.renderer.render_page(page, zoom).await
    }

    pub fn snapshot(&self) -> PreviewSnapshot {
        let generation = self.orchestrator.snapshot();
        let (page_count, current_page, can_navigate) = {
            let pagination = self.pagination.lock();
            (
                pagination.page_count(),
                pagination.current_page(),
                pagination.can_navigate(),
            )
        };
        let (zoom_level, is_fullscreen) = {
            let viewport = self.viewport.lock();
            (viewport.zoom(), viewport.is_fullscreen())
        };

        PreviewSnapshot {
            status: generation.status,
            last_generated_at: generation.last_generated_at,
            error_message: generation.error_message,
            page_count,
            current_page,
            can_navigate,
            zoom_level,
            is_fullscreen,
            live_handles: self.artifacts.live_handles(),
            stats: self.stats().snapshot(),
        }
    }

    pub fn stats(&self) -> &GenerationStats {
        self.orchestrator.stats()
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Tear the session down: cancel pending timers and in-flight result
    /// application, then release the live handle unconditionally.
    /// Idempotent; also runs from `Drop`.
    pub fn close(&self) {
        if self.teardown.is_cancelled() {
            return;
        }
        self.teardown.cancel();
        self.artifacts.release_all();
        debug!("session {} closed", self.session_id);
    }
}

impl Drop for PreviewSession {
    fn drop(&mut self) {
        self.close();
    }
}
