// Debounced preview regeneration: timer plus latest-args cell, status state
// machine, last-completed-wins application of results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::artifact::{ArtifactHandle, ArtifactStore};
use super::stats::GenerationStats;
use crate::error::PreviewError;
use crate::generator::traits::DocumentGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    Idle,
    Generating,
    Ready,
    Failed,
}

/// Status, timestamp, and error message as one consistent read.
#[derive(Debug, Clone)]
pub struct GenerationSnapshot {
    pub status: PreviewStatus,
    pub last_generated_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

struct GenerationState {
    status: PreviewStatus,
    last_generated_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
}

/// The latest arguments seen for the pending debounce window.
#[derive(Clone)]
struct PendingRequest {
    form: Arc<Value>,
    document_type_key: String,
}

pub struct PreviewOrchestrator {
    session_id: String,
    generator: Arc<dyn DocumentGenerator>,
    artifacts: Arc<ArtifactStore>,
    stats: Arc<GenerationStats>,
    state: Mutex<GenerationState>,
    /// Latest-args cell. Rescheduling replaces the timer (via `epoch`), not
    /// this slot's semantics.
    latest: Mutex<Option<PendingRequest>>,
    /// Bumped on every call; a timer whose epoch is stale was superseded.
    epoch: AtomicU64,
    debounce: Duration,
    teardown: CancellationToken,
    replaced_tx: mpsc::Sender<ArtifactHandle>,
}

impl PreviewOrchestrator {
    pub fn new(
        session_id: String,
        generator: Arc<dyn DocumentGenerator>,
        artifacts: Arc<ArtifactStore>,
        stats: Arc<GenerationStats>,
        debounce: Duration,
        teardown: CancellationToken,
        replaced_tx: mpsc::Sender<ArtifactHandle>,
    ) -> Self {
        Self {
            session_id,
            generator,
            artifacts,
            stats,
            state: Mutex::new(GenerationState {
                status: PreviewStatus::Idle,
                last_generated_at: None,
                error_message: None,
            }),
            latest: Mutex::new(None),
            epoch: AtomicU64::new(0),
            debounce,
            teardown,
            replaced_tx,
        }
    }

    /// Request a debounced regeneration. The status flips to `Generating`
    /// synchronously; the network call fires only once the quiescence window
    /// elapses without another call, using the latest arguments seen.
    pub fn request_preview(self: &Arc<Self>, form: Arc<Value>, document_type_key: String) {
        self.set_generating();
        *self.latest.lock() = Some(PendingRequest {
            form,
            document_type_key,
        });
        let my_epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.record_requested();

        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(this.debounce) => {}
                _ = this.teardown.cancelled() => {
                    debug!("debounce timer dropped session={} (teardown)", this.session_id);
                    return;
                }
            }

            if this.epoch.load(Ordering::SeqCst) != my_epoch {
                // A later call replaced this timer.
                this.stats.record_collapsed();
                debug!(
                    "debounce timer superseded session={} epoch={}",
                    this.session_id, my_epoch
                );
                return;
            }

            let request = this.latest.lock().clone();
            if let Some(request) = request {
                this.issue(request).await;
            }
        });
    }

    /// Bypass the debounce window and fire immediately with the current
    /// arguments. A no-op until the first `request_preview` has supplied
    /// them.
    pub fn refresh(self: &Arc<Self>) {
        let request = self.latest.lock().clone();
        let Some(request) = request else {
            debug!("refresh ignored session={}: no form data yet", self.session_id);
            return;
        };

        self.set_generating();
        // Invalidate any pending timer so the window can't fire a second call.
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.stats.record_requested();

        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.issue(request).await;
        });
    }

    async fn issue(self: Arc<Self>, request: PendingRequest) {
        let t0 = Instant::now();
        debug!(
            "issuing generation session={} form_type={}",
            self.session_id, request.document_type_key
        );

        match self
            .generator
            .generate_preview(&request.document_type_key, &request.form)
            .await
        {
            Ok(bytes) => {
                // A response landing after teardown must not resurrect a
                // handle the session already released.
                if self.teardown.is_cancelled() {
                    debug!("late result discarded session={}", self.session_id);
                    return;
                }

                self.stats.record_success(bytes.len() as u64, t0.elapsed());
                let handle = self.artifacts.set_artifact(bytes);
                // Teardown can land between the check above and the install;
                // release_all in close() would then have run too early, so
                // re-check and undo the install ourselves.
                if self.teardown.is_cancelled() {
                    self.artifacts.release_all();
                    debug!("late result discarded session={}", self.session_id);
                    return;
                }
                {
                    let mut state = self.state.lock();
                    state.status = PreviewStatus::Ready;
                    state.last_generated_at = Some(Utc::now());
                    state.error_message = None;
                }
                info!(
                    "preview ready session={} form_type={} bytes={} elapsed_ms={}",
                    self.session_id,
                    request.document_type_key,
                    handle.len(),
                    t0.elapsed().as_millis()
                );
                // Receiver gone means the session is closing; nothing to do.
                let _ = self.replaced_tx.send(handle).await;
            }
            Err(e) => {
                if self.teardown.is_cancelled() {
                    return;
                }

                self.stats.record_failure(t0.elapsed());
                let error = PreviewError::GenerationFailed(e.to_string());
                {
                    let mut state = self.state.lock();
                    state.status = PreviewStatus::Failed;
                    state.error_message = Some(error.to_string());
                }
                // The previously displayed artifact stays live; failure
                // never clears a good preview.
                warn!(
                    "generation failed session={} form_type={}: {}",
                    self.session_id, request.document_type_key, e
                );
            }
        }
    }

    fn set_generating(&self) {
        let mut state = self.state.lock();
        state.status = PreviewStatus::Generating;
        state.error_message = None;
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    pub fn status(&self) -> PreviewStatus {
        self.state.lock().status
    }

    pub fn snapshot(&self) -> GenerationSnapshot {
        let state = self.state.lock();
        GenerationSnapshot {
            status: state.status,
            last_generated_at: state.last_generated_at,
            error_message: state.error_message.clone(),
        }
    }
}
