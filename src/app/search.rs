// GroupScout - app/search.rs
//
// Remote search execution. Each request runs on its own background thread
// and reports back to the UI thread over a single mpsc channel.
//
// Architecture:
//   - `SearchManager` lives on the UI thread; `run_search` executes on a
//     background thread, one per request.
//   - There is no cancellation: a superseded request still completes and its
//     message is delivered. The controller decides whether to apply it.
//   - The UI thread polls the channel each frame (`poll_progress`) or blocks
//     on it with a timeout (`wait_progress`).
//
// Failure handling:
//   - Source errors are forwarded as `SearchProgress::Failed`.
//   - A panicking source is caught on the worker thread and forwarded as a
//     failure, so no unwinding ever reaches the controller.
//   - A thread that cannot be spawned is reported as a failure immediately.

use crate::app::source::LogGroupSource;
use crate::core::model::{DescribeLogGroupsRequest, RemoteError, RequestKind, SearchProgress};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// Runs remote log group requests off the UI thread.
pub struct SearchManager {
    progress_tx: mpsc::Sender<SearchProgress>,
    progress_rx: mpsc::Receiver<SearchProgress>,

    /// Requests started whose message has not been drained yet.
    in_flight: usize,
}

impl SearchManager {
    pub fn new() -> Self {
        let (progress_tx, progress_rx) = mpsc::channel();
        Self {
            progress_tx,
            progress_rx,
            in_flight: 0,
        }
    }

    /// Start `request` on a background thread. Returns immediately.
    pub fn start(
        &mut self,
        request_id: u64,
        kind: RequestKind,
        request: DescribeLogGroupsRequest,
        source: Arc<dyn LogGroupSource>,
    ) {
        self.in_flight += 1;

        let tx = self.progress_tx.clone();
        let worker_request = request.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("groupscout-search-{request_id}"))
            .spawn(move || run_search(request_id, kind, worker_request, source, tx));

        match spawned {
            Ok(_) => {
                tracing::debug!(
                    request_id,
                    ?kind,
                    region = %request.region,
                    "Log group request started"
                );
            }
            Err(e) => {
                tracing::error!(request_id, error = %e, "Failed to spawn search thread");
                // The receiver is owned by self, so this send cannot fail.
                let _ = self.progress_tx.send(SearchProgress::Failed {
                    request_id,
                    kind,
                    request,
                    error: RemoteError::Message(format!("could not start search: {e}")),
                    panicked: false,
                });
            }
        }
    }

    /// Number of requests whose result has not been drained yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Drain up to `max` completed requests without blocking.
    pub fn poll_progress(&mut self, max: usize) -> Vec<SearchProgress> {
        let mut messages = Vec::new();
        while messages.len() < max {
            match self.progress_rx.try_recv() {
                Ok(msg) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    messages.push(msg);
                }
                Err(_) => break,
            }
        }
        messages
    }

    /// Block until one request completes or `timeout` elapses.
    pub fn wait_progress(&mut self, timeout: Duration) -> Option<SearchProgress> {
        if self.in_flight == 0 {
            return None;
        }
        match self.progress_rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(msg)
            }
            Err(_) => None,
        }
    }
}

impl Default for SearchManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Background worker
// =============================================================================

/// Execute one remote call and report its outcome.
fn run_search(
    request_id: u64,
    kind: RequestKind,
    request: DescribeLogGroupsRequest,
    source: Arc<dyn LogGroupSource>,
    tx: mpsc::Sender<SearchProgress>,
) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| source.describe_log_groups(&request)));

    let msg = match outcome {
        Ok(Ok(names)) => {
            tracing::trace!(request_id, count = names.len(), "Log group request completed");
            SearchProgress::Completed {
                request_id,
                kind,
                request,
                names,
            }
        }
        Ok(Err(error)) => SearchProgress::Failed {
            request_id,
            kind,
            request,
            error,
            panicked: false,
        },
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                crate::util::constants::UNKNOWN_ERROR_MESSAGE.to_string()
            };
            SearchProgress::Failed {
                request_id,
                kind,
                request,
                error: RemoteError::Message(message),
                panicked: true,
            }
        }
    };

    // Receiver dropped (controller unmounted); nothing left to tell.
    let _ = tx.send(msg);
}
