//! Cancel-and-restart serialization of chart renders.
//!
//! Only one render runs at a time. Starting a new one aborts the one in
//! flight, so the figure on screen always belongs to the latest selection.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::task::AbortHandle;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// A newer render started before this one finished
    Superseded,
    /// The render task panicked
    Failed(String),
}

#[derive(Debug, Default)]
pub struct RenderGate {
    next_id: AtomicU64,
    inflight: Mutex<Option<(u64, AbortHandle)>>,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a render is running.
    pub fn is_busy(&self) -> bool {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Run `render` on its own task, aborting any render still in flight.
    pub async fn run<F, T>(&self, render: F) -> Result<T, GateError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        // Id assignment, spawn and registration happen under one lock so a
        // later request can never be aborted by an earlier one.
        let (id, handle) = {
            let mut slot = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let handle = tokio::spawn(render);
            if let Some((previous, abort)) = slot.replace((id, handle.abort_handle())) {
                debug!("render {} superseded by render {}", previous, id);
                abort.abort();
            }
            (id, handle)
        };

        // Released on completion and also when the caller is dropped mid-await
        let _guard = InflightGuard { gate: self, id };
        let outcome = handle.await;

        match outcome {
            Ok(value) => Ok(value),
            Err(e) if e.is_cancelled() => Err(GateError::Superseded),
            Err(e) => Err(GateError::Failed(e.to_string())),
        }
    }
}

/// Clears the gate slot if it still belongs to render `id`, aborting the
/// task when the waiting request went away before it finished.
struct InflightGuard<'a> {
    gate: &'a RenderGate,
    id: u64,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self
            .gate
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if matches!(*slot, Some((current, _)) if current == self.id) {
            if let Some((_, abort)) = slot.take() {
                abort.abort();
            }
        }
    }
}
