use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;
use wod_config::MIRROR_OUTCOME_CAPACITY;
use wod_core::EventIdentity;

use crate::ports::{MirrorWrite, RemotePersistenceGateway};

/// Result of one background write. Diagnostics only; never applied to the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOutcome {
    pub write_id: Uuid,
    pub identity: EventIdentity,
    pub fields: Vec<&'static str>,
    pub result: Result<(), String>,
}

impl MirrorOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fire-and-forget writer in front of a remote gateway.
///
/// Writes are queued to a single worker task that awaits them one at a
/// time, so the remote sees them in the order they were applied locally.
pub(crate) struct RemoteMirror {
    gateway: Arc<dyn RemotePersistenceGateway>,
    queue: Option<mpsc::UnboundedSender<MirrorWrite>>,
    tx: mpsc::Sender<MirrorOutcome>,
    rx: mpsc::Receiver<MirrorOutcome>,
}

fn report(tx: &mpsc::Sender<MirrorOutcome>, outcome: MirrorOutcome) {
    if let Err(e) = tx.try_send(outcome) {
        debug!("mirror outcome dropped: {e}");
    }
}

async fn run_worker(
    gateway: Arc<dyn RemotePersistenceGateway>,
    mut queue: mpsc::UnboundedReceiver<MirrorWrite>,
    tx: mpsc::Sender<MirrorOutcome>,
) {
    while let Some(write) = queue.recv().await {
        let result = gateway.write(&write).await.map_err(|e| format!("{e:#}"));
        match &result {
            Ok(()) => debug!("remote write {} for {} done", write.write_id, write.identity),
            Err(message) => warn!(
                "remote write {} for {} failed: {}",
                write.write_id, write.identity, message
            ),
        }
        report(
            &tx,
            MirrorOutcome {
                write_id: write.write_id,
                fields: write.patch.field_names(),
                identity: write.identity,
                result,
            },
        );
    }
    debug!("mirror worker stopped");
}

impl RemoteMirror {
    pub(crate) fn new(gateway: Arc<dyn RemotePersistenceGateway>) -> Self {
        let (tx, rx) = mpsc::channel(MIRROR_OUTCOME_CAPACITY);
        Self {
            gateway,
            queue: None,
            tx,
            rx,
        }
    }

    /// Start the worker on the caller's runtime when there is one,
    /// otherwise on the shared fallback runtime.
    fn start_worker(&self) -> anyhow::Result<mpsc::UnboundedSender<MirrorWrite>> {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let worker = run_worker(self.gateway.clone(), queue_rx, self.tx.clone());
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(worker);
        } else {
            crate::async_runtime::fallback_runtime()?.spawn(worker);
        }
        debug!("mirror worker started");
        Ok(queue_tx)
    }

    /// Queue the write and return immediately. The worker is (re)started
    /// lazily when missing or when its runtime has gone away.
    pub(crate) fn dispatch(&mut self, write: MirrorWrite) {
        let write = match &self.queue {
            Some(queue) => match queue.send(write) {
                Ok(()) => return,
                Err(mpsc::error::SendError(write)) => write,
            },
            None => write,
        };

        let queue = match self.start_worker() {
            Ok(queue) => queue,
            Err(e) => {
                warn!(
                    "remote write {} for {} not started: {e:#}",
                    write.write_id, write.identity
                );
                report(
                    &self.tx,
                    MirrorOutcome {
                        write_id: write.write_id,
                        fields: write.patch.field_names(),
                        identity: write.identity,
                        result: Err(format!("no async runtime: {e:#}")),
                    },
                );
                return;
            }
        };
        if let Err(mpsc::error::SendError(write)) = queue.send(write) {
            report(
                &self.tx,
                MirrorOutcome {
                    write_id: write.write_id,
                    fields: write.patch.field_names(),
                    identity: write.identity,
                    result: Err("mirror worker stopped".to_string()),
                },
            );
            return;
        }
        self.queue = Some(queue);
    }

    pub(crate) fn drain(&mut self) -> Vec<MirrorOutcome> {
        let mut out = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            out.push(outcome);
        }
        out
    }
}
