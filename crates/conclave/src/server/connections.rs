use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use conclave_core::dispatch::{ConnectionId, DeliveryError, Reply, ResponseSink};

// ==============================================================================
// Connection Registry
// ==============================================================================

/// HTTP requests waiting for their dispatcher reply, keyed by the
/// connection tag carried on the queued response.
#[derive(Default)]
pub struct PendingConnections {
    next_id: AtomicU64,
    waiting: Mutex<HashMap<ConnectionId, oneshot::Sender<Reply>>>,
}

impl PendingConnections {
    pub fn new() -> Self {
        Self::default()
    }

    fn waiting(&self) -> MutexGuard<'_, HashMap<ConnectionId, oneshot::Sender<Reply>>> {
        self.waiting.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate a connection tag and the slot its reply will land in.
    pub fn register(self: &Arc<Self>) -> PendingReply {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        self.waiting().insert(id, tx);
        PendingReply {
            id,
            rx: Some(rx),
            registry: Arc::clone(self),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.waiting().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.waiting().is_empty()
    }
}

impl ResponseSink for PendingConnections {
    fn deliver(&self, connection: ConnectionId, reply: Reply) -> Result<(), DeliveryError> {
        let tx = self
            .waiting()
            .remove(&connection)
            .ok_or(DeliveryError::UnknownConnection(connection))?;
        tx.send(reply).map_err(|_| DeliveryError::Closed(connection))
    }
}

/// One registered connection. Dropping it unregisters the tag, so a client
/// that hangs up leaves nothing behind for the workers.
pub struct PendingReply {
    id: ConnectionId,
    rx: Option<oneshot::Receiver<Reply>>,
    registry: Arc<PendingConnections>,
}

impl PendingReply {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Wait for a worker to deliver this connection's reply.
    pub async fn recv(mut self) -> Option<Reply> {
        let rx = self.rx.take()?;
        rx.await.ok()
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.registry.waiting().remove(&self.id);
    }
}
