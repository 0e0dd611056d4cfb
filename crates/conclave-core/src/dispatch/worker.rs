use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, warn};

use super::{ConnectionId, Dequeued, QueuedResponse, ResponseQueue, ResponseSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    WaitingForResponse,
    HaveResponse,
    Sent,
    Stopped,
}

/// What one [`DispatchWorker::work`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStep {
    Delivered(ConnectionId),
    /// The sink refused the reply; the response has still been consumed.
    DeliveryFailed(ConnectionId),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub id: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Pops queued responses and writes each to its connection.
pub struct DispatchWorker {
    id: usize,
    queue: Arc<ResponseQueue<QueuedResponse>>,
    sink: Arc<dyn ResponseSink>,
    state: WorkerState,
    delivered: usize,
    failed: usize,
}

impl DispatchWorker {
    pub fn new(
        id: usize,
        queue: Arc<ResponseQueue<QueuedResponse>>,
        sink: Arc<dyn ResponseSink>,
    ) -> Self {
        Self {
            id,
            queue,
            sink,
            state: WorkerState::WaitingForResponse,
            delivered: 0,
            failed: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Block for the next queued item and deliver it.
    ///
    /// Returns [`WorkerStep::Shutdown`] as soon as the stop signal is popped;
    /// no further item is taken from the queue by this worker.
    pub fn work(&mut self) -> WorkerStep {
        self.state = WorkerState::WaitingForResponse;
        let queued = match self.queue.pop() {
            Dequeued::Item(queued) => queued,
            Dequeued::Shutdown => {
                self.state = WorkerState::Stopped;
                debug!(worker.id = self.id, "received shutdown signal");
                return WorkerStep::Shutdown;
            }
        };

        self.state = WorkerState::HaveResponse;
        let connection = queued.connection;
        let reply = queued.to_reply();
        drop(queued);

        let step = match self.sink.deliver(connection, reply) {
            Ok(()) => {
                self.delivered += 1;
                debug!(worker.id = self.id, %connection, "response delivered");
                WorkerStep::Delivered(connection)
            }
            Err(e) => {
                self.failed += 1;
                warn!(worker.id = self.id, %connection, error = %e, "failed to deliver response");
                WorkerStep::DeliveryFailed(connection)
            }
        };
        self.state = WorkerState::Sent;
        step
    }

    /// Deliver until the stop signal arrives.
    pub fn run(mut self) -> WorkerSummary {
        debug!(worker.id = self.id, "dispatch worker started");
        while self.work() != WorkerStep::Shutdown {}
        WorkerSummary {
            id: self.id,
            delivered: self.delivered,
            failed: self.failed,
        }
    }
}

/// A fixed set of dispatch worker threads sharing one queue.
pub struct WorkerPool {
    queue: Arc<ResponseQueue<QueuedResponse>>,
    handles: Vec<JoinHandle<WorkerSummary>>,
}

impl WorkerPool {
    pub fn spawn(
        workers: usize,
        queue: Arc<ResponseQueue<QueuedResponse>>,
        sink: Arc<dyn ResponseSink>,
    ) -> io::Result<Self> {
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let worker = DispatchWorker::new(id, Arc::clone(&queue), Arc::clone(&sink));
            let handle = thread::Builder::new()
                .name(format!("dispatch-{id}"))
                .spawn(move || worker.run());
            match handle {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Stop the threads that did start before reporting.
                    queue.close(handles.len());
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(e);
                }
            }
        }
        Ok(Self { queue, handles })
    }

    pub fn queue(&self) -> &Arc<ResponseQueue<QueuedResponse>> {
        &self.queue
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Signal every worker and wait for them to exit. Responses queued
    /// before this call are delivered first.
    pub fn shutdown(self) -> Vec<WorkerSummary> {
        self.queue.close(self.handles.len());
        self.handles
            .into_iter()
            .filter_map(|handle| match handle.join() {
                Ok(summary) => Some(summary),
                Err(_) => {
                    error!("dispatch worker panicked");
                    None
                }
            })
            .collect()
    }
}
