//! Persistence worker: drains the observation channel into the database.
//!
//! The writer owns the repository handle for its whole life. It blocks on
//! the channel with a bounded timeout so it can periodically re-check the
//! stop signal, and it treats every persistence failure as recoverable:
//! log, drop the record, keep going. The loop exits once a stop has been
//! requested and the channel is drained, or as soon as the producer side
//! closes.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tracing::{debug, error, info};

use verdant_core::constants::WRITER_RECV_TIMEOUT;
use verdant_core::Observation;

use crate::repository::MeasurementRepository;

/// The persistence worker.
pub struct MeasurementWriter<R> {
    repo: R,
    rx: mpsc::Receiver<Observation>,
    stop: watch::Receiver<bool>,
    recv_timeout: Duration,
}

impl<R: MeasurementRepository> MeasurementWriter<R> {
    pub fn new(repo: R, rx: mpsc::Receiver<Observation>, stop: watch::Receiver<bool>) -> Self {
        Self {
            repo,
            rx,
            stop,
            recv_timeout: WRITER_RECV_TIMEOUT,
        }
    }

    /// Override the receive timeout (how often the stop flag is re-checked
    /// when no data arrives).
    pub fn with_recv_timeout(mut self, recv_timeout: Duration) -> Self {
        self.recv_timeout = recv_timeout;
        self
    }

    /// Run the write loop.
    ///
    /// An in-flight insert always completes before the stop signal is
    /// observed; records already enqueued when the stop arrives are still
    /// persisted because the loop keeps draining until the channel closes
    /// or runs empty.
    pub async fn run(mut self) {
        info!("writer started");

        loop {
            match timeout(self.recv_timeout, self.rx.recv()).await {
                Ok(Some(observation)) => self.persist(observation).await,
                Ok(None) => {
                    debug!("observation channel closed");
                    break;
                }
                Err(_elapsed) => {
                    if *self.stop.borrow() && self.rx.is_empty() {
                        break;
                    }
                }
            }
        }

        info!("writer stopped");
    }

    /// Insert exactly one row for the observation. Failures are logged and
    /// the record is dropped; the next successful write resumes normal
    /// operation.
    async fn persist(&self, observation: Observation) {
        match self.repo.insert(&observation).await {
            Ok(id) => {
                debug!(id, fields = observation.field_count(), "measurement written");
            }
            Err(e) => {
                error!(error = %e, "failed to persist observation; record dropped");
            }
        }
    }
}
