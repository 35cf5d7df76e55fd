//! In-process provisioning queue and worker

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{CoreError, CoreResult};
use crate::services::ProvisionServerDomain;
use crate::traits::ProvisionQueue;

/// Receiving half of a [`ChannelProvisionQueue`].
pub type ProvisionReceiver = mpsc::UnboundedReceiver<i64>;

/// [`ProvisionQueue`] backed by a tokio channel.
#[derive(Clone)]
pub struct ChannelProvisionQueue {
    sender: mpsc::UnboundedSender<i64>,
}

impl ChannelProvisionQueue {
    /// Create the queue and the receiver a [`ProvisionWorker`] drains.
    #[must_use]
    pub fn new() -> (Self, ProvisionReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ProvisionQueue for ChannelProvisionQueue {
    async fn dispatch(&self, domain_id: i64) -> CoreResult<()> {
        self.sender
            .send(domain_id)
            .map_err(|_| CoreError::QueueClosed)?;
        log::debug!("Queued provisioning job for domain {domain_id}");
        Ok(())
    }
}

/// Runs queued jobs one at a time.
pub struct ProvisionWorker {
    job: ProvisionServerDomain,
    receiver: ProvisionReceiver,
}

impl ProvisionWorker {
    #[must_use]
    pub fn new(job: ProvisionServerDomain, receiver: ProvisionReceiver) -> Self {
        Self { job, receiver }
    }

    /// Process jobs until every queue handle is dropped.
    pub async fn run(mut self) {
        log::info!("Provisioning worker started");
        while let Some(domain_id) = self.receiver.recv().await {
            self.process(domain_id).await;
        }
        log::info!("Provisioning worker stopped");
    }

    /// Process whatever is queued right now; returns the number of jobs run.
    pub async fn run_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(domain_id) = self.receiver.try_recv() {
            self.process(domain_id).await;
            processed += 1;
        }
        processed
    }

    async fn process(&self, domain_id: i64) {
        if let Err(e) = self.job.handle(domain_id).await {
            if e.is_expected() {
                log::warn!("Provisioning job for domain {domain_id} failed: {e}");
            } else {
                log::error!("Provisioning job for domain {domain_id} failed: {e}");
            }
        }
    }
}
