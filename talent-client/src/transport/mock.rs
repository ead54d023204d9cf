use async_trait::async_trait;
use shared::models::{Job, JobCreate, JobUpdate};
use shared::reorder::{ReorderOutcome, ReorderRequest};
use std::sync::Arc;

use super::fault::{FaultStrategy, Injection, RandomFaults};
use super::{JobsTransport, Operation};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Simulated network in front of another transport
///
/// Every call sleeps for the injected latency first; an injected failure
/// then returns without touching the inner transport, so nothing is
/// persisted.
#[derive(Debug, Clone)]
pub struct MockTransport<T> {
    inner: T,
    faults: Arc<dyn FaultStrategy>,
}

impl<T: JobsTransport> MockTransport<T> {
    pub fn new(inner: T, faults: Arc<dyn FaultStrategy>) -> Self {
        Self { inner, faults }
    }

    /// Random latency and failures from `config`
    pub fn from_config(inner: T, config: &ClientConfig) -> Self {
        Self::new(inner, Arc::new(RandomFaults::new(config)))
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Apply the latency and report whether the call was dropped
    async fn simulate(&self, op: Operation) -> Option<String> {
        let Injection { latency, fail } = self.faults.inject(op);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if fail {
            tracing::warn!(operation = ?op, latency_ms = latency.as_millis() as u64, "Injected transport failure");
            Some(format!("Simulated network failure during {:?}", op))
        } else {
            None
        }
    }
}

#[async_trait]
impl<T: JobsTransport> JobsTransport for MockTransport<T> {
    async fn list_jobs(&self) -> ClientResult<Vec<Job>> {
        if let Some(msg) = self.simulate(Operation::ListJobs).await {
            return Err(ClientError::Transport(msg));
        }
        self.inner.list_jobs().await
    }

    async fn create_job(&self, data: &JobCreate) -> ClientResult<Job> {
        if let Some(msg) = self.simulate(Operation::CreateJob).await {
            return Err(ClientError::Transport(msg));
        }
        self.inner.create_job(data).await
    }

    async fn update_job(&self, id: &str, patch: &JobUpdate) -> ClientResult<Job> {
        if let Some(msg) = self.simulate(Operation::UpdateJob).await {
            return Err(ClientError::Transport(msg));
        }
        self.inner.update_job(id, patch).await
    }

    async fn reorder(&self, request: &ReorderRequest) -> ReorderOutcome {
        if let Some(msg) = self.simulate(Operation::Reorder).await {
            return ReorderOutcome::TransportFailure(msg);
        }
        self.inner.reorder(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedFaults;
    use parking_lot::Mutex;
    use shared::reorder::ReorderReceipt;
    use std::time::Duration;

    /// Counts calls that reach it
    #[derive(Debug, Default)]
    struct Counting {
        reorders: Mutex<usize>,
    }

    #[async_trait]
    impl JobsTransport for Counting {
        async fn list_jobs(&self) -> ClientResult<Vec<Job>> {
            Ok(vec![])
        }

        async fn create_job(&self, _data: &JobCreate) -> ClientResult<Job> {
            Err(ClientError::Internal("unused".into()))
        }

        async fn update_job(&self, _id: &str, _patch: &JobUpdate) -> ClientResult<Job> {
            Err(ClientError::Internal("unused".into()))
        }

        async fn reorder(&self, request: &ReorderRequest) -> ReorderOutcome {
            *self.reorders.lock() += 1;
            ReorderOutcome::Success(ReorderReceipt::new(request, vec![]))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_injected_failure_never_reaches_inner() {
        let faults = Arc::new(ScriptedFaults::new([Injection::fail_after(300)]));
        let transport = MockTransport::new(Counting::default(), faults);

        let started = tokio::time::Instant::now();
        let outcome = transport.reorder(&ReorderRequest::new("a", 0, 1)).await;

        assert!(matches!(outcome, ReorderOutcome::TransportFailure(_)));
        assert_eq!(*transport.inner().reorders.lock(), 0);
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_call_is_forwarded() {
        let faults = Arc::new(ScriptedFaults::new([Injection::delay(120)]));
        let transport = MockTransport::new(Counting::default(), faults);

        let started = tokio::time::Instant::now();
        let outcome = transport.reorder(&ReorderRequest::new("a", 0, 1)).await;

        assert!(outcome.is_success());
        assert_eq!(*transport.inner().reorders.lock(), 1);
        assert!(started.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_failure_on_list_is_transport_error() {
        let config = ClientConfig::new().with_latency(0, 0).with_failure_rate(1.0);
        let transport = MockTransport::from_config(Counting::default(), &config);

        // Reads are never dropped
        assert!(transport.list_jobs().await.is_ok());
        let err = transport
            .update_job("a", &JobUpdate::order(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
