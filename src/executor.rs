//! # Job Execution
//!
//! [`PrintJobExecutor`] hands a [`JobRequest`] to a [`PrintService`] on a
//! background task and returns a [`PendingJob`] straight away. The pending
//! job resolves exactly once, to a [`JobOutcome`].
//!
//! ## Ordering
//!
//! Jobs run independently. A job submitted later may resolve first; callers
//! must route each outcome by the job it belongs to, not by arrival order.
//!
//! ## Failures
//!
//! Service errors are never returned from [`PrintJobExecutor::submit`]. They
//! come back through the pending job as [`JobOutcome::Failure`]. There are no
//! retries.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

use crate::error::PrintError;
use crate::request::JobRequest;

/// A remote print/export service.
#[async_trait]
pub trait PrintService: Send + Sync {
    /// Render one job and return the URL of the produced file.
    async fn execute(&self, request: &JobRequest) -> Result<String, PrintError>;
}

/// Terminal result of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success { url: String },
    Failure { cause: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success { .. })
    }
}

impl From<Result<String, PrintError>> for JobOutcome {
    fn from(result: Result<String, PrintError>) -> Self {
        match result {
            Ok(url) => JobOutcome::Success { url },
            Err(e) => JobOutcome::Failure {
                cause: e.to_string(),
            },
        }
    }
}

/// Handle to an in-flight job. Await it for the outcome.
///
/// Dropping the handle does not stop the job.
#[derive(Debug)]
pub struct PendingJob {
    handle: JoinHandle<JobOutcome>,
}

impl Future for PendingJob {
    type Output = JobOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(e)) => Poll::Ready(JobOutcome::Failure {
                cause: format!("print task failed: {}", e),
            }),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Submits jobs to a print service.
///
/// Must be used from within a tokio runtime.
pub struct PrintJobExecutor {
    service: Arc<dyn PrintService>,
}

impl PrintJobExecutor {
    pub fn new(service: Arc<dyn PrintService>) -> Self {
        Self { service }
    }

    /// Start one job. Returns without waiting for the service.
    pub fn submit(&self, request: JobRequest) -> PendingJob {
        let service = Arc::clone(&self.service);
        let handle = tokio::spawn(async move {
            let outcome = JobOutcome::from(service.execute(&request).await);
            match &outcome {
                JobOutcome::Success { url } => {
                    tracing::info!(format = %request.format, url = %url, "print job finished");
                }
                JobOutcome::Failure { cause } => {
                    tracing::warn!(format = %request.format, cause = %cause, "print job failed");
                }
            }
            outcome
        });
        PendingJob { handle }
    }
}
