//! # Print Session
//!
//! Ties the pieces together for one user session: the editable options, the
//! history, the executor, and the map-side collaborators.
//!
//! ## Flow
//!
//! ```text
//! options ──► JobRequest::build ──► executor.submit ──► PendingJob
//!                                          │                 │
//!                          history.append ◄┘                 │ (any order)
//!                                                            ▼
//!                 history.resolve(job id) ◄── next_resolution()
//!                                │
//!                                ▼
//!                       results() (deduplicated)
//! ```
//!
//! All history changes happen on the task that owns the session. Service
//! calls run on their own tasks and report back through
//! [`next_resolution`](PrintSession::next_resolution).

use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use std::sync::Arc;

use crate::dedupe::{ResultEntry, dedupe};
use crate::error::PrintError;
use crate::executor::{JobOutcome, PrintJobExecutor, PrintService};
use crate::history::{JobId, PrintHistory, ResolveStatus};
use crate::options::PrintOptions;
use crate::request::JobRequest;
use crate::view::{OverlaySource, StaticOverlay, ViewProvider};

type Tagged = BoxFuture<'static, (JobId, JobOutcome)>;

/// One user's print workflow.
pub struct PrintSession {
    options: PrintOptions,
    history: PrintHistory,
    executor: PrintJobExecutor,
    view: Box<dyn ViewProvider + Send>,
    overlay: Box<dyn OverlaySource + Send>,
    in_flight: FuturesUnordered<Tagged>,
}

impl PrintSession {
    pub fn new(
        options: PrintOptions,
        service: Arc<dyn PrintService>,
        view: Box<dyn ViewProvider + Send>,
    ) -> Self {
        Self {
            options,
            history: PrintHistory::new(),
            executor: PrintJobExecutor::new(service),
            view,
            overlay: Box::new(StaticOverlay::default()),
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Use `overlay` for extra layout text instead of the options' own value.
    pub fn with_overlay(mut self, overlay: Box<dyn OverlaySource + Send>) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn options(&self) -> &PrintOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut PrintOptions {
        &mut self.options
    }

    pub fn history(&self) -> &PrintHistory {
        &self.history
    }

    /// Number of submitted jobs that have not reported back yet, including
    /// any submitted before the last [`clear`](Self::clear).
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Submit a job with the current options.
    ///
    /// Fails only when there is no map view. Service failures show up later
    /// on the job's history entry.
    pub fn print(&mut self) -> Result<JobId, PrintError> {
        let view = self.view.current_view().ok_or(PrintError::NoView)?;

        let mut options = self.options.clone();
        if let Some(overlay) = self.overlay.overlay_text() {
            options.overlay_text = Some(overlay);
        }
        let request = JobRequest::build(&options, view);

        let pending = self.executor.submit(request);
        let id = self.history.append(options.format.clone(), options.title.clone());
        self.in_flight
            .push(Box::pin(async move { (id, pending.await) }));

        tracing::info!(
            job = %id,
            title = %options.title,
            layout = %options.layout,
            format = %options.format,
            "print job submitted"
        );
        Ok(id)
    }

    /// Wait for the next job to finish and record its outcome.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_resolution(&mut self) -> Option<(JobId, ResolveStatus)> {
        let (id, outcome) = self.in_flight.next().await?;
        let status = self.history.resolve(id, &outcome);
        Some((id, status))
    }

    /// Wait for every in-flight job.
    pub async fn wait_all(&mut self) {
        while self.next_resolution().await.is_some() {}
    }

    /// Empty the result list. Jobs still running are left alone and their
    /// outcomes are dropped when they arrive.
    pub fn clear(&mut self) {
        tracing::info!(
            cleared = self.history.len(),
            in_flight = self.in_flight.len(),
            "clearing print results"
        );
        self.history.clear();
    }

    /// Render-ready result list, with unique display titles.
    pub fn results(&self) -> Vec<ResultEntry> {
        dedupe(self.history.records())
            .entries()
            .map(|entry| entry.to_result())
            .collect()
    }
}
