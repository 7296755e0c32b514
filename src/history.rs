//! # Print History
//!
//! Ordered record of every job submitted since the last [`clear`], and the
//! resolution state of each one.
//!
//! ## Record Lifecycle
//!
//! ```text
//!              ┌──── success(url) ───► Succeeded
//! Pending ─────┤
//!              └──── failure ────────► Failed
//! ```
//!
//! Both terminal states are final. A second resolution for the same job is
//! ignored and logged.
//!
//! ## Identity
//!
//! Records are addressed by [`JobId`], never by position. A resolution that
//! arrives after [`clear`] names a job that is no longer present and is
//! dropped, so it can't land on a newer record that happens to sit at the
//! same index.
//!
//! [`clear`]: PrintHistory::clear

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::watch;
use uuid::Uuid;

use crate::executor::JobOutcome;
use crate::options::OutputFormat;

/// Stable identity of one submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolution state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Succeeded,
    Failed,
}

/// One submitted job.
#[derive(Debug, Clone, Serialize)]
pub struct PrintJobRecord {
    pub id: JobId,
    pub format: OutputFormat,
    /// Title as requested. Display names are derived, never stored here.
    pub title: String,
    /// Download URL, empty until the job succeeds.
    pub url: String,
    pub error: bool,
    /// Position in submission order since the last clear.
    pub result_index: usize,
    pub submitted_at: DateTime<Utc>,
}

impl PrintJobRecord {
    pub fn state(&self) -> JobState {
        if self.error {
            JobState::Failed
        } else if self.url.is_empty() {
            JobState::Pending
        } else {
            JobState::Succeeded
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == JobState::Pending
    }
}

/// What [`PrintHistory::resolve`] did with a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    /// The record moved to its terminal state.
    Applied,
    /// The record was already terminal; nothing changed.
    AlreadyResolved,
    /// No record with that id (e.g. history was cleared); nothing changed.
    UnknownJob,
}

/// Insertion-ordered job records.
#[derive(Debug)]
pub struct PrintHistory {
    records: Vec<PrintJobRecord>,
    index: HashMap<JobId, usize>,
    has_results: watch::Sender<bool>,
}

impl PrintHistory {
    pub fn new() -> Self {
        let (has_results, _) = watch::channel(false);
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            has_results,
        }
    }

    /// Record a new pending job and return its id.
    pub fn append(&mut self, format: OutputFormat, title: impl Into<String>) -> JobId {
        let id = JobId::new();
        let result_index = self.records.len();
        self.records.push(PrintJobRecord {
            id,
            format,
            title: title.into(),
            url: String::new(),
            error: false,
            result_index,
            submitted_at: Utc::now(),
        });
        self.index.insert(id, result_index);
        self.has_results.send_replace(true);
        id
    }

    /// Move a pending record to its terminal state.
    pub fn resolve(&mut self, id: JobId, outcome: &JobOutcome) -> ResolveStatus {
        let Some(&position) = self.index.get(&id) else {
            tracing::debug!(job = %id, "ignoring resolution for job no longer in history");
            return ResolveStatus::UnknownJob;
        };
        let record = &mut self.records[position];

        if !record.is_pending() {
            tracing::warn!(
                job = %id,
                state = ?record.state(),
                "job resolved more than once; keeping first resolution"
            );
            return ResolveStatus::AlreadyResolved;
        }

        match outcome {
            JobOutcome::Success { url } if !url.is_empty() => {
                record.url = url.clone();
            }
            JobOutcome::Success { .. } => {
                tracing::warn!(job = %id, "print service returned an empty URL");
                record.error = true;
            }
            JobOutcome::Failure { .. } => {
                record.error = true;
            }
        }
        ResolveStatus::Applied
    }

    /// Empty the history. Jobs still in flight are not cancelled; their
    /// resolutions will come back as [`ResolveStatus::UnknownJob`].
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
        self.has_results.send_replace(false);
    }

    pub fn records(&self) -> &[PrintJobRecord] {
        &self.records
    }

    pub fn get(&self, id: JobId) -> Option<&PrintJobRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_pending()).count()
    }

    pub fn has_results(&self) -> bool {
        *self.has_results.borrow()
    }

    /// Watch the "has results" flag (e.g. to show or hide a clear action).
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.has_results.subscribe()
    }
}

impl Default for PrintHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn success(url: &str) -> JobOutcome {
        JobOutcome::Success {
            url: url.to_string(),
        }
    }

    fn failure() -> JobOutcome {
        JobOutcome::Failure {
            cause: "service unavailable".to_string(),
        }
    }

    #[test]
    fn test_append_assigns_submission_order() {
        let mut history = PrintHistory::new();
        let ids: Vec<JobId> = (0..4)
            .map(|i| history.append(OutputFormat::Pdf, format!("Map {}", i)))
            .collect();

        assert_eq!(history.len(), 4);
        for (i, id) in ids.iter().enumerate() {
            let record = history.get(*id).unwrap();
            assert_eq!(record.result_index, i);
            assert_eq!(record.title, format!("Map {}", i));
            assert_eq!(record.state(), JobState::Pending);
            assert_eq!(record.url, "");
            assert!(!record.error);
        }
    }

    #[test]
    fn test_has_results_flag() {
        let mut history = PrintHistory::new();
        let rx = history.subscribe();
        assert!(!history.has_results());
        assert!(!*rx.borrow());

        history.append(OutputFormat::Pdf, "Map");
        assert!(history.has_results());
        assert!(*rx.borrow());

        history.clear();
        assert!(!history.has_results());
        assert!(!*rx.borrow());
    }

    #[test]
    fn test_out_of_order_resolution() {
        let mut history = PrintHistory::new();
        let a = history.append(OutputFormat::Pdf, "A");
        let b = history.append(OutputFormat::Pdf, "B");

        assert_eq!(history.resolve(b, &success("https://x/b.pdf")), ResolveStatus::Applied);
        assert_eq!(history.get(b).unwrap().state(), JobState::Succeeded);
        assert_eq!(history.get(a).unwrap().state(), JobState::Pending);
        assert_eq!(history.pending_count(), 1);

        assert_eq!(history.resolve(a, &failure()), ResolveStatus::Applied);
        assert_eq!(history.get(a).unwrap().state(), JobState::Failed);
        assert_eq!(history.get(b).unwrap().url, "https://x/b.pdf");
    }

    #[test]
    fn test_second_resolution_is_ignored() {
        let mut history = PrintHistory::new();
        let id = history.append(OutputFormat::Png32, "Map");

        history.resolve(id, &success("https://x/1.png"));
        assert_eq!(history.resolve(id, &failure()), ResolveStatus::AlreadyResolved);
        assert_eq!(
            history.resolve(id, &success("https://x/2.png")),
            ResolveStatus::AlreadyResolved
        );

        let record = history.get(id).unwrap();
        assert_eq!(record.url, "https://x/1.png");
        assert!(!record.error);
    }

    #[test]
    fn test_failure_is_terminal() {
        let mut history = PrintHistory::new();
        let id = history.append(OutputFormat::Pdf, "Map");
        history.resolve(id, &failure());
        assert_eq!(
            history.resolve(id, &success("https://x/late.pdf")),
            ResolveStatus::AlreadyResolved
        );
        let record = history.get(id).unwrap();
        assert!(record.error);
        assert_eq!(record.url, "");
    }

    #[test]
    fn test_empty_url_counts_as_failure() {
        let mut history = PrintHistory::new();
        let id = history.append(OutputFormat::Pdf, "Map");
        history.resolve(id, &success(""));
        assert_eq!(history.get(id).unwrap().state(), JobState::Failed);
    }

    #[test]
    fn test_late_resolution_after_clear() {
        let mut history = PrintHistory::new();
        let stale = history.append(OutputFormat::Pdf, "Old");
        history.clear();
        assert_eq!(history.len(), 0);

        let fresh = history.append(OutputFormat::Pdf, "New");
        assert_eq!(
            history.resolve(stale, &success("https://x/old.pdf")),
            ResolveStatus::UnknownJob
        );

        // The new record at the same position is untouched.
        assert_eq!(history.len(), 1);
        assert_eq!(history.get(fresh).unwrap().state(), JobState::Pending);
        assert_eq!(history.get(fresh).unwrap().result_index, 0);
    }

    #[test]
    fn test_late_resolution_does_not_repopulate() {
        let mut history = PrintHistory::new();
        let id = history.append(OutputFormat::Pdf, "Old");
        history.clear();

        assert_eq!(history.resolve(id, &failure()), ResolveStatus::UnknownJob);
        assert!(history.is_empty());
        assert!(!history.has_results());
    }
}
