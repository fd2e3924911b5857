use crate::{ArtifactRecord, JobFilter, JobKey, JobStatus, StreamStatus, Theme};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// Reconciled, filtered, newest-first job rows.
    pub jobs: Vec<JobRowView>,
    pub total_jobs: Option<u64>,
    pub feed_loading: bool,
    pub feed_exhausted: bool,
    pub filter: JobFilter,
    pub stream: StreamStatus,
    pub artifacts: Vec<ArtifactRecord>,
    pub tools: Vec<String>,
    pub upload_in_flight: bool,
    pub submit_in_flight: bool,
    pub healthy: Option<bool>,
    pub selected: Option<JobKey>,
    pub theme: Theme,
    pub last_error: Option<String>,
    pub notice: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub key: JobKey,
    pub artifact_name: String,
    pub tool: String,
    pub status: JobStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub message: Option<String>,
    pub output_key: Option<String>,
    /// True when the row came from (or was overlaid by) the event stream.
    pub live: bool,
}
