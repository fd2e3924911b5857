use std::fmt;

/// Backend identifier for a job. Opaque to the client.
pub type JobKey = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Success => write!(f, "success"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

/// One alignment job as displayed by the front end.
///
/// Timestamps are RFC 3339 UTC strings. Lexicographic comparison of two such
/// strings matches chronological order, so the core never parses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub key: JobKey,
    /// Source artifact the job was submitted against.
    pub artifact_key: String,
    pub artifact_name: String,
    pub tool: String,
    pub status: JobStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
    /// Backend-supplied detail, e.g. an error reason.
    pub message: Option<String>,
    /// Output artifact, present once the job succeeded.
    pub output_key: Option<String>,
}

/// An uploaded or generated file tracked by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub key: String,
    pub name: String,
    pub size: u64,
    pub kind: ArtifactKind,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Input,
    Output,
}

/// Date component (YYYY-MM-DD) of an RFC 3339 timestamp.
pub fn date_component(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

/// Active job-list filter. All set fields must match (conjunction).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobFilter {
    pub artifact: Option<String>,
    pub tool: Option<String>,
    pub status: Option<JobStatus>,
    /// Inclusive lower bound on the creation date (YYYY-MM-DD).
    pub date_from: Option<String>,
    /// Inclusive upper bound on the creation date (YYYY-MM-DD).
    pub date_to: Option<String>,
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        *self == JobFilter::default()
    }

    pub fn matches(&self, job: &JobRecord) -> bool {
        if let Some(artifact) = &self.artifact {
            if *artifact != job.artifact_key {
                return false;
            }
        }
        if let Some(tool) = &self.tool {
            if *tool != job.tool {
                return false;
            }
        }
        if let Some(status) = self.status {
            if status != job.status {
                return false;
            }
        }
        let created = date_component(&job.created_at);
        if let Some(from) = &self.date_from {
            if created < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &self.date_to {
            if created > to.as_str() {
                return false;
            }
        }
        true
    }
}
