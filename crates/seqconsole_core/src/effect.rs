#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the next page of the jobs feed.
    LoadNextJobsPage,
    /// Drop accumulated pages and refetch from page one with this filter.
    ResetJobsFeed { filter: crate::JobFilter },
    /// Open (or reopen) the job event stream, resetting the retry budget.
    OpenJobStream,
    LoadArtifacts,
    LoadTools,
    UploadArtifact { path: String },
    DeleteArtifact { key: String },
    DownloadArtifact { key: String },
    SubmitAnalysis { artifact_key: String, tool: String },
    CancelJob { key: crate::JobKey },
    ProbeHealth,
}
