#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// App is up; kick off the initial loads and the event stream.
    Started,
    /// Restore previously persisted UI preferences.
    RestorePreferences(crate::PreferencesSnapshot),

    /// One page of jobs arrived from the backend.
    JobsPageLoaded {
        jobs: Vec<crate::JobRecord>,
        exhausted: bool,
        total: Option<u64>,
    },
    /// The page request failed.
    JobsPageFailed { message: String },
    /// The view scrolled close enough to the end to want more rows.
    EndOfListReached,
    /// User applied a new filter.
    FilterChanged(crate::JobFilter),
    /// User cleared the filter.
    FilterCleared,

    /// A job update arrived over the event stream.
    JobUpdated(crate::JobRecord),
    /// The event stream connected.
    StreamOpened,
    /// The event stream dropped; a retry is scheduled.
    StreamRetrying { attempt: u32 },
    /// The event stream gave up reconnecting.
    StreamClosed,
    /// User asked for a manual reconnect.
    ReconnectClicked,

    /// Artifact listing arrived.
    ArtifactsLoaded(Vec<crate::ArtifactRecord>),
    /// User submitted a local file path for upload.
    UploadSubmitted { path: String },
    /// Upload finished (new artifact record or error text).
    UploadFinished { result: Result<crate::ArtifactRecord, String> },
    /// User confirmed deletion of an artifact.
    DeleteArtifactConfirmed { key: String },
    /// Deletion finished.
    ArtifactDeleted { key: String, result: Result<(), String> },
    /// User asked to download an output artifact.
    DownloadRequested { key: String },
    /// Download finished (local path or error text).
    DownloadFinished { result: Result<String, String> },

    /// Tool catalogue arrived.
    ToolsLoaded(Vec<String>),
    /// User confirmed the submit dialog.
    AnalysisSubmitted { artifact_key: String, tool: String },
    /// Backend accepted the analysis and created a job.
    AnalysisAccepted { job: crate::JobRecord },
    /// Backend rejected the analysis.
    AnalysisRejected { message: String },
    /// User confirmed cancelling a job.
    CancelJobConfirmed { key: crate::JobKey },

    /// Health probe result.
    HealthChecked { healthy: bool },

    /// User selected a job row.
    JobSelected { key: crate::JobKey },
    /// User toggled the colour theme.
    ThemeToggled,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
