//! SeqConsole client: typed access to the alignment backend over HTTP and SSE.
mod analyses;
mod artifacts;
mod health;
mod http;
mod jobs;
mod monitor;
mod pager;
mod persist;
mod sse;
mod types;

pub use analyses::AnalysisService;
pub use artifacts::ArtifactService;
pub use health::HealthService;
pub use http::{ApiClient, ApiSettings};
pub use jobs::{JobPageFetcher, JobQuery, JobService, JOBS_PAGE_SIZE};
pub use monitor::{
    ChannelEventSink, EventSink, MonitorHandle, MAX_RECONNECT_ATTEMPTS, RECONNECT_DELAY,
};
pub use pager::{Page, PageFetcher, Pager};
pub use persist::{ensure_download_dir, AtomicFileWriter, PersistError};
pub use sse::{SseEvent, SseParser};
pub use types::{
    ApiError, ApiFailure, ArtifactDto, ArtifactKindDto, ClientEvent, HealthDto, JobDto,
    JobPageDto, JobState, ToolDto,
};
