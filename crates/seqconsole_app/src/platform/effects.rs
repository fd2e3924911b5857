use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use console_logging::{console_info, console_warn};
use seqconsole_client::{
    AnalysisService, ApiClient, ApiSettings, ArtifactService, ChannelEventSink, ClientEvent,
    HealthService, JobPageFetcher, JobQuery, JobService, MonitorHandle, Pager,
};
use seqconsole_core::{ArtifactKind, ArtifactRecord, Effect, JobFilter, JobRecord, JobStatus, Msg};

/// Runs core effects against the backend client and feeds results (and the
/// monitor's stream events) back into the message loop.
pub struct EffectRunner {
    effect_tx: mpsc::Sender<Effect>,
    monitor: MonitorHandle,
}

impl EffectRunner {
    pub fn new(settings: ApiSettings, msg_tx: mpsc::Sender<Msg>) -> anyhow::Result<Self> {
        let client = ApiClient::new(settings.clone())?;
        let artifacts = ArtifactService::new(client.clone());
        let analyses = AnalysisService::new(client.clone());
        let jobs = JobService::new(client.clone());
        let health = HealthService::new(client);

        let (event_tx, event_rx) = mpsc::channel::<ClientEvent>();
        let monitor = MonitorHandle::new(settings, Box::new(ChannelEventSink::new(event_tx)));
        spawn_event_loop(event_rx, msg_tx.clone());

        let download_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("downloads");

        let (effect_tx, effect_rx) = mpsc::channel::<Effect>();
        let pager = Pager::new(JobPageFetcher::new(jobs.clone(), JobQuery::default()));
        thread::spawn(move || {
            run_effects(
                effect_rx,
                msg_tx,
                Services {
                    artifacts,
                    analyses,
                    jobs,
                    health,
                },
                pager,
                download_dir,
            );
        });

        Ok(Self { effect_tx, monitor })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                // Stream control goes straight to the monitor thread.
                Effect::OpenJobStream => self.monitor.reconnect(),
                other => {
                    let _ = self.effect_tx.send(other);
                }
            }
        }
    }
}

struct Services {
    artifacts: ArtifactService,
    analyses: AnalysisService,
    jobs: JobService,
    health: HealthService,
}

fn run_effects(
    effect_rx: mpsc::Receiver<Effect>,
    msg_tx: mpsc::Sender<Msg>,
    services: Services,
    mut pager: Pager<JobPageFetcher>,
    download_dir: PathBuf,
) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    while let Ok(effect) = effect_rx.recv() {
        match effect {
            // Pager calls stay on this thread: page order matters.
            Effect::ResetJobsFeed { filter } => {
                pager.fetcher_mut().set_query(query_from_filter(&filter));
                pager.reset();
                load_page(&runtime, &mut pager, &msg_tx);
            }
            Effect::LoadNextJobsPage => load_page(&runtime, &mut pager, &msg_tx),

            Effect::LoadArtifacts => {
                let service = services.artifacts.clone();
                let msg_tx = msg_tx.clone();
                runtime.spawn(async move {
                    match service.list().await {
                        Ok(artifacts) => {
                            let records = artifacts.into_iter().map(artifact_from_dto).collect();
                            let _ = msg_tx.send(Msg::ArtifactsLoaded(records));
                        }
                        Err(err) => console_warn!("Artifact listing failed: {err}"),
                    }
                });
            }
            Effect::LoadTools => {
                let service = services.analyses.clone();
                let msg_tx = msg_tx.clone();
                runtime.spawn(async move {
                    match service.tools().await {
                        Ok(tools) => {
                            let _ = msg_tx.send(Msg::ToolsLoaded(tool_names(tools)));
                        }
                        Err(err) => console_warn!("Tool catalogue fetch failed: {err}"),
                    }
                });
            }
            Effect::UploadArtifact { path } => {
                console_info!("Uploading {path}");
                let service = services.artifacts.clone();
                let msg_tx = msg_tx.clone();
                runtime.spawn(async move {
                    let result = service
                        .upload(Path::new(&path))
                        .await
                        .map(artifact_from_dto)
                        .map_err(|err| err.to_string());
                    let _ = msg_tx.send(Msg::UploadFinished { result });
                });
            }
            Effect::DeleteArtifact { key } => {
                let service = services.artifacts.clone();
                let msg_tx = msg_tx.clone();
                runtime.spawn(async move {
                    let result = service.delete(&key).await.map_err(|err| err.to_string());
                    let _ = msg_tx.send(Msg::ArtifactDeleted { key, result });
                });
            }
            Effect::DownloadArtifact { key } => {
                let service = services.artifacts.clone();
                let msg_tx = msg_tx.clone();
                let dir = download_dir.clone();
                runtime.spawn(async move {
                    let result = service
                        .download(&key, &dir)
                        .await
                        .map(|path| path.display().to_string())
                        .map_err(|err| err.to_string());
                    let _ = msg_tx.send(Msg::DownloadFinished { result });
                });
            }
            Effect::SubmitAnalysis { artifact_key, tool } => {
                console_info!("Submitting {tool} analysis of {artifact_key}");
                let service = services.analyses.clone();
                let msg_tx = msg_tx.clone();
                runtime.spawn(async move {
                    let msg = match service.submit(&artifact_key, &tool).await {
                        Ok(job) => Msg::AnalysisAccepted {
                            job: job_from_dto(job),
                        },
                        Err(err) => Msg::AnalysisRejected {
                            message: err.to_string(),
                        },
                    };
                    let _ = msg_tx.send(msg);
                });
            }
            Effect::CancelJob { key } => {
                let service = services.jobs.clone();
                runtime.spawn(async move {
                    // The status change itself arrives over the event stream.
                    if let Err(err) = service.cancel(&key).await {
                        console_warn!("Cancel of job {key} failed: {err}");
                    }
                });
            }
            Effect::ProbeHealth => {
                let service = services.health.clone();
                let msg_tx = msg_tx.clone();
                runtime.spawn(async move {
                    let healthy = service.is_healthy().await;
                    let _ = msg_tx.send(Msg::HealthChecked { healthy });
                });
            }
            Effect::OpenJobStream => {
                // Handled in EffectRunner::run; unreachable here.
            }
        }
    }
}

fn load_page(
    runtime: &tokio::runtime::Runtime,
    pager: &mut Pager<JobPageFetcher>,
    msg_tx: &mpsc::Sender<Msg>,
) {
    let msg = match runtime.block_on(pager.load_next()) {
        Ok(jobs) => Msg::JobsPageLoaded {
            jobs: jobs.into_iter().map(job_from_dto).collect(),
            exhausted: pager.is_exhausted(),
            total: pager.total(),
        },
        Err(err) => {
            console_warn!("Jobs page fetch failed: {err}");
            Msg::JobsPageFailed {
                message: err.to_string(),
            }
        }
    };
    let _ = msg_tx.send(msg);
}

fn spawn_event_loop(event_rx: mpsc::Receiver<ClientEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                ClientEvent::StreamOpened => Msg::StreamOpened,
                ClientEvent::JobUpdate(job) => Msg::JobUpdated(job_from_dto(job)),
                ClientEvent::StreamRetrying { attempt, .. } => Msg::StreamRetrying { attempt },
                ClientEvent::StreamClosed => Msg::StreamClosed,
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn job_from_dto(dto: seqconsole_client::JobDto) -> JobRecord {
    JobRecord {
        key: dto.id,
        artifact_key: dto.file_id,
        artifact_name: dto.file_name,
        tool: dto.tool,
        status: status_from_dto(dto.status),
        created_at: dto.created_at,
        updated_at: dto.updated_at,
        message: dto.message,
        output_key: dto.output_id,
    }
}

fn status_from_dto(status: seqconsole_client::JobState) -> JobStatus {
    match status {
        seqconsole_client::JobState::Pending => JobStatus::Pending,
        seqconsole_client::JobState::Running => JobStatus::Running,
        seqconsole_client::JobState::Success => JobStatus::Success,
        seqconsole_client::JobState::Error => JobStatus::Error,
    }
}

fn status_to_dto(status: JobStatus) -> seqconsole_client::JobState {
    match status {
        JobStatus::Pending => seqconsole_client::JobState::Pending,
        JobStatus::Running => seqconsole_client::JobState::Running,
        JobStatus::Success => seqconsole_client::JobState::Success,
        JobStatus::Error => seqconsole_client::JobState::Error,
    }
}

fn artifact_from_dto(dto: seqconsole_client::ArtifactDto) -> ArtifactRecord {
    ArtifactRecord {
        key: dto.id,
        name: dto.name,
        size: dto.size,
        kind: match dto.kind {
            seqconsole_client::ArtifactKindDto::Input => ArtifactKind::Input,
            seqconsole_client::ArtifactKindDto::Output => ArtifactKind::Output,
        },
        uploaded_at: dto.uploaded_at,
    }
}

fn query_from_filter(filter: &JobFilter) -> JobQuery {
    JobQuery {
        file_id: filter.artifact.clone(),
        tool: filter.tool.clone(),
        status: filter.status.map(status_to_dto),
        date_from: filter.date_from.clone(),
        date_to: filter.date_to.clone(),
    }
}

fn tool_names(tools: Vec<seqconsole_client::ToolDto>) -> Vec<String> {
    tools.into_iter().map(|tool| tool.name).collect()
}
