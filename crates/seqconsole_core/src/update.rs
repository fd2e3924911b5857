use crate::state::HEALTH_PROBE_TICKS;
use crate::{AppState, Effect, Msg, StreamStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            state.set_feed_loading(true);
            state.mark_dirty();
            vec![
                Effect::ResetJobsFeed {
                    filter: state.filter().clone(),
                },
                Effect::OpenJobStream,
                Effect::LoadArtifacts,
                Effect::LoadTools,
                Effect::ProbeHealth,
            ]
        }
        Msg::RestorePreferences(prefs) => {
            state.restore_preferences(prefs);
            state.mark_dirty();
            Vec::new()
        }

        Msg::JobsPageLoaded {
            jobs,
            exhausted,
            total,
        } => {
            state.set_feed_result(jobs, exhausted, total);
            state.clear_error();
            state.mark_dirty();
            Vec::new()
        }
        Msg::JobsPageFailed { message } => {
            state.set_feed_loading(false);
            state.set_error(message);
            state.mark_dirty();
            Vec::new()
        }
        Msg::EndOfListReached => {
            if state.feed_wants_more() {
                state.set_feed_loading(true);
                state.mark_dirty();
                vec![Effect::LoadNextJobsPage]
            } else {
                Vec::new()
            }
        }
        Msg::FilterChanged(filter) => {
            if filter == *state.filter() {
                return (state, Vec::new());
            }
            state.reset_feed(filter);
            state.mark_dirty();
            vec![Effect::ResetJobsFeed {
                filter: state.filter().clone(),
            }]
        }
        Msg::FilterCleared => {
            if state.filter().is_empty() {
                return (state, Vec::new());
            }
            state.reset_feed(Default::default());
            state.mark_dirty();
            vec![Effect::ResetJobsFeed {
                filter: state.filter().clone(),
            }]
        }

        Msg::JobUpdated(job) => {
            // Stale updates must not move a job backwards; accept_live_update
            // enforces the updated_at ordering.
            if state.accept_live_update(job) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::StreamOpened => {
            state.set_stream(StreamStatus::Connected);
            state.mark_dirty();
            Vec::new()
        }
        Msg::StreamRetrying { attempt } => {
            state.set_stream(StreamStatus::Retrying { attempt });
            state.mark_dirty();
            Vec::new()
        }
        Msg::StreamClosed => {
            state.set_stream(StreamStatus::Closed);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ReconnectClicked => {
            if state.stream() == StreamStatus::Connected {
                Vec::new()
            } else {
                state.set_stream(StreamStatus::Connecting);
                state.mark_dirty();
                vec![Effect::OpenJobStream]
            }
        }

        Msg::ArtifactsLoaded(artifacts) => {
            state.set_artifacts(artifacts);
            state.mark_dirty();
            Vec::new()
        }
        Msg::UploadSubmitted { path } => {
            if state.upload_in_flight() || path.trim().is_empty() {
                return (state, Vec::new());
            }
            let path = path.trim().to_owned();
            state.set_upload_in_flight(Some(path.clone()));
            state.mark_dirty();
            vec![Effect::UploadArtifact { path }]
        }
        Msg::UploadFinished { result } => {
            state.set_upload_in_flight(None);
            match result {
                Ok(artifact) => {
                    state.set_notice(format!("uploaded {}", artifact.name));
                    state.insert_artifact(artifact);
                }
                Err(message) => state.set_error(message),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::DeleteArtifactConfirmed { key } => {
            vec![Effect::DeleteArtifact { key }]
        }
        Msg::ArtifactDeleted { key, result } => {
            match result {
                Ok(()) => state.remove_artifact(&key),
                Err(message) => state.set_error(message),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::DownloadRequested { key } => {
            vec![Effect::DownloadArtifact { key }]
        }
        Msg::DownloadFinished { result } => {
            match result {
                Ok(path) => state.set_notice(format!("saved {path}")),
                Err(message) => state.set_error(message),
            }
            state.mark_dirty();
            Vec::new()
        }

        Msg::ToolsLoaded(tools) => {
            state.set_tools(tools);
            state.mark_dirty();
            Vec::new()
        }
        Msg::AnalysisSubmitted { artifact_key, tool } => {
            if state.submit_in_flight() {
                return (state, Vec::new());
            }
            state.set_submit_in_flight(true);
            state.mark_dirty();
            vec![Effect::SubmitAnalysis { artifact_key, tool }]
        }
        Msg::AnalysisAccepted { job } => {
            state.set_submit_in_flight(false);
            state.set_notice(format!("job {} submitted", job.key));
            // The new job enters through the live map so it shows up without
            // waiting for a feed refetch.
            state.accept_live_update(job);
            state.mark_dirty();
            Vec::new()
        }
        Msg::AnalysisRejected { message } => {
            state.set_submit_in_flight(false);
            state.set_error(message);
            state.mark_dirty();
            Vec::new()
        }
        Msg::CancelJobConfirmed { key } => {
            vec![Effect::CancelJob { key }]
        }

        Msg::HealthChecked { healthy } => {
            if state.set_healthy(healthy) {
                state.mark_dirty();
            }
            Vec::new()
        }

        Msg::JobSelected { key } => {
            state.set_selected(key);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ThemeToggled => {
            state.toggle_theme();
            state.mark_dirty();
            Vec::new()
        }
        Msg::Tick => {
            if state.next_tick() % HEALTH_PROBE_TICKS == 0 {
                vec![Effect::ProbeHealth]
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
