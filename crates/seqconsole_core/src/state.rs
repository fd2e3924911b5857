use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, JobRowView};
use crate::{ArtifactRecord, JobFilter, JobKey, JobRecord};

/// Ticks between periodic backend health probes (app ticks every ~250ms).
pub(crate) const HEALTH_PROBE_TICKS: u64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamStatus {
    #[default]
    Connecting,
    Connected,
    /// Dropped; reconnect attempt `attempt` is scheduled.
    Retrying {
        attempt: u32,
    },
    /// Retry budget exhausted; only a manual reconnect reopens the stream.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// UI preferences that survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreferencesSnapshot {
    pub filter: JobFilter,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    /// Paginated base list, in server order (newest-first by creation time).
    base: Vec<JobRecord>,
    /// Live updates from the event stream, keyed by job. Wins over `base`.
    live: BTreeMap<JobKey, JobRecord>,
    filter: JobFilter,
    feed_loading: bool,
    feed_exhausted: bool,
    total_jobs: Option<u64>,
    stream: StreamStatus,
    artifacts: Vec<ArtifactRecord>,
    tools: Vec<String>,
    upload_in_flight: Option<String>,
    submit_in_flight: bool,
    healthy: Option<bool>,
    selected: Option<JobKey>,
    theme: Theme,
    last_error: Option<String>,
    notice: Option<String>,
    tick_count: u64,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let jobs = self
            .reconciled_jobs()
            .into_iter()
            .map(|job| {
                let live = self.live.contains_key(&job.key);
                JobRowView {
                    key: job.key,
                    artifact_name: job.artifact_name,
                    tool: job.tool,
                    status: job.status,
                    created_at: job.created_at,
                    updated_at: job.updated_at,
                    message: job.message,
                    output_key: job.output_key,
                    live,
                }
            })
            .collect();

        AppViewModel {
            jobs,
            total_jobs: self.total_jobs,
            feed_loading: self.feed_loading,
            feed_exhausted: self.feed_exhausted,
            filter: self.filter.clone(),
            stream: self.stream,
            artifacts: self.artifacts.clone(),
            tools: self.tools.clone(),
            upload_in_flight: self.upload_in_flight.is_some(),
            submit_in_flight: self.submit_in_flight,
            healthy: self.healthy,
            selected: self.selected.clone(),
            theme: self.theme,
            last_error: self.last_error.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// The displayed job list: base pages overlaid with live updates, plus
    /// live-only jobs that satisfy the active filter, deduplicated by key
    /// (live wins) and sorted newest-first by creation timestamp.
    pub fn reconciled_jobs(&self) -> Vec<JobRecord> {
        let mut rows = Vec::with_capacity(self.base.len() + self.live.len());
        for job in &self.base {
            match self.live.get(&job.key) {
                Some(live) => rows.push(live.clone()),
                None => rows.push(job.clone()),
            }
        }
        for (key, live) in &self.live {
            if self.base.iter().any(|job| job.key == *key) {
                continue;
            }
            if self.filter.matches(live) {
                rows.push(live.clone());
            }
        }
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.key.cmp(&a.key))
        });
        rows
    }

    /// Accept a live update unless it is stale. An update is stale only when
    /// both it and the stored entry carry a timestamp and the update's is
    /// strictly older.
    pub(crate) fn accept_live_update(&mut self, update: JobRecord) -> bool {
        if let Some(existing) = self.live.get(&update.key) {
            if let (Some(new), Some(old)) = (&update.updated_at, &existing.updated_at) {
                if new < old {
                    return false;
                }
            }
        }
        self.live.insert(update.key.clone(), update);
        true
    }

    /// Append one page to the base list, skipping keys already present.
    /// Pages can overlap when new jobs shift server-side page boundaries.
    pub(crate) fn append_jobs_page(&mut self, jobs: Vec<JobRecord>) {
        for job in jobs {
            if self.base.iter().any(|existing| existing.key == job.key) {
                continue;
            }
            self.base.push(job);
        }
    }

    pub(crate) fn reset_feed(&mut self, filter: JobFilter) {
        self.base.clear();
        self.filter = filter;
        self.feed_loading = true;
        self.feed_exhausted = false;
        self.total_jobs = None;
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    pub fn preferences_snapshot(&self) -> PreferencesSnapshot {
        PreferencesSnapshot {
            filter: self.filter.clone(),
            theme: self.theme,
        }
    }

    pub(crate) fn restore_preferences(&mut self, prefs: PreferencesSnapshot) {
        self.filter = prefs.filter;
        self.theme = prefs.theme;
    }

    pub(crate) fn set_feed_result(
        &mut self,
        jobs: Vec<JobRecord>,
        exhausted: bool,
        total: Option<u64>,
    ) {
        self.feed_loading = false;
        self.feed_exhausted = exhausted;
        self.total_jobs = total;
        self.append_jobs_page(jobs);
    }

    pub(crate) fn feed_wants_more(&self) -> bool {
        !self.feed_loading && !self.feed_exhausted
    }

    pub(crate) fn set_feed_loading(&mut self, loading: bool) {
        self.feed_loading = loading;
    }

    pub(crate) fn set_stream(&mut self, stream: StreamStatus) {
        self.stream = stream;
    }

    pub fn stream(&self) -> StreamStatus {
        self.stream
    }

    pub(crate) fn set_artifacts(&mut self, artifacts: Vec<ArtifactRecord>) {
        self.artifacts = artifacts;
    }

    pub(crate) fn insert_artifact(&mut self, artifact: ArtifactRecord) {
        self.artifacts.retain(|a| a.key != artifact.key);
        self.artifacts.insert(0, artifact);
    }

    pub(crate) fn remove_artifact(&mut self, key: &str) {
        self.artifacts.retain(|a| a.key != key);
    }

    pub(crate) fn set_tools(&mut self, tools: Vec<String>) {
        self.tools = tools;
    }

    pub(crate) fn upload_in_flight(&self) -> bool {
        self.upload_in_flight.is_some()
    }

    pub(crate) fn set_upload_in_flight(&mut self, path: Option<String>) {
        self.upload_in_flight = path;
    }

    pub(crate) fn submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    pub(crate) fn set_submit_in_flight(&mut self, value: bool) {
        self.submit_in_flight = value;
    }

    pub(crate) fn set_healthy(&mut self, healthy: bool) -> bool {
        let changed = self.healthy != Some(healthy);
        self.healthy = Some(healthy);
        changed
    }

    pub(crate) fn set_selected(&mut self, key: JobKey) {
        self.selected = Some(key);
    }

    pub(crate) fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub(crate) fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub(crate) fn next_tick(&mut self) -> u64 {
        self.tick_count += 1;
        self.tick_count
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
