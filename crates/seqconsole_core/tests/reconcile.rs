use std::sync::Once;

use seqconsole_core::{
    update, AppState, JobFilter, JobRecord, JobStatus, Msg,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn job(key: &str, created_at: &str, updated_at: Option<&str>, status: JobStatus) -> JobRecord {
    JobRecord {
        key: key.to_string(),
        artifact_key: "art-1".to_string(),
        artifact_name: "reads.fasta".to_string(),
        tool: "mafft".to_string(),
        status,
        created_at: created_at.to_string(),
        updated_at: updated_at.map(ToOwned::to_owned),
        message: None,
        output_key: None,
    }
}

fn load_page(state: AppState, jobs: Vec<JobRecord>) -> AppState {
    let (state, _) = update(
        state,
        Msg::JobsPageLoaded {
            jobs,
            exhausted: false,
            total: None,
        },
    );
    state
}

#[test]
fn live_update_overlays_base_row() {
    init_logging();
    let base = job("j1", "2026-08-01T10:00:00Z", None, JobStatus::Pending);
    let state = load_page(AppState::new(), vec![base]);

    let (mut state, _) = update(
        state,
        Msg::JobUpdated(job(
            "j1",
            "2026-08-01T10:00:00Z",
            Some("2026-08-01T10:05:00Z"),
            JobStatus::Running,
        )),
    );

    let view = state.view();
    assert_eq!(view.jobs.len(), 1);
    assert_eq!(view.jobs[0].status, JobStatus::Running);
    assert!(view.jobs[0].live);
    assert!(state.consume_dirty());
}

#[test]
fn stale_update_is_discarded() {
    init_logging();
    let state = load_page(
        AppState::new(),
        vec![job("j1", "2026-08-01T10:00:00Z", None, JobStatus::Pending)],
    );
    let (mut state, _) = update(
        state,
        Msg::JobUpdated(job(
            "j1",
            "2026-08-01T10:00:00Z",
            Some("2026-08-01T10:05:00Z"),
            JobStatus::Success,
        )),
    );
    assert!(state.consume_dirty());

    // Strictly older timestamp: must not regress the status.
    let (mut state, _) = update(
        state,
        Msg::JobUpdated(job(
            "j1",
            "2026-08-01T10:00:00Z",
            Some("2026-08-01T10:01:00Z"),
            JobStatus::Running,
        )),
    );
    assert_eq!(state.view().jobs[0].status, JobStatus::Success);
    assert!(!state.consume_dirty());
}

#[test]
fn update_without_timestamp_always_wins() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::JobUpdated(job(
            "j1",
            "2026-08-01T10:00:00Z",
            Some("2026-08-01T10:05:00Z"),
            JobStatus::Running,
        )),
    );
    let (state, _) = update(
        state,
        Msg::JobUpdated(job("j1", "2026-08-01T10:00:00Z", None, JobStatus::Error)),
    );
    assert_eq!(state.view().jobs[0].status, JobStatus::Error);
}

#[test]
fn equal_timestamps_accept_the_later_update() {
    init_logging();
    let ts = Some("2026-08-01T10:05:00Z");
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::JobUpdated(job("j1", "2026-08-01T10:00:00Z", ts, JobStatus::Running)),
    );
    let (state, _) = update(
        state,
        Msg::JobUpdated(job("j1", "2026-08-01T10:00:00Z", ts, JobStatus::Success)),
    );
    assert_eq!(state.view().jobs[0].status, JobStatus::Success);
}

#[test]
fn live_only_jobs_appear_when_they_match_the_filter() {
    init_logging();
    let state = load_page(
        AppState::new(),
        vec![job("j1", "2026-08-01T10:00:00Z", None, JobStatus::Pending)],
    );

    let filter = JobFilter {
        tool: Some("mafft".to_string()),
        ..JobFilter::default()
    };
    let (state, _) = update(state, Msg::FilterChanged(filter));
    // Feed reset: base is gone until the refetch lands.
    assert!(state.view().jobs.is_empty());

    let (state, _) = update(
        state,
        Msg::JobUpdated(job("j2", "2026-08-02T09:00:00Z", None, JobStatus::Pending)),
    );
    let mut other_tool = job("j3", "2026-08-02T09:30:00Z", None, JobStatus::Pending);
    other_tool.tool = "minimap2".to_string();
    let (state, _) = update(state, Msg::JobUpdated(other_tool));

    let keys: Vec<_> = state.view().jobs.iter().map(|j| j.key.clone()).collect();
    assert_eq!(keys, vec!["j2".to_string()]);
}

#[test]
fn displayed_list_is_sorted_newest_first_and_deduplicated() {
    init_logging();
    let state = load_page(
        AppState::new(),
        vec![
            job("j3", "2026-08-03T08:00:00Z", None, JobStatus::Success),
            job("j1", "2026-08-01T08:00:00Z", None, JobStatus::Success),
        ],
    );
    // Overlapping page re-delivers j1 and adds j2.
    let state = load_page(
        state,
        vec![
            job("j1", "2026-08-01T08:00:00Z", None, JobStatus::Success),
            job("j2", "2026-08-02T08:00:00Z", None, JobStatus::Success),
        ],
    );
    // Live-only job, newest of all.
    let (state, _) = update(
        state,
        Msg::JobUpdated(job("j4", "2026-08-04T08:00:00Z", None, JobStatus::Pending)),
    );

    let keys: Vec<_> = state.view().jobs.iter().map(|j| j.key.clone()).collect();
    assert_eq!(
        keys,
        vec![
            "j4".to_string(),
            "j3".to_string(),
            "j2".to_string(),
            "j1".to_string()
        ]
    );
}

#[test]
fn accepted_analysis_shows_up_through_the_live_map() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::AnalysisAccepted {
            job: job("j9", "2026-08-05T12:00:00Z", None, JobStatus::Pending),
        },
    );
    let view = state.view();
    assert_eq!(view.jobs.len(), 1);
    assert!(view.jobs[0].live);
    assert!(!view.submit_in_flight);
}
