use seqconsole_core::{date_component, JobFilter, JobRecord, JobStatus};

fn job(artifact_key: &str, tool: &str, status: JobStatus, created_at: &str) -> JobRecord {
    JobRecord {
        key: "j1".to_string(),
        artifact_key: artifact_key.to_string(),
        artifact_name: format!("{artifact_key}.fasta"),
        tool: tool.to_string(),
        status,
        created_at: created_at.to_string(),
        updated_at: None,
        message: None,
        output_key: None,
    }
}

#[test]
fn empty_filter_matches_everything() {
    let filter = JobFilter::default();
    assert!(filter.is_empty());
    assert!(filter.matches(&job("a", "mafft", JobStatus::Pending, "2026-08-01T00:00:00Z")));
}

#[test]
fn filter_is_a_conjunction() {
    let filter = JobFilter {
        artifact: Some("a".to_string()),
        tool: Some("mafft".to_string()),
        status: Some(JobStatus::Running),
        date_from: None,
        date_to: None,
    };

    assert!(filter.matches(&job("a", "mafft", JobStatus::Running, "2026-08-01T00:00:00Z")));
    // Any single mismatch fails the whole predicate.
    assert!(!filter.matches(&job("b", "mafft", JobStatus::Running, "2026-08-01T00:00:00Z")));
    assert!(!filter.matches(&job("a", "blast", JobStatus::Running, "2026-08-01T00:00:00Z")));
    assert!(!filter.matches(&job("a", "mafft", JobStatus::Success, "2026-08-01T00:00:00Z")));
}

#[test]
fn date_range_is_inclusive_and_uses_the_date_component() {
    let filter = JobFilter {
        date_from: Some("2026-08-01".to_string()),
        date_to: Some("2026-08-03".to_string()),
        ..JobFilter::default()
    };

    // Boundary days are inside the range regardless of time of day.
    assert!(filter.matches(&job("a", "mafft", JobStatus::Pending, "2026-08-01T23:59:59Z")));
    assert!(filter.matches(&job("a", "mafft", JobStatus::Pending, "2026-08-03T00:00:00Z")));
    assert!(!filter.matches(&job("a", "mafft", JobStatus::Pending, "2026-07-31T23:59:59Z")));
    assert!(!filter.matches(&job("a", "mafft", JobStatus::Pending, "2026-08-04T00:00:00Z")));
}

#[test]
fn open_ended_date_ranges() {
    let from_only = JobFilter {
        date_from: Some("2026-08-02".to_string()),
        ..JobFilter::default()
    };
    assert!(from_only.matches(&job("a", "mafft", JobStatus::Pending, "2026-09-01T00:00:00Z")));
    assert!(!from_only.matches(&job("a", "mafft", JobStatus::Pending, "2026-08-01T00:00:00Z")));

    let to_only = JobFilter {
        date_to: Some("2026-08-02".to_string()),
        ..JobFilter::default()
    };
    assert!(to_only.matches(&job("a", "mafft", JobStatus::Pending, "2026-08-02T12:00:00Z")));
    assert!(!to_only.matches(&job("a", "mafft", JobStatus::Pending, "2026-08-03T00:00:00Z")));
}

#[test]
fn date_component_truncates_rfc3339_timestamps() {
    assert_eq!(date_component("2026-08-01T23:59:59Z"), "2026-08-01");
    // Short or malformed strings are returned as-is.
    assert_eq!(date_component("2026-08"), "2026-08");
}
