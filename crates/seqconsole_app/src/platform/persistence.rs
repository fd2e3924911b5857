use std::fs;
use std::path::Path;

use console_logging::{console_error, console_info, console_warn};
use seqconsole_client::AtomicFileWriter;
use seqconsole_core::{JobFilter, JobStatus, PreferencesSnapshot, Theme};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".seqconsole_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedFilter {
    artifact: Option<String>,
    tool: Option<String>,
    status: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedPreferences {
    filter: PersistedFilter,
    theme: String,
}

pub(crate) fn load_preferences(dir: &Path) -> Option<PreferencesSnapshot> {
    let path = dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return None;
        }
        Err(err) => {
            console_warn!("Failed to read persisted state from {:?}: {}", path, err);
            return None;
        }
    };

    let persisted: PersistedPreferences = match ron::from_str(&content) {
        Ok(persisted) => persisted,
        Err(err) => {
            console_warn!("Failed to parse persisted state from {:?}: {}", path, err);
            return None;
        }
    };

    console_info!("Loaded persisted preferences from {:?}", path);
    Some(PreferencesSnapshot {
        filter: JobFilter {
            artifact: persisted.filter.artifact,
            tool: persisted.filter.tool,
            status: persisted.filter.status.as_deref().and_then(status_from_str),
            date_from: persisted.filter.date_from,
            date_to: persisted.filter.date_to,
        },
        theme: match persisted.theme.as_str() {
            "light" => Theme::Light,
            _ => Theme::Dark,
        },
    })
}

pub(crate) fn save_preferences(dir: &Path, prefs: &PreferencesSnapshot) {
    let persisted = PersistedPreferences {
        filter: PersistedFilter {
            artifact: prefs.filter.artifact.clone(),
            tool: prefs.filter.tool.clone(),
            status: prefs.filter.status.map(status_to_str).map(str::to_owned),
            date_from: prefs.filter.date_from.clone(),
            date_to: prefs.filter.date_to.clone(),
        },
        theme: match prefs.theme {
            Theme::Dark => "dark".to_string(),
            Theme::Light => "light".to_string(),
        },
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&persisted, pretty) {
        Ok(text) => text,
        Err(err) => {
            console_error!("Failed to serialize preferences: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    if let Err(err) = writer.write(STATE_FILENAME, content.as_bytes()) {
        console_error!("Failed to write preferences to {:?}: {}", dir, err);
    }
}

fn status_from_str(label: &str) -> Option<JobStatus> {
    match label {
        "PENDING" => Some(JobStatus::Pending),
        "RUNNING" => Some(JobStatus::Running),
        "SUCCESS" => Some(JobStatus::Success),
        "ERROR" => Some(JobStatus::Error),
        _ => None,
    }
}

fn status_to_str(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "PENDING",
        JobStatus::Running => "RUNNING",
        JobStatus::Success => "SUCCESS",
        JobStatus::Error => "ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_state_file_yields_no_preferences() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_preferences(dir.path()).is_none());
    }

    #[test]
    fn preferences_survive_a_save_load_cycle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prefs = PreferencesSnapshot {
            filter: JobFilter {
                tool: Some("mafft".to_string()),
                status: Some(JobStatus::Error),
                date_from: Some("2026-08-01".to_string()),
                ..JobFilter::default()
            },
            theme: Theme::Light,
        };

        save_preferences(dir.path(), &prefs);
        let restored = load_preferences(dir.path()).expect("preferences");
        assert_eq!(restored, prefs);
    }

    #[test]
    fn unknown_status_labels_are_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let content = r#"(
    filter: (
        artifact: None,
        tool: None,
        status: Some("CANCELLED"),
        date_from: None,
        date_to: None,
    ),
    theme: "dark",
)"#;
        std::fs::write(dir.path().join(STATE_FILENAME), content).expect("fixture");

        let restored = load_preferences(dir.path()).expect("preferences");
        assert_eq!(restored.filter.status, None);
        assert_eq!(restored.theme, Theme::Dark);
    }
}
