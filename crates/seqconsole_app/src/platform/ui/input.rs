use crossterm::event::{KeyCode, KeyEvent};
use seqconsole_core::{AppViewModel, JobFilter, JobStatus, Msg};

use super::constants::LOAD_MORE_MARGIN;

/// What the key handler wants the event loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    None,
    Redraw,
    Msg(Msg),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Jobs,
    Artifacts,
}

impl Pane {
    fn toggled(self) -> Self {
        match self {
            Pane::Jobs => Pane::Artifacts,
            Pane::Artifacts => Pane::Jobs,
        }
    }
}

/// Modal dialogs. These are view-local: the core only ever sees the
/// confirmed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Upload {
        input: String,
    },
    Submit {
        artifact_key: String,
        artifact_name: String,
        tool_ix: usize,
    },
    Filter {
        form: FilterForm,
        field: usize,
    },
    ConfirmCancel {
        key: String,
    },
    ConfirmDelete {
        key: String,
        name: String,
    },
}

/// Editable text mirror of [`JobFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterForm {
    pub artifact: String,
    pub tool: String,
    pub status: String,
    pub date_from: String,
    pub date_to: String,
}

pub const FILTER_FIELDS: usize = 5;

impl FilterForm {
    pub fn from_filter(filter: &JobFilter) -> Self {
        Self {
            artifact: filter.artifact.clone().unwrap_or_default(),
            tool: filter.tool.clone().unwrap_or_default(),
            status: filter
                .status
                .map(|status| status.to_string())
                .unwrap_or_default(),
            date_from: filter.date_from.clone().unwrap_or_default(),
            date_to: filter.date_to.clone().unwrap_or_default(),
        }
    }

    pub fn to_filter(&self) -> JobFilter {
        JobFilter {
            artifact: non_empty(&self.artifact),
            tool: non_empty(&self.tool),
            status: parse_status(self.status.trim()),
            date_from: non_empty(&self.date_from),
            date_to: non_empty(&self.date_to),
        }
    }

    pub fn field(&self, ix: usize) -> &str {
        match ix {
            0 => &self.artifact,
            1 => &self.tool,
            2 => &self.status,
            3 => &self.date_from,
            _ => &self.date_to,
        }
    }

    fn field_mut(&mut self, ix: usize) -> &mut String {
        match ix {
            0 => &mut self.artifact,
            1 => &mut self.tool,
            2 => &mut self.status,
            3 => &mut self.date_from,
            _ => &mut self.date_to,
        }
    }

    fn clear(&mut self) {
        *self = FilterForm::default();
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn parse_status(label: &str) -> Option<JobStatus> {
    match label.to_ascii_lowercase().as_str() {
        "pending" => Some(JobStatus::Pending),
        "running" => Some(JobStatus::Running),
        "success" => Some(JobStatus::Success),
        "error" => Some(JobStatus::Error),
        _ => None,
    }
}

/// View-local interaction state: pane focus, list cursors, open dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub pane: Pane,
    pub jobs_cursor: usize,
    pub artifacts_cursor: usize,
    pub overlay: Overlay,
}

impl UiState {
    /// Keep cursors valid after the lists changed underneath them.
    pub fn clamp(&mut self, view: &AppViewModel) {
        self.jobs_cursor = self.jobs_cursor.min(view.jobs.len().saturating_sub(1));
        self.artifacts_cursor = self
            .artifacts_cursor
            .min(view.artifacts.len().saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent, view: &AppViewModel) -> Outcome {
        if !matches!(self.overlay, Overlay::None) {
            return self.handle_overlay_key(key, view);
        }

        match key.code {
            KeyCode::Char('q') => Outcome::Quit,
            KeyCode::Tab => {
                self.pane = self.pane.toggled();
                Outcome::Redraw
            }
            KeyCode::Up => self.move_cursor_up(),
            KeyCode::Down => self.move_cursor_down(view),
            KeyCode::Enter => match self.pane {
                Pane::Jobs => match view.jobs.get(self.jobs_cursor) {
                    Some(job) => Outcome::Msg(Msg::JobSelected {
                        key: job.key.clone(),
                    }),
                    None => Outcome::None,
                },
                Pane::Artifacts => Outcome::None,
            },
            KeyCode::Char('t') => Outcome::Msg(Msg::ThemeToggled),
            KeyCode::Char('r') => Outcome::Msg(Msg::ReconnectClicked),
            KeyCode::Char('u') => {
                self.overlay = Overlay::Upload {
                    input: String::new(),
                };
                Outcome::Redraw
            }
            KeyCode::Char('s') => match view.artifacts.get(self.artifacts_cursor) {
                Some(artifact) if !view.tools.is_empty() => {
                    self.overlay = Overlay::Submit {
                        artifact_key: artifact.key.clone(),
                        artifact_name: artifact.name.clone(),
                        tool_ix: 0,
                    };
                    Outcome::Redraw
                }
                _ => Outcome::None,
            },
            KeyCode::Char('f') => {
                self.overlay = Overlay::Filter {
                    form: FilterForm::from_filter(&view.filter),
                    field: 0,
                };
                Outcome::Redraw
            }
            KeyCode::Char('c') => match view.jobs.get(self.jobs_cursor) {
                Some(job)
                    if self.pane == Pane::Jobs
                        && matches!(job.status, JobStatus::Pending | JobStatus::Running) =>
                {
                    self.overlay = Overlay::ConfirmCancel {
                        key: job.key.clone(),
                    };
                    Outcome::Redraw
                }
                _ => Outcome::None,
            },
            KeyCode::Char('d') => match view.artifacts.get(self.artifacts_cursor) {
                Some(artifact) if self.pane == Pane::Artifacts => {
                    self.overlay = Overlay::ConfirmDelete {
                        key: artifact.key.clone(),
                        name: artifact.name.clone(),
                    };
                    Outcome::Redraw
                }
                _ => Outcome::None,
            },
            KeyCode::Char('o') => match view.jobs.get(self.jobs_cursor) {
                Some(job) if self.pane == Pane::Jobs => match &job.output_key {
                    Some(output) => Outcome::Msg(Msg::DownloadRequested {
                        key: output.clone(),
                    }),
                    None => Outcome::None,
                },
                _ => Outcome::None,
            },
            _ => Outcome::None,
        }
    }

    fn move_cursor_up(&mut self) -> Outcome {
        let cursor = match self.pane {
            Pane::Jobs => &mut self.jobs_cursor,
            Pane::Artifacts => &mut self.artifacts_cursor,
        };
        if *cursor > 0 {
            *cursor -= 1;
            Outcome::Redraw
        } else {
            Outcome::None
        }
    }

    fn move_cursor_down(&mut self, view: &AppViewModel) -> Outcome {
        match self.pane {
            Pane::Jobs => {
                if self.jobs_cursor + 1 < view.jobs.len() {
                    self.jobs_cursor += 1;
                }
                // Nearing the end of the loaded rows is the scroll trigger
                // for the next page.
                if self.jobs_cursor + LOAD_MORE_MARGIN >= view.jobs.len() {
                    Outcome::Msg(Msg::EndOfListReached)
                } else {
                    Outcome::Redraw
                }
            }
            Pane::Artifacts => {
                if self.artifacts_cursor + 1 < view.artifacts.len() {
                    self.artifacts_cursor += 1;
                    Outcome::Redraw
                } else {
                    Outcome::None
                }
            }
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent, view: &AppViewModel) -> Outcome {
        match &mut self.overlay {
            Overlay::None => Outcome::None,
            Overlay::Upload { input } => match key.code {
                KeyCode::Esc => self.close_overlay(),
                KeyCode::Enter => {
                    let path = input.clone();
                    self.overlay = Overlay::None;
                    Outcome::Msg(Msg::UploadSubmitted { path })
                }
                KeyCode::Backspace => {
                    input.pop();
                    Outcome::Redraw
                }
                KeyCode::Char(ch) => {
                    input.push(ch);
                    Outcome::Redraw
                }
                _ => Outcome::None,
            },
            Overlay::Submit {
                artifact_key,
                tool_ix,
                ..
            } => match key.code {
                KeyCode::Esc => self.close_overlay(),
                KeyCode::Up => {
                    *tool_ix = tool_ix.saturating_sub(1);
                    Outcome::Redraw
                }
                KeyCode::Down => {
                    if *tool_ix + 1 < view.tools.len() {
                        *tool_ix += 1;
                    }
                    Outcome::Redraw
                }
                KeyCode::Enter => match view.tools.get(*tool_ix) {
                    Some(tool) => {
                        let msg = Msg::AnalysisSubmitted {
                            artifact_key: artifact_key.clone(),
                            tool: tool.clone(),
                        };
                        self.overlay = Overlay::None;
                        Outcome::Msg(msg)
                    }
                    None => Outcome::None,
                },
                _ => Outcome::None,
            },
            Overlay::Filter { form, field } => match key.code {
                KeyCode::Esc => self.close_overlay(),
                KeyCode::Up => {
                    *field = field.saturating_sub(1);
                    Outcome::Redraw
                }
                KeyCode::Down | KeyCode::Tab => {
                    *field = (*field + 1) % FILTER_FIELDS;
                    Outcome::Redraw
                }
                KeyCode::Backspace => {
                    form.field_mut(*field).pop();
                    Outcome::Redraw
                }
                KeyCode::Delete => {
                    form.clear();
                    self.overlay = Overlay::None;
                    Outcome::Msg(Msg::FilterCleared)
                }
                KeyCode::Enter => {
                    let filter = form.to_filter();
                    self.overlay = Overlay::None;
                    Outcome::Msg(Msg::FilterChanged(filter))
                }
                KeyCode::Char(ch) => {
                    form.field_mut(*field).push(ch);
                    Outcome::Redraw
                }
                _ => Outcome::None,
            },
            Overlay::ConfirmCancel { key: job_key } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let msg = Msg::CancelJobConfirmed {
                        key: job_key.clone(),
                    };
                    self.overlay = Overlay::None;
                    Outcome::Msg(msg)
                }
                KeyCode::Char('n') | KeyCode::Esc => self.close_overlay(),
                _ => Outcome::None,
            },
            Overlay::ConfirmDelete { key: artifact_key, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let msg = Msg::DeleteArtifactConfirmed {
                        key: artifact_key.clone(),
                    };
                    self.overlay = Overlay::None;
                    Outcome::Msg(msg)
                }
                KeyCode::Char('n') | KeyCode::Esc => self.close_overlay(),
                _ => Outcome::None,
            },
        }
    }

    fn close_overlay(&mut self) -> Outcome {
        self.overlay = Overlay::None;
        Outcome::Redraw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use seqconsole_core::JobRowView;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn view_with_jobs(count: usize) -> AppViewModel {
        AppViewModel {
            jobs: (0..count)
                .map(|ix| JobRowView {
                    key: format!("j{ix}"),
                    artifact_name: "reads.fasta".to_string(),
                    tool: "mafft".to_string(),
                    status: JobStatus::Running,
                    created_at: "2026-08-01T10:00:00Z".to_string(),
                    updated_at: None,
                    message: None,
                    output_key: None,
                    live: false,
                })
                .collect(),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn scrolling_near_the_end_requests_more_rows() {
        let view = view_with_jobs(4);
        let mut ui = UiState::default();

        // With fewer rows than the margin every step asks for more.
        assert_eq!(
            ui.handle_key(key(KeyCode::Down), &view),
            Outcome::Msg(Msg::EndOfListReached)
        );
    }

    #[test]
    fn scrolling_far_from_the_end_only_redraws() {
        let view = view_with_jobs(LOAD_MORE_MARGIN + 10);
        let mut ui = UiState::default();
        assert_eq!(ui.handle_key(key(KeyCode::Down), &view), Outcome::Redraw);
    }

    #[test]
    fn filter_form_round_trips_and_rejects_bad_status() {
        let filter = JobFilter {
            tool: Some("mafft".to_string()),
            status: Some(JobStatus::Error),
            date_from: Some("2026-08-01".to_string()),
            ..JobFilter::default()
        };
        let form = FilterForm::from_filter(&filter);
        assert_eq!(form.to_filter(), filter);

        let mut bad = form.clone();
        bad.status = "bogus".to_string();
        assert_eq!(bad.to_filter().status, None);
    }

    #[test]
    fn cancel_dialog_only_opens_for_unfinished_jobs() {
        let mut view = view_with_jobs(1);
        view.jobs[0].status = JobStatus::Success;
        let mut ui = UiState::default();
        assert_eq!(ui.handle_key(key(KeyCode::Char('c')), &view), Outcome::None);

        view.jobs[0].status = JobStatus::Running;
        assert_eq!(
            ui.handle_key(key(KeyCode::Char('c')), &view),
            Outcome::Redraw
        );
        assert!(matches!(ui.overlay, Overlay::ConfirmCancel { .. }));
    }
}
