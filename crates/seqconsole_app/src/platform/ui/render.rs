use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use seqconsole_core::{
    AppViewModel, ArtifactKind, JobRowView, JobStatus, StreamStatus, Theme,
};

use super::constants::*;
use super::input::{FilterForm, Overlay, Pane, UiState, FILTER_FIELDS};
use super::layout;

pub fn render(frame: &mut Frame, view: &AppViewModel, ui: &UiState) {
    let palette = Palette::for_theme(view.theme);
    let chunks = layout::chunks(frame.area());

    frame.render_widget(
        Paragraph::new("").style(Style::default().bg(palette.bg)),
        frame.area(),
    );

    render_filter_bar(frame, chunks.filter_bar, view, &palette);
    render_jobs(frame, chunks.jobs, view, ui, &palette);
    render_artifacts(frame, chunks.side, view, ui, &palette);
    render_help(frame, chunks.help, &palette);
    render_status_bar(frame, chunks.status_bar, view, &palette);

    match &ui.overlay {
        Overlay::None => {}
        Overlay::Upload { input } => render_upload(frame, view, input, &palette),
        Overlay::Submit {
            artifact_name,
            tool_ix,
            ..
        } => render_submit(frame, view, artifact_name, *tool_ix, &palette),
        Overlay::Filter { form, field } => render_filter_form(frame, form, *field, &palette),
        Overlay::ConfirmCancel { key } => render_confirm(
            frame,
            &format!("Cancel job {key}? (y/n)"),
            &palette,
        ),
        Overlay::ConfirmDelete { name, .. } => render_confirm(
            frame,
            &format!("Delete artifact {name}? (y/n)"),
            &palette,
        ),
    }
}

struct Palette {
    bg: Color,
    fg: Color,
    dim: Color,
    accent: Color,
    warn: Color,
    err: Color,
    ok: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Reset,
                fg: Color::Gray,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                warn: Color::Yellow,
                err: Color::Red,
                ok: Color::Green,
            },
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                dim: Color::Gray,
                accent: Color::Blue,
                warn: Color::Magenta,
                err: Color::Red,
                ok: Color::Green,
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    fn block<'a>(&self, title: &'a str, focused: bool) -> Block<'a> {
        let border = if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.dim)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title)
            .style(self.base())
    }
}

fn render_filter_bar(frame: &mut Frame, area: Rect, view: &AppViewModel, palette: &Palette) {
    let filter = &view.filter;
    let mut parts = Vec::new();
    if let Some(artifact) = &filter.artifact {
        parts.push(format!("file={artifact}"));
    }
    if let Some(tool) = &filter.tool {
        parts.push(format!("tool={tool}"));
    }
    if let Some(status) = filter.status {
        parts.push(format!("status={status}"));
    }
    match (&filter.date_from, &filter.date_to) {
        (Some(from), Some(to)) => parts.push(format!("date={from}..{to}")),
        (Some(from), None) => parts.push(format!("date>={from}")),
        (None, Some(to)) => parts.push(format!("date<={to}")),
        (None, None) => {}
    }
    let text = if parts.is_empty() {
        "no filter (press f)".to_string()
    } else {
        parts.join("  ")
    };

    frame.render_widget(
        Paragraph::new(text).block(palette.block(TITLE_FILTER, false)),
        area,
    );
}

fn render_jobs(
    frame: &mut Frame,
    area: Rect,
    view: &AppViewModel,
    ui: &UiState,
    palette: &Palette,
) {
    let items: Vec<ListItem> = view
        .jobs
        .iter()
        .map(|job| ListItem::new(job_line(job, view, palette)))
        .collect();

    let shown = view.jobs.len();
    let title = match view.total_jobs {
        Some(total) => format!("{TITLE_JOBS} ({shown}/{total})"),
        None => format!("{TITLE_JOBS} ({shown})"),
    };

    let list = List::new(items)
        .block(palette.block(&title, ui.pane == Pane::Jobs))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !view.jobs.is_empty() {
        list_state.select(Some(ui.jobs_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn job_line<'a>(job: &'a JobRowView, view: &AppViewModel, palette: &Palette) -> Line<'a> {
    let marker = if job.live { "●" } else { " " };
    let selected = view.selected.as_deref() == Some(job.key.as_str());

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(palette.accent)),
        Span::raw(" "),
        Span::styled(
            format!("{:<8}", status_label(job.status)),
            status_style(job.status, palette),
        ),
        Span::raw(format!(
            " {:<10} {:<24} {}",
            job.tool,
            truncated(&job.artifact_name, 24),
            short_timestamp(&job.created_at),
        )),
    ];
    if selected {
        if let Some(message) = &job.message {
            spans.push(Span::styled(
                format!("  {message}"),
                Style::default().fg(palette.dim),
            ));
        }
    }
    Line::from(spans)
}

fn render_artifacts(
    frame: &mut Frame,
    area: Rect,
    view: &AppViewModel,
    ui: &UiState,
    palette: &Palette,
) {
    let items: Vec<ListItem> = view
        .artifacts
        .iter()
        .map(|artifact| {
            let kind = match artifact.kind {
                ArtifactKind::Input => "in ",
                ArtifactKind::Output => "out",
            };
            ListItem::new(format!(
                "{kind} {:<24} {:>9}",
                truncated(&artifact.name, 24),
                format_size(artifact.size),
            ))
        })
        .collect();

    let title = if view.upload_in_flight {
        format!("{TITLE_ARTIFACTS} (uploading…)")
    } else {
        format!("{TITLE_ARTIFACTS} ({})", view.artifacts.len())
    };

    let list = List::new(items)
        .block(palette.block(&title, ui.pane == Pane::Artifacts))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !view.artifacts.is_empty() {
        list_state.select(Some(ui.artifacts_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_help(frame: &mut Frame, area: Rect, palette: &Palette) {
    frame.render_widget(
        Paragraph::new(HELP_LINE).style(Style::default().fg(palette.dim).bg(palette.bg)),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, view: &AppViewModel, palette: &Palette) {
    let stream = match view.stream {
        StreamStatus::Connected => Span::styled("live", Style::default().fg(palette.ok)),
        StreamStatus::Connecting => {
            Span::styled("connecting…", Style::default().fg(palette.warn))
        }
        StreamStatus::Retrying { attempt } => Span::styled(
            format!("retrying ({attempt})"),
            Style::default().fg(palette.warn),
        ),
        StreamStatus::Closed => {
            Span::styled("offline (press r)", Style::default().fg(palette.err))
        }
    };
    let health = match view.healthy {
        Some(true) => Span::styled("backend up", Style::default().fg(palette.ok)),
        Some(false) => Span::styled("backend down", Style::default().fg(palette.err)),
        None => Span::styled("backend ?", Style::default().fg(palette.dim)),
    };

    let mut spans = vec![
        Span::raw("stream: "),
        stream,
        Span::raw(" | "),
        health,
    ];
    if view.submit_in_flight {
        spans.push(Span::raw(" | submitting…"));
    }
    if let Some(error) = &view.last_error {
        spans.push(Span::styled(
            format!(" | {error}"),
            Style::default().fg(palette.err),
        ));
    } else if let Some(notice) = &view.notice {
        spans.push(Span::raw(format!(" | {notice}")));
    }
    spans.push(Span::styled(
        format!(" | {}", Local::now().format("%H:%M:%S")),
        Style::default().fg(palette.dim),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(palette.base()), area);
}

fn render_upload(frame: &mut Frame, _view: &AppViewModel, input: &str, palette: &Palette) {
    let area = layout::centered(frame.area(), 60, 4);
    frame.render_widget(Clear, area);
    let body = format!("Path: {input}_\n(enter to upload, esc to close)");
    frame.render_widget(
        Paragraph::new(body).block(palette.block(TITLE_UPLOAD, true)),
        area,
    );
}

fn render_submit(
    frame: &mut Frame,
    view: &AppViewModel,
    artifact_name: &str,
    tool_ix: usize,
    palette: &Palette,
) {
    let height = (view.tools.len() as u16 + 3).max(5);
    let area = layout::centered(frame.area(), 48, height);
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from(format!("File: {artifact_name}"))];
    for (ix, tool) in view.tools.iter().enumerate() {
        let style = if ix == tool_ix {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            palette.base()
        };
        lines.push(Line::from(Span::styled(format!("  {tool}"), style)));
    }
    frame.render_widget(
        Paragraph::new(lines).block(palette.block(TITLE_SUBMIT, true)),
        area,
    );
}

fn render_filter_form(frame: &mut Frame, form: &FilterForm, field: usize, palette: &Palette) {
    let area = layout::centered(frame.area(), 52, (FILTER_FIELDS as u16) + 3);
    frame.render_widget(Clear, area);

    let labels = ["file id", "tool", "status", "date from", "date to"];
    let mut lines = Vec::with_capacity(FILTER_FIELDS + 1);
    for (ix, label) in labels.iter().enumerate() {
        let style = if ix == field {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            palette.base()
        };
        lines.push(Line::from(Span::styled(
            format!("{label:<10} {}", form.field(ix)),
            style,
        )));
    }
    lines.push(Line::from(Span::styled(
        "(enter apply, del clear, esc close)",
        Style::default().fg(palette.dim),
    )));
    frame.render_widget(
        Paragraph::new(lines).block(palette.block(TITLE_FILTER, true)),
        area,
    );
}

fn render_confirm(frame: &mut Frame, prompt: &str, palette: &Palette) {
    let area = layout::centered(frame.area(), (prompt.len() as u16 + 4).max(24), 3);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(prompt).block(palette.block("Confirm", true)),
        area,
    );
}

fn status_label(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "pending",
        JobStatus::Running => "running",
        JobStatus::Success => "success",
        JobStatus::Error => "error",
    }
}

fn status_style(status: JobStatus, palette: &Palette) -> Style {
    match status {
        JobStatus::Pending => Style::default().fg(palette.dim),
        JobStatus::Running => Style::default().fg(palette.warn),
        JobStatus::Success => Style::default().fg(palette.ok),
        JobStatus::Error => Style::default().fg(palette.err),
    }
}

/// Shorten an RFC 3339 timestamp for list rows; fall back to the raw string.
fn short_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed.format("%m-%d %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn format_size(size: u64) -> String {
    if size >= 1024 * 1024 {
        format!("{:.1} MiB", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.1} KiB", size as f64 / 1024.0)
    } else {
        format!("{size} B")
    }
}
