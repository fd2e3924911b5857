use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct Chunks {
    pub filter_bar: Rect,
    pub jobs: Rect,
    pub side: Rect,
    pub help: Rect,
    pub status_bar: Rect,
}

pub fn chunks(area: Rect) -> Chunks {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[1]);

    Chunks {
        filter_bar: rows[0],
        jobs: body[0],
        side: body[1],
        help: rows[2],
        status_bar: rows[3],
    }
}

/// Centered rect for modal overlays.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
