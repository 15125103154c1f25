use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{BookRecord, LevelBand};

/// Marker drawn in front of catalog rows that are already on the list.
pub(crate) const ON_LIST_MARKER: &str = "✓ ";

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for popups.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Panel title with the page indicator appended when there is more than one
/// page.
pub(crate) fn panel_title(name: &str, page: usize, total_pages: usize) -> String {
    if total_pages > 1 {
        format!("{name} · Page {page} of {total_pages}")
    } else {
        name.to_string()
    }
}

/// The band selector row. The active band is highlighted; the digit in front
/// of each band is its shortcut.
pub(crate) fn band_bar_line(active: LevelBand) -> Line<'static> {
    let mut spans = vec![Span::raw(" Level: ")];
    for (index, band) in LevelBand::ALL.iter().enumerate() {
        let text = format!(" {} {} ", index + 1, band.label());
        let style = if *band == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// One catalog or reading-list row: marker, title, author and level chip.
pub(crate) fn book_line(book: &BookRecord, on_list: bool) -> Line<'static> {
    let marker = if on_list { ON_LIST_MARKER } else { "  " };
    let mut spans = vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Green)),
        Span::styled(
            book.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if !book.author.trim().is_empty() {
        spans.push(Span::styled(
            format!("  by {}", book.author.trim()),
            Style::default().fg(Color::Gray),
        ));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!(" {} ", book.level_label()),
        Style::default().fg(Color::Black).bg(Color::Yellow),
    ));
    Line::from(spans)
}
