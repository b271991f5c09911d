//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a three-row split: the scrollable trackback list, a
//!   one-line detail bar for the selected trackback, and the status bar.
//! * Colours and styles are defined inline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, detail_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_trackback_list(app, frame, main_area);
    draw_detail_bar(app, frame, detail_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the scrollable trackback list.
fn draw_trackback_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .trackbacks
        .iter()
        .map(|t| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<18}", t.message.created_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("@{:<16}", t.message.author),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" "),
                Span::styled(topic_label(&t.topic_name), Style::default().fg(Color::White)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(format!(" Trackbacks: {} ", app.site))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn topic_label(name: &str) -> &str {
    if name.is_empty() {
        "(untitled)"
    } else {
        name
    }
}

/// Render the URL and tweet id of the selected trackback.
fn draw_detail_bar(app: &App, frame: &mut Frame, area: Rect) {
    let line = match app.selected() {
        Some(t) => Line::from(vec![
            Span::raw(" "),
            Span::styled(&t.message.url, Style::default().fg(Color::Blue)),
            Span::raw("  "),
            Span::styled(
                format!("tweet {}", t.message.source_id),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::from(Span::styled(
            " no trackback selected",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} trackbacks", app.trackbacks.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} topics", app.topic_count()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: scroll  Home/End: jump"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
