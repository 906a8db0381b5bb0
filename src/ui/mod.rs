//! UI components module.
//!
//! Contains the ratatui rendering of the navigation shell and the widgets
//! pages draw with.

pub mod checklist;
pub mod date_range;
pub mod feedback;
pub mod filters;
pub mod search;
pub mod sidebar;
pub mod table;

pub use sidebar::render_sidebar;

use crate::app::{App, Focus};
use crate::routes::ROUTES;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const SIDEBAR_WIDTH: u16 = 28;

/// Render the complete UI.
///
/// # Arguments
/// * `app` - Application state
/// * `frame` - Frame to render to
///
/// # Details
/// Lays out the sidebar on the left and the header, active page and status
/// bar on the right. The page is drawn through its route boundary, which is
/// why the application state is borrowed mutably.
pub fn render_app(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let buf = frame.buffer_mut();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Page
            Constraint::Length(3), // Status bar
        ])
        .split(columns[1]);

    render_sidebar(app, columns[0], buf);
    render_header(app, rows[0], buf);
    app.render_page(rows[1], buf);
    render_status(app, rows[2], buf);
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let route = &ROUTES[app.active_route()];
    let mut spans = Vec::new();
    if let Some(group) = route.group {
        spans.push(Span::styled(
            format!("{group} › "),
            Style::default().fg(Color::Gray),
        ));
    }
    spans.push(Span::styled(
        route.title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        format!("  {}", route.path),
        Style::default().fg(Color::DarkGray),
    ));

    let border = if app.focus() == Focus::Page {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(border));
    Widget::render(paragraph, area, buf);
}

fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    let line = match app.status_message() {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Cyan),
        )),
        None => {
            let mut spans = Vec::new();
            let loading = app.requests_in_flight();
            if loading > 0 {
                spans.push(Span::styled(
                    format!("⟳ {loading} loading"),
                    Style::default().fg(Color::Yellow),
                ));
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            }
            let page_help = app.page_help();
            if !page_help.is_empty() {
                spans.push(Span::raw(page_help));
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                "Tab focus · g home · q quit",
                Style::default().fg(Color::Gray),
            ));
            Line::from(spans)
        }
    };
    let status = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    Widget::render(status, area, buf);
}
