//! Loading, error, and placeholder views.

use crate::api::FetchError;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Render a centered loading message.
pub fn render_loading(message: &str, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            format!("⟳ {message}"),
            Style::default().fg(Color::Cyan),
        )),
    ];
    Widget::render(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
        buf,
    );
}

/// Render a neutral centered message, e.g. for an empty selection.
pub fn render_notice(message: &str, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ];
    Widget::render(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
        buf,
    );
}

/// Render a fetch failure with nothing to fall back on.
///
/// # Arguments
/// * `title` - What failed to load, e.g. "Failed to load market cap data"
/// * `error` - The normalized fetch error
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
pub fn render_fetch_error(title: &str, error: &FetchError, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(error.user_message()),
        Line::default(),
        Line::from(Span::styled(
            "[r] Retry   [g] Go to Dashboard",
            Style::default().fg(Color::Yellow),
        )),
    ];
    Widget::render(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("Error")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            ),
        area,
        buf,
    );
}

/// One-line banner for a failed refresh over data that is still shown.
pub fn render_stale_banner(error: &FetchError, area: Rect, buf: &mut Buffer) {
    let line = Line::from(vec![
        Span::styled("⚠ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("Refresh failed: {}", error.user_message()),
            Style::default().fg(Color::Red),
        ),
        Span::styled(
            "  (showing last loaded data, [r] to retry)",
            Style::default().fg(Color::Gray),
        ),
    ]);
    Widget::render(Paragraph::new(line), area, buf);
}

/// Render the "coming soon" view of an unbuilt page.
pub fn render_coming_soon(title: &str, description: &str, phase: u8, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            description.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Coming Soon",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("This page will be implemented in Phase {phase}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    Widget::render(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        area,
        buf,
    );
}

/// Render the route-level fallback after a page failed to draw.
///
/// # Details
/// Clears whatever the page drew before failing.
pub fn render_page_error(detail: &str, area: Rect, buf: &mut Buffer) {
    Widget::render(Clear, area, buf);
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Page Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from("Something went wrong while rendering this page."),
        Line::from(Span::styled(
            detail.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
        Line::from(Span::styled(
            "[r] Retry   [g] Go to Dashboard",
            Style::default().fg(Color::Yellow),
        )),
    ];
    Widget::render(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            ),
        area,
        buf,
    );
}
