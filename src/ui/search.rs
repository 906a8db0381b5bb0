//! Search widget rendering.
//!
//! Displays the search input bar of a table page.

use crate::widgets::DebouncedInput;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the search widget.
///
/// # Arguments
/// * `input` - Debounced search input
/// * `is_active` - Whether the box has keyboard focus
/// * `placeholder` - Hint shown while the box is empty
/// * `result_count` - Number of matching rows, shown while a filter is applied
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Shows the text as typed, not the committed filter, so keystrokes echo
/// immediately while the table waits for the debounce.
pub fn render_search(
    input: &DebouncedInput,
    is_active: bool,
    placeholder: &str,
    result_count: Option<usize>,
    area: Rect,
    buf: &mut Buffer,
) {
    let mut spans = vec![Span::styled("› ", Style::default().fg(Color::Yellow))];
    if input.value().is_empty() && !is_active {
        spans.push(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            input.value().to_string(),
            Style::default().fg(if is_active { Color::White } else { Color::Gray }),
        ));
    }
    if is_active {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    if input.is_pending() {
        spans.push(Span::styled("  …", Style::default().fg(Color::DarkGray)));
    }
    if let Some(count) = result_count.filter(|_| !input.committed().is_empty()) {
        let noun = if count == 1 { "result" } else { "results" };
        spans.push(Span::styled(
            format!("  {count} {noun}"),
            Style::default().fg(Color::Cyan),
        ));
    }

    let title = if is_active {
        "Search (Enter/Esc finish · Ctrl+U clear)"
    } else {
        "Search (press '/')"
    };
    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );

    Widget::render(paragraph, area, buf);
}
