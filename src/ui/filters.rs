//! Filter panels rendering.
//!
//! Displays the top-N slider of the market cap page and the selection
//! summary of the prices page.

use crate::format::format_percentage;
use crate::widgets::{Checklist, DateRange};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the top-N slider.
///
/// # Arguments
/// * `top_n` - Current number of assets kept
/// * `total` - Number of assets loaded
/// * `coverage` - Share of the total market cap held by the kept assets, in percent
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Draws a text slider scaled to the available width followed by the
/// current value.
pub fn render_top_n(
    top_n: usize,
    total: usize,
    coverage: Option<f64>,
    area: Rect,
    buf: &mut Buffer,
) {
    let label = format!(" {top_n} / {total}");
    let track_width = (area.width as usize)
        .saturating_sub(2)
        .saturating_sub(label.chars().count() + 1)
        .max(1);
    let filled = if total == 0 {
        0
    } else {
        (track_width * top_n.min(total)).div_ceil(total)
    };

    let line = Line::from(vec![
        Span::styled("━".repeat(filled), Style::default().fg(Color::Cyan)),
        Span::styled(
            "─".repeat(track_width - filled.min(track_width)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(label, Style::default().fg(Color::White)),
    ]);

    let title = match coverage {
        Some(pct) => format!("Top Assets · {} of cap (-/+ [/])", format_percentage(pct, 1)),
        None => "Top Assets (-/+ [/])".to_string(),
    };
    let paragraph = Paragraph::new(line).block(Block::default().title(title).borders(Borders::ALL));
    Widget::render(paragraph, area, buf);
}

/// Render the symbol and date range summary of the prices page.
///
/// # Arguments
/// * `symbols` - Symbol checklist
/// * `range` - Selected date range
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
pub fn render_price_filters(symbols: &Checklist, range: &DateRange, area: Rect, buf: &mut Buffer) {
    let selected = symbols.selected_count();
    let symbols_text = if selected == 0 {
        "none".to_string()
    } else if selected == symbols.items().len() {
        format!("all {selected}")
    } else {
        symbols.selected().join(", ")
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Symbols: ", Style::default().fg(Color::Cyan)),
            Span::styled(symbols_text, Style::default().fg(Color::White)),
            Span::styled("  [s] edit", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled("Dates:   ", Style::default().fg(Color::Cyan)),
            Span::styled(range.label(), Style::default().fg(Color::White)),
            Span::styled("  [d] edit", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().title("Filters").borders(Borders::ALL));
    Widget::render(paragraph, area, buf);
}
