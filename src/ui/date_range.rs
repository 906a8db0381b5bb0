//! Date range picker rendering.

use crate::format::display_date;
use crate::widgets::{DateRangePicker, PRESET_DAYS, RangeField};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the date range picker.
///
/// # Arguments
/// * `picker` - Picker state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// The bound moved by the arrow keys is highlighted. Presets are listed
/// with the digit that applies them.
pub fn render_date_picker(picker: &DateRangePicker, area: Rect, buf: &mut Buffer) {
    let range = picker.range();
    let field_style = |field: RangeField| {
        if picker.field() == field {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    };

    let presets: Vec<Span> = PRESET_DAYS
        .iter()
        .enumerate()
        .map(|(i, days)| {
            Span::styled(
                format!("[{}] {days}d  ", i + 1),
                Style::default().fg(Color::Cyan),
            )
        })
        .collect();

    let lines = vec![
        Line::from(vec![
            Span::styled("From ", Style::default().fg(Color::Cyan)),
            Span::styled(display_date(range.start), field_style(RangeField::Start)),
            Span::styled("  To ", Style::default().fg(Color::Cyan)),
            Span::styled(display_date(range.end), field_style(RangeField::End)),
            Span::styled(
                format!("  ({} days)", range.days()),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(presets),
        Line::from(Span::styled(
            "←/→ ±1 day  ↑/↓ ±30 days  Tab start/end  Enter done",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title("Date Range")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    Widget::render(paragraph, area, buf);
}
