//! Sidebar rendering.
//!
//! Displays the navigation tree with the active route and cursor.

use crate::app::{App, Focus};
use crate::routes::{NavItem, ROUTES, nav_items};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Render the sidebar.
///
/// # Arguments
/// * `app` - Application state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Groups are drawn as non-selectable headers with their routes indented
/// below. The active route is marked with `▶`; the cursor is highlighted
/// while the sidebar has focus.
pub fn render_sidebar(app: &App, area: Rect, buf: &mut Buffer) {
    let focused = app.focus() == Focus::Sidebar;

    let mut lines = vec![
        Line::from(Span::styled(
            "Risk Management",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Portfolio Analytics",
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];

    for item in nav_items() {
        match item {
            NavItem::Route(index) => lines.push(route_line(app, index, "", focused)),
            NavItem::Group { label, children } => {
                lines.push(Line::from(Span::styled(
                    format!("  {label}"),
                    Style::default().fg(Color::Gray),
                )));
                for index in children {
                    lines.push(route_line(app, index, "  ", focused));
                }
            }
        }
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );
    Widget::render(paragraph, area, buf);
}

fn route_line(app: &App, index: usize, indent: &str, focused: bool) -> Line<'static> {
    let is_active = index == app.active_route();
    let marker = if is_active { "▶ " } else { "  " };
    let mut style = if is_active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    if focused && index == app.cursor_route() {
        style = style.bg(Color::Blue);
    }
    Line::from(Span::styled(
        format!("{indent}{marker}{}", ROUTES[index].title),
        style,
    ))
}
