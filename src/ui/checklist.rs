//! Symbol checklist rendering.

use crate::widgets::Checklist;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

/// Render the checklist as a popup list with checkboxes.
///
/// # Arguments
/// * `list` - Checklist state
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
pub fn render_checklist(list: &Checklist, area: Rect, buf: &mut Buffer) {
    let items: Vec<ListItem> = list
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let (mark, style) = if list.is_checked(i) {
                ("[x] ", Style::default().fg(Color::Green))
            } else {
                ("[ ] ", Style::default().fg(Color::Gray))
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::raw(item.clone()),
            ]))
        })
        .collect();

    let title = format!(
        "Symbols {}/{} (space toggle, a all, c clear, Enter done)",
        list.selected_count(),
        list.items().len()
    );
    let mut state = ListState::default();
    state.select(Some(list.cursor()).filter(|_| !list.items().is_empty()));

    let widget = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );
    StatefulWidget::render(widget, area, buf, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::render_text;

    #[test]
    fn test_render_checklist_marks() {
        let mut list = Checklist::new(vec!["BTCUSDT".into(), "ETHUSDT".into()]);
        list.move_down();
        list.toggle_current();
        let text = render_text(70, 6, |area, buf| render_checklist(&list, area, buf));
        assert!(text.contains("[x] BTCUSDT"));
        assert!(text.contains("[ ] ETHUSDT"));
        assert!(text.contains("Symbols 1/2"));
    }
}
