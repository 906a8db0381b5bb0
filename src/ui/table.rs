//! Data table rendering.
//!
//! Draws a [`TableView`]: header with sort markers, the current page, and a
//! pagination footer.

use crate::table::{Column, ColumnKind, SortDirection, TableView};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

/// Render a table view.
///
/// # Arguments
/// * `view` - Table view to draw
/// * `title` - Block title
/// * `area` - Area to render in
/// * `buf` - Buffer to render to
///
/// # Details
/// Numeric columns are right-aligned. When the filter matches nothing the
/// view's empty message replaces the body. The footer shows the page
/// position and the number of matching rows.
pub fn render_table<R>(view: &TableView<R>, title: &str, area: Rect, buf: &mut Buffer) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    Widget::render(block, area, buf);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    if view.is_view_empty() {
        let header = Row::new(header_cells(view)).style(header_style());
        Widget::render(
            Table::new(Vec::<Row>::new(), widths(view.columns())).header(header),
            chunks[0],
            buf,
        );
        let message_area = Rect {
            y: chunks[0].y.saturating_add(2),
            height: chunks[0].height.saturating_sub(2),
            ..chunks[0]
        };
        Widget::render(
            Paragraph::new(view.empty_message().to_string())
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center),
            message_area,
            buf,
        );
    } else {
        render_body(view, chunks[0], buf);
    }

    render_footer(view, chunks[1], buf);
}

fn render_body<R>(view: &TableView<R>, area: Rect, buf: &mut Buffer) {
    let rows: Vec<Row> = view
        .visible_rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let cells: Vec<Cell> = view
                .columns()
                .iter()
                .map(|column| {
                    let text = column.render(row.record, row.position);
                    Cell::from(aligned(text, column))
                })
                .collect();
            // Zebra striping
            let style = if i % 2 == 1 {
                Style::default().bg(Color::Rgb(30, 30, 40))
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        })
        .collect();

    let table = Table::new(rows, widths(view.columns()))
        .header(Row::new(header_cells(view)).style(header_style()))
        .column_spacing(1);
    Widget::render(table, area, buf);
}

fn header_cells<R>(view: &TableView<R>) -> Vec<Cell<'static>> {
    view.columns()
        .iter()
        .map(|column| {
            let marker = match view.sort_direction(column.id()) {
                Some(SortDirection::Ascending) => " ▲",
                Some(SortDirection::Descending) => " ▼",
                None => "",
            };
            Cell::from(aligned(format!("{}{marker}", column.header()), column))
        })
        .collect()
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn aligned<R>(text: String, column: &Column<R>) -> Line<'static> {
    let line = Line::from(text);
    if column.is_numeric() {
        line.alignment(Alignment::Right)
    } else {
        line
    }
}

fn widths<R>(columns: &[Column<R>]) -> Vec<Constraint> {
    columns
        .iter()
        .map(|column| match column.kind() {
            ColumnKind::Rank => Constraint::Length(6),
            ColumnKind::Numeric => Constraint::Fill(1),
            ColumnKind::Text => Constraint::Fill(2),
        })
        .collect()
}

fn render_footer<R>(view: &TableView<R>, area: Rect, buf: &mut Buffer) {
    let enabled = Style::default().fg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);
    let filtered = view.filtered_count();

    let mut spans = vec![
        Span::styled(
            "◀ ",
            if view.can_previous_page() { enabled } else { disabled },
        ),
        Span::raw(format!(
            "Page {} of {} · {} results",
            view.page_index() + 1,
            view.page_count(),
            filtered
        )),
    ];
    if filtered != view.total_count() {
        spans.push(Span::styled(
            format!(" (of {})", view.total_count()),
            Style::default().fg(Color::Gray),
        ));
    }
    spans.push(Span::styled(
        " ▶",
        if view.can_next_page() { enabled } else { disabled },
    ));

    Widget::render(Paragraph::new(Line::from(spans)), area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::render_text;
    use crate::table::Column;

    #[derive(Debug)]
    struct Asset {
        name: &'static str,
        cap: f64,
    }

    fn view(count: usize) -> TableView<Asset> {
        let names = ["Bitcoin", "Ether", "Solana"];
        let mut view = TableView::new(
            vec![
                Column::rank("Rank"),
                Column::text("name", "Asset", |a: &Asset| a.name.to_string()),
                Column::numeric("cap", "Cap", |a: &Asset| Some(a.cap)),
            ],
            2,
        )
        .with_empty_message("No results found.");
        view.replace_records(
            (0..count)
                .map(|i| Asset {
                    name: names[i % names.len()],
                    cap: (i + 1) as f64,
                })
                .collect(),
        );
        view
    }

    #[test]
    fn test_render_table_rows_and_footer() {
        let view = view(3);
        let text = render_text(60, 10, |area, buf| render_table(&view, "Assets", area, buf));
        assert!(text.contains("Assets"));
        assert!(text.contains("Bitcoin"));
        assert!(text.contains("Ether"));
        // Page size 2 keeps the third record off the first page
        assert!(!text.contains("Solana"));
        assert!(text.contains("Page 1 of 2 · 3 results"));
    }

    #[test]
    fn test_render_table_sort_marker() {
        let mut view = view(3);
        view.toggle_sort("cap");
        view.toggle_sort("cap");
        let text = render_text(60, 10, |area, buf| render_table(&view, "Assets", area, buf));
        assert!(text.contains("Cap ▼"));
        assert!(text.contains("Solana"));
    }

    #[test]
    fn test_render_table_empty_message() {
        let mut view = view(3);
        view.set_global_filter("dogecoin");
        let text = render_text(60, 10, |area, buf| render_table(&view, "Assets", area, buf));
        assert!(text.contains("No results found."));
        assert!(text.contains("Page 1 of 1 · 0 results (of 3)"));
    }
}
