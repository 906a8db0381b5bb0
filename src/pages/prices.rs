//! Prices page.
//!
//! Daily closing prices for a chosen set of symbols over a chosen date
//! range. Every distinct selection is its own query; results for a
//! selection the user has since moved away from are dropped.

use super::{Page, PageAction, PageContext};
use crate::api::{FetchError, PriceRow, PricesSnapshot};
use crate::config::Config;
use crate::format::{format_date, format_usd};
use crate::query::{Payload, QueryKey, Remote, RemoteView};
use crate::table::{Column, TableView};
use crate::ui::{checklist, date_range, feedback, filters, search, table};
use crate::widgets::{Checklist, DateRangePicker, DebouncedInput};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Clear, Widget},
};
use std::sync::Arc;

const NO_SYMBOLS_MESSAGE: &str = "Select at least one symbol to view prices";

/// Which control currently receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Editor {
    None,
    Symbols,
    Dates,
    Search,
}

#[derive(Debug)]
pub struct PricesPage {
    symbols: Checklist,
    picker: DateRangePicker,
    editor: Editor,
    /// `None` while no symbol is selected
    key: Option<QueryKey>,
    remote: Remote<Arc<PricesSnapshot>>,
    table: TableView<PriceRow>,
    search: DebouncedInput,
}

/// Date column plus one numeric column per symbol.
fn price_columns(symbols: &[String]) -> Vec<Column<PriceRow>> {
    let mut columns = vec![
        Column::text("date", "Date", |r: &PriceRow| r.date.clone())
            .render_with(|r| format_date(&r.date)),
    ];
    for symbol in symbols {
        let value_symbol = symbol.clone();
        let render_symbol = symbol.clone();
        columns.push(
            Column::numeric(symbol.clone(), symbol.clone(), move |r: &PriceRow| {
                r.price(&value_symbol)
            })
            .render_with(move |r| {
                r.price(&render_symbol)
                    .map(format_usd)
                    .unwrap_or_else(|| "-".to_string())
            }),
        );
    }
    columns
}

impl PricesPage {
    /// # Arguments
    /// * `config` - Supplies the symbol universe, page size and debounce
    /// * `today` - Upper bound of the date picker
    pub fn new(config: &Config, today: NaiveDate) -> Self {
        let symbols = Checklist::new(config.default_symbols.clone());
        let mut page = Self {
            table: TableView::new(price_columns(&symbols.selected()), config.prices_page_size)
                .with_empty_message("No results found."),
            symbols,
            picker: DateRangePicker::new(today),
            editor: Editor::None,
            key: None,
            remote: Remote::default(),
            search: DebouncedInput::new(config.search_debounce()),
        };
        page.key = page.selection_key();
        page
    }

    #[cfg(test)]
    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    #[cfg(test)]
    pub fn table(&self) -> &TableView<PriceRow> {
        &self.table
    }

    #[cfg(test)]
    pub fn remote(&self) -> &Remote<Arc<PricesSnapshot>> {
        &self.remote
    }

    fn selection_key(&self) -> Option<QueryKey> {
        let symbols = self.symbols.selected();
        if symbols.is_empty() {
            return None;
        }
        let range = self.picker.range();
        Some(QueryKey::Prices {
            symbols,
            start: range.start,
            end: range.end,
        })
    }

    /// Switch to the query matching the current selection.
    ///
    /// # Details
    /// Data of the previous selection is discarded; it describes different
    /// symbols or dates. Nothing happens if the selection is unchanged.
    fn requery(&mut self, ctx: &mut PageContext<'_>) {
        let next = self.selection_key();
        if next == self.key {
            return;
        }
        tracing::debug!(
            from = ?self.key.as_ref().map(ToString::to_string),
            to = ?next.as_ref().map(ToString::to_string),
            "prices selection changed"
        );
        self.key = next;
        self.remote.clear();
        self.table.set_columns(price_columns(&self.symbols.selected()));
        self.table.replace_records(Vec::new());
        self.load(ctx);
    }

    fn load(&mut self, ctx: &mut PageContext<'_>) {
        let Some(key) = self.key.clone() else {
            return;
        };
        if let Some(Payload::Prices(snapshot)) = ctx.fetcher.request(&key, ctx.now) {
            self.apply(snapshot);
        }
        if ctx.fetcher.is_in_flight(&key) {
            self.remote.begin();
        }
    }

    fn apply(&mut self, snapshot: Arc<PricesSnapshot>) {
        self.table.set_columns(price_columns(&snapshot.column_symbols()));
        self.table.replace_records(snapshot.rows());
        self.remote.succeed(snapshot);
    }

    fn handle_symbols_key(&mut self, key: KeyEvent, ctx: &mut PageContext<'_>) -> PageAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.symbols.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.symbols.move_down(),
            KeyCode::Char(' ') => self.symbols.toggle_current(),
            KeyCode::Char('a') => self.symbols.select_all(),
            KeyCode::Char('c') => self.symbols.clear_all(),
            KeyCode::Enter | KeyCode::Esc => {
                self.editor = Editor::None;
                self.requery(ctx);
            }
            _ => {}
        }
        PageAction::Consumed
    }

    fn handle_dates_key(&mut self, key: KeyEvent, ctx: &mut PageContext<'_>) -> PageAction {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.picker.shift(-1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.picker.shift(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.picker.shift(-30);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.picker.shift(30);
            }
            KeyCode::Tab => self.picker.toggle_field(),
            KeyCode::Char(c @ '1'..='9') => {
                self.picker.apply_preset(c as usize - '1' as usize);
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.editor = Editor::None;
                self.requery(ctx);
            }
            _ => {}
        }
        PageAction::Consumed
    }

    fn handle_search_key(&mut self, key: KeyEvent, ctx: &mut PageContext<'_>) -> PageAction {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.editor = Editor::None;
                if let Some(text) = self.search.flush() {
                    self.table.set_global_filter(text);
                }
            }
            KeyCode::Backspace => self.search.pop(ctx.now),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.set("", ctx.now)
            }
            KeyCode::Char(c) => self.search.push(c, ctx.now),
            _ => {}
        }
        PageAction::Consumed
    }

    fn render_body(&self, area: Rect, buf: &mut Buffer) {
        if self.key.is_none() {
            feedback::render_notice(NO_SYMBOLS_MESSAGE, area, buf);
            return;
        }
        match self.remote.view() {
            RemoteView::Idle | RemoteView::Loading => {
                feedback::render_loading("Loading prices...", area, buf);
            }
            RemoteView::Failed(error) => {
                feedback::render_fetch_error("Failed to load prices", error, area, buf);
            }
            RemoteView::Ready { error, refreshing, .. } => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(if error.is_some() { 1 } else { 0 }),
                        Constraint::Min(0),
                    ])
                    .split(area);
                if let Some(error) = error {
                    feedback::render_stale_banner(error, chunks[0], buf);
                }
                let title = if refreshing {
                    "Prices (refreshing...)"
                } else {
                    "Prices"
                };
                table::render_table(&self.table, title, chunks[1], buf);
            }
        }
    }
}

impl Page for PricesPage {
    fn activate(&mut self, ctx: &mut PageContext<'_>) {
        self.load(ctx);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut PageContext<'_>) -> PageAction {
        match self.editor {
            Editor::Symbols => return self.handle_symbols_key(key, ctx),
            Editor::Dates => return self.handle_dates_key(key, ctx),
            Editor::Search => return self.handle_search_key(key, ctx),
            Editor::None => {}
        }
        match key.code {
            KeyCode::Char('s') => self.editor = Editor::Symbols,
            KeyCode::Char('d') => self.editor = Editor::Dates,
            KeyCode::Char('/') => self.editor = Editor::Search,
            KeyCode::Left | KeyCode::Char('h') => self.table.previous_page(),
            KeyCode::Right | KeyCode::Char('l') => self.table.next_page(),
            KeyCode::Home => self.table.first_page(),
            KeyCode::End => self.table.last_page(),
            KeyCode::Char(c @ '1'..='9') => {
                self.table.toggle_sort_at(c as usize - '1' as usize);
            }
            KeyCode::Char('r') => {
                let Some(key) = &self.key else {
                    return PageAction::Status(NO_SYMBOLS_MESSAGE.to_string());
                };
                ctx.fetcher.refetch(key);
                self.remote.begin();
                return PageAction::Status("Refreshing prices...".to_string());
            }
            _ => return PageAction::Ignored,
        }
        PageAction::Consumed
    }

    fn tick(&mut self, ctx: &mut PageContext<'_>) {
        if let Some(text) = self.search.poll(ctx.now) {
            self.table.set_global_filter(text);
        }
    }

    fn on_fetched(&mut self, key: &QueryKey, result: &Result<Payload, FetchError>) {
        if self.key.as_ref() != Some(key) {
            if matches!(key, QueryKey::Prices { .. }) {
                tracing::debug!(query = %key, "dropping superseded prices result");
            }
            return;
        }
        match result {
            Ok(Payload::Prices(snapshot)) => self.apply(Arc::clone(snapshot)),
            Ok(_) => {}
            Err(error) => self.remote.fail(error.clone()),
        }
    }

    fn capturing_input(&self) -> bool {
        self.editor != Editor::None
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Symbols and dates
                Constraint::Length(3), // Search
                Constraint::Min(0),    // Table
            ])
            .split(area);

        filters::render_price_filters(&self.symbols, &self.picker.range(), chunks[0], buf);
        search::render_search(
            &self.search,
            self.editor == Editor::Search,
            "Search by date",
            Some(self.table.filtered_count()),
            chunks[1],
            buf,
        );
        self.render_body(chunks[2], buf);

        // Editors overlay the top of the table
        match self.editor {
            Editor::Symbols => {
                let height = (self.symbols.items().len() as u16 + 2).min(chunks[2].height);
                let popup = Rect {
                    height,
                    width: chunks[2].width.min(70),
                    ..chunks[2]
                };
                Widget::render(Clear, popup, buf);
                checklist::render_checklist(&self.symbols, popup, buf);
            }
            Editor::Dates => {
                let popup = Rect {
                    height: chunks[2].height.min(5),
                    width: chunks[2].width.min(70),
                    ..chunks[2]
                };
                Widget::render(Clear, popup, buf);
                date_range::render_date_picker(&self.picker, popup, buf);
            }
            Editor::None | Editor::Search => {}
        }
    }

    fn help(&self) -> &'static str {
        match self.editor {
            Editor::Symbols => "↑/↓ move · space toggle · a all · c clear · Enter done",
            Editor::Dates => "←/→ ±1 day · ↑/↓ ±30 days · Tab start/end · 1-4 presets · Enter done",
            Editor::Search => "Type to search · Enter/Esc done",
            Editor::None => "s symbols · d dates · / search · ←/→ page · 1-9 sort · r refresh",
        }
    }
}
