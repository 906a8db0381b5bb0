//! Market cap page.
//!
//! Shows the investment universe ranked by market capitalization with a
//! top-N slider, a debounced search box, sorting and pagination.

use super::{Page, PageAction, PageContext};
use crate::api::{FetchError, MarketCapRecord};
use crate::config::Config;
use crate::format::{format_large_number, format_market_cap, format_usd};
use crate::query::{Payload, QueryKey, Remote, RemoteView};
use crate::table::{Column, TableView};
use crate::ui::{feedback, filters, search, table};
use crate::widgets::DebouncedInput;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
};
use std::sync::Arc;

const SEARCH_PLACEHOLDER: &str = "Search by assets or symbols";

#[derive(Debug)]
pub struct MarketCapPage {
    key: QueryKey,
    remote: Remote<Arc<Vec<MarketCapRecord>>>,
    table: TableView<MarketCapRecord>,
    top_n: usize,
    search: DebouncedInput,
    searching: bool,
}

fn columns() -> Vec<Column<MarketCapRecord>> {
    vec![
        Column::rank("Rank"),
        Column::text("asset", "Asset", |r: &MarketCapRecord| {
            format!("{} {}", r.long_name, r.base_asset)
        })
        .render_with(|r| format!("{} ({})", r.long_name, r.base_asset)),
        Column::text("symbol", "Symbol", |r: &MarketCapRecord| r.symbol.clone()),
        Column::numeric("price", "Price (USD)", |r: &MarketCapRecord| Some(r.price))
            .render_with(|r| format_usd(r.price)),
        Column::numeric("supply", "Supply", |r: &MarketCapRecord| Some(r.supply))
            .render_with(|r| format_large_number(r.supply)),
        Column::numeric("market_cap", "Market Cap", |r: &MarketCapRecord| {
            Some(r.market_cap)
        })
        .render_with(|r| format_market_cap(r.market_cap)),
    ]
}

/// Percentage of the total market cap held by the first `top_n` records.
fn coverage(records: &[MarketCapRecord], top_n: usize) -> Option<f64> {
    let total: f64 = records.iter().map(|r| r.market_cap).sum();
    if total <= 0.0 {
        return None;
    }
    let kept: f64 = records.iter().take(top_n).map(|r| r.market_cap).sum();
    Some(kept / total * 100.0)
}

impl MarketCapPage {
    pub fn new(config: &Config) -> Self {
        Self {
            key: QueryKey::MarketCap {
                quote: config.quote.clone(),
            },
            remote: Remote::default(),
            table: TableView::new(columns(), config.market_cap_page_size)
                .with_empty_message("No results found."),
            top_n: config.default_top_n.max(1),
            search: DebouncedInput::new(config.search_debounce()),
            searching: false,
        }
    }

    #[cfg(test)]
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    #[cfg(test)]
    pub fn table(&self) -> &TableView<MarketCapRecord> {
        &self.table
    }

    #[cfg(test)]
    pub fn remote(&self) -> &Remote<Arc<Vec<MarketCapRecord>>> {
        &self.remote
    }

    /// Number of assets loaded, before the top-N cut.
    fn loaded_count(&self) -> usize {
        self.remote.data().map(|records| records.len()).unwrap_or(0)
    }

    /// Change how many of the largest assets are shown.
    ///
    /// # Details
    /// The value is clamped to `1..=loaded` once data is present. A change
    /// slices the dataset again, which also returns the table to its first
    /// page.
    pub fn set_top_n(&mut self, top_n: usize) {
        let loaded = self.loaded_count();
        let clamped = if loaded == 0 {
            top_n.max(1)
        } else {
            top_n.clamp(1, loaded)
        };
        if clamped != self.top_n {
            self.top_n = clamped;
            self.reslice();
        }
    }

    fn adjust_top_n(&mut self, delta: isize) {
        let next = self.top_n.saturating_add_signed(delta);
        self.set_top_n(next);
    }

    fn reslice(&mut self) {
        let records = match self.remote.data() {
            Some(records) => records.iter().take(self.top_n).cloned().collect(),
            None => Vec::new(),
        };
        self.table.replace_records(records);
    }

    fn apply(&mut self, records: Arc<Vec<MarketCapRecord>>) {
        // A background refresh with the same snapshot keeps the current page
        let unchanged = self
            .remote
            .data()
            .is_some_and(|current| Arc::ptr_eq(current, &records) || **current == *records);
        self.remote.succeed(records);
        if unchanged {
            return;
        }
        let loaded = self.loaded_count();
        if loaded > 0 {
            self.top_n = self.top_n.clamp(1, loaded);
        }
        self.reslice();
    }

    fn load(&mut self, ctx: &mut PageContext<'_>) {
        if let Some(Payload::MarketCap(records)) = ctx.fetcher.request(&self.key, ctx.now) {
            self.apply(records);
        }
        if ctx.fetcher.is_in_flight(&self.key) {
            self.remote.begin();
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, ctx: &mut PageContext<'_>) -> PageAction {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.searching = false;
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
}

impl Page for MarketCapPage {
    fn activate(&mut self, ctx: &mut PageContext<'_>) {
        self.load(ctx);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut PageContext<'_>) -> PageAction {
        if self.searching {
            return self.handle_search_key(key, ctx);
        }
        match key.code {
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_top_n(1),
            KeyCode::Char('-') => self.adjust_top_n(-1),
            KeyCode::Char(']') => self.adjust_top_n(10),
            KeyCode::Char('[') => self.adjust_top_n(-10),
            KeyCode::Left | KeyCode::Char('h') => self.table.previous_page(),
            KeyCode::Right | KeyCode::Char('l') => self.table.next_page(),
            KeyCode::Home => self.table.first_page(),
            KeyCode::End => self.table.last_page(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.table.toggle_sort_at(index);
            }
            KeyCode::Char('r') => {
                ctx.fetcher.refetch(&self.key);
                self.remote.begin();
                return PageAction::Status("Refreshing market cap data...".to_string());
            }
            _ => return PageAction::Ignored,
        }
        PageAction::Consumed
    }

    fn tick(&mut self, ctx: &mut PageContext<'_>) {
        if let Some(text) = self.search.poll(ctx.now) {
            tracing::debug!(filter = %text, "market cap filter applied");
            self.table.set_global_filter(text);
        }
    }

    fn on_fetched(&mut self, key: &QueryKey, result: &Result<Payload, FetchError>) {
        if *key != self.key {
            return;
        }
        match result {
            Ok(Payload::MarketCap(records)) => self.apply(Arc::clone(records)),
            Ok(_) => {}
            Err(error) => self.remote.fail(error.clone()),
        }
    }

    fn capturing_input(&self) -> bool {
        self.searching
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let (records, error) = match self.remote.view() {
            RemoteView::Idle | RemoteView::Loading => {
                feedback::render_loading("Loading market cap data...", area, buf);
                return;
            }
            RemoteView::Failed(error) => {
                feedback::render_fetch_error("Failed to load market cap data", error, area, buf);
                return;
            }
            RemoteView::Ready { data, error, .. } => (data, error),
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search and top-N
                Constraint::Length(if error.is_some() { 1 } else { 0 }),
                Constraint::Min(0), // Table
            ])
            .split(area);
        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[0]);

        search::render_search(
            &self.search,
            self.searching,
            SEARCH_PLACEHOLDER,
            Some(self.table.filtered_count()),
            controls[0],
            buf,
        );
        filters::render_top_n(
            self.top_n,
            records.len(),
            coverage(records, self.top_n),
            controls[1],
            buf,
        );
        if let Some(error) = error {
            feedback::render_stale_banner(error, chunks[1], buf);
        }

        let title = if self.remote.is_loading() {
            "Market Cap (refreshing...)"
        } else {
            "Market Cap"
        };
        table::render_table(&self.table, title, chunks[2], buf);
    }

    fn help(&self) -> &'static str {
        if self.searching {
            "Type to search · Enter/Esc done"
        } else {
            "/ search · ←/→ page · 1-6 sort · +/- top N · r refresh"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::{ch, key, render_text};
    use crate::query::Fetcher;
    use crate::query::test_support::{client, dead_backend};
    use std::time::{Duration, Instant};

    fn record(rank: usize) -> MarketCapRecord {
        MarketCapRecord {
            symbol: format!("C{rank}USDT"),
            long_name: format!("Coin {rank}"),
            base_asset: format!("C{rank}"),
            quote_asset: "USDT".to_string(),
            price: rank as f64,
            supply: 1000.0,
            market_cap: 1e9 * (200 - rank) as f64,
        }
    }

    fn payload(count: usize) -> Result<Payload, FetchError> {
        Ok(Payload::MarketCap(Arc::new((1..=count).map(record).collect())))
    }

    fn loaded(count: usize) -> MarketCapPage {
        let mut page = MarketCapPage::new(&Config::default());
        let key = page.key.clone();
        page.on_fetched(&key, &payload(count));
        page
    }

    #[test]
    fn test_top_n_slices_before_table() {
        let page = loaded(120);
        assert_eq!(page.top_n(), 50);
        assert_eq!(page.table().total_count(), 50);
        assert_eq!(page.table().visible_rows().len(), 50);
    }

    #[test]
    fn test_top_n_clamped_to_loaded_count() {
        let mut page = loaded(30);
        assert_eq!(page.top_n(), 30);
        page.set_top_n(0);
        assert_eq!(page.top_n(), 1);
        page.set_top_n(500);
        assert_eq!(page.top_n(), 30);
    }

    #[test]
    fn test_top_n_change_resets_page() {
        let mut page = MarketCapPage::new(&Config {
            market_cap_page_size: 10,
            ..Config::default()
        });
        let key = page.key.clone();
        page.on_fetched(&key, &payload(120));
        page.table.set_page(3);
        page.set_top_n(60);
        assert_eq!(page.table().page_index(), 0);
        assert_eq!(page.table().total_count(), 60);
    }

    #[test]
    fn test_identical_refresh_keeps_page() {
        let mut page = loaded(120);
        page.set_top_n(120);
        page.table.next_page();
        assert_eq!(page.table().page_index(), 1);

        let key = page.key.clone();
        page.on_fetched(&key, &payload(120));
        assert_eq!(page.table().page_index(), 1);

        // New data goes back to the first page
        page.on_fetched(&key, &payload(119));
        assert_eq!(page.table().page_index(), 0);
        assert_eq!(page.top_n(), 119);
    }

    #[test]
    fn test_coverage() {
        let records: Vec<_> = (1..=4).map(record).collect();
        // Caps are 199, 198, 197 and 196 billion
        let pct = coverage(&records, 2).unwrap();
        assert!((pct - 397.0 / 790.0 * 100.0).abs() < 1e-9);
        assert_eq!(coverage(&[], 2), None);
    }

    #[test]
    fn test_results_for_other_keys_are_ignored() {
        let mut page = MarketCapPage::new(&Config::default());
        let other = QueryKey::MarketCap {
            quote: "BTC".to_string(),
        };
        page.on_fetched(&other, &payload(5));
        assert!(page.remote().data().is_none());
    }

    #[test]
    fn test_failed_refresh_keeps_previous_data() {
        let mut page = loaded(10);
        let key = page.key.clone();
        page.on_fetched(&key, &Err(FetchError::Network("refused".to_string())));
        assert_eq!(page.remote().data().map(|d| d.len()), Some(10));
        assert!(page.remote().error().is_some());

        let text = render_text(120, 30, |area, buf| page.render(area, buf));
        assert!(text.contains("Coin 1 (C1)"));
        assert!(text.contains("Network error. Please check your connection."));
    }

    #[tokio::test]
    async fn test_search_commits_after_debounce() {
        let base = dead_backend().await;
        let mut fetcher = Fetcher::new(client(&base), Duration::from_secs(300));
        let mut page = loaded(120);
        let start = Instant::now();
        let mut ctx = PageContext {
            fetcher: &mut fetcher,
            now: start,
        };

        assert_eq!(page.handle_key(ch('/'), &mut ctx), PageAction::Consumed);
        assert!(page.capturing_input());
        for c in "coin 7".chars() {
            page.handle_key(ch(c), &mut ctx);
        }
        page.tick(&mut ctx);
        assert_eq!(page.table().global_filter(), "");

        ctx.now = start + Duration::from_millis(300);
        page.tick(&mut ctx);
        assert_eq!(page.table().global_filter(), "coin 7");
        // Coin 70..=79 are cut by the top-N slice
        assert_eq!(page.table().filtered_count(), 1);

        page.handle_key(key(KeyCode::Esc), &mut ctx);
        assert!(!page.capturing_input());
    }

    #[tokio::test]
    async fn test_sort_and_paging_keys() {
        let base = dead_backend().await;
        let mut fetcher = Fetcher::new(client(&base), Duration::from_secs(300));
        let mut page = MarketCapPage::new(&Config {
            market_cap_page_size: 20,
            ..Config::default()
        });
        let query = page.key.clone();
        page.on_fetched(&query, &payload(50));
        let mut ctx = PageContext {
            fetcher: &mut fetcher,
            now: Instant::now(),
        };

        page.handle_key(key(KeyCode::Right), &mut ctx);
        assert_eq!(page.table().page_index(), 1);
        page.handle_key(key(KeyCode::End), &mut ctx);
        assert_eq!(page.table().page_index(), 2);
        page.handle_key(ch('h'), &mut ctx);
        assert_eq!(page.table().page_index(), 1);

        // Price is the fourth column
        page.handle_key(ch('4'), &mut ctx);
        assert_eq!(page.table().page_index(), 1);
        page.handle_key(ch('4'), &mut ctx);
        let first = page.table().visible_rows()[0].record.price;
        assert_eq!(first, 30.0);

        assert_eq!(page.handle_key(ch('x'), &mut ctx), PageAction::Ignored);
    }

    #[tokio::test]
    async fn test_activate_without_backend_fails_into_error_view() {
        let base = dead_backend().await;
        let mut fetcher = Fetcher::new(client(&base), Duration::from_secs(300));
        let mut page = MarketCapPage::new(&Config::default());
        page.activate(&mut PageContext {
            fetcher: &mut fetcher,
            now: Instant::now(),
        });
        assert!(page.remote().is_loading());

        for completion in fetcher.settle().await {
            page.on_fetched(&completion.key, &completion.result);
        }
        let text = render_text(100, 12, |area, buf| page.render(area, buf));
        assert!(text.contains("Failed to load market cap data"));
        assert!(text.contains("[g] Go to Dashboard"));
    }
}
