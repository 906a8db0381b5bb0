//! Application state management.
//!
//! Owns the navigation shell: active route, sidebar focus and cursor, the
//! lazily built pages with their render boundaries, and the fetcher the
//! pages share.

use crate::boundary::RouteBoundary;
use crate::config::Config;
use crate::pages::{Page, PageAction, PageContext};
use crate::query::Fetcher;
use crate::routes::{self, ROUTES};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{buffer::Buffer, layout::Rect};
use std::time::{Duration, Instant};

/// How long a status message stays in the status bar.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Which half of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Route list on the left
    Sidebar,
    /// Active page
    Page,
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    config: Config,
    fetcher: Fetcher,
    /// Upper bound for date pickers
    today: NaiveDate,
    /// One slot per route, filled on first visit
    pages: Vec<Option<Box<dyn Page>>>,
    boundaries: Vec<RouteBoundary>,
    active: usize,
    /// Route under the sidebar cursor
    cursor: usize,
    focus: Focus,
    status_message: Option<(String, Instant)>,
    should_quit: bool,
}

impl App {
    /// Create the application state and open the home route.
    ///
    /// # Arguments
    /// * `config` - Loaded configuration
    /// * `fetcher` - Query layer shared by all pages
    /// * `today` - Current local date
    /// * `now` - Current instant
    ///
    /// # Returns
    /// * `App` - New application state showing the dashboard
    pub fn new(config: Config, fetcher: Fetcher, today: NaiveDate, now: Instant) -> Self {
        let mut app = Self {
            config,
            fetcher,
            today,
            pages: ROUTES.iter().map(|_| None).collect(),
            boundaries: ROUTES.iter().map(|_| RouteBoundary::default()).collect(),
            active: routes::home(),
            cursor: routes::home(),
            focus: Focus::Page,
            status_message: None,
            should_quit: false,
        };
        app.navigate(routes::home(), now);
        app
    }

    /// Make route `index` active.
    ///
    /// # Details
    /// Builds the page on first visit and activates it on every visit.
    /// Leaving a route whose page failed to render drops that page so the
    /// next visit starts from a fresh one.
    pub fn navigate(&mut self, index: usize, now: Instant) {
        if index >= ROUTES.len() {
            return;
        }
        if index != self.active && self.boundaries[self.active].is_faulted() {
            self.boundaries[self.active].reset();
            self.pages[self.active] = None;
        }

        self.active = index;
        self.cursor = index;
        self.status_message = None;
        tracing::info!(route = ROUTES[index].path, "navigate");

        let page = self.pages[index]
            .get_or_insert_with(|| (ROUTES[index].loader)(&self.config, self.today));
        page.activate(&mut PageContext {
            fetcher: &mut self.fetcher,
            now,
        });
    }

    /// Navigate by path.
    ///
    /// # Returns
    /// * `bool` - Whether the path matched a route
    pub fn navigate_path(&mut self, path: &str, now: Instant) -> bool {
        match routes::resolve(path) {
            Some(index) => {
                self.navigate(index, now);
                true
            }
            None => {
                tracing::warn!(path, "unknown route");
                false
            }
        }
    }

    pub fn go_home(&mut self, now: Instant) {
        self.navigate(routes::home(), now);
    }

    /// Rebuild the active page after a render failure.
    pub fn retry(&mut self, now: Instant) {
        let index = self.active;
        tracing::info!(route = ROUTES[index].path, "retrying route");
        self.boundaries[index].reset();
        let page = self.pages[index].insert((ROUTES[index].loader)(&self.config, self.today));
        page.activate(&mut PageContext {
            fetcher: &mut self.fetcher,
            now,
        });
    }

    /// Handle a key press.
    ///
    /// # Details
    /// Ctrl+C always quits. While the page edits text or a selection, every
    /// other key goes to the page. Otherwise `q`, `Tab` and `g` are global
    /// and the rest goes to the focused half of the screen.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let faulted = self.boundaries[self.active].is_faulted();
        if self.focus == Focus::Page && !faulted && self.page_capturing_input() {
            self.send_to_page(key, now);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Page,
                    Focus::Page => Focus::Sidebar,
                };
                return;
            }
            KeyCode::Char('g') => {
                self.go_home(now);
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Sidebar => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
                KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
                KeyCode::Enter => {
                    self.navigate(self.cursor, now);
                    self.focus = Focus::Page;
                }
                _ => {}
            },
            Focus::Page if faulted => {
                if key.code == KeyCode::Char('r') {
                    self.retry(now);
                }
            }
            Focus::Page => {
                if key.code == KeyCode::Esc {
                    self.focus = Focus::Sidebar;
                } else {
                    self.send_to_page(key, now);
                }
            }
        }
    }

    fn send_to_page(&mut self, key: KeyEvent, now: Instant) {
        let Some(page) = self.pages[self.active].as_mut() else {
            return;
        };
        let action = page.handle_key(
            key,
            &mut PageContext {
                fetcher: &mut self.fetcher,
                now,
            },
        );
        if let PageAction::Status(message) = action {
            self.set_status(message, now);
        }
    }

    fn page_capturing_input(&self) -> bool {
        self.pages[self.active]
            .as_ref()
            .is_some_and(|page| page.capturing_input())
    }

    /// Move the sidebar cursor by `delta` routes, wrapping around.
    fn move_cursor(&mut self, delta: isize) {
        let order = routes::sidebar_order();
        if order.is_empty() {
            return;
        }
        let position = order.iter().position(|&i| i == self.cursor).unwrap_or(0);
        let next = (position as isize + delta).rem_euclid(order.len() as isize) as usize;
        self.cursor = order[next];
    }

    /// Advance timers: debounced inputs and status expiry.
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, set_at)) = &self.status_message
            && now.saturating_duration_since(*set_at) >= STATUS_TTL
        {
            self.status_message = None;
        }
        if let Some(page) = self.pages[self.active].as_mut() {
            page.tick(&mut PageContext {
                fetcher: &mut self.fetcher,
                now,
            });
        }
    }

    /// Deliver finished fetches to every loaded page.
    ///
    /// # Details
    /// Inactive pages receive results too, so data fetched for a page is in
    /// place when the user comes back to it.
    pub async fn pump_fetches(&mut self, now: Instant) {
        let completions = self.fetcher.poll_completed(now).await;
        for completion in &completions {
            for page in self.pages.iter_mut().flatten() {
                page.on_fetched(&completion.key, &completion.result);
            }
        }
    }

    /// Draw the active page through its route boundary.
    pub fn render_page(&mut self, area: Rect, buf: &mut Buffer) {
        let index = self.active;
        let page = self.pages[index].as_deref();
        self.boundaries[index].guard(ROUTES[index].path, area, buf, |area, buf| {
            if let Some(page) = page {
                page.render(area, buf);
            }
        });
    }

    pub fn set_status(&mut self, message: String, now: Instant) {
        self.status_message = Some((message, now));
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_ref().map(|(message, _)| message.as_str())
    }

    /// Key hints of the active page.
    pub fn page_help(&self) -> &'static str {
        if self.boundaries[self.active].is_faulted() {
            return "r retry";
        }
        self.pages[self.active]
            .as_ref()
            .map(|page| page.help())
            .unwrap_or("")
    }

    /// Number of fetches still running, shown in the status bar.
    pub fn requests_in_flight(&self) -> usize {
        self.fetcher.in_flight_count()
    }

    pub fn active_route(&self) -> usize {
        self.active
    }

    pub fn cursor_route(&self) -> usize {
        self.cursor
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
