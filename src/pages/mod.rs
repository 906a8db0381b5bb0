//! Pages mounted by the route table.
//!
//! A page owns its view state and talks to the backend only through the
//! [`Fetcher`] handed in with each call. Fetch results come back through
//! [`Page::on_fetched`] tagged with their [`QueryKey`]; pages drop results
//! for keys they no longer show.

pub mod market_cap;
pub mod placeholder;
pub mod prices;

pub use market_cap::MarketCapPage;
pub use placeholder::ComingSoonPage;
pub use prices::PricesPage;

use crate::api::FetchError;
use crate::query::{Fetcher, Payload, QueryKey};
use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};
use std::fmt::Debug;
use std::time::Instant;

/// What a page did with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    /// Not a page key; the shell may handle it
    Ignored,
    Consumed,
    /// Consumed, with a message for the status bar
    Status(String),
}

/// Per-call access to shared services.
pub struct PageContext<'a> {
    pub fetcher: &'a mut Fetcher,
    pub now: Instant,
}

pub trait Page: Debug {
    /// Called every time the route becomes active.
    fn activate(&mut self, ctx: &mut PageContext<'_>);

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut PageContext<'_>) -> PageAction;

    /// Called once per event-loop iteration while the page is active.
    fn tick(&mut self, _ctx: &mut PageContext<'_>) {}

    /// Delivered for every finished fetch, whichever page started it.
    fn on_fetched(&mut self, _key: &QueryKey, _result: &Result<Payload, FetchError>) {}

    /// Whether the page wants every key, e.g. while a text box is focused.
    fn capturing_input(&self) -> bool {
        false
    }

    fn render(&self, area: Rect, buf: &mut Buffer);

    /// Key hints for the status bar.
    fn help(&self) -> &'static str {
        ""
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{buffer::Buffer, layout::Rect};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    /// Render into a fresh buffer and return its text row by row.
    pub fn render_text(width: u16, height: u16, draw: impl FnOnce(Rect, &mut Buffer)) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        draw(area, &mut buf);
        buffer_text(&buf)
    }

    pub fn buffer_text(buf: &Buffer) -> String {
        let width = buf.area.width as usize;
        buf.content
            .chunks(width.max(1))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
