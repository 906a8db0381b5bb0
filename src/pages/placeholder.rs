//! Pages not built yet.

use super::{Page, PageAction, PageContext};
use crate::ui::feedback;
use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};

/// "Coming soon" page naming the roadmap phase that delivers it.
#[derive(Debug, Clone)]
pub struct ComingSoonPage {
    title: &'static str,
    description: &'static str,
    phase: u8,
}

impl ComingSoonPage {
    pub fn new(title: &'static str, description: &'static str, phase: u8) -> Self {
        Self {
            title,
            description,
            phase,
        }
    }
}

impl Page for ComingSoonPage {
    fn activate(&mut self, _ctx: &mut PageContext<'_>) {}

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut PageContext<'_>) -> PageAction {
        PageAction::Ignored
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        feedback::render_coming_soon(self.title, self.description, self.phase, area, buf);
    }
}
