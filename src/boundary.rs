//! Route-level render guard.
//!
//! A page that panics while drawing is replaced by an error view for its
//! route only. The sidebar, header, status bar and other routes keep
//! working, and the fault stays until the route is reset.

use crate::ui::feedback;
use ratatui::{buffer::Buffer, layout::Rect};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Default)]
pub struct RouteBoundary {
    fault: Option<String>,
}

impl RouteBoundary {
    /// Run `render` inside the boundary.
    ///
    /// # Arguments
    /// * `route` - Route path, for the log
    /// * `area` - Area the page draws into
    /// * `buf` - Buffer to render to
    /// * `render` - Page drawing function
    ///
    /// # Details
    /// Once faulted, `render` is no longer called; the error view is drawn
    /// instead until [`RouteBoundary::reset`].
    pub fn guard(
        &mut self,
        route: &str,
        area: Rect,
        buf: &mut Buffer,
        render: impl FnOnce(Rect, &mut Buffer),
    ) {
        if self.fault.is_none() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| render(area, &mut *buf)));
            if let Err(payload) = outcome {
                let detail = panic_detail(payload.as_ref());
                tracing::error!(route, %detail, "page render failed");
                self.fault = Some(detail);
            }
        }
        if let Some(detail) = &self.fault {
            feedback::render_page_error(detail, area, buf);
        }
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    #[allow(dead_code)] // Useful for copying the fault into a bug report
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    pub fn reset(&mut self) {
        self.fault = None;
    }
}

pub(crate) fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_string()
    }
}
