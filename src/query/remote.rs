//! Remote resource state held by a page.

use crate::api::FetchError;

/// Data of one query as the page sees it.
///
/// The last successful payload survives later failures; it is only
/// replaced by a newer success.
#[derive(Debug, Clone)]
pub struct Remote<T> {
    data: Option<T>,
    error: Option<FetchError>,
    loading: bool,
}

/// What a page should draw for a [`Remote`].
#[derive(Debug)]
pub enum RemoteView<'a, T> {
    /// Nothing requested yet
    Idle,
    /// First fetch in progress, nothing to show
    Loading,
    /// Failed with no earlier data
    Failed(&'a FetchError),
    /// Data available; `error` is set when a later refresh failed
    Ready {
        data: &'a T,
        error: Option<&'a FetchError>,
        refreshing: bool,
    },
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

impl<T> Remote<T> {
    /// Mark a fetch as started.
    pub fn begin(&mut self) {
        self.loading = true;
    }

    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.error = None;
        self.loading = false;
    }

    /// Record a failure without clearing earlier data.
    pub fn fail(&mut self, error: FetchError) {
        self.error = Some(error);
        self.loading = false;
    }

    /// Drop everything, e.g. when the query parameters change.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    #[allow(dead_code)] // Views read the error through `view()`
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> RemoteView<'_, T> {
        match (&self.data, &self.error) {
            (Some(data), error) => RemoteView::Ready {
                data,
                error: error.as_ref(),
                refreshing: self.loading,
            },
            (None, _) if self.loading => RemoteView::Loading,
            (None, Some(error)) => RemoteView::Failed(error),
            (None, None) => RemoteView::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_lifecycle() {
        let mut remote: Remote<Vec<u32>> = Remote::default();
        assert!(matches!(remote.view(), RemoteView::Idle));

        remote.begin();
        assert!(matches!(remote.view(), RemoteView::Loading));

        remote.succeed(vec![1, 2, 3]);
        match remote.view() {
            RemoteView::Ready { data, error, refreshing } => {
                assert_eq!(data, &vec![1, 2, 3]);
                assert!(error.is_none());
                assert!(!refreshing);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut remote = Remote::default();
        remote.begin();
        remote.succeed(vec!["BTCUSDT"]);
        remote.begin();
        remote.fail(FetchError::Network("connection reset".into()));

        match remote.view() {
            RemoteView::Ready { data, error, .. } => {
                assert_eq!(data, &vec!["BTCUSDT"]);
                assert!(error.unwrap().is_network());
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_failure_without_data() {
        let mut remote: Remote<Vec<u32>> = Remote::default();
        remote.begin();
        remote.fail(FetchError::Auth { status: 401 });
        assert!(matches!(remote.view(), RemoteView::Failed(FetchError::Auth { .. })));

        remote.begin();
        assert!(matches!(remote.view(), RemoteView::Loading));
    }

    #[test]
    fn test_success_clears_error() {
        let mut remote = Remote::default();
        remote.fail(FetchError::Timeout);
        remote.succeed(1);
        assert!(remote.error().is_none());
        assert_eq!(remote.data(), Some(&1));
        remote.clear();
        assert!(remote.data().is_none());
    }
}
