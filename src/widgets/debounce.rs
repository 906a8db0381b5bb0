//! Debounced text input.

use std::time::{Duration, Instant};

/// Text being typed plus the last value committed to its consumer.
///
/// Every edit reschedules the commit; [`DebouncedInput::poll`] commits once
/// the delay has passed without further edits.
#[derive(Debug, Clone)]
pub struct DebouncedInput {
    pending: String,
    committed: String,
    deadline: Option<Instant>,
    delay: Duration,
}

impl DebouncedInput {
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: String::new(),
            committed: String::new(),
            deadline: None,
            delay,
        }
    }

    pub fn push(&mut self, ch: char, now: Instant) {
        self.pending.push(ch);
        self.schedule(now);
    }

    pub fn pop(&mut self, now: Instant) {
        if self.pending.pop().is_some() {
            self.schedule(now);
        }
    }

    /// Replace the whole text, e.g. clearing the box.
    pub fn set(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = text.into();
        self.schedule(now);
    }

    fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Commit the pending text if the delay has elapsed.
    ///
    /// Returns the newly committed text only when it differs from the
    /// previous commit.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.commit(),
            _ => None,
        }
    }

    /// Commit immediately, cancelling the scheduled commit.
    pub fn flush(&mut self) -> Option<String> {
        self.commit()
    }

    fn commit(&mut self) -> Option<String> {
        self.deadline = None;
        if self.pending == self.committed {
            return None;
        }
        self.committed = self.pending.clone();
        Some(self.committed.clone())
    }

    /// Text as typed.
    pub fn value(&self) -> &str {
        &self.pending
    }

    /// Text the consumer currently filters with.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_commit_after_delay() {
        let start = Instant::now();
        let mut input = DebouncedInput::new(DELAY);
        input.push('b', start);
        input.push('t', start + Duration::from_millis(100));
        assert_eq!(input.value(), "bt");
        assert_eq!(input.poll(start + Duration::from_millis(350)), None);
        assert!(input.is_pending());
        assert_eq!(
            input.poll(start + Duration::from_millis(400)),
            Some("bt".to_string())
        );
        assert_eq!(input.committed(), "bt");
        assert!(!input.is_pending());
    }

    #[test]
    fn test_each_keystroke_reschedules() {
        let start = Instant::now();
        let mut input = DebouncedInput::new(DELAY);
        for (i, ch) in "eth".chars().enumerate() {
            let at = start + Duration::from_millis(200 * i as u64);
            assert_eq!(input.poll(at), None);
            input.push(ch, at);
        }
        assert_eq!(input.poll(start + Duration::from_millis(699)), None);
        assert_eq!(
            input.poll(start + Duration::from_millis(700)),
            Some("eth".to_string())
        );
    }

    #[test]
    fn test_unchanged_text_is_not_recommitted() {
        let start = Instant::now();
        let mut input = DebouncedInput::new(DELAY);
        input.push('x', start);
        input.pop(start);
        assert_eq!(input.poll(start + DELAY), None);
        assert!(!input.is_pending());
    }

    #[test]
    fn test_flush_commits_immediately() {
        let start = Instant::now();
        let mut input = DebouncedInput::new(DELAY);
        input.set("sol", start);
        assert_eq!(input.flush(), Some("sol".to_string()));
        assert_eq!(input.poll(start + DELAY), None);
    }

    #[test]
    fn test_pop_on_empty_does_not_schedule() {
        let mut input = DebouncedInput::new(DELAY);
        input.pop(Instant::now());
        assert!(!input.is_pending());
    }
}
