//! Date range state and the keyboard picker around it.

use crate::format::display_date;
use chrono::{Duration, Months, NaiveDate};

/// Quick ranges offered by the picker, in days back from today.
pub const PRESET_DAYS: [i64; 4] = [7, 30, 90, 365];

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Range ending `today` and starting `days` earlier.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self {
            start: today - Duration::days(days),
            end: today,
        }
    }

    /// The year up to `today`.
    pub fn last_year(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_months(Months::new(12))
            .unwrap_or(today - Duration::days(365));
        Self { start, end: today }
    }

    /// "dd/mm/yyyy - dd/mm/yyyy"
    pub fn label(&self) -> String {
        format!("{} - {}", display_date(self.start), display_date(self.end))
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Which end of the range the arrow keys move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Start,
    End,
}

/// Editable range bounded by `today`.
///
/// Dates after `today` are never selectable and `start` never passes
/// `end`.
#[derive(Debug, Clone)]
pub struct DateRangePicker {
    range: DateRange,
    today: NaiveDate,
    field: RangeField,
}

impl DateRangePicker {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            range: DateRange::last_year(today),
            today,
            field: RangeField::Start,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn field(&self) -> RangeField {
        self.field
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            RangeField::Start => RangeField::End,
            RangeField::End => RangeField::Start,
        };
    }

    /// Move the active bound by `days`.
    ///
    /// # Returns
    /// * `bool` - Whether the range changed
    pub fn shift(&mut self, days: i64) -> bool {
        let before = self.range;
        match self.field {
            RangeField::Start => {
                let moved = self.range.start + Duration::days(days);
                self.range.start = moved.min(self.range.end);
            }
            RangeField::End => {
                let moved = self.range.end + Duration::days(days);
                self.range.end = moved.min(self.today).max(self.range.start);
            }
        }
        self.range != before
    }

    /// Apply preset `index` from [`PRESET_DAYS`].
    pub fn apply_preset(&mut self, index: usize) -> bool {
        let Some(days) = PRESET_DAYS.get(index) else {
            return false;
        };
        let before = self.range;
        self.range = DateRange::last_days(self.today, *days);
        self.range != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_is_last_year() {
        let picker = DateRangePicker::new(day(2024, 6, 30));
        assert_eq!(picker.range().start, day(2023, 6, 30));
        assert_eq!(picker.range().end, day(2024, 6, 30));
    }

    #[test]
    fn test_last_year_from_leap_day() {
        let range = DateRange::last_year(day(2024, 2, 29));
        assert_eq!(range.start, day(2023, 2, 28));
    }

    #[test]
    fn test_end_cannot_pass_today() {
        let mut picker = DateRangePicker::new(day(2024, 6, 30));
        picker.toggle_field();
        assert!(!picker.shift(1));
        assert_eq!(picker.range().end, day(2024, 6, 30));
        assert!(picker.shift(-2));
        assert_eq!(picker.range().end, day(2024, 6, 28));
    }

    #[test]
    fn test_start_cannot_pass_end() {
        let mut picker = DateRangePicker::new(day(2024, 6, 30));
        assert!(picker.apply_preset(0));
        assert!(picker.shift(30));
        assert_eq!(picker.range().start, day(2024, 6, 30));
        assert_eq!(picker.range().days(), 0);

        picker.toggle_field();
        assert!(!picker.shift(-5));
        assert_eq!(picker.range().end, day(2024, 6, 30));
    }

    #[test]
    fn test_presets() {
        let mut picker = DateRangePicker::new(day(2024, 6, 30));
        assert!(picker.apply_preset(1));
        assert_eq!(picker.range().start, day(2024, 5, 31));
        assert_eq!(picker.range().days(), 30);
        assert!(!picker.apply_preset(1));
        assert!(!picker.apply_preset(PRESET_DAYS.len()));
    }

    #[test]
    fn test_label() {
        let range = DateRange::last_days(day(2024, 1, 8), 7);
        assert_eq!(range.label(), "01/01/2024 - 08/01/2024");
    }
}
