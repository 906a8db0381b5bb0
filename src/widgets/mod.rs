//! Input state shared by pages. Rendering lives in `ui`.

pub mod checklist;
pub mod date_range;
pub mod debounce;

pub use checklist::Checklist;
pub use date_range::{DateRange, DateRangePicker, PRESET_DAYS, RangeField};
pub use debounce::DebouncedInput;
