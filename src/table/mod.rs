//! Tabular display engine.
//!
//! Derives a filtered, sorted and paginated view over an in-memory record
//! set. Nothing here performs I/O; every operation is a synchronous
//! computation over the records and the current [`view::ViewState`].

pub mod column;
pub mod view;

pub use column::{Column, ColumnKind};
pub use view::{SortDirection, TableView};
