//! Column descriptors.
//!
//! A column knows how to read a sortable/searchable value out of a record
//! and how to turn the record into display text.

use std::cmp::Ordering;

/// Raw value of one cell, used for filtering and sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Text used by the global filter.
    pub fn search_text(&self) -> Option<String> {
        match self {
            CellValue::Text(text) => Some(text.to_lowercase()),
            CellValue::Number(value) => Some(value.to_string()),
            CellValue::Empty => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(text) => text.trim().parse().ok(),
            CellValue::Empty => None,
        }
    }

    fn as_text(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

/// How a column compares and aligns its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Locale-style string comparison, left aligned
    Text,
    /// Numeric comparison, right aligned
    Numeric,
    /// Display-only 1-based position in the derived view
    Rank,
}

type Accessor<R> = Box<dyn Fn(&R) -> CellValue>;
type Renderer<R> = Box<dyn Fn(&R) -> String>;

/// Describes one table column.
pub struct Column<R> {
    id: String,
    header: String,
    kind: ColumnKind,
    sortable: bool,
    searchable: bool,
    accessor: Accessor<R>,
    renderer: Option<Renderer<R>>,
}

impl<R: 'static> Column<R> {
    /// Text column: sortable and searchable, rendered as the raw text.
    pub fn text(
        id: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&R) -> String + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            kind: ColumnKind::Text,
            sortable: true,
            searchable: true,
            accessor: Box::new(move |record| CellValue::Text(accessor(record))),
            renderer: None,
        }
    }

    /// Numeric column: sortable, not searchable, right aligned.
    ///
    /// A `None` value is rendered as `-` and sorts last.
    pub fn numeric(
        id: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&R) -> Option<f64> + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            kind: ColumnKind::Numeric,
            sortable: true,
            searchable: false,
            accessor: Box::new(move |record| match accessor(record) {
                Some(value) => CellValue::Number(value),
                None => CellValue::Empty,
            }),
            renderer: None,
        }
    }

    /// Rank column: never sortable or searchable.
    pub fn rank(header: impl Into<String>) -> Self {
        Self {
            id: "rank".to_string(),
            header: header.into(),
            kind: ColumnKind::Rank,
            sortable: false,
            searchable: false,
            accessor: Box::new(|_| CellValue::Empty),
            renderer: None,
        }
    }

    /// Replace the display renderer.
    pub fn render_with(mut self, renderer: impl Fn(&R) -> String + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    #[allow(dead_code)] // Useful for columns whose order carries no meaning
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable && self.kind != ColumnKind::Rank;
        self
    }
}

impl<R> Column<R> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// Right alignment applies to numeric and rank columns.
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, ColumnKind::Numeric | ColumnKind::Rank)
    }

    pub fn value(&self, record: &R) -> CellValue {
        (self.accessor)(record)
    }

    /// Display text of a cell. `position` is the 0-based row position in
    /// the derived (filtered and sorted) view.
    pub fn render(&self, record: &R, position: usize) -> String {
        if self.kind == ColumnKind::Rank {
            return (position + 1).to_string();
        }
        if let Some(renderer) = &self.renderer {
            return renderer(record);
        }
        match self.value(record) {
            CellValue::Text(text) => text,
            CellValue::Number(value) => value.to_string(),
            CellValue::Empty => "-".to_string(),
        }
    }

    /// Compare two cell values according to this column's kind, ascending.
    ///
    /// Empty values are not handled here; see [`compare_cells`].
    pub(crate) fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        match self.kind {
            ColumnKind::Numeric => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            ColumnKind::Text | ColumnKind::Rank => compare_text(&a.as_text(), &b.as_text()),
        }
    }
}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("searchable", &self.searchable)
            .finish()
    }
}

/// Case-insensitive comparison; strings equal ignoring case order lowercase first.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Asset {
        name: &'static str,
        price: Option<f64>,
    }

    #[test]
    fn test_text_column_defaults() {
        let column = Column::text("name", "Name", |a: &Asset| a.name.to_string());
        assert!(column.is_sortable());
        assert!(column.is_searchable());
        assert!(!column.is_numeric());
        let asset = Asset { name: "Bitcoin", price: None };
        assert_eq!(column.render(&asset, 0), "Bitcoin");
    }

    #[test]
    fn test_numeric_column_renders_missing_as_dash() {
        let column = Column::numeric("price", "Price", |a: &Asset| a.price);
        assert!(column.is_numeric());
        assert!(!column.is_searchable());
        let asset = Asset { name: "X", price: None };
        assert_eq!(column.render(&asset, 0), "-");
        let priced = Asset { name: "X", price: Some(2.5) };
        assert_eq!(column.render(&priced, 0), "2.5");
    }

    #[test]
    fn test_rank_column_is_never_sortable() {
        let column: Column<Asset> = Column::rank("Rank").sortable(true);
        assert!(!column.is_sortable());
        let asset = Asset { name: "X", price: None };
        assert_eq!(column.render(&asset, 41), "42");
    }

    #[test]
    fn test_custom_renderer() {
        let column = Column::numeric("price", "Price", |a: &Asset| a.price)
            .render_with(|a: &Asset| format!("${:.2}", a.price.unwrap_or_default()));
        let asset = Asset { name: "X", price: Some(3.0) };
        assert_eq!(column.render(&asset, 0), "$3.00");
    }

    #[test]
    fn test_compare_text_ignores_case_first() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("a", "A"), Ordering::Less);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }
}
