//! Derived table view: filter, sort, paginate.

use super::column::{CellValue, Column};
use std::cmp::Ordering;

/// Sort direction of the active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// Column currently driving the sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Transient view inputs held for the lifetime of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub sort: Option<SortState>,
    pub filter: String,
    pub page_index: usize,
    pub page_size: usize,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: None,
            filter: String::new(),
            page_index: 0,
            page_size: page_size.max(1),
        }
    }
}

/// One row of the current page.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a, R> {
    /// 0-based position in the filtered and sorted view
    pub position: usize,
    pub record: &'a R,
}

/// Record set plus column descriptors plus view state.
///
/// The derived view is recomputed on every query and never cached, so it
/// cannot drift from the records or the view state.
#[derive(Debug)]
pub struct TableView<R> {
    records: Vec<R>,
    columns: Vec<Column<R>>,
    state: ViewState,
    empty_message: String,
}

impl<R> TableView<R> {
    pub fn new(columns: Vec<Column<R>>, page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            columns,
            state: ViewState::new(page_size),
            empty_message: "No data available".to_string(),
        }
    }

    /// Message shown as the single placeholder row of an empty view.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn empty_message(&self) -> &str {
        &self.empty_message
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Swap the column set, dropping the sort if its column disappeared.
    pub fn set_columns(&mut self, columns: Vec<Column<R>>) {
        self.columns = columns;
        if let Some(sort) = &self.state.sort
            && !self.columns.iter().any(|c| c.id() == sort.column)
        {
            self.state.sort = None;
        }
    }

    #[allow(dead_code)] // Useful for persisting the view between sessions
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Replace the whole record set. Filter and sort are kept; the page
    /// goes back to the first one.
    pub fn replace_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.state.page_index = 0;
    }

    /// Restore default view state, keeping the records.
    #[allow(dead_code)] // Useful for a "clear filters" key binding
    pub fn reset(&mut self) {
        self.state = ViewState::new(self.state.page_size);
    }

    #[cfg(test)]
    pub fn global_filter(&self) -> &str {
        &self.state.filter
    }

    /// Set the free-text filter and go back to the first page.
    pub fn set_global_filter(&mut self, text: impl Into<String>) {
        self.state.filter = text.into();
        self.state.page_index = 0;
    }

    /// Cycle the sort of a column: none, ascending, descending, none.
    ///
    /// Sorting a different column replaces the previous sort. Unknown and
    /// non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, column_id: &str) {
        let Some(column) = self.columns.iter().find(|c| c.id() == column_id) else {
            return;
        };
        if !column.is_sortable() {
            return;
        }

        let current = self
            .state
            .sort
            .as_ref()
            .filter(|s| s.column == column_id)
            .map(|s| s.direction);

        self.state.sort = match current {
            None => Some(SortState {
                column: column_id.to_string(),
                direction: SortDirection::Ascending,
            }),
            Some(SortDirection::Ascending) => Some(SortState {
                column: column_id.to_string(),
                direction: SortDirection::Descending,
            }),
            Some(SortDirection::Descending) => None,
        };
    }

    /// Toggle the sort of the column at `index` (0-based).
    pub fn toggle_sort_at(&mut self, index: usize) {
        if let Some(id) = self.columns.get(index).map(|c| c.id().to_string()) {
            self.toggle_sort(&id);
        }
    }

    #[allow(dead_code)] // Useful for persisting the view between sessions
    pub fn sort_state(&self) -> Option<&SortState> {
        self.state.sort.as_ref()
    }

    /// Direction for `column_id` if it is the sorted column.
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.state
            .sort
            .as_ref()
            .filter(|s| s.column == column_id)
            .map(|s| s.direction)
    }

    /// Move to `index`, clamped into `[0, page_count - 1]`.
    pub fn set_page(&mut self, index: isize) {
        let last = self.page_count() - 1;
        self.state.page_index = if index < 0 {
            0
        } else {
            (index as usize).min(last)
        };
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.page_index as isize + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.state.page_index as isize - 1);
    }

    pub fn first_page(&mut self) {
        self.set_page(0);
    }

    pub fn last_page(&mut self) {
        self.set_page(isize::MAX);
    }

    pub fn page_index(&self) -> usize {
        self.state.page_index
    }

    /// Number of pages; at least one even for an empty view.
    pub fn page_count(&self) -> usize {
        self.filtered_count().div_ceil(self.state.page_size).max(1)
    }

    pub fn can_previous_page(&self) -> bool {
        self.state.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.state.page_index + 1 < self.page_count()
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    /// Rows matching the filter, before pagination.
    pub fn filtered_count(&self) -> usize {
        let needle = self.state.filter.to_lowercase();
        if needle.is_empty() {
            return self.records.len();
        }
        self.records
            .iter()
            .filter(|record| self.matches(record, &needle))
            .count()
    }

    /// The filtered, sorted and paginated slice of records.
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_, R>> {
        let start = self.state.page_index * self.state.page_size;
        self.derived_order()
            .into_iter()
            .enumerate()
            .skip(start)
            .take(self.state.page_size)
            .map(|(position, index)| VisibleRow {
                position,
                record: &self.records[index],
            })
            .collect()
    }

    /// Whether the body should show the "no results" placeholder.
    pub fn is_view_empty(&self) -> bool {
        self.filtered_count() == 0
    }

    /// Indices into `records`, filtered then stably sorted.
    fn derived_order(&self) -> Vec<usize> {
        let needle = self.state.filter.to_lowercase();
        let indices = (0..self.records.len())
            .filter(|&i| needle.is_empty() || self.matches(&self.records[i], &needle));

        let sort_column = self.state.sort.as_ref().and_then(|sort| {
            self.columns
                .iter()
                .find(|c| c.id() == sort.column)
                .map(|column| (column, sort.direction))
        });

        let Some((column, direction)) = sort_column else {
            return indices.collect();
        };

        let mut keyed: Vec<(usize, CellValue)> = indices
            .map(|i| (i, column.value(&self.records[i])))
            .collect();
        // slice::sort_by is stable: ties keep input order in both directions
        keyed.sort_by(|(_, a), (_, b)| compare_cells(column, a, b, direction));
        keyed.into_iter().map(|(i, _)| i).collect()
    }

    fn matches(&self, record: &R, needle: &str) -> bool {
        self.columns
            .iter()
            .filter(|c| c.is_searchable())
            .filter_map(|c| c.value(record).search_text())
            .any(|text| text.contains(needle))
    }
}

/// Empty cells sort last whatever the direction.
fn compare_cells<R>(
    column: &Column<R>,
    a: &CellValue,
    b: &CellValue,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
        (CellValue::Empty, _) => Ordering::Greater,
        (_, CellValue::Empty) => Ordering::Less,
        _ => {
            let ordering = column.compare(a, b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}
