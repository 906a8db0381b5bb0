//! Multi-select checklist.

/// A fixed list of items with a cursor and a checked subset.
#[derive(Debug, Clone)]
pub struct Checklist {
    items: Vec<String>,
    checked: Vec<bool>,
    cursor: usize,
}

impl Checklist {
    /// All items start checked.
    pub fn new(items: Vec<String>) -> Self {
        let checked = vec![true; items.len()];
        Self {
            items,
            checked,
            cursor: 0,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = if self.cursor == 0 {
            self.items.len() - 1
        } else {
            self.cursor - 1
        };
    }

    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.items.len();
    }

    pub fn toggle_current(&mut self) {
        if let Some(flag) = self.checked.get_mut(self.cursor) {
            *flag = !*flag;
        }
    }

    pub fn select_all(&mut self) {
        self.checked.iter_mut().for_each(|flag| *flag = true);
    }

    pub fn clear_all(&mut self) {
        self.checked.iter_mut().for_each(|flag| *flag = false);
    }

    /// Checked items in list order.
    pub fn selected(&self) -> Vec<String> {
        self.items
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(item, _)| item.clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> Checklist {
        Checklist::new(vec![
            "BTCUSDT".to_string(),
            "ETHUSDT".to_string(),
            "BNBUSDT".to_string(),
        ])
    }

    #[test]
    fn test_starts_fully_selected() {
        let list = symbols();
        assert_eq!(list.selected_count(), 3);
        assert_eq!(list.selected(), vec!["BTCUSDT", "ETHUSDT", "BNBUSDT"]);
    }

    #[test]
    fn test_toggle_keeps_list_order() {
        let mut list = symbols();
        list.clear_all();
        list.move_up(); // wraps to BNBUSDT
        list.toggle_current();
        list.move_down(); // wraps to BTCUSDT
        list.toggle_current();
        assert_eq!(list.selected(), vec!["BTCUSDT", "BNBUSDT"]);
        list.toggle_current();
        assert_eq!(list.selected(), vec!["BNBUSDT"]);
    }

    #[test]
    fn test_select_all_and_clear_all() {
        let mut list = symbols();
        list.clear_all();
        assert_eq!(list.selected_count(), 0);
        assert!(!list.is_checked(0));
        list.select_all();
        assert_eq!(list.selected_count(), 3);
    }

    #[test]
    fn test_empty_list_is_inert() {
        let mut list = Checklist::new(Vec::new());
        list.move_down();
        list.move_up();
        list.toggle_current();
        assert!(list.selected().is_empty());
        assert!(!list.is_checked(0));
    }
}
