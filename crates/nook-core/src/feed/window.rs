use super::source::Identified;
use std::collections::HashMap;

/// The loaded slice of one list view.
///
/// Items are unique by id and kept in arrival order. When a later page
/// repeats an id, the newer data replaces the old entry in place.
///
/// `page` is the last page loaded successfully; before the first load it
/// reads as 1 with no items.
#[derive(Debug, Clone)]
pub struct PageWindow<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
    loaded_page: u32,
    has_more: bool,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for PageWindow<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            loaded_page: 0,
            has_more: true,
            loading: false,
            error: None,
        }
    }
}

impl<T: Identified> PageWindow<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page(&self) -> u32 {
        self.loaded_page.max(1)
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    /// Page number the next continuation should request.
    pub(crate) fn next_page(&self) -> u32 {
        self.loaded_page + 1
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Back to an empty first page with more to load.
    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.index.clear();
        self.loaded_page = 0;
        self.has_more = true;
        self.loading = false;
        self.error = None;
    }

    /// Records a successfully fetched page.
    ///
    /// `has_more` stays true only when the page came back full.
    pub(crate) fn apply_page(&mut self, page: u32, fetched: Vec<T>, page_size: u32) {
        self.has_more = fetched.len() >= page_size as usize;
        self.merge(fetched);
        self.loaded_page = page;
        self.error = None;
    }

    fn merge(&mut self, fetched: Vec<T>) {
        for item in fetched {
            match self.index.get(item.id()) {
                Some(&pos) => self.items[pos] = item,
                None => {
                    self.index.insert(item.id().to_string(), self.items.len());
                    self.items.push(item);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        text: String,
    }

    impl Identified for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, text: &str) -> Row {
        Row {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_fresh_window() {
        let window: PageWindow<Row> = PageWindow::new();
        assert_eq!(window.page(), 1);
        assert!(window.has_more());
        assert!(window.is_empty());
        assert_eq!(window.next_page(), 1);
    }

    #[test]
    fn test_collision_keeps_first_position_and_latest_data() {
        let mut window = PageWindow::new();
        window.apply_page(1, vec![row("a", "a1"), row("b", "b1"), row("c", "c1")], 3);
        window.apply_page(2, vec![row("d", "d2"), row("b", "b2")], 3);

        let ids: Vec<_> = window.items().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(window.get("b").unwrap().text, "b2");
        assert_eq!(window.page(), 2);
        assert!(!window.has_more());
    }

    #[test]
    fn test_duplicates_within_one_page() {
        let mut window = PageWindow::new();
        window.apply_page(1, vec![row("a", "first"), row("a", "second")], 10);
        assert_eq!(window.len(), 1);
        assert_eq!(window.items()[0].text, "second");
    }

    #[test]
    fn test_full_page_keeps_has_more() {
        let mut window = PageWindow::new();
        window.apply_page(1, vec![row("a", ""), row("b", "")], 2);
        assert!(window.has_more());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut window = PageWindow::new();
        window.apply_page(1, vec![row("a", "")], 1);
        window.set_error(Some("boom".into()));
        window.reset();
        assert!(window.is_empty());
        assert!(window.get("a").is_none());
        assert!(window.error().is_none());
        assert_eq!(window.next_page(), 1);
    }
}
