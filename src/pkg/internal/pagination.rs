/// 1-indexed pagination over the filtered job list. Out-of-range navigation
/// is clamped into a no-op rather than treated as a failure; a zero-item
/// list has zero pages and simply renders empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: usize,
    total_items: usize,
}

impl Paginator {
    pub fn new(total_items: usize, page_size: usize) -> Self {
        Paginator {
            current_page: 1,
            page_size: page_size.max(1),
            total_items,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Moves to `page` and returns true (the caller scrolls back to the top);
    /// requests outside `[1, total_pages]` leave the state untouched and
    /// return false.
    pub fn navigate(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// The filtered set changed underneath us; old page positions are
    /// meaningless, so start over at page 1.
    pub fn reset(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = 1;
    }

    pub fn first_index(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }

    /// Exclusive upper bound, not clamped against the item count.
    pub fn last_index(&self) -> usize {
        self.current_page * self.page_size
    }

    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let first = self.first_index().min(items.len());
        let last = self.last_index().min(items.len());
        &items[first..last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling_division() {
        assert_eq!(Paginator::new(12, 5).total_pages(), 3);
        assert_eq!(Paginator::new(10, 5).total_pages(), 2);
        assert_eq!(Paginator::new(1, 5).total_pages(), 1);
        assert_eq!(Paginator::new(0, 5).total_pages(), 0);
    }

    #[test]
    fn test_navigate_rejects_out_of_range() {
        let mut paginator = Paginator::new(12, 5);
        assert!(!paginator.navigate(0));
        assert_eq!(paginator.current_page(), 1);
        assert!(!paginator.navigate(4));
        assert_eq!(paginator.current_page(), 1);
        assert!(paginator.navigate(3));
        assert_eq!(paginator.current_page(), 3);
    }

    #[test]
    fn test_navigate_on_empty_list_stays_put() {
        let mut paginator = Paginator::new(0, 5);
        assert!(!paginator.navigate(1));
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn test_twelve_items_pages_of_five() {
        let items: Vec<usize> = (0..12).collect();
        let mut paginator = Paginator::new(items.len(), 5);
        assert_eq!(paginator.total_pages(), 3);

        assert_eq!(paginator.first_index(), 0);
        assert_eq!(paginator.last_index(), 5);
        assert_eq!(paginator.page_slice(&items), &items[0..5]);

        assert!(paginator.navigate(3));
        assert_eq!(paginator.first_index(), 10);
        assert_eq!(paginator.last_index(), 15);
        assert_eq!(paginator.page_slice(&items), &items[10..12]);
    }

    #[test]
    fn test_reset_returns_to_first_page() {
        let mut paginator = Paginator::new(30, 10);
        assert!(paginator.navigate(3));
        paginator.reset(4);
        assert_eq!(paginator.current_page(), 1);
        assert_eq!(paginator.total_pages(), 1);
    }

    #[test]
    fn test_invariant_holds_after_valid_navigation() {
        let mut paginator = Paginator::new(47, 10);
        for page in [5, 1, 3, 99, 0] {
            paginator.navigate(page);
            assert!(paginator.current_page() >= 1);
            assert!(paginator.current_page() <= paginator.total_pages().max(1));
        }
    }
}
