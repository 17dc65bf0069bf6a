/// Fixed-size page windowing over an ordered sequence of known length.
///
/// Pages are 1-based. Requests outside the valid range clamp to the nearest
/// valid page, so every feed URL stays renderable; an empty sequence has
/// exactly one empty page.
use serde::Deserialize;

/// Query parameters shared by every paginated listing.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Paginator over a sequence of `total_count` items.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    total_count: i64,
    page_size: i64,
}

/// One resolved window: the SQL offset/limit pair plus page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub offset: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pager {
    pub fn new(total_count: i64, page_size: i64) -> Self {
        Self {
            total_count: total_count.max(0),
            page_size: page_size.max(1),
        }
    }

    /// Number of pages; never below 1 so the empty sequence renders a page.
    pub fn total_pages(&self) -> i64 {
        if self.total_count == 0 {
            1
        } else {
            (self.total_count + self.page_size - 1) / self.page_size
        }
    }

    /// Resolve a requested page into a window, clamping out-of-range
    /// requests to the nearest valid page. Deterministic: identical inputs
    /// produce identical windows.
    pub fn window(&self, requested_page: i64) -> PageWindow {
        let total_pages = self.total_pages();
        let page = requested_page.clamp(1, total_pages);
        let offset = (page - 1) * self.page_size;

        PageWindow {
            page,
            offset,
            limit: self.page_size,
            total_pages,
            total_count: self.total_count,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

impl PageWindow {
    /// Number of items this window will actually hold.
    pub fn len(&self) -> i64 {
        (self.total_count - self.offset).clamp(0, self.limit)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_items_split_ten_and_two() {
        let pager = Pager::new(12, 10);
        assert_eq!(pager.total_pages(), 2);

        let first = pager.window(1);
        assert_eq!(first.offset, 0);
        assert_eq!(first.limit, 10);
        assert_eq!(first.len(), 10);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let second = pager.window(2);
        assert_eq!(second.offset, 10);
        assert_eq!(second.len(), 2);
        assert!(!second.has_next);
        assert!(second.has_previous);
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let pager = Pager::new(25, 10);
        assert_eq!(pager.window(0).page, 1);
        assert_eq!(pager.window(-3).page, 1);
        assert_eq!(pager.window(99).page, 3);
        assert_eq!(pager.window(99).offset, 20);
        assert_eq!(pager.window(99).len(), 5);
    }

    #[test]
    fn empty_sequence_has_one_empty_page() {
        let pager = Pager::new(0, 10);
        assert_eq!(pager.total_pages(), 1);

        let window = pager.window(1);
        assert_eq!(window.page, 1);
        assert_eq!(window.len(), 0);
        assert!(window.is_empty());
        assert!(!window.has_next);
        assert!(!window.has_previous);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let pager = Pager::new(20, 10);
        assert_eq!(pager.total_pages(), 2);
        assert!(!pager.window(2).has_next);
        assert_eq!(pager.window(2).len(), 10);
    }

    #[test]
    fn windows_are_deterministic() {
        let pager = Pager::new(37, 10);
        assert_eq!(pager.window(3), pager.window(3));
    }
}
