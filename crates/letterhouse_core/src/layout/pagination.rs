//! Page split and navigation for window collections.
//!
//! # Invariants
//! - Items are ordered by ascending grid position before slicing.
//! - There is always at least one page, even for an empty collection.
//! - A page outside `[1, total_pages]` resolves to page 1.

use crate::layout::SLOTS_PER_PAGE;
use crate::model::window::Window;
use log::debug;

pub const DEFAULT_PAGE_SIZE: usize = SLOTS_PER_PAGE;

/// Anything that occupies a sequential grid position.
pub trait GridPositioned {
    fn grid_position(&self) -> u32;
}

impl GridPositioned for Window {
    fn grid_position(&self) -> u32 {
        self.grid_position
    }
}

/// One page worth of items plus navigation flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// 1-based page actually served after clamping.
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Falls back to [`DEFAULT_PAGE_SIZE`] for a zero page size.
pub fn normalize_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    }
}

/// `ceil(count / page_size)`, never less than 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(normalize_page_size(page_size)).max(1)
}

/// Returns `page` when it lies in `[1, total_pages]`, otherwise 1.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    if (1..=total_pages).contains(&page) {
        page
    } else {
        1
    }
}

/// Returns references to `items` sorted by ascending grid position.
pub fn sort_by_position<T: GridPositioned>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| item.grid_position());
    sorted
}

/// Splits `items` into consecutive pages of `page_size`.
pub fn paginate<T: GridPositioned>(items: &[T], page_size: usize) -> Vec<Vec<&T>> {
    let sorted = sort_by_position(items);
    if sorted.is_empty() {
        return vec![Vec::new()];
    }
    sorted
        .chunks(normalize_page_size(page_size))
        .map(<[&T]>::to_vec)
        .collect()
}

/// Items `[(page-1)*page_size, page*page_size)` of the sorted collection.
pub fn current_page<T: GridPositioned>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = normalize_page_size(page_size);
    let total = total_pages(items.len(), page_size);
    let served = clamp_page(page, total);
    if served != page {
        debug!(
            "event=page_clamp module=layout status=ok requested={} served={} total={}",
            page, served, total
        );
    }

    let start = (served - 1) * page_size;
    let items = sort_by_position(items)
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    Page {
        items,
        page: served,
        total_pages: total,
    }
}

/// View-local page state with bounded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    pub fn new() -> Self {
        Self { page: 1 }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Advances one page if another page exists. Returns whether it moved.
    pub fn next(&mut self, total_pages: usize) -> bool {
        if self.page < total_pages {
            self.page += 1;
            return true;
        }
        false
    }

    /// Steps back one page unless already on page 1. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            return true;
        }
        false
    }

    /// Re-applies the clamp rule after the collection changed.
    ///
    /// Returns `true` when the cursor was reset.
    pub fn sync(&mut self, total_pages: usize) -> bool {
        let clamped = clamp_page(self.page, total_pages);
        let changed = clamped != self.page;
        self.page = clamped;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_page, normalize_page_size, total_pages, PageCursor};

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0, 9), 1);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
        assert_eq!(total_pages(18, 9), 2);
        assert_eq!(total_pages(19, 9), 3);
    }

    #[test]
    fn zero_page_size_uses_default() {
        assert_eq!(normalize_page_size(0), 9);
        assert_eq!(total_pages(10, 0), 2);
    }

    #[test]
    fn clamp_resets_out_of_range_to_first_page() {
        assert_eq!(clamp_page(5, 2), 1);
        assert_eq!(clamp_page(0, 2), 1);
        assert_eq!(clamp_page(2, 2), 2);
    }

    #[test]
    fn cursor_navigation_is_bounded() {
        let mut cursor = PageCursor::new();
        assert!(!cursor.previous());
        assert!(cursor.next(2));
        assert!(!cursor.next(2));
        assert_eq!(cursor.page(), 2);

        assert!(cursor.sync(1));
        assert_eq!(cursor.page(), 1);
        assert!(!cursor.sync(1));
    }
}
