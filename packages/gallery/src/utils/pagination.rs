use crate::models::catalog::{PageLink, Pagination};

/// Width of the visible page-number strip.
pub const PAGE_WINDOW_WIDTH: u64 = 5;

/// Compute pagination metadata for a zero-based `page`.
///
/// `page_size` must be non-zero.
pub fn paginate(page: u64, page_size: u64, total: u64) -> Pagination {
    let total_pages = total.div_ceil(page_size);
    Pagination {
        page,
        page_size,
        total,
        total_pages,
        has_next: page.saturating_add(1) < total_pages,
        has_previous: page > 0,
    }
}

/// Page-number strip centered on the current page, clamped to
/// `[1, total_pages]` and shifted left when it would overrun the end.
pub fn page_window(page: u64, total_pages: u64) -> Vec<PageLink> {
    let span = PAGE_WINDOW_WIDTH as i64 - 1;
    let current = page.saturating_add(1).min(i64::MAX as u64) as i64;
    let total_pages = total_pages.min(i64::MAX as u64) as i64;

    let mut start = (current - 2).max(1);
    let end = total_pages.min(start.saturating_add(span));
    if end - start < span {
        start = (end - span).max(1);
    }

    (start..=end)
        .map(|n| PageLink {
            page_index: (n - 1) as u64,
            display_number: n as u64,
            is_current: n == current,
        })
        .collect()
}
