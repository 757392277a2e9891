//! Pagination controls: which page buttons to show and the range summary.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageButton::Page(n) => write!(f, "{n}"),
            PageButton::Ellipsis => f.write_str("..."),
        }
    }
}

/// First page, last page, and the current page ±1 as buttons; an ellipsis at
/// current ±2. Nothing at all when there is a single page.
pub fn page_buttons(current: u32, total_pages: u32) -> Vec<PageButton> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let current = i64::from(current);
    (1..=total_pages)
        .filter_map(|page| {
            let i = i64::from(page);
            if page == 1 || page == total_pages || (i >= current - 1 && i <= current + 1) {
                Some(PageButton::Page(page))
            } else if i == current - 2 || i == current + 2 {
                Some(PageButton::Ellipsis)
            } else {
                None
            }
        })
        .collect()
}

/// `Showing X - Y of Z items`.
pub fn summary(current: u32, per_page: u32, total: u32) -> String {
    if total == 0 {
        return "Showing 0 - 0 of 0 items".to_string();
    }
    let start = current.saturating_sub(1).saturating_mul(per_page).saturating_add(1);
    let end = start.saturating_add(per_page.saturating_sub(1)).min(total);
    format!("Showing {start} - {end} of {total} items")
}
