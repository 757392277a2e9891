//! Listing page state: current page, page size, sort order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page sizes offered by the listing page.
pub const PAGE_SIZES: [u32; 3] = [10, 20, 50];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("page size {0} is not one of 10, 20, 50")]
    InvalidPageSize(u32),

    #[error("unknown sort order '{0}' (expected newest or oldest)")]
    InvalidSort(String),
}

/// Sort order, serialized as the upstream `sort` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "-published_at")]
    Newest,
    #[serde(rename = "published_at")]
    Oldest,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Newest => "-published_at",
            SortOrder::Oldest => "published_at",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortOrder {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "-published_at" => Ok(SortOrder::Newest),
            "oldest" | "published_at" => Ok(SortOrder::Oldest),
            _ => Err(ListingError::InvalidSort(s.to_string())),
        }
    }
}

/// The record stored under `ideaPageState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub current_page: u32,
    pub items_per_page: u32,
    pub sort_by: SortOrder,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: PAGE_SIZES[0],
            sort_by: SortOrder::Newest,
        }
    }
}

impl PageState {
    /// Repair values a stale or hand-edited record may hold.
    pub fn normalized(mut self) -> Self {
        if self.current_page == 0 {
            self.current_page = 1;
        }
        if !PAGE_SIZES.contains(&self.items_per_page) {
            self.items_per_page = PAGE_SIZES[0];
        }
        self
    }

    /// Change the page size and go back to the first page.
    pub fn set_items_per_page(&mut self, size: u32) -> Result<(), ListingError> {
        if !PAGE_SIZES.contains(&size) {
            return Err(ListingError::InvalidPageSize(size));
        }
        self.items_per_page = size;
        self.current_page = 1;
        Ok(())
    }

    /// Change the sort order and go back to the first page.
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort_by = sort;
        self.current_page = 1;
    }

    /// Jump to `page`, clamped to `1..=last_page`.
    pub fn go_to(&mut self, page: u32, last_page: u32) {
        self.current_page = page.clamp(1, last_page.max(1));
    }

    pub fn next(&mut self, last_page: u32) {
        if self.current_page < last_page {
            self.current_page += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_page_keys() {
        let state = PageState {
            current_page: 3,
            items_per_page: 20,
            sort_by: SortOrder::Oldest,
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"currentPage": 3, "itemsPerPage": 20, "sortBy": "published_at"})
        );
    }

    #[test]
    fn changing_size_or_sort_resets_page() {
        let mut state = PageState { current_page: 7, ..PageState::default() };
        state.set_items_per_page(50).unwrap();
        assert_eq!((state.current_page, state.items_per_page), (1, 50));

        state.current_page = 4;
        state.set_sort(SortOrder::Oldest);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn rejects_unknown_page_size() {
        let mut state = PageState::default();
        assert_eq!(state.set_items_per_page(15), Err(ListingError::InvalidPageSize(15)));
        assert_eq!(state, PageState::default());
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut state = PageState::default();
        state.prev();
        assert_eq!(state.current_page, 1);

        state.go_to(99, 5);
        assert_eq!(state.current_page, 5);
        state.next(5);
        assert_eq!(state.current_page, 5);

        state.go_to(0, 5);
        assert_eq!(state.current_page, 1);
        state.next(5);
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn parses_sort_names() {
        assert_eq!("Newest".parse::<SortOrder>(), Ok(SortOrder::Newest));
        assert_eq!("published_at".parse::<SortOrder>(), Ok(SortOrder::Oldest));
        assert!("title".parse::<SortOrder>().is_err());
    }

    #[test]
    fn normalizes_bad_records() {
        let state = PageState {
            current_page: 0,
            items_per_page: 7,
            sort_by: SortOrder::Oldest,
        }
        .normalized();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.items_per_page, 10);
        assert_eq!(state.sort_by, SortOrder::Oldest);
    }
}
