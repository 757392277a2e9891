//! Upstream query built from the page state.

use url::form_urlencoded;

use crate::listing::state::PageState;

/// Image sizes requested alongside every page.
pub const APPENDED_IMAGES: [&str; 2] = ["small_image", "medium_image"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeasQuery {
    pub page: u32,
    pub size: u32,
    pub sort: &'static str,
}

impl From<&PageState> for IdeasQuery {
    fn from(state: &PageState) -> Self {
        Self {
            page: state.current_page,
            size: state.items_per_page,
            sort: state.sort_by.as_param(),
        }
    }
}

impl IdeasQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page[number]", self.page.to_string()),
            ("page[size]", self.size.to_string()),
            ("sort", self.sort.to_string()),
        ];
        pairs.extend(APPENDED_IMAGES.iter().map(|image| ("append[]", image.to_string())));
        pairs
    }

    /// Form-encoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}
