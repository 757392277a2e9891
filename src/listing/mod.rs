//! Ideas listing model.
//!
//! # Data Flow
//! ```text
//! state store (key "ideaPageState")
//!     → store.rs (load, default on missing/corrupt)
//!     → state.rs (PageState transitions)
//!     → query.rs (page[number], page[size], sort, append[])
//!     → GET /api/ideas
//!     → model.rs (IdeasResponse)
//!     → pagination.rs (buttons + summary)
//!     → store.rs (save, last write wins)
//! ```

pub mod model;
pub mod pagination;
pub mod query;
pub mod state;
pub mod store;

pub use model::{IdeaPost, IdeasResponse};
pub use query::IdeasQuery;
pub use state::{ListingError, PageState, SortOrder, PAGE_SIZES};
pub use store::{load_page_state, save_page_state, JsonFileStore, MemoryStore, StateStore, StoreError, PAGE_STATE_KEY};
