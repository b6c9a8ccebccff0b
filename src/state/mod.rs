//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: final outcome of a claimed URL (stored, disallowed, failed)

mod page_state;

// Re-export main types
pub use page_state::PageState;
