/// Page state definitions for tracking per-URL crawl outcomes
///
/// Every claimed URL ends in exactly one of these states when its worker marks
/// it complete.
use std::fmt;

/// Final state of a claimed URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Fetched and handed to the sink successfully
    Stored,

    /// Fetched, but the sink rejected the page
    StoreFailed,

    /// Host excluded by its robots.txt; never fetched
    Disallowed,

    /// Fetch failed (network, timeout or non-success status); abandoned
    FetchFailed,
}

impl PageState {
    /// Returns true if the page body was fetched
    pub fn was_fetched(&self) -> bool {
        matches!(self, Self::Stored | Self::StoreFailed)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::StoreFailed | Self::FetchFailed)
    }

    /// Stable lowercase label used in logs and the final report
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::StoreFailed => "store_failed",
            Self::Disallowed => "disallowed",
            Self::FetchFailed => "fetch_failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> [Self; 4] {
        [
            Self::Stored,
            Self::StoreFailed,
            Self::Disallowed,
            Self::FetchFailed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
