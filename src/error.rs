use thiserror::Error;

/// Closed set of failure kinds the browser distinguishes.
///
/// `Startup` is fatal and reported before the terminal enters raw mode.
/// `Fetch` and `Query` are always recovered locally: a fetch failure is
/// rendered as an inline panel, a query failure as a status-bar message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BrowseError {
    #[error("{0}")]
    Startup(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("query rejected: {0}")]
    Query(String),
}

impl BrowseError {
    pub fn startup(msg: impl std::fmt::Display) -> Self {
        BrowseError::Startup(msg.to_string())
    }

    pub fn fetch(msg: impl std::fmt::Display) -> Self {
        BrowseError::Fetch(msg.to_string())
    }

    pub fn query(msg: impl std::fmt::Display) -> Self {
        BrowseError::Query(msg.to_string())
    }
}
