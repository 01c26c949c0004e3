//! Tools the agent can call.

mod search;

pub use search::{SearchArgs, SearchTool};

/// Number of chunks returned per search call.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;
