//! This modules defines the common functionality for paging through lists of resources.

use serde::Deserialize;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of items to return when a request does not specify a limit.
    pub default_limit: u64,
    /// The largest number of items a single request may ask for.
    ///
    /// Larger limits are clamped to this value.
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

/// The `skip` and `limit` query parameters accepted by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// The number of items to skip from the start of the list.
    pub skip: Option<u64>,
    /// The maximum number of items to return.
    pub limit: Option<u64>,
}

/// A resolved page window, ready to be bound to `LIMIT ? OFFSET ?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The number of rows to skip.
    pub offset: i64,
    /// The maximum number of rows to return.
    pub limit: i64,
}

impl PageParams {
    /// Fill in defaults from `config` and clamp the limit to the configured maximum.
    pub fn resolve(&self, config: &PaginationConfig) -> Page {
        let limit = self
            .limit
            .unwrap_or(config.default_limit)
            .min(config.max_limit);
        let offset = self.skip.unwrap_or(0);

        Page {
            offset: i64::try_from(offset).unwrap_or(i64::MAX),
            limit: i64::try_from(limit).unwrap_or(i64::MAX),
        }
    }
}
