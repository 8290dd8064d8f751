use std::env;

use crate::view::{PAGE_SIZE_DEFAULT, PAGE_SIZE_OPTIONS};

static DEFAULT_API_URL: &str = "http://localhost:5000";
static ENV_API_URL: &str = "TASKDASH_API_URL";

/// Resolved runtime settings for the dashboard engine: where the task
/// backend lives and how many rows a fresh view shows.
#[derive(Debug, Clone)]
pub struct AppConfig {
    api_url: String,
    default_page_size: usize,
}

impl AppConfig {
    /// Resolve the backend endpoint using the provided override, the
    /// `TASKDASH_API_URL` environment variable, and the compiled default,
    /// in that order.
    pub fn discover(api_url_override: Option<String>) -> Self {
        let api_url = api_url_override
            .or_else(|| env::var(ENV_API_URL).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::from_parts(api_url, PAGE_SIZE_DEFAULT)
    }

    /// Construct [`AppConfig`] directly from resolved values. A page size
    /// outside the allowed set falls back to the default.
    pub fn from_parts(api_url: String, default_page_size: usize) -> Self {
        let default_page_size = if PAGE_SIZE_OPTIONS.contains(&default_page_size) {
            default_page_size
        } else {
            PAGE_SIZE_DEFAULT
        };
        Self {
            api_url,
            default_page_size,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_parts(DEFAULT_API_URL.to_string(), PAGE_SIZE_DEFAULT)
    }
}
