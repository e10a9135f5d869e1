use std::path::PathBuf;

use url::Url;

use crate::error::{BuddyError, Result};

/// Avatar shown when the user has none, and after logout.
pub const DEFAULT_AVATAR_URL: &str = "https://www.gravatar.com/avatar/?d=mp";

/// Number of items requested per page by the paginated stores.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Configuration for the Bill Buddy client.
#[derive(Debug, Clone)]
pub struct BuddyConfig {
    /// Base URL of the REST backend (e.g. `https://api.billbuddy.app`).
    pub api_base_url: String,
    /// Items per page for groups, friends and activities.
    pub page_size: u32,
    /// Directory holding persisted store snapshots; `None` disables persistence.
    pub storage_dir: Option<PathBuf>,
    /// Placeholder avatar URL.
    pub avatar_placeholder: String,
}

impl BuddyConfig {
    /// Build a config for `api_base_url` with default page size and no persistence.
    ///
    /// # Errors
    ///
    /// Returns `BuddyError::Config` if the URL does not parse or is not http(s).
    pub fn new(api_base_url: &str) -> Result<Self> {
        let url = Url::parse(api_base_url)
            .map_err(|e| BuddyError::Config(format!("invalid API URL {api_base_url:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BuddyError::Config(format!(
                "unsupported API URL scheme: {}",
                url.scheme()
            )));
        }

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            storage_dir: None,
            avatar_placeholder: DEFAULT_AVATAR_URL.to_string(),
        })
    }

    /// Persist snapshots under `dir`.
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Default snapshot directory (`~/.billbuddy`).
    pub fn default_storage_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".billbuddy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = BuddyConfig::new("http://localhost:8080/").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_new_rejects_garbage() {
        assert!(matches!(
            BuddyConfig::new("not a url"),
            Err(BuddyError::Config(_))
        ));
        assert!(matches!(
            BuddyConfig::new("ftp://example.com"),
            Err(BuddyError::Config(_))
        ));
    }
}
