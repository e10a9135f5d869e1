//! Builds the [`Buddy`] stores from the environment.
//!
//! `BUDDY_API_URL` selects the backend, `BUDDY_STORAGE_DIR` the snapshot
//! directory and `BUDDY_PAGE_SIZE` the listing page size. A `.env` file is
//! honoured by `main` before this runs.

use std::path::PathBuf;

use buddy::{Buddy, BuddyConfig};
use tracing::info;

use crate::error::CliError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Build a config from optional raw settings, applying defaults.
pub fn config_from(
    api_url: Option<String>,
    storage_dir: Option<String>,
    page_size: Option<String>,
) -> Result<BuddyConfig, CliError> {
    let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let mut config = BuddyConfig::new(&api_url)?;

    let storage_dir = storage_dir
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(BuddyConfig::default_storage_dir);
    config = config.with_storage_dir(storage_dir);

    if let Some(raw) = page_size {
        config.page_size = match raw.trim().parse::<u32>() {
            Ok(size) if size > 0 => size,
            _ => {
                return Err(CliError::Usage(format!(
                    "BUDDY_PAGE_SIZE must be a positive integer, got {raw:?}"
                )))
            }
        };
    }
    Ok(config)
}

/// Read the environment and construct every store.
pub fn create_buddy() -> Result<Buddy, CliError> {
    let config = config_from(
        std::env::var("BUDDY_API_URL").ok(),
        std::env::var("BUDDY_STORAGE_DIR").ok(),
        std::env::var("BUDDY_PAGE_SIZE").ok(),
    )?;
    info!(api = %config.api_base_url, storage = ?config.storage_dir, "using backend");
    Ok(Buddy::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = config_from(None, None, None).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.page_size, buddy::config::DEFAULT_PAGE_SIZE);
        assert_eq!(config.storage_dir, Some(BuddyConfig::default_storage_dir()));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(
            Some("https://api.example.com/".into()),
            Some("/tmp/buddy".into()),
            Some("25".into()),
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/buddy")));
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(matches!(
            config_from(Some("ftp://example.com".into()), None, None),
            Err(CliError::Buddy(_))
        ));
        assert!(matches!(
            config_from(None, None, Some("0".into())),
            Err(CliError::Usage(_))
        ));
    }
}
