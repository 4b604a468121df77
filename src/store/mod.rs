//! Reading-list store backends
//!
//! `instapaper` talks to the Instapaper Full API; `sim` is an in-memory store
//! with sample articles that needs no account.

mod instapaper;
mod oauth;
mod sim;

pub use instapaper::InstapaperStore;
pub use oauth::{signature_base_string, AccessToken, OAuthSigner};
pub use sim::SimStore;

use anyhow::{Context, Result};

use crate::config::{InstapaperCredentials, StoreConfig};
use crate::core::ReadingList;

/// Names accepted by `--provider`
pub const PROVIDERS: &[&str] = &["instapaper", "sim"];

/// Create the store selected by `config.provider`
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn ReadingList>> {
    match config.provider.to_lowercase().as_str() {
        "instapaper" => {
            let credentials = InstapaperCredentials::from_env()
                .context("Error initializing Instapaper client")?;
            let store = InstapaperStore::login(&credentials, config)
                .context("Error initializing Instapaper client")?;
            Ok(Box::new(store))
        }
        "sim" | "demo" => {
            tracing::info!("Using simulated reading list");
            Ok(Box::new(SimStore::sample()))
        }
        other => anyhow::bail!(
            "Unknown provider: '{}'. Supported providers: {}",
            other,
            PROVIDERS.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sim_store() {
        let config = StoreConfig {
            provider: "SIM".to_string(),
            ..Default::default()
        };
        let store = create_store(&config).unwrap();
        assert_eq!(store.name(), "sim");
        assert!(!store.fetch_bookmarks(25).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_provider() {
        let config = StoreConfig {
            provider: "pocket".to_string(),
            ..Default::default()
        };
        let err = create_store(&config).err().unwrap().to_string();
        assert!(err.contains("Unknown provider: 'pocket'"));
    }
}
