//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::session::TokenStore;
use crate::Config;
use tempfile::TempDir;
use uuid::Uuid;

/// Test environment that sets up an expenses home directory with a Config and a stored access
/// token. Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment for a random spreadsheet, logged in with a fake token.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("expenses");

        let rand = Uuid::new_v4().to_string().replace('-', "");
        let sheet_url = format!("https://docs.google.com/spreadsheets/d/{rand}/edit#gid=0");
        let config = Config::create(&root, &sheet_url, None, None, None)
            .await
            .unwrap();
        config.token_store().set("test-token").await.unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Removes the stored access token.
    pub async fn logout(&self) {
        self.config.token_store().clear().await.unwrap();
    }
}
