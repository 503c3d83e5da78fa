//! Command handlers for storing and removing the access token.
//!
//! Obtaining the token is left to the user, e.g. with `gcloud auth print-access-token` or the
//! OAuth playground, using the `https://www.googleapis.com/auth/spreadsheets` scope.

use crate::commands::Out;
use crate::session::TokenStore;
use crate::{Config, Result};
use anyhow::{ensure, Context};

/// Handles `expenses login`: stores `token` for the following commands.
pub async fn login(config: &Config, token: &str) -> Result<Out<()>> {
    ensure!(!token.trim().is_empty(), "The access token must not be empty");
    config
        .token_store()
        .set(token)
        .await
        .context("Unable to store the access token")?;
    Ok("Logged in".into())
}

/// Handles `expenses logout`: removes the stored token, if any.
pub async fn logout(config: &Config) -> Result<Out<()>> {
    config
        .token_store()
        .clear()
        .await
        .context("Unable to remove the access token")?;
    Ok("Logged out".into())
}
