//! CLI command handlers.

pub mod activity;
pub mod auth;
pub mod config;
pub mod projects;
pub mod subscriptions;
pub mod tasks;

use anyhow::{Result, bail};
use taskflow_pages::{FieldErrors, LoadState};

/// Fails with the first local or server-side field message.
fn check_form(errors: &FieldErrors) -> Result<()> {
    if let Some((field, message)) = errors.iter().next() {
        bail!("{field}: {message}");
    }
    Ok(())
}

/// Fails with the banner a page raised after a mutation.
fn check_banner(banner: Option<&str>) -> Result<()> {
    match banner {
        Some(message) => bail!("{message}"),
        None => Ok(()),
    }
}

fn check_load(load: &LoadState) -> Result<()> {
    if let Some(message) = load.error() {
        bail!("{message}");
    }
    Ok(())
}
