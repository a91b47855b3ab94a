// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

pub mod page;

pub use page::{fetch_text, get_text_with_retry};

const USER_AGENT: &str = concat!("card_age/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client shared by every fetch in a run.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .cookie_store(true)
        .gzip(true)
        .build()
        .context("building HTTP client")
}
