use std::env;

use anyhow::{Context, Result};

/// Words shown per topic when neither `--top` nor TOPICBRIDGE_TOP_N is given.
pub const DEFAULT_TOP_N: usize = 10;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command-line
/// flags override everything here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Language hint applied on convert when `--language` is absent.
    pub default_language: Option<String>,
    /// Words shown per topic by `show`.
    pub top_n: usize,
    /// Normalize topic and document distributions on convert.
    pub normalize: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default_language = lookup("TOPICBRIDGE_LANGUAGE").filter(|value| !value.trim().is_empty());

        let top_n = match lookup("TOPICBRIDGE_TOP_N") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("TOPICBRIDGE_TOP_N must be a whole number, got {raw:?}"))?,
            None => DEFAULT_TOP_N,
        };

        let normalize = match lookup("TOPICBRIDGE_NORMALIZE").as_deref().map(str::trim) {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => anyhow::bail!(
                "TOPICBRIDGE_NORMALIZE must be one of 1, 0, true, false; got {other:?}"
            ),
        };

        Ok(Self {
            default_language,
            top_n,
            normalize,
        })
    }
}
