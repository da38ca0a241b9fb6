use log::warn;
use std::env;
use std::time::Duration;

use crate::blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

/// Runtime settings read from the environment. The binaries load `.env`
/// before building these.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    /// Per-block mining deadline for the HTTP sandbox; `None` disables it.
    pub mine_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            difficulty: DEFAULT_DIFFICULTY,
            mine_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl Settings {
    /// Read `HOST`, `PORT`, `DIFFICULTY` and `MINE_TIMEOUT_SECS`. Missing or
    /// unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = parse_or(&lookup, "PORT", defaults.port);

        let mut difficulty = parse_or(&lookup, "DIFFICULTY", defaults.difficulty);
        if difficulty > MAX_DIFFICULTY {
            warn!("DIFFICULTY={difficulty} too high for the sandbox, capping at {MAX_DIFFICULTY}");
            difficulty = MAX_DIFFICULTY;
        }

        let mine_timeout = match parse_or(&lookup, "MINE_TIMEOUT_SECS", 30u64) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            host,
            port,
            difficulty,
            mine_timeout,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}");
            default
        }),
        None => default,
    }
}
