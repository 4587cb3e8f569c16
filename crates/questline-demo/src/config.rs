//! Environment-driven demo configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::DemoError;

const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_MAX_TICKS: u32 = 50;

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Manifest to load; the bundled key quest manifest when unset.
    pub manifest: Option<PathBuf>,
    /// Wall-clock time between ticks.
    pub tick_interval: Duration,
    /// Upper bound on ticks before the demo gives up.
    pub max_ticks: u32,
    /// Quest to start; the first manifest entry when unset.
    pub quest: Option<String>,
}

impl DemoConfig {
    /// Reads `QUESTLINE_MANIFEST`, `QUESTLINE_TICK_MS`, `QUESTLINE_MAX_TICKS`
    /// and `QUESTLINE_QUEST` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::Config` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, DemoError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DemoConfig::from_env`] with an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::Config` if a numeric variable does not parse or
    /// the tick interval is zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DemoError> {
        let tick_ms: u64 = match lookup("QUESTLINE_TICK_MS") {
            Some(raw) => raw
                .parse()
                .map_err(|e| DemoError::Config(format!("QUESTLINE_TICK_MS must be a valid u64: {e}")))?,
            None => DEFAULT_TICK_MS,
        };
        if tick_ms == 0 {
            return Err(DemoError::Config(
                "QUESTLINE_TICK_MS must be greater than zero".to_owned(),
            ));
        }
        let max_ticks: u32 = match lookup("QUESTLINE_MAX_TICKS") {
            Some(raw) => raw.parse().map_err(|e| {
                DemoError::Config(format!("QUESTLINE_MAX_TICKS must be a valid u32: {e}"))
            })?,
            None => DEFAULT_MAX_TICKS,
        };

        Ok(Self {
            manifest: lookup("QUESTLINE_MANIFEST")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            tick_interval: Duration::from_millis(tick_ms),
            max_ticks,
            quest: lookup("QUESTLINE_QUEST").filter(|q| !q.is_empty()),
        })
    }
}
