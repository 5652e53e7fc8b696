//! Debounce timing modes

use crate::error::Error;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// When pending calls actually reach the callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DebounceMode {
    /// Trailing edge only. Every call restarts the delay; the callback runs
    /// once calls stop for the full delay.
    #[default]
    Timeout,
    /// A call that opens a new window runs immediately. Calls inside the
    /// window behave like `Timeout`.
    ImmediateAndTimeout,
    /// Leading edge like `ImmediateAndTimeout`, but calls inside the window
    /// never push the trailing call back. At most one call per delay,
    /// always with the freshest arguments.
    MaximumFrequency,
}

impl DebounceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebounceMode::Timeout => "timeout",
            DebounceMode::ImmediateAndTimeout => "immediate-and-timeout",
            DebounceMode::MaximumFrequency => "maximum-frequency",
        }
    }
}

impl fmt::Display for DebounceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebounceMode {
    type Err = Error;

    /// Accepts kebab-case, snake_case and PascalCase spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "timeout" => Ok(DebounceMode::Timeout),
            "immediateandtimeout" => Ok(DebounceMode::ImmediateAndTimeout),
            "maximumfrequency" => Ok(DebounceMode::MaximumFrequency),
            _ => Err(Error::invalid_argument("Unrecognized value", "mode", "DebounceMode::from_str")),
        }
    }
}
