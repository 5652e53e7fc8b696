//! Native event configuration

use fos_debounce::DebounceMode;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

/// Directive identifier used when none is configured
pub const DEFAULT_DIRECTIVE_NAME: &str = "native-event";

/// Prefix of the side-table key an attachment is stored under
pub const DEFAULT_PROP_NAME_PREFIX: &str = "native-event-";

/// Diagnostic verbosity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Native event configuration options.
///
/// Passed explicitly to [`NativeEvents::new`](crate::NativeEvents::new);
/// there is no process-wide instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NativeEventConfig {
    /// Identifier the lifecycle binding is registered under
    #[serde(rename = "debounceDirectiveName", alias = "directiveName")]
    pub directive_name: String,

    /// Diagnostic verbosity
    pub debug_log_level: LogLevel,

    /// Prefix of the per-event attachment key
    pub prop_name_prefix: String,

    /// Mode used when an attachment asks for debouncing without naming one
    pub default_debounce_mode: DebounceMode,
}

impl Default for NativeEventConfig {
    fn default() -> Self {
        Self {
            directive_name: DEFAULT_DIRECTIVE_NAME.to_string(),
            debug_log_level: LogLevel::default(),
            prop_name_prefix: DEFAULT_PROP_NAME_PREFIX.to_string(),
            default_debounce_mode: DebounceMode::default(),
        }
    }
}

impl NativeEventConfig {
    pub fn with_directive_name(mut self, name: &str) -> Self {
        self.directive_name = name.to_string();
        self
    }

    pub fn with_debug_log_level(mut self, level: LogLevel) -> Self {
        self.debug_log_level = level;
        self
    }

    pub fn with_prop_name_prefix(mut self, prefix: &str) -> Self {
        self.prop_name_prefix = prefix.to_string();
        self
    }

    pub fn with_default_debounce_mode(mut self, mode: DebounceMode) -> Self {
        self.default_debounce_mode = mode;
        self
    }

    /// Attachment key for an event: prefix followed by the event name
    pub fn prop_key(&self, event_type: &str) -> String {
        format!("{}{}", self.prop_name_prefix, event_type)
    }
}
