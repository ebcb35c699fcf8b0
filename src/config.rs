//! Application-level configuration loading, including the session phase timings and limits.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZ_LIVE_BACK_CONFIG_PATH";

const DEFAULT_COUNTDOWN_MS: u64 = 3_000;
const DEFAULT_MAX_ACTIVE_SESSIONS_PER_QUIZ: usize = 10;
const DEFAULT_MAX_AUTO_START: usize = 50;
const DEFAULT_MAX_MESSAGE_LENGTH: usize = 100;
const DEFAULT_SSE_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    countdown: Duration,
    max_active_sessions_per_quiz: usize,
    max_auto_start: usize,
    max_message_length: usize,
    sse_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        countdown_ms = app_config.countdown.as_millis() as u64,
                        max_active_sessions_per_quiz = app_config.max_active_sessions_per_quiz,
                        "loaded session settings from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Buffer between advancing to a question and that question opening.
    pub fn countdown(&self) -> Duration {
        self.countdown
    }

    /// Maximum number of sessions of one quiz that may be active at once.
    pub fn max_active_sessions_per_quiz(&self) -> usize {
        self.max_active_sessions_per_quiz
    }

    /// Highest accepted auto-start threshold.
    pub fn max_auto_start(&self) -> usize {
        self.max_auto_start
    }

    /// Longest accepted chat message, in characters.
    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }

    /// Buffer size of the public event stream.
    pub fn sse_capacity(&self) -> usize {
        self.sse_capacity
    }

    /// Same settings with a different countdown.
    pub fn with_countdown(mut self, countdown: Duration) -> Self {
        self.countdown = countdown;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            countdown: Duration::from_millis(DEFAULT_COUNTDOWN_MS),
            max_active_sessions_per_quiz: DEFAULT_MAX_ACTIVE_SESSIONS_PER_QUIZ,
            max_auto_start: DEFAULT_MAX_AUTO_START,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            sse_capacity: DEFAULT_SSE_CAPACITY,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    countdown_ms: Option<u64>,
    max_active_sessions_per_quiz: Option<usize>,
    max_auto_start: Option<usize>,
    max_message_length: Option<usize>,
    sse_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            countdown: value
                .countdown_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.countdown),
            max_active_sessions_per_quiz: value
                .max_active_sessions_per_quiz
                .unwrap_or(defaults.max_active_sessions_per_quiz),
            max_auto_start: value.max_auto_start.unwrap_or(defaults.max_auto_start),
            max_message_length: value
                .max_message_length
                .unwrap_or(defaults.max_message_length),
            // a zero-sized broadcast channel panics on creation
            sse_capacity: value
                .sse_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.sse_capacity),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
