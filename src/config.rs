//! Runtime configuration for the task services.
//!
//! Hosts usually build a [`ServiceConfig`] once at start-up, either from
//! [`ServiceConfig::default`] or from the environment, and hand it to
//! [`crate::task::services::TaskService`] and
//! [`crate::attachment::services::AttachmentStore`].

use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the per-file upload limit in bytes.
pub const MAX_ATTACHMENT_BYTES_ENV: &str = "TASKDECK_MAX_ATTACHMENT_BYTES";
/// Environment variable setting the base URL prefixed to storage locators.
pub const LOCATOR_BASE_URL_ENV: &str = "TASKDECK_LOCATOR_BASE_URL";
/// Environment variable overriding the I/O timeout in milliseconds.
pub const IO_TIMEOUT_MS_ENV: &str = "TASKDECK_IO_TIMEOUT_MS";

/// Default per-file upload limit (10 MiB).
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;
/// Default time budget for a single persistence call.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        /// Name of the offending variable.
        variable: &'static str,
        /// The raw value found.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Limits applied to uploaded files before they are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    /// Largest accepted payload in bytes, inclusive.
    pub max_file_bytes: u64,
    /// Prefix for storage locators, without a trailing slash.
    pub locator_base_url: String,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            locator_base_url: String::new(),
        }
    }
}

/// Top-level service configuration.
///
/// # Examples
///
/// ```
/// use taskdeck::config::ServiceConfig;
///
/// let config = ServiceConfig::default();
/// assert_eq!(config.upload_limits().max_file_bytes, 10 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Largest accepted attachment payload in bytes.
    pub max_attachment_bytes: u64,
    /// Prefix for attachment storage locators (for example
    /// `https://tasks.example.com`).
    pub locator_base_url: String,
    /// Time budget for each persistence call.
    pub io_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            locator_base_url: String::new(),
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Creates a configuration with a custom locator base URL.
    #[must_use]
    pub fn with_locator_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.locator_base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Creates a configuration with a custom I/O timeout.
    #[must_use]
    pub const fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    /// Creates a configuration with a custom upload limit.
    #[must_use]
    pub const fn with_max_attachment_bytes(mut self, max_bytes: u64) -> Self {
        self.max_attachment_bytes = max_bytes;
        self
    }

    /// Returns the upload limits derived from this configuration.
    #[must_use]
    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_file_bytes: self.max_attachment_bytes,
            locator_base_url: self.locator_base_url.clone(),
        }
    }

    /// Builds a configuration from `TASKDECK_*` environment variables,
    /// falling back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is set but is
    /// not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a value is set but is not
    /// a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_attachment_bytes = match lookup(MAX_ATTACHMENT_BYTES_ENV) {
            Some(raw) => parse_positive(MAX_ATTACHMENT_BYTES_ENV, &raw)?,
            None => defaults.max_attachment_bytes,
        };
        let io_timeout = match lookup(IO_TIMEOUT_MS_ENV) {
            Some(raw) => Duration::from_millis(parse_positive(IO_TIMEOUT_MS_ENV, &raw)?),
            None => defaults.io_timeout,
        };
        let locator_base_url = lookup(LOCATOR_BASE_URL_ENV)
            .map(|raw| raw.trim().trim_end_matches('/').to_owned())
            .unwrap_or_default();

        Ok(Self {
            max_attachment_bytes,
            locator_base_url,
            io_timeout,
        })
    }
}

fn parse_positive(variable: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        variable,
        value: raw.to_owned(),
        reason,
    };
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid("expected an unsigned integer"))?;
    if value == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(value)
}
