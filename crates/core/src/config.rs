//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! client and the screens. Nothing below reads the process environment itself:
//! callers hand in the raw `Option<String>` values they looked up, which keeps
//! tests free of global state.

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_UTC_OFFSET, SESSION_DIR_NAME,
    SESSION_FILENAME,
};
use crate::{DashboardError, DashboardResult};
use chrono::FixedOffset;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_url: Url,
    session_file: PathBuf,
    utc_offset: FixedOffset,
    http_timeout: Duration,
}

/// Raw environment values, as looked up by the binary.
#[derive(Clone, Debug, Default)]
pub struct EnvValues {
    pub api_url: Option<String>,
    pub session_file: Option<String>,
    pub utc_offset: Option<String>,
    pub http_timeout_secs: Option<String>,
    pub home_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The API URL is normalised to end with `/` so that endpoint paths can be
    /// joined onto it without dropping a path prefix.
    pub fn new(
        api_url: Url,
        session_file: PathBuf,
        utc_offset: FixedOffset,
        http_timeout: Duration,
    ) -> DashboardResult<Self> {
        if api_url.cannot_be_a_base() {
            return Err(DashboardError::InvalidConfig {
                key: "AYURA_API_URL",
                reason: "URL cannot be used as a base".into(),
            });
        }
        if http_timeout.is_zero() {
            return Err(DashboardError::InvalidConfig {
                key: "AYURA_HTTP_TIMEOUT_SECS",
                reason: "timeout must be greater than zero".into(),
            });
        }

        let mut api_url = api_url;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self {
            api_url,
            session_file,
            utc_offset,
            http_timeout,
        })
    }

    /// Resolve every setting from raw environment values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if any provided value fails to parse, or if no session
    /// file is configured and no home directory is known.
    pub fn from_env_values(values: EnvValues) -> DashboardResult<Self> {
        let api_url = api_url_from_env_value(values.api_url)?;
        let session_file = session_file_from_env_value(values.session_file, values.home_dir)?;
        let utc_offset = utc_offset_from_env_value(values.utc_offset)?;
        let http_timeout = http_timeout_from_env_value(values.http_timeout_secs)?;

        Self::new(api_url, session_file, utc_offset, http_timeout)
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the backend base URL, defaulting to [`DEFAULT_API_URL`].
pub fn api_url_from_env_value(value: Option<String>) -> DashboardResult<Url> {
    let raw = non_blank(value).unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let url = Url::parse(&raw).map_err(DashboardError::InvalidApiUrl)?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DashboardError::InvalidConfig {
            key: "AYURA_API_URL",
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Resolve the session file path.
///
/// An explicit value wins; otherwise the file lives at
/// `<home>/.ayura/session.json`.
pub fn session_file_from_env_value(
    value: Option<String>,
    home_dir: Option<PathBuf>,
) -> DashboardResult<PathBuf> {
    if let Some(path) = non_blank(value) {
        return Ok(PathBuf::from(path));
    }

    home_dir
        .map(|home| home.join(SESSION_DIR_NAME).join(SESSION_FILENAME))
        .ok_or(DashboardError::InvalidConfig {
            key: "AYURA_SESSION_FILE",
            reason: "not set and no home directory is available".into(),
        })
}

/// Parse a UTC offset written as `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
pub fn utc_offset_from_env_value(value: Option<String>) -> DashboardResult<FixedOffset> {
    let raw = non_blank(value).unwrap_or_else(|| DEFAULT_UTC_OFFSET.to_string());
    parse_utc_offset(&raw).ok_or_else(|| DashboardError::InvalidConfig {
        key: "AYURA_UTC_OFFSET",
        reason: format!("'{raw}' is not an offset like +05:30"),
    })
}

fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parse the HTTP timeout in whole seconds.
pub fn http_timeout_from_env_value(value: Option<String>) -> DashboardResult<Duration> {
    let Some(raw) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    };

    raw.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| DashboardError::InvalidConfig {
            key: "AYURA_HTTP_TIMEOUT_SECS",
            reason: e.to_string(),
        })
}
