//! Constants used throughout the Ayura core crate.
//!
//! Defaults for configuration values and the fixed lookup tables used by the
//! list-view pipeline live here so that the CLI, the client and the tests agree
//! on them.

/// Default backend base URL when `AYURA_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Directory under the user's home where the session file is kept.
pub const SESSION_DIR_NAME: &str = ".ayura";

/// Filename for the persisted session.
pub const SESSION_FILENAME: &str = "session.json";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default UTC offset used for calendar-day and calendar-month boundaries.
pub const DEFAULT_UTC_OFFSET: &str = "+00:00";

/// Rank table for the synthetic "priority" sort key. Higher ranks first when
/// sorting descending.
pub const PRIORITY_RANKS: [(&str, u8); 3] = [("urgent", 3), ("high", 2), ("normal", 1)];

/// Sentinel accepted on the command line and in saved views meaning "no filter".
pub const ALL_SENTINEL: &str = "all";
