//! The current admin session.
//!
//! There is exactly one place that knows where the token lives:
//! [`SessionStore`] reads and writes the session file, and [`SessionHandle`]
//! holds the in-memory copy that the HTTP client and the screens share.
//! Logging out (explicitly, or because the backend answered 401) goes through
//! [`SessionHandle::end`].

use crate::{DashboardError, DashboardResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Profile of the signed-in admin, cached alongside the token.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl AdminProfile {
    /// Best available label for display.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("admin")
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub admin: Option<AdminProfile>,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, admin: Option<AdminProfile>) -> Self {
        Self {
            token: token.into(),
            admin,
            started_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("admin", &self.admin)
            .field("started_at", &self.started_at)
            .finish()
    }
}

/// File-backed persistence for [`Session`].
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session. A missing file means "signed out".
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> DashboardResult<Option<Session>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DashboardError::SessionRead(e)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(DashboardError::SessionDeserialization)
    }

    /// Write the session, replacing any previous one.
    ///
    /// The file is written next to its final location and renamed into place
    /// so a crash never leaves a half-written token behind.
    pub fn save(&self, session: &Session) -> DashboardResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(DashboardError::SessionDirCreation)?;
        }

        let json =
            serde_json::to_string_pretty(session).map_err(DashboardError::SessionSerialization)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(DashboardError::SessionWrite)?;
        restrict_permissions(&tmp_path)?;
        fs::rename(&tmp_path, &self.path).map_err(DashboardError::SessionWrite)
    }

    /// Remove the persisted session. Removing a missing file is not an error.
    pub fn clear(&self) -> DashboardResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DashboardError::SessionRemove(e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> DashboardResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(DashboardError::SessionWrite)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> DashboardResult<()> {
    Ok(())
}

/// Shared handle on the current session.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    current: Arc<RwLock<Option<Session>>>,
    store: SessionStore,
}

impl SessionHandle {
    /// Open the handle, loading any persisted session.
    ///
    /// A corrupt session file is logged and treated as signed out.
    pub fn open(store: SessionStore) -> DashboardResult<Self> {
        let current = match store.load() {
            Ok(session) => session,
            Err(DashboardError::SessionDeserialization(e)) => {
                tracing::warn!(
                    path = %store.path().display(),
                    "discarding unreadable session file: {e}"
                );
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            current: Arc::new(RwLock::new(current)),
            store,
        })
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Start a new session and persist it.
    pub fn begin(&self, session: Session) -> DashboardResult<()> {
        self.store.save(&session)?;
        let name = session
            .admin
            .as_ref()
            .map(|a| a.display_name().to_string());
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        tracing::info!(admin = ?name, "session started");
        Ok(())
    }

    /// End the session in memory and on disk.
    pub fn end(&self) -> DashboardResult<()> {
        let was_active = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        self.store.clear()?;
        if was_active {
            tracing::info!("session ended");
        }
        Ok(())
    }
}
