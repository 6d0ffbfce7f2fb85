//! Async glue between fetches and [`ListScreen`] state.

use crate::error::{ClientError, ClientResult};
use ayura_core::{ListScreen, Record};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A screen shared between the task that renders it and the tasks that
/// fetch into it.
pub type SharedScreen<R> = Arc<Mutex<ListScreen<R>>>;

pub fn shared<R: Record>(screen: ListScreen<R>) -> SharedScreen<R> {
    Arc::new(Mutex::new(screen))
}

pub fn lock<R: Record>(screen: &SharedScreen<R>) -> MutexGuard<'_, ListScreen<R>> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `fetch` and deliver its result to the screen.
///
/// The lock is not held across the await. Returns `Ok(false)` when the
/// records were discarded because the screen was torn down or refreshed
/// again meanwhile.
///
/// # Errors
///
/// A failed fetch is recorded on the screen as [`LoadState::Failed`] (when
/// its ticket is still current) and also returned, so callers can tell an
/// expired session from a transient failure.
///
/// [`LoadState::Failed`]: ayura_core::LoadState::Failed
pub async fn refresh<R, F>(screen: &SharedScreen<R>, fetch: F) -> ClientResult<bool>
where
    R: Record,
    F: Future<Output = ClientResult<Vec<R>>>,
{
    let ticket = lock(screen).begin_fetch();
    match fetch.await {
        Ok(records) => Ok(lock(screen).complete_fetch::<ClientError>(ticket, Ok(records))),
        Err(e) => {
            tracing::warn!("list fetch failed: {e}");
            lock(screen).complete_fetch(ticket, Err::<Vec<R>, _>(&e));
            Err(e)
        }
    }
}
