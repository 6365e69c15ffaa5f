use crate::dashboard::state::DashboardState;
use dashmap::DashMap;
use service_core::error::AppError;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::Session;

const DASHBOARD_KEY: &str = "dashboard";

/// Screen state of this session; a fresh session starts unloaded.
pub async fn load_state(session: &Session) -> Result<DashboardState, AppError> {
    session
        .get::<DashboardState>(DASHBOARD_KEY)
        .await
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::SessionError(e.to_string()))
}

pub async fn save_state(session: &Session, state: &DashboardState) -> Result<(), AppError> {
    session
        .insert(DASHBOARD_KEY, state)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))
}

/// One async lock per session.
///
/// A handler holds its session's guard from `load_state` until `save_state`
/// so overlapping requests of one manager apply their changes in turn
/// instead of overwriting each other's state.
#[derive(Clone, Default)]
pub struct SessionLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock of an ended session. A guard still held stays valid.
    pub fn forget(&self, key: &str) {
        self.locks.remove(key);
    }
}

/// Lock key of a session: its id, or the signed-in user before the id exists.
pub fn lock_key(session: &Session, user_id: &str) -> String {
    session
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| format!("user:{}", user_id))
}
