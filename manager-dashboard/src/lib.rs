pub mod config;
pub mod dashboard;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use dashboard::session::SessionLocks;
use services::{auth_client::AuthClient, enrollment_client::EnrollmentApi, in_flight::InFlight};
use std::sync::Arc;

/// Shared application state containing service clients
#[derive(Clone)]
pub struct AppState {
    pub auth_client: Arc<AuthClient>,
    pub enrollment_api: Arc<dyn EnrollmentApi>,
    pub in_flight: InFlight,
    pub session_locks: SessionLocks,
}

impl AppState {
    pub fn new(auth_client: Arc<AuthClient>, enrollment_api: Arc<dyn EnrollmentApi>) -> Self {
        Self {
            auth_client,
            enrollment_api,
            in_flight: InFlight::new(),
            session_locks: SessionLocks::new(),
        }
    }
}
