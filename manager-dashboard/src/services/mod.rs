pub mod auth_client;
pub mod enrollment_client;
pub mod in_flight;
pub mod metrics;
