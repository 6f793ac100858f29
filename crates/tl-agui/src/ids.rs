//! Unique id helpers for AG-UI events and runs

use uuid::Uuid;

/// Generate a unique id for an AG-UI message
pub fn generate_event_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a unique id for an AG-UI run
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a unique id for an AG-UI thread
pub fn generate_thread_id() -> String {
    Uuid::new_v4().to_string()
}
