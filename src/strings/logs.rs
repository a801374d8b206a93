//! # Log Lines
//!
//! Format helpers for recurring log messages.

pub const STARTING: &str = "Starting deploybot...";
pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub fn logged_in(user: &str) -> String {
    format!("Logged in as {user}")
}

pub fn dispatch(cmd: &str, args: &str, sender: &str) -> String {
    format!("Router dispatching cmd='{cmd}' args='{args}' sender='{sender}'")
}

pub fn sync_loop_fail(err: &str) -> String {
    format!("Matrix sync failed: {err}")
}
