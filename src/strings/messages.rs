//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes replies, usage hints and attachment titles.

pub const UNKNOWN_COMMAND: &str = "❓ Unknown command. Try `.help`.";
pub const NO_APPS: &str = "No apps are configured.";

pub const DEPLOYED_USAGE: &str = "Usage: `.deployed in <environment>`";
pub const BUILDS_USAGE: &str = "Usage: `.builds for <app|all>`";
pub const DIFF_USAGE: &str = "Usage: `.diff <from> <to>` (environments or `latest`)";

pub const BUILD_COLUMN: &str = "Build";
pub const GITHUB_COLUMN: &str = "Github";

pub const LATEST_BUILDS_PRETEXT: &str = "Most recent successful builds";
pub const COMPARE_PRETEXT: &str = "Compare on Github";

pub fn deployed_pretext(env: &str) -> String {
    format!("Builds for apps in {env}")
}

pub fn build_link(url: &str, build: &str) -> String {
    format!("<{url}|Circle Build {build}>")
}

pub fn compare_link(url: &str, label: &str) -> String {
    format!("<{url}|{label}>")
}

pub fn config_error(err: &str) -> String {
    format!("⚠️ Unable to load configuration: {err}")
}
