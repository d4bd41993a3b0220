// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `SKYDESK_DIR` if set and non-empty.
///
/// Points at a `.skydesk` directory directly, skipping the upward search.
pub fn desk_dir() -> Option<PathBuf> {
    non_empty(vars::SKYDESK_DIR).map(PathBuf::from)
}

/// Returns the value of `SKYDESK_DESK_ID` if set and non-empty.
pub fn desk_id() -> Option<String> {
    non_empty(vars::SKYDESK_DESK_ID)
}

/// Name of the variable holding the log filter directive.
pub fn log_filter_var() -> &'static str {
    vars::SKYDESK_LOG
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
