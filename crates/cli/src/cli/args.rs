// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use clap::{Args, ValueEnum};
use sd_core::BaggageStatus;

/// Selects one record by locator, narrowed by booking group when the
/// locator covers several.
#[derive(Args, Clone, Debug)]
pub struct RecordArgs {
    /// Record locator (case-insensitive)
    pub locator: String,

    /// Booking group id, required when the locator spans several groups
    #[arg(long, short)]
    pub group: Option<String>,
}

/// Terminal handling states a bag can be moved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BagState {
    Loaded,
    Offloaded,
}

impl From<BagState> for BaggageStatus {
    fn from(state: BagState) -> Self {
        match state {
            BagState::Loaded => BaggageStatus::Loaded,
            BagState::Offloaded => BaggageStatus::Offloaded,
        }
    }
}
