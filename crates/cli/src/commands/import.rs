// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;

use crate::desk::DeskService;
use crate::error::{Error, Result};

use super::open_desk;

pub fn run(file: &str) -> Result<()> {
    let content = fs::read_to_string(file)
        .map_err(|e| Error::InvalidInput(format!("cannot read {file}: {e}")))?;
    let desk = open_desk()?;
    let count = run_impl(&desk.service()?, &content)?;
    println!("Imported {count} records from {file}");
    Ok(())
}

/// Internal implementation that accepts the service for testing.
pub(crate) fn run_impl(service: &DeskService, content: &str) -> Result<usize> {
    let records = sd_core::csv::read_records(content)?;
    service.import(&records)
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
