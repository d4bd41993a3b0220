// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub const MANIFEST: &str = "\
bookingGroupId,recordLocator,flightNumber,date,origin,destination,passengerName,seatNumber,baggage,checkedIn,modifiedAt,deskId,synced
G1,ABC123,CX500,2026-03-14,HKG,NRT,Jane Smith,22A,[],false,2026-03-14T06:30:00Z,HKG-F32,false
G2,ABC123,CX500,2026-03-14,HKG,NRT,Tom Smith,22B,[],false,2026-03-14T06:30:00Z,HKG-F32,false
G3,XYZ789,CX888,2026-03-14,HKG,YVR,Lee Wong,,[],false,2026-03-14T06:30:00Z,HKG-F32,false
";

pub fn skydesk() -> Command {
    let mut cmd = cargo_bin_cmd!("skydesk");
    cmd.env_remove("SKYDESK_DIR").env_remove("SKYDESK_DESK_ID").env_remove("SKYDESK_LOG");
    cmd
}

/// Runs skydesk in `dir`.
pub fn skydesk_in(dir: &Path) -> Command {
    let mut cmd = skydesk();
    cmd.current_dir(dir);
    cmd
}

/// Helper to create an initialized local-only desk.
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    skydesk_in(temp.path()).arg("init").assert().success();
    temp
}

/// Helper to create a desk syncing straight into `table`.
pub fn init_direct(table: &Path) -> TempDir {
    let temp = TempDir::new().unwrap();
    skydesk_in(temp.path())
        .arg("init")
        .arg("--direct")
        .arg(table)
        .assert()
        .success();
    temp
}

/// Imports [`MANIFEST`] into the desk at `dir`.
pub fn import_manifest(dir: &Path) {
    let file = dir.join("manifest.csv");
    std::fs::write(&file, MANIFEST).unwrap();
    skydesk_in(dir).arg("import").arg(&file).assert().success();
}
