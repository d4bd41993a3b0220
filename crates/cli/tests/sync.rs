// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod common;
use common::*;

#[test]
fn sync_without_remote_fails() {
    let temp = init_temp();
    skydesk_in(temp.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote configured"));
}

#[test]
fn sync_to_unreachable_gateway_reports_offline() {
    let temp = TempDir::new().unwrap();
    // Port 9 on loopback is closed on any sane test host.
    skydesk_in(temp.path())
        .args(["init", "--gateway", "http://127.0.0.1:9"])
        .assert()
        .success();

    skydesk_in(temp.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unreachable"));
}

#[test]
fn sync_direct_pushes_pending_actions() {
    let remote = TempDir::new().unwrap();
    let table = remote.path().join("shared/checkins-remote.db");
    let temp = init_direct(&table);
    import_manifest(temp.path());
    skydesk_in(temp.path()).args(["checkin", "XYZ789"]).assert().success();
    skydesk_in(temp.path())
        .args(["bag", "add", "XYZ789", "-w", "12", "-c", "blue"])
        .assert()
        .success();

    skydesk_in(temp.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync complete: 2 succeeded, 0 failed"));

    skydesk_in(temp.path())
        .arg("queue")
        .assert()
        .success()
        .stdout(predicate::str::contains("Queue: 0 pending, 2 synced, 0 failed"));
    skydesk_in(temp.path())
        .args(["lookup", "XYZ789"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced: yes"));

    skydesk_in(temp.path())
        .args(["queue", "purge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Purged 2 synced actions"));
}

#[test]
fn sync_with_empty_queue_is_a_no_op() {
    let remote = TempDir::new().unwrap();
    let temp = init_direct(&remote.path().join("table.db"));
    skydesk_in(temp.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync complete: 0 succeeded, 0 failed"));
}

#[test]
fn lookup_falls_back_to_remote() {
    let remote = TempDir::new().unwrap();
    let table = remote.path().join("table.db");

    let first = init_direct(&table);
    import_manifest(first.path());
    skydesk_in(first.path()).args(["checkin", "XYZ789", "-s", "2C"]).assert().success();
    skydesk_in(first.path()).arg("sync").assert().success();

    let second = init_direct(&table);
    skydesk_in(second.path())
        .args(["lookup", "xyz789"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seat: 2C"))
        .stdout(predicate::str::contains("Checked in: yes"))
        .stdout(predicate::str::contains("fetched from remote"));

    // Cached: the second desk now holds it without asking the remote.
    skydesk_in(second.path())
        .args(["lookup", "XYZ789"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fetched from remote").not());
}
