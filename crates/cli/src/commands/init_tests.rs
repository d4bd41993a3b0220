// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use super::*;

#[test]
fn test_build_config_local_only() {
    let config = build_config(Some("SIN-T1".to_string()), None, None).unwrap();
    assert_eq!(config.desk_id, "SIN-T1");
    assert!(config.remote.is_none());
}

#[test]
fn test_build_config_gateway() {
    let config =
        build_config(Some("SIN-T1".to_string()), Some("http://10.0.0.5:7890/".to_string()), None)
            .unwrap();
    assert_eq!(
        config.remote_target(Path::new("/desk/.skydesk")),
        Some(RemoteTarget::Gateway("http://10.0.0.5:7890".to_string()))
    );
}

#[test]
fn test_build_config_direct() {
    let config =
        build_config(Some("SIN-T1".to_string()), None, Some("remote/table.db".to_string()))
            .unwrap();
    assert_eq!(
        config.remote_target(Path::new("/desk/.skydesk")),
        Some(RemoteTarget::Direct(PathBuf::from("/desk/remote/table.db")))
    );
}

#[test]
fn test_build_config_rejects_bad_gateway_scheme() {
    let err = build_config(None, Some("ftp://host".to_string()), None).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_describe_target() {
    assert_eq!(
        describe_target(&RemoteTarget::Gateway("http://gw:7890".to_string())),
        "gateway http://gw:7890"
    );
    assert_eq!(
        describe_target(&RemoteTarget::Direct(PathBuf::from("/mnt/t.db"))),
        "direct table /mnt/t.db"
    );
}
