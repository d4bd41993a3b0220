// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use crate::desk::{normalize_locator, LookupSource};
use crate::display::format_record_details;
use crate::error::{Error, Result};
use crate::sync::RemoteAdapter;

use super::{build_adapter, open_desk};

pub async fn run(locator: &str) -> Result<()> {
    let desk = open_desk()?;
    let service = desk.service()?;

    let remote: Option<Arc<dyn RemoteAdapter>> = match desk.remote_target() {
        Some(target) => Some(build_adapter(&desk, &target)?),
        None => None,
    };
    let lookup = service.lookup(locator, remote.as_deref()).await?;

    match &lookup.source {
        LookupSource::NotFound => return Err(Error::RecordNotFound(normalize_locator(locator))),
        LookupSource::RemoteUnavailable(reason) => {
            eprintln!("warning: remote lookup failed: {reason}");
            return Err(Error::RecordNotFound(normalize_locator(locator)));
        }
        LookupSource::Local | LookupSource::Remote => {}
    }

    for (i, record) in lookup.records.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", format_record_details(record));
    }
    if lookup.source == LookupSource::Remote {
        println!();
        println!("(fetched from remote and cached locally)");
    }
    Ok(())
}
