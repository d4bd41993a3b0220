// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Desk operations: lookup, check-in, and baggage tagging.
//!
//! Every mutation updates the record and appends a [`QueuedAction`] holding
//! a snapshot of it in one local transaction, so the desk keeps working with
//! no link to the remote at all.

use std::sync::Arc;

use rand::Rng;
use sd_core::{
    ActionKind, Baggage, BaggageStatus, CheckInRecord, ClockSource, CompositeKey, LocalStore,
    QueuedAction, StampClock, SystemClock,
};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::sync::RemoteAdapter;

/// Where a lookup's records came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupSource {
    Local,
    /// Fetched from the remote and cached locally.
    Remote,
    /// Nothing local and no remote configured.
    NotFound,
    /// Nothing local and the remote query failed.
    RemoteUnavailable(String),
}

#[derive(Debug, Clone)]
pub struct Lookup {
    pub records: Vec<CheckInRecord>,
    pub source: LookupSource,
}

/// Tries per mutation before giving up on a record other writers keep
/// changing.
const MUTATION_ATTEMPTS: u32 = 3;

const TAG_MIN: u64 = 100_000_000;
const TAG_MAX: u64 = 1_000_000_000;

/// Generates a 9-digit bag tag number not already on `record`.
pub fn generate_tag(record: &CheckInRecord) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let tag = rng.gen_range(TAG_MIN..TAG_MAX).to_string();
        if !record.has_tag(&tag) {
            return tag;
        }
    }
}

/// Record locators are matched upper-cased.
pub fn normalize_locator(locator: &str) -> String {
    locator.trim().to_uppercase()
}

pub struct DeskService<C: ClockSource = SystemClock> {
    store: Arc<dyn LocalStore>,
    clock: StampClock<C>,
    desk_id: String,
}

impl DeskService<SystemClock> {
    pub fn new(store: Arc<dyn LocalStore>, desk_id: impl Into<String>) -> Result<Self> {
        Self::with_clock(store, desk_id, SystemClock)
    }
}

impl<C: ClockSource> DeskService<C> {
    /// Creates the service. The clock is advanced past the newest queued
    /// action so ids issued now sort after ones from earlier sessions.
    pub fn with_clock(store: Arc<dyn LocalStore>, desk_id: impl Into<String>, clock: C) -> Result<Self> {
        let clock = StampClock::with_clock(clock);
        if let Some(last) = store.list_queue()?.last() {
            clock.observe(last.enqueued_at());
        }
        Ok(DeskService { store, clock, desk_id: desk_id.into() })
    }

    pub fn desk_id(&self) -> &str {
        &self.desk_id
    }

    /// Records held locally for a locator.
    pub fn find(&self, locator: &str) -> Result<Vec<CheckInRecord>> {
        Ok(self.store.get_all_by_locator(&normalize_locator(locator))?)
    }

    /// Local records for the locator, falling back to the remote when none
    /// are held. Remote results are cached locally as synced.
    pub async fn lookup(&self, locator: &str, remote: Option<&dyn RemoteAdapter>) -> Result<Lookup> {
        let locator = normalize_locator(locator);
        let local = self.store.get_all_by_locator(&locator)?;
        if !local.is_empty() {
            return Ok(Lookup { records: local, source: LookupSource::Local });
        }

        let Some(remote) = remote else {
            return Ok(Lookup { records: Vec::new(), source: LookupSource::NotFound });
        };
        match remote.query_by_locator(&locator).await {
            Ok(found) => {
                let mut records = Vec::with_capacity(found.len());
                for mut record in found {
                    record.synced = true;
                    self.store.upsert(&record)?;
                    records.push(record);
                }
                debug!(%locator, count = records.len(), "cached remote records");
                let source =
                    if records.is_empty() { LookupSource::NotFound } else { LookupSource::Remote };
                Ok(Lookup { records, source })
            }
            Err(e) => {
                warn!(%locator, error = %e, "remote lookup failed");
                Ok(Lookup { records: Vec::new(), source: LookupSource::RemoteUnavailable(e.to_string()) })
            }
        }
    }

    /// Picks the single record for a locator, narrowed by booking group when
    /// the locator spans several.
    pub fn resolve(&self, locator: &str, group: Option<&str>) -> Result<CheckInRecord> {
        let locator = normalize_locator(locator);
        let mut records = self.store.get_all_by_locator(&locator)?;
        if let Some(group) = group {
            records.retain(|r| r.booking_group_id == group);
        }
        match records.len() {
            0 => Err(Error::RecordNotFound(locator)),
            1 => Ok(records.remove(0)),
            _ => Err(Error::AmbiguousLocator {
                locator,
                groups: records.into_iter().map(|r| r.booking_group_id).collect(),
            }),
        }
    }

    /// Adds records without queuing anything (reference data from a
    /// manifest). Returns how many were written.
    pub fn import(&self, records: &[CheckInRecord]) -> Result<usize> {
        for record in records {
            self.store.upsert(record)?;
        }
        Ok(records.len())
    }

    /// Confirms check-in, optionally changing the seat.
    pub fn check_in(&self, key: &CompositeKey, seat: Option<&str>) -> Result<QueuedAction> {
        self.mutate(key, ActionKind::CheckIn, |record| {
            record.checked_in = true;
            if let Some(seat) = seat {
                record.seat_number = seat.trim().to_uppercase();
            }
            Ok(())
        })
    }

    /// Tags a new bag and returns it with the queued action.
    pub fn add_baggage(
        &self,
        key: &CompositeKey,
        weight: f64,
        color: &str,
    ) -> Result<(Baggage, QueuedAction)> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(sd_core::Error::Validation(format!("invalid weight {weight}")).into());
        }
        let mut added = None;
        let action = self.mutate(key, ActionKind::BaggageAdd, |record| {
            let bag = Baggage::checked(generate_tag(record), weight, color.trim().to_uppercase());
            record.baggage.push(bag.clone());
            added = Some(bag);
            Ok(())
        })?;
        let bag = added.ok_or_else(|| Error::RecordNotFound(key.record_locator.clone()))?;
        Ok((bag, action))
    }

    /// Removes a bag by tag number.
    pub fn remove_baggage(&self, key: &CompositeKey, tag: &str) -> Result<QueuedAction> {
        self.mutate(key, ActionKind::Update, |record| {
            let before = record.baggage.len();
            record.baggage.retain(|b| b.tag_number != tag);
            if record.baggage.len() == before {
                return Err(Error::BagNotFound { tag: tag.to_string(), key: key.to_string() });
            }
            Ok(())
        })
    }

    /// Moves a bag to `LOADED` or `OFFLOADED`.
    pub fn set_bag_status(
        &self,
        key: &CompositeKey,
        tag: &str,
        status: BaggageStatus,
    ) -> Result<QueuedAction> {
        self.mutate(key, ActionKind::Update, |record| {
            let bag = record
                .baggage
                .iter_mut()
                .find(|b| b.tag_number == tag)
                .ok_or_else(|| Error::BagNotFound { tag: tag.to_string(), key: key.to_string() })?;
            bag.transition(status)?;
            Ok(())
        })
    }

    /// Applies `apply` to the stored record and queues the result.
    ///
    /// The write only lands if the record is unchanged since it was read.
    /// When another process edits it first, the edit is re-applied on top of
    /// the newer copy.
    fn mutate(
        &self,
        key: &CompositeKey,
        kind: ActionKind,
        mut apply: impl FnMut(&mut CheckInRecord) -> Result<()>,
    ) -> Result<QueuedAction> {
        for attempt in 1..=MUTATION_ATTEMPTS {
            let current = self
                .store
                .get_by_key(key)?
                .ok_or_else(|| Error::RecordNotFound(key.record_locator.clone()))?;
            let mut record = current.clone();
            apply(&mut record)?;

            let stamp = self.clock.now();
            record.modified_at = stamp.to_datetime();
            record.desk_id = self.desk_id.clone();
            record.synced = false;

            let action = QueuedAction::new(kind, record.clone(), stamp);
            if self.store.replace_record(&current, &record, &action)? {
                debug!(id = action.id(), "mutation queued");
                return Ok(action);
            }
            debug!(%key, attempt, "record changed underneath, retrying");
        }
        Err(Error::EditConflict(key.to_string()))
    }
}

#[cfg(test)]
#[path = "desk_tests.rs"]
mod tests;
