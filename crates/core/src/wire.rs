// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The explicitly tagged wire format exchanged with the gateway.
//!
//! Every attribute carries its type tag: `{"S": "..."}` for strings,
//! `{"N": "18.5"}` for numbers (always encoded as strings), `{"BOOL": true}`,
//! `{"L": [...]}` for lists and `{"M": {...}}` for maps. A record is an
//! [`Item`], a map from attribute name to tagged value.
//!
//! Baggage travels as a list of maps. An empty baggage list is sent as
//! `{"L": []}` and comes back as an empty list.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{Baggage, BaggageStatus, CheckInRecord};

/// A single type-tagged attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    S(String),
    N(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    L(Vec<AttributeValue>),
    M(BTreeMap<String, AttributeValue>),
}

/// A record in wire form.
pub type Item = BTreeMap<String, AttributeValue>;

fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

/// Encodes a record into its tagged wire form.
pub fn marshal(record: &CheckInRecord) -> Item {
    let baggage = record
        .baggage
        .iter()
        .map(|bag| {
            let mut m = BTreeMap::new();
            m.insert("tagNumber".to_string(), s(&bag.tag_number));
            m.insert("weight".to_string(), AttributeValue::N(bag.weight.to_string()));
            m.insert("color".to_string(), s(&bag.color));
            m.insert("status".to_string(), s(bag.status.as_str()));
            AttributeValue::M(m)
        })
        .collect();

    let mut item = Item::new();
    item.insert("bookingGroupId".to_string(), s(&record.booking_group_id));
    item.insert("recordLocator".to_string(), s(&record.record_locator));
    item.insert("flightNumber".to_string(), s(&record.flight_number));
    item.insert("date".to_string(), s(record.date.format("%Y-%m-%d").to_string()));
    item.insert("origin".to_string(), s(&record.origin));
    item.insert("destination".to_string(), s(&record.destination));
    item.insert("passengerName".to_string(), s(&record.passenger_name));
    item.insert("seatNumber".to_string(), s(&record.seat_number));
    item.insert("baggage".to_string(), AttributeValue::L(baggage));
    item.insert("checkedIn".to_string(), AttributeValue::Bool(record.checked_in));
    item.insert("modifiedAt".to_string(), s(record.modified_at.to_rfc3339()));
    item.insert("deskId".to_string(), s(&record.desk_id));
    item.insert("synced".to_string(), AttributeValue::Bool(record.synced));
    item
}

fn field<'a>(map: &'a BTreeMap<String, AttributeValue>, name: &str) -> Result<&'a AttributeValue> {
    map.get(name).ok_or_else(|| Error::Wire(format!("missing attribute '{name}'")))
}

fn string(map: &BTreeMap<String, AttributeValue>, name: &str) -> Result<String> {
    match field(map, name)? {
        AttributeValue::S(v) => Ok(v.clone()),
        other => Err(Error::Wire(format!("attribute '{name}' should be S, got {other:?}"))),
    }
}

fn number(map: &BTreeMap<String, AttributeValue>, name: &str) -> Result<f64> {
    match field(map, name)? {
        AttributeValue::N(v) => v
            .parse()
            .map_err(|_| Error::Wire(format!("attribute '{name}' is not a number: '{v}'"))),
        other => Err(Error::Wire(format!("attribute '{name}' should be N, got {other:?}"))),
    }
}

/// Missing booleans read as `false`.
fn boolean(map: &BTreeMap<String, AttributeValue>, name: &str) -> Result<bool> {
    match map.get(name) {
        None => Ok(false),
        Some(AttributeValue::Bool(v)) => Ok(*v),
        Some(other) => Err(Error::Wire(format!("attribute '{name}' should be BOOL, got {other:?}"))),
    }
}

fn bag(value: &AttributeValue) -> Result<Baggage> {
    let AttributeValue::M(m) = value else {
        return Err(Error::Wire(format!("baggage entry should be M, got {value:?}")));
    };
    Ok(Baggage {
        tag_number: string(m, "tagNumber")?,
        weight: number(m, "weight")?,
        color: string(m, "color")?,
        status: string(m, "status")?
            .parse::<BaggageStatus>()
            .map_err(|e| Error::Wire(e.to_string()))?,
    })
}

/// Decodes a record from its tagged wire form.
pub fn unmarshal(item: &Item) -> Result<CheckInRecord> {
    let baggage = match item.get("baggage") {
        None => Vec::new(),
        Some(AttributeValue::L(bags)) => bags.iter().map(bag).collect::<Result<_>>()?,
        Some(other) => {
            return Err(Error::Wire(format!("attribute 'baggage' should be L, got {other:?}")))
        }
    };

    let date = string(item, "date")?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|e| Error::Wire(format!("invalid date '{date}': {e}")))?;
    let modified_at = string(item, "modifiedAt")?;
    let modified_at = DateTime::parse_from_rfc3339(&modified_at)
        .map_err(|e| Error::Wire(format!("invalid modifiedAt '{modified_at}': {e}")))?
        .with_timezone(&Utc);

    Ok(CheckInRecord {
        booking_group_id: string(item, "bookingGroupId")?,
        record_locator: string(item, "recordLocator")?,
        flight_number: string(item, "flightNumber")?,
        date,
        origin: string(item, "origin")?,
        destination: string(item, "destination")?,
        passenger_name: string(item, "passengerName")?,
        seat_number: string(item, "seatNumber")?,
        baggage,
        checked_in: boolean(item, "checkedIn")?,
        modified_at,
        desk_id: string(item, "deskId")?,
        synced: boolean(item, "synced")?,
    })
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
