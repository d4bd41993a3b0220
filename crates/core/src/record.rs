// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Check-in records and the baggage they own.
//!
//! A [`CheckInRecord`] is one passenger's booking leg, identified by its
//! [`CompositeKey`]. Baggage has no identity beyond its tag number and lives
//! only inside its record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The `(booking group, record locator)` pair that identifies one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeKey {
    pub booking_group_id: String,
    pub record_locator: String,
}

impl CompositeKey {
    pub fn new(booking_group_id: impl Into<String>, record_locator: impl Into<String>) -> Self {
        CompositeKey {
            booking_group_id: booking_group_id.into(),
            record_locator: record_locator.into(),
        }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.booking_group_id, self.record_locator)
    }
}

/// Handling state of a checked bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaggageStatus {
    /// Tagged at the desk. The only non-terminal state.
    Checked,
    /// Loaded onto the aircraft.
    Loaded,
    /// Pulled from the flight.
    Offloaded,
}

impl BaggageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaggageStatus::Checked => "CHECKED",
            BaggageStatus::Loaded => "LOADED",
            BaggageStatus::Offloaded => "OFFLOADED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BaggageStatus::Checked)
    }
}

impl fmt::Display for BaggageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BaggageStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "CHECKED" => Ok(BaggageStatus::Checked),
            "LOADED" => Ok(BaggageStatus::Loaded),
            "OFFLOADED" => Ok(BaggageStatus::Offloaded),
            _ => Err(Error::InvalidBaggageStatus(s.to_string())),
        }
    }
}

/// A tagged bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baggage {
    pub tag_number: String,
    /// Weight in kilograms.
    pub weight: f64,
    pub color: String,
    pub status: BaggageStatus,
}

impl Baggage {
    /// A freshly tagged bag in the `CHECKED` state.
    pub fn checked(tag_number: impl Into<String>, weight: f64, color: impl Into<String>) -> Self {
        Baggage {
            tag_number: tag_number.into(),
            weight,
            color: color.into(),
            status: BaggageStatus::Checked,
        }
    }

    /// Moves a `CHECKED` bag to a terminal status.
    pub fn transition(&mut self, to: BaggageStatus) -> Result<()> {
        if self.status.is_terminal() || !to.is_terminal() {
            return Err(Error::Validation(format!(
                "bag {} cannot go from {} to {}",
                self.tag_number, self.status, to
            )));
        }
        self.status = to;
        Ok(())
    }
}

/// One passenger's booking leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub booking_group_id: String,
    pub record_locator: String,
    pub flight_number: String,
    pub date: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub passenger_name: String,
    pub seat_number: String,
    pub baggage: Vec<Baggage>,
    #[serde(default)]
    pub checked_in: bool,
    pub modified_at: DateTime<Utc>,
    pub desk_id: String,
    /// Whether this exact attribute snapshot has been written remotely.
    #[serde(default)]
    pub synced: bool,
}

impl CheckInRecord {
    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(&self.booking_group_id, &self.record_locator)
    }

    /// Checks the fields a remote write requires.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("bookingGroupId", &self.booking_group_id),
            ("recordLocator", &self.record_locator),
            ("flightNumber", &self.flight_number),
            ("passengerName", &self.passenger_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("{field} is required")));
            }
        }

        for bag in &self.baggage {
            if bag.tag_number.trim().is_empty() {
                return Err(Error::Validation("baggage tagNumber is required".to_string()));
            }
            if !bag.weight.is_finite() || bag.weight <= 0.0 {
                return Err(Error::Validation(format!(
                    "bag {} has invalid weight {}",
                    bag.tag_number, bag.weight
                )));
            }
        }
        Ok(())
    }

    /// True when both records carry the same attributes, ignoring `synced`.
    pub fn same_snapshot(&self, other: &CheckInRecord) -> bool {
        let mut a = self.clone();
        a.synced = other.synced;
        a == *other
    }

    pub fn has_tag(&self, tag_number: &str) -> bool {
        self.baggage.iter().any(|b| b.tag_number == tag_number)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
