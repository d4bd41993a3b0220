// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CSV boundary format for bulk import and export.
//!
//! Files start with a header row and separate fields with commas. A field
//! containing a comma, quote, or line break is wrapped in double quotes with
//! inner quotes doubled. Booleans are written `true`/`false`. The baggage
//! column holds a JSON array of bags, `[]` when there are none.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::queue::QueuedAction;
use crate::record::{Baggage, CheckInRecord};

/// Column names of a record file, in export order.
pub const RECORD_HEADER: [&str; 13] = [
    "bookingGroupId",
    "recordLocator",
    "flightNumber",
    "date",
    "origin",
    "destination",
    "passengerName",
    "seatNumber",
    "baggage",
    "checkedIn",
    "modifiedAt",
    "deskId",
    "synced",
];

/// Column names of a pending-action export.
pub const PENDING_HEADER: [&str; 10] = [
    "actionId",
    "kind",
    "recordLocator",
    "bookingGroupId",
    "passengerName",
    "flightNumber",
    "destination",
    "baggageCount",
    "enqueuedAt",
    "retryCount",
];

const EMPTY_BAGGAGE: &str = "[]";

/// Quotes a field when it needs it.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let row: Vec<String> = fields.iter().map(|f| escape_field(f.as_ref())).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// Splits CSV text into rows, each tagged with the line it starts on.
///
/// Blank lines are skipped.
pub fn parse_rows(input: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // Just past a closing quote: only a separator may follow.
    let mut closed = false;
    let mut line = 1;
    let mut row_start = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    closed = true;
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        if closed {
            match c {
                ',' | '\n' => closed = false,
                '\r' if chars.peek() == Some(&'\n') => {}
                _ => {
                    return Err(Error::Csv {
                        line,
                        message: "unexpected character after closing quote".to_string(),
                    })
                }
            }
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            '"' => {
                return Err(Error::Csv { line, message: "unexpected quote in field".to_string() })
            }
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    rows.push((row_start, std::mem::take(&mut fields)));
                }
                fields.clear();
                line += 1;
                row_start = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::Csv { line: row_start, message: "unterminated quoted field".to_string() });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        rows.push((row_start, fields));
    }
    Ok(rows)
}

/// Writes records with a header row.
pub fn write_records(records: &[CheckInRecord]) -> Result<String> {
    let mut out = String::new();
    write_row(&mut out, &RECORD_HEADER);
    for r in records {
        let baggage = if r.baggage.is_empty() {
            EMPTY_BAGGAGE.to_string()
        } else {
            serde_json::to_string(&r.baggage)?
        };
        write_row(
            &mut out,
            &[
                r.booking_group_id.clone(),
                r.record_locator.clone(),
                r.flight_number.clone(),
                r.date.format("%Y-%m-%d").to_string(),
                r.origin.clone(),
                r.destination.clone(),
                r.passenger_name.clone(),
                r.seat_number.clone(),
                baggage,
                r.checked_in.to_string(),
                r.modified_at.to_rfc3339(),
                r.desk_id.clone(),
                r.synced.to_string(),
            ],
        );
    }
    Ok(out)
}

/// Column positions resolved from a header row.
struct Columns(Vec<usize>);

impl Columns {
    fn resolve(header: &[String]) -> Result<Self> {
        let positions = RECORD_HEADER
            .iter()
            .map(|name| {
                header.iter().position(|h| h.trim() == *name).ok_or_else(|| Error::Csv {
                    line: 1,
                    message: format!("missing column '{name}'"),
                })
            })
            .collect::<Result<_>>()?;
        Ok(Columns(positions))
    }

    fn get<'a>(&self, row: &'a [String], column: usize, line: usize) -> Result<&'a str> {
        let index = self.0[column];
        row.get(index).map(String::as_str).ok_or_else(|| Error::Csv {
            line,
            message: format!("missing value for '{}'", RECORD_HEADER[column]),
        })
    }
}

fn parse_bool(value: &str, line: usize) -> Result<bool> {
    match value.trim() {
        "true" => Ok(true),
        "false" | "" => Ok(false),
        other => Err(Error::Csv { line, message: format!("expected true or false, got '{other}'") }),
    }
}

/// Reads records from a file written by [`write_records`] (or by hand with
/// the same columns in any order). Each record must pass validation.
pub fn read_records(input: &str) -> Result<Vec<CheckInRecord>> {
    let mut rows = parse_rows(input)?.into_iter();
    let Some((_, header)) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = Columns::resolve(&header)?;

    let mut records = Vec::new();
    for (line, row) in rows {
        let cell = |column: usize| columns.get(&row, column, line);
        let csv_err = |message: String| Error::Csv { line, message };

        let baggage_text = cell(8)?.trim();
        let baggage: Vec<Baggage> = if baggage_text.is_empty() || baggage_text == EMPTY_BAGGAGE {
            Vec::new()
        } else {
            serde_json::from_str(baggage_text)
                .map_err(|e| csv_err(format!("invalid baggage: {e}")))?
        };

        let date = NaiveDate::parse_from_str(cell(3)?.trim(), "%Y-%m-%d")
            .map_err(|e| csv_err(format!("invalid date: {e}")))?;
        let modified_at = DateTime::parse_from_rfc3339(cell(10)?.trim())
            .map_err(|e| csv_err(format!("invalid modifiedAt: {e}")))?
            .with_timezone(&Utc);

        let record = CheckInRecord {
            booking_group_id: cell(0)?.trim().to_string(),
            record_locator: cell(1)?.trim().to_uppercase(),
            flight_number: cell(2)?.trim().to_string(),
            date,
            origin: cell(4)?.trim().to_string(),
            destination: cell(5)?.trim().to_string(),
            passenger_name: cell(6)?.trim().to_string(),
            seat_number: cell(7)?.trim().to_string(),
            baggage,
            checked_in: parse_bool(cell(9)?, line)?,
            modified_at,
            desk_id: cell(11)?.trim().to_string(),
            synced: parse_bool(cell(12)?, line)?,
        };
        record.validate().map_err(|e| csv_err(e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

/// Writes pending actions for reconciliation, in the order given.
pub fn write_pending_actions(actions: &[QueuedAction]) -> String {
    let mut out = String::new();
    write_row(&mut out, &PENDING_HEADER);
    for action in actions.iter().filter(|a| a.is_pending()) {
        let p = action.payload();
        write_row(
            &mut out,
            &[
                action.id().to_string(),
                action.kind().to_string(),
                p.record_locator.clone(),
                p.booking_group_id.clone(),
                p.passenger_name.clone(),
                p.flight_number.clone(),
                p.destination.clone(),
                p.baggage.len().to_string(),
                action.enqueued_at().to_datetime().to_rfc3339(),
                action.retry_count().to_string(),
            ],
        );
    }
    out
}

#[cfg(test)]
#[path = "csv_tests.rs"]
mod tests;
