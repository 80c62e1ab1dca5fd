//! ISO-8601 forms of the three time primitives.
//!
//! Strings carry no zone suffix and millisecond precision on output, e.g.
//! `2018-06-15T19:17:47.000`. A trailing `Z` is tolerated on input.

use chrono::{DateTime, NaiveDateTime};

use crate::{AbiError, Result};

const FORMAT_IN: &str = "%Y-%m-%dT%H:%M:%S%.f";
const FORMAT_OUT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Epoch of `block_timestamp_type`, 2000-01-01T00:00:00 in ms.
pub const BLOCK_TIMESTAMP_EPOCH_MS: i64 = 946_684_800_000;
/// Slot length of `block_timestamp_type`.
pub const BLOCK_INTERVAL_MS: i64 = 500;

fn parse(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.strip_suffix('Z').unwrap_or(s);
    NaiveDateTime::parse_from_str(trimmed, FORMAT_IN).map_err(|_| AbiError::InvalidTime(s.to_string()))
}

fn print(time: NaiveDateTime) -> String {
    time.format(FORMAT_OUT).to_string()
}

fn out_of_range() -> AbiError {
    AbiError::OutOfRange("time")
}

/// Microseconds since the Unix epoch.
pub fn date_to_time_point(s: &str) -> Result<i64> {
    Ok(parse(s)?.and_utc().timestamp_micros())
}

pub fn time_point_to_date(us: i64) -> Result<String> {
    // sub-millisecond digits are truncated
    let ms = us.div_euclid(1000);
    DateTime::from_timestamp_millis(ms)
        .map(|t| print(t.naive_utc()))
        .ok_or_else(out_of_range)
}

/// Seconds since the Unix epoch.
pub fn date_to_time_point_sec(s: &str) -> Result<u32> {
    let secs = parse(s)?.and_utc().timestamp();
    u32::try_from(secs).map_err(|_| out_of_range())
}

pub fn time_point_sec_to_date(secs: u32) -> Result<String> {
    DateTime::from_timestamp(i64::from(secs), 0)
        .map(|t| print(t.naive_utc()))
        .ok_or_else(out_of_range)
}

/// Half-seconds since 2000-01-01, rounded to the nearest slot.
pub fn date_to_block_timestamp(s: &str) -> Result<u32> {
    let ms = parse(s)?.and_utc().timestamp_millis() - BLOCK_TIMESTAMP_EPOCH_MS;
    let slot = (ms + BLOCK_INTERVAL_MS / 2).div_euclid(BLOCK_INTERVAL_MS);
    u32::try_from(slot).map_err(|_| out_of_range())
}

pub fn block_timestamp_to_date(slot: u32) -> Result<String> {
    let ms = i64::from(slot) * BLOCK_INTERVAL_MS + BLOCK_TIMESTAMP_EPOCH_MS;
    DateTime::from_timestamp_millis(ms)
        .map(|t| print(t.naive_utc()))
        .ok_or_else(out_of_range)
}
