//! Calibration epochs and observation-time resolution.
//!
//! Each mission splits its lifetime into epochs with their own instrument
//! response. Epoch bounds are midnights, ranges are inclusive on both ends and
//! the first matching epoch in catalogue order wins, so an observation at
//! exactly midnight on a boundary belongs to the earlier epoch.

use crate::domain::{EcfError, EcfResult, Mission};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpochSpec {
    pub name: &'static str,
    pub start: &'static str,
    /// `None` for the ongoing epoch, which ends now.
    pub end: Option<&'static str>,
}

impl EpochSpec {
    pub const fn closed(name: &'static str, start: &'static str, end: &'static str) -> Self {
        Self {
            name,
            start,
            end: Some(end),
        }
    }

    pub const fn ongoing(name: &'static str, start: &'static str) -> Self {
        Self {
            name,
            start,
            end: None,
        }
    }

    fn bounds(&self, now: NaiveDateTime) -> EcfResult<(NaiveDateTime, NaiveDateTime)> {
        let start = parse_catalogue_date(self.name, self.start)?;
        let end = match self.end {
            Some(end) => parse_catalogue_date(self.name, end)?,
            None => now,
        };
        Ok((start, end))
    }

    pub fn contains(&self, at: NaiveDateTime, now: NaiveDateTime) -> EcfResult<bool> {
        let (start, end) = self.bounds(now)?;
        Ok(start <= at && at <= end)
    }
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn parse_catalogue_date(epoch: &str, value: &str) -> EcfResult<NaiveDateTime> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(start_of_day)
        .map_err(|source| {
            EcfError::internal(
                "INTERNAL.EPOCH_CATALOGUE",
                format!("epoch '{}' has malformed date '{}': {}", epoch, value, source),
            )
        })
}

/// Parses an observation time given as `YYYY-MM-DD` (midnight) or an ISO
/// timestamp.
pub fn parse_observation_date(value: &str) -> EcfResult<NaiveDateTime> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(start_of_day(date));
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            EcfError::configuration(
                "CONFIG.DATE_FORMAT",
                format!(
                    "invalid observation date '{}'; expected YYYY-MM-DD or an ISO timestamp",
                    value
                ),
            )
        })
}

pub fn resolve_epoch_on(
    epochs: &[EpochSpec],
    mission: Mission,
    at: NaiveDateTime,
    now: NaiveDateTime,
) -> EcfResult<&'static str> {
    for epoch in epochs {
        if epoch.contains(at, now)? {
            return Ok(epoch.name);
        }
    }

    Err(EcfError::configuration(
        "CONFIG.DATE_OUT_OF_MISSION",
        format!("date {} is not compatible with the {} mission", at, mission),
    ))
}

/// Resolves an optional observation time to an epoch name, falling back to
/// the mission default when none is given.
pub fn resolve_epoch(
    epochs: &[EpochSpec],
    mission: Mission,
    at: Option<NaiveDateTime>,
    default_epoch: &'static str,
) -> EcfResult<&'static str> {
    match at {
        Some(at) => resolve_epoch_on(epochs, mission, at, Utc::now().naive_utc()),
        None => Ok(default_epoch),
    }
}
