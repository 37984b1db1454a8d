use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use crate::core::{AppError, Result};

/// Fixed UTC offset the business operates in.
///
/// Timestamps are stored as UTC. "Local" hour-of-day, "today", and export
/// windows are all interpreted in this offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessTimezone {
    offset: FixedOffset,
}

impl BusinessTimezone {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self {
            offset: FixedOffset::east_opt(0).expect("zero offset is valid"),
        }
    }

    /// Parse `+HH:MM`, `-HH:MM`, `+HH` or `Z`
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }

        let invalid = || AppError::configuration(format!("Invalid UTC offset: '{}'", value));

        let (sign, rest) = match value.as_bytes().first() {
            Some(b'+') => (1, &value[1..]),
            Some(b'-') => (-1, &value[1..]),
            _ => return Err(invalid()),
        };

        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None => (rest, "0"),
        };
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::new)
            .ok_or_else(invalid)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Hour of day (0-23) of a UTC instant in local time
    pub fn local_hour(&self, instant: DateTime<Utc>) -> usize {
        instant.with_timezone(&self.offset).hour() as usize
    }

    /// Current calendar day in local time
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    /// Convert a local wall-clock date and time to a UTC instant
    pub fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        // Fixed offsets have no gaps or folds, so the mapping is always single.
        self.offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(time)))
    }
}

impl Default for BusinessTimezone {
    fn default() -> Self {
        Self::utc()
    }
}
