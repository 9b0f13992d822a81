//! Start-of-day: the wall-clock time at which a delivery day begins.

use crate::error::{TaktError, TaktResult};
use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The wall-clock time at which delivery days begin.
///
/// Power markets commonly let a day run from 06:00 to 06:00 of the next
/// calendar day; the default is plain midnight. Only whole hours are
/// allowed, and every daily and longer period boundary of an index sits at
/// its start-of-day.
///
/// # Example
///
/// ```
/// use takt_core::StartOfDay;
///
/// let six = StartOfDay::from_hour(6).unwrap();
/// assert_eq!(six.to_string(), "06:00:00");
/// assert_eq!(StartOfDay::default(), StartOfDay::MIDNIGHT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "NaiveTime", into = "NaiveTime")]
pub struct StartOfDay(NaiveTime);

impl StartOfDay {
    /// Midnight, the default start of a delivery day.
    pub const MIDNIGHT: StartOfDay = StartOfDay(NaiveTime::MIN);

    /// Creates a start-of-day from a wall-clock time.
    ///
    /// # Errors
    ///
    /// Fails with [`TaktError::UnalignedBoundary`] unless the time is a
    /// whole hour.
    pub fn new(time: NaiveTime) -> TaktResult<Self> {
        if time.minute() != 0 || time.second() != 0 || time.nanosecond() != 0 {
            return Err(TaktError::unaligned_boundary(format!(
                "start-of-day must be a whole hour, got {time}"
            )));
        }
        Ok(StartOfDay(time))
    }

    /// Creates a start-of-day at the given hour of the day.
    ///
    /// # Errors
    ///
    /// Fails with [`TaktError::UnalignedBoundary`] for hours outside
    /// `0..24`.
    pub fn from_hour(hour: u32) -> TaktResult<Self> {
        NaiveTime::from_hms_opt(hour, 0, 0)
            .map(StartOfDay)
            .ok_or_else(|| {
                TaktError::unaligned_boundary(format!("start-of-day hour {hour} is out of range"))
            })
    }

    /// The wall-clock time.
    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// The hour of the day.
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Offset from midnight.
    #[must_use]
    pub fn offset_from_midnight(&self) -> Duration {
        Duration::hours(i64::from(self.0.hour()))
    }
}

impl fmt::Display for StartOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

impl TryFrom<NaiveTime> for StartOfDay {
    type Error = TaktError;

    fn try_from(time: NaiveTime) -> Result<Self, Self::Error> {
        StartOfDay::new(time)
    }
}

impl From<StartOfDay> for NaiveTime {
    fn from(start_of_day: StartOfDay) -> Self {
        start_of_day.0
    }
}
