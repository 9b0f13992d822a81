//! Timestamps on a delivery-period axis, and the boundary calculus on them.
//!
//! A [`Stamp`] is either timezone-aware (an instant in an IANA zone) or
//! naive (a bare wall-clock reading). The two kinds never mix on one axis.
//! All period arithmetic lives here: flooring and ceiling to a period
//! boundary, jumping to the next boundary, and the physical duration of
//! the period starting at a stamp. Daylight-saving transitions are handled
//! exactly, never by approximating a day as 24 hours.

use crate::error::{TaktError, TaktResult};
use crate::types::{Frequency, Hours, StartOfDay};
use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use std::cmp::Ordering;
use std::fmt;

/// Which side a stamp is rounded to.
#[derive(Clone, Copy)]
enum RoundSide {
    Floor,
    Ceil,
}

/// A point on a delivery-period axis.
///
/// Aware stamps order and compare by instant, naive stamps by wall time.
/// Stamps of different kinds are never equal and cannot be ordered;
/// [`PartialOrd`] returns `None` for a mixed pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stamp {
    /// An instant in a concrete IANA timezone.
    Aware(DateTime<Tz>),
    /// A wall-clock reading without timezone attachment.
    Naive(NaiveDateTime),
}

impl Stamp {
    /// Interprets a wall time in a timezone, requiring a unique instant.
    ///
    /// # Errors
    ///
    /// Fails with [`TaktError::AmbiguousLocalTime`] inside a repeated hour
    /// and [`TaktError::NonexistentLocalTime`] inside a skipped hour.
    pub fn localize(tz: Tz, wall: NaiveDateTime) -> TaktResult<Stamp> {
        localize_unique(tz, wall).map(Stamp::Aware)
    }

    /// The wall-clock reading of this stamp.
    #[must_use]
    pub fn wall(&self) -> NaiveDateTime {
        match self {
            Stamp::Aware(dt) => dt.naive_local(),
            Stamp::Naive(wall) => *wall,
        }
    }

    /// The wall-clock time of day.
    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.wall().time()
    }

    /// The timezone, if this is an aware stamp.
    #[must_use]
    pub fn timezone(&self) -> Option<Tz> {
        match self {
            Stamp::Aware(dt) => Some(dt.timezone()),
            Stamp::Naive(_) => None,
        }
    }

    /// Returns true for aware stamps.
    #[must_use]
    pub fn is_aware(&self) -> bool {
        matches!(self, Stamp::Aware(_))
    }

    /// The aware representation, if this is an aware stamp.
    #[must_use]
    pub fn as_aware(&self) -> Option<DateTime<Tz>> {
        match self {
            Stamp::Aware(dt) => Some(*dt),
            Stamp::Naive(_) => None,
        }
    }

    /// The naive representation, if this is a naive stamp.
    #[must_use]
    pub fn as_naive(&self) -> Option<NaiveDateTime> {
        match self {
            Stamp::Aware(_) => None,
            Stamp::Naive(wall) => Some(*wall),
        }
    }

    /// Rounds down to the latest period boundary at or before this stamp.
    ///
    /// Sub-daily frequencies truncate on the fixed grid: aware stamps on
    /// the instant grid anchored at their own UTC offset (inside a repeated
    /// hour the two readings of one wall time floor to different
    /// boundaries), naive stamps on the wall grid. Daily and longer
    /// frequencies round on the wall clock: the time is moved to the
    /// start-of-day of the current delivery day, then the date is rolled
    /// back to the calendar unit respecting the anchor.
    ///
    /// # Errors
    ///
    /// For aware stamps a daily-or-longer boundary can fall on an ambiguous
    /// or nonexistent wall time; this fails with
    /// [`TaktError::AmbiguousLocalTime`] or
    /// [`TaktError::NonexistentLocalTime`].
    pub fn floor(&self, freq: Frequency, start_of_day: StartOfDay) -> TaktResult<Stamp> {
        self.round(freq.canonical(), start_of_day, RoundSide::Floor)
    }

    /// Rounds up to the earliest period boundary at or after this stamp.
    ///
    /// A stamp already on a boundary satisfies
    /// `floor(x) == ceil(x) == x`. See [`Stamp::floor`] for the grid
    /// semantics and error conditions.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Stamp::floor`].
    pub fn ceil(&self, freq: Frequency, start_of_day: StartOfDay) -> TaktResult<Stamp> {
        self.round(freq.canonical(), start_of_day, RoundSide::Ceil)
    }

    /// Returns true when this stamp is a period boundary.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Stamp::floor`].
    pub fn is_boundary(&self, freq: Frequency, start_of_day: StartOfDay) -> TaktResult<bool> {
        Ok(self.floor(freq, start_of_day)? == *self)
    }

    /// The right bound of the period starting at this stamp.
    ///
    /// Sub-daily frequencies advance by a fixed duration on the instant
    /// axis; daily and longer frequencies advance the wall clock by one
    /// calendar day, month, quarter or year and re-localize aware results.
    /// Only meaningful when called on a left period bound.
    ///
    /// # Errors
    ///
    /// Fails with [`TaktError::AmbiguousLocalTime`] /
    /// [`TaktError::NonexistentLocalTime`] when the advanced wall time
    /// cannot be re-localized, and with [`TaktError::OutOfRange`] when the
    /// arithmetic leaves the representable range.
    pub fn jump(&self, freq: Frequency) -> TaktResult<Stamp> {
        match freq.canonical() {
            Frequency::QuarterHour => self.checked_shift(Duration::minutes(15)),
            Frequency::Hour => self.checked_shift(Duration::hours(1)),
            Frequency::Day => self.shift_wall_days(1),
            Frequency::MonthStart => self.shift_wall_months(1, false),
            Frequency::QuarterStart(_) => self.shift_wall_months(3, false),
            Frequency::YearStart(_) => self.shift_wall_months(12, false),
        }
    }

    /// The left bound of the period ending at this stamp; inverse of
    /// [`Stamp::jump`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`Stamp::jump`].
    pub fn jump_back(&self, freq: Frequency) -> TaktResult<Stamp> {
        match freq.canonical() {
            Frequency::QuarterHour => self.checked_shift(Duration::minutes(-15)),
            Frequency::Hour => self.checked_shift(Duration::hours(-1)),
            Frequency::Day => self.shift_wall_days(-1),
            Frequency::MonthStart => self.shift_wall_months(1, true),
            Frequency::QuarterStart(_) => self.shift_wall_months(3, true),
            Frequency::YearStart(_) => self.shift_wall_months(12, true),
        }
    }

    /// The physical duration of the period starting at this stamp.
    ///
    /// Aware stamps measure between instants, so the clock-change days of
    /// a European zone yield 23 h and 25 h; naive stamps measure on the
    /// uniform wall clock and a day is always 24 h.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Stamp::jump`].
    pub fn duration(&self, freq: Frequency) -> TaktResult<Hours> {
        let right = self.jump(freq)?;
        Ok(Hours::from_timedelta(right.delta_since(self)))
    }

    /// Replaces the wall-clock time of day, keeping the date.
    ///
    /// # Errors
    ///
    /// Fails when the new wall time is ambiguous or nonexistent in an
    /// aware stamp's zone.
    pub fn replace_time(&self, time: NaiveTime) -> TaktResult<Stamp> {
        self.with_wall(self.wall().date().and_time(time))
    }

    /// Elapsed time since an earlier stamp of the same kind.
    pub(crate) fn delta_since(&self, earlier: &Stamp) -> Duration {
        match (earlier, self) {
            (Stamp::Aware(a), Stamp::Aware(b)) => b.signed_duration_since(*a),
            (Stamp::Naive(a), Stamp::Naive(b)) => b.signed_duration_since(*a),
            // every operation in this module preserves the stamp kind
            _ => unreachable!("mixed stamp kinds"),
        }
    }

    /// Re-interprets a wall time in this stamp's kind and zone.
    pub(crate) fn with_wall(&self, wall: NaiveDateTime) -> TaktResult<Stamp> {
        match self {
            Stamp::Aware(dt) => localize_unique(dt.timezone(), wall).map(Stamp::Aware),
            Stamp::Naive(_) => Ok(Stamp::Naive(wall)),
        }
    }

    fn round(&self, freq: Frequency, start_of_day: StartOfDay, side: RoundSide) -> TaktResult<Stamp> {
        match freq {
            Frequency::QuarterHour => self.round_sub_daily(15 * 60, side),
            Frequency::Hour => self.round_sub_daily(3600, side),
            _ => self.round_daily(freq, start_of_day, side),
        }
    }

    /// Truncation on the fixed grid, anchored at the stamp's own UTC
    /// offset (zero for naive stamps).
    fn round_sub_daily(&self, step_secs: i64, side: RoundSide) -> TaktResult<Stamp> {
        let (secs, nanos, offset_secs) = match self {
            Stamp::Aware(dt) => (
                dt.timestamp(),
                dt.timestamp_subsec_nanos(),
                i64::from(dt.offset().fix().local_minus_utc()),
            ),
            Stamp::Naive(wall) => (
                wall.and_utc().timestamp(),
                wall.and_utc().timestamp_subsec_nanos(),
                0,
            ),
        };
        let rem = (secs + offset_secs).rem_euclid(step_secs);
        let rounded_secs = match side {
            RoundSide::Floor => secs - rem,
            RoundSide::Ceil if rem == 0 && nanos == 0 => secs,
            RoundSide::Ceil => secs - rem + step_secs,
        };
        let rounded = DateTime::<Utc>::from_timestamp(rounded_secs, 0)
            .ok_or_else(|| TaktError::out_of_range(format!("cannot round {self}")))?;
        Ok(match self {
            Stamp::Aware(dt) => Stamp::Aware(rounded.with_timezone(&dt.timezone())),
            Stamp::Naive(_) => Stamp::Naive(rounded.naive_utc()),
        })
    }

    /// Wall-clock rounding for daily and longer frequencies.
    ///
    /// A stamp earlier than the start-of-day belongs to the previous
    /// delivery day. The time is moved to the start-of-day, the date
    /// stepped back or forward accordingly, then rolled to the calendar
    /// unit.
    fn round_daily(
        &self,
        freq: Frequency,
        start_of_day: StartOfDay,
        side: RoundSide,
    ) -> TaktResult<Stamp> {
        let wall = self.wall();
        let sod = start_of_day.time();
        let day_bound = if wall.time() == sod {
            wall
        } else {
            let part_of_previous_day = wall.time() < sod;
            let replaced = wall.date().and_time(sod);
            match side {
                RoundSide::Floor if part_of_previous_day => shift_days(replaced, -1)?,
                RoundSide::Ceil if !part_of_previous_day => shift_days(replaced, 1)?,
                _ => replaced,
            }
        };
        let rolled = match side {
            RoundSide::Floor => floor_unit_date(day_bound.date(), freq)?,
            RoundSide::Ceil => ceil_unit_date(day_bound.date(), freq)?,
        };
        self.with_wall(rolled.and_time(sod))
    }

    /// Fixed-duration shift on the instant axis (uniform for naive stamps).
    fn checked_shift(&self, delta: Duration) -> TaktResult<Stamp> {
        let shifted = match self {
            Stamp::Aware(dt) => dt.checked_add_signed(delta).map(Stamp::Aware),
            Stamp::Naive(wall) => wall.checked_add_signed(delta).map(Stamp::Naive),
        };
        shifted.ok_or_else(|| TaktError::out_of_range(format!("cannot shift {self} by {delta}")))
    }

    /// Calendar-day shift on the wall clock, re-localized for aware stamps.
    fn shift_wall_days(&self, days: i64) -> TaktResult<Stamp> {
        self.with_wall(shift_days(self.wall(), days)?)
    }

    /// Calendar-month shift on the wall clock, re-localized for aware
    /// stamps.
    fn shift_wall_months(&self, months: u32, back: bool) -> TaktResult<Stamp> {
        let wall = self.wall();
        let shifted = if back {
            wall.date().checked_sub_months(Months::new(months))
        } else {
            wall.date().checked_add_months(Months::new(months))
        };
        let date = shifted.ok_or_else(|| {
            TaktError::out_of_range(format!("cannot shift {self} by {months} months"))
        })?;
        self.with_wall(date.and_time(wall.time()))
    }
}

impl PartialOrd for Stamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Stamp::Aware(a), Stamp::Aware(b)) => Some(a.cmp(b)),
            (Stamp::Naive(a), Stamp::Naive(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<DateTime<Tz>> for Stamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Stamp::Aware(dt)
    }
}

impl From<NaiveDateTime> for Stamp {
    fn from(wall: NaiveDateTime) -> Self {
        Stamp::Naive(wall)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stamp::Aware(dt) => write!(f, "{dt}"),
            Stamp::Naive(wall) => write!(f, "{wall}"),
        }
    }
}

/// Interprets a wall time in a timezone, requiring a unique instant.
fn localize_unique(tz: Tz, wall: NaiveDateTime) -> TaktResult<DateTime<Tz>> {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(_, _) => Err(TaktError::ambiguous_local_time(format!(
            "{wall} occurs twice in {tz}"
        ))),
        LocalResult::None => Err(TaktError::nonexistent_local_time(format!(
            "{wall} does not exist in {tz}"
        ))),
    }
}

fn shift_days(wall: NaiveDateTime, days: i64) -> TaktResult<NaiveDateTime> {
    let date = if days >= 0 {
        wall.date().checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        wall.date().checked_sub_days(Days::new(days.unsigned_abs()))
    };
    date.map(|date| date.and_time(wall.time()))
        .ok_or_else(|| TaktError::out_of_range(format!("cannot shift {wall} by {days} days")))
}

/// Latest unit start on or before the date. Identity for daily frequency.
fn floor_unit_date(date: NaiveDate, freq: Frequency) -> TaktResult<NaiveDate> {
    match freq {
        Frequency::QuarterHour | Frequency::Hour | Frequency::Day => Ok(date),
        Frequency::MonthStart => first_of_month(date.year(), date.month()),
        Frequency::QuarterStart(anchor) => {
            let months_back = (i64::from(date.month()) - i64::from(anchor.number_from_month()))
                .rem_euclid(3);
            first_of_month(date.year(), date.month())?
                .checked_sub_months(Months::new(months_back as u32))
                .ok_or_else(|| {
                    TaktError::out_of_range(format!("cannot roll {date} back to a quarter start"))
                })
        }
        Frequency::YearStart(anchor) => {
            let candidate = first_of_month(date.year(), anchor.number_from_month())?;
            if candidate <= date {
                Ok(candidate)
            } else {
                first_of_month(date.year() - 1, anchor.number_from_month())
            }
        }
    }
}

/// Earliest unit start on or after the date. Identity for dates already on
/// a unit start.
fn ceil_unit_date(date: NaiveDate, freq: Frequency) -> TaktResult<NaiveDate> {
    let floored = floor_unit_date(date, freq)?;
    if floored == date {
        return Ok(date);
    }
    match freq.months_per_period() {
        Some(months) => floored
            .checked_add_months(Months::new(months))
            .ok_or_else(|| {
                TaktError::out_of_range(format!("cannot roll {date} forward to a unit start"))
            }),
        None => Ok(date),
    }
}

fn first_of_month(year: i32, month: u32) -> TaktResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TaktError::out_of_range(format!("no first of month {year}-{month:02}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;

    fn naive(s: &str) -> Stamp {
        Stamp::Naive(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap())
    }

    fn berlin(s: &str) -> Stamp {
        let wall = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
        Stamp::Aware(Berlin.from_local_datetime(&wall).unwrap())
    }

    /// The two readings of a wall time inside the repeated hour.
    fn berlin_fold(s: &str, first: bool) -> Stamp {
        let wall = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
        let local = Berlin.from_local_datetime(&wall);
        let dt = if first {
            local.earliest().unwrap()
        } else {
            local.latest().unwrap()
        };
        Stamp::Aware(dt)
    }

    fn freq(token: &str) -> Frequency {
        token.parse().unwrap()
    }

    fn sod(hour: u32) -> StartOfDay {
        StartOfDay::from_hour(hour).unwrap()
    }

    #[test]
    fn test_floor_ceil_sub_daily_naive() {
        let stamp = naive("2020-01-01 15:25");
        assert_eq!(
            stamp.floor(freq("15min"), sod(0)).unwrap(),
            naive("2020-01-01 15:15")
        );
        assert_eq!(
            stamp.ceil(freq("15min"), sod(0)).unwrap(),
            naive("2020-01-01 15:30")
        );
        assert_eq!(
            stamp.floor(freq("h"), sod(0)).unwrap(),
            naive("2020-01-01 15:00")
        );
        assert_eq!(
            stamp.ceil(freq("h"), sod(0)).unwrap(),
            naive("2020-01-01 16:00")
        );
    }

    #[test]
    fn test_floor_ceil_daily_and_longer() {
        let stamp = naive("2020-04-21 15:42");
        let cases = [
            ("D", "2020-04-21 00:00", "2020-04-22 00:00"),
            ("MS", "2020-04-01 00:00", "2020-05-01 00:00"),
            ("QS", "2020-04-01 00:00", "2020-07-01 00:00"),
            ("QS-FEB", "2020-02-01 00:00", "2020-05-01 00:00"),
            ("YS", "2020-01-01 00:00", "2021-01-01 00:00"),
            ("YS-JUL", "2019-07-01 00:00", "2020-07-01 00:00"),
        ];
        for (token, floored, ceiled) in cases {
            assert_eq!(stamp.floor(freq(token), sod(0)).unwrap(), naive(floored));
            assert_eq!(stamp.ceil(freq(token), sod(0)).unwrap(), naive(ceiled));
        }
    }

    #[test]
    fn test_floor_ceil_respects_start_of_day() {
        // Before 06:00 the stamp belongs to the previous delivery day.
        let early = naive("2020-03-28 01:40");
        assert_eq!(
            early.floor(freq("D"), sod(6)).unwrap(),
            naive("2020-03-27 06:00")
        );
        assert_eq!(
            early.ceil(freq("D"), sod(6)).unwrap(),
            naive("2020-03-28 06:00")
        );
        assert_eq!(
            early.floor(freq("YS"), sod(6)).unwrap(),
            naive("2020-01-01 06:00")
        );
        assert_eq!(
            early.ceil(freq("MS"), sod(6)).unwrap(),
            naive("2020-04-01 06:00")
        );
    }

    #[test]
    fn test_boundary_is_fixed_point() {
        for (token, stamp) in [
            ("15min", naive("2020-01-01 15:45")),
            ("h", naive("2020-01-01 15:00")),
            ("D", naive("2020-01-01 00:00")),
            ("MS", naive("2020-02-01 00:00")),
            ("QS", naive("2020-10-01 00:00")),
            ("YS-APR", naive("2020-04-01 00:00")),
        ] {
            assert_eq!(stamp.floor(freq(token), sod(0)).unwrap(), stamp);
            assert_eq!(stamp.ceil(freq(token), sod(0)).unwrap(), stamp);
            assert!(stamp.is_boundary(freq(token), sod(0)).unwrap());
        }
        let six = naive("2020-01-01 06:00");
        assert_eq!(six.floor(freq("D"), sod(6)).unwrap(), six);
        assert_eq!(six.ceil(freq("D"), sod(6)).unwrap(), six);
    }

    #[test]
    fn test_quarter_boundary_of_other_anchor_is_not_fixed() {
        // 2020-02-01 is a month boundary but lies inside the JAN quarter.
        let stamp = naive("2020-02-01 00:00");
        assert_eq!(
            stamp.floor(freq("QS"), sod(0)).unwrap(),
            naive("2020-01-01 00:00")
        );
        assert_eq!(
            stamp.ceil(freq("QS"), sod(0)).unwrap(),
            naive("2020-04-01 00:00")
        );
        assert!(stamp.is_boundary(freq("QS-FEB"), sod(0)).unwrap());
        assert!(!stamp.is_boundary(freq("QS"), sod(0)).unwrap());
    }

    #[test]
    fn test_round_inside_repeated_hour() {
        // 2020-10-25 in Berlin: 02:00-03:00 runs twice. Rounding anchors at
        // the stamp's own offset, so the two readings stay apart.
        let first = berlin_fold("2020-10-25 02:30", true);
        let second = berlin_fold("2020-10-25 02:30", false);
        assert_eq!(
            first.floor(freq("h"), sod(0)).unwrap(),
            berlin_fold("2020-10-25 02:00", true)
        );
        assert_eq!(
            first.ceil(freq("h"), sod(0)).unwrap(),
            berlin_fold("2020-10-25 02:00", false)
        );
        assert_eq!(
            second.floor(freq("h"), sod(0)).unwrap(),
            berlin_fold("2020-10-25 02:00", false)
        );
        assert_eq!(
            second.ceil(freq("h"), sod(0)).unwrap(),
            berlin("2020-10-25 03:00")
        );
    }

    #[test]
    fn test_ceil_over_skipped_hour() {
        // 2020-03-29 in Berlin: 02:00-03:00 does not exist.
        let stamp = berlin("2020-03-29 01:50");
        assert_eq!(
            stamp.ceil(freq("15min"), sod(0)).unwrap(),
            berlin("2020-03-29 03:00")
        );
        assert_eq!(
            stamp.floor(freq("15min"), sod(0)).unwrap(),
            berlin("2020-03-29 01:45")
        );
    }

    #[test]
    fn test_jump_sub_daily_is_instant_exact() {
        let before_fold = berlin_fold("2020-10-25 02:45", true);
        let next = before_fold.jump(freq("15min")).unwrap();
        // One instant step lands on the second reading of 02:00.
        assert_eq!(next, berlin_fold("2020-10-25 02:00", false));
        assert_eq!(before_fold.duration(freq("15min")).unwrap(), Hours::new(0.25));
    }

    #[test]
    fn test_jump_daily_keeps_wall_time() {
        let stamp = berlin("2020-03-28 00:00");
        let next = stamp.jump(freq("D")).unwrap();
        assert_eq!(next, berlin("2020-03-29 00:00"));
        // The clock-change day itself is short.
        assert_eq!(next.duration(freq("D")).unwrap(), Hours::new(23.0));
        assert_eq!(
            berlin("2020-10-25 00:00").duration(freq("D")).unwrap(),
            Hours::new(25.0)
        );
        assert_eq!(
            naive("2020-03-29 00:00").duration(freq("D")).unwrap(),
            Hours::new(24.0)
        );
        // Morning-start delivery days shrink and stretch the same way.
        assert_eq!(
            berlin("2020-03-28 06:00").duration(freq("D")).unwrap(),
            Hours::new(23.0)
        );
        assert_eq!(
            berlin("2020-10-24 06:00").duration(freq("D")).unwrap(),
            Hours::new(25.0)
        );
    }

    #[test]
    fn test_jump_monthly_and_longer() {
        assert_eq!(
            naive("2020-01-01 06:00").jump(freq("MS")).unwrap(),
            naive("2020-02-01 06:00")
        );
        assert_eq!(
            naive("2020-11-01 00:00").jump(freq("QS-FEB")).unwrap(),
            naive("2021-02-01 00:00")
        );
        assert_eq!(
            naive("2020-04-01 00:00").jump(freq("YS-APR")).unwrap(),
            naive("2021-04-01 00:00")
        );
    }

    #[test]
    fn test_jump_back_inverts_jump() {
        for (token, stamp) in [
            ("15min", berlin("2020-10-25 01:45")),
            ("h", berlin("2020-03-29 01:00")),
            ("D", naive("2020-02-29 06:00")),
            ("MS", naive("2020-12-01 00:00")),
            ("QS", naive("2020-10-01 00:00")),
            ("YS", naive("2020-01-01 00:00")),
        ] {
            let there = stamp.jump(freq(token)).unwrap();
            assert_eq!(there.jump_back(freq(token)).unwrap(), stamp);
        }
    }

    #[test]
    fn test_monthly_durations() {
        assert_eq!(
            berlin("2020-03-01 00:00").duration(freq("MS")).unwrap(),
            Hours::new(743.0)
        );
        assert_eq!(
            berlin("2020-10-01 00:00").duration(freq("MS")).unwrap(),
            Hours::new(745.0)
        );
        assert_eq!(
            berlin("2020-02-01 00:00").duration(freq("MS")).unwrap(),
            Hours::new(696.0)
        );
        assert_eq!(
            berlin("2020-01-01 00:00").duration(freq("QS")).unwrap(),
            Hours::new(2183.0)
        );
        assert_eq!(
            berlin("2020-10-01 00:00").duration(freq("QS")).unwrap(),
            Hours::new(2209.0)
        );
        assert_eq!(
            berlin("2020-01-01 00:00").duration(freq("YS")).unwrap(),
            Hours::new(8784.0)
        );
    }

    #[test]
    fn test_replace_time() {
        assert_eq!(
            naive("2020-04-21 15:42")
                .replace_time(NaiveTime::from_hms_opt(6, 0, 0).unwrap())
                .unwrap(),
            naive("2020-04-21 06:00")
        );
        // 02:30 does not exist in Berlin on the clock-change date.
        assert!(berlin("2020-03-29 12:00")
            .replace_time(NaiveTime::from_hms_opt(2, 30, 0).unwrap())
            .is_err());
    }

    #[test]
    fn test_localize_requires_unique_instant() {
        let wall = NaiveDateTime::parse_from_str("2020-10-25 02:30", "%Y-%m-%d %H:%M").unwrap();
        assert!(matches!(
            Stamp::localize(Berlin, wall),
            Err(TaktError::AmbiguousLocalTime { .. })
        ));
        let skipped = NaiveDateTime::parse_from_str("2020-03-29 02:30", "%Y-%m-%d %H:%M").unwrap();
        assert!(matches!(
            Stamp::localize(Berlin, skipped),
            Err(TaktError::NonexistentLocalTime { .. })
        ));
        let plain = NaiveDateTime::parse_from_str("2020-06-15 12:00", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(Stamp::localize(Berlin, plain).unwrap(), berlin("2020-06-15 12:00"));
    }

    #[test]
    fn test_mixed_kinds_do_not_order() {
        let aware = berlin("2020-01-01 00:00");
        let plain = naive("2020-01-01 00:00");
        assert_eq!(aware.partial_cmp(&plain), None);
        assert_ne!(aware, plain);
        assert!(berlin("2020-01-01 00:00") < berlin("2020-01-01 01:00"));
        assert!(naive("2020-01-01 00:00") < naive("2020-01-01 01:00"));
    }

    #[test]
    fn test_half_hour_offset_zone_rounds_on_wall_clock() {
        use chrono_tz::Asia::Kolkata;
        let wall = NaiveDateTime::parse_from_str("2020-04-21 15:25", "%Y-%m-%d %H:%M").unwrap();
        let stamp = Stamp::Aware(Kolkata.from_local_datetime(&wall).unwrap());
        let floored = stamp.floor(freq("h"), sod(0)).unwrap();
        assert_eq!(
            floored.wall(),
            NaiveDateTime::parse_from_str("2020-04-21 15:00", "%Y-%m-%d %H:%M").unwrap()
        );
    }
}
