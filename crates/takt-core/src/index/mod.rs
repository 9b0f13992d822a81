//! Validated delivery-period indices.
//!
//! A [`PeriodIndex`] is a gapless, ordered run of left period bounds at one
//! frequency, together with the start-of-day and (for aware indices) the
//! timezone. Construction validates everything once; afterwards the
//! computed attributes such as right bounds and durations are infallible.

mod intersect;
mod localize;
mod trim;

pub use intersect::IntersectOptions;

use crate::error::{TaktError, TaktResult};
use crate::types::{Frequency, Hours, Stamp, StartOfDay};
use chrono::{DateTime, Datelike, Duration, Month, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A gapless run of left period bounds.
///
/// Every element is a left bound of one delivery period; the right bound
/// of each period is the next element, and the final right bound is stored
/// so that [`PeriodIndex::right_bounds`] and [`PeriodIndex::durations`]
/// never fail. The axis is either wholly timezone-aware or wholly naive.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use takt_core::PeriodIndex;
///
/// let days: Vec<_> = (1..=5)
///     .map(|d| NaiveDate::from_ymd_opt(2020, 4, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
///     .collect();
/// let index = PeriodIndex::from_naive(days, None).unwrap();
/// assert_eq!(index.freq().to_string(), "D");
/// assert_eq!(index.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodIndex {
    freq: Frequency,
    start_of_day: StartOfDay,
    axis: Axis,
}

/// The stamps of an index, concrete per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Axis {
    Aware {
        tz: Tz,
        stamps: Vec<DateTime<Tz>>,
        last_right: Option<DateTime<Tz>>,
    },
    Naive {
        stamps: Vec<NaiveDateTime>,
        last_right: Option<NaiveDateTime>,
    },
}

impl PeriodIndex {
    /// Creates an index from timezone-aware left bounds.
    ///
    /// With `freq` as `None` the frequency is inferred from the spacing of
    /// the first two stamps (quarter and year anchors from the first
    /// stamp's month). The start-of-day is taken from the first stamp.
    ///
    /// # Errors
    ///
    /// - [`TaktError::GapOrDisorder`] for an empty input, or when
    ///   consecutive stamps are not exactly one period apart
    /// - [`TaktError::IncompatibleIndices`] for mixed timezones
    /// - [`TaktError::UnalignedBoundary`] when the first stamp is not a
    ///   left bound, or not at a whole hour
    /// - [`TaktError::PartialDay`] when a sub-daily index does not span
    ///   whole days
    /// - [`TaktError::InvalidFrequency`] when no frequency is given and
    ///   none can be inferred
    pub fn from_aware(stamps: Vec<DateTime<Tz>>, freq: Option<Frequency>) -> TaktResult<Self> {
        let Some(first) = stamps.first() else {
            return Err(empty_input_error());
        };
        let tz = first.timezone();
        if let Some(stranger) = stamps.iter().find(|dt| dt.timezone() != tz) {
            return Err(TaktError::incompatible_indices(format!(
                "mixed timezones in one index: {tz} and {}",
                stranger.timezone()
            )));
        }
        let wrapped: Vec<Stamp> = stamps.iter().copied().map(Stamp::Aware).collect();
        let (freq, start_of_day, last_right) = validate_stamps(&wrapped, freq)?;
        Ok(PeriodIndex {
            freq,
            start_of_day,
            axis: Axis::Aware {
                tz,
                stamps,
                last_right: Some(expect_aware(last_right)),
            },
        })
    }

    /// Creates an index from naive left bounds.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PeriodIndex::from_aware`], minus the timezone
    /// checks.
    pub fn from_naive(stamps: Vec<NaiveDateTime>, freq: Option<Frequency>) -> TaktResult<Self> {
        if stamps.is_empty() {
            return Err(empty_input_error());
        }
        let wrapped: Vec<Stamp> = stamps.iter().copied().map(Stamp::Naive).collect();
        let (freq, start_of_day, last_right) = validate_stamps(&wrapped, freq)?;
        Ok(PeriodIndex {
            freq,
            start_of_day,
            axis: Axis::Naive {
                stamps,
                last_right: Some(expect_naive(last_right)),
            },
        })
    }

    /// Creates an index from left bounds of either kind.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PeriodIndex::from_aware`];
    /// [`TaktError::IncompatibleIndices`] when aware and naive stamps are
    /// mixed.
    pub fn from_stamps(stamps: Vec<Stamp>, freq: Option<Frequency>) -> TaktResult<Self> {
        match stamps.first() {
            None => Err(empty_input_error()),
            Some(Stamp::Aware(_)) => {
                let mut aware = Vec::with_capacity(stamps.len());
                for stamp in &stamps {
                    match stamp {
                        Stamp::Aware(dt) => aware.push(*dt),
                        Stamp::Naive(wall) => {
                            return Err(TaktError::incompatible_indices(format!(
                                "cannot mix aware and naive stamps in one index ({wall})"
                            )))
                        }
                    }
                }
                Self::from_aware(aware, freq)
            }
            Some(Stamp::Naive(_)) => {
                let mut naive = Vec::with_capacity(stamps.len());
                for stamp in &stamps {
                    match stamp {
                        Stamp::Naive(wall) => naive.push(*wall),
                        Stamp::Aware(dt) => {
                            return Err(TaktError::incompatible_indices(format!(
                                "cannot mix aware and naive stamps in one index ({dt})"
                            )))
                        }
                    }
                }
                Self::from_naive(naive, freq)
            }
        }
    }

    /// Creates an index from timezone-aware right bounds.
    ///
    /// Every stamp is shifted back by one period before the usual
    /// validation, so `[2020-01-02, 2020-01-03]` at daily frequency
    /// becomes the periods starting `2020-01-01` and `2020-01-02`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PeriodIndex::from_aware`].
    pub fn from_aware_right(stamps: Vec<DateTime<Tz>>, freq: Option<Frequency>) -> TaktResult<Self> {
        Self::from_stamps_right(stamps.into_iter().map(Stamp::Aware).collect(), freq)
    }

    /// Creates an index from naive right bounds.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PeriodIndex::from_naive`].
    pub fn from_naive_right(stamps: Vec<NaiveDateTime>, freq: Option<Frequency>) -> TaktResult<Self> {
        Self::from_stamps_right(stamps.into_iter().map(Stamp::Naive).collect(), freq)
    }

    /// Creates an index from right bounds of either kind.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PeriodIndex::from_stamps`].
    pub fn from_stamps_right(stamps: Vec<Stamp>, freq: Option<Frequency>) -> TaktResult<Self> {
        if stamps.is_empty() {
            return Err(empty_input_error());
        }
        // The spacing of right bounds equals the spacing of left bounds,
        // and a right bound's month is congruent to its anchor, so
        // inference works on the unshifted stamps.
        let freq = match freq {
            Some(freq) => freq.canonical(),
            None => infer_frequency(&stamps)?,
        };
        let shifted = stamps
            .iter()
            .map(|stamp| stamp.jump_back(freq))
            .collect::<TaktResult<Vec<Stamp>>>()?;
        Self::from_stamps(shifted, Some(freq))
    }

    /// Creates an empty index with the given attributes.
    #[must_use]
    pub fn empty(freq: Frequency, start_of_day: StartOfDay, tz: Option<Tz>) -> Self {
        let axis = match tz {
            Some(tz) => Axis::Aware {
                tz,
                stamps: Vec::new(),
                last_right: None,
            },
            None => Axis::Naive {
                stamps: Vec::new(),
                last_right: None,
            },
        };
        PeriodIndex {
            freq: freq.canonical(),
            start_of_day,
            axis,
        }
    }

    /// The frequency of the periods.
    #[must_use]
    pub fn freq(&self) -> Frequency {
        self.freq
    }

    /// The wall-clock time at which delivery days begin.
    #[must_use]
    pub fn start_of_day(&self) -> StartOfDay {
        self.start_of_day
    }

    /// The timezone, or `None` for a naive index.
    #[must_use]
    pub fn timezone(&self) -> Option<Tz> {
        match &self.axis {
            Axis::Aware { tz, .. } => Some(*tz),
            Axis::Naive { .. } => None,
        }
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.axis {
            Axis::Aware { stamps, .. } => stamps.len(),
            Axis::Naive { stamps, .. } => stamps.len(),
        }
    }

    /// Returns true when the index holds no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The left bound at a position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<Stamp> {
        match &self.axis {
            Axis::Aware { stamps, .. } => stamps.get(position).copied().map(Stamp::Aware),
            Axis::Naive { stamps, .. } => stamps.get(position).copied().map(Stamp::Naive),
        }
    }

    /// The first left bound.
    #[must_use]
    pub fn first(&self) -> Option<Stamp> {
        self.get(0)
    }

    /// The last left bound.
    #[must_use]
    pub fn last(&self) -> Option<Stamp> {
        self.len().checked_sub(1).and_then(|last| self.get(last))
    }

    /// The right bound of the final period.
    #[must_use]
    pub fn last_right(&self) -> Option<Stamp> {
        match &self.axis {
            Axis::Aware { last_right, .. } => last_right.map(Stamp::Aware),
            Axis::Naive { last_right, .. } => last_right.map(Stamp::Naive),
        }
    }

    /// The right bound of the period at a position.
    #[must_use]
    pub fn right_bound(&self, position: usize) -> Option<Stamp> {
        if position + 1 < self.len() {
            self.get(position + 1)
        } else if position + 1 == self.len() {
            self.last_right()
        } else {
            None
        }
    }

    /// Iterates over the left bounds.
    pub fn iter(&self) -> impl Iterator<Item = Stamp> + '_ {
        (0..self.len()).filter_map(move |position| self.get(position))
    }

    /// The right bound of every period.
    #[must_use]
    pub fn right_bounds(&self) -> Vec<Stamp> {
        (0..self.len())
            .filter_map(|position| self.right_bound(position))
            .collect()
    }

    /// The physical duration of every period.
    ///
    /// Aware indices measure between instants, so daylight-saving
    /// transitions yield 23 h and 25 h days; naive indices measure on the
    /// uniform wall clock.
    #[must_use]
    pub fn durations(&self) -> Vec<Hours> {
        (0..self.len())
            .filter_map(|position| {
                let left = self.get(position)?;
                let right = self.right_bound(position)?;
                Some(Hours::from_timedelta(right.delta_since(&left)))
            })
            .collect()
    }

    /// Position of an exact left bound, if present.
    #[must_use]
    pub fn position(&self, stamp: &Stamp) -> Option<usize> {
        match (&self.axis, stamp) {
            (Axis::Aware { stamps, .. }, Stamp::Aware(dt)) => stamps.binary_search(dt).ok(),
            (Axis::Naive { stamps, .. }, Stamp::Naive(wall)) => stamps.binary_search(wall).ok(),
            _ => None,
        }
    }

    /// First position whose left bound is not before `bound`. The bound
    /// must be of the index's kind; a mixed call returns 0.
    pub(crate) fn partition_below(&self, bound: &Stamp) -> usize {
        match (&self.axis, bound) {
            (Axis::Aware { stamps, .. }, Stamp::Aware(b)) => stamps.partition_point(|s| s < b),
            (Axis::Naive { stamps, .. }, Stamp::Naive(b)) => stamps.partition_point(|s| s < b),
            _ => 0,
        }
    }

    /// Contiguous subrange `[lo, hi)` of this index.
    ///
    /// Cut points of a sub-daily index must be at whole hours (they are,
    /// for every caller: day bounds or hour bounds); the start-of-day of a
    /// non-empty sub-daily slice is re-derived from its first element.
    pub(crate) fn slice(&self, lo: usize, hi: usize) -> TaktResult<PeriodIndex> {
        let lo = lo.min(self.len());
        let hi = hi.min(self.len());
        if lo >= hi {
            return Ok(PeriodIndex::empty(self.freq, self.start_of_day, self.timezone()));
        }
        let start_of_day = if self.freq.is_sub_daily() {
            match self.get(lo) {
                Some(first) => StartOfDay::new(first.time())?,
                None => self.start_of_day,
            }
        } else {
            self.start_of_day
        };
        let axis = match &self.axis {
            Axis::Aware { tz, stamps, last_right } => Axis::Aware {
                tz: *tz,
                stamps: stamps[lo..hi].to_vec(),
                last_right: if hi < stamps.len() {
                    Some(stamps[hi])
                } else {
                    *last_right
                },
            },
            Axis::Naive { stamps, last_right } => Axis::Naive {
                stamps: stamps[lo..hi].to_vec(),
                last_right: if hi < stamps.len() {
                    Some(stamps[hi])
                } else {
                    *last_right
                },
            },
        };
        Ok(PeriodIndex {
            freq: self.freq,
            start_of_day,
            axis,
        })
    }

    /// Replaces the start-of-day of an empty index. Callers guarantee the
    /// index is empty; non-empty indices derive it from their first stamp.
    pub(crate) fn set_empty_start_of_day(&mut self, start_of_day: StartOfDay) {
        if self.is_empty() {
            self.start_of_day = start_of_day;
        }
    }
}

/// Shared validation walk over a non-empty run of stamps.
fn validate_stamps(
    stamps: &[Stamp],
    freq: Option<Frequency>,
) -> TaktResult<(Frequency, StartOfDay, Stamp)> {
    let first = stamps[0];
    let freq = match freq {
        Some(freq) => freq.canonical(),
        None => infer_frequency(stamps)?,
    };
    let start_of_day = StartOfDay::new(first.time())?;
    if !first.is_boundary(freq, start_of_day)? {
        return Err(TaktError::unaligned_boundary(format!(
            "{first} is not a left period bound at frequency {freq}"
        )));
    }
    let mut prev = first;
    for stamp in &stamps[1..] {
        let expected = prev.jump(freq)?;
        if *stamp != expected {
            return Err(TaktError::gap_or_disorder(format!(
                "expected {expected} after {prev}, found {stamp}"
            )));
        }
        prev = *stamp;
    }
    let last_right = prev.jump(freq)?;
    if freq.is_sub_daily() && last_right.time() != start_of_day.time() {
        return Err(TaktError::partial_day(format!(
            "a {freq} index must span whole days, but it ends at {last_right} instead of at {start_of_day}"
        )));
    }
    Ok((freq, start_of_day, last_right))
}

/// Infers the frequency from the spacing of the first two stamps.
fn infer_frequency(stamps: &[Stamp]) -> TaktResult<Frequency> {
    if stamps.len() < 2 {
        return Err(TaktError::invalid_frequency(
            "cannot infer a frequency from fewer than two stamps; pass one explicitly",
        ));
    }
    let spacing = stamps[1].delta_since(&stamps[0]);
    frequency_from_spacing(spacing, month_of(&stamps[0]))
}

/// Maps a spacing to a frequency. Daily and longer windows are wide enough
/// to absorb daylight-saving shifts and varying month lengths.
fn frequency_from_spacing(spacing: Duration, first_month: Month) -> TaktResult<Frequency> {
    const HOUR: i64 = 3600;
    const DAY: i64 = 86_400;
    let secs = spacing.num_seconds();
    if secs == 900 {
        Ok(Frequency::QuarterHour)
    } else if secs == HOUR {
        Ok(Frequency::Hour)
    } else if (23 * HOUR..=25 * HOUR).contains(&secs) {
        Ok(Frequency::Day)
    } else if (27 * DAY..=32 * DAY).contains(&secs) {
        Ok(Frequency::MonthStart)
    } else if (89 * DAY..=93 * DAY).contains(&secs) {
        Ok(Frequency::quarter_start(first_month))
    } else if (364 * DAY..=367 * DAY).contains(&secs) {
        Ok(Frequency::year_start(first_month))
    } else {
        Err(TaktError::invalid_frequency(format!(
            "cannot infer a frequency from a spacing of {spacing}"
        )))
    }
}

fn month_of(stamp: &Stamp) -> Month {
    // wall months are always 1..=12
    Month::try_from(stamp.wall().month() as u8).unwrap_or(Month::January)
}

fn empty_input_error() -> TaktError {
    TaktError::gap_or_disorder(
        "an index needs at least one stamp; use PeriodIndex::empty for an explicitly empty index",
    )
}

fn expect_aware(stamp: Stamp) -> DateTime<Tz> {
    match stamp {
        Stamp::Aware(dt) => dt,
        // validation preserves the axis kind
        Stamp::Naive(_) => unreachable!("naive stamp on an aware axis"),
    }
}

fn expect_naive(stamp: Stamp) -> NaiveDateTime {
    match stamp {
        Stamp::Naive(wall) => wall,
        Stamp::Aware(_) => unreachable!("aware stamp on a naive axis"),
    }
}

impl Serialize for PeriodIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PeriodIndex", 4)?;
        state.serialize_field("freq", &self.freq)?;
        state.serialize_field("start_of_day", &self.start_of_day)?;
        match &self.axis {
            Axis::Aware { tz, stamps, .. } => {
                state.serialize_field("tz", &Some(*tz))?;
                let instants: Vec<DateTime<Utc>> =
                    stamps.iter().map(|dt| dt.with_timezone(&Utc)).collect();
                state.serialize_field("stamps", &instants)?;
            }
            Axis::Naive { stamps, .. } => {
                state.serialize_field("tz", &None::<Tz>)?;
                state.serialize_field("stamps", stamps)?;
            }
        }
        state.end()
    }
}

/// Wire form of one stamp: aware indices carry UTC instants, naive indices
/// bare wall times. The two formats are disjoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum StampRepr {
    Instant(DateTime<Utc>),
    Wall(NaiveDateTime),
}

#[derive(Deserialize)]
struct PeriodIndexData {
    freq: Frequency,
    start_of_day: StartOfDay,
    tz: Option<Tz>,
    stamps: Vec<StampRepr>,
}

impl<'de> Deserialize<'de> for PeriodIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = PeriodIndexData::deserialize(deserializer)?;
        let index = match data.tz {
            Some(tz) => {
                let mut stamps = Vec::with_capacity(data.stamps.len());
                for repr in &data.stamps {
                    match repr {
                        StampRepr::Instant(instant) => stamps.push(instant.with_timezone(&tz)),
                        StampRepr::Wall(wall) => {
                            return Err(D::Error::custom(format!(
                                "aware index requires offset-carrying stamps, found {wall}"
                            )))
                        }
                    }
                }
                if stamps.is_empty() {
                    PeriodIndex::empty(data.freq, data.start_of_day, Some(tz))
                } else {
                    PeriodIndex::from_aware(stamps, Some(data.freq))
                        .map_err(D::Error::custom)?
                }
            }
            None => {
                let mut stamps = Vec::with_capacity(data.stamps.len());
                for repr in &data.stamps {
                    match repr {
                        StampRepr::Wall(wall) => stamps.push(*wall),
                        StampRepr::Instant(instant) => {
                            return Err(D::Error::custom(format!(
                                "naive index requires bare wall times, found {instant}"
                            )))
                        }
                    }
                }
                if stamps.is_empty() {
                    PeriodIndex::empty(data.freq, data.start_of_day, None)
                } else {
                    PeriodIndex::from_naive(stamps, Some(data.freq))
                        .map_err(D::Error::custom)?
                }
            }
        };
        if !index.is_empty() && index.start_of_day() != data.start_of_day {
            return Err(D::Error::custom(format!(
                "start-of-day {} does not match the first stamp",
                data.start_of_day
            )));
        }
        Ok(index)
    }
}
