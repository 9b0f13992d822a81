//! Intersection of period indices.
//!
//! The strict form requires identical attributes and returns the single
//! overlapping run. The flexible form can disregard differing frequencies,
//! timezones, or start-of-days and then returns one cut per input, each
//! keeping its own attributes.

use std::cmp::Ordering;

use chrono::{NaiveDateTime, NaiveTime};
use log::debug;

use super::PeriodIndex;
use crate::error::{TaktError, TaktResult};
use crate::types::{Frequency, Stamp, StartOfDay};

/// Which attribute mismatches [`PeriodIndex::intersect_flex`] tolerates.
///
/// By default none are tolerated, which makes the flexible intersection
/// behave like [`PeriodIndex::intersect`] applied per input.
///
/// ```
/// use takt_core::IntersectOptions;
///
/// let options = IntersectOptions::new().with_ignore_start_of_day();
/// assert!(options.ignore_start_of_day);
/// assert!(!options.ignore_freq);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntersectOptions {
    /// Allow inputs of different, comparable frequencies.
    pub ignore_freq: bool,
    /// Allow inputs in different timezones, matched on wall time.
    pub ignore_tz: bool,
    /// Allow inputs with different start-of-days, matched on calendar day.
    pub ignore_start_of_day: bool,
}

impl IntersectOptions {
    /// Tolerates no attribute mismatch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts inputs of different, comparable frequencies.
    #[must_use]
    pub fn with_ignore_freq(mut self) -> Self {
        self.ignore_freq = true;
        self
    }

    /// Accepts inputs in different timezones, matching on wall time.
    #[must_use]
    pub fn with_ignore_tz(mut self) -> Self {
        self.ignore_tz = true;
        self
    }

    /// Accepts inputs with different start-of-days, matching on calendar
    /// day.
    #[must_use]
    pub fn with_ignore_start_of_day(mut self) -> Self {
        self.ignore_start_of_day = true;
        self
    }
}

impl PeriodIndex {
    /// Intersects indices sharing frequency, timezone, and start-of-day.
    ///
    /// All inputs lie on one boundary grid, so the intersection is the
    /// contiguous run between the latest first bound and the earliest
    /// final right bound. The result carries the attributes of the first
    /// input; it is empty when any input is empty or the spans do not
    /// overlap.
    ///
    /// # Errors
    ///
    /// [`TaktError::IncompatibleIndices`] when called without inputs or
    /// when frequencies, timezones, or start-of-days differ; see
    /// [`PeriodIndex::intersect_flex`] to tolerate such differences.
    pub fn intersect(indices: &[PeriodIndex]) -> TaktResult<PeriodIndex> {
        let [head, rest @ ..] = indices else {
            return Err(TaktError::incompatible_indices(
                "intersection needs at least one index",
            ));
        };
        if rest.is_empty() {
            return Ok(head.clone());
        }
        if let Some(other) = rest.iter().find(|i| !i.freq().equivalent(&head.freq())) {
            return Err(TaktError::incompatible_indices(format!(
                "cannot intersect a {} index with a {} index; \
                 use intersect_flex with ignore_freq to mix frequencies",
                head.freq(),
                other.freq()
            )));
        }
        if let Some(other) = rest.iter().find(|i| i.timezone() != head.timezone()) {
            return Err(TaktError::incompatible_indices(format!(
                "cannot intersect indices in {} and {}; \
                 use intersect_flex with ignore_tz to mix timezones",
                tz_label(head.timezone()),
                tz_label(other.timezone())
            )));
        }
        if indices.iter().any(|i| i.is_empty()) {
            debug!("intersecting with an empty index leaves nothing");
            return Ok(PeriodIndex::empty(head.freq(), head.start_of_day(), head.timezone()));
        }
        if let Some(other) = rest.iter().find(|i| i.start_of_day() != head.start_of_day()) {
            return Err(TaktError::incompatible_indices(format!(
                "cannot intersect indices starting their days at {} and {}; \
                 use intersect_flex with ignore_start_of_day to mix them",
                head.start_of_day(),
                other.start_of_day()
            )));
        }
        let (Some(start), Some(end)) = (
            indices.iter().filter_map(|i| i.first()).reduce(later),
            indices.iter().filter_map(|i| i.last_right()).reduce(earlier),
        ) else {
            return Ok(PeriodIndex::empty(head.freq(), head.start_of_day(), head.timezone()));
        };
        let lo = head.partition_below(&start);
        let hi = head.partition_below(&end);
        head.slice(lo, hi)
    }

    /// Intersects indices while tolerating the mismatches named in
    /// `options`, returning one cut per input in input order.
    ///
    /// Inputs are matched on wall time when timezones are ignored and on
    /// calendar day when start-of-days are ignored. The kept stretch runs
    /// from the earliest left bound present in every input to the latest
    /// right bound present in every input, so the cuts cover the same span
    /// even when the inputs' grids do not line up; with no bound common to
    /// all inputs, every cut is empty. Each cut keeps the frequency,
    /// timezone, and start-of-day of its input; a sub-daily cut is
    /// additionally shrunk to whole days at its own start-of-day.
    ///
    /// # Errors
    ///
    /// - [`TaktError::IncomparableFrequencies`] when two input frequencies
    ///   are incomparable, whether or not `ignore_freq` is set
    /// - [`TaktError::IncompatibleIndices`] when called without inputs or
    ///   when an attribute differs and its ignore flag is not set
    pub fn intersect_flex(
        indices: &[PeriodIndex],
        options: IntersectOptions,
    ) -> TaktResult<Vec<PeriodIndex>> {
        let [head, rest @ ..] = indices else {
            return Err(TaktError::incompatible_indices(
                "intersection needs at least one index",
            ));
        };
        if rest.is_empty() {
            return Ok(vec![head.clone()]);
        }
        let freqs: Vec<Frequency> = indices.iter().map(PeriodIndex::freq).collect();
        let sorted = Frequency::sorted(&freqs)?;
        let extremes_equivalent = match (sorted.first(), sorted.last()) {
            (Some(shortest), Some(longest)) => shortest.equivalent(longest),
            _ => true,
        };
        if !options.ignore_freq && !extremes_equivalent {
            return Err(TaktError::incompatible_indices(
                "frequencies differ; set ignore_freq to intersect across frequencies",
            ));
        }
        let same_tz = rest.iter().all(|i| i.timezone() == head.timezone());
        if !options.ignore_tz && !same_tz {
            return Err(TaktError::incompatible_indices(
                "timezones differ; set ignore_tz to intersect across timezones",
            ));
        }
        if indices.iter().any(|i| i.is_empty()) {
            debug!("intersecting with an empty index leaves nothing");
            return Ok(indices
                .iter()
                .map(|i| PeriodIndex::empty(i.freq(), i.start_of_day(), i.timezone()))
                .collect());
        }
        let same_sod = rest.iter().all(|i| i.start_of_day() == head.start_of_day());
        if !options.ignore_start_of_day && !same_sod {
            return Err(TaktError::incompatible_indices(
                "start-of-days differ; set ignore_start_of_day to intersect across them",
            ));
        }
        // Differing timezones are matched on wall time and differing
        // start-of-days on calendar day.
        let strip_time = !same_sod;
        let mut lefts = left_keys(head, strip_time);
        let mut rights = right_keys(head, strip_time);
        for index in rest {
            lefts = common_keys(&lefts, &left_keys(index, strip_time));
            rights = common_keys(&rights, &right_keys(index, strip_time));
        }
        let (Some(&start), Some(&end)) = (lefts.first(), rights.last()) else {
            debug!("no period bound is shared by every input");
            return Ok(indices
                .iter()
                .map(|i| PeriodIndex::empty(i.freq(), i.start_of_day(), i.timezone()))
                .collect());
        };
        indices
            .iter()
            .map(|index| flex_cut(index, start, end, strip_time))
            .collect()
    }
}

/// The comparison key of a bound in a flexible intersection.
fn flex_key(stamp: &Stamp, strip_time: bool) -> NaiveDateTime {
    let wall = stamp.wall();
    if strip_time {
        wall.date().and_time(NaiveTime::MIN)
    } else {
        wall
    }
}

/// Keys of all left bounds of `index`, in element order.
fn left_keys(index: &PeriodIndex, strip_time: bool) -> Vec<NaiveDateTime> {
    (0..index.len())
        .filter_map(|p| index.get(p))
        .map(|stamp| flex_key(&stamp, strip_time))
        .collect()
}

/// Keys of all right bounds of `index`, in element order.
fn right_keys(index: &PeriodIndex, strip_time: bool) -> Vec<NaiveDateTime> {
    (0..index.len())
        .filter_map(|p| index.right_bound(p))
        .map(|stamp| flex_key(&stamp, strip_time))
        .collect()
}

/// Ordered set intersection of two ascending key runs.
fn common_keys(a: &[NaiveDateTime], b: &[NaiveDateTime]) -> Vec<NaiveDateTime> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while let (Some(x), Some(y)) = (a.get(i), b.get(j)) {
        match x.cmp(y) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                if out.last() != Some(x) {
                    out.push(*x);
                }
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Cuts one input to the stretch `[start, end]` in key space.
fn flex_cut(
    index: &PeriodIndex,
    start: NaiveDateTime,
    end: NaiveDateTime,
    strip_time: bool,
) -> TaktResult<PeriodIndex> {
    let lo = partition_positions(index.len(), |p| {
        index.get(p).is_some_and(|stamp| flex_key(&stamp, strip_time) < start)
    });
    let hi = partition_positions(index.len(), |p| {
        index
            .right_bound(p)
            .is_some_and(|stamp| flex_key(&stamp, strip_time) <= end)
    });
    let cut = index.slice(lo, hi)?;
    if !strip_time || !index.freq().is_sub_daily() {
        return Ok(cut);
    }
    // Day-granular cuts leave partial days on sub-daily inputs; shrink to
    // whole days at the input's own start-of-day.
    match cut.whole_day_cut(index.start_of_day()) {
        Some((lo, hi)) => cut.slice(lo, hi),
        None => {
            debug!(
                "flexible intersection leaves no whole day at {}",
                index.start_of_day()
            );
            Ok(PeriodIndex::empty(index.freq(), index.start_of_day(), index.timezone()))
        }
    }
}

/// First position at which `pred` turns false; `pred` must be monotone
/// over positions.
fn partition_positions(len: usize, pred: impl Fn(usize) -> bool) -> usize {
    let mut lo = 0;
    let mut hi = len;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

fn later(a: Stamp, b: Stamp) -> Stamp {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

fn earlier(a: Stamp, b: Stamp) -> Stamp {
    match b.partial_cmp(&a) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

fn tz_label(tz: Option<chrono_tz::Tz>) -> String {
    match tz {
        Some(tz) => tz.to_string(),
        None => String::from("no timezone"),
    }
}
