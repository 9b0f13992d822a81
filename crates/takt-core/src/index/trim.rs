//! Cutting an index to whole periods of another frequency or to a new
//! start-of-day.

use log::debug;

use super::PeriodIndex;
use crate::error::{TaktError, TaktResult};
use crate::types::{FreqRelation, Frequency, StartOfDay};

impl PeriodIndex {
    /// Keeps only the periods that lie within whole `target` periods.
    ///
    /// Trimming a daily index to `MS` drops the leading and trailing days
    /// that do not form complete calendar months. A target shorter than
    /// the index's own frequency changes nothing, and an incomparable
    /// target leaves no common period at all, so the result is empty.
    ///
    /// # Errors
    ///
    /// [`TaktError::OutOfRange`] when rounding to the target leaves the
    /// representable datetime range, and the rounding errors of
    /// [`Stamp::floor`](crate::Stamp::floor) when a target boundary of an
    /// aware index lands in a clock change.
    pub fn trim(&self, target: Frequency) -> TaktResult<PeriodIndex> {
        if self.is_empty() {
            return Ok(self.clone());
        }
        match self.freq().compare(&target) {
            FreqRelation::Incomparable => {
                debug!(
                    "trimming a {} index to incomparable {target} leaves nothing",
                    self.freq()
                );
                Ok(PeriodIndex::empty(self.freq(), self.start_of_day(), self.timezone()))
            }
            FreqRelation::Same => Ok(self.clone()),
            FreqRelation::Shorter | FreqRelation::Longer => {
                let (Some(first), Some(last_right)) = (self.first(), self.last_right()) else {
                    return Ok(self.clone());
                };
                let start = first.ceil(target, self.start_of_day())?;
                let end = last_right.floor(target, self.start_of_day())?;
                // Both cuts are on this index's own grid, so a left bound
                // below the end implies a right bound at or below it.
                let lo = self.partition_below(&start);
                let hi = self.partition_below(&end);
                self.slice(lo, hi)
            }
        }
    }

    /// Moves a daily-or-longer index to a new start-of-day.
    ///
    /// Every left bound keeps its date and takes the new wall time. An
    /// empty index just takes the new attribute.
    ///
    /// # Errors
    ///
    /// - [`TaktError::InvalidFrequency`] for a sub-daily index; those must
    ///   be cut with [`PeriodIndex::trim_to_startofday`] instead
    /// - [`TaktError::AmbiguousLocalTime`] or
    ///   [`TaktError::NonexistentLocalTime`] when a shifted bound lands in
    ///   a clock change
    pub fn replace_startofday(&self, start_of_day: StartOfDay) -> TaktResult<PeriodIndex> {
        if self.freq().is_sub_daily() {
            return Err(TaktError::invalid_frequency(format!(
                "replace_startofday applies to daily and longer indices; cut a {} index \
                 with trim_to_startofday",
                self.freq()
            )));
        }
        if self.is_empty() {
            let mut out = self.clone();
            out.set_empty_start_of_day(start_of_day);
            return Ok(out);
        }
        let stamps = self
            .iter()
            .map(|stamp| stamp.replace_time(start_of_day.time()))
            .collect::<TaktResult<Vec<_>>>()?;
        Self::from_stamps(stamps, Some(self.freq()))
    }

    /// Cuts a sub-daily index down to whole days at a new start-of-day.
    ///
    /// Periods before the first occurrence of `start_of_day` and after its
    /// last occurrence are dropped. An index too short to cover one whole
    /// day at the new start becomes empty.
    ///
    /// # Errors
    ///
    /// - [`TaktError::InvalidFrequency`] for a daily-or-longer index;
    ///   those take any start-of-day via
    ///   [`PeriodIndex::replace_startofday`]
    /// - [`TaktError::UnalignedBoundary`] when `start_of_day` does not
    ///   occur near the index's edges, as on a day whose clock skips the
    ///   requested hour
    pub fn trim_to_startofday(&self, start_of_day: StartOfDay) -> TaktResult<PeriodIndex> {
        if !self.freq().is_sub_daily() {
            return Err(TaktError::invalid_frequency(format!(
                "trim_to_startofday applies to sub-daily indices; move a {} index with \
                 replace_startofday",
                self.freq()
            )));
        }
        if self.is_empty() {
            let mut out = self.clone();
            out.set_empty_start_of_day(start_of_day);
            return Ok(out);
        }
        let Some((lo, hi)) = self.whole_day_cut(start_of_day) else {
            return Err(TaktError::unaligned_boundary(format!(
                "{start_of_day} does not bound a whole day at the edges of this index"
            )));
        };
        let mut out = self.slice(lo, hi)?;
        out.set_empty_start_of_day(start_of_day);
        Ok(out)
    }

    /// Positions cutting this sub-daily index to whole days at
    /// `start_of_day`, or `None` when the wall time does not occur within
    /// one day of either edge.
    ///
    /// The scan windows cover the longest possible day of 25 hours.
    pub(crate) fn whole_day_cut(&self, start_of_day: StartOfDay) -> Option<(usize, usize)> {
        let per_hour = if self.freq() == Frequency::QuarterHour { 4 } else { 1 };
        let window = 25 * per_hour;
        let target = start_of_day.time();
        let lo = (0..self.len().min(window))
            .find(|&p| self.get(p).map(|stamp| stamp.time()) == Some(target))?;
        let hi = (self.len().saturating_sub(window)..self.len())
            .rev()
            .find(|&p| self.right_bound(p).map(|stamp| stamp.time()) == Some(target))
            .map(|p| p + 1)?;
        (lo <= hi).then_some((lo, hi))
    }
}
