//! Timezone conversion of value series.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use chrono_tz::Tz;
use log::debug;
use takt_core::{PeriodIndex, Stamp, TaktError, TaktResult};

use crate::series::ValueSeries;

impl ValueSeries {
    /// Converts the series to a timezone.
    ///
    /// A zone-aware series keeps its physical instants and takes the new
    /// zone's labels when `floating` is false; the relabeled boundaries
    /// must still sit on the period grid, which holds for an hourly or
    /// daily series between whole-hour zones but not for a monthly one.
    /// With `floating` true the wall-clock readings are kept instead and
    /// re-interpreted in the new zone, like reading the same delivery
    /// schedule in another market. A zone-agnostic series is interpreted
    /// in the new zone directly.
    ///
    /// Interpreting wall times is not one-to-one around clock changes: a
    /// value on a skipped time is dropped and a value on a doubled time
    /// is repeated.
    ///
    /// # Errors
    ///
    /// - [`TaktError::UnalignedBoundary`] when relabeled instants leave
    ///   the period grid
    /// - [`TaktError::AmbiguousLocalTime`] or
    ///   [`TaktError::NonexistentLocalTime`] when the first or last wall
    ///   time falls into a clock change of the new zone
    /// - [`TaktError::GapOrDisorder`] when the new zone's clock cannot
    ///   walk the span in whole periods
    pub fn to_zoned(&self, tz: Tz, floating: bool) -> TaktResult<ValueSeries> {
        match self.index().timezone() {
            Some(current) if current == tz => Ok(self.clone()),
            Some(_) if floating => self.to_agnostic()?.zone_in(tz),
            Some(_) => self.relabel_instants(tz),
            None => self.zone_in(tz),
        }
    }

    /// Strips the timezone, keeping wall-clock readings.
    ///
    /// For a sub-daily series the wall grid is completed across clock
    /// changes: of a doubled hour only the first value is kept, and a
    /// skipped hour is backfilled from the hour before it.
    ///
    /// # Errors
    ///
    /// [`TaktError::GapOrDisorder`] when the wall readings cannot walk
    /// the span in whole periods, or a skipped wall has no value within
    /// the preceding hour.
    pub fn to_agnostic(&self) -> TaktResult<ValueSeries> {
        let freq = self.index().freq();
        if self.index().timezone().is_none() {
            return Ok(self.clone());
        }
        let (Some(first), Some(last)) = (self.index().first(), self.index().last()) else {
            let index = PeriodIndex::empty(freq, self.index().start_of_day(), None);
            return ValueSeries::new(index, Vec::new(), self.kind());
        };

        let mut walls = vec![first.wall()];
        let mut cursor = Stamp::Naive(first.wall());
        let end = Stamp::Naive(last.wall());
        while cursor < end {
            cursor = cursor.jump(freq)?;
            walls.push(cursor.wall());
        }
        if cursor != end {
            return Err(TaktError::gap_or_disorder(format!(
                "stepping {freq} wall times from {} misses {}",
                first.wall(),
                last.wall()
            )));
        }

        let values = if freq.is_sub_daily() {
            let mut by_wall: HashMap<NaiveDateTime, f64> = HashMap::new();
            for (stamp, value) in self.iter() {
                by_wall.entry(stamp.wall()).or_insert(value);
            }
            if by_wall.len() < self.len() {
                debug!(
                    "dropping {} values on wall times the clock change doubles",
                    self.len() - by_wall.len()
                );
            }
            let mut values = Vec::with_capacity(walls.len());
            let mut backfilled = 0usize;
            for wall in &walls {
                let value = match by_wall.get(wall) {
                    Some(value) => *value,
                    None => {
                        let Some(value) = by_wall.get(&(*wall - Duration::hours(1))) else {
                            return Err(TaktError::gap_or_disorder(format!(
                                "no value within one hour of the skipped wall time {wall}"
                            )));
                        };
                        backfilled += 1;
                        *value
                    }
                };
                values.push(value);
            }
            if backfilled > 0 {
                debug!("backfilling {backfilled} wall times the clock change skips");
            }
            values
        } else {
            self.values().to_vec()
        };

        let index = PeriodIndex::from_naive(walls, Some(freq))?;
        ValueSeries::new(index, values, self.kind())
    }

    /// Interprets a zone-agnostic series' wall readings in `tz`.
    fn zone_in(&self, tz: Tz) -> TaktResult<ValueSeries> {
        let freq = self.index().freq();
        let (Some(first), Some(last)) = (self.index().first(), self.index().last()) else {
            let index = PeriodIndex::empty(freq, self.index().start_of_day(), Some(tz));
            return ValueSeries::new(index, Vec::new(), self.kind());
        };

        let start = Stamp::localize(tz, first.wall())?;
        let end = Stamp::localize(tz, last.wall())?;
        let mut stamps = vec![start];
        let mut cursor = start;
        while cursor < end {
            cursor = cursor.jump(freq)?;
            stamps.push(cursor);
        }
        if cursor != end {
            return Err(TaktError::gap_or_disorder(format!(
                "stepping {freq} periods in {tz} from {start} misses {end}"
            )));
        }
        let index = PeriodIndex::from_stamps(stamps, Some(freq))?;

        let values = if freq.is_sub_daily() {
            index
                .iter()
                .map(|stamp| {
                    self.index()
                        .position(&Stamp::Naive(stamp.wall()))
                        .and_then(|p| self.values().get(p).copied())
                        .ok_or_else(|| {
                            TaktError::gap_or_disorder(format!(
                                "{} has no value in the zone-agnostic series",
                                stamp.wall()
                            ))
                        })
                })
                .collect::<TaktResult<Vec<f64>>>()?
        } else {
            self.values().to_vec()
        };
        match values.len().cmp(&self.len()) {
            Ordering::Less => debug!(
                "interpreting wall times in {tz} drops {} values on skipped times",
                self.len() - values.len()
            ),
            Ordering::Greater => debug!(
                "interpreting wall times in {tz} repeats {} values on doubled times",
                values.len() - self.len()
            ),
            Ordering::Equal => {}
        }

        ValueSeries::new(index, values, self.kind())
    }

    /// Relabels a zone-aware series' instants in `tz`, then re-validates
    /// the grid.
    fn relabel_instants(&self, tz: Tz) -> TaktResult<ValueSeries> {
        if self.is_empty() {
            let index =
                PeriodIndex::empty(self.index().freq(), self.index().start_of_day(), Some(tz));
            return ValueSeries::new(index, Vec::new(), self.kind());
        }
        let stamps = self
            .index()
            .iter()
            .map(|stamp| {
                stamp.as_aware().map(|dt| dt.with_timezone(&tz)).ok_or_else(|| {
                    TaktError::incompatible_indices(
                        "relabeling instants needs a zone-aware series",
                    )
                })
            })
            .collect::<TaktResult<Vec<_>>>()?;
        let index = PeriodIndex::from_aware(stamps, Some(self.index().freq()))?;
        ValueSeries::new(index, self.values().to_vec(), self.kind())
    }
}
