//! Frequency conversion of value series.

use log::debug;
use takt_core::{FreqRelation, Frequency, PeriodIndex, TaktError, TaktResult};

use crate::series::{ValueKind, ValueSeries};

impl ValueSeries {
    /// Converts the series to the `target` frequency.
    ///
    /// Downsampling merges source periods into whole target periods:
    /// summable values add up, averagable values take the
    /// duration-weighted mean. Source periods at the edges that do not
    /// fill a whole target period are dropped. Upsampling splits each
    /// source period on the finer grid: averagable values repeat
    /// unchanged, summable values spread in proportion to physical
    /// duration. A target on the same grid returns the series as is.
    ///
    /// # Errors
    ///
    /// [`TaktError::IncomparableFrequencies`] when neither grid refines
    /// the other, e.g. quarters and years with misaligned anchors.
    pub fn resample(&self, target: Frequency) -> TaktResult<ValueSeries> {
        let source = self.index().freq();
        match source.compare(&target) {
            FreqRelation::Incomparable => {
                Err(TaktError::incomparable(source.to_string(), target.to_string()))
            }
            FreqRelation::Same => Ok(self.clone()),
            FreqRelation::Shorter | FreqRelation::Longer if self.is_empty() => {
                self.empty_at(target)
            }
            FreqRelation::Shorter => self.downsample(target),
            FreqRelation::Longer => self.upsample(target),
        }
    }

    /// An empty series with this series' attributes on the target grid.
    fn empty_at(&self, target: Frequency) -> TaktResult<ValueSeries> {
        ValueSeries::new(
            PeriodIndex::empty(target, self.index().start_of_day(), self.index().timezone()),
            Vec::new(),
            self.kind(),
        )
    }

    fn downsample(&self, target: Frequency) -> TaktResult<ValueSeries> {
        match self.kind() {
            ValueKind::Summable => self.downsample_summable(target),
            ValueKind::Averagable => {
                // Weight by physical duration, sum, then divide the
                // weight back out on the coarser grid.
                let weighted: Vec<f64> = self
                    .values()
                    .iter()
                    .zip(self.index().durations())
                    .map(|(value, duration)| value * duration.magnitude())
                    .collect();
                let summed = ValueSeries::new(self.index().clone(), weighted, ValueKind::Summable)?
                    .downsample_summable(target)?;
                let values: Vec<f64> = summed
                    .values()
                    .iter()
                    .zip(summed.index().durations())
                    .map(|(value, duration)| value / duration.magnitude())
                    .collect();
                ValueSeries::new(summed.index().clone(), values, ValueKind::Averagable)
            }
        }
    }

    fn downsample_summable(&self, target: Frequency) -> TaktResult<ValueSeries> {
        let trimmed = self.index().trim(target)?;
        if trimmed.len() < self.len() {
            debug!(
                "resampling to {target} drops {} periods outside whole target periods",
                self.len() - trimmed.len()
            );
        }
        let (Some(first), Some(end)) = (trimmed.first(), trimmed.last_right()) else {
            return self.empty_at(target);
        };
        let offset = self
            .index()
            .position(&first)
            .ok_or_else(|| TaktError::gap_or_disorder("trimmed bound is not on the source grid"))?;
        let values = self
            .values()
            .get(offset..offset + trimmed.len())
            .ok_or_else(|| TaktError::gap_or_disorder("trimmed span leaves the source values"))?;

        let mut lefts = Vec::new();
        let mut left = first;
        while left < end {
            lefts.push(left);
            left = left.jump(target)?;
        }
        let index = PeriodIndex::from_stamps(lefts, Some(target))?;

        let mut grouped = Vec::with_capacity(index.len());
        let mut cursor = 0;
        for position in 0..index.len() {
            let Some(right) = index.right_bound(position) else {
                break;
            };
            let mut sum = 0.0;
            while let Some(stamp) = trimmed.get(cursor) {
                if stamp >= right {
                    break;
                }
                sum += values[cursor];
                cursor += 1;
            }
            grouped.push(sum);
        }
        ValueSeries::new(index, grouped, ValueKind::Summable)
    }

    fn upsample(&self, target: Frequency) -> TaktResult<ValueSeries> {
        match self.kind() {
            ValueKind::Averagable => self.upsample_averagable(target),
            ValueKind::Summable => {
                // Spread as an hourly rate, then scale by each finer
                // period's duration.
                let rates: Vec<f64> = self
                    .values()
                    .iter()
                    .zip(self.index().durations())
                    .map(|(value, duration)| value / duration.magnitude())
                    .collect();
                let spread = ValueSeries::new(self.index().clone(), rates, ValueKind::Averagable)?
                    .upsample_averagable(target)?;
                let values: Vec<f64> = spread
                    .values()
                    .iter()
                    .zip(spread.index().durations())
                    .map(|(value, duration)| value * duration.magnitude())
                    .collect();
                ValueSeries::new(spread.index().clone(), values, ValueKind::Summable)
            }
        }
    }

    fn upsample_averagable(&self, target: Frequency) -> TaktResult<ValueSeries> {
        let (Some(first), Some(end)) = (self.index().first(), self.index().last_right()) else {
            return self.empty_at(target);
        };
        let mut lefts = Vec::new();
        let mut values = Vec::new();
        let mut source = 0;
        let mut left = first;
        while left < end {
            // Advance to the source period containing this target period.
            while self.index().right_bound(source).is_some_and(|right| right <= left) {
                source += 1;
            }
            let value = self
                .values()
                .get(source)
                .copied()
                .ok_or_else(|| TaktError::gap_or_disorder("target bound left the source span"))?;
            lefts.push(left);
            values.push(value);
            left = left.jump(target)?;
        }
        let index = PeriodIndex::from_stamps(lefts, Some(target))?;
        ValueSeries::new(index, values, ValueKind::Averagable)
    }
}
