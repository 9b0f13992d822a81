//! Values attached to a delivery-period index.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use takt_core::{Frequency, PeriodIndex, Stamp, TaktError, TaktResult};

/// How the values of a series aggregate when periods merge or split.
///
/// The kind is supplied by the caller at construction and never inferred
/// from the data; it decides which resampling arithmetic applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// An extensive quantity such as energy in MWh or revenue in EUR:
    /// merging periods adds the values.
    Summable,
    /// An intensive quantity such as power in MW or a price in EUR/MWh:
    /// merging periods takes the duration-weighted mean.
    Averagable,
}

/// One `f64` value per period of a [`PeriodIndex`].
///
/// The index carries all calendar knowledge; the series only guarantees
/// that values and periods stay aligned, which every transformation
/// preserves by construction.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use takt_core::PeriodIndex;
/// use takt_series::ValueSeries;
///
/// let days: Vec<_> = (1..=3)
///     .map(|d| NaiveDate::from_ymd_opt(2020, 7, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
///     .collect();
/// let index = PeriodIndex::from_naive(days, None).unwrap();
/// let series = ValueSeries::summable(index, vec![240.0, 240.0, 240.0]).unwrap();
/// assert_eq!(series.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSeries {
    index: PeriodIndex,
    values: Vec<f64>,
    kind: ValueKind,
}

impl ValueSeries {
    /// Creates a series of the given kind.
    ///
    /// # Errors
    ///
    /// [`TaktError::LengthMismatch`] when the number of values differs
    /// from the number of periods.
    pub fn new(index: PeriodIndex, values: Vec<f64>, kind: ValueKind) -> TaktResult<Self> {
        if index.len() != values.len() {
            return Err(TaktError::length_mismatch(index.len(), values.len()));
        }
        Ok(ValueSeries { index, values, kind })
    }

    /// Creates a series of an extensive quantity, one value per period.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ValueSeries::new`].
    pub fn summable(index: PeriodIndex, values: Vec<f64>) -> TaktResult<Self> {
        Self::new(index, values, ValueKind::Summable)
    }

    /// Creates a series of an intensive quantity, one value per period.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ValueSeries::new`].
    pub fn averagable(index: PeriodIndex, values: Vec<f64>) -> TaktResult<Self> {
        Self::new(index, values, ValueKind::Averagable)
    }

    /// Creates a series from local clock readings in `tz`.
    ///
    /// The stamps are resolved like
    /// [`PeriodIndex::from_local_clock`]: a wall time repeated by the
    /// autumn transition is accepted when it occurs exactly twice, read as
    /// the earlier instant first.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PeriodIndex::from_local_clock`] and
    /// [`ValueSeries::new`].
    pub fn from_local_clock(
        stamps: Vec<NaiveDateTime>,
        tz: Tz,
        freq: Option<Frequency>,
        values: Vec<f64>,
        kind: ValueKind,
    ) -> TaktResult<Self> {
        let index = PeriodIndex::from_local_clock(stamps, tz, freq)?;
        Self::new(index, values, kind)
    }

    /// The index the values are defined over.
    #[must_use]
    pub fn index(&self) -> &PeriodIndex {
        &self.index
    }

    /// The values, one per period.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether the values sum or average when periods merge.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the series holds no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The left bound and value at a position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<(Stamp, f64)> {
        let stamp = self.index.get(position)?;
        let value = self.values.get(position).copied()?;
        Some((stamp, value))
    }

    /// Iterates over left bounds and values.
    pub fn iter(&self) -> impl Iterator<Item = (Stamp, f64)> + '_ {
        self.index.iter().zip(self.values.iter().copied())
    }
}

impl Serialize for ValueSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValueSeries", 3)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("values", &self.values)?;
        state.serialize_field("kind", &self.kind)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct ValueSeriesData {
    index: PeriodIndex,
    values: Vec<f64>,
    kind: ValueKind,
}

impl<'de> Deserialize<'de> for ValueSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = ValueSeriesData::deserialize(deserializer)?;
        ValueSeries::new(data.index, data.values, data.kind).map_err(D::Error::custom)
    }
}
