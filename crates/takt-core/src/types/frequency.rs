//! Delivery-period frequencies and their partial order.
//!
//! A [`Frequency`] names the length of a delivery period: quarter-hour,
//! hour, calendar day, calendar month, calendar quarter or calendar year.
//! Quarters and years carry an anchor month that fixes where periods start.
//! Quarter anchors three months apart describe the same period grid, so
//! they are collapsed to one canonical representative at construction.

use crate::error::{TaktError, TaktResult};
use chrono::Month;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Uppercase three-letter month tokens, indexed by month number minus one.
const MONTH_TOKENS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Length of a delivery period.
///
/// Parsed from and displayed as the canonical tokens `15min`, `h`, `D`,
/// `MS`, `QS-<MON>` and `YS-<MON>`. No other tokens exist; in particular
/// there are no multiples (`2h`, `7D`), no week frequency and no period-end
/// variants.
///
/// # Example
///
/// ```
/// use takt_core::Frequency;
///
/// let freq: Frequency = "QS-OCT".parse().unwrap();
/// // Anchor months three apart describe the same grid.
/// assert_eq!(freq, "QS-JAN".parse().unwrap());
/// assert_eq!(freq.to_string(), "QS-JAN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    /// Fifteen-minute periods (`15min`)
    QuarterHour,
    /// One-hour periods (`h`)
    Hour,
    /// Calendar-day periods (`D`)
    Day,
    /// Calendar-month periods (`MS`)
    MonthStart,
    /// Calendar-quarter periods starting in the anchor month (`QS-<MON>`).
    ///
    /// The anchor is stored canonically as January, February or March.
    /// Use [`Frequency::quarter_start`] rather than constructing the
    /// variant directly, so the anchor is reduced for you.
    QuarterStart(Month),
    /// Calendar-year periods starting in the anchor month (`YS-<MON>`).
    ///
    /// Year anchors are *not* reduced: `YS-JAN` and `YS-APR` describe
    /// different period grids.
    YearStart(Month),
}

/// How one frequency relates to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreqRelation {
    /// The left frequency has shorter periods; its boundaries refine the
    /// right frequency's boundaries.
    Shorter,
    /// Both frequencies describe the same period grid.
    Same,
    /// The left frequency has longer periods.
    Longer,
    /// Neither grid refines the other (e.g. years with different anchors).
    Incomparable,
}

impl Frequency {
    /// All canonical frequencies, shortest first.
    pub const ALL: [Frequency; 19] = [
        Frequency::QuarterHour,
        Frequency::Hour,
        Frequency::Day,
        Frequency::MonthStart,
        Frequency::QuarterStart(Month::January),
        Frequency::QuarterStart(Month::February),
        Frequency::QuarterStart(Month::March),
        Frequency::YearStart(Month::January),
        Frequency::YearStart(Month::February),
        Frequency::YearStart(Month::March),
        Frequency::YearStart(Month::April),
        Frequency::YearStart(Month::May),
        Frequency::YearStart(Month::June),
        Frequency::YearStart(Month::July),
        Frequency::YearStart(Month::August),
        Frequency::YearStart(Month::September),
        Frequency::YearStart(Month::October),
        Frequency::YearStart(Month::November),
        Frequency::YearStart(Month::December),
    ];

    /// Creates a quarterly frequency, reducing the anchor to its canonical
    /// representative (January, February or March).
    #[must_use]
    pub fn quarter_start(anchor: Month) -> Self {
        Frequency::QuarterStart(canonical_quarter_anchor(anchor))
    }

    /// Creates a yearly frequency with the given anchor month.
    #[must_use]
    pub fn year_start(anchor: Month) -> Self {
        Frequency::YearStart(anchor)
    }

    /// Returns the canonical form of this frequency.
    ///
    /// Identity for everything except quarters constructed with a
    /// non-canonical anchor month.
    #[must_use]
    pub fn canonical(&self) -> Self {
        match self {
            Frequency::QuarterStart(anchor) => Frequency::quarter_start(*anchor),
            other => *other,
        }
    }

    /// Returns the anchor month for quarters and years, `None` otherwise.
    #[must_use]
    pub fn anchor(&self) -> Option<Month> {
        match self.canonical() {
            Frequency::QuarterStart(anchor) | Frequency::YearStart(anchor) => Some(anchor),
            _ => None,
        }
    }

    /// Returns true for the quarter-hour and hour frequencies.
    #[must_use]
    pub fn is_sub_daily(&self) -> bool {
        matches!(self, Frequency::QuarterHour | Frequency::Hour)
    }

    /// Returns the number of calendar months in one period, or `None` for
    /// daily and shorter frequencies.
    #[must_use]
    pub fn months_per_period(&self) -> Option<u32> {
        match self {
            Frequency::QuarterHour | Frequency::Hour | Frequency::Day => None,
            Frequency::MonthStart => Some(1),
            Frequency::QuarterStart(_) => Some(3),
            Frequency::YearStart(_) => Some(12),
        }
    }

    /// Compares two frequencies on the period lattice.
    ///
    /// `Shorter` means every period boundary of `other` is also a boundary
    /// of `self`, so values at `self` can be grouped into `other` without
    /// splitting a period. Quarters relate to years only when their anchors
    /// agree modulo three; years with different anchors are incomparable.
    ///
    /// # Example
    ///
    /// ```
    /// use takt_core::{FreqRelation, Frequency};
    ///
    /// let day: Frequency = "D".parse().unwrap();
    /// let month: Frequency = "MS".parse().unwrap();
    /// assert_eq!(day.compare(&month), FreqRelation::Shorter);
    /// ```
    #[must_use]
    pub fn compare(&self, other: &Frequency) -> FreqRelation {
        let (a, b) = (self.canonical(), other.canonical());
        if a == b {
            return FreqRelation::Same;
        }
        match (a.ladder_rank(), b.ladder_rank()) {
            (Some(ra), Some(rb)) if ra < rb => FreqRelation::Shorter,
            (Some(_), Some(_)) => FreqRelation::Longer,
            // Sub-daily through monthly boundaries refine every quarter and
            // year grid regardless of anchor.
            (Some(_), None) => FreqRelation::Shorter,
            (None, Some(_)) => FreqRelation::Longer,
            (None, None) => match (a, b) {
                (Frequency::QuarterStart(qa), Frequency::YearStart(ya)) => {
                    if anchors_agree(qa, ya) {
                        FreqRelation::Shorter
                    } else {
                        FreqRelation::Incomparable
                    }
                }
                (Frequency::YearStart(ya), Frequency::QuarterStart(qa)) => {
                    if anchors_agree(qa, ya) {
                        FreqRelation::Longer
                    } else {
                        FreqRelation::Incomparable
                    }
                }
                // Two quarters or two years with distinct canonical anchors.
                _ => FreqRelation::Incomparable,
            },
        }
    }

    /// Returns true when both frequencies describe the same period grid.
    #[must_use]
    pub fn equivalent(&self, other: &Frequency) -> bool {
        self.compare(other) == FreqRelation::Same
    }

    /// Sorts frequencies from shortest to longest.
    ///
    /// Equivalent frequencies stay in input order within their run.
    ///
    /// # Errors
    ///
    /// Fails with [`TaktError::IncomparableFrequencies`] if any pair cannot
    /// be ordered, and with [`TaktError::InvalidFrequency`] for an empty
    /// input.
    pub fn sorted(freqs: &[Frequency]) -> TaktResult<Vec<Frequency>> {
        if freqs.is_empty() {
            return Err(TaktError::invalid_frequency(
                "at least one frequency is required",
            ));
        }
        for (i, a) in freqs.iter().enumerate() {
            for b in &freqs[i + 1..] {
                if a.compare(b) == FreqRelation::Incomparable {
                    return Err(TaktError::incomparable(a.to_string(), b.to_string()));
                }
            }
        }
        let mut out: Vec<Frequency> = freqs.iter().map(Frequency::canonical).collect();
        out.sort_by_key(Frequency::sort_rank);
        Ok(out)
    }

    /// Returns the shortest of the given frequencies.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Frequency::sorted`].
    pub fn shortest(freqs: &[Frequency]) -> TaktResult<Frequency> {
        Self::sorted(freqs).map(|sorted| sorted[0])
    }

    /// Returns the longest of the given frequencies.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Frequency::sorted`].
    pub fn longest(freqs: &[Frequency]) -> TaktResult<Frequency> {
        Self::sorted(freqs).map(|sorted| sorted[sorted.len() - 1])
    }

    /// Position on the sub-daily-to-monthly ladder, `None` for quarters and
    /// years.
    fn ladder_rank(&self) -> Option<u8> {
        match self {
            Frequency::QuarterHour => Some(0),
            Frequency::Hour => Some(1),
            Frequency::Day => Some(2),
            Frequency::MonthStart => Some(3),
            Frequency::QuarterStart(_) | Frequency::YearStart(_) => None,
        }
    }

    /// Sort key for comparable sets: equivalent members map to equal keys.
    fn sort_rank(&self) -> u8 {
        match self {
            Frequency::QuarterHour => 0,
            Frequency::Hour => 1,
            Frequency::Day => 2,
            Frequency::MonthStart => 3,
            Frequency::QuarterStart(_) => 4,
            Frequency::YearStart(_) => 5,
        }
    }
}

/// Reduces a quarter anchor to January, February or March.
fn canonical_quarter_anchor(anchor: Month) -> Month {
    match anchor.number_from_month() % 3 {
        1 => Month::January,
        2 => Month::February,
        _ => Month::March,
    }
}

/// Quarter and year anchors describe nested grids iff they agree modulo
/// three.
fn anchors_agree(quarter_anchor: Month, year_anchor: Month) -> bool {
    quarter_anchor.number_from_month() % 3 == year_anchor.number_from_month() % 3
}

/// Parses an uppercase three-letter month token.
fn parse_month_token(token: &str) -> TaktResult<Month> {
    MONTH_TOKENS
        .iter()
        .position(|candidate| *candidate == token)
        .and_then(|position| Month::try_from(position as u8 + 1).ok())
        .ok_or_else(|| TaktError::invalid_frequency(format!("unknown month token '{token}'")))
}

impl FromStr for Frequency {
    type Err = TaktError;

    /// Parses one of the canonical frequency tokens.
    ///
    /// `QS` and `YS` without an anchor mean January. Anything else,
    /// including multiples (`2h`), week frequencies (`W-MON`) and
    /// period-end tokens (`ME`), is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "15min" => Ok(Frequency::QuarterHour),
            "h" => Ok(Frequency::Hour),
            "D" => Ok(Frequency::Day),
            "MS" => Ok(Frequency::MonthStart),
            "QS" => Ok(Frequency::quarter_start(Month::January)),
            "YS" => Ok(Frequency::year_start(Month::January)),
            other => {
                if let Some(token) = other.strip_prefix("QS-") {
                    Ok(Frequency::quarter_start(parse_month_token(token)?))
                } else if let Some(token) = other.strip_prefix("YS-") {
                    Ok(Frequency::year_start(parse_month_token(token)?))
                } else {
                    Err(TaktError::invalid_frequency(format!(
                        "unsupported frequency token '{other}'"
                    )))
                }
            }
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical() {
            Frequency::QuarterHour => write!(f, "15min"),
            Frequency::Hour => write!(f, "h"),
            Frequency::Day => write!(f, "D"),
            Frequency::MonthStart => write!(f, "MS"),
            Frequency::QuarterStart(anchor) => {
                write!(f, "QS-{}", MONTH_TOKENS[anchor.number_from_month() as usize - 1])
            }
            Frequency::YearStart(anchor) => {
                write!(f, "YS-{}", MONTH_TOKENS[anchor.number_from_month() as usize - 1])
            }
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = TaktError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(freq: Frequency) -> Self {
        freq.to_string()
    }
}
