//! Physical duration of delivery periods, expressed in hours.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Duration of one or more delivery periods, in hours.
///
/// Durations are derived from period boundaries, so daylight-saving
/// transitions show up directly: the clock-change days of a European zone
/// last 23 h and 25 h, and the surrounding months 743 h and 745 h. The
/// unit is fixed; there is no quantity framework behind this type.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Hours(f64);

impl Hours {
    /// Zero hours.
    pub const ZERO: Hours = Hours(0.0);

    /// The unit symbol.
    pub const UNIT: &'static str = "h";

    /// Creates a duration of the given number of hours.
    #[must_use]
    pub fn new(hours: f64) -> Self {
        Hours(hours)
    }

    /// Converts a timedelta to hours.
    #[must_use]
    pub fn from_timedelta(delta: Duration) -> Self {
        Hours(delta.num_seconds() as f64 / 3600.0)
    }

    /// The number of hours as a bare float.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.0
    }
}

impl Add for Hours {
    type Output = Hours;

    fn add(self, rhs: Hours) -> Hours {
        Hours(self.0 + rhs.0)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Hours) {
        self.0 += rhs.0;
    }
}

impl Sub for Hours {
    type Output = Hours;

    fn sub(self, rhs: Hours) -> Hours {
        Hours(self.0 - rhs.0)
    }
}

impl Mul<f64> for Hours {
    type Output = Hours;

    fn mul(self, rhs: f64) -> Hours {
        Hours(self.0 * rhs)
    }
}

/// Ratio of two durations, e.g. the share of a source period inside a
/// target period.
impl Div for Hours {
    type Output = f64;

    fn div(self, rhs: Hours) -> f64 {
        self.0 / rhs.0
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Hours>>(iter: I) -> Hours {
        Hours(iter.map(|hours| hours.0).sum())
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, Hours::UNIT)
    }
}
