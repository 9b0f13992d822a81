//! # Takt Series
//!
//! Values on delivery-period indices for the Takt delivery-period library.
//!
//! This crate provides:
//!
//! - **Value Series**: One value per period of a validated
//!   [`PeriodIndex`](takt_core::PeriodIndex), declared summable (energy,
//!   revenue) or averagable (power, prices)
//! - **Resampling**: Frequency conversion that respects physical duration,
//!   summing extensive quantities and duration-weighting intensive ones
//! - **Timezone Conversion**: Instant-preserving and wall-clock-preserving
//!   moves between zones, and zone-agnostic clock series
//!
//! ## Design Philosophy
//!
//! - **Kinds Drive Arithmetic**: Whether values sum or average is declared at
//!   construction, never guessed from the data
//! - **Physical Weights**: Resampling weights by real duration, so a clock-change
//!   day counts its 23 or 25 hours
//! - **Lossy Is Loud**: Conversions that drop or repeat values around clock
//!   changes do so deterministically and log what they did
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use takt_series::prelude::*;
//!
//! // Two monthly totals, split into daily values
//! let months: Vec<_> = (1..=2)
//!     .map(|m| {
//!         NaiveDate::from_ymd_opt(2020, m, 1)
//!             .unwrap()
//!             .and_hms_opt(0, 0, 0)
//!             .unwrap()
//!     })
//!     .collect();
//! let index = PeriodIndex::from_naive(months, None).unwrap();
//! let totals = ValueSeries::summable(index, vec![310.0, 290.0]).unwrap();
//! let daily = totals.resample(Frequency::Day).unwrap();
//! assert_eq!(daily.len(), 60);
//! assert!(daily.values().iter().all(|&v| v == 10.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]

mod resample;
mod zone;

pub mod series;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::series::{ValueKind, ValueSeries};
    pub use takt_core::prelude::*;
}

// Re-export commonly used types at crate root
pub use series::{ValueKind, ValueSeries};
