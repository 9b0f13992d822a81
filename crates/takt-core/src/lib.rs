//! # Takt Core
//!
//! Core types and calendar arithmetic for the Takt delivery-period library.
//!
//! This crate provides the foundational building blocks used throughout Takt:
//!
//! - **Types**: Domain-specific types like `Stamp`, `Frequency`, `StartOfDay`, `Hours`
//! - **Boundary Arithmetic**: Floor, ceiling, and single-period jumps that stay exact
//!   across daylight-saving transitions
//! - **Period Indices**: Validated, gapless runs of delivery periods with trimming,
//!   intersection, and start-of-day handling
//!
//! ## Design Philosophy
//!
//! - **Validate Once**: An index that exists is gapless and whole; downstream code
//!   never re-checks
//! - **Physical Time**: Durations come from instants, so a transition day has
//!   23 or 25 hours
//! - **Explicit Over Implicit**: Aware and naive stamps never mix silently
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use takt_core::prelude::*;
//!
//! // Four calendar days, frequency inferred from the spacing
//! let days: Vec<_> = (1..=4)
//!     .map(|d| {
//!         NaiveDate::from_ymd_opt(2020, 7, d)
//!             .unwrap()
//!             .and_hms_opt(0, 0, 0)
//!             .unwrap()
//!     })
//!     .collect();
//! let index = PeriodIndex::from_naive(days, None).unwrap();
//! assert_eq!(index.freq(), Frequency::Day);
//! assert_eq!(index.durations(), vec![Hours::new(24.0); 4]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::if_not_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::single_match)]
#![allow(clippy::unused_self)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unnecessary_map_or)]
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod index;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{TaktError, TaktResult};
    pub use crate::index::{IntersectOptions, PeriodIndex};
    pub use crate::types::{FreqRelation, Frequency, Hours, Stamp, StartOfDay};
}

// Re-export commonly used types at crate root
pub use error::{TaktError, TaktResult};
pub use index::{IntersectOptions, PeriodIndex};
pub use types::{FreqRelation, Frequency, Hours, Stamp, StartOfDay};
