//! Domain types for delivery-period calculations.
//!
//! This module provides the building blocks of a period axis:
//!
//! - [`Frequency`]: Length of a delivery period, with its partial order
//! - [`FreqRelation`]: Outcome of comparing two frequencies
//! - [`StartOfDay`]: Wall-clock time at which a delivery day begins
//! - [`Stamp`]: Timezone-aware or naive point on a period axis
//! - [`Hours`]: Physical duration of periods

mod frequency;
mod hours;
mod stamp;
mod startofday;

pub use frequency::{FreqRelation, Frequency};
pub use hours::Hours;
pub use stamp::Stamp;
pub use startofday::StartOfDay;
