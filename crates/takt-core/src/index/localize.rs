//! Reading floating wall times as instants in a timezone.

use std::collections::HashMap;

use chrono::{LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use super::PeriodIndex;
use crate::error::{TaktError, TaktResult};
use crate::types::Frequency;

impl PeriodIndex {
    /// Interprets floating wall times as local clock readings in `tz`.
    ///
    /// On the long autumn day the local clock repeats one hour, so a wall
    /// time in that hour names two instants. Such a wall time is accepted
    /// exactly when it occurs twice in the input; its first occurrence is
    /// read as the earlier instant and its second as the later one, which
    /// is how a gapless local recording traverses the transition.
    ///
    /// # Errors
    ///
    /// - [`TaktError::AmbiguousLocalTime`] when a repeated wall time does
    ///   not occur exactly twice
    /// - [`TaktError::NonexistentLocalTime`] when a wall time falls into
    ///   the spring gap
    /// - any error [`PeriodIndex::from_aware`] raises on the resolved
    ///   instants
    pub fn from_local_clock(
        stamps: Vec<NaiveDateTime>,
        tz: Tz,
        freq: Option<Frequency>,
    ) -> TaktResult<Self> {
        let mut occurrences: HashMap<NaiveDateTime, u32> = HashMap::new();
        for wall in &stamps {
            *occurrences.entry(*wall).or_insert(0) += 1;
        }
        let mut passes: HashMap<NaiveDateTime, u32> = HashMap::new();
        let mut resolved = Vec::with_capacity(stamps.len());
        for wall in &stamps {
            let instant = match tz.from_local_datetime(wall) {
                LocalResult::Single(dt) => dt,
                LocalResult::Ambiguous(earlier, later) => {
                    if occurrences.get(wall).copied() != Some(2) {
                        return Err(TaktError::ambiguous_local_time(format!(
                            "{wall} repeats on the local clock in {tz} and cannot be resolved \
                             unless it occurs exactly twice"
                        )));
                    }
                    let pass = passes.entry(*wall).or_insert(0);
                    *pass += 1;
                    if *pass == 1 {
                        earlier
                    } else {
                        later
                    }
                }
                LocalResult::None => {
                    return Err(TaktError::nonexistent_local_time(format!(
                        "{wall} does not exist on the local clock in {tz}"
                    )))
                }
            };
            resolved.push(instant);
        }
        Self::from_aware(resolved, freq)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono_tz::Europe::Berlin;

    use super::*;
    use crate::types::Hours;

    fn wall(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_resolves_unambiguous_walls() {
        let stamps: Vec<NaiveDateTime> =
            (0..24).map(|h| wall("2020-01-01 00:00") + Duration::hours(h)).collect();
        let index = PeriodIndex::from_local_clock(stamps, Berlin, None).unwrap();
        assert_eq!(index.timezone(), Some(Berlin));
        assert_eq!(index.len(), 24);
    }

    #[test]
    fn test_resolves_doubled_hour_on_long_day() {
        // A local recording of 2020-10-25 lists 02:00 twice.
        let mut stamps = Vec::new();
        for h in 0..3 {
            stamps.push(wall("2020-10-25 00:00") + Duration::hours(h));
        }
        stamps.push(wall("2020-10-25 02:00"));
        for h in 3..24 {
            stamps.push(wall("2020-10-25 00:00") + Duration::hours(h));
        }
        stamps.sort();
        assert_eq!(stamps.len(), 25);
        let index = PeriodIndex::from_local_clock(stamps, Berlin, None).unwrap();
        assert_eq!(index.len(), 25);
        let total: Hours = index.durations().into_iter().sum();
        assert_eq!(total, Hours::new(25.0));
    }

    #[test]
    fn test_rejects_single_ambiguous_wall() {
        // 24 wall hours on the long day carry 02:00 only once, which
        // leaves its reading undecidable.
        let stamps: Vec<NaiveDateTime> =
            (0..24).map(|h| wall("2020-10-25 00:00") + Duration::hours(h)).collect();
        let err = PeriodIndex::from_local_clock(stamps, Berlin, None).unwrap_err();
        assert!(matches!(err, TaktError::AmbiguousLocalTime { .. }));
    }

    #[test]
    fn test_rejects_nonexistent_wall() {
        let stamps: Vec<NaiveDateTime> =
            (0..24).map(|h| wall("2020-03-29 00:00") + Duration::hours(h)).collect();
        let err = PeriodIndex::from_local_clock(stamps, Berlin, None).unwrap_err();
        assert!(matches!(err, TaktError::NonexistentLocalTime { .. }));
    }
}
