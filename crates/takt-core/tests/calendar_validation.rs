//! Integration tests validated against the German power calendar.
//!
//! Expected values are the physical hour counts of Europe/Berlin in 2020,
//! a leap year whose clock jumps forward on March 29 and back on
//! October 25. Every count below can be checked by hand: a plain day has
//! 24 hours, the spring transition day 23, the autumn one 25.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Europe::Berlin;
use chrono_tz::Tz;
use takt_core::{Frequency, Hours, PeriodIndex, Stamp};

// ============================================================================
// Index builders
// ============================================================================

fn wall(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

fn berlin(s: &str) -> DateTime<Tz> {
    Berlin.from_local_datetime(&wall(s)).unwrap()
}

fn berlin_days(from: &str, count: i64) -> PeriodIndex {
    let stamps: Vec<DateTime<Tz>> = (0..count)
        .map(|d| Berlin.from_local_datetime(&(wall(from) + Duration::days(d))).unwrap())
        .collect();
    PeriodIndex::from_aware(stamps, Some(Frequency::Day)).unwrap()
}

fn berlin_hours(from: &str, count: i64) -> PeriodIndex {
    let base = berlin(from);
    let stamps: Vec<DateTime<Tz>> = (0..count).map(|h| base + Duration::hours(h)).collect();
    PeriodIndex::from_aware(stamps, Some(Frequency::Hour)).unwrap()
}

fn berlin_quarter_hours(from: &str, count: i64) -> PeriodIndex {
    let base = berlin(from);
    let stamps: Vec<DateTime<Tz>> =
        (0..count).map(|q| base + Duration::minutes(15 * q)).collect();
    PeriodIndex::from_aware(stamps, Some(Frequency::QuarterHour)).unwrap()
}

fn berlin_months(year: i32, months: std::ops::Range<u32>) -> PeriodIndex {
    let stamps: Vec<DateTime<Tz>> = months
        .map(|m| {
            let first = NaiveDate::from_ymd_opt(year, m, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
            Berlin.from_local_datetime(&first).unwrap()
        })
        .collect();
    PeriodIndex::from_aware(stamps, Some(Frequency::MonthStart)).unwrap()
}

fn total_hours(index: &PeriodIndex) -> Hours {
    index.durations().into_iter().sum()
}

// ============================================================================
// Transition days
// ============================================================================

#[test]
fn test_spring_transition_day_has_23_hours() {
    let day = berlin_hours("2020-03-29 00:00", 23);
    assert_eq!(day.len(), 23);
    assert_eq!(total_hours(&day), Hours::new(23.0));
    assert_eq!(day.last_right(), Some(Stamp::Aware(berlin("2020-03-30 00:00"))));
}

#[test]
fn test_autumn_transition_day_has_25_hours() {
    let day = berlin_hours("2020-10-25 00:00", 25);
    assert_eq!(day.len(), 25);
    assert_eq!(total_hours(&day), Hours::new(25.0));
    assert_eq!(day.last_right(), Some(Stamp::Aware(berlin("2020-10-26 00:00"))));
}

#[test]
fn test_spring_transition_day_has_92_quarter_hours() {
    let day = berlin_quarter_hours("2020-03-29 00:00", 92);
    assert_eq!(day.len(), 92);
    assert_eq!(total_hours(&day), Hours::new(23.0));
    assert!(day.durations().iter().all(|d| *d == Hours::new(0.25)));
}

#[test]
fn test_autumn_transition_day_has_100_quarter_hours() {
    let day = berlin_quarter_hours("2020-10-25 00:00", 100);
    assert_eq!(day.len(), 100);
    assert_eq!(total_hours(&day), Hours::new(25.0));
}

// ============================================================================
// Months, quarters, and the year
// ============================================================================

#[test]
fn test_march_2020_has_743_hours() {
    let march = berlin_days("2020-03-01 00:00", 31);
    assert_eq!(total_hours(&march), Hours::new(743.0));
}

#[test]
fn test_october_2020_has_745_hours() {
    let october = berlin_days("2020-10-01 00:00", 31);
    assert_eq!(total_hours(&october), Hours::new(745.0));
}

#[test]
fn test_february_2020_has_696_hours() {
    let february = berlin_days("2020-02-01 00:00", 29);
    assert_eq!(total_hours(&february), Hours::new(696.0));
}

#[test]
fn test_first_quarter_2020_has_2183_hours() {
    // 91 calendar days minus the hour lost on March 29.
    let q1 = berlin_days("2020-01-01 00:00", 91);
    assert_eq!(q1.last_right(), Some(Stamp::Aware(berlin("2020-04-01 00:00"))));
    assert_eq!(total_hours(&q1), Hours::new(2183.0));
}

#[test]
fn test_fourth_quarter_2020_has_2209_hours() {
    // 92 calendar days plus the hour repeated on October 25.
    let q4 = berlin_days("2020-10-01 00:00", 92);
    assert_eq!(q4.last_right(), Some(Stamp::Aware(berlin("2021-01-01 00:00"))));
    assert_eq!(total_hours(&q4), Hours::new(2209.0));
}

#[test]
fn test_leap_year_2020_has_8784_hours() {
    // The two transitions cancel, leaving 366 plain days.
    let year = berlin_days("2020-01-01 00:00", 366);
    assert_eq!(year.last_right(), Some(Stamp::Aware(berlin("2021-01-01 00:00"))));
    assert_eq!(total_hours(&year), Hours::new(8784.0));
}

#[test]
fn test_monthly_durations_follow_the_calendar() {
    let months = berlin_months(2020, 1..13);
    let expected = [744.0, 696.0, 743.0, 720.0, 744.0, 720.0, 744.0, 744.0, 720.0, 745.0, 720.0, 744.0];
    let durations = months.durations();
    for (duration, hours) in durations.iter().zip(expected) {
        assert_eq!(*duration, Hours::new(hours));
    }
    assert_eq!(durations.iter().copied().sum::<Hours>(), Hours::new(8784.0));
}

// ============================================================================
// Trimming and intersection on the same calendar
// ============================================================================

#[test]
fn test_trimming_hours_to_whole_months_keeps_march() {
    let index = berlin_hours("2020-02-15 00:00", 1439);
    assert_eq!(index.last_right(), Some(Stamp::Aware(berlin("2020-04-15 00:00"))));
    let march = index.trim(Frequency::MonthStart).unwrap();
    assert_eq!(march.len(), 743);
    assert_eq!(march.first(), Some(Stamp::Aware(berlin("2020-03-01 00:00"))));
    assert_eq!(march.last_right(), Some(Stamp::Aware(berlin("2020-04-01 00:00"))));
    assert_eq!(total_hours(&march), Hours::new(743.0));
}

#[test]
fn test_monthly_intersection_keeps_common_months() {
    let a = berlin_months(2020, 1..6);
    let b = berlin_months(2020, 3..9);
    let overlap = PeriodIndex::intersect(&[a, b]).unwrap();
    assert_eq!(overlap.len(), 3);
    assert_eq!(overlap.first(), Some(Stamp::Aware(berlin("2020-03-01 00:00"))));
    assert_eq!(overlap.last_right(), Some(Stamp::Aware(berlin("2020-06-01 00:00"))));
    assert_eq!(overlap.durations(), vec![Hours::new(743.0), Hours::new(720.0), Hours::new(744.0)]);
}
