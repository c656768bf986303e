//! Date arithmetic helpers that bypass jiff's `Span` machinery.
//!
//! The simulation advances one quarter at a time across thousands of trials,
//! so date stepping and fractional-age math sit on a hot path. The helpers
//! here use Rata Die day-numbering for O(1) day differences and direct
//! calendar arithmetic for month offsets, with no `Span` allocation or
//! normalization involved.

use jiff::civil::Date;

/// Fast leap year check.
#[inline]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days in a calendar month without creating a `jiff::civil::Date`.
#[inline]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    const DAYS: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month - 1) as usize]
    }
}

/// Convert a civil date to a Rata Die day number (days since 0001-01-01).
///
/// Proleptic Gregorian algorithm; O(1) with no branches beyond the month
/// adjustment.
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // Shift March = month 1 so Feb (end of "year") is month 12
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    day + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 306
}

/// Number of days between two dates (d2 - d1), positive when `d2 > d1`.
#[inline]
pub fn days_between(d1: Date, d2: Date) -> i32 {
    rata_die(d2) - rata_die(d1)
}

/// Fractional years between two dates, using the mean Gregorian year.
///
/// This is how the engine derives fractional ages: claiming rules and glide
/// paths compare against thresholds like 62.0 or 59.5 years.
#[inline]
pub fn years_between(d1: Date, d2: Date) -> f64 {
    f64::from(days_between(d1, d2)) / 365.25
}

/// Add `n` calendar months to a date, clamping the day to the target month.
///
/// Interval stepping always lands on the same day-of-month (quarterly steps
/// from the 1st stay on the 1st); the clamp only matters for start dates
/// late in a month.
pub fn add_months(d: Date, n: i32) -> Date {
    let total = (d.year() as i32) * 12 + (d.month() as i32 - 1) + n;
    let year = total.div_euclid(12) as i16;
    let month = (total.rem_euclid(12) + 1) as i8;
    let day = d.day().min(days_in_month(year, month));
    jiff::civil::date(year, month, day)
}
