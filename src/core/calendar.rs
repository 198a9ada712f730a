//! Expiration calendar helpers
//!
//! Monthly opex is the third Friday of the month. Time to expiry is counted
//! in trading days (weekdays) over a 252-day year.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Trading days per year
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Floor applied to contracts expiring on the evaluation date
pub const SAME_DAY_TIME: f64 = 1.0 / TRADING_DAYS_PER_YEAR;

/// True for a standard monthly expiration (third Friday)
pub fn is_monthly(day: NaiveDate) -> bool {
    day.weekday() == Weekday::Fri && (15..=21).contains(&day.day())
}

/// Third Friday of the given month
pub fn third_friday(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Fri, 3)
}

/// Next monthly opex on or after `from`
pub fn next_monthly_opex(from: NaiveDate) -> Option<NaiveDate> {
    let this_month = third_friday(from.year(), from.month())?;
    if this_month >= from {
        return Some(this_month);
    }

    let (year, month) = if from.month() == 12 {
        (from.year() + 1, 1)
    } else {
        (from.year(), from.month() + 1)
    };
    third_friday(year, month)
}

/// Weekdays in (from, to]
pub fn business_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    if to <= from {
        return 0;
    }

    let mut count = 0;
    let mut day = from + Duration::days(1);
    while day <= to {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

/// Year fraction until expiration.
///
/// Expiring on `eval_date` gives [`SAME_DAY_TIME`]; already expired gives 0.
pub fn time_till_exp(eval_date: NaiveDate, expiration: NaiveDate) -> f64 {
    if expiration < eval_date {
        return 0.0;
    }

    let days = business_days_between(eval_date, expiration) as f64;
    (days / TRADING_DAYS_PER_YEAR).max(SAME_DAY_TIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_monthly() {
        assert!(is_monthly(date(2025, 3, 21)));
        assert!(!is_monthly(date(2025, 3, 14)));
        assert!(!is_monthly(date(2025, 3, 20)));
    }

    #[test]
    fn test_next_monthly_opex() {
        assert_eq!(next_monthly_opex(date(2025, 3, 3)), Some(date(2025, 3, 21)));
        assert_eq!(next_monthly_opex(date(2025, 3, 21)), Some(date(2025, 3, 21)));
        assert_eq!(next_monthly_opex(date(2025, 3, 24)), Some(date(2025, 4, 18)));
        assert_eq!(next_monthly_opex(date(2025, 12, 22)), Some(date(2026, 1, 16)));
    }

    #[test]
    fn test_time_till_exp() {
        // Friday to the following Friday: 5 trading days
        let t = time_till_exp(date(2025, 3, 14), date(2025, 3, 21));
        assert!((t - 5.0 / 252.0).abs() < 1e-12);

        // Same day is floored
        assert_eq!(time_till_exp(date(2025, 3, 14), date(2025, 3, 14)), SAME_DAY_TIME);

        // Expired
        assert_eq!(time_till_exp(date(2025, 3, 14), date(2025, 3, 13)), 0.0);
    }

    #[test]
    fn test_business_days_skip_weekend() {
        // Friday -> Monday is one trading day
        assert_eq!(business_days_between(date(2025, 3, 14), date(2025, 3, 17)), 1);
    }
}
