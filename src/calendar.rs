// Working-day and holiday helpers for report planning.
// Attendance statistics never consult these.

use chrono::{Datelike, NaiveDate, Weekday};

/// Monday-Friday days in the closed interval `start..=end`
pub fn working_days(start: NaiveDate, end: NaiveDate) -> usize {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_weekday(*d))
        .count()
}

/// Holidays that land on a Monday-Friday inside `start..=end`
pub fn weekday_holidays(start: NaiveDate, end: NaiveDate, holidays: &[NaiveDate]) -> usize {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_weekday(*d) && is_holiday(*d, holidays))
        .count()
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Fixed-date holidays observed every year
pub fn default_holidays(year: i32) -> Vec<NaiveDate> {
    [(1, 1), (5, 1), (7, 4), (12, 25)]
        .iter()
        .filter_map(|&(month, day)| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

pub fn is_holiday(date: NaiveDate, holidays: &[NaiveDate]) -> bool {
    holidays.contains(&date)
}
