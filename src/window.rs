// 📅 Time Windows - Calendar month and date-range selection

use crate::error::{ReportError, ReportResult};
use crate::models::AttendanceEntry;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Longest range a report may cover, in days between start and end
pub const MAX_RANGE_DAYS: i64 = 365;

/// Parse a stored "YYYY-MM-DD" date; malformed text is a hard failure
pub fn parse_entry_date(value: &str) -> ReportResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| ReportError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// Entries whose date falls in the given year and month (1-12).
///
/// Every date is parsed, so the first malformed one aborts the whole call.
pub fn get_monthly_attendance(
    entries: &[AttendanceEntry],
    year: i32,
    month: u32,
) -> ReportResult<Vec<AttendanceEntry>> {
    let mut selected = Vec::new();

    for entry in entries {
        let date = parse_entry_date(&entry.date)?;
        if date.year() == year && date.month() == month {
            selected.push(entry.clone());
        }
    }

    Ok(selected)
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Closed date interval, at most `MAX_RANGE_DAYS` long
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ReportResult<Self> {
        if start > end {
            return Err(ReportError::InvalidRange(
                "Start date cannot be after end date".to_string(),
            ));
        }

        if (end - start).num_days() > MAX_RANGE_DAYS {
            return Err(ReportError::InvalidRange(
                "Date range cannot exceed 1 year".to_string(),
            ));
        }

        Ok(DateRange { start, end })
    }

    pub fn parse(start: &str, end: &str) -> ReportResult<Self> {
        DateRange::new(parse_entry_date(start)?, parse_entry_date(end)?)
    }

    /// Number of calendar days covered, both ends included
    pub fn days_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Entries inside the range (inclusive); malformed dates abort
pub fn filter_date_range(
    entries: &[AttendanceEntry],
    range: &DateRange,
) -> ReportResult<Vec<AttendanceEntry>> {
    let mut selected = Vec::new();

    for entry in entries {
        if range.contains(parse_entry_date(&entry.date)?) {
            selected.push(entry.clone());
        }
    }

    Ok(selected)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus::{Absent, Present};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entries() -> Vec<AttendanceEntry> {
        vec![
            AttendanceEntry::new(1, "2024-02-29", Present),
            AttendanceEntry::new(1, "2024-03-15", Absent),
            AttendanceEntry::new(2, "2024-03-01", Present),
            AttendanceEntry::new(2, "2023-03-20", Present),
        ]
    }

    #[test]
    fn test_month_includes_matching_dates() {
        let march = get_monthly_attendance(&entries(), 2024, 3).unwrap();
        let dates: Vec<&str> = march.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-15", "2024-03-01"]);
    }

    #[test]
    fn test_month_excludes_other_months() {
        let fixed = vec![AttendanceEntry::new(1, "2024-03-15", Present)];
        assert_eq!(get_monthly_attendance(&fixed, 2024, 3).unwrap().len(), 1);
        assert!(get_monthly_attendance(&fixed, 2024, 4).unwrap().is_empty());
        assert!(get_monthly_attendance(&fixed, 2023, 3).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_date_is_an_error() {
        let mut bad = entries();
        bad.push(AttendanceEntry::new(3, "03/15/2024", Present));

        let err = get_monthly_attendance(&bad, 2024, 3).unwrap_err();
        match err {
            ReportError::InvalidDate { value, .. } => assert_eq!(value, "03/15/2024"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_range_validation() {
        assert!(DateRange::new(date(2024, 3, 2), date(2024, 3, 1)).is_err());
        assert!(DateRange::new(date(2023, 1, 1), date(2024, 1, 2)).is_err());

        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(range.days_count(), 366);

        let single = DateRange::parse("2024-03-01", "2024-03-01").unwrap();
        assert_eq!(single.days_count(), 1);

        assert!(matches!(
            DateRange::parse("2024-3-x", "2024-03-01"),
            Err(ReportError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_range_filter_is_inclusive() {
        let range = DateRange::parse("2024-02-29", "2024-03-01").unwrap();
        let selected = filter_date_range(&entries(), &range).unwrap();
        let dates: Vec<&str> = selected.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-02-29", "2024-03-01"]);
    }
}
