// 📊 Attendance Statistics - Counts, percentages and department roll-ups

use crate::models::{AttendanceEntry, AttendanceRecord, Department, Employee};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Round to two decimal places, ties to even on the exact binary value.
///
/// A double sits exactly halfway between two cents only when it is an odd
/// multiple of 1/8 (`3.125`, `15.625`, ...). Those go to the even cent;
/// everything else takes the correctly rounded decimal rendering.
pub(crate) fn round2(value: f64) -> f64 {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        let cents = (value * 100.0).floor();
        let even = if cents.rem_euclid(2.0) == 0.0 { cents } else { cents + 1.0 };
        return even / 100.0;
    }

    format!("{:.2}", value).parse().unwrap_or(value)
}

/// `part / whole * 100` rounded to two decimals, 0 for an empty whole
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

// ============================================================================
// ATTENDANCE STATISTICS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub total_days: usize,
    pub present_days: usize,
    pub absent_days: usize,
    pub attendance_percentage: f64,
}

/// Every entry counts as one day, whatever its weekday
pub fn calculate_attendance_stats(entries: &[AttendanceEntry]) -> AttendanceStats {
    let total_days = entries.len();
    let present_days = entries.iter().filter(|e| e.status.is_present()).count();

    AttendanceStats {
        total_days,
        present_days,
        absent_days: total_days - present_days,
        attendance_percentage: percentage(present_days, total_days),
    }
}

// ============================================================================
// DEPARTMENT SUMMARY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub employee_count: usize,
    pub attendance_present: usize,
    pub attendance_absent: usize,
    pub total_attendance: usize,
}

/// Employee and attendance counts for every department that has employees.
///
/// Attendance is attributed through `employee_id -> Employee::id`; entries
/// for unknown employees are skipped. Departments without attendance still
/// appear, with zero counts.
pub fn get_department_summary(
    employees: &[Employee],
    attendances: &[AttendanceEntry],
) -> BTreeMap<Department, DepartmentSummary> {
    let mut summary: BTreeMap<Department, DepartmentSummary> = BTreeMap::new();
    let mut department_of: HashMap<i64, Department> = HashMap::with_capacity(employees.len());

    for emp in employees {
        summary.entry(emp.department).or_default().employee_count += 1;
        // First employee with a given id wins, as a linear scan would
        department_of.entry(emp.id).or_insert(emp.department);
    }

    for entry in attendances {
        let Some(dept) = department_of.get(&entry.employee_id) else {
            continue;
        };
        let Some(row) = summary.get_mut(dept) else {
            continue;
        };

        if entry.status.is_present() {
            row.attendance_present += 1;
        } else {
            row.attendance_absent += 1;
        }
        row.total_attendance += 1;
    }

    summary
}

// ============================================================================
// DASHBOARD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeCounts {
    pub total: usize,
    pub by_department: BTreeMap<Department, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAttendance {
    pub date: NaiveDate,
    pub present: usize,
    pub absent: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekAttendance {
    pub week_start: NaiveDate,
    pub present: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub employees: EmployeeCounts,
    pub attendance_today: DayAttendance,
    pub attendance_this_week: WeekAttendance,
}

/// Headcount per department (all six listed) plus today's and this
/// week's attendance. The week starts on Monday.
pub fn dashboard_stats(
    employees: &[Employee],
    records: &[AttendanceRecord],
    today: NaiveDate,
) -> DashboardStats {
    let mut by_department: BTreeMap<Department, usize> =
        Department::ALL.iter().map(|d| (*d, 0)).collect();
    for emp in employees {
        *by_department.entry(emp.department).or_insert(0) += 1;
    }

    let todays: Vec<&AttendanceRecord> = records.iter().filter(|r| r.date == today).collect();
    let present_today = todays.iter().filter(|r| r.status.is_present()).count();
    let absent_today = todays.len() - present_today;

    let week_start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let this_week: Vec<&AttendanceRecord> =
        records.iter().filter(|r| r.date >= week_start).collect();
    let present_week = this_week.iter().filter(|r| r.status.is_present()).count();

    DashboardStats {
        employees: EmployeeCounts {
            total: employees.len(),
            by_department,
        },
        attendance_today: DayAttendance {
            date: today,
            present: present_today,
            absent: absent_today,
            total: todays.len(),
        },
        attendance_this_week: WeekAttendance {
            week_start,
            present: present_week,
            total: this_week.len(),
            percentage: percentage(present_week, this_week.len()),
        },
    }
}

// ============================================================================
// OVERTIME ESTIMATE
// ============================================================================

/// Upper-bound overtime estimate from day-level attendance only.
/// Without clock-in data every present day is a potential overtime day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeEstimate {
    pub total_days: usize,
    pub present_days: usize,
    pub potential_overtime_days: usize,
    pub standard_hours_per_day: u32,
    pub total_standard_hours: u64,
}

pub fn estimate_overtime(entries: &[AttendanceEntry], standard_hours: u32) -> OvertimeEstimate {
    let present_days = entries.iter().filter(|e| e.status.is_present()).count();

    OvertimeEstimate {
        total_days: entries.len(),
        present_days,
        potential_overtime_days: present_days,
        standard_hours_per_day: standard_hours,
        total_standard_hours: present_days as u64 * standard_hours as u64,
    }
}

// ============================================================================
// TESTS
// ============================================================================
