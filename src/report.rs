// 🧾 Employee Report - Overall, current-month and recent attendance

use crate::clock::Clock;
use crate::error::ReportResult;
use crate::models::{AttendanceEntry, Employee};
use crate::stats::{calculate_attendance_stats, AttendanceStats};
use crate::window::get_monthly_attendance;
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const RECENT_ATTENDANCE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeReport {
    pub employee_info: Employee,
    pub overall_stats: AttendanceStats,
    pub monthly_stats: AttendanceStats,
    pub recent_attendance: Vec<AttendanceEntry>,
    pub report_generated: NaiveDateTime,
}

/// Build the per-employee report.
///
/// "Current month" and the generation stamp both come from `clock`, read
/// once. Recent attendance is the ten latest entries, newest first; entries
/// sharing a date keep their input order.
pub fn generate_employee_report(
    employee: &Employee,
    attendances: &[AttendanceEntry],
    clock: &dyn Clock,
) -> ReportResult<EmployeeReport> {
    let now = clock.now();

    let overall_stats = calculate_attendance_stats(attendances);

    let this_month = get_monthly_attendance(attendances, now.year(), now.month())?;
    let monthly_stats = calculate_attendance_stats(&this_month);

    let mut recent_attendance = attendances.to_vec();
    recent_attendance.sort_by(|a, b| b.date.cmp(&a.date));
    recent_attendance.truncate(RECENT_ATTENDANCE_LIMIT);

    Ok(EmployeeReport {
        employee_info: employee.clone(),
        overall_stats,
        monthly_stats,
        recent_attendance,
        report_generated: now,
    })
}

// ============================================================================
// TESTS
// ============================================================================
