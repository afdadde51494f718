// 👥 Record Model - Employees and their daily attendance
// Plain values handed to the analytics engines by whoever owns storage

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// DEPARTMENT
// ============================================================================

/// Fixed set of departments an employee can belong to.
///
/// Declaration order is the canonical order used for listings and
/// department-keyed maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    Sales,
    Marketing,
    HR,
    Finance,
    Operations,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Engineering,
        Department::Sales,
        Department::Marketing,
        Department::HR,
        Department::Finance,
        Department::Operations,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Sales => "Sales",
            Department::Marketing => "Marketing",
            Department::HR => "HR",
            Department::Finance => "Finance",
            Department::Operations => "Operations",
        }
    }

    /// Identifier prefix for employees of this department
    pub fn prefix(&self) -> &'static str {
        match self {
            Department::Engineering => "ENG",
            Department::Sales => "SAL",
            Department::Marketing => "MKT",
            Department::HR => "HR",
            Department::Finance => "FIN",
            Department::Operations => "OPS",
        }
    }

    /// Exact-case lookup ("hr" is not "HR")
    pub fn from_name(name: &str) -> Option<Department> {
        Department::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ATTENDANCE STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }

    /// Case-sensitive: only "Present" and "Absent" are accepted
    pub fn from_name(name: &str) -> Option<AttendanceStatus> {
        match name {
            "Present" => Some(AttendanceStatus::Present),
            "Absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        *self == AttendanceStatus::Present
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// EMPLOYEE
// ============================================================================

/// Stored employee. `id` is the storage handle, `employee_id` the
/// department-prefixed business code (e.g. ENG001).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: Department,
}

/// Validated employee input, before storage assigns an `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: Department,
}

impl NewEmployee {
    pub fn with_id(self, id: i64) -> Employee {
        Employee {
            id,
            employee_id: self.employee_id,
            full_name: self.full_name,
            email: self.email,
            department: self.department,
        }
    }
}

// ============================================================================
// ATTENDANCE
// ============================================================================

/// Stored attendance row. `employee_id` references `Employee::id`,
/// not the business code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Attendance input for a new record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Plain attendance entry consumed by the analytics engines.
///
/// `date` is kept as "YYYY-MM-DD" text: ISO order is chronological order,
/// and malformed dates must surface as errors in the time-window filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub employee_id: i64,
    pub date: String,
    pub status: AttendanceStatus,
}

impl AttendanceEntry {
    pub fn new(employee_id: i64, date: &str, status: AttendanceStatus) -> Self {
        AttendanceEntry {
            employee_id,
            date: date.to_string(),
            status,
        }
    }
}

impl From<&AttendanceRecord> for AttendanceEntry {
    fn from(record: &AttendanceRecord) -> Self {
        AttendanceEntry {
            employee_id: record.employee_id,
            date: record.date.format("%Y-%m-%d").to_string(),
            status: record.status,
        }
    }
}

// ============================================================================
// EXPORT ROW
// ============================================================================

/// Flat, display-ready attendance row used by the export formatters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub employee_id: String,
    pub employee_name: String,
    pub date: String,
    pub status: String,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_lookup_is_exact_case() {
        assert_eq!(Department::from_name("HR"), Some(Department::HR));
        assert_eq!(Department::from_name("Engineering"), Some(Department::Engineering));
        assert_eq!(Department::from_name("engineering"), None);
        assert_eq!(Department::from_name("Nope"), None);
    }

    #[test]
    fn test_department_prefixes() {
        let prefixes: Vec<&str> = Department::ALL.iter().map(|d| d.prefix()).collect();
        assert_eq!(prefixes, vec!["ENG", "SAL", "MKT", "HR", "FIN", "OPS"]);
    }

    #[test]
    fn test_department_serializes_as_name() {
        let json = serde_json::to_string(&Department::Operations).unwrap();
        assert_eq!(json, "\"Operations\"");
    }

    #[test]
    fn test_status_is_case_sensitive() {
        assert_eq!(AttendanceStatus::from_name("Present"), Some(AttendanceStatus::Present));
        assert_eq!(AttendanceStatus::from_name("present"), None);
        assert_eq!(AttendanceStatus::from_name("ABSENT"), None);
    }

    #[test]
    fn test_entry_from_record_renders_iso_date() {
        let record = AttendanceRecord {
            id: 9,
            employee_id: 3,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            status: AttendanceStatus::Absent,
        };

        let entry = AttendanceEntry::from(&record);
        assert_eq!(entry.employee_id, 3);
        assert_eq!(entry.date, "2024-03-05");
        assert_eq!(entry.status, AttendanceStatus::Absent);
    }
}
