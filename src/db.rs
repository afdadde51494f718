// 🗄️ Storage Adapter - SQLite persistence for employees and attendance
// The analytics engines never call into this module; callers load
// snapshots here and hand them over as plain records.

use crate::models::{
    AttendanceRecord, AttendanceStatus, Department, Employee, NewAttendance, NewEmployee,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::{debug, info};

// ============================================================================
// COLUMN CONVERSIONS
// ============================================================================

impl ToSql for Department {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.name()))
    }
}

impl FromSql for Department {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Department::from_name(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown department '{}'", text).into()))
    }
}

impl ToSql for AttendanceStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AttendanceStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        AttendanceStatus::from_name(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown status '{}'", text).into()))
    }
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        department: row.get(4)?,
    })
}

fn attendance_from_row(row: &Row<'_>) -> rusqlite::Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        date: row.get(2)?,
        status: row.get(3)?,
    })
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery (in-memory databases report "memory")
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    debug!(journal_mode = %mode, "journal mode set");

    // Attendance rows are deleted together with their employee
    conn.pragma_update(None, "foreign_keys", true)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id TEXT UNIQUE NOT NULL,
            full_name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            department TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS attendances (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            status TEXT NOT NULL,
            UNIQUE (employee_id, date)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendances_date ON attendances(date)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// EMPLOYEES
// ============================================================================

pub fn insert_employee(conn: &Connection, employee: &NewEmployee) -> Result<Employee> {
    conn.execute(
        "INSERT INTO employees (employee_id, full_name, email, department)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            employee.employee_id,
            employee.full_name,
            employee.email,
            employee.department,
        ],
    )
    .with_context(|| format!("Failed to insert employee {}", employee.employee_id))?;

    let id = conn.last_insert_rowid();
    info!(id, employee_id = %employee.employee_id, "employee created");

    Ok(employee.clone().with_id(id))
}

pub fn get_all_employees(conn: &Connection) -> Result<Vec<Employee>> {
    let mut stmt = conn.prepare(
        "SELECT id, employee_id, full_name, email, department FROM employees ORDER BY id",
    )?;

    let employees = stmt
        .query_map([], employee_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(employees)
}

pub fn get_employee(conn: &Connection, id: i64) -> Result<Option<Employee>> {
    let employee = conn
        .query_row(
            "SELECT id, employee_id, full_name, email, department FROM employees WHERE id = ?1",
            params![id],
            employee_from_row,
        )
        .optional()?;

    Ok(employee)
}

/// Delete an employee and, by cascade, their attendance.
/// Returns false when no such employee existed.
pub fn delete_employee(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM employees WHERE id = ?1", params![id])?;
    if deleted > 0 {
        info!(id, "employee deleted");
    }
    Ok(deleted > 0)
}

pub fn employee_id_exists(conn: &Connection, employee_id: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_id = ?1)",
        params![employee_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn email_exists(conn: &Connection, email: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ?1)",
        params![email],
        |row| row.get(0),
    )?;
    Ok(exists)
}

// ============================================================================
// ATTENDANCE
// ============================================================================

pub fn insert_attendance(conn: &Connection, attendance: &NewAttendance) -> Result<AttendanceRecord> {
    conn.execute(
        "INSERT INTO attendances (employee_id, date, status) VALUES (?1, ?2, ?3)",
        params![attendance.employee_id, attendance.date, attendance.status],
    )
    .with_context(|| {
        format!(
            "Failed to insert attendance for employee {} on {}",
            attendance.employee_id, attendance.date
        )
    })?;

    Ok(AttendanceRecord {
        id: conn.last_insert_rowid(),
        employee_id: attendance.employee_id,
        date: attendance.date,
        status: attendance.status,
    })
}

pub fn attendance_exists(conn: &Connection, employee_id: i64, date: NaiveDate) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM attendances WHERE employee_id = ?1 AND date = ?2)",
        params![employee_id, date],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn get_all_attendance(conn: &Connection) -> Result<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, employee_id, date, status FROM attendances ORDER BY date, id",
    )?;

    let records = stmt
        .query_map([], attendance_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

pub fn get_attendance_for_employee(conn: &Connection, employee_id: i64) -> Result<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, employee_id, date, status FROM attendances
         WHERE employee_id = ?1
         ORDER BY date, id",
    )?;

    let records = stmt
        .query_map(params![employee_id], attendance_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

/// Result of a bulk marking. When `errors` is non-empty nothing was stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkMarkOutcome {
    pub marked: Vec<AttendanceRecord>,
    pub errors: Vec<String>,
}

/// Mark the same date and status for several employees, all or nothing
pub fn mark_bulk_attendance(
    conn: &mut Connection,
    employee_ids: &[i64],
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<BulkMarkOutcome> {
    let tx = conn.transaction()?;
    let mut marked = Vec::new();
    let mut errors = Vec::new();

    for &employee_id in employee_ids {
        if get_employee(&tx, employee_id)?.is_none() {
            errors.push(format!("Employee ID {} not found", employee_id));
            continue;
        }

        if attendance_exists(&tx, employee_id, date)? {
            errors.push(format!(
                "Attendance already marked for employee {} on {}",
                employee_id, date
            ));
            continue;
        }

        let record = insert_attendance(
            &tx,
            &NewAttendance {
                employee_id,
                date,
                status,
            },
        )?;
        marked.push(record);
    }

    if errors.is_empty() {
        tx.commit()?;
        info!(count = marked.len(), %date, "bulk attendance marked");
    } else {
        tx.rollback()?;
        debug!(errors = errors.len(), "bulk attendance rolled back");
        marked.clear();
    }

    Ok(BulkMarkOutcome { marked, errors })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn new_employee(code: &str, email: &str, dept: Department) -> NewEmployee {
        NewEmployee {
            employee_id: code.to_string(),
            full_name: "Test Person".to_string(),
            email: email.to_string(),
            department: dept,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_employee_roundtrip_through_storage() {
        let conn = setup();
        let created = insert_employee(&conn, &new_employee("ENG001", "a@example.com", Department::Engineering)).unwrap();

        let loaded = get_employee(&conn, created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.department, Department::Engineering);

        assert!(employee_id_exists(&conn, "ENG001").unwrap());
        assert!(email_exists(&conn, "a@example.com").unwrap());
        assert!(!email_exists(&conn, "b@example.com").unwrap());
        assert!(get_employee(&conn, 999).unwrap().is_none());
    }

    #[test]
    fn test_unique_codes_and_emails() {
        let conn = setup();
        insert_employee(&conn, &new_employee("ENG001", "a@example.com", Department::Engineering)).unwrap();

        assert!(insert_employee(&conn, &new_employee("ENG001", "b@example.com", Department::Engineering)).is_err());
        assert!(insert_employee(&conn, &new_employee("ENG002", "a@example.com", Department::Engineering)).is_err());
        assert_eq!(get_all_employees(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_one_attendance_per_employee_per_date() {
        let conn = setup();
        let emp = insert_employee(&conn, &new_employee("HR001", "h@example.com", Department::HR)).unwrap();
        let mark = NewAttendance {
            employee_id: emp.id,
            date: date(1),
            status: AttendanceStatus::Present,
        };

        let record = insert_attendance(&conn, &mark).unwrap();
        assert_eq!(record.date, date(1));
        assert!(attendance_exists(&conn, emp.id, date(1)).unwrap());
        assert!(insert_attendance(&conn, &mark).is_err());

        let history = get_attendance_for_employee(&conn, emp.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn test_delete_cascades_to_attendance() {
        let conn = setup();
        let keep = insert_employee(&conn, &new_employee("SAL001", "s@example.com", Department::Sales)).unwrap();
        let gone = insert_employee(&conn, &new_employee("SAL002", "t@example.com", Department::Sales)).unwrap();

        for emp in [&keep, &gone] {
            insert_attendance(
                &conn,
                &NewAttendance {
                    employee_id: emp.id,
                    date: date(4),
                    status: AttendanceStatus::Absent,
                },
            )
            .unwrap();
        }

        assert!(delete_employee(&conn, gone.id).unwrap());
        assert!(!delete_employee(&conn, gone.id).unwrap());

        let remaining = get_all_attendance(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].employee_id, keep.id);
    }

    #[test]
    fn test_attendance_requires_existing_employee() {
        let conn = setup();
        let orphan = NewAttendance {
            employee_id: 42,
            date: date(1),
            status: AttendanceStatus::Present,
        };
        assert!(insert_attendance(&conn, &orphan).is_err());
    }

    #[test]
    fn test_bulk_marking_is_all_or_nothing() {
        let mut conn = setup();
        let a = insert_employee(&conn, &new_employee("OPS001", "o1@example.com", Department::Operations)).unwrap();
        let b = insert_employee(&conn, &new_employee("OPS002", "o2@example.com", Department::Operations)).unwrap();

        let outcome = mark_bulk_attendance(&mut conn, &[a.id, 77], date(5), AttendanceStatus::Present).unwrap();
        assert_eq!(outcome.errors, vec!["Employee ID 77 not found".to_string()]);
        assert!(outcome.marked.is_empty());
        assert!(get_all_attendance(&conn).unwrap().is_empty());

        let outcome = mark_bulk_attendance(&mut conn, &[a.id, b.id], date(5), AttendanceStatus::Present).unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.marked.len(), 2);

        let outcome = mark_bulk_attendance(&mut conn, &[b.id], date(5), AttendanceStatus::Absent).unwrap();
        assert_eq!(
            outcome.errors,
            vec![format!("Attendance already marked for employee {} on 2024-03-05", b.id)]
        );
        assert_eq!(get_all_attendance(&conn).unwrap().len(), 2);
    }
}
