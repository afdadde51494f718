// 🧰 Database Maintenance - sample data, verification, backups
//
// Operator tooling around the SQLite store. Backups are written with
// `VACUUM INTO`, so they are consistent even while WAL is active.

use crate::db;
use crate::models::{AttendanceStatus, Department, NewAttendance, NewEmployee};
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration as DateDuration, NaiveDate, NaiveDateTime, Weekday};
use rand::Rng;
use rusqlite::Connection;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

pub const SAMPLE_DAYS: i64 = 30;
pub const BACKUP_PREFIX: &str = "hrms_backup_";
pub const BACKUP_EXTENSION: &str = ".db";

const SECS_PER_DAY: u64 = 86_400;

const SAMPLE_EMPLOYEES: [(&str, &str, &str, Department); 8] = [
    ("EMP001", "John Doe", "john.doe@company.com", Department::Engineering),
    ("EMP002", "Jane Smith", "jane.smith@company.com", Department::Marketing),
    ("EMP003", "Mike Johnson", "mike.johnson@company.com", Department::Sales),
    ("EMP004", "Sarah Wilson", "sarah.wilson@company.com", Department::HR),
    ("EMP005", "Tom Brown", "tom.brown@company.com", Department::Finance),
    ("EMP006", "Lisa Chen", "lisa.chen@company.com", Department::Operations),
    ("EMP007", "David Kumar", "david.kumar@company.com", Department::Engineering),
    ("EMP008", "Emily Davis", "emily.davis@company.com", Department::Marketing),
];

// ============================================================================
// SAMPLE DATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub employees: usize,
    pub attendance: usize,
}

/// Drop both tables and recreate the schema
pub fn reset_database(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS attendances;
         DROP TABLE IF EXISTS employees;",
    )
    .context("Failed to drop tables")?;

    info!("database reset");
    db::setup_database(conn)
}

/// Insert the sample staff plus attendance for the last `SAMPLE_DAYS` days
/// ending at `today`.
///
/// Weekends are skipped and each weekday is recorded with 90% probability,
/// Present or Absent at even odds. Refuses to touch a database that already
/// has employees.
pub fn seed_sample_data<R: Rng>(
    conn: &mut Connection,
    today: NaiveDate,
    rng: &mut R,
) -> Result<SeedSummary> {
    let tx = conn.transaction()?;
    if count_rows(&tx, "employees")? > 0 {
        bail!("Database already contains employees; reset it before seeding");
    }

    let mut summary = SeedSummary {
        employees: 0,
        attendance: 0,
    };

    for (code, name, email, department) in SAMPLE_EMPLOYEES {
        let employee = db::insert_employee(
            &tx,
            &NewEmployee {
                employee_id: code.to_string(),
                full_name: name.to_string(),
                email: email.to_string(),
                department,
            },
        )?;
        summary.employees += 1;

        for days_ago in 0..SAMPLE_DAYS {
            let date = today - DateDuration::days(days_ago);
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || !rng.gen_bool(0.9) {
                continue;
            }

            let status = if rng.gen_bool(0.5) {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            db::insert_attendance(
                &tx,
                &NewAttendance {
                    employee_id: employee.id,
                    date,
                    status,
                },
            )?;
            summary.attendance += 1;
        }
    }

    tx.commit()?;
    info!(
        employees = summary.employees,
        attendance = summary.attendance,
        "sample data seeded"
    );
    Ok(summary)
}

// ============================================================================
// VERIFICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Required tables that exist, sorted
    pub tables: Vec<String>,
    pub employees: i64,
    pub attendance: i64,
}

impl VerifyReport {
    pub fn is_valid(&self) -> bool {
        ["attendances", "employees"]
            .iter()
            .all(|t| self.tables.iter().any(|found| found == t))
    }
}

/// Check that both tables exist and count their rows (0 when missing)
pub fn verify_database(conn: &Connection) -> Result<VerifyReport> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name IN ('employees', 'attendances')
         ORDER BY name",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    let mut report = VerifyReport {
        tables,
        employees: 0,
        attendance: 0,
    };
    if report.is_valid() {
        report.employees = count_rows(conn, "employees")?;
        report.attendance = count_rows(conn, "attendances")?;
    }

    Ok(report)
}

fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .with_context(|| format!("Failed to count rows in {}", table))
}

// ============================================================================
// BACKUPS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupInfo {
    pub backup_path: PathBuf,
    pub timestamp: NaiveDateTime,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupReport {
    pub removed_count: usize,
    pub removed_files: Vec<PathBuf>,
}

/// `hrms_backup_YYYYMMDD_HHMMSS.db`
pub fn backup_file_name(now: NaiveDateTime) -> String {
    format!("{}{}{}", BACKUP_PREFIX, now.format("%Y%m%d_%H%M%S"), BACKUP_EXTENSION)
}

pub fn is_backup_file(name: &str) -> bool {
    name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_EXTENSION)
}

/// Write a compacted copy of the open database to `dest`.
/// An existing file at `dest` is never overwritten.
pub fn backup_database(conn: &Connection, dest: &Path, now: NaiveDateTime) -> Result<BackupInfo> {
    if dest.exists() {
        bail!("Backup target {} already exists", dest.display());
    }
    let target = dest
        .to_str()
        .with_context(|| format!("Backup path {} is not valid UTF-8", dest.display()))?;

    conn.execute("VACUUM INTO ?1", [target])
        .with_context(|| format!("Failed to write backup {}", dest.display()))?;

    let size = fs::metadata(dest)
        .with_context(|| format!("Failed to stat backup {}", dest.display()))?
        .len();

    info!(path = %dest.display(), size, "backup written");
    Ok(BackupInfo {
        backup_path: dest.to_path_buf(),
        timestamp: now,
        size,
    })
}

/// Delete backup files in `dir` older than `max_age_days` whole days.
///
/// Files that cannot be inspected or removed are logged and skipped.
pub fn cleanup_old_backups(dir: &Path, max_age_days: u64, now: SystemTime) -> Result<CleanupReport> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    let mut removed = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        let is_backup = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, is_backup_file);
        if !is_backup {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read backup age");
                continue;
            }
        };

        let age_days = now.duration_since(modified).unwrap_or(Duration::ZERO).as_secs() / SECS_PER_DAY;
        if age_days <= max_age_days {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), age_days, "removed old backup");
                removed.push(path);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove old backup"),
        }
    }

    removed.sort();
    Ok(CleanupReport {
        removed_count: removed.len(),
        removed_files: removed,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::working_days;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn fresh() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_seed_skips_weekends_and_stays_in_window() {
        let mut conn = fresh();
        let mut rng = StdRng::seed_from_u64(42);

        let summary = seed_sample_data(&mut conn, today(), &mut rng).unwrap();
        let records = db::get_all_attendance(&conn).unwrap();

        assert_eq!(summary.employees, 8);
        assert_eq!(db::get_all_employees(&conn).unwrap().len(), 8);
        assert_eq!(summary.attendance, records.len());

        let first = today() - DateDuration::days(SAMPLE_DAYS - 1);
        assert!(records.len() <= 8 * working_days(first, today()));
        assert!(records.iter().all(|r| r.date >= first && r.date <= today()));
        assert!(records
            .iter()
            .all(|r| !matches!(r.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn test_seed_refuses_populated_database_until_reset() {
        let mut conn = fresh();
        let mut rng = StdRng::seed_from_u64(1);

        seed_sample_data(&mut conn, today(), &mut rng).unwrap();
        assert!(seed_sample_data(&mut conn, today(), &mut rng).is_err());

        reset_database(&conn).unwrap();
        assert!(db::get_all_employees(&conn).unwrap().is_empty());
        assert_eq!(seed_sample_data(&mut conn, today(), &mut rng).unwrap().employees, 8);
    }

    #[test]
    fn test_verify_reports_missing_tables_and_counts() {
        let bare = Connection::open_in_memory().unwrap();
        let report = verify_database(&bare).unwrap();
        assert!(!report.is_valid());
        assert!(report.tables.is_empty());

        let mut conn = fresh();
        let summary = seed_sample_data(&mut conn, today(), &mut StdRng::seed_from_u64(3)).unwrap();
        let report = verify_database(&conn).unwrap();

        assert!(report.is_valid());
        assert_eq!(report.tables, vec!["attendances", "employees"]);
        assert_eq!(report.employees, 8);
        assert_eq!(report.attendance, summary.attendance as i64);
    }

    #[test]
    fn test_backup_copies_data_and_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = fresh();
        seed_sample_data(&mut conn, today(), &mut StdRng::seed_from_u64(9)).unwrap();

        let now = today().and_hms_opt(8, 30, 0).unwrap();
        let dest = dir.path().join(backup_file_name(now));
        let info = backup_database(&conn, &dest, now).unwrap();

        assert_eq!(dest.file_name().unwrap(), "hrms_backup_20240320_083000.db");
        assert!(info.size > 0);

        let copy = Connection::open(&dest).unwrap();
        assert_eq!(db::get_all_employees(&copy).unwrap().len(), 8);

        assert!(backup_database(&conn, &dest, now).is_err());
    }

    #[test]
    fn test_cleanup_removes_only_old_backups() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["hrms_backup_20240101_000000.db", "hrms_backup_20240102_000000.db", "hrms.db", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let soon = SystemTime::now() + Duration::from_secs(3 * SECS_PER_DAY);
        let report = cleanup_old_backups(dir.path(), 7, soon).unwrap();
        assert_eq!(report.removed_count, 0);

        let later = SystemTime::now() + Duration::from_secs(10 * SECS_PER_DAY);
        let report = cleanup_old_backups(dir.path(), 7, later).unwrap();
        assert_eq!(report.removed_count, 2);
        assert!(dir.path().join("hrms.db").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert!(!dir.path().join("hrms_backup_20240101_000000.db").exists());
    }

    #[test]
    fn test_backup_name_filter() {
        assert!(is_backup_file("hrms_backup_20240320_083000.db"));
        assert!(!is_backup_file("hrms.db"));
        assert!(!is_backup_file("hrms_backup_20240320_083000.db-wal"));
    }
}
