// HRMS Lite - Command Line
// Local administration and reporting against the SQLite store

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hrms_lite::calendar::{default_holidays, weekday_holidays, working_days};
use hrms_lite::{db, maintenance};
use hrms_lite::{
    build_export_rows, calculate_attendance_stats, dashboard_stats, estimate_overtime,
    export_as, generate_employee_id, get_attendance_trends, get_department_summary,
    generate_employee_report, render_html_report, search_with_filters, validate_attendance_data,
    validate_employee_data, AppConfig, AttendanceEntry, AttendanceRecord, Clock, DateRange,
    Employee, ExportFilter, ExportFormat, NewAttendance, NewEmployee, RawFields, SearchQuery,
    SuffixParsing, SystemClock,
};

#[derive(Parser)]
#[command(name = "hrms", version, about = "HRMS Lite attendance administration and reports")]
struct Cli {
    /// SQLite database file (defaults to DATABASE_PATH or hrms.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
    Html,
}

#[derive(Subcommand)]
enum Command {
    /// Create the schema
    Init,
    /// Validate and add an employee
    AddEmployee {
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        department: String,
    },
    /// List all employees
    List,
    /// Record attendance for one employee (database id)
    Mark {
        #[arg(long)]
        employee: i64,
        #[arg(long)]
        date: String,
        #[arg(long)]
        status: String,
    },
    /// Suggest the next employee code for a department
    NextId {
        #[arg(long)]
        department: Option<String>,
        /// Read suffixes after a fixed three characters
        #[arg(long)]
        fixed_width: bool,
    },
    /// Search employees by code, name, email or department
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long)]
        department: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Attendance statistics for one employee
    Stats { employee: i64 },
    /// Full report for one employee
    Report { employee: i64 },
    /// Attendance trend over the most recent days
    Trend {
        employee: i64,
        #[arg(long, default_value_t = 30)]
        days: usize,
    },
    /// Overtime estimate from present days
    Overtime {
        employee: i64,
        #[arg(long, default_value_t = 8)]
        hours: u32,
    },
    /// Per-department summary
    Departments,
    /// Headcount and today's / this week's attendance
    Dashboard,
    /// Export attendance as CSV, JSON or HTML
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,
        #[arg(long)]
        employee: Option<i64>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Count working days (Mon-Fri, minus fixed holidays) in a range
    WorkingDays {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// Load sample employees and 30 days of sample attendance
    Seed {
        /// Drop and recreate both tables first
        #[arg(long)]
        reset: bool,
    },
    /// Check tables exist and show row counts
    Verify,
    /// Write a consistent copy of the database
    Backup {
        /// Target file (default: hrms_backup_<timestamp>.db next to the database)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete backups older than the given number of days
    CleanupBackups {
        #[arg(long, default_value_t = 7)]
        days: u64,
        /// Directory to scan (default: the database's directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path.clone());
    info!(path = %db_path.display(), "Opening database");

    // Verification inspects the file as found; everything else ensures the schema
    let verifying = matches!(cli.command, Command::Verify);
    if verifying && !db_path.exists() {
        bail!("Database file not found: {}", db_path.display());
    }

    let mut conn = Connection::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    if !verifying {
        db::setup_database(&conn)?;
    }

    let clock = SystemClock;

    match cli.command {
        Command::Init => println!("✓ Database initialized at {}", db_path.display()),
        Command::AddEmployee {
            employee_id,
            name,
            email,
            department,
        } => add_employee(&conn, &employee_id, &name, &email, &department)?,
        Command::List => {
            for employee in db::get_all_employees(&conn)? {
                print_employee(&employee);
            }
        }
        Command::Mark {
            employee,
            date,
            status,
        } => mark(&conn, &clock, employee, &date, &status)?,
        Command::NextId {
            department,
            fixed_width,
        } => {
            let codes: Vec<String> = db::get_all_employees(&conn)?
                .into_iter()
                .map(|e| e.employee_id)
                .collect();
            let parsing = if fixed_width {
                SuffixParsing::FixedWidth
            } else {
                SuffixParsing::PrefixLength
            };
            println!("{}", generate_employee_id(department.as_deref(), &codes, parsing));
        }
        Command::Search {
            query,
            department,
            limit,
        } => {
            let employees = db::get_all_employees(&conn)?;
            let query = SearchQuery {
                text: query,
                department,
                limit,
            };
            let results = search_with_filters(&employees, &query);
            println!("🔍 {} match(es)", results.len());
            for employee in &results {
                print_employee(employee);
            }
        }
        Command::Stats { employee } => {
            let (_, entries) = employee_entries(&conn, employee)?;
            print_json(&calculate_attendance_stats(&entries))?;
        }
        Command::Report { employee } => {
            let (employee, entries) = employee_entries(&conn, employee)?;
            print_json(&generate_employee_report(&employee, &entries, &clock)?)?;
        }
        Command::Trend { employee, days } => {
            let (_, entries) = employee_entries(&conn, employee)?;
            print_json(&get_attendance_trends(&entries, days))?;
        }
        Command::Overtime { employee, hours } => {
            let (_, entries) = employee_entries(&conn, employee)?;
            print_json(&estimate_overtime(&entries, hours))?;
        }
        Command::Departments => {
            let employees = db::get_all_employees(&conn)?;
            let entries = to_entries(&db::get_all_attendance(&conn)?);
            print_json(&get_department_summary(&employees, &entries))?;
        }
        Command::Dashboard => {
            let employees = db::get_all_employees(&conn)?;
            let records = db::get_all_attendance(&conn)?;
            print_json(&dashboard_stats(&employees, &records, clock.today()))?;
        }
        Command::Export {
            format,
            employee,
            start,
            end,
            output,
        } => {
            if let (Some(start), Some(end)) = (start, end) {
                DateRange::new(start, end)?;
            }
            let filter = ExportFilter {
                employee_id: employee,
                start_date: start,
                end_date: end,
            };
            let rows = build_export_rows(
                &db::get_all_employees(&conn)?,
                &db::get_all_attendance(&conn)?,
                &filter,
            );

            let rendered = match format {
                OutputFormat::Csv => export_as(&rows, ExportFormat::Csv)?,
                OutputFormat::Json => export_as(&rows, ExportFormat::Json)?,
                OutputFormat::Html => render_html_report(&rows, clock.now()),
            };

            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("✓ Exported {} record(s) to {}", rows.len(), path.display());
                }
                None => println!("{}", rendered),
            }
        }
        Command::WorkingDays { start, end } => {
            let range = DateRange::new(start, end)?;
            let holidays: Vec<NaiveDate> = (start.year()..=end.year())
                .flat_map(default_holidays)
                .collect();
            let on_weekdays = weekday_holidays(start, end, &holidays);

            println!(
                "📅 {} day(s), {} working day(s), {} holiday(s) on weekdays",
                range.days_count(),
                working_days(start, end) - on_weekdays,
                on_weekdays
            );
        }
        Command::Seed { reset } => {
            if reset {
                maintenance::reset_database(&conn)?;
                println!("✓ Tables dropped and recreated");
            }
            let summary = maintenance::seed_sample_data(&mut conn, clock.today(), &mut rand::thread_rng())?;
            println!("✓ Created {} employees", summary.employees);
            println!("✓ Created {} attendance records", summary.attendance);
        }
        Command::Verify => verify(&conn)?,
        Command::Backup { output } => {
            let now = clock.now();
            let dest = output.unwrap_or_else(|| backup_dir(&db_path).join(maintenance::backup_file_name(now)));
            let backup = maintenance::backup_database(&conn, &dest, now)?;
            println!("💾 Backup written to {} ({} bytes)", backup.backup_path.display(), backup.size);
        }
        Command::CleanupBackups { days, dir } => {
            let dir = dir.unwrap_or_else(|| backup_dir(&db_path));
            let report = maintenance::cleanup_old_backups(&dir, days, SystemTime::now())?;
            println!("🧹 Removed {} backup(s) older than {} day(s)", report.removed_count, days);
            for path in &report.removed_files {
                println!("  - {}", path.display());
            }
        }
    }

    Ok(())
}

fn verify(conn: &Connection) -> Result<()> {
    let report = maintenance::verify_database(conn)?;
    if !report.is_valid() {
        bail!("Required tables not found (found: {:?})", report.tables);
    }

    println!("✓ Database verification passed");
    println!("  Tables found: {}", report.tables.join(", "));
    println!("  Employees: {}", report.employees);
    println!("  Attendance Records: {}", report.attendance);
    Ok(())
}

fn backup_dir(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn add_employee(conn: &Connection, employee_id: &str, name: &str, email: &str, department: &str) -> Result<()> {
    let fields: RawFields = [
        ("employee_id", employee_id),
        ("full_name", name),
        ("email", email),
        ("department", department),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), Value::from(v)))
    .collect();

    let outcome = validate_employee_data(&fields);
    if !outcome.is_valid {
        bail!("Invalid employee: {}", outcome.errors.join("; "));
    }
    let new_employee: NewEmployee = outcome.cleaned_as()?;

    if db::employee_id_exists(conn, &new_employee.employee_id)? {
        bail!("Employee ID already exists");
    }
    if db::email_exists(conn, &new_employee.email)? {
        bail!("Email already exists");
    }

    let employee = db::insert_employee(conn, &new_employee)?;
    println!("✓ Added employee #{}", employee.id);
    print_employee(&employee);
    Ok(())
}

fn mark(conn: &Connection, clock: &dyn Clock, employee: i64, date: &str, status: &str) -> Result<()> {
    let fields: RawFields = [
        ("employee_id".to_string(), json!(employee)),
        ("date".to_string(), json!(date)),
        ("status".to_string(), json!(status)),
    ]
    .into_iter()
    .collect();

    let outcome = validate_attendance_data(&fields, clock);
    if !outcome.is_valid {
        bail!("Invalid attendance: {}", outcome.errors.join("; "));
    }
    let mark: NewAttendance = outcome.cleaned_as()?;

    if db::get_employee(conn, mark.employee_id)?.is_none() {
        bail!("Employee not found");
    }
    if db::attendance_exists(conn, mark.employee_id, mark.date)? {
        bail!("Attendance already marked");
    }

    let record = db::insert_attendance(conn, &mark)?;
    println!("✓ Marked {} for employee #{} on {}", record.status, record.employee_id, record.date);
    Ok(())
}

fn employee_entries(conn: &Connection, id: i64) -> Result<(Employee, Vec<AttendanceEntry>)> {
    let employee = db::get_employee(conn, id)?.with_context(|| format!("Employee {} not found", id))?;
    let entries = to_entries(&db::get_attendance_for_employee(conn, id)?);
    Ok((employee, entries))
}

fn to_entries(records: &[AttendanceRecord]) -> Vec<AttendanceEntry> {
    records.iter().map(AttendanceEntry::from).collect()
}

fn print_employee(employee: &Employee) {
    println!(
        "  #{:<4} {:<8} {:<24} {:<32} {}",
        employee.id, employee.employee_id, employee.full_name, employee.email, employee.department
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
