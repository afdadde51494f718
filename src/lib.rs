// HRMS Lite - Core Library
// Attendance aggregation and reporting engine, shared by the CLI and the API server

pub mod models;
pub mod clock;
pub mod error;
pub mod validation;     // Input checking and normalization
pub mod identifier;     // Next employee code per department
pub mod search;
pub mod stats;          // Per-employee, per-department and dashboard aggregates
pub mod window;         // Month and date-range windows
pub mod calendar;
pub mod trend;
pub mod report;
pub mod export;         // CSV / JSON / HTML renderers
pub mod throttle;       // TTL cache + rate limiter state
pub mod config;
pub mod db;
pub mod maintenance;    // Sample data, verification, backups

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use models::{
    AttendanceEntry, AttendanceRecord, AttendanceStatus, Department,
    Employee, ExportRow, NewAttendance, NewEmployee,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ReportError, ReportResult};
pub use validation::{validate_attendance_data, validate_employee_data, RawFields, ValidationOutcome};
pub use identifier::{generate_employee_id, SuffixParsing};
pub use search::{search_employees, search_with_filters, SearchQuery};
pub use stats::{
    calculate_attendance_stats, dashboard_stats, estimate_overtime, get_department_summary,
    AttendanceStats, DashboardStats, DepartmentSummary, OvertimeEstimate,
};
pub use window::{filter_date_range, get_monthly_attendance, DateRange};
pub use trend::{get_attendance_trends, Trend, TrendReport};
pub use report::{generate_employee_report, EmployeeReport};
pub use export::{
    build_export_rows, export_as, export_attendance_report, render_html_report,
    ExportFilter, ExportFormat,
};
pub use config::AppConfig;
pub use db::setup_database;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
