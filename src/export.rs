// 📤 Export Formatter - CSV, JSON and HTML renderings of attendance rows

use crate::error::{ReportError, ReportResult};
use crate::models::{AttendanceRecord, Employee, ExportRow};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

pub const CSV_HEADER: [&str; 4] = ["Employee ID", "Employee Name", "Date", "Status"];
pub const NO_DATA_MESSAGE: &str = "No attendance data available";
const UNKNOWN: &str = "Unknown";

// ============================================================================
// EXPORT FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    /// Case-insensitive: "CSV", "csv" and "Csv" are all accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

// ============================================================================
// CSV / JSON
// ============================================================================

/// Export rows in the format named by `format` ("csv" or "json", any case)
pub fn export_attendance_report(rows: &[ExportRow], format: &str) -> ReportResult<String> {
    export_as(rows, format.parse()?)
}

pub fn export_as(rows: &[ExportRow], format: ExportFormat) -> ReportResult<String> {
    match format {
        ExportFormat::Csv => export_to_csv(rows),
        ExportFormat::Json => export_to_json(rows),
    }
}

/// Header line plus one line per row, no trailing newline.
///
/// Values are written verbatim: a comma inside a name is NOT quoted and will
/// shift columns for strict CSV readers.
pub fn export_to_csv(rows: &[ExportRow]) -> ReportResult<String> {
    if rows.is_empty() {
        return Ok(NO_DATA_MESSAGE.to_string());
    }

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.employee_id.as_str(),
            row.employee_name.as_str(),
            row.date.as_str(),
            row.status.as_str(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ReportError::Csv(e.into_error().into()))?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

/// Pretty JSON array, two-space indentation
pub fn export_to_json(rows: &[ExportRow]) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

// ============================================================================
// HTML
// ============================================================================

/// Standalone HTML document: summary header and a table of rows
pub fn render_html_report(rows: &[ExportRow], generated_at: NaiveDateTime) -> String {
    if rows.is_empty() {
        return "<html><body><p>No data available</p></body></html>".to_string();
    }

    let mut html = String::new();
    html.push_str(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>HRMS Report</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 20px; }
        table { border-collapse: collapse; width: 100%; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; font-weight: bold; }
        .header { font-size: 24px; margin-bottom: 20px; color: #333; }
        .summary { background-color: #f9f9f9; padding: 15px; margin: 20px 0; border-radius: 5px; }
    </style>
</head>
<body>
    <div class="header">HRMS Lite Report</div>
"#,
    );

    html.push_str(&format!(
        r#"    <div class="summary">
        <h3>Summary</h3>
        <p>Total Records: {}</p>
        <p>Generated: {}</p>
    </div>
    <table>
        <thead>
            <tr><th>Employee ID</th><th>Name</th><th>Date</th><th>Status</th></tr>
        </thead>
        <tbody>
"#,
        rows.len(),
        generated_at.format("%Y-%m-%d %H:%M:%S"),
    ));

    for row in rows {
        html.push_str(&format!(
            "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.employee_id),
            escape_html(&row.employee_name),
            escape_html(&row.date),
            escape_html(&row.status),
        ));
    }

    html.push_str("        </tbody>\n    </table>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// EXPORT ROWS
// ============================================================================

/// Optional narrowing of an export: one employee and/or a date interval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportFilter {
    pub employee_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ExportFilter {
    pub fn accepts(&self, record: &AttendanceRecord) -> bool {
        self.employee_id.map_or(true, |id| record.employee_id == id)
            && self.start_date.map_or(true, |start| record.date >= start)
            && self.end_date.map_or(true, |end| record.date <= end)
    }
}

/// Join attendance records with their employees into export rows.
/// Records of unknown employees are kept, with "Unknown" code and name.
pub fn build_export_rows(
    employees: &[Employee],
    records: &[AttendanceRecord],
    filter: &ExportFilter,
) -> Vec<ExportRow> {
    let by_id: HashMap<i64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();

    records
        .iter()
        .filter(|r| filter.accepts(r))
        .map(|r| {
            let employee = by_id.get(&r.employee_id);
            ExportRow {
                employee_id: employee.map_or(UNKNOWN.to_string(), |e| e.employee_id.clone()),
                employee_name: employee.map_or(UNKNOWN.to_string(), |e| e.full_name.clone()),
                date: r.date.format("%Y-%m-%d").to_string(),
                status: r.status.as_str().to_string(),
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
