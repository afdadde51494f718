// 📐 Input Validation - Employee and attendance field checks
// Soft-failure style: every problem is collected, nothing is raised

use crate::clock::Clock;
use crate::models::{AttendanceStatus, Department};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Raw field mapping as received from a caller
pub type RawFields = HashMap<String, Value>;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s\-\.]+$").expect("valid name regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

const MAX_EMPLOYEE_ID_LEN: usize = 20;
const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 100;

// ============================================================================
// VALIDATION OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// Input echoed back, with normalized values for the fields that passed
    pub cleaned_data: RawFields,
}

impl ValidationOutcome {
    fn from_parts(errors: Vec<String>, cleaned_data: RawFields) -> Self {
        ValidationOutcome {
            is_valid: errors.is_empty(),
            errors,
            cleaned_data,
        }
    }

    /// Deserialize the cleaned fields into a typed record
    pub fn cleaned_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let object: serde_json::Map<String, Value> = self
            .cleaned_data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::from_value(Value::Object(object))
    }
}

// ============================================================================
// EMPLOYEE VALIDATOR
// ============================================================================

/// Check and normalize employee fields.
///
/// All four fields are checked independently, so a bad record reports one
/// error per failing field.
pub fn validate_employee_data(fields: &RawFields) -> ValidationOutcome {
    let mut errors = Vec::new();
    let mut cleaned = fields.clone();

    let employee_id = field_text(fields, "employee_id");
    let employee_id = employee_id.trim();
    if employee_id.is_empty() {
        errors.push("Employee ID is required".to_string());
    } else if employee_id.chars().count() > MAX_EMPLOYEE_ID_LEN {
        errors.push(format!(
            "Employee ID too long (max {} characters)",
            MAX_EMPLOYEE_ID_LEN
        ));
    } else {
        cleaned.insert(
            "employee_id".to_string(),
            Value::String(employee_id.to_uppercase()),
        );
    }

    let full_name = field_text(fields, "full_name");
    let full_name = full_name.trim();
    if full_name.is_empty() {
        errors.push("Full name is required".to_string());
    } else if full_name.chars().count() > MAX_NAME_LEN {
        errors.push(format!("Full name too long (max {} characters)", MAX_NAME_LEN));
    } else if !NAME_RE.is_match(full_name) {
        errors.push("Full name contains invalid characters".to_string());
    } else {
        cleaned.insert("full_name".to_string(), Value::String(title_case(full_name)));
    }

    let email = field_text(fields, "email").trim().to_lowercase();
    if email.is_empty() {
        errors.push("Email is required".to_string());
    } else if !EMAIL_RE.is_match(&email) {
        errors.push("Invalid email format".to_string());
    } else if email.chars().count() > MAX_EMAIL_LEN {
        errors.push(format!("Email too long (max {} characters)", MAX_EMAIL_LEN));
    } else {
        cleaned.insert("email".to_string(), Value::String(email));
    }

    let department = field_text(fields, "department");
    let department = department.trim();
    if department.is_empty() {
        errors.push("Department is required".to_string());
    } else if Department::from_name(department).is_none() {
        let names: Vec<&str> = Department::ALL.iter().map(|d| d.name()).collect();
        errors.push(format!(
            "Invalid department. Must be one of: {}",
            names.join(", ")
        ));
    } else {
        cleaned.insert(
            "department".to_string(),
            Value::String(department.to_string()),
        );
    }

    ValidationOutcome::from_parts(errors, cleaned)
}

// ============================================================================
// ATTENDANCE VALIDATOR
// ============================================================================

/// Check attendance fields. `employee_id` is only checked for presence;
/// the date must not lie after the clock's current date.
pub fn validate_attendance_data(fields: &RawFields, clock: &dyn Clock) -> ValidationOutcome {
    let mut errors = Vec::new();
    let mut cleaned = fields.clone();

    if !fields.get("employee_id").map_or(false, is_truthy) {
        errors.push("Employee ID is required".to_string());
    }

    let date_text = field_text(fields, "date");
    match NaiveDate::parse_from_str(&date_text, "%Y-%m-%d") {
        Ok(date) => {
            if date > clock.today() {
                errors.push("Date cannot be in the future".to_string());
            }
            cleaned.insert("date".to_string(), Value::String(date_text));
        }
        Err(_) => errors.push("Invalid date format. Use YYYY-MM-DD".to_string()),
    }

    let status = field_text(fields, "status");
    let status = status.trim();
    match AttendanceStatus::from_name(status) {
        Some(s) => {
            cleaned.insert("status".to_string(), Value::String(s.as_str().to_string()));
        }
        None => errors.push("Status must be either \"Present\" or \"Absent\"".to_string()),
    }

    ValidationOutcome::from_parts(errors, cleaned)
}

// ============================================================================
// HELPERS
// ============================================================================

/// Text form of a raw field. Missing and null read as empty.
fn field_text(fields: &RawFields, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Upper-case the first letter of every word, lower-case the rest.
/// Any non-letter starts a new word ("o.neil" -> "O.Neil").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::NewEmployee;
    use serde_json::json;

    fn fields(value: Value) -> RawFields {
        serde_json::from_value(value).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn test_valid_employee_is_normalized() {
        let outcome = validate_employee_data(&fields(json!({
            "employee_id": " eng001 ",
            "full_name": "mary-jane o.neil",
            "email": "  Mary.ONeil@Example.COM ",
            "department": "Engineering"
        })));

        assert!(outcome.is_valid);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.cleaned_data["employee_id"], json!("ENG001"));
        assert_eq!(outcome.cleaned_data["full_name"], json!("Mary-Jane O.Neil"));
        assert_eq!(outcome.cleaned_data["email"], json!("mary.oneil@example.com"));
        assert_eq!(outcome.cleaned_data["department"], json!("Engineering"));

        let employee: NewEmployee = outcome.cleaned_as().unwrap();
        assert_eq!(employee.department, Department::Engineering);
    }

    #[test]
    fn test_every_bad_field_is_reported() {
        let outcome = validate_employee_data(&fields(json!({
            "employee_id": "",
            "full_name": "John123",
            "email": "bad",
            "department": "Nope"
        })));

        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors.len(), 4);
        assert_eq!(outcome.errors[0], "Employee ID is required");
        assert_eq!(outcome.errors[1], "Full name contains invalid characters");
        assert_eq!(outcome.errors[2], "Invalid email format");
        assert!(outcome.errors[3].starts_with("Invalid department. Must be one of: Engineering"));
    }

    #[test]
    fn test_failed_fields_are_echoed_unchanged() {
        let outcome = validate_employee_data(&fields(json!({
            "employee_id": "eng002",
            "full_name": "R2-D2",
            "email": "r2@example.com",
            "department": "Engineering",
            "extra": 7
        })));

        assert!(!outcome.is_valid);
        assert_eq!(outcome.cleaned_data["full_name"], json!("R2-D2"));
        assert_eq!(outcome.cleaned_data["employee_id"], json!("ENG002"));
        assert_eq!(outcome.cleaned_data["extra"], json!(7));
    }

    #[test]
    fn test_length_limits() {
        let outcome = validate_employee_data(&fields(json!({
            "employee_id": "X".repeat(21),
            "full_name": "A".repeat(101),
            "email": format!("{}@example.com", "a".repeat(95)),
            "department": "HR"
        })));

        assert_eq!(
            outcome.errors,
            vec![
                "Employee ID too long (max 20 characters)".to_string(),
                "Full name too long (max 100 characters)".to_string(),
                "Email too long (max 100 characters)".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_fields_are_required() {
        let outcome = validate_employee_data(&RawFields::new());
        assert_eq!(
            outcome.errors,
            vec![
                "Employee ID is required".to_string(),
                "Full name is required".to_string(),
                "Email is required".to_string(),
                "Department is required".to_string(),
            ]
        );
    }

    #[test]
    fn test_department_is_case_sensitive() {
        let outcome = validate_employee_data(&fields(json!({
            "employee_id": "HR001",
            "full_name": "Ann Lee",
            "email": "ann@example.com",
            "department": "hr"
        })));

        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_valid_attendance() {
        let outcome = validate_attendance_data(
            &fields(json!({"employee_id": 4, "date": "2024-03-15", "status": " Present "})),
            &clock(),
        );

        assert!(outcome.is_valid);
        assert_eq!(outcome.cleaned_data["status"], json!("Present"));
        assert_eq!(outcome.cleaned_data["date"], json!("2024-03-15"));
    }

    #[test]
    fn test_future_date_is_rejected() {
        let outcome = validate_attendance_data(
            &fields(json!({"employee_id": 4, "date": "2024-03-16", "status": "Absent"})),
            &clock(),
        );

        assert_eq!(outcome.errors, vec!["Date cannot be in the future".to_string()]);
    }

    #[test]
    fn test_bad_attendance_reports_all_problems() {
        let outcome = validate_attendance_data(
            &fields(json!({"employee_id": 0, "date": "15/03/2024", "status": "present"})),
            &clock(),
        );

        assert!(!outcome.is_valid);
        assert_eq!(
            outcome.errors,
            vec![
                "Employee ID is required".to_string(),
                "Invalid date format. Use YYYY-MM-DD".to_string(),
                "Status must be either \"Present\" or \"Absent\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("JOHN smith"), "John Smith");
        assert_eq!(title_case("anne-marie"), "Anne-Marie");
        assert_eq!(title_case("j. r. r. tolkien"), "J. R. R. Tolkien");
    }
}
