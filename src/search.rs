// 🔍 Employee Search - Substring match across employee fields

use crate::models::Employee;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Search request: free text, optional department filter, result cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

/// Case-insensitive substring search over employee_id, full_name, email
/// and department, in that order.
///
/// An empty query returns the input unchanged. Results are deduplicated by
/// `id`: an id keeps the position of its first match and the value of its
/// last one.
pub fn search_employees(employees: &[Employee], query: &str) -> Vec<Employee> {
    if query.is_empty() {
        return employees.to_vec();
    }

    let needle = query.to_lowercase();
    let mut results: Vec<Employee> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for emp in employees.iter().filter(|emp| matches(emp, &needle)) {
        match positions.get(&emp.id) {
            Some(&pos) => results[pos] = emp.clone(),
            None => {
                positions.insert(emp.id, results.len());
                results.push(emp.clone());
            }
        }
    }

    results
}

/// Text search, then exact (case-insensitive) department filter, then limit
pub fn search_with_filters(employees: &[Employee], query: &SearchQuery) -> Vec<Employee> {
    let mut found = search_employees(employees, &query.text);

    if let Some(dept) = query.department.as_deref() {
        let dept = dept.to_lowercase();
        found.retain(|emp| emp.department.name().to_lowercase() == dept);
    }

    found.truncate(query.limit);
    found
}

fn matches(emp: &Employee, needle: &str) -> bool {
    [
        emp.employee_id.as_str(),
        emp.full_name.as_str(),
        emp.email.as_str(),
        emp.department.name(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Department;

    fn employee(id: i64, code: &str, name: &str, email: &str, dept: Department) -> Employee {
        Employee {
            id,
            employee_id: code.to_string(),
            full_name: name.to_string(),
            email: email.to_string(),
            department: dept,
        }
    }

    fn staff() -> Vec<Employee> {
        vec![
            employee(1, "ENG001", "Alice Smith", "alice@example.com", Department::Engineering),
            employee(2, "SAL001", "Bob Jones", "bob@smith.io", Department::Sales),
            employee(3, "HR001", "Carol White", "carol@example.com", Department::HR),
        ]
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let all = staff();
        assert_eq!(search_employees(&all, ""), all);
    }

    #[test]
    fn test_matches_on_different_fields_counted_once() {
        // Alice matches on name, Bob on email
        let found = search_employees(&staff(), "SMITH");
        let ids: Vec<i64> = found.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_record_matching_many_fields_appears_once() {
        let all = vec![employee(
            7,
            "ENG007",
            "Eng Engström",
            "eng@eng.example",
            Department::Engineering,
        )];
        assert_eq!(search_employees(&all, "eng").len(), 1);
    }

    #[test]
    fn test_matches_department_name() {
        let found = search_employees(&staff(), "sales");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].employee_id, "SAL001");
    }

    #[test]
    fn test_duplicate_ids_keep_first_position_last_value() {
        let mut all = staff();
        all.push(employee(1, "ENG001", "Alice Smith-Brown", "alice@example.com", Department::Engineering));

        let found = search_employees(&all, "alice");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name, "Alice Smith-Brown");

        let found = search_employees(&all, "example");
        let ids: Vec<i64> = found.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(found[0].full_name, "Alice Smith-Brown");
    }

    #[test]
    fn test_department_filter_and_limit() {
        let query = SearchQuery {
            text: "example".to_string(),
            department: Some("hr".to_string()),
            limit: 10,
        };
        let found = search_with_filters(&staff(), &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 3);

        let query = SearchQuery {
            text: String::new(),
            department: None,
            limit: 2,
        };
        assert_eq!(search_with_filters(&staff(), &query).len(), 2);
    }
}
