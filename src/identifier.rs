// 🏷️ Identifier Generator - Next department-scoped employee code
//
// ENG001, ENG002, ... per department. Unknown departments fall back to EMP.

use crate::models::Department;
use serde::{Deserialize, Serialize};

const FALLBACK_PREFIX: &str = "EMP";

/// How the numeric suffix of an existing identifier is located.
///
/// Historic codes were read by skipping a fixed three characters, which
/// misreads two-letter prefixes: for `HR123` it reads `23`. `PrefixLength`
/// skips exactly the prefix instead. Both give the same answer for the
/// three-letter prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SuffixParsing {
    /// Skip `prefix.len()` characters
    #[default]
    PrefixLength,
    /// Skip three characters regardless of prefix (legacy behaviour)
    FixedWidth,
}

impl SuffixParsing {
    fn skip(&self, prefix: &str) -> usize {
        match self {
            SuffixParsing::PrefixLength => prefix.len(),
            SuffixParsing::FixedWidth => 3,
        }
    }
}

/// Prefix used for a department; `None` means absent or unrecognized
pub fn prefix_for(department: Option<Department>) -> &'static str {
    department.map_or(FALLBACK_PREFIX, |d| d.prefix())
}

/// Generate the next identifier for a department, by department name.
/// Names that are not an exact department match use the EMP prefix.
pub fn generate_employee_id<S: AsRef<str>>(
    department: Option<&str>,
    existing_ids: &[S],
    parsing: SuffixParsing,
) -> String {
    let department = department.and_then(Department::from_name);
    next_identifier(prefix_for(department), existing_ids, parsing)
}

/// `prefix` followed by (highest numeric suffix + 1), zero-padded to 3 digits.
/// Identifiers whose suffix is not purely numeric are ignored.
pub fn next_identifier<S: AsRef<str>>(
    prefix: &str,
    existing_ids: &[S],
    parsing: SuffixParsing,
) -> String {
    let skip = parsing.skip(prefix);

    // Suffixes with no representable successor are ignored like non-numeric ones
    let next = existing_ids
        .iter()
        .map(|id| id.as_ref())
        .filter(|id| id.starts_with(prefix))
        .filter_map(|id| id.get(skip..))
        .filter_map(parse_suffix)
        .filter_map(|n| n.checked_add(1))
        .max()
        .unwrap_or(1);

    format!("{}{:03}", prefix, next)
}

fn parse_suffix(suffix: &str) -> Option<u64> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: [&str; 0] = [];

    #[test]
    fn test_first_identifier() {
        let id = generate_employee_id(Some("Engineering"), &EMPTY, SuffixParsing::default());
        assert_eq!(id, "ENG001");
    }

    #[test]
    fn test_increments_past_highest() {
        let existing = ["ENG001", "ENG007", "SAL010", "ENG003"];
        let id = generate_employee_id(Some("Engineering"), &existing, SuffixParsing::default());
        assert_eq!(id, "ENG008");
    }

    #[test]
    fn test_non_numeric_suffixes_are_ignored() {
        let existing = ["OPS002", "OPS00X", "OPS", "OPS-99"];
        let id = generate_employee_id(Some("Operations"), &existing, SuffixParsing::default());
        assert_eq!(id, "OPS003");
    }

    #[test]
    fn test_unknown_or_missing_department_uses_emp() {
        let existing = ["EMP004"];
        assert_eq!(
            generate_employee_id(Some("Legal"), &existing, SuffixParsing::default()),
            "EMP005"
        );
        assert_eq!(
            generate_employee_id(None, &existing, SuffixParsing::default()),
            "EMP005"
        );
    }

    #[test]
    fn test_suffix_grows_past_three_digits() {
        let existing = ["FIN999"];
        let id = generate_employee_id(Some("Finance"), &existing, SuffixParsing::default());
        assert_eq!(id, "FIN1000");
    }

    #[test]
    fn test_two_letter_prefix_with_prefix_length_parsing() {
        let existing = ["HR007", "HR123"];
        let id = generate_employee_id(Some("HR"), &existing, SuffixParsing::PrefixLength);
        assert_eq!(id, "HR124");
    }

    #[test]
    fn test_two_letter_prefix_with_fixed_width_parsing() {
        // "HR123" is read as 23, "HR007" as 7
        let existing = ["HR007", "HR123"];
        let id = generate_employee_id(Some("HR"), &existing, SuffixParsing::FixedWidth);
        assert_eq!(id, "HR024");
    }

    #[test]
    fn test_fixed_width_skips_too_short_identifiers() {
        let existing = ["HR"];
        let id = generate_employee_id(Some("HR"), &existing, SuffixParsing::FixedWidth);
        assert_eq!(id, "HR001");
    }

    #[test]
    fn test_parsing_modes_agree_on_three_letter_prefixes() {
        let existing = ["MKT041", "MKT002"];
        assert_eq!(
            generate_employee_id(Some("Marketing"), &existing, SuffixParsing::FixedWidth),
            generate_employee_id(Some("Marketing"), &existing, SuffixParsing::PrefixLength),
        );
    }

    #[test]
    fn test_max_width_suffix_does_not_overflow() {
        let existing = ["ENG18446744073709551615"];
        let id = generate_employee_id(Some("Engineering"), &existing, SuffixParsing::default());
        assert_eq!(id, "ENG001");

        let existing = ["ENG18446744073709551615", "ENG004", "ENG99999999999999999999999"];
        let id = generate_employee_id(Some("Engineering"), &existing, SuffixParsing::default());
        assert_eq!(id, "ENG005");
    }
}
