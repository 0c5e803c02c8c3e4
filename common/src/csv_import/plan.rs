use crate::model::application::Application;
use crate::model::csv::{ImportRowError, ParsedApplication};
use std::collections::BTreeMap;

/// Rows that will be committed and the problems found in the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub processed_count: usize,
    pub valid: Vec<ParsedApplication>,
    pub errors: Vec<ImportRowError>,
}

impl ImportPlan {
    /// Stages 3 and 4: partition by row validity, then withhold every row
    /// whose email (compared case-insensitively) appears on another valid row.
    pub fn from_parsed(rows: Vec<ParsedApplication>) -> Self {
        let processed_count = rows.len();
        let mut errors = Vec::new();
        let mut valid = Vec::new();

        for row in rows {
            if row.is_valid() {
                valid.push(row);
            } else {
                errors.extend(row.errors.iter().map(|message| ImportRowError::new(row.row_number, message.clone())));
            }
        }

        let mut by_email: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for row in &valid {
            by_email
                .entry(row.application.email.trim().to_lowercase())
                .or_default()
                .push(row.row_number);
        }

        let mut plan = Self {
            processed_count,
            valid,
            errors,
        };
        plan.reject_where(|row| {
            let email = row.application.email.trim().to_lowercase();
            let rows = by_email.get(&email)?;
            if rows.len() < 2 {
                return None;
            }
            let others: Vec<String> = rows
                .iter()
                .filter(|n| **n != row.row_number)
                .map(|n| n.to_string())
                .collect();
            Some(format!(
                "Duplicate email {} also appears in row(s) {}",
                email,
                others.join(", ")
            ))
        });
        plan
    }

    /// Moves every valid row for which `check` returns a message into the
    /// error list. Errors stay sorted by row.
    pub fn reject_where(&mut self, mut check: impl FnMut(&ParsedApplication) -> Option<String>) {
        let mut kept = Vec::with_capacity(self.valid.len());
        for mut row in std::mem::take(&mut self.valid) {
            match check(&row) {
                Some(message) => {
                    self.errors.push(ImportRowError::new(row.row_number, message.clone()));
                    row.errors.push(message);
                }
                None => kept.push(row),
            }
        }
        self.valid = kept;
        self.errors.sort_by_key(|e| e.row);
    }

    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }

    /// Clean applications ready to insert, paired with their source rows.
    pub fn applications(&self) -> Vec<(usize, Application)> {
        self.valid
            .iter()
            .map(|row| (row.row_number, row.application.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(row_number: usize, email: &str, errors: &[&str]) -> ParsedApplication {
        let mut application = Application::new("s1");
        application.email = email.to_string();
        ParsedApplication {
            row_number,
            errors: errors.iter().map(|e| e.to_string()).collect(),
            application,
        }
    }

    #[test]
    fn invalid_rows_become_row_errors() {
        let plan = ImportPlan::from_parsed(vec![
            parsed(2, "a@b.com", &[]),
            parsed(3, "bad", &["Missing required field: first_name", "Invalid email format"]),
        ]);
        assert_eq!(plan.processed_count, 2);
        assert_eq!(plan.valid_count(), 1);
        assert_eq!(
            plan.errors,
            [
                ImportRowError::new(3, "Missing required field: first_name"),
                ImportRowError::new(3, "Invalid email format"),
            ]
        );
    }

    #[test]
    fn shared_emails_reference_each_other() {
        let plan = ImportPlan::from_parsed(vec![
            parsed(2, "a@b.com", &[]),
            parsed(3, "unique@b.com", &[]),
            parsed(4, "A@B.com", &[]),
        ]);
        assert_eq!(plan.valid_count(), 1);
        assert_eq!(plan.valid[0].row_number, 3);
        assert_eq!(plan.errors.len(), 2);
        assert_eq!(plan.errors[0].row, 2);
        assert!(plan.errors[0].message.contains("row(s) 4"));
        assert_eq!(plan.errors[1].row, 4);
        assert!(plan.errors[1].message.contains("row(s) 2"));
    }

    #[test]
    fn invalid_rows_do_not_count_as_duplicates() {
        let plan = ImportPlan::from_parsed(vec![
            parsed(2, "a@b.com", &[]),
            parsed(3, "a@b.com", &["Missing required field: school"]),
        ]);
        assert_eq!(plan.valid_count(), 1);
        assert_eq!(plan.errors.len(), 1);
    }

    #[test]
    fn reject_where_withholds_rows() {
        let mut plan = ImportPlan::from_parsed(vec![parsed(2, "a@b.com", &[]), parsed(3, "c@d.com", &[])]);
        plan.reject_where(|row| (row.row_number == 3).then(|| "Application already exists".to_string()));
        assert_eq!(plan.valid_count(), 1);
        assert_eq!(plan.errors, [ImportRowError::new(3, "Application already exists")]);
    }
}
