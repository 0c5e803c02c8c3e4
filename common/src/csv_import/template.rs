use super::{CsvImportError, CSV_HEADERS};
use csv::Writer;

pub const TEMPLATE_FILE_NAME: &str = "application_import_template.csv";

const EXAMPLE_ROW: [&str; 22] = [
    "scholarship-id-here",
    "Jane",
    "Doe",
    "jane.doe@example.com",
    "555-123-4567",
    "123 Main St",
    "Springfield",
    "IL",
    "62701",
    "2005-04-15",
    "Springfield High School",
    "2027",
    "3.8",
    "Computer Science",
    "high_school",
    "I want to build software that helps rural clinics manage patient records.",
    "My family has three children approaching college at the same time.",
    "I tutor middle school students in maths every weekend.",
    "I have worked hard to balance school, work and family responsibilities.",
    "Part-time cashier, 2 years",
    "Robotics club, varsity soccer",
    "National Merit Commended Scholar",
];

/// The header row plus one example row.
pub fn csv_template() -> Result<String, CsvImportError> {
    let mut writer = Writer::from_writer(Vec::new());
    for record in [CSV_HEADERS, EXAMPLE_ROW] {
        writer
            .write_record(record)
            .map_err(|e| CsvImportError::Write(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CsvImportError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvImportError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_import::{parse_csv, transform_row};

    #[test]
    fn template_example_row_imports_cleanly() {
        let template = csv_template().unwrap();
        assert!(template.starts_with("scholarship_id,first_name,last_name,email,"));
        let rows = parse_csv(&template).unwrap();
        assert_eq!(rows.len(), 1);
        let parsed = transform_row(&rows[0], 2026);
        assert!(parsed.is_valid(), "{:?}", parsed.errors);
    }
}
