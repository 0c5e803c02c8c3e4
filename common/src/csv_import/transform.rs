use super::CsvRow;
use crate::model::application::{AcademicLevel, Application, ApplicationStatus};
use crate::model::csv::ParsedApplication;
use crate::wizard::validation::{is_valid_email, is_valid_phone, parse_gpa, parse_graduation_year};

/// Header row of the downloadable template, in column order.
pub const CSV_HEADERS: [&str; 22] = [
    "scholarship_id",
    "first_name",
    "last_name",
    "email",
    "phone",
    "address",
    "city",
    "state",
    "zip",
    "date_of_birth",
    "school",
    "graduation_year",
    "gpa",
    "major",
    "academic_level",
    "career_goals",
    "financial_need",
    "community_involvement",
    "why_deserve_scholarship",
    "work_experience",
    "extracurricular_activities",
    "awards_and_honors",
];

/// Accepted header spellings and the column each one fills. Every canonical
/// header maps to itself.
pub const CSV_FIELD_MAPPINGS: &[(&str, &str)] = &[
    ("scholarship_id", "scholarship_id"),
    ("first_name", "first_name"),
    ("last_name", "last_name"),
    ("email", "email"),
    ("phone", "phone"),
    ("address", "address"),
    ("city", "city"),
    ("state", "state"),
    ("zip", "zip"),
    ("date_of_birth", "date_of_birth"),
    ("school", "school"),
    ("graduation_year", "graduation_year"),
    ("gpa", "gpa"),
    ("major", "major"),
    ("academic_level", "academic_level"),
    ("career_goals", "career_goals"),
    ("financial_need", "financial_need"),
    ("community_involvement", "community_involvement"),
    ("why_deserve_scholarship", "why_deserve_scholarship"),
    ("work_experience", "work_experience"),
    ("extracurricular_activities", "extracurricular_activities"),
    ("awards_and_honors", "awards_and_honors"),
    ("email_address", "email"),
    ("phone_number", "phone"),
    ("zip_code", "zip"),
    ("postal_code", "zip"),
    ("dob", "date_of_birth"),
    ("birth_date", "date_of_birth"),
    ("university", "school"),
    ("grad_year", "graduation_year"),
    ("level", "academic_level"),
];

pub const REQUIRED_COLUMNS: [&str; 6] = ["scholarship_id", "first_name", "last_name", "email", "school", "major"];

/// Column filled by a normalised header, if the header is recognised.
pub fn canonical_column(header: &str) -> Option<&'static str> {
    CSV_FIELD_MAPPINGS
        .iter()
        .find(|(spelling, _)| *spelling == header)
        .map(|(_, column)| *column)
}

/// Stage 2. Maps a row onto an application and records every problem found.
/// Unknown headers are ignored. Imported rows enter as `submitted` with no
/// applicant.
pub fn transform_row(row: &CsvRow, current_year: i32) -> ParsedApplication {
    let mut application = Application::new(String::new());
    application.status = ApplicationStatus::Submitted;

    let raw = |column: &str| -> String {
        row.values
            .iter()
            .filter(|(header, value)| canonical_column(header) == Some(column) && !value.is_empty())
            .map(|(_, value)| value.clone())
            .next()
            .unwrap_or_default()
    };

    let mut errors = Vec::new();
    let mut columns = Vec::with_capacity(CSV_HEADERS.len());
    for column in CSV_HEADERS {
        columns.push((column, raw(column)));
    }

    for (column, value) in &columns {
        if REQUIRED_COLUMNS.contains(column) && value.is_empty() {
            errors.push(format!("Missing required field: {}", column));
        }
    }

    for (column, value) in columns {
        match column {
            "scholarship_id" => application.scholarship_id = value,
            "email" => {
                if !value.is_empty() && !is_valid_email(&value) {
                    errors.push("Invalid email format".to_string());
                }
                application.email = value.to_lowercase();
            }
            "phone" => {
                if !value.is_empty() && !is_valid_phone(&value) {
                    errors.push("Invalid phone number format".to_string());
                }
                application.phone = value;
            }
            "gpa" => match parse_gpa(&value) {
                Ok(gpa) => application.gpa = gpa,
                Err(message) => errors.push(format!("Invalid GPA: {}", message)),
            },
            "graduation_year" => match parse_graduation_year(&value, current_year) {
                Ok(year) => application.graduation_year = year,
                Err(message) => errors.push(format!("Invalid graduation year: {}", message)),
            },
            "academic_level" if !value.is_empty() => match value.parse::<AcademicLevel>() {
                Ok(level) => application.academic_level = Some(level),
                Err(message) => errors.push(message),
            },
            _ => {
                application.set_value(column, &value);
            }
        }
    }

    ParsedApplication {
        row_number: row.row_number,
        errors,
        application,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_import::parse_csv;

    const YEAR: i32 = 2026;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        CsvRow {
            row_number: 2,
            values: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn sample_bad_row_has_exactly_two_errors() {
        let parsed = transform_row(
            &row(&[
                ("scholarship_id", "s1"),
                ("first_name", ""),
                ("last_name", "Doe"),
                ("email", "bad-email"),
                ("school", "X"),
                ("major", "Y"),
            ]),
            YEAR,
        );
        assert_eq!(
            parsed.errors,
            ["Missing required field: first_name", "Invalid email format"]
        );
    }

    #[test]
    fn valid_row_becomes_submitted_application() {
        let rows = parse_csv(
            "Scholarship ID,First Name,Last Name,Email,School,Major,GPA,Grad Year,Level,Zip Code\n\
             s1,Ada,Lovelace,ADA@Example.com,Cambridge,Maths,3.9,2027,Undergraduate,02139\n",
        )
        .unwrap();
        let parsed = transform_row(&rows[0], YEAR);
        assert!(parsed.is_valid(), "{:?}", parsed.errors);
        let app = parsed.into_application();
        assert_eq!(app.scholarship_id, "s1");
        assert_eq!(app.email, "ada@example.com");
        assert_eq!(app.gpa, Some(3.9));
        assert_eq!(app.graduation_year, Some(2027));
        assert_eq!(app.academic_level, Some(AcademicLevel::Undergraduate));
        assert_eq!(app.zip, "02139");
        assert_eq!(app.status, ApplicationStatus::Submitted);
        assert_eq!(app.applicant_id, None);
    }

    #[test]
    fn range_and_enum_errors_accumulate() {
        let parsed = transform_row(
            &row(&[
                ("scholarship_id", "s1"),
                ("first_name", "A"),
                ("last_name", "B"),
                ("email", "a@b.com"),
                ("school", "X"),
                ("major", "Y"),
                ("gpa", "4.01"),
                ("graduation_year", "2040"),
                ("academic_level", "kindergarten"),
            ]),
            YEAR,
        );
        assert_eq!(parsed.errors.len(), 3, "{:?}", parsed.errors);
        assert!(parsed.errors[0].starts_with("Invalid graduation year"));
        assert!(parsed.errors[1].starts_with("Invalid GPA"));
        assert!(parsed.errors[2].contains("kindergarten"));
    }

    #[test]
    fn unknown_headers_are_ignored() {
        assert_eq!(canonical_column("favourite_colour"), None);
        assert_eq!(canonical_column("dob"), Some("date_of_birth"));
        for header in CSV_HEADERS {
            assert_eq!(canonical_column(header), Some(header));
        }
    }
}
