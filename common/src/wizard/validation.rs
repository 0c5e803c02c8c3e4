//! Field validators for the application wizard and the CSV import.
//!
//! Two validators run side by side:
//! - [`validate_standard_field`] knows the standard application columns by
//!   name and applies their fixed rules. It serves the hardcoded steps.
//! - [`validate_custom_field`] reads a field's own metadata. It serves schema
//!   sections and legacy custom steps.
//!
//! Both check `required` first; an empty optional value is always valid.

use crate::model::application::AcademicLevel;
use crate::schema::{catalog, FieldType, FormField};
use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").unwrap());

/// How far graduation years may stray from the current year.
pub const GRADUATION_YEAR_WINDOW: i32 = 10;
pub const GPA_MIN: f64 = 0.0;
pub const GPA_MAX: f64 = 4.0;

/// Per-field error messages keyed by field name or id.
pub type FieldErrors = BTreeMap<String, String>;

pub fn current_year() -> i32 {
    Utc::now().year()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Spaces, dashes, dots and parentheses are ignored.
pub fn is_valid_phone(value: &str) -> bool {
    let digits: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    PHONE_RE.is_match(&digits)
}

pub fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok()
}

/// Parses a GPA. Empty input is `Ok(None)`.
pub fn parse_gpa(value: &str) -> Result<Option<f64>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let gpa: f64 = value.parse().map_err(|_| "GPA must be a number".to_string())?;
    if !(GPA_MIN..=GPA_MAX).contains(&gpa) {
        return Err(format!("GPA must be between {:.1} and {:.1}", GPA_MIN, GPA_MAX));
    }
    Ok(Some(gpa))
}

/// Parses a graduation year within `current_year ± 10`. Empty input is `Ok(None)`.
pub fn parse_graduation_year(value: &str, current_year: i32) -> Result<Option<i32>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let year: i32 = value
        .parse()
        .map_err(|_| "Graduation year must be a whole number".to_string())?;
    let earliest = current_year - GRADUATION_YEAR_WINDOW;
    let latest = current_year + GRADUATION_YEAR_WINDOW;
    if !(earliest..=latest).contains(&year) {
        return Err(format!("Graduation year must be between {} and {}", earliest, latest));
    }
    Ok(Some(year))
}

fn minimum_length(name: &str) -> Option<usize> {
    match name {
        "career_goals" => Some(50),
        "financial_need" | "community_involvement" | "why_deserve_scholarship" => Some(25),
        _ => None,
    }
}

fn is_empty(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validates a standard column by name.
pub fn validate_standard_field(name: &str, value: &str, current_year: i32) -> Option<String> {
    let required = catalog::standard_field(name).is_some_and(|f| f.required);
    validate_standard_value(name, value, required, current_year)
}

/// Validates a standard column by name with an explicit `required` flag.
pub fn validate_standard_value(name: &str, value: &str, required: bool, current_year: i32) -> Option<String> {
    if is_empty(value) {
        return required.then(|| format!("{} is required", display_name(name)));
    }

    match name {
        "email" if !is_valid_email(value) => Some("Please enter a valid email address".to_string()),
        "phone" if !is_valid_phone(value) => Some("Please enter a valid phone number".to_string()),
        "gpa" => parse_gpa(value).err(),
        "graduation_year" => parse_graduation_year(value, current_year).err(),
        "date_of_birth" if !is_valid_date(value) => Some("Please enter a valid date".to_string()),
        "academic_level" => value.parse::<AcademicLevel>().err(),
        _ => minimum_length(name).and_then(|min| {
            (value.trim().chars().count() < min)
                .then(|| format!("{} must be at least {} characters", display_name(name), min))
        }),
    }
}

/// Validates an answer against a field definition.
pub fn validate_custom_field(field: &FormField, value: &str) -> Option<String> {
    let empty = match field.field_type {
        FieldType::Checkbox => value != "true",
        _ => is_empty(value),
    };
    if empty {
        return field.required.then(|| format!("{} is required", field.label));
    }

    let rules = field.validation.clone().unwrap_or_default();
    let value = value.trim();

    match field.field_type {
        FieldType::Text | FieldType::Textarea => {
            let len = value.chars().count();
            if let Some(min) = rules.min_length.filter(|min| len < *min) {
                return Some(format!("{} must be at least {} characters", field.label, min));
            }
            if let Some(max) = rules.max_length.filter(|max| len > *max) {
                return Some(format!("{} must be at most {} characters", field.label, max));
            }
            if let Some(pattern) = &rules.pattern {
                match Regex::new(pattern) {
                    Ok(re) if !re.is_match(value) => return Some(format!("{} has an invalid format", field.label)),
                    Ok(_) => {}
                    Err(_) => return Some(format!("{} cannot be checked: invalid pattern", field.label)),
                }
            }
            None
        }
        FieldType::Number => {
            let Ok(number) = value.parse::<f64>() else {
                return Some(format!("{} must be a number", field.label));
            };
            if let Some(min) = rules.min.filter(|min| number < *min) {
                return Some(format!("{} must be at least {}", field.label, min));
            }
            if let Some(max) = rules.max.filter(|max| number > *max) {
                return Some(format!("{} must be at most {}", field.label, max));
            }
            None
        }
        FieldType::Email => (!is_valid_email(value)).then(|| "Please enter a valid email address".to_string()),
        FieldType::Phone => (!is_valid_phone(value)).then(|| "Please enter a valid phone number".to_string()),
        FieldType::Date => (!is_valid_date(value)).then(|| "Please enter a valid date".to_string()),
        FieldType::Select => {
            let known = field
                .options
                .as_ref()
                .is_some_and(|options| options.iter().any(|o| o == value));
            (!known).then(|| format!("Please choose one of the options for {}", field.label))
        }
        FieldType::Checkbox => None,
        FieldType::File => {
            let formats = field.accepted_formats.as_deref().unwrap_or_default();
            let extension = value.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
            let accepted = formats.is_empty()
                || extension.is_some_and(|ext| formats.iter().any(|f| f.trim_start_matches('.').eq_ignore_ascii_case(&ext)));
            (!accepted).then(|| format!("Accepted formats: {}", formats.join(", ")))
        }
    }
}

/// Validates every given field, returning only the failures.
pub fn validate_custom_fields<'a>(
    fields: impl IntoIterator<Item = &'a FormField>,
    value_of: impl Fn(&str) -> String,
) -> FieldErrors {
    fields
        .into_iter()
        .filter_map(|field| validate_custom_field(field, &value_of(&field.id)).map(|error| (field.id.clone(), error)))
        .collect()
}

fn display_name(name: &str) -> String {
    catalog::standard_field(name)
        .map(|f| f.label)
        .unwrap_or_else(|| name.replace('_', " "))
}
