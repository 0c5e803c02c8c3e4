use crate::schema::{FieldType, FormField};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Columns of the personal information step, in display order.
pub const PERSONAL_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "phone",
    "date_of_birth",
    "address",
    "city",
    "state",
    "zip",
];

pub const ACADEMIC_FIELDS: &[&str] = &["school", "graduation_year", "gpa", "major", "academic_level"];

pub const ESSAY_FIELDS: &[&str] = &[
    "career_goals",
    "financial_need",
    "community_involvement",
    "why_deserve_scholarship",
];

pub const ADDITIONAL_FIELDS: &[&str] = &["work_experience", "extracurricular_activities", "awards_and_honors"];

/// Every applicant-answered column of the flat application record.
pub const STANDARD_FIELDS: &[&str] = &[
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

pub fn is_standard_field(name: &str) -> bool {
    STANDARD_FIELDS.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcademicLevel {
    HighSchool,
    Undergraduate,
    Graduate,
    Doctoral,
}

impl AcademicLevel {
    pub const ALL: [AcademicLevel; 4] = [
        AcademicLevel::HighSchool,
        AcademicLevel::Undergraduate,
        AcademicLevel::Graduate,
        AcademicLevel::Doctoral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicLevel::HighSchool => "high_school",
            AcademicLevel::Undergraduate => "undergraduate",
            AcademicLevel::Graduate => "graduate",
            AcademicLevel::Doctoral => "doctoral",
        }
    }
}

impl FromStr for AcademicLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        AcademicLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| format!("Invalid academic level '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Awarded,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Draft,
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Awarded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Awarded => "awarded",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "Draft",
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Awarded => "Awarded",
        }
    }

    /// Whether the applicant may still overwrite the row through a draft save
    /// or a submission.
    pub fn is_applicant_editable(&self) -> bool {
        matches!(self, ApplicationStatus::Draft | ApplicationStatus::Submitted)
    }

    /// Admin review transitions. Awarding and removing an award go through
    /// their own operations since they also carry amount and date.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Submitted, UnderReview)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (Approved, Awarded)
                | (Awarded, Approved)
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown application status '{}'", s))
    }
}

/// The flat application record as stored and exchanged over the API.
///
/// Text columns default to empty strings; a draft may be persisted with any
/// subset filled. Answers to schema fields that are not standard columns live
/// in `custom_responses` keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub scholarship_id: String,
    #[serde(default)]
    pub applicant_id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub academic_level: Option<AcademicLevel>,
    #[serde(default)]
    pub career_goals: String,
    #[serde(default)]
    pub financial_need: String,
    #[serde(default)]
    pub community_involvement: String,
    #[serde(default)]
    pub why_deserve_scholarship: String,
    #[serde(default)]
    pub work_experience: String,
    #[serde(default)]
    pub extracurricular_activities: String,
    #[serde(default)]
    pub awards_and_honors: String,
    #[serde(default)]
    pub custom_responses: BTreeMap<String, Value>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub awarded_amount: Option<f64>,
    #[serde(default)]
    pub awarded_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Raw string answers keyed by field name or custom field id, as edited in forms.
pub type FormValues = BTreeMap<String, String>;

impl Application {
    pub fn new(scholarship_id: impl Into<String>) -> Self {
        Self {
            scholarship_id: scholarship_id.into(),
            ..Default::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    fn text(&self, name: &str) -> Option<&str> {
        let column = match name {
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "zip" => &self.zip,
            "date_of_birth" => &self.date_of_birth,
            "school" => &self.school,
            "major" => &self.major,
            "career_goals" => &self.career_goals,
            "financial_need" => &self.financial_need,
            "community_involvement" => &self.community_involvement,
            "why_deserve_scholarship" => &self.why_deserve_scholarship,
            "work_experience" => &self.work_experience,
            "extracurricular_activities" => &self.extracurricular_activities,
            "awards_and_honors" => &self.awards_and_honors,
            _ => return None,
        };
        Some(column.as_str())
    }

    fn text_mut(&mut self, name: &str) -> Option<&mut String> {
        let column = match name {
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "zip" => &mut self.zip,
            "date_of_birth" => &mut self.date_of_birth,
            "school" => &mut self.school,
            "major" => &mut self.major,
            "career_goals" => &mut self.career_goals,
            "financial_need" => &mut self.financial_need,
            "community_involvement" => &mut self.community_involvement,
            "why_deserve_scholarship" => &mut self.why_deserve_scholarship,
            "work_experience" => &mut self.work_experience,
            "extracurricular_activities" => &mut self.extracurricular_activities,
            "awards_and_honors" => &mut self.awards_and_honors,
            _ => return None,
        };
        Some(column)
    }

    /// Current value of a standard column rendered as a form string, or `None`
    /// for names that are not standard columns.
    pub fn value(&self, name: &str) -> Option<String> {
        match name {
            "graduation_year" => Some(self.graduation_year.map(|y| y.to_string()).unwrap_or_default()),
            "gpa" => Some(self.gpa.map(|g| g.to_string()).unwrap_or_default()),
            "academic_level" => Some(
                self.academic_level
                    .map(|l| l.as_str().to_string())
                    .unwrap_or_default(),
            ),
            _ => self.text(name).map(str::to_string),
        }
    }

    /// Writes a raw form string into a standard column. Numeric and enum
    /// columns keep `None` when the input does not parse. Returns `false` when
    /// `name` is not a standard column.
    pub fn set_value(&mut self, name: &str, raw: &str) -> bool {
        match name {
            "graduation_year" => self.graduation_year = raw.trim().parse().ok(),
            "gpa" => self.gpa = raw.trim().parse().ok(),
            "academic_level" => self.academic_level = raw.parse().ok(),
            _ => match self.text_mut(name) {
                Some(column) => *column = raw.trim().to_string(),
                None => return false,
            },
        }
        true
    }

    /// Every standard column plus every custom response as form strings.
    pub fn form_values(&self) -> FormValues {
        let mut values: FormValues = STANDARD_FIELDS
            .iter()
            .filter_map(|name| self.value(name).map(|v| (name.to_string(), v)))
            .collect();
        for (id, value) in &self.custom_responses {
            values.insert(id.clone(), response_to_string(value));
        }
        values
    }

    /// Folds form strings back into the record. Non-standard keys become
    /// custom responses, typed after their field definition when one is known.
    pub fn apply_form_values(&mut self, values: &FormValues, definitions: &HashMap<String, FormField>) {
        for (name, raw) in values {
            if self.set_value(name, raw) {
                continue;
            }
            let value = match definitions.get(name).map(|f| f.field_type) {
                Some(FieldType::Checkbox) => Value::Bool(raw == "true"),
                Some(FieldType::Number) => raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(raw.clone())),
                _ => Value::String(raw.clone()),
            };
            self.custom_responses.insert(name.clone(), value);
        }
    }
}

fn response_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
