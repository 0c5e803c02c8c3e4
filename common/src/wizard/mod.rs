//! The multi-step application wizard.
//!
//! Steps come from the scholarship's form schema when it has one, otherwise
//! from a fixed list of standard steps (with an extra step for legacy custom
//! questions). [`Wizard`] owns the answers and gates forward navigation on the
//! current step validating; it performs no I/O, the caller loads and saves
//! drafts through the API.

pub mod validation;

use crate::model::application::{
    Application, ApplicationStatus, FormValues, ACADEMIC_FIELDS, ADDITIONAL_FIELDS, ESSAY_FIELDS,
    PERSONAL_FIELDS, is_standard_field,
};
use crate::model::scholarship::Scholarship;
use crate::schema::{catalog, CustomField, FormField, FormSchema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validation::{validate_custom_field, validate_standard_field, validate_standard_value, FieldErrors};

pub const REVIEW_STEP_ID: &str = "review";
pub const CUSTOM_STEP_ID: &str = "custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// One of the fixed steps over standard columns.
    Standard,
    /// A schema section.
    Section,
    /// Legacy custom questions.
    Custom,
    Review,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardStep {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Field names (standard steps) or field ids (section and custom steps).
    pub fields: Vec<String>,
    pub kind: StepKind,
}

impl WizardStep {
    fn standard(id: &str, title: &str, fields: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            kind: StepKind::Standard,
        }
    }

    fn review() -> Self {
        Self {
            id: REVIEW_STEP_ID.to_string(),
            title: "Review & Submit".to_string(),
            description: Some("Check your answers before submitting".to_string()),
            fields: Vec::new(),
            kind: StepKind::Review,
        }
    }

    pub fn is_review(&self) -> bool {
        self.kind == StepKind::Review
    }
}

fn hardcoded_steps() -> Vec<WizardStep> {
    vec![
        WizardStep::standard("personal", "Personal Information", PERSONAL_FIELDS),
        WizardStep::standard("academic", "Academic Information", ACADEMIC_FIELDS),
        WizardStep::standard("essays", "Essays", ESSAY_FIELDS),
        WizardStep::standard("additional", "Additional Information", ADDITIONAL_FIELDS),
        WizardStep::review(),
    ]
}

/// Derives the ordered steps for a scholarship.
///
/// A schema always wins, even an empty one (which yields only the review
/// step). Legacy custom fields splice a `custom` step in front of the last
/// hardcoded step.
pub fn derive_steps(form_schema: Option<&FormSchema>, custom_fields: Option<&[CustomField]>) -> Vec<WizardStep> {
    if let Some(schema) = form_schema {
        let mut steps: Vec<WizardStep> = schema
            .ordered_sections()
            .into_iter()
            .map(|section| {
                let mut fields: Vec<&FormField> = section.fields.iter().collect();
                fields.sort_by_key(|f| f.order);
                WizardStep {
                    id: section.id.clone(),
                    title: section.title.clone(),
                    description: (!section.description.is_empty()).then(|| section.description.clone()),
                    fields: fields.into_iter().map(|f| f.id.clone()).collect(),
                    kind: StepKind::Section,
                }
            })
            .collect();
        steps.push(WizardStep::review());
        return steps;
    }

    let mut steps = hardcoded_steps();
    if let Some(custom) = custom_fields.filter(|c| !c.is_empty()) {
        let step = WizardStep {
            id: CUSTOM_STEP_ID.to_string(),
            title: "Additional Questions".to_string(),
            description: None,
            fields: custom.iter().map(|f| f.id.clone()).collect(),
            kind: StepKind::Custom,
        };
        let at = steps.len() - 1;
        steps.insert(at, step);
    }
    steps
}

/// Wizard state for one applicant filling one scholarship's form.
#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    steps: Vec<WizardStep>,
    current: usize,
    definitions: HashMap<String, FormField>,
    values: FormValues,
    application: Application,
    errors: FieldErrors,
    current_year: i32,
}

impl Wizard {
    pub fn for_scholarship(scholarship: &Scholarship, applicant_id: Option<String>) -> Self {
        let mut definitions: HashMap<String, FormField> = HashMap::new();
        if let Some(schema) = &scholarship.form_schema {
            definitions.extend(schema.fields().map(|f| (f.id.clone(), f.clone())));
        } else {
            definitions.extend(scholarship.legacy_fields().iter().map(|f| (f.id.clone(), f.clone())));
        }

        let mut application = Application::new(scholarship.id.clone());
        application.applicant_id = applicant_id;

        Self {
            steps: scholarship.wizard_steps(),
            current: 0,
            definitions,
            values: FormValues::new(),
            application,
            errors: FieldErrors::new(),
            current_year: validation::current_year(),
        }
    }

    /// Pins the year used for graduation year checks.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Merges a saved draft into the wizard. The scholarship id stays the
    /// wizard's own; the draft's applicant id is kept only when the wizard has
    /// none.
    pub fn load_draft(&mut self, draft: Application) {
        self.values.extend(draft.form_values());
        let scholarship_id = std::mem::take(&mut self.application.scholarship_id);
        let applicant_id = self.application.applicant_id.take().or(draft.applicant_id.clone());
        self.application = Application {
            scholarship_id,
            applicant_id,
            ..draft
        };
    }

    /// Whether the application already has a stored record.
    pub fn is_saved(&self) -> bool {
        self.application.id.is_some()
    }

    /// Takes the id of a record created for this wizard, keeping the values
    /// entered since the request went out.
    pub fn adopt_id(&mut self, saved: &Application) {
        if self.application.id.is_none() {
            self.application.id = saved.id.clone();
        }
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&WizardStep> {
        self.steps.get(self.current)
    }

    pub fn is_first_step(&self) -> bool {
        self.current == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    /// Percentage of steps reached, counting the current one.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        (self.current + 1) as f64 / self.steps.len() as f64 * 100.0
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> String {
        self.values.get(field).cloned().unwrap_or_default()
    }

    /// Records an answer and clears any error shown for that field.
    pub fn set_value(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        self.errors.remove(&field);
        self.values.insert(field, value.into());
    }

    /// Definition used to render a field: the schema's or legacy one when
    /// known, else the catalog entry for a standard column.
    pub fn field_definition(&self, field: &str) -> Option<FormField> {
        self.definitions
            .get(field)
            .cloned()
            .or_else(|| catalog::standard_field(field))
    }

    /// Every renderable field of a step, in step order.
    pub fn step_fields(&self, index: usize) -> Vec<FormField> {
        self.steps
            .get(index)
            .map(|step| step.fields.iter().filter_map(|f| self.field_definition(f)).collect())
            .unwrap_or_default()
    }

    fn validate_field(&self, kind: StepKind, field: &str) -> Option<String> {
        let value = self.value(field);
        match (kind, self.definitions.get(field)) {
            (StepKind::Review, _) => None,
            (StepKind::Standard, _) | (_, None) => validate_standard_field(field, &value, self.current_year),
            (_, Some(definition)) if is_standard_field(field) => {
                validate_standard_value(field, &value, definition.required, self.current_year)
                    .or_else(|| validate_custom_field(definition, &value))
            }
            (_, Some(definition)) => validate_custom_field(definition, &value),
        }
    }

    /// Validates the current step, replacing the visible errors with its
    /// failures. Returns whether the step is valid.
    pub fn validate_step(&mut self) -> bool {
        let Some(step) = self.steps.get(self.current) else {
            return true;
        };
        let errors: FieldErrors = step
            .fields
            .iter()
            .filter_map(|field| self.validate_field(step.kind, field).map(|e| (field.clone(), e)))
            .collect();
        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }

    /// Advances one step when the current step validates.
    pub fn next_step(&mut self) -> bool {
        if !self.validate_step() {
            return false;
        }
        if self.is_last_step() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Goes back one step without validating.
    pub fn prev_step(&mut self) {
        self.errors.clear();
        self.current = self.current.saturating_sub(1);
    }

    /// Jumps to any step in range. Steps in between are not validated.
    pub fn go_to_step(&mut self, index: usize) -> bool {
        if index >= self.steps.len() {
            return false;
        }
        self.errors.clear();
        self.current = index;
        true
    }

    /// The application record as it should be saved in its current state.
    pub fn to_application(&self) -> Application {
        let mut application = self.application.clone();
        application.apply_form_values(&self.values, &self.definitions);
        application
    }

    /// The record to send on final submission. The server stamps `submitted_at`.
    pub fn submission(&self) -> Application {
        let mut application = self.to_application();
        application.status = ApplicationStatus::Submitted;
        application
    }

    /// Draft payload: submitted applications stay submitted when re-saved.
    pub fn draft(&self) -> Application {
        let mut application = self.to_application();
        if application.status != ApplicationStatus::Submitted {
            application.status = ApplicationStatus::Draft;
        }
        application
    }
}
