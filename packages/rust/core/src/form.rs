//! Per-step form schemas and submission checks.
//!
//! Each wizard step exposes a [`StepForm`]: the assistant prompt, the fields
//! to render (pre-filled from the current profile), and the log text the
//! conversation records when the form is submitted. [`StepForm::validate`]
//! is the only gate between raw input and the profile; it blocks submission
//! with a [`FieldError`] the UI shows inline.

use std::collections::BTreeMap;

use serde::Serialize;

use taxcompanion_shared::{
    Choice, FieldName, FieldValue, Profile, ProfilePatch, Step, TaxCompanionError,
};

use crate::catalog::{self, BOOKKEEPING_TOOLS, BUSINESS_TYPES, COUNTRIES, ChoiceOption};

/// How a field is rendered and coerced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    /// Single choice from a fixed list.
    Select { options: &'static [ChoiceOption] },
    /// Free text, submitted verbatim.
    Text,
    /// Numeric text with an optional lower bound.
    Number { min: Option<i64> },
}

/// Declaration of one form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: FieldName,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Value carried over from the profile, if the field was answered before.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefill: Option<FieldValue>,
}

/// Everything needed to render and submit one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepForm {
    pub step: Step,
    /// What the assistant says when the step is shown.
    pub prompt: &'static str,
    pub fields: Vec<FieldSchema>,
    pub submit_label: &'static str,
    /// Transcript entry recorded on submit, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_text: Option<&'static str>,
    pub can_go_back: bool,
}

/// Raw values keyed by field, as collected by a UI.
pub type FormValues = BTreeMap<FieldName, FieldValue>;

/// Why a submission was blocked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{label} is required")]
    Required { field: FieldName, label: &'static str },

    #[error("'{given}' is not an option for {label}")]
    UnknownOption {
        field: FieldName,
        label: &'static str,
        given: String,
    },

    #[error("{label} must be a number, got '{given}'")]
    NotANumber {
        field: FieldName,
        label: &'static str,
        given: String,
    },

    #[error("{label} must be at least {min}")]
    BelowMinimum {
        field: FieldName,
        label: &'static str,
        min: i64,
    },
}

impl FieldError {
    /// The field the message should be shown next to.
    pub fn field(&self) -> FieldName {
        match self {
            FieldError::Required { field, .. }
            | FieldError::UnknownOption { field, .. }
            | FieldError::NotANumber { field, .. }
            | FieldError::BelowMinimum { field, .. } => *field,
        }
    }
}

impl From<FieldError> for TaxCompanionError {
    fn from(err: FieldError) -> Self {
        TaxCompanionError::validation(err.to_string())
    }
}

/// Build the form for `step`, pre-filling from `profile`.
pub fn step_form(step: Step, profile: &Profile) -> StepForm {
    let field = |name: FieldName,
                 label: &'static str,
                 placeholder: &'static str,
                 kind: FieldKind,
                 required: bool| FieldSchema {
        name,
        label,
        placeholder,
        kind,
        required,
        prefill: profile.get(name),
    };

    match step {
        Step::Intro => StepForm {
            step,
            prompt: "I’ll ask a few short questions about your business. It usually takes \
                     under 3 minutes. You can adjust answers later; nothing is permanently \
                     stored here.",
            fields: Vec::new(),
            submit_label: "Let’s get started",
            log_text: None,
            can_go_back: false,
        },
        Step::BusinessBasics => StepForm {
            step,
            prompt: "First, a bit about your business setup. This helps determine which tax \
                     rules usually apply.",
            fields: vec![
                field(
                    FieldName::Country,
                    "Where is your business primarily registered for tax?",
                    "Select country/region",
                    FieldKind::Select { options: COUNTRIES },
                    true,
                ),
                field(
                    FieldName::BusinessType,
                    "What type of business structure do you use?",
                    "Select structure",
                    FieldKind::Select {
                        options: BUSINESS_TYPES,
                    },
                    true,
                ),
            ],
            submit_label: "Continue",
            log_text: Some("Shared business basics"),
            can_go_back: false,
        },
        Step::Financials => StepForm {
            step,
            prompt: "Next, we’ll capture rough revenue and expenses for the tax year. You can \
                     use your best estimate if you don’t have final numbers yet.",
            fields: vec![
                field(
                    FieldName::AnnualRevenue,
                    "Approximate annual revenue",
                    "e.g. 25,000,000 NGN or 300,000 USD",
                    FieldKind::Text,
                    false,
                ),
                field(
                    FieldName::AnnualExpenses,
                    "Approximate deductible business expenses",
                    "e.g. 10,000,000 NGN or 120,000 USD",
                    FieldKind::Text,
                    false,
                ),
            ],
            submit_label: "Continue",
            log_text: Some("Shared financial overview"),
            can_go_back: true,
        },
        Step::Team => StepForm {
            step,
            prompt: "A few quick questions about your team. This affects payroll taxes, \
                     benefits, and withholdings.",
            fields: vec![field(
                FieldName::Employees,
                "How many people (including you) work in the business?",
                "e.g. 1, 5, 25",
                FieldKind::Number { min: Some(0) },
                false,
            )],
            submit_label: "Continue",
            log_text: Some("Shared team info"),
            can_go_back: true,
        },
        Step::Tools => StepForm {
            step,
            prompt: "Finally, tell me how you track your income and expenses. I’ll turn this \
                     into a quick checklist you can use before filing.",
            fields: vec![field(
                FieldName::BookkeepingTool,
                "What do you primarily use for bookkeeping?",
                "Select a tool",
                FieldKind::Select {
                    options: BOOKKEEPING_TOOLS,
                },
                false,
            )],
            submit_label: "See my checklist",
            log_text: Some("Shared bookkeeping tools"),
            can_go_back: true,
        },
        Step::Summary => StepForm {
            step,
            prompt: "Here’s a summary you can share with your accountant or keep next to you \
                     while using an online tax portal.",
            fields: Vec::new(),
            submit_label: "Start over or adjust answers",
            log_text: None,
            can_go_back: false,
        },
    }
}

impl StepForm {
    /// Check `values` against the schema and turn them into a profile patch.
    ///
    /// Fields missing from `values` are left out of the patch, so earlier
    /// answers survive. Values for fields this step does not declare are ignored.
    pub fn validate(&self, values: &FormValues) -> Result<ProfilePatch, FieldError> {
        let mut patch = ProfilePatch::default();

        for schema in &self.fields {
            let value = values.get(&schema.name);
            let blank = value.is_none_or(|v| v.display().trim().is_empty());

            if schema.required && blank {
                return Err(FieldError::Required {
                    field: schema.name,
                    label: schema.label,
                });
            }

            let Some(value) = value else { continue };
            let value = match &schema.kind {
                FieldKind::Select { options } => {
                    if blank {
                        continue;
                    }
                    FieldValue::Choice(resolve_option(schema, options, value)?)
                }
                FieldKind::Text => value.clone(),
                FieldKind::Number { min } => {
                    let text = value.display().trim().to_string();
                    if !text.is_empty() {
                        check_number(schema, &text, *min)?;
                    }
                    FieldValue::Text(text)
                }
            };
            patch.set(schema.name, value);
        }

        Ok(patch)
    }

    /// Look up a declared field.
    pub fn field(&self, name: FieldName) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn resolve_option(
    schema: &FieldSchema,
    options: &[ChoiceOption],
    value: &FieldValue,
) -> Result<Choice, FieldError> {
    let found = match value {
        FieldValue::Choice(choice) if catalog::contains(options, choice) => {
            return Ok(choice.clone());
        }
        FieldValue::Choice(choice) => catalog::find(options, &choice.value),
        FieldValue::Text(text) => catalog::find(options, text),
    };

    found
        .map(ChoiceOption::to_choice)
        .ok_or_else(|| FieldError::UnknownOption {
            field: schema.name,
            label: schema.label,
            given: value.display().to_string(),
        })
}

fn check_number(schema: &FieldSchema, text: &str, min: Option<i64>) -> Result<(), FieldError> {
    let n = text
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FieldError::NotANumber {
            field: schema.name,
            label: schema.label,
            given: text.to_string(),
        })?;

    match min {
        Some(min) if n < min as f64 => Err(FieldError::BelowMinimum {
            field: schema.name,
            label: schema.label,
            min,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(FieldName, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(name, v)| (*name, FieldValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn every_step_has_a_form() {
        let profile = Profile::default();
        let field_counts: Vec<usize> = Step::ALL
            .iter()
            .map(|s| step_form(*s, &profile).fields.len())
            .collect();
        assert_eq!(field_counts, vec![0, 2, 2, 1, 1, 0]);
    }

    #[test]
    fn log_text_only_on_form_steps() {
        let profile = Profile::default();
        assert_eq!(step_form(Step::Intro, &profile).log_text, None);
        assert_eq!(step_form(Step::Summary, &profile).log_text, None);
        assert_eq!(
            step_form(Step::Tools, &profile).log_text,
            Some("Shared bookkeeping tools")
        );
    }

    #[test]
    fn intro_and_summary_labels() {
        let profile = Profile::default();
        assert_eq!(step_form(Step::Intro, &profile).submit_label, "Let’s get started");
        assert_eq!(
            step_form(Step::Summary, &profile).submit_label,
            "Start over or adjust answers"
        );
    }

    #[test]
    fn basics_require_both_selects() {
        let form = step_form(Step::BusinessBasics, &Profile::default());
        let err = form
            .validate(&values(&[(FieldName::Country, "ng")]))
            .unwrap_err();
        assert_eq!(err.field(), FieldName::BusinessType);
        assert!(err.to_string().ends_with("is required"));

        let err = form
            .validate(&values(&[(FieldName::Country, " "), (FieldName::BusinessType, "llc")]))
            .unwrap_err();
        assert_eq!(err.field(), FieldName::Country);
    }

    #[test]
    fn selects_resolve_to_catalog_choices() {
        let form = step_form(Step::BusinessBasics, &Profile::default());
        let patch = form
            .validate(&values(&[
                (FieldName::Country, "Nigeria"),
                (FieldName::BusinessType, "sole"),
            ]))
            .expect("valid");
        assert_eq!(patch.country, Some(Choice::new("Nigeria", "ng")));
        assert_eq!(
            patch.business_type,
            Some(Choice::new("Sole proprietor / freelancer", "sole"))
        );
    }

    #[test]
    fn unknown_option_is_rejected() {
        let form = step_form(Step::Tools, &Profile::default());
        let err = form
            .validate(&values(&[(FieldName::BookkeepingTool, "ledgerly")]))
            .unwrap_err();
        assert!(matches!(err, FieldError::UnknownOption { .. }));
    }

    #[test]
    fn optional_select_may_be_left_empty() {
        let form = step_form(Step::Tools, &Profile::default());
        let patch = form.validate(&FormValues::new()).expect("valid");
        assert!(patch.is_empty());
    }

    #[test]
    fn team_size_must_be_non_negative_number() {
        let form = step_form(Step::Team, &Profile::default());
        assert!(matches!(
            form.validate(&values(&[(FieldName::Employees, "-2")])),
            Err(FieldError::BelowMinimum { min: 0, .. })
        ));
        assert!(matches!(
            form.validate(&values(&[(FieldName::Employees, "a few")])),
            Err(FieldError::NotANumber { .. })
        ));
        for non_finite in ["NaN", "inf", "infinity", "-inf"] {
            assert!(
                matches!(
                    form.validate(&values(&[(FieldName::Employees, non_finite)])),
                    Err(FieldError::NotANumber { .. })
                ),
                "{non_finite} should be rejected"
            );
        }
        let patch = form
            .validate(&values(&[(FieldName::Employees, " 7 ")]))
            .expect("valid");
        assert_eq!(patch.employees.as_deref(), Some("7"));
    }

    #[test]
    fn text_fields_pass_through_verbatim() {
        let form = step_form(Step::Financials, &Profile::default());
        let patch = form
            .validate(&values(&[
                (FieldName::AnnualRevenue, "300,000 USD"),
                (FieldName::AnnualExpenses, ""),
            ]))
            .expect("valid");
        assert_eq!(patch.annual_revenue.as_deref(), Some("300,000 USD"));
        assert_eq!(patch.annual_expenses.as_deref(), Some(""));
    }

    #[test]
    fn prefill_comes_from_profile() {
        let profile = Profile {
            annual_revenue: Some("9 USD".into()),
            ..Profile::default()
        };
        let form = step_form(Step::Financials, &profile);
        assert_eq!(
            form.field(FieldName::AnnualRevenue).and_then(|f| f.prefill.clone()),
            Some(FieldValue::Text("9 USD".into()))
        );
        assert_eq!(
            form.field(FieldName::AnnualExpenses).and_then(|f| f.prefill.clone()),
            None
        );
    }

    #[test]
    fn schema_serializes_for_external_renderers() {
        let form = step_form(Step::Team, &Profile::default());
        let json = serde_json::to_value(&form).expect("serialize");
        assert_eq!(json["step"], "team");
        assert_eq!(json["fields"][0]["name"], "employees");
        assert_eq!(json["fields"][0]["kind"]["type"], "number");
        assert_eq!(json["fields"][0]["kind"]["min"], 0);
    }

    #[test]
    fn field_error_converts_to_validation_error() {
        let err: TaxCompanionError = FieldError::Required {
            field: FieldName::Country,
            label: "Country",
        }
        .into();
        assert_eq!(err.to_string(), "validation error: Country is required");
    }
}
