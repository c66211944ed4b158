//! Non-interactive answers.
//!
//! An [`Answers`] set (usually a small TOML file plus command-line overrides)
//! drives a [`Conversation`] from `intro` to `summary` through the same form
//! checks an interactive session uses.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use taxcompanion_shared::{FieldName, FieldValue, Result, Step, TaxCompanionError};

use crate::conversation::Conversation;
use crate::form::FormValues;

/// Answers for every wizard field. Select fields take an option value
/// (`ng`) or label (`Nigeria`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Answers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_expenses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookkeeping_tool: Option<String>,
}

impl Answers {
    /// Parse answers from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TaxCompanionError::parse(format!("invalid answers: {e}")))
    }

    /// Load answers from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TaxCompanionError::io(path, e))?;
        toml::from_str(&content).map_err(|e| {
            TaxCompanionError::parse(format!("invalid answers in {}: {e}", path.display()))
        })
    }

    /// Fields set in `other` replace ours.
    pub fn overlay(self, other: Answers) -> Answers {
        Answers {
            country: other.country.or(self.country),
            business_type: other.business_type.or(self.business_type),
            annual_revenue: other.annual_revenue.or(self.annual_revenue),
            annual_expenses: other.annual_expenses.or(self.annual_expenses),
            employees: other.employees.or(self.employees),
            bookkeeping_tool: other.bookkeeping_tool.or(self.bookkeeping_tool),
        }
    }

    fn get(&self, field: FieldName) -> Option<&String> {
        match field {
            FieldName::Country => self.country.as_ref(),
            FieldName::BusinessType => self.business_type.as_ref(),
            FieldName::AnnualRevenue => self.annual_revenue.as_ref(),
            FieldName::AnnualExpenses => self.annual_expenses.as_ref(),
            FieldName::Employees => self.employees.as_ref(),
            FieldName::BookkeepingTool => self.bookkeeping_tool.as_ref(),
        }
    }

    /// Run a fresh conversation through every step and stop on the summary.
    #[instrument(skip_all)]
    pub fn walk(&self) -> Result<Conversation> {
        let mut conversation = Conversation::new();
        conversation.start();

        while conversation.step() != Step::Summary {
            let form = conversation.form();
            let values: FormValues = form
                .fields
                .iter()
                .filter_map(|schema| {
                    self.get(schema.name)
                        .map(|v| (schema.name, FieldValue::Text(v.clone())))
                })
                .collect();
            conversation.submit(&values)?;
        }

        info!(
            session = %conversation.id(),
            lines = conversation.summary().len(),
            "answers walked to summary"
        );
        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::DISCLAIMER_LINE;

    const FULL: &str = r#"
country = "us"
business_type = "LLC"
annual_revenue = "300,000 USD"
annual_expenses = "120,000 USD"
employees = "3"
bookkeeping_tool = "QuickBooks"
"#;

    #[test]
    fn full_walk_produces_six_lines() {
        let answers = Answers::from_toml(FULL).expect("parse");
        let conv = answers.walk().expect("walk");

        assert_eq!(conv.step(), Step::Summary);
        let lines = conv.summary();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "You are running a limited liability company based in United States."
        );
        assert!(lines[3].contains("3 people"));
        assert!(lines[4].contains("QuickBooks"));
        assert_eq!(lines[5], DISCLAIMER_LINE);
        // greeting + one entry per submitted form
        assert_eq!(conv.messages().len(), 5);
    }

    #[test]
    fn missing_required_answer_stops_the_walk() {
        let answers = Answers {
            country: Some("ng".into()),
            ..Answers::default()
        };
        let err = answers.walk().unwrap_err();
        assert!(matches!(err, TaxCompanionError::Validation { .. }));
        assert!(err.to_string().contains("business structure"));
    }

    #[test]
    fn minimal_answers_give_first_line_and_disclaimer() {
        let answers = Answers {
            country: Some("Nigeria".into()),
            business_type: Some("sole".into()),
            ..Answers::default()
        };
        let conv = answers.walk().expect("walk");
        assert_eq!(
            conv.summary(),
            &[
                "You are running a sole proprietor / freelancer based in Nigeria.",
                DISCLAIMER_LINE,
            ]
        );
    }

    #[test]
    fn overlay_prefers_later_values() {
        let file = Answers::from_toml(FULL).expect("parse");
        let flags = Answers {
            employees: Some("1".into()),
            ..Answers::default()
        };
        let merged = file.overlay(flags);
        assert_eq!(merged.employees.as_deref(), Some("1"));
        assert_eq!(merged.country.as_deref(), Some("us"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Answers::from_toml("turnover = \"1\"\n").unwrap_err();
        assert!(err.to_string().starts_with("parse error"));
    }
}
