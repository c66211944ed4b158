//! Core domain types for a Tax Companion conversation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one in-memory conversation (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new session identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One stage of the wizard. The order is fixed; there is no branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Intro,
    BusinessBasics,
    Financials,
    Team,
    Tools,
    Summary,
}

impl Step {
    /// Every step in flow order.
    pub const ALL: [Step; 6] = [
        Step::Intro,
        Step::BusinessBasics,
        Step::Financials,
        Step::Team,
        Step::Tools,
        Step::Summary,
    ];

    /// The fixed successor. `Summary` loops back to `BusinessBasics`
    /// (start over, answers kept).
    pub fn next(self) -> Step {
        match self {
            Step::Intro => Step::BusinessBasics,
            Step::BusinessBasics => Step::Financials,
            Step::Financials => Step::Team,
            Step::Team => Step::Tools,
            Step::Tools => Step::Summary,
            Step::Summary => Step::BusinessBasics,
        }
    }

    /// The step a "Back" action returns to, if the step offers one.
    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Financials => Some(Step::BusinessBasics),
            Step::Team => Some(Step::Financials),
            Step::Tools => Some(Step::Team),
            Step::Intro | Step::BusinessBasics | Step::Summary => None,
        }
    }

    /// Wire name, as used in schemas and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Intro => "intro",
            Step::BusinessBasics => "businessBasics",
            Step::Financials => "financials",
            Step::Team => "team",
            Step::Tools => "tools",
            Step::Summary => "summary",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            Step::Intro => "Welcome",
            Step::BusinessBasics => "Business basics",
            Step::Financials => "Financials",
            Step::Team => "Team",
            Step::Tools => "Bookkeeping",
            Step::Summary => "Checklist",
        };
        f.write_str(title)
    }
}

impl std::str::FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Step::ALL
            .into_iter()
            .find(|step| step.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown step '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Choice / FieldName / FieldValue
// ---------------------------------------------------------------------------

/// A `{label, value}` pair picked from a single-select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Names of the profile fields a form can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Country,
    BusinessType,
    AnnualRevenue,
    AnnualExpenses,
    Employees,
    BookkeepingTool,
}

impl FieldName {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Country => "country",
            FieldName::BusinessType => "businessType",
            FieldName::AnnualRevenue => "annualRevenue",
            FieldName::AnnualExpenses => "annualExpenses",
            FieldName::Employees => "employees",
            FieldName::BookkeepingTool => "bookkeepingTool",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Choice(Choice),
    Text(String),
}

impl FieldValue {
    /// Text of a free-text value, or the label of a choice.
    pub fn display(&self) -> &str {
        match self {
            FieldValue::Choice(choice) => &choice.label,
            FieldValue::Text(text) => text,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Accumulated answers about the business.
///
/// Fields are only ever added or overwritten. An empty string counts as
/// unanswered when deriving the checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_expenses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookkeeping_tool: Option<Choice>,
}

impl Profile {
    /// Shallow merge: fields set in `patch` win, everything else is kept.
    pub fn patched(&self, patch: &ProfilePatch) -> Profile {
        Profile {
            country: patch.country.clone().or_else(|| self.country.clone()),
            business_type: patch
                .business_type
                .clone()
                .or_else(|| self.business_type.clone()),
            annual_revenue: patch
                .annual_revenue
                .clone()
                .or_else(|| self.annual_revenue.clone()),
            annual_expenses: patch
                .annual_expenses
                .clone()
                .or_else(|| self.annual_expenses.clone()),
            employees: patch.employees.clone().or_else(|| self.employees.clone()),
            bookkeeping_tool: patch
                .bookkeeping_tool
                .clone()
                .or_else(|| self.bookkeeping_tool.clone()),
        }
    }

    /// Current value of a field, used to pre-fill forms.
    pub fn get(&self, field: FieldName) -> Option<FieldValue> {
        match field {
            FieldName::Country => self.country.clone().map(FieldValue::Choice),
            FieldName::BusinessType => self.business_type.clone().map(FieldValue::Choice),
            FieldName::AnnualRevenue => self.annual_revenue.clone().map(FieldValue::Text),
            FieldName::AnnualExpenses => self.annual_expenses.clone().map(FieldValue::Text),
            FieldName::Employees => self.employees.clone().map(FieldValue::Text),
            FieldName::BookkeepingTool => self.bookkeeping_tool.clone().map(FieldValue::Choice),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Profile::default()
    }
}

/// A set of field updates produced by one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_expenses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookkeeping_tool: Option<Choice>,
}

impl ProfilePatch {
    /// Set a field. A choice value on a text field (or the reverse) is
    /// coerced: choices contribute their label, text becomes a choice whose
    /// label and value are both the text.
    pub fn set(&mut self, field: FieldName, value: FieldValue) {
        let as_choice = |value: FieldValue| match value {
            FieldValue::Choice(choice) => choice,
            FieldValue::Text(text) => Choice::new(text.clone(), text),
        };
        let as_text = |value: FieldValue| match value {
            FieldValue::Choice(choice) => choice.label,
            FieldValue::Text(text) => text,
        };

        match field {
            FieldName::Country => self.country = Some(as_choice(value)),
            FieldName::BusinessType => self.business_type = Some(as_choice(value)),
            FieldName::AnnualRevenue => self.annual_revenue = Some(as_text(value)),
            FieldName::AnnualExpenses => self.annual_expenses = Some(as_text(value)),
            FieldName::Employees => self.employees = Some(as_text(value)),
            FieldName::BookkeepingTool => self.bookkeeping_tool = Some(as_choice(value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }
}

// ---------------------------------------------------------------------------
// Message log
// ---------------------------------------------------------------------------

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    Assistant,
    User,
}

/// Identifier of a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Identifier of the greeting every conversation starts with.
    pub fn seed() -> Self {
        Self("m1".to_string())
    }

    /// Fresh identifier for a user-authored entry.
    pub fn user() -> Self {
        Self(format!("u-{}", Uuid::now_v7()))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded turn in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLogEntry {
    pub id: MessageId,
    pub author: Author,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl MessageLogEntry {
    pub fn assistant(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            author: Author::Assistant,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::user(),
            author: Author::User,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successor_order_is_fixed() {
        let mut step = Step::Intro;
        let mut seen = vec![step];
        for _ in 0..5 {
            step = step.next();
            seen.push(step);
        }
        assert_eq!(seen, Step::ALL.to_vec());
        assert_eq!(Step::Summary.next(), Step::BusinessBasics);
    }

    #[test]
    fn only_middle_steps_go_back() {
        assert_eq!(Step::Intro.previous(), None);
        assert_eq!(Step::BusinessBasics.previous(), None);
        assert_eq!(Step::Financials.previous(), Some(Step::BusinessBasics));
        assert_eq!(Step::Tools.previous(), Some(Step::Team));
        assert_eq!(Step::Summary.previous(), None);
    }

    #[test]
    fn step_parses_wire_names() {
        assert_eq!("businessBasics".parse::<Step>(), Ok(Step::BusinessBasics));
        assert_eq!("SUMMARY".parse::<Step>(), Ok(Step::Summary));
        assert!("checkout".parse::<Step>().is_err());
    }

    #[test]
    fn step_serializes_camel_case() {
        let json = serde_json::to_string(&Step::BusinessBasics).expect("serialize");
        assert_eq!(json, "\"businessBasics\"");
    }

    #[test]
    fn patch_keeps_unrelated_fields() {
        let mut basics = ProfilePatch::default();
        basics.set(
            FieldName::Country,
            FieldValue::Choice(Choice::new("Canada", "ca")),
        );
        let profile = Profile::default().patched(&basics);

        let mut money = ProfilePatch::default();
        money.set(FieldName::AnnualRevenue, FieldValue::Text("10 CAD".into()));
        let profile = profile.patched(&money);

        assert_eq!(profile.country, Some(Choice::new("Canada", "ca")));
        assert_eq!(profile.annual_revenue.as_deref(), Some("10 CAD"));
    }

    #[test]
    fn patch_overwrites_same_field() {
        let first = Profile {
            employees: Some("3".into()),
            ..Profile::default()
        };
        let patch = ProfilePatch {
            employees: Some("4".into()),
            ..ProfilePatch::default()
        };
        assert_eq!(first.patched(&patch).employees.as_deref(), Some("4"));
        assert_eq!(first.employees.as_deref(), Some("3"));
    }

    #[test]
    fn profile_get_reports_prefill() {
        let profile = Profile {
            bookkeeping_tool: Some(Choice::new("Xero", "xero")),
            ..Profile::default()
        };
        assert_eq!(
            profile.get(FieldName::BookkeepingTool),
            Some(FieldValue::Choice(Choice::new("Xero", "xero")))
        );
        assert_eq!(profile.get(FieldName::Employees), None);
    }

    #[test]
    fn message_ids() {
        assert_eq!(MessageId::seed().to_string(), "m1");
        let entry = MessageLogEntry::user("Shared team info");
        assert!(entry.id.0.starts_with("u-"));
        assert_eq!(entry.author, Author::User);
    }
}
