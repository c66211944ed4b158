//! Fixed option lists offered by the single-select fields.

use serde::Serialize;

use taxcompanion_shared::Choice;

/// A selectable option, as declared in a field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub value: &'static str,
}

impl ChoiceOption {
    const fn new(label: &'static str, value: &'static str) -> Self {
        Self { label, value }
    }

    pub fn to_choice(self) -> Choice {
        Choice::new(self.label, self.value)
    }
}

/// Where the business is primarily registered for tax.
pub const COUNTRIES: &[ChoiceOption] = &[
    ChoiceOption::new("United States", "us"),
    ChoiceOption::new("United Kingdom", "uk"),
    ChoiceOption::new("Canada", "ca"),
    ChoiceOption::new("Nigeria", "ng"),
    ChoiceOption::new("India", "in"),
    ChoiceOption::new("Other", "other"),
];

/// Legal structure of the business.
pub const BUSINESS_TYPES: &[ChoiceOption] = &[
    ChoiceOption::new("Sole proprietor / freelancer", "sole"),
    ChoiceOption::new("Limited liability company", "llc"),
    ChoiceOption::new("Partnership", "partnership"),
    ChoiceOption::new("Corporation", "corp"),
    ChoiceOption::new("Non-profit / NGO", "nonprofit"),
];

/// Bookkeeping software (or lack of it).
pub const BOOKKEEPING_TOOLS: &[ChoiceOption] = &[
    ChoiceOption::new("None / spreadsheets", "none"),
    ChoiceOption::new("QuickBooks", "quickbooks"),
    ChoiceOption::new("Xero", "xero"),
    ChoiceOption::new("Zoho Books", "zoho"),
    ChoiceOption::new("Wave", "wave"),
    ChoiceOption::new("Other", "other"),
];

/// Resolve an option by its value or label, ignoring case and surrounding
/// whitespace. Values are checked first so `other` never matches a label.
pub fn find(options: &[ChoiceOption], needle: &str) -> Option<ChoiceOption> {
    let needle = needle.trim();
    options
        .iter()
        .find(|opt| opt.value.eq_ignore_ascii_case(needle))
        .or_else(|| {
            options
                .iter()
                .find(|opt| opt.label.eq_ignore_ascii_case(needle))
        })
        .copied()
}

/// Whether `choice` is exactly one of `options`.
pub fn contains(options: &[ChoiceOption], choice: &Choice) -> bool {
    options
        .iter()
        .any(|opt| opt.value == choice.value && opt.label == choice.label)
}
