//! Checklist derivation.
//!
//! Maps a [`Profile`] to the ordered lines shown on the summary step. Each
//! line depends only on whether its field has been answered; the disclaimer
//! always comes last.

use taxcompanion_shared::{Choice, Profile};

/// Shown instead of the checklist when nothing has been answered yet.
pub const FALLBACK_LINE: &str =
    "Answer the questions above to generate a checklist of what to prepare before you file.";

/// Closes every summary.
pub const DISCLAIMER_LINE: &str = "This companion does not submit returns. Always review with a \
     qualified tax professional or local tax authority before filing.";

/// Derive the checklist for `profile`. Pure; identical input gives identical output.
pub fn derive_summary(profile: &Profile) -> Vec<String> {
    let mut lines = Vec::with_capacity(6);

    if let (Some(country), Some(business_type)) =
        (answered_choice(&profile.country), answered_choice(&profile.business_type))
    {
        lines.push(format!(
            "You are running a {} based in {}.",
            business_type.label.to_lowercase(),
            country.label
        ));
    }

    if let Some(revenue) = answered(&profile.annual_revenue) {
        lines.push(format!(
            "Approximate annual revenue: {revenue} (make sure this matches your sales \
             reports and bank statements)."
        ));
    }

    if let Some(expenses) = answered(&profile.annual_expenses) {
        lines.push(format!(
            "Approximate annual deductible expenses: {expenses} (keep invoices/receipts \
             for at least 5–7 years depending on your country)."
        ));
    }

    if let Some(employees) = answered(&profile.employees) {
        lines.push(format!(
            "Team size: {employees} {} — check that payroll, benefits, and taxes are \
             recorded for each pay period.",
            team_noun(employees)
        ));
    }

    if let Some(tool) = answered_choice(&profile.bookkeeping_tool) {
        lines.push(format!(
            "You currently track finances with {}. Export your year-end profit & loss, \
             balance sheet, and detailed general ledger from this tool.",
            tool.label
        ));
    }

    if lines.is_empty() {
        lines.push(FALLBACK_LINE.to_string());
    }

    lines.push(DISCLAIMER_LINE.to_string());
    lines
}

/// "person" when the count is numerically one, "people" for anything else,
/// including text that is not a number. Only decimal notation is understood:
/// hex such as `0x1` reads as "people".
pub fn team_noun(employees: &str) -> &'static str {
    match employees.trim().parse::<f64>() {
        Ok(n) if n == 1.0 => "person",
        _ => "people",
    }
}

fn answered(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

fn answered_choice(field: &Option<Choice>) -> Option<&Choice> {
    field.as_ref().filter(|c| !c.label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(label: &str, value: &str) -> Option<Choice> {
        Some(Choice::new(label, value))
    }

    #[test]
    fn empty_profile_gets_fallback_and_disclaimer() {
        let lines = derive_summary(&Profile::default());
        assert_eq!(lines, vec![FALLBACK_LINE.to_string(), DISCLAIMER_LINE.to_string()]);
    }

    #[test]
    fn derivation_is_idempotent() {
        let profile = Profile {
            annual_revenue: Some("5,000 GBP".into()),
            employees: Some("2".into()),
            ..Profile::default()
        };
        assert_eq!(derive_summary(&profile), derive_summary(&profile));
    }

    #[test]
    fn business_line_lowercases_type() {
        let profile = Profile {
            country: choice("Nigeria", "ng"),
            business_type: choice("Sole proprietor / freelancer", "sole"),
            ..Profile::default()
        };
        let lines = derive_summary(&profile);
        assert_eq!(
            lines[0],
            "You are running a sole proprietor / freelancer based in Nigeria."
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn country_alone_emits_nothing() {
        let profile = Profile {
            country: choice("India", "in"),
            ..Profile::default()
        };
        let lines = derive_summary(&profile);
        assert_eq!(lines[0], FALLBACK_LINE);
    }

    #[test]
    fn employee_pluralization() {
        for (count, expected) in [("1", "1 person"), ("5", "5 people"), ("abc", "abc people")] {
            let profile = Profile {
                employees: Some(count.into()),
                ..Profile::default()
            };
            let lines = derive_summary(&profile);
            assert!(lines[0].contains(expected), "{count}: {}", lines[0]);
        }
    }

    #[test]
    fn one_point_zero_counts_as_one() {
        assert_eq!(team_noun("1.0"), "person");
        assert_eq!(team_noun(" 1 "), "person");
        assert_eq!(team_noun("0"), "people");
        assert_eq!(team_noun("-1"), "people");
        assert_eq!(team_noun("0x1"), "people");
    }

    #[test]
    fn blank_answers_are_skipped() {
        let profile = Profile {
            annual_revenue: Some(String::new()),
            annual_expenses: Some(String::new()),
            employees: Some(String::new()),
            ..Profile::default()
        };
        assert_eq!(derive_summary(&profile).len(), 2);
        assert_eq!(derive_summary(&profile)[0], FALLBACK_LINE);
    }

    #[test]
    fn full_profile_keeps_fixed_order() {
        let profile = Profile {
            country: choice("United States", "us"),
            business_type: choice("Limited liability company", "llc"),
            annual_revenue: Some("300,000 USD".into()),
            annual_expenses: Some("120,000 USD".into()),
            employees: Some("3".into()),
            bookkeeping_tool: choice("QuickBooks", "quickbooks"),
        };
        let lines = derive_summary(&profile);
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "You are running a limited liability company based in United States."
        );
        assert!(lines[1].starts_with("Approximate annual revenue: 300,000 USD"));
        assert!(lines[2].starts_with("Approximate annual deductible expenses: 120,000 USD"));
        assert!(lines[3].starts_with("Team size: 3 people"));
        assert!(lines[4].contains("QuickBooks"));
        assert!(lines[4].contains("profit & loss, balance sheet, and detailed general ledger"));
        assert_eq!(lines[5], DISCLAIMER_LINE);
    }
}
