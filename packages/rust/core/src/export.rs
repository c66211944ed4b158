//! Plain-text export of a conversation's checklist.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use taxcompanion_shared::{Author, Result, TaxCompanionError};

use crate::conversation::Conversation;

/// Render the checklist (and optionally the transcript) as plain text.
pub fn render_text(conversation: &Conversation, include_transcript: bool) -> String {
    render_text_at(conversation, include_transcript, Utc::now())
}

fn render_text_at(
    conversation: &Conversation,
    include_transcript: bool,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tax Companion checklist");
    let _ = writeln!(out, "Session:   {}", conversation.id());
    let _ = writeln!(
        out,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    out.push('\n');

    for line in conversation.summary() {
        let _ = writeln!(out, "- {line}");
    }

    if include_transcript {
        out.push_str("\nTranscript\n");
        for entry in conversation.messages() {
            let who = match entry.author {
                Author::Assistant => "assistant",
                Author::User => "you",
            };
            let _ = writeln!(
                out,
                "[{}] {who}: {}",
                entry.sent_at.format("%H:%M:%S"),
                entry.text
            );
        }
    }

    out
}

/// Write the rendered export to `path`, replacing any existing file.
pub fn write_text(conversation: &Conversation, include_transcript: bool, path: &Path) -> Result<()> {
    let text = render_text(conversation, include_transcript);
    std::fs::write(path, text).map_err(|e| TaxCompanionError::io(path, e))?;
    info!(session = %conversation.id(), ?path, "checklist exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::answers::Answers;
    use crate::summary::DISCLAIMER_LINE;

    fn finished() -> Conversation {
        Answers {
            country: Some("ca".into()),
            business_type: Some("corp".into()),
            employees: Some("12".into()),
            ..Answers::default()
        }
        .walk()
        .expect("walk")
    }

    #[test]
    fn export_lists_every_line() {
        let conv = finished();
        let at = Utc.with_ymd_and_hms(2026, 4, 1, 9, 30, 0).unwrap();
        let text = render_text_at(&conv, false, at);

        assert!(text.starts_with("Tax Companion checklist\n"));
        assert!(text.contains("Generated: 2026-04-01 09:30 UTC"));
        for line in conv.summary() {
            assert!(text.contains(&format!("- {line}")));
        }
        assert!(text.trim_end().ends_with(DISCLAIMER_LINE));
        assert!(!text.contains("Transcript"));
    }

    #[test]
    fn transcript_is_optional() {
        let conv = finished();
        let text = render_text(&conv, true);
        assert!(text.contains("\nTranscript\n"));
        assert!(text.contains("you: Shared team info"));
        assert!(text.contains("assistant: Hey, I'm your tax companion."));
    }

    #[test]
    fn write_reports_path_on_failure() {
        let conv = finished();
        let path = std::env::temp_dir()
            .join("taxcompanion-missing-dir")
            .join("nested")
            .join("out.txt");
        let err = write_text(&conv, false, &path).unwrap_err();
        assert!(err.to_string().contains("out.txt"));
    }
}
