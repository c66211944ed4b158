//! TUI screen definitions.
//!
//! Each screen corresponds to a tab in the TUI. All of them view the same
//! [`Conversation`]; only the conversation screen drives it forward.

mod checklist;
mod transcript;
mod wizard;

use std::fmt;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use taxcompanion_core::Conversation;

/// Screen identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    Conversation,
    Transcript,
    Checklist,
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conversation => write!(f, "Conversation"),
            Self::Transcript => write!(f, "Transcript"),
            Self::Checklist => write!(f, "Checklist"),
        }
    }
}

/// What a screen asks the app to do after handling a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScreenEvent {
    Nothing,
    /// Replace the status bar text.
    Status(String),
    /// Write the checklist to the configured export path.
    ExportRequested,
}

/// Per-screen state and behaviour.
pub(crate) struct Screens {
    conversation: wizard::ConversationScreen,
    transcript: transcript::TranscriptScreen,
    checklist: checklist::ChecklistScreen,
}

impl Screens {
    pub(crate) fn new(conversation: &Conversation) -> Self {
        Self {
            conversation: wizard::ConversationScreen::new(conversation),
            transcript: transcript::TranscriptScreen::new(),
            checklist: checklist::ChecklistScreen::new(),
        }
    }

    /// Whether the given screen has an active text input field.
    pub(crate) fn is_editing(&self, id: ScreenId) -> bool {
        match id {
            ScreenId::Conversation => self.conversation.is_editing(),
            _ => false,
        }
    }

    pub(crate) fn draw(&self, id: ScreenId, f: &mut Frame, area: Rect, conversation: &Conversation) {
        match id {
            ScreenId::Conversation => self.conversation.draw(f, area, conversation),
            ScreenId::Transcript => self.transcript.draw(f, area, conversation),
            ScreenId::Checklist => self.checklist.draw(f, area, conversation),
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        id: ScreenId,
        code: KeyCode,
        modifiers: KeyModifiers,
        conversation: &mut Conversation,
    ) -> ScreenEvent {
        match id {
            ScreenId::Conversation => self.conversation.handle_key(code, modifiers, conversation),
            ScreenId::Transcript => {
                self.transcript.handle_key(code, modifiers, conversation);
                ScreenEvent::Nothing
            }
            ScreenId::Checklist => self.checklist.handle_key(code, modifiers),
        }
    }
}
