//! The conversation state machine.
//!
//! A [`Conversation`] owns the current [`Step`], the accumulated [`Profile`]
//! and the transcript. Steps only ever move along [`Step::next`], except for
//! the explicit [`Conversation::back`] action offered by the middle forms.

use std::cell::OnceCell;

use tracing::{debug, instrument};

use taxcompanion_shared::{MessageId, MessageLogEntry, Profile, ProfilePatch, SessionId, Step};

use crate::form::{FieldError, FormValues, StepForm, step_form};
use crate::summary::derive_summary;

/// The assistant message every conversation opens with.
pub const GREETING: &str = "Hey, I'm your tax companion. Let’s capture the essentials about \
     your business so you can hand clean info to an accountant or e-filing tool.";

/// One in-memory wizard session.
#[derive(Debug)]
pub struct Conversation {
    id: SessionId,
    step: Step,
    profile: Profile,
    messages: Vec<MessageLogEntry>,
    /// Derived checklist for the current profile snapshot.
    summary: OnceCell<Vec<String>>,
}

impl Conversation {
    /// Start at `intro` with an empty profile and the greeting in the log.
    pub fn new() -> Self {
        let id = SessionId::new();
        debug!(session = %id, "conversation started");
        Self {
            id,
            step: Step::Intro,
            profile: Profile::default(),
            messages: vec![MessageLogEntry::assistant(MessageId::seed(), GREETING)],
            summary: OnceCell::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn messages(&self) -> &[MessageLogEntry] {
        &self.messages
    }

    /// The form for the current step, pre-filled from the profile.
    pub fn form(&self) -> StepForm {
        step_form(self.step, &self.profile)
    }

    /// Checklist lines for the current profile. Recomputed only after the
    /// profile changes.
    pub fn summary(&self) -> &[String] {
        self.summary.get_or_init(|| derive_summary(&self.profile))
    }

    /// Merge `patch`, record `log_text` as a user entry when given, and move
    /// to the successor of the current step.
    #[instrument(skip_all, fields(session = %self.id, from = self.step.as_str()))]
    pub fn advance(&mut self, patch: &ProfilePatch, log_text: Option<&str>) -> Step {
        if !patch.is_empty() {
            self.profile = self.profile.patched(patch);
            self.summary = OnceCell::new();
        }

        if let Some(text) = log_text {
            self.messages.push(MessageLogEntry::user(text));
        }

        let from = self.step;
        self.step = from.next();
        debug!(
            to = self.step.as_str(),
            logged = log_text.is_some(),
            "step advanced"
        );
        self.step
    }

    /// Validate `values` against the current step's form, then advance with
    /// that form's log text. Nothing changes when validation fails.
    pub fn submit(&mut self, values: &FormValues) -> Result<Step, FieldError> {
        let form = self.form();
        let patch = form.validate(values).inspect_err(|err| {
            debug!(session = %self.id, step = self.step.as_str(), %err, "submission blocked");
        })?;
        Ok(self.advance(&patch, form.log_text))
    }

    /// The intro's "Let’s get started": no fields, no log entry.
    pub fn start(&mut self) -> Step {
        self.advance_if(Step::Intro)
    }

    /// The summary's "Start over or adjust answers": returns to
    /// `businessBasics` keeping every answer for pre-fill.
    pub fn start_over(&mut self) -> Step {
        self.advance_if(Step::Summary)
    }

    /// Return to the previous form without saving or logging anything.
    /// `None` (and no change) on steps without a back action.
    pub fn back(&mut self) -> Option<Step> {
        let previous = self.step.previous()?;
        debug!(
            session = %self.id,
            from = self.step.as_str(),
            to = previous.as_str(),
            "stepped back"
        );
        self.step = previous;
        Some(previous)
    }

    fn advance_if(&mut self, expected: Step) -> Step {
        if self.step == expected {
            self.advance(&ProfilePatch::default(), None)
        } else {
            self.step
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
