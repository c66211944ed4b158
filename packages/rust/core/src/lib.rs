//! Conversation logic for Tax Companion.
//!
//! This crate holds the wizard itself: the option catalog, per-step form
//! schemas, the step/profile state machine, checklist derivation, and the
//! non-interactive answers walker and text export built on top of them.

pub mod answers;
pub mod catalog;
pub mod conversation;
pub mod export;
pub mod form;
pub mod summary;

pub use answers::Answers;
pub use conversation::Conversation;
pub use form::{FieldError, FieldKind, FieldSchema, FormValues, StepForm, step_form};
pub use summary::derive_summary;
