//! Client side of the resume flow, independent of any UI toolkit.
//!
//! `ResumeForm` is the editable draft (repeatable sections are `FormList`s),
//! `ResumeForm::validate` applies the form schema, and `FormSession` drives a
//! submission through `ResumeClient` while tracking its state.

pub mod client;
pub mod list;
pub mod schema;

pub use client::{ClientError, FormSession, GeneratedResume, ResumeClient, SubmissionState};
pub use list::FormList;
pub use schema::{FieldError, FormErrors, PersonalDraft, ResumeForm};
