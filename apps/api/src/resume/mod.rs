//! `POST /api/resume`: validate → transform → merge → deliver.

pub mod handlers;
pub mod transform;
pub mod validation;
