//! # Intake Core
//!
//! Core logic for registering patients against the intake backend.
//!
//! This crate contains the whole submission pipeline:
//! - Reading a trimmed snapshot of the form ([`FormInput`]) through the [`FormView`] boundary
//! - Client-side validation ([`validate`])
//! - Mapping to the FHIR-shaped [`fhir::PatientRecord`] ([`to_patient_record`])
//! - The fail-open duplicate pre-check ([`DuplicateChecker`])
//! - Patient creation ([`Submitter`])
//! - Presenting the outcome ([`ResultPresenter`])
//!
//! **No UI concerns**: terminals, dialogs and argument parsing belong in the binaries.

pub mod client;
pub mod config;
pub mod constants;
pub mod duplicate;
pub mod error;
pub mod form;
pub mod mapping;
pub mod pipeline;
pub mod presenter;
pub mod submission;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::ApiClient;
pub use config::{ClientConfig, DuplicatePayload};
pub use duplicate::{DuplicateChecker, DuplicateMatch, DuplicateOutcome, MatchType};
pub use error::{ConfigError, ConfigResult, RegistrationError, RegistrationResult};
pub use form::{FormField, FormInput, FormState, FormView};
pub use mapping::to_patient_record;
pub use pipeline::{AttemptOutcome, RegistrationPipeline};
pub use presenter::{Alert, AlertIcon, AlertSink, ResultPresenter};
pub use submission::{SubmissionOutcome, Submitter};
pub use validation::{is_valid_email, validate, ValidationVerdict, REQUIRED_FIELDS};

// Re-export the wire crate so binaries need only one dependency.
pub use fhir;
