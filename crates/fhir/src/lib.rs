//! FHIR wire/boundary support for patient intake.
//!
//! This crate provides the **wire model** for the Patient resource submitted to the
//! registration backend:
//! - domain-level types ([`PatientRecord`], [`LookupKey`]) built by the intake pipeline
//! - strict wire structs that reproduce the FHIR JSON shape on serialisation
//! - rendering helpers for previews
//!
//! This crate does not perform any HTTP. Transport lives in `intake-core`.

pub mod patient;

// Re-export facades
pub use patient::Patient;

// Re-export public domain-level types
pub use patient::{
    Address, AddressUse, ContactPoint, ContactSystem, ContactUse, HumanName, Identifier,
    LookupKey, NameUse, PatientRecord,
};

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
