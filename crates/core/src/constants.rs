//! Constants used throughout the intake core crate.
//!
//! Endpoint paths, fixed mapping values and fallback user-facing messages live here so the
//! pipeline and its tests agree on them.

/// Backend base URL used when no explicit URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://back-end-santiago.onrender.com";

/// Path of the duplicate-lookup endpoint, relative to the base URL.
pub const DUPLICATE_CHECK_PATH: &str = "patient/check-duplicate";

/// Path of the patient creation endpoint, relative to the base URL.
pub const CREATE_PATIENT_PATH: &str = "patient";

/// Country written to every address. This deployment serves a single jurisdiction.
pub const DEFAULT_COUNTRY: &str = "Colombia";

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "INTAKE_API_URL";

/// Environment variable selecting the duplicate-check payload (`full` or `key`).
pub const DUPLICATE_PAYLOAD_ENV: &str = "INTAKE_DUPLICATE_PAYLOAD";

/// Log filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "intake_core=info";

/// Creation endpoint `status` value for a newly created patient.
pub const STATUS_SUCCESS: &str = "success";

/// Creation endpoint `status` value when the server found an existing patient.
pub const STATUS_EXISTS: &str = "exists";

/// Fallback message for a rejected submission without a server-provided reason.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Submission failed";

/// Fallback message for a 2xx response that did not report success.
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create the patient";

/// Fallback message for any error without more specific text.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred during submission";
