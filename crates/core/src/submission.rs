//! Patient creation against the backend.
//!
//! The creation endpoint is authoritative about duplicates: if it reports an existing
//! patient, that conflict stands even when the pre-check found nothing.

use crate::client::{decode_body, id_from_value, ApiClient};
use crate::constants::{
    CREATE_FAILED_MESSAGE, STATUS_EXISTS, STATUS_SUCCESS, SUBMISSION_FAILED_MESSAGE,
};
use crate::duplicate::{DuplicateMatch, MatchType};
use crate::error::{RegistrationError, RegistrationResult};
use fhir::PatientRecord;
use serde::Deserialize;
use serde_json::Value;

/// Accepted answers of the creation endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The patient was created.
    Created {
        patient_id: Option<String>,
        message: Option<String>,
    },
    /// The server found an existing patient at creation time.
    AlreadyExists(DuplicateMatch),
}

/// Wire representation of a 2xx creation response.
///
/// The identifier has been published as `patient_id`, `insertedId` and `patientId` by
/// different backend versions; the first one present wins.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreatePatientWire {
    status: Option<String>,
    patient_id: Option<Value>,
    #[serde(rename = "insertedId")]
    inserted_id: Option<Value>,
    #[serde(rename = "patientId")]
    patient_id_camel: Option<Value>,
    message: Option<Value>,
    #[serde(rename = "matchType")]
    match_type: Option<String>,
    #[serde(rename = "existingId")]
    existing_id: Option<Value>,
    #[serde(rename = "existing_id")]
    existing_id_snake: Option<Value>,
}

/// Error body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorWire {
    detail: Option<Value>,
    message: Option<Value>,
}

impl ErrorWire {
    /// `detail` first, then `message`.
    fn into_message(self) -> Option<String> {
        text(self.detail).or_else(|| text(self.message))
    }
}

/// Server-provided text. Non-string values (such as a list of field errors) are rendered
/// as compact JSON; null and blank strings count as absent.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Sends records to the creation endpoint.
#[derive(Clone, Debug)]
pub struct Submitter {
    client: ApiClient,
}

impl Submitter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create `record` on the backend.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::Http`] for a non-2xx status, carrying the server's `detail` or
    ///   `message` when present
    /// - [`RegistrationError::UnexpectedStatus`] for a 2xx body whose `status` is not
    ///   recognised
    /// - [`RegistrationError::MalformedResponse`] for a 2xx body that is not valid JSON
    /// - [`RegistrationError::Transport`] if the request could not be completed
    pub async fn submit(&self, record: &PatientRecord) -> RegistrationResult<SubmissionOutcome> {
        let url = self.client.config().create_patient_url();
        let response = self.client.post_json(url, record).await?;

        if !response.status.is_success() {
            let message = serde_json::from_slice::<ErrorWire>(&response.body)
                .ok()
                .and_then(ErrorWire::into_message)
                .unwrap_or_else(|| SUBMISSION_FAILED_MESSAGE.to_string());
            return Err(RegistrationError::Http {
                status: response.status.as_u16(),
                message,
            });
        }

        let wire: CreatePatientWire = decode_body(&response.body)?;
        match wire.status.as_deref() {
            Some(STATUS_SUCCESS) => Ok(SubmissionOutcome::Created {
                patient_id: id_from_value(wire.patient_id)
                    .or_else(|| id_from_value(wire.inserted_id))
                    .or_else(|| id_from_value(wire.patient_id_camel)),
                message: text(wire.message),
            }),
            Some(STATUS_EXISTS) => Ok(SubmissionOutcome::AlreadyExists(DuplicateMatch {
                match_type: wire.match_type.as_deref().map(MatchType::from_wire),
                existing_id: id_from_value(wire.existing_id)
                    .or_else(|| id_from_value(wire.existing_id_snake))
                    .or_else(|| id_from_value(wire.patient_id))
                    .or_else(|| id_from_value(wire.inserted_id))
                    .or_else(|| id_from_value(wire.patient_id_camel)),
                message: text(wire.message),
            })),
            other => Err(RegistrationError::UnexpectedStatus {
                status: other.map(str::to_string),
                message: text(wire.message)
                    .unwrap_or_else(|| CREATE_FAILED_MESSAGE.to_string()),
            }),
        }
    }
}
