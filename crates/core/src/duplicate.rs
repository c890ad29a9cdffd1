//! Duplicate pre-check against the backend's lookup endpoint.
//!
//! The pre-check fails open: any failure to obtain an answer (transport error, non-2xx
//! status, undecodable body) is logged and treated as "no duplicate". The creation
//! endpoint performs its own duplicate detection at write time, and that answer is the
//! one that counts.

use crate::client::{decode_body, id_from_value, ApiClient};
use crate::config::DuplicatePayload;
use crate::error::{RegistrationError, RegistrationResult};
use fhir::PatientRecord;
use serde::Deserialize;

/// Criterion on which an existing patient matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchType {
    /// Same identification number.
    Identifier,
    /// Same name and date of birth.
    Demographic,
}

impl MatchType {
    /// Parse from the backend's `matchType` value. Anything but `identifier` is demographic.
    pub(crate) fn from_wire(s: &str) -> Self {
        if s == "identifier" {
            MatchType::Identifier
        } else {
            MatchType::Demographic
        }
    }

    /// Phrase naming the matched criterion, as shown to the user.
    pub fn criterion(self) -> &'static str {
        match self {
            MatchType::Identifier => "identification number",
            MatchType::Demographic => "name and date of birth",
        }
    }
}

/// An existing patient that conflicts with the one being registered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DuplicateMatch {
    pub match_type: Option<MatchType>,
    pub existing_id: Option<String>,
    /// Server-supplied explanation, when the conflict came from the creation endpoint.
    pub message: Option<String>,
}

/// Answer of the duplicate pre-check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DuplicateOutcome {
    pub is_duplicate: bool,
    pub match_type: Option<MatchType>,
    pub existing_id: Option<String>,
}

impl DuplicateOutcome {
    /// The fail-open answer.
    pub fn no_duplicate() -> Self {
        Self::default()
    }

    /// The conflicting patient, if the check found one.
    pub fn into_match(self) -> Option<DuplicateMatch> {
        self.is_duplicate.then_some(DuplicateMatch {
            match_type: self.match_type,
            existing_id: self.existing_id,
            message: None,
        })
    }
}

/// Wire representation of the lookup response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DuplicateCheckWire {
    #[serde(rename = "isDuplicate")]
    is_duplicate: Option<bool>,
    #[serde(rename = "matchType")]
    match_type: Option<String>,
    #[serde(rename = "existingId")]
    existing_id: Option<serde_json::Value>,
    #[serde(rename = "existing_id")]
    existing_id_snake: Option<serde_json::Value>,
}

impl From<DuplicateCheckWire> for DuplicateOutcome {
    fn from(wire: DuplicateCheckWire) -> Self {
        Self {
            is_duplicate: wire.is_duplicate.unwrap_or(false),
            match_type: wire.match_type.as_deref().map(MatchType::from_wire),
            existing_id: id_from_value(wire.existing_id)
                .or_else(|| id_from_value(wire.existing_id_snake)),
        }
    }
}

/// Sends records to the duplicate-lookup endpoint.
#[derive(Clone, Debug)]
pub struct DuplicateChecker {
    client: ApiClient,
}

impl DuplicateChecker {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Ask the backend whether `record` already exists.
    ///
    /// Never fails: if no answer can be obtained the result is
    /// [`DuplicateOutcome::no_duplicate`].
    pub async fn check(&self, record: &PatientRecord) -> DuplicateOutcome {
        match self.try_check(record).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "duplicate check failed; continuing without it");
                DuplicateOutcome::no_duplicate()
            }
        }
    }

    async fn try_check(&self, record: &PatientRecord) -> RegistrationResult<DuplicateOutcome> {
        let config = self.client.config();
        let url = config.duplicate_check_url();

        let response = match config.duplicate_payload() {
            DuplicatePayload::FullRecord => self.client.post_json(url, record).await?,
            DuplicatePayload::LookupKey => self.client.post_json(url, &record.lookup_key()).await?,
        };

        if !response.status.is_success() {
            return Err(RegistrationError::Http {
                status: response.status.as_u16(),
                message: format!("server responded with {}", response.status),
            });
        }

        let wire: DuplicateCheckWire = decode_body(&response.body)?;
        Ok(wire.into())
    }
}
