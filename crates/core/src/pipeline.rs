//! The submission pipeline: read → validate → map → duplicate check → submit → present.
//!
//! One call to [`RegistrationPipeline::submit`] is one attempt. The attempt holds the only
//! mutable borrow of the form for its whole duration, with the submit control disabled;
//! the control is re-enabled when the attempt ends, whatever the outcome.

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::duplicate::{DuplicateChecker, DuplicateMatch};
use crate::error::{RegistrationError, RegistrationResult};
use crate::form::{FormField, FormInput, FormView};
use crate::mapping::to_patient_record;
use crate::presenter::{AlertSink, ResultPresenter};
use crate::submission::{SubmissionOutcome, Submitter};
use crate::validation::{validate, ValidationVerdict};
use std::ops::{Deref, DerefMut};
use tracing::Instrument;
use uuid::Uuid;

/// Terminal outcome of one submission attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Rejected locally; nothing was sent.
    Invalid { field: FormField, message: String },
    /// An existing patient matched, either in the pre-check or at creation time.
    Duplicate(DuplicateMatch),
    /// The patient was created.
    Registered {
        patient_id: Option<String>,
        message: Option<String>,
    },
    /// Submission failed.
    Failed(RegistrationError),
}

impl AttemptOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, AttemptOutcome::Registered { .. })
    }
}

/// Disables the submit control for as long as it lives.
struct SubmitLock<'a, F: FormView + ?Sized> {
    form: &'a mut F,
}

impl<'a, F: FormView + ?Sized> SubmitLock<'a, F> {
    fn acquire(form: &'a mut F) -> Self {
        form.set_submit_enabled(false);
        Self { form }
    }
}

impl<F: FormView + ?Sized> Deref for SubmitLock<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        self.form
    }
}

impl<F: FormView + ?Sized> DerefMut for SubmitLock<'_, F> {
    fn deref_mut(&mut self) -> &mut F {
        self.form
    }
}

impl<F: FormView + ?Sized> Drop for SubmitLock<'_, F> {
    fn drop(&mut self) {
        self.form.set_submit_enabled(true);
    }
}

/// Runs submission attempts against one backend.
#[derive(Clone, Debug)]
pub struct RegistrationPipeline {
    checker: DuplicateChecker,
    submitter: Submitter,
}

impl RegistrationPipeline {
    /// Build a pipeline with its own HTTP client.
    pub fn new(config: ClientConfig) -> RegistrationResult<Self> {
        Ok(Self::with_client(ApiClient::new(config)?))
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self {
            checker: DuplicateChecker::new(client.clone()),
            submitter: Submitter::new(client),
        }
    }

    /// Run one attempt on `form`, presenting the result through `alerts`.
    pub async fn submit<F, A>(&self, form: &mut F, alerts: &mut A) -> AttemptOutcome
    where
        F: FormView + ?Sized,
        A: AlertSink + ?Sized,
    {
        let attempt_id = Uuid::new_v4().simple().to_string();
        let span = tracing::info_span!("attempt", id = %attempt_id);

        async move {
            let mut lock = SubmitLock::acquire(form);
            let outcome = self.run(FormInput::read(&*lock)).await;
            ResultPresenter::present(&outcome, &mut *lock, alerts);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Run the pipeline on an already-read snapshot, without presenting anything.
    pub async fn run(&self, input: FormInput) -> AttemptOutcome {
        tracing::debug!("validating");
        if let ValidationVerdict::Invalid { field, message } = validate(&input) {
            tracing::info!(%field, "form rejected by validation");
            return AttemptOutcome::Invalid { field, message };
        }

        let record = to_patient_record(&input);

        tracing::debug!("checking duplicate");
        if let Some(found) = self.checker.check(&record).await.into_match() {
            tracing::info!(existing_id = ?found.existing_id, "duplicate found by pre-check");
            return AttemptOutcome::Duplicate(found);
        }

        tracing::debug!("submitting");
        match self.submitter.submit(&record).await {
            Ok(SubmissionOutcome::Created {
                patient_id,
                message,
            }) => {
                tracing::info!(patient_id = ?patient_id, "patient registered");
                AttemptOutcome::Registered {
                    patient_id,
                    message,
                }
            }
            Ok(SubmissionOutcome::AlreadyExists(found)) => {
                tracing::info!(existing_id = ?found.existing_id, "duplicate reported at creation");
                AttemptOutcome::Duplicate(found)
            }
            Err(e) => {
                tracing::error!(error = %e, status = ?e.http_status(), "submission failed");
                AttemptOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePayload;
    use crate::form::FormState;
    use crate::presenter::{Alert, AlertIcon};
    use crate::test_support::{ana_form, spawn_backend, unreachable_backend};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Form double that records every submit-control transition.
    #[derive(Default)]
    struct RecordingForm {
        state: FormState,
        submit_transitions: Vec<bool>,
    }

    impl FormView for RecordingForm {
        fn value(&self, field: FormField) -> Option<String> {
            self.state.value(field)
        }

        fn reset(&mut self) {
            self.state.reset();
        }

        fn focus(&mut self, field: FormField) {
            self.state.focus(field);
        }

        fn clear_focus(&mut self) {
            self.state.clear_focus();
        }

        fn set_submit_enabled(&mut self, enabled: bool) {
            self.submit_transitions.push(enabled);
            self.state.set_submit_enabled(enabled);
        }
    }

    async fn pipeline_for(router: Router) -> RegistrationPipeline {
        let config = spawn_backend(router, DuplicatePayload::FullRecord).await;
        RegistrationPipeline::new(config).expect("pipeline")
    }

    fn no_duplicate() -> Json<serde_json::Value> {
        Json(json!({"isDuplicate": false}))
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_network() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().fallback(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::NOT_FOUND
            }
        });
        let pipeline = pipeline_for(router).await;

        let mut form = RecordingForm {
            state: ana_form().with(FormField::FamilyName, "  "),
            ..Default::default()
        };
        let mut alerts: Vec<Alert> = Vec::new();
        let outcome = pipeline.submit(&mut form, &mut alerts).await;

        assert!(matches!(
            outcome,
            AttemptOutcome::Invalid { field: FormField::FamilyName, .. }
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(form.state.focused(), Some(FormField::FamilyName));
        assert_eq!(form.submit_transitions, vec![false, true]);
        assert_eq!(alerts[0].text, "Family name is required");
    }

    #[tokio::test]
    async fn success_resets_form_and_reenables_submit() {
        let router = Router::new()
            .route("/patient/check-duplicate", post(|| async { no_duplicate() }))
            .route(
                "/patient",
                post(|| async {
                    (
                        StatusCode::CREATED,
                        Json(json!({"status": "success", "patient_id": "123"})),
                    )
                }),
            );
        let pipeline = pipeline_for(router).await;

        let mut form = RecordingForm {
            state: ana_form(),
            ..Default::default()
        };
        let mut alerts: Vec<Alert> = Vec::new();
        let outcome = pipeline.submit(&mut form, &mut alerts).await;

        assert!(outcome.is_registered());
        assert!(form.state.is_empty());
        assert!(form.state.is_submit_enabled());
        assert_eq!(form.submit_transitions, vec![false, true]);
        assert_eq!(alerts[0].icon, AlertIcon::Success);
        assert!(alerts[0].text.contains("123"));
    }

    #[tokio::test]
    async fn precheck_duplicate_stops_before_submission() {
        let creations = Arc::new(AtomicUsize::new(0));
        let counter = creations.clone();
        let router = Router::new()
            .route(
                "/patient/check-duplicate",
                post(|| async {
                    Json(json!({"isDuplicate": true, "matchType": "demographic", "existingId": "9"}))
                }),
            )
            .route(
                "/patient",
                post(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Json(json!({"status": "success", "patient_id": "1"}))
                    }
                }),
            );
        let pipeline = pipeline_for(router).await;

        let mut form = ana_form();
        let mut alerts: Vec<Alert> = Vec::new();
        let outcome = pipeline.submit(&mut form, &mut alerts).await;

        assert!(matches!(outcome, AttemptOutcome::Duplicate(_)));
        assert_eq!(creations.load(Ordering::SeqCst), 0);
        assert!(!form.is_empty());
        assert!(form.is_submit_enabled());
        assert!(alerts[0].text.contains("name and date of birth"));
    }

    #[tokio::test]
    async fn failed_precheck_still_submits() {
        let router = Router::new()
            .route(
                "/patient/check-duplicate",
                post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .route(
                "/patient",
                post(|| async { Json(json!({"status": "success", "insertedId": "77"})) }),
            );
        let pipeline = pipeline_for(router).await;

        let mut form = ana_form();
        let mut alerts: Vec<Alert> = Vec::new();
        let outcome = pipeline.submit(&mut form, &mut alerts).await;

        assert!(matches!(
            outcome,
            AttemptOutcome::Registered { patient_id: Some(ref id), .. } if id == "77"
        ));
    }

    #[tokio::test]
    async fn creation_time_conflict_keeps_form() {
        let router = Router::new()
            .route("/patient/check-duplicate", post(|| async { no_duplicate() }))
            .route(
                "/patient",
                post(|| async {
                    Json(json!({"status": "exists", "existingId": "45", "matchType": "identifier"}))
                }),
            );
        let pipeline = pipeline_for(router).await;

        let mut form = ana_form();
        let before = FormInput::read(&form);
        let mut alerts: Vec<Alert> = Vec::new();
        let outcome = pipeline.submit(&mut form, &mut alerts).await;

        assert!(matches!(outcome, AttemptOutcome::Duplicate(_)));
        assert_eq!(FormInput::read(&form), before);
        assert!(alerts[0].text.contains("45"));
        assert!(alerts[0].text.contains("identification number"));
    }

    #[tokio::test]
    async fn server_error_is_shown_and_submit_reenabled() {
        let router = Router::new()
            .route("/patient/check-duplicate", post(|| async { no_duplicate() }))
            .route(
                "/patient",
                post(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"message": "db down"})),
                    )
                        .into_response()
                }),
            );
        let pipeline = pipeline_for(router).await;

        let mut form = RecordingForm {
            state: ana_form(),
            ..Default::default()
        };
        let mut alerts: Vec<Alert> = Vec::new();
        let outcome = pipeline.submit(&mut form, &mut alerts).await;

        assert!(matches!(outcome, AttemptOutcome::Failed(_)));
        assert!(alerts[0].text.contains("db down"));
        assert!(form.state.is_submit_enabled());
        assert_eq!(form.submit_transitions, vec![false, true]);
        assert!(!form.state.is_empty());
    }

    #[tokio::test]
    async fn unreachable_backend_reports_network_error() {
        let pipeline = RegistrationPipeline::new(unreachable_backend().await).expect("pipeline");

        let mut form = ana_form();
        let mut alerts: Vec<Alert> = Vec::new();
        let outcome = pipeline.submit(&mut form, &mut alerts).await;

        assert!(matches!(
            outcome,
            AttemptOutcome::Failed(RegistrationError::Transport(_))
        ));
        assert!(form.is_submit_enabled());
        assert_eq!(alerts[0].icon, AlertIcon::Error);
        assert!(alerts[0].text.starts_with("network error"));
    }
}
