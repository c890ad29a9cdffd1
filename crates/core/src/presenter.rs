//! Rendering of attempt outcomes.
//!
//! The presenter turns an [`AttemptOutcome`] into an [`Alert`] for the alert renderer and
//! applies the matching form effect: reset on success, focus on a known offending field.
//! Otherwise the values stay and any earlier focus is dropped.

use crate::constants::GENERIC_ERROR_MESSAGE;
use crate::duplicate::{DuplicateMatch, MatchType};
use crate::form::FormView;
use crate::pipeline::AttemptOutcome;
use std::fmt;

/// Icon shown next to an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertIcon {
    Success,
    Warning,
    Error,
}

impl AlertIcon {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertIcon::Success => "success",
            AlertIcon::Warning => "warning",
            AlertIcon::Error => "error",
        }
    }
}

impl fmt::Display for AlertIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub text: String,
    pub icon: AlertIcon,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}\n\n{}", self.icon, self.title, self.text)
    }
}

/// Whatever displays alerts (dialog library, terminal, test recorder).
pub trait AlertSink {
    fn show(&mut self, alert: Alert);
}

impl AlertSink for Vec<Alert> {
    fn show(&mut self, alert: Alert) {
        self.push(alert);
    }
}

/// Stateless presenter for attempt outcomes.
pub struct ResultPresenter;

impl ResultPresenter {
    /// Show the alert for `outcome` and apply its effect on the form.
    pub fn present<F, A>(outcome: &AttemptOutcome, form: &mut F, alerts: &mut A)
    where
        F: FormView + ?Sized,
        A: AlertSink + ?Sized,
    {
        alerts.show(Self::alert_for(outcome));

        match outcome {
            AttemptOutcome::Registered { .. } => form.reset(),
            AttemptOutcome::Invalid { field, .. } => form.focus(*field),
            AttemptOutcome::Duplicate(_) | AttemptOutcome::Failed(_) => form.clear_focus(),
        }
    }

    /// Build the alert for an outcome without touching any UI.
    pub fn alert_for(outcome: &AttemptOutcome) -> Alert {
        match outcome {
            AttemptOutcome::Registered { patient_id, .. } => {
                let text = match patient_id {
                    Some(id) => format!("Patient registered successfully!\n\nPatient ID: {id}"),
                    None => "Patient registered successfully!".to_string(),
                };
                Alert {
                    title: "Registration successful".into(),
                    text,
                    icon: AlertIcon::Success,
                }
            }
            AttemptOutcome::Duplicate(found) => Alert {
                title: "Patient already exists".into(),
                text: duplicate_text(found),
                icon: AlertIcon::Warning,
            },
            AttemptOutcome::Invalid { message, .. } => Alert {
                title: "Validation error".into(),
                text: message.clone(),
                icon: AlertIcon::Error,
            },
            AttemptOutcome::Failed(err) => {
                let text = err.to_string();
                Alert {
                    title: "Error".into(),
                    text: if text.trim().is_empty() {
                        GENERIC_ERROR_MESSAGE.to_string()
                    } else {
                        text
                    },
                    icon: AlertIcon::Error,
                }
            }
        }
    }
}

fn duplicate_text(found: &DuplicateMatch) -> String {
    let criterion = found
        .match_type
        .unwrap_or(MatchType::Demographic)
        .criterion();
    let existing = found.existing_id.as_deref().unwrap_or("unknown");

    let mut text = format!(
        "A patient with the same {criterion} already exists.\n\nExisting patient ID: {existing}"
    );
    if let Some(message) = found.message.as_deref().filter(|m| !m.trim().is_empty()) {
        text.push_str("\n\n");
        text.push_str(message);
    }
    text
}
