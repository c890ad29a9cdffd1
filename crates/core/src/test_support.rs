//! Fake backend and fixtures shared by the crate's tests.

use crate::config::{ClientConfig, DuplicatePayload};
use crate::form::{FormField, FormState};
use axum::Router;
use reqwest::Url;

/// Serve `router` on an ephemeral local port and return a config pointing at it.
pub(crate) async fn spawn_backend(router: Router, payload: DuplicatePayload) -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve fake backend");
    });

    let url = Url::parse(&format!("http://{addr}")).expect("backend url");
    ClientConfig::new(url, payload).expect("backend config")
}

/// Config pointing at a local port with nothing listening.
pub(crate) async fn unreachable_backend() -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let url = Url::parse(&format!("http://{addr}")).expect("backend url");
    ClientConfig::new(url, DuplicatePayload::FullRecord).expect("backend config")
}

/// A complete, valid registration form.
pub(crate) fn ana_form() -> FormState {
    FormState::new()
        .with(FormField::Name, "Ana")
        .with(FormField::FamilyName, "Ruiz")
        .with(FormField::Gender, "female")
        .with(FormField::BirthDate, "1990-01-01")
        .with(FormField::IdentifierSystem, "CC")
        .with(FormField::IdentifierValue, "1002003")
        .with(FormField::CellPhone, "3001234567")
}
