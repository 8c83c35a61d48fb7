//! Consent challenge handlers

use axum::{
    extract::{rejection::FormRejection, Query, State},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use super::{challenge_from, form_body, found};
use crate::api::{error::ApiError, pages, AppState};
use crate::flow::ConsentOutcome;

/// Query string of `/consent`
#[derive(Debug, Default, Deserialize)]
pub struct ConsentQuery {
    #[serde(default)]
    pub consent_challenge: String,
}

/// Submitted consent form
#[derive(Debug, Deserialize)]
pub struct ConsentForm {
    pub consent_challenge: Option<String>,
    #[serde(default)]
    pub csrf: String,
}

/// GET /consent?consent_challenge=...
pub async fn get_consent(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<ConsentQuery>,
) -> Result<Response, ApiError> {
    let outcome = state
        .flows
        .begin_consent(&query.consent_challenge, state.cookies.session_token(&jar))
        .await?;

    Ok(respond(jar, outcome))
}

/// POST /consent
pub async fn post_consent(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<ConsentQuery>,
    form: Result<Form<ConsentForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = form_body(form)?;
    let challenge = challenge_from(&query.consent_challenge, form.consent_challenge);

    let outcome = state
        .flows
        .submit_consent(&challenge, &form.csrf, state.cookies.session_token(&jar))
        .await?;

    Ok(respond(jar, outcome))
}

fn respond(jar: CookieJar, outcome: ConsentOutcome) -> Response {
    match outcome {
        ConsentOutcome::Accepted { redirect_to } => found(jar, redirect_to),
        ConsentOutcome::Prompt(prompt) => pages::consent_page(&prompt).into_response(),
    }
}
