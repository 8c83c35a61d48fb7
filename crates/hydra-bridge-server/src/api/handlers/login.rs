//! Login challenge handlers

use axum::{
    extract::{rejection::FormRejection, Query, State},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use hydra_bridge_auth::Credentials;
use serde::Deserialize;
use std::sync::Arc;

use super::{challenge_from, form_body, found};
use crate::api::{error::ApiError, pages, AppState};
use crate::flow::{LoginOutcome, LoginSubmission};

/// Query string of `/login`
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub login_challenge: String,
    pub provider: Option<String>,
}

/// Submitted credential form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub login_challenge: Option<String>,
    #[serde(default)]
    pub csrf: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub provider: Option<String>,
}

/// Start or short-circuit a login challenge
///
/// GET /login?login_challenge=...&provider=...
pub async fn get_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Result<Response, ApiError> {
    let outcome = state
        .flows
        .begin_login(
            &query.login_challenge,
            state.cookies.session_token(&jar),
            query.provider.as_deref(),
        )
        .await?;

    Ok(respond(&state, jar, outcome))
}

/// Verify submitted credentials
///
/// POST /login
pub async fn post_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = form_body(form)?;

    let submission = LoginSubmission {
        login_challenge: challenge_from(&query.login_challenge, form.login_challenge),
        csrf: form.csrf,
        provider: form
            .provider
            .filter(|p| !p.trim().is_empty())
            .or(query.provider),
        credentials: Credentials::new(form.username, form.password),
    };

    let outcome = state.flows.submit_login(submission).await?;
    Ok(respond(&state, jar, outcome))
}

fn respond(state: &AppState, jar: CookieJar, outcome: LoginOutcome) -> Response {
    match outcome {
        LoginOutcome::Accepted {
            redirect_to,
            session_token,
        } => {
            let jar = match session_token {
                Some(token) => jar.add(state.cookies.session_cookie(token)),
                None => jar,
            };
            found(jar, redirect_to)
        }
        LoginOutcome::Prompt(prompt) => pages::login_page(&prompt).into_response(),
    }
}
