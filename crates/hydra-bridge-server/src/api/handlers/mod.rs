//! API request handlers

pub mod consent;
pub mod login;

pub use consent::{get_consent, post_consent, ConsentForm, ConsentQuery};
pub use login::{get_login, post_login, LoginForm, LoginQuery};

use axum::{
    extract::rejection::FormRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::api::error::ApiError;

/// 302 to the authorization server, carrying any cookie changes
fn found(jar: CookieJar, location: String) -> Response {
    (StatusCode::FOUND, jar, [(header::LOCATION, location)]).into_response()
}

/// Unwrap a form body, turning a malformed one into a 400
fn form_body<T>(form: Result<Form<T>, FormRejection>) -> Result<T, ApiError> {
    match form {
        Ok(Form(body)) => Ok(body),
        Err(rejection) => {
            debug!(error = %rejection, "Rejected form body");
            Err(ApiError::BadRequest("malformed form".into()))
        }
    }
}

/// Challenge from the query string, falling back to the form field
fn challenge_from(query: &str, form: Option<String>) -> String {
    if query.trim().is_empty() {
        form.unwrap_or_default()
    } else {
        query.to_string()
    }
}
