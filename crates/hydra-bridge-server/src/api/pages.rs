//! Minimal HTML pages for the login and consent forms
//!
//! Rendered from handlebars templates; `{{...}}` expressions are HTML-escaped.

use axum::response::Html;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;
use std::sync::LazyLock;
use tracing::error;

use crate::flow::{ConsentPrompt, LoginPrompt};

const LOGIN: &str = "login";
const CONSENT: &str = "consent";
const ERROR: &str = "error";

/// Served when a template fails to render
const FALLBACK: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
<title>Error</title>\n</head>\n<body>\n<h1>internal error</h1>\n</body>\n</html>\n";

static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);

    registry
        .register_template_string(LOGIN, include_str!("../../templates/login.hbs"))
        .expect("Failed to register login template");
    registry
        .register_template_string(CONSENT, include_str!("../../templates/consent.hbs"))
        .expect("Failed to register consent template");
    registry
        .register_template_string(ERROR, include_str!("../../templates/error.hbs"))
        .expect("Failed to register error template");

    registry
});

fn render<T: Serialize>(template: &str, data: &T) -> Html<String> {
    match TEMPLATES.render(template, data) {
        Ok(html) => Html(html),
        Err(e) => {
            error!(template = template, error = %e, "Failed to render page");
            Html(FALLBACK.to_string())
        }
    }
}

/// Credential form
pub fn login_page(prompt: &LoginPrompt) -> Html<String> {
    render(
        LOGIN,
        &json!({
            "client_name": prompt.client.display_name(),
            "login_challenge": prompt.login_challenge,
            "provider": prompt.provider,
            "csrf": prompt.csrf,
            "error": prompt.error,
        }),
    )
}

/// Scope confirmation form
pub fn consent_page(prompt: &ConsentPrompt) -> Html<String> {
    let who = prompt
        .name
        .as_deref()
        .or(prompt.email.as_deref())
        .unwrap_or(prompt.subject.as_str());

    render(
        CONSENT,
        &json!({
            "client_name": prompt.client.display_name(),
            "who": who,
            "requested_scope": prompt.requested_scope,
            "consent_challenge": prompt.consent_challenge,
            "csrf": prompt.csrf,
        }),
    )
}

/// Generic failure page
pub fn error_page(message: &str) -> Html<String> {
    render(ERROR, &json!({ "message": message }))
}
