//! Shared test harness: an in-memory authorization server and app wiring

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, http::Response, Router};
use hydra_bridge_auth::verifiers::{StaticUser, StaticVerifier};
use hydra_bridge_auth::VerifierRegistry;
use hydra_bridge_core::{CsrfDeriver, SessionCodec};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use hydra_bridge_server::hydra::{
    AcceptConsent, AcceptLogin, AdminApi, ConsentRequest, GatewayError, LoginRequest, OAuthClient,
    RedirectResponse, Result,
};
use hydra_bridge_server::{create_router, AppState, BridgeConfig, FlowOrchestrator};

pub const SECRET: &str = "test-cookie-auth-key";

// =============================================================================
// Fake authorization server
// =============================================================================

/// Admin API backed by in-memory challenges, recording every accept call
#[derive(Default)]
pub struct FakeHydra {
    logins: Mutex<HashMap<String, LoginRequest>>,
    consents: Mutex<HashMap<String, ConsentRequest>>,
    pub login_accepts: Mutex<Vec<(String, AcceptLogin)>>,
    pub consent_accepts: Mutex<Vec<(String, AcceptConsent)>>,
    pub login_fetches: Mutex<usize>,
}

impl FakeHydra {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_login(&self, challenge: &str) {
        self.add_login_request(LoginRequest {
            challenge: challenge.into(),
            client: client(),
            ..LoginRequest::default()
        });
    }

    pub fn add_login_request(&self, request: LoginRequest) {
        self.logins
            .lock()
            .unwrap()
            .insert(request.challenge.clone(), request);
    }

    pub fn add_consent(&self, challenge: &str, subject: &str, scopes: &[&str]) {
        self.add_consent_request(ConsentRequest {
            challenge: challenge.into(),
            client: client(),
            requested_scope: scopes.iter().map(|s| s.to_string()).collect(),
            subject: subject.into(),
            ..ConsentRequest::default()
        });
    }

    pub fn add_consent_request(&self, request: ConsentRequest) {
        self.consents
            .lock()
            .unwrap()
            .insert(request.challenge.clone(), request);
    }

    pub fn login_accepts(&self) -> Vec<(String, AcceptLogin)> {
        self.login_accepts.lock().unwrap().clone()
    }

    pub fn consent_accepts(&self) -> Vec<(String, AcceptConsent)> {
        self.consent_accepts.lock().unwrap().clone()
    }

    pub fn login_fetches(&self) -> usize {
        *self.login_fetches.lock().unwrap()
    }
}

fn not_found() -> GatewayError {
    GatewayError::Status {
        status: 404,
        body: "challenge not found".into(),
    }
}

#[async_trait]
impl AdminApi for FakeHydra {
    async fn get_login_request(&self, login_challenge: &str) -> Result<LoginRequest> {
        *self.login_fetches.lock().unwrap() += 1;
        self.logins
            .lock()
            .unwrap()
            .get(login_challenge)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn accept_login_request(
        &self,
        login_challenge: &str,
        body: &AcceptLogin,
    ) -> Result<RedirectResponse> {
        if !self.logins.lock().unwrap().contains_key(login_challenge) {
            return Err(not_found());
        }
        self.login_accepts
            .lock()
            .unwrap()
            .push((login_challenge.to_string(), body.clone()));
        Ok(RedirectResponse {
            redirect_to: format!(
                "http://hydra.local/oauth2/auth?login_verifier={}",
                login_challenge
            ),
        })
    }

    async fn get_consent_request(&self, consent_challenge: &str) -> Result<ConsentRequest> {
        self.consents
            .lock()
            .unwrap()
            .get(consent_challenge)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn accept_consent_request(
        &self,
        consent_challenge: &str,
        body: &AcceptConsent,
    ) -> Result<RedirectResponse> {
        if !self.consents.lock().unwrap().contains_key(consent_challenge) {
            return Err(not_found());
        }
        self.consent_accepts
            .lock()
            .unwrap()
            .push((consent_challenge.to_string(), body.clone()));
        Ok(RedirectResponse {
            redirect_to: format!(
                "http://hydra.local/oauth2/auth?consent_verifier={}",
                consent_challenge
            ),
        })
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub fn client() -> OAuthClient {
    OAuthClient {
        client_id: "demo-web".into(),
        client_name: Some("Demo Web".into()),
    }
}

/// Registry with one static user registered as the default provider
pub fn verifiers() -> Arc<VerifierRegistry> {
    let users = StaticVerifier::new().with_user(
        "hai",
        StaticUser::new("123", "user-12345")
            .with_claim("email", json!("hai@x.local"))
            .with_claim("name", json!("Nguyen Hai")),
    );

    let registry = VerifierRegistry::new();
    registry.register("internal", Arc::new(users));
    Arc::new(registry)
}

pub fn config_with(extra: &[(&str, &str)]) -> BridgeConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("BRIDGE_ADDR".to_string(), "127.0.0.1:0".to_string()),
        ("HYDRA_ADMIN_URL".to_string(), "http://hydra.local:4445".to_string()),
        ("LOGIN_API_URL".to_string(), "http://login-api.local:8090".to_string()),
        ("COOKIE_AUTH_KEY".to_string(), SECRET.to_string()),
    ]);
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }
    BridgeConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn config() -> BridgeConfig {
    config_with(&[])
}

pub fn codec() -> SessionCodec {
    SessionCodec::new(SECRET).unwrap()
}

pub fn csrf() -> CsrfDeriver {
    CsrfDeriver::new(SECRET).unwrap()
}

pub fn orchestrator(hydra: Arc<FakeHydra>) -> FlowOrchestrator {
    FlowOrchestrator::new(hydra, verifiers(), codec(), csrf(), config().flow_settings())
}

pub fn app(hydra: Arc<FakeHydra>) -> Router {
    let state = AppState::new(hydra, verifiers(), codec(), csrf(), &config());
    create_router(Arc::new(state))
}

// =============================================================================
// HTTP helpers
// =============================================================================

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let body = serde_urlencoded::to_string(fields).unwrap();

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` of the session cookie set by a response, if any
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("__bridge_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
