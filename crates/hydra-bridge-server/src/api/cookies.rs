//! Bridge session cookie

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Cookie carrying the signed bridge session
pub const SESSION_COOKIE: &str = "__bridge_session";

/// SameSite mode for the session cookie
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SameSitePolicy {
    #[default]
    Lax,
    Strict,
    None,
}

impl SameSitePolicy {
    /// Parse `lax`, `strict` or `none`; anything else is `Lax`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => SameSitePolicy::Strict,
            "none" => SameSitePolicy::None,
            _ => SameSitePolicy::Lax,
        }
    }

    fn as_same_site(self) -> SameSite {
        match self {
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

/// Attributes of the session cookie
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    /// `None` means host-only
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSitePolicy,
    pub max_age_secs: i64,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: SESSION_COOKIE.to_string(),
            domain: None,
            secure: false,
            same_site: SameSitePolicy::Lax,
            max_age_secs: crate::flow::DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl CookieSettings {
    /// Build the session cookie for a signed token
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let mut builder = Cookie::build((self.name.clone(), token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site.as_same_site())
            .max_age(time::Duration::seconds(self.max_age_secs));

        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }

        builder.build()
    }

    /// Raw session token from the request cookies, if present
    pub fn session_token<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.name).map(|cookie| cookie.value())
    }
}
