//! Claim injection policy for consent
//!
//! Each token section filters the user's claims independently.

use hydra_bridge_core::Claims;
use std::collections::BTreeSet;

/// Which claims a token section receives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClaimFilter {
    /// Every claim
    #[default]
    All,
    /// Only the named claims
    Only(BTreeSet<String>),
}

impl ClaimFilter {
    /// Parse `*` (all), a comma separated list, or an empty string (none)
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if spec == "*" {
            return ClaimFilter::All;
        }
        ClaimFilter::Only(
            spec.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Keep the claims this filter admits
    pub fn apply(&self, claims: &Claims) -> Claims {
        match self {
            ClaimFilter::All => claims.clone(),
            ClaimFilter::Only(names) => claims
                .iter()
                .filter(|(name, _)| names.contains(name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }
}

/// Claim filters for the ID token and the access token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimPolicy {
    pub id_token: ClaimFilter,
    pub access_token: ClaimFilter,
}
