// src/models/credential.rs
// DOCUMENTATION: Map authentication credential
// PURPOSE: Static subscription key or backend-issued bearer token

/// Placeholder value shipped in sample configuration
pub const KEY_PLACEHOLDER: &str = "<YOUR_AZURE_MAPS_SUBSCRIPTION_KEY>";

/// Credential used to authenticate against the maps platform
#[derive(Clone, PartialEq, Eq)]
pub enum MapCredential {
    /// Sent as the `subscription-key` query parameter
    SubscriptionKey(String),
    /// Sent as an `Authorization: Bearer` header
    Bearer(String),
}

impl MapCredential {
    /// Subscription key, rejecting empty and placeholder values
    pub fn subscription_key(key: &str) -> Option<Self> {
        let key = key.trim();
        if key.is_empty() || key == KEY_PLACEHOLDER {
            None
        } else {
            Some(MapCredential::SubscriptionKey(key.to_string()))
        }
    }

    pub fn auth_type(&self) -> &'static str {
        match self {
            MapCredential::SubscriptionKey(_) => "subscriptionKey",
            MapCredential::Bearer(_) => "bearer",
        }
    }

    /// Apply this credential to an outgoing request
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            MapCredential::SubscriptionKey(key) => request.query(&[("subscription-key", key)]),
            MapCredential::Bearer(token) => request.bearer_auth(token),
        }
    }
}

// Secrets stay out of logs
impl std::fmt::Debug for MapCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MapCredential::{}(***)", self.auth_type())
    }
}
