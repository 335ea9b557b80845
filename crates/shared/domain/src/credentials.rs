//! Value types for the per-user login and claim collections.

use serde::{Deserialize, Serialize};

/// An external identity binding: which provider, and the user's key there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserLoginInfo {
    pub login_provider: String,
    pub provider_key: String,
}

impl UserLoginInfo {
    pub fn new(login_provider: impl Into<String>, provider_key: impl Into<String>) -> Self {
        Self {
            login_provider: login_provider.into(),
            provider_key: provider_key.into(),
        }
    }
}

/// A type/value statement attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    pub claim_type: String,
    pub claim_value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, claim_value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            claim_value: claim_value.into(),
        }
    }
}
