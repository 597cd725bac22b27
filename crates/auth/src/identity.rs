//! Who the caller is, and the credentials proving it.

use serde::{Deserialize, Serialize};

/// Identity of the authenticated caller, as returned by `/me/`.
///
/// Same shape as any other staff record; replaced wholesale on every fetch.
pub type UserIdentity = sasb_core::StaffMember;

/// Access/refresh credential pair issued by `/token/`.
///
/// Both values are opaque. `Debug` never prints them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential attached to every request.
    pub access: String,
    /// Longer-lived credential used only to mint a new access token.
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

impl core::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}
