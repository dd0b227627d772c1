//! Session types for admin authentication.
//!
//! [`AdminSession`] is the in-memory record. [`PersistedSession`] is the
//! single JSON value written to storage, with the token held in its own
//! field next to the identity fields.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use hadi_books_core::AdminId;

/// Opaque bearer credential issued at login.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the raw token for an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whether the token is empty (unauthenticated).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

impl PartialEq for BearerToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for BearerToken {}

impl Serialize for BearerToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for BearerToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Admin identity as returned by the login and profile endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: AdminId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// The authenticated admin's session record.
///
/// Either fully empty or fully populated. `profile_picture` is normalized
/// to an empty string when the backend has none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    pub token: Option<BearerToken>,
    pub id: Option<AdminId>,
    pub name: String,
    pub email: String,
    pub profile_picture: String,
}

impl AdminSession {
    /// The unauthenticated record.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A populated record built from a token and the admin's profile.
    #[must_use]
    pub fn authenticated(token: BearerToken, profile: AdminProfile) -> Self {
        Self {
            token: Some(token),
            id: Some(profile.id),
            name: profile.name,
            email: profile.email,
            profile_picture: profile.profile_picture.unwrap_or_default(),
        }
    }

    /// Whether the record carries a non-empty token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(|token| !token.is_empty())
    }

    /// Whether the record has both a token and an admin id, and so is
    /// worth persisting.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_authenticated() && self.id.as_ref().is_some_and(|id| !id.as_str().is_empty())
    }

    /// The identity half of the record.
    #[must_use]
    pub fn profile(&self) -> Option<AdminProfile> {
        let id = self.id.clone()?;
        Some(AdminProfile {
            id,
            name: self.name.clone(),
            email: self.email.clone(),
            profile_picture: (!self.profile_picture.is_empty())
                .then(|| self.profile_picture.clone()),
        })
    }

    /// The storage form of the record, or `None` when it is incomplete.
    #[must_use]
    pub fn to_persisted(&self) -> Option<PersistedSession> {
        if !self.is_complete() {
            return None;
        }
        Some(PersistedSession {
            token: self.token.clone()?,
            admin: self.profile()?,
        })
    }
}

/// The one value kept in session storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Authoritative token. Identity fields never carry their own copy.
    pub token: BearerToken,
    pub admin: AdminProfile,
}

impl PersistedSession {
    /// Whether the stored value is usable for rehydration.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.token.is_empty() && !self.admin.id.as_str().is_empty()
    }
}

impl From<PersistedSession> for AdminSession {
    fn from(persisted: PersistedSession) -> Self {
        Self::authenticated(persisted.token, persisted.admin)
    }
}
