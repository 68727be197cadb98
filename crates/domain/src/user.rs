//! Users, roles, and the identity of the current caller.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::extra::ExtraFields;

/// Access level stored on a user record.
///
/// Anything other than `"admin"` is read as a plain customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    Customer,
}

impl Role {
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    fn is_customer(&self) -> bool {
        matches!(self, Self::Customer)
    }

    /// Value persisted in storage; customers have no stored role.
    #[must_use]
    pub fn as_stored(self) -> Option<&'static str> {
        match self {
            Self::Customer => None,
            Self::Admin => Some("admin"),
        }
    }

    /// Inverse of [`Role::as_stored`].
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Self::Admin,
            _ => Self::Customer,
        }
    }
}

/// A registered user, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Role::is_customer")]
    pub role: Role,
    /// Profile fields (name, phone, address, …) stored verbatim.
    #[serde(flatten)]
    pub profile: ExtraFields,
}

impl User {
    /// Keys a profile payload may never set directly.
    pub const RESERVED_KEYS: [&'static str; 3] = ["email", "role", "_id"];

    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Role::Customer,
            profile: ExtraFields::new(),
        }
    }
}

/// The subject asserted by a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

impl Identity {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// An authenticated caller with the role loaded from storage for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub email: String,
    pub role: Role,
}

impl Caller {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this caller may read or act on records owned by `owner_email`.
    #[must_use]
    pub fn can_access(&self, owner_email: &str) -> bool {
        self.is_admin() || self.email == owner_email
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] unless the caller owns the record or
    /// is an admin.
    pub fn require_access(&self, owner_email: &str) -> Result<(), AuthError> {
        if self.can_access(owner_email) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}
