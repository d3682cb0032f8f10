// ================
// common/src/lib.rs
// ================
//! Common types shared between the mini-blog backend and its callers.
//! This module defines identifiers, request bodies and the public views
//! exchanged at the authentication boundary.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an authenticated actor.
///
/// Assigned when the user record is created and never reused. Zero is not a
/// valid principal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PrincipalId(pub u64);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of an article or comment
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kinds of mutable, owned resources
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Article,
    Comment,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Article => f.write_str("article"),
            ResourceKind::Comment => f.write_str("comment"),
        }
    }
}

/// A reference to a specific owned resource
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: ResourceId,
}

impl ResourceRef {
    pub const fn article(id: u64) -> Self {
        Self { kind: ResourceKind::Article, id: ResourceId(id) }
    }

    pub const fn comment(id: u64) -> Self {
        Self { kind: ResourceKind::Comment, id: ResourceId(id) }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Mutating actions that require ownership
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Update => f.write_str("update"),
            Action::Delete => f.write_str("delete"),
        }
    }
}

/// Registration request body
/// # Fields
/// * `username` - Unique display name (max 100 chars)
/// * `email` - Unique email address (max 255 chars)
/// * `password` - Plaintext password (min 6 chars)
#[derive(Serialize, Deserialize, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request body
#[derive(Serialize, Deserialize, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

// Request bodies carry plaintext passwords, so Debug is written by hand.
impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public view of a user, safe to return to any client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: PrincipalId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Response to a successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
    /// The authenticated user
    pub user: UserView,
}
