// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage collaborators and their in-memory implementations.
//!
//! Persistence is not part of this crate. Whatever owns the database
//! implements [`CredentialStore`] and [`ResourceStore`]; the in-memory
//! versions here back the tests and embedded use.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use miniblog_common::{PrincipalId, ResourceId, ResourceKind, ResourceRef, UserView};
use parking_lot::RwLock;
use thiserror::Error;

/// Stored credentials for one user
#[derive(Clone)]
pub struct CredentialRecord {
    pub id: PrincipalId,
    pub username: String,
    pub email: String,
    /// PHC string; carries algorithm, parameters and salt
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// The public view, without the hash
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// A credential record that has not been assigned an id yet
#[derive(Clone)]
pub struct NewCredential {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Which unique field a rejected insert collided on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
}

/// Errors reported by storage collaborators
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate {0:?}")]
    Duplicate(UniqueField),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Lookup and creation of user credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by exact email
    async fn find_by_email(&self, email: &str) -> Result<CredentialRecord, StoreError>;

    /// Create a user; email and username must both be unused
    async fn create(&self, record: NewCredential) -> Result<CredentialRecord, StoreError>;
}

/// Lookup of resource ownership links
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// The principal recorded as creator of `resource`
    async fn owner_of(&self, resource: ResourceRef) -> Result<PrincipalId, StoreError>;
}

#[derive(Default)]
struct CredentialTable {
    by_id: HashMap<PrincipalId, CredentialRecord>,
    by_email: HashMap<String, PrincipalId>,
    by_username: HashMap<String, PrincipalId>,
}

/// In-memory credential store.
///
/// Ids come from a monotonic counter starting at 1 and are never reused.
#[derive(Clone)]
pub struct MemoryCredentialStore {
    table: Arc<RwLock<CredentialTable>>,
    next_id: Arc<AtomicU64>,
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(CredentialTable::default())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.table.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a user. Their id is retired, not recycled.
    pub fn remove(&self, id: PrincipalId) -> Option<CredentialRecord> {
        let mut table = self.table.write();
        let record = table.by_id.remove(&id)?;
        table.by_email.remove(&record.email);
        table.by_username.remove(&record.username);
        Some(record)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<CredentialRecord, StoreError> {
        let table = self.table.read();
        table
            .by_email
            .get(email)
            .and_then(|id| table.by_id.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, record: NewCredential) -> Result<CredentialRecord, StoreError> {
        let mut table = self.table.write();
        if table.by_email.contains_key(&record.email) {
            return Err(StoreError::Duplicate(UniqueField::Email));
        }
        if table.by_username.contains_key(&record.username) {
            return Err(StoreError::Duplicate(UniqueField::Username));
        }

        let id = PrincipalId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let stored = CredentialRecord {
            id,
            username: record.username,
            email: record.email,
            password_hash: record.password_hash,
            created_at: Utc::now(),
        };
        table.by_email.insert(stored.email.clone(), id);
        table.by_username.insert(stored.username.clone(), id);
        table.by_id.insert(id, stored.clone());
        Ok(stored)
    }
}

/// Ownership link recorded at creation time
#[derive(Debug, Clone, Copy)]
struct OwnershipLink {
    owner: PrincipalId,
    /// Parent article, for comments
    article: Option<ResourceId>,
}

/// In-memory ownership registry for articles and comments.
///
/// Links are written once at creation and never reassigned.
#[derive(Clone, Default)]
pub struct MemoryResourceStore {
    links: Arc<DashMap<ResourceRef, OwnershipLink>>,
    next_article: Arc<AtomicU64>,
    next_comment: Arc<AtomicU64>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(counter: &AtomicU64) -> ResourceId {
        ResourceId(counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Record a new article owned by `owner`
    pub fn create_article(&self, owner: PrincipalId) -> ResourceRef {
        let resource = ResourceRef {
            kind: ResourceKind::Article,
            id: Self::next_id(&self.next_article),
        };
        self.links.insert(resource, OwnershipLink { owner, article: None });
        resource
    }

    /// Record a new comment on `article`; the article must exist
    pub fn create_comment(&self, article: ResourceId, owner: PrincipalId) -> Result<ResourceRef, StoreError> {
        let parent = ResourceRef { kind: ResourceKind::Article, id: article };
        if !self.links.contains_key(&parent) {
            return Err(StoreError::NotFound);
        }

        let resource = ResourceRef {
            kind: ResourceKind::Comment,
            id: Self::next_id(&self.next_comment),
        };
        self.links.insert(resource, OwnershipLink { owner, article: Some(article) });
        Ok(resource)
    }

    /// The article a comment belongs to
    pub fn article_of(&self, comment: ResourceRef) -> Option<ResourceId> {
        self.links.get(&comment).and_then(|link| link.article)
    }

    /// Forget a resource. Deleting an article also drops its comments.
    pub fn remove(&self, resource: ResourceRef) -> bool {
        let removed = self.links.remove(&resource).is_some();
        if removed && resource.kind == ResourceKind::Article {
            self.links.retain(|_, link| link.article != Some(resource.id));
        }
        removed
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn owner_of(&self, resource: ResourceRef) -> Result<PrincipalId, StoreError> {
        self.links
            .get(&resource)
            .map(|link| link.owner)
            .ok_or(StoreError::NotFound)
    }
}
