//! Link entity as seen by the click pipeline.

use chrono::{DateTime, Utc};

/// A shortened URL.
///
/// Creation, editing and blocking are handled by the link-management side of
/// the service; the click pipeline only resolves a hash to a link and then
/// refers to it by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub hash: String,
    pub url: String,
    pub is_blocked: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        hash: String,
        url: String,
        is_blocked: bool,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            hash,
            url,
            is_blocked,
            deleted_at,
        }
    }

    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
