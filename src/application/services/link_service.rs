//! Short link resolution service.

use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use serde_json::json;

/// Resolves short hashes to redirect targets.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Resolves a hash to a live, unblocked link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the hash is empty.
    /// Returns [`AppError::NotFound`] if no live link has this hash.
    /// Returns [`AppError::Forbidden`] if the link is blocked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve(&self, hash: &str) -> Result<Link, AppError> {
        if hash.trim().is_empty() {
            return Err(AppError::bad_request("Hash is required", json!({})));
        }

        let link = self
            .link_repository
            .find_by_hash(hash)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "hash": hash })))?;

        if link.is_blocked {
            return Err(AppError::forbidden(
                "Short link is blocked",
                json!({ "hash": hash }),
            ));
        }

        Ok(link)
    }
}
