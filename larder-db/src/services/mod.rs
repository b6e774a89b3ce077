//! Entity services: CRUD and search per table
//!
//! Each operation is build query -> one round trip -> check error ->
//! map row(s) -> return. No caching, no retries.

pub mod entity;
pub mod influencers;
pub mod recipes;

pub use entity::EntityService;
pub use influencers::InfluencerService;
pub use recipes::RecipeService;

use crate::client::ClientError;

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("failed to {action} {resource} - no data returned")]
    Write {
        resource: &'static str,
        action: &'static str,
    },

    #[error("malformed {resource} row: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DbError::NotFound {
            resource: "influencer",
            id: "abc".into(),
        };
        assert_eq!(err.to_string(), "influencer not found: abc");
        assert!(err.is_not_found());

        let err = DbError::Write {
            resource: "recipe",
            action: "create",
        };
        assert_eq!(err.to_string(), "failed to create recipe - no data returned");
    }

    #[test]
    fn client_errors_pass_through_unchanged() {
        let err: DbError = ClientError::Backend("connection refused".into()).into();
        assert_eq!(err.to_string(), "connection refused");
        assert!(!err.is_not_found());
    }
}
