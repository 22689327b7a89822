/// User directory backed by the user collection of the search index
use super::search_index::{decode_hits, Collection, Predicate, SearchIndex, SearchIndexError};
use crate::models::{SignupRequest, StoredUser};
use crypto_core::{hash_password, verify_password, PasswordError};
use resilience::Deadline;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

const USERNAME_FIELD: &str = "username";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User already exists")]
    AlreadyExists,

    #[error("Failed to hash password: {0}")]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Storage(#[from] SearchIndexError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Wrong username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] SearchIndexError),
}

#[derive(Clone)]
pub struct UserDirectory {
    index: Arc<dyn SearchIndex>,
    deadline: Deadline,
}

impl UserDirectory {
    pub fn new(index: Arc<dyn SearchIndex>, deadline: Deadline) -> Self {
        Self { index, deadline }
    }

    fn username_query(username: &str) -> Predicate {
        Predicate::Term {
            field: USERNAME_FIELD.to_string(),
            value: username.to_string(),
        }
    }

    async fn find(&self, username: &str) -> Result<Vec<serde_json::Value>, SearchIndexError> {
        let predicate = Self::username_query(username);
        Ok(self
            .deadline
            .run(self.index.query(Collection::Users, &predicate))
            .await??)
    }

    pub async fn exists(&self, username: &str) -> Result<bool, SearchIndexError> {
        Ok(!self.find(username).await?.is_empty())
    }

    /// Store a new user keyed by username.
    ///
    /// The existence check and the write are separate calls; two concurrent
    /// signups for the same name can both pass the check.
    pub async fn create(&self, request: &SignupRequest) -> Result<(), UserError> {
        if self.exists(&request.username).await? {
            return Err(UserError::AlreadyExists);
        }

        let user = StoredUser {
            username: request.username.clone(),
            password_hash: hash_password(&request.password)?,
            age: request.age,
            gender: request.gender.clone(),
        };
        let document = serde_json::to_value(&user).map_err(SearchIndexError::from)?;

        self.deadline
            .run(self.index.write(Collection::Users, &user.username, document))
            .await
            .map_err(SearchIndexError::from)??;

        info!(username = %user.username, "User added");
        Ok(())
    }

    pub async fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let users: Vec<StoredUser> = decode_hits(Collection::Users, self.find(username).await?);

        let matched = users.iter().any(|user| {
            user.username == username
                && match verify_password(password, &user.password_hash) {
                    Ok(valid) => valid,
                    Err(e) => {
                        warn!(username, error = %e, "Stored password hash is unreadable");
                        false
                    }
                }
        });

        if matched {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::InMemorySearchIndex;

    fn signup(username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.into(),
            password: password.into(),
            age: 30,
            gender: "female".into(),
        }
    }

    fn directory() -> (Arc<InMemorySearchIndex>, UserDirectory) {
        let index = Arc::new(InMemorySearchIndex::new());
        let users = UserDirectory::new(index.clone(), Deadline::unbounded());
        (index, users)
    }

    #[tokio::test]
    async fn test_create_then_verify() {
        let (_, users) = directory();
        users.create(&signup("alice", "secret")).await.unwrap();

        assert!(users.exists("alice").await.unwrap());
        users.verify("alice", "secret").await.unwrap();
        assert!(matches!(
            users.verify("alice", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            users.verify("nobody", "secret").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_is_rejected() {
        let (index, users) = directory();
        users.create(&signup("bob", "one")).await.unwrap();

        let result = users.create(&signup("bob", "two")).await;
        assert!(matches!(result, Err(UserError::AlreadyExists)));
        assert_eq!(index.documents(Collection::Users).len(), 1);
        users.verify("bob", "one").await.unwrap();
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let (index, users) = directory();
        users.create(&signup("carol", "hunter2")).await.unwrap();

        let stored = index.documents(Collection::Users);
        let doc = &stored[0];
        assert_eq!(doc["username"], "carol");
        assert_eq!(doc["age"], 30);
        assert!(doc.get("password").is_none());
        let hash = doc["password_hash"].as_str().unwrap();
        assert_ne!(hash, "hunter2");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let (index, users) = directory();
        index.fail_queries(true);

        assert!(matches!(
            users.create(&signup("dave", "pw")).await,
            Err(UserError::Storage(_))
        ));
        assert!(matches!(
            users.verify("dave", "pw").await,
            Err(AuthError::Storage(_))
        ));
    }
}
