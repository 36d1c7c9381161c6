//! User records.
//!
//! A user is `{userId, name}` stored under its `userId` in the users table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::ServiceError;
use crate::store::{RecordStore, StoreError};

/// A stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: String,
    pub name: String,
}

impl UserRecord {
    /// Validate a request object: `userId` then `name` must be strings.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ServiceError> {
        let user_id = match fields.get("userId") {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(ServiceError::Validation("userId")),
        };
        let name = match fields.get("name") {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(ServiceError::Validation("name")),
        };

        Ok(Self { user_id, name })
    }
}

/// Reads and writes user records in one table of the record store.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn RecordStore>,
    table: String,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn RecordStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Write a user, replacing any existing record with the same id.
    pub async fn create(&self, user: UserRecord) -> Result<UserRecord, ServiceError> {
        let value = serde_json::to_value(&user)
            .map_err(StoreError::from)
            .map_err(ServiceError::storage("Could not create user"))?;

        self.store
            .put(&self.table, &user.user_id, value)
            .await
            .map_err(ServiceError::storage("Could not create user"))?;

        info!(user_id = %user.user_id, "user_created");

        Ok(user)
    }

    /// Fetch a user by id.
    pub async fn get(&self, user_id: &str) -> Result<UserRecord, ServiceError> {
        let value = self
            .store
            .get(&self.table, user_id)
            .await
            .map_err(ServiceError::storage("Failed to retrieve user"))?
            .ok_or(ServiceError::UserNotFound)?;

        serde_json::from_value(value)
            .map_err(StoreError::from)
            .map_err(ServiceError::storage("Failed to retrieve user"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_from_fields_valid() {
        let user = UserRecord::from_fields(&object(json!({"userId": "u1", "name": "Ada"}))).unwrap();
        assert_eq!(user.user_id, "u1");
        assert_eq!(user.name, "Ada");
    }

    #[test]
    fn test_from_fields_checks_user_id_first() {
        let err = UserRecord::from_fields(&Map::new()).unwrap_err();
        assert!(matches!(err, ServiceError::Validation("userId")));
    }

    #[test]
    fn test_from_fields_non_string_name() {
        let err = UserRecord::from_fields(&object(json!({"userId": "u1", "name": 3}))).unwrap_err();
        assert!(matches!(err, ServiceError::Validation("name")));
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let users = UserDirectory::new(Arc::new(MemoryStore::new()), "users");
        let user = UserRecord {
            user_id: "u1".to_string(),
            name: "Ada".to_string(),
        };

        users.create(user.clone()).await.unwrap();

        assert_eq!(users.get("u1").await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let users = UserDirectory::new(Arc::new(MemoryStore::new()), "users");
        let err = users.get("missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound));
    }
}
