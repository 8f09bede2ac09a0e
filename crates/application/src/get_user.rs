//! User lookup: query, service, handler, and read-model response.

use std::sync::Arc;

use async_trait::async_trait;
use bus::{Query, QueryHandler};
use chrono::{DateTime, Utc};
use domain::{DomainError, User, UserId, UserRepository};
use serde::{Deserialize, Serialize};

/// Intent to read a user by id.
#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub id: String,
}

impl Query for GetUserQuery {
    type Response = GetUserResponse;
}

/// Read-model projection of a user.
#[derive(Debug, Clone, PartialEq)]
pub struct GetUserResponse {
    id: String,
    email: String,
    name: String,
    is_email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GetUserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().value().to_string(),
            email: user.email().value().to_string(),
            name: user.name().value().to_string(),
            is_email_verified: user.is_email_verified().value(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_email_verified(&self) -> bool {
        self.is_email_verified
    }

    /// Converts to the transport-neutral representation.
    pub fn to_dto(&self) -> UserDto {
        UserDto {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            is_email_verified: self.is_email_verified,
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }
}

/// Serializable data-transfer representation of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_email_verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Looks a user up and projects it into a response.
pub struct GetUserService {
    users: Arc<dyn UserRepository>,
}

impl GetUserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Returns `Ok(None)` when no user with the id exists. An id that is
    /// not a well-formed identifier is a validation failure instead.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<GetUserResponse>, DomainError> {
        let user_id = UserId::new(id)?;
        let user = self.users.find_by_id(&user_id).await?;

        metrics::counter!("user_queries_total").increment(1);
        Ok(user.as_ref().map(GetUserResponse::from_user))
    }
}

/// Adapts [`GetUserService`] onto the query bus.
pub struct GetUserQueryHandler {
    service: GetUserService,
}

impl GetUserQueryHandler {
    pub fn new(service: GetUserService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl QueryHandler<GetUserQuery> for GetUserQueryHandler {
    async fn handle(&self, query: GetUserQuery) -> Result<Option<GetUserResponse>, DomainError> {
        self.service.get(&query.id).await
    }
}
