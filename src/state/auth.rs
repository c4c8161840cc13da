//! Bearer-token resolution for incoming requests.

use std::collections::HashMap;

use crate::{
    config::UserAccount,
    dto::user::{Role, UserSummary},
    error::ServiceError,
};

/// Caller identity attached to the request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub display_name: String,
    pub role: Role,
}

impl AuthUser {
    /// Fail with [`ServiceError::Forbidden`] unless the caller is an admin.
    pub fn ensure_admin(&self) -> Result<(), ServiceError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Player => Err(ServiceError::Forbidden(
                "this action requires an admin account".into(),
            )),
        }
    }
}

impl From<&AuthUser> for UserSummary {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

/// Known accounts indexed by bearer token and by user id.
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    by_token: HashMap<String, AuthUser>,
    by_id: HashMap<String, AuthUser>,
}

impl UserRegistry {
    pub fn from_accounts(accounts: impl IntoIterator<Item = UserAccount>) -> Self {
        let mut registry = Self::default();
        for account in accounts {
            let user = AuthUser {
                id: account.id,
                display_name: account.display_name,
                role: account.role,
            };
            registry.by_id.insert(user.id.clone(), user.clone());
            registry.by_token.insert(account.token, user);
        }
        registry
    }

    /// Resolve the value of an `Authorization` header.
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthUser, ServiceError> {
        let header =
            header.ok_or_else(|| ServiceError::Unauthorized("missing bearer token".into()))?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServiceError::Unauthorized("malformed authorization header".into()))?;

        self.by_token
            .get(token)
            .cloned()
            .ok_or_else(|| ServiceError::Unauthorized("unknown or expired token".into()))
    }

    /// Public identity of a user; unknown ids are shown by id.
    pub fn summary(&self, user_id: &str) -> UserSummary {
        self.by_id
            .get(user_id)
            .map(UserSummary::from)
            .unwrap_or_else(|| UserSummary {
                id: user_id.to_string(),
                display_name: user_id.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}
