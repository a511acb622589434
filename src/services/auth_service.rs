use sqlx::SqlitePool;
use tracing::info;

use crate::auth::{self, Claims};
use crate::config;
use crate::database::models::UserSummary;
use crate::database::users::UserStore;
use crate::error::ApiError;

/// Registration and login. Passwords are bcrypt-hashed before storage and
/// never leave this module in plaintext.
#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
}

/// Successful login result: a signed bearer token plus the identity summary.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserSummary,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserStore::new(pool),
        }
    }

    pub async fn register(
        &self,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<UserSummary, ApiError> {
        let (name, email, password) = match (
            non_empty(name),
            non_empty(email),
            non_empty(password),
        ) {
            (Some(n), Some(e), Some(p)) => (n, e, p),
            _ => {
                return Err(ApiError::validation(
                    "Name, email, and password are required",
                ))
            }
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict("User with this email already exists"));
        }

        let hash = hash_password(password).await?;
        let user = self.users.create(&name, &email, &hash).await?;

        info!("Registered user {} ({})", user.id, user.email);
        Ok(UserSummary::from(&user))
    }

    pub async fn login(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<LoginOutcome, ApiError> {
        let (email, password) = match (non_empty(email), non_empty(password)) {
            (Some(e), Some(p)) => (e, p),
            _ => return Err(ApiError::validation("Email and password are required")),
        };

        // Unknown email and wrong password must be indistinguishable
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::auth("Invalid email or password"))?;

        if !verify_password(password, user.password.clone()).await? {
            return Err(ApiError::auth("Invalid email or password"));
        }

        let claims = Claims::new(user.id, user.name.clone(), user.email.clone());
        let token = auth::generate_jwt(&claims)?;

        info!("User {} logged in", user.id);
        Ok(LoginOutcome {
            token,
            user: UserSummary::from(&user),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// bcrypt is intentionally slow; keep it off the async worker threads.
async fn hash_password(password: String) -> Result<String, ApiError> {
    let cost = config::config().security.bcrypt_cost;
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::internal("Internal server error", e.to_string()))?
        .map_err(ApiError::from)
}

async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::internal("Internal server error", e.to_string()))?
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_service() -> AuthService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        crate::database::migrate(&pool).await.expect("migrate");
        AuthService::new(pool)
    }

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let service = test_service().await;

        let user = service
            .register(s("A"), s("a@x.com"), s("pw1"))
            .await
            .expect("register");
        assert_eq!(user.email, "a@x.com");

        let outcome = service.login(s("a@x.com"), s("pw1")).await.expect("login");
        assert_eq!(outcome.user.id, user.id);
        assert!(!outcome.token.is_empty());
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let service = test_service().await;
        service
            .register(s("A"), s("a@x.com"), s("pw1"))
            .await
            .expect("register");

        let stored = service
            .users
            .find_by_email("a@x.com")
            .await
            .expect("query")
            .expect("user");
        assert_ne!(stored.password, "pw1");
        assert!(stored.password.starts_with("$2"));
    }

    #[tokio::test]
    async fn register_requires_all_fields() {
        let service = test_service().await;

        for (name, email, password) in [
            (None, s("a@x.com"), s("pw")),
            (s("A"), None, s("pw")),
            (s("A"), s("a@x.com"), None),
            (s(""), s("a@x.com"), s("pw")),
        ] {
            let err = service.register(name, email, password).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let service = test_service().await;
        service
            .register(s("A"), s("a@x.com"), s("pw1"))
            .await
            .expect("register");

        let err = service
            .register(s("B"), s("a@x.com"), s("pw2"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "User with this email already exists");
    }

    #[tokio::test]
    async fn bad_credentials_use_one_generic_message() {
        let service = test_service().await;
        service
            .register(s("A"), s("a@x.com"), s("pw1"))
            .await
            .expect("register");

        let wrong_password = service.login(s("a@x.com"), s("nope")).await.unwrap_err();
        let unknown_email = service.login(s("b@x.com"), s("pw1")).await.unwrap_err();

        assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.message(), unknown_email.message());
        assert_eq!(wrong_password.message(), "Invalid email or password");
    }
}
