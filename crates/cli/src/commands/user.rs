//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! stockroom-cli user create -e owner@acme.com -n "Acme Tools" -p <password>
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use sqlx::PgPool;
use thiserror::Error;

use stockroom_server::services::AuthService;
use stockroom_server::services::auth::AuthError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Registration failed.
    #[error("Registration error: {0}")]
    Auth(#[from] AuthError),
}

/// Create a new account.
///
/// # Errors
///
/// Returns `UserError` if `DATABASE_URL` is unset, the connection fails,
/// or registration is rejected (bad email, weak password, duplicate).
pub async fn create(email: &str, name: &str, password: &str) -> Result<(), UserError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| UserError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let user = AuthService::new(&pool).register(email, name, password).await?;

    tracing::info!(user = %user.id, email = %user.email, "Account created");
    Ok(())
}
