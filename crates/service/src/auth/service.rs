use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use common::utils::log_sink::LogSink;
use configs::AdminConfig;
use models::auth::{AuthenticatedUser, LoginRequest, LoginResponse};
use models::ResponseDto;
use tracing::{info, instrument, warn};

use super::errors::AuthError;
use super::security::{SecurityService, SALT_LEN};
use super::token::TokenIssuer;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const SERVICE_UNAVAILABLE: &str = "Authentication service unavailable.";
pub const AUTHENTICATED: &str = "Authentication successful.";
pub const AUTHENTICATION_FAILED: &str = "An error occurred during authentication. Please try again later.";

/// Signs in the configured administrator.
pub struct AuthenticationService {
    admin: AdminConfig,
    security: Arc<dyn SecurityService>,
    tokens: TokenIssuer,
    log: Arc<dyn LogSink>,
}

impl AuthenticationService {
    pub fn new(admin: AdminConfig, security: Arc<dyn SecurityService>, tokens: TokenIssuer, log: Arc<dyn LogSink>) -> Self {
        Self { admin, security, tokens, log }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use common::utils::log_sink::TracingLogSink;
    /// use models::auth::LoginRequest;
    /// use service::auth::{Argon2SecurityService, AuthenticationService, SecurityService, TokenIssuer};
    ///
    /// let argon = configs::Argon2Config { memory_kib: 1024, iterations: 1, parallelism: 1, hash_len: 32 };
    /// let security = Arc::new(Argon2SecurityService::new(&argon).unwrap());
    /// let (hash, salt) = security.hash_password("Adm1n!").unwrap();
    /// let admin = configs::AdminConfig { email: "admin@tekus.co".into(), password_hash: hash, password_salt: salt, ..Default::default() };
    /// let svc = AuthenticationService::new(admin, security, TokenIssuer::new("doc-secret", 6.0).unwrap(), Arc::new(TracingLogSink));
    ///
    /// let ok = tokio_test::block_on(svc.login(&LoginRequest { email: " Admin@Tekus.co ".into(), password: "Adm1n!".into() }));
    /// assert!(ok.is_success);
    /// assert_eq!(ok.data.unwrap().token_type, "Bearer");
    /// ```
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest) -> ResponseDto<LoginResponse> {
        match self.authenticate(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(code = err.code(), error = %err, "authentication_error");
                self.log.log(&format!("An error occurred while executing BLL: login: {err}"));
                ResponseDto::failure(AUTHENTICATION_FAILED)
            }
        }
    }

    async fn authenticate(&self, request: &LoginRequest) -> Result<ResponseDto<LoginResponse>, AuthError> {
        if request.email.trim().is_empty() || request.password.trim().is_empty() {
            self.dummy_verify().await?;
            return Ok(ResponseDto::failure(INVALID_CREDENTIALS));
        }
        let admin = &self.admin;
        if admin.email.trim().is_empty() || admin.password_hash.trim().is_empty() || admin.password_salt.trim().is_empty() {
            self.dummy_verify().await?;
            return Ok(ResponseDto::failure(SERVICE_UNAVAILABLE));
        }

        let email_matches = request.email.trim().to_lowercase() == admin.email.trim().to_lowercase();
        let password_matches = if email_matches {
            self.verify(&request.password, &admin.password_hash, &admin.password_salt).await?
        } else {
            self.dummy_verify().await?;
            false
        };
        if !(email_matches && password_matches) {
            return Ok(ResponseDto::failure(INVALID_CREDENTIALS));
        }

        let user = AuthenticatedUser {
            user_id: admin.user_id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            is_active: true,
        };
        let issued = self.tokens.issue(&user, Utc::now())?;
        info!(user_id = user.user_id, "admin_authenticated");
        Ok(ResponseDto::success(
            LoginResponse { token: issued.token, expires_in: issued.expires_in, token_type: "Bearer".into(), user },
            AUTHENTICATED,
        ))
    }

    // derivation is CPU bound; keep it off the async workers
    async fn verify(&self, password: &str, hash: &str, salt: &str) -> Result<bool, AuthError> {
        let security = self.security.clone();
        let (password, hash, salt) = (password.to_string(), hash.to_string(), salt.to_string());
        tokio::task::spawn_blocking(move || security.verify_password(&password, &hash, &salt))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    /// Same derivation cost as a real check, against a throwaway password.
    async fn dummy_verify(&self) -> Result<(), AuthError> {
        let password = uuid::Uuid::new_v4().to_string();
        let salt = STANDARD.encode([0u8; SALT_LEN]);
        let hash = STANDARD.encode([0u8; 32]);
        self.verify(&password, &hash, &salt).await.map(|_| ())
    }
}
