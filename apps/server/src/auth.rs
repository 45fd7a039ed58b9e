use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use argon2::{
    password_hash::{Error as PasswordHashError, PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use fundbook_core::errors::Error as CoreError;
use fundbook_core::identity::{IdentityProviderTrait, RequestContext, Role, UserIdentity};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ApiResult;
use crate::main_lib::AppState;

/// One entry of the users file. `passwordHash` is an argon2 PHC string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub fund: String,
}

/// Users allowed to sign in, loaded once at startup.
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    pub fn from_records(records: Vec<UserRecord>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        for user in &records {
            if user.username.trim().is_empty() {
                anyhow::bail!("User entries need a username");
            }
            if !seen.insert(user.username.as_str()) {
                anyhow::bail!("User '{}' is listed twice", user.username);
            }
            if user.fund.trim().is_empty() {
                anyhow::bail!("User '{}' has no assigned fund", user.username);
            }
            PasswordHash::new(&user.password_hash).map_err(|e| {
                anyhow::anyhow!("Invalid password hash for '{}': {e}", user.username)
            })?;
        }
        Ok(Self { users: records })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read users file {}", path.display()))?;
        let records: Vec<UserRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse users file {}", path.display()))?;
        Self::from_records(records)
    }
}

fn identity_of(user: &UserRecord) -> UserIdentity {
    UserIdentity {
        username: user.username.clone(),
        role: user.role,
        assigned_fund: user.fund.trim().to_string(),
    }
}

impl IdentityProviderTrait for UserDirectory {
    fn authenticate(&self, username: &str, credential: &str) -> fundbook_core::Result<UserIdentity> {
        let user = self
            .users
            .iter()
            .find(|u| u.username == username)
            .ok_or(CoreError::InvalidCredentials)?;
        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| CoreError::Unexpected(format!("Invalid password hash: {e}")))?;
        Argon2::default()
            .verify_password(credential.as_bytes(), &parsed)
            .map_err(|err| match err {
                PasswordHashError::Password => CoreError::InvalidCredentials,
                other => CoreError::Unexpected(format!("Password verification failed: {other}")),
            })?;
        Ok(identity_of(user))
    }

    fn list_identities(&self) -> Vec<UserIdentity> {
        self.users.iter().map(identity_of).collect()
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
}

/// Signs and checks session tokens.
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("{0}")]
    Internal(String),
}

impl From<CoreError> for AuthError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCredentials => AuthError::InvalidCredentials,
            other => AuthError::Internal(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    sub: String,
    role: Role,
    fund: String,
    active_fund: String,
    exp: usize,
    iat: usize,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub session: RequestContext,
}

#[derive(Deserialize)]
pub struct SwitchFundRequest {
    pub fund: String,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            validation,
            token_ttl: config.access_token_ttl,
        }
    }

    pub fn issue_token(&self, ctx: &RequestContext) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.token_ttl;
        let claims = Claims {
            sub: ctx.username.clone(),
            role: ctx.role,
            fund: ctx.assigned_fund.clone(),
            active_fund: ctx.active_fund.clone(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Rebuilds the caller's context from a token.
    pub fn validate_token(&self, token: &str) -> Result<RequestContext, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_)
                | jsonwebtoken::errors::ErrorKind::Json(_) => AuthError::Unauthorized,
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            },
        )?;
        let claims = data.claims;
        Ok(RequestContext {
            username: claims.sub,
            role: claims.role,
            assigned_fund: claims.fund,
            active_fund: claims.active_fund,
        })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }

    fn respond(&self, session: RequestContext) -> Result<LoginResponse, AuthError> {
        Ok(LoginResponse {
            access_token: self.issue_token(&session)?,
            token_type: "Bearer".to_string(),
            expires_in: self.expires_in().as_secs(),
            session,
        })
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Unauthorized | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

#[utoipa::path(post, path = "/api/v1/auth/login", responses((status = 200, description = "Session token"), (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let identity = state
        .identity_provider
        .authenticate(payload.username.trim(), &payload.password)
        .inspect_err(|_| tracing::warn!(username = %payload.username, "Login rejected"))?;
    tracing::info!(username = %identity.username, fund = %identity.assigned_fund, "Login succeeded");
    let session = RequestContext::from_identity(identity);
    Ok(Json(state.auth.respond(session)?))
}

#[utoipa::path(get, path = "/api/v1/session", responses((status = 200, description = "Current session")))]
pub async fn get_session(Extension(ctx): Extension<RequestContext>) -> Json<RequestContext> {
    Json(ctx)
}

/// Moves an administrator's session to another fund and reissues the token.
#[utoipa::path(post, path = "/api/v1/session/switch-fund", responses((status = 200, description = "Token for the new fund"), (status = 403, description = "Read-only user")))]
pub async fn switch_fund(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<SwitchFundRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let fund = payload.fund.trim();
    let switched = ctx.switch_fund(fund)?;
    state.fund_service.ensure_fund_exists(fund)?;
    tracing::info!(username = %ctx.username, fund, "Switched active fund");
    Ok(Json(state.auth.respond(switched)?))
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let ctx = state.auth.validate_token(token)?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{password_hash::SaltString, PasswordHasher};
    use rand::rngs::OsRng;

    fn hash(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    fn record(username: &str, role: Role, fund: &str) -> UserRecord {
        UserRecord {
            username: username.to_string(),
            password_hash: hash("pw"),
            role,
            fund: fund.to_string(),
        }
    }

    fn manager() -> AuthManager {
        AuthManager::new(&AuthConfig {
            jwt_secret: vec![7u8; 32],
            access_token_ttl: Duration::from_secs(60),
        })
    }

    #[test]
    fn directory_authenticates_with_argon2() {
        let dir = UserDirectory::from_records(vec![record("ana", Role::ReadOnly, "Alpha")]).unwrap();
        let identity = dir.authenticate("ana", "pw").unwrap();
        assert_eq!(identity.assigned_fund, "Alpha");
        assert_eq!(identity.role, Role::ReadOnly);
        assert!(matches!(
            dir.authenticate("ana", "wrong"),
            Err(CoreError::InvalidCredentials)
        ));
        assert!(matches!(
            dir.authenticate("bob", "pw"),
            Err(CoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn directory_rejects_bad_entries() {
        let mut bad_hash = record("ana", Role::Admin, "Alpha");
        bad_hash.password_hash = "plain".to_string();
        assert!(UserDirectory::from_records(vec![bad_hash]).is_err());

        let dup = vec![
            record("ana", Role::Admin, "Alpha"),
            record("ana", Role::ReadOnly, "Beta"),
        ];
        assert!(UserDirectory::from_records(dup).is_err());

        assert!(UserDirectory::from_records(vec![record("ana", Role::Admin, " ")]).is_err());
    }

    #[test]
    fn users_file_uses_camel_case_roles() {
        let raw = format!(
            r#"[{{"username":"ana","passwordHash":"{}","role":"readOnly","fund":"Alpha"}}]"#,
            hash("pw")
        );
        let records: Vec<UserRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(records[0].role, Role::ReadOnly);
    }

    #[test]
    fn token_round_trips_context() {
        let auth = manager();
        let ctx = RequestContext {
            username: "ana".into(),
            role: Role::Admin,
            assigned_fund: "Alpha".into(),
            active_fund: "Beta".into(),
        };
        let token = auth.issue_token(&ctx).unwrap();
        assert_eq!(auth.validate_token(&token).unwrap(), ctx);
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let other = AuthManager::new(&AuthConfig {
            jwt_secret: vec![9u8; 32],
            access_token_ttl: Duration::from_secs(60),
        });
        let ctx = RequestContext::from_identity(UserIdentity {
            username: "ana".into(),
            role: Role::ReadOnly,
            assigned_fund: "Alpha".into(),
        });
        let token = other.issue_token(&ctx).unwrap();
        assert!(matches!(
            manager().validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn secret_key_must_be_32_bytes() {
        assert_eq!(decode_secret_key(&BASE64.encode([1u8; 32])).unwrap().len(), 32);
        assert_eq!(
            decode_secret_key("abcdefghijklmnopqrstuvwxyz-01234").unwrap().len(),
            32
        );
        assert!(decode_secret_key("").is_err());
        assert!(decode_secret_key(&BASE64.encode([1u8; 16])).is_err());
    }
}
