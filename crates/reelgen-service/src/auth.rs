//! Authentication middleware and extractors.
//!
//! This module provides extractors for:
//! - `AuthUser` - End-user authentication via JWT bearer token
//! - `AdminAuth` - Admin authentication for the billing system's profile
//!   writes
//!
//! Credential issuance happens elsewhere; this service only validates the
//! already-issued identity.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use reelgen_core::UserId;

use crate::crypto::constant_time_eq;
use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims expected from the identity provider.
#[derive(Debug, Deserialize)]
struct Claims {
    /// Subject: the user ID.
    sub: String,

    /// Audience.
    #[allow(dead_code)]
    aud: String,

    /// Expiry (validated by jsonwebtoken).
    #[allow(dead_code)]
    exp: usize,
}

/// An authenticated user extracted from a JWT bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,

    /// The raw subject claim from the JWT.
    pub subject: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // Extract the Authorization header
            let auth_header = parts
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            // Extract the Bearer token
            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(ApiError::Unauthorized)?;

            // Allow test tokens in testing only.
            // This bypass is gated behind #[cfg(test)] or the "test-auth" feature
            // to ensure it is never active in production builds.
            #[cfg(any(test, feature = "test-auth"))]
            if let Some(user_id_str) = token.strip_prefix("test-token:") {
                let user_id = user_id_str
                    .parse::<UserId>()
                    .map_err(|_| ApiError::Unauthorized)?;

                return Ok(AuthUser {
                    user_id,
                    subject: user_id_str.to_string(),
                });
            }

            // Validate the JWT against the shared secret
            let claims = validate_jwt(token, state)?;

            let user_id = claims
                .sub
                .parse::<UserId>()
                .map_err(|_| ApiError::Unauthorized)?;

            Ok(AuthUser {
                user_id,
                subject: claims.sub,
            })
        })
    }
}

/// Decode and validate an HS256 JWT.
fn validate_jwt(token: &str, state: &AppState) -> Result<Claims, ApiError> {
    if state.config.auth_jwt_secret.is_empty() {
        tracing::error!("AUTH_JWT_SECRET is not configured; rejecting bearer token");
        return Err(ApiError::Unauthorized);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[state.config.auth_audience.as_str()]);

    let key = DecodingKey::from_secret(state.config.auth_jwt_secret.as_bytes());
    let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        ApiError::Unauthorized
    })?;

    Ok(data.claims)
}

/// Admin authentication via API key.
///
/// Used by the external billing system to write subscription profiles.
#[derive(Debug, Clone)]
pub struct AdminAuth;

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let api_key = parts
                .headers
                .get("x-admin-key")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            let expected_key = state
                .config
                .admin_api_key
                .as_ref()
                .ok_or(ApiError::Unauthorized)?;

            if !constant_time_eq(api_key, expected_key) {
                return Err(ApiError::Unauthorized);
            }

            Ok(AdminAuth)
        })
    }
}
