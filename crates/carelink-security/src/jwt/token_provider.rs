//! JWT token provider for issuing and validating access tokens.

use super::Claims;
use carelink_config::SecurityConfig;
use carelink_core::{CarelinkError, CarelinkResult, Interface, ProfileId};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, warn};

/// Token operations the request gate depends on.
pub trait TokenProviderInterface: Interface + Send + Sync {
    /// Validates an access token and returns its claims.
    fn validate_access_token(&self, token: &str) -> CarelinkResult<Claims>;

    /// Issues an access token for the given identity.
    fn issue_access_token(&self, profile_id: &ProfileId) -> CarelinkResult<String>;
}

/// HS256 token provider.
#[derive(Component, Clone)]
#[shaku(interface = TokenProviderInterface)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Converts into Shaku component parameters.
    #[must_use]
    pub fn into_parameters(self) -> TokenProviderParameters {
        TokenProviderParameters {
            encoding_key: self.encoding_key,
            decoding_key: self.decoding_key,
            config: self.config,
            validation: self.validation,
        }
    }

    fn encode_claims(&self, claims: &Claims) -> CarelinkResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| CarelinkError::Internal(format!("Failed to generate access token: {}", e)))
    }
}

impl TokenProviderInterface for TokenProvider {
    fn validate_access_token(&self, token: &str) -> CarelinkResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                warn!("Token validation failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => CarelinkError::TokenExpired,
                    ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                        CarelinkError::InvalidToken("Invalid token signature".to_string())
                    }
                    ErrorKind::InvalidIssuer => {
                        CarelinkError::InvalidToken("Invalid token issuer".to_string())
                    }
                    ErrorKind::InvalidAudience => {
                        CarelinkError::InvalidToken("Invalid token audience".to_string())
                    }
                    _ => CarelinkError::InvalidToken(e.to_string()),
                }
            })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(CarelinkError::InvalidToken("Token has no subject".to_string()));
        }

        Ok(token_data.claims)
    }

    fn issue_access_token(&self, profile_id: &ProfileId) -> CarelinkResult<String> {
        let ttl = i64::try_from(self.config.jwt_access_expiration_secs).unwrap_or(i64::MAX);
        let expires_at = Utc::now() + Duration::seconds(ttl);

        let claims = Claims::new_access(
            profile_id,
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            expires_at,
        );

        let token = self.encode_claims(&claims)?;
        debug!("Issued access token for profile {}", profile_id);
        Ok(token)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}
