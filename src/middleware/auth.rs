use std::future::{Ready, ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, dev::Payload, dev::ServiceRequest, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::{error, warn};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub exp: usize,
}

/// The verified caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: ObjectId,
}

/// Checks and issues HS256 bearer tokens. Shared as `web::Data<TokenVerifier>`.
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenVerifier {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        TokenVerifier {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::hours(ttl_hours),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_hours)
    }

    pub fn verify(&self, token: &str) -> Result<Identity, CustomError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| CustomError::UnauthenticatedError(format!("Invalid token: {}", e)))?;

        let user_id = ObjectId::parse_str(&token_data.claims.id).map_err(|_| {
            CustomError::UnauthenticatedError("Invalid user id in token".to_string())
        })?;

        Ok(Identity { user_id })
    }

    /// Sign a token for `user_id`, expiring after the configured lifetime.
    pub fn issue(&self, user_id: &ObjectId) -> Result<String, CustomError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| CustomError::ValidationError("Token lifetime out of range".into()))?
            .timestamp() as usize;

        let claims = Claims {
            id: user_id.to_hex(),
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CustomError::ValidationError(format!("Token generation failed: {}", e)))
    }
}

/// Bearer validator for `HttpAuthentication::bearer`. Stores the `Identity` on success.
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let verifier = match req.app_data::<web::Data<TokenVerifier>>() {
        Some(verifier) => verifier.clone(),
        None => {
            error!("TokenVerifier missing from app data");
            let err = CustomError::UnauthenticatedError("Token verification unavailable".into());
            return Err((err.into(), req));
        }
    };

    match verifier.verify(credentials.token()) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            Ok(req)
        }
        Err(err) => {
            warn!("Rejected token for {} {}: {}", req.method(), req.path(), err);
            Err((err.into(), req))
        }
    }
}

impl FromRequest for Identity {
    type Error = CustomError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .copied()
                .ok_or_else(|| CustomError::UnauthenticatedError("Not authenticated".into())),
        )
    }
}
