/// HTTP middleware for blog-service
///
/// Identity arrives as an HS256 bearer token minted by the external identity
/// provider. `IdentityMiddleware` runs on every route and records the caller
/// in request extensions when a valid token is present; it never rejects.
/// `RequireAuth` gates the mutating routes and answers unauthenticated
/// requests with a redirect to the login URL carrying the original path as
/// `next`.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{header, StatusCode};
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use chrono::Utc;
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

/// Extracted user identifier stored in request extensions after auth.
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

/// The possibly-absent acting identity for public routes.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<Uuid>);

/// Bearer token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Validate a token and extract the caller's user id.
pub fn decode_user_id(token: &str, secret: &str) -> Option<Uuid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .ok()?;

    Uuid::parse_str(&data.claims.sub).ok()
}

/// Mint a token for `user_id`. Used by the dev tooling and tests; the
/// production issuer lives in the identity provider.
pub fn issue_token(user_id: Uuid, secret: &str, ttl_secs: i64) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: Utc::now().timestamp() + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("HS256 signing cannot fail with a valid secret")
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

// =====================================================================
// Identity middleware (observe-only)
// =====================================================================

/// Records the caller in request extensions when a valid bearer token is
/// present. Never rejects; the auth gate is `RequireAuth`.
pub struct IdentityMiddleware {
    secret: Rc<String>,
}

impl IdentityMiddleware {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Rc::new(secret.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let secret = self.secret.clone();

        Box::pin(async move {
            if let Some(user_id) = bearer_token(&req).and_then(|t| decode_user_id(t, &secret)) {
                req.extensions_mut().insert(UserId(user_id));
            }

            service.call(req).await
        })
    }
}

// =====================================================================
// Auth gate
// =====================================================================

/// Error that renders as a redirect to the login page, carrying the
/// originally requested path as the return target.
#[derive(Debug, thiserror::Error)]
#[error("authentication required")]
pub struct AuthRedirect {
    login_url: String,
    next: String,
}

impl actix_web::error::ResponseError for AuthRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        let location = format!("{}?next={}", self.login_url, urlencoding::encode(&self.next));
        HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish()
    }
}

/// Rejects requests with no extracted identity by redirecting to login.
/// Must run after `IdentityMiddleware` has populated the extensions.
pub struct RequireAuth {
    login_url: Rc<String>,
}

impl RequireAuth {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            login_url: Rc::new(login_url.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService {
            service: Rc::new(service),
            login_url: self.login_url.clone(),
        }))
    }
}

pub struct RequireAuthService<S> {
    service: Rc<S>,
    login_url: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let login_url = self.login_url.clone();

        Box::pin(async move {
            if req.extensions().get::<UserId>().is_none() {
                return Err(AuthRedirect {
                    login_url: login_url.as_str().to_string(),
                    next: req.path().to_string(),
                }
                .into());
            }

            service.call(req).await
        })
    }
}

// =====================================================================
// Extractors
// =====================================================================

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("User ID missing")),
        )
    }
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(Viewer(req.extensions().get::<UserId>().map(|u| u.0))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_recovers_user_id() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "test-secret", 60);
        assert_eq!(decode_user_id(&token, "test-secret"), Some(user_id));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(Uuid::new_v4(), "test-secret", 60);
        assert_eq!(decode_user_id(&token, "other-secret"), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token(Uuid::new_v4(), "test-secret", -120);
        assert_eq!(decode_user_id(&token, "test-secret"), None);
    }
}
