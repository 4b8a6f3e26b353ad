use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::{db, PGPool};

/// Session issuance settings, read once at startup and injected everywhere
/// a token is signed or verified.
#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_secs: usize,
}

/// The verified actor identity, inserted by `AuthMiddleware` and extracted
/// by handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| {
                    ApiError::authentication("authentication required, please login first")
                }),
        )
    }
}

pub fn parse_bearer(header_value: Option<&str>) -> Option<&str> {
    header_value?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub struct AuthMiddleware {
    db_pool: PGPool,
    session: SessionConfig,
}

impl AuthMiddleware {
    pub fn new(db_pool: PGPool, session: SessionConfig) -> Self {
        Self { db_pool, session }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            db_pool: self.db_pool.clone(),
            session: self.session.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    db_pool: PGPool,
    session: SessionConfig,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let pool = self.db_pool.clone();
        let secret = self.session.secret.clone();
        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let token = parse_bearer(header_value.as_deref())
                .ok_or_else(|| ApiError::authentication("access denied, no token provided"))?;
            let claims = jwt::verify(token, secret.as_bytes())?;

            // Token could have been minted for an identity this database has
            // never seen (e.g. another environment's secret reuse), so the
            // actor is resolved against storage before the request proceeds.
            let user = db::user::find_by_id(claims.user_id, &pool)
                .await
                .map_err(ApiError::from)?
                .ok_or_else(|| ApiError::authentication("invalid token, user not found"))?;

            req.extensions_mut().insert(AuthenticatedUser {
                user_id: user.id,
                email: user.email,
            });
            service.call(req).await
        })
    }
}

pub mod jwt {
    use chrono::Utc;
    use jsonwebtoken::{
        decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
    };
    use uuid::Uuid;

    use super::SessionConfig;
    use crate::dto::Claims;
    use crate::errors::ApiError;

    pub fn sign(user_id: Uuid, email: &str, session: &SessionConfig) -> Result<String, ApiError> {
        let exp = Utc::now().timestamp() as usize + session.ttl_secs;
        sign_claims(&Claims::new(user_id, email, exp), session.secret.as_bytes())
    }

    pub fn sign_claims(claims: &Claims, secret: &[u8]) -> Result<String, ApiError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|err| {
            log::error!("token signing failed: {:?}", err);
            ApiError::Internal
        })
    }

    pub fn verify(token: &str, secret: &[u8]) -> Result<Claims, ApiError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => {
                    ApiError::authentication("token expired, please login again")
                }
                _ => ApiError::authentication("invalid token, please login again"),
            })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn session() -> SessionConfig {
            SessionConfig {
                secret: "test-secret".into(),
                ttl_secs: 3600,
            }
        }

        #[test]
        fn sign_then_verify_returns_the_claims() {
            let session = session();
            let user_id = Uuid::new_v4();
            let token = sign(user_id, "a@b.io", &session).unwrap();
            let claims = verify(&token, session.secret.as_bytes()).unwrap();
            assert_eq!(claims.user_id, user_id);
            assert_eq!(claims.email, "a@b.io");
        }

        #[test]
        fn expired_token_is_an_authentication_error() {
            let exp = Utc::now().timestamp() as usize - 7200;
            let claims = Claims::new(Uuid::new_v4(), "a@b.io", exp);
            let token = sign_claims(&claims, b"test-secret").unwrap();
            let err = verify(&token, b"test-secret").unwrap_err();
            assert!(matches!(err, ApiError::Authentication(_)));
            assert!(err.to_string().contains("expired"));
        }

        #[test]
        fn token_signed_with_another_secret_is_rejected() {
            let token = sign(Uuid::new_v4(), "a@b.io", &session()).unwrap();
            assert!(verify(&token, b"other-secret").is_err());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_parsed() {
        assert_eq!(parse_bearer(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_malformed_header_yields_none() {
        assert_eq!(parse_bearer(None), None);
        assert_eq!(parse_bearer(Some("abc.def.ghi")), None);
        assert_eq!(parse_bearer(Some("Basic abc")), None);
        assert_eq!(parse_bearer(Some("Bearer ")), None);
    }
}
