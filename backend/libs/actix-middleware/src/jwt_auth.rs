use crate::jwt::{AuthError, JwtValidator};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

/// Authenticated account id extracted from the JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

/// Caller identity on routes where authentication is optional
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Option<i64>);

/// JWT Authentication Middleware
///
/// `required` rejects requests without a valid bearer token (401).
/// `optional` lets them through anonymously; a valid token still sets `UserId`.
#[derive(Clone)]
pub struct JwtAuthMiddleware {
    validator: Arc<JwtValidator>,
    required: bool,
}

impl JwtAuthMiddleware {
    pub fn required(validator: Arc<JwtValidator>) -> Self {
        Self {
            validator,
            required: true,
        }
    }

    pub fn optional(validator: Arc<JwtValidator>) -> Self {
        Self {
            validator,
            required: false,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            validator: self.validator.clone(),
            required: self.required,
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    validator: Arc<JwtValidator>,
    required: bool,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let validator = self.validator.clone();
        let required = self.required;

        Box::pin(async move {
            match authenticate(&req, &validator) {
                Ok(user_id) => {
                    req.extensions_mut().insert(user_id);
                }
                Err(e) if required => {
                    tracing::debug!(path = %req.path(), "JWT authentication rejected: {}", e);
                    return Err(e.into());
                }
                Err(AuthError::MissingToken) => {}
                Err(e) => {
                    tracing::debug!(path = %req.path(), "Ignoring invalid optional token: {}", e);
                }
            }

            service.call(req).await
        })
    }
}

fn authenticate(req: &ServiceRequest, validator: &JwtValidator) -> Result<UserId, AuthError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    let claims = validator.validate(token)?;
    Ok(UserId(claims.user_id))
}

/// FromRequest implementation for UserId
impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(AuthError::MissingToken.into())),
        }
    }
}

impl actix_web::FromRequest for Viewer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let viewer = req.extensions().get::<UserId>().map(|u| u.0);
        ready(Ok(Viewer(viewer)))
    }
}
