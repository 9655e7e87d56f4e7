use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use base64::Engine;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::config::Credentials;

/// HTTP Basic authentication guard.
///
/// Built with `None` credentials it lets every request through, so a scope
/// can be wrapped unconditionally and protected only when configured.
#[derive(Clone)]
pub struct BasicAuth {
    credentials: Option<Rc<Credentials>>,
    realm: &'static str,
}

impl BasicAuth {
    pub fn new(credentials: Credentials, realm: &'static str) -> Self {
        Self::optional(Some(credentials), realm)
    }

    pub fn optional(credentials: Option<Credentials>, realm: &'static str) -> Self {
        Self {
            credentials: credentials.map(Rc::new),
            realm,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BasicAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BasicAuthMiddleware {
            service,
            credentials: self.credentials.clone(),
            realm: self.realm,
        }))
    }
}

pub struct BasicAuthMiddleware<S> {
    service: S,
    credentials: Option<Rc<Credentials>>,
    realm: &'static str,
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authorized = match &self.credentials {
            None => true,
            Some(expected) => req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(decode_basic)
                .map(|(user, pass)| user == expected.username && pass == expected.password)
                .unwrap_or(false),
        };

        if authorized {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        log::warn!("🔒 Rejected unauthenticated request to {}", req.path());
        let challenge = HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, format!("Basic realm=\"{}\"", self.realm)))
            .body("Authentication required");
        let res = req.into_response(challenge).map_into_right_body();

        Box::pin(async move { Ok(res) })
    }
}

/// Splits an `Authorization: Basic <base64(user:pass)>` header value.
fn decode_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?.trim();
    let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}
