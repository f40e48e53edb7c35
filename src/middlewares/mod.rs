use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    HttpMessage, HttpRequest,
};
use futures_util::{future::LocalBoxFuture, FutureExt};
use std::rc::Rc;

use crate::{api::error, utils::Claims};

pub fn bearer_token(req: &HttpRequest) -> Result<&str, error::Error> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| error::Error::unauthorized("Couldn't find JWT"))
}

/// Decodes the bearer token against `secret` and stores the [`Claims`] in the
/// request extensions for [`get_claims`]. Paths with no registered resource
/// pass through untouched.
pub fn authentication<B>(
    secret: String,
) -> impl Fn(
    ServiceRequest,
    Next<B>,
) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, actix_web::Error>>
where
    B: MessageBody + 'static,
{
    let secret: Rc<str> = Rc::from(secret);
    move |req: ServiceRequest, next: Next<B>| {
        let secret = secret.clone();
        async move {
            // unmatched paths fall through to the default 404
            if !req.request().resource_map().has_resource(req.path()) {
                return next.call(req).await;
            }

            let token = bearer_token(req.request())?;

            let claims = Claims::decode(token, secret.as_bytes())
                .map_err(|_| error::Error::unauthorized("Couldn't validate JWT"))?;

            req.extensions_mut().insert(claims);

            next.call(req).await
        }
        .boxed_local()
    }
}

pub fn get_claims(req: &HttpRequest) -> Result<Claims, error::Error> {
    let extensions = req.extensions();

    let claims = extensions
        .get::<Claims>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?
        .clone();

    Ok(claims)
}
