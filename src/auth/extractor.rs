use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use serde_json::json;

use super::verify_access_token;
use crate::server::AppState;

/// The resolved caller of an owner-scoped request.
///
/// Extracting this from a request verifies the bearer token and confirms the
/// subject still exists in the users tree; any failure along the way
/// collapses into one generic 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub email: String,
    pub fullname: String,
}

fn bearer_token_from_request(req: &HttpRequest) -> Option<String> {
    let raw = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn unauthorized() -> Error {
    InternalError::from_response(
        "unauthorized",
        HttpResponse::Unauthorized().json(json!({"error": "Could not validate credentials"})),
    )
    .into()
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(unauthorized)?;
            let token = bearer_token_from_request(&req).ok_or_else(unauthorized)?;
            let username =
                verify_access_token(&token, &state.config.auth).map_err(|_| unauthorized())?;
            let user = state
                .db
                .find_user_by_username(&username)
                .ok()
                .flatten()
                .ok_or_else(unauthorized)?;

            Ok(AuthenticatedUser {
                username: user.username,
                email: user.email,
                fullname: user.fullname,
            })
        })
    }
}
