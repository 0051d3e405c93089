//! Application endpoints that are not part of the sign-in flow.

use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;

use crate::http::response::text;
use crate::routing::{HandlerError, MatchContext};

/// `GET api/user/{userId}/note/{noteId}`: echoes the user id.
pub async fn user_note(ctx: MatchContext) -> Result<Response, HandlerError> {
    let user_id = ctx
        .value("userId")
        .ok_or_else(|| HandlerError::internal("route matched without a userId"))?;
    Ok(text(StatusCode::OK, user_id))
}

/// Sub-application mounted behind the authentication gate.
pub fn protected_app() -> Router {
    Router::new().fallback(only_when_authed)
}

async fn only_when_authed() -> Response {
    text(StatusCode::OK, "Only when authed")
}
