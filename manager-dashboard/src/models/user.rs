use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_ID_KEY: &str = "user_id";
pub const EMAIL_KEY: &str = "email";

/// Signed-in manager, extracted from the session.
///
/// `access_token` is the bearer credential forwarded on every backend call;
/// this service never mints or refreshes it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract session",
                )
                    .into_response()
            })?;

        let access_token: Option<String> = session.get(ACCESS_TOKEN_KEY).await.unwrap_or(None);
        let user_id: Option<String> = session.get(USER_ID_KEY).await.unwrap_or(None);
        let email: Option<String> = session.get(EMAIL_KEY).await.unwrap_or(None);

        match (access_token, user_id, email) {
            (Some(access_token), Some(user_id), Some(email)) => Ok(AuthUser {
                user_id,
                email,
                access_token,
            }),
            _ if parts.headers.contains_key("hx-request") => {
                Err((StatusCode::OK, [("HX-Redirect", "/login")]).into_response())
            }
            _ => Err(Redirect::to("/login").into_response()),
        }
    }
}
