use crate::models::user::{ACCESS_TOKEN_KEY, EMAIL_KEY, USER_ID_KEY};
use crate::utils::jwt::decode_jwt_claims;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use secrecy::Secret;
use serde::Deserialize;
use service_core::error::AppError;
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Secret<String>,
}

pub async fn login_page() -> impl IntoResponse {
    LoginTemplate { error: None }
}

fn login_failed(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        LoginTemplate {
            error: Some(message.to_string()),
        },
    )
        .into_response()
}

fn redirect(headers: &HeaderMap, to: &'static str) -> Response {
    if headers.contains_key("hx-request") {
        (StatusCode::OK, [("HX-Redirect", to)]).into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(payload): Form<LoginRequest>,
) -> Result<Response, AppError> {
    let tokens = match state
        .auth_client
        .login(&payload.email, &payload.password)
        .await
    {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::warn!(email = %payload.email, error = %e, "Manager login failed");
            return Ok(login_failed("Invalid email or password"));
        }
    };

    let claims = match decode_jwt_claims(&tokens.access_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::error!("Failed to decode JWT claims: {}", e);
            return Ok(login_failed("Authentication error"));
        }
    };

    // New identity, new session id; drops any screen state of a previous user
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;
    session.clear().await;

    for (key, value) in [
        (ACCESS_TOKEN_KEY, tokens.access_token.as_str()),
        (USER_ID_KEY, claims.sub.as_str()),
        (EMAIL_KEY, claims.email.as_str()),
    ] {
        session
            .insert(key, value)
            .await
            .map_err(|e| AppError::SessionError(e.to_string()))?;
    }

    tracing::info!(
        user_id = %claims.sub,
        email = %claims.email,
        "Manager logged in successfully"
    );

    Ok(redirect(&headers, "/dashboard"))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(access_token) = session
        .get::<String>(ACCESS_TOKEN_KEY)
        .await
        .unwrap_or(None)
    {
        // Logout proceeds even when revocation fails
        match state.auth_client.logout(&access_token).await {
            Ok(()) => tracing::info!("Token revoked successfully"),
            Err(e) => tracing::error!("Failed to revoke token during logout: {}", e),
        }
    }

    if let Some(id) = session.id() {
        state.session_locks.forget(&id.to_string());
    }

    session
        .flush()
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;

    Ok(redirect(&headers, "/login"))
}
