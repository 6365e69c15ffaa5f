//! Approval screen handlers.
//!
//! Each handler takes its session's lock, loads the session's
//! [`DashboardState`], applies one screen action, stores the state back and
//! renders it. htmx requests get only the `#dashboard` fragment; plain form
//! posts get the whole page.

use crate::dashboard::session::{load_state, lock_key, save_state};
use crate::dashboard::state::{DashboardState, Notice, DECISION_IN_PROGRESS};
use crate::dashboard::view::{DashboardView, ModalView};
use crate::models::user::AuthUser;
use crate::services::enrollment_client::CallContext;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Extension, Form,
};
use serde::Deserialize;
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;
use tokio::sync::OwnedMutexGuard;
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub manager_email: String,
    pub view: DashboardView,
}

#[derive(Template)]
#[template(path = "partials/dashboard_body.html")]
pub struct DashboardFragment {
    pub view: DashboardView,
}

#[derive(Deserialize)]
pub struct RefusalForm {
    #[serde(default)]
    pub reason: String,
}

fn call_context<'a>(user: &'a AuthUser, request_id: &'a Option<Extension<RequestId>>) -> CallContext<'a> {
    CallContext::new(&user.access_token)
        .with_request_id(request_id.as_ref().map(|Extension(id)| id.as_str()))
}

async fn lock_session(app: &AppState, session: &Session, user: &AuthUser) -> OwnedMutexGuard<()> {
    app.session_locks
        .lock(&lock_key(session, &user.user_id))
        .await
}

fn render(
    headers: &HeaderMap,
    user: &AuthUser,
    dashboard: &DashboardState,
    notice: Option<Notice>,
) -> Response {
    let view = DashboardView::build(dashboard, notice);

    if headers.contains_key("hx-request") {
        DashboardFragment { view }.into_response()
    } else {
        DashboardPage {
            manager_email: user.email.clone(),
            view,
        }
        .into_response()
    }
}

async fn respond(
    session: &Session,
    headers: &HeaderMap,
    user: &AuthUser,
    dashboard: &DashboardState,
    notice: Option<Notice>,
) -> Result<Response, AppError> {
    save_state(session, dashboard).await?;
    Ok(render(headers, user, dashboard, notice))
}

/// Full page. Before the first list load this is only the loading shell,
/// which requests `/dashboard/pending` as soon as it is mounted.
pub async fn dashboard_page(
    State(app): State<AppState>,
    user: AuthUser,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let _guard = lock_session(&app, &session, &user).await;
    let dashboard = load_state(&session).await?;
    Ok(render(&headers, &user, &dashboard, None))
}

/// Mount-time load and manual refresh share this handler.
pub async fn load_pending(
    State(app): State<AppState>,
    user: AuthUser,
    session: Session,
    headers: HeaderMap,
    request_id: Option<Extension<RequestId>>,
) -> Result<Response, AppError> {
    let _guard = lock_session(&app, &session, &user).await;
    let mut dashboard = load_state(&session).await?;
    dashboard
        .load_pending(
            app.enrollment_api.as_ref(),
            call_context(&user, &request_id),
        )
        .await;
    respond(&session, &headers, &user, &dashboard, None).await
}

pub async fn close_view(
    State(app): State<AppState>,
    user: AuthUser,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let _guard = lock_session(&app, &session, &user).await;
    let mut dashboard = load_state(&session).await?;
    dashboard.close();
    respond(&session, &headers, &user, &dashboard, None).await
}

pub async fn open_details(
    State(app): State<AppState>,
    Path(enrollment_id): Path<String>,
    user: AuthUser,
    session: Session,
    headers: HeaderMap,
    request_id: Option<Extension<RequestId>>,
) -> Result<Response, AppError> {
    let _guard = lock_session(&app, &session, &user).await;
    let mut dashboard = load_state(&session).await?;
    let notice = dashboard
        .open_details(
            app.enrollment_api.as_ref(),
            call_context(&user, &request_id),
            &enrollment_id,
        )
        .await
        .err();
    respond(&session, &headers, &user, &dashboard, notice).await
}

pub async fn open_documents(
    State(app): State<AppState>,
    Path(enrollment_id): Path<String>,
    user: AuthUser,
    session: Session,
    headers: HeaderMap,
    request_id: Option<Extension<RequestId>>,
) -> Result<Response, AppError> {
    let _guard = lock_session(&app, &session, &user).await;
    let mut dashboard = load_state(&session).await?;
    let notice = dashboard
        .open_documents(
            app.enrollment_api.as_ref(),
            call_context(&user, &request_id),
            &enrollment_id,
        )
        .await
        .err();
    respond(&session, &headers, &user, &dashboard, notice).await
}

pub async fn request_accept(
    State(app): State<AppState>,
    Path(enrollment_id): Path<String>,
    user: AuthUser,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let _guard = lock_session(&app, &session, &user).await;
    let mut dashboard = load_state(&session).await?;
    let notice = dashboard.request_accept(&enrollment_id).err();
    respond(&session, &headers, &user, &dashboard, notice).await
}

pub async fn confirm_accept(
    State(app): State<AppState>,
    Path(enrollment_id): Path<String>,
    user: AuthUser,
    session: Session,
    headers: HeaderMap,
    request_id: Option<Extension<RequestId>>,
) -> Result<Response, AppError> {
    let _guard = lock_session(&app, &session, &user).await;
    let mut dashboard = load_state(&session).await?;

    let Some(_ticket) = app.in_flight.try_acquire(&enrollment_id) else {
        tracing::warn!(enrollment_id = %enrollment_id, "Accept rejected, another decision is in flight");
        let notice = Notice::warning(DECISION_IN_PROGRESS);
        return Ok(render(&headers, &user, &dashboard, Some(notice)));
    };

    let notice = match dashboard
        .confirm_accept(
            app.enrollment_api.as_ref(),
            call_context(&user, &request_id),
            &enrollment_id,
        )
        .await
    {
        Ok(notice) | Err(notice) => notice,
    };
    respond(&session, &headers, &user, &dashboard, Some(notice)).await
}

pub async fn begin_refusal(
    State(app): State<AppState>,
    Path(enrollment_id): Path<String>,
    user: AuthUser,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let _guard = lock_session(&app, &session, &user).await;
    let mut dashboard = load_state(&session).await?;
    let notice = dashboard.begin_refusal(&enrollment_id).err();
    respond(&session, &headers, &user, &dashboard, notice).await
}

pub async fn submit_refusal(
    State(app): State<AppState>,
    Path(enrollment_id): Path<String>,
    user: AuthUser,
    session: Session,
    headers: HeaderMap,
    request_id: Option<Extension<RequestId>>,
    Form(form): Form<RefusalForm>,
) -> Result<Response, AppError> {
    let _guard = lock_session(&app, &session, &user).await;
    let mut dashboard = load_state(&session).await?;

    let Some(_ticket) = app.in_flight.try_acquire(&enrollment_id) else {
        tracing::warn!(enrollment_id = %enrollment_id, "Refusal rejected, another decision is in flight");
        let notice = Notice::warning(DECISION_IN_PROGRESS);
        return Ok(render(&headers, &user, &dashboard, Some(notice)));
    };

    let notice = match dashboard
        .submit_refusal(
            app.enrollment_api.as_ref(),
            call_context(&user, &request_id),
            &enrollment_id,
            &form.reason,
        )
        .await
    {
        Ok(notice) | Err(notice) => notice,
    };
    respond(&session, &headers, &user, &dashboard, Some(notice)).await
}
