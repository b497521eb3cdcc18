//! Route table and the public (unauthenticated) handlers

use crate::{
    email::{booking_notification, contact_notification},
    error::{AppError, Result},
    extractors::ApiJson,
    handlers::{admin, health},
    middleware::auth::require_admin_token,
    models::{
        categories,
        request::{IndexNowRequest, ProjectsQuery},
        ApiResponse, BookingSubmission, ContactSubmission, ProjectFilter,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, info, warn};

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(handle_root))
        .route("/health", get(health::handle_health))
        .route("/api/contact", post(handle_contact))
        .route("/api/bookings", post(handle_create_booking))
        .route("/api/projects", get(handle_list_projects))
        .route("/api/projects/:slug", get(handle_get_project))
        .route("/api/indexnow", post(handle_indexnow));

    let admin = Router::new()
        .route("/api/admin", post(admin::handle_admin_action))
        .route("/api/admin/contacts", get(admin::handle_list_contacts))
        .route("/api/admin/bookings", get(admin::handle_list_bookings))
        .route("/api/admin/projects", get(admin::handle_list_projects))
        .route("/api/bookings/update", post(admin::handle_update_booking))
        .route("/api/projects/update", post(admin::handle_update_project))
        .route("/api/export", get(admin::handle_export))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin_token));

    public.merge(admin)
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "health": "/health",
            "contact": "/api/contact",
            "bookings": "/api/bookings",
            "projects": "/api/projects",
            "project": "/api/projects/{slug}",
            "indexnow": "/api/indexnow"
        }
    })))
}

async fn handle_contact(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<ContactSubmission>,
) -> Result<impl IntoResponse> {
    let input = submission.into_new_contact()?;
    let contact = state.public.contacts.create_contact(input).await?;

    info!(contact_id = %contact.id, "POST /api/contact - stored contact submission");

    state
        .notify(contact_notification(&contact, &state.email_from, &state.notify_to))
        .await;

    Ok(Json(json!({ "success": true })))
}

async fn handle_create_booking(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<BookingSubmission>,
) -> Result<impl IntoResponse> {
    let input = submission.into_new_booking()?;
    let booking = state.public.bookings.create_booking(input).await?;

    info!(booking_id = %booking.id, "POST /api/bookings - stored booking request");

    state
        .notify(booking_notification(&booking, &state.email_from, &state.notify_to))
        .await;

    Ok(Json(json!({ "success": true, "data": booking })))
}

async fn handle_list_projects(
    State(state): State<AppState>,
    Query(params): Query<ProjectsQuery>,
) -> Result<impl IntoResponse> {
    let filter = ProjectFilter {
        category: params.category,
        limit: params.limit,
    };
    let filtered = filter.category().is_some() || filter.limit.is_some();

    let projects = state.public.projects.list_projects(filter).await?;

    // Category tabs always come from the full portfolio.
    let all_categories = if filtered {
        categories(&state.public.projects.list_projects(ProjectFilter::default()).await?)
    } else {
        categories(&projects)
    };

    info!("GET /api/projects - returning {} projects", projects.len());

    Ok(Json(json!({
        "success": true,
        "data": {
            "count": projects.len(),
            "projects": projects,
            "categories": all_categories,
        }
    })))
}

async fn handle_get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let project = state
        .public
        .projects
        .get_project_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project '{}' not found", slug)))?;

    Ok(Json(ApiResponse::success(project)))
}

async fn handle_indexnow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<IndexNowRequest>,
) -> Response {
    let Some(urls) = request.urls() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "urlList must be a non-empty array" })),
        )
            .into_response();
    };

    match state.indexnow.submit(&urls).await {
        Ok(outcome) if outcome.is_success() => {
            Json(json!({ "success": true, "response": outcome.body })).into_response()
        }
        Ok(outcome) => {
            warn!(status = outcome.status.as_u16(), "IndexNow rejected submission");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "status": outcome.status.as_u16(),
                    "error": outcome.body,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("IndexNow submission failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
