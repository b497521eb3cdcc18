//! Dashboard handlers. Every route here sits behind `require_admin_token`.

use crate::{
    error::{AppError, Result},
    export::to_csv,
    extractors::ApiJson,
    models::{
        request::ExportQuery, ApiResponse, BookingChanges, NewProject, ProjectChanges,
        ProjectFilter,
    },
    AppState,
};
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct TargetId {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct BookingUpdateRequest {
    id: Uuid,
    #[serde(default)]
    updates: BookingChanges,
}

fn parse<T: DeserializeOwned>(body: &Value) -> Result<T> {
    T::deserialize(body).map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}

/// `POST /api/admin`: one endpoint, dispatched on the `action` field.
pub async fn handle_admin_action(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse> {
    let action = body.get("action").and_then(Value::as_str).unwrap_or_default();
    info!(action = action, "POST /api/admin");

    let data = match action {
        "addProject" => {
            let input = parse::<NewProject>(&body)?.prepare()?;
            let project = state.admin.projects.create_project(input).await?;
            json!(project)
        }
        "updateProject" => {
            let TargetId { id } = parse(&body)?;
            let changes = parse::<ProjectChanges>(&body)?.normalized()?;
            let project = state.admin.projects.update_project(id, changes).await?;
            json!(project)
        }
        "deleteProject" => {
            let TargetId { id } = parse(&body)?;
            let deleted = state.admin.projects.delete_project(id).await?;
            json!({ "id": id, "deleted": deleted })
        }
        "updateBooking" => {
            let BookingUpdateRequest { id, updates } = parse(&body)?;
            let booking = state
                .admin
                .bookings
                .update_booking(id, updates.normalized()?)
                .await?;
            json!(booking)
        }
        _ => return Err(AppError::BadRequest("Unknown action".to_string())),
    };

    Ok(Json(json!({ "data": data })))
}

/// `POST /api/bookings/update {id, status?, admin_notes?}`
pub async fn handle_update_booking(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse> {
    let TargetId { id } = parse(&body)?;
    let changes = parse::<BookingChanges>(&body)?.normalized()?;

    let booking = state.admin.bookings.update_booking(id, changes).await?;
    info!(booking_id = %booking.id, status = %booking.status, "Booking updated");

    Ok(Json(json!({ "success": true })))
}

/// `POST /api/projects/update {id, ...changes}`
pub async fn handle_update_project(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse> {
    let TargetId { id } = parse(&body)?;
    let changes = parse::<ProjectChanges>(&body)?.normalized()?;

    state.admin.projects.update_project(id, changes).await?;
    info!(project_id = %id, "Project updated");

    Ok(Json(json!({ "success": true })))
}

pub async fn handle_export(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> Result<impl IntoResponse> {
    let (kind, csv) = match params.kind.as_deref() {
        Some("contacts") => ("contacts", to_csv(&state.admin.contacts.list_contacts().await?)?),
        Some("bookings") => ("bookings", to_csv(&state.admin.bookings.list_bookings().await?)?),
        _ => {
            return Err(AppError::BadRequest(
                "type must be contacts or bookings".to_string(),
            ))
        }
    };

    info!("GET /api/export - exporting {}", kind);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", kind),
            ),
        ],
        csv,
    ))
}

pub async fn handle_list_contacts(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let contacts = state.admin.contacts.list_contacts().await?;
    Ok(Json(ApiResponse::success(contacts)))
}

pub async fn handle_list_bookings(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let bookings = state.admin.bookings.list_bookings().await?;
    Ok(Json(ApiResponse::success(bookings)))
}

pub async fn handle_list_projects(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let projects = state.admin.projects.list_projects(ProjectFilter::default()).await?;
    Ok(Json(ApiResponse::success(projects)))
}
