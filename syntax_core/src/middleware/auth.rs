use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

/// Guards admin routes with the static bearer token. Runs before any extractor,
/// so a bad token is rejected without touching the body.
pub async fn require_admin_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.admin_token.is_empty() {
        warn!(path = %request.uri().path(), "Admin request refused: no admin token configured");
        return Err(AppError::Unauthorized);
    }

    let token = extract_token_from_header(request.headers())?;

    if token != state.admin_token {
        warn!(path = %request.uri().path(), "Admin request refused: token mismatch");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

fn extract_token_from_header(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            debug!("Missing Authorization header");
            AppError::Unauthorized
        })?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        debug!("Authorization header must start with 'Bearer '");
        AppError::Unauthorized
    })?;

    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }

    Ok(token)
}
