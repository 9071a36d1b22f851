use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use relevar_core::AppError;
use relevar_domain::UserId;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the acting account identifier.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolves the acting account and stores its identity as a request extension.
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let user_id = acting_user_id(request.headers())?;
    let identity = state.user_service.resolve_identity(user_id).await?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn acting_user_id(headers: &HeaderMap) -> Result<UserId, AppError> {
    let value = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("{USER_ID_HEADER} is not valid text")))?;

    Uuid::parse_str(value.trim())
        .map(UserId::from_uuid)
        .map_err(|_| AppError::Unauthorized(format!("{USER_ID_HEADER} is not a valid UUID")))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};
    use relevar_core::AppError;

    use super::{USER_ID_HEADER, acting_user_id};

    #[test]
    fn missing_or_malformed_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            acting_user_id(&headers),
            Err(AppError::Unauthorized(_))
        ));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(
            acting_user_id(&headers),
            Err(AppError::Unauthorized(_))
        ));

        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_static("6f1c2d3e-4a5b-4c6d-8e7f-901234567890"),
        );
        assert!(acting_user_id(&headers).is_ok());
    }
}
