//! Bearer-token authentication extractor and role guards.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use domain::models::user::UserRole;
use domain::services::visibility::ProposalViewer;
use persistence::entities::{AlumniProfileEntity, StudentProfileEntity};
use persistence::repositories::ProfileRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated user information from the access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                ApiError::Unauthorized("Invalid Authorization header format".to_string())
            })?;

        let claims = state.jwt.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;
        let role = UserRole::parse(&claims.role)
            .ok_or_else(|| ApiError::Unauthorized("Invalid token role".to_string()))?;

        Ok(AuthUser { user_id, role })
    }
}

/// Resolve the alumni profile behind an authenticated user, or 403.
pub async fn require_alumnus(
    state: &AppState,
    auth: &AuthUser,
) -> Result<AlumniProfileEntity, ApiError> {
    if auth.role != UserRole::Alumnus {
        return Err(ApiError::Forbidden(
            "This action requires an alumnus account".to_string(),
        ));
    }

    ProfileRepository::new(state.pool.clone())
        .find_alumnus_by_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("No alumni profile for this account".to_string()))
}

/// Resolve the student profile behind an authenticated user, or 403.
pub async fn require_student(
    state: &AppState,
    auth: &AuthUser,
) -> Result<StudentProfileEntity, ApiError> {
    if auth.role != UserRole::Student {
        return Err(ApiError::Forbidden(
            "This action requires a student account".to_string(),
        ));
    }

    ProfileRepository::new(state.pool.clone())
        .find_student_by_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("No student profile for this account".to_string()))
}

/// Build the listing capability for an authenticated user.
pub async fn resolve_viewer(
    state: &AppState,
    auth: &AuthUser,
) -> Result<ProposalViewer, ApiError> {
    match auth.role {
        UserRole::Alumnus => {
            let profile = require_alumnus(state, auth).await?;
            Ok(ProposalViewer::Alumnus {
                profile_id: profile.id,
            })
        }
        UserRole::Student => {
            let profile = require_student(state, auth).await?;
            Ok(ProposalViewer::Student {
                profile_id: profile.id,
            })
        }
        _ => Err(ApiError::Forbidden(
            "This listing is scoped to alumni and students".to_string(),
        )),
    }
}
