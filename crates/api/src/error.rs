use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::models::event::TicketRejection;
use domain::models::otp::OtpRejection;
use domain::models::proposal::{CreationError, LifecycleError};
use persistence::repositories::{
    RespondError, APPLICATION_PENDING_CONSTRAINT, ENGAGEMENT_PAIR_CONSTRAINT,
    OFFER_PENDING_CONSTRAINT,
};

/// API error taxonomy.
///
/// Every terminal error renders as a stable machine-readable reason code
/// plus a human message; the HTTP status is derived here, not in handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// 400 with a specific reason code (expired, mismatch, ...).
    #[error("{message}")]
    BadRequest {
        code: &'static str,
        message: String,
    },

    /// 409 state conflict (already_engaged, duplicate, sold_out, ...).
    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
    },

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            ApiError::Conflict { code, message } => (StatusCode::CONFLICT, code, message),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                match db_err.constraint() {
                    Some(ENGAGEMENT_PAIR_CONSTRAINT) => ApiError::Conflict {
                        code: "already_engaged",
                        message: "An engagement already exists for this pair".into(),
                    },
                    Some(OFFER_PENDING_CONSTRAINT) | Some(APPLICATION_PENDING_CONSTRAINT) => {
                        ApiError::Conflict {
                            code: "duplicate",
                            message: "A pending proposal already exists for this pair".into(),
                        }
                    }
                    _ => ApiError::Conflict {
                        code: "conflict",
                        message: "Resource already exists".into(),
                    },
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<RespondError> for ApiError {
    fn from(err: RespondError) -> Self {
        match err {
            RespondError::AlreadyResolved => ApiError::Conflict {
                code: "already_resolved",
                message: "Proposal has already been responded to".into(),
            },
            RespondError::AlreadyEngaged => ApiError::Conflict {
                code: "already_engaged",
                message: "An engagement already exists for this pair".into(),
            },
            RespondError::NoSlotsRemaining => ApiError::Conflict {
                code: "no_slots_remaining",
                message: "No mentorship slots remaining".into(),
            },
            RespondError::Db(e) => e.into(),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::AlreadyResolved => ApiError::Conflict {
                code: "already_resolved",
                message: "Proposal has already been responded to".into(),
            },
            LifecycleError::Forbidden => {
                ApiError::Forbidden("You are not authorized to act on this proposal".into())
            }
        }
    }
}

impl From<CreationError> for ApiError {
    fn from(err: CreationError) -> Self {
        match err {
            CreationError::OpportunityInactive => ApiError::BadRequest {
                code: "opportunity_inactive",
                message: "Opportunity is not accepting proposals".into(),
            },
            CreationError::Duplicate => ApiError::Conflict {
                code: "duplicate",
                message: "A pending proposal already exists for this pair".into(),
            },
            CreationError::ResumeRequired => ApiError::BadRequest {
                code: "resume_required",
                message: "A resume is required for this application".into(),
            },
        }
    }
}

impl From<OtpRejection> for ApiError {
    fn from(err: OtpRejection) -> Self {
        match err {
            OtpRejection::AlreadyUsed => ApiError::Conflict {
                code: "already_used",
                message: "This code has already been used".into(),
            },
            OtpRejection::Expired => ApiError::BadRequest {
                code: "expired",
                message: "This code has expired".into(),
            },
            OtpRejection::Mismatch => ApiError::BadRequest {
                code: "mismatch",
                message: "Invalid code".into(),
            },
        }
    }
}

impl From<TicketRejection> for ApiError {
    fn from(err: TicketRejection) -> Self {
        match err {
            TicketRejection::Inactive => ApiError::BadRequest {
                code: "ticket_inactive",
                message: "Ticket is not active".into(),
            },
            TicketRejection::SalesNotStarted => ApiError::BadRequest {
                code: "sales_not_started",
                message: "Ticket sales have not started yet".into(),
            },
            TicketRejection::SalesEnded => ApiError::BadRequest {
                code: "sales_ended",
                message: "Ticket sales have ended".into(),
            },
            TicketRejection::SoldOut => ApiError::Conflict {
                code: "sold_out",
                message: "Ticket is sold out".into(),
            },
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.clone().map(|m| m.to_string()).unwrap_or_default()
                    )
                })
            })
            .collect();
        ApiError::Validation(details.join(", "))
    }
}

impl From<shared::password::PasswordError> for ApiError {
    fn from(err: shared::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password error: {}", err))
    }
}

impl From<shared::jwt::JwtError> for ApiError {
    fn from(err: shared::jwt::JwtError) -> Self {
        match err {
            shared::jwt::JwtError::TokenExpired => {
                ApiError::Unauthorized("Token has expired".into())
            }
            shared::jwt::JwtError::InvalidToken => ApiError::Unauthorized("Invalid token".into()),
            shared::jwt::JwtError::EncodingError(e) => {
                ApiError::Internal(format!("Token encoding error: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_rejections_map_to_stable_codes() {
        assert!(matches!(
            ApiError::from(OtpRejection::AlreadyUsed),
            ApiError::Conflict {
                code: "already_used",
                ..
            }
        ));
        assert!(matches!(
            ApiError::from(OtpRejection::Expired),
            ApiError::BadRequest { code: "expired", .. }
        ));
        assert!(matches!(
            ApiError::from(OtpRejection::Mismatch),
            ApiError::BadRequest {
                code: "mismatch",
                ..
            }
        ));
    }

    #[test]
    fn test_respond_errors_map_to_conflicts() {
        assert!(matches!(
            ApiError::from(RespondError::AlreadyEngaged),
            ApiError::Conflict {
                code: "already_engaged",
                ..
            }
        ));
        assert!(matches!(
            ApiError::from(RespondError::NoSlotsRemaining),
            ApiError::Conflict {
                code: "no_slots_remaining",
                ..
            }
        ));
    }

    #[test]
    fn test_ticket_rejections_keep_their_reasons() {
        assert!(matches!(
            ApiError::from(TicketRejection::SoldOut),
            ApiError::Conflict { code: "sold_out", .. }
        ));
        assert!(matches!(
            ApiError::from(TicketRejection::SalesNotStarted),
            ApiError::BadRequest {
                code: "sales_not_started",
                ..
            }
        ));
    }
}
