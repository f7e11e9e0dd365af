//! Auth routes: signup with OTP verification, code reissue, login.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use domain::models::otp::{self, OneTimeCode, DEFAULT_TTL_MINUTES};
use domain::models::profile::{CreateAlumniProfile, CreateStudentProfile};
use domain::models::user::{
    LoginRequest, LoginResponse, ResendOtpRequest, SignupAccount, User, VerifyOtpRequest,
};
use persistence::repositories::user::{NewAlumniProfile, NewStudentProfile, NewUser};
use persistence::repositories::{OtpRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// Request body for student signup.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SignupStudentRequest {
    #[validate(nested)]
    pub account: SignupAccount,
    #[validate(nested)]
    pub profile: CreateStudentProfile,
}

/// Request body for alumnus signup.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SignupAlumnusRequest {
    #[validate(nested)]
    pub account: SignupAccount,
    #[validate(nested)]
    pub profile: CreateAlumniProfile,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub detail: &'static str,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}

/// Create an inactive student account and email its verification code.
///
/// POST /api/v1/auth/signup/student
pub async fn signup_student(
    State(state): State<AppState>,
    Json(request): Json<SignupStudentRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    request.validate()?;

    let user_repo = UserRepository::new(state.pool.clone());

    // A stale unverified account must not squat on the email.
    user_repo
        .delete_inactive_by_email(&request.account.email)
        .await?;

    let password_hash = shared::password::hash_password(&request.account.password)?;
    let account = request.account;
    let profile = request.profile;

    let (user, _profile) = user_repo
        .create_student(
            NewUser {
                email: account.email,
                password_hash,
                phone_num: account.phone_num,
                role: persistence::entities::UserRoleDb::Student,
                firstname: account.firstname,
                lastname: account.lastname,
                middlename: account.middlename,
                street: account.street,
                city: account.city,
                state: account.state,
                country: account.country,
            },
            NewStudentProfile {
                description: profile.description,
                matric_no: profile.matric_no,
                department: profile.department,
                faculty: profile.faculty,
                level: profile.level,
                cgpa: profile.cgpa,
                skills: profile.skills,
                expected_grad_year: profile.expected_grad_year,
                resume_url: profile.resume_url,
                linkedin_url: profile.linkedin_url,
                github_url: profile.github_url,
            },
        )
        .await?;

    issue_and_send_code(&state, &user).await?;

    info!(user_id = %user.id, "Student signup created, verification code sent");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            detail: "Account created. Check your email for the verification code.",
            user: user.into(),
        }),
    ))
}

/// Create an inactive alumnus account and email its verification code.
///
/// POST /api/v1/auth/signup/alumnus
pub async fn signup_alumnus(
    State(state): State<AppState>,
    Json(request): Json<SignupAlumnusRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    request.validate()?;

    let user_repo = UserRepository::new(state.pool.clone());

    user_repo
        .delete_inactive_by_email(&request.account.email)
        .await?;

    let password_hash = shared::password::hash_password(&request.account.password)?;
    let account = request.account;
    let profile = request.profile;

    let (user, _profile) = user_repo
        .create_alumnus(
            NewUser {
                email: account.email,
                password_hash,
                phone_num: account.phone_num,
                role: persistence::entities::UserRoleDb::Alumnus,
                firstname: account.firstname,
                lastname: account.lastname,
                middlename: account.middlename,
                street: account.street,
                city: account.city,
                state: account.state,
                country: account.country,
            },
            NewAlumniProfile {
                description: profile.description,
                matric_no: profile.matric_no,
                department: profile.department,
                faculty: profile.faculty,
                grad_year: profile.grad_year,
                current_job_title: profile.current_job_title,
                current_company: profile.current_company,
                industry: profile.industry,
                years_of_exp: profile.years_of_exp,
                linkedin_url: profile.linkedin_url,
                github_url: profile.github_url,
            },
        )
        .await?;

    issue_and_send_code(&state, &user).await?;

    info!(user_id = %user.id, "Alumnus signup created, verification code sent");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            detail: "Account created. Check your email for the verification code.",
            user: user.into(),
        }),
    ))
}

/// Consume a verification code and activate the account.
///
/// POST /api/v1/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<DetailResponse>, ApiError> {
    request.validate()?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No account for this email".to_string()))?;

    let otp_repo = OtpRepository::new(state.pool.clone());
    let code: OneTimeCode = otp_repo
        .find_by_user(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No verification code issued".to_string()))?
        .into();

    code.check(&request.code, Utc::now())?;

    // Conditional consume: a concurrent duplicate verification loses here.
    if !otp_repo.consume_and_activate(user.id).await? {
        return Err(ApiError::Conflict {
            code: "already_used",
            message: "This code has already been used".into(),
        });
    }

    info!(user_id = %user.id, "Account verified and activated");

    Ok(Json(DetailResponse {
        detail: "Account verified successfully",
    }))
}

/// Reissue a verification code for an inactive account.
///
/// POST /api/v1/auth/resend-otp
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(request): Json<ResendOtpRequest>,
) -> Result<Json<DetailResponse>, ApiError> {
    request.validate()?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_email(&request.email)
        .await?
        .filter(|user| !user.is_active)
        .ok_or_else(|| ApiError::NotFound("No inactive account for this email".to_string()))?;

    issue_and_send_code(&state, &user).await?;

    Ok(Json(DetailResponse {
        detail: "A new verification code has been sent",
    }))
}

/// Password login for verified accounts.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !shared::password::verify_password(&request.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is not verified".to_string()));
    }

    let user: User = user.into();
    let access_token = state.jwt.issue_token(user.id, user.role.as_str())?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        user,
    }))
}

/// Issue a fresh code (superseding any outstanding one) and deliver it.
///
/// Delivery failure surfaces to the caller: without the code the account
/// can never activate.
async fn issue_and_send_code(
    state: &AppState,
    user: &persistence::entities::UserEntity,
) -> Result<(), ApiError> {
    let code = otp::generate_code();
    let expiry = otp::expiry_from(Utc::now(), DEFAULT_TTL_MINUTES);

    OtpRepository::new(state.pool.clone())
        .issue(user.id, &code, expiry)
        .await?;

    state
        .email
        .send_otp_email(&user.email, &user.firstname, &code, DEFAULT_TTL_MINUTES)
        .await
        .map_err(|e| {
            ApiError::ServiceUnavailable(format!("Could not deliver verification code: {}", e))
        })
}
