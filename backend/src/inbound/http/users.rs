//! Login handler.
//!
//! ```text
//! POST /api/login {"username":"alice","password":"secret"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Error, LoginCredentials, LoginOutcome, LoginValidationError, Role, User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password; never stored.
    pub password: String,
}

/// Authenticated user as returned to clients.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Login name.
    pub username: String,
    /// Display name, or the username when none is on file.
    pub name: String,
    /// `student` or `admin`.
    #[schema(value_type = String, example = "student")]
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username().to_string(),
            name: user.name_or_username().to_owned(),
            role: user.role(),
        }
    }
}

/// Login response body.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// The logged-in user.
    pub user: UserResponse,
    /// `true` when this login created the account.
    pub registered: bool,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match &err {
        LoginValidationError::InvalidUsername(UserValidationError::EmptyUsername) => {
            ("username", "empty_username")
        }
        LoginValidationError::InvalidUsername(_) => ("username", "invalid_username"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Log in, creating a student account on first use.
///
/// Returns 201 when the account was created by this request.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 201, description = "Account created", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let password = zeroize::Zeroizing::new(password);
    let credentials = LoginCredentials::try_from_parts(&username, &password)
        .map_err(map_login_validation_error)?;

    let outcome = state.login.find_or_create_user(&credentials).await?;
    let body = LoginResponse {
        user: UserResponse::from(outcome.user()),
        registered: outcome.is_registration(),
    };
    Ok(match outcome {
        LoginOutcome::Registered(_) => HttpResponse::Created().json(body),
        LoginOutcome::Authenticated(_) => HttpResponse::Ok().json(body),
    })
}
