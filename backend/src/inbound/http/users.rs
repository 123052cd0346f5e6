//! User HTTP handlers.
//!
//! ```text
//! POST /users {"username":"alice"}
//! GET /users/{username}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, USER_NOT_FOUND, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct NewUserBody {
    /// Case-insensitive username; stored lowercased.
    #[schema(example = "alice")]
    pub username: Option<String>,
}

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(example = "alice")]
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
        }
    }
}

/// `{user}` envelope.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

impl From<User> for UserEnvelope {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

/// Register a username.
#[utoipa::path(
    post,
    path = "/users",
    request_body = NewUserBody,
    responses(
        (status = 201, description = "User registered", body = UserEnvelope),
        (status = 400, description = "Username missing or already in use", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<NewUserBody>,
) -> ApiResult<HttpResponse> {
    let username = payload.into_inner().username.unwrap_or_default();
    let user = state.users.create_user(&username).await?;
    Ok(HttpResponse::Created().json(UserEnvelope::from(user)))
}

/// Look up a user by username, case-insensitively.
#[utoipa::path(
    get,
    path = "/users/{username}",
    params(("username" = String, Path, description = "Username to look up")),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 404, description = "User Not Found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "findUser"
)]
#[get("/users/{username}")]
pub async fn find_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let user = state
        .users
        .find_user(&path.into_inner())
        .await?
        .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
    Ok(web::Json(user.into()))
}
