use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use common_http_errors::{ApiError, ApiResult};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::app::AppState;
use crate::sessions::{generate_session_token, hash_session_token, SESSION_TTL_SECONDS};
use crate::store::User;

#[derive(Deserialize)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<Json<RegisterResponse>> {
    let NewUser { name, phone, email, password } = new_user;

    let password_hash = hash_password(&password)?;
    let user = User {
        id: Uuid::new_v4(),
        name,
        phone,
        email,
        password_hash,
    };

    state.users.insert_user(&user).await.map_err(|err| {
        warn!(error = %err, "Failed to create user");
        ApiError::bad_request("user_create_failed", "Error creating user")
    })?;

    Ok(Json(RegisterResponse { message: "User created successfully" }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let LoginRequest { email, password } = login;

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::Unauthorized { message: "Invalid email or password" })?;

    let password_valid = PasswordHash::new(&user.password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false);

    if !password_valid {
        return Err(ApiError::Unauthorized { message: "Invalid email or password" });
    }

    let token = generate_session_token();
    let expires_at = Utc::now() + Duration::seconds(SESSION_TTL_SECONDS);
    state
        .users
        .create_session(hash_session_token(&token), user.id, expires_at)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(LoginResponse { token, expires_in: SESSION_TTL_SECONDS, user }))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    if password.trim().is_empty() {
        return Err(ApiError::bad_request("empty_password", "Password must not be empty"));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::internal(format!("Failed to hash password: {err}")))
}
