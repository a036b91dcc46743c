use std::sync::Arc;

use axum::{
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    db::{providerdb::ProviderExt, userdb::UserExt},
    dtos::userdtos::*,
    error::{ErrorMessage, HttpError},
    mail::mails,
    models::usermodel::UserRole,
    utils::{otp_generator, password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    body.validate_phone_number()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    tracing::info!("Registering user: {}", body.email);

    let existing = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing.is_some() {
        return Err(HttpError::bad_request(ErrorMessage::EmailExist.to_string()));
    }

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::bad_request(e.to_string()))?;

    let otp = otp_generator::generate_otp();
    let otp_expires_at = Utc::now() + Duration::minutes(10);

    let user = app_state
        .db_client
        .save_user(
            body.name.clone(),
            body.email.clone(),
            body.phone.clone(),
            hashed_password,
            body.role,
            otp.clone(),
            otp_expires_at,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Service providers get an empty profile to complete later.
    if body.role == UserRole::ServiceProvider {
        app_state
            .db_client
            .create_provider_profile(user.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
    }

    if let Err(e) = mails::send_otp_email(&app_state.env, &user.email, &user.name, &otp).await {
        tracing::error!("Failed to send OTP email to {}: {}", user.email, e);
    }

    tracing::info!("User registered successfully: {}", user.email);

    Ok(Json(UserResponseDto {
        success: true,
        message: "User registered successfully. Please verify OTP sent to your email.".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn verify_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<VerifyOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    if user.is_email_verified {
        return Err(HttpError::bad_request("Email is already verified"));
    }

    if user.otp.as_deref() != Some(body.otp.as_str()) {
        tracing::warn!("Invalid OTP attempt for user {}", user.email);
        return Err(HttpError::bad_request("Invalid OTP"));
    }

    match user.otp_expires_at {
        Some(expires_at) if expires_at > Utc::now() => {}
        _ => return Err(HttpError::bad_request("OTP expired")),
    }

    let user = app_state
        .db_client
        .mark_email_verified(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Err(e) = mails::send_welcome_email(&app_state.env, &user.email, &user.name).await {
        tracing::error!("Failed to send welcome email to {}: {}", user.email, e);
    }

    tracing::info!("OTP verified for user {}", user.email);

    Ok(Json(UserResponseDto {
        success: true,
        message: "OTP verified successfully".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn resend_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ResendOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    if user.is_email_verified {
        return Err(HttpError::bad_request("Email is already verified"));
    }

    let otp = otp_generator::generate_otp();
    let otp_expires_at = Utc::now() + Duration::minutes(10);

    let user = app_state
        .db_client
        .set_user_otp(user.id, &otp, otp_expires_at)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Err(e) = mails::send_otp_email(&app_state.env, &user.email, &user.name, &otp).await {
        tracing::error!("Failed to send OTP email to {}: {}", user.email, e);
    }

    Ok(Json(Response {
        success: true,
        message: "OTP sent to your email".to_string(),
    }))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !user.can_login() {
        return Err(HttpError::unauthorized(
            "Your account has been blocked or deleted".to_string(),
        ));
    }

    let stored_password = user
        .password
        .as_deref()
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, stored_password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    if !user.is_email_verified {
        return Err(HttpError::unauthorized(
            "Please verify your email before logging in".to_string(),
        ));
    }

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage * 60,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build cookie".to_string()))?,
    );

    tracing::info!("User logged in: {}", user.email);

    let mut response = Json(UserLoginResponseDto {
        success: true,
        message: "Login successful".to_string(),
        token,
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn forgot_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ForgotPasswordDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    let reset_token = otp_generator::generate_reset_token();
    let expires_at = Utc::now() + Duration::minutes(30);

    let user = app_state
        .db_client
        .set_reset_token(user.id, &reset_token, expires_at)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Err(e) =
        mails::send_reset_password_email(&app_state.env, &user.email, &user.name, &reset_token)
            .await
    {
        tracing::error!("Failed to send reset email to {}: {}", user.email, e);
    }

    Ok(Json(Response {
        success: true,
        message: "Password reset link sent to your email".to_string(),
    }))
}

pub async fn reset_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ResetPasswordDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, None, Some(&body.token))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::bad_request("Invalid or expired reset token"))?;

    match user.reset_token_expires_at {
        Some(expires_at) if expires_at > Utc::now() => {}
        _ => return Err(HttpError::bad_request("Invalid or expired reset token")),
    }

    let hashed_password =
        password::hash(&body.new_password).map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .db_client
        .update_user_password(user.id, hashed_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .clear_reset_token(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("Password reset for user {}", user.email);

    Ok(Json(Response {
        success: true,
        message: "Password has been reset successfully".to_string(),
    }))
}
