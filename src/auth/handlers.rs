use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
    gate::{require_user, CurrentUser},
    jwt::JwtKeys,
    password::{hash_password, new_password_problem, verify_login},
    repo_types::User,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue_tokens(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let keys = JwtKeys::from_ref(state);
    Ok(AuthResponse {
        access_token: keys.sign_access(user.id)?,
        refresh_token: keys.sign_refresh(user.id)?,
        user: PublicUser::from(user),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }
    if let Some(problem) = new_password_problem(&payload.password) {
        warn!(problem, "password rejected");
        return Err(AppError::BadRequest(problem.into()));
    }

    let hash = hash_password(&payload.password)?;
    let Some(user) = state.users.create(&email, &hash).await? else {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(issue_tokens(&state, &user)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }

    let user = state.users.find_by_email(&email).await?;
    let matched = verify_login(
        &payload.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    )?;
    let Some(user) = user.filter(|_| matched) else {
        warn!(email = %email, "login rejected");
        return Err(AppError::InvalidCredentials);
    };

    info!(user_id = %user.id, "user logged in");
    Ok(Json(issue_tokens(&state, &user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::InvalidCredentials
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    Ok(Json(issue_tokens(&state, &user)?))
}

#[instrument(skip_all)]
pub async fn get_me(CurrentUser(caller): CurrentUser) -> AppResult<Json<PublicUser>> {
    let user = require_user(caller.as_ref())?;
    Ok(Json(PublicUser::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seed_user;

    fn register_body(email: &str, password: &str) -> Json<RegisterRequest> {
        Json(RegisterRequest {
            email: email.into(),
            password: password.into(),
        })
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("dummyemail1@example.com"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[tokio::test]
    async fn register_normalizes_email_and_issues_tokens() {
        let state = AppState::fake();
        let Json(res) = register(State(state.clone()), register_body(" New@Example.COM ", "password"))
            .await
            .unwrap();
        assert_eq!(res.user.email, "new@example.com");

        let keys = JwtKeys::from_ref(&state);
        assert_eq!(keys.verify_access(&res.access_token).unwrap().sub, res.user.id);
        assert_eq!(keys.verify_refresh(&res.refresh_token).unwrap().sub, res.user.id);
    }

    #[tokio::test]
    async fn register_rejects_duplicates_and_short_passwords() {
        let state = AppState::fake();
        seed_user(&state, "taken@example.com").await;

        let err = register(State(state.clone()), register_body("taken@example.com", "password"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = register(State(state), register_body("fresh@example.com", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let state = AppState::fake();
        seed_user(&state, "user@example.com").await;

        let ok = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "user@example.com".into(),
                password: "password".into(),
            }),
        )
        .await;
        assert!(ok.is_ok());

        let err = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "user@example.com".into(),
                password: "hunter22".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = login(
            State(state),
            Json(LoginRequest {
                email: "nobody@example.com".into(),
                password: "password".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn refresh_requires_refresh_token() {
        let state = AppState::fake();
        let user = seed_user(&state, "user@example.com").await;
        let keys = JwtKeys::from_ref(&state);

        let access = keys.sign_access(user.id).unwrap();
        let err = refresh(
            State(state.clone()),
            Json(RefreshRequest { refresh_token: access }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let token = keys.sign_refresh(user.id).unwrap();
        let Json(res) = refresh(State(state), Json(RefreshRequest { refresh_token: token }))
            .await
            .unwrap();
        assert_eq!(res.user.id, user.id);
    }

    #[tokio::test]
    async fn me_requires_caller() {
        let err = get_me(CurrentUser(None)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }
}
