//! Authentication routes: login, signup, logout and the forbidden landing

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    AuthState,
    error::AuthResult,
    middleware::{LOGIN_PATH, session_token},
    models::{LoginForm, Role, SignupForm},
    session::IssuedSession,
    validation::{validate_login, validate_signup},
};

/// Create the router for the authentication endpoints
pub fn create_router(state: AuthState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", get(logout))
        .route("/redir", get(forbidden))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog"
    }))
}

pub async fn login_page() -> impl IntoResponse {
    Json(json!({ "page": "login" }))
}

pub async fn signup_page() -> impl IntoResponse {
    Json(json!({ "page": "signup" }))
}

/// Landing page for authenticated users lacking the required role
pub async fn forbidden() -> impl IntoResponse {
    Json(json!({
        "page": "forbidden",
        "message": "You do not have access to this page"
    }))
}

/// Landing route for a role after login
fn home_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::User => "/user",
    }
}

/// Session cookie expiring together with the server-side record
fn session_cookie(cookie_name: &str, issued: &IssuedSession) -> Cookie<'static> {
    let expires = OffsetDateTime::from_unix_timestamp(issued.session.expires_at.timestamp()).ok();

    Cookie::build((
        cookie_name.to_string(),
        urlencoding::encode(&issued.token).into_owned(),
    ))
    .path("/")
    .http_only(true)
    .expires(expires)
    .build()
}

/// User login endpoint
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AuthResult<(CookieJar, Redirect)> {
    let (username, password) = validate_login(&form)?;
    info!("Login attempt for user: {}", username);

    let user = state
        .verifier
        .verify_login(username, password)
        .await
        .inspect_err(|e| warn!("Login failed for {}: {}", username, e))?;

    let issued = state.sessions.issue(&user).await;
    let cookie = session_cookie(&state.config.cookie_name, &issued);

    Ok((jar.add(cookie), Redirect::to(home_path(user.role))))
}

/// User signup endpoint
pub async fn signup(
    State(state): State<AuthState>,
    Form(form): Form<SignupForm>,
) -> AuthResult<impl IntoResponse> {
    let valid = validate_signup(&form)?;
    let user = state.verifier.register(valid).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!(
                "{}, you are registered! You can now log in from the login page",
                user.full_name
            )
        })),
    ))
}

/// Logout endpoint
///
/// Revokes the session and clears every cookie the client sent.
pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> (CookieJar, Redirect) {
    info!("Logout request");

    if let Some(token) = session_token(&jar, &state.config.cookie_name) {
        state.sessions.revoke(&token).await;
    }

    let names: Vec<String> = jar.iter().map(|c| c.name().to_string()).collect();
    let jar = names.into_iter().fold(jar, |jar, name| {
        jar.remove(Cookie::build((name, "")).path("/"))
    });

    (jar, Redirect::to(LOGIN_PATH))
}
