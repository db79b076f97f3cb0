//! Authorization gate for role-protected routes
//!
//! The gate reads the session token from the request cookies, resolves it
//! through the [`SessionStore`] and, when the session's role matches the
//! route's required role, attaches a [`Principal`] to the request
//! extensions. Handlers read it with `Extension<Principal>`.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use crate::{models::Role, session::SessionStore};

/// Unauthenticated entry point
pub const LOGIN_PATH: &str = "/";
/// Neutral landing for role mismatches
pub const FORBIDDEN_PATH: &str = "/redir";

/// Gate configuration for one group of routes
#[derive(Clone)]
pub struct Gate {
    sessions: SessionStore,
    cookie_name: String,
    required: Role,
}

impl Gate {
    pub fn new(sessions: SessionStore, cookie_name: impl Into<String>, required: Role) -> Self {
        Self {
            sessions,
            cookie_name: cookie_name.into(),
            required,
        }
    }
}

/// Why the gate turned a request away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// No token, undecodable token, unknown or expired session
    SessionMissing,
    /// Live session with the wrong role
    AuthorizationDenied,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            GateRejection::SessionMissing => Redirect::to(LOGIN_PATH).into_response(),
            GateRejection::AuthorizationDenied => Redirect::to(FORBIDDEN_PATH).into_response(),
        }
    }
}

/// Read and percent-decode the session token cookie
pub fn session_token(jar: &CookieJar, cookie_name: &str) -> Option<String> {
    let raw = jar.get(cookie_name)?;
    let token = urlencoding::decode(raw.value()).ok()?;
    if token.is_empty() {
        return None;
    }
    Some(token.into_owned())
}

/// Require a live session with the gate's role
pub async fn authorize(
    State(gate): State<Gate>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, GateRejection> {
    let token = session_token(&jar, &gate.cookie_name).ok_or(GateRejection::SessionMissing)?;

    let session = gate
        .sessions
        .lookup(&token)
        .await
        .ok_or(GateRejection::SessionMissing)?;

    if session.role != gate.required {
        info!(
            "User {} with role {} denied access to {}",
            session.username,
            session.role,
            req.uri().path()
        );
        return Err(GateRejection::AuthorizationDenied);
    }

    req.extensions_mut().insert(session.principal());

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SessionConfig,
        credentials::digest,
        models::{Principal, User},
    };
    use axum::{
        Extension, Router,
        http::{StatusCode, header},
        middleware,
        routing::get,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn user(name: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: name.to_string(),
            role,
            full_name: name.to_string(),
            password_hash: digest("pw"),
            active: true,
        }
    }

    async fn whoami(Extension(principal): Extension<Principal>) -> String {
        format!("{}:{}", principal.username, principal.role)
    }

    fn app(sessions: &SessionStore) -> Router {
        Router::new()
            .route("/admin", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                Gate::new(sessions.clone(), "token", Role::Admin),
                authorize,
            ))
    }

    fn request(cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/admin");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_missing_cookie_redirects_to_login() {
        let sessions = SessionStore::new(&SessionConfig::default());
        let response = app(&sessions).oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_unknown_token_redirects_to_login() {
        let sessions = SessionStore::new(&SessionConfig::default());
        let response = app(&sessions)
            .oneshot(request(Some("token=deadbeef")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_expired_session_redirects_to_login() {
        let sessions = SessionStore::new(&SessionConfig::default());
        let issued = sessions
            .issue_at(&user("admin", Role::Admin), Utc::now() - Duration::minutes(61))
            .await;

        let cookie = format!("token={}", issued.token);
        let response = app(&sessions).oneshot(request(Some(&cookie))).await.unwrap();
        assert_eq!(location(&response), LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_role_mismatch_redirects_to_forbidden_landing() {
        let sessions = SessionStore::new(&SessionConfig::default());
        let issued = sessions.issue(&user("reader", Role::User)).await;

        let cookie = format!("token={}", issued.token);
        let response = app(&sessions).oneshot(request(Some(&cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), FORBIDDEN_PATH);
        assert_ne!(FORBIDDEN_PATH, LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_matching_role_reaches_handler_with_principal() {
        let sessions = SessionStore::new(&SessionConfig::default());
        let issued = sessions.issue(&user("admin", Role::Admin)).await;

        let cookie = format!("token={}", issued.token);
        let response = app(&sessions).oneshot(request(Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"admin:ADMIN");
    }

    #[tokio::test]
    async fn test_gate_does_not_touch_sessions() {
        let sessions = SessionStore::new(&SessionConfig::default());
        let issued = sessions.issue(&user("reader", Role::User)).await;
        let cookie = format!("token={}", issued.token);

        app(&sessions).oneshot(request(Some(&cookie))).await.unwrap();
        assert_eq!(sessions.len().await, 1);
        assert!(sessions.lookup(&issued.token).await.is_some());
    }
}
