use std::path::PathBuf;

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::auth;
use super::contact;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Optional surfaces mounted next to the API
#[derive(Default)]
pub struct RouterOptions {
    /// Directory served under `/assets`
    pub assets_dir: Option<PathBuf>,
    /// Prometheus handle; exposes `/metrics` when set
    pub metrics: Option<PrometheusMetrics>,
}

/// Create the full router with application state
///
/// Account routes are mounted under both `/api` and `/api/auth`.
pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", auth::create_auth_router())
        .nest("/api/auth", auth::create_auth_router())
        .merge(contact::create_contact_router())
        .with_state(state);

    if let Some(dir) = options.assets_dir {
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    if let Some(metrics) = options.metrics {
        router = router.merge(create_metrics_router(metrics));
    }

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api::state::{ContactServiceTrait, UserServiceTrait};
    use crate::domain::mail::MailTransport;
    use crate::infrastructure::auth::{JwtConfig, JwtGenerator, JwtService};
    use crate::infrastructure::contact::ContactService;
    use crate::infrastructure::mail::{RecordingMailTransport, SmtpMailTransport, SmtpSettings};
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

    const INBOX: &str = "inbox@virtuamod.com";
    const JWT_SECRET: &str = "router-test-secret";

    struct TestApp {
        router: Router,
        mail: RecordingMailTransport,
    }

    fn test_app() -> TestApp {
        test_app_with_options(RouterOptions::default())
    }

    fn test_app_with_options(options: RouterOptions) -> TestApp {
        let mail = RecordingMailTransport::new();

        TestApp {
            router: build_router(Arc::new(mail.clone()), options),
            mail,
        }
    }

    fn build_router(transport: Arc<dyn MailTransport>, options: RouterOptions) -> Router {
        let users: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::with_cost(1).unwrap()),
        ));
        let jwt = Arc::new(JwtService::new(JwtConfig::new(JWT_SECRET, 24)));
        let contact: Arc<dyn ContactServiceTrait> = Arc::new(ContactService::new(
            transport,
            Some(INBOX.to_string()),
            None,
        ));

        create_router(AppState::new(users, jwt, contact), options)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn alice() -> Value {
        json!({ "username": "alice", "email": "a@x.com", "password": "pw1" })
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let app = test_app();

        let (status, body) = send(&app.router, post_json("/api/register", alice())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["username"], "alice");
        assert_eq!(body["email"], "a@x.com");

        let (status, body) = send(&app.router, post_json("/api/register", alice())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Email already exists");
        assert_eq!(body["code"], "duplicate_credential");
    }

    #[tokio::test]
    async fn test_auth_prefix_is_mounted() {
        let app = test_app();

        let (status, _) = send(&app.router, post_json("/api/auth/register", alice())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app.router,
            post_json("/api/auth/login", json!({ "email": "a@x.com", "password": "pw1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
    }

    #[tokio::test]
    async fn test_login_outcomes() {
        let app = test_app();
        send(&app.router, post_json("/api/register", alice())).await;

        let (status, body) = send(
            &app.router,
            post_json("/api/login", json!({ "email": "a@x.com", "password": "pw1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "a@x.com");
        assert!(body["token"].is_string());

        let (status, body) = send(
            &app.router,
            post_json("/api/login", json!({ "email": "a@x.com", "password": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Invalid credentials");
        assert_eq!(body["code"], "invalid_credential");
        assert!(body.get("token").is_none());

        let (status, body) = send(
            &app.router,
            post_json("/api/login", json!({ "email": "b@x.com", "password": "pw1" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "User not found");

        let (status, body) =
            send(&app.router, post_json("/api/login", json!({ "email": "a@x.com" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_error");
    }

    #[tokio::test]
    async fn test_token_claims_match_identity() {
        let app = test_app();

        let (_, body) = send(&app.router, post_json("/api/register", alice())).await;
        let token = body["token"].as_str().unwrap();

        let (status, me) = send(&app.router, get_with_token("/api/me", token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["username"], "alice");
        assert_eq!(me["email"], "a@x.com");
        assert!(me.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_login_token_claims_match_registered_identity() {
        let app = test_app();

        let (_, registered) = send(&app.router, post_json("/api/register", alice())).await;
        let (_, me) = send(
            &app.router,
            get_with_token("/api/me", registered["token"].as_str().unwrap()),
        )
        .await;

        let (status, login) = send(
            &app.router,
            post_json("/api/login", json!({ "email": "a@x.com", "password": "pw1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let jwt = JwtService::new(JwtConfig::new(JWT_SECRET, 24));
        let claims = jwt.validate(login["token"].as_str().unwrap()).unwrap();

        assert_eq!(claims.sub, me["id"].as_str().unwrap());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[tokio::test]
    async fn test_me_rejects_bad_tokens() {
        let app = test_app();

        let (_, body) = send(&app.router, post_json("/api/register", alice())).await;
        let mut tampered = body["token"].as_str().unwrap().to_string();
        tampered.push('x');

        let (status, body) = send(&app.router, get_with_token("/api/me", &tampered)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");

        let request = Request::builder().uri("/api/me").body(Body::empty()).unwrap();
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let app = test_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"username\":"))
            .unwrap();

        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_error");
    }

    #[tokio::test]
    async fn test_contact_missing_fields() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            post_json("/send-contact-email", json!({ "name": "Jane", "email": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Please fill all required fields.");
        assert!(app.mail.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_contact_success() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            post_json(
                "/send-contact-email",
                json!({ "name": "Jane", "email": "jane@x.com", "message": "<b>Hi</b>" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Email sent successfully.");

        let sent = app.mail.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, INBOX);
        assert_eq!(sent[0].subject, "Contact Form Submission from Jane");
        assert!(sent[0].html.contains("&lt;b&gt;Hi&lt;/b&gt;"));
        assert!(!sent[0].html.contains("<b>Hi</b>"));
    }

    #[tokio::test]
    async fn test_contact_delivery_failure() {
        let app = test_app();
        app.mail.set_should_fail(true).await;

        let (status, body) = send(
            &app.router,
            post_json(
                "/send-contact-email",
                json!({ "name": "Jane", "email": "jane@x.com", "message": "Hi" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["msg"], "Failed to send email.");
        assert_eq!(body["code"], "delivery_error");
    }

    #[tokio::test]
    async fn test_contact_name_with_line_break() {
        let app = test_app();

        let (status, _) = send(
            &app.router,
            post_json(
                "/send-contact-email",
                json!({ "name": "Jane\nDoe", "email": "jane@x.com", "message": "hi" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.mail.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_contact_name_with_line_break_over_smtp() {
        // Nothing listens on the local SMTPS port, so the send itself fails
        // after the message has been built.
        let transport = SmtpMailTransport::new(SmtpSettings {
            host: "127.0.0.1".to_string(),
            username: "relay@example.com".to_string(),
            password: "app-password".to_string(),
            from_name: "Virtua Mod Contact".to_string(),
        })
        .unwrap();
        let router = build_router(Arc::new(transport), RouterOptions::default());

        let (status, body) = send(
            &router,
            post_json(
                "/send-contact-email",
                json!({ "name": "Eve\nBcc: victim@x.com", "email": "eve@x.com", "message": "hi" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "delivery_error");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app();

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "user_store");

        let request = Request::builder().uri("/live").body(Body::empty()).unwrap();
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_is_permissive() {
        let app = test_app();

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/login")
            .header(header::ORIGIN, "https://www.virtuamod.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let app = test_app();

        let request = Request::builder().uri("/live").body(Body::empty()).unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_assets_are_served() {
        let dir = std::env::temp_dir().join(format!("assets-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("hello.txt"), "hello").await.unwrap();

        let app = test_app_with_options(RouterOptions {
            assets_dir: Some(dir.clone()),
            metrics: None,
        });

        let request = Request::builder()
            .uri("/assets/hello.txt")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/assets/missing.txt")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
