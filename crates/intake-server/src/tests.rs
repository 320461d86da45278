//! Configuration and wiring tests.

use std::{collections::HashMap, path::Path, sync::Arc, time::Duration};

use axum::{
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use intake_mail::SmtpMailer;
use intake_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{ServerConfig, StoreLocation, build_app};

fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
  let env: HashMap<String, String> = vars
    .iter()
    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
    .collect();
  ServerConfig::from_sources(Path::new("does-not-exist.toml"), Some(env))
    .expect("config")
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[test]
fn defaults_apply_without_any_source() {
  let c = config_from(&[]);
  assert_eq!(c.address(), "0.0.0.0:8001");
  assert_eq!(c.contact_email, "info@mg-experts.com");
  assert_eq!(c.smtp_port, 587);
  assert!(c.smtp_host.is_none());
  assert!(c.allowed_origins().is_none());

  let policy = c.rate_limit_policy();
  assert_eq!(policy.limit, 3);
  assert_eq!(policy.window, Duration::from_secs(300));
}

#[test]
fn environment_overrides_defaults() {
  let c = config_from(&[
    ("SMTP_HOST", "smtp.example.com"),
    ("SMTP_PORT", "2525"),
    ("SMTP_USER", "notifier@example.com"),
    ("SMTP_PASS", "hunter2"),
    ("CONTACT_EMAIL", "sales@example.com"),
    ("RATE_LIMIT", "5"),
    ("RATE_WINDOW_SECS", "60"),
  ]);

  let mail = c.mail();
  assert_eq!(mail.host.as_deref(), Some("smtp.example.com"));
  assert_eq!(mail.port, 2525);
  assert_eq!(mail.user.as_deref(), Some("notifier@example.com"));
  assert_eq!(mail.password.as_deref(), Some("hunter2"));
  assert_eq!(mail.recipient, "sales@example.com");
  assert_eq!(c.rate_limit_policy().limit, 5);
  assert_eq!(c.rate_limit_policy().window, Duration::from_secs(60));
}

#[test]
fn numeric_looking_strings_are_kept_verbatim() {
  let c = config_from(&[
    ("SMTP_PASS", "0123"),
    ("SMTP_USER", "1e3"),
    ("DB_NAME", "007"),
    ("DATABASE_URL", "/srv"),
    ("PORT", "9000"),
  ]);
  assert_eq!(c.smtp_pass.as_deref(), Some("0123"));
  assert_eq!(c.smtp_user.as_deref(), Some("1e3"));
  assert_eq!(c.store_location(), StoreLocation::File("/srv/007.sqlite3".into()));
  assert_eq!(c.port, 9000);
  assert_eq!(c.mail().password.as_deref(), Some("0123"));
}

#[test]
fn zero_rate_limit_is_rejected() {
  let err = ServerConfig::from_sources(
    Path::new("does-not-exist.toml"),
    Some(HashMap::from([("RATE_LIMIT".to_owned(), "0".to_owned())])),
  )
  .unwrap_err();
  assert!(err.to_string().contains("rate_limit"), "{err}");
}

#[test]
fn zero_rate_window_is_rejected() {
  let err = ServerConfig::from_sources(
    Path::new("does-not-exist.toml"),
    Some(HashMap::from([("RATE_WINDOW_SECS".to_owned(), "0".to_owned())])),
  )
  .unwrap_err();
  assert!(err.to_string().contains("rate_window_secs"), "{err}");
}

#[test]
fn missing_smtp_settings_disable_the_mailer() {
  let c = config_from(&[("SMTP_HOST", "smtp.example.com")]);
  assert!(SmtpMailer::from_config(&c.mail()).unwrap().is_none());
}

#[test]
fn store_location_joins_directory_and_name() {
  let c = config_from(&[("DATABASE_URL", "/var/lib/intake"), ("DB_NAME", "contact")]);
  assert_eq!(
    c.store_location(),
    StoreLocation::File("/var/lib/intake/contact.sqlite3".into())
  );

  let c = config_from(&[("DATABASE_URL", ":memory:")]);
  assert_eq!(c.store_location(), StoreLocation::Memory);
}

#[test]
fn cors_origins_are_split_and_trimmed() {
  let c = config_from(&[(
    "CORS_ORIGINS",
    "https://mg-experts.com, https://www.mg-experts.com,",
  )]);
  let origins = c.allowed_origins().unwrap();
  assert_eq!(origins, ["https://mg-experts.com", "https://www.mg-experts.com"]);

  let c = config_from(&[("CORS_ORIGINS", "https://a.example,*")]);
  assert!(c.allowed_origins().is_none());
}

// ─── Wiring ──────────────────────────────────────────────────────────────────

async fn app(vars: &[(&str, &str)]) -> axum::Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let (router, _worker) = build_app(&config_from(vars), Arc::new(store), None::<SmtpMailer>);
  router
}

#[tokio::test]
async fn api_is_mounted_under_prefix() {
  let router = app(&[]).await;

  let req = Request::builder()
    .method(Method::POST)
    .uri("/api/status")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(r#"{"client_name":"probe"}"#))
    .unwrap();
  let resp = router.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);

  let req = Request::builder().uri("/api/status").body(Body::empty()).unwrap();
  let resp = router.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let listed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(listed.as_array().unwrap().len(), 1);

  let req = Request::builder().uri("/status").body(Body::empty()).unwrap();
  let resp = router.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn configured_rate_limit_is_enforced_over_http() {
  let router = app(&[("RATE_LIMIT", "1")]).await;
  let body = r#"{"name":"Ada","email":"a@x.com","projectBrief":"brief"}"#;

  let mut statuses = Vec::new();
  for _ in 0..2 {
    let req = Request::builder()
      .method(Method::POST)
      .uri("/api/contact")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body))
      .unwrap();
    statuses.push(router.clone().oneshot(req).await.unwrap().status());
  }
  assert_eq!(statuses, [StatusCode::CREATED, StatusCode::TOO_MANY_REQUESTS]);
}

#[tokio::test]
async fn wildcard_cors_allows_any_origin() {
  let router = app(&[]).await;
  let req = Request::builder()
    .uri("/api/status")
    .header(header::ORIGIN, "https://anywhere.example")
    .body(Body::empty())
    .unwrap();
  let resp = router.oneshot(req).await.unwrap();
  assert_eq!(
    resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
    "*"
  );
}

#[tokio::test]
async fn listed_cors_origin_is_echoed_with_credentials() {
  let router = app(&[("CORS_ORIGINS", "https://mg-experts.com")]).await;

  let preflight = Request::builder()
    .method(Method::OPTIONS)
    .uri("/api/contact")
    .header(header::ORIGIN, "https://mg-experts.com")
    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
    .body(Body::empty())
    .unwrap();
  let resp = router.clone().oneshot(preflight).await.unwrap();
  let headers = resp.headers();
  assert_eq!(
    headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
    "https://mg-experts.com"
  );
  assert_eq!(
    headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
    "true"
  );

  let foreign = Request::builder()
    .uri("/api/status")
    .header(header::ORIGIN, "https://evil.example")
    .body(Body::empty())
    .unwrap();
  let resp = router.oneshot(foreign).await.unwrap();
  assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
