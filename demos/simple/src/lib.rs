use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, response::Html, routing::get, BoxError,
    Extension, Router,
};
use lazy_static::lazy_static;
use minijinja::{context, Environment};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_response_tagger::{ResponseTaggerLayer, SessionKey};
use tracing::Level;

const INDEX_TEMPLATE: &str = r#"<!doctype html>
<html>
  <head>
    <meta name="csrf-token" content="{{ csrf_token }}">
    <title>tagger demo</title>
  </head>
  <body>
    <h1>Stable tags for unstable pages</h1>
    <p>Reload me: my csrf token and script nonce change, my ETag does not.</p>
    <script nonce="{{ nonce }}">console.log("tagged");</script>
  </body>
</html>
"#;

lazy_static! {
    pub static ref TEMPLATES: Environment<'static> = {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE).unwrap();
        env
    };
}

pub async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let app = Router::new()
        .route("/", get(home))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_tagger_layer_err))
                .layer(Extension(SessionKey::from("demo-session")))
                .layer(ResponseTaggerLayer::new()),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();
    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}

pub async fn handle_tagger_layer_err<T: Into<BoxError>>(err: T) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.into().to_string())
}

pub async fn home() -> axum::response::Result<Html<String>> {
    let template = TEMPLATES.get_template("index.html").unwrap();
    let html = template
        .render(context! {
            csrf_token => per_request_token(),
            nonce => per_request_token(),
        })
        .map_err(|_| StatusCode::from_u16(500).unwrap())?;
    Ok(html.into())
}

/// Fresh opaque value per call, the kind of volatile field the tagger
/// normalizes out of the digest.
fn per_request_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{nanos:x}")
}
