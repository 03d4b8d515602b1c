use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use dte_ingest_api::{config::AppConfig, db::DbPool, handlers, migrator::Migrator, AppState};

pub const MULTIPART_BOUNDARY: &str = "dteingesttestboundary";

pub struct TestApp {
    pub router: Router,
    pub db: Arc<DbPool>,
}

impl TestApp {
    pub async fn new() -> Self {
        // A single connection keeps every query on the same in-memory database
        let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
        opt.max_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.expect("connect sqlite");
        Migrator::up(&db, None).await.expect("run migrations");

        let db = Arc::new(db);
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database_url": "sqlite::memory:",
            "environment": "test",
        }))
        .expect("test config");

        let services = handlers::AppServices::new(db.clone());
        let state = Arc::new(AppState {
            db: db.clone(),
            config,
            services,
        });

        Self {
            router: handlers::app_router(state),
            db,
        }
    }

    /// Uploads `xml` as a multipart file part named "file".
    pub async fn upload_xml(&self, uri: &str, xml: &str) -> Response {
        self.upload_part(uri, "file", Some("dte.xml"), xml.as_bytes())
            .await
    }

    pub async fn upload_part(
        &self,
        uri: &str,
        field_name: &str,
        filename: Option<&str>,
        content: &[u8],
    ) -> Response {
        let disposition = match filename {
            Some(name) => format!("form-data; name=\"{field_name}\"; filename=\"{name}\""),
            None => format!("form-data; name=\"{field_name}\""),
        };

        let mut body = Vec::new();
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: {disposition}\r\nContent-Type: text/xml\r\n\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("send request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("send request")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Reads a decimal field serialized as a JSON string.
pub fn decimal_field(value: &Value, key: &str) -> rust_decimal::Decimal {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing decimal field {key}"))
        .parse()
        .expect("decimal value")
}
