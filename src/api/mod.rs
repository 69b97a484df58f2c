//! HTTP surface.
//!
//! The API is a single route. The resource is chosen by the `endpoint` query
//! parameter (`products`, `transactions`, `guru`, `jadwal`), the row by the
//! optional `id` parameter, and the operation by the HTTP verb. Only the two
//! resources of the configured [`Instance`] are served; the others answer 404.

/// Per-resource verb handlers
pub mod handlers;
/// Error-to-status mapping and success bodies
pub mod response;

use crate::{config::Instance, errors::Error};
use axum::{
    Router,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::any,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, field, instrument};

/// Shared state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool
    pub db: Arc<DatabaseConnection>,
    /// Resource pair served by this deployment
    pub instance: Instance,
}

/// The four resource collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// `endpoint=products`
    Products,
    /// `endpoint=transactions`
    Transactions,
    /// `endpoint=guru`
    Guru,
    /// `endpoint=jadwal`
    Jadwal,
}

impl Resource {
    /// Resolves the `endpoint` query value.
    #[must_use]
    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        match endpoint {
            "products" => Some(Self::Products),
            "transactions" => Some(Self::Transactions),
            "guru" => Some(Self::Guru),
            "jadwal" => Some(Self::Jadwal),
            _ => None,
        }
    }

    /// The `endpoint` query value for this resource.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Transactions => "transactions",
            Self::Guru => "guru",
            Self::Jadwal => "jadwal",
        }
    }

    /// The instance that owns this resource.
    #[must_use]
    pub const fn instance(self) -> Instance {
        match self {
            Self::Products | Self::Transactions => Instance::Inventory,
            Self::Guru | Self::Jadwal => Instance::School,
        }
    }
}

/// Query-string parameters of the single API route.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApiQuery {
    /// Resource name
    pub endpoint: Option<String>,
    /// Primary key, as text
    pub id: Option<String>,
}

impl ApiQuery {
    /// Picks the known parameters out of decoded pairs. A repeated key keeps
    /// its last value; unknown keys are ignored.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |mut query, (key, value)| {
                match key.as_str() {
                    "endpoint" => query.endpoint = Some(value),
                    "id" => query.id = Some(value),
                    _ => {}
                }
                query
            })
    }
}

/// Parses the `id` parameter like an integer coercion: leading whitespace, an
/// optional sign, then the leading digits (`"12abc"` is 12). No digits, `0`, or
/// a value past the `i64` range count as "no id".
#[must_use]
pub fn parse_id(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    let parsed = if negative {
        format!("-{digits}").parse::<i64>()
    } else {
        digits.parse::<i64>()
    };
    parsed.ok().filter(|id| *id != 0)
}

/// Builds the application router mounted at `api_path`.
pub fn router(state: AppState, api_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(api_path, any(dispatch))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves the resource and id from the query string and runs the verb.
///
/// OPTIONS is answered before the endpoint is looked at.
/// A query string that cannot be decoded is answered with a JSON 400.
#[instrument(skip_all, fields(%method, endpoint = field::Empty, id = field::Empty))]
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    pairs: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let query = match pairs {
        Ok(Query(pairs)) => ApiQuery::from_pairs(pairs),
        Err(rejection) => {
            return Error::validation(format!("Invalid query string: {}", rejection.body_text()))
                .into_response();
        }
    };
    let span = Span::current();
    if let Some(endpoint) = &query.endpoint {
        span.record("endpoint", endpoint.as_str());
    }
    if let Some(id) = &query.id {
        span.record("id", id.as_str());
    }

    let Some(resource) = query
        .endpoint
        .as_deref()
        .and_then(Resource::from_endpoint)
        .filter(|r| r.instance() == state.instance)
    else {
        return Error::UnknownEndpoint.into_response();
    };

    let id = parse_id(query.id.as_deref());
    let db = state.db.as_ref();
    let result = match resource {
        Resource::Products => handlers::products(db, &method, id, &body).await,
        Resource::Transactions => handlers::transactions(db, &method, id, &body).await,
        Resource::Guru => handlers::gurus(db, &method, id, &body).await,
        Resource::Jadwal => handlers::jadwal(db, &method, id, &body).await,
    };
    result.unwrap_or_else(IntoResponse::into_response)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn app(instance: Instance) -> Router {
        let db = setup_test_db().await.unwrap();
        router(
            AppState {
                db: Arc::new(db),
                instance,
            },
            "/api",
        )
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some("12")), Some(12));
        assert_eq!(parse_id(Some(" 7")), Some(7));
        assert_eq!(parse_id(Some("1abc")), Some(1));
        assert_eq!(parse_id(Some("-3")), Some(-3));
        assert_eq!(parse_id(Some("0")), None);
        assert_eq!(parse_id(Some("abc")), None);
        assert_eq!(parse_id(Some("99999999999999999999")), None);
        assert_eq!(parse_id(None), None);
    }

    #[test]
    fn test_query_pairs_last_value_wins() {
        let pairs = vec![
            ("endpoint".to_string(), "products".to_string()),
            ("id".to_string(), "1".to_string()),
            ("id".to_string(), "2".to_string()),
            ("page".to_string(), "3".to_string()),
        ];
        assert_eq!(
            ApiQuery::from_pairs(pairs),
            ApiQuery {
                endpoint: Some("products".to_string()),
                id: Some("2".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_duplicate_query_keys_still_answer_json() {
        let app = app(Instance::Inventory).await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/api?endpoint=products",
            Some(json!({"name": "Pen", "price": 5000})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/api?endpoint=products&id=999&id={id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Pen");

        let (status, body) =
            call(&app, Method::GET, &format!("/api?endpoint=products&id={id}abc"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id);

        let (status, body) =
            call(&app, Method::OPTIONS, "/api?endpoint=products&id=1&id=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_out_of_range_quantity_is_rejected() {
        let app = app(Instance::Inventory).await;
        call(
            &app,
            Method::POST,
            "/api?endpoint=products",
            Some(json!({"name": "Pen", "price": 5000})),
        )
        .await;

        for quantity in [json!(1e20), json!("99999999999999999999")] {
            let (status, body) = call(
                &app,
                Method::POST,
                "/api?endpoint=transactions",
                Some(json!({"product_id": 1, "quantity": quantity})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].as_str().unwrap().contains("out of range"));
        }

        let (_, body) = call(&app, Method::GET, "/api?endpoint=transactions", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_products_crud_roundtrip() {
        let app = app(Instance::Inventory).await;

        let (status, body) = call(&app, Method::GET, "/api?endpoint=products", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = call(
            &app,
            Method::POST,
            "/api?endpoint=products",
            Some(json!({"name": "Pen", "price": "5000"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Product created successfully");
        let id = body["id"].as_i64().unwrap();

        let (status, body) =
            call(&app, Method::GET, &format!("/api?endpoint=products&id={id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Pen");
        assert_eq!(body["price"], 5000.0);

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/api?endpoint=products&id={id}"),
            Some(json!({"name": "Pencil"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) =
            call(&app, Method::GET, &format!("/api?endpoint=products&id={id}"), None).await;
        assert_eq!(body["name"], "Pencil");
        assert_eq!(body["price"], 5000.0);

        let (status, body) = call(
            &app,
            Method::DELETE,
            &format!("/api?endpoint=products&id={id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product deleted successfully");

        let (status, body) = call(
            &app,
            Method::DELETE,
            &format!("/api?endpoint=products&id={id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found");
    }

    #[tokio::test]
    async fn test_validation_errors_are_400() {
        let app = app(Instance::Inventory).await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api?endpoint=products",
            Some(json!({"name": "Pen"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name and price are required");

        let (status, body) = call(&app, Method::POST, "/api?endpoint=products", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Name and price are required");

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api?endpoint=products",
            Some(json!({"name": "Pen"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Product ID is required");

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api?endpoint=products&id=1",
            Some(json!({"colour": "red"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No fields to update");
    }

    #[tokio::test]
    async fn test_transactions_are_enriched() {
        let app = app(Instance::Inventory).await;
        call(
            &app,
            Method::POST,
            "/api?endpoint=products",
            Some(json!({"name": "Pen", "price": 5000})),
        )
        .await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api?endpoint=transactions",
            Some(json!({"product_id": "1", "quantity": "3"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);

        let (status, body) = call(&app, Method::GET, "/api?endpoint=transactions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["product_name"], "Pen");
        assert_eq!(body[0]["product_price"], 5000.0);
        assert_eq!(body[0]["quantity"], 3);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api?endpoint=transactions",
            Some(json!({"product_id": 99, "quantity": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_teacher_delete_guard() {
        let app = app(Instance::School).await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api?endpoint=guru",
            Some(json!({"nama_guru": "Budi", "mata_pelajaran": "Fisika", "no_telepon": "0812"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let guru_id = body["id"].as_i64().unwrap();

        for hari in ["Senin", "Selasa"] {
            let (status, _) = call(
                &app,
                Method::POST,
                "/api?endpoint=jadwal",
                Some(json!({"guru": "Budi", "mapel": "Fisika", "hari": hari, "jam": "07:00"})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = call(
            &app,
            Method::POST,
            "/api?endpoint=jadwal",
            Some(json!({"guru": "Siti", "mapel": "Kimia", "hari": "Rabu", "jam": "08:00"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("add the teacher first"));

        let (status, body) = call(
            &app,
            Method::DELETE,
            &format!("/api?endpoint=guru&id={guru_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["references"], 2);

        let (_, body) = call(&app, Method::GET, "/api?endpoint=jadwal", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["guru"], "Budi");
        assert_eq!(body[0]["guru_id"], guru_id);
    }

    #[tokio::test]
    async fn test_routing_errors() {
        let app = app(Instance::Inventory).await;

        let (status, body) = call(&app, Method::GET, "/api?endpoint=orders", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint not found");

        let (status, _) = call(&app, Method::GET, "/api", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // The other instance's endpoints are not served.
        let (status, _) = call(&app, Method::GET, "/api?endpoint=guru", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(&app, Method::PATCH, "/api?endpoint=products", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed");

        let (status, body) = call(&app, Method::OPTIONS, "/api?endpoint=products", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let app = app(Instance::Inventory).await;
        let request = Request::builder()
            .uri("/api?endpoint=products")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
