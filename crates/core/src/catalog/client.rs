use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    error::CatalogError,
    models::{CarRecord, CatalogSnapshot},
};

/// Path of the catalog endpoint relative to the configured base URL.
pub const CARS_PATH: &str = "api/cars";

#[derive(Debug, Deserialize)]
struct CarsResponse {
    cars: Vec<CarRecord>,
}

/// HTTP client for `GET /api/cars?limit=<N>`.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    endpoint: Url,
    limit: u32,
}

impl CatalogClient {
    /// Build a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, limit: u32) -> Result<Self, CatalogError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{trimmed}/{CARS_PATH}")).map_err(|err| {
            CatalogError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: err.to_string(),
            }
        })?;
        Ok(Self {
            http: Client::new(),
            endpoint,
            limit,
        })
    }

    /// Full endpoint URL without the query string.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the catalog once. No retries.
    pub async fn fetch(&self) -> Result<CatalogSnapshot, CatalogError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("limit", self.limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { status });
        }

        let body: CarsResponse = response.json().await?;
        info!(count = body.cars.len(), endpoint = %self.endpoint, "catalog fetched");
        Ok(CatalogSnapshot::fetched(body.cars))
    }

    /// Fetch the catalog, logging any failure and falling back to an empty list.
    pub async fn fetch_or_empty(&self) -> CatalogSnapshot {
        match self.fetch().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(%err, endpoint = %self.endpoint, "Error fetching cars");
                CatalogSnapshot::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use anyhow::Result;
    use axum::{extract::Query, extract::State, http::StatusCode, routing::get, Json, Router};
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;
    use crate::models::CarId;

    type SeenQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

    async fn list_cars(
        State(seen): State<SeenQueries>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        seen.lock().push(query);
        Json(json!({
            "cars": [
                { "id": 1, "maker": "Audi", "model": "A4", "edition": "Avant", "power_hp": 204 },
                { "id": 2, "maker": "Audi", "model": "A4" },
                { "id": "x5", "maker": "BMW", "model": "X5" }
            ]
        }))
    }

    async fn broken() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom")
    }

    async fn spawn_server(app: Router) -> Result<String> {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(format!("http://{addr}"))
    }

    #[tokio::test]
    async fn fetches_cars_with_limit_query() -> Result<()> {
        let seen: SeenQueries = Arc::default();
        let app = Router::new()
            .route("/api/cars", get(list_cars))
            .with_state(Arc::clone(&seen));
        let base = spawn_server(app).await?;

        let client = CatalogClient::new(&format!("{base}/"), 25)?;
        let snapshot = client.fetch().await?;

        assert_eq!(snapshot.cars.len(), 3);
        assert!(snapshot.fetched_at.is_some());
        assert_eq!(snapshot.cars[0].details.get("power_hp"), Some(&json!(204)));
        assert_eq!(snapshot.cars[2].id, CarId::Text("x5".to_string()));

        let queries = seen.lock().clone();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].get("limit").map(String::as_str), Some("25"));
        Ok(())
    }

    #[tokio::test]
    async fn server_error_is_reported_and_fallback_is_empty() -> Result<()> {
        let app = Router::new().route("/api/cars", get(broken));
        let base = spawn_server(app).await?;
        let client = CatalogClient::new(&base, 10)?;

        match client.fetch().await {
            Err(CatalogError::Status { status }) => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let snapshot = client.fetch_or_empty().await;
        assert!(snapshot.cars.is_empty());
        assert!(snapshot.fetched_at.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_falls_back_to_empty() -> Result<()> {
        let app = Router::new().route("/api/cars", get(|| async { Json(json!({ "items": [] })) }));
        let base = spawn_server(app).await?;
        let client = CatalogClient::new(&base, 10)?;

        assert!(matches!(client.fetch().await, Err(CatalogError::Request(_))));
        assert!(client.fetch_or_empty().await.cars.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unusual_numeric_ids_do_not_empty_the_catalog() -> Result<()> {
        let app = Router::new().route(
            "/api/cars",
            get(|| async {
                Json(json!({
                    "cars": [
                        { "id": 1.5, "maker": "Audi", "model": "A4" },
                        { "id": 18446744073709551615u64, "maker": "BMW", "model": "X5" }
                    ]
                }))
            }),
        );
        let base = spawn_server(app).await?;
        let client = CatalogClient::new(&base, 10)?;

        let snapshot = client.fetch_or_empty().await;
        assert_eq!(snapshot.cars.len(), 2);
        assert_eq!(snapshot.cars[0].id.to_string(), "1.5");
        Ok(())
    }

        #[test]
    fn builds_endpoint_from_base_url() -> Result<()> {
        let client = CatalogClient::new("http://cars.test:8080/", 5)?;
        assert_eq!(client.endpoint().as_str(), "http://cars.test:8080/api/cars");

        let err = CatalogClient::new("not a url", 5).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBaseUrl { .. }));
        Ok(())
    }
}
