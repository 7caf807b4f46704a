use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use mockpoint::config::Config;
use mockpoint::db::{EndpointStore, MemoryStore, StoreError};
use mockpoint::document::JSON_API;
use mockpoint::models::{Endpoint, EndpointDefinition, Verb};

/// A running test server backed by its own store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

/// Raw response pieces: status, headers and body text.
pub struct Reply {
    pub status: StatusCode,
    pub headers: reqwest::header::HeaderMap,
    pub text: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(json!(null))
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Reply {
        let resp = request.send().await.expect("request failed");
        let status = resp.status();
        let headers = resp.headers().clone();
        let text = resp.text().await.unwrap_or_default();
        Reply {
            status,
            headers,
            text,
        }
    }

    /// Management request with the JSON:API media type on both sides.
    pub async fn manage(&self, method: Method, path: &str, body: Option<&Value>) -> Reply {
        let mut request = self
            .client
            .request(method, self.url(path))
            .header("accept", JSON_API);
        if let Some(body) = body {
            request = request
                .header("content-type", JSON_API)
                .body(serde_json::to_vec(body).unwrap());
        }
        self.send(request).await
    }

    /// Request with arbitrary headers, for media type checks.
    pub async fn request_with(
        &self,
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Reply {
        let mut request = self.client.request(method, self.url(path));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body).unwrap());
        }
        self.send(request).await
    }

    /// Plain request against the mock surface.
    pub async fn call(&self, method: Method, path: &str) -> Reply {
        self.send(self.client.request(method, self.url(path))).await
    }

    pub async fn list(&self) -> Reply {
        self.manage(Method::GET, "/endpoints", None).await
    }

    pub async fn create(&self, document: &Value) -> Reply {
        self.manage(Method::POST, "/endpoints", Some(document)).await
    }

    /// Create and return the new record's id, asserting success.
    pub async fn create_ok(&self, document: &Value) -> String {
        let reply = self.create(document).await;
        assert_eq!(reply.status, StatusCode::CREATED, "create failed: {}", reply.text);
        reply.json()["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn update(&self, id: &str, document: &Value) -> Reply {
        self.manage(Method::PATCH, &format!("/endpoints/{id}"), Some(document))
            .await
    }

    pub async fn delete(&self, id: &str) -> Reply {
        self.manage(Method::DELETE, &format!("/endpoints/{id}"), None)
            .await
    }
}

/// A create/update document.
pub fn endpoint_doc(verb: &str, path: &str, code: u16, headers: Value, body: &str) -> Value {
    json!({
        "data": {
            "type": "endpoints",
            "attributes": {
                "verb": verb,
                "path": path,
                "response": {
                    "code": code,
                    "headers": headers,
                    "body": body
                }
            }
        }
    })
}

pub fn example_doc() -> Value {
    endpoint_doc(
        "GET",
        "/example",
        200,
        json!({ "Content-Type": "application/json" }),
        r#"{ "message": "Hello, world" }"#,
    )
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(MemoryStore::new())).await
}

/// Spawn the app on a random port over the given store.
pub async fn spawn_app_with(store: Arc<dyn EndpointStore>) -> TestApp {
    let config = Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        log_level: "warn".to_string(),
        ..Config::default()
    };

    let app = mockpoint::build_app(store, config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, client }
}

pub const OUTAGE: &str = "connection refused: db-primary.internal:5432";

/// A store whose every call fails, standing in for a database outage.
pub struct FailingStore;

#[async_trait]
impl EndpointStore for FailingStore {
    async fn list(&self) -> Result<Vec<Endpoint>, StoreError> {
        Err(StoreError::Unavailable(OUTAGE.to_string()))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Endpoint>, StoreError> {
        Err(StoreError::Unavailable(OUTAGE.to_string()))
    }

    async fn find_by_key(&self, _verb: Verb, _path: &str) -> Result<Option<Endpoint>, StoreError> {
        Err(StoreError::Unavailable(OUTAGE.to_string()))
    }

    async fn insert(&self, _def: &EndpointDefinition) -> Result<Endpoint, StoreError> {
        Err(StoreError::Unavailable(OUTAGE.to_string()))
    }

    async fn update(
        &self,
        _id: Uuid,
        _def: &EndpointDefinition,
    ) -> Result<Option<Endpoint>, StoreError> {
        Err(StoreError::Unavailable(OUTAGE.to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable(OUTAGE.to_string()))
    }
}
