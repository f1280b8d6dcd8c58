//! Stub TMDB and Appwrite servers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};

/// Scripted TMDB answer for one query.
#[derive(Clone)]
pub enum TmdbReply {
    Body(Value),
    Delayed(Duration, Value),
    Status(StatusCode),
}

/// TMDB stub keyed by query text (`""` for discover).
#[derive(Clone, Default)]
pub struct TmdbStub {
    replies: Arc<Mutex<HashMap<String, TmdbReply>>>,
    pub requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl TmdbStub {
    pub fn reply(self, query: &str, reply: TmdbReply) -> Self {
        self.replies.lock().insert(query.to_string(), reply);
        self
    }

    async fn answer(&self, query: String, headers: &HeaderMap) -> Result<Json<Value>, StatusCode> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().push((query.clone(), auth));

        let reply = self.replies.lock().get(&query).cloned();
        match reply {
            Some(TmdbReply::Body(body)) => Ok(Json(body)),
            Some(TmdbReply::Delayed(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(Json(body))
            }
            Some(TmdbReply::Status(status)) => Err(status),
            None => Ok(Json(json!({ "page": 1, "results": [] }))),
        }
    }
}

async fn tmdb_search(
    State(stub): State<TmdbStub>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let query = params.get("query").cloned().unwrap_or_default();
    stub.answer(query, &headers).await
}

async fn tmdb_discover(
    State(stub): State<TmdbStub>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    assert_eq!(params.get("sort_by").map(String::as_str), Some("popularity.desc"));
    stub.answer(String::new(), &headers).await
}

/// Starts the TMDB stub; returns its `/3` base URL.
pub async fn spawn_tmdb(stub: TmdbStub) -> String {
    let app = Router::new()
        .route("/3/search/movie", get(tmdb_search))
        .route("/3/discover/movie", get(tmdb_discover))
        .with_state(stub);
    format!("{}/3", serve(app).await)
}

/// Appwrite documents collection stub.
#[derive(Clone, Default)]
pub struct AppwriteStub {
    pub documents: Arc<Mutex<Vec<Value>>>,
}

impl AppwriteStub {
    pub fn document(&self, term: &str) -> Option<Value> {
        self.documents
            .lock()
            .iter()
            .find(|doc| doc["searchTerm"] == term)
            .cloned()
    }
}

async fn list_documents(
    State(stub): State<AppwriteStub>,
    RawQuery(raw): RawQuery,
) -> Json<Value> {
    let queries: Vec<Value> = raw
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter_map(|(_, value)| {
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(|decoded| decoded.into_owned())
        })
        .filter_map(|value| serde_json::from_str(&value).ok())
        .collect();

    let mut documents = stub.documents.lock().clone();
    for query in &queries {
        match query["method"].as_str() {
            Some("equal") => {
                let attribute = query["attribute"].as_str().unwrap_or_default();
                let values = query["values"].as_array().cloned().unwrap_or_default();
                documents.retain(|doc| values.contains(&doc[attribute]));
            }
            Some("orderDesc") => {
                let attribute = query["attribute"].as_str().unwrap_or_default().to_string();
                documents.sort_by_key(|doc| std::cmp::Reverse(doc[&attribute].as_u64()));
            }
            _ => {}
        }
    }
    for query in &queries {
        if query["method"] == "limit" {
            let limit = query["values"][0].as_u64().unwrap_or(25) as usize;
            documents.truncate(limit);
        }
    }

    Json(json!({ "total": documents.len(), "documents": documents }))
}

async fn create_document(
    State(stub): State<AppwriteStub>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut documents = stub.documents.lock();
    let mut document = body["data"].clone();
    document["$id"] = json!(format!("doc{}", documents.len() + 1));
    documents.push(document.clone());
    (StatusCode::CREATED, Json(document))
}

async fn update_document(
    State(stub): State<AppwriteStub>,
    Path((_database, _collection, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut documents = stub.documents.lock();
    let document = documents
        .iter_mut()
        .find(|doc| doc["$id"] == id.as_str())
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(fields) = body["data"].as_object() {
        for (key, value) in fields {
            document[key] = value.clone();
        }
    }
    Ok(Json(document.clone()))
}

/// Starts the Appwrite stub; returns its `/v1` endpoint.
pub async fn spawn_appwrite(stub: AppwriteStub) -> String {
    let app = Router::new()
        .route(
            "/v1/databases/{database}/collections/{collection}/documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/v1/databases/{database}/collections/{collection}/documents/{id}",
            patch(update_document),
        )
        .with_state(stub);
    format!("{}/v1", serve(app).await)
}

/// Serves `app` on an ephemeral local port; returns `http://host:port`.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

/// Address with nothing listening on it.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{address}/v1")
}
