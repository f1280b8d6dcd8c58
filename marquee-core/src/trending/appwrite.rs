//! Appwrite Databases REST backend for trending records.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{SearchSeed, TrendingError, TrendingRecord, TrendingStore};
use crate::config::TrendingConfig;

/// Trending store backed by an Appwrite collection.
///
/// Each document carries `searchTerm`, `count`, `movie_id` and `poster_url`.
/// Ordering is done server-side with an `orderDesc("count")` query.
#[derive(Debug, Clone)]
pub struct AppwriteTrendingStore {
    client: reqwest::Client,
    endpoint: Url,
    project_id: String,
    api_key: Option<String>,
    database_id: String,
    collection_id: String,
}

/// List response from the documents endpoint.
#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<TrendingRecord>,
}

impl AppwriteTrendingStore {
    /// Creates a store from explicit settings.
    ///
    /// # Errors
    /// - `TrendingError::NotConfigured` - Endpoint is not a valid URL
    pub fn new(
        endpoint: &str,
        project_id: impl Into<String>,
        api_key: Option<String>,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Result<Self, TrendingError> {
        let endpoint = Url::parse(endpoint.trim_end_matches('/')).map_err(|e| {
            TrendingError::NotConfigured {
                what: format!("valid APPWRITE_ENDPOINT ({e})"),
            }
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            project_id: project_id.into(),
            api_key,
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        })
    }

    /// Creates a store from the trending section of the configuration.
    ///
    /// # Errors
    /// - `TrendingError::NotConfigured` - A required setting is absent or malformed
    pub fn from_config(config: &TrendingConfig) -> Result<Self, TrendingError> {
        let require = |value: &Option<String>, name: &str| {
            value.clone().ok_or_else(|| TrendingError::NotConfigured {
                what: name.to_string(),
            })
        };

        let endpoint = require(&config.endpoint, "APPWRITE_ENDPOINT")?;
        Self::new(
            &endpoint,
            require(&config.project_id, "APPWRITE_PROJECT_ID")?,
            config.api_key.clone(),
            require(&config.database_id, "APPWRITE_DATABASE_ID")?,
            require(&config.collection_id, "APPWRITE_COLLECTION_ID")?,
        )
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint.as_str().trim_end_matches('/'),
            urlencoding::encode(&self.database_id),
            urlencoding::encode(&self.collection_id)
        )
    }

    fn document_url(&self, document_id: &str) -> String {
        format!(
            "{}/{}",
            self.documents_url(),
            urlencoding::encode(document_id)
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request
            .header("accept", "application/json")
            .header("X-Appwrite-Project", &self.project_id);

        match self.api_key {
            Some(ref key) => request.header("X-Appwrite-Key", key),
            None => request,
        }
    }

    async fn list(&self, queries: &[String]) -> Result<Vec<TrendingRecord>, TrendingError> {
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();
        let url = self.documents_url();
        debug!(%url, ?queries, "listing trending documents");

        let response = self
            .authorize(self.client.get(&url).query(&params))
            .send()
            .await
            .map_err(|e| TrendingError::RequestFailed {
                reason: format!("Appwrite list failed: {e}"),
            })?;

        let list: DocumentList = decode(response).await?;
        Ok(list.documents)
    }

    async fn find_by_term(&self, search_term: &str) -> Result<Option<TrendingRecord>, TrendingError> {
        let documents = self
            .list(&[equal_query("searchTerm", search_term), limit_query(1)])
            .await?;
        Ok(documents.into_iter().next())
    }

    async fn increment(&self, record: &TrendingRecord) -> Result<TrendingRecord, TrendingError> {
        let response = self
            .authorize(self.client.patch(self.document_url(&record.id)))
            .json(&json!({ "data": { "count": record.count + 1 } }))
            .send()
            .await
            .map_err(|e| TrendingError::RequestFailed {
                reason: format!("Appwrite update failed: {e}"),
            })?;

        decode(response).await
    }

    async fn create(&self, seed: SearchSeed) -> Result<TrendingRecord, TrendingError> {
        let body = json!({
            "documentId": "unique()",
            "data": {
                "searchTerm": seed.search_term,
                "count": 1,
                "movie_id": seed.movie_id,
                "poster_url": seed.poster_url,
            }
        });

        let response = self
            .authorize(self.client.post(self.documents_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| TrendingError::RequestFailed {
                reason: format!("Appwrite create failed: {e}"),
            })?;

        decode(response).await
    }
}

#[async_trait]
impl TrendingStore for AppwriteTrendingStore {
    async fn top(&self, limit: usize) -> Result<Vec<TrendingRecord>, TrendingError> {
        self.list(&[limit_query(limit), order_desc_query("count")])
            .await
    }

    async fn upsert(&self, seed: SearchSeed) -> Result<TrendingRecord, TrendingError> {
        if seed.search_term.is_empty() {
            return Err(TrendingError::EmptySearchTerm);
        }

        match self.find_by_term(&seed.search_term).await? {
            Some(existing) => self.increment(&existing).await,
            None => self.create(seed).await,
        }
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TrendingError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TrendingError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| TrendingError::ParseError {
            reason: e.to_string(),
        })
}

fn equal_query(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

fn limit_query(limit: usize) -> String {
    json!({ "method": "limit", "values": [limit] }).to_string()
}

fn order_desc_query(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::extract::{Path, RawQuery, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, patch};
    use axum::Json;
    use parking_lot::Mutex;
    use serde_json::Value;

    use super::*;

    #[derive(Clone, Default)]
    struct Collection {
        documents: Arc<Mutex<Vec<Value>>>,
        saw_project_header: Arc<Mutex<bool>>,
    }

    async fn list_documents(
        State(collection): State<Collection>,
        headers: HeaderMap,
        RawQuery(query): RawQuery,
    ) -> Json<Value> {
        if headers.get("X-Appwrite-Project").is_some() {
            *collection.saw_project_header.lock() = true;
        }

        let query = urlencoding::decode(&query.unwrap_or_default())
            .map(|q| q.into_owned())
            .unwrap_or_default();
        let mut documents = collection.documents.lock().clone();

        if let Some(start) = query.find(r#""values":[""#) {
            if query.contains(r#""method":"equal""#) {
                let rest = &query[start + r#""values":[""#.len()..];
                let term = rest.split('"').next().unwrap_or_default();
                documents.retain(|doc| doc["searchTerm"] == term);
            }
        }
        if query.contains(r#""method":"orderDesc""#) {
            documents.sort_by_key(|doc| std::cmp::Reverse(doc["count"].as_u64().unwrap_or(0)));
        }

        Json(serde_json::json!({ "total": documents.len(), "documents": documents }))
    }

    async fn create_document(
        State(collection): State<Collection>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let mut document = body["data"].clone();
        let mut documents = collection.documents.lock();
        document["$id"] = Value::String(format!("doc{}", documents.len() + 1));
        documents.push(document.clone());
        (StatusCode::CREATED, Json(document))
    }

    async fn update_document(
        State(collection): State<Collection>,
        Path((_db, _col, id)): Path<(String, String, String)>,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, StatusCode> {
        let mut documents = collection.documents.lock();
        let document = documents
            .iter_mut()
            .find(|doc| doc["$id"] == id.as_str())
            .ok_or(StatusCode::NOT_FOUND)?;
        document["count"] = body["data"]["count"].clone();
        Ok(Json(document.clone()))
    }

    async fn spawn_stub(collection: Collection) -> String {
        let app = Router::new()
            .route(
                "/v1/databases/{db}/collections/{col}/documents",
                get(list_documents).post(create_document),
            )
            .route(
                "/v1/databases/{db}/collections/{col}/documents/{id}",
                patch(update_document),
            )
            .with_state(collection);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{address}/v1")
    }

    fn seed(term: &str) -> SearchSeed {
        SearchSeed {
            search_term: term.to_string(),
            movie_id: 268,
            poster_url: Some("https://image.tmdb.org/t/p/w500/p.jpg".to_string()),
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_increments() {
        let collection = Collection::default();
        let endpoint = spawn_stub(collection.clone()).await;
        let store =
            AppwriteTrendingStore::new(&endpoint, "project", Some("key".into()), "db", "metrics")
                .unwrap();

        let created = store.upsert(seed("batman")).await.unwrap();
        assert_eq!(created.count, 1);
        assert_eq!(created.movie_id, Some(268));

        let bumped = store.upsert(seed("batman")).await.unwrap();
        assert_eq!(bumped.count, 2);
        assert_eq!(bumped.id, created.id);
        assert_eq!(collection.documents.lock().len(), 1);
        assert!(*collection.saw_project_header.lock());
    }

    #[tokio::test]
    async fn test_top_uses_server_order() {
        let collection = Collection::default();
        collection.documents.lock().extend([
            serde_json::json!({"$id": "a", "searchTerm": "alien", "count": 1}),
            serde_json::json!({"$id": "b", "searchTerm": "batman", "count": 7}),
        ]);
        let endpoint = spawn_stub(collection).await;
        let store = AppwriteTrendingStore::new(&endpoint, "project", None, "db", "metrics").unwrap();

        let top = store.top(5).await.unwrap();
        assert_eq!(top[0].search_term, "batman");
        assert_eq!(top[1].poster_url, None);
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let endpoint = spawn_stub(Collection::default()).await;
        let store = AppwriteTrendingStore::new(
            &endpoint.replace("/v1", "/missing"),
            "project",
            None,
            "db",
            "metrics",
        )
        .unwrap();

        let result = store.top(5).await;
        assert!(matches!(
            result,
            Err(TrendingError::UnexpectedStatus { status: 404, .. })
        ));
    }

    #[test]
    fn test_from_config_requires_fields() {
        let config = TrendingConfig {
            endpoint: Some("https://cloud.appwrite.io/v1".to_string()),
            ..Default::default()
        };

        let error = AppwriteTrendingStore::from_config(&config).unwrap_err();
        assert!(matches!(error, TrendingError::NotConfigured { what } if what == "APPWRITE_PROJECT_ID"));
    }

    #[test]
    fn test_query_encoding() {
        let equal: Value = serde_json::from_str(&equal_query("searchTerm", "batman")).unwrap();
        assert_eq!(
            equal,
            serde_json::json!({"method": "equal", "attribute": "searchTerm", "values": ["batman"]})
        );

        let order: Value = serde_json::from_str(&order_desc_query("count")).unwrap();
        assert_eq!(order["method"], "orderDesc");
        assert_eq!(order["attribute"], "count");
    }
}
