use serde_json::json;
use thiserror::Error;

use crate::ragflow::types::{Dataset, Envelope, RetrievalChunk, RetrievalData};

const DATASETS_PATH: &str = "/api/v1/datasets";
const RETRIEVAL_PATH: &str = "/api/v1/retrieval";

#[derive(Debug, Error)]
pub enum RagflowError {
    #[error("transport error: {0}")]
    Http(String),
    #[error("upstream status {0}")]
    Status(u16),
    #[error("upstream code {code}: {message}")]
    Api { code: i64, message: String },
    #[error("decode error: {0}")]
    Decode(String),
}

/// Typed client for the vendor knowledge-base API. All requests carry
/// `Authorization: Bearer <token>`; responses use a `{code, data}` envelope
/// where only code 0 is success.
#[derive(Clone)]
pub struct RagflowClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RagflowClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, token: token.into() }
    }

    fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<Option<T>, RagflowError> {
        if envelope.code != 0 {
            return Err(RagflowError::Api {
                code: envelope.code,
                message: envelope.message.unwrap_or_default(),
            });
        }
        Ok(envelope.data)
    }

    /// List datasets with vendor-side paging.
    pub async fn list_datasets(&self, page: u32, page_size: u32) -> Result<Vec<Dataset>, RagflowError> {
        let url = format!("{}{}", self.base_url, DATASETS_PATH);
        let resp = self
            .http
            .get(&url)
            .query(&[("page", page.to_string()), ("page_size", page_size.to_string())])
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| RagflowError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RagflowError::Status(status.as_u16()));
        }
        let envelope: Envelope<Vec<Dataset>> = resp
            .json()
            .await
            .map_err(|e| RagflowError::Decode(e.to_string()))?;
        Ok(Self::unwrap_envelope(envelope)?.unwrap_or_default())
    }

    /// Query retrieval chunks for a question across the given datasets.
    pub async fn retrieval(&self, question: &str, dataset_ids: &[String]) -> Result<Vec<RetrievalChunk>, RagflowError> {
        let url = format!("{}{}", self.base_url, RETRIEVAL_PATH);
        let resp = self
            .http
            .post(&url)
            .json(&json!({ "question": question, "dataset_ids": dataset_ids }))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| RagflowError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RagflowError::Status(status.as_u16()));
        }
        let envelope: Envelope<RetrievalData> = resp
            .json()
            .await
            .map_err(|e| RagflowError::Decode(e.to_string()))?;
        Ok(Self::unwrap_envelope(envelope)?.unwrap_or_default().chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::collections::HashMap;

    async fn serve_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn list_datasets_decodes_data_array() {
        let app = Router::new().route(
            "/api/v1/datasets",
            get(|headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(
                    headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
                    Some("Bearer tok-1")
                );
                assert_eq!(q.get("page").map(String::as_str), Some("1"));
                assert_eq!(q.get("page_size").map(String::as_str), Some("1000"));
                Json(serde_json::json!({
                    "code": 0,
                    "data": [
                        {"id": "ds1", "name": "manuals", "chunk_count": 3},
                        {"id": "ds2", "name": "faq"}
                    ]
                }))
            }),
        );
        let base = serve_stub(app).await;

        let client = RagflowClient::new(reqwest::Client::new(), &base, "tok-1");
        let datasets = client.list_datasets(1, 1000).await.expect("list ok");
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].id, "ds1");
        assert_eq!(datasets[0].chunk_count, Some(3));
        assert_eq!(datasets[1].name, "faq");
    }

    #[tokio::test]
    async fn vendor_error_code_is_surfaced() {
        let app = Router::new().route(
            "/api/v1/datasets",
            get(|| async { Json(serde_json::json!({"code": 1, "message": "bad token"})) }),
        );
        let base = serve_stub(app).await;

        let client = RagflowClient::new(reqwest::Client::new(), &base, "t");
        let err = client.list_datasets(1, 10).await.unwrap_err();
        assert!(matches!(err, RagflowError::Api { code: 1, .. }));
    }

    #[tokio::test]
    async fn http_error_status_is_surfaced() {
        let app = Router::new().route(
            "/api/v1/datasets",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = serve_stub(app).await;

        let client = RagflowClient::new(reqwest::Client::new(), &base, "t");
        let err = client.list_datasets(1, 10).await.unwrap_err();
        assert!(matches!(err, RagflowError::Status(500)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let app = Router::new().route(
            "/api/v1/datasets",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{not json") }),
        );
        let base = serve_stub(app).await;

        let client = RagflowClient::new(reqwest::Client::new(), &base, "t");
        let err = client.list_datasets(1, 10).await.unwrap_err();
        assert!(matches!(err, RagflowError::Decode(_)));
    }

    #[tokio::test]
    async fn missing_data_field_is_an_empty_list() {
        let app = Router::new().route(
            "/api/v1/datasets",
            get(|| async { Json(serde_json::json!({"code": 0})) }),
        );
        let base = serve_stub(app).await;

        let client = RagflowClient::new(reqwest::Client::new(), &base, "t");
        let datasets = client.list_datasets(1, 10).await.expect("ok");
        assert!(datasets.is_empty());
    }

    #[tokio::test]
    async fn retrieval_extracts_chunks() {
        let app = Router::new().route(
            "/api/v1/retrieval",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["question"], "how do I reset?");
                assert_eq!(body["dataset_ids"][0], "ds1");
                Json(serde_json::json!({
                    "code": 0,
                    "data": {
                        "chunks": [
                            {"content": "hold the button", "similarity": 0.9},
                            {"content": "for five seconds"}
                        ],
                        "total": 2
                    }
                }))
            }),
        );
        let base = serve_stub(app).await;

        let client = RagflowClient::new(reqwest::Client::new(), &base, "t");
        let chunks = client
            .retrieval("how do I reset?", &["ds1".to_string()])
            .await
            .expect("retrieval ok");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "hold the button");
        assert_eq!(chunks[0].similarity, Some(0.9));
    }
}
