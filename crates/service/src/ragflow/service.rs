use std::sync::Arc;

use arc_swap::ArcSwap;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::ServiceError;
use crate::param_service;
use crate::ragflow::client::RagflowClient;
use crate::ragflow::types::Dataset;
use crate::ragflow::{PARAM_RAGFLOW_API, PARAM_RAGFLOW_TOKEN, UNSET_PLACEHOLDER};

/// Snapshot of the two integration settings. A missing, blank, or
/// placeholder value leaves the corresponding field unset.
#[derive(Debug, Clone, Default)]
pub struct RagflowSettings {
    pub api_url: Option<String>,
    pub token: Option<String>,
}

impl RagflowSettings {
    /// Read both settings from the parameter store.
    pub async fn load(db: &DatabaseConnection) -> Result<Self, ServiceError> {
        let api_url = normalize(param_service::get_value(db, PARAM_RAGFLOW_API).await?);
        let token = normalize(param_service::get_value(db, PARAM_RAGFLOW_TOKEN).await?);
        if api_url.is_none() {
            warn!(param = PARAM_RAGFLOW_API, "knowledge-base API base URL not configured");
        }
        if token.is_none() {
            warn!(param = PARAM_RAGFLOW_TOKEN, "knowledge-base API token not configured");
        }
        Ok(Self { api_url, token })
    }

    pub fn is_configured(&self) -> bool {
        self.api_url.is_some() && self.token.is_some()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != UNSET_PLACEHOLDER)
}

/// Proxy for the external knowledge-base API.
///
/// The contract towards callers is strictly "full list or empty list":
/// unconfigured settings, upstream failures, vendor error codes and decode
/// failures all degrade to an empty result with a warning, never an error.
pub struct RagflowService {
    http: reqwest::Client,
    settings: ArcSwap<RagflowSettings>,
}

impl RagflowService {
    pub fn new(settings: RagflowSettings) -> Self {
        Self { http: reqwest::Client::new(), settings: ArcSwap::from_pointee(settings) }
    }

    /// Build the service with settings sourced from the parameter store.
    pub async fn load(db: &DatabaseConnection) -> Result<Self, ServiceError> {
        Ok(Self::new(RagflowSettings::load(db).await?))
    }

    /// Re-read settings from the parameter store; returns whether the
    /// integration is configured afterwards.
    pub async fn reload(&self, db: &DatabaseConnection) -> Result<bool, ServiceError> {
        let settings = RagflowSettings::load(db).await?;
        let configured = settings.is_configured();
        self.settings.store(Arc::new(settings));
        Ok(configured)
    }

    pub fn is_configured(&self) -> bool {
        self.settings.load().is_configured()
    }

    fn client(&self) -> Option<RagflowClient> {
        let settings = self.settings.load();
        match (&settings.api_url, &settings.token) {
            (Some(api_url), Some(token)) => {
                Some(RagflowClient::new(self.http.clone(), api_url, token))
            }
            _ => None,
        }
    }

    /// List datasets; no outbound request is made when unconfigured.
    pub async fn datasets(&self, page: u32, page_size: u32) -> Vec<Dataset> {
        let Some(client) = self.client() else {
            warn!("knowledge-base integration not configured; returning no datasets");
            return Vec::new();
        };
        match client.list_datasets(page, page_size).await {
            Ok(datasets) => datasets,
            Err(e) => {
                warn!(error = %e, "dataset listing failed");
                Vec::new()
            }
        }
    }

    /// Retrieve up to `top_k` non-empty chunk contents for a question.
    pub async fn retrieve_chunks(&self, question: &str, dataset_ids: &[String], top_k: usize) -> Vec<String> {
        let Some(client) = self.client() else {
            warn!("knowledge-base integration not configured; returning no chunks");
            return Vec::new();
        };
        match client.retrieval(question, dataset_ids).await {
            Ok(chunks) => chunks
                .into_iter()
                .map(|c| c.content.trim().to_string())
                .filter(|c| !c.is_empty())
                .take(top_k)
                .collect(),
            Err(e) => {
                warn!(error = %e, "retrieval failed");
                Vec::new()
            }
        }
    }
}
