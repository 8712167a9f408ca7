use crate::{
    backend::{Backend, EntityDraft},
    core::config::BackendConfig,
    entity::{Entity, EntityKey, EntityKind},
    DashError, Result,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

/// REST client for the `/api/places` and `/api/events` resources
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Uses a preconfigured client, e.g. one carrying an admin session cookie
    pub fn with_client(client: Client, config: BackendConfig) -> Self {
        Self { client, config }
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        let path = match kind {
            EntityKind::Place => &self.config.places_path,
            EntityKind::Event => &self.config.events_path,
        };
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn item_url(&self, key: EntityKey) -> String {
        format!("{}/{}", self.collection_url(key.kind), key.id)
    }

    /// Turns non-2xx responses into [`DashError::Backend`], preferring the body's `error` field
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                }
            });
        Err(DashError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_entity(kind: EntityKind, response: Response) -> Result<Entity> {
        let record: Value = Self::check(response).await?.json().await?;
        Entity::from_record(kind, record)
    }

    async fn fetch(&self, key: EntityKey) -> Result<Entity> {
        let url = self.item_url(key);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        Self::read_entity(key.kind, response).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        let url = self.collection_url(kind);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let records: Value = Self::check(response).await?.json().await?;
        Entity::from_records(kind, records)
    }

    async fn create(&self, kind: EntityKind, draft: &EntityDraft) -> Result<Entity> {
        let url = self.collection_url(kind);
        log::debug!("POST {}", url);
        let response = self.client.post(&url).json(&draft.to_value()).send().await?;
        Self::read_entity(kind, response).await
    }

    async fn update(&self, key: EntityKey, draft: &EntityDraft) -> Result<Entity> {
        let url = self.item_url(key);
        log::debug!("PUT {}", url);
        let response = self.client.put(&url).json(&draft.to_value()).send().await?;
        let body = Self::check(response).await?.text().await?;

        // The events route acknowledges with a message instead of the row
        match serde_json::from_str::<Value>(&body) {
            Ok(record) if record.get("id").is_some() => Entity::from_record(key.kind, record),
            _ => {
                log::debug!("{} update returned no record, re-fetching", key);
                self.fetch(key).await
            }
        }
    }

    async fn delete(&self, key: EntityKey) -> Result<()> {
        let url = self.item_url(key);
        log::debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
