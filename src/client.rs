//! CMS content client.
//!
//! The CMS exposes a REST API where every collection lives under
//! `{base_url}/api/{resource}` and responses are wrapped in a
//! `{ "data": ..., "meta": ... }` envelope. Filtering, relation expansion
//! and ordering are query-string driven:
//!
//! ```text
//! GET /api/articles?filters[slug][$eq]=umut-koprusu&populate=*
//! GET /api/projects?populate=*&sort=publishedAt:desc
//! ```
//!
//! Loaders talk to the CMS through the [`ContentSource`] trait so tests can
//! substitute in-memory sources; [`CmsClient`] is the HTTP implementation.
//! No retries, no backoff, no explicit timeout: a failed call surfaces as a
//! [`ClientError`] and the loaders degrade it to an empty result.

use crate::config::CmsConfig;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed response from {resource}: {reason}")]
    Malformed { resource: String, reason: String },
}

impl ClientError {
    fn malformed(resource: &str, reason: impl Into<String>) -> Self {
        ClientError::Malformed {
            resource: resource.to_string(),
            reason: reason.into(),
        }
    }
}

/// Sort direction for [`Query::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// Query-string parameters for a collection request, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `filters[<field>][$eq]=<value>`
    pub fn filter_eq(mut self, field: &str, value: &str) -> Self {
        self.params
            .push((format!("filters[{field}][$eq]"), value.to_string()));
        self
    }

    /// `populate=*` (expand every relation and media field)
    pub fn populate_all(mut self) -> Self {
        self.params.push(("populate".to_string(), "*".to_string()));
        self
    }

    /// `sort=<field>:asc|desc`
    pub fn sort(mut self, field: &str, dir: SortDir) -> Self {
        let dir = match dir {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        };
        self.params
            .push(("sort".to_string(), format!("{field}:{dir}")));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Read/write access to CMS collections.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// GET a collection and return the envelope's `data` member.
    async fn get(&self, resource: &str, query: &Query) -> Result<Value, ClientError>;

    /// POST a JSON body to a collection. Any 2xx is success.
    async fn post(&self, resource: &str, body: &Value) -> Result<(), ClientError>;
}

/// HTTP implementation of [`ContentSource`].
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    config: CmsConfig,
}

impl CmsClient {
    pub fn new(config: CmsConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("zirve-site/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ClientError::Network {
                url: config.base_url.clone(),
                source,
            })?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl ContentSource for CmsClient {
    async fn get(&self, resource: &str, query: &Query) -> Result<Value, ClientError> {
        let url = self.config.resource_url(resource);
        tracing::debug!(%url, params = ?query.params(), "GET");

        let network = |source| ClientError::Network {
            url: url.clone(),
            source,
        };
        let response = self
            .http
            .get(&url)
            .query(query.params())
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let mut envelope: Value = response
            .json()
            .await
            .map_err(|e| ClientError::malformed(resource, e.to_string()))?;
        match envelope.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(ClientError::malformed(resource, "missing `data` field")),
        }
    }

    async fn post(&self, resource: &str, body: &Value) -> Result<(), ClientError> {
        let url = self.config.resource_url(resource);
        tracing::debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status {
                url,
                status: status.as_u16(),
            })
        }
    }
}

/// Fetch a collection and decode every record.
///
/// `data` must be an array. A record that fails to decode makes the whole
/// response malformed.
pub async fn fetch_collection<T: DeserializeOwned>(
    source: &dyn ContentSource,
    resource: &str,
    query: &Query,
) -> Result<Vec<T>, ClientError> {
    let data = source.get(resource, query).await?;
    if !data.is_array() {
        return Err(ClientError::malformed(resource, "`data` is not an array"));
    }
    serde_json::from_value(data).map_err(|e| ClientError::malformed(resource, e.to_string()))
}

/// Fetch a filtered collection and keep its first record.
pub async fn fetch_first<T: DeserializeOwned>(
    source: &dyn ContentSource,
    resource: &str,
    query: &Query,
) -> Result<Option<T>, ClientError> {
    Ok(fetch_collection(source, resource, query)
        .await?
        .into_iter()
        .next())
}

/// POST `{ "data": payload }` to a collection.
pub async fn create<T: Serialize + Sync>(
    source: &dyn ContentSource,
    resource: &str,
    payload: &T,
) -> Result<(), ClientError> {
    let data = serde_json::to_value(payload)
        .map_err(|e| ClientError::malformed(resource, e.to_string()))?;
    source
        .post(resource, &serde_json::json!({ "data": data }))
        .await
}
