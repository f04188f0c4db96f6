//! Shared test utilities for the zirve-site test suite.
//!
//! Provides an in-memory [`ContentSource`] and JSON/record fixture builders
//! shaped like real CMS responses.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = StubSource::new()
//!     .with("articles", json!([article_json(1, "Umut Köprüsü", "umut-koprusu")]))
//!     .failing("categories", 500);
//!
//! let home = load_home(&source).await.unwrap();
//! assert_eq!(source.calls().len(), 1);
//! ```

use crate::client::{ClientError, ContentSource, Query};
use crate::types::{Project, ProjectStatus};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

// =========================================================================
// In-memory content source
// =========================================================================

enum Reply {
    Data(Value),
    Status(u16),
}

struct Route {
    resource: String,
    /// `None` matches any query.
    query: Option<Query>,
    reply: Reply,
}

/// Canned CMS responses keyed by resource (and optionally by exact query).
///
/// Exact-query routes win over any-query routes. Unrouted resources answer
/// HTTP 404. Every call is recorded for assertions.
#[derive(Default)]
pub struct StubSource {
    routes: Vec<Route>,
    calls: Mutex<Vec<(String, Query)>>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any query on `resource` with `data`.
    pub fn with(mut self, resource: &str, data: Value) -> Self {
        self.routes.push(Route {
            resource: resource.to_string(),
            query: None,
            reply: Reply::Data(data),
        });
        self
    }

    /// Answer one exact query on `resource` with `data`.
    pub fn with_query(mut self, resource: &str, query: Query, data: Value) -> Self {
        self.routes.push(Route {
            resource: resource.to_string(),
            query: Some(query),
            reply: Reply::Data(data),
        });
        self
    }

    /// Fail every request to `resource` with an HTTP status.
    pub fn failing(mut self, resource: &str, status: u16) -> Self {
        self.routes.push(Route {
            resource: resource.to_string(),
            query: None,
            reply: Reply::Status(status),
        });
        self
    }

    pub fn calls(&self) -> Vec<(String, Query)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }

    fn reply(&self, resource: &str, query: &Query) -> Result<Value, ClientError> {
        let exact = self
            .routes
            .iter()
            .find(|r| r.resource == resource && r.query.as_ref() == Some(query));
        let any = || {
            self.routes
                .iter()
                .find(|r| r.resource == resource && r.query.is_none())
        };
        match exact.or_else(any).map(|r| &r.reply) {
            Some(Reply::Data(data)) => Ok(data.clone()),
            Some(Reply::Status(status)) => Err(status_error(resource, *status)),
            None => Err(status_error(resource, 404)),
        }
    }
}

fn status_error(resource: &str, status: u16) -> ClientError {
    ClientError::Status {
        url: format!("stub://api/{resource}"),
        status,
    }
}

#[async_trait]
impl ContentSource for StubSource {
    async fn get(&self, resource: &str, query: &Query) -> Result<Value, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((resource.to_string(), query.clone()));
        self.reply(resource, query)
    }

    async fn post(&self, resource: &str, body: &Value) -> Result<(), ClientError> {
        self.posts
            .lock()
            .unwrap()
            .push((resource.to_string(), body.clone()));
        match self.routes.iter().find(|r| r.resource == resource) {
            Some(Route {
                reply: Reply::Status(status),
                ..
            }) => Err(status_error(resource, *status)),
            _ => Ok(()),
        }
    }
}

// =========================================================================
// Fixture builders
// =========================================================================

/// Article record as the CMS returns it. `documentId` is `doc{id}`.
pub fn article_json(id: u64, title: &str, slug: &str) -> Value {
    json!({
        "id": id,
        "documentId": format!("doc{id}"),
        "title": title,
        "slug": slug,
        "excerpt": format!("{title} hakkında kısa bilgi"),
        "content": format!("{title} ilk paragraf.\n\n{title} ikinci paragraf."),
        "readTime": 4,
        "publishedAt": "2024-10-12T09:30:00.000Z"
    })
}

/// Project record as the CMS returns it. `documentId` is `doc{id}`.
pub fn project_json(id: u64, title: &str, slug: &str, status: &str) -> Value {
    json!({
        "id": id,
        "documentId": format!("doc{id}"),
        "title": title,
        "slug": slug,
        "description": format!("{title} açıklaması"),
        "content": [
            {"type": "paragraph", "children": [{"type": "text", "text": "Proje detayı."}]}
        ],
        "projectStatus": status,
        "progress": 40,
        "targetAmount": 100000,
        "collectedAmount": 40000,
        "beneficiaries": 250,
        "location": "Kadıköy, İstanbul",
        "startDate": "2024-09-01",
        "publishedAt": "2024-09-01T08:00:00.000Z",
        "coverImage": {
            "url": "/uploads/cover.jpg",
            "formats": {"small": {"url": "/uploads/small_cover.jpg"}}
        }
    })
}

/// A minimal typed project for filter tests.
pub fn project(id: u64, title: &str, status: ProjectStatus) -> Project {
    Project {
        id,
        document_id: format!("doc{id}"),
        title: Some(title.to_string()),
        slug: String::new(),
        description: None,
        excerpt: None,
        content: Default::default(),
        project_status: Some(status),
        progress: None,
        target_amount: None,
        collected_amount: None,
        start_date: None,
        end_date: None,
        beneficiaries: None,
        location: None,
        read_time: None,
        published_at: None,
        cover_image: None,
    }
}
