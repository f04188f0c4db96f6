//! Per-route page data loaders.
//!
//! Each loader issues the CMS calls its route needs and shapes the result
//! into page props. Loaders report client failures as errors; the fetch
//! stage decides what to serve instead (cached props or an empty state).
//!
//! | Route | CMS calls | Zero records |
//! |-------|-----------|--------------|
//! | `/` | `articles` | empty list |
//! | `/projects` | `projects?populate=*&sort=publishedAt:desc` + `categories`, concurrently | empty list |
//! | `/about` | `pages?filters[slug][$eq]=<about_slug>` | in-page empty state |
//! | `/articles/:key` | `articles?filters[..][$eq]=<key>&populate=*` | not found |
//! | `/projects/:key` | `projects?filters[..][$eq]=<key>&populate=*` | not found |

use crate::client::{ClientError, ContentSource, Query, SortDir, fetch_collection, fetch_first};
use crate::types::{Article, Category, Page, Project};
use serde::{Deserialize, Serialize};

pub const ARTICLES: &str = "articles";
pub const PROJECTS: &str = "projects";
pub const CATEGORIES: &str = "categories";
pub const PAGES: &str = "pages";

/// Outcome of loading a single-record route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "record", rename_all = "snake_case")]
pub enum PageState<T> {
    Ready(T),
    /// Rendered in-page ("nothing here yet"), not as a 404.
    Empty,
    /// Rendered as a dedicated not-found view.
    NotFound,
}

impl<T> PageState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(record) => Some(record),
            _ => None,
        }
    }
}

/// How a detail route parameter is looked up in the CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Slug(String),
    DocumentId(String),
}

impl LookupKey {
    /// Hyphenated parameters are slugs; anything else is a document id.
    pub fn from_param(param: &str) -> Self {
        if param.contains('-') {
            LookupKey::Slug(param.to_string())
        } else {
            LookupKey::DocumentId(param.to_string())
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            LookupKey::Slug(_) => "slug",
            LookupKey::DocumentId(_) => "documentId",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            LookupKey::Slug(v) | LookupKey::DocumentId(v) => v,
        }
    }

    pub fn query(&self) -> Query {
        Query::new()
            .filter_eq(self.field(), self.value())
            .populate_all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeProps {
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectsProps {
    pub projects: Vec<Project>,
    pub categories: Vec<Category>,
}

pub async fn load_home(source: &dyn ContentSource) -> Result<HomeProps, ClientError> {
    let articles = fetch_collection(source, ARTICLES, &Query::new()).await?;
    Ok(HomeProps { articles })
}

/// Projects and categories are fetched concurrently; both must succeed.
pub async fn load_projects(source: &dyn ContentSource) -> Result<ProjectsProps, ClientError> {
    let projects_query = Query::new()
        .populate_all()
        .sort("publishedAt", SortDir::Desc);
    let categories_query = Query::new();
    let (projects, categories) = tokio::join!(
        fetch_collection::<Project>(source, PROJECTS, &projects_query),
        fetch_collection::<Category>(source, CATEGORIES, &categories_query),
    );
    Ok(ProjectsProps {
        projects: projects?,
        categories: categories?,
    })
}

/// A static CMS page looked up by a fixed slug. Missing → `Empty`.
pub async fn load_static_page(
    source: &dyn ContentSource,
    slug: &str,
) -> Result<PageState<Page>, ClientError> {
    let query = Query::new().filter_eq("slug", slug);
    Ok(match fetch_first(source, PAGES, &query).await? {
        Some(page) => PageState::Ready(page),
        None => PageState::Empty,
    })
}

pub async fn load_article(
    source: &dyn ContentSource,
    param: &str,
) -> Result<PageState<Article>, ClientError> {
    load_detail(source, ARTICLES, param).await
}

pub async fn load_project(
    source: &dyn ContentSource,
    param: &str,
) -> Result<PageState<Project>, ClientError> {
    load_detail(source, PROJECTS, param).await
}

async fn load_detail<T>(
    source: &dyn ContentSource,
    resource: &str,
    param: &str,
) -> Result<PageState<T>, ClientError>
where
    T: serde::de::DeserializeOwned,
{
    let key = LookupKey::from_param(param);
    Ok(match fetch_first(source, resource, &key.query()).await? {
        Some(record) => PageState::Ready(record),
        None => PageState::NotFound,
    })
}

/// Detail routes to pre-render, derived from the list props.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPaths {
    pub articles: Vec<String>,
    pub projects: Vec<String>,
}

impl StaticPaths {
    pub fn from_lists(home: &HomeProps, projects: &ProjectsProps) -> Self {
        fn keys<'a>(iter: impl Iterator<Item = &'a str>) -> Vec<String> {
            let mut out: Vec<String> = Vec::new();
            for key in iter.filter(|k| !k.is_empty()) {
                if !out.iter().any(|k| k == key) {
                    out.push(key.to_string());
                }
            }
            out
        }
        Self {
            articles: keys(home.articles.iter().map(Article::route_key)),
            projects: keys(projects.projects.iter().map(Project::route_key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{StubSource, article_json, project_json};
    use serde_json::json;

    #[test]
    fn hyphenated_param_is_a_slug() {
        let key = LookupKey::from_param("umut-koprusu");
        assert_eq!(key, LookupKey::Slug("umut-koprusu".into()));
        assert_eq!(
            key.query(),
            Query::new().filter_eq("slug", "umut-koprusu").populate_all()
        );
    }

    #[test]
    fn plain_param_is_a_document_id() {
        let key = LookupKey::from_param("abc123");
        assert_eq!(key, LookupKey::DocumentId("abc123".into()));
        assert_eq!(key.field(), "documentId");
        assert_eq!(key.value(), "abc123");
    }

    #[tokio::test]
    async fn detail_queries_by_slug() {
        let source = StubSource::new().with_query(
            ARTICLES,
            LookupKey::from_param("umut-koprusu").query(),
            json!([article_json(1, "Umut Köprüsü", "umut-koprusu")]),
        );
        let state = load_article(&source, "umut-koprusu").await.unwrap();
        assert_eq!(
            state.ready().and_then(|a| a.title.as_deref()),
            Some("Umut Köprüsü")
        );
        let calls = source.calls();
        assert_eq!(calls[0].1.params()[0].0, "filters[slug][$eq]");
    }

    #[tokio::test]
    async fn detail_queries_by_document_id() {
        let source = StubSource::new().with(PROJECTS, json!([project_json(4, "Okul", "okul", "active")]));
        load_project(&source, "abc123").await.unwrap();
        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1,
            Query::new().filter_eq("documentId", "abc123").populate_all()
        );
    }

    #[tokio::test]
    async fn zero_matches_is_not_found() {
        let source = StubSource::new().with(ARTICLES, json!([]));
        let state = load_article(&source, "yok-boyle-bir-haber").await.unwrap();
        assert_eq!(state, PageState::NotFound);
    }

    #[tokio::test]
    async fn detail_takes_first_match() {
        let source = StubSource::new().with(
            PROJECTS,
            json!([
                project_json(1, "Birinci", "su-kuyusu", "active"),
                project_json(2, "İkinci", "su-kuyusu", "active")
            ]),
        );
        let state = load_project(&source, "su-kuyusu").await.unwrap();
        assert_eq!(state.ready().map(|p| p.id), Some(1));
    }

    #[tokio::test]
    async fn missing_about_page_is_empty_not_not_found() {
        let source = StubSource::new().with(PAGES, json!([]));
        let state = load_static_page(&source, "about").await.unwrap();
        assert_eq!(state, PageState::Empty);
        assert_eq!(
            source.calls()[0].1,
            Query::new().filter_eq("slug", "about")
        );
    }

    #[tokio::test]
    async fn projects_route_issues_both_calls() {
        let source = StubSource::new()
            .with(PROJECTS, json!([project_json(1, "Su Kuyusu", "su-kuyusu", "active")]))
            .with(CATEGORIES, json!([{"id": 1, "name": "Eğitim", "slug": "egitim"}]));
        let props = load_projects(&source).await.unwrap();
        assert_eq!(props.projects.len(), 1);
        assert_eq!(props.categories.len(), 1);

        let mut resources: Vec<String> = source.calls().into_iter().map(|(r, _)| r).collect();
        resources.sort();
        assert_eq!(resources, vec!["categories", "projects"]);
    }

    #[tokio::test]
    async fn projects_route_fails_if_either_call_fails() {
        let source = StubSource::new()
            .with(PROJECTS, json!([]))
            .failing(CATEGORIES, 500);
        assert!(load_projects(&source).await.is_err());
    }

    #[tokio::test]
    async fn home_propagates_client_errors() {
        let source = StubSource::new().failing(ARTICLES, 503);
        assert!(matches!(
            load_home(&source).await,
            Err(ClientError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn static_paths_use_route_keys_once() {
        let home: HomeProps = serde_json::from_value(json!({"articles": [
            article_json(1, "A", "ilk-haber"),
            article_json(2, "B", "duyuru"),
            article_json(3, "C", "ilk-haber"),
        ]}))
        .unwrap();
        let projects: ProjectsProps = serde_json::from_value(json!({
            "projects": [project_json(9, "Okul", "okul-projesi", "planning")],
            "categories": []
        }))
        .unwrap();
        let paths = StaticPaths::from_lists(&home, &projects);
        assert_eq!(paths.articles, vec!["ilk-haber", "doc2"]);
        assert_eq!(paths.projects, vec!["okul-projesi"]);
    }

    #[test]
    fn page_state_serializes_with_tag() {
        let state: PageState<u32> = PageState::Ready(5);
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({"state": "ready", "record": 5})
        );
        let empty: PageState<u32> = PageState::Empty;
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({"state": "empty"}));
    }
}
