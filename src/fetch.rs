//! Stage 1: pull page props from the CMS into a site snapshot.
//!
//! Every route is resolved through the [`PropsCache`]:
//!
//! 1. props younger than the revalidation interval are reused as-is
//! 2. otherwise the route's loader runs against the CMS
//! 3. a failed load serves the last cached props, whatever their age
//! 4. with nothing cached, the route degrades to its empty state
//!
//! List routes (`/`, `/projects`, `/about`) load concurrently. Their results
//! decide which detail routes exist; those then load on a [`JoinSet`]
//! bounded by `cms.max_concurrent_requests`.
//!
//! The result is a [`Snapshot`] written as `snapshot.json` in the temp
//! directory, which the generate stage reads.

use crate::cache::{PropsCache, RevalidationStats};
use crate::client::{ClientError, ContentSource};
use crate::config::SiteConfig;
use crate::loader::{
    self, HomeProps, PageState, ProjectsProps, StaticPaths, load_article, load_project,
};
use crate::types::{Article, Page, Project};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const SNAPSHOT_FILENAME: &str = "snapshot.json";

pub const HOME_ROUTE: &str = "/";
pub const ABOUT_ROUTE: &str = "/about";
pub const PROJECTS_ROUTE: &str = "/projects";

pub fn article_route(key: &str) -> String {
    format!("/articles/{key}")
}

pub fn project_route(key: &str) -> String {
    format!("/projects/{key}")
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("detail fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("no snapshot at {0}, run `zirve-site fetch` first")]
    MissingSnapshot(PathBuf),
}

/// Every route's props, as resolved by one fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub home: HomeProps,
    pub about: PageState<Page>,
    pub projects: ProjectsProps,
    /// Article detail props by route key.
    pub articles: BTreeMap<String, PageState<Article>>,
    /// Project detail props by route key.
    pub project_details: BTreeMap<String, PageState<Project>>,
}

impl Snapshot {
    pub fn save(&self, dir: &Path) -> Result<PathBuf, FetchError> {
        std::fs::create_dir_all(dir)?;
        let path = snapshot_path(dir);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn load(dir: &Path) -> Result<Self, FetchError> {
        let path = snapshot_path(dir);
        if !path.exists() {
            return Err(FetchError::MissingSnapshot(path));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

pub fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join(SNAPSHOT_FILENAME)
}

/// When the fetch runs and whether fresh cache entries may be reused.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub now: DateTime<Utc>,
    /// Refetch every route even when its cached props are fresh.
    pub force: bool,
}

#[derive(Debug)]
pub struct FetchResult {
    pub snapshot: Snapshot,
    pub stats: RevalidationStats,
}

/// Resolve every route against the CMS and the props cache.
///
/// Loader failures never fail the fetch; the cache is updated in place with
/// whatever was refetched and pruned to the routes that still exist.
pub async fn fetch_site(
    source: Arc<dyn ContentSource>,
    config: &SiteConfig,
    cache: &mut PropsCache,
    options: FetchOptions,
) -> Result<FetchResult, FetchError> {
    let policy = Policy {
        now: options.now,
        interval: Duration::seconds(config.revalidate.interval_secs as i64),
        force: options.force,
    };
    let mut stats = RevalidationStats::default();

    let about_slug = config.site.about_slug.as_str();
    let (home, projects, about) = tokio::join!(
        step(
            policy.fresh(cache, HOME_ROUTE),
            loader::load_home(source.as_ref())
        ),
        step(
            policy.fresh(cache, PROJECTS_ROUTE),
            loader::load_projects(source.as_ref())
        ),
        step(
            policy.fresh(cache, ABOUT_ROUTE),
            loader::load_static_page(source.as_ref(), about_slug)
        ),
    );
    let home = settle(cache, HOME_ROUTE, &policy, home, &mut stats, HomeProps::default);
    let projects = settle(
        cache,
        PROJECTS_ROUTE,
        &policy,
        projects,
        &mut stats,
        ProjectsProps::default,
    );
    let about = settle(cache, ABOUT_ROUTE, &policy, about, &mut stats, || {
        PageState::Empty
    });

    let paths = StaticPaths::from_lists(&home, &projects);
    tracing::debug!(
        articles = paths.articles.len(),
        projects = paths.projects.len(),
        "discovered detail routes"
    );

    let mut articles: BTreeMap<String, PageState<Article>> = BTreeMap::new();
    let mut project_details: BTreeMap<String, PageState<Project>> = BTreeMap::new();
    let permits = Arc::new(Semaphore::new(config.cms.max_concurrent_requests.max(1)));
    let mut tasks = JoinSet::new();

    for key in &paths.articles {
        match policy.fresh(cache, &article_route(key)) {
            Some(props) => {
                stats.fresh += 1;
                articles.insert(key.clone(), props);
            }
            None => {
                let (source, permits, key) =
                    (Arc::clone(&source), Arc::clone(&permits), key.clone());
                tasks.spawn(async move {
                    let _permit = permits.acquire_owned().await;
                    let result = load_article(source.as_ref(), &key).await;
                    Detail::Article(key, result)
                });
            }
        }
    }
    for key in &paths.projects {
        match policy.fresh(cache, &project_route(key)) {
            Some(props) => {
                stats.fresh += 1;
                project_details.insert(key.clone(), props);
            }
            None => {
                let (source, permits, key) =
                    (Arc::clone(&source), Arc::clone(&permits), key.clone());
                tasks.spawn(async move {
                    let _permit = permits.acquire_owned().await;
                    let result = load_project(source.as_ref(), &key).await;
                    Detail::Project(key, result)
                });
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Detail::Article(key, result) => {
                let state = settle(
                    cache,
                    &article_route(&key),
                    &policy,
                    Step::Fetched(result),
                    &mut stats,
                    || PageState::NotFound,
                );
                articles.insert(key, state);
            }
            Detail::Project(key, result) => {
                let state = settle(
                    cache,
                    &project_route(&key),
                    &policy,
                    Step::Fetched(result),
                    &mut stats,
                    || PageState::NotFound,
                );
                project_details.insert(key, state);
            }
        }
    }

    let live: HashSet<String> = [HOME_ROUTE, PROJECTS_ROUTE, ABOUT_ROUTE]
        .into_iter()
        .map(String::from)
        .chain(paths.articles.iter().map(|k| article_route(k)))
        .chain(paths.projects.iter().map(|k| project_route(k)))
        .collect();
    cache.retain_routes(&live);

    Ok(FetchResult {
        snapshot: Snapshot {
            fetched_at: options.now,
            home,
            about,
            projects,
            articles,
            project_details,
        },
        stats,
    })
}

enum Detail {
    Article(String, Result<PageState<Article>, ClientError>),
    Project(String, Result<PageState<Project>, ClientError>),
}

struct Policy {
    now: DateTime<Utc>,
    interval: Duration,
    force: bool,
}

impl Policy {
    fn fresh<T: DeserializeOwned>(&self, cache: &PropsCache, route: &str) -> Option<T> {
        if self.force {
            return None;
        }
        cache.fresh(route, self.now, self.interval)
    }
}

enum Step<T> {
    Fresh(T),
    Fetched(Result<T, ClientError>),
}

async fn step<T, F>(fresh: Option<T>, load: F) -> Step<T>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match fresh {
        Some(props) => Step::Fresh(props),
        None => Step::Fetched(load.await),
    }
}

/// Turn one route's step into props, updating the cache and stats.
fn settle<T>(
    cache: &mut PropsCache,
    route: &str,
    policy: &Policy,
    step: Step<T>,
    stats: &mut RevalidationStats,
    degraded: impl FnOnce() -> T,
) -> T
where
    T: Serialize + DeserializeOwned,
{
    match step {
        Step::Fresh(props) => {
            stats.fresh += 1;
            props
        }
        Step::Fetched(Ok(props)) => {
            stats.refetched += 1;
            cache.insert(route, &props, policy.now);
            props
        }
        Step::Fetched(Err(e)) => match cache.any_age(route) {
            Some(props) => {
                tracing::warn!(route, error = %e, "CMS fetch failed, serving cached props");
                stats.fallback += 1;
                props
            }
            None => {
                tracing::warn!(route, error = %e, "CMS fetch failed, serving empty page");
                stats.degraded += 1;
                degraded()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::loader::{ARTICLES, CATEGORIES, PAGES, PROJECTS};
    use crate::test_helpers::{StubSource, article_json, project_json};
    use serde_json::json;
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_728_720_000 + secs, 0).unwrap()
    }

    fn options(secs: i64) -> FetchOptions {
        FetchOptions {
            now: at(secs),
            force: false,
        }
    }

    fn live_cms() -> Arc<StubSource> {
        Arc::new(
            StubSource::new()
                .with(
                    ARTICLES,
                    json!([
                        article_json(1, "Umut Köprüsü", "umut-koprusu"),
                        article_json(2, "Duyuru", "duyuru"),
                    ]),
                )
                .with(
                    PROJECTS,
                    json!([project_json(7, "Su Kuyusu", "su-kuyusu", "active")]),
                )
                .with(CATEGORIES, json!([{"id": 1, "name": "Eğitim"}]))
                .with(
                    PAGES,
                    json!([{"id": 3, "documentId": "p3", "title": "Hakkımızda", "slug": "about"}]),
                ),
        )
    }

    #[tokio::test]
    async fn first_fetch_loads_every_route() {
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        let result = fetch_site(live_cms(), &config, &mut cache, options(0))
            .await
            .unwrap();

        let snapshot = &result.snapshot;
        assert_eq!(snapshot.home.articles.len(), 2);
        assert_eq!(snapshot.projects.projects.len(), 1);
        assert!(snapshot.about.ready().is_some());
        assert_eq!(
            snapshot.articles.keys().collect::<Vec<_>>(),
            vec!["doc2", "umut-koprusu"]
        );
        assert!(snapshot.project_details["su-kuyusu"].ready().is_some());

        assert_eq!(result.stats.refetched, 6);
        assert_eq!(result.stats.total(), 6);
        assert_eq!(cache.entries.len(), 6);
    }

    #[tokio::test]
    async fn fresh_props_skip_the_cms() {
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        fetch_site(live_cms(), &config, &mut cache, options(0))
            .await
            .unwrap();

        let offline = Arc::new(StubSource::new());
        let result = fetch_site(offline.clone(), &config, &mut cache, options(60))
            .await
            .unwrap();
        assert!(offline.calls().is_empty());
        assert_eq!(result.stats.fresh, 6);
        assert_eq!(result.snapshot.home.articles.len(), 2);
    }

    #[tokio::test]
    async fn stale_props_are_refetched() {
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        fetch_site(live_cms(), &config, &mut cache, options(0))
            .await
            .unwrap();

        let cms = live_cms();
        let result = fetch_site(cms.clone(), &config, &mut cache, options(301))
            .await
            .unwrap();
        assert_eq!(result.stats.refetched, 6);
        assert_eq!(cache.entries[HOME_ROUTE].fetched_at, at(301));
        assert!(!cms.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_refetch_serves_stale_props() {
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        fetch_site(live_cms(), &config, &mut cache, options(0))
            .await
            .unwrap();

        let result = fetch_site(Arc::new(StubSource::new()), &config, &mut cache, options(86_400))
            .await
            .unwrap();
        assert_eq!(result.stats.fallback, 6);
        assert_eq!(result.snapshot.home.articles.len(), 2);
        assert!(result.snapshot.project_details["su-kuyusu"].ready().is_some());
        // The stale entries keep their original timestamp.
        assert_eq!(cache.entries[HOME_ROUTE].fetched_at, at(0));
    }

    #[tokio::test]
    async fn unreachable_cms_without_cache_degrades() {
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        let result = fetch_site(Arc::new(StubSource::new()), &config, &mut cache, options(0))
            .await
            .unwrap();

        assert_eq!(result.stats.degraded, 3);
        assert!(result.snapshot.home.articles.is_empty());
        assert!(result.snapshot.projects.projects.is_empty());
        assert_eq!(result.snapshot.about, PageState::Empty);
        assert!(result.snapshot.articles.is_empty());
        assert!(cache.entries.is_empty());
    }

    #[tokio::test]
    async fn force_refetches_fresh_routes() {
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        fetch_site(live_cms(), &config, &mut cache, options(0))
            .await
            .unwrap();

        let forced = FetchOptions {
            now: at(10),
            force: true,
        };
        let result = fetch_site(live_cms(), &config, &mut cache, forced)
            .await
            .unwrap();
        assert_eq!(result.stats.fresh, 0);
        assert_eq!(result.stats.refetched, 6);
    }

    #[tokio::test]
    async fn force_still_falls_back() {
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        fetch_site(live_cms(), &config, &mut cache, options(0))
            .await
            .unwrap();

        let forced = FetchOptions {
            now: at(10),
            force: true,
        };
        let result = fetch_site(Arc::new(StubSource::new()), &config, &mut cache, forced)
            .await
            .unwrap();
        assert_eq!(result.stats.fallback, 6);
    }

    #[tokio::test]
    async fn projects_route_falls_back_when_categories_fail() {
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        let cms = Arc::new(
            StubSource::new()
                .with(ARTICLES, json!([]))
                .with(PAGES, json!([]))
                .with(PROJECTS, json!([project_json(1, "Okul", "okul-projesi", "planning")]))
                .failing(CATEGORIES, 502),
        );
        let result = fetch_site(cms, &config, &mut cache, options(0))
            .await
            .unwrap();
        assert!(result.snapshot.projects.projects.is_empty());
        assert!(result.snapshot.project_details.is_empty());
        assert_eq!(result.stats.degraded, 1);
    }

    #[tokio::test]
    async fn vanished_routes_leave_the_cache() {
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        fetch_site(live_cms(), &config, &mut cache, options(0))
            .await
            .unwrap();
        assert!(cache.entries.contains_key("/articles/umut-koprusu"));

        let cms = Arc::new(
            StubSource::new()
                .with(ARTICLES, json!([]))
                .with(PROJECTS, json!([]))
                .with(CATEGORIES, json!([]))
                .with(PAGES, json!([])),
        );
        fetch_site(cms, &config, &mut cache, options(400))
            .await
            .unwrap();
        assert!(!cache.entries.contains_key("/articles/umut-koprusu"));
        assert_eq!(cache.entries.len(), 3);
    }

    #[tokio::test]
    async fn snapshot_roundtrips_through_temp_dir() {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig::default();
        let mut cache = PropsCache::empty();
        let result = fetch_site(live_cms(), &config, &mut cache, options(0))
            .await
            .unwrap();

        let path = result.snapshot.save(tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join(SNAPSHOT_FILENAME));
        let loaded = Snapshot::load(tmp.path()).unwrap();
        assert_eq!(loaded, result.snapshot);
    }

    #[test]
    fn missing_snapshot_is_reported() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Snapshot::load(tmp.path()),
            Err(FetchError::MissingSnapshot(_))
        ));
    }
}
