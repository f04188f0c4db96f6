//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are the base layer; a sparse user file overrides just the keys it names;
//! the `STRAPI_URL` environment variable finally overrides the CMS base URL
//! so deployments can point the same config at different CMS instances.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [cms]
//! base_url = "http://localhost:1337"   # CMS host (STRAPI_URL overrides)
//! contact_resource = "contacts"        # Collection receiving contact form posts
//! max_concurrent_requests = 4          # Parallel detail-page fetches
//!
//! [site]
//! name = "Zirve Dayanışma Ağı"
//! short_name = "Z.D.A."
//! description = "Yardım kuruluşu haberler ve projeler"
//! public_url = "https://zirvedayanisma.org"  # Used in share links
//! email = "info@zirvedayanisma.org"
//! phone = "+90 555 123 45 67"
//! founded = 2024
//! about_slug = "about"
//!
//! [revalidate]
//! interval_secs = 300       # Cached page props older than this are refetched
//!
//! [colors]
//! primary = "#2563eb"
//! active = "#10b981"
//! completed = "#6366f1"
//! planning = "#f59e0b"
//! background = "#fafafa"
//! text = "#1a1a1a"
//! text_muted = "#666666"
//! border = "#e5e7eb"
//!
//! [processing]
//! max_processes = 4         # Max parallel render workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding `cms.base_url`.
pub const CMS_URL_ENV: &str = "STRAPI_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Where content comes from.
    pub cms: CmsConfig,
    /// Organisation identity shown in header, footer and meta tags.
    pub site: SiteInfo,
    /// Staleness window for cached page props.
    pub revalidate: RevalidateConfig,
    /// Colour palette, emitted as CSS custom properties.
    pub colors: ColorConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = url::Url::parse(&self.cms.base_url).map_err(|e| {
            ConfigError::Validation(format!("cms.base_url is not a valid URL: {e}"))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "cms.base_url must use http or https".into(),
            ));
        }
        if self.cms.contact_resource.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cms.contact_resource must not be empty".into(),
            ));
        }
        if self.cms.max_concurrent_requests == 0 {
            return Err(ConfigError::Validation(
                "cms.max_concurrent_requests must be at least 1".into(),
            ));
        }
        if self.site.about_slug.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.about_slug must not be empty".into(),
            ));
        }
        if self.revalidate.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "revalidate.interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(CMS_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.cms.base_url = url.trim().to_string();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CmsConfig {
    /// CMS host, without the `/api` suffix.
    pub base_url: String,
    /// Collection that receives contact form submissions.
    pub contact_resource: String,
    /// Upper bound on in-flight detail fetches during a build.
    pub max_concurrent_requests: usize,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1337".to_string(),
            contact_resource: "contacts".to_string(),
            max_concurrent_requests: 4,
        }
    }
}

impl CmsConfig {
    /// `{base_url}/api/{resource}`
    pub fn resource_url(&self, resource: &str) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            resource.trim_start_matches('/')
        )
    }

    /// The CMS admin panel, linked from empty states.
    pub fn admin_url(&self) -> String {
        format!("{}/admin", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub name: String,
    pub short_name: String,
    pub description: String,
    /// Public origin of the generated site, used for absolute share links.
    pub public_url: String,
    pub email: String,
    pub phone: String,
    pub founded: u16,
    /// Slug of the CMS page rendered at `/about`.
    pub about_slug: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Zirve Dayanışma Ağı".to_string(),
            short_name: "Z.D.A.".to_string(),
            description: "Yardım kuruluşu haberler ve projeler".to_string(),
            public_url: "https://zirvedayanisma.org".to_string(),
            email: "info@zirvedayanisma.org".to_string(),
            phone: "+90 555 123 45 67".to_string(),
            founded: 2024,
            about_slug: "about".to_string(),
        }
    }
}

impl SiteInfo {
    /// Absolute URL of a site path, for share links.
    pub fn absolute_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.public_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevalidateConfig {
    /// Page props younger than this are reused without refetching.
    pub interval_secs: u64,
}

impl Default for RevalidateConfig {
    fn default() -> Self {
        Self { interval_secs: 300 }
    }
}

/// Colour palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Links, buttons, current nav item.
    pub primary: String,
    /// Badge and progress colour for active projects.
    pub active: String,
    /// Badge and progress colour for completed projects.
    pub completed: String,
    /// Badge colour for projects still being planned.
    pub planning: String,
    pub background: String,
    pub text: String,
    /// Meta lines, breadcrumbs, footer.
    pub text_muted: String,
    pub border: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#2563eb".to_string(),
            active: "#10b981".to_string(),
            completed: "#6366f1".to_string(),
            planning: "#f59e0b".to_string(),
            background: "#fafafa".to_string(),
            text: "#1a1a1a".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e5e7eb".to_string(),
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults and deserialize.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Load config from `path`, apply environment overrides and validate.
///
/// A missing file is not an error: the stock defaults are used.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let mut config = resolve_config(load_raw_config(path)?)?;
    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# zirve-site configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Content source
# ---------------------------------------------------------------------------
[cms]
# CMS host, without the /api suffix. The STRAPI_URL environment variable
# overrides this value.
base_url = "http://localhost:1337"

# Collection that receives contact form submissions (POST /api/<resource>).
contact_resource = "contacts"

# Maximum number of detail pages fetched in parallel during a build.
max_concurrent_requests = 4

# ---------------------------------------------------------------------------
# Organisation
# ---------------------------------------------------------------------------
[site]
name = "Zirve Dayanışma Ağı"
short_name = "Z.D.A."
description = "Yardım kuruluşu haberler ve projeler"

# Public origin of the generated site, used to build share links.
public_url = "https://zirvedayanisma.org"

email = "info@zirvedayanisma.org"
phone = "+90 555 123 45 67"
founded = 2024

# Slug of the CMS page rendered at /about.
about_slug = "about"

# ---------------------------------------------------------------------------
# Revalidation
# ---------------------------------------------------------------------------
[revalidate]
# Cached page props younger than this many seconds are reused as-is.
# Older props are refetched; if the refetch fails the cached props are
# served instead.
interval_secs = 300

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
primary = "#2563eb"
active = "#10b981"       # Active project badge / progress bar
completed = "#6366f1"    # Completed project badge / progress bar
planning = "#f59e0b"     # Planned project badge
background = "#fafafa"
text = "#1a1a1a"
text_muted = "#666666"   # Meta lines, breadcrumbs, footer
border = "#e5e7eb"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-primary: {primary};
    --color-active: {active};
    --color-completed: {completed};
    --color-planning: {planning};
    --color-bg: {background};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-border: {border};
}}"#,
        primary = colors.primary,
        active = colors.active,
        completed = colors.completed,
        planning = colors.planning,
        background = colors.background,
        text = colors.text,
        text_muted = colors.text_muted,
        border = colors.border,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.cms.base_url, "http://localhost:1337");
        assert_eq!(config.cms.contact_resource, "contacts");
        assert_eq!(config.site.about_slug, "about");
        assert_eq!(config.revalidate.interval_secs, 300);
        assert_eq!(config.colors.primary, "#2563eb");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[cms]
base_url = "https://cms.zirvedayanisma.org"

[colors]
primary = "#0f766e"
"##;
        let config = resolve_config(Some(toml::from_str(toml).unwrap())).unwrap();
        assert_eq!(config.cms.base_url, "https://cms.zirvedayanisma.org");
        assert_eq!(config.colors.primary, "#0f766e");
        // Defaults preserved
        assert_eq!(config.cms.contact_resource, "contacts");
        assert_eq!(config.colors.active, "#10b981");
        assert_eq!(config.revalidate.interval_secs, 300);
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r#"
[cms]
base_uri = "http://typo"
"#;
        let result = resolve_config(Some(toml::from_str(toml).unwrap()));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml = r#"
[thumbnails]
aspect_ratio = [4, 5]
"#;
        assert!(resolve_config(Some(toml::from_str(toml).unwrap())).is_err());
    }

    #[test]
    fn env_overrides_base_url() {
        let mut config = SiteConfig::default();
        config.apply_env(|key| (key == CMS_URL_ENV).then(|| " https://prod.example ".to_string()));
        assert_eq!(config.cms.base_url, "https://prod.example");
    }

    #[test]
    fn blank_env_is_ignored() {
        let mut config = SiteConfig::default();
        config.apply_env(|_| Some("   ".to_string()));
        assert_eq!(config.cms.base_url, "http://localhost:1337");

        config.apply_env(no_env);
        assert_eq!(config.cms.base_url, "http://localhost:1337");
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = SiteConfig::default();
        config.cms.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.cms.base_url = "ftp://cms.example".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_interval_and_concurrency() {
        let mut config = SiteConfig::default();
        config.revalidate.interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.cms.max_concurrent_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn resource_and_admin_urls() {
        let mut cms = CmsConfig::default();
        cms.base_url = "https://cms.example/".into();
        assert_eq!(cms.resource_url("articles"), "https://cms.example/api/articles");
        assert_eq!(cms.resource_url("/contacts"), "https://cms.example/api/contacts");
        assert_eq!(cms.admin_url(), "https://cms.example/admin");
    }

    #[test]
    fn absolute_url_joins_public_origin() {
        let site = SiteInfo::default();
        assert_eq!(
            site.absolute_url("/projects/su-kuyusu/"),
            "https://zirvedayanisma.org/projects/su-kuyusu/"
        );
    }

    #[test]
    fn merge_toml_nested() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = resolve_config(load_raw_config(&tmp.path().join("config.toml")).unwrap())
            .unwrap();
        assert_eq!(config.site.name, "Zirve Dayanışma Ağı");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[site]
public_url = "https://staging.zirvedayanisma.org"

[revalidate]
interval_secs = 60
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.site.public_url, "https://staging.zirvedayanisma.org");
        assert_eq!(config.revalidate.interval_secs, 60);
        assert_eq!(config.site.about_slug, "about");
    }

    #[test]
    fn load_config_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not [valid toml").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(Some(value)).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.cms.base_url, defaults.cms.base_url);
        assert_eq!(config.site.email, defaults.site.email);
        assert_eq!(config.colors.planning, defaults.colors.planning);
        assert_eq!(config.revalidate.interval_secs, defaults.revalidate.interval_secs);
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.primary = "#123456".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-primary: #123456"));
        assert!(css.contains("--color-completed: #6366f1"));
    }

    #[test]
    fn effective_threads_capped_at_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(10_000),
        };
        assert_eq!(effective_threads(&config), cores);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }
}
