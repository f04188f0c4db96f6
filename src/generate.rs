//! HTML site generation.
//!
//! Stage 2 of the build. Takes the snapshot written by [`crate::fetch`] and
//! renders the final static HTML site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero, stats and the latest article cards
//! - **About** (`/about/index.html`): CMS page, or an in-page empty state
//! - **Contact** (`/contact/index.html`): contact form posting to the CMS
//! - **Projects** (`/projects/index.html`): stats bar, status filter and
//!   project cards, plus one static view per status
//!   (`/projects/active.html`, `completed.html`, `planning.html`)
//! - **Details** (`/articles/<key>/`, `/projects/<key>/`): one page per record
//! - **Not found** (`/404.html`, `/articles/404.html`, `/projects/404.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── about/index.html
//! ├── contact/index.html
//! ├── articles/
//! │   ├── 404.html
//! │   └── umut-koprusu/index.html
//! └── projects/
//!     ├── index.html
//!     ├── active.html
//!     ├── completed.html
//!     ├── planning.html
//!     ├── 404.html
//!     └── su-kuyusu/index.html
//! ```
//!
//! Detail routes that resolve to not-found are not written. Detail
//! directories left over from earlier builds are removed.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/search.js`: Live text search over the rendered project cards
//! - `static/contact.js`: Contact form submission and status banners
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{self, SiteConfig};
use crate::contact::SUBJECTS;
use crate::content::{detail_paragraphs, paragraphs};
use crate::fetch::Snapshot;
use crate::filter::{
    ProjectFilter, StatusCounts, StatusFilter, filter_projects, total_beneficiaries,
};
use crate::format;
use crate::image::{CARD_ORDER, DETAIL_ORDER, ImageDescriptor, Variant, resolve_image_url};
use crate::loader::{HomeProps, PageState, ProjectsProps};
use crate::types::{Article, Page, Project, ProjectStatus};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const SEARCH_JS: &str = include_str!("../static/search.js");
const CONTACT_JS: &str = include_str!("../static/contact.js");

/// Headline figures on the home hero and the about sidebar.
const HERO_STATS: [(&str, &str); 3] = [
    ("12K+", "Yardım Edilen Aile"),
    ("48", "Aktif Proje"),
    ("250+", "Gönüllü"),
];

const NAV_ITEMS: [(&str, &str); 4] = [
    ("/", "Ana Sayfa"),
    ("/projects/", "Projeler"),
    ("/about/", "Hakkımızda"),
    ("/contact/", "İletişim"),
];

/// Status views written next to the main listing.
const STATUS_VIEWS: [StatusFilter; 4] = [
    StatusFilter::All,
    StatusFilter::Only(ProjectStatus::Active),
    StatusFilter::Only(ProjectStatus::Completed),
    StatusFilter::Only(ProjectStatus::Planning),
];

/// One rendered page, relative to the output directory.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub path: PathBuf,
    pub html: String,
}

/// What a generate run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub pages: usize,
    pub articles: usize,
    pub projects: usize,
    /// Detail directories removed because their route no longer exists.
    pub removed: Vec<String>,
}

/// Render every page of the site and write it under `output_dir`.
pub fn generate(
    snapshot: &Snapshot,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    let pages = render_site(snapshot, config);
    fs::create_dir_all(output_dir)?;

    pages
        .par_iter()
        .try_for_each(|page| -> Result<(), GenerateError> {
            let target = output_dir.join(&page.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &page.html)?;
            tracing::debug!(path = %page.path.display(), "wrote page");
            Ok(())
        })?;

    let articles = ready_keys(&snapshot.articles);
    let projects = ready_keys(&snapshot.project_details);
    let mut removed = remove_stale_details(&output_dir.join("articles"), &articles)?
        .into_iter()
        .map(|name| format!("articles/{name}"))
        .collect::<Vec<_>>();
    removed.extend(
        remove_stale_details(&output_dir.join("projects"), &projects)?
            .into_iter()
            .map(|name| format!("projects/{name}")),
    );
    removed.sort();

    tracing::info!(pages = pages.len(), output = %output_dir.display(), "site generated");
    Ok(GenerateSummary {
        pages: pages.len(),
        articles: articles.len(),
        projects: projects.len(),
        removed,
    })
}

/// Render every page without touching the filesystem.
pub fn render_site(snapshot: &Snapshot, config: &SiteConfig) -> Vec<RenderedPage> {
    let css = format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC);
    let site = Site {
        config,
        css: &css,
    };

    let mut pages = vec![
        page("index.html", render_home(&snapshot.home, &site)),
        page("about/index.html", render_about(&snapshot.about, &site)),
        page("contact/index.html", render_contact(&site)),
        page("404.html", render_not_found(NotFound::Page, &site)),
        page("articles/404.html", render_not_found(NotFound::Article, &site)),
        page("projects/404.html", render_not_found(NotFound::Project, &site)),
    ];
    for view in STATUS_VIEWS {
        pages.push(page(
            &status_file(view),
            render_projects(&snapshot.projects, view, &site),
        ));
    }
    for (key, state) in &snapshot.articles {
        if let Some(article) = state.ready().filter(|_| writable_key(key)) {
            pages.push(page(
                &format!("articles/{key}/index.html"),
                render_article(article, key, &site),
            ));
        }
    }
    for (key, state) in &snapshot.project_details {
        if let Some(project) = state.ready().filter(|_| writable_key(key)) {
            pages.push(page(
                &format!("projects/{key}/index.html"),
                render_project(project, key, &site),
            ));
        }
    }
    pages
}

fn page(path: &str, markup: Markup) -> RenderedPage {
    RenderedPage {
        path: PathBuf::from(path),
        html: markup.into_string(),
    }
}

/// Route keys become directory names, so they must be a single plain segment.
fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\'])
        && !key.ends_with(".html")
}

fn writable_key(key: &str) -> bool {
    let safe = is_safe_key(key);
    if !safe {
        tracing::warn!(key, "skipping detail route with unusable key");
    }
    safe
}

fn ready_keys<T>(states: &std::collections::BTreeMap<String, PageState<T>>) -> HashSet<&str> {
    states
        .iter()
        .filter(|(key, state)| state.ready().is_some() && is_safe_key(key))
        .map(|(key, _)| key.as_str())
        .collect()
}

/// Remove detail directories under `dir` whose key is not in `keep`.
fn remove_stale_details(dir: &Path, keep: &HashSet<&str>) -> std::io::Result<Vec<String>> {
    let mut removed = Vec::new();
    if !dir.is_dir() {
        return Ok(removed);
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !keep.contains(name.as_str()) {
            fs::remove_dir_all(entry.path())?;
            tracing::info!(route = %name, dir = %dir.display(), "removed stale detail page");
            removed.push(name);
        }
    }
    Ok(removed)
}

fn status_file(view: StatusFilter) -> String {
    match view {
        StatusFilter::All => "projects/index.html".to_string(),
        StatusFilter::Only(status) => format!("projects/{}.html", status.as_str()),
    }
}

fn status_href(view: StatusFilter) -> String {
    match view {
        StatusFilter::All => "/projects/".to_string(),
        StatusFilter::Only(status) => format!("/projects/{}.html", status.as_str()),
    }
}

/// Percent-encode a share link component. Spaces become `%20`, which mail
/// clients handle better than `+`.
fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

// ============================================================================
// HTML Components
// ============================================================================

struct Site<'a> {
    config: &'a SiteConfig,
    css: &'a str,
}

impl Site<'_> {
    fn image(&self, image: Option<&ImageDescriptor>, order: &[Variant]) -> Option<String> {
        resolve_image_url(image, &self.config.cms.base_url, order)
    }
}

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    description: &str,
    site: &Site,
    current: &str,
    scripts: &[&str],
    content: Markup,
) -> Markup {
    let info = &site.config.site;
    html! {
        (DOCTYPE)
        html lang="tr" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (info.name) }
                meta name="description" content=(description);
                style { (PreEscaped(site.css)) }
            }
            body {
                (site_header(site, current))
                main { (content) }
                (site_footer(site))
                @for script in scripts {
                    script { (PreEscaped(*script)) }
                }
            }
        }
    }
}

/// Renders the site header with logo and navigation
fn site_header(site: &Site, current: &str) -> Markup {
    html! {
        header.site-header {
            div.container.header-inner {
                a.logo href="/" { "🏔️ " (site.config.site.short_name) }
                input.nav-toggle type="checkbox" id="nav-toggle";
                label.nav-hamburger for="nav-toggle" aria-label="Menü" {
                    span.hamburger-line {}
                    span.hamburger-line {}
                    span.hamburger-line {}
                }
                nav.site-nav {
                    @for (href, label) in &NAV_ITEMS {
                        @let is_current = *href == current;
                        a href=(href) class=[is_current.then_some("current")] { (label) }
                    }
                }
            }
        }
    }
}

fn site_footer(site: &Site) -> Markup {
    let info = &site.config.site;
    html! {
        footer.site-footer {
            div.container {
                div.footer-content {
                    div.footer-section {
                        h5 { "🏔️ " (info.name) }
                        p { (info.founded) "'ten beri insanlık için çalışıyoruz." }
                    }
                    div.footer-section {
                        h5 { "İletişim" }
                        p {
                            "📧 " a href={ "mailto:" (info.email) } { (info.email) }
                            br;
                            "📱 " (info.phone)
                        }
                    }
                }
                div.footer-bottom {
                    p { "© " (info.founded) " " (info.name) }
                }
            }
        }
    }
}

/// Breadcrumb trail; the last item is the current page and is not linked.
fn breadcrumb(links: &[(&str, &str)], current: &str) -> Markup {
    html! {
        nav.breadcrumb {
            @for (href, label) in links {
                a href=(href) { (label) }
                span.breadcrumb-separator { "/" }
            }
            span.breadcrumb-current { (current) }
        }
    }
}

fn page_header(title: &str, subtitle: Option<&str>, trail: Markup) -> Markup {
    html! {
        section.page-header {
            div.container {
                h1.page-title { (title) }
                @if let Some(subtitle) = subtitle {
                    p.page-subtitle { (subtitle) }
                }
                (trail)
            }
        }
    }
}

fn content_body(paragraphs: Vec<String>) -> Markup {
    html! {
        div.content {
            @for paragraph in paragraphs {
                p { (paragraph) }
            }
        }
    }
}

/// Badge class and label for a project status.
///
/// Listings show anything that is not completed or planning as active.
fn card_badge(status: Option<ProjectStatus>) -> (&'static str, &'static str) {
    match status {
        Some(ProjectStatus::Completed) => ("completed", "✅ Tamamlandı"),
        Some(ProjectStatus::Planning) => ("planning", "📋 Planlanıyor"),
        _ => ("active", "🚀 Aktif"),
    }
}

/// Detail pages only badge a status the CMS actually set; unrecognised
/// values fall through to planning.
fn detail_badge(status: Option<ProjectStatus>) -> Option<(&'static str, &'static str)> {
    match status? {
        ProjectStatus::Completed => Some(("completed", "✅ Tamamlandı")),
        ProjectStatus::Active => Some(("active", "🚀 Aktif")),
        ProjectStatus::Planning | ProjectStatus::Unknown => Some(("planning", "📋 Planlanıyor")),
    }
}

fn progress_bar(progress: f64, status: Option<ProjectStatus>) -> Markup {
    let width = progress.clamp(0.0, 100.0);
    let class = match status {
        Some(ProjectStatus::Completed) => "completed",
        _ => "active",
    };
    html! {
        div.progress-bar {
            div class={ "progress-fill " (class) } style={ "width: " (format::percent(width)) "%" } {}
        }
    }
}

fn share_links(heading: &str, page_url: &str, title: &str, excerpt: Option<&str>) -> Markup {
    let url = encode(page_url);
    let text = encode(title);
    let body = encode(&format!(
        "{title}\n\n{}\n\nDevamını okumak için: {page_url}",
        excerpt.unwrap_or_default()
    ));
    html! {
        div.share-section {
            h3 { (heading) }
            div.share-buttons {
                a.share-facebook href={ "https://www.facebook.com/sharer/sharer.php?u=" (url) }
                    target="_blank" rel="noopener noreferrer" { "📘 Facebook" }
                a.share-twitter href={ "https://twitter.com/intent/tweet?url=" (url) "&text=" (text) }
                    target="_blank" rel="noopener noreferrer" { "🐦 Twitter" }
                a.share-linkedin href={ "https://www.linkedin.com/sharing/share-offsite/?url=" (url) }
                    target="_blank" rel="noopener noreferrer" { "💼 LinkedIn" }
                a.share-email href={ "mailto:?subject=" (text) "&body=" (body) } { "📧 E-posta" }
            }
        }
    }
}

fn detail_nav(back_href: &str, back_label: &str) -> Markup {
    html! {
        div.detail-nav {
            a.button href=(back_href) { (back_label) }
            a.button.primary href="/contact/" { "İletişime Geç →" }
        }
    }
}

fn empty_state(icon: &str, title: &str, text: &str, action: Markup) -> Markup {
    html! {
        div.empty-state {
            div.empty-icon { (icon) }
            h3.empty-title { (title) }
            p.empty-text { (text) }
            (action)
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Home: hero, headline figures and the article cards
fn render_home(home: &HomeProps, site: &Site) -> Markup {
    let admin = site.config.cms.admin_url();
    let content = html! {
        section.hero {
            div.container {
                h2.hero-title { "Birlikte " span.hero-highlight { "Daha Güçlüyüz" } }
                p.hero-subtitle {
                    "Her gün binlerce insanın hayatına dokunuyor, gelecek için umut köprüleri kuruyoruz."
                }
                div.hero-stats {
                    @for (number, label) in &HERO_STATS {
                        div.stat {
                            div.stat-number { (number) }
                            div.stat-label { (label) }
                        }
                    }
                }
            }
        }
        section.articles-section {
            div.container {
                div.section-header {
                    h3 { "Son Haberler ve Projeler" }
                    p { "Faaliyetlerimiz ve güncellemeler" }
                }
                @if home.articles.is_empty() {
                    (empty_state(
                        "📝",
                        "Henüz içerik eklenmemiş",
                        "CMS yönetim panelinden yeni makaleler ekleyebilirsiniz",
                        html! {
                            a.button href=(admin) target="_blank" rel="noopener" { "Yönetim Paneline Git →" }
                        },
                    ))
                } @else {
                    div.card-grid {
                        @for article in &home.articles {
                            (article_card(article, site))
                        }
                    }
                }
            }
        }
    };
    base_document(
        "Ana Sayfa",
        &site.config.site.description,
        site,
        "/",
        &[],
        content,
    )
}

fn article_card(article: &Article, site: &Site) -> Markup {
    let image = site.image(article.image.as_ref(), CARD_ORDER);
    let card = html! {
        article.card {
            @if let Some(src) = image {
                img.card-image src=(src) alt=(article.title.as_deref().unwrap_or_default()) loading="lazy";
            }
            div.card-badge { "YENİ" }
            h4.card-title { (article.title.as_deref().unwrap_or("Başlık yok")) }
            p.card-excerpt {
                (article.excerpt.as_deref().unwrap_or("Bu makale için henüz açıklama eklenmemiş..."))
            }
            div.card-footer {
                span.card-meta { "📖 " (article.read_time.unwrap_or(5)) " dk okuma" }
                span.card-more { "Devamını Oku →" }
            }
        }
    };
    html! {
        @if let Some(href) = detail_href("articles", article.route_key()) {
            a.card-link href=(href) { (card) }
        } @else {
            (card)
        }
    }
}

/// Link to a detail page, or `None` when no page is written for the key.
fn detail_href(kind: &str, key: &str) -> Option<String> {
    is_safe_key(key).then(|| format!("/{kind}/{key}/"))
}

/// About: the CMS page with a contact sidebar, or the empty state
fn render_about(about: &PageState<Page>, site: &Site) -> Markup {
    let info = &site.config.site;
    let Some(page) = about.ready() else {
        let text = format!(
            "CMS yönetim panelinden \"{}\" slug'ı ile bir sayfa oluşturmalısınız.",
            info.about_slug
        );
        let content = html! {
            div.container {
                (empty_state(
                    "📄",
                    "Hakkımızda Sayfası Bulunamadı",
                    &text,
                    html! { a.button href="/" { "← Anasayfaya Dön" } },
                ))
            }
        };
        return base_document("Hakkımızda", &info.description, site, "/about/", &[], content);
    };

    let title = page.title.as_deref().unwrap_or("Hakkımızda");
    let content = html! {
        (page_header(title, None, breadcrumb(&[("/", "Anasayfa")], title)))
        section.content-section {
            div.container.with-sidebar {
                article { (content_body(paragraphs(&page.content))) }
                aside.sidebar {
                    div.sidebar-card {
                        h3 { "📞 İletişim" }
                        p { strong { "Email:" } br; (info.email) }
                        p { strong { "Telefon:" } br; (info.phone) }
                    }
                    div.sidebar-card {
                        h3 { "🎯 Misyonumuz" }
                        p { "Her gün binlerce insanın hayatına dokunmak ve gelecek için umut köprüleri kurmak." }
                    }
                    div.sidebar-card {
                        h3 { "📊 İstatistikler" }
                        @for (number, label) in &HERO_STATS {
                            div.stat {
                                div.stat-number { (number) }
                                div.stat-label { (label) }
                            }
                        }
                    }
                }
            }
        }
    };
    base_document(title, title, site, "/about/", &[], content)
}

/// Contact: the form (submitted by `contact.js`) and the contact details
fn render_contact(site: &Site) -> Markup {
    let info = &site.config.site;
    let cms = &site.config.cms;
    let endpoint = cms.resource_url(&cms.contact_resource);
    let tel: String = info
        .phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let content = html! {
        (page_header(
            "İletişime Geçin",
            Some("Sorularınız, önerileriniz veya destek talebiniz için bize ulaşın"),
            breadcrumb(&[("/", "Ana Sayfa")], "İletişim"),
        ))
        section.contact-section {
            div.container.with-sidebar {
                div.form-container {
                    h2 { "Mesaj Gönderin" }
                    p.form-subtitle { "Formu doldurun, en kısa sürede size dönüş yapalım." }
                    div #contact-success.banner.success role="status" hidden {
                        "✓ Mesajınız başarıyla gönderildi! En kısa sürede size dönüş yapacağız."
                    }
                    div #contact-error.banner.error role="alert" hidden {
                        "✗ Form gönderilirken bir hata oluştu. Lütfen tekrar deneyin."
                    }
                    form #contact-form data-endpoint=(endpoint) {
                        div.form-row {
                            div.form-group {
                                label for="name" { "Ad Soyad " span.required { "*" } }
                                input #name type="text" name="name" required placeholder="Adınız ve soyadınız";
                            }
                            div.form-group {
                                label for="email" { "E-posta " span.required { "*" } }
                                input #email type="email" name="email" required placeholder="ornek@email.com";
                            }
                        }
                        div.form-row {
                            div.form-group {
                                label for="phone" { "Telefon" }
                                input #phone type="tel" name="phone" placeholder=(info.phone);
                            }
                            div.form-group {
                                label for="subject" { "Konu " span.required { "*" } }
                                select #subject name="subject" required {
                                    option value="" { "Konu seçin" }
                                    @for (key, label) in &SUBJECTS {
                                        option value=(key) { (label) }
                                    }
                                }
                            }
                        }
                        div.form-group {
                            label for="message" { "Mesajınız " span.required { "*" } }
                            textarea #message name="message" rows="6" required
                                placeholder="Mesajınızı buraya yazın..." {}
                        }
                        button.button.primary type="submit" data-sending="Gönderiliyor..." {
                            "📮 Mesajı Gönder"
                        }
                    }
                }
                aside.sidebar {
                    div.sidebar-card {
                        h3 { "📧 E-posta" }
                        p { a href={ "mailto:" (info.email) } { (info.email) } }
                    }
                    div.sidebar-card {
                        h3 { "📱 Telefon" }
                        p {
                            a href={ "tel:" (tel) } { (info.phone) }
                            br;
                            small { "Pazartesi - Cuma: 09:00 - 18:00" }
                        }
                    }
                }
            }
        }
    };
    base_document(
        "İletişim",
        "Bizimle iletişime geçin. Her sorunuz için buradayız.",
        site,
        "/contact/",
        &[CONTACT_JS],
        content,
    )
}

/// Projects listing for one status view
fn render_projects(props: &ProjectsProps, view: StatusFilter, site: &Site) -> Markup {
    let projects = &props.projects;
    let counts = StatusCounts::of(projects);
    let shown = filter_projects(projects, &ProjectFilter::status(view));
    let admin = format!(
        "{}/content-manager/collection-types/api::project.project",
        site.config.cms.admin_url()
    );
    let buttons = [
        (StatusFilter::All, "🌟 Tümü"),
        (StatusFilter::Only(ProjectStatus::Active), "🚀 Aktif"),
        (StatusFilter::Only(ProjectStatus::Completed), "✅ Tamamlanan"),
        (StatusFilter::Only(ProjectStatus::Planning), "📋 Planlanan"),
    ];
    let empty_text = if projects.is_empty() {
        "Henüz proje eklenmemiş. CMS yönetim panelinden proje ekleyebilirsiniz."
    } else {
        "Bu durumda proje bulunmuyor."
    };

    let content = html! {
        (page_header(
            "Projelerimiz",
            Some("İnsanlara dokunduğumuz her proje, bir umut köprüsü"),
            breadcrumb(&[("/", "Ana Sayfa")], "Projeler"),
        ))
        section.stats-section {
            div.container.stats-grid {
                div.stat-card {
                    div.stat-icon { "📊" }
                    div.stat-number { (counts.total) }
                    div.stat-label { "Toplam Proje" }
                }
                div.stat-card {
                    div.stat-icon { "✅" }
                    div.stat-number { (counts.completed) }
                    div.stat-label { "Tamamlanan" }
                }
                div.stat-card {
                    div.stat-icon { "🚀" }
                    div.stat-number { (counts.active) }
                    div.stat-label { "Aktif Projeler" }
                }
                div.stat-card {
                    div.stat-icon { "👥" }
                    div.stat-number { (format::group_thousands(total_beneficiaries(projects))) }
                    div.stat-label { "Faydalanan Kişi" }
                }
            }
        }
        section.filter-section {
            div.container {
                div.filter-wrapper {
                    input #project-search type="search" placeholder="🔍 Proje ara..." autocomplete="off";
                    div.status-filter {
                        @for (filter, label) in &buttons {
                            @let is_current = *filter == view;
                            a.filter-button.current[is_current] href=(status_href(*filter)) {
                                (label) " (" (counts.for_filter(*filter)) ")"
                            }
                        }
                    }
                }
                p.results-info {
                    span #result-count { (shown.len()) } " proje bulundu"
                    span #result-query {}
                }
            }
        }
        section.projects-section {
            div.container {
                @if shown.is_empty() {
                    (empty_state(
                        "📂",
                        "Proje bulunamadı",
                        empty_text,
                        html! {
                            a.button href=(admin) target="_blank" rel="noopener" { "CMS'de Proje Ekle →" }
                        },
                    ))
                } @else {
                    div #project-grid.card-grid {
                        @for project in &shown {
                            (project_card(project, site))
                        }
                    }
                    div #search-empty.empty-state hidden {
                        div.empty-icon { "📂" }
                        h3.empty-title { "Proje bulunamadı" }
                        p #search-empty-text.empty-text {}
                        button #search-clear.button type="button" { "Aramayı Temizle" }
                    }
                }
            }
        }
    };
    base_document(
        "Projelerimiz",
        "Yardım projelerimiz ve faaliyetlerimiz",
        site,
        "/projects/",
        &[SEARCH_JS],
        content,
    )
}

fn project_card(project: &Project, site: &Site) -> Markup {
    let (badge_class, badge_label) = card_badge(project.project_status);
    let href = detail_href("projects", project.route_key());
    let image = site.image(project.cover_image.as_ref(), CARD_ORDER);
    let date = project
        .start_date
        .as_deref()
        .or(project.published_at.as_deref());
    html! {
        article.card.project-card
            data-title=(project.title.as_deref().unwrap_or_default())
            data-description=(project.description.as_deref().unwrap_or_default()) {
            @if let Some(src) = image {
                @let alt = project.title.as_deref().unwrap_or_default();
                @if let Some(href) = &href {
                    a href=(href) { img.card-image src=(src) alt=(alt) loading="lazy"; }
                } @else {
                    img.card-image src=(src) alt=(alt) loading="lazy";
                }
            }
            div.card-header {
                span class={ "badge " (badge_class) } { (badge_label) }
                @if let Some(location) = &project.location {
                    span.card-location { "📍 " (location) }
                }
            }
            h3.card-title {
                @let title = project.title.as_deref().unwrap_or("Başlıksız Proje");
                @if let Some(href) = &href {
                    a href=(href) { (title) }
                } @else {
                    (title)
                }
            }
            p.card-excerpt { (project.description.as_deref().unwrap_or("Açıklama bulunmuyor.")) }
            div.project-info {
                @if let Some(n) = project.beneficiaries.filter(|n| *n > 0) {
                    span.info-item { "👥 " (format::group_thousands(n)) " kişi" }
                }
                @if let Some(target) = project.target_amount.filter(|t| *t != 0.0) {
                    span.info-item {
                        "💰 " (format::amount(project.collected_amount.unwrap_or(0.0)))
                        " / " (format::amount(target)) " ₺"
                    }
                }
            }
            div.card-footer {
                @if let Some(date) = date {
                    span.card-meta { "📅 " (format::short_date(date)) }
                }
                @if let Some(href) = &href {
                    a.card-more href=(href) { "Detayları Gör →" }
                }
            }
            @if let Some(progress) = project.progress {
                div.card-progress {
                    (progress_bar(progress, project.project_status))
                    span.progress-text { "%" (format::percent(progress)) " Tamamlandı" }
                }
            }
        }
    }
}

/// Article detail page
fn render_article(article: &Article, key: &str, site: &Site) -> Markup {
    let title = article.title.as_deref().unwrap_or("Başlık yok");
    let image = site.image(article.image.as_ref(), DETAIL_ORDER);
    let page_url = site.config.site.absolute_url(&format!("/articles/{key}/"));
    let content = html! {
        article.detail {
            div.container.narrow {
                (breadcrumb(&[("/", "Ana Sayfa"), ("/", "Haberler")], title))
                h1.detail-title { (title) }
                @if let Some(src) = image {
                    div.cover-image { img src=(src) alt=(title); }
                }
                div.detail-meta {
                    @if let Some(published) = &article.published_at {
                        span.meta-item { "📅 " (format::long_date(published)) }
                    }
                    @if let Some(minutes) = article.read_time {
                        span.meta-item { "📖 " (minutes) " dakika okuma" }
                    }
                }
                @if let Some(excerpt) = &article.excerpt {
                    div.excerpt { (excerpt) }
                }
                (content_body(detail_paragraphs(&article.content)))
                (share_links("Bu makaleyi paylaşın", &page_url, title, article.excerpt.as_deref()))
                (detail_nav("/", "← Tüm Haberler"))
            }
        }
    };
    base_document(
        title,
        article.excerpt.as_deref().unwrap_or_default(),
        site,
        "/",
        &[],
        content,
    )
}

/// Project detail page
fn render_project(project: &Project, key: &str, site: &Site) -> Markup {
    let title = project.title.as_deref().unwrap_or("Başlıksız Proje");
    let image = site.image(project.cover_image.as_ref(), DETAIL_ORDER);
    let page_url = site.config.site.absolute_url(&format!("/projects/{key}/"));
    let content = html! {
        article.detail {
            div.container.narrow {
                (breadcrumb(&[("/", "Ana Sayfa"), ("/projects/", "Projeler")], title))
                h1.detail-title { (title) }
                @if let Some(src) = image {
                    div.cover-image { img src=(src) alt=(title); }
                }
                div.detail-meta {
                    @if let Some(published) = &project.published_at {
                        span.meta-item { "📅 " (format::long_date(published)) }
                    }
                    @if let Some(minutes) = project.read_time {
                        span.meta-item { "📖 " (minutes) " dakika okuma" }
                    }
                }
                div.detail-meta {
                    @if let Some((class, label)) = detail_badge(project.project_status) {
                        span class={ "badge " (class) } { (label) }
                    }
                    @if let Some(location) = &project.location {
                        span.meta-item { "📍 " (location) }
                    }
                    @if let Some(n) = project.beneficiaries.filter(|n| *n > 0) {
                        span.meta-item { "👥 " (format::group_thousands(n)) " kişi" }
                    }
                    @if let Some(start) = &project.start_date {
                        span.meta-item {
                            "🗓️ " (format::long_date(start))
                            @if let Some(end) = &project.end_date {
                                " – " (format::long_date(end))
                            }
                        }
                    }
                }
                @if let Some(description) = &project.description {
                    div.excerpt { (description) }
                }
                @if let Some(progress) = project.progress {
                    div.progress-section {
                        div.progress-header {
                            span { "Proje İlerlemesi" }
                            span.progress-percent { "%" (format::percent(progress)) }
                        }
                        (progress_bar(progress, project.project_status))
                    }
                }
                @if let (Some(target), Some(funded)) = (project.target_amount, project.funding_percent()) {
                    div.funding-section {
                        h3 { "💰 Bağış Hedefi" }
                        div.funding-amount {
                            span.collected { (format::amount(project.collected_amount.unwrap_or(0.0))) " ₺" }
                            span.separator { "/" }
                            span.target { (format::amount(target)) " ₺" }
                        }
                        div.funding-bar {
                            div.funding-fill style={ "width: " (format::percent(funded)) "%" } {}
                        }
                    }
                }
                (content_body(detail_paragraphs(&project.content)))
                (share_links("Bu projeyi paylaşın", &page_url, title, project.excerpt.as_deref()))
                (detail_nav("/projects/", "← Tüm Projeler"))
            }
        }
    };
    base_document(
        title,
        project.description.as_deref().unwrap_or_default(),
        site,
        "/projects/",
        &[],
        content,
    )
}

#[derive(Debug, Clone, Copy)]
enum NotFound {
    Page,
    Article,
    Project,
}

fn render_not_found(kind: NotFound, site: &Site) -> Markup {
    let (title, text, back_href, back_label, current) = match kind {
        NotFound::Page => (
            "Sayfa Bulunamadı",
            "Aradığınız sayfa mevcut değil.",
            "/",
            "← Ana Sayfaya Dön",
            "",
        ),
        NotFound::Article => (
            "Makale Bulunamadı",
            "Aradığınız makale mevcut değil veya kaldırılmış olabilir.",
            "/",
            "← Ana Sayfaya Dön",
            "/",
        ),
        NotFound::Project => (
            "Proje Bulunamadı",
            "Aradığınız proje mevcut değil veya kaldırılmış olabilir.",
            "/projects/",
            "← Tüm Projeler",
            "/projects/",
        ),
    };
    let content = html! {
        div.container.not-found {
            (empty_state("📄", title, text, html! { a.button href=(back_href) { (back_label) } }))
        }
    };
    base_document(title, text, site, current, &[], content)
}

// ============================================================================
// Tests
// ============================================================================
