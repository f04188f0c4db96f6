//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is a content inventory: every record is shown by position and
//! title, with its route as secondary context. Untitled records fall back to
//! their route key so nothing is listed blank.
//!
//! # Output Format
//!
//! ## Fetch / Check
//!
//! ```text
//! Articles
//! 001 Umut Köprüsü → /articles/umut-koprusu/
//! 002 Duyuru → /articles/doc2/
//!     not found
//!
//! Projects
//! 001 Su Kuyusu [active] → /projects/su-kuyusu/
//!
//! About
//!     Hakkımızda → /about/
//!
//! Categories: 2
//! Routes: 0 fresh, 6 refetched (6 routes)
//! ```
//!
//! ## Generate
//!
//! ```text
//! Removed articles/eski-haber
//! Generated 14 pages (1 articles, 3 projects) in dist
//! ```
//!
//! ## Search
//!
//! ```text
//! 1 proje bulundu "kuyu" için
//! 001 Su Kuyusu [active]
//!     📍 Kadıköy, İstanbul
//!     Köy okulları için temiz su
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::cache::RevalidationStats;
use crate::contact::{ContactSubmission, subject_label};
use crate::fetch::Snapshot;
use crate::filter::ProjectFilter;
use crate::generate::GenerateSummary;
use crate::loader::PageState;
use crate::types::Project;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Title, or the route key in parens when the record is untitled.
///
/// ```text
/// 001 Umut Köprüsü
/// 002 (doc2)
/// ```
fn entity_line(index: usize, title: Option<&str>, key: &str) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => format!("{} ({})", format_index(index), key),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn status_tag(project: &Project) -> String {
    match project.project_status {
        Some(status) => format!(" [{}]", status.as_str()),
        None => String::new(),
    }
}

// ============================================================================
// Fetch / check
// ============================================================================

pub fn format_fetch_output(snapshot: &Snapshot, stats: &RevalidationStats) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Articles".to_string());
    if snapshot.home.articles.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, article) in snapshot.home.articles.iter().enumerate() {
        let key = article.route_key();
        lines.push(format!(
            "{} \u{2192} /articles/{}/",
            entity_line(i + 1, article.title.as_deref(), key),
            key
        ));
        if matches!(snapshot.articles.get(key), Some(PageState::NotFound)) {
            lines.push(format!("{}not found", indent(1)));
        }
    }

    lines.push(String::new());
    lines.push("Projects".to_string());
    if snapshot.projects.projects.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, project) in snapshot.projects.projects.iter().enumerate() {
        let key = project.route_key();
        lines.push(format!(
            "{}{} \u{2192} /projects/{}/",
            entity_line(i + 1, project.title.as_deref(), key),
            status_tag(project),
            key
        ));
        if matches!(
            snapshot.project_details.get(key),
            Some(PageState::NotFound)
        ) {
            lines.push(format!("{}not found", indent(1)));
        }
    }

    lines.push(String::new());
    lines.push("About".to_string());
    match &snapshot.about {
        PageState::Ready(page) => lines.push(format!(
            "{}{} \u{2192} /about/",
            indent(1),
            page.title.as_deref().unwrap_or("(untitled)")
        )),
        _ => lines.push(format!("{}(empty)", indent(1))),
    }

    lines.push(String::new());
    lines.push(format!("Categories: {}", snapshot.projects.categories.len()));
    lines.push(format!("Routes: {}", stats));
    lines
}

pub fn print_fetch_output(snapshot: &Snapshot, stats: &RevalidationStats) {
    for line in format_fetch_output(snapshot, stats) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_output(summary: &GenerateSummary, output_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .removed
        .iter()
        .map(|route| format!("Removed {}", route))
        .collect();
    lines.push(format!(
        "Generated {} pages ({} articles, {} projects) in {}",
        summary.pages,
        summary.articles,
        summary.projects,
        output_dir.display()
    ));
    lines
}

pub fn print_generate_output(summary: &GenerateSummary, output_dir: &Path) {
    for line in format_generate_output(summary, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Search
// ============================================================================

pub fn format_search_output(filter: &ProjectFilter, results: &[&Project]) -> Vec<String> {
    let mut header = format!("{} proje bulundu", results.len());
    if !filter.query.is_empty() {
        header.push_str(&format!(" \"{}\" için", filter.query));
    }
    let mut lines = vec![header];

    for (i, project) in results.iter().enumerate() {
        lines.push(format!(
            "{}{}",
            entity_line(i + 1, project.title.as_deref(), project.route_key()),
            status_tag(project)
        ));
        if let Some(location) = &project.location {
            lines.push(format!("{}📍 {}", indent(1), location));
        }
        if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("{}{}", indent(1), truncate_desc(description, 60)));
        }
    }
    lines
}

pub fn print_search_output(filter: &ProjectFilter, results: &[&Project]) {
    for line in format_search_output(filter, results) {
        println!("{}", line);
    }
}

// ============================================================================
// Contact
// ============================================================================

pub fn format_contact_output(submission: &ContactSubmission) -> Vec<String> {
    let subject = subject_label(&submission.subject).unwrap_or(submission.subject.as_str());
    vec![format!(
        "Sent message from {} <{}>: {}",
        submission.name, submission.email, subject
    )]
}

pub fn print_contact_output(submission: &ContactSubmission) {
    for line in format_contact_output(submission) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
