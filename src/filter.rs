//! Project listing filter and status statistics.
//!
//! Pure functions over an in-memory project list. The same matching rules
//! run in the browser (`static/search.js`) for live search on the rendered
//! listing, so keep the two in step.

use crate::types::{Project, ProjectStatus};
use std::fmt;

/// Status selector on the projects listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProjectStatus),
}

impl StatusFilter {
    /// Parse `"all"` or a concrete status name.
    pub fn parse(name: &str) -> Option<StatusFilter> {
        if name == "all" {
            Some(StatusFilter::All)
        } else {
            ProjectStatus::parse(name).map(StatusFilter::Only)
        }
    }

    pub fn matches(self, status: Option<ProjectStatus>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == Some(wanted),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(s) => f.write_str(s.as_str()),
        }
    }
}

/// Filter criteria for the projects listing.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Free-text query, matched as a case-insensitive substring. Not trimmed.
    pub query: String,
    /// Category selector. Accepted for the listing UI but currently has no
    /// effect on the result.
    pub category: Option<String>,
    pub status: StatusFilter,
}

impl ProjectFilter {
    pub fn status(status: StatusFilter) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Whether one project satisfies both the text and status predicates.
    pub fn matches(&self, project: &Project) -> bool {
        self.matches_text(project) && self.status.matches(project.project_status)
    }

    fn matches_text(&self, project: &Project) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        };
        contains(&project.title) || contains(&project.description)
    }
}

/// Retain the projects matching `filter`, preserving input order.
pub fn filter_projects<'a>(projects: &'a [Project], filter: &ProjectFilter) -> Vec<&'a Project> {
    projects.iter().filter(|p| filter.matches(p)).collect()
}

/// Per-status counts shown on the listing's stats bar and filter buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub planning: usize,
}

impl StatusCounts {
    pub fn of(projects: &[Project]) -> Self {
        projects.iter().fold(Self::default(), |mut counts, p| {
            counts.total += 1;
            match p.project_status {
                Some(ProjectStatus::Active) => counts.active += 1,
                Some(ProjectStatus::Completed) => counts.completed += 1,
                Some(ProjectStatus::Planning) => counts.planning += 1,
                _ => {}
            }
            counts
        })
    }

    /// Number of projects a status selector would show with an empty query.
    pub fn for_filter(&self, status: StatusFilter) -> usize {
        match status {
            StatusFilter::All => self.total,
            StatusFilter::Only(ProjectStatus::Active) => self.active,
            StatusFilter::Only(ProjectStatus::Completed) => self.completed,
            StatusFilter::Only(ProjectStatus::Planning) => self.planning,
            StatusFilter::Only(ProjectStatus::Unknown) => 0,
        }
    }
}

/// Sum of beneficiaries across all projects (missing counts as zero).
pub fn total_beneficiaries(projects: &[Project]) -> u64 {
    projects.iter().filter_map(|p| p.beneficiaries).sum()
}
