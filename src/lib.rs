//! # Zirve Site
//!
//! Static site generator for the Zirve Dayanışma Ağı website. A headless CMS
//! is the data source: articles, projects, categories and static pages are
//! fetched over its REST API and rendered to plain HTML.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Fetch     CMS       →  snapshot.json   (REST API → page props per route)
//! 2. Generate  snapshot  →  dist/           (final HTML site)
//! ```
//!
//! The snapshot is human-readable JSON, so a build can be inspected or
//! regenerated without touching the CMS. Fetching goes through a props cache
//! with time-based revalidation: props younger than the interval are reused,
//! older ones are refetched, and a failed refetch serves the last good props.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`client`] | REST client for the CMS and the [`client::ContentSource`] seam |
//! | [`loader`] | Per-route data loaders producing page props and [`loader::PageState`] |
//! | [`fetch`] | Stage 1: resolves every route through the props cache into a snapshot |
//! | [`cache`] | Props cache with revalidation interval and stale fallback |
//! | [`generate`] | Stage 2: renders the snapshot to HTML using Maud |
//! | [`filter`] | Project search and status filtering, status statistics |
//! | [`contact`] | Contact form submission and validation |
//! | [`content`] | Rich-text body to paragraph extraction |
//! | [`image`] | Image variant selection and absolute URL resolution |
//! | [`format`] | Turkish dates, grouped numbers and currency |
//! | [`config`] | `config.toml` loading, validation, merging and CSS generation |
//! | [`types`] | CMS record types shared by every stage |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup is
//! a build error, interpolation is auto-escaped, and there is no template
//! directory to ship next to the binary.
//!
//! ## Route Keys
//!
//! Detail pages live at `/articles/<key>/` and `/projects/<key>/`. The key is
//! the record's slug when the slug contains a hyphen, otherwise its document
//! id. A detail page is looked up the same way: a key with a hyphen is matched
//! against `slug`, anything else against `documentId`.
//!
//! ## Degrading Instead of Failing
//!
//! A CMS outage never fails a build. Lists degrade to empty, single pages to
//! their empty or not-found state, and anything previously cached is served
//! in their place.

pub mod cache;
pub mod client;
pub mod config;
pub mod contact;
pub mod content;
pub mod fetch;
pub mod filter;
pub mod format;
pub mod generate;
pub mod image;
pub mod loader;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
