//! Image URL resolution for CMS media fields.
//!
//! A media field arrives as an optional descriptor carrying the original
//! upload URL plus a set of pre-generated size variants. Each call site
//! picks variants in its own priority order: detail pages want the largest
//! rendition, listing cards want something small.

use serde::{Deserialize, Serialize};

/// Media descriptor as returned by the CMS with `populate=*`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "alternativeText")]
    pub alt: Option<String>,
    #[serde(default)]
    pub formats: Option<ImageFormats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFormats {
    #[serde(default)]
    pub large: Option<ImageFormat>,
    #[serde(default)]
    pub medium: Option<ImageFormat>,
    #[serde(default)]
    pub small: Option<ImageFormat>,
    #[serde(default)]
    pub thumbnail: Option<ImageFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFormat {
    #[serde(default)]
    pub url: Option<String>,
}

/// A named rendition of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// The original upload (top-level `url`).
    Full,
    Large,
    Medium,
    Small,
    Thumbnail,
}

/// Priority order for full-width images on detail pages.
pub const DETAIL_ORDER: &[Variant] = &[
    Variant::Full,
    Variant::Large,
    Variant::Medium,
    Variant::Small,
    Variant::Thumbnail,
];

/// Priority order for listing cards.
pub const CARD_ORDER: &[Variant] = &[
    Variant::Small,
    Variant::Medium,
    Variant::Thumbnail,
    Variant::Large,
    Variant::Full,
];

impl ImageDescriptor {
    /// Raw (possibly relative) URL of one variant, if the CMS provided it.
    pub fn variant_url(&self, variant: Variant) -> Option<&str> {
        let formats = self.formats.as_ref();
        let format = match variant {
            Variant::Full => return self.url.as_deref().filter(|u| !u.is_empty()),
            Variant::Large => formats.and_then(|f| f.large.as_ref()),
            Variant::Medium => formats.and_then(|f| f.medium.as_ref()),
            Variant::Small => formats.and_then(|f| f.small.as_ref()),
            Variant::Thumbnail => formats.and_then(|f| f.thumbnail.as_ref()),
        };
        format
            .and_then(|f| f.url.as_deref())
            .filter(|u| !u.is_empty())
    }
}

/// Pick the first available variant in `order` and qualify it against `host`.
///
/// URLs that already carry a scheme (matched case-insensitively) or are
/// protocol-relative (`//cdn...`) are returned unchanged; relative upload paths are prefixed with the content host. Nothing checks
/// that the result is reachable.
pub fn resolve_image_url(
    image: Option<&ImageDescriptor>,
    host: &str,
    order: &[Variant],
) -> Option<String> {
    let image = image?;
    let path = order.iter().find_map(|v| image.variant_url(*v))?;
    if is_absolute(path) {
        Some(path.to_string())
    } else {
        Some(format!("{}{}", host.trim_end_matches('/'), path))
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("//") || url::Url::parse(path).is_ok()
}
