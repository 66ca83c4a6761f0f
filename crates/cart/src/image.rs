//! Image URL normalization.
//!
//! Cart entries keep fully-qualified image URLs so the cart contents can be
//! rendered outside the page that added them (order emails, invoice PDFs).
//! Product buttons often carry site-relative paths like `files/aceite.jpg`;
//! those are rewritten against the storefront origin.

use core::fmt;

use thiserror::Error;
use url::Url;

/// Errors that can occur when parsing a [`StoreOrigin`].
#[derive(Debug, Error)]
pub enum OriginError {
    /// The input is not a valid URL.
    #[error("invalid origin URL: {0}")]
    Parse(#[from] url::ParseError),

    /// The URL has no host-based origin (e.g. `file:` or `data:` URLs).
    #[error("URL has no usable origin: {0}")]
    Opaque(String),
}

/// The storefront origin (`scheme://host[:port]`) used to absolutize paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOrigin(String);

impl StoreOrigin {
    /// Parse an origin from any URL on the storefront.
    ///
    /// Path, query and fragment are discarded, so `https://garval.es/shop`
    /// yields `https://garval.es`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a URL or has an opaque origin.
    pub fn parse(s: &str) -> Result<Self, OriginError> {
        let url = Url::parse(s.trim())?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(OriginError::Opaque(s.to_owned()));
        }
        Ok(Self(origin.ascii_serialization()))
    }

    /// Returns the origin as a string slice, without a trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Make an image reference absolute against `origin`.
///
/// Values that already start with `http` are returned unchanged. Anything
/// else gets a leading `/` if missing and the origin prefixed.
#[must_use]
pub fn normalize_image_url(image: &str, origin: &StoreOrigin) -> String {
    if image.starts_with("http") {
        return image.to_owned();
    }

    if image.starts_with('/') {
        format!("{origin}{image}")
    } else {
        format!("{origin}/{image}")
    }
}
