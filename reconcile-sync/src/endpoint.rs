//! Typed request URL builder.
//!
//! Every path segment and query value goes through `url`'s encoders, so
//! identifiers and free text never need manual escaping.

use url::Url;

use crate::error::SyncError;

/// A base URL that can be extended with path segments and query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Start from a configured base. Any query or fragment on the base is
    /// dropped; `mailto:`-style URLs are rejected.
    pub fn base(url: &Url) -> Result<Self, SyncError> {
        if url.cannot_be_a_base() {
            return Err(SyncError::InvalidEndpoint {
                url: url.to_string(),
            });
        }
        let mut url = url.clone();
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { url })
    }

    /// Append one percent-encoded path segment (`/` inside it is escaped).
    pub fn segment(mut self, segment: &str) -> Self {
        // `base` guarantees the URL can carry segments.
        if let Ok(mut segments) = self.url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        self
    }

    /// Append one form-encoded query pair.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    pub fn build(self) -> Url {
        self.url
    }
}
