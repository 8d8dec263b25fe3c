//! Change tokens.
//!
//! SHA-256 over the canonical byte form of the serialized tree, rendered as
//! unpadded base64url. Two resources with identical canonical trees have the
//! same token no matter how they were constructed.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use roam_util::canonical;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::resource::Resource;
use crate::serialize::{serialize, SerializeOptions};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ETag(String);

impl ETag {
    pub fn compute<R: Resource>(resource: &R, options: &SerializeOptions<R>) -> Self {
        Self::of_tree(&serialize(resource, options))
    }

    pub fn of_tree(tree: &Value) -> Self {
        let digest = Sha256::digest(canonical::to_bytes(tree));
        Self(URL_SAFE_NO_PAD.encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against a token received from a caller, e.g. an `If-Match`
    /// value with or without surrounding quotes.
    pub fn matches(&self, token: &str) -> bool {
        token.trim_matches('"') == self.0
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
