//! Call-site keys
//!
//! A call site is identified by an opaque, bounded-length string. Keys are
//! stored inline (no heap allocation) so they can travel inside a
//! [`CallToken`](crate::tracer::CallToken) as plain values.
//!
//! Identifiers longer than [`MAX_CALL_SITE_LEN`] bytes are silently truncated,
//! so two identifiers that differ only past the bound name the same call site.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Maximum length of a call-site identifier in bytes (64-byte buffer minus NUL)
pub const MAX_CALL_SITE_LEN: usize = 63;

/// Fixed-capacity identifier for an instrumented call site
#[derive(Clone, Copy)]
pub struct CallSiteKey {
    bytes: [u8; MAX_CALL_SITE_LEN],
    len: u8,
}

impl CallSiteKey {
    /// Build a key from an identifier, truncating to [`MAX_CALL_SITE_LEN`] bytes
    ///
    /// The cut never splits a UTF-8 character: if byte 63 falls inside one,
    /// the key ends at the previous character boundary.
    pub fn new(identifier: &str) -> Self {
        let mut end = identifier.len().min(MAX_CALL_SITE_LEN);
        while !identifier.is_char_boundary(end) {
            end -= 1;
        }

        let mut bytes = [0u8; MAX_CALL_SITE_LEN];
        bytes[..end].copy_from_slice(&identifier.as_bytes()[..end]);

        Self {
            bytes,
            len: end as u8,
        }
    }

    /// The identifier as stored (possibly truncated)
    pub fn as_str(&self) -> &str {
        // Constructed only from a `str` prefix ending on a char boundary.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Raw identifier bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the empty identifier
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl PartialEq for CallSiteKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for CallSiteKey {}

impl Hash for CallSiteKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl PartialOrd for CallSiteKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CallSiteKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl From<&str> for CallSiteKey {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

impl fmt::Display for CallSiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CallSiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CallSiteKey").field(&self.as_str()).finish()
    }
}
