//! Identity types for the extraction engine.
//!
//! Two kinds of identity flow through the system. An [`ObjectId`] names a live
//! engine-side entity; it is reference identity, valid only while the host
//! process runs, and its integer form ([`TransientRef`]) is what cross-reference
//! fields inside a single output document carry. A [`ContentDigest`] is the
//! durable identity: a hex digest of canonical content bytes, stable across
//! runs and processes, used to address skeleton files and binary assets.

use std::num::NonZeroI32;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Engine-assigned identifier of a live object, component, or asset handle.
///
/// Uses `NonZeroI32` so that `Option<ObjectId>` is the same size as `ObjectId`
/// (the niche optimization lets the compiler use 0 as the `None` discriminant,
/// which is also the document convention for a null reference).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ObjectId(NonZeroI32);

impl ObjectId {
    /// Create an `ObjectId` from a raw engine instance id.
    ///
    /// Returns `None` if `raw` is zero; zero is reserved for null references.
    pub fn new(raw: i32) -> Option<Self> {
        NonZeroI32::new(raw).map(ObjectId)
    }

    /// Get the underlying `i32` value.
    pub fn get(self) -> i32 {
        self.0.get()
    }

    /// The document-local reference for this object.
    pub fn transient(self) -> TransientRef {
        TransientRef(self.0.get())
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj:{}", self.0)
    }
}

/// A document-local cross-reference value.
///
/// Valid only within one output document batch; `0` means "no object".
/// Never persisted as a cross-run identity — that is what [`ContentDigest`]
/// is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TransientRef(i32);

impl TransientRef {
    /// The null reference.
    pub const NULL: TransientRef = TransientRef(0);

    /// Get the raw reference value.
    pub fn get(self) -> i32 {
        self.0
    }

    /// Whether this is the null reference.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<ObjectId> for TransientRef {
    fn from(id: ObjectId) -> Self {
        id.transient()
    }
}

impl From<Option<ObjectId>> for TransientRef {
    fn from(id: Option<ObjectId>) -> Self {
        id.map_or(TransientRef::NULL, ObjectId::transient)
    }
}

impl std::fmt::Display for TransientRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 32-character lowercase hex digest of canonical content bytes.
///
/// The only identity that survives across runs: equal content always yields an
/// equal digest, and the digest doubles as the guid the consuming editor
/// expects in sidecar descriptors (128-bit, hex-encoded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Digest a byte sequence.
    ///
    /// Deterministic and order-sensitive; callers must feed a canonical byte
    /// ordering.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        let mut hasher = Md5::new();
        hasher.update(bytes.as_ref());
        ContentDigest(hex::encode(hasher.finalize()))
    }

    /// Digest the UTF-8 bytes of a string.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Parse a digest recovered from a file header.
    ///
    /// Returns `None` unless `s` is exactly 32 hex characters. Uppercase input
    /// is normalized to lowercase so recovered digests compare equal to
    /// freshly computed ones.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(ContentDigest(s.to_ascii_lowercase()))
    }

    /// The hex string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContentDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
