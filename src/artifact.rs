//! Generated artifacts and their content hashes.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A SHA-256 content hash.
pub type ContentHash = [u8; 32];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    SumType,
    Delegates,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::SumType => "sum_type",
            ArtifactKind::Delegates => "delegates",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated source file. `name` is the identity key and doubles as the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub source: String,
    pub hash: ContentHash,
}

impl Artifact {
    pub fn sum_type(type_name: &str, source: String) -> Self {
        Self::new(format!("{type_name}.rs"), ArtifactKind::SumType, source)
    }

    pub fn delegates(host_name: &str, source: String) -> Self {
        Self::new(format!("{host_name}.delegates.rs"), ArtifactKind::Delegates, source)
    }

    fn new(name: String, kind: ArtifactKind, source: String) -> Self {
        let hash = sha256(source.as_bytes());
        Self { name, kind, source, hash }
    }

    pub fn hash_hex(&self) -> String {
        to_hex(&self.hash)
    }
}

pub fn sha256(data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

pub fn to_hex(hash: &ContentHash) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(64);
    for byte in hash {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
