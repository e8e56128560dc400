use corpus_types::ContentHash;

/// Domain-separated BLAKE3 content hasher.
///
/// The hasher carries a domain tag (e.g. `"corpus-snapshot-v1"`) that is
/// prepended to every hash computation, so payload bytes can never collide
/// with hashes computed for other purposes. Hashing is stable across process
/// restarts and across backends: the digest depends only on the domain tag
/// and the canonical payload bytes, which is what makes byte-level
/// deduplication meaningful.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for document content snapshots.
    pub const SNAPSHOT: Self = Self {
        domain: "corpus-snapshot-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ContentHash::from_digest(*hasher.finalize().as_bytes())
    }

    /// Verify that data produces the expected content hash.
    pub fn verify(&self, data: &[u8], expected: &ContentHash) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
