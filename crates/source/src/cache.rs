use crate::error::{Result, SourceError};
use crate::syntax::SyntaxNode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Bump when the lowered tree shape changes
pub const PARSE_CACHE_SCHEMA_VERSION: u32 = 1;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    schema_version: u32,
    path: String,
    content_hash: String,
    tree: SyntaxNode,
}

/// On-disk cache of lowered syntax trees keyed by path and content
///
/// Entries are written to a unique temp file and renamed into place, so
/// concurrent writers of the same entry are idempotent and readers never see a
/// partial file.
#[derive(Debug, Clone)]
pub struct ParseCache {
    dir: PathBuf,
}

impl ParseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// SHA-256 of file content, hex encoded
    #[must_use]
    pub fn content_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, relative: &str, content_hash: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(relative.as_bytes());
        hasher.update([0u8]);
        hasher.update(content_hash.as_bytes());
        self.dir.join(format!("{:x}.json", hasher.finalize()))
    }

    /// Cached tree for this exact file content, if present and readable
    #[must_use]
    pub fn load(&self, relative: &str, content_hash: &str) -> Option<SyntaxNode> {
        let path = self.entry_path(relative, content_hash);
        let raw = std::fs::read_to_string(&path).ok()?;
        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!("Ignoring corrupt parse cache entry {}: {e}", path.display());
                return None;
            }
        };
        if envelope.schema_version != PARSE_CACHE_SCHEMA_VERSION
            || envelope.path != relative
            || envelope.content_hash != content_hash
        {
            log::warn!(
                "Ignoring stale parse cache entry {} (schema {})",
                path.display(),
                envelope.schema_version
            );
            return None;
        }
        Some(envelope.tree)
    }

    /// Persist `tree` atomically
    pub fn store(&self, relative: &str, content_hash: &str, tree: &SyntaxNode) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| SourceError::io(&self.dir, e))?;

        let target = self.entry_path(relative, content_hash);
        let envelope = CacheEnvelope {
            schema_version: PARSE_CACHE_SCHEMA_VERSION,
            path: relative.to_string(),
            content_hash: content_hash.to_string(),
            tree: tree.clone(),
        };
        let json = serde_json::to_vec(&envelope).map_err(|e| SourceError::cache(&target, e))?;

        let temp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            target
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("entry"),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&temp, json).map_err(|e| SourceError::io(&temp, e))?;
        if let Err(e) = std::fs::rename(&temp, &target) {
            let _ = std::fs::remove_file(&temp);
            return Err(SourceError::io(&target, e));
        }
        Ok(())
    }
}
