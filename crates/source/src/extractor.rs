use crate::cache::ParseCache;
use crate::config::SourceConfig;
use crate::error::{Result, SourceError};
use crate::provenance::ProvenanceMatcher;
use crate::syntax::{SourceParser, SyntaxNode};
use crate::tree_sitter_parser::TreeSitterParser;
use crate::visitor::walk_docstrings;
use claimscan_claims::{
    default_concurrency, process_files, sequence_claims, ClaimBatch, ClaimDraft, FileJob,
    FileScanner, Location, Origin, RunSummary,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Extracts provenance claims from Python docstrings
#[derive(Clone)]
pub struct SourceClaimExtractor {
    config: SourceConfig,
    parser: Arc<dyn SourceParser>,
    cache: Option<ParseCache>,
    matcher: ProvenanceMatcher,
}

impl std::fmt::Debug for SourceClaimExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceClaimExtractor")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl SourceClaimExtractor {
    /// Extractor using the tree-sitter Python front end
    pub fn new(config: SourceConfig) -> Result<Self> {
        Self::with_parser(config, Arc::new(TreeSitterParser::new()))
    }

    pub fn with_parser(config: SourceConfig, parser: Arc<dyn SourceParser>) -> Result<Self> {
        config.validate().map_err(SourceError::invalid_config)?;
        let cache = config.cache_dir.clone().map(ParseCache::new);
        Ok(Self {
            config,
            parser,
            cache,
            matcher: ProvenanceMatcher::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Extract every source file under `root` into a sequenced batch
    ///
    /// Files that cannot be read or parsed are logged and listed in the summary;
    /// the remaining files still contribute claims.
    pub async fn extract_root(&self, root: &Path, deadline: Option<Instant>) -> Result<ClaimBatch> {
        if !root.exists() {
            return Err(SourceError::MissingRoot(root.to_path_buf()));
        }

        let scanner = Arc::new(FileScanner::new(root).with_extensions(&self.config.extensions));
        let files = scanner.scan();
        let concurrency = self.config.concurrency.unwrap_or_else(default_concurrency);
        log::debug!(
            "Scanning {} source files with {concurrency} workers",
            files.len()
        );

        let extractor = self.clone();
        let job_scanner = Arc::clone(&scanner);
        let job: Arc<FileJob<Vec<ClaimDraft>>> = Arc::new(move |path: &Path| {
            let relative = job_scanner.relative_path(path);
            extractor
                .extract_file(path, &relative)
                .map_err(|e| e.to_string())
        });

        let mut summary = RunSummary::new();
        let mut drafts = Vec::new();
        for (path, outcome) in process_files(files, concurrency, deadline, job).await {
            let relative = scanner.relative_path(&path);
            match outcome {
                Ok(found) => {
                    log::debug!("{relative}: {} claims", found.len());
                    summary.add_processed(found.len());
                    drafts.extend(found);
                }
                Err(reason) => {
                    log::warn!("Skipping source file {relative}: {reason}");
                    summary.add_skipped(relative, reason);
                }
            }
        }

        let claims = sequence_claims(Origin::Source, drafts);
        log::info!(
            "Source extraction: {} files, {} skipped, {} claims",
            summary.files_processed,
            summary.skipped_count(),
            claims.len()
        );
        Ok(ClaimBatch::new(
            Origin::Source,
            root.display().to_string(),
            summary,
            claims,
        ))
    }

    /// Read one source file and extract its claims
    pub fn extract_file(&self, path: &Path, relative: &str) -> Result<Vec<ClaimDraft>> {
        let bytes = std::fs::read(path).map_err(|e| SourceError::io(path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| SourceError::Encoding {
            path: path.to_path_buf(),
            offset: e.utf8_error().valid_up_to(),
        })?;
        self.extract_str(&content, relative)
    }

    /// Parse `content` (through the cache when configured) and extract its claims
    pub fn extract_str(&self, content: &str, file: &str) -> Result<Vec<ClaimDraft>> {
        let tree = self.syntax_tree(content, file)?;
        Ok(self.claims_in(&tree, file))
    }

    /// Claims carried by the docstrings of an already parsed tree, in source order
    #[must_use]
    pub fn claims_in(&self, tree: &SyntaxNode, file: &str) -> Vec<ClaimDraft> {
        let mut drafts = Vec::new();
        walk_docstrings(tree, |scope, docstring| {
            let scope = scope.to_string();
            for found in self.matcher.analyze(&docstring.text) {
                drafts.push(ClaimDraft {
                    text: found.text,
                    kind: found.kind,
                    location: Location::new(file, docstring.line + found.line_offset),
                    scope: scope.clone(),
                    confidence: found.confidence,
                    citations: found.citations,
                });
            }
        });
        drafts
    }

    fn syntax_tree(&self, content: &str, file: &str) -> Result<SyntaxNode> {
        let Some(cache) = &self.cache else {
            return self.parser.parse(content);
        };

        let content_hash = ParseCache::content_hash(content);
        if let Some(tree) = cache.load(file, &content_hash) {
            log::trace!("{file}: parse cache hit");
            return Ok(tree);
        }

        let tree = self.parser.parse(content)?;
        if let Err(e) = cache.store(file, &content_hash, &tree) {
            log::warn!("{file}: could not write parse cache entry: {e}");
        }
        Ok(tree)
    }
}
