use crate::config::ProseConfig;
use crate::error::{ProseError, Result};
use crate::markdown::{
    classify_lines, find_proof_marker, has_proof_end, parse_header, strip_emphasis, FormalHeader,
    Line,
};
use claimscan_claims::{
    collapse_whitespace, default_concurrency, process_files, sentences, sequence_claims,
    CitationDetector, ClaimBatch, ClaimDraft, ClaimKind, Confidence, FileJob, FileScanner,
    Location, Origin, RunSummary,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Scope used for claims outside any section heading
const DOCUMENT_SCOPE: &str = "document";

static CLAIM_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(is|are|was|were|has|have|holds?|shows?|showed|shown|proves?|proved|proven|demonstrates?|demonstrated|guarantees?|ensures?|converges?|implies|yields?|achieves?|achieved|reduces?|outperforms?|bounds?|establishe[sd]|satisfies)\b",
    )
    .expect("valid claim verb regex")
});

/// Evidence found around a formal statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indicators {
    pub numbered: bool,
    pub cited: bool,
    pub proof: bool,
    pub math_block: bool,
}

impl Indicators {
    /// `0.5 + 0.2·numbered + 0.2·cited + 0.1·proof + 0.1·math`, or `0.6` with no indicator
    #[must_use]
    pub fn confidence(self) -> Confidence {
        let mut points = 50;
        if self.numbered {
            points += 20;
        }
        if self.cited {
            points += 20;
        }
        if self.proof {
            points += 10;
        }
        if self.math_block {
            points += 10;
        }
        if points == 50 {
            points = 60;
        }
        Confidence::from_points(points)
    }
}

/// Extracts labelled statements and cited declarative sentences from markdown
#[derive(Debug, Clone)]
pub struct ProseClaimExtractor {
    config: ProseConfig,
    citations: CitationDetector,
}

impl ProseClaimExtractor {
    pub fn new(config: ProseConfig) -> Result<Self> {
        config.validate().map_err(ProseError::invalid_config)?;
        Ok(Self {
            config,
            citations: CitationDetector::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ProseConfig {
        &self.config
    }

    /// Extract every document under `root` into a sequenced batch
    ///
    /// Unreadable documents are logged and listed in the summary; they never fail
    /// the run.
    pub async fn extract_root(&self, root: &Path, deadline: Option<Instant>) -> Result<ClaimBatch> {
        if !root.exists() {
            return Err(ProseError::MissingRoot(root.to_path_buf()));
        }

        let scanner = Arc::new(FileScanner::new(root).with_extensions(&self.config.extensions));
        let files = scanner.scan();
        let concurrency = self.config.concurrency.unwrap_or_else(default_concurrency);

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
                    log::warn!("Skipping document {relative}: {reason}");
                    summary.add_skipped(relative, reason);
                }
            }
        }

        let claims = sequence_claims(Origin::Prose, drafts);
        log::info!(
            "Prose extraction: {} documents, {} skipped, {} claims",
            summary.files_processed,
            summary.skipped_count(),
            claims.len()
        );
        Ok(ClaimBatch::new(
            Origin::Prose,
            root.display().to_string(),
            summary,
            claims,
        ))
    }

    /// Read one document and extract its claims
    pub fn extract_file(&self, path: &Path, relative: &str) -> Result<Vec<ClaimDraft>> {
        let bytes = std::fs::read(path).map_err(|e| ProseError::io(path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| ProseError::Encoding {
            path: path.to_path_buf(),
            offset: e.utf8_error().valid_up_to(),
        })?;
        Ok(self.extract_str(&content, relative))
    }

    /// Extract claims from document text, ordered by line
    #[must_use]
    pub fn extract_str(&self, content: &str, file: &str) -> Vec<ClaimDraft> {
        let lines = classify_lines(content);
        let mut consumed = vec![false; lines.len()];
        let mut drafts = Vec::new();

        let mut idx = 0;
        while idx < lines.len() {
            let line = &lines[idx];
            if line.in_code || line.math {
                idx += 1;
                continue;
            }
            let Some(header) = parse_header(line.text) else {
                idx += 1;
                continue;
            };

            let (draft, end) = self.read_statement(&lines, idx, &header, file);
            for flag in consumed.iter_mut().take(end).skip(idx) {
                *flag = true;
            }
            drafts.push(draft);
            idx = end.max(idx + 1);
        }

        if self.config.informal_pass {
            drafts.extend(self.informal_claims(&lines, &consumed, file));
        }

        drafts.sort_by(|a, b| a.location.cmp(&b.location));
        drafts
    }

    /// Read a formal statement starting at `start`; returns the draft and the
    /// index one past the last line belonging to it
    fn read_statement(
        &self,
        lines: &[Line<'_>],
        start: usize,
        header: &FormalHeader<'_>,
        file: &str,
    ) -> (ClaimDraft, usize) {
        let mut indicators = Indicators {
            numbered: header.numbered,
            ..Indicators::default()
        };
        let mut body: Vec<&str> = Vec::new();
        let mut proof_from: Option<(usize, usize)> = None;

        match find_proof_marker(header.rest) {
            Some((at, after)) => {
                body.push(&header.rest[..at]);
                // `rest` is always a suffix of the header line
                let header_offset = lines[start].text.len() - header.rest.len();
                proof_from = Some((start, header_offset + after));
            }
            None => body.push(header.rest),
        }

        let mut idx = start + 1;
        let body_limit = start + self.config.max_statement_lines;
        while proof_from.is_none() && idx < lines.len() && idx < body_limit {
            let line = &lines[idx];
            if line.blank || line.in_code || line.heading.is_some() || parse_header(line.text).is_some() {
                break;
            }
            if let Some((at, after)) = find_proof_marker(line.text) {
                body.push(&line.text[..at]);
                proof_from = Some((idx, after));
                break;
            }
            if line.math {
                indicators.math_block = true;
            }
            body.push(line.text);
            idx += 1;
        }
        let mut end = idx;

        if proof_from.is_none() {
            let mut look = skip_blank(lines, end);
            if look < lines.len() && lines[look].math {
                indicators.math_block = true;
                look = skip_math(lines, look);
                end = look;
                look = skip_blank(lines, look);
            }
            if let Some(line) = lines.get(look) {
                if !line.in_code {
                    if let Some((at, after)) = find_proof_marker(line.text) {
                        if line.text[..at].trim().is_empty() {
                            proof_from = Some((look, after));
                        }
                    }
                }
            }
        }

        if let Some((proof_line, proof_offset)) = proof_from {
            let (closed, proof_end) = scan_proof(lines, proof_line, proof_offset);
            indicators.proof = closed;
            if lines[proof_line..proof_end].iter().any(|l| l.math) {
                indicators.math_block = true;
            }
            end = proof_end;
        }

        let trailing = skip_blank(lines, end);
        if trailing < lines.len() && lines[trailing].math {
            indicators.math_block = true;
            end = skip_math(lines, trailing);
        }

        let statement = collapse_whitespace(&strip_emphasis(&body.join(" ")));
        let mut context = String::from(lines[start].text);
        for extra in body.iter().skip(1) {
            context.push('\n');
            context.push_str(extra);
        }
        let citations = self.citations.tokens(&context);
        indicators.cited = !citations.is_empty();

        let text = if statement.is_empty() {
            header.label.clone()
        } else {
            format!("{} {statement}", header.label)
        };

        let draft = ClaimDraft {
            text,
            kind: header.kind,
            location: Location::new(file, start + 1),
            scope: section_scope(&lines[start]),
            confidence: indicators.confidence(),
            citations,
        };
        (draft, end)
    }

    /// Citation-bearing declarative sentences outside formal blocks
    fn informal_claims(&self, lines: &[Line<'_>], consumed: &[bool], file: &str) -> Vec<ClaimDraft> {
        let mut drafts = Vec::new();
        let mut idx = 0;

        while idx < lines.len() {
            if !is_paragraph_line(&lines[idx], consumed[idx]) {
                idx += 1;
                continue;
            }
            let para_start = idx;
            while idx < lines.len() && is_paragraph_line(&lines[idx], consumed[idx]) {
                idx += 1;
            }
            let paragraph = lines[para_start..idx]
                .iter()
                .map(|line| line.text)
                .collect::<Vec<_>>()
                .join("\n");

            for sentence in sentences(&paragraph) {
                let text = collapse_whitespace(&strip_emphasis(strip_bullet(sentence.text)));
                if text.ends_with('?')
                    || text.split_whitespace().count() < self.config.min_informal_words
                    || !CLAIM_VERB.is_match(&text)
                {
                    continue;
                }
                let citations = self.citations.tokens(&text);
                if citations.is_empty() {
                    continue;
                }
                let line_idx = para_start + sentence.line_offset(&paragraph);
                let indicators = Indicators {
                    cited: true,
                    ..Indicators::default()
                };
                drafts.push(ClaimDraft {
                    text,
                    kind: ClaimKind::Informal,
                    location: Location::new(file, line_idx + 1),
                    scope: section_scope(&lines[line_idx]),
                    confidence: indicators.confidence(),
                    citations,
                });
            }
        }

        drafts
    }
}

/// Follow a proof from its marker to an end symbol; returns whether it closed
/// and the index one past the last proof line
///
/// A proof spans its own paragraph, any display math after it, and a following
/// paragraph only when that paragraph carries the end symbol. Any other
/// paragraph ends the proof unclosed.
fn scan_proof(lines: &[Line<'_>], start: usize, offset: usize) -> (bool, usize) {
    let first = &lines[start].text[offset.min(lines[start].text.len())..];
    if has_proof_end(first) {
        return (true, start + 1);
    }
    let mut idx = start + 1;
    loop {
        while idx < lines.len() && !lines[idx].blank {
            let line = &lines[idx];
            if breaks_proof(line) {
                return (false, idx);
            }
            if !line.math && has_proof_end(line.text) {
                return (true, idx + 1);
            }
            idx += 1;
        }
        let next = skip_blank(lines, idx);
        let continues = lines.get(next).is_some_and(|line| {
            !breaks_proof(line) && (line.math || paragraph_closes_proof(lines, next))
        });
        if !continues {
            return (false, idx);
        }
        idx = next;
    }
}

fn breaks_proof(line: &Line<'_>) -> bool {
    line.in_code || line.heading.is_some() || parse_header(line.text).is_some()
}

fn paragraph_closes_proof(lines: &[Line<'_>], start: usize) -> bool {
    lines[start..]
        .iter()
        .take_while(|line| !line.blank && !breaks_proof(line))
        .any(|line| !line.math && has_proof_end(line.text))
}

fn skip_blank(lines: &[Line<'_>], mut idx: usize) -> usize {
    while idx < lines.len() && lines[idx].blank && !lines[idx].in_code {
        idx += 1;
    }
    idx
}

fn skip_math(lines: &[Line<'_>], mut idx: usize) -> usize {
    while idx < lines.len() && lines[idx].math {
        idx += 1;
    }
    idx
}

fn is_paragraph_line(line: &Line<'_>, consumed: bool) -> bool {
    !consumed && !line.blank && !line.in_code && !line.math && line.heading.is_none()
}

fn strip_bullet(text: &str) -> &str {
    let trimmed = text.trim_start_matches(|c: char| c == '>' || c.is_whitespace());
    for bullet in ["- ", "* ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(bullet) {
            return rest;
        }
    }
    trimmed
}

fn section_scope(line: &Line<'_>) -> String {
    line.section
        .clone()
        .unwrap_or_else(|| DOCUMENT_SCOPE.to_string())
}
