//! Line-level markdown model used by the extractor.
//!
//! Only what claim detection needs is recognised: fenced code, ATX headings,
//! display-math regions and formal statement headers.

use claimscan_claims::ClaimKind;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(theorem|lemma|proposition|corollary)\b(?:\s+((?:[a-z]\.)?\d+(?:\.\d+)*))?")
        .expect("valid header regex")
});

static PROOF_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)(?:[*_]+Proof[*_]*(?:\s*[.:])?|Proof\s*[.:])").expect("valid proof regex")
});

static PROOF_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"□|∎|■|\\qed\b|\\blacksquare|Q\.E\.D\.?|\bQED\b").expect("valid proof-end regex")
});

static MATH_ENV_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\begin\{(equation|align|gather|multline)\*?\}").expect("valid env regex")
});

static MATH_ENV_CLOSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\end\{(equation|align|gather|multline)\*?\}").expect("valid env regex")
});

/// A document line with the structural facts the extractor needs
#[derive(Debug, Clone)]
pub(crate) struct Line<'a> {
    pub text: &'a str,
    /// Inside (or delimiting) a non-math code fence
    pub in_code: bool,
    /// Part of a display-math block
    pub math: bool,
    pub blank: bool,
    /// ATX heading that is not itself a formal statement header
    pub heading: Option<String>,
    /// Nearest preceding section heading
    pub section: Option<String>,
}

/// A recognised formal statement header
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FormalHeader<'a> {
    pub kind: ClaimKind,
    /// `Theorem 3.1`
    pub label: String,
    pub numbered: bool,
    /// Text following the label on the header line
    pub rest: &'a str,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MathState {
    Outside,
    Dollars,
    Brackets,
    Environment,
    Fence,
}

/// Classify every line of `content`
pub(crate) fn classify_lines(content: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut code_fence: Option<String> = None;
    let mut math = MathState::Outside;
    let mut section: Option<String> = None;

    for text in content.lines() {
        let trimmed = text.trim();

        if let Some(fence) = &code_fence {
            let closes = trimmed.starts_with(fence.as_str());
            lines.push(Line {
                text,
                in_code: true,
                math: false,
                blank: trimmed.is_empty(),
                heading: None,
                section: section.clone(),
            });
            if closes {
                code_fence = None;
            }
            continue;
        }

        if let Some(fence) = fence_marker(trimmed) {
            if math == MathState::Fence {
                math = MathState::Outside;
                lines.push(math_line(text, &section));
                continue;
            }
            if math == MathState::Outside {
                let info = trimmed[fence.len()..].trim().to_ascii_lowercase();
                if info == "math" || info == "latex" {
                    math = MathState::Fence;
                    lines.push(math_line(text, &section));
                } else {
                    code_fence = Some(fence.to_string());
                    lines.push(Line {
                        text,
                        in_code: true,
                        math: false,
                        blank: false,
                        heading: None,
                        section: section.clone(),
                    });
                }
                continue;
            }
        }

        let (is_math, next_state) = advance_math(trimmed, math);
        math = next_state;
        if is_math {
            lines.push(math_line(text, &section));
            continue;
        }

        let heading = heading_title(trimmed).filter(|_| parse_header(trimmed).is_none());
        if let Some(title) = &heading {
            section = Some(title.clone());
        }
        lines.push(Line {
            text,
            in_code: false,
            math: false,
            blank: trimmed.is_empty(),
            heading,
            section: section.clone(),
        });
    }

    lines
}

fn math_line<'a>(text: &'a str, section: &Option<String>) -> Line<'a> {
    Line {
        text,
        in_code: false,
        math: true,
        blank: false,
        heading: None,
        section: section.clone(),
    }
}

fn fence_marker(trimmed: &str) -> Option<&str> {
    ["```", "~~~"]
        .into_iter()
        .find(|marker| trimmed.starts_with(marker))
}

/// Returns whether the line belongs to display math, and the state after it
fn advance_math(trimmed: &str, state: MathState) -> (bool, MathState) {
    match state {
        MathState::Dollars => {
            let closes = trimmed.matches("$$").count() % 2 == 1;
            (true, if closes { MathState::Outside } else { state })
        }
        MathState::Brackets => {
            let closes = trimmed.contains("\\]");
            (true, if closes { MathState::Outside } else { state })
        }
        MathState::Environment => {
            let closes = MATH_ENV_CLOSE.is_match(trimmed);
            (true, if closes { MathState::Outside } else { state })
        }
        MathState::Fence => (true, state),
        MathState::Outside => {
            let dollars = trimmed.matches("$$").count();
            if dollars > 0 {
                let next = if dollars % 2 == 1 {
                    MathState::Dollars
                } else {
                    MathState::Outside
                };
                return (true, next);
            }
            if trimmed.starts_with("\\[") {
                let next = if trimmed.contains("\\]") {
                    MathState::Outside
                } else {
                    MathState::Brackets
                };
                return (true, next);
            }
            if MATH_ENV_OPEN.is_match(trimmed) {
                let next = if MATH_ENV_CLOSE.is_match(trimmed) {
                    MathState::Outside
                } else {
                    MathState::Environment
                };
                return (true, next);
            }
            (false, MathState::Outside)
        }
    }
}

fn heading_title(trimmed: &str) -> Option<String> {
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim().trim_end_matches('#').trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Recognise a formal statement header at the start of a line
///
/// Heading markers, block quotes, list bullets and emphasis are stripped first.
/// An emphasised keyword always counts. On a heading the keyword needs a number
/// or a label delimiter, so "## Theorem provers in practice" stays a section.
/// Undecorated text needs the capitalised keyword and a delimiter after the
/// label, so a wrapped line such as "Lemma 3 of [5] shows" is plain prose.
pub(crate) fn parse_header(line: &str) -> Option<FormalHeader<'_>> {
    let mut rest = line.trim_start();
    let mut heading = false;
    let mut emphasised = false;

    loop {
        let before = rest.len();
        if let Some(stripped) = rest.strip_prefix('>') {
            rest = stripped.trim_start();
        }
        let hashes = rest.chars().take_while(|c| *c == '#').count();
        if hashes > 0 {
            rest = rest[hashes..].trim_start();
            heading = true;
        }
        for bullet in ["- ", "+ "] {
            if let Some(stripped) = rest.strip_prefix(bullet) {
                rest = stripped.trim_start();
            }
        }
        if let Some(stripped) = rest.strip_prefix("* ") {
            rest = stripped.trim_start();
        }
        let emphasis = rest.chars().take_while(|c| *c == '*' || *c == '_').count();
        if emphasis > 0 {
            rest = &rest[emphasis..];
            emphasised = true;
        }
        if rest.len() == before {
            break;
        }
    }

    let caps = HEADER.captures(rest)?;
    let whole = caps.get(0)?;
    let keyword = caps.get(1)?.as_str();
    let kind = ClaimKind::from_keyword(keyword)?;
    let number = caps.get(2).map(|m| m.as_str());

    let mut tail = &rest[whole.end()..];
    let delimited = tail
        .trim_start()
        .chars()
        .next()
        .map_or(true, |c| matches!(c, '.' | ':' | '(' | '*' | '_' | '—' | '-'));
    let accepted = if emphasised {
        true
    } else if heading {
        number.is_some() || delimited
    } else {
        keyword.starts_with(|c: char| c.is_ascii_uppercase()) && delimited
    };
    if !accepted {
        return None;
    }

    tail = strip_label_punctuation(tail);
    if tail.starts_with('(') {
        if let Some(close) = tail.find(')') {
            tail = strip_label_punctuation(&tail[close + 1..]);
        }
    }

    let mut label = capitalise(keyword);
    if let Some(number) = number {
        label.push(' ');
        label.push_str(number);
    }

    Some(FormalHeader {
        kind,
        label,
        numbered: number.is_some(),
        rest: tail,
    })
}

fn strip_label_punctuation(text: &str) -> &str {
    text.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, '*' | '_' | '.' | ':' | '—' | '-')
    })
}

fn capitalise(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Byte offset of a proof marker in `text`, and the offset right after it
pub(crate) fn find_proof_marker(text: &str) -> Option<(usize, usize)> {
    PROOF_MARKER.find(text).map(|m| (m.start(), m.end()))
}

pub(crate) fn has_proof_end(text: &str) -> bool {
    PROOF_END.is_match(text)
}

/// Drop bold/italic markers from extracted statement text
pub(crate) fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_variants() {
        let header = parse_header("**Theorem 3.1** [12] Every contraction has a fixed point.").unwrap();
        assert_eq!(header.kind, ClaimKind::Theorem);
        assert_eq!(header.label, "Theorem 3.1");
        assert!(header.numbered);
        assert_eq!(header.rest, "[12] Every contraction has a fixed point.");

        let header = parse_header("### Lemma (Zorn). Every chain has an upper bound.").unwrap();
        assert_eq!(header.kind, ClaimKind::Lemma);
        assert!(!header.numbered);
        assert_eq!(header.rest, "Every chain has an upper bound.");

        let header = parse_header("> *Corollary A.2:* The bound is tight.").unwrap();
        assert_eq!(header.label, "Corollary A.2");
        assert_eq!(header.rest, "The bound is tight.");

        assert!(parse_header("Proposition. Limits are unique.").is_some());
    }

    #[test]
    fn test_plain_words_are_not_headers() {
        assert!(parse_header("Theorem provers are useful tools.").is_none());
        assert!(parse_header("The lemma below is standard.").is_none());
        assert!(parse_header("Lemmatization of words").is_none());
        assert!(parse_header("## Theorem provers in practice").is_none());
        assert!(parse_header("theorem 2 implies the bound is tight.").is_none());
        assert!(parse_header("Lemma 3 of [5] shows the rate is optimal.").is_none());
    }

    #[test]
    fn test_heading_keyword_needs_label() {
        assert_eq!(parse_header("## Theorem 4").unwrap().label, "Theorem 4");
        assert!(parse_header("### Corollary: bounded orbits").is_some());

        let lines = classify_lines("## Theorem provers in practice\n\nSome text here.\n");
        assert_eq!(lines[0].heading.as_deref(), Some("Theorem provers in practice"));
        assert_eq!(lines[2].section.as_deref(), Some("Theorem provers in practice"));
    }

    #[test]
    fn test_classify_fences_and_math() {
        let doc = "# Intro\ntext\n```python\n# not a heading\n```\n$$\nx^2\n$$\n```math\ny\n```\n## Next";
        let lines = classify_lines(doc);
        assert_eq!(lines[0].heading.as_deref(), Some("Intro"));
        assert!(lines[3].in_code);
        assert!(lines[3].heading.is_none());
        assert!(lines[5].math && lines[6].math && lines[7].math);
        assert!(lines[8].math && lines[9].math && lines[10].math);
        assert_eq!(lines[11].heading.as_deref(), Some("Next"));
        assert_eq!(lines[1].section.as_deref(), Some("Intro"));
    }

    #[test]
    fn test_formal_heading_does_not_change_section() {
        let lines = classify_lines("## Results\n### Theorem 2\nBody");
        assert!(lines[1].heading.is_none());
        assert_eq!(lines[2].section.as_deref(), Some("Results"));
    }

    #[test]
    fn test_proof_markers() {
        assert!(find_proof_marker("**Proof**: trivial").is_some());
        assert!(find_proof_marker("*Proof.* By induction").is_some());
        assert!(find_proof_marker("Proof. Suppose not").is_some());
        assert!(find_proof_marker("The proof is omitted").is_none());
        assert!(has_proof_end("which completes the argument. □"));
        assert!(has_proof_end("done \\qed"));
        assert!(!has_proof_end("no end here"));
    }
}
