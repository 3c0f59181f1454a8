use crate::error::{Result, SourceError};
use crate::syntax::{DocString, SourceParser, SyntaxNode};
use tree_sitter::{Node, Parser};

/// Nodes whose children may contain definitions
const CONTAINERS: &[&str] = &[
    "module",
    "block",
    "class_definition",
    "function_definition",
    "decorated_definition",
    "if_statement",
    "elif_clause",
    "else_clause",
    "for_statement",
    "while_statement",
    "try_statement",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "with_statement",
    "match_statement",
    "case_clause",
];

/// Compound statements lowered to [`SyntaxNode::Block`]
const COMPOUNDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "while_statement",
    "try_statement",
    "with_statement",
    "match_statement",
];

const ANONYMOUS: &str = "<anonymous>";

/// Python front end backed by tree-sitter
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterParser;

impl TreeSitterParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parser() -> Result<Parser> {
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| SourceError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(parser)
    }
}

impl SourceParser for TreeSitterParser {
    fn parse(&self, source: &str) -> Result<SyntaxNode> {
        let mut parser = Self::parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SourceError::tree_sitter("Failed to parse source code"))?;
        let root = tree.root_node();

        if root.has_error() {
            let (line, detail) = first_error(root);
            return Err(SourceError::syntax(line, detail));
        }

        Ok(lower(root, source.as_bytes()))
    }
}

/// Line and description of the first ERROR or MISSING node in document order
fn first_error(root: Node<'_>) -> (usize, String) {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_missing() {
            return (
                node.start_position().row + 1,
                format!("missing `{}`", node.kind()),
            );
        }
        if node.is_error() {
            return (node.start_position().row + 1, "unexpected input".to_string());
        }

        // Only subtrees that contain an error are worth entering
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return (root.start_position().row + 1, "unexpected input".to_string());
            }
        }
    }
}

enum Frame {
    Module,
    Class { name: String, line: usize },
    Function { name: String, line: usize, is_async: bool },
    Decorated { decorators: Vec<String> },
    Block,
}

struct Builder {
    frame: Frame,
    docstring: Option<DocString>,
    body: Vec<SyntaxNode>,
}

impl Builder {
    fn new(frame: Frame, docstring: Option<DocString>) -> Self {
        Self {
            frame,
            docstring,
            body: Vec::new(),
        }
    }

    fn finish(self) -> Option<SyntaxNode> {
        let Self {
            frame,
            docstring,
            body,
        } = self;
        match frame {
            Frame::Module => Some(SyntaxNode::Module { docstring, body }),
            Frame::Class { name, line } => Some(SyntaxNode::Class {
                name,
                line,
                docstring,
                body,
            }),
            Frame::Function {
                name,
                line,
                is_async,
            } => Some(SyntaxNode::Function {
                name,
                line,
                is_async,
                docstring,
                body,
            }),
            Frame::Decorated { decorators } => {
                body.into_iter().next().map(|definition| SyntaxNode::Decorated {
                    decorators,
                    definition: Box::new(definition),
                })
            }
            Frame::Block => (!body.is_empty()).then_some(SyntaxNode::Block { body }),
        }
    }
}

/// Lower an error-free tree with a cursor walk and a stack of open builders
fn lower(root: Node<'_>, source: &[u8]) -> SyntaxNode {
    let mut builders = vec![Builder::new(Frame::Module, docstring_of(root, source))];
    // One entry per entered container: whether it opened a builder
    let mut opened: Vec<bool> = Vec::new();
    let mut cursor = root.walk();

    if cursor.goto_first_child() {
        'walk: loop {
            let node = cursor.node();
            let pushed = open(node, source, &mut builders);

            if CONTAINERS.contains(&node.kind()) && cursor.goto_first_child() {
                opened.push(pushed);
                continue;
            }
            if pushed {
                close(&mut builders);
            }

            loop {
                if cursor.goto_next_sibling() {
                    continue 'walk;
                }
                let Some(parent_opened) = opened.pop() else {
                    break 'walk;
                };
                cursor.goto_parent();
                if parent_opened {
                    close(&mut builders);
                }
            }
        }
    }

    while builders.len() > 1 {
        close(&mut builders);
    }
    builders
        .pop()
        .and_then(Builder::finish)
        .unwrap_or(SyntaxNode::Module {
            docstring: None,
            body: Vec::new(),
        })
}

fn open(node: Node<'_>, source: &[u8], builders: &mut Vec<Builder>) -> bool {
    let kind = node.kind();
    let frame = match kind {
        "class_definition" => Frame::Class {
            name: field_text(node, "name", source),
            line: node.start_position().row + 1,
        },
        "function_definition" => {
            let mut cursor = node.walk();
            let is_async = node.children(&mut cursor).any(|c| c.kind() == "async");
            Frame::Function {
                name: field_text(node, "name", source),
                line: node.start_position().row + 1,
                is_async,
            }
        }
        "decorated_definition" => {
            let mut cursor = node.walk();
            let decorators = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "decorator")
                .filter_map(|c| c.utf8_text(source).ok())
                .map(|text| text.trim().trim_start_matches('@').trim().to_string())
                .collect();
            Frame::Decorated { decorators }
        }
        _ if COMPOUNDS.contains(&kind) => Frame::Block,
        _ => return false,
    };

    let docstring = match frame {
        Frame::Class { .. } | Frame::Function { .. } => node
            .child_by_field_name("body")
            .and_then(|body| docstring_of(body, source)),
        _ => None,
    };
    builders.push(Builder::new(frame, docstring));
    true
}

fn close(builders: &mut Vec<Builder>) {
    if builders.len() < 2 {
        return;
    }
    let Some(done) = builders.pop() else { return };
    if let (Some(node), Some(parent)) = (done.finish(), builders.last_mut()) {
        parent.body.push(node);
    }
}

fn field_text(node: Node<'_>, field: &str, source: &[u8]) -> String {
    node.child_by_field_name(field)
        .and_then(|n| n.utf8_text(source).ok())
        .map_or_else(|| ANONYMOUS.to_string(), str::to_string)
}

/// First statement of `body` when it is a single plain string literal
fn docstring_of(body: Node<'_>, source: &[u8]) -> Option<DocString> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;
    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }

    let literal = first.named_child(0)?;
    if literal.kind() != "string" {
        return None;
    }
    let mut literal_cursor = literal.walk();
    if literal
        .named_children(&mut literal_cursor)
        .any(|part| part.kind() == "interpolation")
    {
        return None;
    }

    let raw = literal.utf8_text(source).ok()?;
    Some(DocString {
        text: literal_contents(raw)?.to_string(),
        line: literal.start_position().row + 1,
    })
}

/// Strip prefix and quotes; formatted and bytes literals are not documentation
fn literal_contents(raw: &str) -> Option<&str> {
    let prefix_len = raw.find(|c| c == '"' || c == '\'')?;
    let prefix = raw[..prefix_len].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }

    let quoted = &raw[prefix_len..];
    ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|quote| {
            quoted.len() >= quote.len() * 2 && quoted.starts_with(quote) && quoted.ends_with(quote)
        })
        .map(|quote| &quoted[quote.len()..quoted.len() - quote.len()])
}
