use crate::error::{ClaimsError, Result};
use std::fmt;

/// Separator between scope labels
pub const SCOPE_SEPARATOR: char = ':';

/// One level of lexical nesting
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeFrame {
    Module,
    Class(String),
    /// Functions, methods and nested functions alike
    Function(String),
}

impl ScopeFrame {
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class(_) => "class",
            Self::Function(_) => "function",
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Module => None,
            Self::Class(name) | Self::Function(name) => Some(name),
        }
    }
}

impl fmt::Display for ScopeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}{SCOPE_SEPARATOR}{name}", self.kind_label()),
            None => f.write_str(self.kind_label()),
        }
    }
}

/// Stack of frames from the module root down to the current definition
///
/// Renders as `module:class:Foo:function:bar`. The module frame carries no name;
/// every other frame is a `kind:name` pair, so [`ScopePath::parse`] can recover the
/// exact frame sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopePath {
    frames: Vec<ScopeFrame>,
}

impl ScopePath {
    /// Path containing only the module frame
    #[must_use]
    pub fn module() -> Self {
        Self {
            frames: vec![ScopeFrame::Module],
        }
    }

    pub fn push(&mut self, frame: ScopeFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<ScopeFrame> {
        self.frames.pop()
    }

    /// Number of frames, i.e. nesting depth including the module
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn frames(&self) -> &[ScopeFrame] {
        &self.frames
    }

    #[must_use]
    pub fn last(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    /// Decode a rendered path back into frames
    pub fn parse(raw: &str) -> Result<Self> {
        let mut tokens = raw.split(SCOPE_SEPARATOR);
        match tokens.next() {
            Some("module") => {}
            Some(other) => {
                return Err(ClaimsError::invalid_scope(
                    raw,
                    format!("expected leading 'module' frame, found '{other}'"),
                ))
            }
            None => return Err(ClaimsError::invalid_scope(raw, "empty path")),
        }

        let mut path = Self::module();
        while let Some(kind) = tokens.next() {
            let Some(name) = tokens.next().filter(|name| !name.is_empty()) else {
                return Err(ClaimsError::invalid_scope(
                    raw,
                    format!("frame '{kind}' has no name"),
                ));
            };
            let frame = match kind {
                "class" => ScopeFrame::class(name),
                "function" => ScopeFrame::function(name),
                other => {
                    return Err(ClaimsError::invalid_scope(
                        raw,
                        format!("unknown frame kind '{other}'"),
                    ))
                }
            };
            path.push(frame);
        }
        Ok(path)
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, frame) in self.frames.iter().enumerate() {
            if idx > 0 {
                write!(f, "{SCOPE_SEPARATOR}")?;
            }
            write!(f, "{frame}")?;
        }
        Ok(())
    }
}
