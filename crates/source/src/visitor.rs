use crate::syntax::{DocString, SyntaxNode};
use claimscan_claims::{ScopeFrame, ScopePath};

enum Work<'a> {
    Enter(&'a SyntaxNode),
    Exit,
}

/// Visit every docstring in `root` with the scope it belongs to
///
/// Uses an explicit work stack, so nesting depth is bounded by memory rather than
/// the thread stack. Modules, classes and functions push a frame on entry and pop
/// it on exit; decorators and control-flow blocks are transparent. Docstrings are
/// reported in source order with the scope as it is right after their owner's
/// frame was pushed.
pub fn walk_docstrings<'a, F>(root: &'a SyntaxNode, mut visit: F)
where
    F: FnMut(&ScopePath, &'a DocString),
{
    let mut scope = ScopePath::default();
    let mut work = vec![Work::Enter(root)];

    while let Some(item) = work.pop() {
        let node = match item {
            Work::Exit => {
                scope.pop();
                continue;
            }
            Work::Enter(node) => node,
        };

        let (frame, docstring) = match node {
            SyntaxNode::Module { docstring, .. } => (Some(ScopeFrame::Module), docstring.as_ref()),
            SyntaxNode::Class {
                name, docstring, ..
            } => (Some(ScopeFrame::class(name.as_str())), docstring.as_ref()),
            SyntaxNode::Function {
                name, docstring, ..
            } => (Some(ScopeFrame::function(name.as_str())), docstring.as_ref()),
            SyntaxNode::Decorated { .. } | SyntaxNode::Block { .. } => (None, None),
        };

        if let Some(frame) = frame {
            scope.push(frame);
            work.push(Work::Exit);
        }
        if let Some(docstring) = docstring {
            visit(&scope, docstring);
        }
        work.extend(node.children().iter().rev().map(Work::Enter));
    }
}
