use crate::parser::error::{ErrorCollector, ParserError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    /// Argument-list bracket directly after a function name.
    Function,
    /// Plain grouping bracket.
    Precedence,
}

#[derive(Debug, Clone, Copy)]
struct OpenBracket {
    kind: BracketKind,
    position: usize,
}

/// Tracks bracket pairing while the token stream is walked left to right.
/// A closing bracket takes the kind of the open bracket it pairs with,
/// and commas are only legal while at least one function bracket is open.
#[derive(Debug, Default)]
pub struct BracketsContext {
    stack: Vec<OpenBracket>,
}

impl BracketsContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, kind: BracketKind, position: usize) {
        self.stack.push(OpenBracket { kind, position });
    }

    /// Pairs a closing bracket with the innermost open one. An unmatched
    /// close is reported and treated as a precedence bracket so the rest
    /// of the stream can still be validated.
    pub fn close(&mut self, position: usize, errors: &mut ErrorCollector) -> BracketKind {
        match self.stack.pop() {
            Some(open) => open.kind,
            None => {
                errors.add(ParserError::NoOpenBracket { position });
                BracketKind::Precedence
            }
        }
    }

    pub fn inside_function(&self) -> bool {
        self.stack
            .iter()
            .any(|open| open.kind == BracketKind::Function)
    }

    /// Reports every bracket still open at the end of the stream.
    pub fn finish(self, errors: &mut ErrorCollector) {
        for open in self.stack {
            errors.add(ParserError::NoClosedBracket {
                position: open.position,
            });
        }
    }
}
