use thiserror::Error;

use crate::parser::syntax::SyntaxToken;

/// Everything the syntax stage can object to. Each variant keeps the
/// 1-based character position it was detected at so a caller can point
/// back into the source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParserError {
    #[error("Unknown token '{value}' at position '{position}'")]
    UnknownToken { value: String, position: usize },

    #[error("No open bracket for ')' at position '{position}'")]
    NoOpenBracket { position: usize },

    #[error("No closed bracket for '(' at position '{position}'")]
    NoClosedBracket { position: usize },

    #[error("{}", incorrect_position_message(current, next))]
    IncorrectTokenPosition {
        current: SyntaxToken,
        next: SyntaxToken,
    },

    #[error("Comma is not inside function at position '{position}'")]
    CommaOutsideFunction { position: usize },

    #[error("Incorrect identifier name '{value}' at position '{position}'")]
    IncorrectIdentifier { value: String, position: usize },
}

impl ParserError {
    pub fn position(&self) -> usize {
        match self {
            ParserError::UnknownToken { position, .. }
            | ParserError::NoOpenBracket { position }
            | ParserError::NoClosedBracket { position }
            | ParserError::CommaOutsideFunction { position }
            | ParserError::IncorrectIdentifier { position, .. } => *position,
            ParserError::IncorrectTokenPosition { next, .. } => next.position,
        }
    }
}

fn incorrect_position_message(current: &SyntaxToken, next: &SyntaxToken) -> String {
    if current.kind.is_start() {
        format!("Math expression cannot start with {}", next.describe())
    } else if next.kind.is_end() {
        format!("Math expression cannot end with {}", current.describe())
    } else {
        format!(
            "{} cannot go before {} at position '{}'",
            current.describe(),
            next.describe(),
            next.position
        )
    }
}

/// Accumulates syntax errors across all validation steps instead of
/// stopping at the first one.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<ParserError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ParserError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = ParserError>) {
        self.errors.extend(errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All collected errors ordered by source position. The sort is stable,
    /// so errors at the same position stay in detection order.
    pub fn report(mut self) -> Vec<ParserError> {
        self.errors.sort_by_key(|e| e.position());
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::syntax::{SyntaxToken, SyntaxTokenKind};

    #[test]
    fn test_report_orders_by_position() {
        let mut collector = ErrorCollector::new();
        collector.add(ParserError::NoOpenBracket { position: 9 });
        collector.add(ParserError::UnknownToken {
            value: "$".into(),
            position: 2,
        });
        collector.add(ParserError::CommaOutsideFunction { position: 5 });

        let positions: Vec<usize> = collector.report().iter().map(|e| e.position()).collect();
        assert_eq!(positions, vec![2, 5, 9]);
    }

    #[test]
    fn test_cannot_start_message() {
        let error = ParserError::IncorrectTokenPosition {
            current: SyntaxToken::new("START", 0, SyntaxTokenKind::Start),
            next: SyntaxToken::new("+", 1, SyntaxTokenKind::Operator),
        };
        assert_eq!(
            error.to_string(),
            "Math expression cannot start with Operator '+'"
        );
    }

    #[test]
    fn test_cannot_end_message() {
        let error = ParserError::IncorrectTokenPosition {
            current: SyntaxToken::new("*", 5, SyntaxTokenKind::Operator),
            next: SyntaxToken::new("END", 6, SyntaxTokenKind::End),
        };
        assert_eq!(
            error.to_string(),
            "Math expression cannot end with Operator '*'"
        );
    }

    #[test]
    fn test_adjacency_message() {
        let error = ParserError::IncorrectTokenPosition {
            current: SyntaxToken::new("1", 2, SyntaxTokenKind::Number),
            next: SyntaxToken::new("2", 4, SyntaxTokenKind::Number),
        };
        assert_eq!(
            error.to_string(),
            "Number '1' cannot go before Number '2' at position '4'"
        );
    }
}
