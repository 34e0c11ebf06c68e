use crate::parser::error::{ErrorCollector, ParserError};
use crate::parser::syntax::{SyntaxToken, SyntaxTokenKind};

use SyntaxTokenKind::*;

/// Validates every adjacent token pair against a fixed follower table.
/// The stream always starts with `Start` and ends with `End`, so the
/// table also covers "cannot start with" and "cannot end with" cases.
pub struct PositionValidator;

impl PositionValidator {
    pub fn validate(tokens: &[SyntaxToken], errors: &mut ErrorCollector) {
        for pair in tokens.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if !Self::allowed_followers(current.kind).contains(&next.kind) {
                errors.add(ParserError::IncorrectTokenPosition {
                    current: current.clone(),
                    next: next.clone(),
                });
            }
        }
    }

    fn allowed_followers(kind: SyntaxTokenKind) -> &'static [SyntaxTokenKind] {
        match kind {
            Start => &[
                OpenFunctionBracket,
                OpenPrecedenceBracket,
                Variable,
                Function,
                Number,
            ],
            Number | Variable => &[
                Operator,
                Comma,
                ClosedFunctionBracket,
                ClosedPrecedenceBracket,
                End,
            ],
            Function => &[
                Operator,
                Comma,
                OpenPrecedenceBracket,
                OpenFunctionBracket,
                End,
            ],
            Operator => &[
                OpenPrecedenceBracket,
                OpenFunctionBracket,
                Variable,
                Number,
                Function,
            ],
            OpenFunctionBracket => &[
                OpenFunctionBracket,
                OpenPrecedenceBracket,
                ClosedFunctionBracket,
                Function,
                Number,
                Variable,
            ],
            OpenPrecedenceBracket => &[
                OpenFunctionBracket,
                OpenPrecedenceBracket,
                Variable,
                Function,
                Number,
            ],
            ClosedFunctionBracket | ClosedPrecedenceBracket => &[
                Operator,
                ClosedPrecedenceBracket,
                ClosedFunctionBracket,
                Comma,
                End,
            ],
            Comma => &[
                OpenFunctionBracket,
                OpenPrecedenceBracket,
                Number,
                Variable,
                Function,
            ],
            End => &[],
        }
    }
}
