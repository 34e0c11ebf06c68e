use log::debug;

use crate::parser::brackets::{BracketKind, BracketsContext};
use crate::parser::error::{ErrorCollector, ParserError};
use crate::parser::position::PositionValidator;
use crate::parser::tokenizer::{RawToken, TokenKind};
use crate::parser::unary::UnaryMinusResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxTokenKind {
    Start,
    End,
    Number,
    Variable,
    Function,
    Operator,
    OpenFunctionBracket,
    OpenPrecedenceBracket,
    ClosedFunctionBracket,
    ClosedPrecedenceBracket,
    Comma,
}

impl SyntaxTokenKind {
    pub fn is_start(self) -> bool {
        self == SyntaxTokenKind::Start
    }

    pub fn is_end(self) -> bool {
        self == SyntaxTokenKind::End
    }

    pub fn is_open_bracket(self) -> bool {
        matches!(
            self,
            SyntaxTokenKind::OpenFunctionBracket | SyntaxTokenKind::OpenPrecedenceBracket
        )
    }

    pub fn is_closed_bracket(self) -> bool {
        matches!(
            self,
            SyntaxTokenKind::ClosedFunctionBracket | SyntaxTokenKind::ClosedPrecedenceBracket
        )
    }
}

/// A classified token: brackets are split into function and precedence
/// variants according to the pairing established by [`BracketsContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
    pub value: String,
    pub position: usize,
    pub kind: SyntaxTokenKind,
}

impl SyntaxToken {
    pub fn new(value: impl Into<String>, position: usize, kind: SyntaxTokenKind) -> Self {
        Self {
            value: value.into(),
            position,
            kind,
        }
    }

    /// Human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            SyntaxTokenKind::Start | SyntaxTokenKind::End => self.value.clone(),
            SyntaxTokenKind::Number => format!("Number '{}'", self.value),
            SyntaxTokenKind::Variable => format!("Variable '{}'", self.value),
            SyntaxTokenKind::Function => format!("Function '{}'", self.value),
            SyntaxTokenKind::Operator => format!("Operator '{}'", self.value),
            SyntaxTokenKind::OpenFunctionBracket
            | SyntaxTokenKind::OpenPrecedenceBracket
            | SyntaxTokenKind::ClosedFunctionBracket
            | SyntaxTokenKind::ClosedPrecedenceBracket
            | SyntaxTokenKind::Comma => format!("'{}'", self.value),
        }
    }
}

/// Turns the raw token stream into classified syntax tokens while
/// collecting every syntax error it can find: unmatched brackets,
/// misplaced commas, malformed identifiers and illegal token adjacency.
pub struct SyntaxParser;

impl SyntaxParser {
    pub fn parse(tokens: Vec<RawToken>, errors: &mut ErrorCollector) -> Vec<SyntaxToken> {
        let resolved = UnaryMinusResolver::resolve(tokens);
        let mut brackets = BracketsContext::new();
        let mut syntax_tokens = Vec::with_capacity(resolved.len());

        for (index, token) in resolved.iter().enumerate() {
            let kind = match token.kind {
                TokenKind::Start => SyntaxTokenKind::Start,
                TokenKind::End => SyntaxTokenKind::End,
                TokenKind::Number => SyntaxTokenKind::Number,
                TokenKind::Operator => SyntaxTokenKind::Operator,
                TokenKind::Variable => {
                    Self::check_identifier(token, errors);
                    SyntaxTokenKind::Variable
                }
                TokenKind::Function => {
                    Self::check_identifier(token, errors);
                    SyntaxTokenKind::Function
                }
                TokenKind::OpenBracket => {
                    let after_function = index
                        .checked_sub(1)
                        .map(|i| resolved[i].is(TokenKind::Function))
                        .unwrap_or(false);
                    if after_function {
                        brackets.open(BracketKind::Function, token.position);
                        SyntaxTokenKind::OpenFunctionBracket
                    } else {
                        brackets.open(BracketKind::Precedence, token.position);
                        SyntaxTokenKind::OpenPrecedenceBracket
                    }
                }
                TokenKind::ClosedBracket => match brackets.close(token.position, errors) {
                    BracketKind::Function => SyntaxTokenKind::ClosedFunctionBracket,
                    BracketKind::Precedence => SyntaxTokenKind::ClosedPrecedenceBracket,
                },
                TokenKind::Comma => {
                    if !brackets.inside_function() {
                        errors.add(ParserError::CommaOutsideFunction {
                            position: token.position,
                        });
                    }
                    SyntaxTokenKind::Comma
                }
            };

            syntax_tokens.push(SyntaxToken::new(token.value.clone(), token.position, kind));
        }

        PositionValidator::validate(&syntax_tokens, errors);
        brackets.finish(errors);

        debug!(
            "parsed {} syntax tokens, errors so far: {}",
            syntax_tokens.len(),
            errors.has_errors()
        );
        syntax_tokens
    }

    fn check_identifier(token: &RawToken, errors: &mut ErrorCollector) {
        let name = token.value.strip_prefix('-').unwrap_or(&token.value);
        if name.is_empty() || !name.chars().all(char::is_alphabetic) {
            errors.add(ParserError::IncorrectIdentifier {
                value: token.value.clone(),
                position: token.position,
            });
        }
    }
}
