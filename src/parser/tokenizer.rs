use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::parser::error::{ErrorCollector, ParserError};
use crate::tree::MathContext;

lazy_static! {
    // Alternation order matters: numbers before the identifier class, which
    // greedily eats anything that is not whitespace/digit/operator/bracket/comma.
    static ref TOKEN_PATTERN: Regex = Regex::new(
        r"(?P<number>\d+(\.\d+)?)|(?P<ident>[^+\-*/^(),\d\s]+)|(?P<comma>,)|(?P<close>\))|(?P<open>\()|(?P<operator>[+\-*/^])"
    )
    .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Start,
    End,
    Number,
    Variable,
    Function,
    Operator,
    OpenBracket,
    ClosedBracket,
    Comma,
}

/// A lexed token. Positions are 1-based character offsets; the synthetic
/// `Start`/`End` sentinels sit at 0 and input length + 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub value: String,
    pub position: usize,
    pub kind: TokenKind,
}

impl RawToken {
    pub fn new(value: impl Into<String>, position: usize, kind: TokenKind) -> Self {
        Self {
            value: value.into(),
            position,
            kind,
        }
    }

    pub fn start() -> Self {
        Self::new("START", 0, TokenKind::Start)
    }

    pub fn end(position: usize) -> Self {
        Self::new("END", position, TokenKind::End)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Regex-driven lexer. Identifiers resolve to `Variable` or `Function` by
/// consulting the context's function-name set; text the pattern cannot place
/// is reported as `UnknownToken` and omitted from the output stream. With
/// the current pattern the identifier class absorbs every non-whitespace
/// character no other branch claims, so nothing actually falls through.
pub struct Tokenizer<'a> {
    context: &'a MathContext,
}

impl<'a> Tokenizer<'a> {
    pub fn new(context: &'a MathContext) -> Self {
        Self { context }
    }

    pub fn tokenize(&self, input: &str, errors: &mut ErrorCollector) -> Vec<RawToken> {
        let mut tokens = vec![RawToken::start()];

        for captures in TOKEN_PATTERN.captures_iter(input) {
            let Some(matched) = captures.get(0) else {
                continue;
            };
            let position = matched.start() + 1;
            let value = matched.as_str();

            let kind = if captures.name("number").is_some() {
                TokenKind::Number
            } else if captures.name("ident").is_some() {
                if self.context.is_function(value) {
                    TokenKind::Function
                } else {
                    TokenKind::Variable
                }
            } else if captures.name("comma").is_some() {
                TokenKind::Comma
            } else if captures.name("open").is_some() {
                TokenKind::OpenBracket
            } else if captures.name("close").is_some() {
                TokenKind::ClosedBracket
            } else if captures.name("operator").is_some() {
                TokenKind::Operator
            } else {
                // The identifier class is the complement of every other
                // branch, so any match carries one of the named groups;
                // this arm only fires if the pattern loses that totality.
                errors.add(ParserError::UnknownToken {
                    value: value.to_string(),
                    position,
                });
                continue;
            };

            tokens.push(RawToken::new(value, position, kind));
        }

        tokens.push(RawToken::end(input.len() + 1));
        debug!("tokenized {:?} into {} tokens", input, tokens.len());
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<RawToken> {
        let context = MathContext::with_functions(["min"]);
        let mut errors = ErrorCollector::new();
        let tokens = Tokenizer::new(&context).tokenize(input, &mut errors);
        assert!(!errors.has_errors());
        tokens
    }

    #[test]
    fn test_simple_expression_positions() {
        let tokens = tokenize("(1 + b) * min(2, 4)");

        assert_eq!(
            tokens,
            vec![
                RawToken::start(),
                RawToken::new("(", 1, TokenKind::OpenBracket),
                RawToken::new("1", 2, TokenKind::Number),
                RawToken::new("+", 4, TokenKind::Operator),
                RawToken::new("b", 6, TokenKind::Variable),
                RawToken::new(")", 7, TokenKind::ClosedBracket),
                RawToken::new("*", 9, TokenKind::Operator),
                RawToken::new("min", 11, TokenKind::Function),
                RawToken::new("(", 14, TokenKind::OpenBracket),
                RawToken::new("2", 15, TokenKind::Number),
                RawToken::new(",", 16, TokenKind::Comma),
                RawToken::new("4", 18, TokenKind::Number),
                RawToken::new(")", 19, TokenKind::ClosedBracket),
                RawToken::end(20),
            ]
        );
    }

    #[test]
    fn test_identifier_class_splits_on_digits() {
        let tokens = tokenize("a_123s+%4asd2");

        assert_eq!(
            tokens,
            vec![
                RawToken::start(),
                RawToken::new("a_", 1, TokenKind::Variable),
                RawToken::new("123", 3, TokenKind::Number),
                RawToken::new("s", 6, TokenKind::Variable),
                RawToken::new("+", 7, TokenKind::Operator),
                RawToken::new("%", 8, TokenKind::Variable),
                RawToken::new("4", 9, TokenKind::Number),
                RawToken::new("asd", 10, TokenKind::Variable),
                RawToken::new("2", 13, TokenKind::Number),
                RawToken::end(14),
            ]
        );
    }

    #[test]
    fn test_every_non_whitespace_character_lands_in_a_token() {
        // The identifier class absorbs anything the other branches don't,
        // so even garbage input lexes without errors.
        let tokens = tokenize("@#$ & 7 ? !!");
        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["START", "@#$", "&", "7", "?", "!!", "END"]);
    }

    #[test]
    fn test_whitespace_is_skipped() {
        let tokens = tokenize("  1   +  2 ");
        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["START", "1", "+", "2", "END"]);
    }

    #[test]
    fn test_decimal_numbers() {
        let tokens = tokenize("1.25*3");
        assert_eq!(tokens[1], RawToken::new("1.25", 1, TokenKind::Number));
        assert_eq!(tokens[2], RawToken::new("*", 5, TokenKind::Operator));
    }

    #[test]
    fn test_empty_input_keeps_sentinels() {
        let tokens = tokenize("");
        assert_eq!(tokens, vec![RawToken::start(), RawToken::end(1)]);
    }
}
