use log::trace;

use crate::parser::tokenizer::{RawToken, TokenKind};

/// Rewrites unary minus before syntax validation so the rest of the
/// pipeline only ever sees binary operators.
///
/// A `-` is unary when the token before it cannot terminate an operand,
/// i.e. anything except a number, a variable or a closing bracket. A unary
/// minus folds into a following number or variable as a sign prefix, and
/// expands to `-1 *` before a following function or open bracket.
pub struct UnaryMinusResolver;

impl UnaryMinusResolver {
    pub fn resolve(tokens: Vec<RawToken>) -> Vec<RawToken> {
        let mut resolved = Vec::with_capacity(tokens.len());
        let mut index = 0;

        while index < tokens.len() {
            let token = &tokens[index];

            if Self::is_unary_minus(&tokens, index) {
                match tokens.get(index + 1) {
                    Some(next) if matches!(next.kind, TokenKind::Number | TokenKind::Variable) => {
                        trace!("folding unary minus at {} into {:?}", token.position, next);
                        resolved.push(RawToken::new(
                            format!("-{}", next.value),
                            token.position,
                            next.kind,
                        ));
                        index += 2;
                        continue;
                    }
                    Some(next)
                        if matches!(next.kind, TokenKind::Function | TokenKind::OpenBracket) =>
                    {
                        trace!("expanding unary minus at {} to -1 *", token.position);
                        resolved.push(RawToken::new("-1", token.position, TokenKind::Number));
                        resolved.push(RawToken::new("*", token.position, TokenKind::Operator));
                        index += 1;
                        continue;
                    }
                    _ => {}
                }
            }

            resolved.push(token.clone());
            index += 1;
        }

        resolved
    }

    fn is_unary_minus(tokens: &[RawToken], index: usize) -> bool {
        let token = &tokens[index];
        if !(token.is(TokenKind::Operator) && token.value == "-") {
            return false;
        }
        match index.checked_sub(1).and_then(|i| tokens.get(i)) {
            Some(previous) => !matches!(
                previous.kind,
                TokenKind::Number | TokenKind::Variable | TokenKind::ClosedBracket
            ),
            None => true,
        }
    }
}
