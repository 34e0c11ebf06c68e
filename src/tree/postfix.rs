use log::debug;

use crate::parser::{SyntaxToken, SyntaxTokenKind};
use crate::tree::element::MathElement;

/// One postfix output element. `grouped` records that the element was the
/// last one produced inside an explicit precedence bracket, so the tree
/// builder can mark the corresponding node as parenthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct PostfixElement {
    pub element: MathElement,
    pub grouped: bool,
}

impl PostfixElement {
    pub fn new(element: MathElement) -> Self {
        Self {
            element,
            grouped: false,
        }
    }
}

#[derive(Debug)]
enum StackEntry {
    Bracket,
    Operator { value: String, precedence: u32 },
}

/// Shunting-yard conversion from validated infix tokens to postfix.
///
/// Operators pop the stack while the top entry has greater or equal
/// precedence, which keeps `+ - * /` left associative. Function names are
/// stacked like operators and emitted when their argument bracket closes.
/// A comma flushes at most one stacked operator, so each argument of a
/// two-argument function ends as a complete postfix run.
pub struct InfixToPostfixTransformer {
    output: Vec<PostfixElement>,
    operators: Vec<StackEntry>,
    function_depth: u32,
}

impl InfixToPostfixTransformer {
    pub fn transform(tokens: &[SyntaxToken]) -> Vec<PostfixElement> {
        let mut transformer = Self {
            output: Vec::new(),
            operators: Vec::new(),
            function_depth: 0,
        };
        for token in tokens {
            transformer.consume(token);
        }
        transformer.finish()
    }

    fn consume(&mut self, token: &SyntaxToken) {
        match token.kind {
            SyntaxTokenKind::Start | SyntaxTokenKind::End => {}
            SyntaxTokenKind::Number => {
                self.emit(MathElement::Number(token.value.clone()));
            }
            SyntaxTokenKind::Variable => {
                self.emit(MathElement::Variable(token.value.clone()));
            }
            SyntaxTokenKind::Operator | SyntaxTokenKind::Function => {
                self.push_operator(&token.value);
            }
            SyntaxTokenKind::OpenFunctionBracket => {
                self.function_depth += 1;
                self.operators.push(StackEntry::Bracket);
            }
            SyntaxTokenKind::OpenPrecedenceBracket => {
                self.operators.push(StackEntry::Bracket);
            }
            SyntaxTokenKind::ClosedFunctionBracket => {
                self.function_depth = self.function_depth.saturating_sub(1);
                self.flush_bracket();
                // The function name sits right under its argument bracket.
                self.pop_operator();
            }
            SyntaxTokenKind::ClosedPrecedenceBracket => {
                self.flush_bracket();
                if let Some(last) = self.output.last_mut() {
                    last.grouped = true;
                }
            }
            SyntaxTokenKind::Comma => {
                if !matches!(self.operators.last(), Some(StackEntry::Bracket) | None) {
                    self.pop_operator();
                }
            }
        }
    }

    fn push_operator(&mut self, value: &str) {
        let precedence = Self::base_precedence(value) + 10 * self.function_depth;
        while let Some(StackEntry::Operator {
            precedence: top, ..
        }) = self.operators.last()
        {
            if *top < precedence {
                break;
            }
            self.pop_operator();
        }
        self.operators.push(StackEntry::Operator {
            value: value.to_string(),
            precedence,
        });
    }

    fn base_precedence(value: &str) -> u32 {
        match value {
            "+" | "-" => 1,
            "*" | "/" => 2,
            "^" => 4,
            _ => 3,
        }
    }

    /// Emits stacked operators down to, and including, the nearest bracket.
    fn flush_bracket(&mut self) {
        while let Some(entry) = self.operators.pop() {
            match entry {
                StackEntry::Bracket => return,
                StackEntry::Operator { value, .. } => self.emit_operator(&value),
            }
        }
    }

    fn pop_operator(&mut self) {
        if let Some(StackEntry::Operator { value, .. }) = self.operators.pop() {
            self.emit_operator(&value);
        }
    }

    fn emit_operator(&mut self, value: &str) {
        let element = match value {
            "+" => MathElement::Plus,
            "-" => MathElement::Minus,
            "*" => MathElement::Multiply,
            "/" => MathElement::Divide,
            other => MathElement::Function(other.to_string()),
        };
        self.emit(element);
    }

    fn emit(&mut self, element: MathElement) {
        self.output.push(PostfixElement::new(element));
    }

    fn finish(mut self) -> Vec<PostfixElement> {
        while !self.operators.is_empty() {
            self.pop_operator();
        }
        debug!(
            "postfix: {:?}",
            self.output
                .iter()
                .map(|e| e.element.symbol())
                .collect::<Vec<_>>()
        );
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ErrorCollector, SyntaxParser, Tokenizer};
    use crate::tree::context::MathContext;

    fn postfix(input: &str) -> Vec<PostfixElement> {
        let context = MathContext::with_functions(["pow", "sin", "cos", "max", "min", "sqrt"]);
        let mut errors = ErrorCollector::new();
        let tokens = Tokenizer::new(&context).tokenize(input, &mut errors);
        let syntax_tokens = SyntaxParser::parse(tokens, &mut errors);
        assert!(!errors.has_errors(), "unexpected errors in {:?}", input);
        InfixToPostfixTransformer::transform(&syntax_tokens)
    }

    fn symbols(elements: &[PostfixElement]) -> Vec<&str> {
        elements.iter().map(|e| e.element.symbol()).collect()
    }

    #[test]
    fn test_precedence_ordering() {
        assert_eq!(symbols(&postfix("1+2*3")), vec!["1", "2", "3", "*", "+"]);
    }

    #[test]
    fn test_left_associative_division() {
        assert_eq!(symbols(&postfix("8/2/2")), vec!["8", "2", "/", "2", "/"]);
    }

    #[test]
    fn test_brackets_override_precedence() {
        assert_eq!(
            symbols(&postfix("4+18/(9-3)")),
            vec!["4", "18", "9", "3", "-", "/", "+"]
        );
    }

    #[test]
    fn test_two_argument_function() {
        assert_eq!(symbols(&postfix("pow(2,3)")), vec!["2", "3", "pow"]);
        assert_eq!(
            postfix("pow(2,3)")[2].element,
            MathElement::Function("pow".to_string())
        );
    }

    #[test]
    fn test_function_sum() {
        assert_eq!(
            symbols(&postfix("sin(30)+cos(60)")),
            vec!["30", "sin", "60", "cos", "+"]
        );
    }

    #[test]
    fn test_nested_function_arguments() {
        assert_eq!(
            symbols(&postfix("max(5+3, min(10, 7))")),
            vec!["5", "3", "+", "10", "7", "min", "max"]
        );
    }

    #[test]
    fn test_functions_compose() {
        assert_eq!(
            symbols(&postfix("sqrt(pow(3,2)+pow(4,2))")),
            vec!["3", "2", "pow", "4", "2", "pow", "+", "sqrt"]
        );
    }

    #[test]
    fn test_redundant_brackets_leave_no_trace_in_sequence() {
        let elements = postfix("(((3+2)))");
        assert_eq!(symbols(&elements), vec!["3", "2", "+"]);
        assert!(elements[2].grouped);
        assert!(!elements[0].grouped);
    }

    #[test]
    fn test_function_brackets_do_not_mark_grouping() {
        let elements = postfix("sin(30)");
        assert_eq!(symbols(&elements), vec!["30", "sin"]);
        assert!(elements.iter().all(|e| !e.grouped));
    }

    #[test]
    fn test_caret_becomes_function_element() {
        let elements = postfix("-2^3");
        assert_eq!(symbols(&elements), vec!["-2", "3", "^"]);
        assert_eq!(elements[2].element, MathElement::Function("^".to_string()));
    }

    #[test]
    fn test_unary_minus_before_bracket() {
        let elements = postfix("-(5+1)");
        assert_eq!(symbols(&elements), vec!["-1", "5", "1", "+", "*"]);
        assert!(elements[3].grouped);
    }
}
