use log::trace;
use thiserror::Error;

use crate::tree::node::TreeNode;
use crate::tree::postfix::PostfixElement;

/// Structural problems in a postfix sequence. The syntax stage rejects the
/// expressions that would cause these, so hitting one through the full
/// pipeline means an operator was given the wrong number of operands, e.g.
/// a function called with fewer or more than two arguments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("operator '{0}' is missing an operand")]
    MissingOperand(String),

    #[error("{0} operands left without an operator")]
    UnbalancedOperands(usize),

    #[error("empty postfix sequence")]
    EmptyPostfix,
}

/// Folds a postfix sequence into a binary tree. Every operator, function
/// names included, takes exactly two operands off the stack.
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn build(elements: &[PostfixElement]) -> Result<TreeNode, BuildError> {
        let mut operands: Vec<TreeNode> = Vec::new();

        for element in elements {
            if element.element.is_value() {
                let leaf = TreeNode::leaf(element.element.clone()).with_brackets(element.grouped);
                operands.push(leaf);
                continue;
            }

            let right = operands
                .pop()
                .ok_or_else(|| BuildError::MissingOperand(element.element.symbol().to_string()))?;
            let left = operands
                .pop()
                .ok_or_else(|| BuildError::MissingOperand(element.element.symbol().to_string()))?;
            let node = TreeNode::new(element.element.clone(), left, right)
                .with_brackets(element.grouped);
            trace!("built node {}", node.to_expression_string());
            operands.push(node);
        }

        let root = operands.pop().ok_or(BuildError::EmptyPostfix)?;
        if operands.is_empty() {
            Ok(root)
        } else {
            Err(BuildError::UnbalancedOperands(operands.len() + 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ErrorCollector, SyntaxParser, Tokenizer};
    use crate::tree::context::MathContext;
    use crate::tree::element::MathElement;
    use crate::tree::postfix::InfixToPostfixTransformer;

    fn build(input: &str) -> Result<TreeNode, BuildError> {
        let context = MathContext::with_functions(["sin", "pow", "min", "max"]);
        let mut errors = ErrorCollector::new();
        let tokens = Tokenizer::new(&context).tokenize(input, &mut errors);
        let syntax_tokens = SyntaxParser::parse(tokens, &mut errors);
        assert!(!errors.has_errors(), "unexpected errors in {:?}", input);
        TreeBuilder::build(&InfixToPostfixTransformer::transform(&syntax_tokens))
    }

    fn number(text: &str) -> TreeNode {
        TreeNode::leaf(MathElement::Number(text.into()))
    }

    #[test]
    fn test_builds_precedence_shaped_tree() {
        let tree = build("1+2*3").unwrap();
        assert_eq!(
            tree,
            TreeNode::new(
                MathElement::Plus,
                number("1"),
                TreeNode::new(MathElement::Multiply, number("2"), number("3")),
            )
        );
    }

    #[test]
    fn test_bracket_flag_lands_on_grouped_node() {
        let tree = build("(1+b)*2").unwrap();
        assert_eq!(tree.value(), &MathElement::Multiply);
        assert!(!tree.has_brackets());
        let left = tree.left().unwrap();
        assert_eq!(left.value(), &MathElement::Plus);
        assert!(left.has_brackets());
        assert_eq!(tree.to_expression_string(), "(1 + b) * 2");
    }

    #[test]
    fn test_redundant_brackets_collapse_to_one_flag() {
        let tree = build("(((3+2)))").unwrap();
        assert_eq!(
            tree,
            TreeNode::new(MathElement::Plus, number("3"), number("2")).with_brackets(true)
        );
    }

    #[test]
    fn test_function_node_takes_two_operands() {
        let tree = build("pow(2,3)").unwrap();
        assert_eq!(
            tree,
            TreeNode::new(
                MathElement::Function("pow".into()),
                number("2"),
                number("3"),
            )
        );
    }

    #[test]
    fn test_single_argument_call_is_rejected() {
        assert_eq!(
            build("sin(30)"),
            Err(BuildError::MissingOperand("sin".to_string()))
        );
    }

    #[test]
    fn test_empty_call_is_rejected() {
        assert_eq!(
            build("sin()"),
            Err(BuildError::MissingOperand("sin".to_string()))
        );
    }

    #[test]
    fn test_lone_number_is_a_leaf() {
        assert_eq!(build("42").unwrap(), number("42"));
    }
}
